// 🔍 Deduplication Engine - Collapse repeated SMS deliveries
//
// Phones sometimes store the same notification twice (re-delivery, backup
// merges). Two messages are the same event when timestamp, sender and body
// are all identical; only the first one is processed.
//
// Not thread-safe: the seen-set belongs to a single run.

use sha2::{Digest, Sha256};
use std::collections::HashSet;

use crate::transaction::RawMessage;

// ============================================================================
// DEDUP KEY
// ============================================================================

/// Signature of a message: hash of timestamp, sender and body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupeKey(String);

impl DedupeKey {
    pub fn for_message(message: &RawMessage) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(format!(
            "{}|{}|{}",
            message.timestamp_millis, message.sender, message.body
        ));
        DedupeKey(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// DEDUPLICATION ENGINE
// ============================================================================

pub struct DeduplicationEngine {
    seen: HashSet<DedupeKey>,
}

impl DeduplicationEngine {
    /// Create engine with an empty seen-set
    pub fn new() -> Self {
        DeduplicationEngine {
            seen: HashSet::new(),
        }
    }

    /// Returns true when this message was already processed in this run.
    /// First sightings are recorded and return false.
    pub fn check_and_record(&mut self, message: &RawMessage) -> bool {
        !self.seen.insert(DedupeKey::for_message(message))
    }

    /// Number of distinct messages seen so far
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

impl Default for DeduplicationEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
