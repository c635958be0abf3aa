// 📊 Processing Report - where every message went
//
// Extraction is lossy: unrecognized messages are dropped without
// error. The report makes that loss visible without changing what is emitted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::accounts::AccountGroup;

/// Why a message did not become a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Sender filter excluded it
    FilteredSender,
    /// Timestamp could not be parsed or resolved
    InvalidTimestamp,
    /// Same timestamp, sender and body as an earlier message
    Duplicate,
    /// Before the start-date filter
    FilteredDate,
    /// Sender is not a configured institution
    UnknownSender,
    /// OTP / login alert keyword
    Suppressed,
    /// No message kind or pattern matched, or the amount was zero
    Unrecognized,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub total: usize,
    pub filtered_sender: usize,
    pub invalid_timestamp: usize,
    pub duplicates: usize,
    pub filtered_date: usize,
    pub unknown_sender: usize,
    pub suppressed: usize,
    pub unrecognized: usize,
    pub emitted: usize,
    pub per_group: BTreeMap<AccountGroup, usize>,
}

impl ProcessingReport {
    pub fn record_skip(&mut self, reason: SkipReason) {
        let counter = match reason {
            SkipReason::FilteredSender => &mut self.filtered_sender,
            SkipReason::InvalidTimestamp => &mut self.invalid_timestamp,
            SkipReason::Duplicate => &mut self.duplicates,
            SkipReason::FilteredDate => &mut self.filtered_date,
            SkipReason::UnknownSender => &mut self.unknown_sender,
            SkipReason::Suppressed => &mut self.suppressed,
            SkipReason::Unrecognized => &mut self.unrecognized,
        };
        *counter += 1;
    }

    pub fn record_emitted(&mut self, group: &AccountGroup) {
        self.emitted += 1;
        *self.per_group.entry(group.clone()).or_default() += 1;
    }

    pub fn skipped(&self) -> usize {
        self.filtered_sender
            + self.invalid_timestamp
            + self.duplicates
            + self.filtered_date
            + self.unknown_sender
            + self.suppressed
            + self.unrecognized
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} messages: {} transactions, {} duplicates, {} suppressed, {} unrecognized, {} other skipped",
            self.total,
            self.emitted,
            self.duplicates,
            self.suppressed,
            self.unrecognized,
            self.filtered_sender + self.invalid_timestamp + self.filtered_date + self.unknown_sender
        )
    }
}
