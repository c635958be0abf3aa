// 🔄 Pipeline - SMS records in, grouped transactions out
//
// Per message, in arrival order:
//   sender filter → timestamp → dedup → date filter → dispatch (sender +
//   suppression) → extractor → category → account book
//
// Run-scoped state (seen-set, account book, counters) lives in a RunContext
// owned by `run`; the Pipeline itself is immutable and reusable.

use chrono::NaiveDateTime;
use tracing::{debug, info, trace};

use crate::accounts::{AccountBook, GroupedTransactions};
use crate::backup::SmsRecord;
use crate::category::CategorySlot;
use crate::config::{Config, RunFilters};
use crate::deduplication::DeduplicationEngine;
use crate::parser::{Dispatch, ParserRegistry, Suppression};
use crate::report::{ProcessingReport, SkipReason};
use crate::rules::CategoryRules;
use crate::temporal::TimeZoneChoice;
use crate::transaction::{RawMessage, Transaction};

// ============================================================================
// RUN STATE
// ============================================================================

/// Mutable state for a single run. Not shared across threads.
pub struct RunContext {
    pub dedup: DeduplicationEngine,
    pub book: AccountBook,
    pub report: ProcessingReport,
}

impl RunContext {
    pub fn new() -> Self {
        RunContext {
            dedup: DeduplicationEngine::new(),
            book: AccountBook::new(),
            report: ProcessingReport::default(),
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a run: finalized groups plus the processing report
#[derive(Debug)]
pub struct RunOutput {
    pub groups: GroupedTransactions,
    pub report: ProcessingReport,
}

// ============================================================================
// PIPELINE
// ============================================================================

pub struct Pipeline {
    registry: ParserRegistry,
    rules: CategoryRules,
    zone: TimeZoneChoice,
}

impl Pipeline {
    pub fn new(config: &Config, zone: TimeZoneChoice) -> Self {
        Pipeline {
            registry: ParserRegistry::new(&config.accounts),
            rules: config.category_rules(),
            zone,
        }
    }

    /// Process every record and return the finalized account groups
    pub fn run(&self, records: &[SmsRecord], filters: &RunFilters) -> RunOutput {
        let mut ctx = RunContext::new();

        for record in records {
            self.process(&mut ctx, record, filters);
        }

        info!("{}", ctx.report.summary());

        RunOutput {
            groups: ctx.book.finalize(),
            report: ctx.report,
        }
    }

    /// Push one record through the pipeline, updating the run context
    pub fn process(&self, ctx: &mut RunContext, record: &SmsRecord, filters: &RunFilters) {
        ctx.report.total += 1;

        match self.build_transaction(ctx, record, filters) {
            Ok(tx) => {
                ctx.report.record_emitted(&tx.account_group);
                ctx.book.record(tx);
            }
            Err(reason) => {
                trace!(sender = %record.address, ?reason, "message skipped");
                ctx.report.record_skip(reason);
            }
        }
    }

    fn build_transaction(
        &self,
        ctx: &mut RunContext,
        record: &SmsRecord,
        filters: &RunFilters,
    ) -> Result<Transaction, SkipReason> {
        if filters
            .sender
            .as_deref()
            .is_some_and(|sender| sender != record.address)
        {
            return Err(SkipReason::FilteredSender);
        }

        let parsed = RawMessage::from_parts(&record.address, &record.body, &record.date);
        let Some(message) = parsed else {
            debug!(date = %record.date, "unparseable timestamp");
            return Err(SkipReason::InvalidTimestamp);
        };
        let timestamp = self
            .zone
            .resolve(message.timestamp_millis)
            .ok_or(SkipReason::InvalidTimestamp)?;

        if ctx.dedup.check_and_record(&message) {
            return Err(SkipReason::Duplicate);
        }

        if !passes_date_filter(timestamp, filters) {
            return Err(SkipReason::FilteredDate);
        }

        self.extract(&message, timestamp)
    }

    /// Dispatch, extract and categorize a single message
    pub fn extract(&self, message: &RawMessage, timestamp: NaiveDateTime) -> Result<Transaction, SkipReason> {
        let parser = match self.registry.classify(&message.sender, &message.body) {
            Dispatch::Extract(parser) => parser,
            Dispatch::Suppressed(Suppression::UnknownSender) => return Err(SkipReason::UnknownSender),
            Dispatch::Suppressed(Suppression::Keyword(keyword)) => {
                debug!(sender = %message.sender, keyword, "suppressed non-transactional message");
                return Err(SkipReason::Suppressed);
            }
        };

        let Some(extraction) = parser.extract(&message.body) else {
            debug!(sender = %message.sender, "no extraction pattern matched");
            return Err(SkipReason::Unrecognized);
        };

        let mut tx = Transaction::from_posting(message, timestamp, extraction.account_group, extraction.posting);
        if tx.category.needs_classification() {
            let category = self.rules.categorize(&tx.counterparty, &tx.note, tx.amount);
            tx.category = CategorySlot::Classified(category);
        }

        Ok(tx)
    }
}

fn passes_date_filter(timestamp: NaiveDateTime, filters: &RunFilters) -> bool {
    match filters.from {
        Some(from) => timestamp.date() >= from,
        None => true,
    }
}

// ============================================================================
// TESTS
// ============================================================================
