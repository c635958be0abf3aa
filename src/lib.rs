// SMS Ledger - Core Library
// Exposes the extraction engine for the CLI and tests

pub mod accounts;      // Account groups + aggregator
pub mod backup;        // SMS backup XML reader
pub mod category;      // Category labels
pub mod config;        // JSON config + run filters
pub mod currency;      // Currency normalizer
pub mod deduplication; // Exact-duplicate suppression
pub mod error;
pub mod export;        // Per-group CSV writer
pub mod merchant;      // Counterparty name cleaner
pub mod parser;        // Dispatcher + per-bank extractors
pub mod pipeline;      // Orchestration
pub mod report;        // Per-run counters
pub mod rules;         // Keyword category classifier
pub mod temporal;      // Epoch millis → wall-clock time
pub mod transaction;   // Message / posting / transaction model

// Re-export commonly used types
pub use accounts::{AccountBook, AccountGroup, GroupedTransactions};
pub use backup::{load_backup, parse_backup, SmsRecord};
pub use category::{Category, CategorySlot};
pub use config::{AccountsConfig, Config, RunFilters};
pub use currency::normalize_currency;
pub use deduplication::{DedupeKey, DeduplicationEngine};
pub use error::{LedgerError, Result};
pub use export::{write_group, write_groups, WrittenFile};
pub use merchant::clean_counterparty;
pub use parser::{
    get_parser, BanqueMisrParser, CibParser, Dispatch, Extraction, Institution, ParserRegistry,
    SmsParser, Suppression,
};
pub use pipeline::{Pipeline, RunContext, RunOutput};
pub use report::{ProcessingReport, SkipReason};
pub use rules::{default_rules, CategoryRule, CategoryRules};
pub use temporal::TimeZoneChoice;
pub use transaction::{Direction, Posting, RawMessage, Transaction, TransactionRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
