// ⚙️ Configuration
//
// Optional JSON file. Every key has a built-in default, so an empty object
// (or no file at all) reproduces the stock behavior.
//
// {
//   "accounts": { "cib_debit_card": "7759", "cib_current_account": "2373" },
//   "category_rules": [
//     { "id": "gym", "category": "Life & Entertainment", "keywords": ["gold's gym"] }
//   ]
// }

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{LedgerError, Result};
use crate::rules::{CategoryRule, CategoryRules};

// ============================================================================
// ACCOUNTS
// ============================================================================

/// Suffixes identifying the two fixed CIB instruments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountsConfig {
    pub cib_debit_card: String,
    pub cib_current_account: String,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        AccountsConfig {
            cib_debit_card: "7759".to_string(),
            cib_current_account: "2373".to_string(),
        }
    }
}

// ============================================================================
// CONFIG FILE
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub accounts: AccountsConfig,

    /// Replaces the built-in keyword table when present (order = priority)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_rules: Option<Vec<CategoryRule>>,
}

impl Config {
    /// Load config from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| LedgerError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| LedgerError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Keyword classifier for this config
    pub fn category_rules(&self) -> CategoryRules {
        match &self.category_rules {
            Some(rules) => CategoryRules::from_rules(rules.clone()),
            None => CategoryRules::default(),
        }
    }
}

// ============================================================================
// RUN FILTERS
// ============================================================================

/// Per-run message filters supplied by the CLI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFilters {
    /// Keep only messages from this exact sender
    pub sender: Option<String>,

    /// Drop messages before midnight of this date (local wall-clock time)
    pub from: Option<NaiveDate>,
}

impl RunFilters {
    /// Build filters from raw CLI strings; empty strings mean "no filter"
    pub fn parse(sender: Option<&str>, from: Option<&str>) -> Result<Self> {
        let sender = sender.filter(|s| !s.is_empty()).map(str::to_string);

        let from = match from.filter(|s| !s.is_empty()) {
            Some(value) => Some(NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|source| {
                LedgerError::InvalidStartDate {
                    value: value.to_string(),
                    source,
                }
            })?),
            None => None,
        };

        Ok(RunFilters { sender, from })
    }
}

// ============================================================================
// TESTS
// ============================================================================
