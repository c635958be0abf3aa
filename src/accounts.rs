// 🗂️ Account Groups + Aggregator
//
// Every emitted transaction is filed under an account group. Group names are
// part of the output contract: one CSV per group, named after the group.
//
// - CIB_Current_Debit        (CIB debit card + current account, always present)
// - Banque_Misr              (always present)
// - CIB_Credit_Card_<digits> (one per credit card suffix, created on first sight)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::category::Category;
use crate::transaction::Transaction;

// ============================================================================
// ACCOUNT GROUP
// ============================================================================

pub const CIB_CURRENT_DEBIT: &str = "CIB_Current_Debit";
pub const BANQUE_MISR: &str = "Banque_Misr";
pub const CIB_CREDIT_CARD_PREFIX: &str = "CIB_Credit_Card_";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountGroup(String);

impl AccountGroup {
    pub fn cib_current_debit() -> Self {
        AccountGroup(CIB_CURRENT_DEBIT.to_string())
    }

    pub fn banque_misr() -> Self {
        AccountGroup(BANQUE_MISR.to_string())
    }

    /// Group for a CIB credit card identified by its trailing digits.
    pub fn cib_credit_card(suffix: &str) -> Self {
        AccountGroup(format!("{}{}", CIB_CREDIT_CARD_PREFIX, suffix))
    }

    /// Groups that exist in every output, even when empty.
    pub fn base_groups() -> [AccountGroup; 2] {
        [Self::cib_current_debit(), Self::banque_misr()]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// ACCOUNT BOOK (aggregator)
// ============================================================================

/// Finalized output: group → transactions sorted by time.
pub type GroupedTransactions = BTreeMap<AccountGroup, Vec<Transaction>>;

/// Run-scoped accumulator of transactions per account group.
pub struct AccountBook {
    groups: GroupedTransactions,
}

impl AccountBook {
    /// Create a book with the base groups already present
    pub fn new() -> Self {
        let groups = AccountGroup::base_groups()
            .into_iter()
            .map(|group| (group, Vec::new()))
            .collect();
        AccountBook { groups }
    }

    /// Append a transaction to its group, creating the group on first sight
    pub fn record(&mut self, transaction: Transaction) {
        self.groups
            .entry(transaction.account_group.clone())
            .or_default()
            .push(transaction);
    }

    /// Number of groups (including empty base groups)
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of transactions recorded across all groups
    pub fn transaction_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Sort every group by timestamp and tag notes with their category.
    ///
    /// The sort is stable, so equal timestamps keep arrival order.
    pub fn finalize(self) -> GroupedTransactions {
        let mut groups = self.groups;

        for transactions in groups.values_mut() {
            transactions.sort_by_key(|tx| tx.timestamp);

            for tx in transactions.iter_mut() {
                let category = tx.category.resolved();
                if category != Category::General {
                    tx.note = format!("[{}] {}", category, tx.note);
                }
            }
        }

        groups
    }
}

impl Default for AccountBook {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
