// 💳 Transaction Model
//
// RawMessage  → what the phone received (immutable)
// Posting     → what an extractor understood from the text
// Transaction → posting + time + account group + category, ready to file
// TransactionRecord → the seven output columns

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::accounts::AccountGroup;
use crate::category::{Category, CategorySlot};

/// Output timestamp format (also used for sorting-equivalent display)
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// RAW MESSAGE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub sender: String,
    pub body: String,
    pub timestamp_millis: i64,
}

impl RawMessage {
    pub fn new(sender: impl Into<String>, body: impl Into<String>, timestamp_millis: i64) -> Self {
        RawMessage {
            sender: sender.into(),
            body: body.into(),
            timestamp_millis,
        }
    }

    /// Build from container fields, where the timestamp is string-encoded
    /// epoch milliseconds. Returns None when the timestamp doesn't parse.
    pub fn from_parts(sender: &str, body: &str, timestamp: &str) -> Option<Self> {
        let timestamp_millis = timestamp.trim().parse::<i64>().ok()?;
        Some(RawMessage::new(sender, body, timestamp_millis))
    }
}

// ============================================================================
// DIRECTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Expense,
    Income,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Expense => "Expense",
            Direction::Income => "Income",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// POSTING (extractor output)
// ============================================================================

/// Money movement extracted from one message.
///
/// Only constructible through `expense`/`income`, which fix the sign of
/// `amount` from the direction. The literal text never carries a sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    amount: f64,
    direction: Direction,
    pub currency: String,
    pub counterparty: String,
    pub category: CategorySlot,
}

impl Posting {
    /// Outflow: amount stored negative
    pub fn expense(magnitude: f64, currency: String, counterparty: impl Into<String>) -> Self {
        Posting {
            amount: -magnitude.abs(),
            direction: Direction::Expense,
            currency,
            counterparty: counterparty.into(),
            category: CategorySlot::Unset,
        }
    }

    /// Inflow: amount stored positive
    pub fn income(magnitude: f64, currency: String, counterparty: impl Into<String>) -> Self {
        Posting {
            amount: magnitude.abs(),
            direction: Direction::Income,
            currency,
            counterparty: counterparty.into(),
            category: CategorySlot::Unset,
        }
    }

    /// Builder: pin the category so the keyword classifier is skipped
    pub fn with_category_override(mut self, category: Category) -> Self {
        self.category = CategorySlot::Overridden(category);
        self
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub timestamp: NaiveDateTime,
    pub counterparty: String,
    pub amount: f64,
    pub currency: String,
    pub direction: Direction,
    pub category: CategorySlot,
    pub note: String,
    pub account_group: AccountGroup,
}

impl Transaction {
    /// Assemble a transaction from an extractor's posting.
    /// The note starts out as the raw message body.
    pub fn from_posting(
        message: &RawMessage,
        timestamp: NaiveDateTime,
        account_group: AccountGroup,
        posting: Posting,
    ) -> Self {
        Transaction {
            timestamp,
            counterparty: posting.counterparty,
            amount: posting.amount,
            currency: posting.currency,
            direction: posting.direction,
            category: posting.category,
            note: message.body.clone(),
            account_group,
        }
    }

    /// Output row in the fixed column order
    pub fn to_record(&self) -> TransactionRecord {
        TransactionRecord {
            date: self.timestamp.format(DATE_FORMAT).to_string(),
            payee: self.counterparty.clone(),
            amount: format!("{:.2}", self.amount),
            currency: self.currency.clone(),
            transaction_type: self.direction.as_str().to_string(),
            category: self.category.resolved().as_str().to_string(),
            note: self.note.clone(),
        }
    }
}

/// One output row: date, payee, amount, currency, type, category, note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: String,
    pub payee: String,
    pub amount: String,
    pub currency: String,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub category: String,
    pub note: String,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_raw_message_from_parts() {
        let msg = RawMessage::from_parts("CIB", "hello", "1709290800000").unwrap();
        assert_eq!(msg.timestamp_millis, 1_709_290_800_000);
        assert!(RawMessage::from_parts("CIB", "hello", "yesterday").is_none());
        assert!(RawMessage::from_parts("CIB", "hello", "").is_none());
    }

    #[test]
    fn test_posting_sign_follows_direction() {
        let out = Posting::expense(150.0, "EGP".to_string(), "Carrefour");
        assert_eq!(out.amount(), -150.0);
        assert_eq!(out.direction(), Direction::Expense);

        let inc = Posting::income(500.0, "EGP".to_string(), "Transfer In");
        assert_eq!(inc.amount(), 500.0);
        assert_eq!(inc.direction(), Direction::Income);
    }

    #[test]
    fn test_posting_override_builder() {
        let posting = Posting::income(10.0, "EGP".to_string(), "CIB Repayment")
            .with_category_override(Category::Financial);
        assert_eq!(posting.category, CategorySlot::Overridden(Category::Financial));
    }

    #[test]
    fn test_transaction_record_formatting() {
        let message = RawMessage::new("CIB", "body text", 0);
        let timestamp = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        let posting = Posting::expense(1234.5, "EGP".to_string(), "Zara");
        let tx = Transaction::from_posting(&message, timestamp, AccountGroup::cib_current_debit(), posting);

        let record = tx.to_record();
        assert_eq!(record.date, "2024-03-01 14:05:09");
        assert_eq!(record.payee, "Zara");
        assert_eq!(record.amount, "-1234.50");
        assert_eq!(record.transaction_type, "Expense");
        assert_eq!(record.category, "General");
        assert_eq!(record.note, "body text");
    }
}
