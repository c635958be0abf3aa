// 🏦 Banque Misr Parser
// Single account group; messages are either transfers or card purchases.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{
    amount_and_currency, capture_between, contains_any, dispatch_kind, pattern, Extraction,
    Institution, MessageKind, SmsParser,
};
use crate::accounts::AccountGroup;
use crate::transaction::Posting;

const HOME: &str = crate::currency::HOME_CURRENCY;

// ============================================================================
// PATTERNS
// ============================================================================

// Transfers may omit decimals and put the currency on either side
static TRANSFER_AMOUNT: Lazy<Regex> =
    Lazy::new(|| pattern(r"مبلغ\s*(?:{CUR}\s*)?([0-9,]+(?:\.[0-9]+)?)(?:\s*{CUR})?"));
static PURCHASE_AMOUNT: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?:مبلغ|amount)\s*{CUR}?\s*([0-9,]+\.[0-9]{2})"));
static PURCHASE_MERCHANT: Lazy<Regex> = Lazy::new(|| pattern(r"BM (.*?) (?:يوم|on)"));

// ============================================================================
// KIND TABLE
// ============================================================================

const KINDS: &[MessageKind<BanqueMisrParser>] = &[
    MessageKind {
        name: "transfer",
        applies: |_, body| contains_any(body, &["تم تحويل مبلغ", "تم اضافة مبلغ"]),
        extract: |_, body| extract_transfer(body),
    },
    MessageKind {
        name: "purchase",
        applies: |_, body| contains_any(body, &["تم الخصم", "transaction"]),
        extract: |_, body| extract_purchase(body),
    },
];

// ============================================================================
// PARSER
// ============================================================================

pub struct BanqueMisrParser;

impl BanqueMisrParser {
    pub fn new() -> Self {
        BanqueMisrParser
    }
}

impl Default for BanqueMisrParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SmsParser for BanqueMisrParser {
    fn institution(&self) -> Institution {
        Institution::BanqueMisr
    }

    fn extract(&self, body: &str) -> Option<Extraction> {
        let posting = dispatch_kind(KINDS, self, body)?;
        Some(Extraction {
            account_group: AccountGroup::banque_misr(),
            posting,
        })
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

fn extract_transfer(body: &str) -> Option<Posting> {
    let caps = TRANSFER_AMOUNT.captures(body)?;
    let (amount, currency) = amount_and_currency(&caps, 2, &[1, 3], HOME)?;

    if body.contains("من حساب") {
        Some(Posting::expense(amount, currency, "Transfer Out"))
    } else if body.contains("الى حساب") {
        Some(Posting::income(amount, currency, "Transfer In"))
    } else {
        None
    }
}

fn extract_purchase(body: &str) -> Option<Posting> {
    let caps = PURCHASE_AMOUNT.captures(body)?;
    let (amount, currency) = amount_and_currency(&caps, 2, &[1], HOME)?;
    let merchant =
        capture_between(&PURCHASE_MERCHANT, body).unwrap_or_else(|| "Card Purchase".to_string());
    Some(Posting::expense(amount, currency, merchant))
}

// ============================================================================
// TESTS
// ============================================================================
