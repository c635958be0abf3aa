// 🏦 CIB Parser
//
// CIB sends notifications for three kinds of instrument from one sender:
// - the debit card (known suffix, default 7759)
// - the current account (known suffix, default 2373)
// - any number of credit cards, each identified by its last four digits
//
// Debit card and current account share the CIB_Current_Debit group; each
// credit card gets its own CIB_Credit_Card_<digits> group.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{
    amount_and_currency, capture_between, contains_any, dispatch_kind, first_match, group_text,
    pattern, Extraction, Institution, MessageKind, SmsParser,
};
use crate::accounts::AccountGroup;
use crate::category::Category;
use crate::config::AccountsConfig;
use crate::merchant::clean_counterparty;
use crate::transaction::Posting;

const HOME: &str = crate::currency::HOME_CURRENCY;

// ============================================================================
// PATTERNS
// ============================================================================

static CARD_SUFFIX: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)(?:credit card|ending with|card|بـ)\s*[#*]*\s*([0-9]{4})"));

// Credit card
static CARD_CHARGE: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?i)charged for\s*{CUR}?\s*([0-9,]+\.[0-9]{2})\s*at\s*(.*?)(?:\s+on|\s+at|\. Available)")
});
static CARD_REFUND: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)(?:refunded|red|rd|رد)\s*{CUR}?\s*([0-9,]+\.[0-9]{2})"));
static REPAYMENT_AR: Lazy<Regex> = Lazy::new(|| pattern(r"مبلغ\s*{CUR}?\s*([0-9,]+\.[0-9]{2})"));
static REPAYMENT_EN: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)(?:payment of|amount)\s*{CUR}?\s*([0-9,]+\.[0-9]{2})"));

// Debit card
static DEBIT_CHARGE_AR: Lazy<Regex> = Lazy::new(|| {
    pattern(r"خصم\s*{CUR}?\s*([0-9,]+\.[0-9]{2})\s*{CUR}?\s*من.*?عند\s*(.*?)(?:\s+في|$)")
});
static DEBIT_CHARGE_EN: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?i)charged for\s*{CUR}?\s*([0-9,]+\.[0-9]{2})\s*at\s*(.*?)(?:\s+on|\s+at)")
});
static WITHDRAWAL_AR: Lazy<Regex> =
    Lazy::new(|| pattern(r"سحب\s*(?:مبلغ)?\s*{CUR}?\s*([0-9,]+\.[0-9]{2})"));

// Current account
static ACCOUNT_DEBIT: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)(?:amount|for)\s*{CUR}?\s*([0-9,]+\.[0-9]{2})"));
static PAYEE_TO: Lazy<Regex> = Lazy::new(|| pattern(r"to\s+(.*?)\s+with reference"));
static IPN_INWARD: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?i)credited with IPN Inward for\s*{CUR}?\s*([0-9,]+\.[0-9]{2})")
});
static PAYER_FROM: Lazy<Regex> = Lazy::new(|| pattern(r"from\s+(.*?)\s+with reference"));
static SALARY: Lazy<Regex> =
    Lazy::new(|| pattern(r"تحويل مبلغ\s*{CUR}?([0-9,]+\.[0-9]{2}).*?جهة العمل"));

// ============================================================================
// KIND TABLES
// ============================================================================

const CREDIT_CARD_KINDS: &[MessageKind<CibParser>] = &[
    MessageKind {
        name: "card-repayment",
        applies: |_, body| {
            body.contains("تم سداد") || (body.contains("payment") && body.contains("received"))
        },
        extract: |_, body| extract_repayment(body),
    },
    MessageKind {
        name: "card-charge",
        applies: |_, body| contains_any(body, &["charged for", "purchasing transaction"]),
        extract: |_, body| extract_card_charge(body),
    },
    MessageKind {
        name: "card-refund",
        applies: |_, body| contains_any(body, &["refunded", "rad", "رد"]),
        extract: |_, body| extract_card_refund(body),
    },
];

const CURRENT_DEBIT_KINDS: &[MessageKind<CibParser>] = &[
    MessageKind {
        name: "debit-card-charge",
        applies: |parser, body| {
            body.contains(parser.debit_card.as_str())
                && contains_any(body, &["charged for", "خصم", "withdrawal", "سحب"])
        },
        extract: |_, body| extract_debit_charge(body),
    },
    MessageKind {
        name: "account-outgoing",
        applies: |parser, body| {
            body.contains(parser.current_account.as_str())
                && contains_any(body, &["debited", "charged with", "تم تحويل"])
        },
        extract: |_, body| extract_account_outgoing(body),
    },
    MessageKind {
        name: "account-incoming",
        applies: |parser, body| {
            body.contains(parser.current_account.as_str())
                && contains_any(body, &["credited", "تحويل مبلغ", "add"])
        },
        extract: |_, body| extract_account_incoming(body),
    },
];

// ============================================================================
// PARSER
// ============================================================================

pub struct CibParser {
    debit_card: String,
    current_account: String,
}

impl CibParser {
    pub fn new(accounts: &AccountsConfig) -> Self {
        CibParser {
            debit_card: accounts.cib_debit_card.clone(),
            current_account: accounts.cib_current_account.clone(),
        }
    }

    /// Trailing digits of a credit card named in the message.
    ///
    /// Only the first card-like token counts; the known debit card and
    /// current account suffixes are not credit cards.
    pub fn credit_card_suffix(&self, body: &str) -> Option<String> {
        let digits = CARD_SUFFIX.captures(body)?.get(1)?.as_str();
        if digits == self.debit_card || digits == self.current_account {
            return None;
        }
        Some(digits.to_string())
    }

    fn mentions_current_debit(&self, body: &str) -> bool {
        body.contains(self.debit_card.as_str()) || body.contains(self.current_account.as_str())
    }
}

impl SmsParser for CibParser {
    fn institution(&self) -> Institution {
        Institution::Cib
    }

    fn extract(&self, body: &str) -> Option<Extraction> {
        if let Some(suffix) = self.credit_card_suffix(body) {
            let posting = dispatch_kind(CREDIT_CARD_KINDS, self, body)?;
            return Some(Extraction {
                account_group: AccountGroup::cib_credit_card(&suffix),
                posting,
            });
        }

        if self.mentions_current_debit(body) {
            let posting = dispatch_kind(CURRENT_DEBIT_KINDS, self, body)?;
            return Some(Extraction {
                account_group: AccountGroup::cib_current_debit(),
                posting,
            });
        }

        None
    }
}

// ============================================================================
// CREDIT CARD HANDLERS
// ============================================================================

fn extract_repayment(body: &str) -> Option<Posting> {
    let caps = first_match(&[&REPAYMENT_AR, &REPAYMENT_EN], body)?;
    let (amount, currency) = amount_and_currency(&caps, 2, &[1], HOME)?;
    Some(Posting::income(amount, currency, "CIB Repayment").with_category_override(Category::Financial))
}

fn extract_card_charge(body: &str) -> Option<Posting> {
    let caps = CARD_CHARGE.captures(body)?;
    let (amount, currency) = amount_and_currency(&caps, 2, &[1], HOME)?;
    let merchant = group_text(&caps, 3).unwrap_or_default();
    Some(Posting::expense(amount, currency, clean_counterparty(&merchant)))
}

fn extract_card_refund(body: &str) -> Option<Posting> {
    let caps = CARD_REFUND.captures(body)?;
    let (amount, currency) = amount_and_currency(&caps, 2, &[1], HOME)?;
    Some(Posting::income(amount, currency, "Refund"))
}

// ============================================================================
// DEBIT CARD / CURRENT ACCOUNT HANDLERS
// ============================================================================

fn extract_debit_charge(body: &str) -> Option<Posting> {
    if let Some(caps) = DEBIT_CHARGE_AR.captures(body) {
        let (amount, currency) = amount_and_currency(&caps, 2, &[1, 3], HOME)?;
        let merchant = group_text(&caps, 4).unwrap_or_default();
        return Some(Posting::expense(amount, currency, clean_counterparty(&merchant)));
    }

    if let Some(caps) = DEBIT_CHARGE_EN.captures(body) {
        let (amount, currency) = amount_and_currency(&caps, 2, &[1], HOME)?;
        let merchant = group_text(&caps, 3).unwrap_or_default();
        return Some(Posting::expense(amount, currency, clean_counterparty(&merchant)));
    }

    let caps = WITHDRAWAL_AR.captures(body)?;
    let (amount, currency) = amount_and_currency(&caps, 2, &[1], HOME)?;
    Some(Posting::expense(amount, currency, "ATM Withdrawal"))
}

fn extract_account_outgoing(body: &str) -> Option<Posting> {
    let caps = ACCOUNT_DEBIT.captures(body)?;
    let (amount, currency) = amount_and_currency(&caps, 2, &[1], HOME)?;

    if body.contains("transfer to another account") {
        return Some(
            Posting::expense(amount, currency, "Transfer to Account / CC")
                .with_category_override(Category::Financial),
        );
    }

    let payee = capture_between(&PAYEE_TO, body).unwrap_or_else(|| "Transfer Out".to_string());
    Some(Posting::expense(amount, currency, payee))
}

fn extract_account_incoming(body: &str) -> Option<Posting> {
    if let Some(caps) = IPN_INWARD.captures(body) {
        let (amount, currency) = amount_and_currency(&caps, 2, &[1], HOME)?;
        let payer = capture_between(&PAYER_FROM, body).unwrap_or_else(|| "Transfer In".to_string());
        return Some(Posting::income(amount, currency, payer));
    }

    let caps = SALARY.captures(body)?;
    let (amount, currency) = amount_and_currency(&caps, 2, &[1], HOME)?;
    Some(Posting::income(amount, currency, "Salary / Work"))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategorySlot;
    use crate::transaction::Direction;

    fn parser() -> CibParser {
        CibParser::new(&AccountsConfig::default())
    }

    // ------------------------------------------------------------------------
    // Instrument routing
    // ------------------------------------------------------------------------

    #[test]
    fn test_credit_card_suffix_detection() {
        let p = parser();
        assert_eq!(p.credit_card_suffix("Your credit card #4821 was charged"), Some("4821".to_string()));
        assert_eq!(p.credit_card_suffix("card ending with **9912"), Some("9912".to_string()));
        assert_eq!(p.credit_card_suffix("Your debit card 7759 was charged"), None);
        assert_eq!(p.credit_card_suffix("account 2373"), None);
        assert_eq!(p.credit_card_suffix("no instrument here"), None);
    }

    #[test]
    fn test_unknown_instrument_is_unrecognized() {
        let p = parser();
        assert!(p.extract("charged for EGP 10.00 at SHOP on 01/01").is_none());
    }

    #[test]
    fn test_configured_suffixes() {
        let accounts = AccountsConfig {
            cib_debit_card: "1111".to_string(),
            cib_current_account: "2222".to_string(),
        };
        let p = CibParser::new(&accounts);
        assert_eq!(p.credit_card_suffix("debit card 1111"), None);
        assert_eq!(p.credit_card_suffix("credit card 7759"), Some("7759".to_string()));
    }

    // ------------------------------------------------------------------------
    // Credit card
    // ------------------------------------------------------------------------

    #[test]
    fn test_credit_card_charge() {
        let body = "Your credit card #4821 was charged for EGP 1,250.50 at PAYMOB-Talabat 221 on 05/03/2024 at 21:10. Available limit EGP 8,000.00";
        let ex = parser().extract(body).unwrap();

        assert_eq!(ex.account_group, AccountGroup::cib_credit_card("4821"));
        assert_eq!(ex.posting.amount(), -1250.50);
        assert_eq!(ex.posting.direction(), Direction::Expense);
        assert_eq!(ex.posting.currency, "EGP");
        assert_eq!(ex.posting.counterparty, "Talabat");
        assert_eq!(ex.posting.category, CategorySlot::Unset);
    }

    #[test]
    fn test_credit_card_charge_foreign_currency() {
        let body = "Your credit card #4821 was charged for USD 12.99 at GOOGLE *YouTube on 05/03/2024";
        let ex = parser().extract(body).unwrap();
        assert_eq!(ex.posting.currency, "USD");
        assert_eq!(ex.posting.amount(), -12.99);
        assert_eq!(ex.posting.counterparty, "GOOGLE *YouTube");
    }

    #[test]
    fn test_credit_card_refund() {
        let body = "Your credit card #4821 has been refunded EGP 300.00 from AMAZON";
        let ex = parser().extract(body).unwrap();
        assert_eq!(ex.posting.amount(), 300.0);
        assert_eq!(ex.posting.direction(), Direction::Income);
        assert_eq!(ex.posting.counterparty, "Refund");
    }

    #[test]
    fn test_credit_card_repayment_overrides_category() {
        let body = "تم سداد مبلغ 5,000.00 لبطاقتك الائتمانية credit card 4821";
        let ex = parser().extract(body).unwrap();

        assert_eq!(ex.account_group, AccountGroup::cib_credit_card("4821"));
        assert_eq!(ex.posting.amount(), 5000.0);
        assert_eq!(ex.posting.direction(), Direction::Income);
        assert_eq!(ex.posting.counterparty, "CIB Repayment");
        assert_eq!(ex.posting.category, CategorySlot::Overridden(Category::Financial));
    }

    #[test]
    fn test_credit_card_repayment_english() {
        let body = "Your payment of EGP 2,000.00 to credit card 4821 has been received";
        let ex = parser().extract(body).unwrap();
        assert_eq!(ex.posting.amount(), 2000.0);
        assert_eq!(ex.posting.direction(), Direction::Income);
    }

    #[test]
    fn test_credit_card_unmatched_kind() {
        assert!(parser().extract("Your credit card 4821 statement is ready").is_none());
    }

    // ------------------------------------------------------------------------
    // Debit card
    // ------------------------------------------------------------------------

    #[test]
    fn test_debit_charge_arabic() {
        let body = "تم خصم EGP 150.00 من بطاقتك رقم 7759 عند FAWRY Carrefour 1234 في 01/03/2024 14:05";
        let ex = parser().extract(body).unwrap();

        assert_eq!(ex.account_group, AccountGroup::cib_current_debit());
        assert_eq!(ex.posting.amount(), -150.0);
        assert_eq!(ex.posting.direction(), Direction::Expense);
        assert_eq!(ex.posting.counterparty, "Carrefour");
    }

    #[test]
    fn test_debit_charge_arabic_trailing_currency() {
        let body = "تم خصم 75.25 جنيه من بطاقتك رقم 7759 عند Costa";
        let ex = parser().extract(body).unwrap();
        assert_eq!(ex.posting.amount(), -75.25);
        assert_eq!(ex.posting.currency, "EGP");
        assert_eq!(ex.posting.counterparty, "Costa");
    }

    #[test]
    fn test_debit_charge_english() {
        let body = "Your debit card 7759 was charged for EGP 89.00 at UBER TRIP on 02/03/2024";
        let ex = parser().extract(body).unwrap();
        assert_eq!(ex.posting.amount(), -89.0);
        assert_eq!(ex.posting.counterparty, "UBER TRIP");
    }

    #[test]
    fn test_debit_atm_withdrawal() {
        let body = "تم سحب مبلغ EGP 2,000.00 من بطاقتك رقم 7759";
        let ex = parser().extract(body).unwrap();
        assert_eq!(ex.posting.amount(), -2000.0);
        assert_eq!(ex.posting.counterparty, "ATM Withdrawal");
    }

    // ------------------------------------------------------------------------
    // Current account
    // ------------------------------------------------------------------------

    #[test]
    fn test_account_outgoing_to_payee() {
        let body = "Your account 2373 was debited for EGP 3,500.00 transfer to Ahmed Ali with reference 99812";
        let ex = parser().extract(body).unwrap();
        assert_eq!(ex.account_group, AccountGroup::cib_current_debit());
        assert_eq!(ex.posting.amount(), -3500.0);
        assert_eq!(ex.posting.counterparty, "Ahmed Ali");
        assert_eq!(ex.posting.category, CategorySlot::Unset);
    }

    #[test]
    fn test_account_outgoing_own_card_transfer() {
        let body = "Your account 2373 was debited for EGP 1,000.00 for transfer to another account";
        let ex = parser().extract(body).unwrap();
        assert_eq!(ex.posting.counterparty, "Transfer to Account / CC");
        assert_eq!(ex.posting.category, CategorySlot::Overridden(Category::Financial));
    }

    #[test]
    fn test_account_outgoing_fallback_label() {
        let body = "Your account 2373 was charged with amount EGP 40.00";
        let ex = parser().extract(body).unwrap();
        assert_eq!(ex.posting.amount(), -40.0);
        assert_eq!(ex.posting.counterparty, "Transfer Out");
    }

    #[test]
    fn test_account_incoming_ipn() {
        let body = "Your account 2373 was credited with IPN Inward for EGP 500.00 from MOHAMED SAMIR with reference 55";
        let ex = parser().extract(body).unwrap();
        assert_eq!(ex.posting.amount(), 500.0);
        assert_eq!(ex.posting.direction(), Direction::Income);
        assert_eq!(ex.posting.counterparty, "MOHAMED SAMIR");
    }

    #[test]
    fn test_account_incoming_ipn_without_payer() {
        let body = "Your account 2373 was credited with IPN Inward for EGP 500.00";
        let ex = parser().extract(body).unwrap();
        assert_eq!(ex.posting.counterparty, "Transfer In");
    }

    #[test]
    fn test_account_incoming_salary() {
        let body = "حسابك 2373 تحويل مبلغ EGP25,000.00 من جهة العمل";
        let ex = parser().extract(body).unwrap();
        assert_eq!(ex.posting.amount(), 25000.0);
        assert_eq!(ex.posting.direction(), Direction::Income);
        assert_eq!(ex.posting.counterparty, "Salary / Work");
    }
}
