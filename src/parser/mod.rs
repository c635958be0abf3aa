// 🏗️ Parser Framework
// One extractor per bank, selected by exact SMS sender identity.
//
// Each extractor sorts a message into a kind (charge, refund, transfer, ...)
// by walking an ordered table of (predicate, handler) pairs; the first kind
// whose predicate holds is the only one tried.

pub mod banque_misr;
pub mod cib;

pub use banque_misr::BanqueMisrParser;
pub use cib::CibParser;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::accounts::AccountGroup;
use crate::config::AccountsConfig;
use crate::currency::{normalize_currency, CURRENCY_TOKEN};
use crate::transaction::Posting;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Institution - which bank's message format applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Institution {
    Cib,
    BanqueMisr,
}

impl Institution {
    pub const ALL: [Institution; 2] = [Institution::Cib, Institution::BanqueMisr];

    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            Institution::Cib => "CIB",
            Institution::BanqueMisr => "Banque Misr",
        }
    }

    /// SMS sender identifier, matched exactly
    pub fn sender(&self) -> &'static str {
        match self {
            Institution::Cib => "CIB",
            Institution::BanqueMisr => "Banque Misr",
        }
    }

    /// Currency assumed when the message doesn't name one
    pub fn home_currency(&self) -> &'static str {
        match self {
            Institution::Cib | Institution::BanqueMisr => crate::currency::HOME_CURRENCY,
        }
    }

    pub fn from_sender(sender: &str) -> Option<Institution> {
        Institution::ALL
            .into_iter()
            .find(|institution| institution.sender() == sender)
    }
}

/// Extraction - what an extractor produced for one message
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub account_group: AccountGroup,
    pub posting: Posting,
}

/// Keywords marking one-time passwords and login alerts.
/// Case-sensitive substring match.
pub const SUPPRESSION_KEYWORDS: &[&str] = &["OTP", "password", "تسجيل الدخول", "code"];

// ============================================================================
// PARSER TRAIT
// ============================================================================

/// SmsParser - one implementation per institution
pub trait SmsParser: Send + Sync {
    /// Institution this parser handles
    fn institution(&self) -> Institution;

    /// Extract a posting and its account group from a message body.
    ///
    /// Returns None when no message kind applies or the selected kind's
    /// patterns don't match. A miss is never an error.
    fn extract(&self, body: &str) -> Option<Extraction>;

    /// Keywords that mark a message as non-transactional
    fn suppression_keywords(&self) -> &'static [&'static str] {
        SUPPRESSION_KEYWORDS
    }

    /// First suppression keyword found in the body, if any
    fn suppression_keyword(&self, body: &str) -> Option<&'static str> {
        self.suppression_keywords()
            .iter()
            .copied()
            .find(|keyword| body.contains(keyword))
    }
}

// ============================================================================
// DISPATCHER
// ============================================================================

/// Why a message was dropped before extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    UnknownSender,
    Keyword(&'static str),
}

pub enum Dispatch<'a> {
    Extract(&'a dyn SmsParser),
    Suppressed(Suppression),
}

/// Get the parser for an institution
pub fn get_parser(institution: Institution, accounts: &AccountsConfig) -> Box<dyn SmsParser> {
    match institution {
        Institution::Cib => Box::new(CibParser::new(accounts)),
        Institution::BanqueMisr => Box::new(BanqueMisrParser::new()),
    }
}

/// ParserRegistry - table of extractors keyed by sender identity
pub struct ParserRegistry {
    parsers: Vec<Box<dyn SmsParser>>,
}

impl ParserRegistry {
    /// Registry with a parser for every configured institution
    pub fn new(accounts: &AccountsConfig) -> Self {
        let parsers = Institution::ALL
            .into_iter()
            .map(|institution| get_parser(institution, accounts))
            .collect();
        ParserRegistry { parsers }
    }

    pub fn get(&self, institution: Institution) -> Option<&dyn SmsParser> {
        self.parsers
            .iter()
            .find(|parser| parser.institution() == institution)
            .map(|parser| parser.as_ref())
    }

    /// Select the extractor for a message, or say why it is suppressed
    pub fn classify(&self, sender: &str, body: &str) -> Dispatch<'_> {
        let Some(parser) = Institution::from_sender(sender).and_then(|i| self.get(i)) else {
            return Dispatch::Suppressed(Suppression::UnknownSender);
        };

        match parser.suppression_keyword(body) {
            Some(keyword) => Dispatch::Suppressed(Suppression::Keyword(keyword)),
            None => Dispatch::Extract(parser),
        }
    }
}

// ============================================================================
// MESSAGE KINDS
// ============================================================================

/// One row of an extractor's kind table. `P` is the parser, so predicates and
/// handlers can read its configuration (e.g. known card suffixes).
pub(crate) struct MessageKind<P> {
    pub name: &'static str,
    pub applies: fn(&P, &str) -> bool,
    pub extract: fn(&P, &str) -> Option<Posting>,
}

/// Run the first applicable kind; zero amounts count as a miss
pub(crate) fn dispatch_kind<P>(kinds: &[MessageKind<P>], parser: &P, body: &str) -> Option<Posting> {
    let kind = kinds.iter().find(|kind| (kind.applies)(parser, body))?;
    trace!(kind = kind.name, "message kind selected");

    let posting = (kind.extract)(parser, body);
    if posting.is_none() {
        trace!(kind = kind.name, "no pattern matched");
    }
    posting.filter(|p| p.amount() != 0.0)
}

// ============================================================================
// PATTERN HELPERS
// ============================================================================

/// Compile a pattern, substituting `{CUR}` with the currency capture group
pub(crate) fn pattern(template: &str) -> Regex {
    let source = template.replace("{CUR}", CURRENCY_TOKEN);
    Regex::new(&source).unwrap_or_else(|e| panic!("invalid pattern {source}: {e}"))
}

static GROUPING: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,\s]").expect("grouping pattern"));

/// Parse a decimal numeral with grouping separators stripped
pub(crate) fn parse_amount(raw: &str) -> Option<f64> {
    let digits = GROUPING.replace_all(raw, "");
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Try patterns in order and return the captures of the first that matches
pub(crate) fn first_match<'t>(patterns: &[&Regex], body: &'t str) -> Option<Captures<'t>> {
    patterns.iter().find_map(|re| re.captures(body))
}

/// Text of a capture group, trimmed; None when absent or blank
pub(crate) fn group_text(caps: &Captures<'_>, index: usize) -> Option<String> {
    caps.get(index)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Amount from one group and currency from the first non-empty of the others
pub(crate) fn amount_and_currency(
    caps: &Captures<'_>,
    amount_index: usize,
    currency_indexes: &[usize],
    home: &str,
) -> Option<(f64, String)> {
    let amount = parse_amount(caps.get(amount_index)?.as_str())?;
    let token = currency_indexes
        .iter()
        .find_map(|&i| group_text(caps, i))
        .unwrap_or_default();
    Some((amount, normalize_currency(&token, home)))
}

/// Single-group text capture between two anchors
pub(crate) fn capture_between(re: &Regex, body: &str) -> Option<String> {
    re.captures(body).and_then(|caps| group_text(&caps, 1))
}

pub(crate) fn contains_any(body: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| body.contains(needle))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_institution_from_sender_is_exact() {
        assert_eq!(Institution::from_sender("CIB"), Some(Institution::Cib));
        assert_eq!(Institution::from_sender("Banque Misr"), Some(Institution::BanqueMisr));
        assert_eq!(Institution::from_sender("cib"), None);
        assert_eq!(Institution::from_sender("CIB "), None);
        assert_eq!(Institution::from_sender("Vodafone"), None);
    }

    #[test]
    fn test_institution_names() {
        assert_eq!(Institution::Cib.name(), "CIB");
        assert_eq!(Institution::BanqueMisr.home_currency(), "EGP");
    }

    #[test]
    fn test_registry_has_all_institutions() {
        let registry = ParserRegistry::new(&AccountsConfig::default());
        for institution in Institution::ALL {
            let parser = registry.get(institution).unwrap();
            assert_eq!(parser.institution(), institution);
        }
    }

    #[test]
    fn test_classify_unknown_sender() {
        let registry = ParserRegistry::new(&AccountsConfig::default());
        assert!(matches!(
            registry.classify("Uber", "charged for EGP 10.00"),
            Dispatch::Suppressed(Suppression::UnknownSender)
        ));
    }

    #[test]
    fn test_classify_suppression_keyword() {
        let registry = ParserRegistry::new(&AccountsConfig::default());
        assert!(matches!(
            registry.classify("Banque Misr", "Your OTP is 1234 for amount EGP 50.00"),
            Dispatch::Suppressed(Suppression::Keyword("OTP"))
        ));
    }

    #[test]
    fn test_classify_suppression_is_case_sensitive() {
        let registry = ParserRegistry::new(&AccountsConfig::default());
        match registry.classify("CIB", "otp reminder") {
            Dispatch::Extract(parser) => assert_eq!(parser.institution(), Institution::Cib),
            Dispatch::Suppressed(reason) => panic!("unexpected suppression: {reason:?}"),
        }
    }

    #[test]
    fn test_parse_amount_strips_grouping() {
        assert_eq!(parse_amount("1,250.75"), Some(1250.75));
        assert_eq!(parse_amount("500"), Some(500.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_pattern_substitutes_currency() {
        let re = pattern(r"for\s*{CUR}?\s*([0-9.]+)");
        let caps = re.captures("for L.E. 12.00").unwrap();
        assert_eq!(&caps[1], "L.E.");
        assert_eq!(&caps[2], "12.00");
    }

    #[test]
    fn test_first_match_respects_order() {
        let a = Regex::new(r"(alpha)").unwrap();
        let b = Regex::new(r"(beta)").unwrap();
        let caps = first_match(&[&b, &a], "alpha beta").unwrap();
        assert_eq!(&caps[1], "beta");
    }
}
