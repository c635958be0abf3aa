// 🏪 Counterparty Name Cleaner
//
// Card terminals prepend the payment processor to the merchant name and
// append terminal/branch numbers:
// - "FAWRY Carrefour 1234" → "Carrefour"
// - "PAYMOB-Talabat"       → "Talabat"
// - "POS Spinneys 02"      → "Spinneys"

use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// PROCESSOR PREFIXES
// ============================================================================

/// Payment-processor prefixes, checked in order (case-insensitive).
/// Only the first match is stripped.
pub const PROCESSOR_PREFIXES: &[&str] = &[
    "PAYMOB-", "PAYMOB ", "PAYMOBS ", "GEIDEA ", "GEIDEAE ", "FAWRY ", "FAWRYPF ", "MY FAWRY",
    "Fawry ", "FawryPF ", "AFS-", "AFS ", "POS ", "NGOV_UNI ", "BEE ", "KASHIER ",
];

static TRAILING_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[0-9]+$").expect("trailing digits pattern"));

// ============================================================================
// CLEANER
// ============================================================================

/// Strip a known processor prefix and trailing numeric noise from a
/// counterparty string.
pub fn clean_counterparty(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut clean = raw;
    if let Some(prefix) = PROCESSOR_PREFIXES
        .iter()
        .find(|prefix| starts_with_ignore_case(clean, prefix))
    {
        clean = clean[prefix.len()..].trim();
    }

    TRAILING_DIGITS.replace(clean, "").trim().to_string()
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

// ============================================================================
// TESTS
// ============================================================================
