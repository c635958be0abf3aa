// 💱 Currency Normalizer
// Maps the many ways an SMS spells a currency to a canonical code

/// Home currency of both configured institutions.
pub const HOME_CURRENCY: &str = "EGP";

/// Regex fragment matching a currency token as banks write it in SMS text.
/// Always used as a single capture group.
pub const CURRENCY_TOKEN: &str = r"([A-Za-z]{3}|L\.E\.?|ج\.م|جنيه|جم)";

/// Normalized token → canonical code.
///
/// Keys are trimmed and uppercased. Every value also appears as a key mapping
/// to itself, which keeps `normalize_currency` idempotent.
const CURRENCY_ALIASES: &[(&str, &str)] = &[
    ("LE", "EGP"),
    ("L.E", "EGP"),
    ("L.E.", "EGP"),
    ("EGP", "EGP"),
    ("ج.م", "EGP"),
    ("جم", "EGP"),
    ("جنيه", "EGP"),
    ("USD", "USD"),
    ("EUR", "EUR"),
    ("GBP", "GBP"),
    ("TRY", "TRY"),
    ("JPY", "JPY"),
];

/// Normalize a raw currency token.
///
/// Empty input yields `home`. Known aliases map to their canonical code;
/// anything else passes through trimmed and uppercased.
///
/// # Examples:
/// ```
/// use sms_ledger::currency::normalize_currency;
/// assert_eq!(normalize_currency("L.E.", "EGP"), "EGP");
/// assert_eq!(normalize_currency("", "EGP"), "EGP");
/// assert_eq!(normalize_currency(" sar ", "EGP"), "SAR");
/// ```
pub fn normalize_currency(token: &str, home: &str) -> String {
    let cleaned = token.trim().to_uppercase();
    if cleaned.is_empty() {
        return home.to_string();
    }

    CURRENCY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == cleaned)
        .map(|(_, code)| code.to_string())
        .unwrap_or(cleaned)
}

// ============================================================================
// TESTS
// ============================================================================
