// 🏷️ Category Rules - Rules as Data
// Ordered keyword groups; the first group with a substring hit wins.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::merchant::clean_counterparty;

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Rule ID for tracking
    pub id: String,

    /// Category assigned when any keyword matches
    pub category: Category,

    /// Lowercase substrings searched for in "counterparty note"
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(id: &str, category: Category, keywords: &[&str]) -> Self {
        CategoryRule {
            id: id.to_string(),
            category,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Check whether any keyword occurs in already-lowercased text
    pub fn matches(&self, text_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| text_lower.contains(keyword.as_str()))
    }
}

// ============================================================================
// DEFAULT TABLE
// ============================================================================

const FINANCIAL_TRANSFER_KEYWORDS: &[&str] = &["credit card payment", "sadaad", "cib repayment"];

const SHOPPING_KEYWORDS: &[&str] = &[
    "amazon", "noon", "jumia", "souq", "shopping", "zara", "h&m", "lc waikiki", "defacto",
    "american eagle", "lachica", "ravin", "el salama", "stitch", "clothes", "fashion", "shoes",
    "concrete", "town team", "activ", "naga", "rich for cloth", "pronto", "scarpe", "scarape",
    "tie house", "rose paris", "b tech", "b.tech", "trade line", "2b", "best buy", "dubai phone",
    "mobile shop", "el araby", "fresh electric", "tornado",
];

const FURNITURE_KEYWORDS: &[&str] = &["ikea", "homzmart", "furniture", "jotun", "ahfad"];

const FOOD_KEYWORDS: &[&str] = &[
    "mcdonalds", "kfc", "pizza", "burger", "buffalo", "primos", "spectra", "desoky", "sandwich",
    "elmenus", "talabat", "breadfast", "roosters", "hardees", "manchow", "willys", "dhad",
    "el dahan", "sanabel", "fookotcharia", "krispy", "cafe", "costa", "starbucks", "cilantro",
    "tbsp", "espresso", "beano", "cinnabon", "dunkin", "caribou", "house of cocoa", "sale sucre",
    "dar el bon", "karak", "potasta", "b labn", "b.labn", "carrefour", "fathalla", "market",
    "seoudi", "gomla", "bim", "kazyon", "hyper", "ramadan hamada", "saood", "metro",
    "kheir zaman", "ragab", "abu auf", "kashier", "elkhalil", "aswak", "fresh food", "sun mall",
    "grapes",
];

const TRANSPORT_KEYWORDS: &[&str] = &[
    "uber", "didi", "careem", "indriver", "transport", "super jet", "railways", "go bus", "swvl",
    "pegasus", "fly", "airline", "booking", "flight",
];

const VEHICLE_KEYWORDS: &[&str] = &[
    "mobil", "chillout", "gas station", "total", "ola", "master gas", "adnoc", "wataniya", "fuel",
    "car service", "tire", "fit & fix",
];

const UTILITIES_KEYWORDS: &[&str] = &[
    "sahl", "electricity", "water", "bill", "national gas", "natgas", "town gas", "petrotrade",
    "taqa", "north cairo",
];

const COMMS_KEYWORDS: &[&str] = &[
    "vodafone", "orange", "etisalat", "we ", "telecom", "top up", "landline", "we-fv", "internet",
    "fbb", "adsl", "google", "microsoft", "adobe", "apple", "icloud", "storage", "host", "domain",
    "xbox", "playstation", "steam", "games", "mullvad", "linkedin",
];

const LIFE_KEYWORDS: &[&str] = &[
    "netflix", "spotify", "osn", "shahid", "youtube", "watch it", "yango", "vox", "cinema",
    "renessance", "ticket", "tazkarti", "kindle", "audible", "books", "diwan", "pharmacy", "dr.",
    "hospital", "medical", "ezaby", "elezzaby", "seif", "rushdy", "andalusia", "yosra", "hany",
    "tay",
];

const CASH_KEYWORDS: &[&str] = &[
    "atm", "withdrawal", "s7b", "سحب", "cash", "fawry", "my fawry", "fawrypay",
];

/// Built-in keyword groups in priority order
pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new("financial-transfers", Category::Financial, FINANCIAL_TRANSFER_KEYWORDS),
        CategoryRule::new("shopping", Category::Shopping, SHOPPING_KEYWORDS),
        CategoryRule::new("housing-furniture", Category::Housing, FURNITURE_KEYWORDS),
        CategoryRule::new("food-drink", Category::FoodAndDrink, FOOD_KEYWORDS),
        CategoryRule::new("transportation", Category::Transportation, TRANSPORT_KEYWORDS),
        CategoryRule::new("vehicle", Category::Vehicle, VEHICLE_KEYWORDS),
        CategoryRule::new("housing-utilities", Category::Housing, UTILITIES_KEYWORDS),
        CategoryRule::new("communications", Category::Communications, COMMS_KEYWORDS),
        CategoryRule::new("life-entertainment", Category::LifeAndEntertainment, LIFE_KEYWORDS),
        CategoryRule::new("financial-cash", Category::Financial, CASH_KEYWORDS),
    ]
}

// ============================================================================
// CATEGORY CLASSIFIER
// ============================================================================

#[derive(Debug, Clone)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
}

impl CategoryRules {
    /// Create classifier from an ordered list of rules (order = priority).
    /// Keywords are lowercased so rules loaded from config match like the
    /// built-in ones.
    pub fn from_rules(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|mut rule| {
                rule.keywords = rule.keywords.iter().map(|k| k.to_lowercase()).collect();
                rule
            })
            .collect();
        CategoryRules { rules }
    }

    /// Assign a category from counterparty, note and signed amount.
    ///
    /// Positive amounts are always Income. Otherwise the first rule with a
    /// keyword in the lowercased "counterparty note" text wins, else General.
    pub fn categorize(&self, counterparty: &str, note: &str, amount: f64) -> Category {
        if amount > 0.0 {
            return Category::Income;
        }

        let text = format!("{} {}", clean_counterparty(counterparty), note).to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(&text))
            .map(|rule| rule.category)
            .unwrap_or(Category::General)
    }

    /// Get number of rules loaded
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        CategoryRules::from_rules(default_rules())
    }
}

// ============================================================================
// TESTS
// ============================================================================
