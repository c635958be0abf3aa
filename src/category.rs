// 🏷️ Category Taxonomy - fixed set of spending categories
//
// Labels are part of the output contract (they end up in the CSV and in the
// "[Category] note" prefix), so they are spelled exactly as spreadsheets
// downstream expect them.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Drink")]
    FoodAndDrink,

    #[serde(rename = "Shopping")]
    Shopping,

    #[serde(rename = "Housing")]
    Housing,

    #[serde(rename = "Transportation")]
    Transportation,

    #[serde(rename = "Vehicle")]
    Vehicle,

    #[serde(rename = "Life & Entertainment")]
    LifeAndEntertainment,

    #[serde(rename = "Communication, PC")]
    Communications,

    #[serde(rename = "Financial expenses")]
    Financial,

    #[serde(rename = "Income")]
    Income,

    #[serde(rename = "General")]
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FoodAndDrink => "Food & Drink",
            Category::Shopping => "Shopping",
            Category::Housing => "Housing",
            Category::Transportation => "Transportation",
            Category::Vehicle => "Vehicle",
            Category::LifeAndEntertainment => "Life & Entertainment",
            Category::Communications => "Communication, PC",
            Category::Financial => "Financial expenses",
            Category::Income => "Income",
            Category::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CATEGORY SLOT
// ============================================================================

/// Where a transaction's category came from.
///
/// An extractor may pin the category (`Overridden`), in which case the
/// keyword classifier must not run. Everything else starts `Unset` and is
/// filled in by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategorySlot {
    #[default]
    Unset,
    Classified(Category),
    Overridden(Category),
}

impl CategorySlot {
    /// Category to report; an unclassified slot reads as `General`.
    pub fn resolved(&self) -> Category {
        match self {
            CategorySlot::Unset => Category::General,
            CategorySlot::Classified(category) | CategorySlot::Overridden(category) => *category,
        }
    }

    /// True when the classifier is allowed to fill this slot.
    pub fn needs_classification(&self) -> bool {
        !matches!(self, CategorySlot::Overridden(_))
    }
}
