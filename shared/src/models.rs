//! Meal record models
//!
//! Records arrive from a tabular store and a vision model, so every numeric
//! field is read leniently: anything that is not a finite, non-negative
//! number becomes `None` instead of failing the whole record.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// Meal category tallied in reports, in canonical display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Other,
}

impl MealCategory {
    /// All categories in canonical order
    pub const ALL: [MealCategory; 5] = [
        MealCategory::Breakfast,
        MealCategory::Lunch,
        MealCategory::Dinner,
        MealCategory::Snack,
        MealCategory::Other,
    ];

    /// Parse a stored category label.
    ///
    /// Accepts the English names (any case) and the Japanese labels written
    /// by the meal logging bot. Returns `None` for anything else.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "breakfast" | "朝食" => Some(MealCategory::Breakfast),
            "lunch" | "昼食" => Some(MealCategory::Lunch),
            "dinner" | "夕食" => Some(MealCategory::Dinner),
            "snack" | "間食" => Some(MealCategory::Snack),
            "other" | "その他" => Some(MealCategory::Other),
            _ => None,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            MealCategory::Breakfast => "Breakfast",
            MealCategory::Lunch => "Lunch",
            MealCategory::Dinner => "Dinner",
            MealCategory::Snack => "Snack",
            MealCategory::Other => "Other",
        }
    }

    /// Breakfast, lunch and dinner count as main meals
    pub fn is_main_meal(&self) -> bool {
        matches!(
            self,
            MealCategory::Breakfast | MealCategory::Lunch | MealCategory::Dinner
        )
    }
}

/// Nutrient estimates for a single meal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
    /// Carbohydrates in grams
    #[serde(default, deserialize_with = "lenient_number")]
    pub carbohydrates: Option<f64>,
    /// Protein in grams
    #[serde(default, deserialize_with = "lenient_number")]
    pub protein: Option<f64>,
    /// Fat in grams
    #[serde(default, deserialize_with = "lenient_number")]
    pub fat: Option<f64>,
    /// Dietary fiber in grams
    #[serde(default, deserialize_with = "lenient_number")]
    pub fiber: Option<f64>,
    /// Sodium in milligrams
    #[serde(default, deserialize_with = "lenient_number")]
    pub sodium: Option<f64>,
}

/// A logged meal as read back from the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    pub timestamp: DateTime<FixedOffset>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub description: String,
    /// Raw category label; see [`MealCategory::parse`]
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub calories: Option<f64>,
    #[serde(default)]
    pub nutrients: Nutrients,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,
}

fn default_category() -> String {
    "other".to_string()
}

impl MealRecord {
    /// Create a record with no nutrition data
    pub fn new(timestamp: DateTime<FixedOffset>, category: impl Into<String>) -> Self {
        Self {
            timestamp,
            user_id: String::new(),
            description: String::new(),
            category: category.into(),
            calories: None,
            nutrients: Nutrients::default(),
            health_notes: None,
            image_reference: None,
        }
    }

    /// Set the calorie estimate
    pub fn with_calories(mut self, calories: f64) -> Self {
        self.calories = Some(calories);
        self
    }

    /// Set carbohydrates, protein and fat in grams
    pub fn with_macros(mut self, carbohydrates: f64, protein: f64, fat: f64) -> Self {
        self.nutrients.carbohydrates = Some(carbohydrates);
        self.nutrients.protein = Some(protein);
        self.nutrients.fat = Some(fat);
        self
    }

    /// Recognized category, or `None` for an unknown label
    pub fn meal_category(&self) -> Option<MealCategory> {
        MealCategory::parse(&self.category)
    }
}

/// Keep a value only if it counts as a real measurement.
///
/// Zero is ambiguous between "not measured" and "measured as zero" and is
/// treated as not measured, as are negative and non-finite values.
pub fn measured(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Parse a numeric cell from the record store.
///
/// Tolerates surrounding whitespace and thousands separators. Returns `None`
/// for empty, non-numeric, negative or non-finite input.
pub fn coerce_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Deserialize a number that may arrive as a JSON number, a numeric string,
/// or something unusable.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) if n.is_finite() && n >= 0.0 => Some(n),
        NumberOrText::Number(_) => None,
        NumberOrText::Text(text) => coerce_number(&text),
        NumberOrText::Other(_) => None,
    };
    Ok(value)
}
