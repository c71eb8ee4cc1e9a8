//! Nutrition targets and the reference profile they were derived for
//!
//! Targets are static configuration: the report engine reads them and never
//! changes them. The defaults are the daily recommendations for a
//! 34-year-old, 65 kg male.

use crate::errors::ReportError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Inclusive bounds for one nutrient, in the record's units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_bounds_order"))]
pub struct TargetRange {
    #[validate(range(min = 0.0))]
    pub min: f64,
    #[validate(range(min = 0.0))]
    pub max: f64,
}

impl TargetRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

fn validate_bounds_order(range: &TargetRange) -> Result<(), ValidationError> {
    if range.min > range.max {
        return Err(ValidationError::new("min_exceeds_max"));
    }
    Ok(())
}

/// Per-nutrient target ranges (calories in kcal, macros in grams)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_calorie_floor"))]
pub struct NutritionTargets {
    #[validate(nested)]
    pub calories: TargetRange,
    #[validate(nested)]
    pub carbohydrates: TargetRange,
    #[validate(nested)]
    pub protein: TargetRange,
    #[validate(nested)]
    pub fat: TargetRange,
}

// Achievement is measured against the calorie floor, so it must be positive.
fn validate_calorie_floor(targets: &NutritionTargets) -> Result<(), ValidationError> {
    if targets.calories.min <= 0.0 {
        return Err(ValidationError::new("calorie_floor_not_positive"));
    }
    Ok(())
}

impl Default for NutritionTargets {
    fn default() -> Self {
        Self {
            calories: TargetRange::new(2200.0, 2400.0),
            carbohydrates: TargetRange::new(280.0, 364.0),
            protein: TargetRange::new(65.0, 80.0),
            fat: TargetRange::new(49.0, 73.0),
        }
    }
}

impl NutritionTargets {
    /// Validate and return the targets
    pub fn validated(self) -> Result<Self, ReportError> {
        self.validate()?;
        Ok(self)
    }
}

/// Biological sex of the reference profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    Male,
    Female,
}

/// The person the targets were chosen for.
///
/// Informational only; no report figure is computed from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceProfile {
    pub birth_date: NaiveDate,
    pub sex: BiologicalSex,
    pub weight_kg: f64,
    pub age_years: u32,
}

impl Default for ReferenceProfile {
    fn default() -> Self {
        Self {
            birth_date: NaiveDate::from_ymd_opt(1989, 12, 28).unwrap_or(NaiveDate::MIN),
            sex: BiologicalSex::Male,
            weight_kg: 65.0,
            age_years: 34,
        }
    }
}
