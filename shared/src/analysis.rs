//! Nutrition analysis over a snapshot of meal records
//!
//! Pure aggregation: no I/O, no clock, no failure modes. Values that are not
//! real measurements (see [`measured`]) are left out of both sums and means,
//! while the record itself still counts as a meal.

use crate::models::{measured, MealCategory, MealRecord};
use crate::window::DAYS_PER_WEEK;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Carbohydrate, protein and fat figures in grams
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroNutrients {
    pub carbohydrates: f64,
    pub protein: f64,
    pub fat: f64,
}

/// Meal counts per category; every category is always present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealDistribution {
    pub breakfast: usize,
    pub lunch: usize,
    pub dinner: usize,
    pub snack: usize,
    pub other: usize,
}

impl MealDistribution {
    pub fn count(&self, category: MealCategory) -> usize {
        match category {
            MealCategory::Breakfast => self.breakfast,
            MealCategory::Lunch => self.lunch,
            MealCategory::Dinner => self.dinner,
            MealCategory::Snack => self.snack,
            MealCategory::Other => self.other,
        }
    }

    fn increment(&mut self, category: MealCategory) {
        let slot = match category {
            MealCategory::Breakfast => &mut self.breakfast,
            MealCategory::Lunch => &mut self.lunch,
            MealCategory::Dinner => &mut self.dinner,
            MealCategory::Snack => &mut self.snack,
            MealCategory::Other => &mut self.other,
        };
        *slot += 1;
    }

    /// Counts in canonical category order
    pub fn iter(&self) -> impl Iterator<Item = (MealCategory, usize)> + '_ {
        MealCategory::ALL.into_iter().map(|c| (c, self.count(c)))
    }

    /// Number of meals with a recognized category
    pub fn total(&self) -> usize {
        self.iter().map(|(_, n)| n).sum()
    }

    /// Breakfasts, lunches and dinners
    pub fn main_meals(&self) -> usize {
        self.iter()
            .filter(|(c, _)| c.is_main_meal())
            .map(|(_, n)| n)
            .sum()
    }
}

/// Aggregate statistics for one reporting period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    /// Number of records, including those without usable numbers
    pub total_meals: usize,
    /// Mean calories per meal that had a calorie estimate
    pub avg_calories: u64,
    /// Per-meal means, one decimal place
    pub avg_nutrients: MacroNutrients,
    /// Period totals, one decimal place
    pub total_nutrients: MacroNutrients,
    pub meal_distribution: MealDistribution,
    /// Calorie total spread over a 7-day week
    pub daily_avg_calories: u64,
}

#[derive(Debug, Default)]
struct Tally {
    sum: f64,
    count: usize,
}

impl Tally {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = measured(value) {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round_whole(value: f64) -> u64 {
    value.round() as u64
}

/// Summarize a sequence of meal records.
///
/// Never fails: empty input yields an all-zero summary. Unrecognized
/// categories are left out of the distribution. Rounding is applied only to
/// the final figures.
pub fn summarize(records: &[MealRecord]) -> NutritionSummary {
    let mut calories = Tally::default();
    let mut carbohydrates = Tally::default();
    let mut protein = Tally::default();
    let mut fat = Tally::default();
    let mut distribution = MealDistribution::default();

    for record in records {
        calories.add(record.calories);
        carbohydrates.add(record.nutrients.carbohydrates);
        protein.add(record.nutrients.protein);
        fat.add(record.nutrients.fat);

        if let Some(category) = record.meal_category() {
            distribution.increment(category);
        }
    }

    NutritionSummary {
        total_meals: records.len(),
        avg_calories: round_whole(calories.mean()),
        avg_nutrients: MacroNutrients {
            carbohydrates: round1(carbohydrates.mean()),
            protein: round1(protein.mean()),
            fat: round1(fat.mean()),
        },
        total_nutrients: MacroNutrients {
            carbohydrates: round1(carbohydrates.sum),
            protein: round1(protein.sum),
            fat: round1(fat.sum),
        },
        meal_distribution: distribution,
        daily_avg_calories: if calories.count == 0 {
            0
        } else {
            round_whole(calories.sum / DAYS_PER_WEEK)
        },
    }
}

/// Number of distinct calendar days, in each record's own offset
pub fn recorded_days(records: &[MealRecord]) -> usize {
    records
        .iter()
        .map(|r| r.timestamp.date_naive())
        .collect::<BTreeSet<_>>()
        .len()
}
