//! Rule-based health advice
//!
//! Rules run in a fixed order (calories, protein, meal frequency, snacking)
//! and the result is never empty: when nothing fires, a single
//! balanced-diet affirmation is returned.

use crate::analysis::NutritionSummary;
use crate::targets::{NutritionTargets, TargetRange};
use crate::window::{ReportPeriod, DAYS_PER_MONTH};
use serde::{Deserialize, Serialize};

/// Below `min * SEVERE_LOW` counts as a severe shortfall
const SEVERE_LOW: f64 = 0.8;
/// Above `max * SEVERE_HIGH` counts as a severe excess
const SEVERE_HIGH: f64 = 1.2;
/// Fewer main meals than this in a week means meals are being skipped
const WEEKLY_MAIN_MEAL_FLOOR: usize = 15;
/// Share of snacks above which snacking is flagged
const SNACK_RATIO_CEILING: f64 = 0.3;

/// Where daily calorie intake sits relative to the target range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalorieTier {
    SevereDeficit,
    MildDeficit,
    SevereExcess,
    MildExcess,
    OnTarget,
}

/// Classify a daily calorie figure; the first matching band wins
pub fn classify_calories(daily: f64, range: &TargetRange) -> CalorieTier {
    if daily < range.min * SEVERE_LOW {
        CalorieTier::SevereDeficit
    } else if daily < range.min {
        CalorieTier::MildDeficit
    } else if daily > range.max * SEVERE_HIGH {
        CalorieTier::SevereExcess
    } else if daily > range.max {
        CalorieTier::MildExcess
    } else {
        CalorieTier::OnTarget
    }
}

/// One piece of advice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advice {
    Calories(CalorieTier),
    ProteinLow,
    ProteinHigh,
    SkippedMeals,
    FrequentSnacking,
    Balanced,
}

impl Advice {
    pub fn message(&self) -> &'static str {
        match self {
            Advice::Calories(CalorieTier::SevereDeficit) => {
                "⚠️ Calorie intake is well below target. Aim for regular, balanced meals."
            }
            Advice::Calories(CalorieTier::MildDeficit) => {
                "📊 Calorie intake is a little low. Slightly larger portions would be fine."
            }
            Advice::Calories(CalorieTier::SevereExcess) => {
                "⚠️ Calorie intake is well above target. Consider reviewing portion sizes."
            }
            Advice::Calories(CalorieTier::MildExcess) => {
                "📊 Calorie intake is a little high. Move a bit more or trim portions."
            }
            Advice::Calories(CalorieTier::OnTarget) => {
                "✅ Calorie intake is within the target range."
            }
            Advice::ProteinLow => {
                "🥩 Protein is running short. Add meat, fish, eggs or soy products."
            }
            Advice::ProteinHigh => "🥩 Protein intake is on the high side. Keep an eye on balance.",
            Advice::SkippedMeals => {
                "🍽️ Quite a few meals seem to be skipped. Try to eat on a regular schedule."
            }
            Advice::FrequentSnacking => {
                "🍪 Snacks make up a large share of meals. Make the main meals more filling."
            }
            Advice::Balanced => "✨ Overall a well-balanced diet. Keep it up!",
        }
    }
}

/// The daily calorie figure the calorie rules key off.
///
/// Weekly reports use the 7-day daily average. Monthly reports approximate
/// it as mean-per-meal times meal count over a fixed 30-day month.
pub fn reference_daily_calories(summary: &NutritionSummary, period: ReportPeriod) -> f64 {
    match period {
        ReportPeriod::Weekly => summary.daily_avg_calories as f64,
        ReportPeriod::Monthly => {
            summary.avg_calories as f64 * summary.total_meals as f64 / DAYS_PER_MONTH
        }
    }
}

/// Evaluate all advice rules in order
pub fn evaluate(
    summary: &NutritionSummary,
    period: ReportPeriod,
    targets: &NutritionTargets,
) -> Vec<Advice> {
    let mut advice = Vec::new();

    let daily = reference_daily_calories(summary, period);
    if daily > 0.0 {
        advice.push(Advice::Calories(classify_calories(daily, &targets.calories)));
    }

    let protein = summary.avg_nutrients.protein;
    if protein > 0.0 {
        if protein < targets.protein.min * SEVERE_LOW {
            advice.push(Advice::ProteinLow);
        } else if protein > targets.protein.max * SEVERE_HIGH {
            advice.push(Advice::ProteinHigh);
        }
    }

    let distribution = &summary.meal_distribution;
    if period == ReportPeriod::Weekly && distribution.main_meals() < WEEKLY_MAIN_MEAL_FLOOR {
        advice.push(Advice::SkippedMeals);
    }

    let snack_ratio = distribution.snack as f64 / summary.total_meals.max(1) as f64;
    if snack_ratio > SNACK_RATIO_CEILING {
        advice.push(Advice::FrequentSnacking);
    }

    if advice.is_empty() {
        advice.push(Advice::Balanced);
    }
    advice
}

/// Advice messages for a summary, in rule order. Never empty.
pub fn advise(
    summary: &NutritionSummary,
    period: ReportPeriod,
    targets: &NutritionTargets,
) -> Vec<String> {
    evaluate(summary, period, targets)
        .iter()
        .map(|a| a.message().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{MacroNutrients, MealDistribution};
    use rstest::rstest;

    fn summary_with(daily: u64, protein: f64, distribution: MealDistribution) -> NutritionSummary {
        NutritionSummary {
            total_meals: distribution.total(),
            avg_calories: 0,
            avg_nutrients: MacroNutrients {
                carbohydrates: 0.0,
                protein,
                fat: 0.0,
            },
            total_nutrients: MacroNutrients::default(),
            meal_distribution: distribution,
            daily_avg_calories: daily,
        }
    }

    fn full_week() -> MealDistribution {
        MealDistribution {
            breakfast: 7,
            lunch: 7,
            dinner: 7,
            snack: 0,
            other: 0,
        }
    }

    #[rstest]
    #[case(1000.0, CalorieTier::SevereDeficit)]
    #[case(1759.0, CalorieTier::SevereDeficit)]
    #[case(1760.0, CalorieTier::MildDeficit)]
    #[case(2199.0, CalorieTier::MildDeficit)]
    #[case(2200.0, CalorieTier::OnTarget)]
    #[case(2400.0, CalorieTier::OnTarget)]
    #[case(2401.0, CalorieTier::MildExcess)]
    #[case(2880.0, CalorieTier::MildExcess)]
    #[case(2881.0, CalorieTier::SevereExcess)]
    fn test_calorie_tiers(#[case] daily: f64, #[case] expected: CalorieTier) {
        let targets = NutritionTargets::default();
        assert_eq!(classify_calories(daily, &targets.calories), expected);
    }

    #[test]
    fn test_empty_summary_gets_fallback_advice() {
        let summary = NutritionSummary::default();
        let advice = evaluate(&summary, ReportPeriod::Monthly, &NutritionTargets::default());
        assert_eq!(advice, vec![Advice::Balanced]);

        let weekly = advise(&summary, ReportPeriod::Weekly, &NutritionTargets::default());
        assert_eq!(weekly, vec![Advice::SkippedMeals.message().to_string()]);
    }

    #[test]
    fn test_on_target_week() {
        let summary = summary_with(2300, 70.0, full_week());
        let advice = evaluate(&summary, ReportPeriod::Weekly, &NutritionTargets::default());
        assert_eq!(advice, vec![Advice::Calories(CalorieTier::OnTarget)]);
    }

    #[test]
    fn test_zero_protein_gives_no_protein_advice() {
        let summary = summary_with(2300, 0.0, full_week());
        let advice = evaluate(&summary, ReportPeriod::Weekly, &NutritionTargets::default());
        assert!(!advice.contains(&Advice::ProteinLow));
        assert!(!advice.contains(&Advice::ProteinHigh));
    }

    #[rstest]
    #[case(40.0, Some(Advice::ProteinLow))]
    #[case(51.9, Some(Advice::ProteinLow))]
    #[case(52.0, None)]
    #[case(55.0, None)]
    #[case(90.0, None)]
    #[case(96.0, None)]
    #[case(96.1, Some(Advice::ProteinHigh))]
    #[case(97.0, Some(Advice::ProteinHigh))]
    fn test_protein_bands(#[case] protein: f64, #[case] expected: Option<Advice>) {
        let summary = summary_with(2300, protein, full_week());
        let advice = evaluate(&summary, ReportPeriod::Weekly, &NutritionTargets::default());
        let protein_advice: Vec<_> = advice
            .into_iter()
            .filter(|a| matches!(a, Advice::ProteinLow | Advice::ProteinHigh))
            .collect();
        assert_eq!(protein_advice, expected.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_all_snacks_week() {
        let distribution = MealDistribution {
            snack: 10,
            ..MealDistribution::default()
        };
        let summary = summary_with(0, 0.0, distribution);
        let advice = evaluate(&summary, ReportPeriod::Weekly, &NutritionTargets::default());
        assert_eq!(advice, vec![Advice::SkippedMeals, Advice::FrequentSnacking]);

        let monthly = evaluate(&summary, ReportPeriod::Monthly, &NutritionTargets::default());
        assert_eq!(monthly, vec![Advice::FrequentSnacking]);
    }

    #[test]
    fn test_advice_order_is_fixed() {
        let distribution = MealDistribution {
            breakfast: 2,
            lunch: 2,
            dinner: 2,
            snack: 6,
            other: 0,
        };
        let summary = summary_with(1000, 30.0, distribution);
        let advice = evaluate(&summary, ReportPeriod::Weekly, &NutritionTargets::default());
        assert_eq!(
            advice,
            vec![
                Advice::Calories(CalorieTier::SevereDeficit),
                Advice::ProteinLow,
                Advice::SkippedMeals,
                Advice::FrequentSnacking,
            ]
        );
    }

    #[test]
    fn test_monthly_reference_uses_thirty_days() {
        let summary = NutritionSummary {
            total_meals: 90,
            avg_calories: 750,
            ..NutritionSummary::default()
        };
        assert_eq!(reference_daily_calories(&summary, ReportPeriod::Monthly), 2250.0);
        let advice = evaluate(&summary, ReportPeriod::Monthly, &NutritionTargets::default());
        assert_eq!(advice[0], Advice::Calories(CalorieTier::OnTarget));
    }

    #[test]
    fn test_snack_ratio_boundary() {
        // 3 of 10 is exactly 0.3 and does not fire
        let distribution = MealDistribution {
            breakfast: 7,
            snack: 3,
            ..MealDistribution::default()
        };
        let summary = summary_with(2300, 70.0, distribution);
        let advice = evaluate(&summary, ReportPeriod::Monthly, &NutritionTargets::default());
        assert!(!advice.contains(&Advice::FrequentSnacking));
    }

    #[rstest]
    #[case(5, 5, 5, false)]
    #[case(5, 5, 4, true)]
    fn test_weekly_main_meal_floor(
        #[case] breakfast: usize,
        #[case] lunch: usize,
        #[case] dinner: usize,
        #[case] skipped: bool,
    ) {
        let distribution = MealDistribution {
            breakfast,
            lunch,
            dinner,
            ..MealDistribution::default()
        };
        let summary = summary_with(2300, 70.0, distribution);
        let advice = evaluate(&summary, ReportPeriod::Weekly, &NutritionTargets::default());
        assert_eq!(advice.contains(&Advice::SkippedMeals), skipped);
    }
}
