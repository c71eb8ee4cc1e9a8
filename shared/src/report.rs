//! Report rendering
//!
//! Turns a period's records into a presentation-agnostic [`Report`]: a title,
//! a description and an ordered list of labeled text sections. Chat embeds,
//! plain text and JSON are all produced from this one structure.

use crate::advice::advise;
use crate::analysis::{recorded_days, summarize, NutritionSummary};
use crate::models::MealRecord;
use crate::targets::NutritionTargets;
use crate::window::{ReportPeriod, ReportWindow};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Section names, in the order they appear
pub mod sections {
    pub const BASIC_STATISTICS: &str = "📈 Basic Statistics";
    pub const AVERAGE_NUTRIENTS: &str = "🥗 Average Nutrients (per meal)";
    pub const MEAL_TIMING: &str = "⏰ Meal Timing";
    pub const WEEKLY_ADVICE: &str = "💡 This Week's Advice";
    pub const CALORIE_ACHIEVEMENT: &str = "🎯 Calorie Goal Achievement";

    pub const MONTHLY_STATISTICS: &str = "📈 Monthly Statistics";
    pub const MONTHLY_NUTRIENTS: &str = "🥗 Monthly Nutrient Intake";
    pub const MEAL_PATTERN: &str = "⏰ Meal Pattern";
    pub const RECORDING_STATUS: &str = "📅 Recording Status";
    pub const MONTHLY_ADVICE: &str = "💡 Monthly Review & Advice";
    pub const NEXT_MONTH_GOALS: &str = "🎯 Goals for Next Month";
}

const WEEKLY_TITLE: &str = "📊 Weekly Meal Report";
const MONTHLY_TITLE: &str = "📊 Monthly Meal Report";

/// Weekly reports show at most this many advice entries
const WEEKLY_ADVICE_LIMIT: usize = 3;
/// Cells in the calorie achievement bar
const BAR_CELLS: usize = 20;
/// Below this share of breakfasts, a breakfast habit is suggested
const BREAKFAST_SHARE_FLOOR: f64 = 0.2;

/// A labeled block of report text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub name: String,
    pub value: String,
    /// Layout hint: may be placed side by side with neighbouring sections
    pub inline: bool,
}

impl ReportSection {
    fn block(name: &str, value: String) -> Self {
        Self {
            name: name.to_string(),
            value,
            inline: false,
        }
    }

    fn inline(name: &str, value: String) -> Self {
        Self {
            name: name.to_string(),
            value,
            inline: true,
        }
    }
}

/// A rendered nutrition report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub period: ReportPeriod,
    pub title: String,
    pub description: String,
    pub generated_at: DateTime<FixedOffset>,
    pub sections: Vec<ReportSection>,
}

impl Report {
    /// Find a section by name
    pub fn section(&self, name: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// True for the short "nothing recorded" report
    pub fn is_empty_period(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render as plain text for targets without rich formatting
    pub fn to_plain_text(&self) -> String {
        let mut out = format!("{}\n{}\n", self.title, self.description);
        for section in &self.sections {
            out.push('\n');
            out.push_str(&section.name);
            out.push('\n');
            for line in section.value.lines() {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

/// Percentage of the calorie floor reached, capped at 100
pub fn achievement_percent(daily_avg_calories: u64, calorie_floor: f64) -> u32 {
    let ratio = if calorie_floor > 0.0 {
        daily_avg_calories as f64 / calorie_floor * 100.0
    } else {
        100.0
    };
    ratio.round().clamp(0.0, 100.0) as u32
}

/// A fixed-width bar with one filled cell per 5%
pub fn achievement_bar(achievement: u32) -> String {
    let filled = ((BAR_CELLS as f64 * f64::from(achievement) / 100.0).round() as usize)
        .min(BAR_CELLS);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_CELLS - filled))
}

/// Goals for the next period.
///
/// At most one suggestion per rule (calories, protein, breakfast). When none
/// apply, two general maintenance suggestions are returned instead.
pub fn suggest_next_period_goals(
    summary: &NutritionSummary,
    targets: &NutritionTargets,
) -> Vec<String> {
    let mut goals = Vec::new();

    let daily = summary.daily_avg_calories as f64;
    if daily < targets.calories.min {
        goals.push(format!(
            "Raise calorie intake to at least {} kcal a day",
            targets.calories.min
        ));
    } else if daily > targets.calories.max {
        goals.push(format!(
            "Keep calorie intake to at most {} kcal a day",
            targets.calories.max
        ));
    }

    if summary.avg_nutrients.protein < targets.protein.min {
        goals.push(format!(
            "Raise protein intake to at least {}g a day",
            targets.protein.min
        ));
    }

    let breakfasts = summary.meal_distribution.breakfast as f64;
    if breakfasts < summary.total_meals as f64 * BREAKFAST_SHARE_FLOOR {
        goals.push("Make a habit of eating breakfast every day".to_string());
    }

    if goals.is_empty() {
        goals.push("Keep up your current healthy eating habits".to_string());
        goals.push("Bring more seasonal ingredients into your meals".to_string());
    }
    goals
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn grouped_one_decimal(value: f64) -> String {
    let tenths = (value.max(0.0) * 10.0).round() as u64;
    format!("{}.{}", group_thousands(tenths / 10), tenths % 10)
}

/// Builds weekly and monthly reports against a fixed set of targets
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    targets: NutritionTargets,
}

impl ReportRenderer {
    pub fn new(targets: NutritionTargets) -> Self {
        Self { targets }
    }

    pub fn targets(&self) -> &NutritionTargets {
        &self.targets
    }

    /// Render a report stamped with the current time
    pub fn render(
        &self,
        period: ReportPeriod,
        identity: &str,
        records: &[MealRecord],
        window: &ReportWindow,
    ) -> Report {
        let generated_at = Utc::now().with_timezone(&window.offset());
        self.render_at(period, identity, records, window, generated_at)
    }

    /// Render a report with an explicit generation timestamp
    pub fn render_at(
        &self,
        period: ReportPeriod,
        identity: &str,
        records: &[MealRecord],
        window: &ReportWindow,
        generated_at: DateTime<FixedOffset>,
    ) -> Report {
        if records.is_empty() {
            return Self::no_data(period, window, generated_at);
        }

        let summary = summarize(records);
        let advice = advise(&summary, period, &self.targets);
        let (title, description, sections) = match period {
            ReportPeriod::Weekly => (
                WEEKLY_TITLE,
                format!(
                    "Weekly report for {identity}\nPeriod: {}",
                    window.date_range_label()
                ),
                self.weekly_sections(&summary, &advice),
            ),
            ReportPeriod::Monthly => (
                MONTHLY_TITLE,
                format!(
                    "Monthly report for {identity}\nPeriod: {}",
                    window.month_label()
                ),
                self.monthly_sections(&summary, &advice, recorded_days(records)),
            ),
        };

        Report {
            period,
            title: title.to_string(),
            description,
            generated_at,
            sections,
        }
    }

    fn no_data(
        period: ReportPeriod,
        window: &ReportWindow,
        generated_at: DateTime<FixedOffset>,
    ) -> Report {
        let (title, description) = match period {
            ReportPeriod::Weekly => (
                WEEKLY_TITLE,
                format!(
                    "Period: {}\nNo meals were recorded this week. Let's keep logging next week!",
                    window.date_range_label()
                ),
            ),
            ReportPeriod::Monthly => (
                MONTHLY_TITLE,
                format!(
                    "Period: {} ({})\nNo meals were recorded this month. Let's keep logging next month!",
                    window.month_label(),
                    window.date_range_label()
                ),
            ),
        };

        Report {
            period,
            title: title.to_string(),
            description,
            generated_at,
            sections: Vec::new(),
        }
    }

    fn weekly_sections(&self, summary: &NutritionSummary, advice: &[String]) -> Vec<ReportSection> {
        let calories = &self.targets.calories;
        let mut out = vec![
            ReportSection::block(
                sections::BASIC_STATISTICS,
                format!(
                    "Total meals: {}\nDaily average calories: {} kcal\nTarget range: {}-{} kcal",
                    summary.total_meals, summary.daily_avg_calories, calories.min, calories.max
                ),
            ),
            ReportSection::inline(
                sections::AVERAGE_NUTRIENTS,
                format!(
                    "Carbohydrates: {:.1}g\nProtein: {:.1}g\nFat: {:.1}g",
                    summary.avg_nutrients.carbohydrates,
                    summary.avg_nutrients.protein,
                    summary.avg_nutrients.fat
                ),
            ),
        ];

        let timing: Vec<String> = summary
            .meal_distribution
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(category, n)| format!("{}: {n} meals", category.label()))
            .collect();
        let timing = if timing.is_empty() {
            "No data".to_string()
        } else {
            timing.join("\n")
        };
        out.push(ReportSection::inline(sections::MEAL_TIMING, timing));

        let shown = advice.len().min(WEEKLY_ADVICE_LIMIT);
        out.push(ReportSection::block(
            sections::WEEKLY_ADVICE,
            advice[..shown].join("\n"),
        ));

        if summary.daily_avg_calories > 0 {
            let achievement = achievement_percent(summary.daily_avg_calories, calories.min);
            out.push(ReportSection::block(
                sections::CALORIE_ACHIEVEMENT,
                format!("{} {achievement}%", achievement_bar(achievement)),
            ));
        }

        out
    }

    fn monthly_sections(
        &self,
        summary: &NutritionSummary,
        advice: &[String],
        days_recorded: usize,
    ) -> Vec<ReportSection> {
        let estimated_total = summary.avg_calories * summary.total_meals as u64;
        let totals = &summary.total_nutrients;
        let mut out = vec![
            ReportSection::block(
                sections::MONTHLY_STATISTICS,
                format!(
                    "Total meals: {}\nAverage calories per meal: {} kcal\nEstimated monthly calories: {} kcal",
                    summary.total_meals,
                    summary.avg_calories,
                    group_thousands(estimated_total)
                ),
            ),
            ReportSection::inline(
                sections::MONTHLY_NUTRIENTS,
                format!(
                    "Carbohydrates: {}g\nProtein: {}g\nFat: {}g",
                    grouped_one_decimal(totals.carbohydrates),
                    grouped_one_decimal(totals.protein),
                    grouped_one_decimal(totals.fat)
                ),
            ),
        ];

        let categorized = summary.meal_distribution.total();
        if categorized > 0 {
            let pattern = summary
                .meal_distribution
                .iter()
                .filter(|(_, n)| *n > 0)
                .map(|(category, n)| {
                    format!(
                        "{}: {n} meals ({:.1}%)",
                        category.label(),
                        n as f64 / categorized as f64 * 100.0
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            out.push(ReportSection::inline(sections::MEAL_PATTERN, pattern));
        }

        out.push(ReportSection::block(
            sections::RECORDING_STATUS,
            format!(
                "Days recorded: {days_recorded}\nAverage meals per day: {:.1}",
                summary.total_meals as f64 / days_recorded.max(1) as f64
            ),
        ));

        out.push(ReportSection::block(
            sections::MONTHLY_ADVICE,
            advice.join("\n"),
        ));

        let goals = suggest_next_period_goals(summary, &self.targets)
            .iter()
            .map(|g| format!("• {g}"))
            .collect::<Vec<_>>()
            .join("\n");
        out.push(ReportSection::block(sections::NEXT_MONTH_GOALS, goals));

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::Advice;
    use crate::models::MealCategory;
    use chrono::{Duration, NaiveDate};

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn week() -> ReportWindow {
        ReportWindow::previous_week_of(NaiveDate::from_ymd_opt(2024, 7, 8).unwrap(), jst()).unwrap()
    }

    fn july() -> ReportWindow {
        ReportWindow::month(2024, 7, jst()).unwrap()
    }

    fn stamp() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-07-08T23:00:00+09:00").unwrap()
    }

    fn meal(day_offset: i64, hour: i64, category: &str, calories: f64) -> MealRecord {
        let ts = week().start + Duration::days(day_offset) + Duration::hours(hour);
        MealRecord::new(ts, category)
            .with_calories(calories)
            .with_macros(90.0, 70.0, 20.0)
    }

    fn renderer() -> ReportRenderer {
        ReportRenderer::new(NutritionTargets::default())
    }

    #[test]
    fn test_weekly_no_data() {
        let report = renderer().render_at(ReportPeriod::Weekly, "Taro", &[], &week(), stamp());
        assert!(report.is_empty_period());
        assert_eq!(report.title, WEEKLY_TITLE);
        assert!(report.description.contains("2024/07/01 - 2024/07/07"));
        assert!(!report.description.contains("Taro"));
    }

    #[test]
    fn test_monthly_no_data() {
        let report = renderer().render_at(ReportPeriod::Monthly, "Taro", &[], &july(), stamp());
        assert!(report.sections.is_empty());
        assert!(report.description.contains("2024/07"));
        assert!(report.description.contains("2024/07/01 - 2024/07/31"));
    }

    #[test]
    fn test_weekly_sections_in_order() {
        let records: Vec<_> = (0..7)
            .flat_map(|d| {
                vec![
                    meal(d, 8, "breakfast", 600.0),
                    meal(d, 12, "lunch", 800.0),
                    meal(d, 19, "dinner", 900.0),
                ]
            })
            .collect();
        let report = renderer().render_at(ReportPeriod::Weekly, "Taro", &records, &week(), stamp());

        let names: Vec<_> = report.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                sections::BASIC_STATISTICS,
                sections::AVERAGE_NUTRIENTS,
                sections::MEAL_TIMING,
                sections::WEEKLY_ADVICE,
                sections::CALORIE_ACHIEVEMENT,
            ]
        );
        assert!(report.description.contains("Taro"));
        assert!(report.description.contains("2024/07/01 - 2024/07/07"));

        let stats = report.section(sections::BASIC_STATISTICS).unwrap();
        assert!(stats.value.contains("Total meals: 21"));
        assert!(stats.value.contains("Daily average calories: 2300 kcal"));
        assert!(stats.value.contains("Target range: 2200-2400 kcal"));

        let advice = report.section(sections::WEEKLY_ADVICE).unwrap();
        assert_eq!(advice.value, Advice::Calories(crate::advice::CalorieTier::OnTarget).message());

        let bar = report.section(sections::CALORIE_ACHIEVEMENT).unwrap();
        assert_eq!(bar.value, format!("{} 100%", "█".repeat(20)));
    }

    #[test]
    fn test_weekly_timing_lists_only_present_categories() {
        let records = vec![meal(0, 8, "breakfast", 500.0), meal(0, 15, "snack", 200.0)];
        let report = renderer().render_at(ReportPeriod::Weekly, "Taro", &records, &week(), stamp());
        let timing = report.section(sections::MEAL_TIMING).unwrap();
        assert_eq!(timing.value, "Breakfast: 1 meals\nSnack: 1 meals");
        assert!(!timing.value.contains(MealCategory::Lunch.label()));
    }

    #[test]
    fn test_weekly_timing_without_recognized_categories() {
        let records = vec![meal(0, 8, "brunch", 500.0)];
        let report = renderer().render_at(ReportPeriod::Weekly, "Taro", &records, &week(), stamp());
        assert_eq!(report.section(sections::MEAL_TIMING).unwrap().value, "No data");
    }

    #[test]
    fn test_weekly_advice_truncated_to_three() {
        // severe deficit, protein low, skipped meals, snacking: four rules fire
        let records: Vec<_> = (0..4)
            .map(|d| {
                MealRecord::new(week().start + Duration::days(d), "snack")
                    .with_calories(300.0)
                    .with_macros(30.0, 5.0, 10.0)
            })
            .collect();
        let report = renderer().render_at(ReportPeriod::Weekly, "Taro", &records, &week(), stamp());
        let advice = report.section(sections::WEEKLY_ADVICE).unwrap();
        assert_eq!(advice.value.lines().count(), 3);
        assert!(!advice.value.contains(Advice::FrequentSnacking.message()));
    }

    #[test]
    fn test_achievement_bar_hidden_without_calories() {
        let records = vec![MealRecord::new(week().start, "lunch")];
        let report = renderer().render_at(ReportPeriod::Weekly, "Taro", &records, &week(), stamp());
        assert!(report.section(sections::CALORIE_ACHIEVEMENT).is_none());
    }

    #[test]
    fn test_achievement_is_capped() {
        assert_eq!(achievement_percent(10_000, 2200.0), 100);
        assert_eq!(achievement_percent(2200, 2200.0), 100);
        assert_eq!(achievement_percent(1100, 2200.0), 50);
        assert_eq!(achievement_percent(1, 0.0), 100);
        assert_eq!(achievement_bar(50), format!("{}{}", "█".repeat(10), "░".repeat(10)));
        assert_eq!(achievement_bar(0), "░".repeat(20));
        assert_eq!(achievement_bar(97), "█".repeat(19) + "░");
    }

    #[test]
    fn test_monthly_sections() {
        let records: Vec<_> = (0..3)
            .flat_map(|d| {
                vec![
                    meal(d, 8, "breakfast", 500.0),
                    meal(d, 12, "lunch", 700.0),
                    meal(d, 19, "dinner", 900.0),
                ]
            })
            .collect();
        let report =
            renderer().render_at(ReportPeriod::Monthly, "Taro", &records, &july(), stamp());

        let names: Vec<_> = report.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                sections::MONTHLY_STATISTICS,
                sections::MONTHLY_NUTRIENTS,
                sections::MEAL_PATTERN,
                sections::RECORDING_STATUS,
                sections::MONTHLY_ADVICE,
                sections::NEXT_MONTH_GOALS,
            ]
        );
        assert!(report.description.contains("Period: 2024/07"));

        let stats = report.section(sections::MONTHLY_STATISTICS).unwrap();
        assert!(stats.value.contains("Average calories per meal: 700 kcal"));
        assert!(stats.value.contains("Estimated monthly calories: 6,300 kcal"));

        let status = report.section(sections::RECORDING_STATUS).unwrap();
        assert_eq!(status.value, "Days recorded: 3\nAverage meals per day: 3.0");

        let pattern = report.section(sections::MEAL_PATTERN).unwrap();
        assert!(pattern.value.contains("Breakfast: 3 meals (33.3%)"));

        let nutrients = report.section(sections::MONTHLY_NUTRIENTS).unwrap();
        assert_eq!(nutrients.value, "Carbohydrates: 810.0g\nProtein: 630.0g\nFat: 180.0g");
    }

    #[test]
    fn test_monthly_pattern_omitted_without_categories() {
        let records = vec![meal(0, 12, "brunch", 500.0)];
        let report =
            renderer().render_at(ReportPeriod::Monthly, "Taro", &records, &july(), stamp());
        assert!(report.section(sections::MEAL_PATTERN).is_none());
        assert!(report.section(sections::RECORDING_STATUS).is_some());
    }

    #[test]
    fn test_goals_fallback_when_on_track() {
        let summary = NutritionSummary {
            total_meals: 21,
            daily_avg_calories: 2300,
            avg_nutrients: crate::analysis::MacroNutrients {
                carbohydrates: 90.0,
                protein: 70.0,
                fat: 20.0,
            },
            meal_distribution: crate::analysis::MealDistribution {
                breakfast: 7,
                lunch: 7,
                dinner: 7,
                snack: 0,
                other: 0,
            },
            ..NutritionSummary::default()
        };
        let goals = suggest_next_period_goals(&summary, &NutritionTargets::default());
        assert_eq!(goals.len(), 2);
        assert!(goals[0].contains("Keep up"));
    }

    #[test]
    fn test_goals_each_rule_fires_once() {
        let summary = NutritionSummary {
            total_meals: 10,
            daily_avg_calories: 3000,
            ..NutritionSummary::default()
        };
        let goals = suggest_next_period_goals(&summary, &NutritionTargets::default());
        assert_eq!(
            goals,
            vec![
                "Keep calorie intake to at most 2400 kcal a day".to_string(),
                "Raise protein intake to at least 65g a day".to_string(),
                "Make a habit of eating breakfast every day".to_string(),
            ]
        );
    }

    #[test]
    fn test_breakfast_goal_at_share_boundary() {
        let with_breakfasts = |breakfast| NutritionSummary {
            total_meals: 10,
            daily_avg_calories: 2300,
            avg_nutrients: crate::analysis::MacroNutrients {
                protein: 70.0,
                ..Default::default()
            },
            meal_distribution: crate::analysis::MealDistribution {
                breakfast,
                lunch: 4,
                dinner: 4,
                ..Default::default()
            },
            ..NutritionSummary::default()
        };
        let breakfast_goal = "Make a habit of eating breakfast every day".to_string();

        // 2 of 10 is exactly the 20% share
        let goals = suggest_next_period_goals(&with_breakfasts(2), &NutritionTargets::default());
        assert!(!goals.contains(&breakfast_goal));

        let goals = suggest_next_period_goals(&with_breakfasts(1), &NutritionTargets::default());
        assert!(goals.contains(&breakfast_goal));
    }

    #[test]
    fn test_goals_for_empty_summary_suggest_raising_calories() {
        let goals = suggest_next_period_goals(&NutritionSummary::default(), &NutritionTargets::default());
        assert_eq!(goals[0], "Raise calorie intake to at least 2200 kcal a day");
        assert_eq!(goals.len(), 2);
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(grouped_one_decimal(2345.66), "2,345.7");
        assert_eq!(grouped_one_decimal(0.0), "0.0");
    }

    #[test]
    fn test_plain_text_rendering() {
        let records = vec![meal(0, 8, "breakfast", 500.0)];
        let report = renderer().render_at(ReportPeriod::Weekly, "Taro", &records, &week(), stamp());
        let text = report.to_plain_text();
        assert!(text.starts_with(WEEKLY_TITLE));
        assert!(text.contains("\n📈 Basic Statistics\n  Total meals: 1\n"));
    }

    #[test]
    fn test_render_stamps_window_offset() {
        let report = renderer().render(ReportPeriod::Weekly, "Taro", &[], &week());
        assert_eq!(*report.generated_at.offset(), jst());
    }
}
