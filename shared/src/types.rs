//! API request and response types

use crate::analysis::NutritionSummary;
use crate::models::MealRecord;
use crate::targets::NutritionTargets;
use crate::window::{ReportPeriod, ReportWindow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Output format for report endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Text,
}

/// Weekly report query.
///
/// The report covers the Monday-Sunday week before the one containing
/// `date` (today when omitted).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklyReportQuery {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub format: ReportFormat,
}

/// Monthly report query; omitted fields default to the current month
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlyReportQuery {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub format: ReportFormat,
}

/// Raw summary query over whole days
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Raw summary response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub window: ReportWindow,
    pub recorded_days: usize,
    pub summary: NutritionSummary,
}

/// Render a report from caller-supplied records, without a record store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub period: ReportPeriod,
    pub identity: String,
    pub window: ReportWindow,
    #[serde(default)]
    pub records: Vec<MealRecord>,
    /// Overrides the configured targets for this request only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<NutritionTargets>,
}
