//! Report service - builds reports from the record store

use crate::error::ApiError;
use crate::state::AppState;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use meal_report_shared::types::{PreviewRequest, SummaryResponse};
use meal_report_shared::{
    recorded_days, summarize, MealRecord, Report, ReportPeriod, ReportRenderer, ReportWindow,
};
use tracing::info;

/// Report service
pub struct ReportService;

impl ReportService {
    /// Current time in the configured offset
    pub fn now(state: &AppState) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&state.offset)
    }

    /// Weekly report for the Monday-Sunday week before the one containing `date`
    pub async fn weekly_report(
        state: &AppState,
        date: Option<NaiveDate>,
    ) -> Result<Report, ApiError> {
        let window = match date {
            Some(date) => ReportWindow::previous_week_of(date, state.offset)?,
            None => ReportWindow::previous_week(Self::now(state))?,
        };
        Self::build(state, ReportPeriod::Weekly, &window).await
    }

    /// Monthly report; missing fields default to the current month
    pub async fn monthly_report(
        state: &AppState,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<Report, ApiError> {
        let now = Self::now(state);
        let window = ReportWindow::month(
            year.unwrap_or_else(|| now.year()),
            month.unwrap_or_else(|| now.month()),
            state.offset,
        )?;
        Self::build(state, ReportPeriod::Monthly, &window).await
    }

    /// Raw nutrition summary over whole days `start..=end`
    pub async fn summary(
        state: &AppState,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SummaryResponse, ApiError> {
        let window = ReportWindow::from_dates(start, end, state.offset)?;
        let records = Self::records_in(state, &window).await?;

        Ok(SummaryResponse {
            window,
            recorded_days: recorded_days(&records),
            summary: summarize(&records),
        })
    }

    /// Render caller-supplied records without touching the record store
    pub fn preview(state: &AppState, request: PreviewRequest) -> Result<Report, ApiError> {
        let window = ReportWindow::new(request.window.start, request.window.end)?;
        let records: Vec<MealRecord> = request
            .records
            .into_iter()
            .filter(|record| window.contains(&record.timestamp))
            .collect();

        let report = match request.targets {
            Some(targets) => {
                ReportRenderer::new(targets.validated()?)
                    .render(request.period, &request.identity, &records, &window)
            }
            None => state
                .renderer()
                .render(request.period, &request.identity, &records, &window),
        };

        info!(
            period = %request.period,
            records = records.len(),
            "Rendered preview report"
        );
        Ok(report)
    }

    async fn build(
        state: &AppState,
        period: ReportPeriod,
        window: &ReportWindow,
    ) -> Result<Report, ApiError> {
        let records = Self::records_in(state, window).await?;
        let report = state
            .renderer()
            .render(period, &state.config().report.user_name, &records, window);

        info!(
            period = %period,
            start = %window.start_date(),
            end = %window.end_date(),
            records = records.len(),
            sections = report.sections.len(),
            "Generated report"
        );
        Ok(report)
    }

    async fn records_in(
        state: &AppState,
        window: &ReportWindow,
    ) -> Result<Vec<MealRecord>, ApiError> {
        state
            .records()
            .find_in_window(&state.config().report.user_id, window)
            .await
            .map_err(|e| ApiError::RecordSource(format!("{:#}", e)))
    }
}
