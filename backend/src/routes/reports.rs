//! Report API routes

use crate::error::ApiError;
use crate::services::ReportService;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use meal_report_shared::types::{
    MonthlyReportQuery, PreviewRequest, ReportFormat, SummaryQuery, SummaryResponse,
    WeeklyReportQuery,
};
use meal_report_shared::Report;

/// Create report routes
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/weekly", get(get_weekly_report))
        .route("/monthly", get(get_monthly_report))
        .route("/preview", post(preview_report))
}

/// Serialize a report as JSON or as plain text
fn respond(report: Report, format: ReportFormat) -> Response {
    match format {
        ReportFormat::Json => Json(report).into_response(),
        ReportFormat::Text => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            report.to_plain_text(),
        )
            .into_response(),
    }
}

/// GET /api/v1/reports/weekly - Report for the previous Monday-Sunday week
///
/// `date` picks the reference day (default today); the report covers the
/// week before the one containing it.
async fn get_weekly_report(
    State(state): State<AppState>,
    query: Result<Query<WeeklyReportQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let report = ReportService::weekly_report(&state, query.date).await?;
    Ok(respond(report, query.format))
}

/// GET /api/v1/reports/monthly - Report for a calendar month
async fn get_monthly_report(
    State(state): State<AppState>,
    query: Result<Query<MonthlyReportQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let report = ReportService::monthly_report(&state, query.year, query.month).await?;
    Ok(respond(report, query.format))
}

/// POST /api/v1/reports/preview - Render caller-supplied records
async fn preview_report(
    State(state): State<AppState>,
    req: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<Report>, ApiError> {
    let Json(req) = req?;
    let report = ReportService::preview(&state, req)?;
    Ok(Json(report))
}

/// GET /api/v1/summary - Raw nutrition summary for a date range
pub(super) async fn get_summary(
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Query(query) = query?;
    let response = ReportService::summary(&state, query.start, query.end).await?;
    Ok(Json(response))
}
