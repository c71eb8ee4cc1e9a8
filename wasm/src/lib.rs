//! Meal Report WASM Module
//!
//! WebAssembly bindings that run the report engine in the browser.
//! Inputs and outputs are JSON strings; errors surface as string messages.

use meal_report_shared::report::{achievement_bar, achievement_percent};
use meal_report_shared::types::PreviewRequest;
use meal_report_shared::{
    recorded_days, summarize, MealRecord, NutritionSummary, ReportError, ReportRenderer,
    ReportWindow,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct RecordsSummary {
    recorded_days: usize,
    summary: NutritionSummary,
}

fn summarize_json(records_json: &str) -> Result<String, ReportError> {
    let records: Vec<MealRecord> = serde_json::from_str(records_json)?;
    let output = RecordsSummary {
        recorded_days: recorded_days(&records),
        summary: summarize(&records),
    };
    Ok(serde_json::to_string(&output)?)
}

fn render_json(request_json: &str) -> Result<String, ReportError> {
    let request: PreviewRequest = serde_json::from_str(request_json)?;
    let window = ReportWindow::new(request.window.start, request.window.end)?;
    let targets = request.targets.unwrap_or_default().validated()?;

    let records: Vec<MealRecord> = request
        .records
        .into_iter()
        .filter(|record| window.contains(&record.timestamp))
        .collect();
    let report = ReportRenderer::new(targets).render(
        request.period,
        &request.identity,
        &records,
        &window,
    );
    Ok(serde_json::to_string(&report)?)
}

fn to_js(error: ReportError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Summarize a JSON array of meal records
#[wasm_bindgen]
pub fn summarize_records(records_json: &str) -> Result<String, JsValue> {
    summarize_json(records_json).map_err(to_js)
}

/// Render a report from a JSON preview request
/// (`period`, `identity`, `window`, `records`, optional `targets`)
#[wasm_bindgen]
pub fn render_report(request_json: &str) -> Result<String, JsValue> {
    render_json(request_json).map_err(to_js)
}

/// Percentage of the calorie floor reached, capped at 100
#[wasm_bindgen]
pub fn calorie_achievement(daily_avg_calories: u32, calorie_floor: f64) -> u32 {
    achievement_percent(u64::from(daily_avg_calories), calorie_floor)
}

/// The 20-cell achievement bar for a percentage
#[wasm_bindgen]
pub fn calorie_achievement_bar(achievement: u32) -> String {
    achievement_bar(achievement.min(100))
}
