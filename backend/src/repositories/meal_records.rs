//! Meal record repository - reads the meal log sheet's CSV export

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use meal_report_shared::models::coerce_number;
use meal_report_shared::window::localize;
use meal_report_shared::{MealRecord, Nutrients, ReportWindow};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Local timestamp layouts accepted in the date column
const LOCAL_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// One row of the export, keyed by the sheet's column headers
#[derive(Debug, Deserialize)]
struct MealRow {
    #[serde(rename = "記録日時", alias = "timestamp")]
    timestamp: String,
    #[serde(rename = "ユーザーID", alias = "user_id", default)]
    user_id: String,
    #[serde(rename = "食事内容", alias = "description", default)]
    description: String,
    #[serde(rename = "カテゴリ", alias = "category", default)]
    category: Option<String>,
    #[serde(rename = "推定カロリー", alias = "calories", default)]
    calories: Option<String>,
    #[serde(rename = "炭水化物(g)", alias = "carbohydrates", default)]
    carbohydrates: Option<String>,
    #[serde(rename = "タンパク質(g)", alias = "protein", default)]
    protein: Option<String>,
    #[serde(rename = "脂質(g)", alias = "fat", default)]
    fat: Option<String>,
    #[serde(rename = "食物繊維(g)", alias = "fiber", default)]
    fiber: Option<String>,
    #[serde(rename = "ナトリウム(mg)", alias = "sodium", default)]
    sodium: Option<String>,
    #[serde(rename = "健康メモ", alias = "health_notes", default)]
    health_notes: Option<String>,
    #[serde(rename = "画像URL", alias = "image_reference", default)]
    image_reference: Option<String>,
}

fn number(cell: &Option<String>) -> Option<f64> {
    cell.as_deref().and_then(coerce_number)
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.filter(|text| !text.trim().is_empty())
}

/// Parse a timestamp cell; naive values are local time in `offset`
pub fn parse_timestamp(text: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    LOCAL_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .and_then(|naive| localize(naive, offset))
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|ts| ts.with_timezone(&offset))
        })
}

impl MealRow {
    fn into_record(self, offset: FixedOffset) -> Option<MealRecord> {
        let timestamp = parse_timestamp(&self.timestamp, offset)?;
        let category = non_empty(self.category).unwrap_or_else(|| "other".to_string());
        Some(MealRecord {
            timestamp,
            user_id: self.user_id.trim().to_string(),
            description: self.description,
            category,
            calories: number(&self.calories),
            nutrients: Nutrients {
                carbohydrates: number(&self.carbohydrates),
                protein: number(&self.protein),
                fat: number(&self.fat),
                fiber: number(&self.fiber),
                sodium: number(&self.sodium),
            },
            health_notes: non_empty(self.health_notes),
            image_reference: non_empty(self.image_reference),
        })
    }
}

/// Parse a CSV export into records, skipping rows that cannot be read
pub fn parse_csv(data: &[u8], offset: FixedOffset) -> Vec<MealRecord> {
    let data = data.strip_prefix("\u{feff}".as_bytes()).unwrap_or(data);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(data);

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<MealRow>().enumerate() {
        // Row 1 is the header
        let line = index + 2;
        match row {
            Ok(row) => {
                let raw_timestamp = row.timestamp.clone();
                match row.into_record(offset) {
                    Some(record) => records.push(record),
                    None => warn!(line, timestamp = %raw_timestamp, "Skipping row with unparseable timestamp"),
                }
            }
            Err(e) => warn!(line, error = %e, "Skipping malformed row"),
        }
    }
    records
}

/// Meal record repository backed by a CSV file
#[derive(Debug, Clone)]
pub struct MealRecordRepository {
    path: PathBuf,
    offset: FixedOffset,
}

impl MealRecordRepository {
    pub fn new(path: impl Into<PathBuf>, offset: FixedOffset) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }

    /// Read every record in the file. A missing file reads as empty.
    pub async fn load_all(&self) -> Result<Vec<MealRecord>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "Meal record file not found, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read meal records from {}", self.path.display())
                })
            }
        };
        Ok(parse_csv(&data, self.offset))
    }

    /// Records for `user_id` inside `window`, oldest first
    pub async fn find_in_window(
        &self,
        user_id: &str,
        window: &ReportWindow,
    ) -> Result<Vec<MealRecord>> {
        let mut records: Vec<MealRecord> = self
            .load_all()
            .await?
            .into_iter()
            .filter(|record| record.user_id == user_id && window.contains(&record.timestamp))
            .collect();
        records.sort_by_key(|record| record.timestamp);

        debug!(
            user_id,
            start = %window.start,
            end = %window.end,
            count = records.len(),
            "Loaded meal records"
        );
        Ok(records)
    }

    /// Check the record file exists and is readable
    pub async fn health_check(&self) -> Result<()> {
        let metadata = tokio::fs::metadata(&self.path)
            .await
            .with_context(|| format!("Cannot access {}", self.path.display()))?;
        if !metadata.is_file() {
            anyhow::bail!("{} is not a file", self.path.display());
        }
        Ok(())
    }
}
