//! Common test utilities for integration tests
//!
//! Each `TestApp` owns a temporary meal record CSV that is removed on drop.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use meal_report_backend::{
    config::{AppConfig, RecordsConfig, ReportConfig, ServerConfig},
    routes,
    state::AppState,
};
use meal_report_shared::{NutritionTargets, ReferenceProfile};
use std::path::PathBuf;
use tower::ServiceExt;

pub const USER_ID: &str = "U1";
pub const USER_NAME: &str = "Taro";

pub const HEADER: &str = "記録日時,ユーザーID,食事内容,カテゴリ,推定カロリー,炭水化物(g),タンパク質(g),脂質(g),食物繊維(g),ナトリウム(mg),健康メモ,画像URL";

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub csv_path: PathBuf,
}

impl TestApp {
    /// Create a test application reading the given CSV rows (header added)
    pub fn with_rows(rows: &[String]) -> Self {
        let csv_path =
            std::env::temp_dir().join(format!("meal-report-{}.csv", uuid::Uuid::new_v4()));
        let mut content = String::from(HEADER);
        for row in rows {
            content.push('\n');
            content.push_str(row);
        }
        content.push('\n');
        std::fs::write(&csv_path, content).expect("Failed to write test CSV");

        Self::at_path(csv_path)
    }

    /// Create a test application whose record file does not exist
    pub fn without_file() -> Self {
        let csv_path =
            std::env::temp_dir().join(format!("meal-report-missing-{}.csv", uuid::Uuid::new_v4()));
        Self::at_path(csv_path)
    }

    fn at_path(csv_path: PathBuf) -> Self {
        let state = AppState::new(test_config(csv_path.clone())).expect("Invalid test config");
        let app = routes::create_router(state);
        Self { app, csv_path }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        std::fs::remove_file(&self.csv_path).ok();
    }
}

/// One CSV row for `USER_ID`
pub fn row(timestamp: &str, category: &str, calories: u32, carbs: u32, protein: u32, fat: u32) -> String {
    row_for(USER_ID, timestamp, category, calories, carbs, protein, fat)
}

/// One CSV row for an arbitrary user
pub fn row_for(
    user_id: &str,
    timestamp: &str,
    category: &str,
    calories: u32,
    carbs: u32,
    protein: u32,
    fat: u32,
) -> String {
    format!("{timestamp},{user_id},meal,{category},{calories},{carbs},{protein},{fat},,,,")
}

fn test_config(csv_path: PathBuf) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        records: RecordsConfig { csv_path },
        report: ReportConfig {
            user_id: USER_ID.to_string(),
            user_name: USER_NAME.to_string(),
            utc_offset_hours: 9,
        },
        targets: NutritionTargets::default(),
        profile: ReferenceProfile::default(),
    }
}
