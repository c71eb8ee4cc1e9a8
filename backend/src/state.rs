//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! State is built once at startup and is read-only while serving requests;
//! every field is cheap to clone.

use crate::config::AppConfig;
use crate::repositories::MealRecordRepository;
use anyhow::Result;
use chrono::FixedOffset;
use meal_report_shared::ReportRenderer;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Meal record source
    pub records: MealRecordRepository,
    /// Report renderer bound to the configured targets
    pub renderer: Arc<ReportRenderer>,
    /// Local offset used for windows and record timestamps
    pub offset: FixedOffset,
}

impl AppState {
    /// Create a new application state from a validated configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let offset = config.report.offset()?;
        let records = MealRecordRepository::new(config.records.csv_path.clone(), offset);
        let renderer = ReportRenderer::new(config.targets.clone());

        Ok(Self {
            config: Arc::new(config),
            records,
            renderer: Arc::new(renderer),
            offset,
        })
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the record repository
    #[inline]
    pub fn records(&self) -> &MealRecordRepository {
        &self.records
    }

    /// Get a reference to the report renderer
    #[inline]
    pub fn renderer(&self) -> &ReportRenderer {
        &self.renderer
    }
}
