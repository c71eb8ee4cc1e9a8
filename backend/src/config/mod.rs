//! Configuration management for the meal report backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: MR__)

use anyhow::{anyhow, Result};
use chrono::FixedOffset;
use meal_report_shared::{NutritionTargets, ReferenceProfile};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub records: RecordsConfig,
    pub report: ReportConfig,
    #[serde(default)]
    pub targets: NutritionTargets,
    #[serde(default)]
    pub profile: ReferenceProfile,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Meal record source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsConfig {
    /// CSV export of the meal log sheet
    pub csv_path: PathBuf,
}

/// Who the scheduled reports are for, and in which timezone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub user_id: String,
    pub user_name: String,
    /// Offset of local time from UTC, in whole hours
    pub utc_offset_hours: i32,
}

impl ReportConfig {
    /// The configured local offset
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .ok_or_else(|| anyhow!("UTC offset out of range: {} hours", self.utc_offset_hours))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            records: RecordsConfig {
                csv_path: PathBuf::from("data/meal_records.csv"),
            },
            report: ReportConfig {
                user_id: "owner".to_string(),
                user_name: "User".to_string(),
                utc_offset_hours: 9,
            },
            targets: NutritionTargets::default(),
            profile: ReferenceProfile::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with MR__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(&config_file).required(false))
            // e.g., MR__TARGETS__CALORIES__MIN=2000 sets targets.calories.min
            .add_source(config::Environment::with_prefix("MR").separator("__"))
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the report engine cannot work with
    pub fn validate(&self) -> Result<()> {
        self.report.offset()?;
        self.targets.clone().validated()?;
        if self.report.user_id.trim().is_empty() {
            anyhow::bail!("report.user_id must not be empty");
        }
        Ok(())
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}
