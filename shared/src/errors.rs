//! Error types for the meal report engine
//!
//! The aggregation core itself never fails; these errors cover the edges
//! around it: configured targets, report windows and decoded payloads.

use thiserror::Error;

/// Errors raised while preparing inputs for the report engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("Invalid nutrition targets: {0}")]
    InvalidTargets(String),

    #[error("Invalid report window: {0}")]
    InvalidWindow(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl From<validator::ValidationErrors> for ReportError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ReportError::InvalidTargets(errors.to_string())
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(error: serde_json::Error) -> Self {
        ReportError::InvalidPayload(error.to_string())
    }
}
