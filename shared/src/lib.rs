//! Meal Report Shared Library
//!
//! The nutrition report engine: meal record models, aggregation, advice
//! rules and report rendering. Everything here is synchronous and free of
//! I/O so the backend and the WASM module can share it.

pub mod advice;
pub mod analysis;
pub mod errors;
pub mod models;
pub mod report;
pub mod targets;
pub mod types;
pub mod window;

// Re-export commonly used items
pub use advice::{advise, evaluate, Advice, CalorieTier};
pub use analysis::{recorded_days, summarize, MacroNutrients, MealDistribution, NutritionSummary};
pub use errors::*;
pub use models::{MealCategory, MealRecord, Nutrients};
pub use report::{suggest_next_period_goals, Report, ReportRenderer, ReportSection};
pub use targets::{BiologicalSex, NutritionTargets, ReferenceProfile, TargetRange};
pub use window::{ReportPeriod, ReportWindow};
