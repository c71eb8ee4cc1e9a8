//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the report engine.

pub mod report;

pub use report::ReportService;
