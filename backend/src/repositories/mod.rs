//! Record repositories
//!
//! Provides the data access layer for meal records.

pub mod meal_records;

pub use meal_records::MealRecordRepository;
