#![forbid(unsafe_code)]

//! Core domain model and business logic for the wellness tools.
//!
//! This crate provides:
//! - Domain types (measurements, categories, derived metrics)
//! - Health metric formulas (BMI, body fat, BMR/TDEE, calorie goals)
//! - Form validation and unit conversion
//! - Calculator controllers with bounded result history
//! - The guided breathing session timer

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod units;
pub mod metrics;
pub mod validation;
pub mod history;
pub mod calculator;
pub mod breath;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use calculator::{BmiCalculator, BmiReading, BodyFatCalculator};
pub use validation::{BmiForm, BodyFatForm, HeightInput, ValidationReport, WeightInput};
pub use metrics::compute_all;
pub use breath::{BreathSession, BreathTimer, SessionEvent, SessionStatus, TimerQueue};
