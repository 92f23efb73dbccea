//! Error types for the wellness_core library.
//!
//! The metric formulas never fail: a formula that cannot be computed yields
//! `None`. These errors cover the ambient parts of the system (configuration,
//! serialization, form validation surfaced at the command line).

use std::io;

use crate::validation::ValidationReport;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for wellness_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more form fields failed validation
    #[error("Validation failed: {0}")]
    Validation(ValidationReport),

    /// A value could not be parsed (gender, unit system, activity level, ...)
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
