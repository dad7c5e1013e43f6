//! Profile configuration errors.
//!
//! A `ConfigError` is fatal: it is surfaced before any record is processed
//! and aborts the whole batch.

use super::error_code::{self, TriagemErrorCode};

/// Errors found while validating an in-memory profile.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("proximity window must be at least 1, got {value}")]
    InvalidWindow { value: u32 },

    #[error("threshold field {field} must be at least 1, got {value}")]
    InvalidThreshold { field: &'static str, value: u32 },

    #[error("rule at position {index} has an empty name")]
    EmptyRuleName { index: usize },

    #[error("duplicate rule name: {name}")]
    DuplicateRule { name: String },

    #[error("context group with an empty name")]
    EmptyContextName,
}

impl TriagemErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
