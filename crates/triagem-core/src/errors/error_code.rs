//! TriagemErrorCode trait for structured error reporting.

/// Trait for attaching a stable error-code string to an error enum, so
/// external sinks (logs, result tables) can key on the family without
/// parsing the message.
pub trait TriagemErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const PATTERN_ERROR: &str = "PATTERN_ERROR";
pub const EQUATION_ERROR: &str = "EQUATION_ERROR";
