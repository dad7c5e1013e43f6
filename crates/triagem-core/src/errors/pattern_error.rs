//! Term-pattern compilation errors.
//!
//! These are non-fatal: the offending matcher is dropped with a warning and
//! the rest of the set still compiles.

use super::error_code::{self, TriagemErrorCode};

/// Why a single term spec failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("empty pattern after trimming")]
    EmptyPattern,

    #[error("regex failed to compile: {message}")]
    RegexCompile { message: String },
}

impl TriagemErrorCode for PatternError {
    fn error_code(&self) -> &'static str {
        error_code::PATTERN_ERROR
    }
}
