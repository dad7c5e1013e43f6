//! Rule-equation errors.
//!
//! Parse errors disable the offending rule at profile compile time; runtime
//! evaluation errors make the rule false for the current record only.

use super::error_code::{self, TriagemErrorCode};

/// Errors from lexing, parsing, or evaluating a rule equation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EquationError {
    #[error("unexpected character {ch:?} at offset {position}")]
    UnexpectedChar { position: usize, ch: char },

    #[error("unterminated string literal starting at offset {position}")]
    UnterminatedString { position: usize },

    #[error("invalid number at offset {position}")]
    InvalidNumber { position: usize },

    #[error("unexpected {found} at offset {position}, expected {expected}")]
    UnexpectedToken {
        position: usize,
        found: String,
        expected: &'static str,
    },

    #[error("unknown identifier {name:?} at offset {position}")]
    UnknownIdentifier { position: usize, name: String },

    #[error("unknown proximity scope {name:?}")]
    InvalidScope { name: String },

    #[error("{function} expects {message}")]
    TypeMismatch {
        function: &'static str,
        message: String,
    },
}

impl TriagemErrorCode for EquationError {
    fn error_code(&self) -> &'static str {
        error_code::EQUATION_ERROR
    }
}
