//! Core vocabulary for the Triagem record-classification engine.
//!
//! This crate holds everything the engine and its callers share: span and
//! decision types, the in-memory profile model with validation, error enums
//! with stable error codes, performance-oriented collection re-exports, and
//! tracing setup. It performs no I/O and knows nothing about file formats —
//! loading a profile from disk is a caller concern.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::{
    ContextGroup, MatcherConfig, NormalizationOptions, PolicyConfig, Profile, Rule, RulePolicy,
    TermKind, TermSpec, ThresholdPolicy,
};
pub use errors::{ConfigError, EquationError, PatternError, TriagemErrorCode};
pub use types::decision::{Decision, DecisionResult, Hazard, ReasonCode, RecordOutcome, RowId};
pub use types::span::{HighlightSpan, HitClass, MatchHit, Span};
