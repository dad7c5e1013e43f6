//! Shared constants for the Triagem classification engine.

/// Triagem version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default token-proximity window.
pub const DEFAULT_WINDOW: u32 = 8;

/// Default minimum positive hits for the threshold policy to include.
pub const DEFAULT_MIN_POS_TO_INCLUDE: u32 = 1;

/// Default minimum negative hits for the threshold policy to exclude.
pub const DEFAULT_MIN_NEG_TO_EXCLUDE: u32 = 1;

/// Default weight of a positive term that carries no explicit weight.
pub const DEFAULT_POSITIVE_WEIGHT: f64 = 1.0;

/// Maximum hits a single matcher may produce for one record before the
/// matcher is cut off and a hazard is recorded.
pub const MAX_HITS_PER_PATTERN: usize = 10_000;

/// Compiled-size limit for user-supplied regex patterns (bytes).
pub const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Maximum distinct matched terms listed per class in audit output.
pub const AUDIT_TERM_LIMIT: usize = 50;
