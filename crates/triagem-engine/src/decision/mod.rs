//! Decision policies.
//!
//! Both policies consume the same match data — hit counts, context
//! proximity, and span sets — produced by the shared
//! normalizer/matcher/proximity stack. The threshold policy is a fixed
//! branch table over counts and proximity flags; the rule policy walks the
//! profile's equations in declared order.

pub mod rules;
pub mod threshold;

pub use rules::{apply_rules, compile_rules, CompiledRule, RuleVerdict};
pub use threshold::{decide_threshold, ThresholdInput};
