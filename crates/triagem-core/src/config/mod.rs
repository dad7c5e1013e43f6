//! In-memory profile model.
//!
//! A [`Profile`] is the validated shape the engine consumes. How it gets
//! here — YAML, TOML, a spreadsheet column, a UI editor — is a caller
//! concern; these types only define the data and its invariants. A profile
//! is built once per run and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MIN_NEG_TO_EXCLUDE, DEFAULT_MIN_POS_TO_INCLUDE, DEFAULT_POSITIVE_WEIGHT,
    DEFAULT_WINDOW,
};
use crate::errors::ConfigError;
use crate::types::collections::{FxHashMap, FxHashSet};
use crate::types::decision::Decision;

/// Normalization flags applied to record text and to literal/phrase terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationOptions {
    pub lowercase: bool,
    pub strip_accents: bool,
}

impl Default for NormalizationOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            strip_accents: true,
        }
    }
}

/// How a term pattern is interpreted by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    /// Whole-token match with word-boundary semantics. A literal containing
    /// interior whitespace is reclassified as a phrase at compile time.
    #[default]
    Literal,
    /// Substring match, no boundary requirement.
    Phrase,
    /// Regex pattern, used as supplied.
    Regex,
}

/// A single user-authored term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSpec {
    pub pattern: String,
    #[serde(rename = "type", default)]
    pub kind: TermKind,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub tag: Option<String>,
}

impl TermSpec {
    pub fn literal(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            kind: TermKind::Literal,
            weight: None,
            tag: None,
        }
    }

    pub fn phrase(pattern: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Phrase,
            ..Self::literal(pattern)
        }
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Regex,
            ..Self::literal(pattern)
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }
}

/// A named cluster of anchor terms, optionally carrying a category label.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextGroup {
    pub category: Option<String>,
    pub terms: Vec<TermSpec>,
}

/// The three matcher sets of a profile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub positives: Vec<TermSpec>,
    pub negatives: Vec<TermSpec>,
    pub contexts: FxHashMap<String, ContextGroup>,
}

/// Knobs of the count-based decision policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdPolicy {
    pub require_context: bool,
    pub negative_wins_ties: bool,
    pub min_pos_to_include: u32,
    pub min_neg_to_exclude: u32,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            require_context: false,
            negative_wins_ties: true,
            min_pos_to_include: DEFAULT_MIN_POS_TO_INCLUDE,
            min_neg_to_exclude: DEFAULT_MIN_NEG_TO_EXCLUDE,
        }
    }
}

/// A single equation rule of the rule policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub equation: String,
    pub decision: Decision,
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub assign_category: Option<String>,
}

/// The equation-based decision policy. Rules are evaluated in declared
/// order; the first rule whose equation is true and whose `min_score` (if
/// any) is satisfied wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulePolicy {
    pub rules: Vec<Rule>,
    /// Applied when no rule fires. Defaults to `Exclude`.
    pub default_decision: Decision,
    /// Weight of a positive term that carries no explicit weight.
    pub default_positive_weight: f64,
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            default_decision: Decision::Exclude,
            default_positive_weight: DEFAULT_POSITIVE_WEIGHT,
        }
    }
}

/// Which decision policy a profile runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PolicyConfig {
    Threshold(ThresholdPolicy),
    Rules(RulePolicy),
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::Threshold(ThresholdPolicy::default())
    }
}

/// A complete, immutable classification profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub normalization: NormalizationOptions,
    /// Token-proximity window, in tokens. Must be >= 1.
    pub window: u32,
    pub matchers: MatcherConfig,
    pub policy: PolicyConfig,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: None,
            notes: None,
            normalization: NormalizationOptions::default(),
            window: DEFAULT_WINDOW,
            matchers: MatcherConfig::default(),
            policy: PolicyConfig::default(),
        }
    }
}

impl Profile {
    /// Validate structural invariants. Term patterns are *not* checked here:
    /// a bad pattern is a recoverable compile warning, not a fatal config
    /// error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window < 1 {
            return Err(ConfigError::InvalidWindow { value: self.window });
        }

        if self.matchers.contexts.keys().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::EmptyContextName);
        }

        match &self.policy {
            PolicyConfig::Threshold(t) => {
                if t.min_pos_to_include < 1 {
                    return Err(ConfigError::InvalidThreshold {
                        field: "min_pos_to_include",
                        value: t.min_pos_to_include,
                    });
                }
                if t.min_neg_to_exclude < 1 {
                    return Err(ConfigError::InvalidThreshold {
                        field: "min_neg_to_exclude",
                        value: t.min_neg_to_exclude,
                    });
                }
            }
            PolicyConfig::Rules(r) => {
                let mut seen = FxHashSet::default();
                for (index, rule) in r.rules.iter().enumerate() {
                    if rule.name.trim().is_empty() {
                        return Err(ConfigError::EmptyRuleName { index });
                    }
                    if !seen.insert(rule.name.as_str()) {
                        return Err(ConfigError::DuplicateRule {
                            name: rule.name.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_validates() {
        assert!(Profile::default().validate().is_ok());
    }

    #[test]
    fn zero_window_is_rejected() {
        let profile = Profile {
            window: 0,
            ..Profile::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::InvalidWindow { value: 0 })
        ));
    }

    #[test]
    fn zero_minimum_is_rejected() {
        let profile = Profile {
            policy: PolicyConfig::Threshold(ThresholdPolicy {
                min_pos_to_include: 0,
                ..ThresholdPolicy::default()
            }),
            ..Profile::default()
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn duplicate_rule_names_are_rejected() {
        let rule = Rule {
            name: "r1".into(),
            equation: "True".into(),
            decision: Decision::Include,
            min_score: None,
            assign_category: None,
        };
        let profile = Profile {
            policy: PolicyConfig::Rules(RulePolicy {
                rules: vec![rule.clone(), rule],
                ..RulePolicy::default()
            }),
            ..Profile::default()
        };
        assert!(matches!(
            profile.validate(),
            Err(ConfigError::DuplicateRule { .. })
        ));
    }

    #[test]
    fn profile_round_trips_through_serde() {
        let mut profile = Profile::default();
        profile.matchers.positives.push(TermSpec::literal("falha"));
        profile
            .matchers
            .contexts
            .insert("MAOS".into(), ContextGroup {
                category: Some("Hand Protection".into()),
                terms: vec![TermSpec::literal("mãos")],
            });

        let json = serde_json::to_string(&profile).unwrap();
        let back: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, back);
    }
}
