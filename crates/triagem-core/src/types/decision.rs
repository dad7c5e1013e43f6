//! Decision, reason-code, and per-record result types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::collections::SmallVec2;
use super::span::HighlightSpan;

/// Row identifier assigned by the external record source. Results are
/// indexed by this id, never by completion order.
pub type RowId = u64;

/// Final triage verdict for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Include,
    Review,
    #[default]
    Exclude,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Include => "INCLUDE",
            Self::Review => "REVIEW",
            Self::Exclude => "EXCLUDE",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable reason behind a decision.
///
/// The `REQ_CTX_*` and tie-break codes belong to the threshold policy;
/// `RULE_FIRED` / `NO_RULE_FIRED` belong to the rule policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    NoSignals,
    ReqCtxPosOnly,
    ReqCtxNegOnly,
    ReqCtxPosNoCtx,
    ReqCtxNegNoCtx,
    ReqCtxTieOrNoExclusive,
    ReqCtxUnmet,
    NegOnly,
    PosOnly,
    TiePosCtx,
    TieNegCtx,
    TieNoCtx,
    PosBelowMin,
    NegBelowMin,
    WeakSignals,
    RuleFired,
    NoRuleFired,
}

impl ReasonCode {
    /// Stable wire code, matching the serde representation.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSignals => "NO_SIGNALS",
            Self::ReqCtxPosOnly => "REQ_CTX_POS_ONLY",
            Self::ReqCtxNegOnly => "REQ_CTX_NEG_ONLY",
            Self::ReqCtxPosNoCtx => "REQ_CTX_POS_NO_CTX",
            Self::ReqCtxNegNoCtx => "REQ_CTX_NEG_NO_CTX",
            Self::ReqCtxTieOrNoExclusive => "REQ_CTX_TIE_OR_NO_EXCLUSIVE",
            Self::ReqCtxUnmet => "REQ_CTX_UNMET",
            Self::NegOnly => "NEG_ONLY",
            Self::PosOnly => "POS_ONLY",
            Self::TiePosCtx => "TIE_POS_CTX",
            Self::TieNegCtx => "TIE_NEG_CTX",
            Self::TieNoCtx => "TIE_NO_CTX",
            Self::PosBelowMin => "POS_BELOW_MIN",
            Self::NegBelowMin => "NEG_BELOW_MIN",
            Self::WeakSignals => "WEAK_SIGNALS",
            Self::RuleFired => "RULE_FIRED",
            Self::NoRuleFired => "NO_RULE_FIRED",
        }
    }

    /// One-sentence human summary of the code.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::NoSignals => "No positive or negative keywords found.",
            Self::ReqCtxPosOnly => {
                "Context required: a positive term sits near the context and no negative term does."
            }
            Self::ReqCtxNegOnly => {
                "Context required: a negative term sits near the context and no positive term does."
            }
            Self::ReqCtxPosNoCtx => {
                "Context required: positive terms found, but none near the context."
            }
            Self::ReqCtxNegNoCtx => {
                "Context required: negative terms found, but none near the context."
            }
            Self::ReqCtxTieOrNoExclusive => {
                "Context required: both positive and negative terms carry context (conflict)."
            }
            Self::ReqCtxUnmet => "Context required: no relevant term near the context.",
            Self::NegOnly => "Only negative terms at or above the configured minimum.",
            Self::PosOnly => "Only positive terms at or above the configured minimum.",
            Self::TiePosCtx => {
                "Tie between positive and negative terms; context favors inclusion."
            }
            Self::TieNegCtx => {
                "Tie between positive and negative terms; context favors exclusion."
            }
            Self::TieNoCtx => {
                "Tie between positive and negative terms with no context to break it."
            }
            Self::PosBelowMin => "Positive terms present, but below the configured minimum.",
            Self::NegBelowMin => "Negative terms present, but below the configured minimum.",
            Self::WeakSignals => "Weak or contradictory signals.",
            Self::RuleFired => "A rule equation matched; its decision applies.",
            Self::NoRuleFired => "No rule equation matched; the profile default applies.",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A recoverable per-record anomaly, reflected in audit output instead of
/// failing the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Hazard {
    /// A matcher produced more hits than the per-record cap and was cut off.
    HitCapExceeded { pattern: String, cap: usize },
    /// A rule equation failed to evaluate for this record; the rule was
    /// treated as non-matching.
    EquationFailed { rule: String, message: String },
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HitCapExceeded { pattern, cap } => {
                write!(f, "matcher '{pattern}' exceeded {cap} hits and was cut off")
            }
            Self::EquationFailed { rule, message } => {
                write!(f, "rule '{rule}' failed to evaluate: {message}")
            }
        }
    }
}

/// Everything the engine knows about one classified record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub decision: Decision,
    /// Category assigned by the firing rule, if any.
    pub category: Option<String>,
    /// Name of the rule that fired; empty for the threshold policy and for
    /// the rule policy's default fallback.
    pub rule_fired: String,
    pub score: f64,
    pub reason_code: ReasonCode,
    /// One-sentence human summary of the reason.
    pub reason: String,
    /// Summary plus interpolated counts, minimums, and flags.
    pub reason_detail: String,
    pub pos_count: usize,
    pub neg_count: usize,
    pub ctx_count: usize,
    pub near_pos_ctx: bool,
    pub near_neg_ctx: bool,
    /// Distinct matched terms per class (normalized text, first-seen order,
    /// capped).
    pub pos_terms: Vec<String>,
    pub neg_terms: Vec<String>,
    pub ctx_terms: Vec<String>,
    /// Labeled spans over the raw text for an external renderer.
    pub highlights: Vec<HighlightSpan>,
    /// Fixed-template audit line.
    pub audit: String,
    pub hazards: SmallVec2<Hazard>,
}

/// A classified record, tagged with the row id it came in with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordOutcome {
    pub row_id: RowId,
    pub result: DecisionResult,
}
