//! The count-threshold decision policy.

use triagem_core::config::ThresholdPolicy;
use triagem_core::types::decision::{Decision, ReasonCode};

/// Match data the threshold policy decides on.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdInput {
    /// Positive hit count.
    pub pos: usize,
    /// Negative hit count.
    pub neg: usize,
    /// Any positive hit within the window of a context hit.
    pub near_pos_ctx: bool,
    /// Any negative hit within the window of a context hit.
    pub near_neg_ctx: bool,
}

/// Decide a record from counts and proximity flags.
///
/// The no-signals case excludes unconditionally, before any other branch.
/// With `require_context`, a side only wins with exclusive context
/// proximity; without it, minimums decide and ties fall to the
/// context-based tie-break under the `negative_wins_ties` flag.
pub fn decide_threshold(input: ThresholdInput, policy: &ThresholdPolicy) -> (Decision, ReasonCode) {
    let ThresholdInput {
        pos: p,
        neg: n,
        near_pos_ctx: cpos,
        near_neg_ctx: cneg,
    } = input;
    let min_p = policy.min_pos_to_include as usize;
    let min_n = policy.min_neg_to_exclude as usize;

    if p == 0 && n == 0 {
        return (Decision::Exclude, ReasonCode::NoSignals);
    }

    let pos_ok = p >= min_p;
    let neg_ok = n >= min_n;

    if policy.require_context {
        if cpos && pos_ok && !cneg {
            return (Decision::Include, ReasonCode::ReqCtxPosOnly);
        }
        if cneg && neg_ok && !cpos {
            return (Decision::Exclude, ReasonCode::ReqCtxNegOnly);
        }
        if pos_ok && !cpos {
            return (Decision::Review, ReasonCode::ReqCtxPosNoCtx);
        }
        if neg_ok && !cneg {
            return (Decision::Review, ReasonCode::ReqCtxNegNoCtx);
        }
        if pos_ok && neg_ok {
            return (Decision::Review, ReasonCode::ReqCtxTieOrNoExclusive);
        }
        return (Decision::Review, ReasonCode::ReqCtxUnmet);
    }

    if neg_ok && !pos_ok {
        return (Decision::Exclude, ReasonCode::NegOnly);
    }
    if pos_ok && !neg_ok {
        return (Decision::Include, ReasonCode::PosOnly);
    }
    if pos_ok && neg_ok {
        if policy.negative_wins_ties {
            if cpos && !cneg {
                return (Decision::Include, ReasonCode::TiePosCtx);
            }
            if cneg && !cpos {
                return (Decision::Exclude, ReasonCode::TieNegCtx);
            }
            return (Decision::Review, ReasonCode::TieNoCtx);
        }
        if cpos && !cneg {
            return (Decision::Include, ReasonCode::TiePosCtx);
        }
        return (Decision::Review, ReasonCode::TieNoCtx);
    }

    if p > 0 && p < min_p && n == 0 {
        return (Decision::Review, ReasonCode::PosBelowMin);
    }
    if n > 0 && n < min_n && p == 0 {
        return (Decision::Review, ReasonCode::NegBelowMin);
    }
    (Decision::Review, ReasonCode::WeakSignals)
}

/// Expand a reason code into its human-readable detail line, interpolating
/// counts, minimums, and the flags that produced the decision.
pub fn reason_detail(
    code: ReasonCode,
    input: ThresholdInput,
    policy: &ThresholdPolicy,
    window: u32,
) -> String {
    let mut flags = vec![format!(
        "require_context={}",
        if policy.require_context { "yes" } else { "no" }
    )];
    if input.near_pos_ctx || input.near_neg_ctx {
        flags.push(format!(
            "ctx_near_pos={}",
            if input.near_pos_ctx { "yes" } else { "no" }
        ));
        flags.push(format!(
            "ctx_near_neg={}",
            if input.near_neg_ctx { "yes" } else { "no" }
        ));
        flags.push(format!("window={window}"));
    }
    flags.push(format!(
        "negative_wins={}",
        if policy.negative_wins_ties { "yes" } else { "no" }
    ));

    format!(
        "{} (P={}/min {}, N={}/min {}; {})",
        code.summary(),
        input.pos,
        policy.min_pos_to_include,
        input.neg,
        policy.min_neg_to_exclude,
        flags.join(", ")
    )
}
