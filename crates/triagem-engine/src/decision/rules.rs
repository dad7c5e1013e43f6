//! The equation-rule decision policy.

use triagem_core::config::Rule;
use triagem_core::errors::EquationError;
use triagem_core::types::collections::SmallVec2;
use triagem_core::types::decision::{Decision, Hazard, ReasonCode};

use crate::dsl::{eval, parse, EvalContext, Expr};

/// A rule with its equation parsed once per profile. A rule whose equation
/// failed to parse keeps `expr = None` and never fires.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: Rule,
    pub expr: Option<Expr>,
}

/// Parse every rule equation. Parse failures disable the rule and are
/// returned for one-time reporting; they never abort the profile.
pub fn compile_rules(rules: &[Rule]) -> (Vec<CompiledRule>, Vec<(String, EquationError)>) {
    let mut compiled = Vec::with_capacity(rules.len());
    let mut issues = Vec::new();

    for rule in rules {
        let expr = match parse(&rule.equation) {
            Ok(expr) => Some(expr),
            Err(error) => {
                tracing::warn!(
                    rule = %rule.name,
                    equation = %rule.equation,
                    %error,
                    "rule equation failed to parse, rule disabled"
                );
                issues.push((rule.name.clone(), error));
                None
            }
        };
        compiled.push(CompiledRule {
            rule: rule.clone(),
            expr,
        });
    }

    (compiled, issues)
}

/// What the rule walk produced for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleVerdict {
    pub decision: Decision,
    pub category: Option<String>,
    /// Name of the firing rule; empty when the default applied.
    pub rule_fired: String,
    pub reason_code: ReasonCode,
}

/// Walk the rules in declared order; the first rule whose equation is true
/// and whose `min_score` (if any) is satisfied wins. Runtime evaluation
/// errors count the rule as false for this record and are recorded as
/// hazards. When nothing fires, `default_decision` applies.
pub fn apply_rules(
    rules: &[CompiledRule],
    default_decision: Decision,
    score: f64,
    ctx: &EvalContext<'_>,
    hazards: &mut SmallVec2<Hazard>,
) -> RuleVerdict {
    for compiled in rules {
        let Some(expr) = &compiled.expr else {
            continue;
        };
        let matched = match eval(expr, ctx) {
            Ok(value) => value.truthy(),
            Err(error) => {
                tracing::debug!(
                    rule = %compiled.rule.name,
                    %error,
                    "rule equation failed at evaluation, treated as false"
                );
                hazards.push(Hazard::EquationFailed {
                    rule: compiled.rule.name.clone(),
                    message: error.to_string(),
                });
                false
            }
        };
        if !matched {
            continue;
        }
        if let Some(min_score) = compiled.rule.min_score {
            if score < min_score {
                continue;
            }
        }
        return RuleVerdict {
            decision: compiled.rule.decision,
            category: compiled.rule.assign_category.clone(),
            rule_fired: compiled.rule.name.clone(),
            reason_code: ReasonCode::RuleFired,
        };
    }

    RuleVerdict {
        decision: default_decision,
        category: None,
        rule_fired: String::new(),
        reason_code: ReasonCode::NoRuleFired,
    }
}
