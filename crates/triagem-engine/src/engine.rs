//! Profile compilation and per-record classification.
//!
//! A [`CompiledProfile`] is built once per run: the profile is validated,
//! every term list is compiled into matchers, and every rule equation is
//! parsed. The compiled profile is immutable and `Send + Sync`, so records
//! can be classified from any number of threads against the same instance.

use triagem_core::config::{PolicyConfig, Profile};
use triagem_core::errors::{ConfigError, EquationError};
use triagem_core::types::collections::{FxHashMap, SmallVec2};
use triagem_core::types::decision::{DecisionResult, ReasonCode};
use triagem_core::types::span::{HitClass, MatchHit, Span};

use crate::audit::{audit_line, highlight_spans, unique_terms};
use crate::decision::rules::{apply_rules, compile_rules, CompiledRule};
use crate::decision::threshold::{decide_threshold, reason_detail, ThresholdInput};
use crate::dsl::EvalContext;
use crate::matchers::{MatcherSet, PatternIssue};
use crate::normalize::normalize;
use crate::proximity::{near_tokens, sentences, TokenIndex};

/// A non-fatal problem found while compiling a profile, reported once.
#[derive(Debug)]
pub enum CompileIssue {
    /// A term was dropped.
    Pattern(PatternIssue),
    /// A rule equation failed to parse; the rule never fires.
    Equation { rule: String, error: EquationError },
}

/// An immutable, fully compiled profile ready to classify records.
pub struct CompiledProfile {
    profile: Profile,
    positives: MatcherSet,
    negatives: MatcherSet,
    /// Context groups in name order, for deterministic iteration.
    contexts: Vec<(String, MatcherSet)>,
    rules: Vec<CompiledRule>,
    issues: Vec<CompileIssue>,
}

impl CompiledProfile {
    /// Validate and compile a profile. Structural problems are fatal;
    /// individual bad terms or equations become [`CompileIssue`] warnings.
    pub fn compile(profile: Profile) -> Result<Self, ConfigError> {
        profile.validate()?;

        let opts = profile.normalization;
        let mut pattern_issues = Vec::new();

        let positives = MatcherSet::compile(
            HitClass::Positive,
            None,
            &profile.matchers.positives,
            &opts,
            &mut pattern_issues,
        );
        let negatives = MatcherSet::compile(
            HitClass::Negative,
            None,
            &profile.matchers.negatives,
            &opts,
            &mut pattern_issues,
        );

        let mut names: Vec<&String> = profile.matchers.contexts.keys().collect();
        names.sort();
        let contexts: Vec<(String, MatcherSet)> = names
            .into_iter()
            .map(|name| {
                let group = &profile.matchers.contexts[name];
                let set = MatcherSet::compile(
                    HitClass::Context,
                    Some(name),
                    &group.terms,
                    &opts,
                    &mut pattern_issues,
                );
                (name.clone(), set)
            })
            .collect();

        let (rules, equation_issues) = match &profile.policy {
            PolicyConfig::Rules(r) => compile_rules(&r.rules),
            PolicyConfig::Threshold(_) => (Vec::new(), Vec::new()),
        };

        let issues = pattern_issues
            .into_iter()
            .map(CompileIssue::Pattern)
            .chain(
                equation_issues
                    .into_iter()
                    .map(|(rule, error)| CompileIssue::Equation { rule, error }),
            )
            .collect();

        Ok(Self {
            profile,
            positives,
            negatives,
            contexts,
            rules,
            issues,
        })
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Compile-time warnings: dropped terms and disabled rules.
    pub fn issues(&self) -> &[CompileIssue] {
        &self.issues
    }

    /// Classify one record. Pure: no state is shared across calls beyond
    /// the compiled matchers.
    pub fn classify(&self, raw: &str) -> DecisionResult {
        let normalized = normalize(raw, &self.profile.normalization);
        let text = normalized.text.as_str();

        let mut hazards = SmallVec2::new();
        let pos_hits = self.positives.find_all(text, &mut hazards);
        let neg_hits = self.negatives.find_all(text, &mut hazards);

        let mut ctx_hits: FxHashMap<String, Vec<MatchHit>> = FxHashMap::default();
        let mut all_ctx_hits: Vec<MatchHit> = Vec::new();
        for (name, set) in &self.contexts {
            let hits = set.find_all(text, &mut hazards);
            all_ctx_hits.extend(hits.iter().cloned());
            ctx_hits.insert(name.clone(), hits);
        }

        let pos_spans: Vec<Span> = pos_hits.iter().map(|h| h.span).collect();
        let neg_spans: Vec<Span> = neg_hits.iter().map(|h| h.span).collect();
        let all_ctx_spans: Vec<Span> = all_ctx_hits.iter().map(|h| h.span).collect();
        let ctx_spans: FxHashMap<String, Vec<Span>> = ctx_hits
            .iter()
            .map(|(name, hits)| (name.clone(), hits.iter().map(|h| h.span).collect()))
            .collect();

        let tokens = TokenIndex::new(text);
        let sentence_spans = sentences(text);
        let window = self.profile.window;

        let near_pos_ctx = near_tokens(&tokens, &pos_spans, &all_ctx_spans, window);
        let near_neg_ctx = near_tokens(&tokens, &neg_spans, &all_ctx_spans, window);

        let pos_count = pos_hits.len();
        let neg_count = neg_hits.len();
        let ctx_count = all_ctx_hits.len();

        let (decision, category, rule_fired, score, reason_code, detail) = match &self.profile.policy
        {
            PolicyConfig::Threshold(policy) => {
                let input = ThresholdInput {
                    pos: pos_count,
                    neg: neg_count,
                    near_pos_ctx,
                    near_neg_ctx,
                };
                let (decision, code) = decide_threshold(input, policy);
                let score = pos_count as f64 - neg_count as f64;
                let detail = reason_detail(code, input, policy, window);
                (decision, None, String::new(), score, code, detail)
            }
            PolicyConfig::Rules(policy) => {
                let score: f64 = pos_hits
                    .iter()
                    .map(|hit| {
                        self.positives.terms()[hit.term]
                            .weight
                            .unwrap_or(policy.default_positive_weight)
                    })
                    .sum();
                let eval_ctx = EvalContext {
                    tokens: &tokens,
                    sentences: &sentence_spans,
                    pos: &pos_spans,
                    neg: &neg_spans,
                    ctx: &ctx_spans,
                };
                let verdict = apply_rules(
                    &self.rules,
                    policy.default_decision,
                    score,
                    &eval_ctx,
                    &mut hazards,
                );
                let detail = match verdict.reason_code {
                    ReasonCode::RuleFired => format!(
                        "{} (rule '{}', score {:.2})",
                        verdict.reason_code.summary(),
                        verdict.rule_fired,
                        score
                    ),
                    _ => format!(
                        "{} (default {}, score {:.2})",
                        verdict.reason_code.summary(),
                        policy.default_decision,
                        score
                    ),
                };
                (
                    verdict.decision,
                    verdict.category,
                    verdict.rule_fired,
                    score,
                    verdict.reason_code,
                    detail,
                )
            }
        };

        let highlights = highlight_spans(
            raw,
            text.len(),
            &normalized.back_map,
            &pos_spans,
            &neg_spans,
            &all_ctx_spans,
        );

        let audit = audit_line(
            &rule_fired,
            decision,
            category.as_deref(),
            pos_count,
            neg_count,
            ctx_count,
        );

        DecisionResult {
            decision,
            category,
            rule_fired,
            score,
            reason_code,
            reason: reason_code.summary().to_owned(),
            reason_detail: detail,
            pos_count,
            neg_count,
            ctx_count,
            near_pos_ctx,
            near_neg_ctx,
            pos_terms: unique_terms(&pos_hits),
            neg_terms: unique_terms(&neg_hits),
            ctx_terms: unique_terms(&all_ctx_hits),
            highlights,
            audit,
            hazards,
        }
    }
}
