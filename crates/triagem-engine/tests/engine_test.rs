//! End-to-end classification scenarios over the full pipeline:
//! normalize → match → proximity → decide → project.

use triagem_core::config::{
    ContextGroup, MatcherConfig, PolicyConfig, Profile, Rule, RulePolicy, TermSpec,
    ThresholdPolicy,
};
use triagem_core::types::collections::FxHashMap;
use triagem_core::types::decision::{Decision, ReasonCode};
use triagem_core::types::span::HitClass;
use triagem_engine::{classify_batch, CompiledProfile};

fn threshold_profile(
    positives: Vec<TermSpec>,
    negatives: Vec<TermSpec>,
    contexts: Vec<(&str, Vec<TermSpec>)>,
    policy: ThresholdPolicy,
) -> CompiledProfile {
    let mut ctx_map = FxHashMap::default();
    for (name, terms) in contexts {
        ctx_map.insert(
            name.to_string(),
            ContextGroup {
                category: None,
                terms,
            },
        );
    }
    let profile = Profile {
        matchers: MatcherConfig {
            positives,
            negatives,
            contexts: ctx_map,
        },
        policy: PolicyConfig::Threshold(policy),
        ..Profile::default()
    };
    CompiledProfile::compile(profile).expect("profile compiles")
}

fn rules_profile(
    positives: Vec<TermSpec>,
    contexts: Vec<(&str, Vec<TermSpec>)>,
    rules: Vec<Rule>,
    default_decision: Decision,
) -> CompiledProfile {
    let mut ctx_map = FxHashMap::default();
    for (name, terms) in contexts {
        ctx_map.insert(
            name.to_string(),
            ContextGroup {
                category: None,
                terms,
            },
        );
    }
    let profile = Profile {
        matchers: MatcherConfig {
            positives,
            negatives: vec![],
            contexts: ctx_map,
        },
        policy: PolicyConfig::Rules(RulePolicy {
            rules,
            default_decision,
            ..RulePolicy::default()
        }),
        ..Profile::default()
    };
    CompiledProfile::compile(profile).expect("profile compiles")
}

fn rule(name: &str, equation: &str, decision: Decision) -> Rule {
    Rule {
        name: name.into(),
        equation: equation.into(),
        decision,
        min_score: None,
        assign_category: None,
    }
}

/// Threshold profile with a single positive term: one hit includes with
/// POS_ONLY.
#[test]
fn threshold_positive_only_includes() {
    let compiled = threshold_profile(
        vec![TermSpec::literal("falha")],
        vec![],
        vec![],
        ThresholdPolicy::default(),
    );
    let result = compiled.classify("falha no motor elétrico");
    assert_eq!(result.decision, Decision::Include);
    assert_eq!(result.reason_code, ReasonCode::PosOnly);
    assert_eq!(result.pos_count, 1);
    assert_eq!(result.neg_count, 0);
    assert_eq!(result.pos_terms, vec!["falha"]);
    assert!(result.reason_detail.contains("P=1/min 1"));
}

/// A DSL rule gated on token proximity fires and assigns its category.
#[test]
fn rule_proximity_assigns_category() {
    let mut with_category = rule("hands", "WITHIN(8, POS(), CTX('MAOS'))", Decision::Include);
    with_category.assign_category = Some("Segurança > Proteção das Mãos".into());
    let compiled = rules_profile(
        vec![TermSpec::literal("luva")],
        vec![("MAOS", vec![TermSpec::literal("mãos")])],
        vec![with_category],
        Decision::Exclude,
    );
    let result = compiled.classify("dor nas mãos ao usar a luva");
    assert_eq!(result.decision, Decision::Include);
    assert_eq!(result.rule_fired, "hands");
    assert_eq!(
        result.category.as_deref(),
        Some("Segurança > Proteção das Mãos")
    );
}

/// A full-width match on accent-folded text projects back onto the entire
/// raw string.
#[test]
fn projection_covers_accented_raw_text() {
    let compiled = threshold_profile(
        vec![TermSpec::literal("pressao")],
        vec![],
        vec![],
        ThresholdPolicy::default(),
    );
    let raw = "Pressão";
    let result = compiled.classify(raw);
    assert_eq!(result.decision, Decision::Include);
    assert_eq!(result.highlights.len(), 1);
    let hl = result.highlights[0];
    assert_eq!(hl.label, HitClass::Positive);
    assert_eq!(&raw[hl.span.start..hl.span.end], "Pressão");
}

#[test]
fn first_rule_wins_over_later_rules() {
    let compiled = rules_profile(
        vec![TermSpec::literal("luva")],
        vec![],
        vec![
            rule("first", "True", Decision::Include),
            rule("second", "True", Decision::Exclude),
        ],
        Decision::Review,
    );
    let result = compiled.classify("qualquer texto");
    assert_eq!(result.decision, Decision::Include);
    assert_eq!(result.rule_fired, "first");
}

#[test]
fn min_score_skips_true_rule() {
    let mut gated = rule("gated", "True", Decision::Include);
    gated.min_score = Some(2.0);
    let compiled = rules_profile(
        vec![TermSpec::literal("luva")],
        vec![],
        vec![gated, rule("after", "True", Decision::Review)],
        Decision::Exclude,
    );
    // One positive hit, default weight 1.0 — below the 2.0 gate.
    let result = compiled.classify("a luva rasgou");
    assert_eq!(result.rule_fired, "after");
    assert_eq!(result.decision, Decision::Review);
    assert_eq!(result.score, 1.0);
}

#[test]
fn weights_feed_the_rule_score() {
    let mut gated = rule("gated", "POS()", Decision::Include);
    gated.min_score = Some(2.5);
    let compiled = rules_profile(
        vec![TermSpec::literal("luva").with_weight(3.0)],
        vec![],
        vec![gated],
        Decision::Review,
    );
    let result = compiled.classify("a luva rasgou");
    assert_eq!(result.decision, Decision::Include);
    assert_eq!(result.score, 3.0);
}

#[test]
fn explicit_default_decision_applies_when_no_rule_fires() {
    for default in [Decision::Exclude, Decision::Review] {
        let compiled = rules_profile(
            vec![TermSpec::literal("luva")],
            vec![],
            vec![rule("never", "False", Decision::Include)],
            default,
        );
        let result = compiled.classify("a luva rasgou");
        assert_eq!(result.decision, default);
        assert_eq!(result.reason_code, ReasonCode::NoRuleFired);
        assert_eq!(result.rule_fired, "");
    }
}

#[test]
fn sentence_scope_respects_terminators() {
    let compiled = rules_profile(
        vec![TermSpec::literal("luva")],
        vec![("MAOS", vec![TermSpec::literal("mãos")])],
        vec![rule(
            "same-sentence",
            "WITHIN(0, POS(), CTX('MAOS'), sentence)",
            Decision::Include,
        )],
        Decision::Exclude,
    );
    let same = compiled.classify("mãos feridas com a luva");
    assert_eq!(same.decision, Decision::Include);

    let split = compiled.classify("mãos feridas. depois veio a luva");
    assert_eq!(split.decision, Decision::Exclude);
}

#[test]
fn negative_context_tiebreak_excludes() {
    let compiled = threshold_profile(
        vec![TermSpec::literal("falha")],
        vec![TermSpec::literal("teste")],
        vec![("SIM", vec![TermSpec::literal("simulado")])],
        ThresholdPolicy {
            negative_wins_ties: true,
            ..ThresholdPolicy::default()
        },
    );
    // Both sides hit; only the negative term is near the context anchor.
    let result = compiled.classify(
        "falha registrada ontem pela equipe da manutenção durante a ronda e no fim apenas teste simulado",
    );
    assert_eq!(result.pos_count, 1);
    assert_eq!(result.neg_count, 1);
    assert!(result.near_neg_ctx);
    assert!(!result.near_pos_ctx);
    assert_eq!(result.decision, Decision::Exclude);
    assert_eq!(result.reason_code, ReasonCode::TieNegCtx);
}

#[test]
fn highlights_prioritize_negative_over_positive() {
    let compiled = threshold_profile(
        vec![TermSpec::phrase("falha grave")],
        vec![TermSpec::literal("grave")],
        vec![],
        ThresholdPolicy::default(),
    );
    let raw = "falha grave no setor";
    let result = compiled.classify(raw);
    let labels: Vec<(&str, HitClass)> = result
        .highlights
        .iter()
        .map(|h| (&raw[h.span.start..h.span.end], h.label))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("falha ", HitClass::Positive),
            ("grave", HitClass::Negative),
        ]
    );
}

#[test]
fn batch_keeps_row_order_and_ids() {
    let compiled = threshold_profile(
        vec![TermSpec::literal("falha")],
        vec![],
        vec![],
        ThresholdPolicy::default(),
    );
    let records: Vec<(u64, String)> = vec![
        (10, "falha no motor".into()),
        (11, "tudo normal".into()),
        (12, "outra falha".into()),
    ];
    let outcomes = classify_batch(&compiled, &records);
    assert_eq!(
        outcomes.iter().map(|o| o.row_id).collect::<Vec<_>>(),
        vec![10, 11, 12]
    );
    assert_eq!(outcomes[0].result.decision, Decision::Include);
    assert_eq!(outcomes[1].result.decision, Decision::Exclude);
    assert_eq!(outcomes[2].result.decision, Decision::Include);
}

#[test]
fn decision_result_round_trips_through_serde() {
    let compiled = threshold_profile(
        vec![TermSpec::literal("falha")],
        vec![],
        vec![],
        ThresholdPolicy::default(),
    );
    let result = compiled.classify("falha no motor");
    let json = serde_json::to_string(&result).unwrap();
    let back: triagem_core::DecisionResult = serde_json::from_str(&json).unwrap();
    assert_eq!(result, back);
    assert!(json.contains("\"INCLUDE\""));
    assert!(json.contains("\"POS_ONLY\""));
}

#[test]
fn unknown_context_group_in_equation_is_just_empty() {
    let compiled = rules_profile(
        vec![TermSpec::literal("luva")],
        vec![],
        vec![
            rule("ghost", "WITHIN(8, POS(), CTX('GHOST'))", Decision::Include),
            rule("present", "POS()", Decision::Review),
        ],
        Decision::Exclude,
    );
    let result = compiled.classify("a luva rasgou");
    // The unknown group is an empty set, so WITHIN is false — not an error.
    assert!(result.hazards.is_empty());
    assert_eq!(result.rule_fired, "present");
}
