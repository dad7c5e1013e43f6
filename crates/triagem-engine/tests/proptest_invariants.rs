//! Property-based tests for normalization and projection invariants.
//!
//! Uses proptest to fuzz-verify:
//!   - back-map monotonicity and length accounting
//!   - idempotence of normalization on already-normalized ASCII
//!   - matched spans projecting onto raw ranges that re-normalize to the
//!     matched substring
//!   - the unconditional no-signals exclusion of the threshold policy

use proptest::prelude::*;

use triagem_core::config::{
    MatcherConfig, NormalizationOptions, PolicyConfig, Profile, TermSpec, ThresholdPolicy,
};
use triagem_core::types::decision::{Decision, ReasonCode};
use triagem_engine::normalize::{normalize, project_span};
use triagem_engine::CompiledProfile;

fn any_opts() -> impl Strategy<Value = NormalizationOptions> {
    (any::<bool>(), any::<bool>()).prop_map(|(lowercase, strip_accents)| NormalizationOptions {
        lowercase,
        strip_accents,
    })
}

proptest! {
    /// The back-map is non-decreasing and covers every normalized byte,
    /// for any input and any flag combination.
    #[test]
    fn back_map_is_monotone_and_total(text in "\\PC{0,200}", opts in any_opts()) {
        let n = normalize(&text, &opts);
        prop_assert_eq!(n.back_map.len(), n.text.len());
        prop_assert!(n.back_map.windows(2).all(|w| w[0] <= w[1]));
        if let Some(&last) = n.back_map.last() {
            prop_assert!(last < text.len());
        }
    }

    /// Normalizing already-normalized ASCII text again is the identity.
    #[test]
    fn ascii_normalization_is_idempotent(text in "[a-z0-9 .,!?]{0,200}") {
        let opts = NormalizationOptions::default();
        let once = normalize(&text, &opts);
        let twice = normalize(&once.text, &opts);
        prop_assert_eq!(&once.text, &twice.text);
        prop_assert_eq!(&once.text, &text);
    }

    /// Any normalized span projects onto a raw range whose re-normalization
    /// contains the matched substring.
    #[test]
    fn projection_round_trips_through_renormalization(
        text in "\\PC{1,120}",
        start_frac in 0.0f64..1.0,
        len_frac in 0.0f64..1.0,
    ) {
        let opts = NormalizationOptions::default();
        let n = normalize(&text, &opts);
        prop_assume!(!n.text.is_empty());

        // Pick an arbitrary char-aligned, non-empty normalized span.
        let char_offsets: Vec<usize> = n.text.char_indices().map(|(i, _)| i).collect();
        let start_idx = ((char_offsets.len() - 1) as f64 * start_frac) as usize;
        let start = char_offsets[start_idx];
        let remaining = char_offsets.len() - start_idx;
        let span_chars = 1 + ((remaining - 1) as f64 * len_frac) as usize;
        let end = char_offsets
            .get(start_idx + span_chars)
            .copied()
            .unwrap_or(n.text.len());

        let span = triagem_core::Span::new(start, end);
        let matched = &n.text[start..end];

        let projected = project_span(&text, &n.back_map, span).expect("in-bounds span projects");
        let raw_slice = &text[projected.start..projected.end];
        let renormalized = normalize(raw_slice, &opts);
        prop_assert!(
            renormalized.text.contains(matched),
            "projected slice {:?} renormalizes to {:?}, missing {:?}",
            raw_slice, renormalized.text, matched
        );
    }

    /// Threshold policy: no signals always excludes with NO_SIGNALS, for
    /// any flag/minimum combination.
    #[test]
    fn no_signals_always_excludes(
        require_context in any::<bool>(),
        negative_wins_ties in any::<bool>(),
        min_pos in 1u32..5,
        min_neg in 1u32..5,
        text in "[a-z ]{0,80}",
    ) {
        let profile = Profile {
            matchers: MatcherConfig {
                positives: vec![TermSpec::literal("zzznope")],
                negatives: vec![TermSpec::literal("zzznever")],
                ..MatcherConfig::default()
            },
            policy: PolicyConfig::Threshold(ThresholdPolicy {
                require_context,
                negative_wins_ties,
                min_pos_to_include: min_pos,
                min_neg_to_exclude: min_neg,
            }),
            ..Profile::default()
        };
        let compiled = CompiledProfile::compile(profile).unwrap();
        prop_assume!(!text.contains("zzznope") && !text.contains("zzznever"));
        let result = compiled.classify(&text);
        prop_assert_eq!(result.decision, Decision::Exclude);
        prop_assert_eq!(result.reason_code, ReasonCode::NoSignals);
    }

    /// Highlight spans always lie inside the raw text, never overlap, and
    /// come back in ascending order.
    #[test]
    fn highlights_are_ordered_and_in_bounds(text in "\\PC{0,160}") {
        let profile = Profile {
            matchers: MatcherConfig {
                positives: vec![TermSpec::regex("[a-z]{2}")],
                negatives: vec![TermSpec::regex("[0-9]+")],
                ..MatcherConfig::default()
            },
            ..Profile::default()
        };
        let compiled = CompiledProfile::compile(profile).unwrap();
        let result = compiled.classify(&text);
        let mut prev_end = 0usize;
        for hl in &result.highlights {
            prop_assert!(hl.span.start >= prev_end);
            prop_assert!(hl.span.end <= text.len());
            prop_assert!(hl.span.start < hl.span.end);
            prop_assert!(text.is_char_boundary(hl.span.start));
            prop_assert!(text.is_char_boundary(hl.span.end));
            prev_end = hl.span.end;
        }
    }
}
