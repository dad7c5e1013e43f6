//! Highlight projection and audit formatting.
//!
//! Highlights are resolved over the normalized text first: negative spans
//! are painted, then positive, then context, and a character keeps the
//! highest-priority label painted on it (negative > positive > context).
//! Merged same-label runs are then projected through the back-map onto the
//! raw text, repainting whole originating characters so priority is
//! re-resolved wherever diacritic folding changed character counts. The
//! output is structural — labeled raw-text spans — never markup.

use triagem_core::constants::AUDIT_TERM_LIMIT;
use triagem_core::types::collections::FxHashSet;
use triagem_core::types::decision::Decision;
use triagem_core::types::span::{HighlightSpan, HitClass, MatchHit, Span};

/// Paint `spans` onto the label array, keeping higher-priority labels.
fn paint(labels: &mut [Option<HitClass>], spans: &[Span], label: HitClass) {
    for span in spans {
        let start = span.start.min(labels.len());
        let end = span.end.min(labels.len());
        for slot in &mut labels[start..end] {
            let keep = slot.map_or(0, |l| l.paint_priority());
            if label.paint_priority() > keep {
                *slot = Some(label);
            }
        }
    }
}

/// Merge consecutive same-label slots into labeled spans.
fn merge_runs(labels: &[Option<HitClass>]) -> Vec<HighlightSpan> {
    let mut out = Vec::new();
    let mut i = 0usize;
    while i < labels.len() {
        let Some(label) = labels[i] else {
            i += 1;
            continue;
        };
        let start = i;
        while i < labels.len() && labels[i] == Some(label) {
            i += 1;
        }
        out.push(HighlightSpan {
            span: Span::new(start, i),
            label,
        });
    }
    out
}

/// Build highlight spans over the raw text from normalized-text hit sets.
pub fn highlight_spans(
    raw: &str,
    normalized_len: usize,
    back_map: &[usize],
    pos: &[Span],
    neg: &[Span],
    ctx: &[Span],
) -> Vec<HighlightSpan> {
    let mut norm_labels: Vec<Option<HitClass>> = vec![None; normalized_len];
    paint(&mut norm_labels, neg, HitClass::Negative);
    paint(&mut norm_labels, pos, HitClass::Positive);
    paint(&mut norm_labels, ctx, HitClass::Context);

    // Repaint onto the raw text, one originating character at a time.
    // Folding may map several normalized characters onto one raw character
    // (or none), so priority is resolved again on the raw side.
    let mut raw_labels: Vec<Option<HitClass>> = vec![None; raw.len()];
    let mut i = 0usize;
    while i < normalized_len {
        let Some(label) = norm_labels[i] else {
            i += 1;
            continue;
        };
        let raw_start = back_map[i];
        let raw_end = raw[raw_start..]
            .chars()
            .next()
            .map(|c| raw_start + c.len_utf8())
            .unwrap_or(raw.len());
        paint(
            &mut raw_labels,
            &[Span::new(raw_start, raw_end)],
            label,
        );
        i += 1;
    }

    merge_runs(&raw_labels)
}

/// Distinct matched terms in first-seen order, capped.
pub fn unique_terms(hits: &[MatchHit]) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    for hit in hits {
        if out.len() >= AUDIT_TERM_LIMIT {
            break;
        }
        if seen.insert(hit.text.as_str()) {
            out.push(hit.text.clone());
        }
    }
    out
}

/// Fixed-template audit line for one record.
pub fn audit_line(
    rule_fired: &str,
    decision: Decision,
    category: Option<&str>,
    pos_count: usize,
    neg_count: usize,
    ctx_count: usize,
) -> String {
    let rule = if rule_fired.is_empty() { "-" } else { rule_fired };
    let category = category.unwrap_or("-");
    format!(
        "rule: {rule}; decision: {decision}; category: {category}; \
         signals: P={pos_count} N={neg_count} CTX={ctx_count}"
    )
}
