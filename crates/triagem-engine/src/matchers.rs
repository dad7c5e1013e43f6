//! Pattern compilation and span matching.
//!
//! A [`MatcherSet`] is the compiled form of one term list (positives,
//! negatives, or one context group). Literal terms compile to word-boundary
//! regexes, phrase terms go into a single Aho-Corasick automaton for a
//! one-pass substring scan, and regex terms are compiled as supplied with a
//! bounded size. Compilation happens once per profile and the set is reused
//! across every record.
//!
//! Compilation failures are non-fatal: the offending term is dropped and
//! reported as a [`PatternIssue`]; the rest of the set still compiles.

use aho_corasick::AhoCorasick;
use regex::{Regex, RegexBuilder};

use triagem_core::config::{NormalizationOptions, TermKind, TermSpec};
use triagem_core::constants::{MAX_HITS_PER_PATTERN, REGEX_SIZE_LIMIT};
use triagem_core::errors::PatternError;
use triagem_core::types::collections::SmallVec2;
use triagem_core::types::decision::Hazard;
use triagem_core::types::span::{HitClass, MatchHit, Span};

use crate::normalize::normalize;

/// A term that failed to compile, with enough context to report it once.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternIssue {
    pub class: HitClass,
    /// Context group name, when the term belongs to one.
    pub group: Option<String>,
    pub pattern: String,
    pub error: PatternError,
}

/// One term list compiled for matching.
pub struct MatcherSet {
    class: HitClass,
    /// Surviving term specs in declaration order; `MatchHit::term` indexes
    /// into this.
    terms: Vec<TermSpec>,
    /// Compiled literal/regex matchers, paired with their term index.
    regexes: Vec<(usize, Regex)>,
    /// All phrase terms in one automaton; `phrase_terms[pattern_id]` maps
    /// back to the term index.
    phrases: Option<AhoCorasick>,
    phrase_terms: Vec<usize>,
}

impl MatcherSet {
    /// Compile a term list. `group` names the context group, if any, for
    /// issue reporting. Bad terms are pushed onto `issues` and skipped.
    pub fn compile(
        class: HitClass,
        group: Option<&str>,
        specs: &[TermSpec],
        opts: &NormalizationOptions,
        issues: &mut Vec<PatternIssue>,
    ) -> Self {
        let mut terms = Vec::new();
        let mut regexes = Vec::new();
        let mut phrase_patterns: Vec<String> = Vec::new();
        let mut phrase_terms = Vec::new();

        let mut report = |pattern: &str, error: PatternError| {
            tracing::warn!(
                class = class.name(),
                group,
                pattern,
                %error,
                "dropping term that failed to compile"
            );
            issues.push(PatternIssue {
                class,
                group: group.map(str::to_owned),
                pattern: pattern.to_owned(),
                error,
            });
        };

        for spec in specs {
            let trimmed = spec.pattern.trim();
            if trimmed.is_empty() {
                report(&spec.pattern, PatternError::EmptyPattern);
                continue;
            }

            // A literal with interior whitespace can never satisfy
            // word-boundary semantics; it is a phrase.
            let kind = match spec.kind {
                TermKind::Literal if trimmed.contains(char::is_whitespace) => TermKind::Phrase,
                other => other,
            };

            // Folding can empty a pattern out entirely (e.g. bare accents).
            if matches!(kind, TermKind::Literal | TermKind::Phrase)
                && normalize(trimmed, opts).text.is_empty()
            {
                report(&spec.pattern, PatternError::EmptyPattern);
                continue;
            }

            let term_index = terms.len();
            match kind {
                TermKind::Literal => {
                    let folded = normalize(trimmed, opts).text;
                    let source = format!(r"\b{}\b", regex::escape(&folded));
                    match build_regex(&source, false) {
                        Ok(rx) => {
                            regexes.push((term_index, rx));
                            terms.push(spec.clone());
                        }
                        Err(error) => report(&spec.pattern, error),
                    }
                }
                TermKind::Phrase => {
                    phrase_patterns.push(normalize(trimmed, opts).text);
                    phrase_terms.push(term_index);
                    terms.push(spec.clone());
                }
                TermKind::Regex => {
                    // User regexes are taken as supplied, case-insensitive.
                    match build_regex(trimmed, true) {
                        Ok(rx) => {
                            regexes.push((term_index, rx));
                            terms.push(spec.clone());
                        }
                        Err(error) => report(&spec.pattern, error),
                    }
                }
            }
        }

        let phrases = if phrase_patterns.is_empty() {
            None
        } else {
            match AhoCorasick::new(&phrase_patterns) {
                Ok(ac) => Some(ac),
                Err(e) => {
                    // Automaton build failures are rare (e.g. pathological
                    // pattern counts); drop all phrase terms together.
                    for idx in phrase_terms.drain(..) {
                        report(
                            &terms[idx].pattern.clone(),
                            PatternError::RegexCompile {
                                message: e.to_string(),
                            },
                        );
                    }
                    None
                }
            }
        };

        Self {
            class,
            terms,
            regexes,
            phrases,
            phrase_terms,
        }
    }

    pub fn class(&self) -> HitClass {
        self.class
    }

    /// Surviving term specs, declaration order.
    pub fn terms(&self) -> &[TermSpec] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.regexes.is_empty() && self.phrases.is_none()
    }

    /// Run every matcher over `text`, returning hits sorted by span.
    ///
    /// Overlapping hits from different terms are all retained; hits with an
    /// identical span (and therefore identical matched text) collapse to
    /// the first-declared term. A matcher that produces more than
    /// [`MAX_HITS_PER_PATTERN`] hits is cut off for this record and a
    /// hazard is recorded.
    pub fn find_all(&self, text: &str, hazards: &mut SmallVec2<Hazard>) -> Vec<MatchHit> {
        let mut hits: Vec<MatchHit> = Vec::new();

        for (term_index, rx) in &self.regexes {
            let mut count = 0usize;
            for m in rx.find_iter(text) {
                if m.start() == m.end() {
                    continue;
                }
                count += 1;
                if count > MAX_HITS_PER_PATTERN {
                    self.record_cap(*term_index, hazards);
                    break;
                }
                hits.push(MatchHit {
                    span: Span::new(m.start(), m.end()),
                    text: m.as_str().to_owned(),
                    term: *term_index,
                });
            }
        }

        if let Some(ac) = &self.phrases {
            // Overlaps across patterns are wanted; overlaps of a pattern
            // with itself are not (each pattern scans left-to-right past
            // its previous match, like an independent substring search).
            let mut next_allowed = vec![0usize; self.phrase_terms.len()];
            let mut counts = vec![0usize; self.phrase_terms.len()];
            for m in ac.find_overlapping_iter(text) {
                let pattern = m.pattern().as_usize();
                if m.start() < next_allowed[pattern] {
                    continue;
                }
                let term_index = self.phrase_terms[pattern];
                counts[pattern] += 1;
                if counts[pattern] > MAX_HITS_PER_PATTERN {
                    self.record_cap(term_index, hazards);
                    next_allowed[pattern] = usize::MAX;
                    continue;
                }
                next_allowed[pattern] = m.end();
                hits.push(MatchHit {
                    span: Span::new(m.start(), m.end()),
                    text: text[m.start()..m.end()].to_owned(),
                    term: term_index,
                });
            }
        }

        hits.sort_by_key(|h| (h.span.start, h.span.end, h.term));
        hits.dedup_by(|b, a| a.span == b.span);
        hits
    }

    fn record_cap(&self, term_index: usize, hazards: &mut SmallVec2<Hazard>) {
        let pattern = self.terms[term_index].pattern.clone();
        tracing::warn!(
            class = self.class.name(),
            pattern = %pattern,
            cap = MAX_HITS_PER_PATTERN,
            "matcher hit cap exceeded, cutting off for this record"
        );
        hazards.push(Hazard::HitCapExceeded {
            pattern,
            cap: MAX_HITS_PER_PATTERN,
        });
    }
}

fn build_regex(source: &str, case_insensitive: bool) -> Result<Regex, PatternError> {
    RegexBuilder::new(source)
        .case_insensitive(case_insensitive)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|e| PatternError::RegexCompile {
            message: e.to_string(),
        })
}
