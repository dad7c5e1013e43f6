//! Token and sentence proximity between span sets.
//!
//! Tokens are maximal word-character runs in the normalized text, indexed
//! once per record. A span maps to the token containing (or, for offsets in
//! inter-token gaps, following the end of) its start offset via binary
//! search, and two span sets are "near" when any pair of their token
//! indices differs by at most the profile window. The sentence scope
//! instead asks whether any pair of spans starts inside the same sentence.

use std::sync::OnceLock;

use regex::Regex;

use triagem_core::errors::EquationError;
use triagem_core::types::span::Span;

fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\w+").expect("word regex is valid"))
}

/// Proximity scope for `WITHIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Tokens,
    Sentence,
}

impl Scope {
    /// Parse a scope name. `paragraph` is an accepted alias for sentence
    /// scope.
    pub fn parse(name: &str) -> Result<Self, EquationError> {
        match name {
            "tokens" => Ok(Self::Tokens),
            "sentence" | "paragraph" => Ok(Self::Sentence),
            other => Err(EquationError::InvalidScope {
                name: other.to_owned(),
            }),
        }
    }
}

/// Sorted start offsets of every token in one record's normalized text.
#[derive(Debug, Clone)]
pub struct TokenIndex {
    starts: Vec<usize>,
}

impl TokenIndex {
    pub fn new(text: &str) -> Self {
        let starts = word_regex().find_iter(text).map(|m| m.start()).collect();
        Self { starts }
    }

    /// Token index for a byte offset (bisect-right over token starts).
    pub fn token_at(&self, offset: usize) -> usize {
        self.starts.partition_point(|&s| s <= offset)
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

/// True iff some span of `a` starts within `window` tokens of some span of
/// `b`. An empty side is never near anything.
pub fn near_tokens(index: &TokenIndex, a: &[Span], b: &[Span], window: u32) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let window = window as usize;
    for sa in a {
        let ia = index.token_at(sa.start);
        for sb in b {
            let ib = index.token_at(sb.start);
            if ia.abs_diff(ib) <= window {
                return true;
            }
        }
    }
    false
}

/// Sentence spans of the normalized text. A `.`, `!`, or `?` ends its
/// sentence (terminator included); a trailing remainder is its own
/// sentence.
pub fn sentences(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut start = 0usize;
    for (i, ch) in text.char_indices() {
        if matches!(ch, '.' | '!' | '?') {
            let end = i + ch.len_utf8();
            spans.push(Span::new(start, end));
            start = end;
        }
    }
    if start < text.len() {
        spans.push(Span::new(start, text.len()));
    }
    spans
}

/// True iff some span of `a` and some span of `b` start inside the same
/// sentence.
pub fn near_sentence(sentence_spans: &[Span], a: &[Span], b: &[Span]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    for sa in a {
        for sb in b {
            if sentence_spans
                .iter()
                .any(|s| s.contains(sa.start) && s.contains(sb.start))
            {
                return true;
            }
        }
    }
    false
}
