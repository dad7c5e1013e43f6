//! Text normalization with an offset back-map.
//!
//! Normalization folds diacritics (NFKD decomposition, combining marks
//! dropped) and lowercases, per the profile flags. Folding one raw
//! character can emit zero or more normalized characters, so every emitted
//! byte records the byte offset of the raw character it came from. The
//! back-map is used twice per record: matching runs over the normalized
//! text, and highlight spans are projected back through the map onto the
//! raw text.

use std::iter;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use triagem_core::config::NormalizationOptions;
use triagem_core::types::span::Span;

/// Normalized text plus per-byte provenance.
///
/// `back_map[i]` is the byte offset of the raw character that produced
/// `text` byte `i`. The map is non-decreasing and has exactly `text.len()`
/// entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub back_map: Vec<usize>,
}

impl Normalized {
    /// Project a span over the normalized text onto the raw text it came
    /// from. Returns `None` for empty or out-of-bounds spans.
    pub fn project(&self, raw: &str, span: Span) -> Option<Span> {
        project_span(raw, &self.back_map, span)
    }
}

/// Normalize `text` according to `opts`, keeping the offset back-map.
pub fn normalize(text: &str, opts: &NormalizationOptions) -> Normalized {
    let mut out = String::with_capacity(text.len());
    let mut back_map = Vec::with_capacity(text.len());

    for (raw_idx, raw_ch) in text.char_indices() {
        if opts.strip_accents {
            // Decompose one character at a time so every folded character
            // keeps the offset of the character it replaced.
            for folded in iter::once(raw_ch).nfkd().filter(|c| !is_combining_mark(*c)) {
                emit(&mut out, &mut back_map, raw_idx, folded, opts.lowercase);
            }
        } else {
            emit(&mut out, &mut back_map, raw_idx, raw_ch, opts.lowercase);
        }
    }

    Normalized { text: out, back_map }
}

fn emit(out: &mut String, back_map: &mut Vec<usize>, raw_idx: usize, ch: char, lowercase: bool) {
    if lowercase {
        for lower in ch.to_lowercase() {
            push_mapped(out, back_map, raw_idx, lower);
        }
    } else {
        push_mapped(out, back_map, raw_idx, ch);
    }
}

fn push_mapped(out: &mut String, back_map: &mut Vec<usize>, raw_idx: usize, ch: char) {
    out.push(ch);
    for _ in 0..ch.len_utf8() {
        back_map.push(raw_idx);
    }
}

/// Map a normalized-text span to the raw-text range that produced it.
///
/// The start maps to the start of its originating character; the end
/// extends to the end of the character that produced the span's last byte,
/// so the result is always character-aligned in the raw text.
pub fn project_span(raw: &str, back_map: &[usize], span: Span) -> Option<Span> {
    if span.start >= span.end || span.end > back_map.len() {
        return None;
    }
    let raw_start = back_map[span.start];
    let last_char_start = back_map[span.end - 1];
    let raw_end = raw[last_char_start..]
        .chars()
        .next()
        .map(|c| last_char_start + c.len_utf8())
        .unwrap_or(raw.len());
    Some(Span::new(raw_start, raw_end))
}
