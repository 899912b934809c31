//! Whitespace normalization, sentence splitting and chunking.
//!
//! Sentence boundaries are purely punctuation based: a `.`, `!` or `?`
//! followed by whitespace ends a sentence. Abbreviations ("e.g. "), initials
//! and decimal numbers followed by a space are split like any other boundary.

use regex::Regex;
use std::sync::OnceLock;

/// Sentences at or below this many characters (after trimming) are dropped.
pub const MIN_SENTENCE_CHARS: usize = 30;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

fn boundary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]\s+").expect("static regex"))
}

/// Collapses every whitespace run into a single space.
pub fn normalize_whitespace(text: &str) -> String {
    whitespace_re().replace_all(text, " ").into_owned()
}

pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in boundary_re().find_iter(text) {
        // Keep the punctuation mark, drop the whitespace after it.
        let end = m.start() + 1;
        push_sentence(&mut sentences, &text[start..end]);
        start = m.end();
    }
    push_sentence(&mut sentences, &text[start..]);

    sentences
}

fn push_sentence(out: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if trimmed.chars().count() > MIN_SENTENCE_CHARS {
        out.push(trimmed.to_string());
    }
}

/// Splits `text` into chunks of at most `max_chars` characters, cutting just
/// after the last `.` inside the window.
///
/// When a window holds no `.` the chunk runs on to the next `.` (or the end of
/// the text), so such chunks can be longer than `max_chars`.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest = text.trim();
    let max_chars = max_chars.max(1);

    while !rest.is_empty() {
        let limit = match rest.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => byte_idx,
            None => {
                chunks.push(rest.to_string());
                break;
            }
        };

        let cut = match rest[..limit].rfind('.') {
            Some(dot) => dot + 1,
            None => rest[limit..]
                .find('.')
                .map(|dot| limit + dot + 1)
                .unwrap_or(rest.len()),
        };

        let chunk = rest[..cut].trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        rest = rest[cut..].trim_start();
    }

    chunks
}
