//! Text normalization with acronym/synonym expansion.
//!
//! Normalization is a pure function: lowercase, strip punctuation noise
//! (keeping hyphens and decimal points that carry dosage meaning), collapse
//! whitespace, tokenize, then expand acronyms against the shared lexicon.
//! The expanded string doubles as the retrieval query.

pub mod lexicon;

use std::sync::Arc;

use encoding_rs::UTF_8;

use crate::types::NormalizedQuery;
use lexicon::AcronymLexicon;

/// Kept in the middle of a phrase, never treated as lexicon keys there.
const STOP_WORDS: &[&str] = &["a", "an", "and", "the", "for", "in", "of", "on", "with"];

pub(crate) fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("input bytes are not valid UTF-8 text")]
    Encoding,

    #[error("input normalized to the empty string: {0:?}")]
    EmptyInput(String),
}

/// Minimal cleanup: lowercase, map punctuation to spaces, collapse runs of
/// whitespace. Hyphens joining alphanumerics ("x-ray") and decimal points
/// inside numbers ("0.5") survive; everything else non-alphanumeric does not.
pub(crate) fn clean(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let chars: Vec<char> = lower.chars().collect();
    let mut kept = String::with_capacity(lower.len());
    for (i, c) in chars.iter().enumerate() {
        let keep = match c {
            'a'..='z' | '0'..='9' => true,
            '-' => {
                i > 0
                    && i + 1 < chars.len()
                    && chars[i - 1].is_ascii_alphanumeric()
                    && chars[i + 1].is_ascii_alphanumeric()
            }
            '.' => {
                i > 0
                    && i + 1 < chars.len()
                    && chars[i - 1].is_ascii_digit()
                    && chars[i + 1].is_ascii_digit()
            }
            _ => false,
        };
        kept.push(if keep { *c } else { ' ' });
    }
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes raw mention text into a [`NormalizedQuery`].
///
/// Holds the lexicon by `Arc` so one instance can be shared by reference
/// across concurrent workers; nothing here mutates after construction.
#[derive(Debug, Clone)]
pub struct Normalizer {
    lexicon: Arc<AcronymLexicon>,
}

impl Normalizer {
    pub fn new(lexicon: Arc<AcronymLexicon>) -> Self {
        Self { lexicon }
    }

    /// Pure normalization: same input always yields the same output.
    /// Input that is empty after cleanup yields the empty query, not an error.
    pub fn normalize(&self, raw: &str) -> NormalizedQuery {
        let cleaned = clean(raw);
        if cleaned.is_empty() {
            return NormalizedQuery::empty();
        }
        let tokens: Vec<String> = cleaned.split_whitespace().map(String::from).collect();
        let expanded = self.lexicon.expand(&tokens);
        let expanded_text = expanded.join(" ");
        NormalizedQuery {
            tokens: expanded,
            expanded_text,
        }
    }

    /// Like [`normalize`](Self::normalize) for input whose encoding is not
    /// guaranteed. Malformed byte sequences are an error rather than being
    /// silently replaced.
    pub fn normalize_bytes(&self, raw: &[u8]) -> Result<NormalizedQuery, NormalizeError> {
        let (text, had_errors) = UTF_8.decode_with_bom_removal(raw);
        if had_errors {
            return Err(NormalizeError::Encoding);
        }
        Ok(self.normalize(&text))
    }
}
