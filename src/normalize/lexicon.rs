//! Acronym/synonym lexicon with longest-match-first expansion.
//!
//! The lexicon is built once from an externally loaded mapping (rebuild and
//! persistence are the collaborator's concern), merged over a small built-in
//! table, and shared read-only across workers for the lifetime of a run.

use std::collections::HashMap;

use tracing::debug;

use super::{clean, is_stop_word};

/// Expansions that are useful regardless of which vocabulary the external
/// mapping was derived from.
const BUILTIN: &[(&str, &str)] = &[
    ("us", "ultrasound"),
    ("sono", "ultrasonography"),
    ("prom", "premature rupture of membranes"),
    ("ct", "computed tomography"),
    ("mri", "magnetic resonance imaging"),
];

/// Surface token sequence → expansion tokens. Multi-word keys take
/// precedence over single-word keys at the same position.
///
/// Invariant: expansion is idempotent. Every stored expansion re-expands to
/// itself; entries that would violate this are dropped at construction, so
/// there are no chains and no cycles at lookup time.
#[derive(Debug, Clone)]
pub struct AcronymLexicon {
    entries: HashMap<Vec<String>, Vec<String>>,
    max_key_len: usize,
}

impl AcronymLexicon {
    /// Lexicon containing only the built-in expansions.
    pub fn builtin() -> Self {
        Self::from_entries(std::iter::empty())
    }

    /// Builds a lexicon from `surface → expansion` pairs merged over the
    /// built-in table; external entries win on conflict. Keys and expansions
    /// are normalized to the same token form queries are, and entries whose
    /// expansion is not a fixed point of expansion are discarded.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut map: HashMap<Vec<String>, Vec<String>> = HashMap::new();
        let builtin = BUILTIN
            .iter()
            .map(|(s, e)| ((*s).to_string(), (*e).to_string()));
        for (surface, expansion) in builtin.chain(entries) {
            let key: Vec<String> = clean(&surface).split_whitespace().map(String::from).collect();
            let exp: Vec<String> = clean(&expansion)
                .split_whitespace()
                .map(String::from)
                .collect();
            if key.is_empty() || exp.is_empty() {
                continue;
            }
            map.insert(key, exp);
        }

        let mut max_key_len = map.keys().map(Vec::len).max().unwrap_or(0);

        // Drop entries whose expansion would expand again. Removing one entry
        // can make another's expansion a fixed point, so iterate to stability.
        loop {
            let unstable: Vec<Vec<String>> = map
                .iter()
                .filter(|(_, exp)| expand_tokens(&map, max_key_len, exp) != **exp)
                .map(|(key, _)| key.clone())
                .collect();
            if unstable.is_empty() {
                break;
            }
            for key in &unstable {
                debug!(key = %key.join(" "), "dropping non-idempotent lexicon entry");
                map.remove(key);
            }
        }
        max_key_len = map.keys().map(Vec::len).max().unwrap_or(0);

        Self {
            entries: map,
            max_key_len,
        }
    }

    /// Builds a lexicon from a JSON object of `{"surface": "expansion"}`
    /// pairs, the shape the external acronym cache is stored in.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self::from_entries(raw))
    }

    /// Replaces every matched key window with its expansion, longest match
    /// first, never rescanning emitted tokens. Interior stop words pass
    /// through without lookup.
    pub fn expand(&self, tokens: &[String]) -> Vec<String> {
        expand_tokens(&self.entries, self.max_key_len, tokens)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn expand_tokens(
    entries: &HashMap<Vec<String>, Vec<String>>,
    max_key_len: usize,
    tokens: &[String],
) -> Vec<String> {
    let n = tokens.len();
    let mut out = Vec::with_capacity(n);
    let mut i = 0;
    while i < n {
        if i > 0 && i + 1 < n && is_stop_word(&tokens[i]) {
            out.push(tokens[i].clone());
            i += 1;
            continue;
        }
        let longest = max_key_len.min(n - i);
        let mut advanced = 0;
        for len in (1..=longest).rev() {
            if let Some(expansion) = entries.get(&tokens[i..i + len]) {
                out.extend(expansion.iter().cloned());
                advanced = len;
                break;
            }
        }
        if advanced == 0 {
            out.push(tokens[i].clone());
            advanced = 1;
        }
        i += advanced;
    }
    out
}
