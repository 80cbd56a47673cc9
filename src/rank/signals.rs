//! The individual scoring signals.
//!
//! Each signal is a pure function of the normalized query and one candidate,
//! returning a value in `[0,1]`. The ranker composes them with the fixed
//! weights from [`ScoringWeights`](crate::config::ScoringWeights); keeping
//! them separate keeps each one independently testable.

use std::collections::HashSet;

use crate::normalize::is_stop_word;

use super::terms::{CONTRAST_CUES, MODALITY_WORDS};

/// Coverage of query tokens by the candidate plus a smaller symmetric
/// component for candidate precision. Adding a query token to the candidate
/// string never lowers this value.
pub(crate) fn token_overlap(query_tokens: &[String], cand_tokens: &[String]) -> f64 {
    let q: HashSet<&str> = query_tokens.iter().map(String::as_str).collect();
    let c: HashSet<&str> = cand_tokens.iter().map(String::as_str).collect();
    if q.is_empty() || c.is_empty() {
        return 0.0;
    }
    let inter = q.intersection(&c).count() as f64;
    let coverage = inter / q.len() as f64;
    let precision = inter / c.len() as f64;
    0.7 * coverage + 0.3 * precision
}

/// Graded prefix agreement over the normalized strings: whole-prefix either
/// way scores 1.0, a shared leading token 0.5, otherwise 0.0.
pub(crate) fn prefix_match(query_text: &str, cand_text: &str) -> f64 {
    if query_text.is_empty() || cand_text.is_empty() {
        return 0.0;
    }
    if cand_text.starts_with(query_text) || query_text.starts_with(cand_text) {
        return 1.0;
    }
    let q_first = query_text.split_whitespace().next();
    let c_first = cand_text.split_whitespace().next();
    if q_first.is_some() && q_first == c_first {
        0.5
    } else {
        0.0
    }
}

/// Site qualifiers are the query tokens that are neither modality words,
/// stop words, contrast cues, nor bare numbers. When the query names a
/// site, the signal is the (capped) fraction of site tokens the candidate
/// carries; a query with no site qualifier is neutral at 1.0.
pub(crate) fn site_agreement(query_tokens: &[String], cand_tokens: &[String]) -> f64 {
    let site: Vec<&str> = query_tokens
        .iter()
        .map(String::as_str)
        .filter(|t| !is_site_exempt(t))
        .collect();
    if site.is_empty() {
        return 1.0;
    }
    let c: HashSet<&str> = cand_tokens.iter().map(String::as_str).collect();
    let matched = site.iter().filter(|t| c.contains(**t)).count();
    // Two matched site tokens are as good as any number of them.
    let cap = site.len().min(2);
    (matched.min(cap)) as f64 / cap as f64
}

fn is_site_exempt(token: &str) -> bool {
    MODALITY_WORDS.contains(&token)
        || CONTRAST_CUES.contains(&token)
        || is_stop_word(token)
        || token.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Agreement on contrast-agent mention: 1.0 when query and candidate both
/// mention contrast or both do not, 0.0 on mismatch. A mismatch demotes but
/// never eliminates a candidate.
pub(crate) fn contrast_agreement(query_tokens: &[String], cand_tokens: &[String]) -> f64 {
    let wants = mentions_contrast(query_tokens);
    let has = mentions_contrast(cand_tokens);
    if wants == has { 1.0 } else { 0.0 }
}

fn mentions_contrast(tokens: &[String]) -> bool {
    tokens.iter().any(|t| CONTRAST_CUES.contains(&t.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn overlap_full_match_scores_one() {
        let score = token_overlap(&toks("aspirin 81 mg"), &toks("aspirin 81 mg"));
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn overlap_empty_sides_score_zero() {
        assert_eq!(token_overlap(&[], &toks("aspirin")), 0.0);
        assert_eq!(token_overlap(&toks("aspirin"), &[]), 0.0);
    }

    #[test]
    fn overlap_is_monotone_in_shared_tokens() {
        let query = toks("magnetic resonance imaging pelvis");
        let mut last = 0.0;
        for cand in [
            "unrelated words entirely",
            "magnetic unrelated words",
            "magnetic resonance words",
            "magnetic resonance imaging",
            "magnetic resonance imaging pelvis",
        ] {
            let score = token_overlap(&query, &toks(cand));
            assert!(
                score >= last,
                "overlap decreased at {cand:?}: {score} < {last}"
            );
            last = score;
        }
    }

    #[test]
    fn prefix_full_and_leading_token() {
        assert_eq!(prefix_match("aspirin 81", "aspirin 81 mg oral tablet"), 1.0);
        assert_eq!(prefix_match("aspirin tablet", "aspirin oral tablet"), 0.5);
        assert_eq!(prefix_match("ibuprofen", "aspirin"), 0.0);
        assert_eq!(prefix_match("", "aspirin"), 0.0);
    }

    #[test]
    fn site_neutral_without_qualifier() {
        // Pure modality query: nothing to agree or disagree on.
        let query = toks("magnetic resonance imaging");
        assert_eq!(site_agreement(&query, &toks("magnetic resonance imaging")), 1.0);
        assert_eq!(site_agreement(&query, &toks("completely different")), 1.0);
    }

    #[test]
    fn site_match_beats_generic() {
        let query = toks("magnetic resonance imaging pelvis");
        let with_site = site_agreement(&query, &toks("magnetic resonance imaging of pelvis"));
        let generic = site_agreement(&query, &toks("magnetic resonance imaging"));
        assert_eq!(with_site, 1.0);
        assert_eq!(generic, 0.0);
    }

    #[test]
    fn site_ignores_numbers_and_stop_words() {
        let query = toks("ct of the chest 3");
        let site: f64 = site_agreement(&query, &toks("computed tomography of chest"));
        assert_eq!(site, 1.0);
    }

    #[test]
    fn contrast_agreement_matches_both_ways() {
        let with = toks("mri brain with contrast");
        let without = toks("mri brain");
        assert_eq!(contrast_agreement(&with, &toks("mri brain contrast")), 1.0);
        assert_eq!(contrast_agreement(&with, &toks("mri brain")), 0.0);
        assert_eq!(contrast_agreement(&without, &toks("mri brain contrast")), 0.0);
        assert_eq!(contrast_agreement(&without, &toks("mri brain")), 1.0);
    }

    #[test]
    fn gadolinium_counts_as_contrast() {
        assert_eq!(
            contrast_agreement(&toks("mri gadolinium"), &toks("mri with contrast")),
            1.0
        );
    }
}
