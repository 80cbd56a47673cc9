//! Candidate re-ranking: hard semantic-type filtering, then a weighted sum
//! of five pure signals, then a fully deterministic sort.

pub mod terms;

mod signals;

use std::cmp::Ordering;

use tracing::debug;

use crate::config::ScoringWeights;
use crate::normalize::clean;
use crate::types::{Candidate, EntityType, NormalizedQuery, RankedCandidate};

use signals::{contrast_agreement, prefix_match, site_agreement, token_overlap};
use terms::{sty_allowed, term_preference, tty_priority};

/// Scores and orders retrieved candidates for one query.
///
/// Candidates whose semantic type is outside the entity type's allowed set
/// are removed before scoring: admissibility is a hard filter, not a
/// penalty. An empty result is the soft NO_MATCH signal, never an error.
///
/// Ordering is deterministic for identical inputs: `final_score`
/// descending, then better term-type priority, then lexicographic code,
/// then lexicographic display text.
pub fn rank(
    query: &NormalizedQuery,
    entity_type: EntityType,
    candidates: Vec<Candidate>,
    weights: &ScoringWeights,
) -> Vec<RankedCandidate> {
    let admitted: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| sty_allowed(entity_type, c.sty.as_deref()))
        .collect();
    if admitted.is_empty() {
        debug!(entity_type = %entity_type, "no admissible candidates after semantic-type filter");
        return Vec::new();
    }

    let mut scored: Vec<(Candidate, f64, usize)> = admitted
        .into_iter()
        .map(|cand| {
            let score = final_score(query, &cand, weights);
            let tty_rank = tty_priority(cand.system, &cand.tty).unwrap_or(usize::MAX);
            (cand, score, tty_rank)
        })
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.2.cmp(&b.2))
            .then_with(|| a.0.code.cmp(&b.0.code))
            .then_with(|| a.0.text.cmp(&b.0.text))
    });

    scored
        .into_iter()
        .enumerate()
        .map(|(rank, (candidate, final_score, _))| RankedCandidate {
            candidate,
            final_score,
            rank,
        })
        .collect()
}

/// Weighted sum of the five signals. Each signal is in `[0,1]` and the
/// weights sum to 1.0, so the result is already normalized.
fn final_score(query: &NormalizedQuery, cand: &Candidate, weights: &ScoringWeights) -> f64 {
    let cand_text = clean(&cand.text);
    let cand_tokens: Vec<String> = cand_text.split_whitespace().map(String::from).collect();

    weights.token_overlap * token_overlap(&query.tokens, &cand_tokens)
        + weights.site * site_agreement(&query.tokens, &cand_tokens)
        + weights.contrast * contrast_agreement(&query.tokens, &cand_tokens)
        + weights.term_preference * term_preference(cand.system, &cand.tty)
        + weights.prefix * prefix_match(&query.expanded_text, &cand_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::System;

    fn query(text: &str) -> NormalizedQuery {
        NormalizedQuery {
            tokens: text.split_whitespace().map(String::from).collect(),
            expanded_text: text.to_string(),
        }
    }

    fn snomed(code: &str, text: &str, tty: &str, sty: &str) -> Candidate {
        Candidate {
            code: code.into(),
            system: System::SnomedCtUs,
            text: text.into(),
            tty: tty.into(),
            sty: Some(sty.into()),
            lexical_score: 0.0,
        }
    }

    fn rx(code: &str, text: &str, tty: &str) -> Candidate {
        Candidate {
            code: code.into(),
            system: System::Rxnorm,
            text: text.into(),
            tty: tty.into(),
            sty: None,
            lexical_score: 0.0,
        }
    }

    #[test]
    fn site_specific_candidate_outranks_generic() {
        let q = query("magnetic resonance imaging pelvis");
        let ranked = rank(
            &q,
            EntityType::Procedure,
            vec![
                snomed("113091000", "Magnetic resonance imaging", "PT", "Diagnostic Procedure"),
                snomed(
                    "241615005",
                    "Magnetic resonance imaging of pelvis",
                    "PT",
                    "Diagnostic Procedure",
                ),
            ],
            &ScoringWeights::default(),
        );
        assert_eq!(ranked[0].candidate.code, "241615005");
        assert!(ranked[0].final_score > ranked[1].final_score);
    }

    #[test]
    fn inadmissible_sty_is_filtered_not_downranked() {
        let q = query("chest pain");
        let ranked = rank(
            &q,
            EntityType::Diagnosis,
            vec![
                snomed("29857009", "Chest pain", "PT", "Sign or Symptom"),
                snomed("399208008", "Plain chest X-ray", "PT", "Diagnostic Procedure"),
            ],
            &ScoringWeights::default(),
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].candidate.code, "29857009");
    }

    #[test]
    fn all_filtered_yields_empty_not_error() {
        let q = query("chest pain");
        let ranked = rank(
            &q,
            EntityType::Diagnosis,
            vec![snomed("399208008", "Plain chest X-ray", "PT", "Diagnostic Procedure")],
            &ScoringWeights::default(),
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn empty_candidate_set_yields_empty() {
        let ranked = rank(
            &query("anything"),
            EntityType::Lab,
            vec![],
            &ScoringWeights::default(),
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn ranking_is_deterministic() {
        let q = query("aspirin 81 mg oral tablet");
        let candidates = vec![
            rx("243670", "aspirin 81 MG Oral Tablet", "SCD"),
            rx("1191", "aspirin", "IN"),
            rx("215568", "Ecotrin", "BN"),
        ];
        let first = rank(&q, EntityType::Medicine, candidates.clone(), &ScoringWeights::default());
        let second = rank(&q, EntityType::Medicine, candidates, &ScoringWeights::default());
        let order = |r: &[RankedCandidate]| {
            r.iter().map(|c| c.candidate.code.clone()).collect::<Vec<_>>()
        };
        assert_eq!(order(&first), order(&second));
        assert_eq!(first[0].candidate.code, "243670");
    }

    #[test]
    fn score_ties_break_by_code_when_tty_equal() {
        let q = query("chest pain");
        let ranked = rank(
            &q,
            EntityType::Diagnosis,
            vec![
                snomed("900002", "Chest pain", "PT", "Sign or Symptom"),
                snomed("900001", "Chest pain", "PT", "Sign or Symptom"),
            ],
            &ScoringWeights::default(),
        );
        assert_eq!(ranked[0].candidate.code, "900001");
        assert_eq!(ranked[1].candidate.code, "900002");
    }

    #[test]
    fn tty_breaks_exact_score_ties() {
        let q = query("chest pain");
        let ranked = rank(
            &q,
            EntityType::Diagnosis,
            // Zero term weight makes the weighted sums exactly equal, so the
            // TTY tie-break is what puts PT first.
            vec![
                snomed("900001", "Chest pain", "SY", "Sign or Symptom"),
                snomed("900002", "Chest pain", "PT", "Sign or Symptom"),
            ],
            &ScoringWeights {
                token_overlap: 0.48,
                site: 0.32,
                contrast: 0.12,
                term_preference: 0.0,
                prefix: 0.08,
            },
        );
        assert_eq!(ranked[0].candidate.tty, "PT");
    }

    #[test]
    fn rank_indices_are_sequential_and_scores_non_increasing() {
        let q = query("magnetic resonance imaging pelvis");
        let ranked = rank(
            &q,
            EntityType::Procedure,
            vec![
                snomed("1", "Magnetic resonance imaging of pelvis", "PT", "Diagnostic Procedure"),
                snomed("2", "Magnetic resonance imaging", "PT", "Diagnostic Procedure"),
                snomed("3", "Ultrasound of pelvis", "PT", "Diagnostic Procedure"),
            ],
            &ScoringWeights::default(),
        );
        for (i, rc) in ranked.iter().enumerate() {
            assert_eq!(rc.rank, i);
            if i > 0 {
                assert!(rc.final_score <= ranked[i - 1].final_score);
            }
        }
    }

    #[test]
    fn contrast_mismatch_demotes_but_keeps_candidate() {
        let q = query("computed tomography head");
        let ranked = rank(
            &q,
            EntityType::Procedure,
            vec![
                snomed(
                    "303653007",
                    "Computed tomography of head",
                    "PT",
                    "Diagnostic Procedure",
                ),
                snomed(
                    "408754009",
                    "Computed tomography of head with contrast",
                    "PT",
                    "Diagnostic Procedure",
                ),
            ],
            &ScoringWeights::default(),
        );
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].candidate.code, "303653007");
    }
}
