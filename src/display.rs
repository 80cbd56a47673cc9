//! Per-code display-string selection.
//!
//! The ranker decides which codes are in play; this module only decides how
//! each of those codes should read. RxNorm prefers clinical-drug forms over
//! component, ingredient, and brand forms; SNOMED prefers the Preferred
//! Term class. Rows are taken solely from the ranked set, so a code the
//! ranker did not admit can never surface here.

use std::collections::HashMap;

use crate::rank::terms::tty_priority;
use crate::types::{DisplayChoice, RankedCandidate};

/// Selects exactly one display row per distinct code, codes emitted in
/// first-seen rank order.
///
/// Within one code: best known term-type priority wins; ties inside a
/// term-type class go to the shorter display string, then lexicographic.
/// A code with no recognized term type at all falls back to its
/// highest-ranked row.
pub fn pick_display(ranked: &[RankedCandidate]) -> Vec<DisplayChoice> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_code: HashMap<&str, Vec<&RankedCandidate>> = HashMap::new();
    for rc in ranked {
        let code = rc.candidate.code.as_str();
        by_code
            .entry(code)
            .or_insert_with(|| {
                order.push(code);
                Vec::new()
            })
            .push(rc);
    }

    order
        .into_iter()
        .map(|code| {
            let rows = &by_code[code];
            let best = select_row(rows);
            DisplayChoice {
                code: best.candidate.code.clone(),
                system: best.candidate.system,
                chosen_text: best.candidate.text.clone(),
                chosen_tty: best.candidate.tty.clone(),
            }
        })
        .collect()
}

fn select_row<'a>(rows: &[&'a RankedCandidate]) -> &'a RankedCandidate {
    rows.iter()
        .copied()
        .filter(|rc| tty_priority(rc.candidate.system, &rc.candidate.tty).is_some())
        .min_by_key(|rc| {
            (
                tty_priority(rc.candidate.system, &rc.candidate.tty),
                rc.candidate.text.len(),
                rc.candidate.text.clone(),
            )
        })
        // Rows arrive in rank order, so the first is the highest-scoring.
        .unwrap_or(rows[0])
}
