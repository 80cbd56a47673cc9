//! Terminology preference tables: term-type priority orders per system and
//! semantic-type admissibility per entity type.

use crate::types::{EntityType, System};

/// RxNorm term types, best first: clinical-drug forms, then packs and
/// components, then ingredient forms, then brand/abbreviation forms.
const RX_TTY_ORDER: &[&str] = &[
    "SCD", "SBD", "GPCK", "BPCK", "SCDC", "SCDG", "SCDF", "SCDGP", "SBDF", "SBDFP", "SBDC",
    "SBDG", "SCDFP", "MIN", "PIN", "IN", "PSN", "BN", "DF", "DFG", "SY", "TMSY", "ET",
];

/// SNOMED term types, best first: Preferred Term, Synonym, Fully Specified Name.
const SNOMED_TTY_ORDER: &[&str] = &["PT", "SY", "FN"];

const DIAGNOSIS_STY: &[&str] = &[
    "disease or syndrome",
    "mental or behavioral dysfunction",
    "neoplastic process",
    "anatomical abnormality",
    "acquired abnormality",
    "finding",
    "sign or symptom",
    "pathologic function",
    "injury or poisoning",
    "congenital abnormality",
    "cell or molecular dysfunction",
];

const PROCEDURE_STY: &[&str] = &[
    "therapeutic or preventive procedure",
    "diagnostic procedure",
    "laboratory procedure",
    "health care activity",
    "drug delivery device",
    "medical device",
    "clinical drug",
];

const LAB_STY: &[&str] = &[
    "laboratory or test result",
    "laboratory procedure",
    "diagnostic procedure",
    "clinical attribute",
    "quantitative concept",
    "indicator, reagent, or diagnostic aid",
    "chemical viewed functionally",
    "chemical viewed structurally",
    "body substance",
];

/// Modality/imaging words that never count as anatomical site qualifiers.
pub(crate) const MODALITY_WORDS: &[&str] = &[
    "mri",
    "magnetic",
    "resonance",
    "ct",
    "ultrasound",
    "us",
    "x",
    "xray",
    "x-ray",
    "xr",
    "scan",
    "imaging",
    "tomography",
];

/// Post-normalization tokens that signal a contrast-agent mention.
pub(crate) const CONTRAST_CUES: &[&str] = &["contrast", "gad", "gadolinium"];

/// Position of `tty` in the system's preference order; `None` for unknown
/// term types (retired or administrative forms outside the table).
pub fn tty_priority(system: System, tty: &str) -> Option<usize> {
    let order = match system {
        System::Rxnorm => RX_TTY_ORDER,
        System::SnomedCtUs => SNOMED_TTY_ORDER,
    };
    order.iter().position(|t| *t == tty)
}

/// TTY preference scaled to `[0,1]`: the best term type scores 1.0, each
/// following step less, unknown term types 0.0.
pub(crate) fn term_preference(system: System, tty: &str) -> f64 {
    let len = match system {
        System::Rxnorm => RX_TTY_ORDER.len(),
        System::SnomedCtUs => SNOMED_TTY_ORDER.len(),
    };
    match tty_priority(system, tty) {
        Some(i) => 1.0 - i as f64 / len as f64,
        None => 0.0,
    }
}

/// Hard admissibility gate: a candidate with a semantic type outside the
/// entity type's allowed set must not be scored at all. Rows with no
/// semantic type pass (RxNorm rows), as does Medicine, which has no allowlist.
pub fn sty_allowed(entity_type: EntityType, sty: Option<&str>) -> bool {
    let allowed = match entity_type {
        EntityType::Medicine => return true,
        EntityType::Diagnosis => DIAGNOSIS_STY,
        EntityType::Procedure => PROCEDURE_STY,
        EntityType::Lab => LAB_STY,
    };
    match sty {
        None => true,
        Some(s) => {
            let s = s.trim().to_lowercase();
            s.is_empty() || allowed.contains(&s.as_str())
        }
    }
}
