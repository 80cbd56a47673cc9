use serde::{Deserialize, Serialize};
use std::fmt;

/// Target coding system a query is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum System {
    /// SNOMED CT, US edition: procedures, diagnoses, lab tests.
    #[serde(rename = "SNOMEDCT_US")]
    SnomedCtUs,
    /// RxNorm: medications.
    #[serde(rename = "RXNORM")]
    Rxnorm,
}

impl System {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SnomedCtUs => "SNOMEDCT_US",
            Self::Rxnorm => "RXNORM",
        }
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recognized entity-type labels. Input rows carry these as free text;
/// [`EntityType::parse`](crate::route) rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Medicine,
    Procedure,
    Diagnosis,
    Lab,
}

impl EntityType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Medicine => "Medicine",
            Self::Procedure => "Procedure",
            Self::Diagnosis => "Diagnosis",
            Self::Lab => "Lab",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One input row: the mention text plus its entity-type label as supplied
/// by the caller. The label stays a string here so a bad value fails that
/// row inside the batch instead of failing input parsing up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub raw_text: String,
    pub entity_type: String,
}

impl Query {
    pub fn new(raw_text: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            entity_type: entity_type.into(),
        }
    }
}

/// Deterministic normalization of a query: the token sequence and the
/// reconstructed expanded string used as the retrieval query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub tokens: Vec<String>,
    pub expanded_text: String,
}

impl NormalizedQuery {
    pub fn empty() -> Self {
        Self {
            tokens: Vec::new(),
            expanded_text: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// One vocabulary row returned by the retrieval capability.
///
/// Field aliases match the upstream vocabulary column names so columnar
/// loaders can deserialize rows directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(alias = "CODE")]
    pub code: String,
    pub system: System,
    /// Display text (the vocabulary `STR` column).
    #[serde(alias = "STR")]
    pub text: String,
    /// Term type (representation class), e.g. `PT`, `SCD`, `IN`.
    #[serde(alias = "TTY")]
    pub tty: String,
    /// Semantic type; absent on RxNorm rows.
    #[serde(default, alias = "STY")]
    pub sty: Option<String>,
    /// Opaque lexical-similarity score from the retriever. Comparable only
    /// within one retrieval call; never enters the final score.
    #[serde(default, alias = "retrieval_score")]
    pub lexical_score: f64,
}

/// A candidate with its combined heuristic score and position in the
/// ranking. `final_score` is non-increasing with `rank`.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub candidate: Candidate,
    pub final_score: f64,
    pub rank: usize,
}

/// The single display row selected for one code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayChoice {
    pub code: String,
    pub system: System,
    pub chosen_text: String,
    pub chosen_tty: String,
}

/// One output row, positionally matching its input row. `output_code` and
/// `output_description` are `None` when no admissible candidate was found;
/// `output_system` stays set whenever routing succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputRow {
    #[serde(rename = "Input Entity Description")]
    pub input_text: String,
    #[serde(rename = "Entity Type")]
    pub entity_type: String,
    #[serde(rename = "Output Coding System")]
    pub output_system: Option<System>,
    #[serde(rename = "Output Target Code")]
    pub output_code: Option<String>,
    #[serde(rename = "Output Target Description")]
    pub output_description: Option<String>,
}

impl OutputRow {
    pub fn matched(query: &Query, system: System, code: String, description: String) -> Self {
        Self {
            input_text: query.raw_text.clone(),
            entity_type: query.entity_type.clone(),
            output_system: Some(system),
            output_code: Some(code),
            output_description: Some(description),
        }
    }

    pub fn no_match(query: &Query, system: Option<System>) -> Self {
        Self {
            input_text: query.raw_text.clone(),
            entity_type: query.entity_type.clone(),
            output_system: system,
            output_code: None,
            output_description: None,
        }
    }

    pub fn is_no_match(&self) -> bool {
        self.output_code.is_none()
    }
}
