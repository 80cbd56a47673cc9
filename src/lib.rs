//! # medmap
//!
//! Maps free-text clinical entity mentions (medication names, diagnoses,
//! procedures, lab tests) onto codes in standard medical terminologies:
//! SNOMED CT for clinical concepts, RxNorm for medications.
//!
//! This crate is the normalization-to-selection core. Surrounding I/O
//! (spreadsheet parsing, vocabulary loading from columnar files, acronym
//! cache persistence) lives in external collaborators that feed this
//! pipeline through narrow contracts.
//!
//! ## Pipeline
//!
//! - [`Normalizer`] lowercases, strips punctuation noise, and expands
//!   acronyms against a shared [`AcronymLexicon`]
//! - [`route()`] maps the entity type to its target [`System`]
//! - a [`Retriever`] implementation (external, typically a BM25 index over
//!   vocabulary strings) returns the top-K lexical candidates
//! - [`rank()`] filters by semantic-type admissibility and orders candidates
//!   by a weighted sum of five pure scoring signals
//! - [`pick_display`] selects the single best display row per code under
//!   per-terminology term-type preference
//! - [`Pipeline`] drives it all and emits one [`OutputRow`] per input row,
//!   isolating row-level failures from the batch
//!
//! Queries are stateless and independent: the lexicon is loaded once,
//! shared by `Arc`, and never mutated during a run, so batches process
//! concurrently with output reassembled in input order.

pub mod config;
pub mod display;
pub mod normalize;
pub mod pipeline;
pub mod rank;
pub mod retrieve;
pub mod route;
pub mod types;

pub use config::{ConfigError, PipelineConfig, ScoringWeights};
pub use display::pick_display;
pub use normalize::lexicon::AcronymLexicon;
pub use normalize::{NormalizeError, Normalizer};
pub use pipeline::{MapError, Pipeline};
pub use rank::rank;
pub use retrieve::{RetrievalError, Retriever};
pub use route::{RouteError, route};
pub use types::{
    Candidate, DisplayChoice, EntityType, NormalizedQuery, OutputRow, Query, RankedCandidate,
    System,
};
