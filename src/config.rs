//! Pipeline configuration with sensible defaults.
//!
//! [`PipelineConfig`] controls retrieval depth, batch concurrency, strict
//! normalization, and the scoring weights. Weights are fixed per run; they
//! are part of the scoring contract, never query-dependent.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid pipeline config: {0}")]
    Invalid(String),
}

/// Weights for the five ranking signals. Each signal is scaled to `[0,1]`
/// before weighting, and the weights sum to 1.0, so the final score is in
/// `[0,1]` without further normalization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Query-token coverage with a symmetric precision component.
    pub token_overlap: f64,
    /// Anatomical-site qualifier agreement.
    pub site: f64,
    /// Contrast-agent mention agreement.
    pub contrast: f64,
    /// Per-system term-type preference.
    pub term_preference: f64,
    /// Leading-token / whole-prefix agreement.
    pub prefix: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            token_overlap: 0.38,
            site: 0.32,
            contrast: 0.12,
            term_preference: 0.10,
            prefix: 0.08,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.token_overlap + self.site + self.contrast + self.term_preference + self.prefix
    }
}

/// Configuration for one processing run.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides. Validated once at pipeline construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// How many candidates to request from the retrieval capability per query.
    pub top_k: usize,
    /// Maximum number of queries mapped concurrently in a batch.
    pub concurrency: usize,
    /// When true, input that normalizes to the empty string fails its row
    /// instead of resolving to NO_MATCH.
    pub strict_normalization: bool,
    pub weights: ScoringWeights,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: 25,
            concurrency: 8,
            strict_normalization: false,
            weights: ScoringWeights::default(),
        }
    }
}

impl PipelineConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `top_k` and `concurrency` must be greater than 0
    /// - all weights must be non-negative and sum to 1.0
    /// - the site weight must exceed prefix + contrast + term-preference
    ///   combined, so a site-specific candidate with equal token overlap can
    ///   never be outranked by a generic one
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::Invalid("top_k must be greater than 0".into()));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "concurrency must be greater than 0".into(),
            ));
        }
        let w = &self.weights;
        let all = [
            w.token_overlap,
            w.site,
            w.contrast,
            w.term_preference,
            w.prefix,
        ];
        if all.iter().any(|v| *v < 0.0) {
            return Err(ConfigError::Invalid("weights must be non-negative".into()));
        }
        if (w.sum() - 1.0).abs() > 1e-6 {
            return Err(ConfigError::Invalid(format!(
                "weights must sum to 1.0, got {}",
                w.sum()
            )));
        }
        if w.site <= w.prefix + w.contrast + w.term_preference {
            return Err(ConfigError::Invalid(
                "site weight must exceed prefix + contrast + term_preference".into(),
            ));
        }
        Ok(())
    }
}
