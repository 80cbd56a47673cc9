//! End-to-end orchestration: normalize → route → retrieve → rank → pick
//! display → top-1 output row.
//!
//! Per-query work is stateless; the lexicon is `Arc`-shared and read-only,
//! so batches fan out across a bounded number of concurrent rows and output
//! is reassembled by original input index. A bad row never poisons the
//! batch: row-level failures are logged and resolved to placeholder rows.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::config::{ConfigError, PipelineConfig};
use crate::display::pick_display;
use crate::normalize::lexicon::AcronymLexicon;
use crate::normalize::{NormalizeError, Normalizer};
use crate::rank::rank;
use crate::retrieve::Retriever;
use crate::route::{RouteError, route};
use crate::types::{EntityType, OutputRow, Query};

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Route(#[from] RouteError),
}

/// Drives queries through the full mapping pipeline.
pub struct Pipeline<R> {
    normalizer: Normalizer,
    retriever: R,
    config: PipelineConfig,
}

impl<R: Retriever> Pipeline<R> {
    /// Validates `config` and assembles a pipeline around the shared lexicon
    /// and the external retrieval capability.
    pub fn new(
        lexicon: Arc<AcronymLexicon>,
        retriever: R,
        config: PipelineConfig,
    ) -> Result<Self, MapError> {
        config.validate()?;
        Ok(Self {
            normalizer: Normalizer::new(lexicon),
            retriever,
            config,
        })
    }

    /// Maps one query to its output row.
    ///
    /// Recoverable conditions (retrieval failure, empty admissible set,
    /// lenient empty normalization) resolve to a NO_MATCH row with the
    /// system still set. `Err` is reserved for the per-row fatal cases:
    /// an unrecognized entity type, or empty normalization in strict mode.
    pub async fn map_entity(&self, query: &Query) -> Result<OutputRow, MapError> {
        let normalized = self.normalizer.normalize(&query.raw_text);
        if normalized.is_empty() && self.config.strict_normalization {
            return Err(NormalizeError::EmptyInput(query.raw_text.clone()).into());
        }

        let entity_type = EntityType::parse(&query.entity_type)?;
        let system = route(entity_type);

        if normalized.is_empty() {
            warn!(input = %query.raw_text, "input normalized to empty, resolving to NO_MATCH");
            return Ok(OutputRow::no_match(query, Some(system)));
        }

        let candidates = match self
            .retriever
            .search(system, &normalized.expanded_text, self.config.top_k)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(system = %system, error = %e, "retrieval failed, resolving row to NO_MATCH");
                return Ok(OutputRow::no_match(query, Some(system)));
            }
        };

        let ranked = rank(&normalized, entity_type, candidates, &self.config.weights);
        for rc in ranked.iter().take(3) {
            debug!(
                rank = rc.rank,
                code = %rc.candidate.code,
                score = rc.final_score,
                text = %rc.candidate.text,
                "ranked candidate"
            );
        }

        let choices = pick_display(&ranked);
        match choices.first() {
            Some(top) => Ok(OutputRow::matched(
                query,
                system,
                top.code.clone(),
                top.chosen_text.clone(),
            )),
            None => {
                debug!(input = %query.raw_text, system = %system, "no admissible candidate");
                Ok(OutputRow::no_match(query, Some(system)))
            }
        }
    }

    /// Maps an ordered batch of queries to an equal-length ordered batch of
    /// output rows, `output[i]` always corresponding to `queries[i]`.
    ///
    /// Rows are processed concurrently (bounded by `config.concurrency`) and
    /// reassembled by input index. A row whose mapping fails yields a
    /// placeholder row with every output column empty; the batch continues.
    pub async fn map_batch(&self, queries: &[Query]) -> Vec<OutputRow> {
        let outcomes: Vec<(usize, Result<OutputRow, MapError>)> =
            stream::iter(queries.iter().enumerate())
                .map(|(index, query)| async move { (index, self.map_entity(query).await) })
                .buffer_unordered(self.config.concurrency)
                .collect()
                .await;

        let mut rows: Vec<Option<OutputRow>> = vec![None; queries.len()];
        for (index, outcome) in outcomes {
            let row = match outcome {
                Ok(row) => row,
                Err(e) => {
                    warn!(index, error = %e, "row failed, continuing batch");
                    OutputRow::no_match(&queries[index], None)
                }
            };
            rows[index] = Some(row);
        }
        rows.into_iter()
            .map(|row| row.expect("every input index produces exactly one row"))
            .collect()
    }
}
