//! The external candidate-retrieval capability.
//!
//! Retrieval (a BM25 index over vocabulary display strings) is a collaborator
//! this crate consumes, not something it implements. Production code wraps
//! the pre-built index; tests substitute scripted implementations.

use crate::types::{Candidate, System};

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("retrieval capability unavailable: {0}")]
    Unavailable(String),

    #[error("retrieval timed out: {0}")]
    Timeout(String),
}

/// Abstraction over per-system lexical retrieval.
///
/// `search` returns at most `k` candidates ordered by lexical similarity to
/// `query_text`. The scores it attaches are opaque and comparable only
/// within one call. The call is the pipeline's only suspension point; it is
/// treated as bounded-latency and is never retried here; retry policy, if
/// any, belongs to the implementation.
pub trait Retriever {
    async fn search(
        &self,
        system: System,
        query_text: &str,
        k: usize,
    ) -> Result<Vec<Candidate>, RetrievalError>;
}
