// Error taxonomy for the query operations.
//
// Loading and saving files goes through anyhow with context messages. The
// three query operations fail only in the ways listed here, so callers can
// match on them (or downcast from anyhow::Error at the facade).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendError {
    /// The requested user id is not in the corpus or embedding store.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Cluster count must be a positive integer no larger than the corpus.
    #[error("n_clusters must be between 1 and {corpus_size}, got {requested}")]
    InvalidClusterCount { requested: usize, corpus_size: usize },
}
