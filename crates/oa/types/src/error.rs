use thiserror::Error;

use crate::cluster::ClusterId;

/// Errors from the stream data model.
#[derive(Debug, Error)]
pub enum TypesError {
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("cluster not found: {0}")]
    ClusterNotFound(ClusterId),

    #[error("invalid normalization bounds for dimension {dim}: {detail}")]
    InvalidBounds { dim: usize, detail: String },
}

/// Convenience type alias for data model results.
pub type TypesResult<T> = Result<T, TypesError>;
