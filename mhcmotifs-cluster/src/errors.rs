use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Insufficient data for clustering: need at least 2 motif vectors, found {found}")]
    InsufficientClusteringInput { found: usize },

    #[error("Motif vector {index} has {found} features, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("Motif vector {row} has a non-finite value at feature {column}")]
    NonFiniteValue { row: usize, column: usize },

    #[error("Invalid clustering parameter: {0}")]
    InvalidParameter(String),

    #[error("Clusterer returned {found} labels for {expected} motif vectors")]
    LabelCountMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, ClusterError>;
