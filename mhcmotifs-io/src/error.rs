use std::io;
use thiserror::Error;

use mhcmotifs_core::ConfigError;

/// Error type for mhcmotifs-io operations.
#[derive(Error, Debug)]
pub enum MotifIoError {
    /// IO error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A row of the peptide table could not be turned into a record.
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for mhcmotifs-io operations.
pub type Result<T> = std::result::Result<T, MotifIoError>;
