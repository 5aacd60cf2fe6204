//! Error types.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum EvreadyError {
    #[error("Wrapped anyhow error: {0}")]
    AnyhowError(#[from] anyhow::Error),
    #[error("Failed to read dataset from {}: {source}", path.display())]
    DatasetRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse dataset: {0}")]
    DatasetParse(#[from] serde_json::Error),
    #[error("Record {index} has an empty country code.")]
    EmptyCountryCode { index: usize },
    #[error("Duplicate country code: {0}")]
    DuplicateCountryCode(String),
    #[error("Invalid search syntax: {0}")]
    InvalidSearchQuery(String),
    #[error("Invalid view spec: {0}")]
    InvalidViewSpec(String),
}
