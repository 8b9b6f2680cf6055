//! Store error types.

use thiserror::Error;

/// Errors that can occur when mutating the route store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Not found: {0}")]
    NotFound(String),
}
