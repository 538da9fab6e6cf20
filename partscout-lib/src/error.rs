//! Error types for PartScout

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for PartScout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying a retriever.
///
/// Everything here is fatal during initialization. Query-time "nothing found"
/// is not an error: it is an empty result list.
#[derive(Error, Debug)]
pub enum Error {
    /// A source file is missing or unreadable
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The product catalog could not be decoded
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Failed to load or run the embedding model
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Vectors of differing length were mixed; `position` is the offending
    /// row when building an index, `None` for a query vector
    #[error("dimension mismatch: expected {expected}, found {found}{}", .position.map(|p| format!(" at row {p}")).unwrap_or_default())]
    DimensionMismatch {
        expected: usize,
        found: usize,
        position: Option<usize>,
    },

    /// Loading produced no chunks at all
    #[error("corpus is empty: no chunks were produced from the sources")]
    EmptyCorpus,

    /// Invalid input provided
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Catalog(err.to_string())
    }
}
