//! Error types for Cupcake Core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using Cupcake Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the cupcake store
#[derive(Error, Debug)]
pub enum Error {
    /// Request data did not satisfy the declared field rules
    #[error("Validation error: {0}")]
    Validation(String),

    /// No record is stored under the given id
    #[error("Cupcake {0} not found")]
    NotFound(u64),

    /// Reading or writing the backing file failed
    #[error("Persistence error on {}: {source}", path.display())]
    Persistence {
        /// Backing file path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Records could not be encoded or decoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything else, e.g. a background task that died
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a persistence error for `path`
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Create an unexpected error
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// Whether the error means the record is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
