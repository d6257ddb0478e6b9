//! Error types for resource resolution.

use thiserror::Error;
use vizion_core::VizionError;

/// Errors that can occur while resolving a storage reference.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Storage returned an error response
    #[error("Storage error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Identifier is not a `gs://bucket/path` reference
    #[error("Invalid storage reference: {0}")]
    InvalidReference(String),

    /// Configured endpoint is not a usable base URL
    #[error("Invalid storage endpoint: {0}")]
    InvalidUrl(String),

    /// Failed to parse the object metadata
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The object exists but has no download token
    #[error("No download token for {0}")]
    MissingToken(String),
}

/// Result type for resolver operations.
pub type Result<T> = std::result::Result<T, ResolverError>;

impl From<ResolverError> for VizionError {
    fn from(err: ResolverError) -> Self {
        match err {
            ResolverError::Request(e) => VizionError::network(e.to_string()),
            other => VizionError::resolution(other.to_string()),
        }
    }
}
