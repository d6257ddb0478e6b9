//! Runtime errors

use thiserror::Error;
use vizion_artwork::ArtworkError;
use vizion_resolver::ResolverError;

/// Errors raised while composing or shutting down the engine
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage service construction failed
    #[error("Storage service error: {0}")]
    Storage(#[from] ResolverError),

    /// Image source construction failed
    #[error("Image source error: {0}")]
    Artwork(#[from] ArtworkError),

    /// The session loop panicked or was cancelled
    #[error("Session loop failed: {0}")]
    Task(String),
}

impl From<config::ConfigError> for RuntimeError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
