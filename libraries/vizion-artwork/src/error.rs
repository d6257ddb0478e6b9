use thiserror::Error;
use vizion_core::VizionError;

/// Errors that can occur during color extraction
#[derive(Debug, Error)]
pub enum ArtworkError {
    /// Image bytes could not be fetched
    #[error("Failed to fetch image: {0}")]
    Fetch(#[from] VizionError),

    /// Image bytes could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Every sampled pixel was below the alpha threshold
    #[error("No opaque pixels in image")]
    NoValidPixels,

    /// The blocking decode task panicked or was cancelled
    #[error("Extraction task failed: {0}")]
    Task(String),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for artwork operations
pub type Result<T> = std::result::Result<T, ArtworkError>;
