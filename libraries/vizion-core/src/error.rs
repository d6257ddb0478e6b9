/// Core error types for Vizion
use thiserror::Error;

/// Result type alias using `VizionError`
pub type Result<T> = std::result::Result<T, VizionError>;

/// Core error type shared by collaborator traits
#[derive(Error, Debug)]
pub enum VizionError {
    /// A storage identifier could not be resolved to a fetchable URL
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// An image could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The playback adapter rejected a command
    #[error("Playback adapter error: {0}")]
    Adapter(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl VizionError {
    /// Create a resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a playback adapter error
    pub fn adapter(msg: impl Into<String>) -> Self {
        Self::Adapter(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
