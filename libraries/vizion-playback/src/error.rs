//! Error types for playback sessions

use thiserror::Error;
use vizion_core::VizionError;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// The adapter could not load a resolved URL
    #[error("Failed to load track {track_id}: {message}")]
    Load {
        /// Track whose audio failed to load
        track_id: String,
        /// Adapter-provided reason
        message: String,
    },

    /// The adapter rejected a transport command
    #[error("Playback adapter error: {0}")]
    Adapter(#[from] VizionError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
