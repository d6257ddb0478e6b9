/// Collaborator traits consumed by the playback core
use crate::error::Result;
use crate::types::{ColorTriple, Track, TrackId};
use async_trait::async_trait;
use std::time::Duration;

/// Read-only snapshot provider for the track catalog.
///
/// The document store keeps the catalog fresh; the core only pulls snapshots
/// and pushes them into the state store.
pub trait TrackCatalog: Send + Sync {
    /// All known tracks, in catalog order
    fn list_tracks(&self) -> Vec<Track>;

    /// Look up a single track
    fn get_track(&self, id: &TrackId) -> Option<Track>;
}

/// Blob storage lookup.
///
/// Translates an opaque storage identifier into a fetchable URL. This is the
/// only primitive the resource resolver wraps with caching and deduplication.
#[async_trait]
pub trait RemoteStorageService: Send + Sync {
    /// Resolve `identifier` to a download URL
    ///
    /// # Errors
    /// Returns an error if the object does not exist or the lookup fails
    async fn resolve(&self, identifier: &str) -> Result<String>;
}

/// Fetches raw image bytes for an already-resolved URL
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Download the image at `url`
    ///
    /// # Errors
    /// Returns an error if the request fails
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Audio output controlled by the session.
///
/// Commands are synchronous hand-offs; completion is reported back through
/// [`AdapterEvent`]s delivered to the session's event channel. Implementations
/// must not call back into the session from inside a command.
pub trait PlaybackAdapter: Send + Sync {
    /// Start loading `url`. The adapter reports `AdapterEvent::Loaded` once ready.
    ///
    /// # Errors
    /// Returns an error if the adapter cannot accept the URL
    fn load(&self, url: &str) -> Result<()>;

    /// Start or resume output
    fn play(&self) -> Result<()>;

    /// Pause output
    fn pause(&self) -> Result<()>;

    /// Seek within the loaded track
    fn seek(&self, position: Duration) -> Result<()>;

    /// Current position in the loaded track
    fn position(&self) -> Duration;
}

/// Events raised by a [`PlaybackAdapter`]
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterEvent {
    /// The last loaded URL is ready; carries the track duration
    Loaded {
        /// Total length of the loaded track
        duration: Duration,
    },

    /// The loaded track played to the end
    Ended,

    /// The adapter failed asynchronously after accepting a load
    Error {
        /// Adapter-provided description
        message: String,
    },
}

/// Receives the derived theme whenever it is recomputed
pub trait ThemeConsumer: Send + Sync {
    /// Apply the colors.
    ///
    /// Called while the session holds its status lock: reading the state
    /// store is fine, calling session methods is not.
    fn apply_theme(&self, colors: &ColorTriple);
}
