//! Vizion Core
//!
//! Domain types, collaborator traits, and error handling shared by every
//! crate of the playback & session engine.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `ArmedPlaylist`, `Rgb`, `ColorTriple`, `ResolvedResource`
//! - **Collaborator Traits**: `TrackCatalog`, `RemoteStorageService`, `PlaybackAdapter`,
//!   `ThemeConsumer`, `ImageSource`
//! - **Error Handling**: Unified `VizionError` and `Result` types
//!
//! Nothing in this crate performs I/O. Collaborators are implemented by the
//! embedding application (document store, blob storage, audio element) or by
//! the HTTP-backed implementations in `vizion-resolver` and `vizion-artwork`.
//!
//! # Example
//!
//! ```rust
//! use vizion_core::{ArmedPlaylist, InMemoryCatalog, Track, TrackCatalog};
//! use vizion_core::types::{PlaylistId, TrackId, UserId};
//!
//! let track = Track::new("a", "Intro", "gs://bucket/audio/a.mp3", "gs://bucket/art/a.jpg");
//! let catalog = InMemoryCatalog::new(vec![track]);
//! assert!(catalog.get_track(&TrackId::new("a")).is_some());
//!
//! let playlist = ArmedPlaylist::new(
//!     PlaylistId::new("p1"),
//!     "Morning",
//!     UserId::new("u1"),
//!     vec![TrackId::new("a")],
//! );
//! assert_eq!(playlist.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod traits;
pub mod types;

pub use catalog::InMemoryCatalog;
pub use error::{Result, VizionError};
pub use traits::{
    AdapterEvent, ImageSource, PlaybackAdapter, RemoteStorageService, ThemeConsumer, TrackCatalog,
};
pub use types::{
    ArmedPlaylist, ColorTriple, PlaylistId, ResolvedResource, Rgb, Track, TrackId, UserId,
};
