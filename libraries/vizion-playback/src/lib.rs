//! Vizion - Playback & Session Engine
//!
//! Selection state, playlist navigation, and playback orchestration.
//!
//! This crate provides:
//! - [`PlaylistStateStore`]: the single source of truth for the catalog
//!   snapshot, the selected track, and the armed playlist
//! - [`NavigationController`]: next / previous with wraparound, and
//!   Fisher–Yates shuffle
//! - [`PlaybackSession`]: resolves audio and cover art for every selection,
//!   drives the playback adapter and the theme consumer, and discards results
//!   that a newer selection has superseded
//!
//! # Architecture
//!
//! Components talk through messages, not shared callbacks:
//! - the store pushes [`SelectionEvent`]s to subscribers after each mutation
//! - the playback adapter pushes [`AdapterEvent`](vizion_core::AdapterEvent)s
//!   into the session loop
//! - the session accumulates [`SessionEvent`]s for the UI to drain
//!
//! Every store mutation bumps a generation counter. Async work captures the
//! generation when it starts and is applied only if it is still current.
//!
//! # Example: Navigation
//!
//! ```rust
//! use std::sync::Arc;
//! use vizion_core::{ArmedPlaylist, PlaylistId, Track, TrackId, UserId};
//! use vizion_playback::{NavigationController, PlaylistStateStore};
//!
//! let store = Arc::new(PlaylistStateStore::new());
//! store.set_catalog(vec![
//!     Track::new("a", "Intro", "gs://bucket/a.mp3", "gs://bucket/a.jpg"),
//!     Track::new("b", "Verse", "gs://bucket/b.mp3", "gs://bucket/b.jpg"),
//!     Track::new("c", "Outro", "gs://bucket/c.mp3", "gs://bucket/c.jpg"),
//! ]);
//!
//! let ids = ["a", "b", "c"].map(TrackId::new).to_vec();
//! store.arm_playlist(ArmedPlaylist::new(
//!     PlaylistId::new("p1"),
//!     "Morning",
//!     UserId::new("u1"),
//!     ids,
//! ));
//!
//! let nav = NavigationController::new(Arc::clone(&store));
//! assert_eq!(nav.previous().unwrap().id, TrackId::new("c"));
//! assert_eq!(nav.next().unwrap().id, TrackId::new("a"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod navigation;
pub mod session;
pub mod shuffle;
pub mod store;
pub mod types;

pub use error::{PlaybackError, Result};
pub use events::{SelectionEvent, SessionEvent};
pub use navigation::{next_track, previous_track, NavigationController};
pub use session::{PlaybackSession, SessionCollaborators};
pub use store::PlaylistStateStore;
pub use types::{CatalogSnapshot, PlaybackConfig, SelectionState, SessionState, WorkKind};
