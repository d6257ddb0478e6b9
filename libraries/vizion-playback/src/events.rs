//! Events flowing out of the store and the session
//!
//! - [`SelectionEvent`]s are pushed by the [`PlaylistStateStore`](crate::PlaylistStateStore)
//!   to its subscribers after every mutation.
//! - [`SessionEvent`]s accumulate on the [`PlaybackSession`](crate::PlaybackSession)
//!   and are drained by the UI layer.

use crate::types::{SessionState, WorkKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use vizion_core::{ColorTriple, PlaylistId, Track, TrackId};

/// Notification of a store mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// `current_track` was replaced
    TrackChanged {
        /// The newly selected track
        track: Track,
        /// Store generation after the change
        generation: u64,
    },

    /// A playlist was armed
    PlaylistArmed {
        /// Id of the armed playlist
        playlist_id: PlaylistId,
        /// Entries in the playlist
        track_count: usize,
        /// Whether arming also selected a track (a `TrackChanged` follows)
        track_selected: bool,
        /// Store generation after the change
        generation: u64,
    },

    /// The catalog snapshot was replaced
    CatalogReplaced {
        /// Tracks in the new snapshot
        track_count: usize,
        /// Store generation after the change
        generation: u64,
    },
}

impl SelectionEvent {
    /// Store generation carried by the event
    pub fn generation(&self) -> u64 {
        match self {
            Self::TrackChanged { generation, .. }
            | Self::PlaylistArmed { generation, .. }
            | Self::CatalogReplaced { generation, .. } => *generation,
        }
    }
}

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Session state changed
    StateChanged {
        /// Previous state
        from: SessionState,
        /// New state
        to: SessionState,
    },

    /// The adapter finished loading the selected track
    TrackLoaded {
        /// Loaded track
        track_id: TrackId,
        /// Reported length
        duration: Duration,
    },

    /// The adapter could not load the selected track
    LoadFailed {
        /// Track being loaded, if known
        track_id: Option<TrackId>,
        /// Adapter-provided reason
        message: String,
    },

    /// A new theme was handed to the theme consumer
    ThemeApplied {
        /// Track the theme belongs to
        track_id: TrackId,
        /// Applied colors
        colors: ColorTriple,
    },

    /// An async result arrived after a newer selection and was dropped
    StaleResultDiscarded {
        /// Track the result belonged to
        track_id: TrackId,
        /// Generation captured when the work started
        generation: u64,
        /// Which result was dropped
        kind: WorkKind,
    },
}
