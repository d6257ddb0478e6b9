/// Armed playlist domain type
use crate::types::{PlaylistId, TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The ordered sequence of track ids currently active for navigation.
///
/// Replaced wholesale when re-armed. The only reordering is a shuffle, which
/// produces a new value via [`ArmedPlaylist::with_order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmedPlaylist {
    /// Playlist identifier
    pub id: PlaylistId,

    /// Display name
    pub name: String,

    /// Owner
    pub created_by: UserId,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Track order. Duplicates are kept when the source has them.
    #[serde(alias = "songIds")]
    pub track_ids: Vec<TrackId>,
}

impl ArmedPlaylist {
    /// Create a playlist stamped with the current time
    pub fn new(
        id: PlaylistId,
        name: impl Into<String>,
        created_by: UserId,
        track_ids: Vec<TrackId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            created_by,
            created_at: Utc::now(),
            track_ids,
        }
    }

    /// Same identity fields, different order
    #[must_use]
    pub fn with_order(&self, track_ids: Vec<TrackId>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            created_by: self.created_by.clone(),
            created_at: self.created_at,
            track_ids,
        }
    }

    /// Number of entries, duplicates included
    pub fn len(&self) -> usize {
        self.track_ids.len()
    }

    /// Whether the playlist has no entries
    pub fn is_empty(&self) -> bool {
        self.track_ids.is_empty()
    }

    /// Index of the first occurrence of `id`
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.track_ids.iter().position(|candidate| candidate == id)
    }
}
