/// Track domain type
use crate::types::TrackId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A playable item owned by the external catalog.
///
/// `audio_ref` and `cover_art_ref` are opaque storage identifiers. They may
/// already be fetchable URLs, or references such as `gs://bucket/path` that
/// must go through the resource resolver first.
///
/// Field aliases accept catalog documents in their stored shape
/// (`audio`, `coverArt`, `vizionaries`, `vizionaryLinks`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Catalog identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Opaque audio reference
    #[serde(alias = "audio")]
    pub audio_ref: String,

    /// Opaque cover art reference
    #[serde(alias = "coverArt")]
    pub cover_art_ref: String,

    /// Contributor identifiers. Either display names or catalog keys,
    /// the core never interprets them.
    #[serde(default, alias = "vizionaries")]
    pub contributors: Vec<String>,

    /// Links for each contributor, parallel to `contributors`
    #[serde(default, alias = "vizionaryLinks")]
    pub contributor_links: Vec<String>,

    /// Play count for the current month
    #[serde(default)]
    pub views_this_month: u64,

    /// Lifetime play count
    #[serde(default)]
    pub views_all_time: u64,

    /// Upload timestamp, when the catalog knows it
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Track {
    /// Create a track with the required fields
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        audio_ref: impl Into<String>,
        cover_art_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: TrackId::new(id),
            title: title.into(),
            audio_ref: audio_ref.into(),
            cover_art_ref: cover_art_ref.into(),
            contributors: Vec::new(),
            contributor_links: Vec::new(),
            views_this_month: 0,
            views_all_time: 0,
            created_at: None,
        }
    }

    /// Attach contributor identifiers
    #[must_use]
    pub fn with_contributors<I, S>(mut self, contributors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contributors = contributors.into_iter().map(Into::into).collect();
        self
    }

    /// Attach an upload timestamp
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Whether the track has cover art to theme from
    pub fn has_cover_art(&self) -> bool {
        !self.cover_art_ref.trim().is_empty()
    }
}
