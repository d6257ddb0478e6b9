//! In-memory catalog
//!
//! A [`TrackCatalog`] backed by a vector, for embedding applications that
//! already hold the catalog documents and for tests.

use crate::traits::TrackCatalog;
use crate::types::{Track, TrackId};
use std::sync::{PoisonError, RwLock};

/// Catalog held in memory, preserving insertion order
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    tracks: RwLock<Vec<Track>>,
}

impl InMemoryCatalog {
    /// Create a catalog from a list of tracks
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks: RwLock::new(tracks),
        }
    }

    /// Replace every track (a fresh snapshot from the document store)
    pub fn replace(&self, tracks: Vec<Track>) {
        *self.tracks.write().unwrap_or_else(PoisonError::into_inner) = tracks;
    }

    /// Insert a track, replacing any existing track with the same id
    pub fn upsert(&self, track: Track) {
        let mut tracks = self.tracks.write().unwrap_or_else(PoisonError::into_inner);
        match tracks.iter_mut().find(|existing| existing.id == track.id) {
            Some(existing) => *existing = track,
            None => tracks.push(track),
        }
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TrackCatalog for InMemoryCatalog {
    fn list_tracks(&self) -> Vec<Track> {
        self.tracks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn get_track(&self, id: &TrackId) -> Option<Track> {
        self.tracks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|track| &track.id == id)
            .cloned()
    }
}
