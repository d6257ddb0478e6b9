//! Authoritative selection state
//!
//! The store owns the catalog snapshot and the [`SelectionState`]. Every
//! mutation bumps the generation counter and notifies subscribers while the
//! write lock is still held, so events arrive in generation order.

use crate::events::SelectionEvent;
use crate::types::{CatalogSnapshot, SelectionState};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::mpsc;
use tracing::{debug, info};
use vizion_core::{ArmedPlaylist, Track};

#[derive(Default)]
struct StoreInner {
    catalog: Arc<CatalogSnapshot>,
    selection: SelectionState,
}

/// Holds the catalog snapshot, the selected track, and the armed playlist
#[derive(Default)]
pub struct PlaylistStateStore {
    inner: RwLock<StoreInner>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<SelectionEvent>>>,
}

impl PlaylistStateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive a [`SelectionEvent`] after every mutation.
    ///
    /// The channel closes on [`teardown`](Self::teardown).
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SelectionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Replace the known tracks. The selection is left alone.
    ///
    /// Returns the new generation.
    pub fn set_catalog(&self, tracks: Vec<Track>) -> u64 {
        let mut inner = self.write();
        let track_count = tracks.len();
        inner.catalog = Arc::new(CatalogSnapshot::new(tracks));
        let generation = Self::bump(&mut inner);

        debug!(track_count, generation, "Catalog replaced");
        self.notify(SelectionEvent::CatalogReplaced {
            track_count,
            generation,
        });
        generation
    }

    /// Replace the armed playlist and select its first track.
    ///
    /// Entries missing from the catalog are skipped when picking the first
    /// track. When no entry is playable, or the playlist is empty, the current
    /// track stays selected. Returns the newly selected track.
    pub fn arm_playlist(&self, playlist: ArmedPlaylist) -> Option<Track> {
        let mut inner = self.write();

        let first = playlist
            .track_ids
            .iter()
            .find_map(|id| inner.catalog.get(id))
            .cloned();

        let playlist_id = playlist.id.clone();
        let track_count = playlist.len();
        inner.selection.armed_playlist = Some(playlist);
        if let Some(track) = &first {
            inner.selection.current_track = Some(track.clone());
        }
        let generation = Self::bump(&mut inner);

        info!(
            playlist_id = %playlist_id,
            track_count,
            generation,
            "Playlist armed"
        );
        self.notify(SelectionEvent::PlaylistArmed {
            playlist_id,
            track_count,
            track_selected: first.is_some(),
            generation,
        });
        if let Some(track) = &first {
            self.notify(SelectionEvent::TrackChanged {
                track: track.clone(),
                generation,
            });
        }
        first
    }

    /// Select a track without touching the armed playlist.
    ///
    /// Returns the new generation.
    pub fn select_track(&self, track: Track) -> u64 {
        let mut inner = self.write();
        inner.selection.current_track = Some(track.clone());
        let generation = Self::bump(&mut inner);

        debug!(track_id = %track.id, generation, "Track selected");
        self.notify(SelectionEvent::TrackChanged { track, generation });
        generation
    }

    /// Copy of the current selection
    pub fn snapshot(&self) -> SelectionState {
        self.read().selection.clone()
    }

    /// Selection and catalog read under one lock
    pub fn view(&self) -> (SelectionState, Arc<CatalogSnapshot>) {
        let inner = self.read();
        (inner.selection.clone(), Arc::clone(&inner.catalog))
    }

    /// Current catalog snapshot
    pub fn catalog(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.read().catalog)
    }

    /// Selected track
    pub fn current_track(&self) -> Option<Track> {
        self.read().selection.current_track.clone()
    }

    /// Armed playlist
    pub fn armed_playlist(&self) -> Option<ArmedPlaylist> {
        self.read().selection.armed_playlist.clone()
    }

    /// Current generation
    pub fn generation(&self) -> u64 {
        self.read().selection.generation
    }

    /// Whether no mutation happened since `generation` was observed
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Drop every subscriber and clear the selection.
    ///
    /// The generation still advances so outstanding async work is discarded.
    pub fn teardown(&self) {
        let mut inner = self.write();
        inner.selection.current_track = None;
        inner.selection.armed_playlist = None;
        let generation = Self::bump(&mut inner);

        let dropped = {
            let mut subscribers = self
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let count = subscribers.len();
            subscribers.clear();
            count
        };
        info!(generation, subscribers = dropped, "Playlist state store torn down");
    }

    fn bump(inner: &mut StoreInner) -> u64 {
        inner.selection.generation += 1;
        inner.selection.generation
    }

    fn notify(&self, event: SelectionEvent) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
