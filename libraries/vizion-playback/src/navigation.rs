//! Next / previous / shuffle over the armed playlist
//!
//! [`next_track`] and [`previous_track`] are pure functions of the selection
//! and the catalog. [`NavigationController`] applies their result to the store.

use crate::shuffle::fisher_yates;
use crate::store::PlaylistStateStore;
use crate::types::{CatalogSnapshot, SelectionState};
use rand::Rng;
use std::sync::Arc;
use tracing::debug;
use vizion_core::Track;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Track after the current one, wrapping at the end.
///
/// Returns `None` (no-op) when nothing is armed, the playlist is empty, or
/// none of its entries exist in the catalog.
pub fn next_track(selection: &SelectionState, catalog: &CatalogSnapshot) -> Option<Track> {
    step(selection, catalog, Direction::Forward)
}

/// Track before the current one, wrapping at the start
pub fn previous_track(selection: &SelectionState, catalog: &CatalogSnapshot) -> Option<Track> {
    step(selection, catalog, Direction::Backward)
}

fn step(selection: &SelectionState, catalog: &CatalogSnapshot, direction: Direction) -> Option<Track> {
    let playlist = selection.armed_playlist.as_ref()?;
    let len = playlist.len();
    if len == 0 {
        return None;
    }

    // A current track outside the playlist restarts from index 0
    let start = match selection.current_id().and_then(|id| playlist.position_of(id)) {
        Some(index) => advance(index, len, direction),
        None => 0,
    };

    let mut index = start;
    for _ in 0..len {
        let id = &playlist.track_ids[index];
        if let Some(track) = catalog.get(id) {
            return Some(track.clone());
        }
        debug!(track_id = %id, "Skipping playlist entry missing from catalog");
        index = advance(index, len, direction);
    }
    None
}

fn advance(index: usize, len: usize, direction: Direction) -> usize {
    match direction {
        Direction::Forward => (index + 1) % len,
        Direction::Backward => (index + len - 1) % len,
    }
}

/// Applies navigation results to a [`PlaylistStateStore`]
#[derive(Clone)]
pub struct NavigationController {
    store: Arc<PlaylistStateStore>,
}

impl NavigationController {
    /// Create a controller over `store`
    pub fn new(store: Arc<PlaylistStateStore>) -> Self {
        Self { store }
    }

    /// Select the next track. `None` means nothing changed.
    pub fn next(&self) -> Option<Track> {
        let (selection, catalog) = self.store.view();
        let track = next_track(&selection, &catalog)?;
        self.store.select_track(track.clone());
        Some(track)
    }

    /// Select the previous track. `None` means nothing changed.
    pub fn previous(&self) -> Option<Track> {
        let (selection, catalog) = self.store.view();
        let track = previous_track(&selection, &catalog)?;
        self.store.select_track(track.clone());
        Some(track)
    }

    /// Re-arm the playlist in a new random order.
    ///
    /// Returns the first playable track of the new order. Does nothing when
    /// no playlist is armed.
    pub fn shuffle(&self) -> Option<Track> {
        self.shuffle_with(&mut rand::thread_rng())
    }

    /// [`shuffle`](Self::shuffle) with a caller-supplied generator
    pub fn shuffle_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Track> {
        let playlist = self.store.armed_playlist()?;
        let mut order = playlist.track_ids.clone();
        fisher_yates(&mut order, rng);

        debug!(playlist_id = %playlist.id, track_count = order.len(), "Shuffling playlist");
        self.store.arm_playlist(playlist.with_order(order))
    }
}
