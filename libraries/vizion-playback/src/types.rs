//! Core types for selection and playback state

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vizion_core::{ArmedPlaylist, Track, TrackId};

/// What is selected right now.
///
/// `current_track` does not have to appear in `armed_playlist`; navigation
/// restarts from the first entry when it doesn't.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Selected track
    pub current_track: Option<Track>,

    /// Playlist driving next/previous
    pub armed_playlist: Option<ArmedPlaylist>,

    /// Bumped by every mutation of the store
    pub generation: u64,
}

impl SelectionState {
    /// Id of the selected track
    pub fn current_id(&self) -> Option<&TrackId> {
        self.current_track.as_ref().map(|track| &track.id)
    }
}

/// Immutable snapshot of the known tracks
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    tracks: Vec<Track>,
    index: HashMap<TrackId, usize>,
}

impl CatalogSnapshot {
    /// Build a snapshot; the first occurrence of a duplicated id wins
    pub fn new(tracks: Vec<Track>) -> Self {
        let mut index = HashMap::with_capacity(tracks.len());
        for (position, track) in tracks.iter().enumerate() {
            index.entry(track.id.clone()).or_insert(position);
        }
        Self { tracks, index }
    }

    /// Look up a track by id
    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.index.get(id).map(|&position| &self.tracks[position])
    }

    /// Whether `id` is known
    pub fn contains(&self, id: &TrackId) -> bool {
        self.index.contains_key(id)
    }

    /// Tracks in catalog order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Track ids in catalog order
    pub fn ids(&self) -> Vec<TrackId> {
        self.tracks.iter().map(|track| track.id.clone()).collect()
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Playback session state
///
/// `Idle → Loading → Ready → Playing ⇄ Paused`, and back to `Loading`
/// whenever the selection changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Nothing has been loaded yet
    Idle,

    /// Waiting for the audio of the selected track
    Loading,

    /// Loaded, not started
    Ready,

    /// Audio is playing
    Playing,

    /// Audio is paused
    Paused,
}

/// Which half of a track change produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkKind {
    /// Audio resolution and adapter load
    Audio,

    /// Cover art resolution and color extraction
    Theme,
}

/// Playback session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Name of the playlist armed from the whole catalog (default: "All Tracks")
    #[serde(default = "default_playlist_name")]
    pub default_playlist_name: String,

    /// Owner recorded on the default playlist (default: "system")
    #[serde(default = "default_playlist_owner")]
    pub default_playlist_owner: String,

    /// Arm the shuffled catalog at startup when nothing is armed (default: true)
    #[serde(default = "default_true")]
    pub arm_default_on_start: bool,

    /// Start playing the first track selected from idle (default: false)
    #[serde(default)]
    pub autoplay_first: bool,
}

fn default_playlist_name() -> String {
    "All Tracks".to_string()
}

fn default_playlist_owner() -> String {
    "system".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_playlist_name: default_playlist_name(),
            default_playlist_owner: default_playlist_owner(),
            arm_default_on_start: true,
            autoplay_first: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.default_playlist_name, "All Tracks");
        assert_eq!(config.default_playlist_owner, "system");
        assert!(config.arm_default_on_start);
        assert!(!config.autoplay_first);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: PlaybackConfig = serde_json::from_str(r#"{"autoplay_first": true}"#).unwrap();
        assert!(config.autoplay_first);
        assert_eq!(config.default_playlist_name, "All Tracks");
    }

    #[test]
    fn catalog_snapshot_keeps_first_duplicate() {
        let catalog = CatalogSnapshot::new(vec![
            Track::new("a", "First", "gs://b/a1", ""),
            Track::new("b", "Other", "gs://b/b", ""),
            Track::new("a", "Second", "gs://b/a2", ""),
        ]);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(&TrackId::new("a")).unwrap().title, "First");
        assert!(catalog.contains(&TrackId::new("b")));
        assert!(!catalog.contains(&TrackId::new("z")));
    }

    #[test]
    fn current_id_follows_track() {
        let mut selection = SelectionState::default();
        assert!(selection.current_id().is_none());

        selection.current_track = Some(Track::new("x", "X", "", ""));
        assert_eq!(selection.current_id(), Some(&TrackId::new("x")));
    }
}
