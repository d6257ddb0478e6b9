//! Playback session behavior against recording collaborators

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use vizion_artwork::{ColorExtractor, ExtractionConfig};
use vizion_core::{
    AdapterEvent, ArmedPlaylist, ColorTriple, ImageSource, InMemoryCatalog, PlaybackAdapter,
    PlaylistId, RemoteStorageService, Rgb, ThemeConsumer, Track, TrackId, UserId, VizionError,
};
use vizion_playback::{
    PlaybackConfig, PlaybackError, PlaybackSession, PlaylistStateStore, SessionCollaborators,
    SessionEvent, SessionState, WorkKind,
};
use vizion_resolver::{ResolverConfig, ResourceResolver};

// ===== Mock collaborators =====

/// Storage that maps `gs://b/<path>` to `https://cdn.test/<path>` and can
/// hold individual identifiers until released
#[derive(Default)]
struct GatedStorage {
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    calls: AtomicUsize,
}

impl GatedStorage {
    fn gate(&self, identifier: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(identifier.to_string(), Arc::new(Semaphore::new(0)));
    }

    fn release(&self, identifier: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(identifier) {
            gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }
}

#[async_trait]
impl RemoteStorageService for GatedStorage {
    async fn resolve(&self, identifier: &str) -> vizion_core::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().get(identifier).cloned();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await.unwrap();
        }
        let path = identifier
            .strip_prefix("gs://b/")
            .ok_or_else(|| VizionError::not_found("Object", identifier))?;
        Ok(format!("https://cdn.test/{path}"))
    }
}

/// Serves a solid PNG per URL
struct SolidCovers {
    colors: HashMap<String, [u8; 3]>,
}

#[async_trait]
impl ImageSource for SolidCovers {
    async fn fetch(&self, url: &str) -> vizion_core::Result<Vec<u8>> {
        let [r, g, b] = *self
            .colors
            .get(url)
            .ok_or_else(|| VizionError::not_found("Image", url))?;
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([r, g, b, 255])))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| VizionError::decode(e.to_string()))?;
        Ok(bytes)
    }
}

#[derive(Default)]
struct RecordingAdapter {
    loads: Mutex<Vec<String>>,
    plays: AtomicUsize,
    pauses: AtomicUsize,
    seeks: Mutex<Vec<Duration>>,
    position: Mutex<Duration>,
    rejected: Mutex<HashSet<String>>,
}

impl RecordingAdapter {
    fn loads(&self) -> Vec<String> {
        self.loads.lock().unwrap().clone()
    }

    fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    fn reject(&self, url: &str) {
        self.rejected.lock().unwrap().insert(url.to_string());
    }
}

impl PlaybackAdapter for RecordingAdapter {
    fn load(&self, url: &str) -> vizion_core::Result<()> {
        if self.rejected.lock().unwrap().contains(url) {
            return Err(VizionError::adapter(format!("unsupported source {url}")));
        }
        self.loads.lock().unwrap().push(url.to_string());
        Ok(())
    }

    fn play(&self) -> vizion_core::Result<()> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&self) -> vizion_core::Result<()> {
        self.pauses.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn seek(&self, position: Duration) -> vizion_core::Result<()> {
        self.seeks.lock().unwrap().push(position);
        *self.position.lock().unwrap() = position;
        Ok(())
    }

    fn position(&self) -> Duration {
        *self.position.lock().unwrap()
    }
}

/// Records applied themes along with the selection the store reports at
/// that moment
#[derive(Default)]
struct RecordingTheme {
    applied: Mutex<Vec<ColorTriple>>,
    store: OnceLock<Arc<PlaylistStateStore>>,
    selections: Mutex<Vec<Option<TrackId>>>,
}

impl RecordingTheme {
    fn applied(&self) -> Vec<ColorTriple> {
        self.applied.lock().unwrap().clone()
    }

    fn selections(&self) -> Vec<Option<TrackId>> {
        self.selections.lock().unwrap().clone()
    }
}

impl ThemeConsumer for RecordingTheme {
    fn apply_theme(&self, colors: &ColorTriple) {
        self.applied.lock().unwrap().push(*colors);
        if let Some(store) = self.store.get() {
            let selected = store.snapshot().current_id().cloned();
            self.selections.lock().unwrap().push(selected);
        }
    }
}

// ===== Harness =====

const RED: [u8; 3] = [200, 30, 30];
const BLUE: [u8; 3] = [20, 40, 220];
const GREEN: [u8; 3] = [30, 180, 60];

fn track(id: &str) -> Track {
    Track::new(
        id,
        format!("Track {id}"),
        format!("gs://b/{id}.mp3"),
        format!("gs://b/{id}.jpg"),
    )
}

fn audio_url(id: &str) -> String {
    format!("https://cdn.test/{id}.mp3")
}

struct Harness {
    store: Arc<PlaylistStateStore>,
    storage: Arc<GatedStorage>,
    adapter: Arc<RecordingAdapter>,
    theme: Arc<RecordingTheme>,
    catalog: Arc<InMemoryCatalog>,
    session: PlaybackSession,
}

impl Harness {
    fn new(config: PlaybackConfig) -> Self {
        let tracks = vec![track("a"), track("b"), track("c")];
        let store = Arc::new(PlaylistStateStore::new());
        store.set_catalog(tracks.clone());

        let storage = Arc::new(GatedStorage::default());
        let resolver = Arc::new(ResourceResolver::new(
            storage.clone(),
            ResolverConfig::default(),
        ));
        let covers = SolidCovers {
            colors: HashMap::from([
                ("https://cdn.test/a.jpg".to_string(), RED),
                ("https://cdn.test/b.jpg".to_string(), BLUE),
                ("https://cdn.test/c.jpg".to_string(), GREEN),
            ]),
        };
        let extractor = Arc::new(ColorExtractor::new(
            Arc::new(covers),
            ExtractionConfig::default(),
        ));

        let adapter = Arc::new(RecordingAdapter::default());
        let theme = Arc::new(RecordingTheme::default());
        let _ = theme.store.set(Arc::clone(&store));
        let catalog = Arc::new(InMemoryCatalog::new(tracks));

        let session = PlaybackSession::new(
            Arc::clone(&store),
            resolver,
            extractor,
            SessionCollaborators {
                adapter: adapter.clone(),
                theme: theme.clone(),
                catalog: catalog.clone(),
            },
            config,
        );
        // Catalog push during setup is not interesting to the tests
        session.pump();

        Self {
            store,
            storage,
            adapter,
            theme,
            catalog,
            session,
        }
    }

    fn arm(&self, ids: &[&str]) {
        self.store.arm_playlist(ArmedPlaylist::new(
            PlaylistId::new("p"),
            "Test",
            UserId::new("u"),
            ids.iter().map(|id| TrackId::new(*id)).collect(),
        ));
    }

    /// Apply queued selection events and wait for the spawned work
    async fn sync(&self) {
        self.session.pump();
        self.session.settle().await;
    }

    /// Load `id` and report it ready
    async fn load(&self, id: &str) {
        self.store.select_track(track(id));
        self.sync().await;
        self.session.handle_adapter_event(AdapterEvent::Loaded {
            duration: Duration::from_secs(200),
        });
    }
}

async fn wait_until(condition: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

fn triple_for(rgb: [u8; 3]) -> ColorTriple {
    vizion_artwork::palette::derive_triple(Rgb::new(rgb[0], rgb[1], rgb[2]))
}

// ===== Selection and race handling =====

#[tokio::test]
async fn selection_loads_audio_and_applies_theme() {
    let h = Harness::new(PlaybackConfig::default());

    h.store.select_track(track("a"));
    h.sync().await;

    assert_eq!(h.adapter.loads(), vec![audio_url("a")]);
    assert_eq!(h.theme.applied(), vec![triple_for(RED)]);
    assert_eq!(h.session.state(), SessionState::Loading);
    assert_eq!(h.session.loaded_track(), Some(TrackId::new("a")));
}

#[tokio::test]
async fn last_selection_wins_over_slow_earlier_one() {
    let h = Harness::new(PlaybackConfig::default());
    h.storage.gate("gs://b/a.mp3");
    h.storage.gate("gs://b/a.jpg");

    h.store.select_track(track("a"));
    h.session.pump();
    h.store.select_track(track("b"));
    h.session.pump();

    let adapter = h.adapter.clone();
    wait_until(move || !adapter.loads().is_empty()).await;
    h.storage.release("gs://b/a.mp3");
    h.storage.release("gs://b/a.jpg");
    h.session.settle().await;

    assert_eq!(h.adapter.loads(), vec![audio_url("b")]);
    assert_eq!(h.theme.applied(), vec![triple_for(BLUE)]);

    let discarded: Vec<_> = h
        .session
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            SessionEvent::StaleResultDiscarded { track_id, kind, .. } => Some((track_id, kind)),
            _ => None,
        })
        .collect();
    assert!(discarded.contains(&(TrackId::new("a"), WorkKind::Audio)));
    assert!(discarded.contains(&(TrackId::new("a"), WorkKind::Theme)));
}

#[tokio::test]
async fn repeated_selection_resolves_each_reference_once() {
    let h = Harness::new(PlaybackConfig::default());

    h.store.select_track(track("a"));
    h.sync().await;
    h.store.select_track(track("a"));
    h.sync().await;

    assert_eq!(h.adapter.loads().len(), 2);
    // audio + cover art, served from cache the second time
    assert_eq!(h.storage.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn plain_urls_skip_storage() {
    let h = Harness::new(PlaybackConfig::default());
    let direct = Track::new("d", "Direct", "https://cdn.test/d.mp3", "");

    h.store.select_track(direct);
    h.sync().await;

    assert_eq!(h.adapter.loads(), vec!["https://cdn.test/d.mp3".to_string()]);
    assert_eq!(h.theme.applied(), vec![ColorTriple::FALLBACK]);
    assert_eq!(h.storage.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unresolvable_cover_falls_back_to_neutral_theme() {
    let h = Harness::new(PlaybackConfig::default());
    let odd = Track::new("x", "Odd", "gs://b/x.mp3", "gs://elsewhere/x.jpg");

    h.store.select_track(odd);
    h.sync().await;

    assert_eq!(h.theme.applied(), vec![ColorTriple::FALLBACK]);
}

// ===== Playing intent =====

#[tokio::test]
async fn paused_session_loads_without_starting() {
    let h = Harness::new(PlaybackConfig::default());

    h.load("a").await;
    assert_eq!(h.session.state(), SessionState::Ready);
    assert_eq!(h.adapter.plays(), 0);

    h.session.play().unwrap();
    h.session.pause().unwrap();
    assert_eq!(h.session.state(), SessionState::Paused);

    h.load("b").await;
    assert_eq!(h.session.state(), SessionState::Ready);
    assert_eq!(h.adapter.plays(), 1);
}

#[tokio::test]
async fn playing_session_autostarts_next_track() {
    let h = Harness::new(PlaybackConfig::default());

    h.load("a").await;
    h.session.play().unwrap();
    assert_eq!(h.session.state(), SessionState::Playing);

    h.load("b").await;

    assert_eq!(h.session.state(), SessionState::Playing);
    assert_eq!(h.adapter.plays(), 2);
    assert!(h.session.playing_intent());
}

#[tokio::test]
async fn autoplay_first_starts_from_idle() {
    let h = Harness::new(PlaybackConfig {
        autoplay_first: true,
        ..PlaybackConfig::default()
    });

    h.load("a").await;

    assert_eq!(h.session.state(), SessionState::Playing);
    assert_eq!(h.adapter.plays(), 1);
}

#[tokio::test]
async fn play_during_load_is_deferred() {
    let h = Harness::new(PlaybackConfig::default());
    h.store.select_track(track("a"));
    h.sync().await;

    h.session.play().unwrap();
    assert_eq!(h.adapter.plays(), 0);

    h.session.handle_adapter_event(AdapterEvent::Loaded {
        duration: Duration::from_secs(90),
    });
    assert_eq!(h.session.state(), SessionState::Playing);
    assert_eq!(h.adapter.plays(), 1);
}

#[tokio::test]
async fn toggle_flips_between_playing_and_paused() {
    let h = Harness::new(PlaybackConfig::default());
    h.load("a").await;

    h.session.toggle_play_pause().unwrap();
    assert_eq!(h.session.state(), SessionState::Playing);

    h.session.toggle_play_pause().unwrap();
    assert_eq!(h.session.state(), SessionState::Paused);
}

#[tokio::test]
async fn transport_requires_a_track() {
    let h = Harness::new(PlaybackConfig::default());

    assert!(matches!(h.session.play(), Err(PlaybackError::NoTrackLoaded)));
    assert!(matches!(h.session.pause(), Err(PlaybackError::NoTrackLoaded)));
    assert!(matches!(h.session.seek(50.0), Err(PlaybackError::NoTrackLoaded)));
    assert_eq!(h.session.position(), Duration::ZERO);
    assert!(h.session.progress_percent().abs() < f64::EPSILON);
}

// ===== Ended and navigation =====

#[tokio::test]
async fn ended_advances_through_the_playlist() {
    let h = Harness::new(PlaybackConfig::default());
    h.arm(&["a", "b", "c"]);
    h.sync().await;
    h.session.handle_adapter_event(AdapterEvent::Loaded {
        duration: Duration::from_secs(60),
    });
    h.session.play().unwrap();

    h.session.handle_adapter_event(AdapterEvent::Ended);
    h.sync().await;

    assert_eq!(h.store.current_track().unwrap().id, TrackId::new("b"));
    assert_eq!(h.adapter.loads(), vec![audio_url("a"), audio_url("b")]);
    assert!(h.session.playing_intent());
}

#[tokio::test]
async fn ended_without_playlist_stops_at_ready() {
    let h = Harness::new(PlaybackConfig::default());
    h.load("a").await;
    h.session.play().unwrap();

    h.session.handle_adapter_event(AdapterEvent::Ended);

    assert_eq!(h.session.state(), SessionState::Ready);
    assert_eq!(h.session.pump(), 0);
}

#[tokio::test]
async fn previous_wraps_through_session() {
    let h = Harness::new(PlaybackConfig::default());
    h.arm(&["a", "b", "c"]);
    h.sync().await;

    assert_eq!(h.session.previous().unwrap().id, TrackId::new("c"));
    assert_eq!(h.session.next().unwrap().id, TrackId::new("a"));
}

#[tokio::test]
async fn empty_playlist_navigation_is_noop() {
    let h = Harness::new(PlaybackConfig::default());
    h.store.select_track(track("b"));
    h.arm(&[]);
    h.sync().await;

    assert!(h.session.next().is_none());
    assert!(h.session.previous().is_none());
    assert_eq!(h.store.current_track().unwrap().id, TrackId::new("b"));
}

#[tokio::test]
async fn shuffle_rearms_and_selects_first() {
    let h = Harness::new(PlaybackConfig::default());
    h.arm(&["a", "b", "c"]);
    h.sync().await;

    let selected = h.session.shuffle().unwrap();
    let armed = h.store.armed_playlist().unwrap();

    assert_eq!(selected.id, armed.track_ids[0]);
    let mut ids = armed.track_ids.clone();
    ids.sort();
    assert_eq!(ids, ["a", "b", "c"].map(TrackId::new).to_vec());
}

#[tokio::test]
async fn default_playlist_shuffles_the_catalog() {
    let h = Harness::new(PlaybackConfig::default());

    let selected = h.session.arm_default_playlist().unwrap();
    let armed = h.store.armed_playlist().unwrap();

    assert_eq!(armed.id, PlaylistId::new("default"));
    assert_eq!(armed.name, "All Tracks");
    assert_eq!(armed.created_by, UserId::new("system"));
    assert_eq!(selected.id, armed.track_ids[0]);
    assert_eq!(armed.len(), 3);
}

#[tokio::test]
async fn default_playlist_needs_tracks() {
    let h = Harness::new(PlaybackConfig::default());
    h.store.set_catalog(Vec::new());

    assert!(h.session.arm_default_playlist().is_none());
    assert!(h.store.armed_playlist().is_none());
}

// ===== Failures =====

#[tokio::test]
async fn rejected_load_keeps_previous_state() {
    let h = Harness::new(PlaybackConfig::default());
    h.load("a").await;
    h.session.play().unwrap();
    h.session.drain_events();
    h.adapter.reject(&audio_url("b"));

    h.store.select_track(track("b"));
    h.sync().await;

    assert_eq!(h.session.state(), SessionState::Playing);
    assert_eq!(h.session.loaded_track(), Some(TrackId::new("a")));
    assert_eq!(h.session.duration(), Some(Duration::from_secs(200)));
    let failures: Vec<_> = h
        .session
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, SessionEvent::LoadFailed { .. }))
        .collect();
    assert_eq!(
        failures,
        vec![SessionEvent::LoadFailed {
            track_id: Some(TrackId::new("b")),
            message: format!(
                "Failed to load track b: Playback adapter error: unsupported source {}",
                audio_url("b")
            ),
        }]
    );
}

#[tokio::test]
async fn adapter_error_during_load_returns_to_idle() {
    let h = Harness::new(PlaybackConfig::default());
    h.store.select_track(track("a"));
    h.sync().await;

    h.session.handle_adapter_event(AdapterEvent::Error {
        message: "network stalled".to_string(),
    });

    assert_eq!(h.session.state(), SessionState::Idle);
    assert!(h.session.drain_events().contains(&SessionEvent::LoadFailed {
        track_id: Some(TrackId::new("a")),
        message: "Failed to load track a: network stalled".to_string(),
    }));
    assert_eq!(h.session.loaded_track(), None);
}

// ===== Late adapter events =====

#[tokio::test]
async fn late_loaded_from_previous_track_does_not_complete_new_load() {
    let h = Harness::new(PlaybackConfig::default());
    h.store.select_track(track("a"));
    h.sync().await;
    h.session.play().unwrap();
    h.storage.gate("gs://b/b.mp3");

    h.store.select_track(track("b"));
    h.session.pump();
    // a's readiness arrives after b was picked
    h.session.handle_adapter_event(AdapterEvent::Loaded {
        duration: Duration::from_secs(100),
    });

    assert_eq!(h.session.state(), SessionState::Loading);
    assert_eq!(h.session.duration(), None);
    assert_eq!(h.adapter.plays(), 0);

    h.storage.release("gs://b/b.mp3");
    h.session.settle().await;
    h.session.handle_adapter_event(AdapterEvent::Loaded {
        duration: Duration::from_secs(200),
    });

    assert_eq!(h.adapter.loads(), vec![audio_url("a"), audio_url("b")]);
    assert_eq!(h.session.state(), SessionState::Playing);
    assert_eq!(h.adapter.plays(), 1);
    assert_eq!(h.session.duration(), Some(Duration::from_secs(200)));
    assert_eq!(h.session.loaded_track(), Some(TrackId::new("b")));
    let loaded: Vec<_> = h
        .session
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, SessionEvent::TrackLoaded { .. }))
        .collect();
    assert_eq!(
        loaded,
        vec![SessionEvent::TrackLoaded {
            track_id: TrackId::new("b"),
            duration: Duration::from_secs(200),
        }]
    );
}

#[tokio::test]
async fn playing_track_keeps_intent_across_late_loaded() {
    let h = Harness::new(PlaybackConfig::default());
    h.load("a").await;
    h.session.play().unwrap();
    h.storage.gate("gs://b/b.mp3");

    h.store.select_track(track("b"));
    h.session.pump();
    h.session.handle_adapter_event(AdapterEvent::Loaded {
        duration: Duration::from_secs(100),
    });
    h.storage.release("gs://b/b.mp3");
    h.session.settle().await;
    h.session.handle_adapter_event(AdapterEvent::Loaded {
        duration: Duration::from_secs(200),
    });

    assert_eq!(h.session.state(), SessionState::Playing);
    assert_eq!(h.adapter.plays(), 2);
}

#[tokio::test]
async fn late_ended_from_previous_track_does_not_skip() {
    let h = Harness::new(PlaybackConfig::default());
    h.arm(&["a", "b", "c"]);
    h.sync().await;
    h.session.handle_adapter_event(AdapterEvent::Loaded {
        duration: Duration::from_secs(60),
    });
    h.session.play().unwrap();
    h.storage.gate("gs://b/b.mp3");

    assert_eq!(h.session.next().unwrap().id, TrackId::new("b"));
    h.session.pump();
    // a finishes while b is still resolving
    h.session.handle_adapter_event(AdapterEvent::Ended);

    assert_eq!(h.store.current_track().unwrap().id, TrackId::new("b"));
    assert_eq!(h.session.pump(), 0);

    h.storage.release("gs://b/b.mp3");
    h.session.settle().await;
    assert_eq!(h.adapter.loads(), vec![audio_url("a"), audio_url("b")]);
    assert_eq!(h.store.current_track().unwrap().id, TrackId::new("b"));
}

#[tokio::test]
async fn late_error_from_previous_track_keeps_new_load() {
    let h = Harness::new(PlaybackConfig::default());
    h.load("a").await;
    h.session.play().unwrap();
    h.storage.gate("gs://b/b.mp3");

    h.store.select_track(track("b"));
    h.session.pump();
    h.session.handle_adapter_event(AdapterEvent::Error {
        message: "decoder gave up".to_string(),
    });
    assert_eq!(h.session.state(), SessionState::Loading);

    h.storage.release("gs://b/b.mp3");
    h.session.settle().await;
    h.session.handle_adapter_event(AdapterEvent::Loaded {
        duration: Duration::from_secs(120),
    });

    assert_eq!(h.session.state(), SessionState::Playing);
    assert_eq!(h.session.loaded_track(), Some(TrackId::new("b")));
    assert!(!h
        .session
        .drain_events()
        .iter()
        .any(|event| matches!(event, SessionEvent::LoadFailed { .. })));
}

#[tokio::test]
async fn duration_is_unknown_while_next_track_loads() {
    let h = Harness::new(PlaybackConfig::default());
    h.load("a").await;
    h.storage.gate("gs://b/b.mp3");

    h.store.select_track(track("b"));
    h.session.pump();

    assert_eq!(h.session.duration(), None);
    assert!(matches!(h.session.seek(50.0), Err(PlaybackError::NoTrackLoaded)));
    assert!(h.session.progress_percent().abs() < f64::EPSILON);

    h.storage.release("gs://b/b.mp3");
    h.session.settle().await;
}

#[tokio::test]
async fn theme_consumer_may_read_the_store_while_applying() {
    let h = Harness::new(PlaybackConfig::default());

    h.store.select_track(track("a"));
    h.sync().await;
    h.store.select_track(track("c"));
    h.sync().await;

    assert_eq!(h.theme.applied(), vec![triple_for(RED), triple_for(GREEN)]);
    assert_eq!(
        h.theme.selections(),
        vec![Some(TrackId::new("a")), Some(TrackId::new("c"))]
    );
}

// ===== Seek and progress =====

#[tokio::test]
async fn seek_maps_percent_and_clamps() {
    let h = Harness::new(PlaybackConfig::default());
    h.load("a").await;

    assert_eq!(h.session.seek(50.0).unwrap(), Duration::from_secs(100));
    assert_eq!(h.session.seek(150.0).unwrap(), Duration::from_secs(200));
    assert_eq!(h.session.seek(-10.0).unwrap(), Duration::ZERO);
    assert_eq!(h.session.seek(f64::NAN).unwrap(), Duration::ZERO);
    assert_eq!(h.adapter.seeks.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn progress_is_inverse_of_seek() {
    let h = Harness::new(PlaybackConfig::default());
    h.load("a").await;

    h.session.seek(25.0).unwrap();

    assert_eq!(h.session.position(), Duration::from_secs(50));
    assert!((h.session.progress_percent() - 25.0).abs() < 1e-9);
}

// ===== Catalog refresh =====

#[tokio::test]
async fn catalog_refresh_does_not_strand_pending_load() {
    let h = Harness::new(PlaybackConfig::default());
    h.storage.gate("gs://b/a.mp3");

    h.store.select_track(track("a"));
    h.session.pump();
    h.catalog.upsert(track("z"));
    assert_eq!(h.session.refresh_catalog(), 4);
    h.session.pump();

    h.storage.release("gs://b/a.mp3");
    h.session.settle().await;

    assert_eq!(h.adapter.loads(), vec![audio_url("a")]);
    assert_eq!(h.theme.applied(), vec![triple_for(RED)]);
    assert_eq!(h.store.catalog().len(), 4);
}

// ===== Event loop =====

#[tokio::test]
async fn run_loop_follows_store_and_adapter() {
    let h = Harness::new(PlaybackConfig::default());
    let (adapter_tx, adapter_rx) = mpsc::unbounded_channel();
    let session = h.session.clone();
    let handle = tokio::spawn(async move { session.run(adapter_rx).await });

    h.store.select_track(track("c"));
    let adapter = h.adapter.clone();
    wait_until(move || adapter.loads() == vec![audio_url("c")]).await;

    adapter_tx
        .send(AdapterEvent::Loaded {
            duration: Duration::from_secs(30),
        })
        .unwrap();
    let session = h.session.clone();
    wait_until(move || session.state() == SessionState::Ready).await;

    h.store.teardown();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(h.store.subscriber_count(), 0);
}
