//! Playback session orchestration
//!
//! The session reacts to selection changes coming from the store:
//!
//! 1. Capture the store generation.
//! 2. Resolve the audio reference and hand the URL to the adapter, unless the
//!    generation moved on in the meantime.
//! 3. Independently resolve the cover art, extract the theme, and hand it to
//!    the theme consumer under the same generation check.
//!
//! Stale results are dropped silently (logged at debug), so the last selection
//! always wins regardless of which lookup finishes first.
//!
//! The generation check and the hand-off run under the session status lock.
//! Adapter and theme callbacks therefore must not call back into the session;
//! reading the store from them is fine.
//!
//! Adapter events carry no track identity. A `Loaded` or `Error` only counts
//! once the current selection's audio has been handed over, and `Ended` only
//! counts while playing. Anything else belongs to a superseded source.

use crate::error::{PlaybackError, Result};
use crate::events::{SelectionEvent, SessionEvent};
use crate::navigation::NavigationController;
use crate::shuffle::fisher_yates;
use crate::store::PlaylistStateStore;
use crate::types::{PlaybackConfig, SessionState, WorkKind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use vizion_artwork::ColorExtractor;
use vizion_core::{
    AdapterEvent, ArmedPlaylist, ColorTriple, PlaybackAdapter, PlaylistId, ThemeConsumer, Track,
    TrackCatalog, TrackId, UserId,
};
use vizion_resolver::ResourceResolver;

/// External collaborators driven by the session
#[derive(Clone)]
pub struct SessionCollaborators {
    /// Audio output
    pub adapter: Arc<dyn PlaybackAdapter>,
    /// Receives derived themes
    pub theme: Arc<dyn ThemeConsumer>,
    /// Source of catalog refreshes
    pub catalog: Arc<dyn TrackCatalog>,
}

/// Work still owed to the selected track
struct PendingWork {
    track: Track,
    audio: bool,
    theme: bool,
}

struct SessionStatus {
    state: SessionState,
    /// State restored when a load is rejected
    resume_state: SessionState,
    resume_duration: Option<Duration>,
    playing_intent: bool,
    duration: Option<Duration>,
    loaded_track: Option<TrackId>,
    /// Set once the selected track's audio is with the adapter and its
    /// `Loaded` has not arrived yet
    awaiting_loaded: bool,
    pending: Option<PendingWork>,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self {
            state: SessionState::Idle,
            resume_state: SessionState::Idle,
            resume_duration: None,
            playing_intent: false,
            duration: None,
            loaded_track: None,
            awaiting_loaded: false,
            pending: None,
        }
    }
}

struct SessionInner {
    store: Arc<PlaylistStateStore>,
    navigation: NavigationController,
    resolver: Arc<ResourceResolver>,
    extractor: Arc<ColorExtractor>,
    collaborators: SessionCollaborators,
    config: PlaybackConfig,
    status: Mutex<SessionStatus>,
    pending_events: Mutex<Vec<SessionEvent>>,
    tasks: Mutex<JoinSet<()>>,
    selection_events: Mutex<Option<mpsc::UnboundedReceiver<SelectionEvent>>>,
}

/// Orchestrates resolution, theming, and the playback adapter
#[derive(Clone)]
pub struct PlaybackSession {
    inner: Arc<SessionInner>,
}

impl PlaybackSession {
    /// Create a session subscribed to `store`
    pub fn new(
        store: Arc<PlaylistStateStore>,
        resolver: Arc<ResourceResolver>,
        extractor: Arc<ColorExtractor>,
        collaborators: SessionCollaborators,
        config: PlaybackConfig,
    ) -> Self {
        let selection_events = store.subscribe();
        let navigation = NavigationController::new(Arc::clone(&store));

        Self {
            inner: Arc::new(SessionInner {
                store,
                navigation,
                resolver,
                extractor,
                collaborators,
                config,
                status: Mutex::new(SessionStatus::default()),
                pending_events: Mutex::new(Vec::new()),
                tasks: Mutex::new(JoinSet::new()),
                selection_events: Mutex::new(Some(selection_events)),
            }),
        }
    }

    /// The store this session follows
    pub fn store(&self) -> &Arc<PlaylistStateStore> {
        &self.inner.store
    }

    /// Navigation over the session's store
    pub fn navigation(&self) -> &NavigationController {
        &self.inner.navigation
    }

    /// Session configuration
    pub fn config(&self) -> &PlaybackConfig {
        &self.inner.config
    }

    // ===== Event loop =====

    /// Process store and adapter events until either channel closes.
    ///
    /// Outstanding resolution tasks are awaited before returning.
    pub async fn run(&self, mut adapter_events: mpsc::UnboundedReceiver<AdapterEvent>) {
        let Some(mut selection_events) = self
            .inner
            .selection_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        else {
            warn!("Playback session loop is already running");
            return;
        };

        info!("Playback session started");
        loop {
            tokio::select! {
                event = selection_events.recv() => match event {
                    Some(event) => self.handle_selection_event(event),
                    None => break,
                },
                event = adapter_events.recv() => match event {
                    Some(event) => self.handle_adapter_event(event),
                    None => break,
                },
            }
        }

        self.settle().await;
        info!("Playback session stopped");
    }

    /// Handle every store event queued so far.
    ///
    /// For driving the session without [`run`](Self::run). Returns the number
    /// of events handled.
    pub fn pump(&self) -> usize {
        let mut handled = 0;
        loop {
            let event = {
                let mut receiver = self
                    .inner
                    .selection_events
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                match receiver.as_mut().map(mpsc::UnboundedReceiver::try_recv) {
                    Some(Ok(event)) => event,
                    _ => break,
                }
            };
            self.handle_selection_event(event);
            handled += 1;
        }
        handled
    }

    /// Wait for all spawned resolution work to finish
    pub async fn settle(&self) {
        loop {
            let mut tasks = std::mem::take(&mut *self.lock_tasks());
            if tasks.is_empty() {
                break;
            }
            while let Some(result) = tasks.join_next().await {
                if let Err(e) = result {
                    error!(error = %e, "Session task failed");
                }
            }
        }
    }

    /// React to a store mutation
    pub fn handle_selection_event(&self, event: SelectionEvent) {
        match event {
            SelectionEvent::TrackChanged { track, generation } => {
                self.begin_track(track, generation);
            }
            SelectionEvent::PlaylistArmed {
                track_selected: false,
                generation,
                ..
            }
            | SelectionEvent::CatalogReplaced { generation, .. } => {
                self.resume_pending(generation);
            }
            SelectionEvent::PlaylistArmed { .. } => {}
        }
    }

    /// React to an adapter notification
    pub fn handle_adapter_event(&self, event: AdapterEvent) {
        match event {
            AdapterEvent::Loaded { duration } => self.on_loaded(duration),
            AdapterEvent::Ended => self.on_ended(),
            AdapterEvent::Error { message } => self.on_adapter_error(message),
        }
    }

    /// Take every accumulated session event
    pub fn drain_events(&self) -> Vec<SessionEvent> {
        std::mem::take(
            &mut *self
                .inner
                .pending_events
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    // ===== Transport =====

    /// Start playback, or remember to once the pending load completes
    pub fn play(&self) -> Result<()> {
        let mut status = self.lock_status();
        match status.state {
            SessionState::Idle => Err(PlaybackError::NoTrackLoaded),
            SessionState::Loading => {
                status.playing_intent = true;
                Ok(())
            }
            SessionState::Playing => Ok(()),
            SessionState::Ready | SessionState::Paused => {
                self.inner.collaborators.adapter.play()?;
                status.playing_intent = true;
                self.transition(&mut status, SessionState::Playing);
                Ok(())
            }
        }
    }

    /// Pause playback, or cancel a pending auto-start
    pub fn pause(&self) -> Result<()> {
        let mut status = self.lock_status();
        match status.state {
            SessionState::Idle => Err(PlaybackError::NoTrackLoaded),
            SessionState::Playing => {
                self.inner.collaborators.adapter.pause()?;
                status.playing_intent = false;
                self.transition(&mut status, SessionState::Paused);
                Ok(())
            }
            SessionState::Loading | SessionState::Ready | SessionState::Paused => {
                status.playing_intent = false;
                Ok(())
            }
        }
    }

    /// Pause when playing (or about to), play otherwise
    pub fn toggle_play_pause(&self) -> Result<()> {
        let pausing = {
            let status = self.lock_status();
            status.state == SessionState::Playing
                || (status.state == SessionState::Loading && status.playing_intent)
        };
        if pausing {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Seek to `percent` (0-100) of the loaded track.
    ///
    /// Out-of-range input is clamped; NaN seeks to the start. Returns the
    /// position handed to the adapter.
    pub fn seek(&self, percent: f64) -> Result<Duration> {
        let duration = self.duration().ok_or(PlaybackError::NoTrackLoaded)?;
        let fraction = if percent.is_nan() {
            0.0
        } else {
            (percent / 100.0).clamp(0.0, 1.0)
        };
        let position = duration.mul_f64(fraction).min(duration);

        debug!(percent, position = ?position, "Seeking");
        self.inner.collaborators.adapter.seek(position)?;
        Ok(position)
    }

    /// Position reported by the adapter, zero when nothing is loaded
    pub fn position(&self) -> Duration {
        if self.duration().is_some() {
            self.inner.collaborators.adapter.position()
        } else {
            Duration::ZERO
        }
    }

    /// Position as 0-100 of the duration, the inverse of [`seek`](Self::seek)
    pub fn progress_percent(&self) -> f64 {
        match self.duration() {
            Some(duration) if !duration.is_zero() => {
                let position = self.inner.collaborators.adapter.position().min(duration);
                position.as_secs_f64() / duration.as_secs_f64() * 100.0
            }
            _ => 0.0,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.lock_status().state
    }

    /// Whether the next loaded track starts on its own
    pub fn playing_intent(&self) -> bool {
        self.lock_status().playing_intent
    }

    /// Duration of the loaded track
    pub fn duration(&self) -> Option<Duration> {
        self.lock_status().duration
    }

    /// Track whose audio was last handed to the adapter
    pub fn loaded_track(&self) -> Option<TrackId> {
        self.lock_status().loaded_track.clone()
    }

    // ===== Navigation =====

    /// Select the next track of the armed playlist
    pub fn next(&self) -> Option<Track> {
        self.inner.navigation.next()
    }

    /// Select the previous track of the armed playlist
    pub fn previous(&self) -> Option<Track> {
        self.inner.navigation.previous()
    }

    /// Shuffle the armed playlist and select its new first track
    pub fn shuffle(&self) -> Option<Track> {
        self.inner.navigation.shuffle()
    }

    /// Pull a fresh catalog and push it into the store.
    ///
    /// Returns the number of tracks.
    pub fn refresh_catalog(&self) -> usize {
        let tracks = self.inner.collaborators.catalog.list_tracks();
        let count = tracks.len();
        self.inner.store.set_catalog(tracks);
        info!(track_count = count, "Catalog refreshed");
        count
    }

    /// Arm the whole catalog in shuffled order.
    ///
    /// Does nothing on an empty catalog.
    pub fn arm_default_playlist(&self) -> Option<Track> {
        let catalog = self.inner.store.catalog();
        if catalog.is_empty() {
            debug!("Catalog is empty, not arming default playlist");
            return None;
        }

        let mut order = catalog.ids();
        fisher_yates(&mut order, &mut rand::thread_rng());

        let playlist = ArmedPlaylist::new(
            PlaylistId::new("default"),
            self.inner.config.default_playlist_name.clone(),
            UserId::new(self.inner.config.default_playlist_owner.clone()),
            order,
        );
        self.inner.store.arm_playlist(playlist)
    }

    // ===== Internals =====

    fn begin_track(&self, track: Track, generation: u64) {
        {
            let mut status = self.lock_status();
            let intent = match status.state {
                SessionState::Playing => true,
                SessionState::Ready | SessionState::Paused => false,
                SessionState::Idle => self.inner.config.autoplay_first,
                SessionState::Loading => status.playing_intent,
            };
            status.playing_intent = intent;
            if status.state != SessionState::Loading {
                status.resume_state = status.state;
                status.resume_duration = status.duration;
            }
            status.duration = None;
            status.awaiting_loaded = false;
            status.pending = Some(PendingWork {
                track: track.clone(),
                audio: true,
                theme: true,
            });
            self.transition(&mut status, SessionState::Loading);
        }

        debug!(track_id = %track.id, generation, "Selection changed");
        self.spawn_audio(track.clone(), generation);
        self.spawn_theme(track, generation);
    }

    /// Re-issue unfinished work under a generation that changed without a
    /// new track
    fn resume_pending(&self, generation: u64) {
        let work = {
            let status = self.lock_status();
            status
                .pending
                .as_ref()
                .map(|pending| (pending.track.clone(), pending.audio, pending.theme))
        };

        if let Some((track, audio, theme)) = work {
            debug!(track_id = %track.id, generation, audio, theme, "Re-issuing pending work");
            if audio {
                self.spawn_audio(track.clone(), generation);
            }
            if theme {
                self.spawn_theme(track, generation);
            }
        }
    }

    fn spawn_audio(&self, track: Track, generation: u64) {
        let session = self.clone();
        self.spawn(async move { session.load_audio(track, generation).await });
    }

    fn spawn_theme(&self, track: Track, generation: u64) {
        let session = self.clone();
        self.spawn(async move { session.apply_theme(track, generation).await });
    }

    fn spawn<F>(&self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.lock_tasks();
        while tasks.try_join_next().is_some() {}
        tasks.spawn(task);
    }

    async fn load_audio(&self, track: Track, generation: u64) {
        let url = self.inner.resolver.resolve(&track.audio_ref).await;

        let mut status = self.lock_status();
        if !self.inner.store.is_current(generation) {
            drop(status);
            self.discard(&track, generation, WorkKind::Audio);
            return;
        }

        let outcome = self.inner.collaborators.adapter.load(&url);
        if let Some(pending) = status.pending.as_mut().filter(|p| p.track.id == track.id) {
            pending.audio = false;
        }

        match outcome {
            Ok(()) => {
                debug!(track_id = %track.id, url = %url, "Audio handed to adapter");
                status.duration = None;
                status.loaded_track = Some(track.id.clone());
                status.awaiting_loaded = true;
            }
            Err(e) => {
                let err = PlaybackError::Load {
                    track_id: track.id.to_string(),
                    message: e.to_string(),
                };
                error!(url = %url, error = %err, "Adapter rejected track");
                // The previous source is still loaded
                status.duration = status.resume_duration;
                let resume = status.resume_state;
                self.transition(&mut status, resume);
                self.push_event(SessionEvent::LoadFailed {
                    track_id: Some(track.id.clone()),
                    message: err.to_string(),
                });
            }
        }
    }

    async fn apply_theme(&self, track: Track, generation: u64) {
        let colors = if track.has_cover_art() {
            let url = self.inner.resolver.resolve(&track.cover_art_ref).await;
            self.inner.extractor.extract(&url).await
        } else {
            ColorTriple::FALLBACK
        };

        let applied = {
            let mut status = self.lock_status();
            let current = self.inner.store.is_current(generation);
            if current {
                self.inner.collaborators.theme.apply_theme(&colors);
                if let Some(pending) = status.pending.as_mut().filter(|p| p.track.id == track.id) {
                    pending.theme = false;
                }
            }
            current
        };
        if !applied {
            self.discard(&track, generation, WorkKind::Theme);
            return;
        }

        debug!(track_id = %track.id, base = %colors.base, "Theme applied");
        self.push_event(SessionEvent::ThemeApplied {
            track_id: track.id,
            colors,
        });
    }

    fn discard(&self, track: &Track, generation: u64, kind: WorkKind) {
        debug!(
            track_id = %track.id,
            generation,
            kind = ?kind,
            "Discarding stale result"
        );
        self.push_event(SessionEvent::StaleResultDiscarded {
            track_id: track.id.clone(),
            generation,
            kind,
        });
    }

    fn on_loaded(&self, duration: Duration) {
        let mut status = self.lock_status();
        if !status.awaiting_loaded {
            debug!(
                duration = ?duration,
                state = ?status.state,
                "Ignoring load notification for a superseded source"
            );
            return;
        }
        status.awaiting_loaded = false;
        status.duration = Some(duration);

        if let Some(track_id) = status.loaded_track.clone() {
            self.push_event(SessionEvent::TrackLoaded { track_id, duration });
        }
        self.transition(&mut status, SessionState::Ready);

        if status.playing_intent {
            match self.inner.collaborators.adapter.play() {
                Ok(()) => self.transition(&mut status, SessionState::Playing),
                Err(e) => error!(error = %e, "Failed to start playback after load"),
            }
        }
    }

    fn on_ended(&self) {
        let state = self.state();
        if state != SessionState::Playing {
            debug!(state = ?state, "Ignoring end of a superseded source");
            return;
        }

        debug!("Track ended, advancing");
        if self.inner.navigation.next().is_none() {
            let mut status = self.lock_status();
            self.transition(&mut status, SessionState::Ready);
        }
    }

    fn on_adapter_error(&self, message: String) {
        let mut status = self.lock_status();

        if status.awaiting_loaded {
            // The selected track failed after the hand-off and the adapter
            // already dropped the previous source
            status.awaiting_loaded = false;
            status.duration = None;
            let track_id = status.loaded_track.take();
            let err = PlaybackError::Load {
                track_id: track_id.as_ref().map(ToString::to_string).unwrap_or_default(),
                message,
            };
            error!(error = %err, "Track failed to load");
            self.transition(&mut status, SessionState::Idle);
            self.push_event(SessionEvent::LoadFailed {
                track_id,
                message: err.to_string(),
            });
            return;
        }

        if status.state == SessionState::Loading {
            debug!(message = %message, "Ignoring error from a superseded source");
            return;
        }

        error!(message = %message, state = ?status.state, "Playback adapter error");
        let track_id = status.loaded_track.clone();
        self.push_event(SessionEvent::LoadFailed { track_id, message });
    }

    fn transition(&self, status: &mut SessionStatus, to: SessionState) {
        let from = status.state;
        if from == to {
            return;
        }
        status.state = to;
        debug!(from = ?from, to = ?to, "Session state changed");
        self.push_event(SessionEvent::StateChanged { from, to });
    }

    fn push_event(&self, event: SessionEvent) {
        self.inner
            .pending_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    fn lock_status(&self) -> MutexGuard<'_, SessionStatus> {
        self.inner.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_tasks(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.inner.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
