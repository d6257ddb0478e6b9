//! Engine lifecycle
//!
//! [`SessionRuntime`] is the composition root: it owns the state store and
//! the session, runs the session loop on the ambient tokio runtime, and tears
//! everything down in order.

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use vizion_artwork::{ColorExtractor, HttpImageSource};
use vizion_core::{
    AdapterEvent, ImageSource, PlaybackAdapter, RemoteStorageService, ThemeConsumer, TrackCatalog,
};
use vizion_playback::{
    NavigationController, PlaybackSession, PlaylistStateStore, SessionCollaborators,
};
use vizion_resolver::{FirebaseStorageService, ResourceResolver};

/// External collaborators supplied by the embedding application
#[derive(Clone)]
pub struct RuntimeCollaborators {
    /// Blob storage lookups
    pub storage: Arc<dyn RemoteStorageService>,
    /// Cover art downloads
    pub images: Arc<dyn ImageSource>,
    /// Audio output
    pub adapter: Arc<dyn PlaybackAdapter>,
    /// Theme sink
    pub theme: Arc<dyn ThemeConsumer>,
    /// Catalog snapshots
    pub catalog: Arc<dyn TrackCatalog>,
}

impl RuntimeCollaborators {
    /// Firebase storage and plain HTTP image downloads, configured from `config`
    pub fn http(
        config: &RuntimeConfig,
        adapter: Arc<dyn PlaybackAdapter>,
        theme: Arc<dyn ThemeConsumer>,
        catalog: Arc<dyn TrackCatalog>,
    ) -> Result<Self> {
        let storage = FirebaseStorageService::new(config.storage.clone())?;
        let images = HttpImageSource::with_timeout(Duration::from_secs(
            config.storage.request_timeout_secs,
        ))?;

        Ok(Self {
            storage: Arc::new(storage),
            images: Arc::new(images),
            adapter,
            theme,
            catalog,
        })
    }
}

/// Handle the playback adapter uses to report back to the session
#[derive(Debug, Clone)]
pub struct AdapterEventSender {
    tx: mpsc::UnboundedSender<AdapterEvent>,
}

impl AdapterEventSender {
    /// Forward an event. Returns `false` once the session has stopped.
    pub fn send(&self, event: AdapterEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// The loaded source is ready
    pub fn loaded(&self, duration: Duration) -> bool {
        self.send(AdapterEvent::Loaded { duration })
    }

    /// The current source played to the end
    pub fn ended(&self) -> bool {
        self.send(AdapterEvent::Ended)
    }

    /// The adapter failed after accepting a source
    pub fn error(&self, message: impl Into<String>) -> bool {
        self.send(AdapterEvent::Error {
            message: message.into(),
        })
    }
}

/// Running engine: store, navigation, and session wired together
pub struct SessionRuntime {
    config: RuntimeConfig,
    store: Arc<PlaylistStateStore>,
    session: PlaybackSession,
    adapter_events: AdapterEventSender,
    session_loop: JoinHandle<()>,
}

impl SessionRuntime {
    /// Compose the engine and start the session loop.
    ///
    /// Must be called inside a tokio runtime.
    pub fn init(config: RuntimeConfig, collaborators: RuntimeCollaborators) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(PlaylistStateStore::new());
        let resolver = Arc::new(ResourceResolver::new(
            collaborators.storage,
            config.resolver.clone(),
        ));
        let extractor = Arc::new(ColorExtractor::new(
            collaborators.images,
            config.extraction.clone(),
        ));
        let session = PlaybackSession::new(
            Arc::clone(&store),
            resolver,
            extractor,
            SessionCollaborators {
                adapter: collaborators.adapter,
                theme: collaborators.theme,
                catalog: collaborators.catalog,
            },
            config.playback.clone(),
        );

        let track_count = session.refresh_catalog();
        if config.playback.arm_default_on_start && store.armed_playlist().is_none() {
            if let Some(track) = session.arm_default_playlist() {
                debug!(track_id = %track.id, "Default playlist armed");
            }
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let looped = session.clone();
        let session_loop = tokio::spawn(async move { looped.run(rx).await });

        info!(track_count, "Session runtime started");
        Ok(Self {
            config,
            store,
            session,
            adapter_events: AdapterEventSender { tx },
            session_loop,
        })
    }

    /// Configuration the runtime was built with
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Selection state store
    pub fn store(&self) -> &Arc<PlaylistStateStore> {
        &self.store
    }

    /// Next / previous / shuffle
    pub fn navigation(&self) -> &NavigationController {
        self.session.navigation()
    }

    /// Transport controls and session events
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// Sender for the playback adapter's notifications
    pub fn adapter_events(&self) -> AdapterEventSender {
        self.adapter_events.clone()
    }

    /// Close subscriptions and wait for the session loop to finish
    pub async fn teardown(self) -> Result<()> {
        info!("Tearing down session runtime");
        self.store.teardown();
        drop(self.adapter_events);

        self.session_loop
            .await
            .map_err(|e| RuntimeError::Task(e.to_string()))?;

        info!("Session runtime stopped");
        Ok(())
    }
}
