//! Vizion Runtime
//!
//! Composition root for the playback engine:
//! - [`RuntimeConfig`]: layered configuration (TOML file, then `VIZION__*`
//!   environment variables)
//! - [`init_logging`]: `tracing` subscriber with an `EnvFilter`
//! - [`SessionRuntime`]: `init` / `teardown` lifecycle around the store,
//!   resolver, color extraction, and playback session
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use vizion_runtime::{RuntimeCollaborators, RuntimeConfig, SessionRuntime};
//! # async fn start(
//! #     adapter: Arc<dyn vizion_core::PlaybackAdapter>,
//! #     theme: Arc<dyn vizion_core::ThemeConsumer>,
//! #     catalog: Arc<dyn vizion_core::TrackCatalog>,
//! # ) -> vizion_runtime::Result<()> {
//! let config = RuntimeConfig::load(None)?;
//! vizion_runtime::init_logging(&config.logging.filter);
//!
//! let collaborators = RuntimeCollaborators::http(&config, adapter, theme, catalog)?;
//! let runtime = SessionRuntime::init(config, collaborators)?;
//!
//! runtime.navigation().next();
//! runtime.teardown().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{LoggingConfig, RuntimeConfig, ENV_PREFIX};
pub use error::{Result, RuntimeError};
pub use logging::{init_logging, DEFAULT_FILTER};
pub use runtime::{AdapterEventSender, RuntimeCollaborators, SessionRuntime};
