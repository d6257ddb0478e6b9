/// Runtime configuration
use crate::error::{Result, RuntimeError};
use crate::logging::DEFAULT_FILTER;
use serde::{Deserialize, Serialize};
use std::path::Path;
use vizion_artwork::{BaseColorMode, ExtractionConfig};
use vizion_playback::PlaybackConfig;
use vizion_resolver::{ResolverConfig, StorageServiceConfig};

/// Environment variable prefix. Nested keys use `__`, e.g.
/// `VIZION__EXTRACTION__GRID_SIZE=64`.
pub const ENV_PREFIX: &str = "VIZION";

/// Everything needed to compose the engine
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub storage: StorageServiceConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    DEFAULT_FILTER.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from an optional TOML file and the environment.
    ///
    /// Environment variables override the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    pub(crate) fn load_with(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path).required(true));
        }
        settings = settings.add_source(env);

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.resolver.opaque_scheme.is_empty() {
            return Err(RuntimeError::Config(
                "resolver.opaque_scheme must not be empty".to_string(),
            ));
        }

        if self.resolver.placeholder_url.is_empty() {
            return Err(RuntimeError::Config(
                "resolver.placeholder_url must not be empty".to_string(),
            ));
        }

        if self.storage.request_timeout_secs == 0 {
            return Err(RuntimeError::Config(
                "storage.request_timeout_secs must be at least 1".to_string(),
            ));
        }

        if self.extraction.grid_size == 0 {
            return Err(RuntimeError::Config(
                "extraction.grid_size must be at least 1".to_string(),
            ));
        }

        if let BaseColorMode::Clustering {
            k, max_iterations, ..
        } = self.extraction.mode
        {
            if k == 0 {
                return Err(RuntimeError::Config(
                    "extraction.mode.k must be at least 1".to_string(),
                ));
            }
            if max_iterations == 0 {
                return Err(RuntimeError::Config(
                    "extraction.mode.max_iterations must be at least 1".to_string(),
                ));
            }
        }

        Ok(())
    }
}

pub(crate) fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
