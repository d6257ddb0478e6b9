//! Logging initialisation

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the configuration sets one
pub const DEFAULT_FILTER: &str = "vizion=info";

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `filter`; an unparsable `filter` falls back to
/// [`DEFAULT_FILTER`]. Returns `false` if a subscriber was already installed.
pub fn init_logging(filter: &str) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
