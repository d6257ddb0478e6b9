/// Resolver configuration
use serde::{Deserialize, Serialize};

/// Settings for [`crate::ResourceResolver`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Prefix marking an identifier as an opaque storage reference
    #[serde(default = "default_opaque_scheme")]
    pub opaque_scheme: String,

    /// URL returned when a lookup fails
    #[serde(default = "default_placeholder_url")]
    pub placeholder_url: String,
}

/// Settings for [`crate::FirebaseStorageService`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageServiceConfig {
    /// REST endpoint, without the `/b/<bucket>` suffix
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_opaque_scheme() -> String {
    "gs://".to_string()
}

fn default_placeholder_url() -> String {
    "https://placehold.co/300x300?text=Unavailable".to_string()
}

fn default_endpoint() -> String {
    "https://firebasestorage.googleapis.com/v0".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            opaque_scheme: default_opaque_scheme(),
            placeholder_url: default_placeholder_url(),
        }
    }
}

impl Default for StorageServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
