/// Resolved storage resource
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A storage identifier together with the fetchable URL it resolved to.
///
/// Entries are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedResource {
    /// Opaque identifier that was resolved
    pub identifier: String,
    /// Usable URL
    pub url: String,
    /// When the lookup completed
    pub resolved_at: DateTime<Utc>,
}

impl ResolvedResource {
    /// Stamp a resolution with the current time
    pub fn new(identifier: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            url: url.into(),
            resolved_at: Utc::now(),
        }
    }
}
