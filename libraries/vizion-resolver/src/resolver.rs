//! Cached, deduplicated resolution of storage identifiers.

use crate::config::ResolverConfig;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, trace, warn};
use vizion_core::{RemoteStorageService, ResolvedResource};

type PendingLookup = Shared<BoxFuture<'static, String>>;
type ResourceCache = Arc<RwLock<HashMap<String, ResolvedResource>>>;
type InFlight = Arc<Mutex<HashMap<String, PendingLookup>>>;

/// Resolves opaque storage identifiers into fetchable URLs.
///
/// The cache is append-only: an entry is written once when its lookup
/// succeeds and never changes afterwards. A lookup is registered as in flight
/// until its result has been cached, so a caller sees either the cached entry
/// or the pending lookup, never neither.
pub struct ResourceResolver {
    storage: Arc<dyn RemoteStorageService>,
    config: ResolverConfig,
    cache: ResourceCache,
    in_flight: InFlight,
}

impl ResourceResolver {
    /// Create a resolver on top of a storage service
    pub fn new(storage: Arc<dyn RemoteStorageService>, config: ResolverConfig) -> Self {
        Self {
            storage,
            config,
            cache: Arc::new(RwLock::new(HashMap::new())),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Whether `identifier` needs a storage lookup
    pub fn is_opaque(&self, identifier: &str) -> bool {
        identifier.starts_with(&self.config.opaque_scheme)
    }

    /// URL handed out when a lookup fails
    pub fn placeholder_url(&self) -> &str {
        &self.config.placeholder_url
    }

    /// Resolve `identifier` to a usable URL.
    ///
    /// Never fails: a failed lookup yields the placeholder URL.
    pub async fn resolve(&self, identifier: &str) -> String {
        if !self.is_opaque(identifier) {
            return identifier.to_string();
        }

        let pending = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);

            if let Some(hit) = self.cached(identifier) {
                trace!(identifier = %identifier, "Resolved from cache");
                return hit.url;
            }

            match in_flight.get(identifier) {
                Some(existing) => {
                    debug!(identifier = %identifier, "Joining in-flight lookup");
                    existing.clone()
                }
                None => {
                    let lookup = self.start_lookup(identifier);
                    in_flight.insert(identifier.to_string(), lookup.clone());
                    lookup
                }
            }
        };

        pending.await
    }

    /// Cached resolution for `identifier`, if one has completed
    pub fn cached(&self, identifier: &str) -> Option<ResolvedResource> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identifier)
            .cloned()
    }

    /// Number of cached resolutions
    pub fn cache_len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of lookups currently awaiting storage
    pub fn in_flight_len(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn start_lookup(&self, identifier: &str) -> PendingLookup {
        let storage = Arc::clone(&self.storage);
        let cache = Arc::clone(&self.cache);
        let in_flight = Arc::clone(&self.in_flight);
        let placeholder = self.config.placeholder_url.clone();
        let identifier = identifier.to_string();

        debug!(identifier = %identifier, "Starting storage lookup");

        async move {
            let url = match storage.resolve(&identifier).await {
                Ok(url) => {
                    cache
                        .write()
                        .unwrap_or_else(PoisonError::into_inner)
                        .entry(identifier.clone())
                        .or_insert_with(|| ResolvedResource::new(identifier.clone(), url.clone()));
                    url
                }
                Err(e) => {
                    warn!(
                        identifier = %identifier,
                        error = %e,
                        "Failed to resolve storage reference, using placeholder"
                    );
                    placeholder
                }
            };

            in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&identifier);

            url
        }
        .boxed()
        .shared()
    }
}
