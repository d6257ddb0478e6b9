use crate::cluster::{average_color, dominant_cluster_color};
use crate::config::{BaseColorMode, ExtractionConfig};
use crate::error::{ArtworkError, Result};
use crate::palette::derive_triple;
use crate::sampling::{decode_image, sample_pixels};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};
use vizion_core::{ColorTriple, ImageSource};

/// Derives theme colors from cover art, with an optional LRU cache keyed by URL
pub struct ColorExtractor {
    source: Arc<dyn ImageSource>,
    config: ExtractionConfig,
    cache: Option<Mutex<LruCache<String, ColorTriple>>>,
}

impl ColorExtractor {
    /// Create an extractor.
    ///
    /// `config.cache_size == 0` disables caching.
    pub fn new(source: Arc<dyn ImageSource>, config: ExtractionConfig) -> Self {
        let cache = NonZeroUsize::new(config.cache_size).map(|size| Mutex::new(LruCache::new(size)));
        Self {
            source,
            config,
            cache,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Theme for the image at `url`.
    ///
    /// Never fails: fetch or decode problems and images without opaque
    /// pixels all produce [`ColorTriple::FALLBACK`].
    pub async fn extract(&self, url: &str) -> ColorTriple {
        match self.try_extract(url).await {
            Ok(triple) => triple,
            Err(e) => {
                warn!(url = %url, error = %e, "Color extraction failed, using fallback theme");
                ColorTriple::FALLBACK
            }
        }
    }

    /// Theme for the image at `url`, surfacing the failure cause
    pub async fn try_extract(&self, url: &str) -> Result<ColorTriple> {
        if let Some(hit) = self.cached(url) {
            debug!(url = %url, "Theme served from cache");
            return Ok(hit);
        }

        let bytes = self.source.fetch(url).await?;
        // Decoding a full-size cover is CPU-bound
        let config = self.config.clone();
        let triple = tokio::task::spawn_blocking(move || triple_from_bytes(&bytes, &config))
            .await
            .map_err(|e| ArtworkError::Task(e.to_string()))??;

        if let Some(cache) = &self.cache {
            cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .put(url.to_string(), triple);
        }

        Ok(triple)
    }

    /// Theme for already-fetched image bytes.
    ///
    /// Runs on the calling thread.
    pub fn extract_from_bytes(&self, bytes: &[u8]) -> Result<ColorTriple> {
        triple_from_bytes(bytes, &self.config)
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().unwrap_or_else(PoisonError::into_inner).clear();
        }
    }

    /// Number of cached themes
    pub fn cache_len(&self) -> usize {
        self.cache
            .as_ref()
            .map(|cache| cache.lock().unwrap_or_else(PoisonError::into_inner).len())
            .unwrap_or(0)
    }

    fn cached(&self, url: &str) -> Option<ColorTriple> {
        let cache = self.cache.as_ref()?;
        cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .copied()
    }
}

fn triple_from_bytes(bytes: &[u8], config: &ExtractionConfig) -> Result<ColorTriple> {
    let image = decode_image(bytes)?;
    let samples = sample_pixels(&image, config.grid_size, config.alpha_threshold)?;

    let base = match config.mode {
        BaseColorMode::Average => average_color(&samples),
        BaseColorMode::Clustering {
            k,
            max_iterations,
            seed,
        } => dominant_cluster_color(&samples, k, max_iterations, seed),
    }
    .ok_or(ArtworkError::NoValidPixels)?;

    Ok(derive_triple(base))
}
