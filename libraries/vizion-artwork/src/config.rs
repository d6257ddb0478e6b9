/// Color extraction configuration
use serde::{Deserialize, Serialize};

/// How the base color is chosen from the sampled pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BaseColorMode {
    /// Arithmetic mean of every sampled pixel
    Average,

    /// Centroid of the largest k-means cluster.
    ///
    /// With `seed: None` centroids are seeded from entropy and the result
    /// can differ between runs for the same image.
    Clustering {
        /// Number of clusters
        #[serde(default = "default_k")]
        k: usize,
        /// Iteration cap; stops earlier once assignments settle
        #[serde(default = "default_max_iterations")]
        max_iterations: usize,
        /// Centroid seed
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl BaseColorMode {
    /// Seeded clustering with k=3 and 10 iterations
    pub const fn clustering() -> Self {
        Self::Clustering {
            k: default_k(),
            max_iterations: default_max_iterations(),
            seed: Some(DEFAULT_CLUSTER_SEED),
        }
    }
}

/// Seed used by [`BaseColorMode::clustering`]
pub const DEFAULT_CLUSTER_SEED: u64 = 0x5EED_C0DE;

/// Settings for [`crate::ColorExtractor`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Images are resized to `grid_size` x `grid_size` before sampling
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,

    /// Pixels with alpha below this are ignored (128 = 50%)
    #[serde(default = "default_alpha_threshold")]
    pub alpha_threshold: u8,

    /// Base color strategy (default: average)
    #[serde(default = "default_mode")]
    pub mode: BaseColorMode,

    /// Number of triples cached by URL (0 disables caching)
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,
}

const fn default_k() -> usize {
    3
}

const fn default_max_iterations() -> usize {
    10
}

fn default_grid_size() -> u32 {
    100
}

fn default_alpha_threshold() -> u8 {
    128
}

fn default_mode() -> BaseColorMode {
    BaseColorMode::Average
}

fn default_cache_size() -> usize {
    32
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            alpha_threshold: default_alpha_threshold(),
            mode: default_mode(),
            cache_size: default_cache_size(),
        }
    }
}
