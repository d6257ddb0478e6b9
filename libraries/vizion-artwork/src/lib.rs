//! Vizion Artwork - cover-art color theming
//!
//! Derives a base/contrast/complementary color triple from a cover image.
//!
//! # Pipeline
//!
//! 1. Fetch the image bytes for an already-resolved URL (`ImageSource`)
//! 2. Decode and downsample to a small square grid
//! 3. Drop near-transparent pixels
//! 4. Pick a base color: channel average, or the largest k-means cluster
//! 5. Contrast is black or white by luminance; complementary rotates the hue by 180°
//!
//! Any failure (fetch, decode, no opaque pixels) yields
//! [`ColorTriple::FALLBACK`](vizion_core::ColorTriple::FALLBACK) instead of an error.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vizion_artwork::{ColorExtractor, ExtractionConfig, HttpImageSource};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = ColorExtractor::new(
//!     Arc::new(HttpImageSource::new()?),
//!     ExtractionConfig::default(),
//! );
//!
//! let theme = extractor.extract("https://cdn.example.com/cover.jpg").await;
//! println!("base {} on {}", theme.base, theme.contrast);
//! # Ok(())
//! # }
//! ```

mod cluster;
mod config;
mod error;
mod extractor;
pub mod palette;
mod sampling;
mod source;

pub use cluster::{average_color, dominant_cluster_color};
pub use config::{BaseColorMode, ExtractionConfig};
pub use error::{ArtworkError, Result};
pub use extractor::ColorExtractor;
pub use sampling::{decode_image, sample_pixels};
pub use source::HttpImageSource;
