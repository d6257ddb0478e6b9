//! Image decoding and pixel sampling

use crate::error::{ArtworkError, Result};
use image::{imageops::FilterType, DynamicImage};
use vizion_core::Rgb;

/// Decode image bytes, guessing the format from the content
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Downsample to `grid_size` x `grid_size` and collect every pixel whose
/// alpha is at least `alpha_threshold`.
pub fn sample_pixels(image: &DynamicImage, grid_size: u32, alpha_threshold: u8) -> Result<Vec<Rgb>> {
    let grid_size = grid_size.max(1);
    let grid = image
        .resize_exact(grid_size, grid_size, FilterType::Triangle)
        .to_rgba8();

    let samples: Vec<Rgb> = grid
        .pixels()
        .filter(|pixel| pixel[3] >= alpha_threshold)
        .map(|pixel| Rgb::new(pixel[0], pixel[1], pixel[2]))
        .collect();

    if samples.is_empty() {
        return Err(ArtworkError::NoValidPixels);
    }

    Ok(samples)
}
