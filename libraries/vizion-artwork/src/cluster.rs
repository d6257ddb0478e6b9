//! Base color selection
//!
//! Two strategies over the sampled pixels: a plain channel average, and
//! k-means with Euclidean RGB distance returning the largest cluster.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use vizion_core::Rgb;

/// Mean of each channel, rounded. `None` for no samples.
pub fn average_color(samples: &[Rgb]) -> Option<Rgb> {
    if samples.is_empty() {
        return None;
    }

    let (r, g, b) = samples.iter().fold((0u64, 0u64, 0u64), |(r, g, b), c| {
        (r + u64::from(c.r), g + u64::from(c.g), b + u64::from(c.b))
    });
    let n = samples.len() as f64;

    Some(Rgb::new(
        round_channel(r as f64 / n),
        round_channel(g as f64 / n),
        round_channel(b as f64 / n),
    ))
}

/// Centroid of the largest k-means cluster.
///
/// Initial centroids are drawn from the samples. `seed: None` draws them from
/// entropy. Iteration stops early once assignments stop changing. `k` is
/// clamped to the number of samples; ties go to the lower cluster index.
pub fn dominant_cluster_color(
    samples: &[Rgb],
    k: usize,
    max_iterations: usize,
    seed: Option<u64>,
) -> Option<Rgb> {
    if samples.is_empty() {
        return None;
    }

    let k = k.clamp(1, samples.len());
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let points: Vec<[f64; 3]> = samples.iter().map(|c| to_point(*c)).collect();
    let mut centroids: Vec<[f64; 3]> = points.choose_multiple(&mut rng, k).copied().collect();
    let mut assignments = vec![usize::MAX; points.len()];

    for _ in 0..max_iterations.max(1) {
        let mut changed = false;
        for (point, assigned) in points.iter().zip(assignments.iter_mut()) {
            let nearest = nearest_centroid(point, &centroids);
            if *assigned != nearest {
                *assigned = nearest;
                changed = true;
            }
        }

        if !changed {
            break;
        }

        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0usize; k];
        for (point, &cluster) in points.iter().zip(&assignments) {
            for (sum, value) in sums[cluster].iter_mut().zip(point) {
                *sum += value;
            }
            counts[cluster] += 1;
        }

        for (cluster, centroid) in centroids.iter_mut().enumerate() {
            // An empty cluster keeps its previous centroid
            if counts[cluster] > 0 {
                let count = counts[cluster] as f64;
                *centroid = [
                    sums[cluster][0] / count,
                    sums[cluster][1] / count,
                    sums[cluster][2] / count,
                ];
            }
        }
    }

    let mut counts = vec![0usize; k];
    for &cluster in &assignments {
        counts[cluster] += 1;
    }

    let largest = counts
        .iter()
        .enumerate()
        .fold(0, |best, (cluster, &count)| {
            if count > counts[best] {
                cluster
            } else {
                best
            }
        });

    let [r, g, b] = centroids[largest];
    Some(Rgb::new(round_channel(r), round_channel(g), round_channel(b)))
}

fn to_point(color: Rgb) -> [f64; 3] {
    [f64::from(color.r), f64::from(color.g), f64::from(color.b)]
}

fn nearest_centroid(point: &[f64; 3], centroids: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(point, centroid);
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best
}

fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

fn round_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
