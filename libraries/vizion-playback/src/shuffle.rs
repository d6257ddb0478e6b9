//! Unbiased playlist shuffling

use rand::Rng;

/// Fisher–Yates shuffle in place.
///
/// Walks from the last index down to 1 and swaps each element with a
/// uniformly chosen index in `0..=i`, so every permutation is equally likely.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Shuffled copy of `items` using the thread-local generator
pub fn shuffled<T: Clone>(items: &[T]) -> Vec<T> {
    let mut order = items.to_vec();
    fisher_yates(&mut order, &mut rand::thread_rng());
    order
}
