//! Shared fixtures: seeded random point clouds and brute-force reference searches.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::distance::squared_euclidean;

pub(crate) fn random_points<const D: usize>(n: usize, seed: u64) -> Vec<[f64; D]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let mut point = [0.0; D];
            for v in point.iter_mut() {
                *v = rng.gen_range(-100.0..100.0);
            }
            point
        })
        .collect()
}

/// Points snapped to an integer grid, so that many share the same distance to a query.
pub(crate) fn grid_points<const D: usize>(n: usize, seed: u64) -> Vec<[f64; D]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let mut point = [0.0; D];
            for v in point.iter_mut() {
                *v = rng.gen_range(-5..=5) as f64;
            }
            point
        })
        .collect()
}

/// Indices of all points within `radius`, ascending by index.
pub(crate) fn brute_force_within<P: AsRef<[f64]>>(
    points: &[P],
    query: &[f64],
    radius: f64,
) -> Vec<usize> {
    let r2 = radius * radius;
    points
        .iter()
        .enumerate()
        .filter(|(_, p)| squared_euclidean(p.as_ref(), query) <= r2)
        .map(|(i, _)| i)
        .collect()
}

/// Squared distances of every point, sorted ascending.
pub(crate) fn brute_force_distances<P: AsRef<[f64]>>(points: &[P], query: &[f64]) -> Vec<f64> {
    let mut dists: Vec<f64> = points
        .iter()
        .map(|p| squared_euclidean(p.as_ref(), query))
        .collect();
    dists.sort_by(|a, b| a.partial_cmp(b).unwrap());
    dists
}
