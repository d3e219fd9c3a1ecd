//! A "firefly" wanders through a random point cloud. Every step it either collects the points
//! within a radius or its nearest neighbors, switching mode every few steps.
//!
//! ```text
//! cargo run --release --example firefly -- [dimensions] [num_points] [steps]
//! ```

use std::time::Instant;

use kd_index::kdtree::{KDTree, KDTreeIndex, Neighbor, SearchParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DEFAULT_DIMENSIONS: usize = 3;
const DEFAULT_NUM_POINTS: usize = 5_000;
const DEFAULT_STEPS: usize = 200;
const HALF_EXTENT: f64 = 1000.0;
const RADIUS: f64 = 150.0;
const NEAREST_N: usize = 20;
const STEPS_PER_MODE: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Radius,
    Nearest,
}

fn arg_or(position: usize, default: usize) -> usize {
    std::env::args()
        .nth(position)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(default)
}

/// Smooth, deterministic path that stays a little beyond the cloud on every axis.
fn firefly_position(step: usize, dimensions: usize) -> Vec<f64> {
    let time = step as f64 / 20.0;
    (0..dimensions)
        .map(|axis| {
            let phase = axis as f64 * 1.7;
            let speed = 1.0 + axis as f64 * 0.13;
            (time * speed + phase).sin() * (HALF_EXTENT * 1.2)
        })
        .collect()
}

/// Rough number of points a radius query should find in a uniform cloud: the share of the
/// cloud's volume covered by the cube around the search ball.
fn expected_radius_hits(num_points: usize, dimensions: usize) -> usize {
    let fraction = (RADIUS / HALF_EXTENT).powi(dimensions as i32);
    (num_points as f64 * fraction).ceil() as usize
}

fn main() -> kd_index::Result<()> {
    let dimensions = arg_or(1, DEFAULT_DIMENSIONS).max(1);
    let num_points = arg_or(2, DEFAULT_NUM_POINTS);
    let steps = arg_or(3, DEFAULT_STEPS);

    let mut rng = StdRng::seed_from_u64(42);
    let points: Vec<Vec<f64>> = (0..num_points)
        .map(|_| {
            (0..dimensions)
                .map(|_| rng.gen_range(-HALF_EXTENT..HALF_EXTENT))
                .collect()
        })
        .collect();

    let start = Instant::now();
    let tree = KDTree::new(&points)?;
    println!(
        "indexed {} points in {} dimensions in {:?}",
        tree.num_items(),
        tree.dimension(),
        start.elapsed()
    );

    let mut results: Vec<Neighbor<f64>> =
        Vec::with_capacity(expected_radius_hits(num_points, dimensions));
    let params = SearchParams::default();
    let mut total_found = 0;

    let start = Instant::now();
    for step in 0..steps {
        let mode = if (step / STEPS_PER_MODE) % 2 == 0 {
            Mode::Radius
        } else {
            Mode::Nearest
        };
        let firefly = firefly_position(step, dimensions);

        let found = match mode {
            Mode::Radius => tree.radius_search(&firefly, RADIUS, &mut results, &params)?,
            Mode::Nearest => tree.nearest_into(&firefly, NEAREST_N, &mut results)?,
        };
        total_found += found;

        if step % STEPS_PER_MODE == 0 {
            let closest = results
                .first()
                .map(|n| format!("closest #{} at {:.1}", n.index, n.distance_sq.sqrt()))
                .unwrap_or_else(|| "nothing nearby".to_string());
            println!("step {step:>4} {mode:?}: {found} points, {closest}");
        }
    }

    println!(
        "{steps} queries found {total_found} points in {:?}",
        start.elapsed()
    );
    Ok(())
}
