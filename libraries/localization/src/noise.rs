//! Random draws for the particle filter

use core::f32::consts::TAU;

use libm::{cosf, logf, sinf, sqrtf};
use nanorand::{Rng, WyRand};

/// Uniform draw in `[0, 1]`
pub fn uniform_unit(rng: &mut WyRand) -> f32 {
    rng.generate::<u32>() as f32 / u32::MAX as f32
}

/// Uniform draw in `[low, high)`
pub fn uniform_range(rng: &mut WyRand, low: f32, high: f32) -> f32 {
    let value = low + uniform_unit(rng) * (high - low);
    // u == 1.0 would land on the open end
    if value >= high {
        low
    } else {
        value
    }
}

/// Pair of independent normal draws via the Box–Muller transform
pub fn gaussian_pair(rng: &mut WyRand, mean: f32, std_dev: f32) -> (f32, f32) {
    let mut u = 0.0;
    while u == 0.0 {
        u = uniform_unit(rng);
    }
    let theta = TAU * uniform_unit(rng);
    let r = sqrtf(-2.0 * logf(u));

    (mean + std_dev * r * cosf(theta), mean + std_dev * r * sinf(theta))
}
