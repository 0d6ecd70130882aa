/*

    Sampling utilities and the per-row RNG policy.

    Every render worker owns a SmallRng seeded from the scene seed and
    its row index, so a single-threaded run consumes an identical
    stream regardless of scheduling.

*/

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

use crate::numeric::{Float, Vector3};

/// Derive an independent generator for one image row.
pub fn row_rng(seed: u64, row: usize) -> SmallRng {
    // splitmix-style spread so adjacent rows do not share low bits
    SmallRng::seed_from_u64(seed ^ (row as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

#[inline]
pub fn random_float(rng: &mut impl Rng) -> Float {
    rng.gen::<Float>()
}

/// Uniform point on the unit disk, returned as (x, y) in the disk plane.
pub fn sample_unit_disk(rng: &mut impl Rng) -> (Float, Float) {
    let r = random_float(rng).sqrt();
    let phi = 2.0 * PI * random_float(rng);
    (r * phi.cos(), r * phi.sin())
}

/// Orthonormal basis (u, v) completing the given unit normal.
pub fn get_onb(n: &Vector3) -> (Vector3, Vector3) {
    let helper = if n.x.abs() > 0.99 {
        Vector3::new(0.0, 1.0, 0.0)
    } else {
        Vector3::new(1.0, 0.0, 0.0)
    };
    let u = helper.cross(*n).normalize();
    let v = n.cross(u);
    (u, v)
}

/// Cosine-weighted direction about the given unit normal.
pub fn cosine_weighted_direction(n: &Vector3, rng: &mut impl Rng) -> Vector3 {
    let (u, v) = get_onb(n);
    let psi1 = random_float(rng);
    let psi2 = random_float(rng);
    let cos_theta = psi1.sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let phi = 2.0 * PI * psi2;

    (u * (sin_theta * phi.cos()) + v * (sin_theta * phi.sin()) + *n * cos_theta).normalize()
}
