/*

    Declare numeric types used throughout this repo.

    The whole pipeline runs in single precision; switching to f64
    requires updating both Float and Vector3 together since Vector3
    is backed by bevy_math.

*/

use bevy_math::Vec3;

pub type Int = i32;
pub type Float = f32;
pub type Vector3 = Vec3;

/// Self-intersection / degenerate-denominator guard used by every
/// intersection routine.
pub const EPSILON: Float = 1e-8;

pub fn approx_zero(x: Float) -> bool {
    x.abs() < EPSILON
}

/// Normalise that degrades to the zero vector instead of NaN when the
/// input has no length. Degenerate directions propagate deterministically.
pub fn normalize_safe(v: Vector3) -> Vector3 {
    v.normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_vector_normalises_to_zero() {
        assert_eq!(normalize_safe(Vector3::ZERO), Vector3::ZERO);
    }

    #[test]
    fn normalize_safe_matches_normalize_for_regular_input() {
        let v = Vector3::new(3.0, 0.0, 4.0);
        let n = normalize_safe(v);
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n - Vector3::new(0.6, 0.0, 0.8)).length() < 1e-6);
    }
}
