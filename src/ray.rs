use crate::prelude::*;

#[derive(Debug, Clone)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        debug_assert!(direction.is_normalized() || direction == Vector3::ZERO);
        Self { origin, direction }
    }

    /// Normalises the direction before storing it.
    pub fn new_unnormalized(origin: Vector3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: normalize_safe(direction),
        }
    }

    #[inline]
    pub fn at(&self, t: Float) -> Vector3 {
        self.origin + self.direction * t // r(t) = o + dt
    }
}

/// Closest-hit record. The shape field indexes into the scene's shape
/// arena; material and UV lookups go back through it.
#[derive(Debug, Clone)]
pub struct Intersection {
    pub t: Float,
    pub point: Vector3,
    pub normal: Vector3,
    pub shape: usize,
}

impl Intersection {
    pub fn new(t: Float, point: Vector3, normal: Vector3) -> Self {
        Self {
            t,
            point,
            normal,
            shape: 0,
        }
    }
}
