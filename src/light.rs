/*

    Light sources: point lights and rectangular area lights.

    Both kinds are statically known, so Light is a closed enum the
    renderers match on; the path tracer pulls the area extents out of
    the Area variant for its surface-integral estimator.

*/

use rand::Rng;

use crate::color::Color;
use crate::prelude::*;
use crate::sampler::random_float;

#[derive(Debug, Clone)]
pub enum Light {
    Point(PointLight),
    Area(AreaLight),
}

impl Light {
    pub fn position(&self) -> Vector3 {
        match self {
            Light::Point(l) => l.position,
            Light::Area(l) => l.position,
        }
    }

    pub fn intensity(&self) -> Color {
        match self {
            Light::Point(l) => l.intensity,
            Light::Area(l) => l.intensity,
        }
    }

    /// Uniform surface point; a point light has no extent and returns
    /// its position.
    pub fn sample_point(&self, rng: &mut impl Rng) -> Vector3 {
        match self {
            Light::Point(l) => l.position,
            Light::Area(l) => l.sample_point(rng),
        }
    }

    /// Surface-sampling probability density.
    pub fn pdf(&self) -> Float {
        match self {
            Light::Point(_) => 1.0,
            Light::Area(l) => l.pdf(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PointLight {
    pub position: Vector3,
    pub intensity: Color,
}

#[derive(Debug, Clone)]
pub struct AreaLight {
    pub position: Vector3,
    pub intensity: Color,
    /// In-plane tangent vectors spanning the rectangle.
    pub u: Vector3,
    pub v: Vector3,
    pub width: Float,
    pub height: Float,
}

impl AreaLight {
    pub fn new(
        position: Vector3,
        intensity: Color,
        u: Vector3,
        v: Vector3,
        width: Float,
        height: Float,
    ) -> Self {
        if u.dot(v).abs() > 1e-6 {
            warn!("Area light tangent vectors u and v are not orthogonal");
        }
        Self {
            position,
            intensity,
            u,
            v,
            width,
            height,
        }
    }

    pub fn sample_point(&self, rng: &mut impl Rng) -> Vector3 {
        let xi1 = random_float(rng);
        let xi2 = random_float(rng);
        self.position + self.u * ((xi1 - 0.5) * self.width) + self.v * ((xi2 - 0.5) * self.height)
    }

    pub fn pdf(&self) -> Float {
        if self.width <= 0.0 || self.height <= 0.0 {
            warn!("Area light has a degenerate extent, falling back to pdf = 1");
            return 1.0;
        }
        1.0 / (self.width * self.height)
    }

    pub fn area(&self) -> Float {
        self.width * self.height
    }

    /// Unit normal of the light's plane. Valid even when u and v are
    /// not orthogonal.
    pub fn normal(&self) -> Vector3 {
        normalize_safe(self.u.cross(self.v))
    }
}
