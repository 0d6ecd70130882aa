/*

    Declare primitives: Sphere, Cylinder, Triangle.

    All primitive kinds are statically known, so Shape is a closed enum
    and dispatch is a match on the tag. Degenerate geometry (zero
    radius, zero-length axis, zero-area triangle) never reports a hit.

*/

use std::f32::consts::PI;

use crate::bbox::BBox;
use crate::interval::Interval;
use crate::material::Material;
use crate::prelude::*;
use crate::ray::{Intersection, Ray};

#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    Cylinder(Cylinder),
    Triangle(Triangle),
}

impl Shape {
    pub fn intersect(&self, ray: &Ray, t_interval: &Interval) -> Option<Intersection> {
        match self {
            Shape::Sphere(s) => s.intersect(ray, t_interval),
            Shape::Cylinder(c) => c.intersect(ray, t_interval),
            Shape::Triangle(t) => t.intersect(ray, t_interval),
        }
    }

    pub fn normal_at(&self, point: Vector3) -> Vector3 {
        match self {
            Shape::Sphere(s) => s.normal_at(point),
            Shape::Cylinder(c) => c.normal_at(point),
            Shape::Triangle(t) => t.normal_at(),
        }
    }

    pub fn uv_at(&self, point: Vector3) -> (Float, Float) {
        match self {
            Shape::Sphere(s) => s.uv_at(point),
            Shape::Cylinder(c) => c.uv_at(point),
            Shape::Triangle(t) => t.uv_at(point),
        }
    }

    pub fn bounding_volume(&self) -> BBox {
        match self {
            Shape::Sphere(s) => s.bounding_volume(),
            Shape::Cylinder(c) => c.bounding_volume(),
            Shape::Triangle(t) => t.bounding_volume(),
        }
    }

    pub fn centroid(&self) -> Vector3 {
        match self {
            Shape::Sphere(s) => s.center,
            Shape::Cylinder(c) => c.center,
            Shape::Triangle(t) => (t.v0 + t.v1 + t.v2) / 3.0,
        }
    }

    pub fn material(&self) -> &Arc<Material> {
        match self {
            Shape::Sphere(s) => &s.material,
            Shape::Cylinder(c) => &c.material,
            Shape::Triangle(t) => &t.material,
        }
    }
}

// =======================================================================================================
// Sphere
// =======================================================================================================

#[derive(Debug, Clone)]
pub struct Sphere {
    pub center: Vector3,
    pub radius: Float,
    pub material: Arc<Material>,
}

impl Sphere {
    pub fn new(center: Vector3, radius: Float, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    fn intersect(&self, ray: &Ray, t_interval: &Interval) -> Option<Intersection> {
        if self.radius <= EPSILON {
            return None;
        }

        let oc = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let b = 2.0 * oc.dot(ray.direction);
        let c = oc.dot(oc) - self.radius * self.radius;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let t1 = (-b - sqrt_disc) / (2.0 * a);
        let t2 = (-b + sqrt_disc) / (2.0 * a);

        // smaller positive root first, else the larger one
        let t = if t_interval.contains(t1) {
            t1
        } else if t_interval.contains(t2) {
            t2
        } else {
            return None;
        };

        let point = ray.at(t);
        Some(Intersection::new(t, point, self.normal_at(point)))
    }

    fn normal_at(&self, point: Vector3) -> Vector3 {
        (point - self.center) / self.radius
    }

    /// Equirectangular mapping.
    fn uv_at(&self, point: Vector3) -> (Float, Float) {
        let local = point - self.center;
        let u = 0.5 + local.z.atan2(local.x) / (2.0 * PI);
        let v = 0.5 - (local.y / self.radius).clamp(-1.0, 1.0).asin() / PI;
        (u, v)
    }

    fn bounding_volume(&self) -> BBox {
        BBox::new(
            self.center - Vector3::splat(self.radius),
            self.center + Vector3::splat(self.radius),
        )
    }
}

// =======================================================================================================
// Cylinder
// =======================================================================================================

/// Finite cylinder with end caps. `height` is the half-height: the
/// surface spans the axial range [-height, +height] about the centre.
#[derive(Debug, Clone)]
pub struct Cylinder {
    pub center: Vector3,
    pub axis: Vector3,
    pub radius: Float,
    pub height: Float,
    pub material: Arc<Material>,
}

/// Axial tolerance when classifying a hit point as lying on a cap.
const CAP_EPSILON: Float = 1e-4;

impl Cylinder {
    pub fn new(
        center: Vector3,
        axis: Vector3,
        radius: Float,
        height: Float,
        material: Arc<Material>,
    ) -> Self {
        Self {
            center,
            axis: normalize_safe(axis),
            radius,
            height,
            material,
        }
    }

    fn intersect(&self, ray: &Ray, t_interval: &Interval) -> Option<Intersection> {
        if self.radius <= EPSILON || self.axis == Vector3::ZERO {
            return None;
        }

        let oc = ray.origin - self.center;
        let mut nearest: Option<(Float, Vector3)> = None;
        let mut consider = |t: Float, point: Vector3| {
            if nearest.map_or(true, |(best, _)| t < best) {
                nearest = Some((t, point));
            }
        };

        // Side surface: quadratic in the plane orthogonal to the axis.
        let d_axis = ray.direction.dot(self.axis);
        let oc_axis = oc.dot(self.axis);
        let a = ray.direction.dot(ray.direction) - d_axis * d_axis;
        let b = 2.0 * (ray.direction.dot(oc) - d_axis * oc_axis);
        let c = oc.dot(oc) - oc_axis * oc_axis - self.radius * self.radius;
        let discriminant = b * b - 4.0 * a * c;

        if discriminant >= 0.0 && a.abs() > EPSILON {
            let sqrt_disc = discriminant.sqrt();
            for t in [(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)] {
                if t_interval.contains(t) {
                    let point = ray.at(t);
                    let projection = self.axis.dot(point - self.center);
                    if projection >= -self.height && projection <= self.height {
                        consider(t, point);
                    }
                }
            }
        }

        // End caps: plane intersections kept when inside the cap disk.
        let denom = ray.direction.dot(self.axis);
        if denom.abs() > EPSILON {
            for sign in [-1.0, 1.0] {
                let cap_center = self.center + self.axis * (sign * self.height);
                let t = (cap_center - ray.origin).dot(self.axis) / denom;
                if t_interval.contains(t) {
                    let point = ray.at(t);
                    if (point - cap_center).length_squared() <= self.radius * self.radius {
                        consider(t, point);
                    }
                }
            }
        }

        nearest.map(|(t, point)| Intersection::new(t, point, self.normal_at(point)))
    }

    fn normal_at(&self, point: Vector3) -> Vector3 {
        let to_point = point - self.center;
        let projection = self.axis.dot(to_point);

        if (projection - self.height).abs() < CAP_EPSILON {
            self.axis
        } else if (projection + self.height).abs() < CAP_EPSILON {
            -self.axis
        } else {
            normalize_safe(to_point - self.axis * projection)
        }
    }

    /// Side band maps v into [0.25, 0.75]; the bottom cap fills
    /// [0, 0.25] and the top cap [0.75, 1.0] by radial distance.
    /// u is the polar angle in all three regions.
    fn uv_at(&self, point: Vector3) -> (Float, Float) {
        let local = point - self.center;
        let projection = self.axis.dot(local);
        let u = (local.z.atan2(local.x) + PI) / (2.0 * PI);

        let v = if (projection - self.height).abs() < CAP_EPSILON {
            let radial = (local - self.axis * projection).length() / self.radius;
            0.75 + 0.25 * radial.min(1.0)
        } else if (projection + self.height).abs() < CAP_EPSILON {
            let radial = (local - self.axis * projection).length() / self.radius;
            0.25 * radial.min(1.0)
        } else {
            // axial position -h..+h mapped onto the 0.25..0.75 band so the
            // side meets both cap bands without a seam
            let band = (projection / self.height + 1.0) * 0.5;
            0.25 + 0.5 * band
        };
        (u, v)
    }

    fn bounding_volume(&self) -> BBox {
        let p1 = self.center - self.axis * self.height;
        let p2 = self.center + self.axis * self.height;
        BBox::new(
            p1.min(p2) - Vector3::splat(self.radius),
            p1.max(p2) + Vector3::splat(self.radius),
        )
    }
}

// =======================================================================================================
// Triangle
// =======================================================================================================

#[derive(Debug, Clone)]
pub struct Triangle {
    pub v0: Vector3,
    pub v1: Vector3,
    pub v2: Vector3,
    pub uv0: (Float, Float),
    pub uv1: (Float, Float),
    pub uv2: (Float, Float),
    pub material: Arc<Material>,
}

impl Triangle {
    pub fn new(v0: Vector3, v1: Vector3, v2: Vector3, material: Arc<Material>) -> Self {
        Self {
            v0,
            v1,
            v2,
            uv0: (0.0, 0.0),
            uv1: (1.0, 0.0),
            uv2: (0.0, 1.0),
            material,
        }
    }

    pub fn with_uvs(
        mut self,
        uv0: (Float, Float),
        uv1: (Float, Float),
        uv2: (Float, Float),
    ) -> Self {
        self.uv0 = uv0;
        self.uv1 = uv1;
        self.uv2 = uv2;
        self
    }

    /// Moller-Trumbore. A zero-area triangle makes the determinant
    /// vanish and is rejected with the parallel-ray case.
    fn intersect(&self, ray: &Ray, t_interval: &Interval) -> Option<Intersection> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(edge2);
        let a = edge1.dot(h);
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !t_interval.contains(t) {
            return None;
        }

        Some(Intersection::new(t, ray.at(t), self.normal_at()))
    }

    fn normal_at(&self) -> Vector3 {
        normalize_safe((self.v1 - self.v0).cross(self.v2 - self.v0))
    }

    /// Barycentric weights of a point assumed to lie in the triangle's
    /// plane. Degenerate triangles fall back to the first vertex.
    fn barycentric(&self, p: Vector3) -> (Float, Float, Float) {
        let e0 = self.v1 - self.v0;
        let e1 = self.v2 - self.v0;
        let e2 = p - self.v0;

        let d00 = e0.dot(e0);
        let d01 = e0.dot(e1);
        let d11 = e1.dot(e1);
        let d20 = e2.dot(e0);
        let d21 = e2.dot(e1);

        let denom = d00 * d11 - d01 * d01;
        if denom.abs() < EPSILON {
            return (1.0, 0.0, 0.0);
        }
        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        (1.0 - v - w, v, w)
    }

    fn uv_at(&self, point: Vector3) -> (Float, Float) {
        let (w0, w1, w2) = self.barycentric(point);
        (
            w0 * self.uv0.0 + w1 * self.uv1.0 + w2 * self.uv2.0,
            w0 * self.uv0.1 + w1 * self.uv1.1 + w2 * self.uv2.1,
        )
    }

    fn bounding_volume(&self) -> BBox {
        BBox::new(
            self.v0.min(self.v1).min(self.v2),
            self.v0.max(self.v1).max(self.v2),
        )
    }
}
