/*

    Declare the Camera and its ray generation.

    The basis (forward, right, up) is computed once at construction.
    Pixel coordinates may be fractional; the half-pixel offset lives in
    the NDC mapping so jittered samples pass x + jitter directly.

    The aperture variant moves the ray origin onto a lens disk, so
    callers must consume the full returned Ray rather than re-using the
    camera position as the origin.

*/

use rand::Rng;

use crate::prelude::*;
use crate::ray::Ray;
use crate::sampler::sample_unit_disk;

#[derive(Debug, Clone)]
pub enum CameraKind {
    Pinhole,
    Aperture {
        aperture_size: Float,
        focal_distance: Float,
    },
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vector3,
    pub look_at: Vector3,
    pub up_vector: Vector3,
    pub width: usize,
    pub height: usize,
    pub fov: Float,
    pub exposure: Float,
    pub kind: CameraKind,

    // right-handed basis, derived at construction
    forward: Vector3,
    right: Vector3,
    cam_up: Vector3,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        position: Vector3,
        look_at: Vector3,
        up_vector: Vector3,
        width: usize,
        height: usize,
        fov: Float,
        exposure: Float,
        kind: CameraKind,
    ) -> Self {
        let forward = normalize_safe(look_at - position);
        let right = normalize_safe(up_vector.cross(forward));
        let cam_up = forward.cross(right);

        Self {
            position,
            look_at,
            up_vector,
            width,
            height,
            fov,
            exposure,
            kind,
            forward,
            right,
            cam_up,
        }
    }

    pub fn aspect_ratio(&self) -> Float {
        self.width as Float / self.height as Float
    }

    /// Pinhole direction through the (possibly fractional) pixel.
    pub fn ray_direction(&self, px: Float, py: Float) -> Vector3 {
        let scale = (self.fov.to_radians() * 0.5).tan();
        let ndc_x = (2.0 * (px + 0.5) / self.width as Float - 1.0) * self.aspect_ratio() * scale;
        let ndc_y = (1.0 - 2.0 * (py + 0.5) / self.height as Float) * scale;
        normalize_safe(self.forward + self.right * ndc_x + self.cam_up * ndc_y)
    }

    /// Primary ray through the pixel. For the aperture camera a lens
    /// point is sampled per call, which perturbs both origin and
    /// direction while keeping the focal plane sharp.
    pub fn generate_ray(&self, px: Float, py: Float, rng: &mut impl Rng) -> Ray {
        let direction = self.ray_direction(px, py);
        match self.kind {
            CameraKind::Pinhole => Ray::new(self.position, direction),
            CameraKind::Aperture {
                aperture_size,
                focal_distance,
            } => {
                let (dx, dy) = sample_unit_disk(rng);
                let lens_radius = aperture_size * 0.5;
                let lens_point =
                    self.position + self.right * (dx * lens_radius) + self.cam_up * (dy * lens_radius);
                let focal_point = self.position + direction * focal_distance;
                Ray::new_unnormalized(lens_point, focal_point - lens_point)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::row_rng;
    use approx::assert_relative_eq;

    fn pinhole_100() -> Camera {
        Camera::new(
            Vector3::ZERO,
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 1.0, 0.0),
            100,
            100,
            90.0,
            1.0,
            CameraKind::Pinhole,
        )
    }

    #[test]
    fn centre_pixel_looks_straight_ahead() {
        let cam = pinhole_100();
        // the exact centre of the image plane sits between pixels; probe
        // the fractional coordinate that lands on it
        let dir = cam.ray_direction(49.5, 49.5);
        assert_relative_eq!(dir.z, -1.0, epsilon = 1e-5);
        assert!(dir.x.abs() < 1e-5);
        assert!(dir.y.abs() < 1e-5);
    }

    #[test]
    fn corner_pixel_spans_the_fov() {
        let cam = pinhole_100();
        let dir = cam.ray_direction(0.0, 0.0);
        // fov 90, aspect 1: the ndc extent at the corner pixel centre is
        // 1 - 1/width in both axes
        let expected = 1.0 - 1.0 / 100.0;
        let lateral = (dir.x / dir.z.abs()).abs();
        let vertical = (dir.y / dir.z.abs()).abs();
        assert_relative_eq!(lateral, expected, epsilon = 1e-4);
        assert_relative_eq!(vertical, expected, epsilon = 1e-4);
    }

    #[test]
    fn pinhole_rays_start_at_camera_position() {
        let cam = pinhole_100();
        let mut rng = row_rng(0, 0);
        let ray = cam.generate_ray(10.0, 20.0, &mut rng);
        assert_eq!(ray.origin, cam.position);
    }

    #[test]
    fn aperture_rays_pass_through_the_focal_point() {
        let cam = Camera::new(
            Vector3::ZERO,
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 1.0, 0.0),
            100,
            100,
            90.0,
            1.0,
            CameraKind::Aperture {
                aperture_size: 0.4,
                focal_distance: 5.0,
            },
        );
        let pinhole_dir = cam.ray_direction(30.0, 60.0);
        let focal_point = cam.position + pinhole_dir * 5.0;

        let mut rng = row_rng(2, 2);
        for _ in 0..32 {
            let ray = cam.generate_ray(30.0, 60.0, &mut rng);
            // the lens origin is displaced from the camera position
            assert!((ray.origin - cam.position).length() <= 0.2 + 1e-5);
            // and the ray re-converges at the focal point
            let t = (focal_point - ray.origin).dot(ray.direction);
            let closest = ray.at(t);
            assert!((closest - focal_point).length() < 1e-4);
        }
    }
}
