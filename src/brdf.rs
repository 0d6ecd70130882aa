/*

    Cook-Torrance microfacet BRDF: GGX normal distribution, Schlick
    Fresnel, Smith-Schlick geometry, and GGX half-vector importance
    sampling with its pdf.

    Roughness is floored at 0.05 everywhere so perfectly smooth
    materials keep finite distributions.

*/

use rand::Rng;
use std::f32::consts::PI;

use crate::color::Color;
use crate::prelude::*;
use crate::sampler::random_float;

const ROUGHNESS_FLOOR: Float = 0.05;
const DENOM_GUARD: Float = 1e-3;

/// Schlick approximation of the Fresnel reflectance.
pub fn fresnel_schlick(h: Vector3, v: Vector3, f0: Color) -> Color {
    let cos_theta = h.dot(v).max(0.0);
    f0 + (Color::ONE - f0) * (1.0 - cos_theta).powi(5)
}

/// GGX normal distribution, clamped into [0, 1].
pub fn ggx_d(n: Vector3, h: Vector3, roughness: Float) -> Float {
    let alpha = roughness.max(ROUGHNESS_FLOOR).powi(2);
    let nh = n.dot(h).max(0.0);
    let denom = nh * nh * (alpha * alpha - 1.0) + 1.0;
    let d = (alpha * alpha) / (PI * denom * denom);
    d.clamp(0.0, 1.0)
}

/// Probability density of a GGX-sampled half vector.
pub fn ggx_pdf(n: Vector3, h: Vector3, roughness: Float) -> Float {
    let d = ggx_d(n, h, roughness);
    let nh = n.dot(h).max(0.0);
    let pdf = (d * nh) / (4.0 * nh.abs()).max(DENOM_GUARD);
    pdf.clamp(0.0, 1.0)
}

/// One-direction Smith-Schlick visibility term with k = (r + 1)^2 / 8.
pub fn smith_schlick_g1(n: Vector3, x: Vector3, roughness: Float) -> Float {
    let r = roughness.max(ROUGHNESS_FLOOR);
    let k = (r + 1.0).powi(2) / 8.0;
    let nx = n.dot(x).max(0.0);
    nx / (nx * (1.0 - k) + k)
}

/// Full Cook-Torrance reflectance: Lambertian diffuse scaled by the
/// incident cosine plus the microfacet specular lobe.
pub fn cook_torrance(
    light_dir: Vector3,
    view_dir: Vector3,
    normal: Vector3,
    half_vector: Vector3,
    base_color: Color,
    f0: Color,
    roughness: Float,
) -> Color {
    let d = ggx_d(normal, half_vector, roughness);
    let g = smith_schlick_g1(normal, view_dir, roughness) * smith_schlick_g1(normal, light_dir, roughness);
    let f = fresnel_schlick(half_vector, view_dir, f0);

    let n_dot_l = normal.dot(light_dir).max(0.0);
    let n_dot_v = normal.dot(view_dir).max(0.0);
    let denominator = (4.0 * n_dot_l * n_dot_v).max(DENOM_GUARD);

    let specular = f * (d * g / denominator);
    let diffuse = base_color * (n_dot_l / PI);
    diffuse + specular
}

/// Importance-sample a half vector from the GGX distribution about the
/// surface normal.
pub fn sample_ggx(normal: Vector3, roughness: Float, rng: &mut impl Rng) -> Vector3 {
    let xi1 = random_float(rng);
    let xi2 = random_float(rng);

    let alpha = roughness.max(ROUGHNESS_FLOOR).powi(2);
    let cos_theta = ((1.0 - xi1) / (1.0 + (alpha * alpha - 1.0) * xi1)).sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let phi = 2.0 * PI * xi2;

    let h_local = Vector3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);
    to_world(h_local, normal)
}

/// Rotate a tangent-space vector into the frame of the given normal.
fn to_world(local: Vector3, normal: Vector3) -> Vector3 {
    let helper = if normal.x.abs() > 0.99 {
        Vector3::new(0.0, 1.0, 0.0)
    } else {
        Vector3::new(1.0, 0.0, 0.0)
    };
    let tangent = normalize_safe(helper.cross(normal));
    let bitangent = normal.cross(tangent);
    normalize_safe(tangent * local.x + bitangent * local.y + normal * local.z)
}

/// Mirror reflection of an incoming direction about a normal.
pub fn reflect(incident: Vector3, normal: Vector3) -> Vector3 {
    incident - normal * 2.0 * incident.dot(normal)
}
