/*

    Render a Scene into a pixel buffer.

    Three strategies share the BVH and the shading helpers here:
      - Binary: hit/no-hit smoke test.
      - Phong: Whitted recursion with shadow rays and Fresnel-blended
        reflection and refraction.
      - Path: Monte-Carlo estimator with area-light sub-sampling, a
        two-pass photon map for indirect light, GGX importance-sampled
        specular bounces and Russian-roulette termination.

    Work is parallel over image rows; each row owns a seeded RNG and
    writes only its own slice of the buffer.

*/

use rayon::prelude::*;
use std::f32::consts::PI;
use std::time::Instant;

use crate::brdf;
use crate::color::{below_threshold, clamp_255, Color};
use crate::image::ImageData;
use crate::interval::Interval;
use crate::light::Light;
use crate::material::Material;
use crate::photon::PhotonMap;
use crate::prelude::*;
use crate::ray::Ray;
use crate::sampler::{cosine_weighted_direction, random_float, row_rng};
use crate::scene::{RenderMode, Scene};

/// Shadow-ray origin offset along the surface normal.
const SHADOW_BIAS: Float = 1e-5;
/// Origin offset for reflected/refracted continuation rays.
const SECONDARY_BIAS: Float = 1e-4;
/// Flat ambient fraction of the diffuse base colour.
const AMBIENT_STRENGTH: Float = 0.25;
/// Residual factor applied to occluded light contributions.
const SHADOW_AMBIENT_FACTOR: Float = 0.1;
/// Specular damping in the Phong direct term.
const SPECULAR_SCALE: Float = 0.4;
/// Sub-samples per area light per path vertex.
const AREA_LIGHT_SAMPLES: usize = 8;
/// GGX importance samples per specular vertex.
const BRDF_SAMPLES: usize = 4;
/// Photon gather radius around a diffuse hit.
const GATHER_RADIUS: Float = 0.1;
/// Cap on the photon-gathered indirect contribution.
const INDIRECT_SCALE: Float = 0.01;
/// Russian roulette starts after this bounce.
const RR_MIN_BOUNCE: usize = 2;

pub fn render(scene: &Scene, name: &str) -> ImageData {
    let (width, height) = (scene.camera.width, scene.camera.height);
    let start = Instant::now();
    let mut pixels = vec![scene.background; width * height];

    match scene.render_mode {
        RenderMode::Binary => render_binary(scene, &mut pixels),
        RenderMode::Phong => render_phong(scene, &mut pixels),
        RenderMode::Path => render_path(scene, &mut pixels),
    }

    info!("Rendering '{}' took {:?}", name, start.elapsed());
    ImageData::new(width, height, name.to_string(), pixels)
}

// =======================================================================================================
// Binary
// =======================================================================================================

fn render_binary(scene: &Scene, pixels: &mut [Color]) {
    let width = scene.camera.width;
    pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let mut rng = row_rng(scene.seed, y);
            for (x, pixel) in row.iter_mut().enumerate() {
                let ray = scene
                    .camera
                    .generate_ray(x as Float, y as Float, &mut rng);
                *pixel = if scene.intersect(&ray).is_some() {
                    Color::new(255.0, 0.0, 0.0)
                } else {
                    scene.background
                };
            }
        });
}

// =======================================================================================================
// Phong (Whitted)
// =======================================================================================================

fn render_phong(scene: &Scene, pixels: &mut [Color]) {
    let width = scene.camera.width;
    pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let mut rng = row_rng(scene.seed, y);
            for (x, pixel) in row.iter_mut().enumerate() {
                let ray = scene
                    .camera
                    .generate_ray(x as Float, y as Float, &mut rng);
                *pixel = trace_phong(scene, &ray, 0);
            }
        });
    scene.tonemap.apply(pixels, scene.camera.exposure);
}

fn trace_phong(scene: &Scene, ray: &Ray, bounce: usize) -> Color {
    if bounce > scene.nbounces {
        return scene.background;
    }
    let Some(hit) = scene.intersect(ray) else {
        return scene.background;
    };

    let shape = scene.shape(hit.shape);
    let material = shape.material();
    let tex = material.diffuse_at(shape.uv_at(hit.point));
    let normal = hit.normal;
    let view_dir = -ray.direction;

    let mut color = Color::ZERO;

    for light in &scene.lights {
        let to_light = light.position() - hit.point;
        let distance = to_light.length();
        if distance <= SHADOW_BIAS {
            continue;
        }
        let light_dir = to_light / distance;

        let shadow_ray = Ray::new(hit.point + normal * SHADOW_BIAS, light_dir);
        let in_shadow = occluded(scene, &shadow_ray, distance);

        let n_dot_l = normal.dot(light_dir).max(0.0);
        let half = normalize_safe(light_dir + view_dir);
        let spec_intensity = normal
            .dot(half)
            .max(0.0)
            .powi(material.specular_exponent);

        let diffuse = tex * (n_dot_l * material.kd);
        let specular =
            material.specular_color * (spec_intensity * material.ks * SPECULAR_SCALE);

        let shadow_factor = if in_shadow {
            Color::splat(SHADOW_AMBIENT_FACTOR)
        } else {
            (light.intensity() / 255.0).clamp(Color::ZERO, Color::ONE)
        };
        color += (diffuse + specular) * shadow_factor;
    }

    color += tex * AMBIENT_STRENGTH;

    if material.is_reflective || material.is_refractive {
        let entering = ray.direction.dot(normal) < 0.0;
        let n = if entering { normal } else { -normal };
        let (n1, n2) = if entering {
            (1.0, material.refractive_index)
        } else {
            (material.refractive_index, 1.0)
        };
        let cos_i = (-n.dot(ray.direction)).max(0.0);
        let fresnel = schlick_dielectric(cos_i, n1, n2);

        let reflected_dir = normalize_safe(brdf::reflect(ray.direction, n));
        let reflected_ray = Ray::new(hit.point + n * SECONDARY_BIAS, reflected_dir);
        let reflected = trace_phong(scene, &reflected_ray, bounce + 1);

        if material.is_refractive {
            let eta = n1 / n2;
            let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
            if sin2_t <= 1.0 {
                let cos_t = (1.0 - sin2_t).sqrt();
                let refracted_dir =
                    normalize_safe(ray.direction * eta + n * (eta * cos_i - cos_t));
                let refracted_ray = Ray::new(hit.point - n * SECONDARY_BIAS, refracted_dir);
                let transmitted =
                    trace_phong(scene, &refracted_ray, bounce + 1) * (material.diffuse_color / 255.0);
                color += reflected * fresnel + transmitted * (1.0 - fresnel);
            } else {
                // total internal reflection
                color += reflected;
            }
        } else {
            color = color * (1.0 - material.reflectivity) + reflected * material.reflectivity;
        }
    }

    color
}

// =======================================================================================================
// Path (Monte-Carlo + photon map)
// =======================================================================================================

fn render_path(scene: &Scene, pixels: &mut [Color]) {
    let photon_map = emit_photons(scene);
    let width = scene.camera.width;
    let samples = scene.nsamples.max(1);

    pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let mut rng = row_rng(scene.seed, y);
            for (x, pixel) in row.iter_mut().enumerate() {
                let mut accumulated = Color::ZERO;
                for _ in 0..samples {
                    let jitter_x = random_float(&mut rng) - 0.5;
                    let jitter_y = random_float(&mut rng) - 0.5;
                    let ray = scene.camera.generate_ray(
                        x as Float + jitter_x,
                        y as Float + jitter_y,
                        &mut rng,
                    );
                    let sample = trace_path(scene, &photon_map, &ray, 0, &mut rng);
                    // a NaN sample is dropped rather than poisoning the pixel
                    if sample.is_finite() {
                        accumulated += sample;
                    }
                }
                *pixel = accumulated / samples as Float;
            }
        });
    scene.tonemap.apply(pixels, scene.camera.exposure);
}

/// First pass: shoot photons from every area light and build the k-d tree.
pub fn emit_photons(scene: &Scene) -> PhotonMap {
    let mut map = PhotonMap::new();
    // distinct stream from any image row
    let mut rng = row_rng(scene.seed ^ 0x0070_4F70_6E5A_11D7, 0);

    for light in &scene.lights {
        let Light::Area(area) = light else {
            continue;
        };
        let light_normal = area.normal();
        for _ in 0..scene.nphotons {
            let origin = area.sample_point(&mut rng);
            let direction = cosine_weighted_direction(&light_normal, &mut rng);
            let ray = Ray::new(origin + light_normal * SHADOW_BIAS, direction);
            trace_photon(scene, &mut map, ray, area.intensity, 0);
        }
    }

    map.build();
    map
}

fn trace_photon(scene: &Scene, map: &mut PhotonMap, ray: Ray, energy: Color, bounce: usize) {
    if bounce > scene.nbounces || below_threshold(energy) {
        return;
    }
    let Some(hit) = scene.intersect(&ray) else {
        return;
    };
    let material = scene.shape(hit.shape).material();

    if material.is_diffuse() {
        map.store(hit.point, ray.direction, energy);
        return;
    }

    let entering = ray.direction.dot(hit.normal) < 0.0;
    let n = if entering { hit.normal } else { -hit.normal };

    if material.is_refractive {
        let (n1, n2) = if entering {
            (1.0, material.refractive_index)
        } else {
            (material.refractive_index, 1.0)
        };
        let eta = n1 / n2;
        let cos_i = (-n.dot(ray.direction)).max(0.0);
        let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
        let next_energy = energy * (1.0 - material.reflectivity);

        let next_ray = if sin2_t <= 1.0 {
            let cos_t = (1.0 - sin2_t).sqrt();
            let dir = normalize_safe(ray.direction * eta + n * (eta * cos_i - cos_t));
            Ray::new(hit.point - n * SECONDARY_BIAS, dir)
        } else {
            // total internal reflection keeps the photon on the mirror path
            let dir = normalize_safe(brdf::reflect(ray.direction, n));
            Ray::new(hit.point + n * SECONDARY_BIAS, dir)
        };
        trace_photon(scene, map, next_ray, next_energy, bounce + 1);
    } else {
        let dir = normalize_safe(brdf::reflect(ray.direction, n));
        let next_ray = Ray::new(hit.point + n * SECONDARY_BIAS, dir);
        trace_photon(scene, map, next_ray, energy * material.reflectivity, bounce + 1);
    }
}

fn trace_path(
    scene: &Scene,
    map: &PhotonMap,
    ray: &Ray,
    bounce: usize,
    rng: &mut rand::rngs::SmallRng,
) -> Color {
    if bounce > scene.nbounces {
        return scene.background;
    }
    let Some(hit) = scene.intersect(ray) else {
        return scene.background;
    };

    let shape = scene.shape(hit.shape);
    let material = shape.material();
    let tex = material.diffuse_at(shape.uv_at(hit.point));
    let normal = hit.normal;
    let view_dir = -ray.direction;

    let mut color = Color::ZERO;

    // direct lighting
    for light in &scene.lights {
        match light {
            Light::Area(area) => {
                let mut contribution = Color::ZERO;
                for _ in 0..AREA_LIGHT_SAMPLES {
                    let sample_pos = area.sample_point(rng);
                    let to_light = sample_pos - hit.point;
                    let distance = to_light.length();
                    if distance <= SHADOW_BIAS {
                        continue;
                    }
                    let light_dir = to_light / distance;
                    let shadow_ray = Ray::new(hit.point + normal * SHADOW_BIAS, light_dir);
                    if occluded(scene, &shadow_ray, distance) {
                        continue;
                    }

                    let n_dot_l = normal.dot(light_dir).max(0.0);
                    let mirror = normalize_safe(brdf::reflect(-light_dir, normal));
                    let spec_intensity = view_dir
                        .dot(mirror)
                        .max(0.0)
                        .powi(material.specular_exponent);

                    let diffuse = tex * (n_dot_l * material.kd);
                    let specular = material.specular_color * (spec_intensity * material.ks);
                    contribution += (diffuse + specular) * (area.intensity / 255.0);
                }
                color += contribution / (area.area() * AREA_LIGHT_SAMPLES as Float);
            }
            Light::Point(point) => {
                let to_light = point.position - hit.point;
                let distance = to_light.length();
                if distance <= SHADOW_BIAS {
                    continue;
                }
                let light_dir = to_light / distance;
                let shadow_ray = Ray::new(hit.point + normal * SHADOW_BIAS, light_dir);
                if occluded(scene, &shadow_ray, distance) {
                    continue;
                }

                let n_dot_l = normal.dot(light_dir).max(0.0);
                let mirror = normalize_safe(brdf::reflect(-light_dir, normal));
                let spec_intensity = view_dir
                    .dot(mirror)
                    .max(0.0)
                    .powi(material.specular_exponent);

                let diffuse = tex * (n_dot_l * material.kd);
                let specular = material.specular_color * (spec_intensity * material.ks);
                color += (diffuse + specular) * (point.intensity / 255.0);
            }
        }
    }

    // indirect lighting from the photon map, diffuse receivers only
    if material.is_diffuse() && !map.is_empty() {
        let photons = map.query(hit.point, GATHER_RADIUS);
        if !photons.is_empty() {
            let r2 = GATHER_RADIUS * GATHER_RADIUS;
            let mut gathered = Color::ZERO;
            for photon in photons {
                let d2 = (photon.position - hit.point).length_squared();
                let weight = (1.0 - d2 / r2).max(0.0);
                gathered += photon.energy * weight;
            }
            let indirect = clamp_255(gathered / (PI * r2));
            color += indirect * INDIRECT_SCALE;
        }
    }

    // unbiased early termination once the path is deep enough
    let mut rr_scale = 1.0;
    if bounce > RR_MIN_BOUNCE {
        let p = continuation_probability(material);
        if random_float(rng) >= p {
            return color;
        }
        rr_scale = 1.0 / p;
    }

    if material.is_reflective || material.is_refractive {
        let entering = ray.direction.dot(normal) < 0.0;
        let n = if entering { normal } else { -normal };
        let (n1, n2) = if entering {
            (1.0, material.refractive_index)
        } else {
            (material.refractive_index, 1.0)
        };
        let cos_i = (-n.dot(ray.direction)).max(0.0);
        let fresnel = schlick_dielectric(cos_i, n1, n2);

        // GGX importance-sampled reflection lobe
        let mut reflected = Color::ZERO;
        for _ in 0..BRDF_SAMPLES {
            let half = brdf::sample_ggx(n, material.roughness, rng);
            let light_dir = normalize_safe(brdf::reflect(ray.direction, half));
            if light_dir.dot(n) <= 0.0 {
                continue; // sampled into the surface
            }
            let bounce_ray = Ray::new(hit.point + n * SECONDARY_BIAS, light_dir);
            let traced = trace_path(scene, map, &bounce_ray, bounce + 1, rng);

            let f_r = brdf::cook_torrance(
                light_dir,
                view_dir,
                n,
                half,
                tex / 255.0,
                material.f0(),
                material.roughness,
            );
            let pdf = brdf::ggx_pdf(n, half, material.roughness).max(1e-3);
            let weighted = traced * f_r * (light_dir.dot(n).max(0.0) / pdf);
            if weighted.is_finite() {
                reflected += weighted;
            }
        }
        reflected /= BRDF_SAMPLES as Float;

        if material.is_refractive {
            let eta = n1 / n2;
            let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
            if sin2_t <= 1.0 {
                let cos_t = (1.0 - sin2_t).sqrt();
                let refracted_dir =
                    normalize_safe(ray.direction * eta + n * (eta * cos_i - cos_t));
                let refracted_ray = Ray::new(hit.point - n * SECONDARY_BIAS, refracted_dir);
                let transmitted = trace_path(scene, map, &refracted_ray, bounce + 1, rng)
                    * (material.diffuse_color / 255.0);
                color += reflected * fresnel + transmitted * (1.0 - fresnel);
            } else {
                color += reflected;
            }
        } else {
            color += reflected * material.reflectivity;
        }
    }

    color * rr_scale
}

// =======================================================================================================
// Shared helpers
// =======================================================================================================

/// True when something blocks the segment from the shadow ray's origin
/// to the light at the given distance.
fn occluded(scene: &Scene, shadow_ray: &Ray, distance: Float) -> bool {
    let interval = Interval::new(1e-4, distance - 1e-4);
    scene.intersect_within(shadow_ray, &interval).is_some()
}

/// Scalar Schlick reflectance for a dielectric boundary.
fn schlick_dielectric(cos_i: Float, n1: Float, n2: Float) -> Float {
    let r0 = ((n1 - n2) / (n1 + n2)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos_i).powi(5)
}

/// Continuation probability used by the Russian-roulette step.
fn continuation_probability(material: &Material) -> Float {
    material.reflectivity.max(material.kd).clamp(0.1, 0.95)
}
