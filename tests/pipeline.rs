/*

    End-to-end checks: literal JSON documents through the parser,
    renderer and tone mapper.

*/

use lumen_tracer::color::Color;
use lumen_tracer::numeric::Vector3;
use lumen_tracer::{parse_scene_str, render};

const BINARY_SPHERE: &str = r#"{
    "rendermode": "binary",
    "camera": {
        "type": "pinhole",
        "position": [0, 0, 0],
        "lookAt": [0, 0, -1],
        "upVector": [0, 1, 0],
        "width": 100, "height": 100, "fov": 90.0, "exposure": 1.0
    },
    "scene": {
        "backgroundcolor": [0, 0, 0],
        "lightsources": [],
        "shapes": [
            { "type": "sphere", "center": [0, 0, -3], "radius": 1.0 }
        ]
    }
}"#;

#[test]
fn binary_sphere_scenario() {
    let scene = parse_scene_str(BINARY_SPHERE).unwrap();
    let image = render(&scene, "binary_sphere");
    let pixels = image.pixels();

    let red = Color::new(255.0, 0.0, 0.0);
    // the sphere silhouette covers the centre of the image
    for offset in [-14i32, 0, 14] {
        let x = (50 + offset) as usize;
        assert_eq!(pixels[50 * 100 + x], red);
        let y = (50 + offset) as usize;
        assert_eq!(pixels[y * 100 + 50], red);
    }
    // the corner ray misses and falls back to the background
    assert_eq!(pixels[0], Color::new(0.0, 0.0, 0.0));
}

#[test]
fn corner_ray_spans_the_field_of_view() {
    let scene = parse_scene_str(BINARY_SPHERE).unwrap();
    let dir = scene.camera.ray_direction(0.0, 0.0);
    // fov 90, aspect 1: |x / z| at the corner pixel centre is 1 - 1/width
    let lateral = (dir.x / dir.z).abs();
    assert!((lateral - 0.99).abs() < 1e-4, "got {lateral}");
    // and the ray is unit length
    assert!((dir.length() - 1.0).abs() < 1e-5);
}

#[test]
fn phong_scene_tone_maps_into_display_range() {
    let json = r#"{
        "rendermode": "phong",
        "nbounces": 2,
        "camera": {
            "position": [0, 1, 0],
            "lookAt": [0, 0, -3],
            "upVector": [0, 1, 0],
            "width": 32, "height": 32, "fov": 60.0, "exposure": 1.0
        },
        "scene": {
            "backgroundcolor": [0.1, 0.1, 0.2],
            "lightsources": [
                { "type": "pointlight", "position": [0, 5, -2], "intensity": [10, 10, 10] }
            ],
            "shapes": [
                { "type": "sphere", "center": [0, 1, -3], "radius": 1.0,
                  "material": { "kd": 0.9, "ks": 0.4, "diffusecolor": [1, 0.6, 0.2] } },
                { "type": "triangle",
                  "v0": [-10, 0, 2], "v1": [10, 0, 2], "v2": [0, 0, -20] },
                { "type": "cylinder", "center": [2, 0.5, -4], "axis": [0, 1, 0],
                  "radius": 0.4, "height": 0.5 }
            ]
        }
    }"#;
    let scene = parse_scene_str(json).unwrap();
    let image = render(&scene, "phong_range");
    for p in image.pixels() {
        for c in [p.x, p.y, p.z] {
            assert!((0.0..=255.0).contains(&c), "channel {c} out of range");
        }
    }
}

#[test]
fn pathtracer_scene_renders_through_the_full_pipeline() {
    let json = r#"{
        "rendermode": "pathtracer",
        "nbounces": 2,
        "nsamples": 2,
        "nphotons": 500,
        "tonemap": { "operator": "aces" },
        "camera": {
            "position": [0, 1, 2],
            "lookAt": [0, 1, -3],
            "upVector": [0, 1, 0],
            "width": 16, "height": 16, "fov": 70.0, "exposure": 1.0,
            "apertureSize": 0.1, "focalDistance": 5.0
        },
        "scene": {
            "backgroundcolor": [0.05, 0.05, 0.05],
            "lightsources": [
                { "type": "arealight", "position": [0, 4, -3], "intensity": [1, 1, 1],
                  "u": [1, 0, 0], "v": [0, 0, 1], "width": 1.0, "height": 1.0 }
            ],
            "shapes": [
                { "type": "sphere", "center": [0, 1, -3], "radius": 1.0,
                  "material": { "diffusecolor": [0.8, 0.3, 0.3] } },
                { "type": "triangle",
                  "v0": [-10, 0, 2], "v1": [10, 0, 2], "v2": [0, 0, -20] }
            ]
        }
    }"#;
    let scene = parse_scene_str(json).unwrap();
    let image = render(&scene, "path_pipeline");
    assert_eq!(image.resolution(), (16, 16));
    for p in image.pixels() {
        for c in [p.x, p.y, p.z] {
            assert!((0.0..=255.0).contains(&c));
        }
    }
}

#[test]
fn aperture_camera_offsets_ray_origins() {
    let json = r#"{
        "rendermode": "pathtracer",
        "camera": {
            "type": "aperture",
            "position": [0, 0, 0],
            "lookAt": [0, 0, -1],
            "upVector": [0, 1, 0],
            "width": 8, "height": 8, "fov": 90.0, "exposure": 1.0,
            "apertureSize": 0.5, "focalDistance": 3.0
        },
        "scene": { "backgroundcolor": [0, 0, 0], "lightsources": [], "shapes": [] }
    }"#;
    let scene = parse_scene_str(json).unwrap();
    let mut rng = lumen_tracer::sampler::row_rng(1, 0);
    let mut displaced = false;
    for _ in 0..16 {
        let ray = scene.camera.generate_ray(4.0, 4.0, &mut rng);
        if (ray.origin - Vector3::ZERO).length() > 1e-6 {
            displaced = true;
        }
    }
    assert!(displaced, "aperture camera never moved the ray origin");
}
