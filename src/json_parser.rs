/*

    Load a scene JSON document and convert it into the runtime Scene.

    Colour channels in the document are 0..1 linear and are scaled by
    255 here. Texture stems resolve to textures/<stem>.ppm relative to
    the working directory.

*/

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::camera::{Camera, CameraKind};
use crate::color::Color;
use crate::error::SceneError;
use crate::json_structs::{CameraJson, LightJson, MaterialJson, SceneFile, ShapeJson};
use crate::light::{AreaLight, Light, PointLight};
use crate::material::Material;
use crate::prelude::*;
use crate::scene::{RenderMode, Scene};
use crate::shapes::{Cylinder, Shape, Sphere, Triangle};
use crate::texture::Texture;

pub fn load_scene(path: &Path) -> Result<Scene, SceneError> {
    let span = tracing::span!(tracing::Level::INFO, "load_scene");
    let _enter = span.enter();

    debug!("Reading scene from {}", path.display());
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let doc: SceneFile = serde_json::from_reader(reader)?;
    build_scene(doc)
}

/// Parse a scene from an in-memory JSON string.
pub fn parse_scene_str(json: &str) -> Result<Scene, SceneError> {
    let doc: SceneFile = serde_json::from_str(json)?;
    build_scene(doc)
}

fn vec3(a: [Float; 3]) -> Vector3 {
    Vector3::new(a[0], a[1], a[2])
}

fn color_255(a: [Float; 3]) -> Color {
    vec3(a) * 255.0
}

fn parse_render_mode(mode: &str) -> Result<RenderMode, SceneError> {
    match mode {
        "binary" => Ok(RenderMode::Binary),
        "phong" => Ok(RenderMode::Phong),
        "pathtracer" => Ok(RenderMode::Path),
        other => Err(SceneError::UnknownRenderMode(other.to_string())),
    }
}

fn build_camera(json: &CameraJson, render_mode: RenderMode) -> Camera {
    let position = vec3(json.position);
    let look_at = vec3(json.look_at);

    // pathtracer implies the thin-lens camera whenever an aperture is
    // available; everything else defaults to the pinhole
    let wants_aperture = json.kind == "aperture"
        || (render_mode == RenderMode::Path && json.aperture_size.is_some());
    let kind = if wants_aperture {
        let aperture_size = json.aperture_size.unwrap_or(0.0);
        let focal_distance = json
            .focal_distance
            .unwrap_or_else(|| (look_at - position).length());
        CameraKind::Aperture {
            aperture_size,
            focal_distance,
        }
    } else {
        CameraKind::Pinhole
    };

    Camera::new(
        position,
        look_at,
        vec3(json.up_vector),
        json.width,
        json.height,
        json.fov,
        json.exposure,
        kind,
    )
}

fn build_material(json: &MaterialJson) -> Result<Arc<Material>, SceneError> {
    let texture = match &json.texture {
        Some(stem) => {
            let path = PathBuf::from("textures").join(format!("{stem}.ppm"));
            Some(Arc::new(Texture::load(&path)?))
        }
        None => None,
    };

    Ok(Arc::new(Material {
        kd: json.kd,
        ks: json.ks,
        specular_exponent: json.specular_exponent,
        diffuse_color: color_255(json.diffuse_color),
        specular_color: color_255(json.specular_color),
        is_reflective: json.is_reflective,
        reflectivity: json.reflectivity,
        is_refractive: json.is_refractive,
        refractive_index: json.refractive_index,
        roughness: json.roughness,
        texture,
    }))
}

fn build_shape(json: &ShapeJson) -> Result<Shape, SceneError> {
    Ok(match json {
        ShapeJson::Sphere {
            center,
            radius,
            material,
        } => {
            if *radius <= EPSILON {
                warn!("Sphere with degenerate radius {} will never be hit", radius);
            }
            Shape::Sphere(Sphere::new(vec3(*center), *radius, build_material(material)?))
        }
        ShapeJson::Cylinder {
            center,
            axis,
            radius,
            height,
            material,
        } => {
            if vec3(*axis).length_squared() <= EPSILON {
                warn!("Cylinder with zero-length axis will never be hit");
            }
            Shape::Cylinder(Cylinder::new(
                vec3(*center),
                vec3(*axis),
                *radius,
                *height,
                build_material(material)?,
            ))
        }
        ShapeJson::Triangle {
            v0,
            v1,
            v2,
            uv0,
            uv1,
            uv2,
            material,
        } => {
            let tri = Triangle::new(vec3(*v0), vec3(*v1), vec3(*v2), build_material(material)?);
            let tri = match (uv0, uv1, uv2) {
                (Some(a), Some(b), Some(c)) => {
                    tri.with_uvs((a[0], a[1]), (b[0], b[1]), (c[0], c[1]))
                }
                _ => tri,
            };
            let area2 = (vec3(*v1) - vec3(*v0))
                .cross(vec3(*v2) - vec3(*v0))
                .length_squared();
            if area2 <= EPSILON {
                warn!("Zero-area triangle will never be hit");
            }
            Shape::Triangle(tri)
        }
    })
}

fn build_light(json: &LightJson) -> Light {
    match json {
        LightJson::Point {
            position,
            intensity,
        } => Light::Point(PointLight {
            position: vec3(*position),
            intensity: color_255(*intensity),
        }),
        LightJson::Area {
            position,
            intensity,
            u,
            v,
            width,
            height,
        } => Light::Area(AreaLight::new(
            vec3(*position),
            color_255(*intensity),
            vec3(*u),
            vec3(*v),
            *width,
            *height,
        )),
    }
}

fn build_scene(doc: SceneFile) -> Result<Scene, SceneError> {
    let render_mode = parse_render_mode(&doc.rendermode)?;
    let camera = build_camera(&doc.camera, render_mode);

    let lights: Vec<Light> = doc.scene.light_sources.iter().map(build_light).collect();
    let shapes = doc
        .scene
        .shapes
        .iter()
        .map(build_shape)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Scene::new(
        render_mode,
        doc.nbounces,
        doc.nsamples,
        doc.nphotons,
        doc.seed,
        color_255(doc.scene.background_color),
        camera,
        lights,
        shapes,
        doc.tonemap,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraKind;

    const MINIMAL: &str = r#"{
        "rendermode": "binary",
        "camera": {
            "type": "pinhole",
            "position": [0, 0, 0],
            "lookAt": [0, 0, -1],
            "upVector": [0, 1, 0],
            "width": 100, "height": 100, "fov": 90.0, "exposure": 1.0
        },
        "scene": {
            "backgroundcolor": [0.1, 0.2, 0.3],
            "lightsources": [],
            "shapes": [
                { "type": "sphere", "center": [0, 0, -3], "radius": 1.0 }
            ]
        }
    }"#;

    #[test]
    fn minimal_scene_parses() {
        let scene = parse_scene_str(MINIMAL).unwrap();
        assert_eq!(scene.render_mode, RenderMode::Binary);
        assert_eq!(scene.shapes.len(), 1);
        assert_eq!(scene.nbounces, 1);
        // background scaled to 0..255
        assert!((scene.background - Color::new(25.5, 51.0, 76.5)).length() < 1e-3);
    }

    #[test]
    fn unknown_render_mode_is_an_input_error() {
        let json = MINIMAL.replace("\"binary\"", "\"raster\"");
        match parse_scene_str(&json) {
            Err(SceneError::UnknownRenderMode(mode)) => assert_eq!(mode, "raster"),
            other => panic!("expected UnknownRenderMode, got {other:?}"),
        }
    }

    #[test]
    fn unknown_shape_type_is_an_input_error() {
        let json = MINIMAL.replace("\"sphere\"", "\"torus\"");
        assert!(matches!(parse_scene_str(&json), Err(SceneError::Json(_))));
    }

    #[test]
    fn pathtracer_with_aperture_size_gets_thin_lens_camera() {
        let json = MINIMAL
            .replace("\"binary\"", "\"pathtracer\"")
            .replace(
                "\"exposure\": 1.0",
                "\"exposure\": 1.0, \"apertureSize\": 0.2",
            );
        let scene = parse_scene_str(&json).unwrap();
        match scene.camera.kind {
            CameraKind::Aperture {
                aperture_size,
                focal_distance,
            } => {
                assert!((aperture_size - 0.2).abs() < 1e-6);
                // defaults to |lookAt - position|
                assert!((focal_distance - 1.0).abs() < 1e-6);
            }
            _ => panic!("expected aperture camera"),
        }
    }

    #[test]
    fn missing_texture_file_is_an_input_error() {
        let json = MINIMAL.replace(
            "\"radius\": 1.0",
            "\"radius\": 1.0, \"material\": { \"texture\": \"no_such_texture\" }",
        );
        assert!(parse_scene_str(&json).is_err());
    }
}
