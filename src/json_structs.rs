/*

    Serde DTOs mirroring the scene JSON schema.

    These structs stay close to the document layout; json_parser
    converts them into the runtime Scene types. All colour channels in
    the document are 0..1 linear and are scaled by 255 at load time.

*/

use crate::prelude::*;
use crate::tonemap::ToneMap;

#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct SceneFile {
    #[default = "binary"]
    pub rendermode: String,

    #[default = 1]
    pub nbounces: usize,

    /// Path-tracer samples per pixel.
    #[default = 16]
    pub nsamples: usize,

    /// Photons emitted per area light.
    #[default = 100_000]
    pub nphotons: usize,

    #[default = 0x5EED]
    pub seed: u64,

    pub tonemap: ToneMap,

    pub camera: CameraJson,
    pub scene: WorldJson,
}

#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct CameraJson {
    #[serde(rename = "type")]
    #[default = "pinhole"]
    pub kind: String,

    pub position: [Float; 3],

    #[serde(rename = "lookAt")]
    #[default([0.0, 0.0, -1.0])]
    pub look_at: [Float; 3],

    #[serde(rename = "upVector")]
    #[default([0.0, 1.0, 0.0])]
    pub up_vector: [Float; 3],

    #[default = 800]
    pub width: usize,
    #[default = 600]
    pub height: usize,

    #[default = 90.0]
    pub fov: Float,

    #[default = 0.1]
    pub exposure: Float,

    #[serde(rename = "apertureSize")]
    pub aperture_size: Option<Float>,

    #[serde(rename = "focalDistance")]
    pub focal_distance: Option<Float>,
}

#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct WorldJson {
    #[serde(rename = "backgroundcolor")]
    #[default([0.25, 0.25, 0.25])]
    pub background_color: [Float; 3],

    #[serde(rename = "lightsources")]
    pub light_sources: Vec<LightJson>,

    pub shapes: Vec<ShapeJson>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum LightJson {
    #[serde(rename = "pointlight")]
    Point {
        position: [Float; 3],
        intensity: [Float; 3],
    },
    #[serde(rename = "arealight")]
    Area {
        position: [Float; 3],
        intensity: [Float; 3],
        u: [Float; 3],
        v: [Float; 3],
        width: Float,
        height: Float,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeJson {
    Sphere {
        center: [Float; 3],
        radius: Float,
        #[serde(default)]
        material: MaterialJson,
    },
    Cylinder {
        center: [Float; 3],
        axis: [Float; 3],
        radius: Float,
        height: Float,
        #[serde(default)]
        material: MaterialJson,
    },
    Triangle {
        v0: [Float; 3],
        v1: [Float; 3],
        v2: [Float; 3],
        #[serde(default)]
        uv0: Option<[Float; 2]>,
        #[serde(default)]
        uv1: Option<[Float; 2]>,
        #[serde(default)]
        uv2: Option<[Float; 2]>,
        #[serde(default)]
        material: MaterialJson,
    },
}

#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct MaterialJson {
    #[default = 0.8]
    pub kd: Float,
    #[default = 0.2]
    pub ks: Float,

    #[serde(rename = "specularexponent")]
    #[default = 10]
    pub specular_exponent: Int,

    #[serde(rename = "diffusecolor")]
    #[default([1.0, 1.0, 1.0])]
    pub diffuse_color: [Float; 3],

    #[serde(rename = "specularcolor")]
    #[default([1.0, 1.0, 1.0])]
    pub specular_color: [Float; 3],

    #[serde(rename = "isreflective")]
    pub is_reflective: bool,

    #[default = 1.0]
    pub reflectivity: Float,

    #[serde(rename = "isrefractive")]
    pub is_refractive: bool,

    #[serde(rename = "refractiveindex")]
    #[default = 1.0]
    pub refractive_index: Float,

    #[default = 0.3]
    pub roughness: Float,

    /// Path stem, resolved as textures/<stem>.ppm.
    pub texture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_defaults_follow_schema() {
        let mat: MaterialJson = serde_json::from_str("{}").unwrap();
        assert_eq!(mat.kd, 0.8);
        assert_eq!(mat.ks, 0.2);
        assert_eq!(mat.specular_exponent, 10);
        assert_eq!(mat.diffuse_color, [1.0, 1.0, 1.0]);
        assert!(!mat.is_reflective);
        assert_eq!(mat.reflectivity, 1.0);
        assert!(!mat.is_refractive);
        assert_eq!(mat.refractive_index, 1.0);
        assert!(mat.texture.is_none());
    }

    #[test]
    fn shape_tag_dispatches_variants() {
        let sphere: ShapeJson =
            serde_json::from_str(r#"{"type":"sphere","center":[0,0,-3],"radius":1.0}"#).unwrap();
        assert!(matches!(sphere, ShapeJson::Sphere { .. }));

        let unknown = serde_json::from_str::<ShapeJson>(r#"{"type":"torus"}"#);
        assert!(unknown.is_err());
    }

    #[test]
    fn light_tag_dispatches_variants() {
        let point: LightJson = serde_json::from_str(
            r#"{"type":"pointlight","position":[0,5,0],"intensity":[1,1,1]}"#,
        )
        .unwrap();
        assert!(matches!(point, LightJson::Point { .. }));

        let area: LightJson = serde_json::from_str(
            r#"{"type":"arealight","position":[0,5,0],"intensity":[1,1,1],
                "u":[1,0,0],"v":[0,0,1],"width":1.0,"height":1.0}"#,
        )
        .unwrap();
        assert!(matches!(area, LightJson::Area { .. }));
    }

    #[test]
    fn scene_file_defaults_apply() {
        let file: SceneFile = serde_json::from_str(r#"{"camera":{},"scene":{}}"#).unwrap();
        assert_eq!(file.rendermode, "binary");
        assert_eq!(file.nbounces, 1);
        assert_eq!(file.nsamples, 16);
        assert_eq!(file.nphotons, 100_000);
        assert_eq!(file.camera.width, 800);
        assert_eq!(file.camera.fov, 90.0);
    }
}
