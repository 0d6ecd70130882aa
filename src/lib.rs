pub mod acceleration;
pub mod bbox;
pub mod brdf;
pub mod camera;
pub mod color;
pub mod error;
pub mod image;
pub mod interface;
pub mod interval;
pub mod json_parser;
pub mod json_structs;
pub mod light;
pub mod material;
pub mod numeric;
pub mod photon;
pub mod prelude;
pub mod ray;
pub mod renderer;
pub mod sampler;
pub mod scene;
pub mod shapes;
pub mod texture;
pub mod tonemap;

pub use crate::json_parser::{load_scene, parse_scene_str};
pub use crate::renderer::render;
