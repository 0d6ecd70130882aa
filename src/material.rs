/*

    Surface material shared immutably by the shapes that reference it.

    Colours are stored 0..255 referenced like the rest of the pipeline.
    The roughness feeds the microfacet BRDF and is floored there, not
    here, so the stored value reflects what the scene asked for.

*/

use crate::color::Color;
use crate::prelude::*;
use crate::texture::Texture;

#[derive(Debug, Clone)]
pub struct Material {
    pub kd: Float,
    pub ks: Float,
    pub specular_exponent: Int,
    pub diffuse_color: Color,
    pub specular_color: Color,
    pub is_reflective: bool,
    pub reflectivity: Float,
    pub is_refractive: bool,
    pub refractive_index: Float,
    pub roughness: Float,
    pub texture: Option<Arc<Texture>>,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            kd: 0.8,
            ks: 0.2,
            specular_exponent: 10,
            diffuse_color: Color::splat(255.0),
            specular_color: Color::splat(255.0),
            is_reflective: false,
            reflectivity: 1.0,
            is_refractive: false,
            refractive_index: 1.0,
            roughness: 0.3,
            texture: None,
        }
    }
}

impl Material {
    /// Diffuse base colour at the given UV; falls back to the flat
    /// diffuse colour when no texture is attached.
    pub fn diffuse_at(&self, uv: (Float, Float)) -> Color {
        match &self.texture {
            Some(tex) => tex.sample(uv.0, uv.1),
            None => self.diffuse_color,
        }
    }

    /// Neither reflective nor refractive; photons are deposited here.
    pub fn is_diffuse(&self) -> bool {
        !self.is_reflective && !self.is_refractive
    }

    /// Fresnel reflectance at normal incidence for the microfacet model,
    /// scaled into [0, 1].
    pub fn f0(&self) -> Color {
        self.specular_color / 255.0
    }
}
