/*

    Diffuse textures loaded from P3 ppm files.

    UVs wrap into [0, 1) via the fractional part; lookups are bilinear
    over the four nearest texels with wrap-around indexing.

*/

use std::path::Path;

use crate::color::Color;
use crate::error::SceneError;
use crate::image::read_ppm;
use crate::prelude::*;

#[derive(Debug, Clone)]
pub struct Texture {
    width: usize,
    height: usize,
    pixels: Vec<Color>, // row-major
}

impl Texture {
    pub fn new(width: usize, height: usize, pixels: Vec<Color>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let (pixels, width, height) = read_ppm(path)?;
        info!("Loaded texture {} ({}x{})", path.display(), width, height);
        Ok(Self::new(width, height, pixels))
    }

    /// Texel fetch with wrap-around indexing.
    fn get_pixel(&self, u: i64, v: i64) -> Color {
        let w = self.width as i64;
        let h = self.height as i64;
        let u = ((u % w) + w) % w;
        let v = ((v % h) + h) % h;
        self.pixels[(v * w + u) as usize]
    }

    /// Bilinear sample. Any real-valued (u, v) is accepted; both
    /// coordinates wrap with period 1.
    pub fn sample(&self, u: Float, v: Float) -> Color {
        let u = u - u.floor();
        let v = v - v.floor();

        let x = u * self.width as Float;
        let y = v * self.height as Float;

        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let dx = x - x0 as Float;
        let dy = y - y0 as Float;

        let c00 = self.get_pixel(x0, y0);
        let c10 = self.get_pixel(x0 + 1, y0);
        let c01 = self.get_pixel(x0, y0 + 1);
        let c11 = self.get_pixel(x0 + 1, y0 + 1);

        c00 * (1.0 - dx) * (1.0 - dy)
            + c10 * dx * (1.0 - dy)
            + c01 * (1.0 - dx) * dy
            + c11 * dx * dy
    }
}
