/*

    Declare the Scene: camera, lights, shapes, render settings and the
    BVH built over the shape arena. Immutable once constructed; every
    render worker reads it concurrently.

*/

use crate::acceleration::Bvh;
use crate::camera::Camera;
use crate::color::Color;
use crate::interval::Interval;
use crate::light::Light;
use crate::prelude::*;
use crate::ray::{Intersection, Ray};
use crate::shapes::Shape;
use crate::tonemap::ToneMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Binary,
    Phong,
    Path,
}

#[derive(Debug)]
pub struct Scene {
    pub render_mode: RenderMode,
    pub nbounces: usize,
    /// Path-tracer samples per pixel.
    pub nsamples: usize,
    /// Photons emitted per area light.
    pub nphotons: usize,
    pub seed: u64,
    pub background: Color,
    pub camera: Camera,
    pub lights: Vec<Light>,
    pub shapes: Vec<Shape>,
    pub tonemap: ToneMap,
    bvh: Bvh,
}

impl Scene {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        render_mode: RenderMode,
        nbounces: usize,
        nsamples: usize,
        nphotons: usize,
        seed: u64,
        background: Color,
        camera: Camera,
        lights: Vec<Light>,
        shapes: Vec<Shape>,
        tonemap: ToneMap,
    ) -> Self {
        let bvh = Bvh::build(&shapes);
        info!(
            "Scene ready: {} shapes, {} lights, mode {:?}, {} bounces",
            shapes.len(),
            lights.len(),
            render_mode,
            nbounces
        );
        Self {
            render_mode,
            nbounces,
            nsamples,
            nphotons,
            seed,
            background,
            camera,
            lights,
            shapes,
            tonemap,
            bvh,
        }
    }

    /// Closest hit across every shape, through the BVH.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        self.bvh
            .traverse(ray, &Interval::positive(EPSILON), &self.shapes)
    }

    /// Closest hit restricted to an explicit t range (shadow rays).
    pub fn intersect_within(&self, ray: &Ray, t_interval: &Interval) -> Option<Intersection> {
        self.bvh.traverse(ray, t_interval, &self.shapes)
    }

    pub fn shape(&self, index: usize) -> &Shape {
        &self.shapes[index]
    }
}
