/*

    Bounding Volume Hierarchy over the scene's shape arena.

    Nodes hold indices into the shape array rather than owning the
    shapes, so the tree can be read from every render worker without
    synchronisation. Built once per scene, top-down, median split on
    the largest-extent axis, leaves of at most two shapes.

*/

use crate::bbox::BBox;
use crate::interval::Interval;
use crate::prelude::*;
use crate::ray::{Intersection, Ray};
use crate::shapes::Shape;

#[derive(Debug)]
pub struct BvhNode {
    bounds: BBox,
    left: Option<Box<BvhNode>>,
    right: Option<Box<BvhNode>>,
    /// Shape indices; non-empty only for leaves.
    shapes: Vec<usize>,
}

#[derive(Debug, Default)]
pub struct Bvh {
    root: Option<Box<BvhNode>>,
}

const LEAF_SIZE: usize = 2;

impl Bvh {
    pub fn build(shapes: &[Shape]) -> Self {
        if shapes.is_empty() {
            return Bvh { root: None };
        }
        let mut indices: Vec<usize> = (0..shapes.len()).collect();
        let root = Self::build_recursive(shapes, &mut indices);
        Bvh { root: Some(root) }
    }

    fn bounds_of(shapes: &[Shape], indices: &[usize]) -> BBox {
        let mut bounds = BBox::EMPTY;
        for &i in indices {
            bounds.expand(&shapes[i].bounding_volume());
        }
        bounds
    }

    fn build_recursive(shapes: &[Shape], indices: &mut [usize]) -> Box<BvhNode> {
        let bounds = Self::bounds_of(shapes, indices);

        if indices.len() <= LEAF_SIZE {
            return Box::new(BvhNode {
                bounds,
                left: None,
                right: None,
                shapes: indices.to_vec(),
            });
        }

        // nth_element-style median partition by centroid
        let axis = bounds.largest_axis();
        let mid = indices.len() / 2;
        indices.select_nth_unstable_by(mid, |&a, &b| {
            let ca = shapes[a].centroid()[axis];
            let cb = shapes[b].centroid()[axis];
            ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let (left_ids, right_ids) = indices.split_at_mut(mid);
        let left = Self::build_recursive(shapes, left_ids);
        let right = Self::build_recursive(shapes, right_ids);

        Box::new(BvhNode {
            bounds,
            left: Some(left),
            right: Some(right),
            shapes: Vec::new(),
        })
    }

    /// Closest hit across the whole shape set, or None.
    pub fn traverse(
        &self,
        ray: &Ray,
        t_interval: &Interval,
        shapes: &[Shape],
    ) -> Option<Intersection> {
        let mut nearest: Option<Intersection> = None;
        if let Some(root) = &self.root {
            Self::traverse_recursive(root, ray, t_interval, shapes, &mut nearest);
        }
        nearest
    }

    fn traverse_recursive(
        node: &BvhNode,
        ray: &Ray,
        t_interval: &Interval,
        shapes: &[Shape],
        nearest: &mut Option<Intersection>,
    ) {
        if !node.bounds.intersects(ray) {
            return;
        }

        if node.left.is_none() && node.right.is_none() {
            for &i in &node.shapes {
                if let Some(mut hit) = shapes[i].intersect(ray, t_interval) {
                    hit.shape = i;
                    if nearest.as_ref().map_or(true, |best| hit.t < best.t) {
                        *nearest = Some(hit);
                    }
                }
            }
            return;
        }

        if let Some(left) = &node.left {
            Self::traverse_recursive(left, ray, t_interval, shapes, nearest);
        }
        if let Some(right) = &node.right {
            Self::traverse_recursive(right, ray, t_interval, shapes, nearest);
        }
    }
}
