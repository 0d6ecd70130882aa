/*

    Photon map: a flat photon vector rearranged in place into a k-d
    tree over photon positions.

    The tree is implicit: build partitions each [start, end) range
    about its median index on axis depth % 3, and the query walks the
    same ranges, so no node storage is needed.

*/

use crate::color::Color;
use crate::prelude::*;

#[derive(Debug, Clone)]
pub struct Photon {
    pub position: Vector3,
    /// Incoming direction at the deposit point.
    pub direction: Vector3,
    pub energy: Color,
}

#[derive(Debug, Default)]
pub struct PhotonMap {
    photons: Vec<Photon>,
    built: bool,
}

impl PhotonMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, position: Vector3, direction: Vector3, energy: Color) {
        debug_assert!(!self.built, "photons must be stored before build()");
        self.photons.push(Photon {
            position,
            direction,
            energy,
        });
    }

    pub fn len(&self) -> usize {
        self.photons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photons.is_empty()
    }

    /// Rearrange the photon vector into k-d order. Median partition on
    /// axis depth % 3, O(n log n) overall.
    pub fn build(&mut self) {
        let len = self.photons.len();
        Self::build_range(&mut self.photons, 0, len, 0);
        self.built = true;
        info!("Photon map built over {} photons", len);
    }

    fn build_range(photons: &mut [Photon], start: usize, end: usize, depth: usize) {
        if end.saturating_sub(start) <= 1 {
            return;
        }
        let axis = depth % 3;
        let mid = (start + end) / 2;

        photons[start..end].select_nth_unstable_by(mid - start, |a, b| {
            a.position[axis]
                .partial_cmp(&b.position[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Self::build_range(photons, start, mid, depth + 1);
        Self::build_range(photons, mid + 1, end, depth + 1);
    }

    /// All photons within `radius` of the query position.
    pub fn query(&self, position: Vector3, radius: Float) -> Vec<&Photon> {
        debug_assert!(self.built, "query before build() walks unordered photons");
        let mut result = Vec::new();
        self.query_range(0, self.photons.len(), 0, position, radius, &mut result);
        result
    }

    fn query_range<'a>(
        &'a self,
        start: usize,
        end: usize,
        depth: usize,
        position: Vector3,
        radius: Float,
        result: &mut Vec<&'a Photon>,
    ) {
        if start >= end {
            return;
        }
        let mid = (start + end) / 2;
        let node = &self.photons[mid];

        if (node.position - position).length_squared() <= radius * radius {
            result.push(node);
        }

        let axis = depth % 3;
        let delta = position[axis] - node.position[axis];
        let (near, far) = if delta < 0.0 {
            ((start, mid), (mid + 1, end))
        } else {
            ((mid + 1, end), (start, mid))
        };

        self.query_range(near.0, near.1, depth + 1, position, radius, result);
        if delta * delta <= radius * radius {
            self.query_range(far.0, far.1, depth + 1, position, radius, result);
        }
    }
}
