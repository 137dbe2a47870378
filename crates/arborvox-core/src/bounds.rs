//! Axis-aligned bounding boxes for voxel partitioning.

use serde::{Deserialize, Serialize};

use crate::Vec3;

/// Axis-aligned box described by its minimum corner and per-axis size.
///
/// Sizes are kept non-negative by construction. Point containment is
/// inclusive of the boundary; box-vs-box intersection requires strict
/// overlap, so boxes that merely touch do not intersect.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub origin: Vec3,
    /// Per-axis extent, always >= 0.
    pub size: Vec3,
}

impl Aabb {
    /// Create a box from its minimum corner and size.
    ///
    /// Negative size components are clamped to zero.
    #[must_use]
    pub fn new(origin: Vec3, size: Vec3) -> Self {
        Self {
            origin,
            size: size.map(|s| s.max(0.0)),
        }
    }

    /// Create a box spanning two opposite corners.
    #[must_use]
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        let lo = Vec3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z));
        let hi = Vec3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z));
        Self {
            origin: lo,
            size: hi - lo,
        }
    }

    /// Maximum corner (`origin + size`).
    #[must_use]
    pub fn max_corner(&self) -> Vec3 {
        self.origin + self.size
    }

    /// Geometric center of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.origin + self.size * 0.5
    }

    /// Volume of the box.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.size.x * self.size.y * self.size.z
    }

    /// Check if a point lies inside the box, boundary inclusive.
    #[must_use]
    pub fn contains(&self, point: &Vec3) -> bool {
        let max = self.max_corner();
        point.x >= self.origin.x
            && point.x <= max.x
            && point.y >= self.origin.y
            && point.y <= max.y
            && point.z >= self.origin.z
            && point.z <= max.z
    }

    /// Check for strict overlap with another box.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        let a_max = self.max_corner();
        let b_max = other.max_corner();
        self.origin.x < b_max.x
            && a_max.x > other.origin.x
            && self.origin.y < b_max.y
            && a_max.y > other.origin.y
            && self.origin.z < b_max.z
            && a_max.z > other.origin.z
    }

    /// Scale the box about its center by `factor`.
    ///
    /// Used to add a margin before partitioning so boundary vertices do not
    /// fall just outside the grid due to floating-point edge effects.
    #[must_use]
    pub fn expanded(&self, factor: f32) -> Self {
        let center = self.center();
        let size = self.size * factor.max(0.0);
        Self {
            origin: center - size * 0.5,
            size,
        }
    }

    /// Shift the box by `offset` without changing its size.
    pub fn translate(&mut self, offset: &Vec3) {
        self.origin += offset;
    }

    /// The eight corners, front face (min Z) first, counter-clockwise from
    /// the minimum corner.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 8] {
        let o = self.origin;
        let s = self.size;
        [
            Vec3::new(o.x, o.y, o.z),
            Vec3::new(o.x + s.x, o.y, o.z),
            Vec3::new(o.x + s.x, o.y + s.y, o.z),
            Vec3::new(o.x, o.y + s.y, o.z),
            Vec3::new(o.x, o.y, o.z + s.z),
            Vec3::new(o.x + s.x, o.y, o.z + s.z),
            Vec3::new(o.x + s.x, o.y + s.y, o.z + s.z),
            Vec3::new(o.x, o.y + s.y, o.z + s.z),
        ]
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            origin: Vec3::zeros(),
            size: Vec3::zeros(),
        }
    }
}
