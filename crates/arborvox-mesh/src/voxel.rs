//! Voxel records: an axis-aligned cell plus kinematic state and claims.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use arborvox_core::{Aabb, ClampPolicy, Oscillator, SpringParams, Vec3};

use crate::submesh::SubMeshId;

/// A vertex claimed by a voxel, with the rest-pose position captured at
/// assignment time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClaimedPoint {
    /// Index into the owning sub-mesh position buffer.
    pub index: u32,
    /// Position at assignment time.
    pub rest_position: Vec3,
}

/// A grid cell animated as one rigid cluster of mesh geometry.
///
/// Built once from the rest pose at scene initialization; `bounds`, center
/// and velocity mutate every tick, everything else is fixed for the session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Voxel {
    /// Cell bounds, re-centered every tick.
    pub bounds: Aabb,
    /// Height tier: the Y grid index at generation time. Used by caller
    /// policy to scale wind response or stiffness.
    pub level: u32,
    /// Sub-meshes whose bounds first intersected this voxel.
    pub models: Vec<SubMeshId>,
    /// Vertices owned by this voxel, keyed by sub-mesh.
    pub points: HashMap<SubMeshId, Vec<ClaimedPoint>>,
    kinematics: Oscillator,
    spring: SpringParams,
}

impl Voxel {
    /// Create an empty voxel shell at rest. Spring parameters default to
    /// zero (free drift) until the caller sets them.
    #[must_use]
    pub fn new(bounds: Aabb, level: u32) -> Self {
        Self {
            bounds,
            level,
            models: Vec::new(),
            points: HashMap::new(),
            kinematics: Oscillator::new(bounds.center()),
            spring: SpringParams::default(),
        }
    }

    /// Rest-pose center, derived once from the initial bounds.
    #[must_use]
    pub fn rest_center(&self) -> Vec3 {
        self.kinematics.rest()
    }

    /// Current center.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.kinematics.center()
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.kinematics.velocity()
    }

    /// Net displacement from the rest pose. This is the movement the mesh
    /// updater applies to claimed geometry.
    #[must_use]
    pub fn displacement(&self) -> Vec3 {
        self.kinematics.displacement()
    }

    /// Per-voxel spring parameters.
    #[must_use]
    pub fn spring(&self) -> &SpringParams {
        &self.spring
    }

    /// Replace the spring parameters (already validated at construction).
    pub fn set_spring(&mut self, spring: SpringParams) {
        self.spring = spring;
    }

    /// Whether this voxel claims any model or vertex. Voxels without claims
    /// are pruned right after assignment and never ticked.
    #[must_use]
    pub fn has_claims(&self) -> bool {
        !self.models.is_empty() || self.points.values().any(|pts| !pts.is_empty())
    }

    /// Number of vertices this voxel owns.
    #[must_use]
    pub fn claimed_point_count(&self) -> usize {
        self.points.values().map(Vec::len).sum()
    }

    /// Advance kinematics one tick and shift the bounds by the resulting
    /// motion. Returns `true` when the displacement clamp engaged.
    pub fn step(&mut self, force: Vec3, dt: f32, clamp: &ClampPolicy) -> bool {
        let before = self.kinematics.center();
        let engaged = self.kinematics.step(force, dt, &self.spring, clamp);
        let moved = self.kinematics.center() - before;
        self.bounds.translate(&moved);
        engaged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_center_from_bounds() {
        let bounds = Aabb::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 2.0, 2.0));
        let voxel = Voxel::new(bounds, 1);
        assert!((voxel.rest_center() - Vec3::new(2.0, 3.0, 4.0)).norm() < 1e-6);
        assert!((voxel.center() - voxel.rest_center()).norm() < 1e-6);
        assert!(voxel.velocity().norm() < 1e-6);
    }

    #[test]
    fn test_step_moves_bounds_with_center() {
        let bounds = Aabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let mut voxel = Voxel::new(bounds, 0);
        voxel.set_spring(SpringParams::new(0.0, 1.0).unwrap());

        voxel.step(Vec3::new(1.0, 0.0, 0.0), 0.1, &ClampPolicy::default());

        let moved = voxel.center() - voxel.rest_center();
        assert!(moved.x > 0.0);
        assert!((voxel.bounds.origin.x - moved.x).abs() < 1e-6);
        // Bounds keep their size while translating.
        assert!((voxel.bounds.size - Vec3::new(1.0, 1.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_has_claims() {
        let bounds = Aabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let voxel = Voxel::new(bounds, 0);
        assert!(!voxel.has_claims());
        assert_eq!(voxel.claimed_point_count(), 0);
    }
}
