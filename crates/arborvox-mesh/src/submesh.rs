//! Sub-mesh arena with stable handles and mutable position buffers.
//!
//! The arena owns every vertex buffer; voxels and update strategies hold
//! only [`SubMeshId`] handles and indices, so buffers cannot dangle or be
//! aliased by two owners.

use serde::{Deserialize, Serialize};

use arborvox_core::{Aabb, Vec3};

/// Opaque handle identifying a sub-mesh within a [`MeshArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubMeshId(u32);

impl SubMeshId {
    /// Index into the owning arena.
    #[must_use]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// One sub-mesh: an axis-aligned bounding box plus an indexable position
/// buffer with stable indices across ticks.
///
/// The rest-pose buffer is captured at construction and never mutated;
/// the live buffer is rewritten by the mesh updater every tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubMesh {
    bounds: Aabb,
    positions: Vec<Vec3>,
    rest_positions: Vec<Vec3>,
    triangles: Vec<u32>,
}

impl SubMesh {
    /// Create a sub-mesh from vertex positions and triangle indices.
    ///
    /// Bounds are derived from the positions; the rest pose is a snapshot of
    /// the buffer as given.
    #[must_use]
    pub fn new(positions: Vec<Vec3>, triangles: Vec<u32>) -> Self {
        let bounds = bounds_of(&positions);
        let rest_positions = positions.clone();
        Self {
            bounds,
            positions,
            rest_positions,
            triangles,
        }
    }

    /// Rest-pose bounding box.
    #[must_use]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Live vertex positions.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Rest-pose vertex positions.
    #[must_use]
    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest_positions
    }

    /// Triangle index buffer (three indices per face).
    #[must_use]
    pub fn triangles(&self) -> &[u32] {
        &self.triangles
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Overwrite one live vertex position.
    ///
    /// Out-of-range indices are ignored; claimed indices always originate
    /// from this buffer so they cannot go stale.
    pub fn set_position(&mut self, index: usize, position: Vec3) {
        if let Some(slot) = self.positions.get_mut(index) {
            *slot = position;
        }
    }

    /// Rigidly translate the whole sub-mesh: every live position becomes its
    /// rest position plus `offset`.
    pub fn translate_from_rest(&mut self, offset: &Vec3) {
        for (live, rest) in self.positions.iter_mut().zip(&self.rest_positions) {
            *live = rest + offset;
        }
    }

    /// Reset the live buffer to the rest pose.
    pub fn reset_to_rest(&mut self) {
        self.positions.copy_from_slice(&self.rest_positions);
    }
}

fn bounds_of(positions: &[Vec3]) -> Aabb {
    let mut iter = positions.iter();
    let Some(first) = iter.next() else {
        return Aabb::default();
    };
    let mut min = *first;
    let mut max = *first;
    for p in iter {
        min = Vec3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
        max = Vec3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
    }
    Aabb::from_min_max(min, max)
}

/// Owns every sub-mesh in a scene.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MeshArena {
    submeshes: Vec<SubMesh>,
}

impl MeshArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sub-mesh, returning its stable handle.
    pub fn insert(&mut self, submesh: SubMesh) -> SubMeshId {
        let id = SubMeshId(self.submeshes.len() as u32);
        self.submeshes.push(submesh);
        id
    }

    /// Look up a sub-mesh.
    #[must_use]
    pub fn get(&self, id: SubMeshId) -> Option<&SubMesh> {
        self.submeshes.get(id.index())
    }

    /// Look up a sub-mesh mutably.
    #[must_use]
    pub fn get_mut(&mut self, id: SubMeshId) -> Option<&mut SubMesh> {
        self.submeshes.get_mut(id.index())
    }

    /// Iterate over `(handle, sub-mesh)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (SubMeshId, &SubMesh)> {
        self.submeshes
            .iter()
            .enumerate()
            .map(|(i, m)| (SubMeshId(i as u32), m))
    }

    /// Number of sub-meshes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.submeshes.len()
    }

    /// Check if the arena holds no sub-meshes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.submeshes.is_empty()
    }

    /// Total number of vertices across all sub-meshes.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.submeshes.iter().map(SubMesh::vertex_count).sum()
    }

    /// Bounding box of the whole arena, or `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Aabb> {
        let mut iter = self.submeshes.iter();
        let first = iter.next()?;
        let mut min = first.bounds().origin;
        let mut max = first.bounds().max_corner();
        for m in iter {
            let lo = m.bounds().origin;
            let hi = m.bounds().max_corner();
            min = Vec3::new(min.x.min(lo.x), min.y.min(lo.y), min.z.min(lo.z));
            max = Vec3::new(max.x.max(hi.x), max.y.max(hi.y), max.z.max(hi.z));
        }
        Some(Aabb::from_min_max(min, max))
    }

    /// Reset every live buffer to the rest pose.
    pub fn reset_to_rest(&mut self) {
        for m in &mut self.submeshes {
            m.reset_to_rest();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> SubMesh {
        SubMesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 2.0, 0.0),
                Vec3::new(0.0, 2.0, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_bounds_from_positions() {
        let m = quad();
        assert!((m.bounds().origin - Vec3::zeros()).norm() < 1e-6);
        assert!((m.bounds().size - Vec3::new(1.0, 2.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_translate_and_reset() {
        let mut m = quad();
        m.translate_from_rest(&Vec3::new(0.5, 0.0, 0.0));
        assert!((m.positions()[0].x - 0.5).abs() < 1e-6);
        assert!((m.rest_positions()[0].x).abs() < 1e-6);

        m.reset_to_rest();
        assert!((m.positions()[0].x).abs() < 1e-6);
    }

    #[test]
    fn test_arena_bounds() {
        let mut arena = MeshArena::new();
        arena.insert(quad());
        let shifted = SubMesh::new(
            vec![Vec3::new(10.0, 0.0, 0.0), Vec3::new(11.0, 2.0, 0.0)],
            vec![],
        );
        arena.insert(shifted);

        let bounds = arena.bounds().unwrap();
        assert!((bounds.origin - Vec3::zeros()).norm() < 1e-6);
        assert!((bounds.max_corner() - Vec3::new(11.0, 2.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_empty_arena() {
        let arena = MeshArena::new();
        assert!(arena.bounds().is_none());
        assert!(arena.is_empty());
        assert_eq!(arena.vertex_count(), 0);
    }

    #[test]
    fn test_set_position_out_of_range_ignored() {
        let mut m = quad();
        m.set_position(99, Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(m.vertex_count(), 4);
    }
}
