//! Exclusive assignment of sub-meshes and vertices to voxels.
//!
//! A vertex position may lie inside several voxels (boundary inclusive),
//! but ownership is exclusive: the first intersecting voxel in generation
//! order wins, tracked in an explicit [`ClaimMap`] rather than hidden
//! mutable state, so the pass stays deterministic and testable.

use std::collections::{HashMap, HashSet};

use crate::submesh::{MeshArena, SubMeshId};
use crate::voxel::{ClaimedPoint, Voxel};

/// Record of which voxel owns each claimed vertex.
///
/// Keys are `(sub-mesh, vertex index)` pairs; values are indices into the
/// pruned voxel list returned by [`assign`].
#[derive(Clone, Debug, Default)]
pub struct ClaimMap {
    owners: HashMap<(SubMeshId, u32), usize>,
}

impl ClaimMap {
    /// Voxel index owning the given vertex, if any.
    #[must_use]
    pub fn owner_of(&self, mesh: SubMeshId, vertex: u32) -> Option<usize> {
        self.owners.get(&(mesh, vertex)).copied()
    }

    /// Number of distinct claimed `(sub-mesh, vertex)` pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Check whether any vertex is claimed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    fn claim(&mut self, mesh: SubMeshId, vertex: u32, voxel_index: usize) {
        self.owners.insert((mesh, vertex), voxel_index);
    }

    fn remap(&mut self, new_indices: &[usize]) {
        for owner in self.owners.values_mut() {
            *owner = new_indices[*owner];
        }
    }
}

/// Summary of one assignment pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssignmentStats {
    /// Voxels discarded for holding no models and no points.
    pub pruned_voxels: usize,
    /// Distinct vertices claimed across all sub-meshes.
    pub claimed_vertices: usize,
    /// Sub-meshes granted whole-model membership somewhere.
    pub assigned_models: usize,
}

/// Assign sub-meshes and vertices to voxels, then prune empty voxels.
///
/// For each sub-mesh, voxels are visited in generation order. An AABB
/// intersection grants whole-model membership to the first intersecting
/// voxel only; point-in-box containment (boundary inclusive) claims each
/// not-yet-claimed vertex together with its current position. Vertices
/// contained by no voxel are simply left at rest.
///
/// Voxels left with no models and no points are removed; the returned
/// [`ClaimMap`] indexes into the pruned list.
pub fn assign(voxels: &mut Vec<Voxel>, arena: &MeshArena) -> (ClaimMap, AssignmentStats) {
    let mut claims = ClaimMap::default();
    let mut seen_models: HashSet<SubMeshId> = HashSet::new();

    for (mesh_id, submesh) in arena.iter() {
        for (voxel_index, voxel) in voxels.iter_mut().enumerate() {
            if !submesh.bounds().intersects(&voxel.bounds) {
                continue;
            }

            if !seen_models.contains(&mesh_id) {
                seen_models.insert(mesh_id);
                voxel.models.push(mesh_id);
            }

            for (i, position) in submesh.positions().iter().enumerate() {
                let vertex = i as u32;
                if claims.owner_of(mesh_id, vertex).is_some() {
                    continue;
                }
                if voxel.bounds.contains(position) {
                    claims.claim(mesh_id, vertex, voxel_index);
                    voxel
                        .points
                        .entry(mesh_id)
                        .or_default()
                        .push(ClaimedPoint {
                            index: vertex,
                            rest_position: *position,
                        });
                }
            }
        }
    }

    // Prune voxels with nothing to animate, remapping claim indices onto
    // the compacted list.
    let mut new_indices = vec![usize::MAX; voxels.len()];
    let mut kept = 0;
    for (i, voxel) in voxels.iter().enumerate() {
        if voxel.has_claims() {
            new_indices[i] = kept;
            kept += 1;
        }
    }
    let pruned = voxels.len() - kept;
    voxels.retain(Voxel::has_claims);
    claims.remap(&new_indices);

    let stats = AssignmentStats {
        pruned_voxels: pruned,
        claimed_vertices: claims.len(),
        assigned_models: seen_models.len(),
    };
    (claims, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{partition, GridConfig};
    use crate::submesh::SubMesh;
    use arborvox_core::{Aabb, Vec3};

    fn unit_grid(target: usize) -> Vec<Voxel> {
        let bounds = Aabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        partition(&bounds, &GridConfig::new(target)).unwrap()
    }

    #[test]
    fn test_vertex_claimed_by_first_voxel() {
        let mut voxels = unit_grid(8);
        let mut arena = MeshArena::new();
        let id = arena.insert(SubMesh::new(
            vec![Vec3::new(0.25, 0.25, 0.25), Vec3::new(0.4, 0.3, 0.2)],
            vec![],
        ));

        let (claims, stats) = assign(&mut voxels, &arena);

        assert_eq!(stats.claimed_vertices, 2);
        let owner = claims.owner_of(id, 0).unwrap();
        let cell = &voxels[owner].bounds;
        // The concrete scenario: the (0,0,0)-(0.5,0.5,0.5) cell owns it.
        assert!((cell.origin - Vec3::zeros()).norm() < 1e-6);
        assert!((cell.size - Vec3::new(0.5, 0.5, 0.5)).norm() < 1e-5);
    }

    #[test]
    fn test_boundary_vertex_claimed_once() {
        let mut voxels = unit_grid(8);
        let mut arena = MeshArena::new();
        // Vertex 0 sits exactly on the shared corner of several cells; it
        // may be contained by all of them but is claimed only once.
        let id = arena.insert(SubMesh::new(
            vec![Vec3::new(0.5, 0.5, 0.5), Vec3::new(0.45, 0.45, 0.45)],
            vec![],
        ));

        let (claims, _) = assign(&mut voxels, &arena);

        assert!(claims.owner_of(id, 0).is_some());
        assert_eq!(claims.len(), 2);
        let total: usize = voxels.iter().map(Voxel::claimed_point_count).sum();
        assert_eq!(total, claims.len());
    }

    #[test]
    fn test_ownership_invariant_over_many_vertices() {
        let mut voxels = unit_grid(27);
        let mut arena = MeshArena::new();
        let mut positions = Vec::new();
        for i in 0..10 {
            for j in 0..10 {
                for k in 0..10 {
                    positions.push(Vec3::new(
                        i as f32 / 9.0,
                        j as f32 / 9.0,
                        k as f32 / 9.0,
                    ));
                }
            }
        }
        let count = positions.len();
        arena.insert(SubMesh::new(positions, vec![]));

        let (claims, stats) = assign(&mut voxels, &arena);

        // Every vertex inside the grid is claimed exactly once: summed
        // per-voxel counts equal the number of distinct claimed pairs.
        let total: usize = voxels.iter().map(Voxel::claimed_point_count).sum();
        assert_eq!(total, claims.len());
        assert_eq!(claims.len(), count);
        assert_eq!(stats.claimed_vertices, count);
    }

    #[test]
    fn test_model_membership_first_wins() {
        let mut voxels = unit_grid(8);
        let mut arena = MeshArena::new();
        // Spans the whole grid, so it intersects every voxel.
        let id = arena.insert(SubMesh::new(
            vec![Vec3::new(0.1, 0.1, 0.1), Vec3::new(0.9, 0.9, 0.9)],
            vec![],
        ));

        let (_, stats) = assign(&mut voxels, &arena);

        let holders: Vec<_> = voxels
            .iter()
            .filter(|v| v.models.contains(&id))
            .collect();
        assert_eq!(holders.len(), 1);
        assert_eq!(stats.assigned_models, 1);
    }

    #[test]
    fn test_empty_voxels_pruned() {
        let mut voxels = unit_grid(8);
        let mut arena = MeshArena::new();
        // A tiny mesh in one corner leaves most voxels empty.
        let id = arena.insert(SubMesh::new(
            vec![Vec3::new(0.1, 0.1, 0.1), Vec3::new(0.2, 0.2, 0.2)],
            vec![],
        ));

        let before = voxels.len();
        let (claims, stats) = assign(&mut voxels, &arena);

        assert!(stats.pruned_voxels > 0);
        assert_eq!(before, voxels.len() + stats.pruned_voxels);
        // Remapped owner index is valid in the pruned list.
        let owner = claims.owner_of(id, 0);
        assert!(owner.is_some());
        assert!(owner.unwrap() < voxels.len());
    }

    #[test]
    fn test_empty_mesh_is_success() {
        let mut voxels = unit_grid(8);
        let arena = MeshArena::new();

        let (claims, stats) = assign(&mut voxels, &arena);

        assert!(voxels.is_empty());
        assert!(claims.is_empty());
        assert_eq!(stats.pruned_voxels, 8);
        assert_eq!(stats.assigned_models, 0);
    }

    #[test]
    fn test_vertex_outside_grid_stays_unclaimed() {
        let mut voxels = unit_grid(8);
        let mut arena = MeshArena::new();
        let id = arena.insert(SubMesh::new(
            vec![Vec3::new(0.5, 0.5, 0.5), Vec3::new(5.0, 5.0, 5.0)],
            vec![],
        ));

        let (claims, _) = assign(&mut voxels, &arena);

        assert!(claims.owner_of(id, 0).is_some());
        assert!(claims.owner_of(id, 1).is_none());
    }

    #[test]
    fn test_assignment_deterministic() {
        let make = || {
            let mut voxels = unit_grid(27);
            let mut arena = MeshArena::new();
            let id = arena.insert(SubMesh::new(
                vec![
                    Vec3::new(0.3, 0.3, 0.3),
                    Vec3::new(0.7, 0.1, 0.9),
                    Vec3::new(0.5, 0.5, 0.5),
                ],
                vec![],
            ));
            let (claims, _) = assign(&mut voxels, &arena);
            (voxels, claims, id)
        };

        let (va, ca, ia) = make();
        let (vb, cb, ib) = make();
        assert_eq!(va.len(), vb.len());
        for vertex in 0..3 {
            assert_eq!(ca.owner_of(ia, vertex), cb.owner_of(ib, vertex));
        }
    }
}
