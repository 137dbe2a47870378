//! Propagation of voxel displacement into mesh vertex buffers.

use arborvox_mesh::{MeshArena, Voxel};

/// Writes voxel displacements into the arena's live position buffers.
///
/// Strategies only ever write positions derived from the rest pose plus the
/// owning voxel's current displacement, so applying a strategy twice in one
/// tick is harmless.
pub trait UpdateStrategy {
    /// Apply the displacements of `voxels` to `arena`.
    fn apply(&self, voxels: &[Voxel], arena: &mut MeshArena);
}

/// Rigid whole-model updates: each sub-mesh translates as one body by its
/// owning voxel's displacement.
#[derive(Clone, Copy, Debug, Default)]
pub struct RigidModel;

impl UpdateStrategy for RigidModel {
    fn apply(&self, voxels: &[Voxel], arena: &mut MeshArena) {
        for voxel in voxels {
            let offset = voxel.displacement();
            for &id in &voxel.models {
                if let Some(submesh) = arena.get_mut(id) {
                    submesh.translate_from_rest(&offset);
                }
            }
        }
    }
}

/// Per-vertex updates: each claimed vertex moves by its owning voxel's
/// displacement, deforming sub-meshes that span several voxels.
#[derive(Clone, Copy, Debug, Default)]
pub struct PerVertex;

impl UpdateStrategy for PerVertex {
    fn apply(&self, voxels: &[Voxel], arena: &mut MeshArena) {
        for voxel in voxels {
            let offset = voxel.displacement();
            for (&id, points) in &voxel.points {
                let Some(submesh) = arena.get_mut(id) else {
                    continue;
                };
                for point in points {
                    submesh.set_position(point.index as usize, point.rest_position + offset);
                }
            }
        }
    }
}
