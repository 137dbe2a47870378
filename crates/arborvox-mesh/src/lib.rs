//! Arborvox Mesh - Voxelization of Mesh Geometry
//!
//! Partitions a mesh's bounding volume into a grid of voxels and assigns
//! sub-meshes and individual vertices to them with exclusive ownership:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  MeshArena ──▶ grid::partition ──▶ assign::assign ──▶ voxels │
//! │  (buffers)     (empty shells)      (claims + prune)          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every vertex is claimed by at most one voxel (first intersecting voxel in
//! generation order wins), so a later per-voxel update pass can safely write
//! vertex buffers without overlap.

#![warn(missing_docs)]

pub mod assign;
pub mod grid;
pub mod submesh;
pub mod tree;
pub mod voxel;

pub use assign::{assign, AssignmentStats, ClaimMap};
pub use grid::{partition, GridConfig};
pub use submesh::{MeshArena, SubMesh, SubMeshId};
pub use tree::TreeConfig;
pub use voxel::{ClaimedPoint, Voxel};
