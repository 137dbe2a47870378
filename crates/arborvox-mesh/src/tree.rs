//! Deterministic procedural voxel tree.
//!
//! Builds a trunk-and-canopy tree out of cube sub-meshes, used as the
//! standard test and demo scene. The canopy is randomized but seeded, so
//! two runs with the same config produce identical geometry.

use arborvox_core::Vec3;

use crate::submesh::{MeshArena, SubMesh};

/// Parameters for the procedural tree.
#[derive(Clone, Copy, Debug)]
pub struct TreeConfig {
    /// Total trunk height.
    pub height: f32,
    /// Canopy width; also sets the cube size (width / 5).
    pub width: f32,
    /// RNG seed for the canopy layout.
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            height: 5.0,
            width: 2.0,
            seed: 42,
        }
    }
}

impl TreeConfig {
    /// Edge length of the cubes making up the tree.
    #[must_use]
    pub fn cube_size(&self) -> f32 {
        self.width / 5.0
    }
}

/// Generate a tree rooted at `base` into a fresh arena.
///
/// A column of trunk cubes rises to `height`; four canopy levels of leaf
/// cubes sit around the top, each placed with ~70% probability and a small
/// vertical jitter.
#[must_use]
pub fn generate(base: Vec3, config: &TreeConfig) -> MeshArena {
    let mut rng = fastrand::Rng::with_seed(config.seed);
    let mut arena = MeshArena::new();

    let cube = config.cube_size();
    let trunk_cubes = (config.height / cube) as i32;
    let leaf_radius = (config.width / cube) as i32;

    for y in 0..trunk_cubes {
        let center = base + Vec3::new(0.0, y as f32 * cube, 0.0);
        arena.insert(cube_submesh(center, cube));
    }

    let leaf_levels = 4;
    for level in 0..leaf_levels {
        let y = base.y + (trunk_cubes - leaf_levels + level) as f32 * cube;
        let radius = leaf_radius - level / 2;

        for x in -radius..=radius {
            for z in -radius..=radius {
                let dist = libm::sqrtf((x * x + z * z) as f32);
                if dist > radius as f32 {
                    continue;
                }
                // Thin the canopy and jitter heights for a natural look;
                // draws happen in a fixed order so the layout is seeded.
                let keep = rng.f32() > 0.3;
                let jitter = (rng.f32() - 0.5) * cube;
                if keep {
                    let center = Vec3::new(
                        base.x + x as f32 * cube,
                        y + jitter,
                        base.z + z as f32 * cube,
                    );
                    arena.insert(cube_submesh(center, cube));
                }
            }
        }
    }

    arena
}

/// Axis-aligned cube sub-mesh: 8 vertices, 12 triangles.
#[must_use]
pub fn cube_submesh(center: Vec3, size: f32) -> SubMesh {
    let s = size * 0.5;
    let positions = vec![
        center + Vec3::new(-s, -s, -s),
        center + Vec3::new(s, -s, -s),
        center + Vec3::new(s, s, -s),
        center + Vec3::new(-s, s, -s),
        center + Vec3::new(-s, -s, s),
        center + Vec3::new(s, -s, s),
        center + Vec3::new(s, s, s),
        center + Vec3::new(-s, s, s),
    ];
    #[rustfmt::skip]
    let triangles = vec![
        0, 1, 2, 0, 2, 3, // front
        1, 5, 6, 1, 6, 2, // right
        5, 4, 7, 5, 7, 6, // back
        4, 0, 3, 4, 3, 7, // left
        3, 2, 6, 3, 6, 7, // top
        4, 5, 1, 4, 1, 0, // bottom
    ];
    SubMesh::new(positions, triangles)
}
