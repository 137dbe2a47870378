//! Voxel grid partitioning.
//!
//! Splits a mesh's bounding volume into a 3D grid of axis-aligned cells,
//! sized toward a target total count with an aspect-ratio-aware heuristic.

use serde::{Deserialize, Serialize};

use arborvox_core::{Aabb, ConfigError, Vec3, MIN_AXIS_EXTENT};

use crate::voxel::Voxel;

/// Grid construction parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Approximate total number of voxels to aim for. The per-axis heuristic
    /// may overshoot this for elongated boxes; that is expected, not an
    /// error.
    pub target_count: usize,
    /// Optional expansion factor applied about the box center before
    /// partitioning (e.g. 1.2), so boundary vertices do not fall just
    /// outside the grid.
    pub margin: Option<f32>,
}

impl GridConfig {
    /// Create a config targeting roughly `target_count` voxels, no margin.
    #[must_use]
    pub fn new(target_count: usize) -> Self {
        Self {
            target_count,
            margin: None,
        }
    }

    /// Expand the bounding box by `factor` about its center first.
    #[must_use]
    pub fn with_margin(mut self, factor: f32) -> Self {
        self.margin = Some(factor);
        self
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Partition `bounds` into an ordered list of empty voxel shells.
///
/// Per-axis counts follow `ceil(cbrt(target) * size_axis / min_axis)`, so
/// the grid always covers the full box. Each voxel's `level` is its Y grid
/// index. Generation order is X-outer, Y-middle, Z-inner and is fixed: it
/// determines first-wins assignment later.
///
/// # Errors
///
/// Rejects a zero target count and any box with a degenerate (≈0) axis,
/// which would otherwise divide into NaN cell sizes.
pub fn partition(bounds: &Aabb, config: &GridConfig) -> Result<Vec<Voxel>, ConfigError> {
    if config.target_count == 0 {
        return Err(ConfigError::ZeroTargetCount);
    }

    let bounds = match config.margin {
        Some(factor) => bounds.expanded(factor),
        None => *bounds,
    };

    let size = bounds.size;
    for (axis, extent) in [('x', size.x), ('y', size.y), ('z', size.z)] {
        if !extent.is_finite() || extent < MIN_AXIS_EXTENT {
            return Err(ConfigError::DegenerateBounds { axis, size: extent });
        }
    }

    let min_extent = size.x.min(size.y).min(size.z);
    let root = libm::cbrtf(config.target_count as f32);
    let count = |extent: f32| libm::ceilf(root * extent / min_extent).max(1.0) as usize;

    let nx = count(size.x);
    let ny = count(size.y);
    let nz = count(size.z);
    let cell = Vec3::new(
        size.x / nx as f32,
        size.y / ny as f32,
        size.z / nz as f32,
    );

    let mut voxels = Vec::with_capacity(nx * ny * nz);
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                let origin = bounds.origin
                    + Vec3::new(
                        x as f32 * cell.x,
                        y as f32 * cell.y,
                        z as f32 * cell.z,
                    );
                voxels.push(Voxel::new(Aabb::new(origin, cell), y as u32));
            }
        }
    }

    Ok(voxels)
}
