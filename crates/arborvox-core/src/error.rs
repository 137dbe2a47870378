//! Configuration and forcing validation errors.

use thiserror::Error;

/// Errors raised when configuring the grid, spring parameters, or forcing.
///
/// Each variant is a caller error: the engine rejects bad input up front
/// rather than letting NaN or infinity reach voxel state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A bounding box axis is too small to subdivide.
    #[error("bounding box axis {axis} has degenerate extent {size}")]
    DegenerateBounds {
        /// Axis name (`x`, `y`, or `z`).
        axis: char,
        /// The offending extent.
        size: f32,
    },

    /// The grid was asked for zero voxels.
    #[error("target voxel count must be >= 1")]
    ZeroTargetCount,

    /// Spring stiffness must be non-negative.
    #[error("spring stiffness must be >= 0, got {0}")]
    NegativeStiffness(f32),

    /// Spring damping must be non-negative.
    #[error("spring damping must be >= 0, got {0}")]
    NegativeDamping(f32),

    /// Displacement clamp radius must be positive and finite.
    #[error("max displacement must be > 0 and finite, got {0}")]
    InvalidMaxDisplacement(f32),

    /// A wind force contained a NaN or infinite component.
    #[error("wind force is not finite: ({x}, {y}, {z})")]
    NonFiniteWind {
        /// X component of the rejected force.
        x: f32,
        /// Y component of the rejected force.
        y: f32,
        /// Z component of the rejected force.
        z: f32,
    },
}
