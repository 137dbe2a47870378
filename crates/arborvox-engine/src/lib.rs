//! Arborvox Engine - Per-Tick Simulation
//!
//! Drives the voxel wind animation: every tick the wind force is snapshotted,
//! each voxel's oscillator advances one step, and the resulting displacements
//! are propagated into the mesh vertex buffers and the debug wireframes.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                       Simulation::tick                         │
//! │                                                                │
//! │  WindField ──▶ VoxelEngine::step ──▶ UpdateStrategy::apply     │
//! │  (snapshot)    (per-voxel spring)    (vertex buffers)          │
//! │                        │                                       │
//! │                        └───────────▶ WireframeSet::retransform │
//! └────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod engine;
pub mod sim;
pub mod update;
pub mod wireframe;

pub use engine::{LevelScaling, StepStats, VoxelEngine, WindPolicy};
pub use sim::{SimConfig, Simulation, TickReport};
pub use update::{PerVertex, RigidModel, UpdateStrategy};
pub use wireframe::{WireframeBox, WireframeSet};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
