//! Arborvox Core - Voxel Wind Physics Primitives
//!
//! This crate provides the math and physics building blocks for animating a
//! static mesh under wind: axis-aligned boxes for spatial partitioning, a
//! time-varying wind forcing function, and a damped-spring oscillator that
//! drives per-voxel motion.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Per-tick data flow                     │
//! │                                                             │
//! │  ┌───────────┐      ┌──────────────────┐      ┌──────────┐  │
//! │  │ WindField │─────▶│ Oscillator::step │─────▶│ new voxel│  │
//! │  │ force_at  │      │ spring + clamp   │      │ center   │  │
//! │  └───────────┘      └──────────────────┘      └──────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Higher layers (grid partitioning, vertex assignment, mesh updates) live in
//! `arborvox-mesh` and `arborvox-engine`.

#![warn(missing_docs)]

pub mod bounds;
pub mod error;
pub mod spring;
pub mod wind;

pub use bounds::Aabb;
pub use error::ConfigError;
pub use spring::{ClampPolicy, Oscillator, SpringParams};
pub use wind::{Turbulence, WindField};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 3D vector type used throughout the workspace.
pub type Vec3 = nalgebra::Vector3<f32>;

/// Fraction of velocity retained when the displacement clamp engages.
///
/// Overridable per clamp via [`ClampPolicy::with_velocity_retention`].
pub const CLAMP_VELOCITY_RETENTION: f32 = 0.5;

/// Spring stiffness tuned for visible tree sway.
pub const DEFAULT_SPRING_STIFFNESS: f32 = 2.0;

/// Per-tick multiplicative velocity damping tuned for tree sway.
pub const DEFAULT_SPRING_DAMPING: f32 = 0.95;

/// Default radius of the displacement clamp.
pub const DEFAULT_MAX_DISPLACEMENT: f32 = 1.0;

/// Axis extents below this are treated as degenerate at partition time.
pub const MIN_AXIS_EXTENT: f32 = 1e-6;
