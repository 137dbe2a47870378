//! Damped-spring oscillator driving per-voxel motion.
//!
//! The integration scheme is a discrete per-tick update: damping is a
//! multiplicative decay applied every tick and is *not* frame-rate
//! normalized. Correctness therefore depends on calling [`Oscillator::step`]
//! with a fixed `dt`; varying `dt` changes the effective damping and
//! response characteristics.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{
    Vec3, CLAMP_VELOCITY_RETENTION, DEFAULT_MAX_DISPLACEMENT, DEFAULT_SPRING_DAMPING,
    DEFAULT_SPRING_STIFFNESS,
};

/// Validated per-voxel spring parameters.
///
/// Stiffness 0 (free drift, bounded only by the clamp) is a legal state.
/// Negative values are rejected at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpringParams {
    stiffness: f32,
    damping: f32,
}

impl SpringParams {
    /// Create spring parameters, rejecting negative values.
    pub fn new(stiffness: f32, damping: f32) -> Result<Self, ConfigError> {
        if !(stiffness >= 0.0) {
            return Err(ConfigError::NegativeStiffness(stiffness));
        }
        if !(damping >= 0.0) {
            return Err(ConfigError::NegativeDamping(damping));
        }
        Ok(Self { stiffness, damping })
    }

    /// Parameters tuned for visible tree sway.
    #[must_use]
    pub const fn swaying_tree() -> Self {
        Self {
            stiffness: DEFAULT_SPRING_STIFFNESS,
            damping: DEFAULT_SPRING_DAMPING,
        }
    }

    /// Restoring-force coefficient.
    #[must_use]
    pub fn stiffness(&self) -> f32 {
        self.stiffness
    }

    /// Per-tick multiplicative velocity decay.
    #[must_use]
    pub fn damping(&self) -> f32 {
        self.damping
    }
}

/// Displacement clamp applied after each integration step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClampPolicy {
    max_displacement: f32,
    velocity_retention: f32,
}

impl ClampPolicy {
    /// Create a clamp with the given radius, rejecting non-positive values.
    pub fn new(max_displacement: f32) -> Result<Self, ConfigError> {
        if !(max_displacement > 0.0) || !max_displacement.is_finite() {
            return Err(ConfigError::InvalidMaxDisplacement(max_displacement));
        }
        Ok(Self {
            max_displacement,
            velocity_retention: CLAMP_VELOCITY_RETENTION,
        })
    }

    /// Override the velocity fraction retained when the clamp engages.
    #[must_use]
    pub fn with_velocity_retention(mut self, retention: f32) -> Self {
        self.velocity_retention = retention.clamp(0.0, 1.0);
        self
    }

    /// Clamp radius.
    #[must_use]
    pub fn max_displacement(&self) -> f32 {
        self.max_displacement
    }

    /// Velocity fraction retained on clamp.
    #[must_use]
    pub fn velocity_retention(&self) -> f32 {
        self.velocity_retention
    }
}

impl Default for ClampPolicy {
    fn default() -> Self {
        Self {
            max_displacement: DEFAULT_MAX_DISPLACEMENT,
            velocity_retention: CLAMP_VELOCITY_RETENTION,
        }
    }
}

/// Kinematic state of one voxel: rest anchor, current center, velocity.
///
/// All displacement is measured against the rest anchor captured at
/// construction, never against the previous tick, so rounding error cannot
/// accumulate into drift.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Oscillator {
    rest: Vec3,
    center: Vec3,
    velocity: Vec3,
}

impl Oscillator {
    /// Create an oscillator at rest.
    #[must_use]
    pub fn new(rest: Vec3) -> Self {
        Self {
            rest,
            center: rest,
            velocity: Vec3::zeros(),
        }
    }

    /// Rest-pose anchor (immutable).
    #[must_use]
    pub fn rest(&self) -> Vec3 {
        self.rest
    }

    /// Current center.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Net displacement from the rest pose.
    #[must_use]
    pub fn displacement(&self) -> Vec3 {
        self.center - self.rest
    }

    /// Advance one tick under the given forcing.
    ///
    /// Returns `true` when the displacement clamp engaged; the clamp bleeds
    /// off velocity by the policy's retention factor, an irreversible energy
    /// loss that keeps the oscillation bounded.
    pub fn step(&mut self, force: Vec3, dt: f32, spring: &SpringParams, clamp: &ClampPolicy) -> bool {
        let displacement = self.center - self.rest;
        let spring_force = -displacement * spring.stiffness();

        self.velocity = (self.velocity + (spring_force + force) * dt) * spring.damping();

        let mut candidate = self.center + self.velocity * dt;
        let mut engaged = false;

        let total = candidate - self.rest;
        let limit = clamp.max_displacement();
        let magnitude = total.norm();
        if magnitude > limit {
            candidate = self.rest + total * (limit / magnitude);
            self.velocity *= clamp.velocity_retention();
            engaged = true;
        }

        self.center = candidate;
        engaged
    }
}
