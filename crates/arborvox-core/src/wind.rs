//! Time-varying wind forcing.
//!
//! A [`WindField`] produces a force vector as a function of simulation time.
//! Strength and direction may be mutated by UI code at arbitrary points
//! between ticks; the engine snapshots the force once at tick start, so no
//! synchronization beyond that snapshot is required.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::Vec3;

/// Turbulence level (0.0 = laminar, 1.0 = chaotic).
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Turbulence(f32);

impl Turbulence {
    /// Create a new turbulence value, clamping to [0.0, 1.0].
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Laminar flow (no turbulence).
    #[must_use]
    pub const fn laminar() -> Self {
        Self(0.0)
    }

    /// Moderate turbulence.
    #[must_use]
    pub const fn moderate() -> Self {
        Self(0.5)
    }

    /// Get the raw value.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.0
    }

    /// Apply turbulence variation to a force vector.
    ///
    /// Uses deterministic sinusoidal pseudo-noise, bounded to 30% variation
    /// at full turbulence, so trajectories stay reproducible per time value.
    #[must_use]
    pub fn apply(&self, force: &Vec3, time_s: f32) -> Vec3 {
        if self.0 < 0.01 {
            return *force;
        }

        let phase = time_s * 10.0;
        let noise_x = libm::sinf(phase * 1.1) * libm::cosf(phase * 0.7);
        let noise_y = libm::sinf(phase * 0.9) * libm::cosf(phase * 1.3);
        let noise_z = libm::sinf(phase * 1.2) * libm::cosf(phase * 0.8);

        let variation = self.0 * 0.3;
        Vec3::new(
            force.x * (1.0 + noise_x * variation),
            force.y * (1.0 + noise_y * variation),
            force.z * (1.0 + noise_z * variation),
        )
    }
}

/// Wind forcing function: normalized direction times strength.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct WindField {
    direction: Vec3,
    strength: f32,
    turbulence: Turbulence,
}

impl WindField {
    /// Create a wind field blowing along `direction` with the given strength.
    ///
    /// The direction is normalized on the way in; a near-zero direction
    /// yields still air regardless of strength.
    #[must_use]
    pub fn new(direction: Vec3, strength: f32) -> Self {
        Self {
            direction: normalize_or_zero(direction),
            strength,
            turbulence: Turbulence::laminar(),
        }
    }

    /// Still air (zero force at all times).
    #[must_use]
    pub fn still() -> Self {
        Self::new(Vec3::zeros(), 0.0)
    }

    /// Set the turbulence level.
    #[must_use]
    pub fn with_turbulence(mut self, turbulence: Turbulence) -> Self {
        self.turbulence = turbulence;
        self
    }

    /// Current normalized direction.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Current strength scalar.
    #[must_use]
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Current turbulence level.
    #[must_use]
    pub fn turbulence(&self) -> Turbulence {
        self.turbulence
    }

    /// Point the wind along a new direction (normalized on the way in).
    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = normalize_or_zero(direction);
    }

    /// Change the wind strength.
    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength;
    }

    /// Change the turbulence level.
    pub fn set_turbulence(&mut self, turbulence: Turbulence) {
        self.turbulence = turbulence;
    }

    /// Wind force at the given simulation time.
    #[must_use]
    pub fn force_at(&self, time_s: f32) -> Vec3 {
        self.turbulence
            .apply(&(self.direction * self.strength), time_s)
    }

    /// Check if this is effectively still air.
    #[must_use]
    pub fn is_still(&self) -> bool {
        self.strength.abs() < 1e-6 || self.direction.norm() < 1e-6
    }
}

impl Default for WindField {
    fn default() -> Self {
        Self::still()
    }
}

/// Reject non-finite forces before they can corrupt voxel state.
pub fn ensure_finite(force: &Vec3) -> Result<(), ConfigError> {
    if force.x.is_finite() && force.y.is_finite() && force.z.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteWind {
            x: force.x,
            y: force.y,
            z: force.z,
        })
    }
}

fn normalize_or_zero(v: Vec3) -> Vec3 {
    let mag = v.norm();
    if mag > 1e-8 {
        v / mag
    } else {
        Vec3::zeros()
    }
}
