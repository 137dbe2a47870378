//! Per-tick voxel physics stepping.

use serde::{Deserialize, Serialize};
use tracing::trace;

use arborvox_core::{wind::ensure_finite, ClampPolicy, ConfigError, Vec3};
use arborvox_mesh::Voxel;

/// How wind response scales with a voxel's height tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum LevelScaling {
    /// Every tier feels the same force.
    #[default]
    Uniform,
    /// Force grows linearly with tier: `1 + level * per_level`.
    Linear {
        /// Extra force fraction per tier.
        per_level: f32,
    },
    /// Force proportional to tier: `level * per_level`. Tier 0 feels no
    /// wind at all, so the trunk base stays put without pinning.
    Proportional {
        /// Force fraction per tier.
        per_level: f32,
    },
}

impl LevelScaling {
    /// Force multiplier for a given tier.
    #[must_use]
    pub fn factor(&self, level: u32) -> f32 {
        match self {
            Self::Uniform => 1.0,
            Self::Linear { per_level } => 1.0 + level as f32 * per_level,
            Self::Proportional { per_level } => level as f32 * per_level,
        }
    }

    /// Proportional scaling tuned so treetops sway visibly while the trunk
    /// base stays still.
    #[must_use]
    pub fn swaying_tree() -> Self {
        Self::Proportional { per_level: 0.4 }
    }
}

/// Caller policy applied uniformly across voxels each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WindPolicy {
    /// Hold tier-0 voxels fixed, anchoring the mesh at the ground.
    pub pin_ground: bool,
    /// Height scaling of the wind force.
    pub scaling: LevelScaling,
}

/// Counters from one engine step across all voxels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Voxels whose oscillator advanced.
    pub stepped: usize,
    /// Voxels held fixed by the ground pin.
    pub pinned: usize,
    /// Voxels whose displacement clamp engaged this tick.
    pub clamped: usize,
}

/// Steps every voxel's damped spring under a shared wind force.
///
/// The engine is stateless apart from its clamp; all kinematic state lives
/// in the voxels, so stepping the same voxels with the same inputs is
/// reproducible.
#[derive(Clone, Copy, Debug, Default)]
pub struct VoxelEngine {
    clamp: ClampPolicy,
}

impl VoxelEngine {
    /// Create an engine with the given displacement clamp.
    #[must_use]
    pub fn new(clamp: ClampPolicy) -> Self {
        Self { clamp }
    }

    /// The displacement clamp shared by all voxels.
    #[must_use]
    pub fn clamp(&self) -> &ClampPolicy {
        &self.clamp
    }

    /// Advance every voxel one tick.
    ///
    /// The wind force is validated once up front; a non-finite force leaves
    /// all voxels untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFiniteWind`] when the force has a NaN or
    /// infinite component.
    pub fn step(
        &self,
        voxels: &mut [Voxel],
        wind_force: Vec3,
        dt: f32,
        policy: &WindPolicy,
    ) -> Result<StepStats, ConfigError> {
        ensure_finite(&wind_force)?;

        let mut stats = StepStats::default();
        for voxel in voxels.iter_mut() {
            if policy.pin_ground && voxel.level == 0 {
                stats.pinned += 1;
                continue;
            }

            let effective = wind_force * policy.scaling.factor(voxel.level);
            if voxel.step(effective, dt, &self.clamp) {
                stats.clamped += 1;
            }
            stats.stepped += 1;
        }

        trace!(
            stepped = stats.stepped,
            pinned = stats.pinned,
            clamped = stats.clamped,
            "engine step"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arborvox_core::{Aabb, SpringParams};

    fn column(levels: u32) -> Vec<Voxel> {
        (0..levels)
            .map(|level| {
                let origin = Vec3::new(0.0, level as f32, 0.0);
                let mut v = Voxel::new(Aabb::new(origin, Vec3::new(1.0, 1.0, 1.0)), level);
                v.set_spring(SpringParams::swaying_tree());
                v
            })
            .collect()
    }

    #[test]
    fn test_uniform_wind_moves_all_voxels() {
        let mut voxels = column(3);
        let engine = VoxelEngine::default();

        let stats = engine
            .step(
                &mut voxels,
                Vec3::new(2.0, 0.0, 0.0),
                0.1,
                &WindPolicy::default(),
            )
            .unwrap();

        assert_eq!(stats.stepped, 3);
        assert_eq!(stats.pinned, 0);
        for v in &voxels {
            assert!(v.displacement().x > 0.0);
        }
    }

    #[test]
    fn test_pin_ground_holds_level_zero() {
        let mut voxels = column(3);
        let policy = WindPolicy {
            pin_ground: true,
            ..WindPolicy::default()
        };
        let engine = VoxelEngine::default();

        let stats = engine
            .step(&mut voxels, Vec3::new(2.0, 0.0, 0.0), 0.1, &policy)
            .unwrap();

        assert_eq!(stats.pinned, 1);
        assert_eq!(stats.stepped, 2);
        assert!(voxels[0].displacement().norm() < 1e-6);
        assert!(voxels[1].displacement().x > 0.0);
    }

    #[test]
    fn test_linear_scaling_amplifies_with_height() {
        let mut voxels = column(3);
        let policy = WindPolicy {
            pin_ground: false,
            scaling: LevelScaling::Linear { per_level: 0.4 },
        };
        let engine = VoxelEngine::default();

        engine
            .step(&mut voxels, Vec3::new(1.0, 0.0, 0.0), 0.1, &policy)
            .unwrap();

        let d0 = voxels[0].displacement().x;
        let d1 = voxels[1].displacement().x;
        let d2 = voxels[2].displacement().x;
        assert!(d0 < d1 && d1 < d2);
        // One tick from rest displaces proportionally to the force.
        assert!((d1 / d0 - 1.4).abs() < 1e-3);
        assert!((d2 / d0 - 1.8).abs() < 1e-3);
    }

    #[test]
    fn test_proportional_scaling_stills_the_ground_tier() {
        let mut voxels = column(3);
        let policy = WindPolicy {
            pin_ground: false,
            scaling: LevelScaling::swaying_tree(),
        };
        let engine = VoxelEngine::default();

        engine
            .step(&mut voxels, Vec3::new(1.0, 0.0, 0.0), 0.1, &policy)
            .unwrap();

        // Tier 0 feels factor 0, tier 2 exactly twice tier 1.
        assert!(voxels[0].displacement().norm() < 1e-7);
        let d1 = voxels[1].displacement().x;
        let d2 = voxels[2].displacement().x;
        assert!(d1 > 0.0);
        assert!((d2 / d1 - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_non_finite_wind_rejected_atomically() {
        let mut voxels = column(2);
        let engine = VoxelEngine::default();

        let err = engine
            .step(
                &mut voxels,
                Vec3::new(f32::NAN, 0.0, 0.0),
                0.1,
                &WindPolicy::default(),
            )
            .unwrap_err();

        assert!(matches!(err, ConfigError::NonFiniteWind { .. }));
        for v in &voxels {
            assert!(v.displacement().norm() < 1e-6);
        }
    }

    #[test]
    fn test_clamp_counted() {
        let mut voxels = column(1);
        let engine = VoxelEngine::new(ClampPolicy::new(0.01).unwrap());

        let mut clamped = 0;
        for _ in 0..50 {
            let stats = engine
                .step(
                    &mut voxels,
                    Vec3::new(10.0, 0.0, 0.0),
                    0.1,
                    &WindPolicy::default(),
                )
                .unwrap();
            clamped += stats.clamped;
        }
        assert!(clamped > 0);
        assert!(voxels[0].displacement().norm() <= 0.01 + 1e-5);
    }

    #[test]
    fn test_level_scaling_factors() {
        assert!((LevelScaling::Uniform.factor(5) - 1.0).abs() < 1e-6);
        let linear = LevelScaling::Linear { per_level: 0.4 };
        assert!((linear.factor(0) - 1.0).abs() < 1e-6);
        assert!((linear.factor(2) - 1.8).abs() < 1e-6);
        let proportional = LevelScaling::swaying_tree();
        assert!(proportional.factor(0).abs() < 1e-6);
        assert!((proportional.factor(1) - 0.4).abs() < 1e-6);
        assert!((proportional.factor(2) - 0.8).abs() < 1e-6);
    }
}
