//! Simulation driver: scene setup plus the fixed-step tick loop.

use std::time::Duration;

use tracing::{debug, info};

use arborvox_core::{ClampPolicy, ConfigError, SpringParams, Vec3, WindField};
use arborvox_mesh::{assign, partition, AssignmentStats, ClaimMap, GridConfig, MeshArena, Voxel};

use crate::engine::{StepStats, VoxelEngine, WindPolicy};
use crate::update::{RigidModel, UpdateStrategy};
use crate::wireframe::WireframeSet;

/// Scene construction and tick parameters.
#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    /// Voxel grid parameters.
    pub grid: GridConfig,
    /// Spring applied to every voxel.
    pub spring: SpringParams,
    /// Optional per-tier spring override. When set, each voxel gets
    /// `spring_for_level(level)` instead of the shared `spring`, so
    /// stiffness can vary by height while the wind stays uniform.
    pub spring_for_level: Option<fn(u32) -> SpringParams>,
    /// Displacement clamp shared by all voxels.
    pub clamp: ClampPolicy,
    /// Ground pinning and height scaling.
    pub policy: WindPolicy,
    /// Fixed tick period. The integrator is not frame-rate normalized, so
    /// this must stay constant for a session.
    pub tick_period: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            spring: SpringParams::swaying_tree(),
            spring_for_level: None,
            clamp: ClampPolicy::default(),
            policy: WindPolicy::default(),
            tick_period: Duration::from_millis(100),
        }
    }
}

/// Outcome of one tick.
#[derive(Clone, Copy, Debug)]
pub struct TickReport {
    /// Wind force snapshotted at tick start.
    pub force: Vec3,
    /// Per-voxel stepping counters.
    pub stats: StepStats,
}

/// A running wind-animation scene.
///
/// Owns the mesh arena, the pruned voxel list with its claim map, the wind
/// field and the debug wireframes. Voxelization happens once in [`new`];
/// after that only [`tick`] mutates state.
///
/// [`new`]: Simulation::new
/// [`tick`]: Simulation::tick
pub struct Simulation {
    arena: MeshArena,
    voxels: Vec<Voxel>,
    claims: ClaimMap,
    assignment: AssignmentStats,
    wind: WindField,
    engine: VoxelEngine,
    policy: WindPolicy,
    strategy: Box<dyn UpdateStrategy + Send>,
    wireframes: WireframeSet,
    dt: f32,
    elapsed: f32,
    ticks: u64,
    running: bool,
    solid_visible: bool,
}

impl Simulation {
    /// Voxelize `arena` and build a ready-to-tick scene.
    ///
    /// An empty arena yields a valid scene with zero voxels; ticking it is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Fails when the grid config is invalid or the arena's bounding box has
    /// a degenerate axis.
    pub fn new(arena: MeshArena, config: SimConfig) -> Result<Self, ConfigError> {
        let mut voxels = match arena.bounds() {
            Some(bounds) => partition(&bounds, &config.grid)?,
            None => Vec::new(),
        };

        let (claims, assignment) = assign(&mut voxels, &arena);
        for voxel in &mut voxels {
            let spring = match config.spring_for_level {
                Some(for_level) => for_level(voxel.level),
                None => config.spring,
            };
            voxel.set_spring(spring);
        }
        let wireframes = WireframeSet::generate(&voxels);

        info!(
            submeshes = arena.len(),
            vertices = arena.vertex_count(),
            voxels = voxels.len(),
            pruned = assignment.pruned_voxels,
            claimed = assignment.claimed_vertices,
            "scene voxelized"
        );

        Ok(Self {
            arena,
            voxels,
            claims,
            assignment,
            wind: WindField::still(),
            engine: VoxelEngine::new(config.clamp),
            policy: config.policy,
            strategy: Box::new(RigidModel),
            wireframes,
            dt: config.tick_period.as_secs_f32(),
            elapsed: 0.0,
            ticks: 0,
            running: false,
            solid_visible: true,
        })
    }

    /// Advance the scene one fixed tick.
    ///
    /// The wind force is snapshotted once at tick start, then every voxel
    /// steps, the update strategy rewrites vertex buffers, and wireframes
    /// follow the new displacements.
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigError::NonFiniteWind`]; voxel state is untouched
    /// in that case.
    pub fn tick(&mut self) -> Result<TickReport, ConfigError> {
        let force = self.wind.force_at(self.elapsed);
        let stats = self
            .engine
            .step(&mut self.voxels, force, self.dt, &self.policy)?;

        self.strategy.apply(&self.voxels, &mut self.arena);
        self.wireframes.retransform(&self.voxels);

        self.elapsed += self.dt;
        self.ticks += 1;
        debug!(tick = self.ticks, ?force, clamped = stats.clamped, "tick");

        Ok(TickReport { force, stats })
    }

    /// Run `count` ticks back to back, returning the last report.
    ///
    /// # Errors
    ///
    /// Stops at the first failing tick.
    pub fn run(&mut self, count: u64) -> Result<Option<TickReport>, ConfigError> {
        let mut last = None;
        for _ in 0..count {
            last = Some(self.tick()?);
        }
        Ok(last)
    }

    /// Mark the scene as running.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Mark the scene as stopped. State is kept; ticking may resume.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the scene is marked running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Replace the vertex update strategy.
    pub fn set_strategy(&mut self, strategy: Box<dyn UpdateStrategy + Send>) {
        self.strategy = strategy;
    }

    /// The mesh arena with live vertex buffers.
    #[must_use]
    pub fn arena(&self) -> &MeshArena {
        &self.arena
    }

    /// The pruned voxel list.
    #[must_use]
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Vertex ownership map over [`Self::voxels`].
    #[must_use]
    pub fn claims(&self) -> &ClaimMap {
        &self.claims
    }

    /// Counters from the one-time assignment pass.
    #[must_use]
    pub fn assignment(&self) -> &AssignmentStats {
        &self.assignment
    }

    /// The wind field.
    #[must_use]
    pub fn wind(&self) -> &WindField {
        &self.wind
    }

    /// Mutable wind field, for steering between ticks.
    pub fn wind_mut(&mut self) -> &mut WindField {
        &mut self.wind
    }

    /// Debug wireframes, index-aligned with [`Self::voxels`].
    #[must_use]
    pub fn wireframes(&self) -> &WireframeSet {
        &self.wireframes
    }

    /// Mutable wireframes, for visibility toggling.
    pub fn wireframes_mut(&mut self) -> &mut WireframeSet {
        &mut self.wireframes
    }

    /// Whether the solid mesh layer should be drawn. Independent of the
    /// wireframe toggle; vertex buffers stay current either way.
    #[must_use]
    pub fn solid_visible(&self) -> bool {
        self.solid_visible
    }

    /// Show or hide the solid mesh layer.
    pub fn set_solid_visible(&mut self, visible: bool) {
        self.solid_visible = visible;
    }

    /// Ticks executed so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulation time in seconds.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Largest voxel displacement magnitude in the scene.
    #[must_use]
    pub fn max_displacement(&self) -> f32 {
        self.voxels
            .iter()
            .map(|v| v.displacement().norm())
            .fold(0.0, f32::max)
    }
}
