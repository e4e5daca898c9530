//! Character rig
//!
//! A `CharacterRig` owns the body parts of one character, its simulation
//! state and its quality controller. The host drives it once per frame with
//! `update` followed by `render`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::error::RigError;
use crate::presets::{CharacterKind, VisualConfig, VisualOverrides};
use crate::quality::QualityController;
use crate::renderer::{Facing, PartView, RenderAdapter};
use crate::settings::{PhysicsConfig, PhysicsOverrides, QualityLevel};
use crate::sim::{BodyPart, PartId, PartMask, SimState, StepStats, build_body_part};
use crate::{sanitize_dt, sanitize_vec};

/// Placement and density of one part
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartSpec {
    /// Rig-local center
    pub center: Vec2,
    pub base_radius: f32,
    pub particle_count: usize,
}

/// Which parts a rig carries and where, kept in draw order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RigLayout {
    entries: Vec<(PartId, PartSpec)>,
}

fn draw_index(id: PartId) -> usize {
    PartId::ALL
        .iter()
        .position(|p| *p == id)
        .unwrap_or(PartId::COUNT)
}

impl RigLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a part
    pub fn with(mut self, id: PartId, spec: PartSpec) -> Self {
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.push((id, spec));
        self.entries.sort_by_key(|(id, _)| draw_index(*id));
        self
    }

    /// Layout for a look at a quality level
    pub fn for_preset(visual: &VisualConfig, quality: QualityLevel) -> Self {
        PartMask::for_quality(quality)
            .iter()
            .fold(Self::new(), |layout, id| {
                let (center, base_radius) = visual.placement(id);
                layout.with(
                    id,
                    PartSpec {
                        center,
                        base_radius,
                        particle_count: id.particle_count(quality),
                    },
                )
            })
    }

    pub fn entries(&self) -> &[(PartId, PartSpec)] {
        &self.entries
    }

    pub fn mask(&self) -> PartMask {
        self.entries
            .iter()
            .fold(PartMask::EMPTY, |mask, (id, _)| mask.with(*id))
    }
}

fn build_parts(
    layout: &RigLayout,
    visual: &VisualConfig,
    damping: f32,
    rng: &mut Pcg32,
) -> Result<Vec<BodyPart>, RigError> {
    layout
        .entries()
        .iter()
        .map(|(id, spec)| {
            build_body_part(
                *id,
                spec.center,
                spec.base_radius,
                spec.particle_count,
                damping,
                rng,
            )
            .map(|part| part.with_style(visual.style(*id)))
        })
        .collect()
}

/// Configures and builds a `CharacterRig`
#[derive(Debug, Clone, Default)]
pub struct RigBuilder {
    kind: CharacterKind,
    physics: Option<PhysicsConfig>,
    physics_overrides: Option<PhysicsOverrides>,
    visual: Option<VisualConfig>,
    visual_overrides: Option<VisualOverrides>,
    seed: Option<u64>,
    layout: Option<RigLayout>,
    start_disabled: bool,
    target_fps: Option<f32>,
    auto_disable_threshold: Option<f32>,
}

impl RigBuilder {
    pub fn new(kind: CharacterKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Replace the preset physics entirely
    pub fn physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = Some(physics);
        self
    }

    /// Layer overrides over the preset (or the config set with `physics`)
    pub fn physics_overrides(mut self, overrides: PhysicsOverrides) -> Self {
        self.physics_overrides = Some(overrides);
        self
    }

    pub fn visual(mut self, visual: VisualConfig) -> Self {
        self.visual = Some(visual);
        self
    }

    pub fn visual_overrides(mut self, overrides: VisualOverrides) -> Self {
        self.visual_overrides = Some(overrides);
        self
    }

    /// Fix the placement jitter; unseeded rigs draw a random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Use a hand-made layout instead of the quality-derived one
    pub fn layout(mut self, layout: RigLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn start_disabled(mut self, disabled: bool) -> Self {
        self.start_disabled = disabled;
        self
    }

    pub fn target_fps(mut self, fps: f32) -> Self {
        self.target_fps = Some(fps);
        self
    }

    pub fn auto_disable_threshold(mut self, threshold: f32) -> Self {
        self.auto_disable_threshold = Some(threshold);
        self
    }

    pub fn build(self) -> Result<CharacterRig, RigError> {
        let base_physics = self.physics.unwrap_or_else(|| self.kind.physics());
        let physics = match &self.physics_overrides {
            Some(overrides) => overrides.apply(base_physics),
            None => base_physics,
        };
        physics.validate()?;

        let base_visual = self.visual.unwrap_or_else(|| self.kind.visual());
        let visual = match &self.visual_overrides {
            Some(overrides) => overrides.apply(base_visual)?,
            None => base_visual,
        };

        let seed = self.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);

        let layout = match &self.layout {
            Some(layout) => layout.clone(),
            None => RigLayout::for_preset(&visual, physics.quality),
        };
        let parts = build_parts(&layout, &visual, physics.particle_damping(), &mut rng)?;

        let mut controller = QualityController::new(physics.quality);
        if self.start_disabled {
            controller = controller.start_disabled();
        }
        if let Some(fps) = self.target_fps {
            controller = controller.with_target_fps(fps);
        }
        if let Some(threshold) = self.auto_disable_threshold {
            controller = controller.with_auto_disable_threshold(threshold);
        }

        let rig = CharacterRig {
            kind: self.kind,
            physics,
            visual,
            custom_layout: self.layout,
            mask: layout.mask(),
            parts,
            sim: SimState::new(),
            controller,
            rng,
            ready: true,
            last_stats: StepStats::default(),
        };
        log::info!(
            "Built {} rig: {} parts, {} particles, {} quality (seed {})",
            rig.kind.as_str(),
            rig.parts.len(),
            rig.particle_count(),
            rig.physics.quality.as_str(),
            seed
        );
        Ok(rig)
    }
}

/// One character's soft-body parts and everything that drives them
#[derive(Debug, Clone)]
pub struct CharacterRig {
    kind: CharacterKind,
    physics: PhysicsConfig,
    visual: VisualConfig,
    custom_layout: Option<RigLayout>,
    mask: PartMask,
    /// Draw order
    parts: Vec<BodyPart>,
    sim: SimState,
    controller: QualityController,
    rng: Pcg32,
    ready: bool,
    last_stats: StepStats,
}

impl CharacterRig {
    /// Build from a preset with optional host overrides
    pub fn create(
        kind: CharacterKind,
        physics: Option<&PhysicsOverrides>,
        visual: Option<&VisualOverrides>,
    ) -> Result<Self, RigError> {
        let mut builder = RigBuilder::new(kind);
        if let Some(overrides) = physics {
            builder = builder.physics_overrides(overrides.clone());
        }
        if let Some(overrides) = visual {
            builder = builder.visual_overrides(overrides.clone());
        }
        builder.build()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Advance one frame.
    ///
    /// `dt` is sanitized and capped; a zero `dt` or a disabled controller
    /// leaves the parts untouched. The raw delta still feeds the frame-rate
    /// monitor.
    pub fn update(&mut self, dt: f32, velocity: Vec2, position: Vec2) {
        if !self.ready {
            return;
        }
        let step_dt = sanitize_dt(dt);
        let velocity = sanitize_vec(velocity, Vec2::ZERO);
        let position = sanitize_vec(position, self.sim.last_position.unwrap_or(Vec2::ZERO));

        if self.controller.is_enabled() && step_dt > 0.0 {
            self.last_stats = self.sim.advance(
                &mut self.parts,
                step_dt,
                velocity,
                position,
                self.physics.quality.solver_iterations(),
                &self.physics,
            );
        }
        self.controller.record_frame_delta(dt);
    }

    /// Queue an impulse on `target`; ignored when that part is not present
    /// or the simulation is off.
    pub fn apply_impact(&mut self, force: Vec2, target: PartId) {
        if !self.ready || !self.controller.is_enabled() {
            return;
        }
        if !self.mask.contains(target) {
            log::debug!("Impact on absent part {} ignored", target.as_str());
            return;
        }
        self.sim.apply_impact(force, target);
    }

    /// Hand every part to `adapter`, anchored at (x, y)
    pub fn render<A: RenderAdapter + ?Sized>(&self, x: f32, y: f32, facing: Facing, adapter: &mut A) {
        if !self.ready {
            return;
        }
        let anchor = Vec2::new(x, y);
        if !anchor.is_finite() {
            log::warn!("Render skipped: non-finite anchor ({x}, {y})");
            return;
        }
        adapter.begin(anchor, facing);
        for part in &self.parts {
            adapter.draw_part(&PartView::new(part, anchor, facing));
        }
        adapter.finish();
    }

    /// Switch the simulation on or off; turning it on forgets old motion
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enable_physics();
        } else {
            self.disable_physics();
        }
    }

    pub fn enable_physics(&mut self) {
        self.controller.enable_physics();
        self.sim.reset_motion();
    }

    pub fn disable_physics(&mut self) {
        self.controller.disable_physics();
    }

    /// Record the level for the next `rebuild`
    pub fn set_quality(&mut self, quality: QualityLevel) {
        self.controller.set_quality(quality);
    }

    pub fn pending_quality(&self) -> QualityLevel {
        self.controller.pending_quality()
    }

    /// Quality the current parts were built at
    pub fn quality(&self) -> QualityLevel {
        self.physics.quality
    }

    /// Rebuild every part at the pending quality. Motion history and
    /// impacts are dropped; the clock and controller state are kept.
    pub fn rebuild(&mut self) -> Result<(), RigError> {
        if !self.ready {
            return Err(RigError::Disposed);
        }
        let quality = self.controller.pending_quality();
        let layout = match &self.custom_layout {
            Some(layout) => layout.clone(),
            None => RigLayout::for_preset(&self.visual, quality),
        };
        let parts = build_parts(
            &layout,
            &self.visual,
            self.physics.particle_damping(),
            &mut self.rng,
        )?;

        self.physics.quality = quality;
        self.parts = parts;
        self.mask = layout.mask();
        self.sim.reset_motion();
        self.last_stats = StepStats::default();
        log::info!(
            "Rebuilt {} rig at {} quality: {} particles",
            self.kind.as_str(),
            quality.as_str(),
            self.particle_count()
        );
        Ok(())
    }

    /// Release all particle and constraint storage. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if !self.ready {
            return;
        }
        for part in self.parts.iter_mut() {
            part.release();
        }
        self.parts = Vec::new();
        self.mask = PartMask::EMPTY;
        self.sim.reset_motion();
        self.ready = false;
        log::info!("Disposed {} rig", self.kind.as_str());
    }

    pub fn kind(&self) -> CharacterKind {
        self.kind
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    pub fn visual(&self) -> &VisualConfig {
        &self.visual
    }

    pub fn particle_count(&self) -> usize {
        self.parts.iter().map(BodyPart::particle_count).sum()
    }

    pub fn constraint_count(&self) -> usize {
        self.parts.iter().map(BodyPart::constraint_count).sum()
    }

    pub fn parts(&self) -> &[BodyPart] {
        &self.parts
    }

    pub fn part(&self, id: PartId) -> Option<&BodyPart> {
        self.parts.iter().find(|p| p.id == id)
    }

    pub fn mask(&self) -> PartMask {
        self.mask
    }

    pub fn controller(&self) -> &QualityController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut QualityController {
        &mut self.controller
    }

    /// Impacts still in flight
    pub fn active_impacts(&self) -> usize {
        self.sim.impacts.len()
    }

    /// Simulated seconds
    pub fn elapsed(&self) -> f32 {
        self.sim.elapsed
    }

    pub fn last_stats(&self) -> StepStats {
        self.last_stats
    }
}
