//! Per-rig simulation state
//!
//! Everything that persists between frames for one character lives here,
//! owned by the rig and passed by reference into the step functions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{BodyPart, PartId};
use super::forces::{compute_accelerations, movement_jerk};
use super::impact::ImpactQueue;
use super::solver::{self, StepStats};
use crate::settings::PhysicsConfig;

/// Clock, character motion history and queued impacts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimState {
    /// Simulated seconds since construction
    pub elapsed: f32,
    /// Character velocity reported last frame
    pub last_velocity: Vec2,
    /// Character position reported last frame (none before the first step)
    pub last_position: Option<Vec2>,
    pub impacts: ImpactQueue,
    /// Steps taken
    pub steps: u64,
}

impl SimState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_impact(&mut self, force: Vec2, target: PartId) {
        self.impacts.apply_impact(force, target);
    }

    /// One frame: forces, impact aging, integration, relaxation.
    ///
    /// `dt` must already be sanitized and positive.
    pub fn advance(
        &mut self,
        parts: &mut [BodyPart],
        dt: f32,
        velocity: Vec2,
        position: Vec2,
        iterations: usize,
        config: &PhysicsConfig,
    ) -> StepStats {
        self.elapsed += dt;
        self.steps += 1;

        let jerk = match self.last_position {
            Some(last) => movement_jerk(self.last_velocity, position - last, dt),
            None => Vec2::ZERO,
        };

        compute_accelerations(parts, &self.impacts, jerk, self.elapsed, config);
        self.impacts.tick(dt);
        let stats = solver::step(parts, dt, iterations);

        self.last_velocity = velocity;
        self.last_position = Some(position);
        stats
    }

    /// Forget motion history and impacts, keep the clock
    pub fn reset_motion(&mut self) {
        self.last_velocity = Vec2::ZERO;
        self.last_position = None;
        self.impacts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::build_body_part;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn chest() -> BodyPart {
        let mut rng = Pcg32::seed_from_u64(7);
        build_body_part(PartId::Chest, Vec2::new(0.0, 25.0), 12.0, 6, 0.85, &mut rng).unwrap()
    }

    #[test]
    fn test_first_step_has_no_movement_reaction() {
        let config = PhysicsConfig {
            jiggle_amplitude: 0.0,
            damping: 1.0,
            ..Default::default()
        };
        let mut parts = [chest()];
        let mut state = SimState::new();
        // A far-away first position must not read as a huge jump
        state.advance(&mut parts, 0.016, Vec2::ZERO, Vec2::new(500.0, 500.0), 3, &config);
        for p in &parts[0].particles {
            assert!(p.acceleration.length() <= crate::consts::GRAVITY_BIAS.length() + 1e-6);
        }
        assert_eq!(state.last_position, Some(Vec2::new(500.0, 500.0)));
    }

    #[test]
    fn test_sudden_stop_pushes_parts_forward() {
        let config = PhysicsConfig {
            jiggle_amplitude: 0.0,
            damping: 1.0,
            ..Default::default()
        };
        let mut parts = [chest()];
        let mut state = SimState::new();
        let v = Vec2::new(200.0, 0.0);
        state.advance(&mut parts, 0.016, v, Vec2::ZERO, 3, &config);
        // Reported velocity says "moving right" but the character did not move
        state.advance(&mut parts, 0.016, Vec2::ZERO, Vec2::ZERO, 3, &config);
        assert!(parts[0].particles.iter().all(|p| p.acceleration.x > 0.0));
    }

    #[test]
    fn test_impacts_age_with_steps() {
        let config = PhysicsConfig::default();
        let mut parts = [chest()];
        let mut state = SimState::new();
        state.apply_impact(Vec2::new(30.0, 0.0), PartId::Chest);

        let mut elapsed = 0.0;
        while elapsed < 0.25 {
            state.advance(&mut parts, 0.016, Vec2::ZERO, Vec2::ZERO, 3, &config);
            elapsed += 0.016;
        }
        assert!(state.impacts.is_empty());
        assert!(state.steps > 0);
    }

    #[test]
    fn test_reset_motion_keeps_clock() {
        let config = PhysicsConfig::default();
        let mut parts = [chest()];
        let mut state = SimState::new();
        state.apply_impact(Vec2::X, PartId::Chest);
        state.advance(&mut parts, 0.016, Vec2::X, Vec2::ONE, 3, &config);
        state.reset_motion();
        assert!(state.impacts.is_empty());
        assert_eq!(state.last_position, None);
        assert!(state.elapsed > 0.0);
    }
}
