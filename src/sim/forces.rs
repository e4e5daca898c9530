//! Per-particle force model
//!
//! Terms are summed in a fixed order: gravity bias, periodic jiggle,
//! movement reaction, impacts. The total is then scaled by particle damping.

use glam::Vec2;

use super::body::BodyPart;
use super::impact::{ImpactQueue, impact_contribution};
use crate::consts::*;
use crate::settings::PhysicsConfig;

/// Idle "breathing" oscillation at time `t`: sine on x, cosine on y, both
/// scaled by `JIGGLE_SCALE`
#[inline]
pub fn jiggle_acceleration(config: &PhysicsConfig, t: f32) -> Vec2 {
    let phase = std::f32::consts::TAU * config.jiggle_frequency * t;
    let amplitude = config.jiggle_amplitude * JIGGLE_SCALE;
    Vec2::new(amplitude * phase.sin(), amplitude * phase.cos())
}

/// Difference between the velocity the character reported last frame and the
/// velocity implied by how far it actually moved this frame
#[inline]
pub fn movement_jerk(last_velocity: Vec2, position_delta: Vec2, dt: f32) -> Vec2 {
    if dt <= 0.0 {
        return Vec2::ZERO;
    }
    position_delta / dt - last_velocity
}

/// Inertial lag opposite the jerk; zero inside the deadzone
#[inline]
pub fn movement_reaction(jerk: Vec2, config: &PhysicsConfig) -> Vec2 {
    if !jerk.is_finite() || jerk.length() <= MOVEMENT_DEADZONE {
        return Vec2::ZERO;
    }
    -jerk * (config.movement_sensitivity * MOVEMENT_SCALE)
}

/// Overwrite every particle's acceleration for this step
pub fn compute_accelerations(
    parts: &mut [BodyPart],
    impacts: &ImpactQueue,
    jerk: Vec2,
    elapsed: f32,
    config: &PhysicsConfig,
) {
    let shared = GRAVITY_BIAS + jiggle_acceleration(config, elapsed) + movement_reaction(jerk, config);

    for part in parts.iter_mut() {
        let epicenter = part.center;
        let id = part.id;
        for particle in part.particles.iter_mut() {
            if particle.fixed {
                particle.acceleration = Vec2::ZERO;
                continue;
            }
            let mut acceleration = shared;
            for impact in impacts.targeting(id) {
                acceleration += impact_contribution(
                    impact,
                    particle.position,
                    epicenter,
                    config.impact_multiplier,
                );
            }
            particle.acceleration = acceleration * particle.damping;
        }
    }
}
