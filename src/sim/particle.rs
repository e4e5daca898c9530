//! Point masses and distance constraints

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A Verlet point mass. Velocity is implicit in `position - previous_position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    pub previous_position: Vec2,
    /// Reported velocity, recomputed after each integration
    pub velocity: Vec2,
    /// Working acceleration, rebuilt by the force model every step
    pub acceleration: Vec2,
    pub mass: f32,
    /// Visual size only
    pub radius: f32,
    /// Fixed particles never move
    pub fixed: bool,
    /// Factor in (0, 1] applied to the accumulated acceleration
    pub damping: f32,
}

impl Particle {
    pub fn new(position: Vec2, radius: f32, damping: f32) -> Self {
        Self {
            position,
            previous_position: position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass: 1.0,
            radius,
            fixed: false,
            damping,
        }
    }

    /// Verlet step; `prev` takes the pre-update position
    pub fn integrate(&mut self, dt: f32) {
        if self.fixed {
            return;
        }
        let next = 2.0 * self.position - self.previous_position + self.acceleration * (dt * dt);
        self.previous_position = self.position;
        self.position = next;
        self.velocity = if dt > 0.0 {
            (self.position - self.previous_position) / dt
        } else {
            Vec2::ZERO
        };
    }
}

/// Distance constraint between two particles of the same body part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub a: usize,
    pub b: usize,
    /// Captured at creation, never changed by the solver
    pub rest_length: f32,
    /// Fraction of the correction applied per pass, in (0, 1]
    pub stiffness: f32,
    /// Informational; mirrors particle damping
    pub damping: f32,
}

impl Constraint {
    pub fn new(a: usize, b: usize, rest_length: f32, stiffness: f32, damping: f32) -> Self {
        Self {
            a,
            b,
            rest_length,
            stiffness,
            damping,
        }
    }

    /// One relaxation pass. Returns false when the pair coincides and the
    /// correction was skipped.
    pub fn relax(&self, particles: &mut [Particle]) -> bool {
        let (Some(pa), Some(pb)) = (particles.get(self.a), particles.get(self.b)) else {
            return false;
        };
        let delta = pb.position - pa.position;
        let distance = delta.length();
        if distance == 0.0 || !distance.is_finite() {
            return false;
        }

        let difference = (distance - self.rest_length) / distance;
        let offset = delta * (0.5 * difference * self.stiffness);

        if !particles[self.a].fixed {
            particles[self.a].position += offset;
        }
        if !particles[self.b].fixed {
            particles[self.b].position -= offset;
        }
        true
    }

    /// Current |distance - rest_length|
    pub fn error(&self, particles: &[Particle]) -> f32 {
        match (particles.get(self.a), particles.get(self.b)) {
            (Some(pa), Some(pb)) => (pa.position.distance(pb.position) - self.rest_length).abs(),
            _ => 0.0,
        }
    }
}
