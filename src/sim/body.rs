//! Body parts: ring-shaped soft bodies and the bitset of parts a rig carries

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::particle::{Constraint, Particle};
use crate::consts::*;
use crate::error::RigError;
use crate::polar_to_cartesian;
use crate::settings::QualityLevel;

/// Identifier of a simulated region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartId {
    Chest,
    Hips,
    Hair0,
    Hair1,
    Hair2,
    Hair3,
    ThighLeft,
    ThighRight,
    ArmLeft,
    ArmRight,
}

impl PartId {
    pub const COUNT: usize = 10;
    /// Stable iteration and draw order
    pub const ALL: [PartId; Self::COUNT] = [
        PartId::Hair0,
        PartId::Hair1,
        PartId::Hair2,
        PartId::Hair3,
        PartId::ArmLeft,
        PartId::ArmRight,
        PartId::ThighLeft,
        PartId::ThighRight,
        PartId::Hips,
        PartId::Chest,
    ];
    pub const HAIR: [PartId; 4] = [PartId::Hair0, PartId::Hair1, PartId::Hair2, PartId::Hair3];

    pub const fn bit(self) -> u16 {
        1 << (self as u16)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PartId::Chest => "chest",
            PartId::Hips => "hips",
            PartId::Hair0 => "hair0",
            PartId::Hair1 => "hair1",
            PartId::Hair2 => "hair2",
            PartId::Hair3 => "hair3",
            PartId::ThighLeft => "thigh_left",
            PartId::ThighRight => "thigh_right",
            PartId::ArmLeft => "arm_left",
            PartId::ArmRight => "arm_right",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "chest" => Some(PartId::Chest),
            "hips" => Some(PartId::Hips),
            "hair0" | "hair" => Some(PartId::Hair0),
            "hair1" => Some(PartId::Hair1),
            "hair2" => Some(PartId::Hair2),
            "hair3" => Some(PartId::Hair3),
            "thigh_left" | "thighleft" => Some(PartId::ThighLeft),
            "thigh_right" | "thighright" => Some(PartId::ThighRight),
            "arm_left" | "armleft" => Some(PartId::ArmLeft),
            "arm_right" | "armright" => Some(PartId::ArmRight),
            _ => None,
        }
    }

    pub fn is_hair(self) -> bool {
        matches!(self, PartId::Hair0 | PartId::Hair1 | PartId::Hair2 | PartId::Hair3)
    }

    pub fn is_limb(self) -> bool {
        matches!(
            self,
            PartId::ThighLeft | PartId::ThighRight | PartId::ArmLeft | PartId::ArmRight
        )
    }

    /// Ring density for this part at `quality`
    pub fn particle_count(self, quality: QualityLevel) -> usize {
        if self.is_hair() {
            quality.hair_particles()
        } else if self.is_limb() {
            quality.limb_particles()
        } else {
            quality.core_particles()
        }
    }
}

/// Set of parts present on a rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartMask(u16);

impl PartMask {
    pub const EMPTY: PartMask = PartMask(0);

    pub const fn contains(self, id: PartId) -> bool {
        self.0 & id.bit() != 0
    }

    pub fn insert(&mut self, id: PartId) {
        self.0 |= id.bit();
    }

    pub fn with(mut self, id: PartId) -> Self {
        self.insert(id);
        self
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Parts in draw order
    pub fn iter(self) -> impl Iterator<Item = PartId> {
        PartId::ALL.into_iter().filter(move |id| self.contains(*id))
    }

    /// Parts built at a given quality; decided once at construction
    pub fn for_quality(quality: QualityLevel) -> Self {
        let mut mask = PartMask::EMPTY.with(PartId::Chest).with(PartId::Hips);
        for id in PartId::HAIR.into_iter().take(quality.hair_strands()) {
            mask.insert(id);
        }
        if quality.has_thighs() {
            mask.insert(PartId::ThighLeft);
            mask.insert(PartId::ThighRight);
        }
        if quality.has_arms() {
            mask.insert(PartId::ArmLeft);
            mask.insert(PartId::ArmRight);
        }
        mask
    }
}

/// Colors consumed by the render adapter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartStyle {
    pub base: [f32; 4],
    pub highlight: [f32; 4],
    pub shadow: [f32; 4],
}

impl Default for PartStyle {
    fn default() -> Self {
        Self {
            base: [1.0, 0.84, 0.74, 1.0],
            highlight: [1.0, 0.93, 0.88, 1.0],
            shadow: [0.86, 0.64, 0.56, 1.0],
        }
    }
}

/// A ring of particles; particle `i` is constrained to `(i + 1) % n`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyPart {
    pub id: PartId,
    pub particles: Vec<Particle>,
    pub constraints: Vec<Constraint>,
    pub style: PartStyle,
    /// Rig-local center, also the impact epicenter
    pub center: Vec2,
    pub base_radius: f32,
}

/// Place `particle_count` particles around `center` with up to ±30% radial
/// jitter and close them into a ring of distance constraints.
pub fn build_body_part<R: Rng>(
    id: PartId,
    center: Vec2,
    base_radius: f32,
    particle_count: usize,
    damping: f32,
    rng: &mut R,
) -> Result<BodyPart, RigError> {
    if particle_count < 1 {
        return Err(RigError::InvalidParticleCount {
            count: particle_count,
        });
    }
    if !base_radius.is_finite() || base_radius <= 0.0 {
        return Err(RigError::InvalidRadius {
            radius: base_radius,
        });
    }

    let damping = damping.clamp(f32::EPSILON, 1.0);
    let visual_radius = base_radius * PARTICLE_RADIUS_FACTOR;

    let particles: Vec<Particle> = (0..particle_count)
        .map(|i| {
            let theta = i as f32 / particle_count as f32 * std::f32::consts::TAU;
            let jitter = rng.random_range(-PLACEMENT_JITTER..=PLACEMENT_JITTER);
            let r = base_radius * (1.0 + jitter);
            Particle::new(center + polar_to_cartesian(r, theta), visual_radius, damping)
        })
        .collect();

    let rest_length = base_radius * REST_LENGTH_FACTOR;
    let constraints = (0..particle_count)
        .map(|i| {
            Constraint::new(
                i,
                (i + 1) % particle_count,
                rest_length,
                RING_STIFFNESS,
                damping,
            )
        })
        .collect();

    Ok(BodyPart {
        id,
        particles,
        constraints,
        style: PartStyle::default(),
        center,
        base_radius,
    })
}

impl BodyPart {
    pub fn with_style(mut self, style: PartStyle) -> Self {
        self.style = style;
        self
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Current particle positions in ring order
    pub fn positions(&self) -> impl ExactSizeIterator<Item = Vec2> + '_ {
        self.particles.iter().map(|p| p.position)
    }

    /// Average particle position
    pub fn centroid(&self) -> Vec2 {
        if self.particles.is_empty() {
            return self.center;
        }
        self.positions().sum::<Vec2>() / self.particles.len() as f32
    }

    /// Largest |distance - rest_length| over the ring
    pub fn max_constraint_error(&self) -> f32 {
        self.constraints
            .iter()
            .map(|c| c.error(&self.particles))
            .fold(0.0, f32::max)
    }

    /// Drop all particle and constraint storage
    pub fn release(&mut self) {
        self.particles = Vec::new();
        self.constraints = Vec::new();
    }
}
