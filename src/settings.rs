//! Physics settings and quality levels
//!
//! Quality tables are fixed arrays indexed by `QualityLevel`, so every level
//! has an entry at compile time.

use serde::{Deserialize, Serialize};

use crate::error::RigError;

/// Simulation quality levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Low,
    #[default]
    Medium,
    High,
    Ultra,
}

/// Particles per core ring (chest, hips)
const CORE_PARTICLES: [usize; QualityLevel::COUNT] = [4, 6, 8, 12];
/// Particles per hair strand ring
const HAIR_PARTICLES: [usize; QualityLevel::COUNT] = [3, 3, 4, 5];
/// Particles per limb ring (thighs, arms)
const LIMB_PARTICLES: [usize; QualityLevel::COUNT] = [4, 4, 5, 6];
/// Hair strands present
const HAIR_STRANDS: [usize; QualityLevel::COUNT] = [0, 2, 3, 4];
/// Constraint relaxation passes per step
const SOLVER_ITERATIONS: [usize; QualityLevel::COUNT] = [3, 3, 4, 5];

impl QualityLevel {
    pub const COUNT: usize = 4;
    pub const ALL: [QualityLevel; Self::COUNT] = [
        QualityLevel::Low,
        QualityLevel::Medium,
        QualityLevel::High,
        QualityLevel::Ultra,
    ];

    /// Index into the per-level tables
    pub const fn index(self) -> usize {
        match self {
            QualityLevel::Low => 0,
            QualityLevel::Medium => 1,
            QualityLevel::High => 2,
            QualityLevel::Ultra => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLevel::Low => "low",
            QualityLevel::Medium => "medium",
            QualityLevel::High => "high",
            QualityLevel::Ultra => "ultra",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(QualityLevel::Low),
            "medium" | "med" => Some(QualityLevel::Medium),
            "high" => Some(QualityLevel::High),
            "ultra" => Some(QualityLevel::Ultra),
            _ => None,
        }
    }

    /// Particles per chest/hips ring
    pub fn core_particles(self) -> usize {
        CORE_PARTICLES[self.index()]
    }

    /// Particles per hair strand ring
    pub fn hair_particles(self) -> usize {
        HAIR_PARTICLES[self.index()]
    }

    /// Particles per thigh/arm ring
    pub fn limb_particles(self) -> usize {
        LIMB_PARTICLES[self.index()]
    }

    /// Number of hair strands built (0-4)
    pub fn hair_strands(self) -> usize {
        HAIR_STRANDS[self.index()]
    }

    /// Whether thighs are simulated
    pub fn has_thighs(self) -> bool {
        match self {
            QualityLevel::Low | QualityLevel::Medium => false,
            QualityLevel::High | QualityLevel::Ultra => true,
        }
    }

    /// Whether arms are simulated
    pub fn has_arms(self) -> bool {
        match self {
            QualityLevel::Low | QualityLevel::Medium | QualityLevel::High => false,
            QualityLevel::Ultra => true,
        }
    }

    /// Constraint solver iterations per step
    pub fn solver_iterations(self) -> usize {
        SOLVER_ITERATIONS[self.index()]
    }
}

/// Behavioral parameters for one rig, fixed for the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Idle jiggle frequency (Hz)
    pub jiggle_frequency: f32,
    /// Idle jiggle amplitude (px-equivalent)
    pub jiggle_amplitude: f32,
    /// How strongly parts lag behind character movement (0.0 - 1.0)
    pub movement_sensitivity: f32,
    /// Scale applied to queued impacts
    pub impact_multiplier: f32,
    /// Acceleration damping (0.0 - 1.0)
    pub damping: f32,
    /// Particle density and solver iterations
    pub quality: QualityLevel,
}

/// Lower bound for per-particle damping; zero would freeze the part entirely
const MIN_PARTICLE_DAMPING: f32 = 0.01;

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            jiggle_frequency: 2.0,
            jiggle_amplitude: 8.0,
            movement_sensitivity: 0.6,
            impact_multiplier: 1.0,
            damping: 0.85,
            quality: QualityLevel::Medium,
        }
    }
}

impl PhysicsConfig {
    /// Reject out-of-range values
    pub fn validate(&self) -> Result<(), RigError> {
        fn check(field: &'static str, value: f32, ok: bool) -> Result<(), RigError> {
            if value.is_finite() && ok {
                Ok(())
            } else {
                Err(RigError::InvalidConfig { field, value })
            }
        }

        check("jiggle_frequency", self.jiggle_frequency, self.jiggle_frequency >= 0.0)?;
        check("jiggle_amplitude", self.jiggle_amplitude, self.jiggle_amplitude >= 0.0)?;
        check(
            "movement_sensitivity",
            self.movement_sensitivity,
            (0.0..=1.0).contains(&self.movement_sensitivity),
        )?;
        check("impact_multiplier", self.impact_multiplier, self.impact_multiplier >= 0.0)?;
        check("damping", self.damping, (0.0..=1.0).contains(&self.damping))?;
        Ok(())
    }

    /// Damping factor stamped onto each particle, kept inside (0, 1]
    pub fn particle_damping(&self) -> f32 {
        self.damping.clamp(MIN_PARTICLE_DAMPING, 1.0)
    }
}

/// Host-supplied physics overrides layered over a preset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsOverrides {
    pub jiggle_frequency: Option<f32>,
    pub jiggle_amplitude: Option<f32>,
    pub movement_sensitivity: Option<f32>,
    pub impact_multiplier: Option<f32>,
    pub damping: Option<f32>,
    pub quality: Option<QualityLevel>,
}

impl PhysicsOverrides {
    /// Parse overrides from a JSON object
    pub fn from_json(json: &str) -> Result<Self, RigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply the present fields on top of `base`
    pub fn apply(&self, base: PhysicsConfig) -> PhysicsConfig {
        PhysicsConfig {
            jiggle_frequency: self.jiggle_frequency.unwrap_or(base.jiggle_frequency),
            jiggle_amplitude: self.jiggle_amplitude.unwrap_or(base.jiggle_amplitude),
            movement_sensitivity: self.movement_sensitivity.unwrap_or(base.movement_sensitivity),
            impact_multiplier: self.impact_multiplier.unwrap_or(base.impact_multiplier),
            damping: self.damping.unwrap_or(base.damping),
            quality: self.quality.unwrap_or(base.quality),
        }
    }
}
