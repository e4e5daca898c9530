//! Character presets
//!
//! Physics and visual presets are fixed arrays indexed by `CharacterKind`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::settings::{PhysicsConfig, QualityLevel};
use crate::sim::{PartId, PartStyle};

/// Preset key chosen by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CharacterKind {
    #[default]
    Standard,
    Athletic,
    Soft,
    Chibi,
}

const PHYSICS_PRESETS: [PhysicsConfig; CharacterKind::COUNT] = [
    // Standard
    PhysicsConfig {
        jiggle_frequency: 2.0,
        jiggle_amplitude: 8.0,
        movement_sensitivity: 0.6,
        impact_multiplier: 1.0,
        damping: 0.85,
        quality: QualityLevel::Medium,
    },
    // Athletic: tighter, quicker
    PhysicsConfig {
        jiggle_frequency: 3.0,
        jiggle_amplitude: 4.0,
        movement_sensitivity: 0.4,
        impact_multiplier: 0.8,
        damping: 0.75,
        quality: QualityLevel::Medium,
    },
    // Soft: slow and loose
    PhysicsConfig {
        jiggle_frequency: 1.5,
        jiggle_amplitude: 12.0,
        movement_sensitivity: 0.8,
        impact_multiplier: 1.3,
        damping: 0.9,
        quality: QualityLevel::High,
    },
    // Chibi: small and bouncy
    PhysicsConfig {
        jiggle_frequency: 2.5,
        jiggle_amplitude: 6.0,
        movement_sensitivity: 0.7,
        impact_multiplier: 1.5,
        damping: 0.8,
        quality: QualityLevel::Low,
    },
];

/// Rig-local part placement: (center, base radius). +y is down.
const BASE_LAYOUT: [(Vec2, f32); PartId::COUNT] = [
    (Vec2::new(0.0, 25.0), 12.0),   // Chest
    (Vec2::new(0.0, 55.0), 14.0),   // Hips
    (Vec2::new(-9.0, -6.0), 4.0),   // Hair0
    (Vec2::new(9.0, -6.0), 4.0),    // Hair1
    (Vec2::new(-12.0, 4.0), 3.5),   // Hair2
    (Vec2::new(12.0, 4.0), 3.5),    // Hair3
    (Vec2::new(-8.0, 76.0), 7.0),   // ThighLeft
    (Vec2::new(8.0, 76.0), 7.0),    // ThighRight
    (Vec2::new(-18.0, 34.0), 5.0),  // ArmLeft
    (Vec2::new(18.0, 34.0), 5.0),   // ArmRight
];

/// Appearance and proportions for one character kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualConfig {
    /// Uniform layout scale
    pub scale: f32,
    /// Extra radius factor for chest and hips
    pub core_scale: f32,
    pub skin: PartStyle,
    pub hair: PartStyle,
}

const VISUAL_PRESETS: [VisualConfig; CharacterKind::COUNT] = [
    // Standard
    VisualConfig {
        scale: 1.0,
        core_scale: 1.0,
        skin: PartStyle {
            base: [1.0, 0.84, 0.74, 1.0],
            highlight: [1.0, 0.93, 0.88, 1.0],
            shadow: [0.86, 0.64, 0.56, 1.0],
        },
        hair: PartStyle {
            base: [0.36, 0.22, 0.15, 1.0],
            highlight: [0.55, 0.38, 0.27, 1.0],
            shadow: [0.2, 0.12, 0.08, 1.0],
        },
    },
    // Athletic
    VisualConfig {
        scale: 1.05,
        core_scale: 0.85,
        skin: PartStyle {
            base: [0.87, 0.67, 0.52, 1.0],
            highlight: [0.96, 0.8, 0.67, 1.0],
            shadow: [0.68, 0.48, 0.36, 1.0],
        },
        hair: PartStyle {
            base: [0.1, 0.08, 0.08, 1.0],
            highlight: [0.3, 0.26, 0.26, 1.0],
            shadow: [0.03, 0.02, 0.02, 1.0],
        },
    },
    // Soft
    VisualConfig {
        scale: 1.0,
        core_scale: 1.2,
        skin: PartStyle {
            base: [1.0, 0.88, 0.82, 1.0],
            highlight: [1.0, 0.96, 0.93, 1.0],
            shadow: [0.9, 0.7, 0.66, 1.0],
        },
        hair: PartStyle {
            base: [0.95, 0.78, 0.45, 1.0],
            highlight: [1.0, 0.92, 0.7, 1.0],
            shadow: [0.75, 0.56, 0.28, 1.0],
        },
    },
    // Chibi
    VisualConfig {
        scale: 0.7,
        core_scale: 1.0,
        skin: PartStyle {
            base: [1.0, 0.87, 0.8, 1.0],
            highlight: [1.0, 0.95, 0.92, 1.0],
            shadow: [0.9, 0.68, 0.62, 1.0],
        },
        hair: PartStyle {
            base: [0.96, 0.55, 0.75, 1.0],
            highlight: [1.0, 0.78, 0.9, 1.0],
            shadow: [0.74, 0.35, 0.55, 1.0],
        },
    },
];

impl CharacterKind {
    pub const COUNT: usize = 4;
    pub const ALL: [CharacterKind; Self::COUNT] = [
        CharacterKind::Standard,
        CharacterKind::Athletic,
        CharacterKind::Soft,
        CharacterKind::Chibi,
    ];

    pub const fn index(self) -> usize {
        match self {
            CharacterKind::Standard => 0,
            CharacterKind::Athletic => 1,
            CharacterKind::Soft => 2,
            CharacterKind::Chibi => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterKind::Standard => "standard",
            CharacterKind::Athletic => "athletic",
            CharacterKind::Soft => "soft",
            CharacterKind::Chibi => "chibi",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "default" => Some(CharacterKind::Standard),
            "athletic" => Some(CharacterKind::Athletic),
            "soft" => Some(CharacterKind::Soft),
            "chibi" => Some(CharacterKind::Chibi),
            _ => None,
        }
    }

    pub fn physics(self) -> PhysicsConfig {
        PHYSICS_PRESETS[self.index()]
    }

    pub fn visual(self) -> VisualConfig {
        VISUAL_PRESETS[self.index()]
    }
}

impl VisualConfig {
    /// Placement of `id` for this look: (center, base radius)
    pub fn placement(&self, id: PartId) -> (Vec2, f32) {
        let (center, radius) = BASE_LAYOUT[id as usize];
        let radius = match id {
            PartId::Chest | PartId::Hips => radius * self.core_scale,
            _ => radius,
        };
        (center * self.scale, radius * self.scale)
    }

    /// Colors for `id`
    pub fn style(&self, id: PartId) -> PartStyle {
        if id.is_hair() { self.hair } else { self.skin }
    }
}

impl PartStyle {
    /// Derive highlight and shadow from a base color
    pub fn from_base(base: [f32; 4]) -> Self {
        let tint = |amount: f32| {
            let [r, g, b, a] = base;
            let mix = |c: f32| {
                if amount >= 0.0 {
                    c + (1.0 - c) * amount
                } else {
                    c * (1.0 + amount)
                }
            };
            [mix(r), mix(g), mix(b), a]
        };
        Self {
            base,
            highlight: tint(0.45),
            shadow: tint(-0.25),
        }
    }
}

/// Host-supplied visual overrides layered over a preset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisualOverrides {
    pub scale: Option<f32>,
    pub core_scale: Option<f32>,
    /// RGBA skin base color; highlight and shadow are derived
    pub skin: Option<[f32; 4]>,
    /// RGBA hair base color; highlight and shadow are derived
    pub hair: Option<[f32; 4]>,
}

impl VisualOverrides {
    pub fn from_json(json: &str) -> Result<Self, RigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn apply(&self, base: VisualConfig) -> Result<VisualConfig, RigError> {
        let positive = |field: &'static str, value: f32| {
            if value.is_finite() && value > 0.0 {
                Ok(value)
            } else {
                Err(RigError::InvalidConfig { field, value })
            }
        };
        Ok(VisualConfig {
            scale: positive("scale", self.scale.unwrap_or(base.scale))?,
            core_scale: positive("core_scale", self.core_scale.unwrap_or(base.core_scale))?,
            skin: self.skin.map(PartStyle::from_base).unwrap_or(base.skin),
            hair: self.hair.map(PartStyle::from_base).unwrap_or(base.hair),
        })
    }
}
