//! Jiggle Rig - reactive soft-body secondary motion for game characters
//!
//! Core modules:
//! - `sim`: Particle/constraint simulation (topology, forces, integration, impacts)
//! - `quality`: Frame-rate monitor that can switch the simulation off
//! - `rig`: Character rig aggregate and the host-facing surface
//! - `renderer`: Render adapter contract and a reference vertex-mesh adapter
//! - `settings` / `presets`: Physics configuration and per-character presets

pub mod error;
pub mod presets;
pub mod quality;
pub mod renderer;
pub mod rig;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use error::RigError;
pub use presets::CharacterKind;
pub use quality::{ControllerState, QualityController};
pub use renderer::{Facing, MeshAdapter, RenderAdapter};
pub use rig::{CharacterRig, PartSpec, RigBuilder, RigLayout};
pub use settings::{PhysicsConfig, QualityLevel};
pub use sim::{BodyPart, PartId, PartMask};

use glam::Vec2;

/// Simulation constants
pub mod consts {
    use glam::Vec2;

    /// Largest frame delta the integrator accepts (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Constant downward bias, screen space (+y is down). Kept low so parts settle.
    pub const GRAVITY_BIAS: Vec2 = Vec2::new(0.0, 0.5);
    /// Scale applied to the periodic jiggle term; peak jiggle acceleration
    /// is `jiggle_amplitude * JIGGLE_SCALE`
    pub const JIGGLE_SCALE: f32 = 0.15;
    /// Scale applied to the movement reaction term
    pub const MOVEMENT_SCALE: f32 = 0.5;
    /// Jerk magnitude below which movement reaction is ignored
    pub const MOVEMENT_DEADZONE: f32 = 0.1;

    /// Impact falloff radius around a part center (world units)
    pub const IMPACT_FALLOFF_RADIUS: f32 = 30.0;
    /// Lifetime of a freshly applied impact (seconds)
    pub const IMPACT_DURATION: f32 = 0.2;
    /// Maximum queued impacts before the oldest is dropped
    pub const MAX_IMPACTS: usize = 64;

    /// Ring topology: rest length as a fraction of the base radius
    pub const REST_LENGTH_FACTOR: f32 = 0.5;
    /// Ring topology: constraint stiffness
    pub const RING_STIFFNESS: f32 = 0.9;
    /// Ring topology: radial placement jitter (fraction of base radius)
    pub const PLACEMENT_JITTER: f32 = 0.3;
    /// Visual particle radius as a fraction of the part's base radius
    pub const PARTICLE_RADIUS_FACTOR: f32 = 0.25;

    /// Frame-rate monitor window size (samples)
    pub const FPS_WINDOW: usize = 60;
    /// Default frame rate the monitor compares against
    pub const DEFAULT_TARGET_FPS: f32 = 60.0;
    /// Fraction of the target frame rate below which physics switches off
    pub const DEFAULT_AUTO_DISABLE_THRESHOLD: f32 = 0.7;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Clamp a host-supplied frame delta: NaN, infinite and negative become 0
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(consts::MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Replace a non-finite vector with `fallback`
#[inline]
pub fn sanitize_vec(v: Vec2, fallback: Vec2) -> Vec2 {
    if v.is_finite() { v } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_dt() {
        assert_eq!(sanitize_dt(f32::NAN), 0.0);
        assert_eq!(sanitize_dt(-0.016), 0.0);
        assert_eq!(sanitize_dt(f32::INFINITY), 0.0);
        assert_eq!(sanitize_dt(0.016), 0.016);
        assert_eq!(sanitize_dt(5.0), consts::MAX_FRAME_DT);
    }

    #[test]
    fn test_sanitize_vec() {
        let fallback = Vec2::new(1.0, 2.0);
        assert_eq!(sanitize_vec(Vec2::new(f32::NAN, 0.0), fallback), fallback);
        assert_eq!(sanitize_vec(Vec2::new(3.0, 4.0), fallback), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_manifest_pins_one_getrandom() {
        let manifest = include_str!("../Cargo.toml");
        let getrandom: Vec<&str> = manifest
            .lines()
            .filter(|line| line.trim_start().starts_with("getrandom"))
            .collect();
        assert_eq!(getrandom.len(), 1, "{getrandom:?}");
        assert!(getrandom[0].contains("\"0.3\""));
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(2.0, std::f32::consts::FRAC_PI_2);
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
    }
}
