//! Soft-body simulation module
//!
//! Pure, single-threaded step functions over rig-owned storage:
//! - Construction-time randomness only, through an injected RNG
//! - Fixed term order in the force model
//! - Stable part iteration order (draw order)
//! - No rendering or platform dependencies

pub mod body;
pub mod forces;
pub mod impact;
pub mod particle;
pub mod solver;
pub mod state;

pub use body::{BodyPart, PartId, PartMask, PartStyle, build_body_part};
pub use forces::{compute_accelerations, jiggle_acceleration, movement_jerk, movement_reaction};
pub use impact::{Impact, ImpactQueue, impact_contribution, impact_falloff};
pub use particle::{Constraint, Particle};
pub use solver::StepStats;
pub use state::SimState;
