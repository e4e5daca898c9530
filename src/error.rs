//! Error types for rig construction and configuration
//!
//! Per-frame operations never fail; only construction and host-supplied
//! configuration can be rejected.

use thiserror::Error;

/// Errors raised while building a rig or parsing host configuration
#[derive(Debug, Error)]
pub enum RigError {
    /// A body part needs at least one particle
    #[error("particle count must be at least 1 (got {count})")]
    InvalidParticleCount { count: usize },

    /// Base radius must be positive and finite
    #[error("base radius must be positive and finite (got {radius})")]
    InvalidRadius { radius: f32 },

    /// A physics configuration field is out of range
    #[error("invalid value {value} for `{field}`")]
    InvalidConfig { field: &'static str, value: f32 },

    #[error("unknown character kind `{0}`")]
    UnknownCharacterKind(String),

    #[error("unknown quality level `{0}`")]
    UnknownQuality(String),

    #[error("unknown body part `{0}`")]
    UnknownPart(String),

    #[error("unknown facing `{0}`")]
    UnknownFacing(String),

    /// The rig's storage was released by `dispose`
    #[error("rig has been disposed")]
    Disposed,

    /// Host override JSON could not be parsed
    #[error("malformed overrides: {0}")]
    Overrides(#[from] serde_json::Error),
}
