//! Browser bindings
//!
//! `JiggleRig` is the surface a JavaScript game loop drives. Construction
//! failures never throw: the rig reports itself not-ready and every call
//! becomes a no-op.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::error::RigError;
use crate::presets::{CharacterKind, VisualOverrides};
use crate::renderer::{Facing, MeshAdapter};
use crate::rig::CharacterRig;
use crate::settings::{PhysicsOverrides, QualityLevel};
use crate::sim::PartId;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // A second init (several modules on one page) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
}

fn build_rig(
    kind: &str,
    physics_json: Option<&str>,
    visual_json: Option<&str>,
) -> Result<CharacterRig, RigError> {
    let kind =
        CharacterKind::from_str(kind).ok_or_else(|| RigError::UnknownCharacterKind(kind.to_string()))?;
    let physics = physics_json.map(PhysicsOverrides::from_json).transpose()?;
    let visual = visual_json.map(VisualOverrides::from_json).transpose()?;
    CharacterRig::create(kind, physics.as_ref(), visual.as_ref())
}

/// One character's soft-body rig, owned by JavaScript
#[wasm_bindgen]
pub struct JiggleRig {
    rig: Option<CharacterRig>,
    mesh: MeshAdapter,
}

#[wasm_bindgen]
impl JiggleRig {
    /// Build from a preset key and optional JSON override objects
    pub fn create(kind: &str, physics_json: Option<String>, visual_json: Option<String>) -> JiggleRig {
        let rig = match build_rig(kind, physics_json.as_deref(), visual_json.as_deref()) {
            Ok(rig) => Some(rig),
            Err(e) => {
                log::warn!("Jiggle rig construction failed: {e}");
                None
            }
        };
        JiggleRig {
            rig,
            mesh: MeshAdapter::new(),
        }
    }

    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.rig.as_ref().is_some_and(CharacterRig::is_ready)
    }

    pub fn update(&mut self, dt: f32, vx: f32, vy: f32, px: f32, py: f32) {
        if let Some(rig) = self.rig.as_mut() {
            rig.update(dt, Vec2::new(vx, vy), Vec2::new(px, py));
        }
    }

    /// Queue an impulse; `target` defaults to the chest
    #[wasm_bindgen(js_name = applyImpact)]
    pub fn apply_impact(&mut self, fx: f32, fy: f32, target: Option<String>) {
        let Some(rig) = self.rig.as_mut() else {
            return;
        };
        let target = target.as_deref().unwrap_or("chest");
        match PartId::from_str(target) {
            Some(id) => rig.apply_impact(Vec2::new(fx, fy), id),
            None => log::warn!("{}", RigError::UnknownPart(target.to_string())),
        }
    }

    /// Triangle list as `[x, y, r, g, b, a]` per vertex
    pub fn render(&mut self, x: f32, y: f32, facing: &str) -> Vec<f32> {
        let Some(rig) = self.rig.as_ref() else {
            return Vec::new();
        };
        let facing = Facing::from_str(facing).unwrap_or_else(|| {
            log::warn!("{}", RigError::UnknownFacing(facing.to_string()));
            Facing::default()
        });
        rig.render(x, y, facing, &mut self.mesh);
        if !rig.is_ready() {
            return Vec::new();
        }
        self.mesh.as_floats().to_vec()
    }

    #[wasm_bindgen(js_name = setDebug)]
    pub fn set_debug(&mut self, debug: bool) {
        self.mesh.debug = debug;
    }

    #[wasm_bindgen(js_name = setEnabled)]
    pub fn set_enabled(&mut self, enabled: bool) {
        if let Some(rig) = self.rig.as_mut() {
            rig.set_enabled(enabled);
        }
    }

    #[wasm_bindgen(js_name = isEnabled)]
    pub fn is_enabled(&self) -> bool {
        self.rig
            .as_ref()
            .is_some_and(|rig| rig.controller().is_enabled())
    }

    /// Returns false for an unknown level
    #[wasm_bindgen(js_name = setQuality)]
    pub fn set_quality(&mut self, level: &str) -> bool {
        let Some(quality) = QualityLevel::from_str(level) else {
            log::warn!("{}", RigError::UnknownQuality(level.to_string()));
            return false;
        };
        if let Some(rig) = self.rig.as_mut() {
            rig.set_quality(quality);
        }
        true
    }

    /// Apply the pending quality; returns false if the rig is not ready
    pub fn rebuild(&mut self) -> bool {
        let Some(rig) = self.rig.as_mut() else {
            return false;
        };
        match rig.rebuild() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Jiggle rig rebuild failed: {e}");
                false
            }
        }
    }

    #[wasm_bindgen(js_name = averageFps)]
    pub fn average_fps(&self) -> f32 {
        self.rig
            .as_ref()
            .map_or(0.0, |rig| rig.controller().average_fps())
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.rig.as_ref().map_or(0, CharacterRig::particle_count)
    }

    pub fn dispose(&mut self) {
        if let Some(rig) = self.rig.as_mut() {
            rig.dispose();
        }
        self.mesh = MeshAdapter::new();
    }
}
