//! Jiggle Rig native demo
//!
//! Runs a rig headless for a few seconds and logs what the simulation does.
//! Usage: `jiggle-rig [standard|athletic|soft|chibi] [low|medium|high|ultra]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = demo::run(std::env::args().skip(1).collect()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `wasm_start` in the library
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use jiggle_rig::consts::IMPACT_DURATION;
    use jiggle_rig::settings::PhysicsOverrides;
    use jiggle_rig::{
        CharacterKind, CharacterRig, Facing, MeshAdapter, PartId, QualityLevel, RigError,
    };

    const FRAME_DT: f32 = 1.0 / 60.0;
    const FRAMES: usize = 240;

    pub fn run(args: Vec<String>) -> Result<(), RigError> {
        let kind = match args.first() {
            Some(s) => CharacterKind::from_str(s).ok_or_else(|| RigError::UnknownCharacterKind(s.clone()))?,
            None => CharacterKind::default(),
        };
        let overrides = match args.get(1) {
            Some(s) => Some(PhysicsOverrides {
                quality: Some(QualityLevel::from_str(s).ok_or_else(|| RigError::UnknownQuality(s.clone()))?),
                ..Default::default()
            }),
            None => None,
        };

        let mut rig = CharacterRig::create(kind, overrides.as_ref(), None)?;
        let mut mesh = MeshAdapter::new();
        log::info!(
            "{} rig: {} particles, {} constraints",
            kind.as_str(),
            rig.particle_count(),
            rig.constraint_count()
        );

        // Walk right for a second, stop dead, then take a hit
        let mut position = Vec2::new(0.0, 25.0);
        for frame in 0..FRAMES {
            let velocity = if frame < 60 { Vec2::new(150.0, 0.0) } else { Vec2::ZERO };
            position += velocity * FRAME_DT;
            if frame == 120 {
                rig.apply_impact(Vec2::new(-60.0, -20.0), PartId::Chest);
            }
            rig.update(FRAME_DT, velocity, position);

            if frame % 30 == 0 || frame == 120 + (IMPACT_DURATION / FRAME_DT) as usize {
                rig.render(position.x, position.y, Facing::Right, &mut mesh);
                let chest = rig.part(PartId::Chest).map(|p| p.centroid() - p.center);
                log::info!(
                    "frame {frame:3}: chest offset {:?}, max ring error {:.3}, {} vertices, {} impacts",
                    chest.unwrap_or_default(),
                    rig.parts()
                        .iter()
                        .map(|p| p.max_constraint_error())
                        .fold(0.0, f32::max),
                    mesh.vertices().len(),
                    rig.active_impacts()
                );
            }
        }

        log::info!("{:?}", rig.last_stats());
        rig.dispose();
        Ok(())
    }
}
