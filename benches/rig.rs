//! Benchmarks for the character rig frame loop.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::Vec2;
use jiggle_rig::settings::PhysicsConfig;
use jiggle_rig::{CharacterKind, Facing, MeshAdapter, PartId, QualityLevel, RigBuilder};

fn rig_at(quality: QualityLevel) -> jiggle_rig::CharacterRig {
    RigBuilder::new(CharacterKind::Standard)
        .physics(PhysicsConfig {
            quality,
            ..Default::default()
        })
        .seed(9)
        .build()
        .unwrap()
}

fn bench_update(c: &mut Criterion) {
    for quality in [QualityLevel::Low, QualityLevel::Ultra] {
        c.bench_function(&format!("rig_{}_60_frames", quality.as_str()), |b| {
            b.iter(|| {
                let mut rig = rig_at(quality);
                rig.apply_impact(Vec2::new(40.0, 0.0), PartId::Chest);
                let mut position = Vec2::ZERO;
                for frame in 0..60 {
                    let velocity = if frame < 30 { Vec2::new(120.0, 0.0) } else { Vec2::ZERO };
                    position += velocity / 60.0;
                    rig.update(1.0 / 60.0, velocity, position);
                }
                black_box(rig.particle_count())
            });
        });
    }
}

fn bench_render(c: &mut Criterion) {
    let rig = rig_at(QualityLevel::Ultra);
    let mut mesh = MeshAdapter::new();
    c.bench_function("mesh_adapter_ultra_frame", |b| {
        b.iter(|| {
            rig.render(black_box(320.0), black_box(240.0), Facing::Left, &mut mesh);
            mesh.vertices().len()
        });
    });
}

criterion_group!(benches, bench_update, bench_render);
criterion_main!(benches);
