//! Verlet integration and iterative ring relaxation

use super::body::BodyPart;

/// Counters from one solver step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub integrated: usize,
    pub relaxed: usize,
    /// Corrections skipped because both endpoints coincided
    pub skipped: usize,
}

/// Advance every non-fixed particle one Verlet step
pub fn integrate(parts: &mut [BodyPart], dt: f32) -> usize {
    let mut count = 0;
    for part in parts.iter_mut() {
        for particle in part.particles.iter_mut().filter(|p| !p.fixed) {
            particle.integrate(dt);
            count += 1;
        }
    }
    count
}

/// One Gauss-Seidel pass over every ring constraint
pub fn relax(parts: &mut [BodyPart], stats: &mut StepStats) {
    for part in parts.iter_mut() {
        for constraint in &part.constraints {
            if constraint.relax(&mut part.particles) {
                stats.relaxed += 1;
            } else {
                stats.skipped += 1;
            }
        }
    }
}

/// Integrate, then relax `iterations` times
pub fn step(parts: &mut [BodyPart], dt: f32, iterations: usize) -> StepStats {
    let mut stats = StepStats {
        integrated: integrate(parts, dt),
        ..Default::default()
    };
    for _ in 0..iterations {
        relax(parts, &mut stats);
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{PartId, PartStyle, build_body_part};
    use crate::sim::particle::{Constraint, Particle};
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn pair(separation: f32, rest: f32, stiffness: f32) -> BodyPart {
        BodyPart {
            id: PartId::Chest,
            particles: vec![
                Particle::new(Vec2::ZERO, 1.0, 1.0),
                Particle::new(Vec2::new(separation, 0.0), 1.0, 1.0),
            ],
            constraints: vec![Constraint::new(0, 1, rest, stiffness, 1.0)],
            style: PartStyle::default(),
            center: Vec2::ZERO,
            base_radius: rest * 2.0,
        }
    }

    #[test]
    fn test_stiff_constraint_converges_in_one_pass() {
        let mut parts = [pair(10.0, 4.0, 1.0)];
        let before = parts[0].max_constraint_error();
        let mut stats = StepStats::default();

        relax(&mut parts, &mut stats);
        let after_one = parts[0].max_constraint_error();
        assert!(after_one < before);
        assert!(after_one < 1e-4);

        for _ in 0..5 {
            relax(&mut parts, &mut stats);
            assert!(parts[0].max_constraint_error() <= after_one + 1e-5);
        }
    }

    #[test]
    fn test_ring_error_shrinks_without_forces() {
        let mut part = pair(0.0, 1.0, 1.0);
        part.particles = (0..6)
            .map(|i| {
                let theta = i as f32 / 6.0 * std::f32::consts::TAU;
                Particle::new(Vec2::new(20.0 * theta.cos(), 20.0 * theta.sin()), 1.0, 1.0)
            })
            .collect();
        part.constraints = (0..6).map(|i| Constraint::new(i, (i + 1) % 6, 5.0, 1.0, 1.0)).collect();
        let mut parts = [part];

        let initial = parts[0].max_constraint_error();
        let mut stats = StepStats::default();
        for _ in 0..40 {
            relax(&mut parts, &mut stats);
        }
        assert!(parts[0].max_constraint_error() < initial * 0.2);
        assert!(parts[0].constraints.iter().all(|c| c.rest_length == 5.0));
    }

    #[test]
    fn test_step_counts_skipped_degenerate_constraints() {
        let mut parts = [pair(0.0, 4.0, 0.9)];
        let stats = step(&mut parts, 0.016, 3);
        assert_eq!(stats.integrated, 2);
        assert_eq!(stats.skipped, 3);
        assert_eq!(stats.relaxed, 0);
        assert!(parts[0].particles.iter().all(|p| p.position.is_finite()));
    }

    #[test]
    fn test_step_skips_fixed_particles() {
        let mut parts = [pair(10.0, 4.0, 1.0)];
        parts[0].particles[0].fixed = true;
        parts[0].particles[1].acceleration = Vec2::new(0.0, 100.0);
        let stats = step(&mut parts, 0.016, 4);
        assert_eq!(stats.integrated, 1);
        assert_eq!(parts[0].particles[0].position, Vec2::ZERO);
    }

    #[test]
    fn test_step_does_not_move_resting_ring() {
        let mut parts = [pair(4.0, 4.0, 1.0)];
        let before: Vec<Vec2> = parts[0].positions().collect();
        step(&mut parts, 0.016, 5);
        let after: Vec<Vec2> = parts[0].positions().collect();
        assert_eq!(before, after);
    }

    fn stiff_ring(seed: u64, particle_count: usize) -> BodyPart {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut part =
            build_body_part(PartId::Chest, Vec2::new(0.0, 25.0), 12.0, particle_count, 1.0, &mut rng)
                .unwrap();
        for constraint in part.constraints.iter_mut() {
            constraint.stiffness = 1.0;
        }
        part
    }

    proptest! {
        #[test]
        fn prop_single_constraint_error_strictly_decreases(
            separation in 2.0f32..30.0,
            rest in 1.0f32..20.0,
            stiffness in 0.1f32..0.8,
        ) {
            prop_assume!((separation - rest).abs() > 0.5);
            let mut parts = [pair(separation, rest, stiffness)];
            let mut stats = StepStats::default();
            let mut previous = parts[0].max_constraint_error();
            for _ in 0..3 {
                relax(&mut parts, &mut stats);
                let current = parts[0].max_constraint_error();
                prop_assert!(current < previous, "{} !< {}", current, previous);
                previous = current;
            }
        }

        #[test]
        fn prop_full_stiffness_pair_snaps_to_rest(
            separation in 2.0f32..30.0,
            rest in 1.0f32..20.0,
        ) {
            let mut parts = [pair(separation, rest, 1.0)];
            let mut stats = StepStats::default();
            relax(&mut parts, &mut stats);
            prop_assert!(parts[0].max_constraint_error() < 1e-3);
        }

        // Gauss-Seidel over a ring is not monotone pass to pass, but it
        // converges: neighbouring corrections can briefly stretch a link.
        #[test]
        fn prop_full_stiffness_ring_converges(seed in 0u64..10_000, particle_count in 3usize..=12) {
            let mut parts = [stiff_ring(seed, particle_count)];
            let initial = parts[0].max_constraint_error();
            prop_assume!(initial > 0.05);
            let mut stats = StepStats::default();
            for _ in 0..40 {
                relax(&mut parts, &mut stats);
            }
            let remaining = parts[0].max_constraint_error();
            prop_assert!(remaining < initial * 0.01, "{} of {}", remaining, initial);
            prop_assert_eq!(stats.skipped, 0);
        }
    }
}
