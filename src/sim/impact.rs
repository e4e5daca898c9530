//! Time-bounded external impulses
//!
//! Impacts are never merged: each one ages and expires on its own.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::PartId;
use crate::consts::{IMPACT_DURATION, IMPACT_FALLOFF_RADIUS, MAX_IMPACTS};

/// A transient force aimed at one body part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    pub force: Vec2,
    pub target: PartId,
    /// Seconds left; the impact is dropped once this reaches zero
    pub remaining_time: f32,
}

impl Impact {
    pub fn new(force: Vec2, target: PartId) -> Self {
        Self {
            force,
            target,
            remaining_time: IMPACT_DURATION,
        }
    }

    pub fn is_live(&self) -> bool {
        self.remaining_time > 0.0
    }
}

/// Linear falloff weight: 1 at the epicenter, 0 at and beyond the radius
#[inline]
pub fn impact_falloff(distance: f32) -> f32 {
    if distance.is_finite() && distance < IMPACT_FALLOFF_RADIUS {
        (1.0 - distance.max(0.0) / IMPACT_FALLOFF_RADIUS).max(0.0)
    } else {
        0.0
    }
}

/// Contribution of one impact to a particle at `position`
#[inline]
pub fn impact_contribution(impact: &Impact, position: Vec2, epicenter: Vec2, multiplier: f32) -> Vec2 {
    if !impact.is_live() {
        return Vec2::ZERO;
    }
    impact.force * (impact_falloff(position.distance(epicenter)) * multiplier)
}

/// FIFO of live impacts owned by one simulation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactQueue {
    impacts: VecDeque<Impact>,
}

impl ImpactQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an impulse with the standard lifetime
    pub fn apply_impact(&mut self, force: Vec2, target: PartId) {
        if !force.is_finite() {
            log::warn!("Ignoring non-finite impact on {}", target.as_str());
            return;
        }
        if self.impacts.len() >= MAX_IMPACTS {
            if let Some(dropped) = self.impacts.pop_front() {
                log::debug!(
                    "Impact queue full, dropping oldest ({} on {})",
                    dropped.force,
                    dropped.target.as_str()
                );
            }
        }
        self.impacts.push_back(Impact::new(force, target));
    }

    /// Age every impact by `dt` and prune the expired ones
    pub fn tick(&mut self, dt: f32) {
        for impact in &mut self.impacts {
            impact.remaining_time -= dt;
        }
        self.impacts.retain(Impact::is_live);
    }

    /// Live impacts aimed at `target`
    pub fn targeting(&self, target: PartId) -> impl Iterator<Item = &Impact> {
        self.impacts
            .iter()
            .filter(move |i| i.target == target && i.is_live())
    }

    pub fn len(&self) -> usize {
        self.impacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.impacts.is_empty()
    }

    pub fn clear(&mut self) {
        self.impacts = VecDeque::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_falloff_boundaries() {
        assert_eq!(impact_falloff(0.0), 1.0);
        assert_eq!(impact_falloff(IMPACT_FALLOFF_RADIUS), 0.0);
        assert_eq!(impact_falloff(45.0), 0.0);
        assert!((impact_falloff(15.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_contribution_at_epicenter_is_full() {
        let impact = Impact::new(Vec2::new(10.0, -4.0), PartId::Chest);
        let c = impact_contribution(&impact, Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0), 2.0);
        assert_eq!(c, Vec2::new(20.0, -8.0));
    }

    #[test]
    fn test_contribution_at_radius_is_zero() {
        let impact = Impact::new(Vec2::new(10.0, -4.0), PartId::Chest);
        let c = impact_contribution(&impact, Vec2::new(30.0, 0.0), Vec2::ZERO, 2.0);
        assert_eq!(c, Vec2::ZERO);
    }

    #[test]
    fn test_expired_impact_contributes_nothing() {
        let mut impact = Impact::new(Vec2::new(10.0, 0.0), PartId::Chest);
        impact.remaining_time = 0.0;
        assert_eq!(impact_contribution(&impact, Vec2::ZERO, Vec2::ZERO, 1.0), Vec2::ZERO);
    }

    #[test]
    fn test_tick_expires_after_duration() {
        let mut queue = ImpactQueue::new();
        queue.apply_impact(Vec2::new(5.0, 0.0), PartId::Chest);
        let mut elapsed = 0.0;
        while elapsed < IMPACT_DURATION - 0.05 {
            queue.tick(0.016);
            elapsed += 0.016;
        }
        assert_eq!(queue.len(), 1);
        for _ in 0..10 {
            queue.tick(0.016);
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_impacts_are_additive_not_coalesced() {
        let mut queue = ImpactQueue::new();
        queue.apply_impact(Vec2::new(1.0, 0.0), PartId::Chest);
        queue.tick(0.1);
        queue.apply_impact(Vec2::new(1.0, 0.0), PartId::Chest);
        queue.apply_impact(Vec2::new(0.0, 1.0), PartId::Hips);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.targeting(PartId::Chest).count(), 2);

        // The first one ages out alone
        queue.tick(0.15);
        assert_eq!(queue.targeting(PartId::Chest).count(), 1);
        assert_eq!(queue.targeting(PartId::Hips).count(), 1);
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut queue = ImpactQueue::new();
        for i in 0..(MAX_IMPACTS + 5) {
            queue.apply_impact(Vec2::new(i as f32, 0.0), PartId::Hips);
        }
        assert_eq!(queue.len(), MAX_IMPACTS);
        assert_eq!(
            queue.targeting(PartId::Hips).next().map(|i| i.force.x),
            Some(5.0)
        );
    }

    #[test]
    fn test_non_finite_impact_ignored() {
        let mut queue = ImpactQueue::new();
        queue.apply_impact(Vec2::new(f32::NAN, 0.0), PartId::Chest);
        assert!(queue.is_empty());
    }

    proptest! {
        #[test]
        fn prop_falloff_in_unit_range(d in -10.0f32..100.0) {
            let w = impact_falloff(d);
            prop_assert!((0.0..=1.0).contains(&w));
            if d >= IMPACT_FALLOFF_RADIUS {
                prop_assert_eq!(w, 0.0);
            }
        }

        #[test]
        fn prop_falloff_monotonic(a in 0.0f32..40.0, b in 0.0f32..40.0) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(impact_falloff(near) >= impact_falloff(far));
        }
    }
}
