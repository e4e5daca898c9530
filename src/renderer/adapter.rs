//! Render adapter contract
//!
//! The rig hands each body part to an adapter as a read-only view after the
//! frame's step has finished. Drawing style is up to the adapter.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::{BodyPart, PartId, PartStyle};

/// Which way the character faces; the rig is authored facing right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" => Some(Facing::Left),
            "right" => Some(Facing::Right),
            _ => None,
        }
    }

    /// Horizontal sign applied to rig-local x
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Read-only view of one part, positioned for drawing
#[derive(Debug, Clone, Copy)]
pub struct PartView<'a> {
    part: &'a BodyPart,
    anchor: Vec2,
    facing: Facing,
}

impl<'a> PartView<'a> {
    pub fn new(part: &'a BodyPart, anchor: Vec2, facing: Facing) -> Self {
        Self {
            part,
            anchor,
            facing,
        }
    }

    pub fn id(&self) -> PartId {
        self.part.id
    }

    pub fn style(&self) -> &'a PartStyle {
        &self.part.style
    }

    /// Draw scale of the part (base radius, unmirrored)
    pub fn base_radius(&self) -> f32 {
        self.part.base_radius
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Map a rig-local point to screen space
    pub fn to_screen(&self, local: Vec2) -> Vec2 {
        self.anchor + Vec2::new(local.x * self.facing.sign(), local.y)
    }

    /// Part center in screen space
    pub fn center(&self) -> Vec2 {
        self.to_screen(self.part.center)
    }

    /// Particle positions in screen space, ring order
    pub fn points(&self) -> impl ExactSizeIterator<Item = Vec2> + 'a {
        let view = *self;
        self.part.particles.iter().map(move |p| view.to_screen(p.position))
    }

    /// Constraint endpoints in screen space
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + 'a {
        let view = *self;
        let particles = &self.part.particles;
        self.part.constraints.iter().filter_map(move |c| {
            let a = particles.get(c.a)?;
            let b = particles.get(c.b)?;
            Some((view.to_screen(a.position), view.to_screen(b.position)))
        })
    }
}

/// Receives body parts once per `render` call, in draw order
pub trait RenderAdapter {
    /// Called before the first part of a frame
    fn begin(&mut self, _anchor: Vec2, _facing: Facing) {}

    fn draw_part(&mut self, part: &PartView<'_>);

    /// Called after the last part of a frame
    fn finish(&mut self) {}
}

/// Reference adapter producing a triangle list for a wgpu vertex buffer
#[derive(Debug, Clone, Default)]
pub struct MeshAdapter {
    vertices: Vec<Vertex>,
    /// Overlay particles and constraints
    pub debug: bool,
    parts_drawn: usize,
}

/// Shadow rim width relative to part radius
const RIM_FACTOR: f32 = 0.12;
/// Segments used for parts too small to form a polygon
const FALLBACK_SEGMENTS: u32 = 12;

impl MeshAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Raw bytes ready for `queue.write_buffer`
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Flattened `[x, y, r, g, b, a]` floats
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn parts_drawn(&self) -> usize {
        self.parts_drawn
    }
}

impl RenderAdapter for MeshAdapter {
    fn begin(&mut self, _anchor: Vec2, _facing: Facing) {
        self.vertices.clear();
        self.parts_drawn = 0;
    }

    fn draw_part(&mut self, part: &PartView<'_>) {
        let outline: Vec<Vec2> = part.points().collect();
        let style = part.style();

        if outline.len() >= 3 {
            let rim = part.base_radius() * RIM_FACTOR;
            self.vertices.extend(shapes::soft_blob(&outline, style, rim));
        } else {
            let center = if outline.is_empty() {
                part.center()
            } else {
                outline.iter().copied().sum::<Vec2>() / outline.len() as f32
            };
            self.vertices.extend(shapes::circle(
                center,
                part.base_radius() * 0.5,
                style.base,
                FALLBACK_SEGMENTS,
            ));
        }

        if self.debug {
            for (a, b) in part.edges() {
                self.vertices.extend(shapes::segment(a, b, 0.5, colors::CONSTRAINT));
            }
            for p in &outline {
                self.vertices.extend(shapes::circle(*p, 0.8, colors::PARTICLE, 6));
            }
        }
        self.parts_drawn += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::build_body_part;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn chest(count: usize) -> BodyPart {
        let mut rng = Pcg32::seed_from_u64(11);
        build_body_part(PartId::Chest, Vec2::new(10.0, 25.0), 12.0, count, 1.0, &mut rng).unwrap()
    }

    #[test]
    fn test_facing_mirrors_x() {
        let part = chest(4);
        let right = PartView::new(&part, Vec2::new(100.0, 100.0), Facing::Right);
        let left = PartView::new(&part, Vec2::new(100.0, 100.0), Facing::Left);
        assert_eq!(right.center(), Vec2::new(110.0, 125.0));
        assert_eq!(left.center(), Vec2::new(90.0, 125.0));
        for (r, l) in right.points().zip(left.points()) {
            assert!((r.x - 100.0 + (l.x - 100.0)).abs() < 1e-4);
            assert_eq!(r.y, l.y);
        }
    }

    #[test]
    fn test_edges_follow_ring() {
        let part = chest(5);
        let view = PartView::new(&part, Vec2::ZERO, Facing::Right);
        assert_eq!(view.edges().count(), 5);
    }

    #[test]
    fn test_mesh_adapter_frame() {
        let part = chest(6);
        let mut adapter = MeshAdapter::new();
        adapter.begin(Vec2::ZERO, Facing::Right);
        adapter.draw_part(&PartView::new(&part, Vec2::ZERO, Facing::Right));
        adapter.finish();

        assert_eq!(adapter.parts_drawn(), 1);
        assert!(!adapter.vertices().is_empty());
        assert_eq!(adapter.as_floats().len(), adapter.vertices().len() * 6);

        // A new frame starts clean
        adapter.begin(Vec2::ZERO, Facing::Right);
        assert!(adapter.vertices().is_empty());
    }

    #[test]
    fn test_small_ring_falls_back_to_circle() {
        let part = chest(2);
        let mut adapter = MeshAdapter::new();
        adapter.draw_part(&PartView::new(&part, Vec2::ZERO, Facing::Right));
        assert_eq!(adapter.vertices().len(), FALLBACK_SEGMENTS as usize * 3);
    }

    #[test]
    fn test_debug_overlay_adds_geometry() {
        let part = chest(6);
        let mut plain = MeshAdapter::new();
        let mut debug = MeshAdapter::new().with_debug(true);
        let view = PartView::new(&part, Vec2::ZERO, Facing::Right);
        plain.draw_part(&view);
        debug.draw_part(&view);
        assert!(debug.vertices().len() > plain.vertices().len());
    }
}
