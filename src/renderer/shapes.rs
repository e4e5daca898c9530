//! Shape generation for soft-body parts

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::PartStyle;

/// Highlight blob size relative to the part outline
const HIGHLIGHT_SCALE: f32 = 0.35;
/// Highlight offset toward the upper-left light, relative to part radius
const HIGHLIGHT_OFFSET: Vec2 = Vec2::new(-0.3, -0.35);

/// One Chaikin corner-cutting pass over a closed outline
pub fn smooth_outline(points: &[Vec2]) -> Vec<Vec2> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let mut smoothed = Vec::with_capacity(n * 2);
    for i in 0..n {
        let p0 = points[i];
        let p1 = points[(i + 1) % n];
        smoothed.push(p0.lerp(p1, 0.25));
        smoothed.push(p0.lerp(p1, 0.75));
    }
    smoothed
}

/// Append a triangle fan from `center` around a closed outline
pub fn polygon_fan(center: Vec2, outline: &[Vec2], color: [f32; 4], out: &mut Vec<Vertex>) {
    let n = outline.len();
    if n < 2 {
        return;
    }
    out.reserve(n * 3);
    for i in 0..n {
        let a = outline[i];
        let b = outline[(i + 1) % n];
        out.push(Vertex::at(center, color));
        out.push(Vertex::at(a, color));
        out.push(Vertex::at(b, color));
    }
}

/// Generate a shaded blob: shadow rim, base fill, highlight
pub fn soft_blob(outline: &[Vec2], style: &PartStyle, rim_width: f32) -> Vec<Vertex> {
    if outline.len() < 3 {
        return Vec::new();
    }
    let smoothed = smooth_outline(outline);
    let center = smoothed.iter().copied().sum::<Vec2>() / smoothed.len() as f32;
    let radius = smoothed
        .iter()
        .map(|p| p.distance(center))
        .fold(0.0, f32::max);

    let mut vertices = Vec::with_capacity(smoothed.len() * 9);

    // Shadow rim: outline pushed outward
    let rim: Vec<Vec2> = smoothed
        .iter()
        .map(|p| *p + (*p - center).normalize_or_zero() * rim_width)
        .collect();
    polygon_fan(center, &rim, style.shadow, &mut vertices);

    // Base fill
    polygon_fan(center, &smoothed, style.base, &mut vertices);

    // Highlight: shrunken copy offset toward the light
    let highlight_center = center + HIGHLIGHT_OFFSET * radius;
    let highlight: Vec<Vec2> = smoothed
        .iter()
        .map(|p| highlight_center + (*p - center) * HIGHLIGHT_SCALE)
        .collect();
    polygon_fan(highlight_center, &highlight, style.highlight, &mut vertices);

    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let outline: Vec<Vec2> = (0..segments)
        .map(|i| {
            let theta = (i as f32 / segments as f32) * 2.0 * PI;
            center + Vec2::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect();
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    polygon_fan(center, &outline, color, &mut vertices);
    vertices
}

/// Generate a quad between two points (two triangles)
pub fn segment(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a1 = a + perp;
    let a2 = a - perp;
    let b1 = b + perp;
    let b2 = b - perp;

    vec![
        Vertex::at(a1, color),
        Vertex::at(a2, color),
        Vertex::at(b1, color),
        Vertex::at(b1, color),
        Vertex::at(a2, color),
        Vertex::at(b2, color),
    ]
}
