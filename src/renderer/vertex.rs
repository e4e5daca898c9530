//! Vertex type produced by the mesh adapter

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Screen-space point with an RGBA color; 24 bytes, tightly packed
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// Shader inputs: `@location(0)` position, `@location(1)` color
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn at(point: Vec2, color: [f32; 4]) -> Self {
        Self::new(point.x, point.y, color)
    }

    pub fn point(&self) -> Vec2 {
        Vec2::from_array(self.position)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Fixed colors for debug overlays
pub mod colors {
    pub const PARTICLE: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
    pub const CONSTRAINT: [f32; 4] = [0.3, 0.9, 0.5, 0.8];
}
