//! WebGPU pipeline for `MeshAdapter` output
//!
//! The host owns the device, surface and render pass; this only builds the
//! pipeline, uploads a frame's vertices and records the draw.

use glam::Vec2;
use wgpu::util::DeviceExt;

use super::adapter::MeshAdapter;
use super::vertex::Vertex;

pub const MESH_SHADER: &str = include_str!("mesh.wgsl");

/// Pixel coordinates (+y down) to normalized device coordinates (+y up)
#[inline]
pub fn screen_to_ndc(point: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(point.x / viewport.x * 2.0 - 1.0, 1.0 - point.y / viewport.y * 2.0)
}

/// Convert a frame's vertices for a `width` x `height` viewport
pub fn to_ndc(vertices: &[Vertex], width: u32, height: u32) -> Vec<Vertex> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let viewport = Vec2::new(width as f32, height as f32);
    vertices
        .iter()
        .map(|v| Vertex::at(screen_to_ndc(v.point(), viewport), v.color))
        .collect()
}

/// Render pipeline plus the vertex buffer for the latest frame
pub struct MeshPipeline {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
}

impl MeshPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("jiggle_mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(MESH_SHADER.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("jiggle_mesh_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("jiggle_mesh_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            vertex_buffer: None,
            vertex_count: 0,
        }
    }

    /// Upload `mesh` for drawing into a `width` x `height` target
    pub fn prepare(&mut self, device: &wgpu::Device, mesh: &MeshAdapter, width: u32, height: u32) {
        let vertices = to_ndc(mesh.vertices(), width, height);
        if vertices.is_empty() {
            self.vertex_buffer = None;
            self.vertex_count = 0;
            return;
        }
        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("jiggle_mesh_vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.vertex_count = vertices.len() as u32;
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Record the draw into a pass the host has begun
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(buffer) = &self.vertex_buffer else {
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}
