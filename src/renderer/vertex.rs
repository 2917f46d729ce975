//! Vertex and instance types for 3D rendering

use bytemuck::{Pod, Zeroable};

/// Mesh vertex with position and face normal
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Per-instance placement: translation, uniform scale, Y rotation, colour
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Instance {
    pub offset: [f32; 3],
    pub scale: f32,
    pub color: [f32; 4],
    pub rotation: f32,
}

impl Instance {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    offset: 16,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: 32,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const SOIL_TOP: [f32; 4] = [0.55, 0.4, 0.25, 1.0];
    pub const SOIL_DEEP: [f32; 4] = [0.25, 0.16, 0.1, 1.0];
    pub const SOIL_TOP_CONTRAST: [f32; 4] = [0.9, 0.9, 0.9, 1.0];
    pub const SOIL_DEEP_CONTRAST: [f32; 4] = [0.35, 0.35, 0.35, 1.0];
    pub const GOLD: [f32; 4] = [1.0, 0.8, 0.1, 1.0];
    pub const DIRT: [f32; 3] = [0.45, 0.32, 0.2];
    pub const BACKGROUND: [f32; 4] = [0.53, 0.75, 0.92, 1.0];
}
