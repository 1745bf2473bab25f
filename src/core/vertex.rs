//! Quad vertex type
//!
//! The single interleaved vertex format used by every batch.

use bytemuck::{Pod, Zeroable};

/// Vertex with 2D position, RGBA color, and texture coordinate.
///
/// Eight floats, interleaved as `x, y, r, g, b, a, u, v`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl QuadVertex {
    /// Number of float attributes per vertex.
    pub const ATTRIBUTES: usize = 8;

    pub const fn new(position: [f32; 2], color: [f32; 4], uv: [f32; 2]) -> Self {
        Self {
            position,
            color,
            uv,
        }
    }

    /// The vertex as its eight raw attributes.
    pub fn attributes(&self) -> [f32; 8] {
        [
            self.position[0],
            self.position[1],
            self.color[0],
            self.color[1],
            self.color[2],
            self.color[3],
            self.uv[0],
            self.uv[1],
        ]
    }

    /// Get the vertex buffer layout for this vertex type.
    pub const fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // uv
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}
