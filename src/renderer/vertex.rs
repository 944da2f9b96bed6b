//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in playfield space (or clip space once mapped)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    /// Buffer layout matching `VertexInput` in the shader
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.04, 0.12, 1.0];
    pub const BACKGROUND_BOTTOM: [f32; 4] = [0.0, 0.0, 0.02, 1.0];
    pub const CRAFT_BODY: [f32; 4] = [0.86, 0.2, 0.2, 1.0];
    pub const CRAFT_COCKPIT: [f32; 4] = [0.2, 0.4, 0.86, 1.0];
    pub const CRAFT_BODY_FLASH: [f32; 4] = [1.0, 0.78, 0.78, 1.0];
    pub const CRAFT_COCKPIT_FLASH: [f32; 4] = [0.78, 0.78, 1.0, 1.0];
    pub const FLAMES: [[f32; 4]; 3] = [
        [1.0, 0.4, 0.2, 1.0],
        [1.0, 0.78, 0.2, 1.0],
        [0.4, 0.6, 1.0, 1.0],
    ];
    pub const EMITTER: [f32; 4] = [1.0, 1.0, 0.78, 1.0];
    pub const COIN_SHINE: [f32; 4] = [1.0, 1.0, 0.78, 1.0];
    pub const LETTERBOX: wgpu::Color = wgpu::Color::BLACK;
}
