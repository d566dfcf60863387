//! Vertex formats and their `wgpu::VertexBufferLayout`s.
//!
//! | Format         | Location | Offset | Attribute |
//! |----------------|----------|--------|-----------|
//! | [`Vertex`]       | 0        | 0      | position  |
//! |                | 1        | 12     | normal    |
//! |                | 2        | 24     | uv        |
//! | [`CircleVertex`] | 0        | 0      | position  |

use std::mem;

use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// A lit, textured vertex. 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Unit outward normal for sphere vertices, zero elsewhere.
    pub normal: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(Vertex, [u8; 32]);

/// A 2D point on an orbit ring, lifted into the XZ plane by the line shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CircleVertex {
    pub position: [f32; 2],
}

static_assertions::assert_eq_size!(CircleVertex, [u8; 8]);

pub const VERTEX_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 12,
        shader_location: 1,
    },
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: 24,
        shader_location: 2,
    },
];

/// Layout shared by every sphere pipeline (planets, sun, background).
pub const VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<Vertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &VERTEX_ATTRIBUTES,
};

pub const CIRCLE_VERTEX_ATTRIBUTES: [VertexAttribute; 1] = [VertexAttribute {
    format: VertexFormat::Float32x2,
    offset: 0,
    shader_location: 0,
}];

/// Position-only layout for orbit rings.
pub const CIRCLE_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<CircleVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &CIRCLE_VERTEX_ATTRIBUTES,
};

const _: () = assert!(VERTEX_ATTRIBUTES[1].offset == mem::offset_of!(Vertex, normal) as u64);
const _: () = assert!(VERTEX_ATTRIBUTES[2].offset == mem::offset_of!(Vertex, uv) as u64);
const _: () = assert!(
    VERTEX_ATTRIBUTES[2].offset + 8 <= mem::size_of::<Vertex>() as u64,
    "Last attribute exceeds vertex stride"
);
