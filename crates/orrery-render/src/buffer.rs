//! Upload of generated meshes into GPU-resident vertex and index buffers.

use std::num::NonZeroU64;

use bytemuck::Pod;
use orrery_mesh::{CIRCLE_VERTEX_LAYOUT, CircleVertex, Mesh, VERTEX_LAYOUT, Vertex};
use wgpu::util::DeviceExt;

/// A vertex type with a fixed buffer layout the pipelines agree on.
pub trait GpuVertex: Pod {
    const LAYOUT: wgpu::VertexBufferLayout<'static>;
}

impl GpuVertex for Vertex {
    const LAYOUT: wgpu::VertexBufferLayout<'static> = VERTEX_LAYOUT;
}

impl GpuVertex for CircleVertex {
    const LAYOUT: wgpu::VertexBufferLayout<'static> = CIRCLE_VERTEX_LAYOUT;
}

/// Vertex and index buffers of one uploaded mesh.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub vertex_layout: wgpu::VertexBufferLayout<'static>,
}

/// Draw-ready result of an upload.
///
/// A null handle carries no buffers and an index count of 0; drawing it is a no-op.
pub struct DrawHandle {
    buffers: Option<MeshBuffer>,
}

impl DrawHandle {
    /// The handle returned for empty meshes.
    #[must_use]
    pub const fn null() -> Self {
        Self { buffers: None }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.buffers.is_none()
    }

    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.buffers.as_ref().map_or(0, |b| b.index_count)
    }

    #[must_use]
    pub fn buffers(&self) -> Option<&MeshBuffer> {
        self.buffers.as_ref()
    }

    /// Bind the buffers and issue an indexed draw. Returns `false` without
    /// touching the pass when there is nothing to draw.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(buffers) = &self.buffers else {
            return false;
        };
        if buffers.index_count == 0 {
            return false;
        }
        render_pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
        render_pass.set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..buffers.index_count, 0, 0..1);
        true
    }
}

/// Creates static GPU buffers from generated meshes.
pub struct BufferUploader<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferUploader<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Upload `mesh` and return its draw handle.
    ///
    /// Takes the mesh by value: the CPU-side vertices and indices are released
    /// when this returns, whichever branch is taken. Empty meshes, meshes with
    /// out-of-range indices, and meshes whose index count overflows `u32`
    /// produce [`DrawHandle::null`].
    pub fn upload<V: GpuVertex>(&self, label: &str, mesh: Mesh<V>) -> DrawHandle {
        if mesh.is_empty() {
            log::debug!("Mesh '{label}' is empty, nothing to upload");
            return DrawHandle::null();
        }
        if !mesh.indices_in_bounds() {
            log::warn!("Mesh '{label}' has out-of-range indices, skipping upload");
            return DrawHandle::null();
        }
        let Ok(index_count) = u32::try_from(mesh.index_count()) else {
            log::warn!("Mesh '{label}' has too many indices, skipping upload");
            return DrawHandle::null();
        };

        let vertex_buffer = self.create_vertex_buffer(
            &format!("{label}-vertices"),
            bytemuck::cast_slice(&mesh.vertices),
        );
        let index_buffer = self.create_index_buffer(&format!("{label}-indices"), &mesh.indices);
        log::debug!(
            "Uploaded mesh '{label}' ({} vertices, {index_count} indices)",
            mesh.vertex_count()
        );

        DrawHandle {
            buffers: Some(MeshBuffer {
                vertex_buffer,
                index_buffer,
                index_count,
                vertex_layout: V::LAYOUT,
            }),
        }
    }

    /// Create an immutable vertex buffer from raw bytes.
    pub fn create_vertex_buffer(&self, label: &str, data: &[u8]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data,
                usage: wgpu::BufferUsages::VERTEX,
            })
    }

    /// Create an immutable u32 index buffer.
    pub fn create_index_buffer(&self, label: &str, data: &[u32]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::INDEX,
            })
    }

    /// Create a uniform buffer initialised with `value`, writable every frame.
    pub fn create_uniform_buffer<T: Pod>(&self, label: &str, value: &T) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::bytes_of(value),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
    }
}

/// Minimum binding size for a uniform of type `T`.
pub fn uniform_binding_size<T>() -> Option<NonZeroU64> {
    NonZeroU64::new(std::mem::size_of::<T>() as u64)
}
