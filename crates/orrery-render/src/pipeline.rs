//! Uniform layouts and the render pipeline builder shared by every scene pipeline.
//!
//! Bind group convention:
//!
//! | Group | Contents                              | Rate          |
//! |-------|---------------------------------------|---------------|
//! | 0     | [`FrameUniform`]                      | once a frame  |
//! | 1     | [`ObjectUniform`]                     | per drawable  |
//! | 2     | texture + sampler (`TextureManager`)  | per drawable  |

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::buffer::{BufferUploader, DrawHandle, uniform_binding_size};
use crate::depth::DepthBuffer;

/// Phong light description shared by every lit draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.5),
            specular: Vec3::splat(1.0),
        }
    }
}

/// Per-frame uniform at `@group(0) @binding(0)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// View matrix with its translation removed, for the background sphere.
    pub background_view: [[f32; 4]; 4],
    pub view_pos: [f32; 4],
    pub light_position: [f32; 4],
    pub light_ambient: [f32; 4],
    pub light_diffuse: [f32; 4],
    pub light_specular: [f32; 4],
}

static_assertions::const_assert_eq!(std::mem::size_of::<FrameUniform>(), 272);

impl FrameUniform {
    pub fn new(
        view: Mat4,
        projection: Mat4,
        background_view: Mat4,
        view_pos: Vec3,
        light: &Light,
    ) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            background_view: background_view.to_cols_array_2d(),
            view_pos: view_pos.extend(1.0).to_array(),
            light_position: light.position.extend(1.0).to_array(),
            light_ambient: light.ambient.extend(0.0).to_array(),
            light_diffuse: light.diffuse.extend(0.0).to_array(),
            light_specular: light.specular.extend(0.0).to_array(),
        }
    }
}

/// Per-drawable uniform at `@group(1) @binding(0)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Tint for unlit draws (sun, orbit rings).
    pub color: [f32; 4],
    /// `xyz` = material specular, `w` = shininess.
    pub material: [f32; 4],
}

static_assertions::const_assert_eq!(std::mem::size_of::<ObjectUniform>(), 96);

impl ObjectUniform {
    pub fn new(model: Mat4, color: Vec3, specular: Vec3, shininess: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: color.extend(1.0).to_array(),
            material: specular.extend(shininess).to_array(),
        }
    }

    /// Unlit draw with a tint and no material.
    pub fn unlit(model: Mat4, color: Vec3) -> Self {
        Self::new(model, color, Vec3::ZERO, 0.0)
    }
}

/// Bind group layouts for groups 0 and 1. Group 2 belongs to the texture manager.
pub struct SceneLayouts {
    pub frame: wgpu::BindGroupLayout,
    pub object: wgpu::BindGroupLayout,
}

fn uniform_entry<T>() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: uniform_binding_size::<T>(),
        },
        count: None,
    }
}

impl SceneLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let frame = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame-bgl"),
            entries: &[uniform_entry::<FrameUniform>()],
        });
        let object = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object-bgl"),
            entries: &[uniform_entry::<ObjectUniform>()],
        });
        Self { frame, object }
    }
}

/// A uniform buffer together with the bind group exposing it.
pub struct UniformSlot<T> {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Pod> UniformSlot<T> {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        initial: &T,
    ) -> Self {
        let buffer = BufferUploader::new(device).create_uniform_buffer(label, initial);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self {
            buffer,
            bind_group,
            _marker: std::marker::PhantomData,
        }
    }

    /// Overwrite the buffer contents. Takes effect at the next submit.
    pub fn write(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }
}

/// How a pipeline interacts with the depth buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthMode {
    /// Reverse-Z test and write.
    TestAndWrite,
    /// Always passes and never writes, so the draw neither occludes nor is occluded.
    Disabled,
}

impl DepthMode {
    fn state(self) -> wgpu::DepthStencilState {
        let (depth_write_enabled, depth_compare) = match self {
            DepthMode::TestAndWrite => (true, DepthBuffer::COMPARE_FUNCTION),
            DepthMode::Disabled => (false, wgpu::CompareFunction::Always),
        };
        wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

/// Everything that differs between the scene pipelines.
pub struct PipelineDescriptor<'a> {
    pub label: &'a str,
    pub shader: &'a wgpu::ShaderModule,
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub vertex_layout: wgpu::VertexBufferLayout<'static>,
    pub topology: wgpu::PrimitiveTopology,
    pub depth: DepthMode,
    pub surface_format: wgpu::TextureFormat,
}

/// Build a render pipeline with `vs_main`/`fs_main` entry points and no culling.
///
/// Spheres are drawn without culling: the background is viewed from inside.
pub fn build_pipeline(device: &wgpu::Device, desc: PipelineDescriptor<'_>) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{}-layout", desc.label)),
        bind_group_layouts: desc.bind_group_layouts,
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: &[desc.vertex_layout],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(desc.depth.state()),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

/// Draw `mesh` with `pipeline`, binding the frame, object and optional texture groups.
///
/// Returns `false` when the mesh handle is null and nothing was recorded.
pub fn draw_object(
    render_pass: &mut wgpu::RenderPass<'_>,
    pipeline: &wgpu::RenderPipeline,
    frame: &wgpu::BindGroup,
    object: &wgpu::BindGroup,
    texture: Option<&wgpu::BindGroup>,
    mesh: &DrawHandle,
) -> bool {
    if mesh.is_null() {
        return false;
    }
    render_pass.set_pipeline(pipeline);
    render_pass.set_bind_group(0, frame, &[]);
    render_pass.set_bind_group(1, object, &[]);
    if let Some(texture) = texture {
        render_pass.set_bind_group(2, texture, &[]);
    }
    mesh.draw(render_pass)
}

/// Prepend the group 0 and group 1 WGSL declarations to a shader body.
macro_rules! scene_shader {
    ($body:literal) => {
        concat!(
            r#"
struct Frame {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    background_view: mat4x4<f32>,
    view_pos: vec4<f32>,
    light_position: vec4<f32>,
    light_ambient: vec4<f32>,
    light_diffuse: vec4<f32>,
    light_specular: vec4<f32>,
};

struct Object {
    model: mat4x4<f32>,
    color: vec4<f32>,
    material: vec4<f32>,
};

@group(0) @binding(0) var<uniform> frame: Frame;
@group(1) @binding(0) var<uniform> object: Object;
"#,
            $body
        )
    };
}
pub(crate) use scene_shader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_uniform_default_light() {
        let light = Light::default();
        let u = FrameUniform::new(
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Vec3::new(1.0, 2.0, 3.0),
            &light,
        );
        assert_eq!(u.view_pos, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(u.light_position, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(u.light_ambient[..3], [0.2, 0.2, 0.2]);
        assert_eq!(u.light_diffuse[..3], [0.5, 0.5, 0.5]);
        assert_eq!(u.light_specular[..3], [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_object_uniform_packs_material() {
        let u = ObjectUniform::new(
            Mat4::from_translation(Vec3::X),
            Vec3::ONE,
            Vec3::splat(0.5),
            64.0,
        );
        assert_eq!(u.material, [0.5, 0.5, 0.5, 64.0]);
        assert_eq!(u.color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(u.model[3], [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_scene_shader_prefix() {
        const SRC: &str = scene_shader!("fn body() {}");
        assert!(SRC.contains("var<uniform> frame: Frame;"));
        assert!(SRC.contains("var<uniform> object: Object;"));
        assert!(SRC.ends_with("fn body() {}"));
    }

    #[test]
    fn test_uniform_slots_match_layouts() {
        let Some((device, queue)) = crate::gpu::create_test_device_queue() else {
            return;
        };
        let layouts = SceneLayouts::new(&device);
        let frame = UniformSlot::new(&device, &layouts.frame, "frame", &FrameUniform::zeroed());
        let object = UniformSlot::new(
            &device,
            &layouts.object,
            "object",
            &ObjectUniform::unlit(Mat4::IDENTITY, Vec3::ONE),
        );
        assert_eq!(frame.buffer.size(), std::mem::size_of::<FrameUniform>() as u64);
        assert_eq!(object.buffer.size(), std::mem::size_of::<ObjectUniform>() as u64);

        object.write(&queue, &ObjectUniform::unlit(Mat4::ZERO, Vec3::ZERO));
        queue.submit([]);
    }

    #[test]
    fn test_depth_modes() {
        let on = DepthMode::TestAndWrite.state();
        assert!(on.depth_write_enabled);
        assert_eq!(on.depth_compare, wgpu::CompareFunction::GreaterEqual);

        let off = DepthMode::Disabled.state();
        assert!(!off.depth_write_enabled);
        assert_eq!(off.depth_compare, wgpu::CompareFunction::Always);
        assert_eq!(off.format, DepthBuffer::FORMAT);
    }
}
