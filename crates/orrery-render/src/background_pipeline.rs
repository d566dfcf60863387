//! Star-field background: a unit sphere drawn around the camera with the view translation removed.
//!
//! Depth testing and depth writes are both off, so the background is drawn first and
//! everything after it lands on top.

use crate::pipeline::{DepthMode, PipelineDescriptor, SceneLayouts, build_pipeline, scene_shader};

pub struct BackgroundPipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl BackgroundPipeline {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        layouts: &SceneLayouts,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let pipeline = build_pipeline(
            device,
            PipelineDescriptor {
                label: "background-pipeline",
                shader,
                bind_group_layouts: &[&layouts.frame, &layouts.object, texture_layout],
                vertex_layout: orrery_mesh::VERTEX_LAYOUT,
                topology: wgpu::PrimitiveTopology::TriangleList,
                depth: DepthMode::Disabled,
                surface_format,
            },
        );
        Self { pipeline }
    }
}

pub const BACKGROUND_SHADER_SOURCE: &str = scene_shader!(
    r#"
@group(2) @binding(0) var t_stars: texture_2d<f32>;
@group(2) @binding(1) var s_stars: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) dir: vec3<f32>,
};

const PI: f32 = 3.14159265358979;

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = object.model * vec4<f32>(in.position, 1.0);
    out.clip_position = frame.projection * frame.background_view * world;
    out.dir = in.position;
    return out;
}

// Longitude from atan2, latitude from acos, north pole at v = 0.
fn equirect_uv(dir: vec3<f32>) -> vec2<f32> {
    let d = normalize(dir);
    return vec2<f32>(atan2(d.z, d.x) / (2.0 * PI) + 0.5, acos(clamp(d.y, -1.0, 1.0)) / PI);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let uv = equirect_uv(in.dir);
    // u wraps from 1 to 0 at the seam; take gradients from a copy that is continuous there.
    let u_wrapped = fract(uv.x + 0.5) - 0.5;
    let dx = vec2<f32>(select(dpdx(uv.x), dpdx(u_wrapped), abs(dpdx(u_wrapped)) < abs(dpdx(uv.x))), dpdx(uv.y));
    let dy = vec2<f32>(select(dpdy(uv.x), dpdy(u_wrapped), abs(dpdy(u_wrapped)) < abs(dpdy(uv.x))), dpdy(uv.y));
    return vec4<f32>(textureSampleGrad(t_stars, s_stars, uv, dx, dy).rgb, 1.0);
}
"#
);
