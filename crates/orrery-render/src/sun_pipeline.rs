//! Unlit textured pipeline for the sun. The sun is the light source, so it is not shaded.

use crate::pipeline::{DepthMode, PipelineDescriptor, SceneLayouts, build_pipeline, scene_shader};

pub struct SunPipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl SunPipeline {
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
                label: "sun-pipeline",
                shader,
                bind_group_layouts: &[&layouts.frame, &layouts.object, texture_layout],
                vertex_layout: orrery_mesh::VERTEX_LAYOUT,
                topology: wgpu::PrimitiveTopology::TriangleList,
                depth: DepthMode::TestAndWrite,
                surface_format,
            },
        );
        Self { pipeline }
    }
}

pub const SUN_SHADER_SOURCE: &str = scene_shader!(
    r#"
@group(2) @binding(0) var t_diffuse: texture_2d<f32>;
@group(2) @binding(1) var s_diffuse: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = frame.projection * frame.view * object.model * vec4<f32>(in.position, 1.0);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(t_diffuse, s_diffuse, in.uv);
    return vec4<f32>(texel.rgb * object.color.rgb, 1.0);
}
"#
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureManager;

    #[test]
    fn test_pipeline_creation() {
        let Some((device, queue)) = crate::gpu::create_test_device_queue() else {
            return;
        };
        let layouts = SceneLayouts::new(&device);
        let textures = TextureManager::new(&device, &queue);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sun"),
            source: wgpu::ShaderSource::Wgsl(SUN_SHADER_SOURCE.into()),
        });
        let _pipeline = SunPipeline::new(
            &device,
            &shader,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            &layouts,
            textures.bind_group_layout(),
        );
    }
}
