//! Phong-lit, textured pipeline for the planets.

use crate::pipeline::{DepthMode, PipelineDescriptor, SceneLayouts, build_pipeline, scene_shader};

pub struct PlanetPipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl PlanetPipeline {
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
                label: "planet-pipeline",
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

/// Ambient + diffuse + specular against the point light, modulated by the surface texture.
pub const PLANET_SHADER_SOURCE: &str = scene_shader!(
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
    @location(0) world_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = object.model * vec4<f32>(in.position, 1.0);
    out.clip_position = frame.projection * frame.view * world;
    out.world_position = world.xyz;
    out.normal = normalize((object.model * vec4<f32>(in.normal, 0.0)).xyz);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let albedo = textureSample(t_diffuse, s_diffuse, in.uv).rgb;
    let n = normalize(in.normal);
    let to_light = normalize(frame.light_position.xyz - in.world_position);
    let to_view = normalize(frame.view_pos.xyz - in.world_position);

    let ambient = frame.light_ambient.rgb * albedo;
    let diffuse = frame.light_diffuse.rgb * max(dot(n, to_light), 0.0) * albedo;
    let reflected = reflect(-to_light, n);
    let shine = pow(max(dot(to_view, reflected), 0.0), object.material.w);
    let specular = frame.light_specular.rgb * shine * object.material.xyz;

    return vec4<f32>(ambient + diffuse + specular, 1.0);
}
"#
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureManager;

    #[test]
    fn test_shader_declares_entry_points() {
        assert!(PLANET_SHADER_SOURCE.contains("fn vs_main"));
        assert!(PLANET_SHADER_SOURCE.contains("fn fs_main"));
        assert!(PLANET_SHADER_SOURCE.contains("@group(2) @binding(1)"));
    }

    #[test]
    fn test_pipeline_creation() {
        let Some((device, queue)) = crate::gpu::create_test_device_queue() else {
            return;
        };
        let layouts = SceneLayouts::new(&device);
        let textures = TextureManager::new(&device, &queue);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("planet"),
            source: wgpu::ShaderSource::Wgsl(PLANET_SHADER_SOURCE.into()),
        });
        let _pipeline = PlanetPipeline::new(
            &device,
            &shader,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            &layouts,
            textures.bind_group_layout(),
        );
    }
}
