//! Line-list pipeline for the orbit rings.
//!
//! Ring vertices are 2D points in the XZ plane; the shader lifts `(x, y)` to `(x, 0, y)`.

use crate::pipeline::{DepthMode, PipelineDescriptor, SceneLayouts, build_pipeline, scene_shader};

pub struct OrbitPipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl OrbitPipeline {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        layouts: &SceneLayouts,
    ) -> Self {
        let pipeline = build_pipeline(
            device,
            PipelineDescriptor {
                label: "orbit-pipeline",
                shader,
                bind_group_layouts: &[&layouts.frame, &layouts.object],
                vertex_layout: orrery_mesh::CIRCLE_VERTEX_LAYOUT,
                topology: wgpu::PrimitiveTopology::LineList,
                depth: DepthMode::TestAndWrite,
                surface_format,
            },
        );
        Self { pipeline }
    }
}

pub const ORBIT_SHADER_SOURCE: &str = scene_shader!(
    r#"
@vertex
fn vs_main(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {
    let local = vec4<f32>(position.x, 0.0, position.y, 1.0);
    return frame.projection * frame.view * object.model * local;
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(object.color.rgb, 1.0);
}
"#
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_lifts_into_xz_plane() {
        assert!(ORBIT_SHADER_SOURCE.contains("vec4<f32>(position.x, 0.0, position.y, 1.0)"));
    }

    #[test]
    fn test_pipeline_creation() {
        let Some((device, _queue)) = crate::gpu::create_test_device_queue() else {
            return;
        };
        let layouts = SceneLayouts::new(&device);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("orbit"),
            source: wgpu::ShaderSource::Wgsl(ORBIT_SHADER_SOURCE.into()),
        });
        let _pipeline = OrbitPipeline::new(
            &device,
            &shader,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            &layouts,
        );
    }
}
