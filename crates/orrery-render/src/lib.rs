//! wgpu rendering for the orrery: surface management, mesh upload, textures, and scene pipelines.

pub mod buffer;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub mod shader;
pub mod texture;

pub mod background_pipeline;
pub mod orbit_pipeline;
pub mod planet_pipeline;
pub mod sun_pipeline;

pub use background_pipeline::{BACKGROUND_SHADER_SOURCE, BackgroundPipeline};
pub use buffer::{BufferUploader, DrawHandle, GpuVertex, MeshBuffer, uniform_binding_size};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use orbit_pipeline::{ORBIT_SHADER_SOURCE, OrbitPipeline};
pub use pass::{CLEAR_RED, DepthAttachmentConfig, FrameEncoder, RenderPassBuilder};
pub use pipeline::{
    DepthMode, FrameUniform, Light, ObjectUniform, SceneLayouts, UniformSlot, draw_object,
};
pub use planet_pipeline::{PLANET_SHADER_SOURCE, PlanetPipeline};
pub use shader::{ShaderError, ShaderLibrary};
pub use sun_pipeline::{SUN_SHADER_SOURCE, SunPipeline};
pub use texture::{ManagedTexture, TextureError, TextureManager};
