//! Fatal application errors.

use orrery_render::{RenderContextError, ShaderError, SurfaceError};

/// Failures that end the run. Recoverable problems (missing textures, a timed-out
/// frame) are logged where they happen and never reach this type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    RenderContext(#[from] RenderContextError),

    #[error("shader setup failed: {0}")]
    Shader(#[from] ShaderError),

    #[error("presentation failed: {0}")]
    Surface(#[from] SurfaceError),
}
