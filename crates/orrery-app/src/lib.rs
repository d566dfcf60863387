//! The orrery application: window and event handling, per-frame driving and scene drawing.

pub mod app;
pub mod controls;
pub mod error;
pub mod frame_timer;
pub mod renderer;

pub use app::{AppState, run, window_attributes_from_config};
pub use controls::{FrameRequests, process_input};
pub use error::AppError;
pub use frame_timer::FrameTimer;
pub use renderer::{DrawKind, SceneRenderer, draw_order, record_in_order};
