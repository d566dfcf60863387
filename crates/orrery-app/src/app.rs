//! Window creation and event handling via winit.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`] and drives one frame per
//! `RedrawRequested`: advance the clock, apply input, render, request the next redraw.

use std::sync::Arc;

use orrery_config::Config;
use orrery_input::{InputMap, KeyboardState, MouseState};
use orrery_render::{RenderContext, SurfaceError, init_render_context_blocking};
use orrery_scene::SceneState;
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::controls::process_input;
use crate::error::AppError;
use crate::frame_timer::FrameTimer;
use crate::renderer::SceneRenderer;

/// Window attributes for the configured title, size and fullscreen mode.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Everything the event loop owns.
pub struct AppState {
    config: Config,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    renderer: Option<SceneRenderer>,
    scene: SceneState,
    input_map: InputMap,
    keyboard: KeyboardState,
    mouse: MouseState,
    timer: FrameTimer,
    fatal: Option<AppError>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let mut input_map = InputMap::default();
        for err in input_map.apply_overrides(&config.input.keybindings) {
            warn!("Ignoring key binding: {err}");
        }
        Self {
            scene: SceneState::from_config(&config),
            mouse: MouseState::new().with_invert_y(config.input.invert_y),
            input_map,
            keyboard: KeyboardState::new(),
            timer: FrameTimer::new(),
            window: None,
            gpu: None,
            renderer: None,
            fatal: None,
            config,
        }
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window = Arc::new(event_loop.create_window(window_attributes_from_config(&self.config))?);
        let size = window.inner_size();
        info!("Window created: {}x{}", size.width, size.height);

        let gpu = init_render_context_blocking(Arc::clone(&window), self.config.window.vsync)?;
        let (width, height) = gpu.size();
        self.scene.resize(width, height);
        let renderer = SceneRenderer::new(&gpu, &self.config.scene, &self.scene)?;

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let (Some(gpu), Some(renderer)) = (&mut self.gpu, &mut self.renderer) {
            gpu.resize(width, height);
            let (w, h) = gpu.size();
            renderer.resize(&gpu.device, w, h);
        }
        self.scene.resize(width, height);
        debug!("Resized to {width}x{height}");
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let delta_time = self.timer.tick();
        self.scene.advance(delta_time);

        let requests = process_input(&self.input_map, &self.keyboard, &mut self.scene, delta_time);
        let look = self.mouse.take_look_offset();
        self.scene.look(look.x, look.y);
        self.keyboard.clear_transients();

        if requests.print_camera_position {
            let line = self.scene.camera_position_line();
            info!("Camera position: {line}");
            println!("{line}");
        }
        if let (Some(captured), Some(window)) = (requests.cursor_capture, &self.window) {
            self.mouse.set_captured(window, captured);
        }
        if requests.quit {
            info!("Quit requested, shutting down");
            event_loop.exit();
            return;
        }

        let (width, height) = self.scene.viewport();
        if width > 0
            && height > 0
            && let (Some(gpu), Some(renderer)) = (&self.gpu, &mut self.renderer)
        {
            match renderer.render(gpu, &self.scene) {
                Ok(()) => {}
                Err(SurfaceError::Timeout) => debug!("Surface timeout, skipping frame"),
                Err(SurfaceError::Lost) => warn!("Surface lost, skipping frame"),
                Err(err @ SurfaceError::OutOfMemory) => {
                    self.fail(event_loop, err.into());
                    return;
                }
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.initialize(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::KeyboardInput { event, .. } => self.keyboard.process_event(&event),
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::Focused(false) => self.keyboard.release_all(),
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.mouse.on_raw_motion(delta.0, delta.1);
        }
    }
}

/// Open the window and run until quit or close. Blocks the calling thread.
#[instrument(skip(config))]
pub fn run(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config);
    event_loop.run_app(&mut app)?;
    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
