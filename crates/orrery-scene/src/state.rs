//! Everything that changes while the orrery runs, in one owned value.

use glam::{Mat4, Vec3};
use orrery_config::Config;

use crate::body::{Background, BodyRegistry, CelestialBody, Sun};
use crate::camera::{Camera, CameraMovement};
use crate::clock::{RunState, SimulationClock};
use crate::transform::{compose_background_transform, compose_planet_transform, compose_sun_transform};

/// Bodies, clock, run state, camera and viewport for one scene.
#[derive(Debug, Clone)]
pub struct SceneState {
    pub registry: BodyRegistry,
    pub sun: Sun,
    pub background: Background,
    pub clock: SimulationClock,
    pub run_state: RunState,
    pub camera: Camera,
    viewport: (u32, u32),
}

impl SceneState {
    pub fn new(camera: Camera, run_state: RunState, width: u32, height: u32) -> Self {
        let mut state = Self {
            registry: BodyRegistry::setup(),
            sun: Sun::default(),
            background: Background::default(),
            clock: SimulationClock::new(),
            run_state,
            camera,
            viewport: (0, 0),
        };
        state.resize(width, height);
        state
    }

    /// Scene with the configured camera, initial run state and window size.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Camera::from_config(&config.camera),
            RunState {
                orbit_enabled: config.scene.orbit_enabled,
                spin_enabled: config.scene.spin_enabled,
            },
            config.window.width,
            config.window.height,
        )
    }

    /// Advance the simulated clocks by one frame.
    pub fn advance(&mut self, delta_time: f32) {
        self.clock.advance(delta_time, self.run_state);
    }

    pub fn move_camera(&mut self, direction: CameraMovement, delta_time: f32) {
        self.camera.process_keyboard(direction, delta_time);
    }

    /// Turn the camera by a cursor offset in pixels. Positive `dy` looks up.
    pub fn look(&mut self, dx: f32, dy: f32) {
        if dx != 0.0 || dy != 0.0 {
            self.camera.process_mouse_movement(dx, dy, true);
        }
    }

    /// Record a new framebuffer size and recompute the camera aspect ratio.
    ///
    /// A zero-sized (minimized) viewport is stored but leaves the aspect ratio untouched.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.camera.set_aspect_ratio(width as f32, height as f32);
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Each populated body with its model transform for the current clock.
    pub fn planet_transforms(&self) -> impl Iterator<Item = (&CelestialBody, Mat4)> + '_ {
        let (orbit_time, spin_time) = (self.clock.orbit_time(), self.clock.spin_time());
        self.registry
            .iter()
            .map(move |body| (body, compose_planet_transform(body, orbit_time, spin_time)))
    }

    pub fn sun_transform(&self) -> Mat4 {
        compose_sun_transform(self.sun.position, self.sun.scale)
    }

    pub fn background_view(&self) -> Mat4 {
        compose_background_transform(self.camera.view_matrix())
    }

    /// The light sits at the sun's center.
    pub fn light_position(&self) -> Vec3 {
        self.sun.position
    }

    /// The camera position as `x, y, z` with six decimals.
    pub fn camera_position_line(&self) -> String {
        let p = self.camera.position;
        format!("{:.6}, {:.6}, {:.6}", p.x, p.y, p.z)
    }
}
