//! Yaw/pitch fly camera producing view and reverse-Z projection matrices.

use glam::{Mat4, Vec3};
use orrery_config::CameraConfig;

/// Pitch is kept inside ±89° so the view never flips over the pole.
pub const PITCH_LIMIT_DEG: f32 = 89.0;

/// Direction of a held-key camera translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Fly camera with Euler-angle orientation and a perspective projection.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    /// Degrees. -90 looks down -Z.
    yaw: f32,
    /// Degrees, clamped to ±[`PITCH_LIMIT_DEG`].
    pitch: f32,
    /// World units per second.
    pub speed: f32,
    /// Degrees per pixel of cursor travel.
    pub sensitivity: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a camera at `position` looking along `yaw`/`pitch` (degrees).
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: world_up.normalize_or(Vec3::Y),
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG),
            speed: 10.0,
            sensitivity: 0.1,
            fov_y: 45.0_f32.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        };
        camera.update_vectors();
        camera
    }

    /// Camera placed and tuned from config, with +Y as world up.
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::new(
            Vec3::from_array(config.position),
            Vec3::Y,
            config.yaw_deg,
            config.pitch_deg,
        );
        camera.speed = config.speed;
        camera.sensitivity = config.sensitivity;
        camera.fov_y = config.fov_y_deg.to_radians();
        camera.near = config.near;
        camera.far = config.far;
        camera
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Translate along `direction` at `speed * delta_time`.
    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.speed * delta_time;
        let axis = match direction {
            CameraMovement::Forward => self.front,
            CameraMovement::Backward => -self.front,
            CameraMovement::Right => self.right,
            CameraMovement::Left => -self.right,
            CameraMovement::Up => self.up,
            CameraMovement::Down => -self.up,
        };
        self.position += axis * velocity;
    }

    /// Apply a cursor offset in pixels. Positive `dy` looks up.
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw += dx * self.sensitivity;
        self.pitch += dy * self.sensitivity;
        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
        }
        self.update_vectors();
    }

    /// Right-handed look-at view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.front, self.up)
    }

    /// Perspective projection with reverse-Z: near maps to 1, far maps to 0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    /// Update the aspect ratio from a framebuffer size. Zero sizes are ignored.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Y, -90.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_default_camera_looks_down_neg_z() {
        let camera = Camera::default();
        assert!((camera.front() - Vec3::NEG_Z).length() < 1e-6);
        assert!((camera.up() - Vec3::Y).length() < 1e-6);
        assert!((camera.right() - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let camera = Camera::new(Vec3::new(12.1, 7.9, 28.5), Vec3::Y, -117.0, -14.0);
        let (f, u, r) = (camera.front(), camera.up(), camera.right());
        for v in [f, u, r] {
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
        assert!(f.dot(u).abs() < 1e-5);
        assert!(f.dot(r).abs() < 1e-5);
        assert!(u.dot(r).abs() < 1e-5);
    }

    #[test]
    fn test_from_config() {
        let config = CameraConfig::default();
        let camera = Camera::from_config(&config);
        assert_eq!(camera.position, Vec3::new(12.146158, 7.960372, 28.563208));
        assert_eq!(camera.yaw(), -117.0);
        assert_eq!(camera.pitch(), -14.0);
        assert!((camera.fov_y - 45.0_f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.far, 1000.0);
        // Looks back toward the origin from the starting position.
        assert!(camera.front().dot(-camera.position.normalize()) > 0.5);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(0.0, 10_000.0, true);
        assert_eq!(camera.pitch(), PITCH_LIMIT_DEG);
        camera.process_mouse_movement(0.0, -100_000.0, true);
        assert_eq!(camera.pitch(), -PITCH_LIMIT_DEG);
    }

    #[test]
    fn test_mouse_movement_scales_by_sensitivity() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(50.0, 20.0, true);
        assert!((camera.yaw() - (-90.0 + 5.0)).abs() < 1e-4);
        assert!((camera.pitch() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_keyboard_movement_is_velocity_scaled() {
        let mut camera = Camera::default();
        let start = camera.position;
        camera.process_keyboard(CameraMovement::Forward, 0.5);
        assert!((camera.position - (start + Vec3::NEG_Z * 5.0)).length() < 1e-5);
        camera.process_keyboard(CameraMovement::Backward, 0.5);
        camera.process_keyboard(CameraMovement::Right, 0.1);
        camera.process_keyboard(CameraMovement::Up, 0.2);
        assert!((camera.position - (start + Vec3::new(1.0, 2.0, 0.0))).length() < 1e-5);
    }

    #[test]
    fn test_view_matrix_maps_position_to_origin() {
        let camera = Camera::new(Vec3::new(10.0, 20.0, 30.0), Vec3::Y, 30.0, 10.0);
        let eye = camera.view_matrix() * camera.position.extend(1.0);
        assert!(eye.truncate().length() < 1e-4);
    }

    #[test]
    fn test_projection_is_reverse_z() {
        let camera = Camera::default();
        let proj = camera.projection_matrix();
        let near = proj * Vec4::new(0.0, 0.0, -camera.near, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -camera.far, 1.0);
        assert!((near.z / near.w - 1.0).abs() < 1e-4);
        assert!((far.z / far.w).abs() < 1e-4);
    }

    #[test]
    fn test_aspect_ratio_ignores_zero_size() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(2560.0, 1440.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
        camera.set_aspect_ratio(0.0, 0.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }
}
