//! Turns the frame's keyboard state into scene changes and app-level requests.

use orrery_input::{Action, InputMap, KeyboardState};
use orrery_scene::{CameraMovement, SceneState};

/// Things the scene cannot do by itself and the window loop must act on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameRequests {
    pub quit: bool,
    pub print_camera_position: bool,
    /// `Some(true)` to grab and hide the cursor, `Some(false)` to release it.
    pub cursor_capture: Option<bool>,
}

fn movement(action: Action) -> Option<CameraMovement> {
    Some(match action {
        Action::MoveUp => CameraMovement::Up,
        Action::MoveDown => CameraMovement::Down,
        Action::MoveForward => CameraMovement::Forward,
        Action::MoveBackward => CameraMovement::Backward,
        Action::StrafeLeft => CameraMovement::Left,
        Action::StrafeRight => CameraMovement::Right,
        _ => return None,
    })
}

/// Apply every action that fires this frame.
///
/// Toggles flip the run state once per press, held movement moves the camera by `delta_time`,
/// and the rest is returned for the caller.
pub fn process_input(
    input_map: &InputMap,
    keyboard: &KeyboardState,
    scene: &mut SceneState,
    delta_time: f32,
) -> FrameRequests {
    let mut requests = FrameRequests::default();
    for action in input_map.triggered(keyboard) {
        if let Some(direction) = movement(action) {
            scene.move_camera(direction, delta_time);
            continue;
        }
        match action {
            Action::ToggleOrbit => {
                for _ in 0..input_map.trigger_count(action, keyboard) {
                    scene.run_state.toggle_orbit();
                }
                tracing::debug!(enabled = scene.run_state.orbit_enabled, "Orbit toggled");
            }
            Action::ToggleSpin => {
                for _ in 0..input_map.trigger_count(action, keyboard) {
                    scene.run_state.toggle_spin();
                }
                tracing::debug!(enabled = scene.run_state.spin_enabled, "Spin toggled");
            }
            Action::PrintCameraPosition => requests.print_camera_position = true,
            Action::CaptureCursor => requests.cursor_capture = Some(true),
            Action::ReleaseCursor => requests.cursor_capture = Some(false),
            Action::Quit => requests.quit = true,
            _ => {}
        }
    }
    requests
}
