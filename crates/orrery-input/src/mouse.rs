//! Cursor tracking for mouse look.
//!
//! Offsets accumulate across a frame and are drained with
//! [`take_look_offset`](MouseState::take_look_offset). The Y offset is positive
//! when the cursor moves up the screen, so it can be fed straight into pitch.
//!
//! While the cursor is free, offsets come from successive `CursorMoved`
//! positions. The first position after startup (or after capture state changes)
//! only seeds the reference point, so the view does not jump. While captured,
//! raw device motion is used instead because a locked cursor stops reporting
//! positions on most platforms.

use glam::Vec2;

#[derive(Debug, Clone, Default)]
pub struct MouseState {
    last_position: Option<Vec2>,
    look_offset: Vec2,
    captured: bool,
    invert_y: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the sign of vertical look offsets.
    #[must_use]
    pub fn with_invert_y(mut self, invert_y: bool) -> Self {
        self.invert_y = invert_y;
        self
    }

    /// Process a `WindowEvent::CursorMoved`.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let position = Vec2::new(x as f32, y as f32);
        let Some(last) = self.last_position.replace(position) else {
            return;
        };
        if !self.captured {
            self.accumulate(position.x - last.x, last.y - position.y);
        }
    }

    /// Process a `DeviceEvent::MouseMotion`. Ignored unless the cursor is captured.
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        if self.captured {
            self.accumulate(dx as f32, -(dy as f32));
        }
    }

    fn accumulate(&mut self, x: f32, y: f32) {
        let y = if self.invert_y { -y } else { y };
        self.look_offset += Vec2::new(x, y);
    }

    /// Grab and hide the cursor, or release and show it.
    pub fn set_captured(&mut self, window: &winit::window::Window, captured: bool) {
        use winit::window::CursorGrabMode;
        if captured {
            if window.set_cursor_grab(CursorGrabMode::Locked).is_err()
                && let Err(err) = window.set_cursor_grab(CursorGrabMode::Confined)
            {
                tracing::warn!("Cursor grab unavailable: {err}");
            }
            window.set_cursor_visible(false);
        } else {
            if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
                tracing::warn!("Cursor release failed: {err}");
            }
            window.set_cursor_visible(true);
        }
        self.set_captured_flag(captured);
    }

    /// Update the capture flag without touching a window.
    pub fn set_captured_flag(&mut self, captured: bool) {
        if self.captured != captured {
            self.captured = captured;
            self.last_position = None;
        }
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Offset accumulated since the last call, in pixels.
    pub fn take_look_offset(&mut self) -> Vec2 {
        std::mem::take(&mut self.look_offset)
    }
}
