//! Frame-coherent keyboard state.
//!
//! Keys are tracked by physical [`KeyCode`] so bindings do not depend on the
//! active keyboard layout. Keys winit cannot identify are dropped.

use std::collections::{HashMap, HashSet};
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Minimal description of a key event, decoupled from winit's event struct for tests.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: KeyCode,
    pub state: ElementState,
    pub repeat: bool,
}

/// Held keys plus the keys that changed since the last [`clear_transients`](Self::clear_transients).
///
/// Press edges are counted, so a key tapped twice within one frame reports two presses.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
    presses_this_frame: HashMap<KeyCode, u32>,
    released_this_frame: HashSet<KeyCode>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a winit [`KeyEvent`].
    pub fn process_event(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(key) = event.physical_key else {
            return;
        };
        self.process_raw(RawKeyEvent {
            key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    /// Record a key transition. OS auto-repeat never produces a second press edge.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                if self.held.insert(event.key) {
                    *self.presses_this_frame.entry(event.key).or_default() += 1;
                }
            }
            ElementState::Released => {
                if self.held.remove(&event.key) {
                    self.released_this_frame.insert(event.key);
                }
            }
        }
    }

    #[must_use]
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// `true` only in the frame the key went down.
    #[must_use]
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.press_count(key) > 0
    }

    /// Number of press edges this frame.
    #[must_use]
    pub fn press_count(&self, key: KeyCode) -> u32 {
        self.presses_this_frame.get(&key).copied().unwrap_or(0)
    }

    /// `true` only in the frame the key went up.
    #[must_use]
    pub fn just_released(&self, key: KeyCode) -> bool {
        self.released_this_frame.contains(&key)
    }

    /// Release every held key, e.g. when the window loses focus and release events will not arrive.
    pub fn release_all(&mut self) {
        self.released_this_frame.extend(self.held.drain());
    }

    /// Forget this frame's edges. Call once at the end of every frame.
    pub fn clear_transients(&mut self) {
        self.presses_this_frame.clear();
        self.released_this_frame.clear();
    }
}
