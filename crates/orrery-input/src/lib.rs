//! Input for the orrery: keyboard edges and holds, first-mouse cursor look, and rebindable actions.

pub mod action_map;
pub mod keyboard;
pub mod mouse;

pub use action_map::{Action, BindingError, InputMap, Trigger};
pub use keyboard::{KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
