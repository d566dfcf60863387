//! Maps the orrery's actions to physical keys.
//!
//! Toggles and one-shot commands fire on the press edge. Movement and quit
//! are held checks, evaluated every frame the key is down.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use winit::keyboard::KeyCode;

use crate::keyboard::KeyboardState;

/// Everything the user can ask the orrery to do from the keyboard.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum Action {
    ToggleOrbit,
    ToggleSpin,
    /// Log and print the camera position.
    PrintCameraPosition,
    CaptureCursor,
    ReleaseCursor,
    Quit,
    MoveUp,
    MoveDown,
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
}

/// When a bound key counts as triggering its action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Only in the frame the key goes down.
    Press,
    /// Every frame the key is down.
    Held,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::ToggleOrbit,
        Action::ToggleSpin,
        Action::PrintCameraPosition,
        Action::CaptureCursor,
        Action::ReleaseCursor,
        Action::Quit,
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveForward,
        Action::MoveBackward,
        Action::StrafeLeft,
        Action::StrafeRight,
    ];

    #[must_use]
    pub fn trigger(self) -> Trigger {
        match self {
            Action::ToggleOrbit
            | Action::ToggleSpin
            | Action::PrintCameraPosition
            | Action::CaptureCursor
            | Action::ReleaseCursor => Trigger::Press,
            Action::Quit
            | Action::MoveUp
            | Action::MoveDown
            | Action::MoveForward
            | Action::MoveBackward
            | Action::StrafeLeft
            | Action::StrafeRight => Trigger::Held,
        }
    }

    /// The key this action is bound to when no override is configured.
    #[must_use]
    pub fn default_key(self) -> KeyCode {
        match self {
            Action::ToggleOrbit => KeyCode::Space,
            Action::ToggleSpin => KeyCode::KeyR,
            Action::PrintCameraPosition => KeyCode::KeyL,
            Action::CaptureCursor => KeyCode::KeyD,
            Action::ReleaseCursor => KeyCode::KeyA,
            Action::Quit => KeyCode::Enter,
            Action::MoveUp => KeyCode::KeyW,
            Action::MoveDown => KeyCode::KeyS,
            Action::MoveForward => KeyCode::ArrowUp,
            Action::MoveBackward => KeyCode::ArrowDown,
            Action::StrafeLeft => KeyCode::ArrowLeft,
            Action::StrafeRight => KeyCode::ArrowRight,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A keybinding override that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("unknown key '{key}' for action {action}")]
    UnknownKey { action: Action, key: String },
}

impl FromStr for Action {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.to_string() == s)
            .ok_or_else(|| BindingError::UnknownAction(s.to_string()))
    }
}

/// Parse a key name in winit's `KeyCode` debug spelling (`"KeyW"`, `"ArrowUp"`, `"Space"`).
#[must_use]
pub fn key_from_name(name: &str) -> Option<KeyCode> {
    const LETTERS: [KeyCode; 26] = [
        KeyCode::KeyA,
        KeyCode::KeyB,
        KeyCode::KeyC,
        KeyCode::KeyD,
        KeyCode::KeyE,
        KeyCode::KeyF,
        KeyCode::KeyG,
        KeyCode::KeyH,
        KeyCode::KeyI,
        KeyCode::KeyJ,
        KeyCode::KeyK,
        KeyCode::KeyL,
        KeyCode::KeyM,
        KeyCode::KeyN,
        KeyCode::KeyO,
        KeyCode::KeyP,
        KeyCode::KeyQ,
        KeyCode::KeyR,
        KeyCode::KeyS,
        KeyCode::KeyT,
        KeyCode::KeyU,
        KeyCode::KeyV,
        KeyCode::KeyW,
        KeyCode::KeyX,
        KeyCode::KeyY,
        KeyCode::KeyZ,
    ];
    const DIGITS: [KeyCode; 10] = [
        KeyCode::Digit0,
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];
    const OTHERS: [KeyCode; 17] = [
        KeyCode::Space,
        KeyCode::Enter,
        KeyCode::NumpadEnter,
        KeyCode::Escape,
        KeyCode::Tab,
        KeyCode::Backspace,
        KeyCode::ShiftLeft,
        KeyCode::ShiftRight,
        KeyCode::ControlLeft,
        KeyCode::ControlRight,
        KeyCode::AltLeft,
        KeyCode::AltRight,
        KeyCode::ArrowUp,
        KeyCode::ArrowDown,
        KeyCode::ArrowLeft,
        KeyCode::ArrowRight,
        KeyCode::PageUp,
    ];

    LETTERS
        .into_iter()
        .chain(DIGITS)
        .chain(OTHERS)
        .find(|key| format!("{key:?}") == name)
}

/// One key per action.
#[derive(Debug, Clone, PartialEq)]
pub struct InputMap {
    bindings: HashMap<Action, KeyCode>,
}

impl Default for InputMap {
    fn default() -> Self {
        Self {
            bindings: Action::ALL
                .into_iter()
                .map(|action| (action, action.default_key()))
                .collect(),
        }
    }
}

impl InputMap {
    /// Default bindings with `overrides` (action name -> key name) applied.
    ///
    /// Entries that do not parse are logged and skipped; the action keeps its default key.
    #[must_use]
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut map = Self::default();
        for err in map.apply_overrides(overrides) {
            tracing::warn!("Ignoring keybinding: {err}");
        }
        map
    }

    /// Apply `overrides` and return the entries that could not be applied.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<BindingError> {
        let mut errors = Vec::new();
        for (action_name, key_name) in overrides {
            let action = match action_name.parse::<Action>() {
                Ok(action) => action,
                Err(err) => {
                    errors.push(err);
                    continue;
                }
            };
            match key_from_name(key_name) {
                Some(key) => {
                    tracing::debug!("Bound {action} to {key:?}");
                    self.bindings.insert(action, key);
                }
                None => errors.push(BindingError::UnknownKey {
                    action,
                    key: key_name.clone(),
                }),
            }
        }
        errors
    }

    pub fn bind(&mut self, action: Action, key: KeyCode) {
        self.bindings.insert(action, key);
    }

    #[must_use]
    pub fn key_for(&self, action: Action) -> KeyCode {
        self.bindings
            .get(&action)
            .copied()
            .unwrap_or_else(|| action.default_key())
    }

    /// Whether `action` fires this frame, honoring its [`Trigger`].
    #[must_use]
    pub fn is_triggered(&self, action: Action, keyboard: &KeyboardState) -> bool {
        let key = self.key_for(action);
        match action.trigger() {
            Trigger::Press => keyboard.just_pressed(key),
            Trigger::Held => keyboard.is_pressed(key),
        }
    }

    /// How many times `action` fires this frame: once per press edge for
    /// [`Trigger::Press`], once while held for [`Trigger::Held`].
    #[must_use]
    pub fn trigger_count(&self, action: Action, keyboard: &KeyboardState) -> u32 {
        let key = self.key_for(action);
        match action.trigger() {
            Trigger::Press => keyboard.press_count(key),
            Trigger::Held => u32::from(keyboard.is_pressed(key)),
        }
    }

    /// All actions firing this frame, in [`Action::ALL`] order.
    pub fn triggered<'a>(
        &'a self,
        keyboard: &'a KeyboardState,
    ) -> impl Iterator<Item = Action> + 'a {
        Action::ALL
            .into_iter()
            .filter(move |&action| self.is_triggered(action, keyboard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::RawKeyEvent;
    use winit::event::ElementState;

    fn press(kb: &mut KeyboardState, key: KeyCode) {
        kb.process_raw(RawKeyEvent {
            key,
            state: ElementState::Pressed,
            repeat: false,
        });
    }

    #[test]
    fn test_default_bindings() {
        let map = InputMap::default();
        assert_eq!(map.key_for(Action::ToggleOrbit), KeyCode::Space);
        assert_eq!(map.key_for(Action::ToggleSpin), KeyCode::KeyR);
        assert_eq!(map.key_for(Action::PrintCameraPosition), KeyCode::KeyL);
        assert_eq!(map.key_for(Action::Quit), KeyCode::Enter);
        assert_eq!(map.key_for(Action::MoveUp), KeyCode::KeyW);
        assert_eq!(map.key_for(Action::StrafeRight), KeyCode::ArrowRight);
    }

    #[test]
    fn test_toggle_fires_once_per_press() {
        let map = InputMap::default();
        let mut kb = KeyboardState::new();
        press(&mut kb, KeyCode::Space);
        assert!(map.is_triggered(Action::ToggleOrbit, &kb));
        kb.clear_transients();
        assert!(!map.is_triggered(Action::ToggleOrbit, &kb));
    }

    #[test]
    fn test_double_tap_counts_twice() {
        let map = InputMap::default();
        let mut kb = KeyboardState::new();
        press(&mut kb, KeyCode::Space);
        kb.process_raw(RawKeyEvent {
            key: KeyCode::Space,
            state: ElementState::Released,
            repeat: false,
        });
        press(&mut kb, KeyCode::Space);
        press(&mut kb, KeyCode::ArrowUp);
        assert_eq!(map.trigger_count(Action::ToggleOrbit, &kb), 2);
        assert_eq!(map.trigger_count(Action::MoveForward, &kb), 1);
        assert_eq!(map.trigger_count(Action::ToggleSpin, &kb), 0);
    }

    #[test]
    fn test_movement_fires_while_held() {
        let map = InputMap::default();
        let mut kb = KeyboardState::new();
        press(&mut kb, KeyCode::ArrowUp);
        kb.clear_transients();
        assert!(map.is_triggered(Action::MoveForward, &kb));
        assert!(!map.is_triggered(Action::MoveBackward, &kb));
    }

    #[test]
    fn test_triggered_lists_actions_in_order() {
        let map = InputMap::default();
        let mut kb = KeyboardState::new();
        press(&mut kb, KeyCode::KeyW);
        press(&mut kb, KeyCode::KeyR);
        let fired: Vec<Action> = map.triggered(&kb).collect();
        assert_eq!(fired, vec![Action::ToggleSpin, Action::MoveUp]);
    }

    #[test]
    fn test_action_names_roundtrip() {
        for action in Action::ALL {
            assert_eq!(action.to_string().parse::<Action>(), Ok(action));
        }
        assert!("Jump".parse::<Action>().is_err());
    }

    #[test]
    fn test_key_from_name() {
        assert_eq!(key_from_name("KeyO"), Some(KeyCode::KeyO));
        assert_eq!(key_from_name("Digit7"), Some(KeyCode::Digit7));
        assert_eq!(key_from_name("ArrowLeft"), Some(KeyCode::ArrowLeft));
        assert_eq!(key_from_name("NotAKey"), None);
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let overrides = HashMap::from([("ToggleOrbit".to_string(), "KeyO".to_string())]);
        let map = InputMap::with_overrides(&overrides);
        assert_eq!(map.key_for(Action::ToggleOrbit), KeyCode::KeyO);
        assert_eq!(map.key_for(Action::ToggleSpin), KeyCode::KeyR);
    }

    #[test]
    fn test_bad_overrides_reported_and_skipped() {
        let overrides = HashMap::from([
            ("Teleport".to_string(), "KeyT".to_string()),
            ("Quit".to_string(), "Hyper".to_string()),
        ]);
        let mut map = InputMap::default();
        let mut errors = map.apply_overrides(&overrides);
        errors.sort_by_key(|e| e.to_string());
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&BindingError::UnknownAction("Teleport".to_string())));
        assert!(errors.contains(&BindingError::UnknownKey {
            action: Action::Quit,
            key: "Hyper".to_string(),
        }));
        assert_eq!(map, InputMap::default());
    }
}
