//! Keyboard sampling with held (level) and pressed (edge) sets
//!
//! Key events arrive between ticks. `update` reads held keys for movement and
//! consumes presses for one-shot actions; whatever it does not consume is
//! dropped at the end of the tick.

use std::collections::HashSet;

/// Device-independent key identifiers (DOM `KeyboardEvent.code`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    ArrowLeft,
    ArrowRight,
    KeyA,
    KeyD,
    Space,
    ShiftLeft,
    ShiftRight,
    KeyR,
}

impl KeyCode {
    /// Parse a DOM `code` string; unbound keys return `None`
    pub fn from_dom(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" => Some(KeyCode::ArrowLeft),
            "ArrowRight" => Some(KeyCode::ArrowRight),
            "KeyA" => Some(KeyCode::KeyA),
            "KeyD" => Some(KeyCode::KeyD),
            "Space" => Some(KeyCode::Space),
            "ShiftLeft" => Some(KeyCode::ShiftLeft),
            "ShiftRight" => Some(KeyCode::ShiftRight),
            "KeyR" => Some(KeyCode::KeyR),
            _ => None,
        }
    }
}

/// What the simulation asks of the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Dash,
    Restart,
}

impl Action {
    /// Keys bound to this action
    pub fn keys(self) -> &'static [KeyCode] {
        match self {
            Action::MoveLeft => &[KeyCode::ArrowLeft, KeyCode::KeyA],
            Action::MoveRight => &[KeyCode::ArrowRight, KeyCode::KeyD],
            Action::Jump => &[KeyCode::Space],
            Action::Dash => &[KeyCode::ShiftLeft, KeyCode::ShiftRight],
            Action::Restart => &[KeyCode::KeyR],
        }
    }
}

/// Held keys plus presses not yet consumed this tick
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down; auto-repeat downs are ignored
    pub fn key_down(&mut self, code: KeyCode, repeat: bool) {
        if repeat {
            return;
        }
        self.held.insert(code);
        self.pressed.insert(code);
    }

    pub fn key_up(&mut self, code: KeyCode) {
        self.held.remove(&code);
    }

    /// Forget held keys (focus lost, key-ups will never arrive)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    /// True at most once per physical press
    pub fn consume_pressed(&mut self, code: KeyCode) -> bool {
        self.pressed.remove(&code)
    }

    pub fn action_held(&self, action: Action) -> bool {
        action.keys().iter().any(|&code| self.is_held(code))
    }

    /// Consume a press of any key bound to `action`.
    ///
    /// Every bound key's pending press is drained, so pressing both shift keys
    /// on the same frame still dashes once.
    pub fn consume_action(&mut self, action: Action) -> bool {
        let mut fired = false;
        for &code in action.keys() {
            fired |= self.consume_pressed(code);
        }
        fired
    }

    /// -1 (left), 0, or +1 (right) from held movement keys
    pub fn horizontal_axis(&self) -> f32 {
        let right = if self.action_held(Action::MoveRight) { 1.0 } else { 0.0 };
        let left = if self.action_held(Action::MoveLeft) { 1.0 } else { 0.0 };
        right - left
    }

    /// Drop presses nobody consumed this tick
    pub fn end_tick(&mut self) {
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_pressed_fires_once_per_press() {
        let mut input = InputSampler::new();
        input.key_down(KeyCode::Space, false);
        assert!(input.consume_pressed(KeyCode::Space));
        assert!(!input.consume_pressed(KeyCode::Space));
        // Still held though
        assert!(input.is_held(KeyCode::Space));

        // Auto-repeat does not re-arm it
        input.key_down(KeyCode::Space, true);
        assert!(!input.consume_pressed(KeyCode::Space));

        // Release and press again
        input.key_up(KeyCode::Space);
        assert!(!input.is_held(KeyCode::Space));
        input.key_down(KeyCode::Space, false);
        assert!(input.consume_pressed(KeyCode::Space));
    }

    #[test]
    fn test_press_survives_key_up_until_consumed() {
        // A tap shorter than a frame still registers
        let mut input = InputSampler::new();
        input.key_down(KeyCode::KeyR, false);
        input.key_up(KeyCode::KeyR);
        assert!(input.consume_action(Action::Restart));
    }

    #[test]
    fn test_end_tick_drops_unconsumed_presses() {
        let mut input = InputSampler::new();
        input.key_down(KeyCode::Space, false);
        input.end_tick();
        assert!(!input.consume_pressed(KeyCode::Space));
        assert!(input.is_held(KeyCode::Space));
    }

    #[test]
    fn test_consume_action_drains_all_bound_keys() {
        let mut input = InputSampler::new();
        input.key_down(KeyCode::ShiftLeft, false);
        input.key_down(KeyCode::ShiftRight, false);
        assert!(input.consume_action(Action::Dash));
        assert!(!input.consume_action(Action::Dash));
    }

    #[test]
    fn test_horizontal_axis() {
        let mut input = InputSampler::new();
        assert_eq!(input.horizontal_axis(), 0.0);

        input.key_down(KeyCode::KeyD, false);
        assert_eq!(input.horizontal_axis(), 1.0);

        input.key_down(KeyCode::ArrowLeft, false);
        assert_eq!(input.horizontal_axis(), 0.0);

        input.key_up(KeyCode::KeyD);
        assert_eq!(input.horizontal_axis(), -1.0);

        input.release_all();
        assert_eq!(input.horizontal_axis(), 0.0);
    }

    #[test]
    fn test_from_dom() {
        assert_eq!(KeyCode::from_dom("ShiftRight"), Some(KeyCode::ShiftRight));
        assert_eq!(KeyCode::from_dom("KeyQ"), None);
    }
}
