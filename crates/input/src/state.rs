use std::collections::HashSet;

use glam::Vec2;
use portal_common::PlayerControls;

use crate::action::{Action, Bindings, Key};

/// Held keys and pointer motion, fed by a window backend.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_held: HashSet<Key>,
    look: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.keys_held.insert(key);
        } else {
            self.keys_held.remove(&key);
        }
    }

    pub fn handle_pointer(&mut self, dx: f32, dy: f32) {
        self.look += Vec2::new(dx, dy);
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn is_action_active(&self, bindings: &Bindings, action: Action) -> bool {
        bindings.keys_for(action).any(|k| self.is_key_down(k))
    }

    /// Build this frame's controls and reset the pointer accumulator.
    pub fn take_controls(&mut self, bindings: &Bindings) -> PlayerControls {
        let axis = |pos: Action, neg: Action| -> f32 {
            let p = if self.is_action_active(bindings, pos) { 1.0 } else { 0.0 };
            let n = if self.is_action_active(bindings, neg) { 1.0 } else { 0.0 };
            p - n
        };
        let walk = Vec2::new(
            axis(Action::StrafeRight, Action::StrafeLeft),
            axis(Action::Forward, Action::Back),
        );
        let controls = PlayerControls {
            walk,
            look: self.look,
            jump: self.is_action_active(bindings, Action::Jump),
        };
        self.look = Vec2::ZERO;
        controls
    }

    /// Forget everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.keys_held.clear();
        self.look = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_press_and_release() {
        let mut s = InputState::new();
        s.handle_key(Key::Q, true);
        assert!(s.is_key_down(Key::Q));
        s.handle_key(Key::Q, false);
        assert!(!s.is_key_down(Key::Q));
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut s = InputState::new();
        let b = Bindings::default();
        s.handle_key(Key::W, true);
        s.handle_key(Key::S, true);
        s.handle_key(Key::D, true);
        let c = s.take_controls(&b);
        assert_eq!(c.walk, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn look_is_handed_out_once() {
        let mut s = InputState::new();
        let b = Bindings::default();
        s.handle_pointer(3.0, -1.0);
        s.handle_pointer(2.0, 0.5);
        assert_eq!(s.take_controls(&b).look, Vec2::new(5.0, -0.5));
        assert_eq!(s.take_controls(&b).look, Vec2::ZERO);
    }

    #[test]
    fn jump_follows_binding() {
        let mut s = InputState::new();
        let b = Bindings::default();
        s.handle_key(Key::Space, true);
        assert!(s.take_controls(&b).jump);
        s.clear();
        assert!(!s.take_controls(&b).jump);
    }
}
