use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Movement intent gathered from input for one frame.
///
/// `walk.x` strafes right, `walk.y` moves forward; both lie in `[-1, 1]`.
/// `look` is the raw pointer delta accumulated since the previous frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerControls {
    pub walk: Vec2,
    pub look: Vec2,
    pub jump: bool,
}

impl PlayerControls {
    /// True when applying these controls would change nothing.
    pub fn is_idle(&self) -> bool {
        self.walk == Vec2::ZERO && self.look == Vec2::ZERO && !self.jump
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_controls_are_idle() {
        assert!(PlayerControls::default().is_idle());
    }

    #[test]
    fn jump_alone_is_not_idle() {
        let c = PlayerControls {
            jump: true,
            ..PlayerControls::default()
        };
        assert!(!c.is_idle());
    }
}
