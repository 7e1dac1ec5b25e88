use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Human-readable name component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

/// Marks the entity the local user controls and carries its view state.
///
/// Yaw and pitch are the source of truth; `head_orientation` is recomputed
/// from them whenever they change so readers never see the two disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    head_orientation: Quat,
    yaw: f32,
    pitch: f32,
    /// Horizontal speed in units per second.
    pub walk_speed: f32,
    /// Initial upward velocity of a jump.
    pub jump_speed: f32,
    /// Radians of rotation per unit of pointer delta.
    pub look_sensitivity: f32,
}

impl Player {
    /// Pitch is kept just short of straight up/down to avoid gimbal flip.
    pub const PITCH_LIMIT: f32 = 1.553_343; // 89 degrees

    pub fn new(yaw: f32, pitch: f32) -> Self {
        let mut player = Self::default();
        player.set_look(yaw, pitch);
        player
    }

    pub fn head_orientation(&self) -> Quat {
        self.head_orientation
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Set yaw and pitch (radians); pitch is clamped to ±[`Self::PITCH_LIMIT`].
    pub fn set_look(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        self.head_orientation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
    }

    /// Rotation about the up axis only; walking happens in this frame.
    pub fn body_orientation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self {
            head_orientation: Quat::IDENTITY,
            yaw: 0.0,
            pitch: 0.0,
            walk_speed: 4.0,
            jump_speed: 5.0,
            look_sensitivity: 0.003,
        }
    }
}

/// Simulated body. Kinematic bodies are moved by systems, never by gravity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub mass: f32,
    pub is_kinematic: bool,
    #[serde(default)]
    pub velocity: Vec3,
    #[serde(default)]
    pub grounded: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            mass: 1.0,
            is_kinematic: false,
            velocity: Vec3::ZERO,
            grounded: false,
        }
    }
}

/// Collision shape, in entity-local units before scaling.
///
/// Serialized with the shape named inline, e.g.
/// `{ shape: box, half_extents: [0.5, 0.5, 0.5] }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Collider {
    Box { half_extents: [f32; 3] },
    Sphere { radius: f32 },
}

impl Collider {
    /// Distance from the entity origin down to the lowest point of the shape.
    pub fn ground_offset(&self, scale: Vec3) -> f32 {
        match self {
            Self::Box { half_extents } => half_extents[1] * scale.y,
            Self::Sphere { radius } => radius * scale.max_element(),
        }
    }
}

impl Default for Collider {
    fn default() -> Self {
        Self::Box {
            half_extents: [0.5, 0.5, 0.5],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_default_looks_down_negative_z() {
        let p = Player::default();
        let forward = p.head_orientation() * Vec3::NEG_Z;
        assert!((forward - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn pitch_is_clamped() {
        let p = Player::new(0.0, 10.0);
        assert_eq!(p.pitch(), Player::PITCH_LIMIT);
        let p = Player::new(0.0, -10.0);
        assert_eq!(p.pitch(), -Player::PITCH_LIMIT);
    }

    #[test]
    fn head_orientation_follows_yaw() {
        let p = Player::new(std::f32::consts::FRAC_PI_2, 0.0);
        let forward = p.head_orientation() * Vec3::NEG_Z;
        // Quarter turn left about +Y faces -X.
        assert!((forward - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn body_orientation_ignores_pitch() {
        let p = Player::new(0.3, 0.5);
        assert!(p.body_orientation().abs_diff_eq(Quat::from_rotation_y(0.3), 1e-6));
    }

    #[test]
    fn collider_ground_offset() {
        let b = Collider::Box {
            half_extents: [0.5, 0.9, 0.5],
        };
        assert_eq!(b.ground_offset(Vec3::ONE), 0.9);
        assert_eq!(b.ground_offset(Vec3::new(1.0, 2.0, 1.0)), 1.8);

        let s = Collider::Sphere { radius: 0.5 };
        assert_eq!(s.ground_offset(Vec3::new(1.0, 3.0, 2.0)), 1.5);
    }

    #[test]
    fn rigid_body_default() {
        let b = RigidBody::default();
        assert_eq!(b.mass, 1.0);
        assert!(!b.is_kinematic);
        assert!(!b.grounded);
    }
}
