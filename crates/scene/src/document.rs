use glam::{Quat, Vec3};
use portal_common::Transform;
use portal_ecs::{Collider, Player, RigidBody};
use serde::{Deserialize, Serialize};

/// A whole scene file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub entities: Vec<EntityDef>,
}

/// One entity in a scene file. Rotation is a quaternion `[x, y, z, w]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub player: Option<PlayerDef>,
    #[serde(default)]
    pub rigid_body: Option<RigidBody>,
    #[serde(default)]
    pub collider: Option<Collider>,
}

/// Player settings as written in a scene file. Angles are in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerDef {
    pub yaw: f32,
    pub pitch: f32,
    pub walk_speed: f32,
    pub jump_speed: f32,
}

impl Default for PlayerDef {
    fn default() -> Self {
        let p = Player::default();
        Self {
            yaw: 0.0,
            pitch: 0.0,
            walk_speed: p.walk_speed,
            jump_speed: p.jump_speed,
        }
    }
}

impl PlayerDef {
    pub fn to_player(&self) -> Player {
        let mut player = Player::new(self.yaw.to_radians(), self.pitch.to_radians());
        player.walk_speed = self.walk_speed;
        player.jump_speed = self.jump_speed;
        player
    }
}

impl EntityDef {
    pub fn transform(&self) -> Transform {
        Transform {
            position: Vec3::from_array(self.position),
            rotation: Quat::from_array(self.rotation).normalize(),
            scale: Vec3::from_array(self.scale),
        }
    }
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_entity_uses_defaults() {
        let doc: SceneDocument = serde_yaml::from_str("entities:\n  - name: crate\n").unwrap();
        let t = doc.entities[0].transform();
        assert_eq!(t, Transform::default());
        assert!(doc.entities[0].player.is_none());
    }

    #[test]
    fn player_def_converts_degrees() {
        let def = PlayerDef {
            yaw: 90.0,
            ..PlayerDef::default()
        };
        let p = def.to_player();
        assert!((p.yaw() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn full_entity_parses() {
        let yaml = r#"
name: test
entities:
  - name: player
    position: [0.0, 0.0, 5.0]
    scale: [0.6, 1.8, 0.6]
    player: { yaw: 0.0, walk_speed: 3.0 }
    rigid_body: { mass: 80.0, is_kinematic: false }
    collider: { shape: box, half_extents: [0.3, 0.0, 0.3] }
"#;
        let doc: SceneDocument = serde_yaml::from_str(yaml).unwrap();
        let e = &doc.entities[0];
        assert_eq!(e.transform().scale.y, 1.8);
        assert_eq!(e.player.unwrap().walk_speed, 3.0);
        assert_eq!(e.rigid_body.unwrap().mass, 80.0);
        assert!(matches!(e.collider, Some(Collider::Box { .. })));
    }
}
