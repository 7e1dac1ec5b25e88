//! Simulation systems and their transactional registration.

use std::time::Duration;

use glam::Vec3;
use portal_common::EntityId;

use crate::world::{World, WorldError};

/// A unit of simulation logic run once per `World::update`.
pub trait System {
    /// Stable name; a world holds at most one system per name.
    fn name(&self) -> &'static str;

    fn update(&mut self, world: &mut World, dt: Duration) -> Result<(), WorldError>;
}

/// Collects systems and registers them all when dropped.
///
/// ```ignore
/// {
///     let mut st = world.system_transaction();
///     st.add_system(PlayerSystem);
///     st.add_system(PhysicsSystem::default());
/// } // registered here
/// ```
pub struct SystemTransaction<'w> {
    world: &'w mut World,
    pending: Vec<Box<dyn System>>,
}

impl<'w> SystemTransaction<'w> {
    pub(crate) fn new(world: &'w mut World) -> Self {
        Self {
            world,
            pending: Vec::new(),
        }
    }

    pub fn add_system<S: System + 'static>(&mut self, system: S) -> &mut Self {
        self.pending.push(Box::new(system));
        self
    }

    /// Register now instead of at end of scope.
    pub fn commit(self) {}
}

impl Drop for SystemTransaction<'_> {
    fn drop(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        self.world.install_systems(pending);
    }
}

/// Applies the world's `PlayerControls` to the controlled entity.
///
/// Look deltas turn the head; walk intent moves the body relative to its
/// yaw. Bodies with a dynamic `RigidBody` get a velocity for the physics
/// system to integrate; all other players are moved directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlayerSystem;

impl System for PlayerSystem {
    fn name(&self) -> &'static str {
        "player"
    }

    fn update(&mut self, world: &mut World, dt: Duration) -> Result<(), WorldError> {
        let id = match world.player() {
            Ok(id) => id,
            Err(WorldError::PlayerNotFound) => return Ok(()),
            Err(e) => return Err(e),
        };
        let controls = world.controls();

        let player = world
            .components_mut()
            .get_player_mut(id)
            .ok_or(WorldError::PlayerNotFound)?;
        if controls.look != glam::Vec2::ZERO {
            let yaw = player.yaw() - controls.look.x * player.look_sensitivity;
            let pitch = player.pitch() - controls.look.y * player.look_sensitivity;
            player.set_look(yaw, pitch);
        }
        let body_rotation = player.body_orientation();
        let walk_speed = player.walk_speed;
        let jump_speed = player.jump_speed;

        let forward = body_rotation * Vec3::NEG_Z;
        let right = body_rotation * Vec3::X;
        let wish = (forward * controls.walk.y + right * controls.walk.x).clamp_length_max(1.0);
        let horizontal = wish * walk_speed;

        let moved_by_physics = match world.components_mut().get_rigid_body_mut(id) {
            Some(body) if !body.is_kinematic => {
                body.velocity.x = horizontal.x;
                body.velocity.z = horizontal.z;
                if controls.jump && body.grounded {
                    body.velocity.y = jump_speed;
                    body.grounded = false;
                }
                true
            }
            _ => false,
        };

        let data = world.get_mut(id).ok_or(WorldError::EntityNotFound(id))?;
        data.transform.rotation = body_rotation;
        if !moved_by_physics {
            data.transform.position += horizontal * dt.as_secs_f32();
        }
        Ok(())
    }
}

/// Integrates gravity and velocity for dynamic rigid bodies.
///
/// The ground is the plane `y = 0`; a body rests on it at the height of
/// its collider's lowest point.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsSystem {
    pub gravity: Vec3,
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

impl System for PhysicsSystem {
    fn name(&self) -> &'static str {
        "physics"
    }

    fn update(&mut self, world: &mut World, dt: Duration) -> Result<(), WorldError> {
        let secs = dt.as_secs_f32();
        let ids: Vec<EntityId> = world.components().rigid_bodies().keys().copied().collect();

        for id in ids {
            let Some(mut body) = world.components().get_rigid_body(id).copied() else {
                continue;
            };
            if body.is_kinematic {
                continue;
            }
            let Some(scale) = world.get(id).map(|d| d.transform.scale) else {
                continue;
            };
            let ground = world
                .components()
                .get_collider(id)
                .map_or(0.0, |c| c.ground_offset(scale));

            let data = world.get_mut(id).ok_or(WorldError::EntityNotFound(id))?;
            body.velocity += self.gravity * secs;
            data.transform.position += body.velocity * secs;
            if data.transform.position.y <= ground {
                data.transform.position.y = ground;
                body.velocity.y = body.velocity.y.max(0.0);
                body.grounded = true;
            } else {
                body.grounded = false;
            }

            world.components_mut().set_rigid_body(id, body);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use portal_common::{PlayerControls, Transform};
    use portal_ecs::{Collider, Player, RigidBody};

    fn world_with_player(transform: Transform) -> (World, EntityId) {
        let mut w = World::new();
        w.create().unwrap();
        let id = w.spawn(transform);
        w.components_mut().set_player(id, Player::default());
        (w, id)
    }

    struct Counter(&'static str);

    impl System for Counter {
        fn name(&self) -> &'static str {
            self.0
        }

        fn update(&mut self, world: &mut World, _dt: Duration) -> Result<(), WorldError> {
            world.spawn(Transform::default());
            Ok(())
        }
    }

    #[test]
    fn transaction_registers_on_drop() {
        let mut w = World::new();
        {
            let mut st = w.system_transaction();
            st.add_system(PlayerSystem).add_system(PhysicsSystem::default());
            // nothing registered until the transaction ends
        }
        assert_eq!(w.system_names(), vec!["player", "physics"]);
    }

    #[test]
    fn duplicate_systems_are_skipped() {
        let mut w = World::new();
        w.system_transaction().add_system(Counter("a")).add_system(Counter("a"));
        w.system_transaction().add_system(Counter("a")).add_system(Counter("b"));
        assert_eq!(w.system_names(), vec!["a", "b"]);
    }

    #[test]
    fn systems_run_in_registration_order_each_update() {
        let mut w = World::new();
        w.create().unwrap();
        w.system_transaction()
            .add_system(Counter("a"))
            .add_system(Counter("b"));
        w.update(Duration::from_millis(16)).unwrap();
        assert_eq!(w.entity_count(), 2);
        w.update(Duration::from_millis(16)).unwrap();
        assert_eq!(w.entity_count(), 4);
    }

    #[test]
    fn player_system_without_player_is_noop() {
        let mut w = World::new();
        assert!(PlayerSystem.update(&mut w, Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn look_turns_head() {
        let (mut w, id) = world_with_player(Transform::default());
        w.set_controls(PlayerControls {
            look: Vec2::new(-100.0, 0.0),
            ..PlayerControls::default()
        });
        PlayerSystem.update(&mut w, Duration::ZERO).unwrap();
        let p = w.components().get_player(id).unwrap();
        assert!((p.yaw() - 0.3).abs() < 1e-6);
        assert_eq!(w.get(id).unwrap().transform.rotation, p.body_orientation());
    }

    #[test]
    fn diagonal_walk_is_not_faster() {
        let (mut w, id) = world_with_player(Transform::default());
        w.set_controls(PlayerControls {
            walk: Vec2::new(1.0, 1.0),
            ..PlayerControls::default()
        });
        PlayerSystem.update(&mut w, Duration::from_secs(1)).unwrap();
        let moved = w.get(id).unwrap().transform.position.length();
        assert!((moved - 4.0).abs() < 1e-5);
    }

    #[test]
    fn dynamic_player_walks_through_velocity() {
        let (mut w, id) = world_with_player(Transform::default());
        w.components_mut().set_rigid_body(
            id,
            RigidBody {
                grounded: true,
                ..RigidBody::default()
            },
        );
        w.set_controls(PlayerControls {
            walk: Vec2::new(1.0, 0.0),
            jump: true,
            ..PlayerControls::default()
        });
        PlayerSystem.update(&mut w, Duration::from_secs(1)).unwrap();

        // position untouched; physics moves the body
        assert_eq!(w.get(id).unwrap().transform.position, Vec3::ZERO);
        let body = w.components().get_rigid_body(id).unwrap();
        assert_eq!(body.velocity, Vec3::new(4.0, 5.0, 0.0));
        assert!(!body.grounded);
    }

    #[test]
    fn physics_drops_body_to_ground() {
        let mut w = World::new();
        let id = w.spawn(Transform::from_position(Vec3::new(0.0, 10.0, 0.0)));
        w.components_mut().set_rigid_body(id, RigidBody::default());
        w.components_mut().set_collider(
            id,
            Collider::Box {
                half_extents: [0.5, 0.5, 0.5],
            },
        );

        let mut physics = PhysicsSystem::default();
        for _ in 0..200 {
            physics.update(&mut w, Duration::from_millis(16)).unwrap();
        }
        let pos = w.get(id).unwrap().transform.position;
        assert_eq!(pos.y, 0.5);
        let body = w.components().get_rigid_body(id).unwrap();
        assert!(body.grounded);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn kinematic_bodies_ignore_gravity() {
        let mut w = World::new();
        let start = Vec3::new(0.0, 3.0, 0.0);
        let id = w.spawn(Transform::from_position(start));
        w.components_mut().set_rigid_body(
            id,
            RigidBody {
                is_kinematic: true,
                ..RigidBody::default()
            },
        );
        PhysicsSystem::default()
            .update(&mut w, Duration::from_secs(1))
            .unwrap();
        assert_eq!(w.get(id).unwrap().transform.position, start);
    }
}
