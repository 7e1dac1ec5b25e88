use std::collections::BTreeMap;
use std::time::Duration;

use portal_common::{EntityId, PlayerControls, Transform};
use portal_ecs::{ComponentStore, Player};
use serde::{Deserialize, Serialize};

use crate::systems::{System, SystemTransaction};

/// An event record produced by lifecycle changes and explicit mutations.
///
/// Per-step motion applied by systems is not recorded; only the step itself is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    Created,
    /// Entity was spawned with the given transform.
    Spawned { id: EntityId, transform: Transform },
    /// Entity was despawned. Carries the transform it had.
    Despawned { id: EntityId, transform: Transform },
    /// Entity transform was replaced through `World::set_transform`.
    TransformUpdated {
        id: EntityId,
        old: Transform,
        new: Transform,
    },
    /// Simulation advanced one update by `dt`.
    Stepped { tick: u64, dt: Duration },
    Destroyed,
}

/// Errors from world operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("world has not been created")]
    NotCreated,
    #[error("world has been destroyed")]
    Destroyed,
    #[error("no player entity in the world")]
    PlayerNotFound,
    #[error("expected exactly one player entity, found {0}")]
    AmbiguousPlayer(usize),
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Lifecycle {
    #[default]
    Uninitialized,
    Alive,
    Destroyed,
}

/// Per-entity data stored in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityData {
    pub transform: Transform,
}

/// Snapshot of the controlled entity: what the camera and listener follow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub id: EntityId,
    pub transform: Transform,
    pub player: Player,
}

/// The authoritative world state.
///
/// All mutations go through explicit operations. The world owns entity
/// storage, components and the registered systems; renderers, audio and the
/// camera only read from it.
///
/// Uses BTreeMap for deterministic iteration order across all platforms.
#[derive(Default)]
pub struct World {
    entities: BTreeMap<EntityId, EntityData>,
    components: ComponentStore,
    systems: Vec<Box<dyn System>>,
    controls: PlayerControls,
    lifecycle: Lifecycle,
    tick: u64,
    elapsed: Duration,
    /// Append-only event log, drained by the owner.
    event_log: Vec<WorldEvent>,
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("lifecycle", &self.lifecycle)
            .field("tick", &self.tick)
            .field("elapsed", &self.elapsed)
            .field("entities", &self.entities.len())
            .field("systems", &self.system_names())
            .finish()
    }
}

impl World {
    /// An empty world. It accepts entities right away but refuses to
    /// update until [`World::create`] has been called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the world to life. Calling it again on a live world is a no-op.
    pub fn create(&mut self) -> Result<(), WorldError> {
        match self.lifecycle {
            Lifecycle::Alive => Ok(()),
            Lifecycle::Destroyed => Err(WorldError::Destroyed),
            Lifecycle::Uninitialized => {
                self.lifecycle = Lifecycle::Alive;
                self.event_log.push(WorldEvent::Created);
                tracing::debug!("world created");
                Ok(())
            }
        }
    }

    /// Drop every entity, component and system. The world cannot be revived.
    pub fn destroy(&mut self) {
        if self.lifecycle == Lifecycle::Destroyed {
            return;
        }
        self.entities.clear();
        self.components.clear();
        self.systems.clear();
        self.lifecycle = Lifecycle::Destroyed;
        self.event_log.push(WorldEvent::Destroyed);
        tracing::debug!(tick = self.tick, "world destroyed");
    }

    pub fn is_alive(&self) -> bool {
        self.lifecycle == Lifecycle::Alive
    }

    /// Number of completed updates.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Total simulated time.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of entities in the world.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Read-only access to all entities (BTreeMap for deterministic iteration).
    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    pub fn components(&self) -> &ComponentStore {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentStore {
        &mut self.components
    }

    /// Controls the player systems will consume on the next update.
    pub fn controls(&self) -> PlayerControls {
        self.controls
    }

    pub fn set_controls(&mut self, controls: PlayerControls) {
        self.controls = controls;
    }

    /// Spawn a new entity with the given transform. Returns its id.
    pub fn spawn(&mut self, transform: Transform) -> EntityId {
        let id = EntityId::new();
        self.spawn_with_id(id, transform);
        id
    }

    /// Spawn an entity with a specific id.
    pub fn spawn_with_id(&mut self, id: EntityId, transform: Transform) {
        self.entities.insert(id, EntityData { transform });
        self.event_log.push(WorldEvent::Spawned { id, transform });
    }

    /// Remove an entity and all of its components. Returns the data if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityData> {
        let data = self.entities.remove(&id);
        if let Some(ref d) = data {
            self.components.remove_entity(id);
            self.event_log.push(WorldEvent::Despawned {
                id,
                transform: d.transform,
            });
        }
        data
    }

    /// Get a reference to entity data.
    pub fn get(&self, id: EntityId) -> Option<&EntityData> {
        self.entities.get(&id)
    }

    /// Get a mutable reference to entity data. Changes made through it are not logged.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityData> {
        self.entities.get_mut(&id)
    }

    /// Replace an entity's transform and log the change.
    pub fn set_transform(&mut self, id: EntityId, new: Transform) -> Result<(), WorldError> {
        let data = self
            .entities
            .get_mut(&id)
            .ok_or(WorldError::EntityNotFound(id))?;
        let old = data.transform;
        data.transform = new;
        self.event_log
            .push(WorldEvent::TransformUpdated { id, old, new });
        Ok(())
    }

    /// The single entity carrying a `Player` component.
    pub fn player(&self) -> Result<EntityId, WorldError> {
        let players = self.components.players();
        let mut ids = players.keys();
        match (ids.next(), players.len()) {
            (Some(id), 1) => Ok(*id),
            (None, _) => Err(WorldError::PlayerNotFound),
            (Some(_), n) => Err(WorldError::AmbiguousPlayer(n)),
        }
    }

    /// Transform and player state of the controlled entity, copied out.
    pub fn player_view(&self) -> Result<PlayerView, WorldError> {
        let id = self.player()?;
        let transform = self
            .entities
            .get(&id)
            .ok_or(WorldError::EntityNotFound(id))?
            .transform;
        let player = *self
            .components
            .get_player(id)
            .ok_or(WorldError::PlayerNotFound)?;
        Ok(PlayerView {
            id,
            transform,
            player,
        })
    }

    /// Open a transaction that registers systems when it is dropped.
    pub fn system_transaction(&mut self) -> SystemTransaction<'_> {
        SystemTransaction::new(self)
    }

    /// Names of the registered systems, in execution order.
    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    pub(crate) fn install_systems(&mut self, pending: Vec<Box<dyn System>>) {
        for system in pending {
            let name = system.name();
            if self.systems.iter().any(|s| s.name() == name) {
                tracing::warn!(system = name, "system already registered, skipping");
                continue;
            }
            tracing::debug!(system = name, "system registered");
            self.systems.push(system);
        }
    }

    /// Advance the simulation by `dt`, running every system once in order.
    pub fn update(&mut self, dt: Duration) -> Result<(), WorldError> {
        match self.lifecycle {
            Lifecycle::Alive => {}
            Lifecycle::Uninitialized => return Err(WorldError::NotCreated),
            Lifecycle::Destroyed => return Err(WorldError::Destroyed),
        }

        // Systems get `&mut World`, so they are moved out while they run.
        let mut systems = std::mem::take(&mut self.systems);
        let result = systems.iter_mut().try_for_each(|s| s.update(self, dt));
        systems.append(&mut self.systems);
        self.systems = systems;
        result?;

        self.tick += 1;
        self.elapsed += dt;
        self.event_log.push(WorldEvent::Stepped {
            tick: self.tick,
            dt,
        });
        Ok(())
    }

    /// Compute a deterministic hash of the world state for comparison.
    /// Uses canonical (BTreeMap) iteration order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &self.elapsed.as_nanos().to_le_bytes());
        for (id, data) in &self.entities {
            let t = &data.transform;
            mix(&mut h, id.0.as_bytes());
            for v in t.position.to_array().into_iter().chain(t.scale.to_array()) {
                mix(&mut h, &v.to_le_bytes());
            }
            for v in t.rotation.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
            if let Some(p) = self.components.get_player(*id) {
                mix(&mut h, &p.yaw().to_le_bytes());
                mix(&mut h, &p.pitch().to_le_bytes());
            }
        }
        h
    }
}
