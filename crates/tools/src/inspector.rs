use std::time::Duration;

use portal_common::EntityId;
use portal_kernel::World;
use serde::Serialize;

/// World inspector for developer tooling.
///
/// Provides read-only queries against the world state for debugging,
/// the CLI, and the in-game HUD.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        WorldSummary {
            tick: world.tick(),
            elapsed: world.elapsed(),
            entity_count: world.entity_count(),
            systems: world.system_names(),
            pending_events: world.events().len(),
            player: world
                .player()
                .ok()
                .and_then(|id| Self::inspect_entity(world, id)),
        }
    }

    /// Transform and name of a specific entity.
    pub fn inspect_entity(world: &World, id: EntityId) -> Option<EntityInfo> {
        world.get(id).map(|data| {
            let t = data.transform;
            EntityInfo {
                id,
                name: world.components().get_name(id).map(|n| n.0.clone()),
                position: t.position.to_array(),
                rotation: t.rotation.to_array(),
                scale: t.scale.to_array(),
                is_player: world.components().get_player(id).is_some(),
            }
        })
    }

    /// List all entity IDs in the world.
    pub fn list_entities(world: &World) -> Vec<EntityId> {
        world.entities().keys().copied().collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct WorldSummary {
    pub tick: u64,
    pub elapsed: Duration,
    pub entity_count: usize,
    pub systems: Vec<&'static str>,
    pub pending_events: usize,
    pub player: Option<EntityInfo>,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: tick={} elapsed={:.3}s entities={} systems=[{}] pending_events={}",
            self.tick,
            self.elapsed.as_secs_f64(),
            self.entity_count,
            self.systems.join(", "),
            self.pending_events
        )?;
        if let Some(player) = &self.player {
            write!(f, "\n  player: {player}")?;
        }
        Ok(())
    }
}

/// Detailed info about a single entity.
#[derive(Debug, Clone, Serialize)]
pub struct EntityInfo {
    pub id: EntityId,
    pub name: Option<String>,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    pub is_player: bool,
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Entity [{}] {} pos=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2})",
            self.id,
            self.name.as_deref().unwrap_or("-"),
            self.position[0],
            self.position[1],
            self.position[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
        )
    }
}
