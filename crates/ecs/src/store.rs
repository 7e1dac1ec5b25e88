use std::collections::BTreeMap;

use portal_common::EntityId;

use crate::{Collider, Name, Player, RigidBody};

/// Deterministic component storage for all component types.
///
/// Uses BTreeMap for canonical iteration order.
#[derive(Debug, Clone, Default)]
pub struct ComponentStore {
    names: BTreeMap<EntityId, Name>,
    players: BTreeMap<EntityId, Player>,
    rigid_bodies: BTreeMap<EntityId, RigidBody>,
    colliders: BTreeMap<EntityId, Collider>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Name ---
    pub fn set_name(&mut self, entity: EntityId, name: impl Into<String>) {
        self.names.insert(entity, Name(name.into()));
    }

    pub fn get_name(&self, entity: EntityId) -> Option<&Name> {
        self.names.get(&entity)
    }

    pub fn names(&self) -> &BTreeMap<EntityId, Name> {
        &self.names
    }

    // --- Player ---
    pub fn set_player(&mut self, entity: EntityId, player: Player) {
        self.players.insert(entity, player);
    }

    pub fn get_player(&self, entity: EntityId) -> Option<&Player> {
        self.players.get(&entity)
    }

    pub fn get_player_mut(&mut self, entity: EntityId) -> Option<&mut Player> {
        self.players.get_mut(&entity)
    }

    pub fn players(&self) -> &BTreeMap<EntityId, Player> {
        &self.players
    }

    // --- RigidBody ---
    pub fn set_rigid_body(&mut self, entity: EntityId, body: RigidBody) {
        self.rigid_bodies.insert(entity, body);
    }

    pub fn get_rigid_body(&self, entity: EntityId) -> Option<&RigidBody> {
        self.rigid_bodies.get(&entity)
    }

    pub fn get_rigid_body_mut(&mut self, entity: EntityId) -> Option<&mut RigidBody> {
        self.rigid_bodies.get_mut(&entity)
    }

    pub fn rigid_bodies(&self) -> &BTreeMap<EntityId, RigidBody> {
        &self.rigid_bodies
    }

    // --- Collider ---
    pub fn set_collider(&mut self, entity: EntityId, collider: Collider) {
        self.colliders.insert(entity, collider);
    }

    pub fn get_collider(&self, entity: EntityId) -> Option<&Collider> {
        self.colliders.get(&entity)
    }

    /// Remove all components for an entity.
    pub fn remove_entity(&mut self, entity: EntityId) {
        self.names.remove(&entity);
        self.players.remove(&entity);
        self.rigid_bodies.remove(&entity);
        self.colliders.remove(&entity);
    }

    /// Drop every component of every entity.
    pub fn clear(&mut self) {
        self.names.clear();
        self.players.clear();
        self.rigid_bodies.clear();
        self.colliders.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_set_and_overwrite() {
        let mut store = ComponentStore::new();
        let id = EntityId::new();
        store.set_name(id, "First");
        store.set_name(id, "Second");
        assert_eq!(store.get_name(id).unwrap().0, "Second");
        assert_eq!(store.names().len(), 1);
    }

    #[test]
    fn player_mutation_through_store() {
        let mut store = ComponentStore::new();
        let id = EntityId::new();
        store.set_player(id, Player::default());
        store.get_player_mut(id).unwrap().set_look(1.0, 0.0);
        assert_eq!(store.get_player(id).unwrap().yaw(), 1.0);
    }

    #[test]
    fn remove_entity_clears_all() {
        let mut store = ComponentStore::new();
        let id = EntityId::new();
        store.set_name(id, "Test");
        store.set_player(id, Player::default());
        store.set_rigid_body(id, RigidBody::default());
        store.set_collider(id, Collider::default());

        store.remove_entity(id);
        assert!(store.get_name(id).is_none());
        assert!(store.get_player(id).is_none());
        assert!(store.get_rigid_body(id).is_none());
        assert!(store.get_collider(id).is_none());
    }

    #[test]
    fn deterministic_iteration_order() {
        let mut store = ComponentStore::new();
        let mut ids: Vec<EntityId> = (0..50).map(|_| EntityId::new()).collect();
        for id in &ids {
            store.set_player(*id, Player::default());
        }
        ids.sort();
        let stored_keys: Vec<EntityId> = store.players().keys().copied().collect();
        assert_eq!(stored_keys, ids);
    }

    #[test]
    fn clear_empties_every_table() {
        let mut store = ComponentStore::new();
        let id = EntityId::new();
        store.set_name(id, "a");
        store.set_rigid_body(id, RigidBody::default());
        store.clear();
        assert!(store.names().is_empty());
        assert!(store.get_rigid_body(id).is_none());
    }
}
