//! Deterministic component model for the portal world.
//!
//! Components are stored in BTreeMap for deterministic iteration order.
//! Each component type has its own storage keyed by EntityId.
//!
//! # Invariants
//! - Iteration order is deterministic (BTreeMap).
//! - Component storage is independent of entity creation order.

mod components;
mod store;

pub use components::{Collider, Name, Player, RigidBody};
pub use store::ComponentStore;
