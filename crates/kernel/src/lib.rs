//! World Kernel: authoritative world state, system scheduling, simulation stepping.
//!
//! # Invariants
//! - All state mutations flow through explicit operations.
//! - Systems run in registration order, once per `World::update`.
//! - Exactly one entity carries the `Player` component in a playable world.

pub mod systems;
pub mod world;

pub use systems::{PhysicsSystem, PlayerSystem, System, SystemTransaction};
pub use world::{EntityData, PlayerView, World, WorldError, WorldEvent};
