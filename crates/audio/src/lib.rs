//! Sound subsystem boundary.
//!
//! Mixing and spatialization belong to the device implementation; this crate
//! only owns device acquisition and keeps the listener in sync with the world.
//!
//! # Invariants
//! - The listener is updated at most once per simulation step, before the world moves.
//! - A muted manager accepts every call and produces no sound.

mod device;
mod manager;

pub use device::{AudioDevice, Listener, NullAudioDevice};
pub use manager::{AudioConfig, AudioError, SoundManager};
