//! Shared value types used across the portal workspace.
//!
//! # Invariants
//! - Types here are plain data: no world access, no I/O.

mod controls;
mod types;

pub use controls::PlayerControls;
pub use types::{EntityId, Transform};
