//! Developer Tooling: world inspector and frame-rate counting.
//!
//! # Invariants
//! - Tools only read world state.
//! - Counters are owned values; nothing here is global.

mod fps;
mod inspector;

pub use fps::FpsCounter;
pub use inspector::{EntityInfo, WorldInspector, WorldSummary};
