//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderer cannot mutate world truth directly.
//! - Render state derives from world state and the camera.
//! - The camera is a per-frame view, rebuilt before every draw.

mod camera;
mod hud;
mod renderer;

pub use camera::{Camera, Projection};
pub use hud::{Hud, TitleHud, UiRenderer};
pub use renderer::{DebugTextRenderer, RenderError, Renderer};
