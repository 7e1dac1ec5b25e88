//! Window and input boundary.
//!
//! The game loop sees a [`Window`]: something it can pump for events, query
//! for held keys, and present frames to. Platform windows and the headless
//! window used by tests and the CLI both implement it.
//!
//! # Invariants
//! - Key state only changes inside `Window::process_events`.
//! - Look deltas accumulate between frames and are handed out once.

pub mod action;
mod state;
mod window;

pub use action::{Action, Bindings, Key};
pub use state::InputState;
pub use window::{HeadlessWindow, Window, WindowError};
