//! Game lifecycle: brings subsystems up, runs the frame loop, tears down.
//!
//! Each frame is `process_input` → `update` → `render`. `update` asks the
//! [`Scheduler`] how many fixed steps the wall clock allows and advances the
//! world that many times; `render` rebuilds the camera from the controlled
//! entity and draws.
//!
//! # Invariants
//! - Within a frame: audio sync → world advance → camera derivation → draw.
//! - Scheduler time only moves forward, in whole steps.
//! - Once closed, a game never runs again.

pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod scheduler;
pub mod stepper;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{GameConfig, StartupPolicy, StepMode, WindowConfig};
pub use error::{ConfigError, FrameError, StartupError};
pub use game::{Game, GameBuilder, GameState};
pub use scheduler::{Scheduler, SchedulerConfig, Tick};
pub use stepper::SimulationStepper;
pub use view::{prepare_camera, refresh_camera};
