use std::time::Duration;

use portal_audio::{Listener, SoundManager};
use portal_kernel::{World, WorldError};

/// Advances the world one step at a time, keeping audio in sync.
///
/// The listener is placed at the controlled entity's position *before* the
/// world moves, so the sound heard with a frame matches the pose it was
/// scheduled from.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulationStepper {
    steps: u64,
}

impl SimulationStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful advances.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn advance(
        &mut self,
        world: &mut World,
        sound: &mut SoundManager,
        dt: Duration,
    ) -> Result<(), WorldError> {
        let view = world.player_view()?;
        sound.update(Listener::new(
            view.transform.position,
            view.player.head_orientation(),
        ));
        world.update(dt)?;
        self.steps += 1;
        Ok(())
    }
}
