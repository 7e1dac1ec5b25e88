use glam::{Quat, Vec3};

/// Point of audition: where sounds are heard from and which way is "front".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Listener {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Listener {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }
}

impl Default for Listener {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

/// The contract for a platform audio backend.
///
/// This trait is the boundary between the game's audio state and whatever
/// actually talks to the sound card.
pub trait AudioDevice {
    fn name(&self) -> &str;

    fn set_master_volume(&mut self, volume: f32);

    /// Move the point of audition. Called once per simulation step.
    fn set_listener(&mut self, listener: &Listener);

    /// Release the device. Further calls must be harmless.
    fn shutdown(&mut self);
}

/// A device that plays nothing. Used headless and as the muted fallback.
#[derive(Debug, Default)]
pub struct NullAudioDevice {
    listener: Listener,
    volume: f32,
    updates: u64,
}

impl NullAudioDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of listener updates received.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn listener(&self) -> Listener {
        self.listener
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl AudioDevice for NullAudioDevice {
    fn name(&self) -> &str {
        "null"
    }

    fn set_master_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_listener(&mut self, listener: &Listener) {
        self.listener = *listener;
        self.updates += 1;
    }

    fn shutdown(&mut self) {}
}
