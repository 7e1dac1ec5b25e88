use serde::{Deserialize, Serialize};

use crate::device::{AudioDevice, Listener, NullAudioDevice};

/// Audio settings read from the game configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// When false the manager starts muted and never touches a device.
    pub enabled: bool,
    /// Linear gain in `[0, 1]`.
    pub master_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            master_volume: 1.0,
        }
    }
}

/// Errors from the sound subsystem.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("master volume {0} outside [0, 1]")]
    InvalidVolume(f32),
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),
}

/// Owns the audio device for the lifetime of a game.
pub struct SoundManager {
    device: Box<dyn AudioDevice>,
    listener: Option<Listener>,
    muted: bool,
}

impl std::fmt::Debug for SoundManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundManager")
            .field("device", &self.device.name())
            .field("listener", &self.listener)
            .field("muted", &self.muted)
            .finish()
    }
}

impl SoundManager {
    /// Acquire `device` according to `config`.
    ///
    /// A disabled config yields a muted manager; the device is not used.
    pub fn init(
        config: &AudioConfig,
        mut device: Box<dyn AudioDevice>,
    ) -> Result<Self, AudioError> {
        if !config.enabled {
            tracing::info!("audio disabled by configuration");
            return Ok(Self::muted());
        }
        if !(0.0..=1.0).contains(&config.master_volume) {
            return Err(AudioError::InvalidVolume(config.master_volume));
        }
        device.set_master_volume(config.master_volume);
        tracing::info!(device = device.name(), volume = config.master_volume, "audio initialized");
        Ok(Self {
            device,
            listener: None,
            muted: false,
        })
    }

    /// A manager that accepts every call and plays nothing.
    pub fn muted() -> Self {
        Self {
            device: Box::new(NullAudioDevice::new()),
            listener: None,
            muted: true,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Last listener pushed to the device, if any.
    pub fn listener(&self) -> Option<Listener> {
        self.listener
    }

    /// Place the listener for the coming step.
    pub fn update(&mut self, listener: Listener) {
        self.device.set_listener(&listener);
        self.listener = Some(listener);
    }

    pub fn shutdown(&mut self) {
        self.device.shutdown();
        tracing::debug!(device = self.device.name(), "audio shut down");
    }
}
