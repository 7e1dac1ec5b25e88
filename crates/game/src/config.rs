//! Game configuration.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration.

use std::path::{Path, PathBuf};

use portal_audio::AudioConfig;
use portal_input::Key;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scheduler::SchedulerConfig;

/// What the simulation is advanced by on each scheduling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepMode {
    /// One fixed step of `skip_time_ms` per step owed.
    #[default]
    Quantized,
    /// One advance per pass with the real time since the previous pass,
    /// whether or not a step was owed.
    WallClock,
}

/// How startup treats a subsystem that fails to come up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartupPolicy {
    /// Every failure aborts startup.
    #[default]
    Strict,
    /// Audio failures fall back to a muted sound manager.
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub title: String,
    pub window: WindowConfig,
    /// Visible cursor means the mouse is left free; otherwise it is locked
    /// to the window at startup.
    pub cursor_visible: bool,
    /// Initial scene. Absent or empty selects the default scene under
    /// `data_dir`.
    pub map_path: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub quit_key: Key,
    pub step_mode: StepMode,
    pub startup_policy: StartupPolicy,
    pub scheduler: SchedulerConfig,
    pub audio: AudioConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Portal".to_string(),
            window: WindowConfig::default(),
            cursor_visible: false,
            map_path: None,
            data_dir: PathBuf::from("./data"),
            quit_key: Key::Q,
            step_mode: StepMode::default(),
            startup_policy: StartupPolicy::default(),
            scheduler: SchedulerConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl GameConfig {
    /// Read and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.skip_time_ms == 0 {
            return Err(ConfigError::Invalid("scheduler.skip_time_ms must be positive".into()));
        }
        if self.scheduler.max_skip == 0 {
            return Err(ConfigError::Invalid("scheduler.max_skip must be positive".into()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} must be non-zero",
                self.window.width, self.window.height
            )));
        }
        Ok(())
    }

    /// The scene to load at startup.
    pub fn scene_path(&self) -> PathBuf {
        match &self.map_path {
            Some(path) if !path.as_os_str().is_empty() => path.clone(),
            _ => portal_scene::default_scene_path(&self.data_dir),
        }
    }
}
