use std::path::PathBuf;

use portal_audio::AudioError;
use portal_input::WindowError;
use portal_kernel::WorldError;
use portal_render::RenderError;
use portal_scene::SceneError;

/// Errors reading or validating a [`crate::GameConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Faults while bringing the game up. Any of these leaves no game behind.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("window: {0}")]
    Window(#[from] WindowError),
    #[error("audio: {0}")]
    Audio(#[from] AudioError),
    #[error("world: {0}")]
    World(#[from] WorldError),
    #[error("scene: {0}")]
    Scene(#[from] SceneError),
    #[error("renderer: {0}")]
    Render(#[from] RenderError),
    #[error("scene {path} has no controlled entity: {source}")]
    NoPlayer {
        path: PathBuf,
        #[source]
        source: WorldError,
    },
}

/// Faults inside a running frame. Returned to whoever drives the loop.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("simulation: {0}")]
    World(#[from] WorldError),
    #[error("render: {0}")]
    Render(#[from] RenderError),
    #[error("game is not running")]
    NotRunning,
}
