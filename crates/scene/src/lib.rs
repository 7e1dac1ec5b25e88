//! Scene loading: turns a scene file into entities in a world.
//!
//! # Layout
//! Scenes live under the data directory, `maps/<name>.yaml` by default.
//! A scene document lists entities; each carries a transform and optional
//! components.

mod document;
mod loader;

use std::path::{Path, PathBuf};

pub use document::{EntityDef, PlayerDef, SceneDocument};
pub use loader::{SceneError, SceneLoader, SceneSummary, YamlSceneLoader};

/// Scene loaded when the configuration does not name one.
pub const DEFAULT_SCENE: &str = "maps/n1.yaml";

/// `<data_dir>/maps/n1.yaml`.
pub fn default_scene_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DEFAULT_SCENE)
}
