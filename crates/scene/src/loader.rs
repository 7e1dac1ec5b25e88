use std::path::{Path, PathBuf};

use portal_kernel::World;

use crate::document::SceneDocument;

/// Errors from scene loading.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
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
    #[error("invalid scene {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// What a load put into the world.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneSummary {
    pub name: Option<String>,
    pub entities: usize,
    pub players: usize,
}

/// Populates a world's initial entity set from a file.
pub trait SceneLoader {
    fn load(&mut self, world: &mut World, path: &Path) -> Result<SceneSummary, SceneError>;
}

/// Loads [`SceneDocument`]s written in YAML.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlSceneLoader;

impl YamlSceneLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse without touching a world.
    pub fn read(path: &Path) -> Result<SceneDocument, SceneError> {
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| SceneError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Spawn every entity of `doc` into `world`.
    pub fn populate(
        world: &mut World,
        doc: &SceneDocument,
        path: &Path,
    ) -> Result<SceneSummary, SceneError> {
        for (i, def) in doc.entities.iter().enumerate() {
            let finite = def.scale.iter().chain(&def.position).all(|v| v.is_finite());
            if !finite {
                return Err(SceneError::Invalid {
                    path: path.to_path_buf(),
                    reason: format!("entity #{i} has a non-finite transform"),
                });
            }
        }

        let mut summary = SceneSummary {
            name: doc.name.clone(),
            ..SceneSummary::default()
        };
        for def in &doc.entities {
            let id = world.spawn(def.transform());
            let components = world.components_mut();
            if let Some(name) = &def.name {
                components.set_name(id, name.clone());
            }
            if let Some(player) = &def.player {
                components.set_player(id, player.to_player());
                summary.players += 1;
            }
            if let Some(body) = def.rigid_body {
                components.set_rigid_body(id, body);
            }
            if let Some(collider) = def.collider {
                components.set_collider(id, collider);
            }
            summary.entities += 1;
        }
        Ok(summary)
    }
}

impl SceneLoader for YamlSceneLoader {
    fn load(&mut self, world: &mut World, path: &Path) -> Result<SceneSummary, SceneError> {
        let _span = tracing::info_span!("scene_load", path = %path.display()).entered();
        let doc = Self::read(path)?;
        let summary = Self::populate(world, &doc, path)?;
        tracing::info!(
            entities = summary.entities,
            players = summary.players,
            "scene loaded"
        );
        Ok(summary)
    }
}
