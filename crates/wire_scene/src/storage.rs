//! # Scene Storage
//!
//! One binary file per entity under a scene directory:
//!
//! ```text
//! <dir>/Entity_1.ent
//! <dir>/Entity_2.ent
//! ```
//!
//! Each file holds exactly one record in the [`wire_core::codec`] format.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use wire_core::{EntityCodec, TypeRegistry};

use crate::config::SceneConfig;
use crate::error::{SceneError, SceneResult};
use crate::scene::{Entity, Scene};

/// Reads and writes entity files in one directory.
#[derive(Clone, Debug)]
pub struct SceneStorage {
    dir: PathBuf,
    config: SceneConfig,
}

impl SceneStorage {
    /// Creates storage rooted at `dir` using default file naming.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_config(dir, SceneConfig::default())
    }

    /// Creates storage rooted at `dir`.
    #[must_use]
    pub fn with_config(dir: impl Into<PathBuf>, config: SceneConfig) -> Self {
        Self {
            dir: dir.into(),
            config,
        }
    }

    /// The scene directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Path of the file holding `entity`.
    #[must_use]
    pub fn entity_path(&self, entity: Entity) -> PathBuf {
        self.dir.join(format!(
            "{}{}.{}",
            self.config.entity_file_prefix, entity, self.config.entity_file_extension
        ))
    }

    /// Writes one entity to its file, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Codec`] if the entity cannot be encoded and
    /// [`SceneError::Io`] if the file cannot be written.
    pub fn save_entity(
        &self,
        types: &TypeRegistry,
        scene: &Scene,
        entity: Entity,
    ) -> SceneResult<PathBuf> {
        let bytes = EntityCodec::new(types).encode(scene.registry(), entity.id())?;
        fs::create_dir_all(&self.dir).map_err(|e| SceneError::io(&self.dir, e))?;

        let path = self.entity_path(entity);
        fs::write(&path, &bytes).map_err(|e| SceneError::io(&path, e))?;
        tracing::trace!("Saved entity {} to {}", entity, path.display());
        Ok(path)
    }

    /// Reads one entity file into `scene`, keeping its stored id.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Io`] if the file cannot be read and
    /// [`SceneError::Decode`] if it is not a valid record or its id is
    /// already alive in `scene`.
    pub fn load_entity(
        &self,
        path: impl AsRef<Path>,
        types: &TypeRegistry,
        scene: &mut Scene,
    ) -> SceneResult<Entity> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| SceneError::io(path, e))?;
        let id = EntityCodec::new(types)
            .decode(&bytes, scene.registry_mut())
            .map_err(|source| SceneError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Entity::new(id))
    }

    /// Writes every live entity of `scene` and deletes entity files of
    /// entities that no longer exist. Returns the number of files written.
    ///
    /// # Errors
    ///
    /// Stops at the first entity that cannot be encoded or written.
    pub fn save_scene(&self, types: &TypeRegistry, scene: &Scene) -> SceneResult<usize> {
        let mut written = HashSet::with_capacity(scene.len());
        for entity in scene.entities() {
            written.insert(self.save_entity(types, scene, entity)?);
        }

        for stale in self.entity_files()? {
            if !written.contains(&stale) {
                fs::remove_file(&stale).map_err(|e| SceneError::io(&stale, e))?;
                tracing::trace!("Removed stale entity file {}", stale.display());
            }
        }

        tracing::debug!(
            "Saved scene {} ({} entities) to {}",
            scene.name(),
            written.len(),
            self.dir.display()
        );
        Ok(written.len())
    }

    /// Loads every entity file of the directory into a new scene.
    ///
    /// Files are read in name order. A missing directory yields an empty
    /// scene.
    ///
    /// # Errors
    ///
    /// Fails on the first file that cannot be read or decoded; the error
    /// names that file.
    pub fn load_scene(&self, types: &TypeRegistry) -> SceneResult<Scene> {
        let mut scene = Scene::with_config(&self.config);
        for path in self.entity_files()? {
            if let Err(err) = self.load_entity(&path, types, &mut scene) {
                tracing::warn!("Failed to load scene {}: {}", scene.name(), err);
                return Err(err);
            }
        }

        tracing::debug!(
            "Loaded scene {} ({} entities) from {}",
            scene.name(),
            scene.len(),
            self.dir.display()
        );
        Ok(scene)
    }

    /// Entity files in the directory, sorted by file name.
    fn entity_files(&self) -> SceneResult<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SceneError::io(&self.dir, e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| SceneError::io(&self.dir, e))?.path();
            if self.is_entity_file(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn is_entity_file(&self, path: &Path) -> bool {
        let extension_matches = path
            .extension()
            .is_some_and(|ext| ext == self.config.entity_file_extension.as_str());
        let prefix_matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(&self.config.entity_file_prefix));
        extension_matches && prefix_matches && path.is_file()
    }
}
