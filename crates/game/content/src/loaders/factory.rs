//! Content factory for loading levels from a data directory.

use std::path::{Path, PathBuf};

use anyhow::bail;
use puzzle_core::GameConfig;

use crate::loaders::{ConfigLoader, Level, LevelLoader, LoadResult};

/// Content factory that loads game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml      (optional)
/// └── levels/
///     ├── 01_push.ron
///     └── 02_bridge.json
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`, or defaults when the file
    /// does not exist.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load `levels/<name>.ron`, falling back to `levels/<name>.json`.
    pub fn load_level(&self, name: &str, config: GameConfig) -> LoadResult<Level> {
        let levels = self.data_dir.join("levels");
        for ext in ["ron", "json"] {
            let path = levels.join(format!("{name}.{ext}"));
            if path.exists() {
                return LevelLoader::load(&path, config);
            }
        }
        bail!("No level named `{name}` in {}", levels.display())
    }

    /// Names of all level files, sorted.
    pub fn level_names(&self) -> LoadResult<Vec<String>> {
        let levels = self.data_dir.join("levels");
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&levels)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", levels.display(), e))?
        {
            let path = entry?.path();
            let is_level = path
                .extension()
                .is_some_and(|ext| ext == "ron" || ext == "json");
            if let (true, Some(stem)) = (is_level, path.file_stem()) {
                names.push(stem.to_string_lossy().into_owned());
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
