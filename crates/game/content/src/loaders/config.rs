//! Game configuration loader.

use std::path::Path;

use anyhow::Context;
use puzzle_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        let mut config: GameConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config TOML {}", path.display()))?;
        config.trigger_pass_limit = config.trigger_pass_limit.max(1);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "trigger_pass_limit = 0").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.trigger_pass_limit, 1);
        assert_eq!(config.tile_size, GameConfig::DEFAULT_TILE_SIZE);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
