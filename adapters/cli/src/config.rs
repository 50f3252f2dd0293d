//! TOML game configuration: global defaults plus the ordered level list.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use maze_chase_core::{GameSettings, LevelConfig};
use serde::Deserialize;
use tracing::info;

/// Parsed contents of a game configuration file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameFile {
    pub(crate) defaults: GameSettings,
    pub(crate) levels: Vec<LevelConfig>,
}

impl GameFile {
    /// Loads the configuration at `path`, falling back to built-in defaults when it is absent.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "config_missing_using_defaults");
                return Ok(Self::default());
            }
            Err(error) => {
                return Err(error).with_context(|| {
                    format!("failed to read game config at {}", path.display())
                });
            }
        };

        let file = Self::parse(&contents)
            .with_context(|| format!("invalid game config at {}", path.display()))?;
        info!(
            path = %path.display(),
            levels = file.levels.len(),
            "config_loaded"
        );
        Ok(file)
    }

    fn parse(contents: &str) -> Result<Self> {
        let file: Self = toml::from_str(contents).context("failed to parse game config toml")?;
        file.defaults
            .validate()
            .context("invalid [defaults] table")?;
        for (index, level) in file.levels.iter().enumerate() {
            level
                .validate()
                .with_context(|| format!("invalid level #{index} `{}`", level.name))?;
        }
        Ok(file)
    }

    /// Levels to play, substituting a single level of the given size when none are configured.
    pub(crate) fn levels_or(&self, width: u32, height: u32) -> Result<Vec<LevelConfig>> {
        if !self.levels.is_empty() {
            return Ok(self.levels.clone());
        }
        if width == 0 || height == 0 {
            bail!("maze dimensions must be positive, got {width}x{height}");
        }
        Ok(vec![LevelConfig::new("default", width, height)])
    }
}

/// Default location of the game configuration file.
pub(crate) fn default_path() -> PathBuf {
    PathBuf::from("maze-chase.toml")
}
