//! Configuration Loader
//!
//! Finds `tally.toml` by walking up from a start directory and merges it
//! with environment overrides.

use crate::run::RunConfig;
use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "tally.toml";

/// On-disk layout of tally.toml
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectFile {
    #[serde(default)]
    run: RunConfig,
}

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Effective run settings
    pub run: RunConfig,

    /// Directory where tally.toml was found
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if a tally.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }
}

/// Configuration loader
///
/// Precedence, lowest first: defaults, tally.toml, environment. CLI flags
/// are applied by the caller on top of the returned [`Config`].
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Skip environment overrides (used by tests and embedders)
    ignore_env: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self { ignore_env: false }
    }

    /// Do not read `TALLY_*` / `NO_COLOR` variables
    pub fn without_env(mut self) -> Self {
        self.ignore_env = true;
        self
    }

    /// Load configuration starting from the given directory
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, run) = match find_config_file(start_dir) {
            Some(path) => {
                let run = load_run_config(&path)?;
                (path.parent().map(Path::to_path_buf), run)
            }
            None => (None, RunConfig::default()),
        };

        Ok(Config {
            run: self.finish(run)?,
            project_root,
        })
    }

    /// Load configuration from a specific tally.toml
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Config> {
        let run = load_run_config(config_path)?;
        Ok(Config {
            run: self.finish(run)?,
            project_root: config_path.parent().map(Path::to_path_buf),
        })
    }

    fn finish(&self, run: RunConfig) -> ConfigResult<RunConfig> {
        if self.ignore_env {
            Ok(run)
        } else {
            run.apply_env()
        }
    }
}

/// Walk up from `start_dir` looking for tally.toml
fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

fn load_run_config(path: &Path) -> ConfigResult<RunConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::IoError(e)
        }
    })?;

    let file: ProjectFile = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
        file: path.to_path_buf(),
        error: e,
    })?;

    Ok(file.run)
}
