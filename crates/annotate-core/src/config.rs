//! Configuration file loading for the annotation tool.
//!
//! Defaults for the engine path and the analysis parameters come from a TOML
//! sidecar file stored beside the executable, so a packaged install works the
//! same regardless of the caller's working directory. A missing file or
//! missing keys fall back to compiled-in defaults; a present but malformed
//! file is a fatal configuration error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the configuration sidecar, looked up in the install directory.
pub const CONFIG_FILE_NAME: &str = "annotate.toml";

/// Default worker thread count handed to the engine.
pub const DEFAULT_THREADS: u32 = 1;
/// Default search depth per analyzed position.
pub const DEFAULT_DEPTH: u32 = 11;
/// Default number of opening moves excluded from analysis.
pub const DEFAULT_OPENING_SKIP: u32 = 4;
/// Engine location used when the configuration names none, relative to the
/// install directory.
pub const DEFAULT_ENGINE_RELATIVE: &str = "bin/engines/stockfish";

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file or resolve the executable path.
    #[error("Failed to read configuration: {0}")]
    Read(#[from] std::io::Error),
    /// The configuration file is not valid TOML.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The running executable has no parent directory to resolve tools from.
    #[error("Cannot resolve the executable's install directory")]
    InstallDir,
}

/// Tool configuration loaded from [`CONFIG_FILE_NAME`].
///
/// Every field is optional in the file; absent keys take the compiled-in
/// defaults silently.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Path to the UCI engine used for annotation. When absent, the bundled
    /// engine at [`DEFAULT_ENGINE_RELATIVE`] is used.
    pub engine: Option<PathBuf>,
    /// Worker threads the engine may use.
    #[serde(default = "default_threads")]
    pub threads: u32,
    /// Search depth per analyzed position.
    #[serde(default = "default_depth")]
    pub depth: u32,
    /// Opening moves excluded from analysis.
    #[serde(default = "default_opening_skip")]
    pub opening_skip: u32,
}

fn default_threads() -> u32 {
    DEFAULT_THREADS
}

fn default_depth() -> u32 {
    DEFAULT_DEPTH
}

fn default_opening_skip() -> u32 {
    DEFAULT_OPENING_SKIP
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: None,
            threads: default_threads(),
            depth: default_depth(),
            opening_skip: default_opening_skip(),
        }
    }
}

impl Config {
    /// Loads the configuration from `path`.
    ///
    /// Returns the compiled-in defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file exists but cannot be read,
    /// or [`ConfigError::Parse`] if it contains invalid TOML.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the directory holding the running executable.
    ///
    /// Bundled tool paths are resolved against this directory rather than
    /// the caller's working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the executable path cannot be
    /// queried, or [`ConfigError::InstallDir`] if it has no parent.
    pub fn install_dir() -> Result<PathBuf, ConfigError> {
        let exe = std::env::current_exe()?;
        let dir = exe.parent().ok_or(ConfigError::InstallDir)?;
        Ok(dir.to_path_buf())
    }

    /// Returns the path of the configuration sidecar for an install directory.
    pub fn sidecar_path(install_dir: &Path) -> PathBuf {
        install_dir.join(CONFIG_FILE_NAME)
    }

    /// The configured engine path, or the bundled default relative to the
    /// install directory.
    pub fn engine_path(&self, install_dir: &Path) -> PathBuf {
        match &self.engine {
            Some(path) => path.clone(),
            None => install_dir.join(DEFAULT_ENGINE_RELATIVE),
        }
    }
}
