//! Global context for depswriter operations.
//!
//! Provides centralized access to configuration paths and output settings.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::util::config::{load_config, Config, PROJECT_CONFIG_FILE};

/// Project directories for depswriter
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("com", "depswriter", "depswriter"));

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Directory holding the global config file, if the platform has one
    config_dir: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let config_dir = PROJECT_DIRS
            .as_ref()
            .map(|dirs| dirs.config_dir().to_path_buf());

        GlobalContext {
            cwd,
            config_dir,
            verbose: false,
            color: true,
        }
    }

    /// Override the global config directory.
    pub fn with_config_dir(mut self, config_dir: Option<PathBuf>) -> Self {
        self.config_dir = config_dir;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the global configuration file path.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|dir| dir.join("config.toml"))
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        self.cwd.join(PROJECT_CONFIG_FILE)
    }

    /// Load the merged global and project configuration.
    pub fn load_config(&self) -> Config {
        let global = self.global_config_path();
        load_config(global.as_deref(), &self.project_config_path())
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }
}
