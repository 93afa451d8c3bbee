//! Configuration file support for depswriter.
//!
//! depswriter reads two configuration files:
//! - Global: `<config dir>/depswriter/config.toml` - User-wide defaults
//! - Project: `depswriter.toml` in the working directory
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::deps::MergeStrategy;
use crate::loader::ResolutionMode;

/// Name of the project configuration file.
pub const PROJECT_CONFIG_FILE: &str = "depswriter.toml";

/// depswriter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for `generate` and `check`
    pub generate: GenerateConfig,
}

/// Generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Root prefixes used to shorten module names
    pub roots: Vec<String>,

    /// Directory containing `goog/base.js`
    pub library_root: Option<String>,

    /// Merge strategy (always, when-in-srcs, do-not-duplicate)
    pub merge_strategy: Option<String>,

    /// Import resolution mode (legacy, module-aware)
    pub resolution_mode: Option<String>,

    /// Where to write the deps file (stdout when unset)
    pub output: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if !other.generate.roots.is_empty() {
            self.generate.roots = other.generate.roots;
        }
        if other.generate.library_root.is_some() {
            self.generate.library_root = other.generate.library_root;
        }
        if other.generate.merge_strategy.is_some() {
            self.generate.merge_strategy = other.generate.merge_strategy;
        }
        if other.generate.resolution_mode.is_some() {
            self.generate.resolution_mode = other.generate.resolution_mode;
        }
        if other.generate.output.is_some() {
            self.generate.output = other.generate.output;
        }
    }

    /// Parse the merge strategy from its config string.
    pub fn merge_strategy(&self) -> Result<Option<MergeStrategy>> {
        self.generate
            .merge_strategy
            .as_deref()
            .map(|s| s.parse().context("invalid `generate.merge_strategy`"))
            .transpose()
    }

    /// Parse the resolution mode from its config string.
    pub fn resolution_mode(&self) -> Result<Option<ResolutionMode>> {
        self.generate
            .resolution_mode
            .as_deref()
            .map(|s| s.parse().context("invalid `generate.resolution_mode`"))
            .transpose()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (depswriter.toml)
/// 2. Global config
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    // Project config overrides global
    config.merge(Config::load_or_default(project_path));

    config
}
