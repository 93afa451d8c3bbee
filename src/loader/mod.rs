//! Path resolution.
//!
//! Every file is identified by a [`CanonicalKey`]. The [`PathResolver`] trait
//! is the seam between the generator and whatever decides what a path means;
//! [`ModuleLoader`] is the implementation used by the CLI and the tests.

pub mod module_loader;

pub use module_loader::ModuleLoader;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::CanonicalKey;

/// How import specifiers are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionMode {
    /// Only `./`, `../` and `/` specifiers resolve.
    #[default]
    Legacy,
    /// Bare specifiers additionally resolve under the first root prefix.
    ModuleAware,
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionMode::Legacy => write!(f, "legacy"),
            ResolutionMode::ModuleAware => write!(f, "module-aware"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown resolution mode `{0}` (expected `legacy` or `module-aware`)")]
pub struct UnknownResolutionMode(String);

impl FromStr for ResolutionMode {
    type Err = UnknownResolutionMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(ResolutionMode::Legacy),
            "module-aware" | "module_aware" => Ok(ResolutionMode::ModuleAware),
            _ => Err(UnknownResolutionMode(s.to_string())),
        }
    }
}

/// Canonicalizes paths and resolves module specifiers.
pub trait PathResolver {
    /// Canonicalize a raw path as supplied by the user or a deps file.
    fn resolve(&self, raw_path: &str) -> CanonicalKey;

    /// Render `key` relative to `reference_root`, using `..` as needed.
    fn relativize(&self, key: &CanonicalKey, reference_root: &CanonicalKey) -> String;

    /// Resolve an import specifier found in `from`.
    ///
    /// Returns `None` when the specifier cannot be resolved in the active
    /// mode.
    fn resolve_import(&self, from: &CanonicalKey, specifier: &str) -> Option<CanonicalKey>;

    /// The synthesized namespace an ES6 module at `key` provides.
    fn module_name(&self, key: &CanonicalKey) -> String;
}

/// Fold `.`, `..` and empty segments of a `/`-separated path.
///
/// Backslashes are treated as separators. `..` above the root of an
/// absolute path is dropped; in a relative path it is kept.
pub(crate) fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(last) if *last != ".." => {
                    segments.pop();
                }
                _ if !absolute => segments.push(".."),
                _ => {}
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}
