//! Root-prefix based path resolver.

use std::path::{Component, Path};

use crate::core::CanonicalKey;
use crate::loader::{normalize, PathResolver, ResolutionMode};

/// Resolves paths against a working directory and a list of root prefixes.
///
/// Relative paths are made absolute against the working directory. Root
/// prefixes are only used to shorten paths when synthesizing module names
/// and, in [`ResolutionMode::ModuleAware`], to anchor bare specifiers.
#[derive(Debug, Clone)]
pub struct ModuleLoader {
    working_dir: String,
    /// Normalized absolute roots in configuration order.
    roots: Vec<String>,
    mode: ResolutionMode,
}

impl ModuleLoader {
    /// Create a loader.
    ///
    /// A relative `working_dir` is taken relative to `/`. Relative roots
    /// (including `""` and `"."`) are taken relative to the working directory.
    pub fn new<S: AsRef<str>>(
        working_dir: impl AsRef<str>,
        roots: impl IntoIterator<Item = S>,
        mode: ResolutionMode,
    ) -> Self {
        let working_dir = normalize(&format!("/{}", working_dir.as_ref()));
        let roots = roots
            .into_iter()
            .map(|root| absolutize(&working_dir, root.as_ref()))
            .collect();

        ModuleLoader {
            working_dir,
            roots,
            mode,
        }
    }

    pub fn working_dir(&self) -> &str {
        &self.working_dir
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// The longest root containing `key`, without trailing separator.
    fn matching_root(&self, key: &CanonicalKey) -> Option<&str> {
        self.roots
            .iter()
            .filter(|root| key.is_under(&CanonicalKey::new(root.as_str())))
            .max_by_key(|root| root.len())
            .map(|root| root.trim_end_matches('/'))
    }
}

impl PathResolver for ModuleLoader {
    fn resolve(&self, raw_path: &str) -> CanonicalKey {
        CanonicalKey::new(absolutize(&self.working_dir, raw_path))
    }

    fn relativize(&self, key: &CanonicalKey, reference_root: &CanonicalKey) -> String {
        let key_path = Path::new(key.as_str());
        let diff = match pathdiff::diff_paths(key_path, Path::new(reference_root.as_str())) {
            Some(diff) => diff,
            None => return key.to_string(),
        };

        let segments: Vec<String> = diff
            .components()
            .filter_map(|component| match component {
                Component::ParentDir => Some("..".to_string()),
                Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        if segments.is_empty() {
            ".".to_string()
        } else {
            segments.join("/")
        }
    }

    fn resolve_import(&self, from: &CanonicalKey, specifier: &str) -> Option<CanonicalKey> {
        let target = if specifier.starts_with("./") || specifier.starts_with("../") {
            let dir = from
                .as_str()
                .rsplit_once('/')
                .map_or("", |(dir, _)| dir);
            format!("{}/{}", dir, specifier)
        } else if specifier.starts_with('/') {
            specifier.to_string()
        } else {
            match self.mode {
                ResolutionMode::Legacy => return None,
                ResolutionMode::ModuleAware => {
                    let base = self.roots.first().unwrap_or(&self.working_dir);
                    format!("{}/{}", base, specifier)
                }
            }
        };

        let mut target = normalize(&target);
        if !target.ends_with(".js") && !target.ends_with(".mjs") {
            target.push_str(".js");
        }
        Some(CanonicalKey::new(target))
    }

    fn module_name(&self, key: &CanonicalKey) -> String {
        let path = key.as_str();
        let relative = match self.matching_root(key) {
            Some(root) => path.strip_prefix(root).unwrap_or(path),
            None => path,
        };
        let relative = relative.trim_start_matches('/');
        let relative = relative.strip_suffix(".js").unwrap_or(relative);

        let mut name = String::with_capacity(relative.len() + 7);
        name.push_str("module$");
        for c in relative.chars() {
            match c {
                '/' | '\\' | '@' => name.push('$'),
                c if c.is_ascii_alphanumeric() || c == '_' || c == '$' => name.push(c),
                _ => name.push('_'),
            }
        }
        name
    }
}

fn absolutize(working_dir: &str, path: &str) -> String {
    if path.starts_with('/') {
        normalize(path)
    } else {
        normalize(&format!("{}/{}", working_dir, path))
    }
}
