//! Filesystem utilities.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glob::glob;
use walkdir::WalkDir;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    fs::write(path, contents)
        .with_context(|| format!("failed to write file: {}", path.display()))
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Expand command-line inputs into an ordered list of files.
///
/// Each input is a file, a directory (walked for `*.js` files in sorted
/// order) or a glob pattern. Relative inputs are resolved against `base`
/// and their matches are returned relative to `base`. A file reached twice
/// is kept at its first position.
pub fn expand_inputs(base: &Path, inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();
    let mut seen = HashSet::new();

    for input in inputs {
        let relative = Path::new(input).is_relative();
        let full = base.join(input);

        let matches = if full.is_dir() {
            walk_js_files(&full)?
        } else if full.is_file() {
            vec![full]
        } else if is_glob(input) {
            glob_files(&full)?
        } else {
            bail!("input not found: {}", input);
        };

        if matches.is_empty() {
            tracing::warn!("no JavaScript files matched `{}`", input);
        }

        for path in matches {
            let path = if relative {
                relative_path(base, &path)
            } else {
                path
            };
            if seen.insert(path.clone()) {
                results.push(path);
            }
        }
    }

    Ok(results)
}

/// Render a path with `/` separators for use as a unit path.
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn is_glob(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

fn walk_js_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("failed to read directory: {}", dir.display()))?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "js")
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn glob_files(pattern: &Path) -> Result<Vec<PathBuf>> {
    let pattern_str = pattern.to_string_lossy();
    let mut files = Vec::new();

    for entry in glob(&pattern_str)
        .with_context(|| format!("invalid glob pattern: {}", pattern_str))?
    {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    files.push(path);
                }
            }
            Err(e) => {
                tracing::warn!("glob error: {}", e);
            }
        }
    }

    files.sort();
    Ok(files)
}
