//! On-disk fixtures for tests that go through the filesystem.

use std::path::{Path, PathBuf};

/// A small Closure-style project: a library checkout plus application
/// sources and a deps file describing part of the library.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    /// Files relative to the project root, with contents.
    pub files: Vec<(PathBuf, String)>,
}

impl ProjectFixture {
    pub fn new() -> Self {
        ProjectFixture { files: Vec::new() }
    }

    /// Library at `closure/`, application at `app/`, deps file at `deps.js`.
    pub fn closure_app() -> Self {
        ProjectFixture::new()
            .with_file("closure/goog/base.js", "var goog = goog || {};\n")
            .with_file(
                "closure/goog/array.js",
                "goog.provide('goog.array');\n",
            )
            .with_file(
                "deps.js",
                "goog.addDependency('goog/array.js', ['goog.array'], []);\n",
            )
            .with_file(
                "app/main.js",
                "goog.provide('app.main');\n\ngoog.require('app.util');\ngoog.require('goog.array');\n",
            )
            .with_file("app/util.js", "goog.provide('app.util');\n")
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Write every file under `root`.
    pub fn write_to(&self, root: &Path) -> std::io::Result<()> {
        for (path, content) in &self.files {
            let full = root.join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(full, content)?;
        }
        Ok(())
    }

    /// Write the fixture into a fresh temporary directory.
    pub fn create(&self) -> tempfile::TempDir {
        let tmp = tempfile::TempDir::new().expect("failed to create temp dir");
        self.write_to(tmp.path()).expect("failed to write fixture");
        tmp
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}
