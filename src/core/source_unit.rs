//! Source units - one logical input file, already loaded into memory.

use std::path::Path;

use anyhow::Result;

use crate::util::fs;

/// One input file: either a source to scan or a deps file to parse.
///
/// The path is kept exactly as supplied; canonicalization happens in the
/// [`PathResolver`](crate::loader::PathResolver).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    path: String,
    text: String,
    source_map: Option<String>,
}

impl SourceUnit {
    /// Create a unit from in-memory code.
    pub fn from_code(path: impl Into<String>, text: impl Into<String>) -> Self {
        SourceUnit {
            path: path.into(),
            text: text.into(),
            source_map: None,
        }
    }

    /// Load `base.join(path)` from disk, keeping `path` as given for display.
    pub fn from_file(base: &Path, path: &Path) -> Result<Self> {
        let text = fs::read_to_string(&base.join(path))?;
        Ok(SourceUnit::from_code(fs::display_path(path), text))
    }

    /// Attach an embedded source map. Carried through, never read here.
    pub fn with_source_map(mut self, source_map: impl Into<String>) -> Self {
        self.source_map = Some(source_map.into());
        self
    }

    /// The path as supplied by the caller.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source_map(&self) -> Option<&str> {
        self.source_map.as_deref()
    }
}
