//! Dependency records - what one file provides, requires, and how it loads.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::core::NamespaceSet;

/// Load flags attached to a declaration, e.g. `lang` and `module`.
///
/// A `BTreeMap` so flags always render in the same order.
pub type LoadFlags = BTreeMap<String, String>;

/// Origin label used for records scanned directly from sources.
pub const NO_ORIGIN: &str = "none";

/// The normalized path identifying a file across deps files and sources.
///
/// Always absolute and `/`-separated, with `.` and `..` segments folded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// Wrap an already-normalized path.
    pub(crate) fn new(path: impl Into<String>) -> Self {
        CanonicalKey(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key is `root` itself or lies below it.
    ///
    /// The test is segment-aware: `/lib/closure-extra/a.js` is not under
    /// `/lib/closure`.
    pub fn is_under(&self, root: &CanonicalKey) -> bool {
        let root = root.0.trim_end_matches('/');
        if root.is_empty() {
            return true;
        }
        match self.0.strip_prefix(root) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a record's content came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Scanned from a source file given directly; holds the raw path.
    Scanned { path: String },
    /// Declared by a deps file; holds that file's path.
    Manifest { path: String },
}

impl Origin {
    /// The attribution label: the deps file path, or `none` for scans.
    pub fn label(&self) -> &str {
        match self {
            Origin::Scanned { .. } => NO_ORIGIN,
            Origin::Manifest { path } => path,
        }
    }

    /// The file to name when reporting a problem with this record.
    pub fn file(&self) -> &str {
        match self {
            Origin::Scanned { path } | Origin::Manifest { path } => path,
        }
    }

    pub fn is_manifest(&self) -> bool {
        matches!(self, Origin::Manifest { .. })
    }
}

/// One file's dependency information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    pub key: CanonicalKey,
    pub provides: NamespaceSet,
    pub requires: NamespaceSet,
    pub load_flags: LoadFlags,
    pub origin: Origin,
}

impl DependencyRecord {
    pub fn new(key: CanonicalKey, origin: Origin) -> Self {
        DependencyRecord {
            key,
            provides: NamespaceSet::new(),
            requires: NamespaceSet::new(),
            load_flags: LoadFlags::new(),
            origin,
        }
    }

    /// Builder-style helper for provides.
    pub fn with_provides<S: Into<String>>(mut self, provides: impl IntoIterator<Item = S>) -> Self {
        self.provides = provides.into_iter().collect();
        self
    }

    /// Builder-style helper for requires.
    pub fn with_requires<S: Into<String>>(mut self, requires: impl IntoIterator<Item = S>) -> Self {
        self.requires = requires.into_iter().collect();
        self
    }

    pub fn with_flag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.load_flags.insert(name.into(), value.into());
        self
    }

    /// Whether this record describes an ES6 module.
    pub fn is_es6_module(&self) -> bool {
        self.load_flags.get("module").map(String::as_str) == Some("es6")
    }
}
