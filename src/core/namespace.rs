//! Ordered, duplicate-free namespace sequences.

use std::fmt;

/// The namespace that stands for the base runtime library.
///
/// It is always loaded first by the runtime, so requiring it is implicitly
/// satisfied and it never appears in a requires list.
pub const BASE_NAMESPACE: &str = "goog";

/// An ordered set of namespaces.
///
/// Insertion order is kept for deterministic rendering. Sets are small (a
/// handful of entries per file), so membership is a linear scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceSet {
    items: Vec<String>,
}

impl NamespaceSet {
    pub fn new() -> Self {
        NamespaceSet { items: Vec::new() }
    }

    /// Append `namespace` unless already present.
    ///
    /// Returns `false` when the namespace was a duplicate, so callers can
    /// warn about it.
    pub fn insert(&mut self, namespace: impl Into<String>) -> bool {
        let namespace = namespace.into();
        if self.contains(&namespace) {
            return false;
        }
        self.items.push(namespace);
        true
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.items.iter().any(|n| n == namespace)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for NamespaceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = NamespaceSet::new();
        for namespace in iter {
            set.insert(namespace);
        }
        set
    }
}

impl<'a> IntoIterator for &'a NamespaceSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for NamespaceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.items.join(", "))
    }
}
