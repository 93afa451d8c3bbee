//! Merging scanned sources with deps file declarations.
//!
//! Records are keyed by [`CanonicalKey`]. A key keeps the position at which
//! it was first seen during the run; re-encountering it later overwrites the
//! content and attribution in place. This is what keeps the rendered output
//! stable across rebuilds that list the same deps files.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{CanonicalKey, DependencyRecord};

/// Policy for deps file records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Write every deps file record.
    #[default]
    Always,
    /// Write deps file records only for files that are also sources.
    WhenInSrcs,
    /// Never write deps file records, and drop sources a deps file already
    /// describes.
    DoNotDuplicate,
}

/// What to do with one incoming record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// Upsert into the output.
    Include,
    /// Keep out of the output; still known for validation.
    Exclude,
    /// As `Exclude`, and also drop the matching source from the output.
    ExcludeWithSource,
}

impl MergeStrategy {
    /// Classify a record by where it came from and whether its key belongs
    /// to one of the sources given directly.
    pub fn classify(self, from_manifest: bool, in_sources: bool) -> Inclusion {
        if !from_manifest {
            return Inclusion::Include;
        }
        match (self, in_sources) {
            (MergeStrategy::Always, _) => Inclusion::Include,
            (MergeStrategy::WhenInSrcs, true) => Inclusion::Include,
            (MergeStrategy::WhenInSrcs, false) => Inclusion::Exclude,
            (MergeStrategy::DoNotDuplicate, true) => Inclusion::ExcludeWithSource,
            (MergeStrategy::DoNotDuplicate, false) => Inclusion::Exclude,
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeStrategy::Always => write!(f, "always"),
            MergeStrategy::WhenInSrcs => write!(f, "when-in-srcs"),
            MergeStrategy::DoNotDuplicate => write!(f, "do-not-duplicate"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown merge strategy `{0}` (expected `always`, `when-in-srcs` or `do-not-duplicate`)")]
pub struct UnknownMergeStrategy(String);

impl FromStr for MergeStrategy {
    type Err = UnknownMergeStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "always" => Ok(MergeStrategy::Always),
            "when-in-srcs" => Ok(MergeStrategy::WhenInSrcs),
            "do-not-duplicate" => Ok(MergeStrategy::DoNotDuplicate),
            _ => Err(UnknownMergeStrategy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    record: DependencyRecord,
    /// Whether the record is written to the output.
    emitted: bool,
}

/// Position-preserving record store.
///
/// Holds every record known to the run. Records withheld by the merge
/// strategy stay here so validation still sees what they provide.
#[derive(Debug, Default)]
pub struct RecordStore {
    positions: HashMap<CanonicalKey, usize>,
    entries: Vec<Entry>,
}

impl RecordStore {
    /// Insert at the end, or overwrite in place if the key is known.
    ///
    /// `emitted` applies to new entries only; existing entries keep theirs.
    fn upsert(&mut self, record: DependencyRecord, emitted: bool) -> usize {
        match self.positions.get(&record.key) {
            Some(&pos) => {
                self.entries[pos].record = record;
                pos
            }
            None => {
                let pos = self.entries.len();
                self.positions.insert(record.key.clone(), pos);
                self.entries.push(Entry { record, emitted });
                pos
            }
        }
    }

    /// Records to write, in first-seen order.
    pub fn emitted(&self) -> impl Iterator<Item = &DependencyRecord> {
        self.entries
            .iter()
            .filter(|entry| entry.emitted)
            .map(|entry| &entry.record)
    }

    /// Every record known to the run, written or not, in first-seen order.
    pub fn known(&self) -> impl Iterator<Item = &DependencyRecord> {
        self.entries.iter().map(|entry| &entry.record)
    }

    pub fn get(&self, key: &CanonicalKey) -> Option<&DependencyRecord> {
        self.positions.get(key).map(|&pos| &self.entries[pos].record)
    }

    pub fn is_emitted(&self, key: &CanonicalKey) -> bool {
        self.positions
            .get(key)
            .is_some_and(|&pos| self.entries[pos].emitted)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds a [`RecordStore`] from sources and deps files.
///
/// Sources must all be added before the first deps file.
pub struct MergeEngine {
    strategy: MergeStrategy,
    source_keys: HashSet<CanonicalKey>,
    store: RecordStore,
}

impl MergeEngine {
    pub fn new(strategy: MergeStrategy) -> Self {
        MergeEngine {
            strategy,
            source_keys: HashSet::new(),
            store: RecordStore::default(),
        }
    }

    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    /// Add a record scanned from a source given directly.
    pub fn add_source(&mut self, record: DependencyRecord) {
        self.source_keys.insert(record.key.clone());
        let pos = self.store.upsert(record, true);
        self.store.entries[pos].emitted = true;
    }

    /// Add the records of one deps file, in declaration order.
    pub fn add_manifest(&mut self, records: impl IntoIterator<Item = DependencyRecord>) {
        for record in records {
            let in_sources = self.source_keys.contains(&record.key);
            match self.strategy.classify(true, in_sources) {
                Inclusion::Include => {
                    let pos = self.store.upsert(record, true);
                    self.store.entries[pos].emitted = true;
                }
                Inclusion::Exclude => {
                    self.store.upsert(record, false);
                }
                Inclusion::ExcludeWithSource => {
                    if let Some(&pos) = self.store.positions.get(&record.key) {
                        tracing::debug!(key = %record.key, "dropping source already described by a deps file");
                        self.store.entries[pos].emitted = false;
                    }
                }
            }
        }
    }

    /// Add records that only supply namespaces, such as the library's own
    /// deps file. They are never written and never replace a known record.
    pub fn add_withheld(&mut self, records: impl IntoIterator<Item = DependencyRecord>) {
        for record in records {
            if self.store.positions.contains_key(&record.key) {
                continue;
            }
            self.store.upsert(record, false);
        }
    }

    pub fn finish(self) -> RecordStore {
        tracing::debug!(
            strategy = %self.strategy,
            known = self.store.len(),
            emitted = self.store.emitted().count(),
            "merged dependency records"
        );
        self.store
    }
}
