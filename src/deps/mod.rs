//! Merging, validation and rendering of dependency records.
//!
//! The pipeline is pure and deterministic - all I/O happens before the
//! records reach this module.

pub mod merge;
pub mod render;
pub mod validate;

pub use merge::{Inclusion, MergeEngine, MergeStrategy, RecordStore};
pub use render::{Renderer, DEPENDENCY_CALL};
pub use validate::{ProvidedIndex, Validation, Validator};
