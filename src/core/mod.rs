//! Core data structures for depswriter.
//!
//! This module contains the types shared by every stage of a run:
//! - Source units (the in-memory inputs)
//! - Namespace sets
//! - Dependency records and their canonical keys

pub mod namespace;
pub mod record;
pub mod source_unit;

pub use namespace::{NamespaceSet, BASE_NAMESPACE};
pub use record::{CanonicalKey, DependencyRecord, LoadFlags, Origin, NO_ORIGIN};
pub use source_unit::SourceUnit;
