//! depswriter - dependency file generator for Closure-style JavaScript
//!
//! This crate scans JavaScript sources for `goog.provide` / `goog.require`
//! and ES module syntax, merges the result with existing deps files and
//! writes a `goog.addDependency` deps file.

pub mod core;
pub mod deps;
pub mod loader;
pub mod ops;
pub mod scan;
pub mod util;

/// Test utilities for depswriter unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests.
#[cfg(test)]
pub mod test_support;

pub use core::{CanonicalKey, DependencyRecord, SourceUnit};
pub use deps::MergeStrategy;
pub use loader::{ModuleLoader, PathResolver, ResolutionMode};
pub use ops::{DepsGenerator, GenerateOptions};
pub use util::context::GlobalContext;
