//! High-level operations.
//!
//! This module contains the implementation of depswriter commands.

pub mod generate;

pub use generate::{DepsGenerator, GenerateOptions};
