//! Test utilities for depswriter unit tests.
//!
//! [`Scenario`] builds an in-memory generator run and [`GeneratorRun`]
//! holds its outcome with assertion helpers modelled on how the tests read:
//!
//! ```rust,ignore
//! let run = Scenario::new(loader)
//!     .library_root("/base/javascript/closure")
//!     .manifest("dep1.js", "goog.addDependency('a.js', ['a'], []);")
//!     .source("src1.js", "goog.require('b');")
//!     .run();
//! run.assert_counts(1, 0);
//! ```

pub mod fixtures;

pub use fixtures::*;

use crate::core::SourceUnit;
use crate::deps::MergeStrategy;
use crate::loader::ModuleLoader;
use crate::ops::{DepsGenerator, GenerateOptions};
use crate::util::diagnostic::{Diagnostic, Severity};

/// Inputs for one generator run.
#[derive(Debug, Clone)]
pub struct Scenario {
    loader: ModuleLoader,
    options: GenerateOptions,
    manifests: Vec<SourceUnit>,
    sources: Vec<SourceUnit>,
}

impl Scenario {
    pub fn new(loader: ModuleLoader) -> Self {
        Scenario {
            loader,
            options: GenerateOptions::default(),
            manifests: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub fn library_root(mut self, root: &str) -> Self {
        self.options.library_root = root.to_string();
        self
    }

    pub fn strategy(mut self, strategy: MergeStrategy) -> Self {
        self.options.merge_strategy = strategy;
        self
    }

    pub fn manifest(mut self, path: &str, text: impl Into<String>) -> Self {
        self.manifests.push(SourceUnit::from_code(path, text));
        self
    }

    pub fn source(mut self, path: &str, text: impl Into<String>) -> Self {
        self.sources.push(SourceUnit::from_code(path, text));
        self
    }

    pub fn run(&self) -> GeneratorRun {
        let generator = DepsGenerator::new(
            &self.manifests,
            &self.sources,
            self.options.clone(),
            &self.loader,
        );
        let mut diagnostics = Vec::new();
        let output = generator.generate(&mut diagnostics);
        GeneratorRun {
            output,
            diagnostics,
        }
    }
}

/// Outcome of a [`Scenario`].
#[derive(Debug)]
pub struct GeneratorRun {
    pub output: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GeneratorRun {
    /// The rendered text; panics when the run was fatal.
    pub fn output(&self) -> &str {
        match &self.output {
            Some(output) => output,
            None => panic!("expected output, got none: {:#?}", self.diagnostics),
        }
    }

    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.with_severity(Severity::Warning)
    }

    fn with_severity(&self, severity: Severity) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .collect()
    }

    pub fn assert_counts(&self, errors: usize, warnings: usize) {
        assert_eq!(
            (self.errors().len(), self.warnings().len()),
            (errors, warnings),
            "unexpected diagnostics: {:#?}",
            self.diagnostics
        );
    }

    pub fn assert_error(&self, message: &str) {
        assert!(
            self.errors().iter().any(|d| d.message == message),
            "no error '{}' in {:#?}",
            message,
            self.diagnostics
        );
    }

    pub fn assert_warning(&self, message: &str) {
        assert!(
            self.warnings().iter().any(|d| d.message == message),
            "no warning '{}' in {:#?}",
            message,
            self.diagnostics
        );
    }
}

/// Assertion helpers for testing.
pub mod assertions {
    /// Assert that an error message contains a substring.
    pub fn assert_error_contains<T: std::fmt::Debug>(
        result: anyhow::Result<T>,
        substring: &str,
    ) {
        match result {
            Ok(v) => panic!("expected Err containing '{}', got Ok: {:?}", substring, v),
            Err(e) => {
                let msg = format!("{:#}", e);
                assert!(
                    msg.contains(substring),
                    "error '{}' does not contain '{}'",
                    msg,
                    substring
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ResolutionMode;

    #[test]
    fn test_scenario_defaults() {
        let run = Scenario::new(ModuleLoader::new("/", ["/"], ResolutionMode::Legacy))
            .source("a.js", "goog.provide('a');")
            .run();
        run.assert_counts(0, 0);
        assert_eq!(run.output(), "goog.addDependency('a.js', ['a'], []);\n");
    }
}
