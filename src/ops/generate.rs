//! Implementation of `depswriter generate`.
//!
//! Wires the scanner, the deps file parser, the merge engine, the
//! validator and the renderer into one pass over in-memory inputs.

use crate::core::{CanonicalKey, SourceUnit};
use crate::deps::{MergeEngine, MergeStrategy, RecordStore, Renderer, Validator};
use crate::loader::PathResolver;
use crate::scan::{ManifestParser, NamespaceScanner};
use crate::util::diagnostic::{CountingSink, DiagnosticSink};

/// Options for a generate run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub merge_strategy: MergeStrategy,
    /// Directory containing `goog/base.js`. Written paths are relative to it.
    pub library_root: String,
}

/// Computes the deps file for a set of deps files and sources.
pub struct DepsGenerator<'a> {
    manifests: &'a [SourceUnit],
    sources: &'a [SourceUnit],
    options: GenerateOptions,
    resolver: &'a dyn PathResolver,
}

impl<'a> DepsGenerator<'a> {
    pub fn new(
        manifests: &'a [SourceUnit],
        sources: &'a [SourceUnit],
        options: GenerateOptions,
        resolver: &'a dyn PathResolver,
    ) -> Self {
        DepsGenerator {
            manifests,
            sources,
            options,
            resolver,
        }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Compute the deps file text.
    ///
    /// Returns `None` when an error was reported; warnings alone still
    /// produce output. Every problem goes to `sink`.
    pub fn generate(&self, sink: &mut dyn DiagnosticSink) -> Option<String> {
        let library_root = self.library_root();
        let store = self.check(sink)?;
        let output = Renderer::new(self.resolver, &library_root).render(store.emitted());
        tracing::debug!(bytes = output.len(), "rendered deps file");
        Some(output)
    }

    /// Merge and validate without rendering.
    ///
    /// Returns the merged store, or `None` when an error was reported.
    pub fn check(&self, sink: &mut dyn DiagnosticSink) -> Option<RecordStore> {
        let library_root = self.library_root();
        let mut sink = CountingSink::new(sink);

        let store = self.merge(&library_root, &mut sink);
        Validator::new(self.resolver, &library_root).validate(&store, &mut sink);

        if sink.is_fatal() {
            tracing::info!(
                errors = sink.error_count(),
                warnings = sink.warning_count(),
                "dependency check failed"
            );
            return None;
        }
        Some(store)
    }

    fn library_root(&self) -> CanonicalKey {
        self.resolver.resolve(&self.options.library_root)
    }

    fn merge(&self, library_root: &CanonicalKey, sink: &mut dyn DiagnosticSink) -> RecordStore {
        let scanner = NamespaceScanner::new(self.resolver);
        let parser = ManifestParser::new(self.resolver, library_root);
        let library_deps = self
            .resolver
            .resolve(&format!("{}/goog/deps.js", library_root));

        let mut engine = MergeEngine::new(self.options.merge_strategy);

        for unit in self.sources {
            engine.add_source(scanner.scan(unit, sink));
        }
        tracing::debug!(sources = self.sources.len(), "scanned sources");

        // The library's own deps file supplies namespaces but is never written.
        for unit in self.manifests {
            let records = parser.parse(unit, sink);
            if self.resolver.resolve(unit.path()) == library_deps {
                tracing::debug!(file = unit.path(), "withholding the library's own deps file");
                engine.add_withheld(records);
            } else {
                engine.add_manifest(records);
            }
        }

        // Sources may themselves be deps files.
        for unit in self.sources {
            let records = parser.parse_declarations(unit);
            if records.is_empty() {
                continue;
            }
            if self.resolver.resolve(unit.path()) == library_deps {
                engine.add_withheld(records);
            } else {
                engine.add_manifest(records);
            }
        }

        engine.finish()
    }
}
