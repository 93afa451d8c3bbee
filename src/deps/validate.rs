//! Provide/require consistency checks.

use std::collections::HashMap;

use crate::core::{CanonicalKey, DependencyRecord, BASE_NAMESPACE};
use crate::deps::merge::RecordStore;
use crate::loader::PathResolver;
use crate::util::diagnostic::{DepsIssue, DiagnosticSink};

/// Namespace → the record that provides it. Built once per run.
#[derive(Debug, Default)]
pub struct ProvidedIndex<'r> {
    claims: HashMap<String, &'r DependencyRecord>,
}

impl<'r> ProvidedIndex<'r> {
    pub fn provider(&self, namespace: &str) -> Option<&'r DependencyRecord> {
        self.claims.get(namespace).copied()
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.claims.contains_key(namespace)
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

/// Result of validating a record store.
#[derive(Debug)]
pub struct Validation<'r> {
    pub index: ProvidedIndex<'r>,
    pub errors: usize,
}

impl Validation<'_> {
    pub fn is_fatal(&self) -> bool {
        self.errors > 0
    }
}

/// Checks that every namespace has one provider and every requirement is met.
pub struct Validator<'a> {
    resolver: &'a dyn PathResolver,
    library_root: &'a CanonicalKey,
}

impl<'a> Validator<'a> {
    pub fn new(resolver: &'a dyn PathResolver, library_root: &'a CanonicalKey) -> Self {
        Validator {
            resolver,
            library_root,
        }
    }

    /// Validate the records of a run. Provides come from every known record,
    /// written or withheld; requires are checked for written records only.
    ///
    /// Deps file records claim namespaces before scanned sources, so a
    /// conflict is reported against the pre-computed declaration.
    pub fn validate<'r>(
        &self,
        store: &'r RecordStore,
        sink: &mut dyn DiagnosticSink,
    ) -> Validation<'r> {
        let mut index = ProvidedIndex::default();
        let mut errors = 0;

        let (declared, scanned): (Vec<_>, Vec<_>) =
            store.known().partition(|record| record.origin.is_manifest());

        for record in declared.into_iter().chain(scanned) {
            for namespace in record.provides.iter() {
                let Some(existing) = index.provider(namespace) else {
                    index.claims.insert(namespace.to_string(), record);
                    continue;
                };
                if existing.key == record.key || self.both_in_library(existing, record) {
                    continue;
                }
                errors += 1;
                sink.report(
                    DepsIssue::DuplicateProvide {
                        namespace: namespace.to_string(),
                        other_file: existing.origin.file().to_string(),
                    }
                    .to_diagnostic(record.origin.file()),
                );
            }
        }

        // Files can also be required by path; these never conflict.
        for record in store.known() {
            index
                .claims
                .entry(self.resolver.module_name(&record.key))
                .or_insert(record);
        }

        // Withheld records only supply namespaces; what they require is not written.
        for record in store.emitted() {
            for namespace in record.requires.iter() {
                if namespace == BASE_NAMESPACE || index.contains(namespace) {
                    continue;
                }
                errors += 1;
                sink.report(
                    DepsIssue::DanglingRequire(namespace.to_string())
                        .to_diagnostic(record.origin.file()),
                );
            }
        }

        tracing::debug!(
            namespaces = index.len(),
            errors,
            "validated dependency records"
        );

        Validation { index, errors }
    }

    fn both_in_library(&self, first: &DependencyRecord, second: &DependencyRecord) -> bool {
        first.key.is_under(self.library_root) && second.key.is_under(self.library_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Origin;
    use crate::deps::merge::{MergeEngine, MergeStrategy};
    use crate::loader::{ModuleLoader, ResolutionMode};
    use crate::util::diagnostic::Diagnostic;

    fn source(key: &str, provides: &[&str], requires: &[&str]) -> DependencyRecord {
        DependencyRecord::new(
            CanonicalKey::new(key),
            Origin::Scanned {
                path: key.trim_start_matches('/').to_string(),
            },
        )
        .with_provides(provides.iter().copied())
        .with_requires(requires.iter().copied())
    }

    fn declared(key: &str, provides: &[&str]) -> DependencyRecord {
        DependencyRecord::new(
            CanonicalKey::new(key),
            Origin::Manifest {
                path: "dep1.js".to_string(),
            },
        )
        .with_provides(provides.iter().copied())
    }

    fn run(
        sources: Vec<DependencyRecord>,
        manifest: Vec<DependencyRecord>,
        library_root: &str,
    ) -> (usize, Vec<Diagnostic>) {
        let loader = ModuleLoader::new("/", ["/"], ResolutionMode::Legacy);
        let root = CanonicalKey::new(library_root);
        let mut engine = MergeEngine::new(MergeStrategy::Always);
        for record in sources {
            engine.add_source(record);
        }
        engine.add_manifest(manifest);
        let store = engine.finish();

        let mut diagnostics = Vec::new();
        let validation = Validator::new(&loader, &root).validate(&store, &mut diagnostics);
        (validation.errors, diagnostics)
    }

    #[test]
    fn test_duplicate_provide_names_deps_file() {
        let (errors, diagnostics) = run(
            vec![source("/src1.js", &["a"], &[])],
            vec![declared("/javascript/closure/a.js", &["a"])],
            "/javascript/closure",
        );
        assert_eq!(errors, 1);
        assert_eq!(
            diagnostics[0].message,
            "Namespace \"a\" is already provided in other file dep1.js"
        );
        assert_eq!(diagnostics[0].location.as_deref(), Some("src1.js"));
    }

    #[test]
    fn test_duplicate_provide_tolerated_under_library_root() {
        let (errors, diagnostics) = run(
            vec![source("/lib/closure/bar/a.js", &["a"], &[])],
            vec![declared("/lib/closure/foo/a.js", &["a"])],
            "/lib/closure",
        );
        assert_eq!(errors, 0);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_duplicate_provide_when_only_one_side_in_library() {
        let (errors, _) = run(
            vec![source("/app/a.js", &["a"], &[])],
            vec![declared("/lib/closure/foo/a.js", &["a"])],
            "/lib/closure",
        );
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_dangling_require() {
        let (errors, diagnostics) = run(
            vec![source("/src1.js", &[], &["b"])],
            vec![declared("/a.js", &["a"])],
            "/lib",
        );
        assert_eq!(errors, 1);
        assert_eq!(
            diagnostics[0].message,
            "Namespace \"b\" is required but never provided."
        );
    }

    #[test]
    fn test_withheld_record_requires_are_not_checked() {
        let loader = ModuleLoader::new("/", ["/"], ResolutionMode::Legacy);
        let root = CanonicalKey::new("/javascript/closure");
        let mut engine = MergeEngine::new(MergeStrategy::WhenInSrcs);
        engine.add_source(source("/base/app.js", &["app"], &["x"]));
        engine.add_manifest(vec![
            declared("/javascript/closure/other/x.js", &["x"]).with_requires(["not.given"]),
        ]);
        let store = engine.finish();
        assert!(!store.is_emitted(&CanonicalKey::new("/javascript/closure/other/x.js")));

        let mut diagnostics = Vec::new();
        let validation = Validator::new(&loader, &root).validate(&store, &mut diagnostics);
        assert_eq!(validation.errors, 0);
        assert!(diagnostics.is_empty());
        assert!(validation.index.contains("x"));
    }

    #[test]
    fn test_base_namespace_always_satisfied() {
        let mut record = source("/src1.js", &[], &[]);
        record.requires.insert(BASE_NAMESPACE);
        let (errors, _) = run(vec![record], vec![], "/lib");
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_path_alias_satisfies_module_import() {
        let (errors, _) = run(
            vec![
                source("/app/util.js", &["app.util"], &[]),
                source("/app/main.js", &["module$app$main"], &["module$app$util"]),
            ],
            vec![],
            "/lib",
        );
        assert_eq!(errors, 0);
    }

    #[test]
    fn test_first_claimant_wins() {
        let loader = ModuleLoader::new("/", ["/"], ResolutionMode::Legacy);
        let root = CanonicalKey::new("/lib");
        let mut engine = MergeEngine::new(MergeStrategy::Always);
        engine.add_source(source("/lib/b.js", &["a"], &[]));
        engine.add_manifest(vec![declared("/lib/a.js", &["a"])]);
        let store = engine.finish();

        let mut diagnostics = Vec::new();
        let validation = Validator::new(&loader, &root).validate(&store, &mut diagnostics);
        assert!(!validation.is_fatal());
        let provider = validation.index.provider("a").unwrap();
        assert_eq!(provider.key.as_str(), "/lib/a.js");
    }
}
