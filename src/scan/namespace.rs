//! Namespace extraction from source files.
//!
//! Finds `goog.provide`/`goog.module`/`goog.require` calls and ES6
//! `import`/`export` syntax in one file and turns them into a
//! [`DependencyRecord`]. ES6 modules provide a namespace synthesized from
//! their path, and their imports are resolved to the namespaces of the
//! imported modules.

use crate::core::{DependencyRecord, Origin, SourceUnit, BASE_NAMESPACE};
use crate::loader::PathResolver;
use crate::scan::lexer::{tokenize, Token, TokenKind};
use crate::util::diagnostic::{DepsIssue, DiagnosticSink};

/// Keywords that start a local export declaration rather than a re-export.
const DECLARATION_KEYWORDS: &[&str] = &[
    "function", "class", "const", "let", "var", "default", "async",
];

/// A requirement in source order, before resolution.
enum Requirement<'t> {
    Namespace(&'t str),
    Import(&'t str),
}

/// Everything found in one file before it is folded into a record.
#[derive(Default)]
struct Declarations<'t> {
    provides: Vec<&'t str>,
    requires: Vec<Requirement<'t>>,
    module_ids: Vec<&'t str>,
    is_es6_module: bool,
    is_goog_module: bool,
}

/// Scans source units for namespace declarations.
pub struct NamespaceScanner<'a> {
    resolver: &'a dyn PathResolver,
}

impl<'a> NamespaceScanner<'a> {
    pub fn new(resolver: &'a dyn PathResolver) -> Self {
        NamespaceScanner { resolver }
    }

    /// Scan one unit. Intra-file problems are reported to `sink` as warnings.
    pub fn scan(&self, unit: &SourceUnit, sink: &mut dyn DiagnosticSink) -> DependencyRecord {
        let tokens = tokenize(unit.text());
        let found = collect_declarations(&tokens);

        let key = self.resolver.resolve(unit.path());
        let mut record = DependencyRecord::new(
            key,
            Origin::Scanned {
                path: unit.path().to_string(),
            },
        );

        if found.is_es6_module {
            record.provides.insert(self.resolver.module_name(&record.key));
            for id in &found.module_ids {
                record.provides.insert(*id);
            }
            record.load_flags.insert("lang".into(), "es6".into());
            record.load_flags.insert("module".into(), "es6".into());
        } else if found.is_goog_module {
            record.load_flags.insert("module".into(), "goog".into());
        }

        for namespace in &found.provides {
            if !record.provides.insert(*namespace) {
                sink.report(
                    DepsIssue::DuplicateProvideSameFile(namespace.to_string())
                        .to_diagnostic(unit.path()),
                );
            }
        }

        for requirement in &found.requires {
            match *requirement {
                Requirement::Namespace(namespace) => {
                    if namespace == BASE_NAMESPACE {
                        continue;
                    }
                    if !record.requires.insert(namespace) {
                        sink.report(
                            DepsIssue::DuplicateRequireSameFile(namespace.to_string())
                                .to_diagnostic(unit.path()),
                        );
                    }
                }
                Requirement::Import(specifier) => {
                    match self.resolver.resolve_import(&record.key, specifier) {
                        Some(target) => {
                            record.requires.insert(self.resolver.module_name(&target));
                        }
                        None => sink.report(
                            DepsIssue::UnresolvedImport(specifier.to_string())
                                .to_diagnostic(unit.path()),
                        ),
                    }
                }
            }
        }

        for namespace in record.requires.iter() {
            if record.provides.contains(namespace) {
                sink.report(
                    DepsIssue::SelfProvideRequire(namespace.to_string()).to_diagnostic(unit.path()),
                );
            }
        }

        tracing::trace!(
            file = unit.path(),
            provides = %record.provides,
            requires = %record.requires,
            "scanned source"
        );

        record
    }
}

fn collect_declarations(tokens: &[Token]) -> Declarations<'_> {
    let mut found = Declarations::default();

    for (i, token) in tokens.iter().enumerate() {
        if i > 0 && tokens[i - 1].is_punct('.') {
            continue;
        }

        if token.is_ident("goog") {
            let Some((method, namespace)) = goog_call(&tokens[i..]) else {
                continue;
            };
            match method {
                "provide" => found.provides.push(namespace),
                "module" => {
                    found.provides.push(namespace);
                    found.is_goog_module = true;
                }
                "require" => found.requires.push(Requirement::Namespace(namespace)),
                "declareModuleId" => found.module_ids.push(namespace),
                _ => {}
            }
        } else if token.is_ident("import") {
            if !starts_statement(tokens, i) {
                continue;
            }
            // `import(...)` and `import.meta` are expressions, not module syntax.
            match tokens.get(i + 1) {
                Some(next) if next.is_punct('(') || next.is_punct('.') => continue,
                None => continue,
                _ => {}
            }
            found.is_es6_module = true;
            let rest = &tokens[i + 1..];
            let specifier = rest[0].as_str_lit().or_else(|| from_specifier(rest));
            if let Some(specifier) = specifier {
                found.requires.push(Requirement::Import(specifier));
            }
        } else if token.is_ident("export") {
            if !starts_statement(tokens, i) {
                continue;
            }
            found.is_es6_module = true;
            let rest = &tokens[i + 1..];
            let declares = rest.first().is_some_and(|next| match &next.kind {
                TokenKind::Ident(keyword) => DECLARATION_KEYWORDS.contains(&keyword.as_str()),
                _ => false,
            });
            if declares {
                continue;
            }
            if let Some(specifier) = from_specifier(rest) {
                found.requires.push(Requirement::Import(specifier));
            }
        }
    }

    found
}

/// Whether the keyword at `i` begins a top-level statement rather than
/// naming a property (`{import: true}`).
fn starts_statement(tokens: &[Token], i: usize) -> bool {
    if tokens.get(i + 1).is_some_and(|next| next.is_punct(':')) {
        return false;
    }
    match i.checked_sub(1).map(|prev| &tokens[prev]) {
        None => true,
        Some(prev) => {
            prev.is_punct(';')
                || prev.is_punct('}')
                || prev.is_punct(')')
                || prev.line < tokens[i].line
        }
    }
}

/// Match `goog.<method>('<namespace>')` at the start of `tokens`.
fn goog_call(tokens: &[Token]) -> Option<(&str, &str)> {
    let [_, dot, method, open, arg, close, ..] = tokens else {
        return None;
    };
    if !dot.is_punct('.') || !open.is_punct('(') || !close.is_punct(')') {
        return None;
    }
    match &method.kind {
        TokenKind::Ident(method) => Some((method.as_str(), arg.as_str_lit()?)),
        _ => None,
    }
}

/// Find the `from '<specifier>'` clause of the current import/export
/// statement, stopping at the end of the statement.
fn from_specifier(tokens: &[Token]) -> Option<&str> {
    for (j, token) in tokens.iter().enumerate() {
        let after_dot = j > 0 && tokens[j - 1].is_punct('.');
        let next_statement = token.is_ident("import") || token.is_ident("export");
        if token.is_punct(';') || (next_statement && !after_dot) {
            return None;
        }
        if token.is_ident("from") {
            if let Some(specifier) = tokens.get(j + 1).and_then(Token::as_str_lit) {
                return Some(specifier);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CanonicalKey;
    use crate::loader::{ModuleLoader, ResolutionMode};
    use crate::util::diagnostic::Diagnostic;

    fn loader() -> ModuleLoader {
        ModuleLoader::new("/", ["/base/"], ResolutionMode::Legacy)
    }

    fn scan(path: &str, text: &str) -> (DependencyRecord, Vec<Diagnostic>) {
        let loader = loader();
        let mut diagnostics = Vec::new();
        let unit = SourceUnit::from_code(path, text);
        let record = NamespaceScanner::new(&loader).scan(&unit, &mut diagnostics);
        (record, diagnostics)
    }

    fn names(set: &crate::core::NamespaceSet) -> Vec<&str> {
        set.iter().collect()
    }

    #[test]
    fn test_provides_and_requires_in_order() {
        let (record, diagnostics) = scan(
            "/base/my-project/src1.js",
            "goog.provide('makejsdeps.file1');\n\
             goog.provide('makejsdeps.file1.Test');\n\
             /*\ngoog.require('failure1)\n*/\n\
             // goog.require('failure2)\n\
             goog.require('makejsdeps.file2');\n\
             goog.require(\"goog\");\n\
             goog.require(\"dep.string\");\n\
             goog.require(\"dep.number\");\n",
        );

        assert!(diagnostics.is_empty());
        assert_eq!(record.key.as_str(), "/base/my-project/src1.js");
        assert_eq!(
            names(&record.provides),
            vec!["makejsdeps.file1", "makejsdeps.file1.Test"]
        );
        assert_eq!(
            names(&record.requires),
            vec!["makejsdeps.file2", "dep.string", "dep.number"]
        );
        assert!(record.load_flags.is_empty());
        assert_eq!(record.origin.label(), "none");
    }

    #[test]
    fn test_declarations_in_strings_are_ignored() {
        let (record, _) = scan(
            "/base/a.js",
            "var s = \"goog.require('nope')\";\nvar t = `goog.provide('nope')`;\ngoog.provide('yes');",
        );
        assert_eq!(names(&record.provides), vec!["yes"]);
        assert!(record.requires.is_empty());
    }

    #[test]
    fn test_assigned_require() {
        let (record, _) = scan(
            "/base/a.js",
            "goog.module('app.a');\nconst b = goog.require('app.b');\nconst {c} = goog.require('app.c');",
        );
        assert_eq!(names(&record.provides), vec!["app.a"]);
        assert_eq!(names(&record.requires), vec!["app.b", "app.c"]);
        assert_eq!(record.load_flags.get("module").map(String::as_str), Some("goog"));
    }

    #[test]
    fn test_duplicate_provide_warns_once() {
        let (record, diagnostics) = scan("src1.js", "goog.provide('b');\ngoog.provide('b');\n");
        assert_eq!(names(&record.provides), vec!["b"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Multiple calls to goog.provide(\"b\")");
        assert!(!diagnostics[0].is_error());
    }

    #[test]
    fn test_duplicate_require_warns_once() {
        let (record, diagnostics) = scan("src1.js", "goog.require('a');\ngoog.require('a');\n");
        assert_eq!(names(&record.requires), vec!["a"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Namespace \"a\" is required multiple times");
    }

    #[test]
    fn test_provide_and_require_same_namespace() {
        let (_, diagnostics) = scan("src1.js", "goog.provide('b');\ngoog.require('b');\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Namespace \"b\" is both required and provided in the same file."
        );
        assert_eq!(diagnostics[0].location.as_deref(), Some("src1.js"));
    }

    #[test]
    fn test_es6_module_synthesizes_namespaces() {
        let (record, diagnostics) = scan(
            "/base/javascript/foo/foo.js",
            "import '../closure/goog/array';",
        );
        assert!(diagnostics.is_empty());
        assert_eq!(names(&record.provides), vec!["module$javascript$foo$foo"]);
        assert_eq!(
            names(&record.requires),
            vec!["module$javascript$closure$goog$array"]
        );
        assert!(record.is_es6_module());
        assert_eq!(record.load_flags.get("lang").map(String::as_str), Some("es6"));
    }

    #[test]
    fn test_export_marks_module() {
        let (record, _) = scan("/base/javascript/closure/goog/array.js", "export var array;");
        assert!(record.is_es6_module());
        assert_eq!(
            names(&record.provides),
            vec!["module$javascript$closure$goog$array"]
        );
        assert!(record.requires.is_empty());
    }

    #[test]
    fn test_import_forms() {
        let (record, _) = scan(
            "/base/app/main.js",
            "import x from './x';\n\
             import {from} from './y.js';\n\
             import * as z from \"./z\";\n\
             import {again} from './x';\n\
             export {w} from './w';\n\
             export * from './v';\n\
             export function f() {}\n",
        );
        assert_eq!(
            names(&record.requires),
            vec![
                "module$app$x",
                "module$app$y",
                "module$app$z",
                "module$app$w",
                "module$app$v",
            ]
        );
    }

    #[test]
    fn test_dynamic_import_is_not_module_syntax() {
        let (record, _) = scan(
            "/base/a.js",
            "goog.provide('a');\nconst m = import('./lazy.js');\nconsole.log(import.meta);",
        );
        assert!(!record.is_es6_module());
        assert_eq!(names(&record.provides), vec!["a"]);
    }

    #[test]
    fn test_keyword_property_names_are_not_module_syntax() {
        let (record, diagnostics) = scan(
            "/base/a.js",
            "goog.provide('a');\nvar cfg = {import: true, export: 1};\nvar flags = {\n  export: false};",
        );
        assert!(diagnostics.is_empty());
        assert!(!record.is_es6_module());
        assert!(record.load_flags.is_empty());
        assert_eq!(names(&record.provides), vec!["a"]);
    }

    #[test]
    fn test_declare_module_id() {
        let (record, _) = scan(
            "/base/lib/x.js",
            "goog.declareModuleId('lib.x');\nexport const x = 1;",
        );
        assert_eq!(names(&record.provides), vec!["module$lib$x", "lib.x"]);
    }

    #[test]
    fn test_bare_specifier_in_legacy_mode_warns() {
        let (record, diagnostics) = scan("/base/a.js", "import _ from 'lodash';");
        assert!(record.requires.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Failed to load module \"lodash\"");
    }

    #[test]
    fn test_relative_raw_path_is_made_absolute() {
        let (record, _) = scan("src1.js", "goog.provide('a');");
        assert_eq!(record.key, CanonicalKey::new("/src1.js"));
    }
}
