//! Deps file parsing.
//!
//! A deps file is a list of `goog.addDependency(path, provides, requires,
//! flags)` calls, usually written by an earlier run of this tool. Paths are
//! relative to the library root. Everything that is not such a call is
//! ignored.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::core::{CanonicalKey, DependencyRecord, LoadFlags, Origin, SourceUnit, BASE_NAMESPACE};
use crate::loader::PathResolver;
use crate::scan::lexer::strip_comments;
use crate::util::diagnostic::{DepsIssue, DiagnosticSink};

static ADD_DEPENDENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\bgoog\.addDependency\s*\(\s*(?P<path>'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*")\s*,\s*\[(?P<provides>[^\]]*)\]\s*,\s*\[(?P<requires>[^\]]*)\](?:\s*,\s*(?P<flags>\{[^}]*\}|true|false))?\s*\)"#,
    )
    .expect("addDependency pattern is valid")
});

static STRING_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)""#).expect("string pattern is valid")
});

static FLAG_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:'([^']*)'|"([^"]*)"|([A-Za-z_$][\w$]*))\s*:\s*(?:'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)"|([\w.]+))"#,
    )
    .expect("flag pattern is valid")
});

/// Parses deps files into dependency records.
pub struct ManifestParser<'a> {
    resolver: &'a dyn PathResolver,
    library_root: &'a CanonicalKey,
}

impl<'a> ManifestParser<'a> {
    pub fn new(resolver: &'a dyn PathResolver, library_root: &'a CanonicalKey) -> Self {
        ManifestParser {
            resolver,
            library_root,
        }
    }

    /// Parse a deps file, warning when it declares nothing.
    pub fn parse(&self, unit: &SourceUnit, sink: &mut dyn DiagnosticSink) -> Vec<DependencyRecord> {
        let records = self.parse_declarations(unit);
        if records.is_empty() {
            sink.report(DepsIssue::EmptyManifest.to_diagnostic(unit.path()));
        }
        records
    }

    /// Parse every declaration in `unit`, in text order, without
    /// deduplicating. Each record is attributed to `unit`.
    pub fn parse_declarations(&self, unit: &SourceUnit) -> Vec<DependencyRecord> {
        let text = strip_comments(unit.text());

        let records: Vec<DependencyRecord> = ADD_DEPENDENCY
            .captures_iter(&text)
            .map(|caps| self.to_record(&caps, unit.path()))
            .collect();

        tracing::debug!(
            file = unit.path(),
            declarations = records.len(),
            "parsed deps file"
        );

        records
    }

    fn to_record(&self, caps: &Captures<'_>, manifest_path: &str) -> DependencyRecord {
        let path = string_values(&caps["path"])
            .into_iter()
            .next()
            .unwrap_or_default();
        let key = if path.starts_with('/') {
            self.resolver.resolve(&path)
        } else {
            self.resolver
                .resolve(&format!("{}/{}", self.library_root, path))
        };

        let mut record = DependencyRecord::new(
            key,
            Origin::Manifest {
                path: manifest_path.to_string(),
            },
        )
        .with_provides(string_values(&caps["provides"]))
        .with_requires(
            string_values(&caps["requires"])
                .into_iter()
                .filter(|namespace| namespace != BASE_NAMESPACE),
        );

        if let Some(flags) = caps.name("flags") {
            record.load_flags = parse_flags(flags.as_str());
        }

        record
    }
}

fn string_values(list: &str) -> Vec<String> {
    STRING_LITERAL
        .captures_iter(list)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| unescape(m.as_str()))
        .collect()
}

/// Parse the fourth argument: either a flags object or the legacy
/// `isModule` boolean.
fn parse_flags(flags: &str) -> LoadFlags {
    let mut parsed = LoadFlags::new();
    match flags.trim() {
        "true" => {
            parsed.insert("module".into(), "goog".into());
        }
        "false" => {}
        object => {
            for caps in FLAG_ENTRY.captures_iter(object) {
                let name = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3));
                let value = caps.get(4).or_else(|| caps.get(5)).or_else(|| caps.get(6));
                if let (Some(name), Some(value)) = (name, value) {
                    parsed.insert(name.as_str().to_string(), unescape(value.as_str()));
                }
            }
        }
    }
    parsed
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
