//! Rendering records as `goog.addDependency` calls.

use crate::core::{CanonicalKey, DependencyRecord, NamespaceSet, NO_ORIGIN};
use crate::loader::PathResolver;

/// The loader call each declaration is written as.
pub const DEPENDENCY_CALL: &str = "goog.addDependency";

/// Writes the deps file text.
pub struct Renderer<'a> {
    resolver: &'a dyn PathResolver,
    library_root: &'a CanonicalKey,
}

impl<'a> Renderer<'a> {
    pub fn new(resolver: &'a dyn PathResolver, library_root: &'a CanonicalKey) -> Self {
        Renderer {
            resolver,
            library_root,
        }
    }

    /// Render `records` in the given order.
    ///
    /// Consecutive records with the same attribution form a group; groups
    /// are separated by a blank line, and a group from a deps file opens
    /// with an `// Included from:` comment.
    pub fn render<'r>(&self, records: impl IntoIterator<Item = &'r DependencyRecord>) -> String {
        let mut output = String::new();
        let mut current_label: Option<&str> = None;

        for record in records {
            let label = record.origin.label();
            if current_label != Some(label) {
                if current_label.is_some() {
                    output.push('\n');
                }
                if label != NO_ORIGIN {
                    output.push_str(&format!("// Included from: {}\n", label));
                }
                current_label = Some(label);
            }
            output.push_str(&self.declaration(record));
            output.push('\n');
        }

        output
    }

    /// One declaration line, without the trailing newline.
    pub fn declaration(&self, record: &DependencyRecord) -> String {
        let path = self.resolver.relativize(&record.key, self.library_root);
        let mut line = format!(
            "{}({}, {}, {}",
            DEPENDENCY_CALL,
            quote(&path),
            array(&record.provides),
            array(&record.requires)
        );

        if !record.load_flags.is_empty() {
            let flags: Vec<String> = record
                .load_flags
                .iter()
                .map(|(name, value)| format!("{}: {}", quote(name), quote(value)))
                .collect();
            line.push_str(&format!(", {{{}}}", flags.join(", ")));
        }

        line.push_str(");");
        line
    }
}

fn array(namespaces: &NamespaceSet) -> String {
    let items: Vec<String> = namespaces.iter().map(quote).collect();
    format!("[{}]", items.join(", "))
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Origin;
    use crate::loader::{ModuleLoader, ResolutionMode};

    fn record(key: &str, origin: Origin) -> DependencyRecord {
        DependencyRecord::new(CanonicalKey::new(key), origin)
    }

    fn scanned(key: &str) -> DependencyRecord {
        record(key, Origin::Scanned { path: key.into() })
    }

    fn declared(manifest: &str, key: &str) -> DependencyRecord {
        record(
            key,
            Origin::Manifest {
                path: manifest.into(),
            },
        )
    }

    fn render(records: &[DependencyRecord]) -> String {
        let loader = ModuleLoader::new("/", ["/base/"], ResolutionMode::Legacy);
        let root = CanonicalKey::new("/base/javascript/closure");
        Renderer::new(&loader, &root).render(records)
    }

    #[test]
    fn test_declaration_line() {
        let rec = scanned("/base/my-project/src1.js")
            .with_provides(["makejsdeps.file1", "makejsdeps.file1.Test"])
            .with_requires(["makejsdeps.file2"]);
        assert_eq!(
            render(&[rec]),
            "goog.addDependency('../../my-project/src1.js', \
             ['makejsdeps.file1', 'makejsdeps.file1.Test'], ['makejsdeps.file2']);\n"
        );
    }

    #[test]
    fn test_flags_rendered_in_key_order() {
        let rec = scanned("/base/javascript/closure/goog/array.js")
            .with_provides(["module$javascript$closure$goog$array"])
            .with_flag("module", "es6")
            .with_flag("lang", "es6");
        assert_eq!(
            render(&[rec]),
            "goog.addDependency('goog/array.js', ['module$javascript$closure$goog$array'], [], \
             {'lang': 'es6', 'module': 'es6'});\n"
        );
    }

    #[test]
    fn test_attribution_groups() {
        let output = render(&[
            scanned("/base/src.js"),
            declared("deps1.js", "/base/a.js"),
            declared("deps1.js", "/base/b.js"),
            declared("deps2.js", "/base/c.js"),
        ]);
        assert_eq!(
            output,
            "goog.addDependency('../../src.js', [], []);\n\
             \n\
             // Included from: deps1.js\n\
             goog.addDependency('../../a.js', [], []);\n\
             goog.addDependency('../../b.js', [], []);\n\
             \n\
             // Included from: deps2.js\n\
             goog.addDependency('../../c.js', [], []);\n"
        );
    }

    #[test]
    fn test_leading_deps_group_has_no_blank_line() {
        let output = render(&[declared("deps.js", "/base/a.js"), scanned("/base/b.js")]);
        assert_eq!(
            output,
            "// Included from: deps.js\n\
             goog.addDependency('../../a.js', [], []);\n\
             \n\
             goog.addDependency('../../b.js', [], []);\n"
        );
    }

    #[test]
    fn test_quotes_are_escaped() {
        let rec = scanned("/base/javascript/closure/it's.js").with_provides(["a\\b"]);
        assert_eq!(
            render(&[rec]),
            "goog.addDependency('it\\'s.js', ['a\\\\b'], []);\n"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(&[]), "");
    }
}
