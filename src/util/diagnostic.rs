//! Diagnostics produced while generating dependency files.
//!
//! The generator never aborts through control flow: every problem it finds is
//! turned into a [`Diagnostic`] and handed to a [`DiagnosticSink`]. Whether a
//! run produced output is decided once, from the severities recorded.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;
use serde::Serialize;
use thiserror::Error;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when two copies of a shared library collide.
    pub const CHECK_LIBRARY_ROOT: &str =
        "help: If both files are copies of the shared library, point --library-root at its checkout";

    /// Suggestion when a namespace is never provided.
    pub const MISSING_PROVIDER: &str =
        "help: Add the providing file to the sources or list a deps file that declares it";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Everything the generator knows how to complain about.
///
/// The `Display` text of each variant is the exact user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepsIssue {
    #[error("Namespace \"{namespace}\" is already provided in other file {other_file}")]
    DuplicateProvide {
        namespace: String,
        other_file: String,
    },

    #[error("Namespace \"{0}\" is required but never provided.")]
    DanglingRequire(String),

    #[error("Multiple calls to goog.provide(\"{0}\")")]
    DuplicateProvideSameFile(String),

    #[error("Namespace \"{0}\" is required multiple times")]
    DuplicateRequireSameFile(String),

    #[error("Namespace \"{0}\" is both required and provided in the same file.")]
    SelfProvideRequire(String),

    #[error("No dependencies found in file")]
    EmptyManifest,

    #[error("Failed to load module \"{0}\"")]
    UnresolvedImport(String),
}

impl DepsIssue {
    /// Errors are fatal for the run; warnings never block output.
    pub fn severity(&self) -> Severity {
        match self {
            DepsIssue::DuplicateProvide { .. } | DepsIssue::DanglingRequire(_) => Severity::Error,
            DepsIssue::DuplicateProvideSameFile(_)
            | DepsIssue::DuplicateRequireSameFile(_)
            | DepsIssue::SelfProvideRequire(_)
            | DepsIssue::EmptyManifest
            | DepsIssue::UnresolvedImport(_) => Severity::Warning,
        }
    }

    /// Short stable identifier used in machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            DepsIssue::DuplicateProvide { .. } => "duplicate-provide",
            DepsIssue::DanglingRequire(_) => "dangling-require",
            DepsIssue::DuplicateProvideSameFile(_) => "duplicate-provide-same-file",
            DepsIssue::DuplicateRequireSameFile(_) => "duplicate-require-same-file",
            DepsIssue::SelfProvideRequire(_) => "self-provide-require",
            DepsIssue::EmptyManifest => "empty-manifest",
            DepsIssue::UnresolvedImport(_) => "unresolved-import",
        }
    }

    /// Convert to a diagnostic attached to `file`.
    pub fn to_diagnostic(&self, file: impl Into<String>) -> Diagnostic {
        let diag = match self.severity() {
            Severity::Error => Diagnostic::error(self.to_string()),
            Severity::Warning => Diagnostic::warning(self.to_string()),
        }
        .with_code(self.code())
        .with_location(file);

        match self {
            DepsIssue::DuplicateProvide { .. } => {
                diag.with_suggestion(suggestions::CHECK_LIBRARY_ROOT)
            }
            DepsIssue::DanglingRequire(_) => diag.with_suggestion(suggestions::MISSING_PROVIDER),
            _ => diag,
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Stable kind identifier, if the diagnostic came from a [`DepsIssue`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    /// Suggested fixes
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    /// File the diagnostic is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            code: None,
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Warning,
            code: None,
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, file: impl Into<String>) -> Self {
        self.location = Some(file.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            }
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref file) = self.location {
            output.push_str(&format!("  --> {}\n", file));
        }

        for suggestion in &self.suggestions {
            output.push_str(&format!("  {}\n", suggestion));
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Receiver for diagnostics emitted during a run.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Sink adapter that counts what passes through it.
///
/// The generator wraps the caller's sink in one of these so the fatal
/// decision can be made without inspecting the caller's storage.
pub struct CountingSink<'a> {
    inner: &'a mut dyn DiagnosticSink,
    errors: usize,
    warnings: usize,
}

impl<'a> CountingSink<'a> {
    pub fn new(inner: &'a mut dyn DiagnosticSink) -> Self {
        CountingSink {
            inner,
            errors: 0,
            warnings: 0,
        }
    }

    /// Report a domain issue against `file`.
    pub fn issue(&mut self, issue: DepsIssue, file: &str) {
        self.report(issue.to_diagnostic(file));
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    /// True once any error-level diagnostic has been recorded.
    pub fn is_fatal(&self) -> bool {
        self.errors > 0
    }
}

impl DiagnosticSink for CountingSink<'_> {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
        }
        self.inner.report(diagnostic);
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

/// A run that reported errors and therefore produced no deps file.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("dependency check failed with {errors} error(s) and {warnings} warning(s)")]
#[diagnostic(
    code(depswriter::check::failed),
    help("No deps file was written. Fix the errors above and run again")
)]
pub struct FatalDepsError {
    pub errors: usize,
    pub warnings: usize,
}

impl FatalDepsError {
    /// Summarize the diagnostics of a failed run.
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        FatalDepsError {
            errors,
            warnings: diagnostics.len() - errors,
        }
    }
}
