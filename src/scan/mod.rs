//! Text-level extraction of dependency declarations.

pub mod lexer;
pub mod manifest;
pub mod namespace;

pub use manifest::ManifestParser;
pub use namespace::NamespaceScanner;
