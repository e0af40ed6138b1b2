//! Error types for the repkg-engine crate.
//!
//! This module provides the [`EngineError`] type covering corpus discovery,
//! document parsing, and manifest editing failures.

use camino::{Utf8Path, Utf8PathBuf};
use repkg_core::ConfigError;
use repkg_java_parser::ParseError;
use repkg_maven::ManifestError;

/// Errors that can occur while running a migration.
///
/// # Error Recovery Strategy
///
/// - Walk and configuration errors are fatal: the run cannot start.
/// - Read and parse errors are document-scoped: the offending document is
///   excluded and reported while the rest of the corpus proceeds.
/// - Manifest errors abort only the injection step for that manifest;
///   rewritten documents are kept.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Failed to walk a source root.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// A configured source root does not exist or is not a directory.
    #[error("source root {path} is not a directory")]
    InvalidRoot {
        /// The offending root path.
        path: Utf8PathBuf,
    },

    /// Failed to read a source document.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// The path of the unreadable file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A document could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A manifest could not be read or edited.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The recipe configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

impl EngineError {
    /// Creates an [`EngineError::Read`] error.
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` when only a single document is affected and the rest
    /// of the corpus can proceed.
    #[must_use]
    pub fn is_document_scoped(&self) -> bool {
        match self {
            Self::Read { .. } => true,
            Self::Parse(error) => error.is_document_scoped(),
            _ => false,
        }
    }

    /// The file this error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            Self::Read { path, .. } | Self::InvalidRoot { path } => Some(path),
            Self::Parse(error) => error.path().map(Utf8PathBuf::as_path),
            Self::Manifest(error) => Some(error.path()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_is_document_scoped() {
        let err = EngineError::read("A.java", std::io::Error::other("boom"));
        assert!(err.is_document_scoped());
        assert_eq!(err.path().map(Utf8Path::as_str), Some("A.java"));
    }

    #[test]
    fn test_syntax_error_is_document_scoped() {
        let err = EngineError::Parse(ParseError::syntax(
            "Bad.java",
            repkg_core::SourceLocation::default(),
        ));
        assert!(err.is_document_scoped());
        assert_eq!(err.path().map(Utf8Path::as_str), Some("Bad.java"));
    }

    #[test]
    fn test_structural_errors_are_not_document_scoped() {
        let err = EngineError::InvalidRoot {
            path: Utf8PathBuf::from("missing"),
        };
        assert!(!err.is_document_scoped());

        let err = EngineError::Manifest(ManifestError::missing_element("pom.xml", "dependencies"));
        assert!(!err.is_document_scoped());
        assert_eq!(err.path().map(Utf8Path::as_str), Some("pom.xml"));
    }
}
