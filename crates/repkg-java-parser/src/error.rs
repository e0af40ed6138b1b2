//! Error types for the repkg-java-parser crate.
//!
//! This module provides the [`ParseError`] type for errors that can occur
//! during Java parsing and reference lowering.

use camino::Utf8PathBuf;
use repkg_core::SourceLocation;

/// Errors that can occur while parsing a Java document.
///
/// A [`ParseError::Syntax`] marks a document as malformed input: the
/// document is excluded from rewriting and reported, while the rest of the
/// corpus proceeds.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to set the Java language on the parser.
    #[error("failed to set Java language")]
    LanguageInit,

    /// Failed to compile a tree-sitter query.
    ///
    /// Contains the byte offset where the error occurred and the error kind.
    #[error("failed to compile query at offset {offset}: {kind:?}")]
    QueryCompile {
        /// The byte offset in the query string where the error occurred.
        offset: usize,
        /// The kind of query error.
        kind: tree_sitter::QueryError,
    },

    /// The parser produced no tree.
    ///
    /// This typically indicates the parser ran out of memory or was
    /// cancelled.
    #[error("failed to parse source code")]
    Parse,

    /// The document contains syntax errors and cannot be rewritten safely.
    #[error("syntax error in {path} at {location}")]
    Syntax {
        /// Path of the malformed document.
        path: Utf8PathBuf,
        /// Position of the first syntax error.
        location: SourceLocation,
    },
}

impl ParseError {
    /// Creates a [`ParseError::Syntax`] error.
    pub fn syntax(path: impl Into<Utf8PathBuf>, location: SourceLocation) -> Self {
        Self::Syntax {
            path: path.into(),
            location,
        }
    }

    /// Returns `true` when only the offending document is affected and the
    /// rest of the corpus can proceed.
    #[must_use]
    pub fn is_document_scoped(&self) -> bool {
        matches!(self, Self::Syntax { .. } | Self::Parse)
    }

    /// The path of the document this error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Syntax { path, .. } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_init_display() {
        let err = ParseError::LanguageInit;
        assert_eq!(err.to_string(), "failed to set Java language");
    }

    #[test]
    fn test_syntax_display_includes_path_and_location() {
        let err = ParseError::syntax("src/Bad.java", SourceLocation::new(3, 7, 42));
        let msg = err.to_string();
        assert!(msg.contains("src/Bad.java"));
        assert!(msg.contains("3:7"));
    }

    #[test]
    fn test_document_scoped() {
        let err = ParseError::syntax("A.java", SourceLocation::default());
        assert!(err.is_document_scoped());
        assert!(!ParseError::LanguageInit.is_document_scoped());
    }

    #[test]
    fn test_path_accessor() {
        let err = ParseError::syntax("A.java", SourceLocation::default());
        assert_eq!(err.path().map(|path| path.as_str()), Some("A.java"));
        assert!(ParseError::Parse.path().is_none());
    }
}
