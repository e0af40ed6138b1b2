//! Error types for the repkg-maven crate.
//!
//! This module provides the [`ManifestError`] type for errors that can occur
//! while reading or editing a Maven POM manifest.

use camino::{Utf8Path, Utf8PathBuf};

/// Errors that can occur while editing a Maven manifest.
///
/// A [`ManifestError::MissingElement`] is a structural failure: the manifest
/// does not carry the element a dependency would be inserted into, and the
/// edit is abandoned rather than guessed at.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// A required element is absent from its canonical location.
    ///
    /// Raised for a missing `<project>` root as well as for a `<project>`
    /// without a direct `<dependencies>` child. The element is never
    /// fabricated; the manifest is reported and left untouched.
    #[error("manifest {path} has no <{element}> element at its expected location")]
    MissingElement {
        /// Path of the offending manifest.
        path: Utf8PathBuf,
        /// Name of the element that was not found.
        element: &'static str,
    },

    /// Failed to read the manifest from disk.
    #[error("failed to read manifest {path}")]
    Io {
        /// Path of the unreadable manifest.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    /// Creates a [`ManifestError::MissingElement`] error.
    pub fn missing_element(path: impl Into<Utf8PathBuf>, element: &'static str) -> Self {
        Self::MissingElement {
            path: path.into(),
            element,
        }
    }

    /// Creates a [`ManifestError::Io`] error.
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The path of the manifest this error refers to.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::MissingElement { path, .. } | Self::Io { path, .. } => path,
        }
    }

    /// Returns `true` when the manifest itself is structurally unusable,
    /// as opposed to an I/O failure that might be transient.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::MissingElement { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_element_display() {
        let err = ManifestError::missing_element("pom.xml", "dependencies");
        assert_eq!(
            err.to_string(),
            "manifest pom.xml has no <dependencies> element at its expected location"
        );
    }

    #[test]
    fn test_io_display_and_source() {
        let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ManifestError::io("missing/pom.xml", inner);
        assert_eq!(err.to_string(), "failed to read manifest missing/pom.xml");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_path_accessor() {
        let err = ManifestError::missing_element("a/pom.xml", "project");
        assert_eq!(err.path().as_str(), "a/pom.xml");
    }

    #[test]
    fn test_structural_classification() {
        assert!(ManifestError::missing_element("pom.xml", "dependencies").is_structural());
        let inner = std::io::Error::other("boom");
        assert!(!ManifestError::io("pom.xml", inner).is_structural());
    }
}
