//! Error types for the repkg-core crate.
//!
//! This module provides the [`ConfigError`] type for recipe- and
//! configuration-related failures shared across the workspace.

use camino::Utf8PathBuf;

/// Errors that can occur during recipe loading and validation.
///
/// Covers malformed namespace prefixes, dependency coordinates, usage globs,
/// and recipe-file I/O.
///
/// # Examples
///
/// ```
/// use repkg_core::ConfigError;
///
/// let error = ConfigError::invalid_prefix("old-namespace-prefix", "prefix is empty");
/// assert!(error.to_string().contains("old-namespace-prefix"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A namespace prefix option is malformed.
    #[error("invalid namespace prefix '{option}': {reason}")]
    InvalidPrefix {
        /// The configuration option holding the prefix.
        option: String,
        /// Explanation of why the prefix is invalid.
        reason: String,
    },

    /// A usage glob pattern is malformed.
    #[error("invalid usage glob '{pattern}': {reason}")]
    InvalidGlob {
        /// The offending pattern.
        pattern: String,
        /// Explanation of why the pattern is invalid.
        reason: String,
    },

    /// A dependency declaration field is malformed.
    #[error("invalid dependency field '{field}': {reason}")]
    InvalidDependency {
        /// The offending field (`groupId`, `artifactId`, `version`).
        field: String,
        /// Explanation of why the field is invalid.
        reason: String,
    },

    /// The provided path is invalid or malformed.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The invalid path.
        path: Utf8PathBuf,
        /// Explanation of why the path is invalid.
        reason: String,
    },

    /// A required directory does not exist.
    #[error("missing required directory: {0}")]
    MissingDirectory(Utf8PathBuf),

    /// An I/O error occurred while reading the recipe file.
    #[error("failed to read recipe: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the recipe file.
    #[error("failed to parse recipe: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates an [`ConfigError::InvalidPrefix`] error.
    pub fn invalid_prefix(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPrefix {
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`ConfigError::InvalidGlob`] error.
    pub fn invalid_glob(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGlob {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`ConfigError::InvalidDependency`] error.
    pub fn invalid_dependency(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDependency {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
