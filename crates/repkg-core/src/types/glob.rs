//! Glob patterns over fully-qualified type names.

use glob_match::glob_match;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A wildcard pattern matched against fully-qualified type names.
///
/// Patterns use plain glob syntax where `*` matches any run of characters,
/// including dots: `jakarta.xml.bind.*` matches both
/// `jakarta.xml.bind.JAXB` and `jakarta.xml.bind.annotation.XmlType`.
///
/// # Examples
///
/// ```
/// use repkg_core::UsageGlob;
///
/// let glob = UsageGlob::new("jakarta.xml.bind.*").unwrap();
/// assert!(glob.matches("jakarta.xml.bind.MarshalException"));
/// assert!(!glob.matches("jakarta.ws.rs.GET"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageGlob {
    pattern: String,
}

impl UsageGlob {
    /// Creates a glob after validating the pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGlob`] for an empty pattern.
    pub fn new(pattern: impl Into<String>) -> Result<Self, ConfigError> {
        let glob = Self {
            pattern: pattern.into(),
        };
        glob.validate()?;
        Ok(glob)
    }

    /// The raw pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` if `fqn` matches the pattern.
    #[must_use]
    pub fn matches(&self, fqn: &str) -> bool {
        glob_match(&self.pattern, fqn)
    }

    /// Validates the pattern; deserialized globs are checked here since
    /// serde construction bypasses [`UsageGlob::new`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGlob`] for an empty or blank pattern.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pattern.trim().is_empty() {
            return Err(ConfigError::invalid_glob(
                &self.pattern,
                "pattern must not be empty",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for UsageGlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}
