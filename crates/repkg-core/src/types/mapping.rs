//! The namespace mapping a migration run applies.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::name::is_dotted_identifier;

/// An (old-prefix, new-prefix) namespace rename.
///
/// Matching is performed on dot-separated namespace segments, never on raw
/// substrings: `javax.xml.bind` matches the namespace `javax.xml.bind` itself
/// and any namespace below it (`javax.xml.bind.annotation`), but not
/// `javax.xml.bindx`.
///
/// # Examples
///
/// ```
/// use repkg_core::NamespaceMapping;
///
/// let mapping = NamespaceMapping::new("javax.xml.bind", "jakarta.xml.bind").unwrap();
/// assert!(mapping.matches_namespace("javax.xml.bind.annotation"));
/// assert!(!mapping.matches_namespace("javax.xml.bindx"));
/// assert_eq!(
///     mapping.rename_namespace("javax.xml.bind.annotation").as_deref(),
///     Some("jakarta.xml.bind.annotation"),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespaceMapping {
    old_prefix: String,
    new_prefix: String,
}

impl NamespaceMapping {
    /// Creates a mapping after validating both prefixes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPrefix`] when either prefix is empty or
    /// is not a dot-separated identifier path.
    pub fn new(
        old_prefix: impl Into<String>,
        new_prefix: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let old_prefix = old_prefix.into();
        let new_prefix = new_prefix.into();
        validate_prefix("old-namespace-prefix", &old_prefix)?;
        validate_prefix("new-namespace-prefix", &new_prefix)?;
        Ok(Self {
            old_prefix,
            new_prefix,
        })
    }

    /// The namespace prefix being renamed away from.
    #[must_use]
    pub fn old_prefix(&self) -> &str {
        &self.old_prefix
    }

    /// The namespace prefix being renamed to.
    #[must_use]
    pub fn new_prefix(&self) -> &str {
        &self.new_prefix
    }

    /// Number of dot-separated segments in the old prefix.
    #[must_use]
    pub fn old_segment_count(&self) -> usize {
        self.old_prefix.split('.').count()
    }

    /// Returns `true` if `namespace` equals the old prefix or lives under it.
    ///
    /// Segment-boundary matching: the character following the prefix must be
    /// a dot, so `javax.xml.bindx` never matches a `javax.xml.bind` mapping.
    #[must_use]
    pub fn matches_namespace(&self, namespace: &str) -> bool {
        if namespace.len() == self.old_prefix.len() {
            return namespace == self.old_prefix;
        }
        namespace.starts_with(&self.old_prefix)
            && namespace.as_bytes().get(self.old_prefix.len()) == Some(&b'.')
    }

    /// Rewrites the old prefix of `namespace` to the new prefix.
    ///
    /// Returns `None` when the namespace does not match.
    #[must_use]
    pub fn rename_namespace(&self, namespace: &str) -> Option<String> {
        if !self.matches_namespace(namespace) {
            return None;
        }
        let mut renamed = String::with_capacity(
            self.new_prefix.len() + namespace.len() - self.old_prefix.len(),
        );
        renamed.push_str(&self.new_prefix);
        renamed.push_str(&namespace[self.old_prefix.len()..]);
        Some(renamed)
    }
}

impl std::fmt::Display for NamespaceMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.old_prefix, self.new_prefix)
    }
}

fn validate_prefix(option: &str, prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() {
        return Err(ConfigError::invalid_prefix(option, "prefix is empty"));
    }
    if !is_dotted_identifier(prefix) {
        return Err(ConfigError::invalid_prefix(
            option,
            format!("'{prefix}' is not a dot-separated identifier path"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> NamespaceMapping {
        NamespaceMapping::new("javax.xml.bind", "jakarta.xml.bind")
            .expect("valid mapping")
    }

    #[test]
    fn test_exact_match() {
        assert!(mapping().matches_namespace("javax.xml.bind"));
    }

    #[test]
    fn test_nested_namespace_matches() {
        assert!(mapping().matches_namespace("javax.xml.bind.annotation"));
        assert!(mapping().matches_namespace("javax.xml.bind.annotation.adapters"));
    }

    #[test]
    fn test_sibling_segment_does_not_match() {
        assert!(!mapping().matches_namespace("javax.xml.bindx"));
        assert!(!mapping().matches_namespace("javax.xml.bindings"));
    }

    #[test]
    fn test_parent_namespace_does_not_match() {
        assert!(!mapping().matches_namespace("javax.xml"));
        assert!(!mapping().matches_namespace("javax"));
        assert!(!mapping().matches_namespace(""));
    }

    #[test]
    fn test_rename_exact() {
        assert_eq!(
            mapping().rename_namespace("javax.xml.bind").as_deref(),
            Some("jakarta.xml.bind"),
        );
    }

    #[test]
    fn test_rename_nested() {
        assert_eq!(
            mapping()
                .rename_namespace("javax.xml.bind.annotation")
                .as_deref(),
            Some("jakarta.xml.bind.annotation"),
        );
    }

    #[test]
    fn test_rename_non_match_is_none() {
        assert_eq!(mapping().rename_namespace("javax.xml.bindx"), None);
        assert_eq!(mapping().rename_namespace("javax.xml"), None);
    }

    #[test]
    fn test_segment_count() {
        assert_eq!(mapping().old_segment_count(), 3);
    }

    #[test]
    fn test_empty_prefix_rejected() {
        assert!(NamespaceMapping::new("", "jakarta").is_err());
        assert!(NamespaceMapping::new("javax", "").is_err());
    }

    #[test]
    fn test_malformed_prefix_rejected() {
        assert!(NamespaceMapping::new("javax..bind", "jakarta").is_err());
        assert!(NamespaceMapping::new(".javax", "jakarta").is_err());
        assert!(NamespaceMapping::new("javax.", "jakarta").is_err());
        assert!(NamespaceMapping::new("javax bind", "jakarta").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(mapping().to_string(), "javax.xml.bind -> jakarta.xml.bind");
    }
}
