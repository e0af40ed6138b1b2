//! Fully-qualified type names and dotted-path segmentation.

use serde::{Deserialize, Serialize};

/// A resolved type name: a dot-segmented namespace plus a simple name.
///
/// The simple name may itself be dotted for nested types (`Outer.Inner`);
/// the namespace portion is always the package-like qualifier.
///
/// # Examples
///
/// ```
/// use repkg_core::TypeName;
///
/// let name = TypeName::from_fully_qualified("javax.xml.bind.JAXBException");
/// assert_eq!(name.namespace(), "javax.xml.bind");
/// assert_eq!(name.simple_name(), "JAXBException");
/// assert_eq!(name.fully_qualified(), "javax.xml.bind.JAXBException");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName {
    namespace: String,
    simple: String,
}

impl TypeName {
    /// Creates a type name from its namespace and simple name.
    #[must_use]
    pub fn new(namespace: impl Into<String>, simple: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            simple: simple.into(),
        }
    }

    /// Splits a dotted fully-qualified name into namespace and simple name.
    ///
    /// The boundary follows the Java naming convention: the first segment
    /// beginning with an uppercase letter starts the type. When no segment is
    /// capitalized, the final segment is taken as the simple name.
    #[must_use]
    pub fn from_fully_qualified(fqn: &str) -> Self {
        let segments: Vec<&str> = fqn.split('.').collect();
        let boundary = type_boundary(&segments).unwrap_or(segments.len().saturating_sub(1));
        Self {
            namespace: segments[..boundary].join("."),
            simple: segments[boundary..].join("."),
        }
    }

    /// The namespace (package) portion; empty for unqualified names.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The simple name, possibly dotted for nested types.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        &self.simple
    }

    /// Returns `true` if the name carries no namespace.
    #[must_use]
    pub fn is_unqualified(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Renders the full dotted name.
    #[must_use]
    pub fn fully_qualified(&self) -> String {
        if self.namespace.is_empty() {
            self.simple.clone()
        } else {
            format!("{}.{}", self.namespace, self.simple)
        }
    }

    /// Returns a copy of this name under a different namespace.
    #[must_use]
    pub fn with_namespace(&self, namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            simple: self.simple.clone(),
        }
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.simple)
        } else {
            write!(f, "{}.{}", self.namespace, self.simple)
        }
    }
}

/// Index of the first segment that begins the type portion of a dotted path.
///
/// Returns the index of the first segment starting with an uppercase letter,
/// or `None` when every segment is lowercase (a bare package path, or a type
/// named against convention).
#[must_use]
pub fn type_boundary<S: AsRef<str>>(segments: &[S]) -> Option<usize> {
    segments
        .iter()
        .position(|s| s.as_ref().chars().next().is_some_and(char::is_uppercase))
}

/// Returns `true` if `text` is a plausible dotted reference path: non-empty
/// identifier segments separated by single dots.
#[must_use]
pub fn is_dotted_identifier(text: &str) -> bool {
    !text.is_empty()
        && text.split('.').all(|seg| {
            let mut chars = seg.chars();
            chars
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fully_qualified() {
        let name = TypeName::from_fully_qualified("javax.xml.bind.annotation.XmlRootElement");
        assert_eq!(name.namespace(), "javax.xml.bind.annotation");
        assert_eq!(name.simple_name(), "XmlRootElement");
    }

    #[test]
    fn test_nested_type_stays_in_simple_name() {
        let name = TypeName::from_fully_qualified("javax.xml.bind.Marshaller.Listener");
        assert_eq!(name.namespace(), "javax.xml.bind");
        assert_eq!(name.simple_name(), "Marshaller.Listener");
    }

    #[test]
    fn test_lowercase_only_path_falls_back_to_last_segment() {
        let name = TypeName::from_fully_qualified("com.example.widget");
        assert_eq!(name.namespace(), "com.example");
        assert_eq!(name.simple_name(), "widget");
    }

    #[test]
    fn test_single_segment() {
        let name = TypeName::from_fully_qualified("JAXB");
        assert_eq!(name.namespace(), "");
        assert_eq!(name.simple_name(), "JAXB");
        assert!(name.is_unqualified());
    }

    #[test]
    fn test_fully_qualified_round_trip() {
        let name = TypeName::new("jakarta.xml.bind", "JAXBContext");
        assert_eq!(name.fully_qualified(), "jakarta.xml.bind.JAXBContext");
        assert_eq!(name.to_string(), "jakarta.xml.bind.JAXBContext");
    }

    #[test]
    fn test_with_namespace() {
        let old = TypeName::new("javax.xml.bind", "JAXB");
        let new = old.with_namespace("jakarta.xml.bind");
        assert_eq!(new.fully_qualified(), "jakarta.xml.bind.JAXB");
        assert_eq!(old.namespace(), "javax.xml.bind");
    }

    #[test]
    fn test_type_boundary() {
        assert_eq!(type_boundary(&["javax", "xml", "JAXB"]), Some(2));
        assert_eq!(type_boundary(&["javax", "xml"]), None);
        assert_eq!(type_boundary(&["Outer", "Inner"]), Some(0));
    }

    #[test]
    fn test_is_dotted_identifier() {
        assert!(is_dotted_identifier("javax.xml.bind.JAXB"));
        assert!(is_dotted_identifier("a"));
        assert!(is_dotted_identifier("a._b.$c"));
        assert!(!is_dotted_identifier(""));
        assert!(!is_dotted_identifier("a..b"));
        assert!(!is_dotted_identifier("a.1b"));
        assert!(!is_dotted_identifier("a.b-c"));
    }
}
