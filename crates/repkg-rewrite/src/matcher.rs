//! Matching reference sites against a namespace mapping.

use repkg_core::{NamespaceMapping, TypeName};
use repkg_java_parser::{ImportResolver, JavaDocument, TypeRef, TypeResolver};

/// Decides whether a reference site belongs to the mapped namespace.
///
/// The matcher composes a [`TypeResolver`] with a [`NamespaceMapping`]:
/// resolution turns the site into a fully-qualified name, the mapping tests
/// that name's namespace on dot-segment boundaries. Both failure modes are
/// silent non-matches, which keeps unresolvable code safely untouched.
#[derive(Debug, Clone)]
pub struct ReferenceMatcher<R = ImportResolver> {
    mapping: NamespaceMapping,
    resolver: R,
}

impl ReferenceMatcher<ImportResolver> {
    /// Creates a matcher using the default lexical resolver.
    #[must_use]
    pub fn new(mapping: NamespaceMapping) -> Self {
        Self::with_resolver(mapping, ImportResolver)
    }
}

impl<R: TypeResolver> ReferenceMatcher<R> {
    /// Creates a matcher with a caller-supplied resolver.
    #[must_use]
    pub fn with_resolver(mapping: NamespaceMapping, resolver: R) -> Self {
        Self { mapping, resolver }
    }

    /// The mapping this matcher tests against.
    #[must_use]
    pub fn mapping(&self) -> &NamespaceMapping {
        &self.mapping
    }

    /// Resolves `site` within `document` and tests it against the mapping.
    ///
    /// Returns the resolved name on a match. `None` covers both outcomes
    /// that must not trigger a rewrite: a site that cannot be resolved, and
    /// a resolved type outside the mapped namespace.
    pub fn match_reference(&self, document: &JavaDocument, site: &TypeRef) -> Option<TypeName> {
        let resolved = self.resolver.resolve(document, site)?;
        if self.mapping.matches_namespace(resolved.namespace()) {
            Some(resolved)
        } else {
            None
        }
    }
}
