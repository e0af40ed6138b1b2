//! Resolution of reference sites to fully-qualified type names.
//!
//! Matching a rewrite rule against a reference needs the type's namespace,
//! and the reference alone does not always spell one. [`TypeResolver`] is
//! the seam where that knowledge plugs in; [`ImportResolver`] is the
//! default, purely lexical implementation. Returning `None` means the site
//! could not be resolved, and an unresolved site is never rewritten.

use repkg_core::TypeName;

use crate::document::JavaDocument;
use crate::reference::{ImportKind, TypeRef};

/// Resolves reference sites to the fully-qualified types they name.
///
/// Implementations must be conservative: when the evidence is ambiguous,
/// return `None` and leave the site alone.
pub trait TypeResolver {
    /// The fully-qualified type `site` names within `document`, if it can
    /// be determined.
    fn resolve(&self, document: &JavaDocument, site: &TypeRef) -> Option<TypeName>;
}

/// The default resolver: lexical qualifiers are trusted as written, bare
/// names bind through the document's import table.
///
/// A bare name resolves when a single-type import binds it, or when the
/// document has exactly one on-demand (`*`) import that could supply it.
/// Several on-demand imports make the binding ambiguous and the name stays
/// unresolved. Names drawn from the document's own package or `java.lang`
/// resolve to nothing here, which is the safe direction: they are never
/// rewrite candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportResolver;

impl TypeResolver for ImportResolver {
    fn resolve(&self, document: &JavaDocument, site: &TypeRef) -> Option<TypeName> {
        if let Some(namespace) = site.qualifier() {
            return Some(TypeName::new(namespace, site.simple_name()));
        }

        // For a nested name like `Marshaller.Listener`, the import binds the
        // head segment.
        let head = site.simple_name().split('.').next()?;

        if let Some(import) = document
            .imports()
            .iter()
            .find(|import| import.bound_simple_name() == Some(head))
        {
            return Some(TypeName::new(import.namespace(), site.simple_name()));
        }

        let mut on_demand = document
            .imports()
            .iter()
            .filter(|import| import.kind() == ImportKind::Wildcard);
        match (on_demand.next(), on_demand.next()) {
            (Some(import), None) => Some(TypeName::new(import.namespace(), site.simple_name())),
            _ => None,
        }
    }
}
