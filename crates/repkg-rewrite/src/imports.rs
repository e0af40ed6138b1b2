//! Import table normalization under a namespace mapping.

use repkg_core::NamespaceMapping;
use repkg_java_parser::{ImportDecl, JavaDocument};

/// Rewrites a document's import table under a namespace mapping.
///
/// Every import form is handled the same way: the namespace part moves to
/// the new prefix, everything else stays put. A single-type import keeps
/// its type name, an on-demand import keeps its `*`, and a static import
/// keeps both its type and its member. Imports outside the mapping are
/// copied through untouched, in their original order.
#[derive(Debug, Clone)]
pub struct ImportNormalizer {
    mapping: NamespaceMapping,
}

impl ImportNormalizer {
    /// Creates a normalizer for `mapping`.
    #[must_use]
    pub fn new(mapping: NamespaceMapping) -> Self {
        Self { mapping }
    }

    /// Computes the rewritten import table for `document`.
    ///
    /// Returns `None` when no import matches the mapping, so callers can
    /// tell a normalized table from an untouched one.
    #[must_use]
    pub fn normalize(&self, document: &JavaDocument) -> Option<Vec<ImportDecl>> {
        let mut changed = false;
        let imports: Vec<ImportDecl> = document
            .imports()
            .iter()
            .map(|import| {
                match self.mapping.rename_namespace(import.namespace()) {
                    Some(renamed) => {
                        changed = true;
                        import.with_namespace(renamed)
                    }
                    None => import.clone(),
                }
            })
            .collect();
        changed.then_some(imports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repkg_java_parser::{ImportKind, JavaParser};

    fn parse(source: &str) -> JavaDocument {
        JavaParser::new()
            .expect("parser should initialize")
            .parse_document("Test.java", source)
            .expect("document should parse")
    }

    fn normalizer() -> ImportNormalizer {
        ImportNormalizer::new(
            NamespaceMapping::new("javax.xml.bind", "jakarta.xml.bind").expect("valid mapping"),
        )
    }

    #[test]
    fn test_type_import_is_renamed() {
        let doc = parse("import javax.xml.bind.JAXBException;\nclass A {}\n");
        let imports = normalizer().normalize(&doc).expect("table should change");
        assert_eq!(imports[0].namespace(), "jakarta.xml.bind");
        assert_eq!(imports[0].type_name(), Some("JAXBException"));
    }

    #[test]
    fn test_static_import_keeps_member() {
        let doc = parse(
            "import static javax.xml.bind.DatatypeConverter.printHexBinary;\nclass A {}\n",
        );
        let imports = normalizer().normalize(&doc).expect("table should change");
        assert_eq!(imports[0].namespace(), "jakarta.xml.bind");
        assert_eq!(imports[0].type_name(), Some("DatatypeConverter"));
        assert_eq!(imports[0].member(), Some("printHexBinary"));
        assert_eq!(imports[0].kind(), ImportKind::StaticMember);
    }

    #[test]
    fn test_on_demand_import_is_renamed() {
        let doc = parse("import javax.xml.bind.*;\nclass A {}\n");
        let imports = normalizer().normalize(&doc).expect("table should change");
        assert_eq!(imports[0].namespace(), "jakarta.xml.bind");
        assert_eq!(imports[0].kind(), ImportKind::Wildcard);
    }

    #[test]
    fn test_sub_namespace_import_is_renamed() {
        let doc = parse("import javax.xml.bind.annotation.XmlRootElement;\nclass A {}\n");
        let imports = normalizer().normalize(&doc).expect("table should change");
        assert_eq!(imports[0].namespace(), "jakarta.xml.bind.annotation");
    }

    #[test]
    fn test_unrelated_imports_keep_order() {
        let doc = parse(
            "import java.util.List;\nimport javax.xml.bind.JAXBException;\nimport java.io.IOException;\nclass A {}\n",
        );
        let imports = normalizer().normalize(&doc).expect("table should change");
        assert_eq!(imports.len(), 3);
        assert_eq!(imports[0].namespace(), "java.util");
        assert_eq!(imports[1].namespace(), "jakarta.xml.bind");
        assert_eq!(imports[2].namespace(), "java.io");
    }

    #[test]
    fn test_untouched_table_is_none() {
        let doc = parse("import java.util.List;\nimport javax.xml.bindx.Thing;\nclass A {}\n");
        assert!(normalizer().normalize(&doc).is_none());
    }
}
