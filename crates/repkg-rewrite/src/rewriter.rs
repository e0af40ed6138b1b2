//! The namespace rewriter over parsed documents.

use repkg_core::{NamespaceMapping, SourceEdit, Span};
use repkg_java_parser::{
    ImportResolver, JavaDocument, RefShape, RewrittenRef, TypeRef, TypeResolver,
};

use crate::imports::ImportNormalizer;
use crate::matcher::ReferenceMatcher;

/// Rewrites every reference to the mapped namespace within a document.
///
/// Rewriting is value-oriented: the input document is never mutated, and
/// the returned document shares its text and reference arena with the
/// input. Each matching site contributes one minimal byte edit covering
/// exactly the old-prefix segments of its spelled qualifier, so rendering
/// preserves all surrounding formatting and the edits of nested references
/// can never collide.
#[derive(Debug, Clone)]
pub struct NamespaceRewriter<R = ImportResolver> {
    matcher: ReferenceMatcher<R>,
    normalizer: ImportNormalizer,
}

impl NamespaceRewriter<ImportResolver> {
    /// Creates a rewriter using the default lexical resolver.
    #[must_use]
    pub fn new(mapping: NamespaceMapping) -> Self {
        Self::with_resolver(mapping, ImportResolver)
    }
}

impl<R: TypeResolver> NamespaceRewriter<R> {
    /// Creates a rewriter with a caller-supplied resolver.
    #[must_use]
    pub fn with_resolver(mapping: NamespaceMapping, resolver: R) -> Self {
        Self {
            normalizer: ImportNormalizer::new(mapping.clone()),
            matcher: ReferenceMatcher::with_resolver(mapping, resolver),
        }
    }

    /// The mapping this rewriter applies.
    #[must_use]
    pub fn mapping(&self) -> &NamespaceMapping {
        self.matcher.mapping()
    }

    /// Produces a copy of `document` with the mapping applied everywhere it
    /// matches.
    ///
    /// A document with no matching reference comes back equal to the input
    /// with `is_changed` still false, so running a rule over an unaffected
    /// corpus is a true no-op. Applying the same rewriter to its own output
    /// changes nothing further: rewritten references resolve into the new
    /// namespace, which the mapping no longer matches.
    #[must_use]
    pub fn rewrite(&self, document: &JavaDocument) -> JavaDocument {
        let mapping = self.matcher.mapping();
        let mut changes: Vec<RewrittenRef> = Vec::new();

        for site in document.references() {
            let Some(resolved) = self.matcher.match_reference(document, site) else {
                continue;
            };
            let Some(renamed) = mapping.rename_namespace(resolved.namespace()) else {
                continue;
            };
            if let Some(change) = rewrite_site(site, mapping, &renamed) {
                changes.push(change);
            }
        }

        let imports = self.normalizer.normalize(document);
        if changes.is_empty() && imports.is_none() {
            return document.clone();
        }

        tracing::debug!(
            path = %document.path(),
            sites = changes.len(),
            imports_changed = imports.is_some(),
            "rewrote namespace references"
        );
        document.with_rewrites(changes, imports)
    }
}

/// Computes the replacement node and byte edit for one matching site.
///
/// The dispatch is exhaustive over every reference shape; a shape added to
/// the parser forces a decision here before anything compiles. All current
/// shapes rewrite the same way: replace the spelled old-prefix qualifier
/// segments, leave every other byte alone. Sites that spell no qualifier
/// produce no edit; their binding moves with the rewritten import table.
fn rewrite_site(
    site: &TypeRef,
    mapping: &NamespaceMapping,
    renamed_namespace: &str,
) -> Option<RewrittenRef> {
    match site.shape() {
        // Import paths: the declaration text is edited here, the table
        // entry itself is renamed by the normalizer.
        RefShape::Import | RefShape::StaticImport => {
            prefix_edit(site, mapping, renamed_namespace)
        }

        // Type positions spell their qualifier directly.
        RefShape::Supertype
        | RefShape::TypeDeclBound
        | RefShape::WildcardBound
        | RefShape::GenericArgument
        | RefShape::ArrayElement
        | RefShape::FieldType
        | RefShape::LocalVariableType
        | RefShape::ParameterType
        | RefShape::ReturnType
        | RefShape::ThrowsClause
        | RefShape::CatchAlternative
        | RefShape::Cast
        | RefShape::NewInstance
        | RefShape::ClassLiteral
        | RefShape::InstanceOfTarget => prefix_edit(site, mapping, renamed_namespace),

        // Expression positions: lowering already isolated the type head of
        // the chain, so the same prefix edit applies.
        RefShape::AnnotationTarget
        | RefShape::StaticMemberQualifier
        | RefShape::MethodReference => prefix_edit(site, mapping, renamed_namespace),
    }
}

fn prefix_edit(
    site: &TypeRef,
    mapping: &NamespaceMapping,
    renamed_namespace: &str,
) -> Option<RewrittenRef> {
    let segments = site.qualifier_segments();
    let count = mapping.old_segment_count();
    if segments.len() < count {
        // Bare site; no spelled prefix to edit.
        return None;
    }
    let span = Span::new(segments[0].start, segments[count - 1].end);
    Some(RewrittenRef::new(
        site.with_renamed_namespace(renamed_namespace),
        SourceEdit::replace(span, mapping.new_prefix()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use repkg_java_parser::JavaParser;

    fn parse(source: &str) -> JavaDocument {
        JavaParser::new()
            .expect("parser should initialize")
            .parse_document("Test.java", source)
            .expect("document should parse")
    }

    fn rewriter() -> NamespaceRewriter {
        NamespaceRewriter::new(
            NamespaceMapping::new("javax.xml.bind", "jakarta.xml.bind").expect("valid mapping"),
        )
    }

    fn rewrite(source: &str) -> String {
        rewriter().rewrite(&parse(source)).print()
    }

    #[test]
    fn test_rewrites_type_import() {
        let source = "\
import javax.xml.bind.JAXBException;

public class Sample {
    void marshal() throws JAXBException {
    }
}
";
        let expected = "\
import jakarta.xml.bind.JAXBException;

public class Sample {
    void marshal() throws JAXBException {
    }
}
";
        assert_eq!(rewrite(source), expected);
    }

    #[test]
    fn test_rewrites_fully_qualified_field() {
        assert_eq!(
            rewrite("class Sample { javax.xml.bind.JAXBException error; }\n"),
            "class Sample { jakarta.xml.bind.JAXBException error; }\n",
        );
    }

    #[test]
    fn test_bare_annotation_moves_with_import() {
        let source = "\
import javax.xml.bind.annotation.XmlRootElement;

@XmlRootElement
public class Document {
}
";
        let expected = "\
import jakarta.xml.bind.annotation.XmlRootElement;

@XmlRootElement
public class Document {
}
";
        assert_eq!(rewrite(source), expected);
    }

    #[test]
    fn test_rewrites_qualified_annotation() {
        assert_eq!(
            rewrite("@javax.xml.bind.annotation.XmlRootElement\nclass Document {\n}\n"),
            "@jakarta.xml.bind.annotation.XmlRootElement\nclass Document {\n}\n",
        );
    }

    #[test]
    fn test_rewrites_array_field() {
        assert_eq!(
            rewrite("class Pool { javax.xml.bind.Marshaller[] open; }\n"),
            "class Pool { jakarta.xml.bind.Marshaller[] open; }\n",
        );
    }

    #[test]
    fn test_rewrites_supertype() {
        assert_eq!(
            rewrite("public class Custom extends javax.xml.bind.JAXBException {\n}\n"),
            "public class Custom extends jakarta.xml.bind.JAXBException {\n}\n",
        );
    }

    #[test]
    fn test_rewrites_method_signature() {
        let source = "\
class Factory {
    javax.xml.bind.Marshaller create() throws javax.xml.bind.JAXBException {
        return null;
    }
}
";
        let expected = "\
class Factory {
    jakarta.xml.bind.Marshaller create() throws jakarta.xml.bind.JAXBException {
        return null;
    }
}
";
        assert_eq!(rewrite(source), expected);
    }

    #[test]
    fn test_rewrites_generic_argument_only() {
        assert_eq!(
            rewrite("class Registry { java.util.List<javax.xml.bind.Marshaller> open; }\n"),
            "class Registry { java.util.List<jakarta.xml.bind.Marshaller> open; }\n",
        );
    }

    #[test]
    fn test_rewrites_wildcard_bound() {
        assert_eq!(
            rewrite(
                "class Registry { java.util.List<? extends javax.xml.bind.Marshaller> open; }\n",
            ),
            "class Registry { java.util.List<? extends jakarta.xml.bind.Marshaller> open; }\n",
        );
    }

    #[test]
    fn test_rewrites_first_alternative_of_multi_catch() {
        let source = "\
class Guard {
    void run() {
        try {
        } catch (javax.xml.bind.JAXBException | java.io.IOException e) {
        }
    }
}
";
        let expected = "\
class Guard {
    void run() {
        try {
        } catch (jakarta.xml.bind.JAXBException | java.io.IOException e) {
        }
    }
}
";
        assert_eq!(rewrite(source), expected);
    }

    #[test]
    fn test_rewrites_local_variable_and_instantiation() {
        let source = "\
class Builder {
    void make() {
        javax.xml.bind.JAXBException boom = new javax.xml.bind.JAXBException(\"boom\");
    }
}
";
        let expected = "\
class Builder {
    void make() {
        jakarta.xml.bind.JAXBException boom = new jakarta.xml.bind.JAXBException(\"boom\");
    }
}
";
        assert_eq!(rewrite(source), expected);
    }

    #[test]
    fn test_rewrites_cast_target() {
        assert_eq!(
            rewrite(
                "class Caster { Object narrow(Object o) { return (javax.xml.bind.Marshaller) o; } }\n",
            ),
            "class Caster { Object narrow(Object o) { return (jakarta.xml.bind.Marshaller) o; } }\n",
        );
    }

    #[test]
    fn test_rewrites_class_literal() {
        assert_eq!(
            rewrite("class Meta { Class<?> k = javax.xml.bind.JAXBException.class; }\n"),
            "class Meta { Class<?> k = jakarta.xml.bind.JAXBException.class; }\n",
        );
    }

    #[test]
    fn test_rewrites_static_method_select() {
        let source = "\
class Boot {
    void init() throws Exception {
        javax.xml.bind.JAXBContext.newInstance(\"com.acme\");
    }
}
";
        let expected = "\
class Boot {
    void init() throws Exception {
        jakarta.xml.bind.JAXBContext.newInstance(\"com.acme\");
    }
}
";
        assert_eq!(rewrite(source), expected);
    }

    #[test]
    fn test_rewrites_method_reference_receiver() {
        assert_eq!(
            rewrite(
                "class Refs { Object f = javax.xml.bind.DatatypeConverter::printHexBinary; }\n",
            ),
            "class Refs { Object f = jakarta.xml.bind.DatatypeConverter::printHexBinary; }\n",
        );
    }

    #[test]
    fn test_rewrites_instanceof_target() {
        assert_eq!(
            rewrite(
                "class Check { boolean m(Object o) { return o instanceof javax.xml.bind.Marshaller; } }\n",
            ),
            "class Check { boolean m(Object o) { return o instanceof jakarta.xml.bind.Marshaller; } }\n",
        );
    }

    #[test]
    fn test_rewrites_static_import_and_leaves_call_sites() {
        let source = "\
import static javax.xml.bind.DatatypeConverter.printHexBinary;

class Hex {
    String dump(byte[] raw) {
        return printHexBinary(raw);
    }
}
";
        let expected = "\
import static jakarta.xml.bind.DatatypeConverter.printHexBinary;

class Hex {
    String dump(byte[] raw) {
        return printHexBinary(raw);
    }
}
";
        assert_eq!(rewrite(source), expected);
    }

    #[test]
    fn test_rewrites_on_demand_import() {
        assert_eq!(
            rewrite("import javax.xml.bind.*;\nclass Sink { JAXBException e; }\n"),
            "import jakarta.xml.bind.*;\nclass Sink { JAXBException e; }\n",
        );
    }

    #[test]
    fn test_unrelated_method_select_is_untouched() {
        let source = "\
class Passthrough {
    String call(java.io.File f) {
        return f.getName().trim();
    }
}
";
        let doc = parse(source);
        let rewritten = rewriter().rewrite(&doc);
        assert!(!rewritten.is_changed());
        assert_eq!(rewritten, doc);
        assert_eq!(rewritten.print(), source);
    }

    #[test]
    fn test_no_match_is_a_true_no_op() {
        let source = "\
import java.util.List;

class Plain {
    List<String> names;
}
";
        let doc = parse(source);
        let rewritten = rewriter().rewrite(&doc);
        assert!(!rewritten.is_changed());
        assert_eq!(rewritten, doc);
        assert_eq!(rewritten.print(), source);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let source = "\
import javax.xml.bind.JAXBException;

class Once {
    javax.xml.bind.Marshaller m;
    JAXBException e;
}
";
        let rule = rewriter();
        let once = rule.rewrite(&parse(source));
        let twice = rule.rewrite(&once);
        assert_eq!(twice, once);
        assert_eq!(twice.print(), once.print());
    }

    #[test]
    fn test_prefix_discipline_on_sibling_namespace() {
        let source = "class Edge { javax.xml.bindx.Widget w; javax.xml.bind.Marshaller m; }\n";
        assert_eq!(
            rewrite(source),
            "class Edge { javax.xml.bindx.Widget w; jakarta.xml.bind.Marshaller m; }\n",
        );
    }

    #[test]
    fn test_rewrite_leaves_original_untouched() {
        let source = "class Keep { javax.xml.bind.Marshaller m; }\n";
        let doc = parse(source);
        let rewritten = rewriter().rewrite(&doc);
        assert!(rewritten.is_changed());
        assert!(!doc.is_changed());
        assert_eq!(doc.print(), source);
        assert_ne!(rewritten, doc);
    }

    #[test]
    fn test_single_segment_prefix_mapping() {
        let rule = NamespaceRewriter::new(
            NamespaceMapping::new("javax", "jakarta").expect("valid mapping"),
        );
        let doc = parse("class Wide { javax.annotation.Resource r; }\n");
        assert_eq!(
            rule.rewrite(&doc).print(),
            "class Wide { jakarta.annotation.Resource r; }\n",
        );
    }

    #[test]
    fn test_rewritten_references_resolve_into_new_namespace() {
        let doc = parse("import javax.xml.bind.JAXBException;\nclass R { JAXBException e; }\n");
        let rewritten = rewriter().rewrite(&doc);
        let resolver = ImportResolver;
        let resolved: Vec<String> = rewritten
            .references()
            .filter_map(|site| resolver.resolve(&rewritten, site))
            .map(|name| name.fully_qualified())
            .collect();
        assert_eq!(
            resolved,
            vec![
                "jakarta.xml.bind.JAXBException",
                "jakarta.xml.bind.JAXBException",
            ],
        );
    }
}
