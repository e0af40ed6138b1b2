//! Lowering from a tree-sitter parse tree to the reference arena.
//!
//! Lowering runs in two passes. The import pass drives the compiled
//! [`crate::queries::IMPORT_QUERY`] over the tree and fills the import
//! table; each import also lands in the arena as a reference node. The body
//! pass then walks the remaining tree and captures every syntactic position
//! where a type name can appear, tagging each with its [`RefShape`].
//!
//! Qualification is purely lexical at this stage: a reference records the
//! dotted qualifier as written plus the byte span of each of its segments.
//! Where the parser cannot know whether a dotted chain names a type
//! (expression position), the Java naming convention decides: the first
//! uppercase-initial segment starts the type name. Chains with no such
//! segment are left alone.

use repkg_core::{SourceLocation, Span, type_boundary};
use smallvec::SmallVec;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, QueryCursor, Tree};

use crate::error::ParseError;
use crate::queries::{CAPTURE_IMPORT_DECLARATION, CAPTURE_IMPORT_PATH, get_import_query};
use crate::reference::{ImportDecl, ImportKind, NodeId, RefShape, TypeRef};

/// Output of lowering: the reference arena and the import table.
///
/// Arena order is imports first (in source order), then body references in
/// source order. A reference's [`NodeId`] always equals its arena index.
pub(crate) struct LoweredDocument {
    pub(crate) refs: Vec<TypeRef>,
    pub(crate) imports: Vec<ImportDecl>,
}

/// Lowers a parse tree into its reference arena and import table.
pub(crate) fn lower(tree: &Tree, source: &str) -> Result<LoweredDocument, ParseError> {
    let query = get_import_query()?;
    let root = tree.root_node();

    let mut lowering = Lowering {
        source,
        refs: Vec::new(),
        imports: Vec::new(),
    };

    // Import pass: collect (declaration, path) pairs first so the arena gets
    // them in source order regardless of match streaming order.
    let mut pairs: Vec<(Node<'_>, Node<'_>)> = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, root, source.as_bytes());
    while let Some(match_) = matches.next() {
        let mut declaration = None;
        let mut path = None;
        for capture in match_.captures {
            match capture.index {
                idx if idx == CAPTURE_IMPORT_PATH => path = Some(capture.node),
                idx if idx == CAPTURE_IMPORT_DECLARATION => declaration = Some(capture.node),
                _ => {}
            }
        }
        if let (Some(declaration), Some(path)) = (declaration, path) {
            pairs.push((declaration, path));
        }
    }
    pairs.sort_by_key(|(declaration, _)| declaration.start_byte());
    for (declaration, path) in pairs {
        lowering.lower_import(declaration, path);
    }

    let import_count = lowering.refs.len();

    // Body pass.
    lowering.walk(root);

    Ok(lowering.finish(import_count))
}

struct Lowering<'s> {
    source: &'s str,
    refs: Vec<TypeRef>,
    imports: Vec<ImportDecl>,
}

impl Lowering<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn next_id(&self) -> NodeId {
        NodeId::new(self.refs.len() as u32)
    }

    /// Sorts body references into source order and renumbers the arena so
    /// ids equal indices again. Import entries keep their positions, so the
    /// `ref_id` links in the import table stay valid.
    #[allow(clippy::cast_possible_truncation)]
    fn finish(mut self, import_count: usize) -> LoweredDocument {
        self.refs[import_count..].sort_by_key(|site| (site.span.start, site.span.end));
        for (index, site) in self.refs.iter_mut().enumerate() {
            site.id = NodeId::new(index as u32);
        }
        LoweredDocument {
            refs: self.refs,
            imports: self.imports,
        }
    }

    fn lower_import(&mut self, declaration: Node<'_>, path: Node<'_>) {
        let mut segments: SmallVec<[Span; 8]> = SmallVec::new();
        if !collect_dotted_name(path, &mut segments) || segments.is_empty() {
            return;
        }

        let is_static = has_token_child(declaration, "static");
        let asterisk = named_child_of_kind(declaration, "asterisk");
        let kind = match (is_static, asterisk.is_some()) {
            (true, true) => ImportKind::StaticWildcard,
            (true, false) => ImportKind::StaticMember,
            (false, true) => ImportKind::Wildcard,
            (false, false) => ImportKind::Type,
        };

        let texts: SmallVec<[&str; 8]> =
            segments.iter().map(|s| s.slice(self.source)).collect();

        // Split the dotted path into namespace, type, and member parts.
        let (namespace_len, type_name, member) = match kind {
            ImportKind::Type | ImportKind::StaticWildcard => {
                let boundary = type_boundary(&texts).unwrap_or(texts.len() - 1);
                (boundary, Some(texts[boundary..].join(".")), None)
            }
            ImportKind::Wildcard => (texts.len(), None, None),
            ImportKind::StaticMember => {
                if texts.len() < 2 {
                    return;
                }
                let member = texts[texts.len() - 1].to_owned();
                let head = &texts[..texts.len() - 1];
                let boundary = type_boundary(head).unwrap_or(head.len() - 1);
                (boundary, Some(head[boundary..].join(".")), Some(member))
            }
        };

        let namespace = texts[..namespace_len].join(".");
        let path_end = asterisk.map_or(path.end_byte(), |a| a.end_byte());
        let path_span = Span::new(path.start_byte(), path_end);

        let ref_id = self.next_id();
        self.refs.push(TypeRef {
            id: ref_id,
            shape: if kind.is_static() {
                RefShape::StaticImport
            } else {
                RefShape::Import
            },
            span: path_span,
            qualifier: if namespace.is_empty() {
                None
            } else {
                Some(namespace.clone())
            },
            qualifier_segments: segments[..namespace_len].iter().copied().collect(),
            simple_name: type_name.clone().unwrap_or_else(|| "*".to_owned()),
            member: member.clone(),
            location: location_of(path),
        });
        self.imports.push(ImportDecl {
            namespace,
            type_name,
            member,
            kind,
            path_span,
            ref_id,
            location: location_of(declaration),
        });
    }

    fn walk(&mut self, node: Node<'_>) {
        match node.kind() {
            // Imports are lowered by the query pass; package names and
            // comments carry no type references.
            "package_declaration" | "import_declaration" | "line_comment" | "block_comment" => {}

            "superclass" | "super_interfaces" | "extends_interfaces" | "permits" => {
                self.capture_type_list(node, RefShape::Supertype);
            }
            "type_bound" => self.capture_type_list(node, RefShape::TypeDeclBound),
            "throws" => self.capture_type_list(node, RefShape::ThrowsClause),
            "catch_type" => self.capture_type_list(node, RefShape::CatchAlternative),
            "type_arguments" => self.walk_type_arguments(node),

            "field_declaration" => self.capture_typed_node(node, RefShape::FieldType),
            "local_variable_declaration" | "enhanced_for_statement" | "resource" => {
                self.capture_typed_node(node, RefShape::LocalVariableType);
            }
            "formal_parameter" | "spread_parameter" | "receiver_parameter" => {
                self.capture_typed_node(node, RefShape::ParameterType);
            }
            "method_declaration" | "annotation_type_element_declaration" => {
                self.capture_typed_node(node, RefShape::ReturnType);
            }
            "array_creation_expression" => self.capture_typed_node(node, RefShape::ArrayElement),
            "object_creation_expression" => self.capture_typed_node(node, RefShape::NewInstance),

            "cast_expression" => self.capture_cast(node),
            "instanceof_expression" => self.capture_instanceof(node),
            "class_literal" => self.capture_class_literal(node),
            "annotation" | "marker_annotation" => self.capture_annotation(node),
            "method_invocation" => self.capture_method_invocation(node),
            "method_reference" => self.capture_method_reference(node),
            "field_access" => self.capture_field_access(node),

            _ => self.walk_children(node),
        }
    }

    fn walk_children(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.walk(child);
        }
    }

    /// Captures the type child of a declaration-like node, then walks the
    /// remaining children. Falls back to the first type-shaped child for
    /// the parameter forms that carry no `type` field.
    fn capture_typed_node(&mut self, node: Node<'_>, shape: RefShape) {
        let ty = node
            .child_by_field_name("type")
            .or_else(|| first_type_child(node));
        if let Some(ty) = ty {
            self.capture_type(ty, shape);
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if ty.is_some_and(|t| t.id() == child.id()) {
                continue;
            }
            self.walk(child);
        }
    }

    fn capture_cast(&mut self, node: Node<'_>) {
        // Intersection casts carry several `type` fields.
        let mut cursor = node.walk();
        let types: SmallVec<[Node<'_>; 2]> =
            node.children_by_field_name("type", &mut cursor).collect();
        for ty in &types {
            self.capture_type(*ty, RefShape::Cast);
        }
        if let Some(value) = node.child_by_field_name("value") {
            self.walk(value);
        }
    }

    fn capture_instanceof(&mut self, node: Node<'_>) {
        if let Some(left) = node.child_by_field_name("left") {
            self.walk(left);
        }
        if let Some(right) = node.child_by_field_name("right") {
            self.capture_type(right, RefShape::InstanceOfTarget);
        }
    }

    fn capture_class_literal(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if is_type_kind(child.kind()) {
                self.capture_type(child, RefShape::ClassLiteral);
            }
        }
    }

    fn capture_annotation(&mut self, node: Node<'_>) {
        if let Some(name) = node.child_by_field_name("name") {
            let mut segments: SmallVec<[Span; 8]> = SmallVec::new();
            if collect_dotted_name(name, &mut segments) && !segments.is_empty() {
                self.push_dotted_ref(name, RefShape::AnnotationTarget, &segments);
            }
        }
        if let Some(arguments) = node.child_by_field_name("arguments") {
            self.walk(arguments);
        }
    }

    fn capture_method_invocation(&mut self, node: Node<'_>) {
        if let Some(object) = node.child_by_field_name("object") {
            if !self.capture_name_chain(object, RefShape::StaticMemberQualifier) {
                self.walk(object);
            }
        }
        if let Some(type_arguments) = node.child_by_field_name("type_arguments") {
            self.walk_type_arguments(type_arguments);
        }
        if let Some(arguments) = node.child_by_field_name("arguments") {
            self.walk(arguments);
        }
    }

    fn capture_method_reference(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        let children: SmallVec<[Node<'_>; 4]> = node.named_children(&mut cursor).collect();
        let Some((receiver, rest)) = children.split_first() else {
            return;
        };
        match receiver.kind() {
            k if is_type_kind(k) => self.capture_type(*receiver, RefShape::MethodReference),
            "identifier" | "field_access" | "scoped_identifier" => {
                if !self.capture_name_chain(*receiver, RefShape::MethodReference) {
                    self.walk(*receiver);
                }
            }
            _ => self.walk(*receiver),
        }
        for child in rest {
            // The trailing identifier is the member name, not a type.
            if child.kind() == "type_arguments" {
                self.walk_type_arguments(*child);
            }
        }
    }

    fn capture_field_access(&mut self, node: Node<'_>) {
        if !self.capture_name_chain(node, RefShape::StaticMemberQualifier) {
            self.walk_children(node);
        }
    }

    fn capture_type_list(&mut self, node: Node<'_>, shape: RefShape) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "type_list" => self.capture_type_list(child, shape),
                k if is_type_kind(k) => self.capture_type(child, shape),
                _ => {}
            }
        }
    }

    fn walk_type_arguments(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "wildcard" => self.capture_wildcard(child),
                k if is_type_kind(k) => self.capture_type(child, RefShape::GenericArgument),
                _ => {}
            }
        }
    }

    fn capture_wildcard(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if is_type_kind(child.kind()) {
                self.capture_type(child, RefShape::WildcardBound);
            } else if is_annotation_kind(child.kind()) {
                self.capture_annotation(child);
            }
        }
    }

    /// Captures a node in type position.
    fn capture_type(&mut self, node: Node<'_>, shape: RefShape) {
        match node.kind() {
            "type_identifier" => {
                let span = span_of(node);
                let id = self.next_id();
                self.refs.push(TypeRef {
                    id,
                    shape,
                    span,
                    qualifier: None,
                    qualifier_segments: SmallVec::new(),
                    simple_name: span.slice(self.source).to_owned(),
                    member: None,
                    location: location_of(node),
                });
            }
            "scoped_type_identifier" => {
                let mut segments: SmallVec<[Span; 8]> = SmallVec::new();
                if collect_type_chain(node, &mut segments) && !segments.is_empty() {
                    self.push_dotted_ref(node, shape, &segments);
                } else {
                    // A generic base hides inside (`Outer<T>.Inner`); lower
                    // the base on its own, the trailing name rides along.
                    self.walk_scoped_generic(node, shape);
                }
            }
            "generic_type" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    match child.kind() {
                        "type_identifier" | "scoped_type_identifier" => {
                            self.capture_type(child, shape);
                        }
                        "type_arguments" => self.walk_type_arguments(child),
                        _ => {}
                    }
                }
            }
            "array_type" => {
                if let Some(element) = node.child_by_field_name("element") {
                    self.capture_type(element, RefShape::ArrayElement);
                }
            }
            "annotated_type" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if is_annotation_kind(child.kind()) {
                        self.capture_annotation(child);
                    } else if is_type_kind(child.kind()) {
                        self.capture_type(child, shape);
                    }
                }
            }
            // Primitive and void types carry no name to rewrite.
            _ => {}
        }
    }

    fn walk_scoped_generic(&mut self, node: Node<'_>, shape: RefShape) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "generic_type" | "scoped_type_identifier" => self.capture_type(child, shape),
                "annotation" | "marker_annotation" => self.capture_annotation(child),
                _ => {}
            }
        }
    }

    /// Tries to lower an expression-position dotted chain (`javax.a.B.FOO`)
    /// into a type reference. Returns `false` when the chain is not a plain
    /// dotted name or contains no uppercase-initial segment.
    fn capture_name_chain(&mut self, node: Node<'_>, shape: RefShape) -> bool {
        let mut segments: SmallVec<[Span; 8]> = SmallVec::new();
        if !collect_access_chain(node, &mut segments) || segments.is_empty() {
            return false;
        }
        let texts: SmallVec<[&str; 8]> =
            segments.iter().map(|s| s.slice(self.source)).collect();
        let Some(boundary) = type_boundary(&texts) else {
            return false;
        };
        let id = self.next_id();
        self.refs.push(TypeRef {
            id,
            shape,
            span: Span::new(segments[0].start, segments[boundary].end),
            qualifier: (boundary > 0).then(|| texts[..boundary].join(".")),
            qualifier_segments: segments[..boundary].iter().copied().collect(),
            simple_name: texts[boundary].to_owned(),
            member: None,
            location: location_of(node),
        });
        true
    }

    /// Emits a reference for a plain dotted name in type position. Nested
    /// type segments after the boundary stay in the simple name
    /// (`Marshaller.Listener`).
    fn push_dotted_ref(&mut self, node: Node<'_>, shape: RefShape, segments: &[Span]) {
        let texts: SmallVec<[&str; 8]> =
            segments.iter().map(|s| s.slice(self.source)).collect();
        let boundary = type_boundary(&texts).unwrap_or(texts.len() - 1);
        let id = self.next_id();
        self.refs.push(TypeRef {
            id,
            shape,
            span: Span::new(segments[0].start, segments[segments.len() - 1].end),
            qualifier: (boundary > 0).then(|| texts[..boundary].join(".")),
            qualifier_segments: segments[..boundary].iter().copied().collect(),
            simple_name: texts[boundary..].join("."),
            member: None,
            location: location_of(node),
        });
    }
}

fn span_of(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

pub(crate) fn location_of(node: Node<'_>) -> SourceLocation {
    let start = node.start_position();
    SourceLocation::new(start.row + 1, start.column, node.start_byte())
}

/// Node kinds that appear in type position.
fn is_type_kind(kind: &str) -> bool {
    matches!(
        kind,
        "type_identifier"
            | "scoped_type_identifier"
            | "generic_type"
            | "array_type"
            | "annotated_type"
    )
}

fn is_annotation_kind(kind: &str) -> bool {
    matches!(kind, "annotation" | "marker_annotation")
}

fn has_token_child(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|child| child.kind() == token)
}

fn named_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|child| child.kind() == kind)
}

fn first_type_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|child| is_type_kind(child.kind()))
}

/// Collects the segment spans of a plain dotted name (`a.b.C`). Returns
/// `false` when the node is not a chain of bare identifiers.
fn collect_dotted_name(node: Node<'_>, out: &mut SmallVec<[Span; 8]>) -> bool {
    match node.kind() {
        "identifier" => {
            out.push(span_of(node));
            true
        }
        "scoped_identifier" => {
            let (Some(scope), Some(name)) = (
                node.child_by_field_name("scope"),
                node.child_by_field_name("name"),
            ) else {
                return false;
            };
            if !collect_dotted_name(scope, out) || name.kind() != "identifier" {
                return false;
            }
            out.push(span_of(name));
            true
        }
        _ => false,
    }
}

/// Collects the segment spans of a field-access chain that spells a plain
/// dotted name. Chains that pass through calls, `this`, or array accesses
/// are rejected.
fn collect_access_chain(node: Node<'_>, out: &mut SmallVec<[Span; 8]>) -> bool {
    match node.kind() {
        "identifier" => {
            out.push(span_of(node));
            true
        }
        "field_access" => {
            let (Some(object), Some(field)) = (
                node.child_by_field_name("object"),
                node.child_by_field_name("field"),
            ) else {
                return false;
            };
            if !collect_access_chain(object, out) || field.kind() != "identifier" {
                return false;
            }
            out.push(span_of(field));
            true
        }
        "scoped_identifier" => collect_dotted_name(node, out),
        _ => false,
    }
}

/// Collects the segment spans of a `scoped_type_identifier` chain. Returns
/// `false` when a generic base interrupts the plain dotted spelling.
fn collect_type_chain(node: Node<'_>, out: &mut SmallVec<[Span; 8]>) -> bool {
    match node.kind() {
        "type_identifier" => {
            out.push(span_of(node));
            true
        }
        "scoped_type_identifier" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                match child.kind() {
                    "type_identifier" => out.push(span_of(child)),
                    "scoped_type_identifier" => {
                        if !collect_type_chain(child, out) {
                            return false;
                        }
                    }
                    "generic_type" => return false,
                    _ => {}
                }
            }
            true
        }
        _ => false,
    }
}
