//! Reference-site nodes: the lowered representation of every position in a
//! Java document where a type name appears.

use repkg_core::{SourceLocation, Span, TypeName};
use smallvec::SmallVec;

/// Index of a reference node in its document's arena.
///
/// Node ids are only meaningful within the document that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a node id from an arena index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The arena index this id names.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The syntactic position of a type reference.
///
/// This enum is deliberately closed: every consumer dispatches with an
/// exhaustive `match` and no wildcard arm, so adding a shape forces every
/// call site to decide how to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefShape {
    /// `import a.b.C;` or `import a.b.*;`
    Import,
    /// `import static a.b.C.member;` or `import static a.b.C.*;`
    StaticImport,
    /// An entry in an `extends`, `implements`, or `permits` clause.
    Supertype,
    /// A bound in a declaration-site type parameter (`T extends X`).
    TypeDeclBound,
    /// A wildcard bound (`? extends X`, `? super X`).
    WildcardBound,
    /// A type argument inside `<...>`, including method type witnesses.
    GenericArgument,
    /// The component type of an array (`X[]`, `new X[n]`).
    ArrayElement,
    /// The declared type of a field.
    FieldType,
    /// The declared type of a local variable, for-each binding, or resource.
    LocalVariableType,
    /// The declared type of a method or constructor parameter.
    ParameterType,
    /// A method's return type.
    ReturnType,
    /// An entry in a `throws` clause.
    ThrowsClause,
    /// One alternative of a (multi-)catch clause.
    CatchAlternative,
    /// The target type of a cast expression.
    Cast,
    /// The instantiated type in a `new` expression.
    NewInstance,
    /// The type named by an annotation (`@X`, `@X(...)`).
    AnnotationTarget,
    /// The type of a class literal (`X.class`).
    ClassLiteral,
    /// The type qualifying static member access (`X.member`, `X.method()`).
    StaticMemberQualifier,
    /// The type qualifying a method reference (`X::member`, `X::new`).
    MethodReference,
    /// The tested type of an `instanceof` expression.
    InstanceOfTarget,
}

impl RefShape {
    /// Returns `true` for shapes that live in the document's import table.
    #[must_use]
    pub const fn is_import(self) -> bool {
        matches!(self, Self::Import | Self::StaticImport)
    }

    /// Short lowercase label for logs and reports.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::StaticImport => "static import",
            Self::Supertype => "supertype",
            Self::TypeDeclBound => "type bound",
            Self::WildcardBound => "wildcard bound",
            Self::GenericArgument => "generic argument",
            Self::ArrayElement => "array element",
            Self::FieldType => "field type",
            Self::LocalVariableType => "local variable type",
            Self::ParameterType => "parameter type",
            Self::ReturnType => "return type",
            Self::ThrowsClause => "throws clause",
            Self::CatchAlternative => "catch alternative",
            Self::Cast => "cast",
            Self::NewInstance => "instantiation",
            Self::AnnotationTarget => "annotation",
            Self::ClassLiteral => "class literal",
            Self::StaticMemberQualifier => "static member qualifier",
            Self::MethodReference => "method reference",
            Self::InstanceOfTarget => "instanceof target",
        }
    }
}

impl std::fmt::Display for RefShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// One type reference in a document.
///
/// A reference records the lexical facts the parser can see: the dotted
/// namespace qualifier as written (if any), the simple name, and the byte
/// spans of the qualifier's segments. Semantic resolution is layered on top
/// by a `TypeResolver`; the reference itself never guesses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub(crate) id: NodeId,
    pub(crate) shape: RefShape,
    pub(crate) span: Span,
    pub(crate) qualifier: Option<String>,
    pub(crate) qualifier_segments: SmallVec<[Span; 6]>,
    pub(crate) simple_name: String,
    pub(crate) member: Option<String>,
    pub(crate) location: SourceLocation,
}

impl TypeRef {
    /// The arena id of this reference.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The syntactic position this reference occupies.
    #[must_use]
    pub fn shape(&self) -> RefShape {
        self.shape
    }

    /// Byte span of the reference in the original document text.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// The dotted namespace qualifier as written, if the reference is
    /// qualified.
    #[must_use]
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Byte spans of the individual qualifier segments, in order.
    ///
    /// Empty for unqualified references and for references whose qualifier
    /// was produced by a rewrite (the original spans no longer spell it).
    #[must_use]
    pub fn qualifier_segments(&self) -> &[Span] {
        &self.qualifier_segments
    }

    /// The simple type name; dotted for nested types (`Outer.Inner`).
    #[must_use]
    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    /// The static member name, for static-import references.
    #[must_use]
    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    /// Position of the reference in the source.
    #[must_use]
    pub fn location(&self) -> SourceLocation {
        self.location
    }

    /// Returns `true` when the reference carries a lexical namespace.
    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.qualifier.is_some()
    }

    /// The name this reference lexically spells, with no resolution applied.
    #[must_use]
    pub fn lexical_name(&self) -> TypeName {
        TypeName::new(self.qualifier().unwrap_or(""), self.simple_name.clone())
    }

    /// Returns a copy of this reference under a renamed namespace.
    ///
    /// The qualifier segment spans are cleared: they index into the original
    /// text, which no longer spells the new qualifier.
    #[must_use]
    pub fn with_renamed_namespace(&self, namespace: impl Into<String>) -> Self {
        Self {
            id: self.id,
            shape: self.shape,
            span: self.span,
            qualifier: Some(namespace.into()),
            qualifier_segments: SmallVec::new(),
            simple_name: self.simple_name.clone(),
            member: self.member.clone(),
            location: self.location,
        }
    }
}

/// How an import binds names into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// `import a.b.C;`
    Type,
    /// `import a.b.*;`
    Wildcard,
    /// `import static a.b.C.member;`
    StaticMember,
    /// `import static a.b.C.*;`
    StaticWildcard,
}

impl ImportKind {
    /// Returns `true` for the two static forms.
    #[must_use]
    pub const fn is_static(self) -> bool {
        matches!(self, Self::StaticMember | Self::StaticWildcard)
    }

    /// Returns `true` for the two on-demand (`*`) forms.
    #[must_use]
    pub const fn is_wildcard(self) -> bool {
        matches!(self, Self::Wildcard | Self::StaticWildcard)
    }
}

/// One import declaration, split into its semantic parts.
///
/// | form | namespace | type_name | member |
/// | --- | --- | --- | --- |
/// | `import a.b.C;` | `a.b` | `C` | none |
/// | `import a.b.*;` | `a.b` | none | none |
/// | `import static a.b.C.m;` | `a.b` | `C` | `m` |
/// | `import static a.b.C.*;` | `a.b` | `C` | none |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub(crate) namespace: String,
    pub(crate) type_name: Option<String>,
    pub(crate) member: Option<String>,
    pub(crate) kind: ImportKind,
    pub(crate) path_span: Span,
    pub(crate) ref_id: NodeId,
    pub(crate) location: SourceLocation,
}

impl ImportDecl {
    /// The package namespace the import draws from.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The imported type path (dotted for nested types), when present.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// The imported static member name, for `static` member imports.
    #[must_use]
    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    /// The import form.
    #[must_use]
    pub fn kind(&self) -> ImportKind {
        self.kind
    }

    /// Byte span of the dotted path (including a trailing `.*`).
    #[must_use]
    pub fn path_span(&self) -> Span {
        self.path_span
    }

    /// Arena id of the reference node backing this import.
    #[must_use]
    pub fn ref_id(&self) -> NodeId {
        self.ref_id
    }

    /// Position of the import in the source.
    #[must_use]
    pub fn location(&self) -> SourceLocation {
        self.location
    }

    /// The simple name this import binds for unqualified use, when it binds
    /// one (`Inner` for `import a.b.Outer.Inner;`).
    #[must_use]
    pub fn bound_simple_name(&self) -> Option<&str> {
        if self.kind.is_wildcard() || self.kind.is_static() {
            return None;
        }
        self.type_name
            .as_deref()
            .and_then(|t| t.rsplit('.').next())
    }

    /// The fully-qualified type this import names, when it names one.
    #[must_use]
    pub fn fully_qualified_type(&self) -> Option<TypeName> {
        self.type_name
            .as_deref()
            .map(|t| TypeName::new(self.namespace.clone(), t))
    }

    /// Returns a copy of this import under a renamed namespace.
    #[must_use]
    pub fn with_namespace(&self, namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            type_name: self.type_name.clone(),
            member: self.member.clone(),
            kind: self.kind,
            path_span: self.path_span,
            ref_id: self.ref_id,
            location: self.location,
        }
    }
}
