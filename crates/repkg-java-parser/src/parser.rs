//! Java parsing built on tree-sitter.
//!
//! [`JavaParser`] owns a configured `tree_sitter::Parser`. Parsers are not
//! `Sync`; parallel callers keep one per worker thread and feed documents
//! through it sequentially.

use std::sync::Arc;

use camino::Utf8PathBuf;
use repkg_core::SourceLocation;
use tree_sitter::{Language, Node, Parser};

use crate::document::JavaDocument;
use crate::error::ParseError;
use crate::lower::{location_of, lower};

/// A reusable Java parser.
///
/// # Examples
///
/// ```
/// use repkg_java_parser::JavaParser;
///
/// let mut parser = JavaParser::new()?;
/// let doc = parser.parse_document("A.java", "import javax.xml.bind.JAXBException;\nclass A {}\n")?;
/// assert_eq!(doc.imports().len(), 1);
/// # Ok::<(), repkg_java_parser::ParseError>(())
/// ```
pub struct JavaParser {
    parser: Parser,
}

impl JavaParser {
    /// Creates a parser configured for the Java grammar.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the grammar version is
    /// incompatible with the linked tree-sitter runtime.
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        let language: Language = tree_sitter_java::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|_| ParseError::LanguageInit)?;
        Ok(Self { parser })
    }

    /// Parses `source` into a lowered [`JavaDocument`].
    ///
    /// Documents that do not parse cleanly are rejected with
    /// [`ParseError::Syntax`] carrying the position of the first error;
    /// rewriting a half-understood document could corrupt it.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Parse`] when tree-sitter produces no tree at
    /// all, and [`ParseError::Syntax`] for trees containing error or
    /// missing nodes.
    pub fn parse_document(
        &mut self,
        path: impl Into<Utf8PathBuf>,
        source: impl Into<Arc<str>>,
    ) -> Result<JavaDocument, ParseError> {
        let path = path.into();
        let text: Arc<str> = source.into();

        let tree = self
            .parser
            .parse(text.as_bytes(), None)
            .ok_or(ParseError::Parse)?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ParseError::syntax(path, first_error_location(root)));
        }

        let lowered = lower(&tree, &text)?;
        Ok(JavaDocument::new(path, text, lowered.refs, lowered.imports))
    }
}

impl std::fmt::Debug for JavaParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JavaParser").finish_non_exhaustive()
    }
}

/// Finds the position of the first error or missing node under `root`.
fn first_error_location(root: Node<'_>) -> SourceLocation {
    find_error_node(root).map_or_else(|| location_of(root), location_of)
}

fn find_error_node(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_error_node(child) {
            return Some(found);
        }
    }
    // The error flag is set but no descendant owns it; point at this node.
    Some(node)
}
