//! The immutable document model rewrites operate on.
//!
//! A [`JavaDocument`] owns its source text, an arena of lowered
//! [`TypeRef`]s, and the import table. Rewriting never mutates a document:
//! it produces a new value sharing the text and arena allocations with the
//! original, plus a copy-on-write overlay holding only the changed nodes.
//! Rendering splices the overlay's byte edits into the original text, so
//! every untouched token survives byte-for-byte.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use repkg_core::{FxHashMap, SourceEdit, apply_edits};

use crate::reference::{ImportDecl, NodeId, TypeRef};

/// A reference node replaced by a rewrite, together with the byte edit that
/// realizes the replacement in the rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenRef {
    /// The replacement reference (renamed qualifier, same identity).
    pub site: TypeRef,
    /// The minimal byte edit against the original text.
    pub edit: SourceEdit,
}

impl RewrittenRef {
    /// Pairs a replacement reference with its byte edit.
    #[must_use]
    pub fn new(site: TypeRef, edit: SourceEdit) -> Self {
        Self { site, edit }
    }
}

/// Copy-on-write set of rewritten nodes layered over a document's arena.
#[derive(Debug, Clone, Default)]
pub struct RefOverlay {
    entries: Arc<FxHashMap<NodeId, RewrittenRef>>,
}

impl RefOverlay {
    /// Number of rewritten nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no node has been rewritten.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The rewritten node for `id`, if any.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&RewrittenRef> {
        self.entries.get(&id)
    }
}

/// An immutable, lowered Java source document.
///
/// Identity is the file path. Cloning is cheap: the text, arena, and import
/// table live behind `Arc`s and are shared with every rewritten version of
/// the document.
#[derive(Clone)]
pub struct JavaDocument {
    path: Utf8PathBuf,
    text: Arc<str>,
    refs: Arc<[TypeRef]>,
    imports: Arc<[ImportDecl]>,
    overlay: RefOverlay,
}

impl JavaDocument {
    pub(crate) fn new(
        path: Utf8PathBuf,
        text: Arc<str>,
        refs: Vec<TypeRef>,
        imports: Vec<ImportDecl>,
    ) -> Self {
        Self {
            path,
            text,
            refs: Arc::from(refs),
            imports: Arc::from(imports),
            overlay: RefOverlay::default(),
        }
    }

    /// The file path identifying this document.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The original source text the document was parsed from.
    ///
    /// This never changes across rewrites; see [`JavaDocument::print`] for
    /// the rendered, post-rewrite text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.text
    }

    /// The effective import table (post-rewrite for rewritten documents).
    #[must_use]
    pub fn imports(&self) -> &[ImportDecl] {
        &self.imports
    }

    /// Iterates every reference, with rewritten nodes substituted.
    ///
    /// Order is stable: imports first, then body references in source
    /// order.
    pub fn references(&self) -> impl Iterator<Item = &TypeRef> {
        self.refs
            .iter()
            .map(|site| self.overlay.get(site.id()).map_or(site, |rw| &rw.site))
    }

    /// The effective reference for `id`.
    #[must_use]
    pub fn reference(&self, id: NodeId) -> Option<&TypeRef> {
        match self.overlay.get(id) {
            Some(rw) => Some(&rw.site),
            None => self.refs.get(id.index()),
        }
    }

    /// Number of references in the arena.
    #[must_use]
    pub fn reference_count(&self) -> usize {
        self.refs.len()
    }

    /// Number of nodes replaced relative to the parsed original.
    #[must_use]
    pub fn rewritten_count(&self) -> usize {
        self.overlay.len()
    }

    /// Returns `true` when this document differs structurally from the
    /// parsed original.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        !self.overlay.is_empty()
    }

    /// Renders the document text with all rewrites applied.
    ///
    /// An unchanged document renders its original text verbatim, imports
    /// and formatting included.
    #[must_use]
    pub fn print(&self) -> String {
        if self.overlay.is_empty() {
            return self.text.to_string();
        }
        let edits: Vec<SourceEdit> = self
            .overlay
            .entries
            .values()
            .map(|rw| rw.edit.clone())
            .collect();
        apply_edits(&self.text, &edits)
    }

    /// Produces a new document value with `changes` layered on top of this
    /// one, optionally replacing the import table.
    ///
    /// The receiver is untouched; unchanged nodes are shared by reference.
    /// Passing no changes and no import table returns a plain clone.
    #[must_use]
    pub fn with_rewrites(
        &self,
        changes: Vec<RewrittenRef>,
        imports: Option<Vec<ImportDecl>>,
    ) -> Self {
        if changes.is_empty() && imports.is_none() {
            return self.clone();
        }
        let mut entries = (*self.overlay.entries).clone();
        for change in changes {
            entries.insert(change.site.id(), change);
        }
        Self {
            path: self.path.clone(),
            text: Arc::clone(&self.text),
            refs: Arc::clone(&self.refs),
            imports: imports.map_or_else(|| Arc::clone(&self.imports), Arc::from),
            overlay: RefOverlay {
                entries: Arc::new(entries),
            },
        }
    }
}

impl PartialEq for JavaDocument {
    /// Structural equality: same path, same effective references, same
    /// import table, same rendered edits. Formatting outside reference
    /// nodes is part of the (shared) source text and compared with it.
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && *self.text == *other.text
            && self.imports.as_ref() == other.imports.as_ref()
            && self.refs.len() == other.refs.len()
            && self.references().eq(other.references())
            && self.overlay.entries == other.overlay.entries
    }
}

impl Eq for JavaDocument {}

impl std::fmt::Debug for JavaDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JavaDocument")
            .field("path", &self.path)
            .field("references", &self.refs.len())
            .field("imports", &self.imports.len())
            .field("rewritten", &self.overlay.len())
            .finish_non_exhaustive()
    }
}
