//! Byte spans and source locations within a document.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` into a document's source text.
///
/// Spans always refer to the *original* text of the document they were
/// produced from; rewritten documents keep the original spans as node
/// identities and carry replacement text separately.
///
/// # Examples
///
/// ```
/// use repkg_core::Span;
///
/// let span = Span::new(7, 12);
/// assert_eq!(span.len(), 5);
/// assert_eq!(span.slice("import jakarta;"), "jakar");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Creates a new span from byte offsets.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span covers no bytes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns `true` if `other` lies entirely within this span.
    #[must_use]
    pub const fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns `true` if the byte ranges of the two spans intersect.
    #[must_use]
    pub const fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Slices `text` to the bytes covered by this span.
    ///
    /// Returns an empty string when the span is out of bounds rather than
    /// panicking; spans are only ever constructed from parser output, so an
    /// out-of-bounds span indicates a caller mixing up documents.
    #[must_use]
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.start..self.end).unwrap_or("")
    }
}

/// A position in source code.
///
/// Lines are 1-indexed (matching editor conventions) while columns are
/// 0-indexed (matching tree-sitter's output).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// 1-indexed line number.
    pub line: usize,
    /// 0-indexed column number.
    pub column: usize,
    /// Byte offset from the start of the document.
    pub byte_offset: usize,
}

impl SourceLocation {
    /// Creates a new source location.
    #[must_use]
    pub const fn new(line: usize, column: usize, byte_offset: usize) -> Self {
        Self {
            line,
            column,
            byte_offset,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
