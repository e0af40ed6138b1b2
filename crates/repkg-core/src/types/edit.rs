//! Span-based text edits applied to immutable source text.

use crate::types::span::Span;

/// A single replacement of a byte range with new text.
///
/// Edits never overlap within one batch; they are applied back-to-front so
/// earlier spans stay valid while later ones are spliced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEdit {
    /// The byte range being replaced.
    pub span: Span,
    /// The replacement text.
    pub text: String,
}

impl SourceEdit {
    /// Creates a replacement edit.
    #[must_use]
    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            text: text.into(),
        }
    }

    /// Creates an insertion at `pos` (a zero-width replacement).
    #[must_use]
    pub fn insert(pos: usize, text: impl Into<String>) -> Self {
        Self {
            span: Span::new(pos, pos),
            text: text.into(),
        }
    }
}

/// Applies a batch of non-overlapping edits to `source`.
///
/// Edits are sorted by position and spliced from the end of the text toward
/// the start, so byte offsets taken against the original text remain valid
/// throughout. Overlapping edits are a caller bug; the later-starting edit
/// wins deterministically rather than corrupting surrounding text.
#[must_use]
pub fn apply_edits(source: &str, edits: &[SourceEdit]) -> String {
    if edits.is_empty() {
        return source.to_owned();
    }
    let mut ordered: Vec<&SourceEdit> = edits.iter().collect();
    ordered.sort_by_key(|edit| std::cmp::Reverse((edit.span.start, edit.span.end)));

    let mut output = source.to_owned();
    let mut last_start = source.len();
    for edit in ordered {
        let end = edit.span.end.min(last_start);
        let start = edit.span.start.min(end);
        debug_assert!(
            edit.span.end <= last_start,
            "overlapping edits at byte {}",
            edit.span.start,
        );
        output.replace_range(start..end, &edit.text);
        last_start = start;
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_replacement() {
        let source = "import javax.xml.bind.JAXB;";
        let edits = [SourceEdit::replace(Span::new(7, 21), "jakarta.xml.bind")];
        assert_eq!(apply_edits(source, &edits), "import jakarta.xml.bind.JAXB;");
    }

    #[test]
    fn test_multiple_replacements_keep_offsets() {
        let source = "a javax.a.B b javax.a.C c";
        let edits = [
            SourceEdit::replace(Span::new(2, 9), "jakarta.a"),
            SourceEdit::replace(Span::new(14, 21), "jakarta.a"),
        ];
        assert_eq!(apply_edits(source, &edits), "a jakarta.a.B b jakarta.a.C c");
    }

    #[test]
    fn test_order_independent() {
        let source = "xx yy zz";
        let forward = [
            SourceEdit::replace(Span::new(0, 2), "aa"),
            SourceEdit::replace(Span::new(6, 8), "bb"),
        ];
        let backward = [
            SourceEdit::replace(Span::new(6, 8), "bb"),
            SourceEdit::replace(Span::new(0, 2), "aa"),
        ];
        assert_eq!(apply_edits(source, &forward), "aa yy bb");
        assert_eq!(apply_edits(source, &backward), "aa yy bb");
    }

    #[test]
    fn test_insertion() {
        let source = "<deps></deps>";
        let edits = [SourceEdit::insert(6, "<d/>")];
        assert_eq!(apply_edits(source, &edits), "<deps><d/></deps>");
    }

    #[test]
    fn test_no_edits_returns_source() {
        assert_eq!(apply_edits("unchanged", &[]), "unchanged");
    }

    #[test]
    fn test_replacement_shrinks_and_grows() {
        let source = "one two three";
        let edits = [
            SourceEdit::replace(Span::new(0, 3), "1"),
            SourceEdit::replace(Span::new(4, 7), "twenty-two"),
        ];
        assert_eq!(apply_edits(source, &edits), "1 twenty-two three");
    }
}
