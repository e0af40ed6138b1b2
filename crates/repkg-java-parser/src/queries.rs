//! Pre-compiled tree-sitter queries for Java import extraction.
//!
//! This module provides the [`IMPORT_QUERY`] constant matching import
//! declarations, and [`get_import_query`] for lazily compiling and caching
//! the query. `static` and trailing-`*` modifiers are read off the captured
//! declaration node's children during extraction, since they are anonymous
//! tokens the query cannot name portably.

use std::sync::OnceLock;

use tree_sitter::{Language, Query};

use crate::error::ParseError;

/// Tree-sitter query for extracting Java import declarations.
///
/// # Capture Names
///
/// - `import.path` - The dotted path (`identifier` or `scoped_identifier`)
/// - `import.declaration` - The full `import_declaration` node
pub const IMPORT_QUERY: &str = r"
; import a.b.C;  /  import static a.b.C.member;  /  import a.b.*;
(import_declaration
  [(identifier) (scoped_identifier)] @import.path) @import.declaration
";

/// Capture index for `import.path`.
pub const CAPTURE_IMPORT_PATH: u32 = 0;

/// Capture index for `import.declaration`.
pub const CAPTURE_IMPORT_DECLARATION: u32 = 1;

/// Global cache for the compiled import query.
static COMPILED_QUERY: OnceLock<Query> = OnceLock::new();

/// Returns the compiled import query for Java.
///
/// The query is compiled once and cached for all subsequent calls.
/// This function is thread-safe.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
pub fn get_import_query() -> Result<&'static Query, ParseError> {
    if let Some(query) = COMPILED_QUERY.get() {
        return Ok(query);
    }

    let language: Language = tree_sitter_java::LANGUAGE.into();
    let query = compile_query(&language)?;

    Ok(COMPILED_QUERY.get_or_init(|| query))
}

/// Compiles the import query for the given language.
fn compile_query(language: &Language) -> Result<Query, ParseError> {
    Query::new(language, IMPORT_QUERY).map_err(|e| ParseError::QueryCompile {
        offset: e.offset,
        kind: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_compiles() {
        let language: Language = tree_sitter_java::LANGUAGE.into();
        let result = compile_query(&language);
        assert!(result.is_ok(), "Query should compile: {result:?}");
    }

    #[test]
    fn test_capture_indices_match_names() {
        let language: Language = tree_sitter_java::LANGUAGE.into();
        let query = compile_query(&language).expect("Query should compile");

        assert_eq!(
            query.capture_index_for_name("import.path"),
            Some(CAPTURE_IMPORT_PATH),
        );
        assert_eq!(
            query.capture_index_for_name("import.declaration"),
            Some(CAPTURE_IMPORT_DECLARATION),
        );
    }

    #[test]
    fn test_query_pattern_count() {
        let language: Language = tree_sitter_java::LANGUAGE.into();
        let query = compile_query(&language).expect("Query should compile");
        assert_eq!(query.pattern_count(), 1);
    }
}
