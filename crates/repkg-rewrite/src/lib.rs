//! Namespace rewriting over parsed Java documents.
//!
//! Three pieces cooperate here. [`ReferenceMatcher`] decides whether a
//! reference site names a type under the mapped namespace, going through a
//! [`repkg_java_parser::TypeResolver`] so resolution strategy stays
//! pluggable. [`NamespaceRewriter`] applies the mapping to every matching
//! site of a document, producing a new document value that shares storage
//! with the input. [`ImportNormalizer`] rewrites the import table, keeping
//! order, on-demand `*` suffixes, and static members intact.
//!
//! Unmatched code is never touched: an unresolvable or out-of-namespace
//! reference is a silent non-match, and a document with no matches comes
//! back equal to its input.
//!
//! # Examples
//!
//! ```
//! use repkg_core::NamespaceMapping;
//! use repkg_java_parser::JavaParser;
//! use repkg_rewrite::NamespaceRewriter;
//!
//! let mapping = NamespaceMapping::new("javax.xml.bind", "jakarta.xml.bind")?;
//! let rewriter = NamespaceRewriter::new(mapping);
//!
//! let mut parser = JavaParser::new()?;
//! let doc = parser.parse_document(
//!     "A.java",
//!     "import javax.xml.bind.JAXBException;\nclass A {}\n",
//! )?;
//!
//! let rewritten = rewriter.rewrite(&doc);
//! assert_eq!(
//!     rewritten.print(),
//!     "import jakarta.xml.bind.JAXBException;\nclass A {}\n",
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod imports;
pub mod matcher;
pub mod rewriter;

pub use imports::ImportNormalizer;
pub use matcher::ReferenceMatcher;
pub use rewriter::NamespaceRewriter;
