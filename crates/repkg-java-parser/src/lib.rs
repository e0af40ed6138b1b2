//! Java source parsing for namespace migration.
//!
//! This crate turns Java source text into an immutable [`JavaDocument`]:
//! the original text, an arena of [`TypeRef`] nodes covering every position
//! where a type name appears, and the document's import table. Parsing is
//! built on tree-sitter with the Java grammar; a compiled, cached query
//! extracts imports and a shape-tagged tree walk lowers everything else.
//!
//! # Architecture
//!
//! - [`parser`] - the tree-sitter front end ([`JavaParser`])
//! - [`queries`] - the compiled import query and its capture indices
//! - [`reference`] - reference nodes, shapes, and import declarations
//! - [`document`] - the immutable document model with copy-on-write rewrites
//! - [`resolve`] - the [`TypeResolver`] seam and its lexical default
//!
//! # Thread Safety
//!
//! [`JavaParser`] is `Send` but not `Sync`; parallel pipelines create one
//! parser per worker thread. Documents are immutable and cheap to clone,
//! so they move freely across threads.
//!
//! # Examples
//!
//! ```
//! use repkg_java_parser::{ImportResolver, JavaParser, TypeResolver};
//!
//! let mut parser = JavaParser::new()?;
//! let doc = parser.parse_document(
//!     "Sample.java",
//!     "import javax.xml.bind.JAXBException;\nclass Sample { JAXBException e; }\n",
//! )?;
//!
//! let field = doc.references().last().expect("field reference");
//! let resolved = ImportResolver.resolve(&doc, field).expect("bound by the import");
//! assert_eq!(resolved.fully_qualified(), "javax.xml.bind.JAXBException");
//! # Ok::<(), repkg_java_parser::ParseError>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod document;
pub mod error;
mod lower;
pub mod parser;
pub mod queries;
pub mod reference;
pub mod resolve;

pub use document::{JavaDocument, RefOverlay, RewrittenRef};
pub use error::ParseError;
pub use parser::JavaParser;
pub use reference::{ImportDecl, ImportKind, NodeId, RefShape, TypeRef};
pub use resolve::{ImportResolver, TypeResolver};
