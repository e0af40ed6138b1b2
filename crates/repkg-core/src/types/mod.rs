//! Domain types for the repkg migration engine.
//!
//! This module contains the core value types shared across the workspace:
//!
//! - [`name`] - Fully-qualified type names and path segmentation
//! - [`mapping`] - The configured namespace rename
//! - [`dependency`] - Dependency declarations and injection rules
//! - [`glob`] - Usage-trigger glob patterns
//! - [`span`] - Byte spans and source locations
//! - [`edit`] - Span-based text edits over immutable source
//!
//! # Re-exports
//!
//! All public types are re-exported at this module level and at the crate
//! root:
//!
//! ```
//! use repkg_core::{Dependency, NamespaceMapping, TypeName, UsageGlob};
//! ```

mod dependency;
mod edit;
mod glob;
mod mapping;
mod name;
mod span;

// Re-export all public types
pub use dependency::{Dependency, DependencyRule, Exclusion};
pub use edit::{SourceEdit, apply_edits};
pub use glob::UsageGlob;
pub use mapping::NamespaceMapping;
pub use name::{TypeName, is_dotted_identifier, type_boundary};
pub use span::{SourceLocation, Span};
