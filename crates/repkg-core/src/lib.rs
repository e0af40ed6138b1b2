//! Core types, errors, and utilities for the repkg migration engine.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`NamespaceMapping`] - the configured rename with segment-boundary
//!   prefix matching
//! - [`TypeName`] - resolved fully-qualified names
//! - [`Dependency`] / [`DependencyRule`] - manifest injection rules
//! - [`UsageGlob`] - wildcard patterns over fully-qualified names
//! - [`RecipeConfig`] - the declarative recipe document
//! - [`ConfigError`] - configuration failures
//! - Type aliases for `FxHashMap`/`FxHashSet` (faster than std)

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod types;

pub use config::RecipeConfig;
pub use error::ConfigError;
pub use hash::{
    FxBuildHasher, FxHashMap, FxHashSet, fx_hash_map, fx_hash_map_with_capacity, fx_hash_set,
    fx_hash_set_with_capacity,
};
pub use types::{
    Dependency, DependencyRule, Exclusion, NamespaceMapping, SourceEdit, SourceLocation, Span,
    TypeName, UsageGlob, apply_edits, is_dotted_identifier, type_boundary,
};
