//! Format-preserving Maven POM editing for the repkg migration engine.
//!
//! This crate owns the manifest side of a migration: reading a `pom.xml`
//! without disturbing its formatting, deciding whether a dependency is
//! already declared, and appending new `<dependency>` entries to the
//! `<dependencies>` block that sits directly under `<project>`.
//!
//! # Architecture
//!
//! - [`PomDocument`] - verbatim manifest text with span-based edits
//! - [`DependencyInjector`] - applies [`DependencyRule`]s in order, with
//!   usage-gated rules decided by a caller-supplied predicate
//! - [`ManifestError`] - structural and I/O failures; a manifest without a
//!   canonical `<dependencies>` block is reported, never repaired
//!
//! [`DependencyRule`]: repkg_core::DependencyRule
//!
//! # Examples
//!
//! ```
//! use repkg_core::Dependency;
//! use repkg_maven::PomDocument;
//!
//! let source = "<project>\n  <dependencies>\n  </dependencies>\n</project>\n";
//! let mut pom = PomDocument::parse("pom.xml", source)?;
//! let added = pom.insert_dependency(&Dependency::new(
//!     "jakarta.xml.bind",
//!     "jakarta.xml.bind-api",
//!     "3.0.0",
//! ))?;
//! assert!(added);
//! assert!(pom.text().contains("<artifactId>jakarta.xml.bind-api</artifactId>"));
//! # Ok::<(), repkg_maven::ManifestError>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod inject;
pub mod pom;

pub use error::ManifestError;
pub use inject::{DependencyInjector, InjectionReport};
pub use pom::{DeclaredDependency, PomDocument};
