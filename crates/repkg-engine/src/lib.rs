//! Corpus-level orchestration for the repkg migration engine.
//!
//! This crate turns the per-document building blocks into one run:
//!
//! 1. **Load** - discover `.java` sources and `pom.xml` manifests under
//!    the configured roots and parse them in parallel ([`Corpus`]).
//! 2. **Rewrite** - apply the namespace mapping to every document with a
//!    rayon parallel map; malformed documents were already excluded.
//! 3. **Scan** - collect the rewrite (the barrier), then build a
//!    [`UsageIndex`] of every fully-qualified name the corpus references.
//! 4. **Inject** - apply dependency rules to the manifest, gated rules
//!    consulting the index.
//!
//! Failures travel as data: parse failures and the manifest outcome are
//! returned in the [`RunReport`] next to the successful results, and only
//! discovery-level problems (a bad root, a walk error) abort a run.
//!
//! # Thread Safety
//!
//! Documents share no mutable state, so the rewrite stage is an ordinary
//! parallel map. Worker threads each own a tree-sitter parser during corpus
//! loading; nothing is locked.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod corpus;
pub mod engine;
pub mod error;
pub mod report;
pub mod usage;

pub use corpus::{Corpus, CorpusPaths, CorpusWalker};
pub use engine::MigrationEngine;
pub use error::EngineError;
pub use report::{DocumentFailure, DocumentPair, ManifestOutcome, RunReport};
pub use usage::UsageIndex;
