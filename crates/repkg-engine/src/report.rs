//! Results of a migration run.
//!
//! A [`RunReport`] pairs every document with its rewritten version, carries
//! the failures that excluded documents from the run, and records what
//! happened to the manifest. Failures are data here, not control flow: the
//! engine collects them next to the successful results instead of aborting
//! the batch.

use camino::{Utf8Path, Utf8PathBuf};
use repkg_core::Dependency;
use repkg_java_parser::JavaDocument;
use repkg_maven::{InjectionReport, PomDocument};

use crate::error::EngineError;

/// A source document before and after rewriting.
///
/// An unchanged document shares its allocations with the original, so
/// holding both sides of the pair costs nothing extra.
#[derive(Debug, Clone)]
pub struct DocumentPair {
    /// The document as parsed from disk.
    pub original: JavaDocument,
    /// The document after namespace rewriting.
    pub rewritten: JavaDocument,
}

impl DocumentPair {
    /// The document's path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        self.original.path()
    }

    /// Returns `true` when rewriting changed the document.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.rewritten.is_changed()
    }
}

/// A document excluded from the run, with the error that excluded it.
#[derive(Debug)]
pub struct DocumentFailure {
    /// Path of the excluded document.
    pub path: Utf8PathBuf,
    /// Why the document was excluded.
    pub error: EngineError,
}

/// What happened to the manifest during injection.
#[derive(Debug)]
pub enum ManifestOutcome {
    /// The manifest was processed; the report says what each rule did.
    Edited {
        /// The manifest after injection, possibly unchanged.
        manifest: PomDocument,
        /// Per-rule injection outcomes.
        report: InjectionReport,
    },
    /// The manifest could not be read or edited; it was left untouched.
    Failed {
        /// Path of the failing manifest.
        path: Utf8PathBuf,
        /// The structural or I/O error.
        error: EngineError,
    },
}

impl ManifestOutcome {
    /// The manifest's path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Edited { manifest, .. } => manifest.path(),
            Self::Failed { path, .. } => path,
        }
    }

    /// Returns `true` when injection changed the manifest text.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Edited { manifest, .. } if manifest.is_changed())
    }

    /// Returns `true` when the manifest operation failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// The complete result of one migration run.
#[derive(Debug)]
pub struct RunReport {
    /// Original/rewritten pairs, in corpus order.
    pub documents: Vec<DocumentPair>,
    /// Documents excluded from the run.
    pub failures: Vec<DocumentFailure>,
    /// The manifest outcome, when dependency rules were configured and a
    /// manifest was available.
    pub manifest: Option<ManifestOutcome>,
}

impl RunReport {
    /// Iterates the pairs whose documents were changed by the rewrite.
    pub fn changed_documents(&self) -> impl Iterator<Item = &DocumentPair> {
        self.documents.iter().filter(|pair| pair.is_changed())
    }

    /// Number of changed documents.
    #[must_use]
    pub fn changed_count(&self) -> usize {
        self.changed_documents().count()
    }

    /// Number of documents the rewrite left untouched.
    #[must_use]
    pub fn unchanged_count(&self) -> usize {
        self.documents.len() - self.changed_count()
    }

    /// The dependencies injected into the manifest, if any.
    #[must_use]
    pub fn injected_dependencies(&self) -> &[Dependency] {
        match &self.manifest {
            Some(ManifestOutcome::Edited { report, .. }) => &report.injected,
            _ => &[],
        }
    }

    /// Returns `true` when the run would modify any file on disk.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.changed_count() > 0
            || self
                .manifest
                .as_ref()
                .is_some_and(ManifestOutcome::is_changed)
    }

    /// Returns `true` when any document was excluded or the manifest step
    /// failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
            || self
                .manifest
                .as_ref()
                .is_some_and(ManifestOutcome::is_failed)
    }
}
