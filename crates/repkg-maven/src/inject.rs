//! Rule-driven dependency injection.
//!
//! A [`DependencyInjector`] walks a list of [`DependencyRule`]s in
//! configuration order and applies each one to a manifest. Whether a gated
//! rule fires is decided outside this crate: the caller supplies a closure
//! answering "does the corpus use a type matching this glob", which keeps
//! the manifest editing independent of how usage was scanned.

use repkg_core::{Dependency, DependencyRule, UsageGlob};

use crate::error::ManifestError;
use crate::pom::PomDocument;

/// Applies dependency rules to a manifest, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct DependencyInjector {
    rules: Vec<DependencyRule>,
}

/// Outcome of one [`DependencyInjector::inject`] run over a manifest.
#[derive(Debug, Clone, Default)]
pub struct InjectionReport {
    /// Dependencies added to the manifest.
    pub injected: Vec<Dependency>,
    /// Dependencies already declared, at any version.
    pub already_declared: Vec<Dependency>,
    /// Gated dependencies whose usage glob matched nothing.
    pub unused: Vec<Dependency>,
}

impl InjectionReport {
    /// Returns `true` when no rule changed the manifest.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.injected.is_empty()
    }
}

impl DependencyInjector {
    /// Creates an injector over the given rules.
    #[must_use]
    pub fn new(rules: Vec<DependencyRule>) -> Self {
        Self { rules }
    }

    /// The configured rules, in application order.
    #[must_use]
    pub fn rules(&self) -> &[DependencyRule] {
        &self.rules
    }

    /// Applies every applicable rule to `pom`.
    ///
    /// `is_used` answers whether some document in the post-rewrite corpus
    /// references a type matching the rule's glob; it is consulted only for
    /// gated rules. A rule whose coordinates are already declared leaves
    /// the manifest untouched, whether the declaration came from the
    /// original text or from an earlier rule in the same run.
    ///
    /// # Errors
    ///
    /// Returns the first [`ManifestError`] hit; rules after the failing one
    /// are not attempted. A failed insertion never leaves a partial edit.
    pub fn inject(
        &self,
        pom: &mut PomDocument,
        mut is_used: impl FnMut(&UsageGlob) -> bool,
    ) -> Result<InjectionReport, ManifestError> {
        let mut report = InjectionReport::default();
        for rule in &self.rules {
            if let Some(glob) = &rule.usage_glob {
                if !is_used(glob) {
                    tracing::debug!(
                        dependency = %rule.dependency,
                        glob = %glob,
                        "usage glob matched nothing, skipping injection"
                    );
                    report.unused.push(rule.dependency.clone());
                    continue;
                }
            }
            if pom.insert_dependency(&rule.dependency)? {
                report.injected.push(rule.dependency.clone());
            } else {
                report.already_declared.push(rule.dependency.clone());
            }
        }
        Ok(report)
    }
}
