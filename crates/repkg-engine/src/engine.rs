//! The migration pipeline.
//!
//! [`MigrationEngine`] drives one run end to end: parse the corpus, rewrite
//! every document in parallel, scan the rewritten corpus for usage, then
//! apply dependency rules to the manifest. The stages are strictly ordered;
//! in particular the usage scan never starts until the parallel rewrite has
//! been collected in full, so gated injections always observe the corpus's
//! final state.
//!
//! The engine never writes to disk. It returns a [`RunReport`] and leaves
//! persisting the changed documents and manifest to the caller.

use camino::Utf8PathBuf;
use rayon::prelude::*;
use repkg_core::{NamespaceMapping, RecipeConfig};
use repkg_java_parser::JavaDocument;
use repkg_maven::{DependencyInjector, PomDocument};
use repkg_rewrite::NamespaceRewriter;

use crate::corpus::Corpus;
use crate::error::EngineError;
use crate::report::{DocumentPair, ManifestOutcome, RunReport};
use crate::usage::UsageIndex;

/// Executes a migration recipe over a corpus.
///
/// # Examples
///
/// ```no_run
/// use repkg_core::RecipeConfig;
/// use repkg_engine::MigrationEngine;
///
/// let config = RecipeConfig::new("javax.xml.bind", "jakarta.xml.bind")
///     .with_source_root("src/main/java");
/// let engine = MigrationEngine::new(config)?;
/// let report = engine.run()?;
/// for pair in report.changed_documents() {
///     println!("would rewrite {}", pair.path());
/// }
/// # Ok::<(), repkg_engine::EngineError>(())
/// ```
#[derive(Debug)]
pub struct MigrationEngine {
    config: RecipeConfig,
    mapping: NamespaceMapping,
}

impl MigrationEngine {
    /// Creates an engine from a validated recipe.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] when the recipe's prefixes,
    /// dependency coordinates, or globs are invalid.
    pub fn new(config: RecipeConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let mapping = config.mapping()?;
        Ok(Self { config, mapping })
    }

    /// The recipe this engine applies.
    #[must_use]
    pub fn config(&self) -> &RecipeConfig {
        &self.config
    }

    /// The namespace mapping this engine applies.
    #[must_use]
    pub fn mapping(&self) -> &NamespaceMapping {
        &self.mapping
    }

    /// Loads the corpus from the recipe's source roots and runs the
    /// pipeline.
    ///
    /// # Errors
    ///
    /// Returns discovery-level errors: invalid roots, walk failures, and
    /// non-UTF-8 paths. Per-document and manifest failures do not error
    /// here; they are collected in the report.
    pub fn run(&self) -> Result<RunReport, EngineError> {
        let corpus = Corpus::load(self.config.source_roots.iter().cloned())?;
        Ok(self.run_corpus(corpus))
    }

    /// Runs the pipeline over an already-loaded corpus.
    #[must_use]
    pub fn run_corpus(&self, corpus: Corpus) -> RunReport {
        let (originals, failures, discovered) = corpus.into_parts();

        let rewriter = NamespaceRewriter::new(self.mapping.clone());
        let rewritten: Vec<JavaDocument> = originals
            .par_iter()
            .map(|document| rewriter.rewrite(document))
            .collect();

        // The collect above is the synchronization barrier: usage scanning
        // observes only the fully rewritten corpus.
        let usage = UsageIndex::build(&rewritten);

        let documents: Vec<DocumentPair> = originals
            .into_iter()
            .zip(rewritten)
            .map(|(original, rewritten)| DocumentPair {
                original,
                rewritten,
            })
            .collect();

        let manifest = self.edit_manifest(&discovered, &usage);

        let changed = documents.iter().filter(|pair| pair.is_changed()).count();
        tracing::info!(
            mapping = %self.mapping,
            documents = documents.len(),
            changed,
            excluded = failures.len(),
            "migration run complete"
        );

        RunReport {
            documents,
            failures,
            manifest,
        }
    }

    /// Picks the manifest to edit: the recipe's explicit path wins, then an
    /// unambiguous discovered one.
    fn manifest_path(&self, discovered: &[Utf8PathBuf]) -> Option<Utf8PathBuf> {
        if let Some(path) = &self.config.manifest {
            return Some(path.clone());
        }
        match discovered {
            [] => {
                tracing::warn!("dependency rules configured but no manifest was found");
                None
            }
            [single] => Some(single.clone()),
            many => {
                tracing::warn!(
                    candidates = many.len(),
                    "multiple manifests found; set an explicit manifest path"
                );
                None
            }
        }
    }

    fn edit_manifest(
        &self,
        discovered: &[Utf8PathBuf],
        usage: &UsageIndex,
    ) -> Option<ManifestOutcome> {
        if self.config.dependencies.is_empty() {
            return None;
        }
        let path = self.manifest_path(discovered)?;
        let mut pom = match PomDocument::load(path.clone()) {
            Ok(pom) => pom,
            Err(error) => {
                return Some(ManifestOutcome::Failed {
                    path,
                    error: error.into(),
                });
            }
        };

        let injector = DependencyInjector::new(self.config.dependencies.clone());
        match injector.inject(&mut pom, |glob| usage.is_used(glob)) {
            Ok(report) => {
                tracing::info!(
                    path = %pom.path(),
                    injected = report.injected.len(),
                    already_declared = report.already_declared.len(),
                    unused = report.unused.len(),
                    "dependency injection complete"
                );
                Some(ManifestOutcome::Edited {
                    manifest: pom,
                    report,
                })
            }
            Err(error) => Some(ManifestOutcome::Failed {
                path,
                error: error.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use repkg_core::{Dependency, UsageGlob};

    use super::*;

    const POM: &str = "<project>\n    <modelVersion>4.0.0</modelVersion>\n    <dependencies>\n    </dependencies>\n</project>\n";

    fn write_file(root: &std::path::Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(path, contents).expect("write file");
    }

    fn utf8_root(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_owned()).expect("utf8 temp dir")
    }

    fn glob(pattern: &str) -> UsageGlob {
        UsageGlob::new(pattern).expect("valid glob")
    }

    fn jaxb_recipe(root: &Utf8PathBuf) -> RecipeConfig {
        RecipeConfig::new("javax.xml.bind", "jakarta.xml.bind")
            .with_source_root(root.clone())
            .with_dependency_if_using(
                Dependency::new("jakarta.xml.bind", "jakarta.xml.bind-api", "3.0.0"),
                glob("jakarta.xml.bind.*"),
            )
    }

    #[test]
    fn test_end_to_end_rewrite_and_injection() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(
            dir.path(),
            "src/main/java/App.java",
            "import javax.xml.bind.JAXBException;\n\nclass App {\n    void go() throws JAXBException {}\n}\n",
        );
        write_file(dir.path(), "pom.xml", POM);
        let root = utf8_root(&dir);

        let engine = MigrationEngine::new(jaxb_recipe(&root)).expect("engine");
        let report = engine.run().expect("run");

        assert_eq!(report.changed_count(), 1);
        assert!(!report.has_failures());
        let pair = report.changed_documents().next().expect("changed pair");
        assert_eq!(
            pair.rewritten.print(),
            "import jakarta.xml.bind.JAXBException;\n\nclass App {\n    void go() throws JAXBException {}\n}\n"
        );

        let outcome = report.manifest.as_ref().expect("manifest outcome");
        assert!(outcome.is_changed());
        assert_eq!(report.injected_dependencies().len(), 1);
        match outcome {
            ManifestOutcome::Edited { manifest, .. } => {
                assert!(manifest.text().contains("<artifactId>jakarta.xml.bind-api</artifactId>"));
            }
            ManifestOutcome::Failed { .. } => panic!("injection should succeed"),
        }
    }

    #[test]
    fn test_unmatched_glob_leaves_manifest_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "src/App.java", "class App {}\n");
        write_file(dir.path(), "pom.xml", POM);
        let root = utf8_root(&dir);

        let engine = MigrationEngine::new(jaxb_recipe(&root)).expect("engine");
        let report = engine.run().expect("run");

        assert_eq!(report.changed_count(), 0);
        assert!(!report.has_changes());
        let outcome = report.manifest.as_ref().expect("manifest outcome");
        assert!(!outcome.is_changed());
        match outcome {
            ManifestOutcome::Edited { manifest, report } => {
                assert_eq!(manifest.text(), POM);
                assert_eq!(report.unused.len(), 1);
            }
            ManifestOutcome::Failed { .. } => panic!("manifest should load"),
        }
    }

    #[test]
    fn test_malformed_document_is_excluded_and_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(
            dir.path(),
            "src/Good.java",
            "class Good { javax.xml.bind.JAXB j; }\n",
        );
        write_file(dir.path(), "src/Broken.java", "class Broken {{{\n");
        let root = utf8_root(&dir);

        let config = RecipeConfig::new("javax.xml.bind", "jakarta.xml.bind")
            .with_source_root(root.clone());
        let engine = MigrationEngine::new(config).expect("engine");
        let report = engine.run().expect("run");

        assert_eq!(report.documents.len(), 1);
        assert_eq!(report.changed_count(), 1);
        assert!(report.has_failures());
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.as_str().ends_with("Broken.java"));
    }

    #[test]
    fn test_missing_dependencies_block_is_a_manifest_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(
            dir.path(),
            "src/App.java",
            "import javax.xml.bind.JAXB;\nclass App {}\n",
        );
        write_file(dir.path(), "pom.xml", "<project>\n</project>\n");
        let root = utf8_root(&dir);

        let engine = MigrationEngine::new(jaxb_recipe(&root)).expect("engine");
        let report = engine.run().expect("run");

        // The rewrite still happened; only the injection failed.
        assert_eq!(report.changed_count(), 1);
        let outcome = report.manifest.as_ref().expect("manifest outcome");
        assert!(outcome.is_failed());
        assert!(report.has_failures());
        assert!(report.injected_dependencies().is_empty());
    }

    #[test]
    fn test_no_rules_means_no_manifest_outcome() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "src/App.java", "class App {}\n");
        write_file(dir.path(), "pom.xml", POM);
        let root = utf8_root(&dir);

        let config = RecipeConfig::new("javax.xml.bind", "jakarta.xml.bind")
            .with_source_root(root.clone());
        let engine = MigrationEngine::new(config).expect("engine");
        let report = engine.run().expect("run");

        assert!(report.manifest.is_none());
    }

    #[test]
    fn test_explicit_manifest_beats_discovery() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(
            dir.path(),
            "src/App.java",
            "import javax.xml.bind.JAXB;\nclass App {}\n",
        );
        write_file(dir.path(), "pom.xml", POM);
        write_file(dir.path(), "other/pom.xml", POM);
        let root = utf8_root(&dir);

        // Two manifests discovered; the explicit one resolves the ambiguity.
        let config = jaxb_recipe(&root).with_manifest(root.join("pom.xml"));
        let engine = MigrationEngine::new(config).expect("engine");
        let report = engine.run().expect("run");

        let outcome = report.manifest.as_ref().expect("manifest outcome");
        assert_eq!(outcome.path(), root.join("pom.xml"));
        assert!(outcome.is_changed());
    }

    #[test]
    fn test_ambiguous_discovery_skips_injection() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(
            dir.path(),
            "src/App.java",
            "import javax.xml.bind.JAXB;\nclass App {}\n",
        );
        write_file(dir.path(), "a/pom.xml", POM);
        write_file(dir.path(), "b/pom.xml", POM);
        let root = utf8_root(&dir);

        let engine = MigrationEngine::new(jaxb_recipe(&root)).expect("engine");
        let report = engine.run().expect("run");

        assert!(report.manifest.is_none());
        assert_eq!(report.changed_count(), 1);
    }

    #[test]
    fn test_second_run_over_written_output_is_a_no_op() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(
            dir.path(),
            "src/App.java",
            "import javax.xml.bind.JAXBException;\nclass App {}\n",
        );
        write_file(dir.path(), "pom.xml", POM);
        let root = utf8_root(&dir);

        let engine = MigrationEngine::new(jaxb_recipe(&root)).expect("engine");
        let first = engine.run().expect("first run");
        assert!(first.has_changes());

        // Persist the first run's output the way the CLI would.
        for pair in first.changed_documents() {
            std::fs::write(pair.path(), pair.rewritten.print()).expect("write document");
        }
        if let Some(ManifestOutcome::Edited { manifest, .. }) = &first.manifest {
            std::fs::write(manifest.path(), manifest.text()).expect("write manifest");
        }

        let second = engine.run().expect("second run");
        assert_eq!(second.changed_count(), 0);
        let outcome = second.manifest.as_ref().expect("manifest outcome");
        assert!(!outcome.is_changed());
        match outcome {
            ManifestOutcome::Edited { report, .. } => {
                assert_eq!(report.already_declared.len(), 1);
            }
            ManifestOutcome::Failed { .. } => panic!("manifest should load"),
        }
        assert!(!second.has_changes());
    }

    #[test]
    fn test_invalid_recipe_is_rejected() {
        let config = RecipeConfig::new("javax..bind", "jakarta.xml.bind");
        assert!(matches!(
            MigrationEngine::new(config),
            Err(EngineError::Config(_))
        ));
    }
}
