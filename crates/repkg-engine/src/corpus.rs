//! Corpus discovery and parallel parsing.
//!
//! This module provides [`CorpusWalker`], which discovers `.java` sources
//! and `pom.xml` manifests under the configured roots, and [`Corpus`], the
//! parsed document collection a migration runs over.
//!
//! # Design
//!
//! Discovery and parsing follow a collect-then-parallelize pattern:
//!
//! 1. The walker collects paths first (single-threaded, I/O bound), using
//!    the `ignore` crate so `.gitignore` patterns and hidden directories
//!    are respected.
//! 2. Sources are parsed in parallel with `rayon::par_iter()`, one
//!    tree-sitter parser per worker thread via `map_init()`.
//!
//! Paths are sorted after collection, so a corpus loads in a deterministic
//! order regardless of directory iteration or worker scheduling. Documents
//! that fail to read or parse are excluded and reported; they never abort
//! the batch.

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use rayon::prelude::*;
use repkg_java_parser::{JavaDocument, JavaParser, ParseError};

use crate::error::EngineError;
use crate::report::DocumentFailure;

/// Default directories to skip during discovery.
///
/// Build output and IDE metadata never hold sources worth migrating, and
/// generated manifests under `target/` must not be edited.
const SKIP_DIRECTORIES: &[&str] = &["target", "build", "out", ".git", ".idea", ".gradle"];

/// Extension of the source documents the engine rewrites.
const JAVA_EXTENSION: &str = "java";

/// File name of a Maven build manifest.
const MANIFEST_FILE_NAME: &str = "pom.xml";

/// Paths discovered by one walk: sources to rewrite and manifests that are
/// candidates for dependency injection.
#[derive(Debug, Clone, Default)]
pub struct CorpusPaths {
    /// Discovered `.java` files, sorted.
    pub sources: Vec<Utf8PathBuf>,
    /// Discovered `pom.xml` files, sorted.
    pub manifests: Vec<Utf8PathBuf>,
}

/// A file walker that discovers migration inputs under one or more roots.
#[derive(Debug)]
pub struct CorpusWalker {
    roots: Vec<Utf8PathBuf>,
    skip_dirs: Vec<String>,
    follow_links: bool,
}

impl CorpusWalker {
    /// Creates a walker over the given root directories.
    ///
    /// An empty root list is valid and yields an empty corpus.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRoot`] when a root does not exist or
    /// is not a directory.
    pub fn new<I, P>(roots: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        let roots: Vec<Utf8PathBuf> = roots.into_iter().map(Into::into).collect();
        for root in &roots {
            if !root.is_dir() {
                return Err(EngineError::InvalidRoot { path: root.clone() });
            }
        }
        Ok(Self {
            roots,
            skip_dirs: Vec::new(),
            follow_links: false,
        })
    }

    /// Adds directory names to skip, beyond the default build-output list.
    #[must_use]
    pub fn with_skip_dirs(mut self, dirs: &[&str]) -> Self {
        self.skip_dirs.extend(dirs.iter().map(ToString::to_string));
        self
    }

    /// Configures whether symbolic links are followed. Off by default.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// The roots being walked.
    #[must_use]
    pub fn roots(&self) -> &[Utf8PathBuf] {
        &self.roots
    }

    /// Walks the roots and collects source and manifest paths, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Walk`] if traversal fails and
    /// [`EngineError::NonUtf8Path`] for paths that are not valid UTF-8.
    pub fn collect(&self) -> Result<CorpusPaths, EngineError> {
        let mut paths = CorpusPaths::default();
        let Some(walker) = self.build_walker() else {
            return Ok(paths);
        };

        for result in walker {
            let entry = result?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            let utf8_path = Utf8Path::from_path(path)
                .ok_or_else(|| EngineError::NonUtf8Path(path.to_owned()))?;
            if self.should_skip_path(utf8_path) {
                continue;
            }
            if is_java_source(utf8_path) {
                paths.sources.push(utf8_path.to_owned());
            } else if is_manifest(utf8_path) {
                paths.manifests.push(utf8_path.to_owned());
            }
        }

        paths.sources.sort_unstable();
        paths.manifests.sort_unstable();
        Ok(paths)
    }

    /// Builds the ignore walker, or `None` when there are no roots.
    fn build_walker(&self) -> Option<ignore::Walk> {
        let (first, rest) = self.roots.split_first()?;
        let mut builder = WalkBuilder::new(first);
        for root in rest {
            builder.add(root);
        }
        builder
            .standard_filters(true)
            .follow_links(self.follow_links)
            // Walk single-threaded; parsing is parallelized afterwards.
            .threads(1)
            .require_git(false);
        Some(builder.build())
    }

    fn should_skip_path(&self, path: &Utf8Path) -> bool {
        path.components().any(|component| {
            let name = component.as_str();
            SKIP_DIRECTORIES.contains(&name) || self.skip_dirs.iter().any(|d| d == name)
        })
    }
}

fn is_java_source(path: &Utf8Path) -> bool {
    path.extension() == Some(JAVA_EXTENSION)
}

fn is_manifest(path: &Utf8Path) -> bool {
    path.file_name() == Some(MANIFEST_FILE_NAME)
}

/// The parsed inputs of one migration run.
///
/// Holds every successfully parsed document, the failures that excluded
/// documents from the run, and the manifest paths discovered alongside the
/// sources.
#[derive(Debug, Default)]
pub struct Corpus {
    documents: Vec<JavaDocument>,
    failures: Vec<DocumentFailure>,
    manifests: Vec<Utf8PathBuf>,
}

impl Corpus {
    /// Discovers and parses a corpus under the given roots.
    ///
    /// Documents that fail to read or parse are excluded and recorded in
    /// [`Corpus::failures`]; the rest of the corpus loads normally.
    ///
    /// # Errors
    ///
    /// Returns discovery-level errors only: invalid roots, walk failures,
    /// and non-UTF-8 paths.
    pub fn load<I, P>(roots: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        Self::load_with(&CorpusWalker::new(roots)?)
    }

    /// Discovers and parses a corpus using a pre-configured walker.
    ///
    /// # Errors
    ///
    /// Returns discovery-level errors only; see [`Corpus::load`].
    pub fn load_with(walker: &CorpusWalker) -> Result<Self, EngineError> {
        let paths = walker.collect()?;
        let (documents, failures) = parse_sources(&paths.sources);
        tracing::info!(
            documents = documents.len(),
            excluded = failures.len(),
            manifests = paths.manifests.len(),
            "corpus loaded"
        );
        Ok(Self {
            documents,
            failures,
            manifests: paths.manifests,
        })
    }

    /// Builds a corpus from already-parsed documents.
    #[must_use]
    pub fn from_documents(documents: Vec<JavaDocument>) -> Self {
        Self {
            documents,
            failures: Vec::new(),
            manifests: Vec::new(),
        }
    }

    /// Adds a manifest path to the corpus.
    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.manifests.push(path.into());
        self
    }

    /// The successfully parsed documents, in path order.
    #[must_use]
    pub fn documents(&self) -> &[JavaDocument] {
        &self.documents
    }

    /// The documents excluded from the run.
    #[must_use]
    pub fn failures(&self) -> &[DocumentFailure] {
        &self.failures
    }

    /// Manifest paths discovered alongside the sources.
    #[must_use]
    pub fn manifest_paths(&self) -> &[Utf8PathBuf] {
        &self.manifests
    }

    /// Number of parsed documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` when no document was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<JavaDocument>, Vec<DocumentFailure>, Vec<Utf8PathBuf>) {
        (self.documents, self.failures, self.manifests)
    }
}

/// Parses sources in parallel, one parser per worker thread.
fn parse_sources(paths: &[Utf8PathBuf]) -> (Vec<JavaDocument>, Vec<DocumentFailure>) {
    let results: Vec<(Utf8PathBuf, Result<JavaDocument, EngineError>)> = paths
        .par_iter()
        .map_init(
            || JavaParser::new().ok(),
            |parser, path| (path.clone(), parse_source(parser.as_mut(), path)),
        )
        .collect();

    let mut documents = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (path, result) in results {
        match result {
            Ok(document) => documents.push(document),
            Err(error) => {
                tracing::warn!(path = %path, %error, "excluding document from the corpus");
                failures.push(DocumentFailure { path, error });
            }
        }
    }
    (documents, failures)
}

fn parse_source(
    parser: Option<&mut JavaParser>,
    path: &Utf8Path,
) -> Result<JavaDocument, EngineError> {
    let Some(parser) = parser else {
        return Err(EngineError::Parse(ParseError::LanguageInit));
    };
    let source = std::fs::read_to_string(path.as_std_path())
        .map_err(|source| EngineError::read(path, source))?;
    Ok(parser.parse_document(path, source)?)
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_collect_finds_sources_and_manifests() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "src/main/java/B.java", "class B {}");
        write_file(dir.path(), "src/main/java/A.java", "class A {}");
        write_file(dir.path(), "pom.xml", "<project/>");
        write_file(dir.path(), "README.md", "docs");

        let walker = CorpusWalker::new([utf8_root(&dir)]).expect("walker");
        let paths = walker.collect().expect("collect");

        let names: Vec<_> = paths
            .sources
            .iter()
            .filter_map(|p| p.file_name())
            .collect();
        assert_eq!(names, vec!["A.java", "B.java"]);
        assert_eq!(paths.manifests.len(), 1);
    }

    #[test]
    fn test_collect_skips_build_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "src/A.java", "class A {}");
        write_file(dir.path(), "target/Generated.java", "class Generated {}");
        write_file(dir.path(), "target/pom.xml", "<project/>");

        let walker = CorpusWalker::new([utf8_root(&dir)]).expect("walker");
        let paths = walker.collect().expect("collect");

        assert_eq!(paths.sources.len(), 1);
        assert!(paths.manifests.is_empty());
    }

    #[test]
    fn test_custom_skip_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "src/A.java", "class A {}");
        write_file(dir.path(), "generated/B.java", "class B {}");

        let walker = CorpusWalker::new([utf8_root(&dir)])
            .expect("walker")
            .with_skip_dirs(&["generated"]);
        let paths = walker.collect().expect("collect");

        assert_eq!(paths.sources.len(), 1);
    }

    #[test]
    fn test_invalid_root_rejected() {
        let err = CorpusWalker::new([Utf8PathBuf::from("does/not/exist")]).expect_err("bad root");
        assert!(matches!(err, EngineError::InvalidRoot { .. }));
    }

    #[test]
    fn test_empty_roots_yield_empty_corpus() {
        let corpus = Corpus::load(Vec::<Utf8PathBuf>::new()).expect("load");
        assert!(corpus.is_empty());
        assert!(corpus.failures().is_empty());
        assert!(corpus.manifest_paths().is_empty());
    }

    #[test]
    fn test_load_excludes_malformed_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(
            dir.path(),
            "src/Good.java",
            "import javax.xml.bind.JAXB;\nclass Good {}\n",
        );
        write_file(dir.path(), "src/Broken.java", "class Broken {{{\n");

        let corpus = Corpus::load([utf8_root(&dir)]).expect("load");

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.failures().len(), 1);
        let failure = &corpus.failures()[0];
        assert!(failure.path.as_str().ends_with("Broken.java"));
        assert!(failure.error.is_document_scoped());
    }

    #[test]
    fn test_documents_load_in_path_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), "src/b/Later.java", "class Later {}");
        write_file(dir.path(), "src/a/First.java", "class First {}");

        let corpus = Corpus::load([utf8_root(&dir)]).expect("load");
        let names: Vec<_> = corpus
            .documents()
            .iter()
            .filter_map(|d| d.path().file_name())
            .collect();
        assert_eq!(names, vec!["First.java", "Later.java"]);
    }

    #[test]
    fn test_java_source_and_manifest_detection() {
        assert!(is_java_source(Utf8Path::new("src/A.java")));
        assert!(!is_java_source(Utf8Path::new("src/A.kt")));
        assert!(!is_java_source(Utf8Path::new("java")));
        assert!(is_manifest(Utf8Path::new("module/pom.xml")));
        assert!(!is_manifest(Utf8Path::new("module/settings.xml")));
    }
}
