//! Cross-document usage scanning.
//!
//! After every document has been rewritten, the engine builds a
//! [`UsageIndex`]: the set of fully-qualified type names the corpus
//! references, resolved through the same [`TypeResolver`] the rewriter
//! used. Usage-gated dependency rules are then answered by matching their
//! globs against this index.
//!
//! The index is a pure function of the corpus snapshot it was built from.
//! Nothing is cached across runs; a second invocation builds a fresh index.

use rayon::prelude::*;
use repkg_core::{FxHashSet, UsageGlob, fx_hash_set};
use repkg_java_parser::{ImportResolver, JavaDocument, TypeResolver};

/// The fully-qualified names referenced anywhere in a corpus.
///
/// Built once per run over the complete rewritten corpus, never
/// incrementally: a gated injection must observe every document's final
/// state, so construction sits after the rewrite barrier.
///
/// Import declarations are references too. A document that imports
/// `jakarta.xml.bind.JAXB` without otherwise touching it still counts as
/// using the type.
#[derive(Debug, Clone)]
pub struct UsageIndex {
    /// Sorted, deduplicated fully-qualified names.
    fqns: Vec<String>,
}

impl UsageIndex {
    /// Builds the index using the default import-table resolver.
    #[must_use]
    pub fn build(documents: &[JavaDocument]) -> Self {
        Self::build_with(documents, &ImportResolver)
    }

    /// Builds the index with a caller-supplied resolver.
    ///
    /// References the resolver cannot name are skipped, mirroring the
    /// matcher's conservative treatment of unresolved sites.
    pub fn build_with<R>(documents: &[JavaDocument], resolver: &R) -> Self
    where
        R: TypeResolver + Sync,
    {
        let per_document: Vec<FxHashSet<String>> = documents
            .par_iter()
            .map(|document| {
                let mut names = fx_hash_set();
                for site in document.references() {
                    if let Some(name) = resolver.resolve(document, site) {
                        names.insert(name.fully_qualified());
                    }
                }
                names
            })
            .collect();

        let mut merged = fx_hash_set();
        for names in per_document {
            merged.extend(names);
        }
        let mut fqns: Vec<String> = merged.into_iter().collect();
        fqns.sort_unstable();
        tracing::debug!(types = fqns.len(), "usage index built");
        Self { fqns }
    }

    /// Returns `true` when any referenced name matches the glob.
    #[must_use]
    pub fn is_used(&self, glob: &UsageGlob) -> bool {
        self.fqns.iter().any(|fqn| glob.matches(fqn))
    }

    /// Iterates the referenced names matching the glob, in sorted order.
    pub fn matching<'a>(&'a self, glob: &'a UsageGlob) -> impl Iterator<Item = &'a str> {
        self.fqns
            .iter()
            .map(String::as_str)
            .filter(|fqn| glob.matches(fqn))
    }

    /// Every referenced fully-qualified name, sorted.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.fqns
    }

    /// Number of distinct referenced names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fqns.len()
    }

    /// Returns `true` when the corpus references no resolvable types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fqns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use repkg_java_parser::JavaParser;

    use super::*;

    fn document(name: &str, source: &str) -> JavaDocument {
        JavaParser::new()
            .expect("parser")
            .parse_document(name, source)
            .expect("valid source")
    }

    fn glob(pattern: &str) -> UsageGlob {
        UsageGlob::new(pattern).expect("valid glob")
    }

    #[test]
    fn test_qualified_reference_is_indexed() {
        let doc = document("A.java", "class A { jakarta.xml.bind.JAXBContext ctx; }");
        let index = UsageIndex::build(&[doc]);
        assert!(index.is_used(&glob("jakarta.xml.bind.*")));
        assert!(!index.is_used(&glob("javax.xml.bind.*")));
    }

    #[test]
    fn test_import_alone_counts_as_usage() {
        let doc = document("A.java", "import jakarta.xml.bind.JAXB;\nclass A {}\n");
        let index = UsageIndex::build(&[doc]);
        assert!(index.is_used(&glob("jakarta.xml.bind.JAXB")));
    }

    #[test]
    fn test_bare_name_resolves_through_import() {
        let doc = document(
            "A.java",
            "import jakarta.xml.bind.Marshaller;\nclass A { Marshaller m; }\n",
        );
        let index = UsageIndex::build(&[doc]);
        let pattern = glob("jakarta.xml.bind.*");
        let matched: Vec<_> = index.matching(&pattern).collect();
        assert_eq!(matched, vec!["jakarta.xml.bind.Marshaller"]);
    }

    #[test]
    fn test_unresolved_bare_name_is_skipped() {
        let doc = document("A.java", "class A { Unknown u; }");
        let index = UsageIndex::build(&[doc]);
        assert!(index.is_empty());
    }

    #[test]
    fn test_usage_is_cross_document() {
        let quiet = document("Quiet.java", "class Quiet {}");
        let user = document(
            "User.java",
            "class User { void go() { jakarta.xml.bind.JAXB.marshal(null, null); } }",
        );
        let index = UsageIndex::build(&[quiet, user]);
        assert!(index.is_used(&glob("jakarta.xml.bind.JAXB")));
    }

    #[test]
    fn test_names_are_sorted_and_deduplicated() {
        let doc = document(
            "A.java",
            "import jakarta.xml.bind.JAXB;\nimport jakarta.activation.DataHandler;\nclass A { jakarta.xml.bind.JAXB j; }\n",
        );
        let index = UsageIndex::build(&[doc]);
        assert_eq!(
            index.names(),
            &[
                "jakarta.activation.DataHandler".to_owned(),
                "jakarta.xml.bind.JAXB".to_owned(),
            ]
        );
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_empty_corpus_has_no_usage() {
        let index = UsageIndex::build(&[]);
        assert!(index.is_empty());
        assert!(!index.is_used(&glob("*")));
    }
}
