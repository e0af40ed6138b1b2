//! Recipe configuration for a migration run.
//!
//! A recipe names the namespace rename to perform plus the dependency rules
//! to evaluate against the rewritten corpus. Recipes are declarative JSON
//! documents; the CLI may override paths from the command line.
//!
//! ```json
//! {
//!   "old-namespace-prefix": "javax.xml.bind",
//!   "new-namespace-prefix": "jakarta.xml.bind",
//!   "dependencies": [
//!     {
//!       "groupId": "jakarta.xml.bind",
//!       "artifactId": "jakarta.xml.bind-api",
//!       "version": "3.0.0",
//!       "usage-glob": "jakarta.xml.bind.*"
//!     }
//!   ]
//! }
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Dependency, DependencyRule, NamespaceMapping, UsageGlob};

/// A complete migration recipe.
///
/// # Examples
///
/// ```
/// use repkg_core::RecipeConfig;
///
/// let recipe = RecipeConfig::new("javax.xml.bind", "jakarta.xml.bind");
/// assert!(recipe.validate().is_ok());
/// assert_eq!(recipe.mapping().unwrap().new_prefix(), "jakarta.xml.bind");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RecipeConfig {
    /// The namespace prefix to rename away from.
    pub old_namespace_prefix: String,

    /// The namespace prefix to rename to.
    pub new_namespace_prefix: String,

    /// Dependency rules evaluated against the post-rewrite corpus, applied
    /// in declaration order.
    #[serde(default)]
    pub dependencies: Vec<DependencyRule>,

    /// Directories to walk for source documents.
    #[serde(default)]
    pub source_roots: Vec<Utf8PathBuf>,

    /// Path to the build manifest to edit, if any.
    #[serde(default)]
    pub manifest: Option<Utf8PathBuf>,
}

impl RecipeConfig {
    /// Creates a recipe with the given namespace rename and no dependencies.
    #[must_use]
    pub fn new(old_prefix: impl Into<String>, new_prefix: impl Into<String>) -> Self {
        Self {
            old_namespace_prefix: old_prefix.into(),
            new_namespace_prefix: new_prefix.into(),
            dependencies: Vec::new(),
            source_roots: Vec::new(),
            manifest: None,
        }
    }

    /// Adds an unconditional dependency rule.
    #[must_use]
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(DependencyRule::unconditional(dependency));
        self
    }

    /// Adds a dependency rule gated on a usage glob.
    #[must_use]
    pub fn with_dependency_if_using(mut self, dependency: Dependency, glob: UsageGlob) -> Self {
        self.dependencies
            .push(DependencyRule::only_if_using(dependency, glob));
        self
    }

    /// Adds a source root directory.
    #[must_use]
    pub fn with_source_root(mut self, root: impl Into<Utf8PathBuf>) -> Self {
        self.source_roots.push(root.into());
        self
    }

    /// Sets the manifest path.
    #[must_use]
    pub fn with_manifest(mut self, manifest: impl Into<Utf8PathBuf>) -> Self {
        self.manifest = Some(manifest.into());
        self
    }

    /// Parses a recipe from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error for well-formed JSON describing an invalid recipe.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a recipe file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, plus any
    /// parse/validation error.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validates prefixes, dependency coordinates, and usage globs.
    ///
    /// # Errors
    ///
    /// Returns the first invalid option found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        NamespaceMapping::new(&self.old_namespace_prefix, &self.new_namespace_prefix)?;
        for rule in &self.dependencies {
            rule.validate()?;
        }
        Ok(())
    }

    /// Builds the validated namespace mapping this recipe applies.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPrefix`] when either prefix is
    /// malformed.
    pub fn mapping(&self) -> Result<NamespaceMapping, ConfigError> {
        NamespaceMapping::new(&self.old_namespace_prefix, &self.new_namespace_prefix)
    }
}
