//! Build-dependency declarations destined for a project manifest.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::glob::UsageGlob;

/// A Maven-style dependency coordinate excluded from a dependency's
/// transitive graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exclusion {
    /// Group identifier of the excluded artifact.
    #[serde(rename = "groupId")]
    pub group_id: String,
    /// Artifact identifier of the excluded artifact.
    #[serde(rename = "artifactId")]
    pub artifact_id: String,
}

/// A dependency record to inject into a build manifest.
///
/// Identity is the (`group_id`, `artifact_id`) pair; version and scope never
/// participate in duplicate detection (first-writer-wins, no version bumps).
///
/// # Examples
///
/// ```
/// use repkg_core::Dependency;
///
/// let dep = Dependency::new("jakarta.xml.bind", "jakarta.xml.bind-api", "3.0.0");
/// assert_eq!(dep.id(), ("jakarta.xml.bind", "jakarta.xml.bind-api"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// Group identifier (e.g. `jakarta.xml.bind`).
    #[serde(rename = "groupId")]
    pub group_id: String,
    /// Artifact identifier (e.g. `jakarta.xml.bind-api`).
    #[serde(rename = "artifactId")]
    pub artifact_id: String,
    /// Version string; written verbatim into the manifest.
    pub version: String,
    /// Optional dependency scope (`test`, `provided`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Transitive exclusions, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<Exclusion>,
}

impl Dependency {
    /// Creates a dependency with no scope and no exclusions.
    #[must_use]
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            scope: None,
            exclusions: Vec::new(),
        }
    }

    /// Sets the dependency scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Adds a transitive exclusion.
    #[must_use]
    pub fn with_exclusion(
        mut self,
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
    ) -> Self {
        self.exclusions.push(Exclusion {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        });
        self
    }

    /// The identity pair used for duplicate detection.
    #[must_use]
    pub fn id(&self) -> (&str, &str) {
        (&self.group_id, &self.artifact_id)
    }

    /// Returns `true` if `other` names the same (groupId, artifactId).
    #[must_use]
    pub fn same_artifact(&self, group_id: &str, artifact_id: &str) -> bool {
        self.group_id == group_id && self.artifact_id == artifact_id
    }

    /// Validates that the coordinate fields are non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDependency`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("groupId", &self.group_id),
            ("artifactId", &self.artifact_id),
            ("version", &self.version),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid_dependency(field, "must not be empty"));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// A dependency plus the usage trigger gating its injection.
///
/// When `usage_glob` is `None` the dependency is injected unconditionally;
/// otherwise injection happens only when some document in the post-rewrite
/// corpus references a type matching the glob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRule {
    /// The dependency to inject.
    #[serde(flatten)]
    pub dependency: Dependency,
    /// Glob over fully-qualified type names that triggers injection.
    #[serde(rename = "usage-glob", default, skip_serializing_if = "Option::is_none")]
    pub usage_glob: Option<UsageGlob>,
}

impl DependencyRule {
    /// Creates an unconditional rule.
    #[must_use]
    pub fn unconditional(dependency: Dependency) -> Self {
        Self {
            dependency,
            usage_glob: None,
        }
    }

    /// Creates a rule gated on a usage glob.
    #[must_use]
    pub fn only_if_using(dependency: Dependency, glob: UsageGlob) -> Self {
        Self {
            dependency,
            usage_glob: Some(glob),
        }
    }

    /// Validates the dependency coordinates and the glob, if present.
    ///
    /// # Errors
    ///
    /// Propagates the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dependency.validate()?;
        if let Some(glob) = &self.usage_glob {
            glob.validate()?;
        }
        Ok(())
    }
}
