//! # Workspace Manifest
//!
//! This module defines the data structures that represent the
//! `build-recipe.yaml` manifest, as well as the logic for parsing it.
//!
//! ## Key Components
//!
//! - **`Manifest`**: The whole file. It declares the projects of the
//!   workspace, the recipes applied to them, and the settings of the two
//!   history reports.
//!
//! - **`GitLogConfig`**: Settings for per-module change logs: tag pattern,
//!   tracked build-script patterns, `git log` format, module naming, and
//!   named classifiers.
//!
//! - **`AffectedModulesConfig`**: Settings for affected-module detection,
//!   including an optional inclusion filter.
//!
//! ## Parsing
//!
//! `parse` deserializes the YAML and then validates what serde cannot:
//! glob syntax of tracked-file patterns and classifier names usable in file
//! names. Matchers are validated while they are deserialized, so an invalid
//! regular expression fails the whole manifest. An empty file is a valid,
//! empty workspace.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::defaults;
use crate::error::{Error, Result};
use crate::matcher::Matcher;
use crate::project::{ModuleNameStyle, ProjectDecl, ProjectGraph, ProjectNode};
use crate::recipe::RecipeSpec;

/// The complete `build-recipe.yaml` manifest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Manifest {
    /// Every project of the workspace. Parents implied by a path may be
    /// omitted.
    pub projects: Vec<ProjectDecl>,
    /// Recipes applied in order by the `report` command.
    pub recipes: Vec<RecipeSpec>,
    pub git_log: GitLogConfig,
    pub affected_modules: AffectedModulesConfig,
}

/// Settings of the per-module change log.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct GitLogConfig {
    /// Glob selecting the tag used when no start revision is given. `null`
    /// accepts any tag.
    pub tag_pattern: Option<String>,
    /// Path patterns added to every module's scope, typically build scripts.
    pub track_file_patterns: Vec<String>,
    /// `git log --pretty` format.
    pub log_pattern: String,
    pub module_name: ModuleNameStyle,
    /// One change log per classifier. Empty means a single log for every
    /// subproject.
    pub classifiers: BTreeMap<String, Matcher>,
}

impl Default for GitLogConfig {
    fn default() -> Self {
        Self {
            tag_pattern: defaults::default_tag_pattern(),
            track_file_patterns: defaults::default_track_file_patterns(),
            log_pattern: defaults::default_log_pattern(),
            module_name: ModuleNameStyle::default(),
            classifiers: BTreeMap::new(),
        }
    }
}

/// Settings of affected-module detection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct AffectedModulesConfig {
    pub tag_pattern: Option<String>,
    /// Accepted and validated for symmetry with `git-log`; detection only
    /// looks at project directories.
    pub track_file_patterns: Vec<String>,
    pub module_name: ModuleNameStyle,
    /// Only modules matching this are reported. Absent means all of them.
    pub filter: Option<Matcher>,
}

impl Default for AffectedModulesConfig {
    fn default() -> Self {
        Self {
            tag_pattern: defaults::default_tag_pattern(),
            track_file_patterns: Vec::new(),
            module_name: ModuleNameStyle::default(),
            filter: None,
        }
    }
}

impl AffectedModulesConfig {
    pub fn includes(&self, project: &ProjectNode) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter.matches(project))
    }
}

impl Manifest {
    /// Build the project graph rooted at `root_dir`.
    pub fn graph(&self, root_dir: &Path) -> Result<ProjectGraph> {
        ProjectGraph::new(root_dir, self.projects.iter().cloned())
    }

    fn validate(&self) -> Result<()> {
        let patterns = self
            .git_log
            .track_file_patterns
            .iter()
            .chain(&self.affected_modules.track_file_patterns);
        for pattern in patterns {
            glob::Pattern::new(pattern)?;
        }

        for name in self.git_log.classifiers.keys() {
            let usable = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
            if !usable {
                return Err(Error::ConfigParse {
                    message: format!("Invalid classifier name '{}'", name),
                    hint: Some(
                        "Classifier names become part of a file name; use letters, digits, '-', '_' or '.'"
                            .to_string(),
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Parses a YAML string into a [`Manifest`].
pub fn parse(yaml_content: &str) -> Result<Manifest> {
    if yaml_content.trim().is_empty() {
        return Ok(Manifest::default());
    }
    let manifest: Manifest = serde_yaml::from_str(yaml_content)?;
    manifest.validate()?;
    Ok(manifest)
}

/// Parse a [`Manifest`] from a YAML file path
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}
