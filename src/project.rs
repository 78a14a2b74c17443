//! # Project Graph
//!
//! A read-only view of every project in a multi-module workspace. Projects are
//! addressed by Gradle-style paths (`:coffee:api:client`, root is `:`), carry an
//! optional free-form type and an optional comma-separated label attribute, and
//! point at the in-tree projects they depend on.
//!
//! The graph is built once per run from [`ProjectDecl`]s (usually read from the
//! workspace manifest) and never changes afterwards. Parents implied by a path
//! are created automatically, so declaring `coffee:api` also yields `coffee`.
//!
//! Projects are enumerated depth first, then by path, with the root first.
//! [`ProjectId`]s follow that order, so sorting ids sorts projects the same way.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matcher::Matcher;

/// Path of the root project.
pub const ROOT_PATH: &str = ":";

/// Separator between path segments.
pub const PATH_SEPARATOR: char = ':';

/// Separator between typelets in a project type.
pub const PROJECT_TYPE_DELIMITER: char = '-';

/// Separator between labels in the label attribute.
pub const PROJECT_LABEL_DELIMITER: char = ',';

/// Index of a project inside its [`ProjectGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectId(usize);

impl ProjectId {
    /// Position of the project in enumeration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A project declaration, as written in the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectDecl {
    /// Project path such as `coffee:api`; the leading `:` is optional.
    pub path: String,
    /// Directory of the project. Relative paths are resolved against the
    /// workspace root; defaults to the parent project's directory joined
    /// with the last path segment.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Free-form project type, e.g. `java-boot-application`.
    #[serde(default, rename = "type")]
    pub project_type: Option<String>,
    /// Comma-separated labels, e.g. `"dockerized, inhouse"`.
    #[serde(default)]
    pub label: Option<String>,
    /// Paths of the in-tree projects this project depends on.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ProjectDecl {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, project_type: impl Into<String>) -> Self {
        self.project_type = Some(project_type.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn depends_on(mut self, path: impl Into<String>) -> Self {
        self.dependencies.push(path.into());
        self
    }
}

/// A single project of the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectNode {
    id: ProjectId,
    path: String,
    name: String,
    dir: PathBuf,
    project_type: Option<String>,
    label: Option<String>,
    dependencies: Vec<ProjectId>,
}

impl ProjectNode {
    pub fn id(&self) -> ProjectId {
        self.id
    }

    /// Full path, e.g. `:coffee:api`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path segment; for the root, the name of the workspace directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn project_type(&self) -> Option<&str> {
        self.project_type.as_deref()
    }

    /// Raw label attribute, before splitting.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Labels split on `,`, trimmed, blanks dropped.
    ///
    /// `None` when the project has no label attribute at all, which is
    /// different from an attribute that holds no labels.
    pub fn labels(&self) -> Option<BTreeSet<&str>> {
        self.label.as_deref().map(|label| {
            label
                .split(PROJECT_LABEL_DELIMITER)
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect()
        })
    }

    /// Declared dependencies, duplicates included.
    pub fn dependencies(&self) -> &[ProjectId] {
        &self.dependencies
    }

    pub fn depth(&self) -> usize {
        path_depth(&self.path)
    }

    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }

    pub fn matches(&self, matcher: &Matcher) -> bool {
        matcher.matches(self)
    }

    pub fn is_same_type_of(&self, project_type: &str) -> bool {
        Matcher::by_type(project_type).matches(self)
    }

    pub fn has_type_prefix(&self, prefix: &str) -> bool {
        Matcher::by_type_prefix(prefix).matches(self)
    }

    pub fn has_type_suffix(&self, suffix: &str) -> bool {
        Matcher::by_type_suffix(suffix).matches(self)
    }

    /// Fails when `pattern` is not a valid regular expression.
    pub fn matches_type_expression(&self, pattern: &str) -> Result<bool> {
        Ok(Matcher::by_type_regex(pattern)?.matches(self))
    }

    pub fn having_type<I, S>(&self, typelets: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Matcher::by_type_having(typelets).matches(self)
    }

    pub fn has_labels<I, S>(&self, labels: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Matcher::by_labels(labels).matches(self)
    }
}

impl fmt::Display for ProjectNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "root project '{}'", self.name)
        } else {
            write!(f, "project '{}'", self.path)
        }
    }
}

/// How a project is named in reports and listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleNameStyle {
    /// `project ':coffee:api'`
    #[default]
    Display,
    /// `:coffee:api`
    Path,
    /// `coffee:api`
    Relative,
}

impl ModuleNameStyle {
    pub fn render(self, project: &ProjectNode) -> String {
        match self {
            ModuleNameStyle::Display => project.to_string(),
            ModuleNameStyle::Path => project.path().to_string(),
            ModuleNameStyle::Relative => {
                if project.is_root() {
                    project.name().to_string()
                } else {
                    project.path().trim_start_matches(PATH_SEPARATOR).to_string()
                }
            }
        }
    }
}

/// All projects of a workspace and their dependency edges.
#[derive(Debug, Clone)]
pub struct ProjectGraph {
    root_dir: PathBuf,
    nodes: Vec<ProjectNode>,
    by_path: HashMap<String, ProjectId>,
}

impl ProjectGraph {
    /// Build a graph rooted at `root_dir` from project declarations.
    ///
    /// A declaration for `:` sets the attributes of the root project.
    pub fn new<I>(root_dir: impl Into<PathBuf>, decls: I) -> Result<Self>
    where
        I: IntoIterator<Item = ProjectDecl>,
    {
        let root_dir = root_dir.into();

        let mut declared: HashMap<String, ProjectDecl> = HashMap::new();
        for decl in decls {
            let path = normalize_path(&decl.path)?;
            if declared.contains_key(&path) {
                return Err(Error::DuplicateProject { path });
            }
            declared.insert(path, decl);
        }

        // Implied parents, root included
        let declared_paths: Vec<String> = declared.keys().cloned().collect();
        for path in declared_paths {
            for parent in ancestors(&path) {
                declared
                    .entry(parent.clone())
                    .or_insert_with(|| ProjectDecl::new(parent));
            }
        }
        declared
            .entry(ROOT_PATH.to_string())
            .or_insert_with(|| ProjectDecl::new(ROOT_PATH));

        let mut paths: Vec<String> = declared.keys().cloned().collect();
        paths.sort_by(|a, b| compare_paths(a, b));

        let by_path: HashMap<String, ProjectId> = paths
            .iter()
            .enumerate()
            .map(|(index, path)| (path.clone(), ProjectId(index)))
            .collect();

        let root_name = root_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut nodes = Vec::with_capacity(paths.len());
        for (index, path) in paths.into_iter().enumerate() {
            let decl = declared
                .remove(&path)
                .ok_or_else(|| Error::UnknownProject { path: path.clone() })?;

            let dependencies = decl
                .dependencies
                .iter()
                .map(|dep| {
                    let dep_path = normalize_path(dep)?;
                    by_path
                        .get(&dep_path)
                        .copied()
                        .ok_or(Error::UnknownProject { path: dep_path })
                })
                .collect::<Result<Vec<_>>>()?;

            let dir = match &decl.dir {
                Some(dir) if dir.is_absolute() => dir.clone(),
                Some(dir) => root_dir.join(dir),
                None => {
                    // Parents come earlier in enumeration order
                    let parent_dir = ancestors(&path)
                        .last()
                        .and_then(|parent| by_path.get(parent))
                        .and_then(|id| nodes.get(id.0))
                        .map(|parent: &ProjectNode| parent.dir.clone())
                        .unwrap_or_else(|| root_dir.clone());
                    match path_segments(&path).last() {
                        Some(name) => parent_dir.join(name),
                        None => parent_dir,
                    }
                }
            };

            let name = if path == ROOT_PATH {
                root_name.clone()
            } else {
                path_segments(&path).last().unwrap_or_default().to_string()
            };

            nodes.push(ProjectNode {
                id: ProjectId(index),
                path,
                name,
                dir,
                project_type: decl.project_type,
                label: decl.label,
                dependencies,
            });
        }

        Ok(Self {
            root_dir,
            nodes,
            by_path,
        })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn root(&self) -> &ProjectNode {
        &self.nodes[0]
    }

    /// Look up a project owned by this graph.
    ///
    /// # Panics
    ///
    /// Panics if `id` was produced by a different graph with fewer projects.
    pub fn get(&self, id: ProjectId) -> &ProjectNode {
        &self.nodes[id.0]
    }

    /// Find a project by path; the leading `:` is optional.
    pub fn find(&self, path: &str) -> Option<&ProjectNode> {
        let path = normalize_path(path).ok()?;
        self.by_path.get(&path).map(|id| self.get(*id))
    }

    pub fn require(&self, path: &str) -> Result<&ProjectNode> {
        self.find(path).ok_or_else(|| Error::UnknownProject {
            path: path.to_string(),
        })
    }

    /// Every project, root first, in enumeration order.
    pub fn all_projects(&self) -> impl Iterator<Item = &ProjectNode> {
        self.nodes.iter()
    }

    /// Every project except the root.
    pub fn subprojects(&self) -> impl Iterator<Item = &ProjectNode> {
        self.nodes.iter().filter(|p| !p.is_root())
    }

    /// Distinct direct dependencies of `id`, in declaration order.
    pub fn direct_dependencies(&self, id: ProjectId) -> Vec<ProjectId> {
        let mut seen = BTreeSet::new();
        self.get(id)
            .dependencies
            .iter()
            .copied()
            .filter(|dep| seen.insert(*dep))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a graph holds at least its root project.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Canonical form of a project path: `:a:b`, or `:` for the root.
pub fn normalize_path(path: &str) -> Result<String> {
    let trimmed = path.trim();
    let relative = trimmed.strip_prefix(PATH_SEPARATOR).unwrap_or(trimmed);
    if relative.is_empty() {
        return Ok(ROOT_PATH.to_string());
    }

    let segments: Vec<&str> = relative.split(PATH_SEPARATOR).map(str::trim).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(Error::ConfigParse {
            message: format!("Invalid project path '{}'", path),
            hint: Some("Use ':'-separated names such as 'coffee:api:client'".to_string()),
        });
    }

    Ok(format!("{}{}", PATH_SEPARATOR, segments.join(":")))
}

fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR).filter(|s| !s.is_empty())
}

fn path_depth(path: &str) -> usize {
    path_segments(path).count()
}

fn ancestors(path: &str) -> Vec<String> {
    let segments: Vec<&str> = path_segments(path).collect();
    (1..segments.len())
        .map(|n| format!("{}{}", PATH_SEPARATOR, segments[..n].join(":")))
        .collect()
}

fn compare_paths(a: &str, b: &str) -> Ordering {
    path_depth(a).cmp(&path_depth(b)).then_with(|| a.cmp(b))
}
