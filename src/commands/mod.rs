//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `build-recipe` command-line tool. Each subcommand is defined in its own
//! file to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and the global
//!   options and performs the command's logic.
//!
//! Commands that work on a workspace start from [`Workspace::load`], which
//! reads the manifest and builds the project graph.

pub mod affected;
pub mod completions;
pub mod deps;
pub mod git_log;
pub mod report;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;

use build_recipe::config::{self, Manifest};
use build_recipe::git::SystemGit;
use build_recipe::project::ProjectGraph;
use build_recipe::suggestions;

use crate::cli::GlobalArgs;

/// A loaded manifest and the project graph it describes.
pub struct Workspace {
    pub manifest: Manifest,
    pub graph: ProjectGraph,
}

impl Workspace {
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let manifest = load_manifest(&global.config)?;
        let root = workspace_root(&global.config, global.root.as_deref())?;
        let graph = manifest.graph(&root).map_err(suggestions::explain)?;
        Ok(Self { manifest, graph })
    }

    pub fn root(&self) -> &Path {
        self.graph.root_dir()
    }

    /// Git runner working from the workspace root.
    pub fn git(&self) -> SystemGit {
        SystemGit::new(self.root())
    }
}

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    if !path.exists() {
        return Err(suggestions::config_not_found(path));
    }
    config::from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to load config from {}: {}", path.display(), e))
}

/// `root` if given, otherwise the directory holding the manifest; always
/// absolute so that project directories can be handed to git as-is.
pub fn workspace_root(config_path: &Path, root: Option<&Path>) -> Result<PathBuf> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    root.canonicalize()
        .map_err(|e| anyhow::anyhow!("Invalid workspace root {}: {}", root.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_workspace_root_defaults_to_manifest_dir() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("build-recipe.yaml");
        let root = workspace_root(&config, None).unwrap();
        assert_eq!(root, temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_workspace_root_override() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        let root = workspace_root(&temp.path().join("m.yaml"), Some(&nested)).unwrap();
        assert_eq!(root, nested.canonicalize().unwrap());
    }

    #[test]
    fn test_workspace_root_must_exist() {
        let result = workspace_root(Path::new("m.yaml"), Some(Path::new("/nonexistent/root")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_manifest_missing() {
        let error = load_manifest(Path::new("/nonexistent/build-recipe.yaml")).unwrap_err();
        assert!(error.to_string().contains("Configuration file not found"));
    }

    #[test]
    fn test_load_manifest_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("build-recipe.yaml");
        std::fs::write(&path, "projects: [").unwrap();
        let error = load_manifest(&path).unwrap_err();
        assert!(error.to_string().contains("Failed to load config"));
    }
}
