//! Default values for build-recipe configuration.
//!
//! This module provides centralized default values used by the manifest and
//! the commands, ensuring consistency and avoiding duplication.

use std::path::{Path, PathBuf};

/// Name of the workspace manifest looked up in the current directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "build-recipe.yaml";

/// Environment variable that overrides the manifest location.
pub const CONFIG_ENV_VAR: &str = "BUILD_RECIPE_CONFIG";

/// Tags considered when a range has no explicit start.
pub const DEFAULT_TAG_PATTERN: &str = "v*";

/// `git log --pretty` format used for change logs.
pub const DEFAULT_LOG_PATTERN: &str = "%s\n Assignee: @%an\n Reviewed-by: @%cn\n";

/// Build-script patterns added to every change log scope.
pub const DEFAULT_TRACK_FILE_PATTERNS: &[&str] = &["build.gradl*"];

/// Directory, relative to the workspace root, that receives change logs.
pub const DEFAULT_OUTPUT_DIR: &str = "build";

pub fn default_tag_pattern() -> Option<String> {
    Some(DEFAULT_TAG_PATTERN.to_string())
}

pub fn default_log_pattern() -> String {
    DEFAULT_LOG_PATTERN.to_string()
}

pub fn default_track_file_patterns() -> Vec<String> {
    DEFAULT_TRACK_FILE_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

/// Where change logs go when `--output-dir` is not given.
pub fn default_output_dir(root: &Path) -> PathBuf {
    root.join(DEFAULT_OUTPUT_DIR)
}
