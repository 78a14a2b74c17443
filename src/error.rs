//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `build-recipe` library. It uses the `thiserror` library to create a single
//! `Error` enum that covers every failure mode of the library, with
//! descriptive messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur within the library.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the library to simplify function signatures.
//!
//! Errors fall into a few groups:
//!
//! - Configuration errors (manifest parsing, invalid regex or glob patterns,
//!   unknown or duplicate projects). These are raised while the manifest and
//!   matchers are being built, never while they are being evaluated.
//! - Resolution errors (no tag matches the requested pattern).
//! - Git command failures (the process could not be spawned or exited with a
//!   non-zero status).
//! - Cycle detection in the project dependency graph.
//! - I/O errors while writing report artifacts.
//!
//! A module without relevant history is not an error; it is simply left out
//! of the reports.

use thiserror::Error;

/// Main error type for build-recipe operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while interpreting the workspace manifest.
    ///
    /// This error includes the specific issue and optionally a hint about
    /// how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A dependency or lookup referred to a project that is not in the graph.
    #[error("Unknown project: {path}")]
    UnknownProject { path: String },

    /// The same project path was declared twice in the manifest.
    #[error("Duplicate project declaration: {path}")]
    DuplicateProject { path: String },

    /// No tag matched the pattern used to resolve the start of a revision range.
    #[error("Can't find previous tag{}", pattern.as_ref().map(|p| format!(" matching '{}'", p)).unwrap_or_default())]
    NoPreviousTag { pattern: Option<String> },

    /// An error occurred while executing a Git command.
    #[error("Git command failed in {dir}: git {command} - {stderr}")]
    GitCommand {
        command: String,
        dir: String,
        stderr: String,
    },

    /// A circular dependency was detected in the project graph.
    #[error("Cycle detected in project dependencies: {cycle}")]
    CycleDetected { cycle: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// An error occurred during serialization.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config_parse() {
        let error = Error::ConfigParse {
            message: "Invalid project path".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration parsing error"));
        assert!(display.contains("Invalid project path"));
        assert!(!display.contains("hint:"));
    }

    #[test]
    fn test_error_display_config_parse_with_hint() {
        let error = Error::ConfigParse {
            message: "Missing path field".to_string(),
            hint: Some("Add 'path:' to the project entry".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Missing path field"));
        assert!(display.contains("hint:"));
        assert!(display.contains("Add 'path:'"));
    }

    #[test]
    fn test_error_display_no_previous_tag() {
        let error = Error::NoPreviousTag {
            pattern: Some("v*".to_string()),
        };
        assert_eq!(error.to_string(), "Can't find previous tag matching 'v*'");

        let error = Error::NoPreviousTag { pattern: None };
        assert_eq!(error.to_string(), "Can't find previous tag");
    }

    #[test]
    fn test_error_display_git_command() {
        let error = Error::GitCommand {
            command: "describe --tags abc123".to_string(),
            dir: "/work/shop".to_string(),
            stderr: "fatal: No names found".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Git command failed"));
        assert!(display.contains("/work/shop"));
        assert!(display.contains("describe --tags abc123"));
        assert!(display.contains("No names found"));
    }

    #[test]
    fn test_error_display_cycle_detected() {
        let error = Error::CycleDetected {
            cycle: ":a -> :b -> :a".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Cycle detected"));
        assert!(display.contains(":a -> :b -> :a"));
    }

    #[test]
    fn test_error_display_unknown_project() {
        let error = Error::UnknownProject {
            path: ":coffee:missing".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown project: :coffee:missing");
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_regex_error() {
        let regex_error = regex::Error::Syntax("Invalid regex".to_string());
        let error: Error = regex_error.into();
        assert!(error.to_string().contains("Regex error"));
    }

    #[test]
    fn test_error_from_glob_error() {
        let glob_error = glob::Pattern::new("[unclosed").unwrap_err();
        let error: Error = glob_error.into();
        assert!(error.to_string().contains("Glob pattern error"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: [unclosed").unwrap_err();
        let error: Error = yaml_error.into();
        assert!(error.to_string().contains("YAML parsing error"));
    }
}
