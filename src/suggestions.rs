//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Following CLI recommendations,
//! errors should tell users what went wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use build_recipe::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Configuration file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::config_not_found(path));
//! ```

use std::path::Path;

use crate::error::Error;

/// Generate an error for when the manifest is not found.
///
/// Includes hints about:
/// - Creating a manifest
/// - Using the -c/--config flag
/// - Using the BUILD_RECIPE_CONFIG environment variable
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a build-recipe.yaml file in your workspace root\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set BUILD_RECIPE_CONFIG environment variable",
        path = path.display()
    )
}

/// Generate an error for when no tag can start a revision range.
pub fn no_previous_tag(pattern: Option<&str>) -> anyhow::Error {
    let matching = pattern
        .map(|p| format!(" matching '{p}'"))
        .unwrap_or_default();
    anyhow::anyhow!(
        "Can't find previous tag{matching}\n\n\
         hint: Pass --from <REV> to choose the start of the range explicitly\n\
         hint: Check the tag-pattern setting in your manifest\n\
         hint: Fetch tags with 'git fetch --tags' in shallow clones"
    )
}

/// Generate an error for a cycle detected in project dependencies.
///
/// Includes hints about how to resolve the cycle.
pub fn cycle_detected(cycle: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Cycle detected in project dependencies: {cycle}\n\n\
         hint: Remove one of the 'dependencies' entries to break the cycle\n\
         hint: Consider extracting the shared code into a separate project"
    )
}

/// Generate an error for a project path that is not part of the workspace.
///
/// Suggests the closest known path when one is near enough.
pub fn unknown_project<'a, I>(path: &str, known: I) -> anyhow::Error
where
    I: IntoIterator<Item = &'a str>,
{
    let known: Vec<&str> = known.into_iter().collect();
    let wanted = if path.starts_with(':') {
        path.to_string()
    } else {
        format!(":{path}")
    };
    let did_you_mean = find_similar(&wanted, &known)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Unknown project: {path}{did_you_mean}\n\n\
         hint: Project paths are ':'-separated, e.g. ':coffee:api:client'\n\
         hint: Run 'build-recipe report --all' to list configured projects"
    )
}

/// Turn a library error into a user-facing error, adding hints where a
/// common fix exists.
pub fn explain(error: Error) -> anyhow::Error {
    match error {
        Error::NoPreviousTag { pattern } => no_previous_tag(pattern.as_deref()),
        Error::CycleDetected { cycle } => cycle_detected(&cycle),
        other => anyhow::Error::new(other),
    }
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut matrix = vec![vec![0usize; b_len + 1]; a_len + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a_len {
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] {
                0
            } else {
                1
            };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[a_len][b_len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_includes_hints() {
        let path = Path::new("/some/path/build-recipe.yaml");
        let message = config_not_found(path).to_string();

        assert!(message.contains("Configuration file not found"));
        assert!(message.contains("/some/path/build-recipe.yaml"));
        assert!(message.contains("-c/--config"));
        assert!(message.contains("BUILD_RECIPE_CONFIG"));
    }

    #[test]
    fn test_no_previous_tag_suggests_from() {
        let message = no_previous_tag(Some("release-*")).to_string();
        assert!(message.starts_with("Can't find previous tag matching 'release-*'"));
        assert!(message.contains("--from"));

        let message = no_previous_tag(None).to_string();
        assert!(message.starts_with("Can't find previous tag\n"));
    }

    #[test]
    fn test_unknown_project_suggests_similar() {
        let known = [":coffee:api", ":coffee:protocol", ":juice:api"];
        let message = unknown_project("cofee:api", known).to_string();
        assert!(message.contains("Unknown project: cofee:api"));
        assert!(message.contains("Did you mean ':coffee:api'?"));

        let message = unknown_project("tea", known).to_string();
        assert!(!message.contains("Did you mean"));
    }

    #[test]
    fn test_cycle_detected_includes_hints() {
        let message = cycle_detected(":a -> :b -> :a").to_string();
        assert!(message.contains("Cycle detected"));
        assert!(message.contains(":a -> :b -> :a"));
        assert!(message.contains("break the cycle"));
    }

    #[test]
    fn test_explain_adds_hints() {
        let message = explain(Error::NoPreviousTag {
            pattern: Some("v*".to_string()),
        })
        .to_string();
        assert!(message.contains("hint: Pass --from"));

        let message = explain(Error::UnknownProject {
            path: ":x".to_string(),
        })
        .to_string();
        assert_eq!(message, "Unknown project: :x");
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("include", "include"), 0);
        assert_eq!(edit_distance(":cofee:api", ":coffee:api"), 1);
        assert_eq!(edit_distance("exclude", "include"), 2);
    }

    #[test]
    fn test_find_similar() {
        let candidates = [":coffee", ":juice", ":shop"];
        assert_eq!(find_similar(":jiuce", &candidates), Some(":juice"));
        assert_eq!(find_similar(":tea", &candidates), None);
    }
}
