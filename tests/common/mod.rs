//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures, helper functions, and manifests
//! to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_manifest(manifests::SHOP);
//!     fixture.command().arg("validate").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::TestFixture;
}

/// Workspace manifests used across tests.
#[allow(dead_code)]
pub mod manifests {
    /// Two product lines with the same layout, and a server depending on
    /// the client of each.
    pub const SHOP: &str = r#"
projects:
  - path: coffee:api
    dependencies: [coffee:protocol]
  - path: coffee:api:client
    type: java-boot-lib
    dependencies: [coffee:api]
  - path: coffee:api:server
    type: java-boot-application
    dependencies: [coffee:api]
  - path: coffee:protocol
    type: java-lib
  - path: juice:api
    dependencies: [juice:protocol]
  - path: juice:api:client
    type: java-boot-lib
    dependencies: [juice:api]
  - path: juice:api:server
    type: java-boot-application
    dependencies: [juice:api]
  - path: juice:protocol
    type: java-lib
  - path: shop:server
    dir: shop-server
    type: java-boot-application
    label: "dockerized, inhouse"
    dependencies: [coffee:api:client, juice:api:client]
recipes:
  - when: { type-prefix: java }
    properties: { java.version: "17" }
  - when: { type-suffix: application }
    properties: { packaging: boot-jar }
  - when: { labels: [dockerized, inhouse] }
    properties: { image: registry.local/shop }
affected-modules:
  module-name: path
"#;

    /// A dependency cycle between two projects.
    pub const CYCLE: &str = r#"
projects:
  - path: a
    dependencies: [b]
  - path: b
    dependencies: [a]
"#;

    /// A recipe whose matcher selects nothing.
    pub const UNUSED_RECIPE: &str = r#"
projects:
  - path: tea
    type: go-service
recipes:
  - when: { type-prefix: java }
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "projects: [unclosed";
}

/// A test fixture that provides a temporary workspace with an optional
/// manifest and an optional git repository.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_manifest(manifests::SHOP)
///     .with_file("coffee/protocol/Menu.java", "class Menu {}");
///
/// fixture.command().arg("deps").arg(":shop:server").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
    commits: Cell<u64>,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
            commits: Cell::new(0),
        }
    }

    /// Add a `build-recipe.yaml` manifest with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.temp_dir
            .child("build-recipe.yaml")
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Add a file with the given path and content.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.write(path, content);
        self
    }

    /// Write (or overwrite) a file in the workspace.
    #[allow(dead_code)]
    pub fn write(&self, path: &str, content: &str) {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the manifest.
    #[allow(dead_code)]
    pub fn manifest_path(&self) -> PathBuf {
        self.temp_dir.path().join("build-recipe.yaml")
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("build-recipe");
        cmd.current_dir(self.path())
            .env_remove("BUILD_RECIPE_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--color")
            .arg("never");
        cmd
    }

    /// Run git in the workspace and return its trimmed stdout.
    #[allow(dead_code)]
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args([
                "-c",
                "user.name=Test Author",
                "-c",
                "user.email=author@example.com",
                "-c",
                "commit.gpgsign=false",
                "-c",
                "tag.gpgsign=false",
            ])
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Initialize a repository holding the current content.
    #[allow(dead_code)]
    pub fn with_git_repo(self) -> Self {
        self.git(&["init", "--quiet"]);
        self
    }

    /// Stage everything and commit it.
    ///
    /// Each commit is dated one minute after the previous one, so that
    /// "most recent tag" never depends on commits sharing a timestamp.
    #[allow(dead_code)]
    pub fn commit_all(&self, message: &str) {
        let n = self.commits.get() + 1;
        self.commits.set(n);
        let date = format!("{} +0000", 1_700_000_000 + n * 60);

        self.git(&["add", "--all"]);
        let output = Command::new("git")
            .args(["-c", "user.name=Test Author", "-c", "user.email=author@example.com"])
            .args(["-c", "commit.gpgsign=false"])
            .args(["commit", "--quiet", "--message", message])
            .env("GIT_AUTHOR_DATE", &date)
            .env("GIT_COMMITTER_DATE", &date)
            .current_dir(self.path())
            .output()
            .expect("Failed to run git commit");
        assert!(
            output.status.success(),
            "git commit failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    /// Create a lightweight tag on HEAD.
    #[allow(dead_code)]
    pub fn tag(&self, name: &str) {
        self.git(&["tag", name]);
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_manifest() {
        let fixture = TestFixture::new().with_manifest(manifests::SHOP);
        assert!(fixture.manifest_path().exists());
    }

    #[test]
    fn test_manifests_are_valid() {
        for manifest in [manifests::SHOP, manifests::CYCLE, manifests::UNUSED_RECIPE] {
            build_recipe::config::parse(manifest).expect("Manifest should parse");
        }
        assert!(build_recipe::config::parse(manifests::INVALID_YAML).is_err());
    }
}
