//! Git queries used to scope project history.
//!
//! Everything here shells out to the system `git` binary and treats its output
//! as opaque, trimmed text. Three invocations are needed:
//!
//! - `git rev-list --tags[=<pattern>] --max-count=1` to find the newest tagged commit
//! - `git describe --tags <hash>` to turn that commit back into a tag name
//! - `git log [--pretty=<format>] <from>..<to> -- <paths>` for the history itself
//!
//! The [`GitRunner`] trait sits between these queries and the process so that
//! callers can substitute canned output.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use crate::error::{Error, Result};

/// Runs a git command and returns its trimmed standard output.
pub trait GitRunner {
    fn run(&self, args: &[String]) -> Result<String>;
}

/// [`GitRunner`] backed by the `git` executable on `PATH`.
#[derive(Debug, Clone)]
pub struct SystemGit {
    workdir: PathBuf,
}

impl SystemGit {
    /// Run git commands from `workdir`, normally the workspace root.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

impl GitRunner for SystemGit {
    fn run(&self, args: &[String]) -> Result<String> {
        debug!("git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| Error::GitCommand {
                command: args.join(" "),
                dir: self.workdir.display().to_string(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::GitCommand {
                command: args.join(" "),
                dir: self.workdir.display().to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// A pair of revisions bounding a history query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRange {
    from: String,
    to: String,
}

impl RevisionRange {
    /// An empty `to` means the working tip.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Resolve a range from optional endpoints.
    ///
    /// A missing or blank `from` is replaced by the most recent tag matching
    /// `tag_pattern`; a missing `to` means the working tip.
    pub fn resolve(
        git: &dyn GitRunner,
        from: Option<&str>,
        to: Option<&str>,
        tag_pattern: Option<&str>,
    ) -> Result<Self> {
        let from = match from.map(str::trim).filter(|f| !f.is_empty()) {
            Some(from) => from.to_string(),
            None => last_tag(git, tag_pattern)?,
        };
        let to = to.map(str::trim).unwrap_or_default().to_string();
        Ok(Self::new(from, to))
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    /// `to`, or `head` when it points at the working tip.
    pub fn to_label(&self) -> &str {
        if self.to.trim().is_empty() {
            "head"
        } else {
            &self.to
        }
    }

    /// The `<from>..<to>` argument passed to `git log`.
    pub fn spec(&self) -> String {
        format!("{}..{}", self.from, self.to)
    }
}

/// Name of the most recent tag matching `pattern`, or of any tag when `None`.
pub fn last_tag(git: &dyn GitRunner, pattern: Option<&str>) -> Result<String> {
    let tags_arg = match pattern {
        Some(pattern) => format!("--tags={}", pattern),
        None => "--tags".to_string(),
    };
    let hash = git.run(&[
        "rev-list".to_string(),
        tags_arg,
        "--max-count=1".to_string(),
    ])?;

    if hash.trim().is_empty() {
        return Err(Error::NoPreviousTag {
            pattern: pattern.map(str::to_string),
        });
    }

    let tag = git.run(&[
        "describe".to_string(),
        "--tags".to_string(),
        hash.trim().to_string(),
    ])?;
    info!("Resolved previous tag: {}", tag);
    Ok(tag)
}

/// History of `paths` over `range`, optionally rendered with a pretty format.
///
/// Blank output means nothing relevant changed.
pub fn log(
    git: &dyn GitRunner,
    range: &RevisionRange,
    pretty: Option<&str>,
    paths: &[String],
) -> Result<String> {
    let mut args = vec!["log".to_string()];
    if let Some(pretty) = pretty {
        args.push(format!("--pretty={}", pretty));
    }
    args.push(range.spec());
    args.push("--".to_string());
    args.extend(paths.iter().cloned());
    git.run(&args)
}
