//! # Affected Module Detection
//!
//! A module is affected by a revision range when any project in its
//! dependency closure (itself included) has a non-blank history over that
//! range. Only directories are considered; build-script patterns are not.

use log::{debug, info};

use crate::error::{Error, Result};
use crate::git::{self, GitRunner, RevisionRange};
use crate::project::ProjectNode;
use crate::resolver::DependencyResolver;

/// Affected subprojects that also satisfy `filter`, in enumeration order.
///
/// Projects rejected by `filter` are never queried.
pub fn affected_modules<'g, F>(
    resolver: &mut DependencyResolver<'g>,
    git: &dyn GitRunner,
    range: &RevisionRange,
    filter: F,
) -> Result<Vec<&'g ProjectNode>>
where
    F: Fn(&ProjectNode) -> bool,
{
    let graph = resolver.graph();
    let mut affected = Vec::new();

    for project in graph.subprojects() {
        if !filter(project) {
            continue;
        }
        if is_affected(resolver, git, range, project)? {
            affected.push(project);
        }
    }

    info!(
        "{} of {} module(s) affected since {}",
        affected.len(),
        graph.subprojects().count(),
        range.from()
    );
    Ok(affected)
}

/// Whether anything in the closure of `project` changed over `range`.
pub fn is_affected(
    resolver: &mut DependencyResolver<'_>,
    git: &dyn GitRunner,
    range: &RevisionRange,
    project: &ProjectNode,
) -> Result<bool> {
    let scope: Vec<String> = resolver
        .closure_dirs(project.id())?
        .iter()
        .map(|dir| dir.display().to_string())
        .collect();
    let history = git::log(git, range, None, &scope)?;
    let affected = !history.trim().is_empty();
    debug!("{} affected: {}", project, affected);
    Ok(affected)
}

/// Module names as a pretty-printed JSON array.
pub fn to_json(names: &[String]) -> Result<String> {
    serde_json::to_string_pretty(names).map_err(|e| Error::Serialization {
        message: e.to_string(),
    })
}
