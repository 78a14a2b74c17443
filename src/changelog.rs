//! # Change Logs per Module
//!
//! Produces, for a revision range, the commit log of every module restricted
//! to the files that matter to it: the module's own directory, the tracked
//! file patterns (build scripts by default), and the directory of every
//! project in its dependency closure. A module therefore also lists the
//! upstream changes it builds against.
//!
//! Modules whose scoped log is blank are left out. The remaining entries are
//! rendered as `[<module>]\n\n<log>` blocks separated by `\n\n---\n\n` and
//! written to `change_log_<from>_<to|head>[_<classifier>].log`.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::config::GitLogConfig;
use crate::error::Result;
use crate::git::{self, GitRunner, RevisionRange};
use crate::project::ProjectNode;
use crate::resolver::DependencyResolver;

/// Separator between module blocks in a rendered report.
pub const ENTRY_SEPARATOR: &str = "\n\n---\n\n";

/// Log text per module, in module order, blank entries excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeReport {
    entries: Vec<(String, String)>,
}

impl ChangeReport {
    /// Add an entry; blank logs are dropped.
    pub fn push(&mut self, module: impl Into<String>, log: impl Into<String>) {
        let log = log.into();
        if !log.trim().is_empty() {
            self.entries.push((module.into(), log));
        }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(module, _)| module.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(module, log)| format!("[{}]\n\n{}", module, log))
            .collect::<Vec<_>>()
            .join(ENTRY_SEPARATOR)
    }
}

/// Path filters for `project`: its directory, `track_file_patterns`, then the
/// directories of its dependency closure, without repeats.
pub fn module_scope(
    resolver: &mut DependencyResolver<'_>,
    project: &ProjectNode,
    track_file_patterns: &[String],
) -> Result<Vec<String>> {
    let mut scope = vec![project.dir().display().to_string()];
    scope.extend(track_file_patterns.iter().cloned());
    for dir in resolver.closure_dirs(project.id())? {
        let dir = dir.display().to_string();
        if !scope.contains(&dir) {
            scope.push(dir);
        }
    }
    Ok(scope)
}

/// Query the scoped log of every module in `modules`, in the order given.
pub fn change_report<'a, I>(
    resolver: &mut DependencyResolver<'_>,
    git: &dyn GitRunner,
    range: &RevisionRange,
    modules: I,
    config: &GitLogConfig,
) -> Result<ChangeReport>
where
    I: IntoIterator<Item = &'a ProjectNode>,
{
    let mut report = ChangeReport::default();
    for project in modules {
        let scope = module_scope(resolver, project, &config.track_file_patterns)?;
        let log = git::log(git, range, Some(&config.log_pattern), &scope)?;
        report.push(config.module_name.render(project), log);
    }
    Ok(report)
}

/// `change_log_<from>_<to|head>[_<classifier>].log`
///
/// Revisions are used verbatim, so a ref containing `/` (such as
/// `origin/main`) names a file in a subdirectory of the output directory,
/// which must then exist for the write to succeed.
pub fn artifact_name(range: &RevisionRange, classifier: Option<&str>) -> String {
    let base = format!("change_log_{}_{}", range.from(), range.to_label());
    match classifier {
        Some(classifier) => format!("{}_{}.log", base, classifier),
        None => format!("{}.log", base),
    }
}

/// Write one change log for all subprojects, or one per classifier when the
/// configuration names any. Returns the written files.
///
/// A module that satisfies several classifiers appears in each of their logs.
pub fn write_change_logs(
    resolver: &mut DependencyResolver<'_>,
    git: &dyn GitRunner,
    range: &RevisionRange,
    config: &GitLogConfig,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let graph = resolver.graph();
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::new();
    if config.classifiers.is_empty() {
        let report = change_report(resolver, git, range, graph.subprojects(), config)?;
        written.push(write_report(output_dir, &artifact_name(range, None), &report)?);
    } else {
        for (classifier, matcher) in &config.classifiers {
            let modules = graph.subprojects().filter(|p| matcher.matches(p));
            let report = change_report(resolver, git, range, modules, config)?;
            written.push(write_report(
                output_dir,
                &artifact_name(range, Some(classifier)),
                &report,
            )?);
        }
    }
    Ok(written)
}

fn write_report(output_dir: &Path, name: &str, report: &ChangeReport) -> Result<PathBuf> {
    let path = output_dir.join(name);
    fs::write(&path, report.render())?;
    info!(
        "Wrote change log for {} module(s) to {}",
        report.entries().len(),
        path.display()
    );
    Ok(path)
}
