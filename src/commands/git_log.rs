//! # Git Log Command Implementation
//!
//! This module implements the `git-log` subcommand, which writes one change
//! log per classifier (or a single one) for a revision range. Each module's
//! log covers its own directory, the tracked build-script patterns, and the
//! directories of every project it depends on.
//!
//! The start of the range defaults to the most recent tag matching the
//! configured tag pattern; the end defaults to the working tip.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use build_recipe::changelog;
use build_recipe::defaults;
use build_recipe::git::RevisionRange;
use build_recipe::output::{emoji, OutputConfig};
use build_recipe::resolver::DependencyResolver;
use build_recipe::suggestions;

use crate::cli::GlobalArgs;
use crate::commands::Workspace;

/// Write per-module change logs
#[derive(Args, Debug)]
pub struct GitLogArgs {
    /// Start of the range. Defaults to the most recent matching tag.
    #[arg(long, value_name = "REV")]
    pub from: Option<String>,

    /// End of the range. Defaults to the working tip.
    #[arg(long, value_name = "REV")]
    pub to: Option<String>,

    /// Directory receiving the change logs. Defaults to `build/` under the
    /// workspace root.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Tag pattern used to find the start of the range, overriding the manifest
    #[arg(long, value_name = "GLOB")]
    pub tag_pattern: Option<String>,
}

/// Execute the `git-log` command.
pub fn execute(args: GitLogArgs, global: &GlobalArgs) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(&global.color);
    let workspace = Workspace::load(global)?;
    let settings = &workspace.manifest.git_log;
    let git = workspace.git();

    let tag_pattern = args
        .tag_pattern
        .as_deref()
        .or(settings.tag_pattern.as_deref());
    let range = RevisionRange::resolve(&git, args.from.as_deref(), args.to.as_deref(), tag_pattern)
        .map_err(suggestions::explain)?;

    let output_dir = args
        .output_dir
        .unwrap_or_else(|| defaults::default_output_dir(workspace.root()));

    eprintln!(
        "{} Collecting changes for {}..{}",
        emoji(&out, "📝", "[LOG]"),
        range.from(),
        range.to_label()
    );

    let mut resolver = DependencyResolver::new(&workspace.graph);
    let written =
        changelog::write_change_logs(&mut resolver, &git, &range, settings, &output_dir)
            .map_err(suggestions::explain)?;

    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
