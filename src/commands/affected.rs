//! # Affected Command Implementation
//!
//! This module implements the `affected` subcommand, which prints the modules
//! whose dependency closure changed over a revision range, one per line or as
//! a JSON array. The manifest's `affected-modules.filter` restricts which
//! modules may be reported.

use anyhow::Result;
use clap::{Args, ValueEnum};

use build_recipe::affected;
use build_recipe::git::RevisionRange;
use build_recipe::resolver::DependencyResolver;
use build_recipe::suggestions;

use crate::cli::GlobalArgs;
use crate::commands::Workspace;

/// Output formats for the affected module list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One module name per line
    #[default]
    Text,
    /// A JSON array of module names
    Json,
}

/// List modules affected by a revision range
#[derive(Args, Debug)]
pub struct AffectedArgs {
    /// Start of the range. Defaults to the most recent matching tag.
    #[arg(long, value_name = "REV")]
    pub from: Option<String>,

    /// End of the range. Defaults to the working tip.
    #[arg(long, value_name = "REV")]
    pub to: Option<String>,

    /// Tag pattern used to find the start of the range, overriding the manifest
    #[arg(long, value_name = "GLOB")]
    pub tag_pattern: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the `affected` command.
pub fn execute(args: AffectedArgs, global: &GlobalArgs) -> Result<()> {
    let workspace = Workspace::load(global)?;
    let settings = &workspace.manifest.affected_modules;
    let git = workspace.git();

    let tag_pattern = args
        .tag_pattern
        .as_deref()
        .or(settings.tag_pattern.as_deref());
    let range = RevisionRange::resolve(&git, args.from.as_deref(), args.to.as_deref(), tag_pattern)
        .map_err(suggestions::explain)?;

    let mut resolver = DependencyResolver::new(&workspace.graph);
    let modules = affected::affected_modules(&mut resolver, &git, &range, |p| settings.includes(p))
        .map_err(suggestions::explain)?;

    let names: Vec<String> = modules
        .iter()
        .map(|p| settings.module_name.render(p))
        .collect();

    match args.format {
        OutputFormat::Text => {
            for name in &names {
                println!("{}", name);
            }
        }
        OutputFormat::Json => println!("{}", affected::to_json(&names)?),
    }
    Ok(())
}
