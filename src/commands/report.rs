//! # Report Command Implementation
//!
//! This module implements the `report` subcommand. It applies the recipes of
//! the manifest, in order, to every project their `when` matcher selects and
//! prints which matchers configured each project.
//!
//! This command is a read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;

use build_recipe::output::{self, emoji, OutputConfig};
use build_recipe::project::ProjectId;
use build_recipe::recipe::{BuildRecipe, ProjectSettings};
use build_recipe::suggestions;

use crate::cli::GlobalArgs;
use crate::commands::Workspace;

/// Apply the manifest recipes and report the bindings
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Print a single summary covering every configured project
    #[arg(long)]
    pub all: bool,

    /// Also print the properties each project ends up with
    #[arg(long)]
    pub properties: bool,

    /// Only report this project
    #[arg(value_name = "PROJECT")]
    pub project: Option<String>,
}

/// Execute the `report` command.
pub fn execute(args: ReportArgs, global: &GlobalArgs) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(&global.color);
    let workspace = Workspace::load(global)?;
    let graph = &workspace.graph;

    let selected: Option<ProjectId> = match &args.project {
        Some(path) => Some(
            graph
                .find(path)
                .ok_or_else(|| {
                    suggestions::unknown_project(path, graph.all_projects().map(|p| p.path()))
                })?
                .id(),
        ),
        None => None,
    };

    let mut recipe = BuildRecipe::new(graph);
    let settings = recipe.apply(&workspace.manifest.recipes);

    let blocks: Vec<String> = match selected {
        Some(id) => recipe.project_report(id).into_iter().collect(),
        None if args.all => recipe.all_project_report(),
        None => graph
            .all_projects()
            .filter_map(|p| recipe.project_report(p.id()))
            .collect(),
    };

    if blocks.is_empty() {
        println!(
            "{} No recipe matched {}",
            emoji(&out, "💤", "[NONE]"),
            match selected {
                Some(id) => output::project(&out, &graph.get(id).to_string()),
                None => "any project".to_string(),
            }
        );
    } else {
        println!("{}", blocks.join("\n\n"));
    }

    if args.properties {
        print_properties(&out, &workspace, &settings, selected);
    }

    Ok(())
}

fn print_properties(
    out: &OutputConfig,
    workspace: &Workspace,
    settings: &ProjectSettings,
    selected: Option<ProjectId>,
) {
    println!("\n{} Resolved properties:", emoji(out, "📋", "[PROPS]"));
    for (id, properties) in settings {
        if selected.is_some_and(|s| s != *id) {
            continue;
        }
        println!(
            "   {}",
            output::project(out, &workspace.graph.get(*id).to_string())
        );
        for (key, value) in properties {
            println!("     {} = {}", key, value);
        }
    }
}
