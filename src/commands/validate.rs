//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks the
//! workspace manifest without touching git.
//!
//! ## Functionality
//!
//! - **Manifest Parsing**: Parses the manifest, which also compiles every
//!   matcher and checks tracked-file glob patterns.
//! - **Graph Construction**: Builds the project graph, rejecting duplicate
//!   declarations and dependencies on unknown projects.
//! - **Cycle Detection**: Resolves the dependency closure of every project.
//! - **Selector Coverage**: Warns about recipes, classifiers, and filters
//!   that select no project at all.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;

use build_recipe::config::Manifest;
use build_recipe::error::Error;
use build_recipe::output::{self, emoji, OutputConfig};
use build_recipe::project::ProjectGraph;
use build_recipe::resolver::DependencyResolver;

use crate::cli::GlobalArgs;
use crate::commands::{load_manifest, workspace_root};

/// Validate the workspace manifest
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Use strict validation (fail on warnings).
    #[arg(long)]
    pub strict: bool,
}

/// Execute the `validate` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `global` - Global options; `--color` controls emoji output
pub fn execute(args: ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(&global.color);
    let config_path = &global.config;
    println!(
        "{} Validating manifest: {}",
        emoji(&out, "🔍", "[SCAN]"),
        config_path.display()
    );

    let manifest = match load_manifest(config_path) {
        Ok(manifest) => {
            println!("{} Manifest parsed successfully", emoji(&out, "✅", "[OK]"));
            manifest
        }
        Err(e) => {
            println!("{} Manifest parsing failed: {}", emoji(&out, "❌", "[ERR]"), e);
            return Err(e);
        }
    };

    let root = workspace_root(config_path, global.root.as_deref())?;
    let graph = match manifest.graph(&root) {
        Ok(graph) => graph,
        Err(e) => {
            println!("{} Invalid project graph: {}", emoji(&out, "❌", "[ERR]"), e);
            return Err(anyhow::anyhow!("Manifest validation failed"));
        }
    };

    println!("\n{} Workspace Summary:", emoji(&out, "📊", "[INFO]"));
    println!("   Root: {}", root.display());
    println!("   Declared projects: {}", manifest.projects.len());
    println!(
        "   Projects including implied parents: {}",
        graph.len()
    );
    println!("   Recipes: {}", manifest.recipes.len());
    println!("   Change log classifiers: {}", manifest.git_log.classifiers.len());

    println!(
        "\n{} Checking for circular dependencies...",
        emoji(&out, "🔄", "[CHECK]")
    );
    let mut has_errors = false;
    let mut resolver = DependencyResolver::new(&graph);
    for project in graph.all_projects() {
        match resolver.closure_of(project.id()) {
            Ok(_) => {}
            Err(Error::CycleDetected { cycle }) => {
                println!(
                    "{} Circular dependency detected: {}",
                    emoji(&out, "❌", "[ERR]"),
                    cycle
                );
                has_errors = true;
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    if !has_errors {
        println!(
            "{} No circular dependencies detected",
            emoji(&out, "✅", "[OK]")
        );
    }

    println!("\n{} Checking selectors...", emoji(&out, "🔍", "[SCAN]"));
    let warnings = unused_selectors(&manifest, &graph);
    for warning in &warnings {
        println!(
            "{} {}",
            emoji(&out, "⚠️", "[WARN]"),
            output::matcher(&out, warning)
        );
    }
    if warnings.is_empty() {
        println!(
            "{} Every selector matches at least one project",
            emoji(&out, "✅", "[OK]")
        );
    }

    println!("\n{} Validation Result:", emoji(&out, "🎯", "[RESULT]"));

    if has_errors {
        println!(
            "{} Manifest has errors that must be fixed",
            emoji(&out, "❌", "[ERR]")
        );
        return Err(anyhow::anyhow!("Manifest validation failed"));
    }

    if !warnings.is_empty() && args.strict {
        println!(
            "{} Manifest has warnings (strict mode enabled)",
            emoji(&out, "❌", "[ERR]")
        );
        return Err(anyhow::anyhow!("Manifest validation failed in strict mode"));
    }

    if warnings.is_empty() {
        println!("{} Manifest is valid", emoji(&out, "✅", "[OK]"));
    } else {
        println!(
            "{} Manifest is valid but has warnings",
            emoji(&out, "⚠️", "[WARN]")
        );
    }

    Ok(())
}

/// Recipes, classifiers and the affected filter that select nothing.
fn unused_selectors(manifest: &Manifest, graph: &ProjectGraph) -> Vec<String> {
    let mut warnings = Vec::new();

    for (index, recipe) in manifest.recipes.iter().enumerate() {
        if !graph.all_projects().any(|p| recipe.when.matches(p)) {
            warnings.push(format!(
                "recipe #{} ({}) matches no project",
                index + 1,
                recipe.when
            ));
        }
    }

    for (name, matcher) in &manifest.git_log.classifiers {
        if !graph.subprojects().any(|p| matcher.matches(p)) {
            warnings.push(format!(
                "classifier '{}' ({}) matches no module",
                name, matcher
            ));
        }
    }

    if let Some(filter) = &manifest.affected_modules.filter {
        if !graph.subprojects().any(|p| filter.matches(p)) {
            warnings.push(format!("affected-modules filter ({}) matches no module", filter));
        }
    }

    warnings
}
