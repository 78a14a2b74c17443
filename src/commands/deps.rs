//! # Deps Command Implementation
//!
//! This module implements the `deps` subcommand, which displays the
//! dependency closure of one project, either as a tree of declared
//! dependencies or as the flat, ordered closure used to scope history.
//!
//! This command is a safe, read-only operation that does not modify any files.

use std::borrow::Cow;

use anyhow::Result;
use clap::Args;
use ptree::{print_tree, TreeItem};

use build_recipe::project::{ProjectGraph, ProjectId};
use build_recipe::resolver::DependencyResolver;
use build_recipe::suggestions;

use crate::cli::GlobalArgs;
use crate::commands::Workspace;

/// Show the dependency closure of a project
#[derive(Args, Debug)]
pub struct DepsArgs {
    /// Project path, e.g. `:coffee:api:client`
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// Print the closure as a flat list with directories instead of a tree
    #[arg(long)]
    pub flat: bool,
}

/// Execute the `deps` command.
pub fn execute(args: DepsArgs, global: &GlobalArgs) -> Result<()> {
    let workspace = Workspace::load(global)?;
    let graph = &workspace.graph;

    let project = graph.find(&args.project).ok_or_else(|| {
        suggestions::unknown_project(&args.project, graph.all_projects().map(|p| p.path()))
    })?;

    // Resolving first surfaces cycles before the tree walk
    let mut resolver = DependencyResolver::new(graph);
    let closure = resolver
        .closure_of(project.id())
        .map_err(suggestions::explain)?;

    if args.flat {
        for id in closure {
            let dep = graph.get(id);
            println!("{}\t{}", dep.path(), dep.dir().display());
        }
    } else {
        let tree = DepNode::build(graph, project.id());
        print_tree(&tree).map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;
    }
    Ok(())
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct DepNode {
    label: String,
    children: Vec<DepNode>,
}

impl DepNode {
    /// Expand `id` and its declared dependencies. The graph must be acyclic
    /// from `id`.
    fn build(graph: &ProjectGraph, id: ProjectId) -> Self {
        let project = graph.get(id);
        let label = match project.project_type() {
            Some(project_type) => format!("{} ({})", project.path(), project_type),
            None => project.path().to_string(),
        };
        let children = graph
            .direct_dependencies(id)
            .into_iter()
            .map(|dep| DepNode::build(graph, dep))
            .collect();
        DepNode { label, children }
    }
}

impl TreeItem for DepNode {
    type Child = DepNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}
