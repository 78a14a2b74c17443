//! # Build Recipes
//!
//! Applies configuration actions to every project selected by a [`Matcher`]
//! and keeps, per project, an audit trail of the matchers that selected it.
//!
//! ```
//! use build_recipe::matcher::Matcher;
//! use build_recipe::project::{ProjectDecl, ProjectGraph};
//! use build_recipe::recipe::BuildRecipe;
//!
//! let graph = ProjectGraph::new(
//!     "/work",
//!     vec![ProjectDecl::new("coffee:api:client").with_type("java-boot-lib")],
//! )
//! .unwrap();
//!
//! let mut recipe = BuildRecipe::new(&graph);
//! let mut configured = Vec::new();
//! recipe.configure(&Matcher::by_type_prefix("java"), |p| configured.push(p.path().to_string()));
//!
//! assert_eq!(configured, vec![":coffee:api:client"]);
//! ```

use std::collections::BTreeMap;

use log::info;
use serde::Deserialize;

use crate::error::Result;
use crate::matcher::Matcher;
use crate::project::{ProjectGraph, ProjectId, ProjectNode};

/// Outcome of one [`BuildRecipe::configure`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationBinding {
    pub description: String,
    pub matched: Vec<ProjectId>,
}

/// A manifest recipe: properties applied to every project matching `when`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeSpec {
    pub when: Matcher,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Properties resolved per project by [`BuildRecipe::apply`].
pub type ProjectSettings = BTreeMap<ProjectId, BTreeMap<String, String>>;

/// Dispatches configuration actions over a [`ProjectGraph`].
#[derive(Debug)]
pub struct BuildRecipe<'g> {
    graph: &'g ProjectGraph,
    audit: Vec<Vec<String>>,
}

impl<'g> BuildRecipe<'g> {
    pub fn new(graph: &'g ProjectGraph) -> Self {
        Self {
            graph,
            audit: vec![Vec::new(); graph.len()],
        }
    }

    pub fn graph(&self) -> &'g ProjectGraph {
        self.graph
    }

    /// Run `action` on every project `matcher` selects, root included, in
    /// enumeration order, and record the matcher in each project's audit trail.
    pub fn configure<F>(&mut self, matcher: &Matcher, mut action: F) -> ConfigurationBinding
    where
        F: FnMut(&ProjectNode),
    {
        let description = matcher.description();
        let mut matched = Vec::new();

        let graph = self.graph;
        for project in graph.all_projects().filter(|p| matcher.matches(p)) {
            info!("{} is configured by {}", project, description);
            action(project);
            self.audit[project.id().index()].push(description.clone());
            matched.push(project.id());
        }

        ConfigurationBinding {
            description,
            matched,
        }
    }

    pub fn configure_by_type<F>(&mut self, project_type: &str, action: F) -> ConfigurationBinding
    where
        F: FnMut(&ProjectNode),
    {
        self.configure(&Matcher::by_type(project_type), action)
    }

    pub fn configure_by_type_prefix<F>(&mut self, prefix: &str, action: F) -> ConfigurationBinding
    where
        F: FnMut(&ProjectNode),
    {
        self.configure(&Matcher::by_type_prefix(prefix), action)
    }

    pub fn configure_by_type_suffix<F>(&mut self, suffix: &str, action: F) -> ConfigurationBinding
    where
        F: FnMut(&ProjectNode),
    {
        self.configure(&Matcher::by_type_suffix(suffix), action)
    }

    /// Fails before touching any project when `pattern` is not a valid regex.
    pub fn configure_by_type_expression<F>(
        &mut self,
        pattern: &str,
        action: F,
    ) -> Result<ConfigurationBinding>
    where
        F: FnMut(&ProjectNode),
    {
        let matcher = Matcher::by_type_regex(pattern)?;
        Ok(self.configure(&matcher, action))
    }

    pub fn configure_by_type_having<F>(&mut self, typelets: &[&str], action: F) -> ConfigurationBinding
    where
        F: FnMut(&ProjectNode),
    {
        self.configure(&Matcher::by_type_having(typelets.iter().copied()), action)
    }

    pub fn configure_by_label<F>(&mut self, label: &str, action: F) -> ConfigurationBinding
    where
        F: FnMut(&ProjectNode),
    {
        self.configure(&Matcher::by_label(label), action)
    }

    pub fn configure_by_labels<F>(&mut self, labels: &[&str], action: F) -> ConfigurationBinding
    where
        F: FnMut(&ProjectNode),
    {
        self.configure(&Matcher::by_labels(labels.iter().copied()), action)
    }

    /// Apply manifest recipes in order; later recipes override earlier keys.
    pub fn apply(&mut self, recipes: &[RecipeSpec]) -> ProjectSettings {
        let mut settings = ProjectSettings::new();
        for recipe in recipes {
            self.configure(&recipe.when, |project| {
                let entry = settings.entry(project.id()).or_default();
                for (key, value) in &recipe.properties {
                    entry.insert(key.clone(), value.clone());
                }
            });
        }
        settings
    }

    /// Matcher descriptions recorded for `id`, oldest first.
    pub fn bindings_of(&self, id: ProjectId) -> &[String] {
        &self.audit[id.index()]
    }

    /// `<project> is configured by \n[\n  d1\n  d2\n]`, or `None` when the
    /// project was never configured.
    pub fn project_report(&self, id: ProjectId) -> Option<String> {
        let bindings = self.bindings_of(id);
        if bindings.is_empty() {
            return None;
        }
        Some(format!(
            "{} is configured by \n[\n  {}\n]",
            self.graph.get(id),
            bindings.join("\n  ")
        ))
    }

    /// One block per configured project, in enumeration order:
    /// `<project> is configured by \n - d1\n - d2`.
    pub fn all_project_report(&self) -> Vec<String> {
        self.graph
            .all_projects()
            .filter(|p| !self.bindings_of(p.id()).is_empty())
            .map(|p| {
                let lines: Vec<String> = self
                    .bindings_of(p.id())
                    .iter()
                    .map(|d| format!(" - {}", d))
                    .collect();
                format!("{} is configured by \n{}", p, lines.join("\n"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectDecl;

    fn workspace() -> ProjectGraph {
        ProjectGraph::new(
            "/work/shop",
            vec![
                ProjectDecl::new("coffee:api:client").with_type("java-boot-lib"),
                ProjectDecl::new("coffee:api:protocol").with_type("java-lib"),
                ProjectDecl::new("coffee:api:server").with_type("java-boot-application"),
                ProjectDecl::new("juice:api:client").with_type("java-boot-lib"),
                ProjectDecl::new("juice:api:protocol").with_type("java-lib"),
                ProjectDecl::new("juice:api:server").with_type("java-boot-application"),
            ],
        )
        .unwrap()
    }

    fn configure_all(recipe: &mut BuildRecipe<'_>) {
        recipe.configure_by_type_prefix("java", |_| {});
        recipe.configure(
            &Matcher::by_type_prefix("java").and(Matcher::by_type_suffix("lib")),
            |_| {},
        );
        recipe.configure_by_type_having(&["boot"], |_| {});
        recipe.configure_by_type_suffix("boot-lib", |_| {});
        recipe.configure_by_type_suffix("boot-application", |_| {});
    }

    #[test]
    fn test_audit_records_descriptions_in_order() {
        let graph = workspace();
        let mut recipe = BuildRecipe::new(&graph);
        configure_all(&mut recipe);

        let client = graph.find("coffee:api:client").unwrap().id();
        assert_eq!(
            recipe.bindings_of(client),
            &[
                "type prefix [java]",
                "and(type prefix [java], type suffix [lib])",
                "type having [boot]",
                "type suffix [boot-lib]",
            ]
        );
    }

    #[test]
    fn test_action_runs_in_enumeration_order() {
        let graph = workspace();
        let mut recipe = BuildRecipe::new(&graph);

        let mut seen = Vec::new();
        let binding = recipe.configure_by_type_having(&["boot"], |p| seen.push(p.path().to_string()));

        assert_eq!(
            seen,
            vec![
                ":coffee:api:client",
                ":coffee:api:server",
                ":juice:api:client",
                ":juice:api:server",
            ]
        );
        assert_eq!(binding.description, "type having [boot]");
        assert_eq!(binding.matched.len(), 4);
    }

    #[test]
    fn test_unmatched_configure_records_nothing() {
        let graph = workspace();
        let mut recipe = BuildRecipe::new(&graph);
        let binding = recipe.configure_by_label("dockerized", |_| panic!("no project is labelled"));

        assert!(binding.matched.is_empty());
        assert!(graph.all_projects().all(|p| recipe.bindings_of(p.id()).is_empty()));
        assert!(recipe.all_project_report().is_empty());
    }

    #[test]
    fn test_invalid_expression_fails_before_configuring() {
        let graph = workspace();
        let mut recipe = BuildRecipe::new(&graph);
        let result = recipe.configure_by_type_expression("java-(", |_| panic!("not reached"));
        assert!(result.is_err());

        let binding = recipe
            .configure_by_type_expression(".*-application", |_| {})
            .unwrap();
        assert_eq!(binding.matched.len(), 2);
    }

    #[test]
    fn test_project_report() {
        let graph = workspace();
        let mut recipe = BuildRecipe::new(&graph);
        configure_all(&mut recipe);

        let server = graph.find("coffee:api:server").unwrap().id();
        assert_eq!(
            recipe.project_report(server).unwrap(),
            "project ':coffee:api:server' is configured by \n[\n  type prefix [java]\n  type having [boot]\n  type suffix [boot-application]\n]"
        );
        assert!(recipe.project_report(graph.root().id()).is_none());
    }

    #[test]
    fn test_all_project_report() {
        let graph = workspace();
        let mut recipe = BuildRecipe::new(&graph);
        configure_all(&mut recipe);

        let report = recipe.all_project_report();
        assert_eq!(report.len(), 6);
        assert_eq!(
            report[0],
            "project ':coffee:api:client' is configured by \n - type prefix [java]\n - and(type prefix [java], type suffix [lib])\n - type having [boot]\n - type suffix [boot-lib]"
        );
        assert_eq!(
            report[1],
            "project ':coffee:api:protocol' is configured by \n - type prefix [java]\n - and(type prefix [java], type suffix [lib])"
        );
    }

    #[test]
    fn test_apply_recipes_merges_properties() {
        let graph = workspace();
        let recipes: Vec<RecipeSpec> = serde_yaml::from_str(
            r#"
- when: { type-prefix: java }
  properties: { java.version: "17", packaging: jar }
- when: { type-suffix: application }
  properties: { packaging: boot-jar }
"#,
        )
        .unwrap();

        let mut recipe = BuildRecipe::new(&graph);
        let settings = recipe.apply(&recipes);

        let server = graph.find("juice:api:server").unwrap().id();
        let protocol = graph.find("juice:api:protocol").unwrap().id();
        assert_eq!(settings[&server]["packaging"], "boot-jar");
        assert_eq!(settings[&server]["java.version"], "17");
        assert_eq!(settings[&protocol]["packaging"], "jar");
        assert!(!settings.contains_key(&graph.root().id()));
        assert_eq!(recipe.bindings_of(server).len(), 2);
    }
}
