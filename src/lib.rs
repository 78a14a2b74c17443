//! # Build Recipe Library
//!
//! This library provides the core functionality behind the `build-recipe`
//! command-line tool: selecting projects of a multi-module workspace by their
//! declared type and labels, applying configuration to the selection, and
//! scoping version-control history to each module and everything it depends
//! on.
//!
//! ## Quick Example
//!
//! ```
//! use build_recipe::config;
//! use build_recipe::matcher::Matcher;
//! use build_recipe::resolver::DependencyResolver;
//! use std::path::Path;
//!
//! let manifest = config::parse(r#"
//! projects:
//!   - path: coffee:api:client
//!     type: java-boot-lib
//!     dependencies: [coffee:api:protocol]
//!   - path: coffee:api:protocol
//!     type: java-lib
//! "#).unwrap();
//! let graph = manifest.graph(Path::new("/work/shop")).unwrap();
//!
//! let libs: Vec<&str> = graph
//!     .subprojects()
//!     .filter(|p| Matcher::by_type_suffix("lib").matches(p))
//!     .map(|p| p.path())
//!     .collect();
//! assert_eq!(libs, vec![":coffee:api:client", ":coffee:api:protocol"]);
//!
//! let mut resolver = DependencyResolver::new(&graph);
//! let client = graph.find("coffee:api:client").unwrap();
//! assert_eq!(resolver.closure_of(client.id()).unwrap().len(), 2);
//! ```
//!
//! ## Core Concepts
//!
//! - **Projects (`project`)**: The read-only workspace graph, built from the
//!   manifest, with implied parent projects and a stable enumeration order.
//! - **Matchers (`matcher`)**: Composable predicates over a project's type
//!   and labels.
//! - **Recipes (`recipe`)**: Applies actions to the projects a matcher
//!   selects and keeps a per-project audit trail.
//! - **Resolution (`resolver`)**: Memoized dependency closures with cycle
//!   detection.
//! - **History (`git`, `changelog`, `affected`)**: Revision ranges, scoped
//!   change logs, and affected-module detection on top of the `git` binary.
//! - **Configuration (`config`, `defaults`)**: The `build-recipe.yaml`
//!   manifest and its default values.

pub mod affected;
pub mod changelog;
pub mod config;
pub mod defaults;
pub mod error;
pub mod git;
pub mod matcher;
pub mod output;
pub mod project;
pub mod recipe;
pub mod resolver;
pub mod suggestions;

#[cfg(test)]
mod matcher_proptest;
