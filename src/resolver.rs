//! # Dependency Closure Resolution
//!
//! Computes, for any project, the set of in-tree projects it reaches through
//! declared dependency edges, itself included. Results are memoized for the
//! lifetime of one [`DependencyResolver`], so each project is resolved once per
//! run no matter how many modules share it.
//!
//! The dependency relation is expected to be acyclic. A cycle is reported as
//! [`Error::CycleDetected`] with the offending path rather than looping.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use log::debug;

use crate::error::{Error, Result};
use crate::project::{ProjectGraph, ProjectId};

/// Memoizing resolver of dependency closures over one [`ProjectGraph`].
#[derive(Debug)]
pub struct DependencyResolver<'g> {
    graph: &'g ProjectGraph,
    cache: HashMap<ProjectId, BTreeSet<ProjectId>>,
}

impl<'g> DependencyResolver<'g> {
    pub fn new(graph: &'g ProjectGraph) -> Self {
        Self {
            graph,
            cache: HashMap::new(),
        }
    }

    pub fn graph(&self) -> &'g ProjectGraph {
        self.graph
    }

    /// The reflexive-transitive dependency closure of `id`.
    pub fn closure_of(&mut self, id: ProjectId) -> Result<BTreeSet<ProjectId>> {
        let mut path = Vec::new();
        self.resolve(id, &mut path)
    }

    /// Directories of every project in the closure of `id`, in enumeration order.
    pub fn closure_dirs(&mut self, id: ProjectId) -> Result<Vec<PathBuf>> {
        let graph = self.graph;
        Ok(self
            .closure_of(id)?
            .into_iter()
            .map(|dep| graph.get(dep).dir().to_path_buf())
            .collect())
    }

    /// Number of projects resolved so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn resolve(&mut self, id: ProjectId, path: &mut Vec<ProjectId>) -> Result<BTreeSet<ProjectId>> {
        if let Some(cached) = self.cache.get(&id) {
            return Ok(cached.clone());
        }

        let graph = self.graph;
        if path.contains(&id) {
            let mut cycle: Vec<&str> = path.iter().map(|p| graph.get(*p).path()).collect();
            cycle.push(graph.get(id).path());
            return Err(Error::CycleDetected {
                cycle: cycle.join(" -> "),
            });
        }

        let project = graph.get(id);
        path.push(id);

        let mut closure = BTreeSet::new();
        for dep in graph.direct_dependencies(id) {
            debug!("[{}] has project dependency [{}]", project, graph.get(dep));
            closure.extend(self.resolve(dep, path)?);
        }
        closure.insert(id);

        path.pop();

        debug!(
            "resolved dependency dirs for {} is [\n {}\n]",
            project,
            closure
                .iter()
                .map(|p| graph.get(*p).dir().display().to_string())
                .collect::<Vec<_>>()
                .join("\n ")
        );

        self.cache.insert(id, closure.clone());
        Ok(closure)
    }
}
