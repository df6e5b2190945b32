//! Configurator session: document loading, planning and branch extraction.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use pt_core::{InstanceId, Phase};
use pt_graph::{Branch, Graph};
use pt_plan::{AssemblyPlan, PlanOptions};
use pt_registry::Registry;
use pt_schema::ArchitectureDoc;

use crate::cache::{FileIdentity, GraphCache, MemoryCache};
use crate::error::AppResult;

/// Summary of a built graph for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSummary {
    pub name: String,
    pub instance_count: usize,
    pub connection_count: usize,
    pub branch_count: usize,
    pub control_parameter_count: usize,
}

/// One caller's view of the configurator.
///
/// Every operation takes the document path and works on the graph built from
/// it; graphs come from the cache while the file identity is unchanged.
pub struct Configurator<C: GraphCache = MemoryCache> {
    registry: Registry,
    cache: C,
}

impl Configurator<MemoryCache> {
    /// Standard registry with an in-memory cache.
    pub fn with_defaults() -> Self {
        Self::new(Registry::standard(), MemoryCache::new())
    }
}

impl<C: GraphCache> Configurator<C> {
    pub fn new(registry: Registry, cache: C) -> Self {
        Self { registry, cache }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Load and build the graph for `path`, memoized by file identity.
    pub fn load_graph(&self, path: &Path) -> AppResult<Arc<Graph>> {
        let identity = FileIdentity::of(path)?;
        if let Some(graph) = self.cache.get(&identity) {
            tracing::debug!(path = %identity.path.display(), "graph cache hit");
            return Ok(graph);
        }

        let doc = pt_schema::load(&identity.path)?;
        let graph = Arc::new(pt_graph::build(&doc, &self.registry)?);
        tracing::info!(
            path = %identity.path.display(),
            name = graph.name(),
            "loaded architecture"
        );
        self.cache.insert(identity, Arc::clone(&graph));
        Ok(graph)
    }

    /// Drop any cached graph for `path`, then load it again.
    pub fn reload(&self, path: &Path) -> AppResult<Arc<Graph>> {
        let identity = FileIdentity::of(path)?;
        let dropped = self.cache.invalidate(&identity.path);
        tracing::debug!(path = %identity.path.display(), dropped, "invalidated cached graph");
        self.load_graph(path)
    }

    pub fn summarize(&self, path: &Path) -> AppResult<GraphSummary> {
        let graph = self.load_graph(path)?;
        Ok(GraphSummary {
            name: graph.name().to_string(),
            instance_count: graph.instances().len(),
            connection_count: graph.connections().len(),
            branch_count: pt_graph::partition(&graph).len(),
            control_parameter_count: graph.control_parameters().len(),
        })
    }

    pub fn plan(&self, path: &Path, options: &PlanOptions) -> AppResult<AssemblyPlan> {
        let graph = self.load_graph(path)?;
        Ok(AssemblyPlan::build(&graph, &self.registry, options)?)
    }

    pub fn partition(&self, path: &Path) -> AppResult<Vec<Branch>> {
        let graph = self.load_graph(path)?;
        Ok(pt_graph::partition(&graph))
    }

    /// The branch containing `seed`, with its standalone document.
    pub fn extract_branch(
        &self,
        path: &Path,
        seed: &InstanceId,
    ) -> AppResult<(Branch, ArchitectureDoc)> {
        let graph = self.load_graph(path)?;
        let branch = pt_graph::extract_single_branch(&graph, seed)?;
        let doc = pt_graph::reduced_document(&graph, &branch);
        Ok((branch, doc))
    }

    /// Write the reduced document for `seed`'s branch to `out`.
    ///
    /// This is the only write the configurator performs. The caller owns `out`.
    pub fn write_reduced(&self, path: &Path, seed: &InstanceId, out: &Path) -> AppResult<Branch> {
        let (branch, doc) = self.extract_branch(path, seed)?;
        pt_schema::save(out, &doc)?;
        tracing::info!(
            out = %out.display(),
            instances = branch.nodes.len(),
            "wrote reduced architecture"
        );
        Ok(branch)
    }

    pub fn rename_control_parameters(
        &self,
        path: &Path,
        phase: Phase,
    ) -> AppResult<BTreeMap<String, String>> {
        let graph = self.load_graph(path)?;
        Ok(pt_plan::rename_control_parameters(graph.control_parameters(), phase)?)
    }
}
