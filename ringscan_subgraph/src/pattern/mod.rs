//! Pattern definition: the structural motif to search for.
//!
//! A pattern is a small directed graph plus optional attribute predicates on
//! its nodes and edges. No search logic lives here.

mod predicate;
mod registry;

pub use predicate::{AttrEquals, AttrPredicate, TargetFilter, target_filter};
pub use registry::{CIRCULAR, PatternRegistry};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::SubgraphError;
use crate::graph::{Graph, NodeId, NodeIdx};

/// A predicate shared between clones of a pattern and across worker threads.
type SharedPredicate = Arc<dyn AttrPredicate>;

/// A search template with optional attribute predicates.
#[derive(Clone)]
pub struct Pattern<P> {
    graph: Graph<P>,
    node_predicates: HashMap<NodeIdx, SharedPredicate>,
    edge_predicates: HashMap<(NodeIdx, NodeIdx), SharedPredicate>,
}

impl<P: NodeId> fmt::Debug for Pattern<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("graph", &self.graph)
            .field("node_predicates", &self.node_predicates.len())
            .field("edge_predicates", &self.edge_predicates.len())
            .finish()
    }
}

impl<P: NodeId> Pattern<P> {
    /// Wrap a graph as a pattern without predicates.
    #[must_use]
    pub fn new(graph: Graph<P>) -> Self {
        Self {
            graph,
            node_predicates: HashMap::new(),
            edge_predicates: HashMap::new(),
        }
    }

    /// The pattern's structure.
    #[must_use]
    pub const fn graph(&self) -> &Graph<P> {
        &self.graph
    }

    /// Number of pattern nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of pattern edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether any predicate is registered.
    #[must_use]
    pub fn has_predicates(&self) -> bool {
        !self.node_predicates.is_empty() || !self.edge_predicates.is_empty()
    }

    /// Attach a predicate to a pattern node. Replaces any previous one.
    ///
    /// # Errors
    /// [`SubgraphError::InvalidPattern`] if `node` is not in the pattern.
    pub fn with_node_predicate(
        mut self,
        node: &P,
        predicate: impl AttrPredicate + 'static,
    ) -> Result<Self, SubgraphError> {
        let idx = self.graph.index_of(node).ok_or_else(|| {
            SubgraphError::invalid_pattern(format!("predicate on unknown node {node:?}"))
        })?;
        self.node_predicates.insert(idx, Arc::new(predicate));
        Ok(self)
    }

    /// Attach a predicate to a pattern edge. Replaces any previous one.
    ///
    /// # Errors
    /// [`SubgraphError::InvalidPattern`] if `src -> dst` is not a pattern edge.
    pub fn with_edge_predicate(
        mut self,
        src: &P,
        dst: &P,
        predicate: impl AttrPredicate + 'static,
    ) -> Result<Self, SubgraphError> {
        let key = match (self.graph.index_of(src), self.graph.index_of(dst)) {
            (Some(s), Some(d)) if self.graph.has_edge_idx(s, d) => (s, d),
            _ => {
                return Err(SubgraphError::invalid_pattern(format!(
                    "predicate on unknown edge {src:?} -> {dst:?}"
                )));
            }
        };
        self.edge_predicates.insert(key, Arc::new(predicate));
        Ok(self)
    }

    /// Check that the pattern can be searched for.
    ///
    /// # Errors
    /// [`SubgraphError::InvalidPattern`] if the pattern has no nodes or a
    /// predicate points outside it.
    pub fn validate(&self) -> Result<(), SubgraphError> {
        if self.graph.is_empty() {
            return Err(SubgraphError::invalid_pattern("pattern has no nodes"));
        }
        let n = self.graph.node_count();
        if let Some(idx) = self.node_predicates.keys().find(|i| i.as_usize() >= n) {
            return Err(SubgraphError::invalid_pattern(format!(
                "node predicate on missing node {idx}"
            )));
        }
        if let Some((s, d)) = self
            .edge_predicates
            .keys()
            .find(|(s, d)| !self.graph.has_edge_idx(*s, *d))
        {
            return Err(SubgraphError::invalid_pattern(format!(
                "edge predicate on missing edge {s} -> {d}"
            )));
        }
        Ok(())
    }

    /// The same structure with every predicate dropped.
    #[must_use]
    pub fn structural(&self) -> Self {
        Self::new(self.graph.clone())
    }

    pub(crate) fn node_predicate(&self, idx: NodeIdx) -> Option<&dyn AttrPredicate> {
        self.node_predicates.get(&idx).map(|p| p.as_ref())
    }

    pub(crate) fn edge_predicate(&self, s: NodeIdx, d: NodeIdx) -> Option<&dyn AttrPredicate> {
        self.edge_predicates.get(&(s, d)).map(|p| p.as_ref())
    }
}

impl Pattern<usize> {
    /// The directed n-cycle: nodes `0..n`, edges `i -> (i + 1) mod n`.
    ///
    /// `n == 1` is a single node with a self-loop; `n == 0` is the empty
    /// pattern, which only validates when empty patterns are allowed.
    #[must_use]
    pub fn directed_cycle(n: usize) -> Self {
        let mut graph = Graph::new();
        for i in 0..n {
            graph.add_node(i);
        }
        let ring: Vec<usize> = (0..n).collect();
        Self::new(graph.with_cycle(&ring, &Default::default()))
    }

    /// A pattern over nodes `0..nodes` with the given edges.
    ///
    /// # Errors
    /// [`SubgraphError::UnknownNode`] if an edge endpoint is `>= nodes`.
    pub fn from_edges(nodes: usize, edges: &[(usize, usize)]) -> Result<Self, SubgraphError> {
        let mut graph = Graph::new();
        for i in 0..nodes {
            graph.add_node(i);
        }
        for &(s, d) in edges {
            graph.add_edge(s, d)?;
        }
        Ok(Self::new(graph))
    }
}
