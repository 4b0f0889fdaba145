//! Directed graph model shared by targets and patterns.
//!
//! Nodes are opaque caller identifiers (integers, strings, ...) registered in
//! insertion order; each one gets a dense [`NodeIdx`] that the matcher uses
//! for array access. At most one edge exists per ordered pair of nodes.

mod attrs;
mod node_idx;

pub use attrs::{AttrValue, Attrs, attrs};
pub use node_idx::NodeIdx;

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::error::SubgraphError;

/// Requirements on caller node identifiers.
///
/// `Send + Sync` lets one graph be shared by parallel search workers.
pub trait NodeId: Clone + Eq + Hash + Ord + Debug + Send + Sync {}

impl<T: Clone + Eq + Hash + Ord + Debug + Send + Sync> NodeId for T {}

/// What `add_edge` does with an endpoint that was never added.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EndpointPolicy {
    /// Fail with [`SubgraphError::UnknownNode`].
    #[default]
    Reject,
    /// Add the missing endpoint silently.
    AutoAdd,
}

/// Per-node storage: attributes plus both adjacency directions.
#[derive(Clone, Debug, Default)]
struct NodeEntry {
    attrs: Attrs,
    succ: Vec<NodeIdx>,
    pred: Vec<NodeIdx>,
}

/// A directed graph with optional node and edge attributes.
///
/// Nodes are addressed internally by 32-bit positions, so a graph holds at
/// most `u32::MAX + 1` nodes.
#[derive(Clone, Debug)]
pub struct Graph<N> {
    /// Node id -> entry, in insertion order. The position is the `NodeIdx`.
    nodes: IndexMap<N, NodeEntry>,
    /// Edge set keyed by dense endpoints.
    edges: HashMap<(NodeIdx, NodeIdx), Attrs>,
    policy: EndpointPolicy,
}

/// Checked position of a node about to be stored.
fn position(index: usize) -> NodeIdx {
    NodeIdx::checked(index)
        .unwrap_or_else(|| panic!("graph is limited to {} nodes", u64::from(u32::MAX) + 1))
}

impl<N: NodeId> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeId> Graph<N> {
    /// Create an empty graph that rejects edges to unknown nodes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(EndpointPolicy::Reject)
    }

    /// Create an empty graph with the given endpoint policy.
    #[must_use]
    pub fn with_policy(policy: EndpointPolicy) -> Self {
        Self {
            nodes: IndexMap::new(),
            edges: HashMap::new(),
            policy,
        }
    }

    /// Build a graph from an edge list, adding endpoints as they appear.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut graph = Self::new();
        for (src, dst) in edges {
            let s = graph.add_node(src);
            let d = graph.add_node(dst);
            graph.insert_edge(s, d, Attrs::new());
        }
        graph
    }

    /// The endpoint policy fixed at construction.
    #[must_use]
    pub const fn policy(&self) -> EndpointPolicy {
        self.policy
    }

    /// Add a node. Adding an existing node is a no-op.
    ///
    /// # Panics
    /// If the graph is full (see [`Graph`]).
    pub fn add_node(&mut self, id: N) -> NodeIdx {
        let entry = self.nodes.entry(id);
        let idx = position(entry.index());
        entry.or_default();
        idx
    }

    /// Add a node, merging `attrs` into any attributes it already has.
    ///
    /// # Panics
    /// If the graph is full (see [`Graph`]).
    pub fn add_node_with(&mut self, id: N, attrs: Attrs) -> NodeIdx {
        let entry = self.nodes.entry(id);
        let idx = position(entry.index());
        entry.or_default().attrs.extend(attrs);
        idx
    }

    /// Add the edge `src -> dst`.
    ///
    /// # Errors
    /// [`SubgraphError::UnknownNode`] if an endpoint is missing and the policy
    /// is [`EndpointPolicy::Reject`].
    pub fn add_edge(&mut self, src: N, dst: N) -> Result<(), SubgraphError> {
        self.add_edge_with(src, dst, Attrs::new())
    }

    /// Add the edge `src -> dst` carrying `attrs`. If the edge already exists
    /// its attributes are merged; no second edge is created.
    ///
    /// # Errors
    /// [`SubgraphError::UnknownNode`] if an endpoint is missing and the policy
    /// is [`EndpointPolicy::Reject`].
    pub fn add_edge_with(&mut self, src: N, dst: N, attrs: Attrs) -> Result<(), SubgraphError> {
        let s = self.resolve_endpoint(src)?;
        let d = self.resolve_endpoint(dst)?;
        self.insert_edge(s, d, attrs);
        Ok(())
    }

    fn resolve_endpoint(&mut self, id: N) -> Result<NodeIdx, SubgraphError> {
        match (self.index_of(&id), self.policy) {
            (Some(idx), _) => Ok(idx),
            (None, EndpointPolicy::AutoAdd) => Ok(self.add_node(id)),
            (None, EndpointPolicy::Reject) => Err(SubgraphError::unknown_node(&id)),
        }
    }

    fn insert_edge(&mut self, s: NodeIdx, d: NodeIdx, attrs: Attrs) {
        if let Some(existing) = self.edges.get_mut(&(s, d)) {
            existing.extend(attrs);
            return;
        }
        self.edges.insert((s, d), attrs);
        self.nodes[s.as_usize()].succ.push(d);
        self.nodes[d.as_usize()].pred.push(s);
    }

    /// Return a new graph with the directed ring
    /// `nodes[0] -> nodes[1] -> ... -> nodes[0]` added, each ring edge
    /// carrying `attrs`. Missing ring members are added as nodes.
    #[must_use]
    pub fn with_cycle(&self, nodes: &[N], attrs: &Attrs) -> Self {
        let mut graph = self.clone();
        let ring: Vec<NodeIdx> = nodes.iter().map(|n| graph.add_node(n.clone())).collect();
        for (i, &s) in ring.iter().enumerate() {
            let d = ring[(i + 1) % ring.len()];
            graph.insert_edge(s, d, attrs.clone());
        }
        tracing::debug!("injected ring of {} nodes: {:?}", nodes.len(), nodes);
        graph
    }

    /// Whether the edge `src -> dst` exists.
    #[must_use]
    pub fn has_edge(&self, src: &N, dst: &N) -> bool {
        match (self.index_of(src), self.index_of(dst)) {
            (Some(s), Some(d)) => self.has_edge_idx(s, d),
            _ => false,
        }
    }

    /// Whether `id` is a node of this graph.
    #[must_use]
    pub fn contains_node(&self, id: &N) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes reachable over one outgoing edge. Empty for unknown nodes.
    #[must_use]
    pub fn successors(&self, id: &N) -> Vec<&N> {
        self.index_of(id)
            .map(|i| self.succ(i).iter().map(|&j| self.id_of(j)).collect())
            .unwrap_or_default()
    }

    /// Nodes with an edge into `id`. Empty for unknown nodes.
    #[must_use]
    pub fn predecessors(&self, id: &N) -> Vec<&N> {
        self.index_of(id)
            .map(|i| self.pred(i).iter().map(|&j| self.id_of(j)).collect())
            .unwrap_or_default()
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.keys()
    }

    /// Edges as `(src, dst, attrs)`, grouped by source in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N, &Attrs)> {
        self.nodes
            .iter()
            .enumerate()
            .flat_map(move |(i, (src, entry))| {
                let s = NodeIdx::from(i);
                entry.succ.iter().filter_map(move |&d| {
                    let attrs = self.edges.get(&(s, d))?;
                    Some((src, self.id_of(d), attrs))
                })
            })
    }

    /// Attributes of a node, if it exists.
    #[must_use]
    pub fn node_attrs(&self, id: &N) -> Option<&Attrs> {
        self.nodes.get(id).map(|e| &e.attrs)
    }

    /// Attributes of an edge, if it exists.
    #[must_use]
    pub fn edge_attrs(&self, src: &N, dst: &N) -> Option<&Attrs> {
        let s = self.index_of(src)?;
        let d = self.index_of(dst)?;
        self.edges.get(&(s, d))
    }

    // ##########################
    // Dense index access used by the matcher.

    pub(crate) fn index_of(&self, id: &N) -> Option<NodeIdx> {
        self.nodes.get_index_of(id).map(NodeIdx::from)
    }

    pub(crate) fn id_of(&self, idx: NodeIdx) -> &N {
        self.nodes
            .get_index(idx.as_usize())
            .map(|(id, _)| id)
            .unwrap_or_else(|| panic!("node index {idx} out of range"))
    }

    pub(crate) fn succ(&self, idx: NodeIdx) -> &[NodeIdx] {
        &self.nodes[idx.as_usize()].succ
    }

    pub(crate) fn pred(&self, idx: NodeIdx) -> &[NodeIdx] {
        &self.nodes[idx.as_usize()].pred
    }

    pub(crate) fn has_edge_idx(&self, s: NodeIdx, d: NodeIdx) -> bool {
        self.edges.contains_key(&(s, d))
    }

    pub(crate) fn node_attrs_idx(&self, idx: NodeIdx) -> &Attrs {
        &self.nodes[idx.as_usize()].attrs
    }

    pub(crate) fn edge_attrs_idx(&self, s: NodeIdx, d: NodeIdx) -> Option<&Attrs> {
        self.edges.get(&(s, d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_node_is_idempotent() {
        let mut g: Graph<u32> = Graph::new();
        let a = g.add_node(7);
        let b = g.add_node(7);
        assert_eq!(a, b);
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn add_edge_rejects_unknown_endpoint_by_default() {
        let mut g: Graph<u32> = Graph::new();
        g.add_node(1);
        let err = g.add_edge(1, 2).unwrap_err();
        assert_eq!(err, SubgraphError::UnknownNode("2".into()));
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn auto_add_policy_creates_endpoints() {
        let mut g: Graph<&str> = Graph::with_policy(EndpointPolicy::AutoAdd);
        g.add_edge("alice", "bob").unwrap();
        assert_eq!(g.node_count(), 2);
        assert!(g.has_edge(&"alice", &"bob"));
        assert!(!g.has_edge(&"bob", &"alice"));
    }

    #[test]
    fn duplicate_edge_merges_attributes() {
        let mut g: Graph<u32> = Graph::from_edges([(1, 2)]);
        g.add_edge_with(1, 2, attrs([("amount", AttrValue::Int(10))]))
            .unwrap();
        g.add_edge_with(1, 2, attrs([("type", AttrValue::from("transfer"))]))
            .unwrap();
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.successors(&1), vec![&2]);
        let a = g.edge_attrs(&1, &2).unwrap();
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn adjacency_in_both_directions() {
        let g: Graph<u32> = Graph::from_edges([(1, 2), (3, 2), (2, 2)]);
        let mut preds = g.predecessors(&2);
        preds.sort();
        assert_eq!(preds, vec![&1, &2, &3]);
        assert_eq!(g.successors(&2), vec![&2]);
        assert!(g.successors(&99).is_empty());
    }

    #[test]
    fn with_cycle_leaves_source_untouched() {
        let base: Graph<u32> = Graph::from_edges([(1, 2)]);
        let fraud = attrs([("type", AttrValue::from("fraud"))]);
        let injected = base.with_cycle(&[5, 10, 15], &fraud);

        assert_eq!(base.edge_count(), 1);
        assert_eq!(injected.edge_count(), 4);
        assert!(injected.has_edge(&15, &5));
        assert_eq!(
            injected.edge_attrs(&10, &15).and_then(|a| a.get("type")),
            Some(&AttrValue::from("fraud"))
        );
    }

    #[test]
    fn edges_iterates_every_edge_once() {
        let g: Graph<u32> = Graph::from_edges([(1, 2), (2, 3), (3, 1), (1, 3)]);
        let mut listed: Vec<(u32, u32)> = g.edges().map(|(s, d, _)| (*s, *d)).collect();
        listed.sort();
        assert_eq!(listed, vec![(1, 2), (1, 3), (2, 3), (3, 1)]);
    }
}
