//! Collapsing symmetric mappings into occurrences.
//!
//! A pattern with automorphisms matches the same group of target nodes once
//! per symmetry. For fraud review what matters is the group of accounts, so
//! mappings are keyed by their sorted target node set.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use itertools::Itertools;
use ringscan_common::Config;

use crate::error::SubgraphError;
use crate::graph::{Graph, NodeId};
use crate::mapping::Mapping;
use crate::pattern::Pattern;

/// A canonical set of target nodes covered by at least one mapping.
///
/// Ordering and equality follow the sorted node list, so occurrences can be
/// collected into ordered sets with a stable iteration order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Occurrence<N> {
    nodes: Vec<N>,
}

impl<N: NodeId> Occurrence<N> {
    /// Canonicalise any collection of nodes: sorted, without repeats.
    pub fn from_nodes(nodes: impl IntoIterator<Item = N>) -> Self {
        let mut nodes: Vec<N> = nodes.into_iter().collect();
        nodes.sort_unstable();
        nodes.dedup();
        Self { nodes }
    }

    /// Nodes in ascending order.
    #[must_use]
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Number of distinct nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Only the occurrence of an empty pattern is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `node` belongs to the occurrence.
    #[must_use]
    pub fn contains(&self, node: &N) -> bool {
        self.nodes.binary_search(node).is_ok()
    }

    /// Take the sorted node list.
    #[must_use]
    pub fn into_nodes(self) -> Vec<N> {
        self.nodes
    }
}

impl<N: fmt::Display> fmt::Display for Occurrence<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.nodes.iter().join(", "))
    }
}

/// Keep the first mapping of each occurrence, preserving search order.
pub(crate) fn dedupe_node_set<P: NodeId, N: NodeId>(mappings: &mut Vec<Mapping<P, N>>) {
    let mut seen: HashSet<Occurrence<N>> = HashSet::new();
    mappings.retain(|m| seen.insert(m.occurrence()));
}

/// Union of every node in any occurrence.
pub fn flagged_nodes<'a, N: NodeId + 'a>(
    occurrences: impl IntoIterator<Item = &'a Occurrence<N>>,
) -> BTreeSet<N> {
    occurrences
        .into_iter()
        .flat_map(|o| o.nodes().iter().cloned())
        .collect()
}

/// Distinct target node sets that host the pattern, default configuration.
///
/// # Errors
/// Same as [`crate::find_matches`].
pub fn unique_occurrences<P: NodeId, N: NodeId>(
    target: &Graph<N>,
    pattern: &Pattern<P>,
) -> Result<BTreeSet<Occurrence<N>>, SubgraphError> {
    unique_occurrences_with(target, pattern, &Config::default())
}

/// Distinct target node sets that host the pattern.
///
/// # Errors
/// Same as [`crate::find_matches_with`].
pub fn unique_occurrences_with<P: NodeId, N: NodeId>(
    target: &Graph<N>,
    pattern: &Pattern<P>,
    config: &Config,
) -> Result<BTreeSet<Occurrence<N>>, SubgraphError> {
    let occurrences: BTreeSet<_> = crate::find_matches_with(target, pattern, config)?
        .map(|m| m.occurrence())
        .collect();
    tracing::debug!("{} unique occurrences", occurrences.len());
    Ok(occurrences)
}

/// Number of structure-preserving self-mappings of the pattern.
///
/// Predicates are ignored: a triangle has 3, a 2-cycle has 2. Every
/// occurrence in a target is hit exactly this many times by raw enumeration
/// when the occurrence carries no extra edges.
///
/// # Errors
/// [`SubgraphError::InvalidPattern`] if the pattern does not validate.
pub fn count_automorphisms<P: NodeId>(pattern: &Pattern<P>) -> Result<usize, SubgraphError> {
    let structural = pattern.structural();
    let config = Config::builder().induced().build();
    Ok(crate::find_matches_with(structural.graph(), &structural, &config)?.count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occurrence_is_order_insensitive() {
        let a = Occurrence::from_nodes(["C", "A", "B"]);
        let b = Occurrence::from_nodes(["B", "C", "A", "A"]);
        assert_eq!(a, b);
        assert_eq!(a.nodes(), &["A", "B", "C"]);
        assert!(a.contains(&"B"));
        assert!(!a.contains(&"D"));
        assert_eq!(a.to_string(), "{A, B, C}");
    }

    #[test]
    fn dedupe_keeps_first_of_each_set() {
        let mut ms = vec![
            Mapping::new(vec![(0, 1), (1, 2)]),
            Mapping::new(vec![(0, 2), (1, 1)]),
            Mapping::new(vec![(0, 3), (1, 4)]),
        ];
        dedupe_node_set(&mut ms);
        assert_eq!(ms.len(), 2);
        assert_eq!(ms[0].get(&0), Some(&1));
        assert_eq!(ms[1].get(&0), Some(&3));
    }

    #[test]
    fn flagged_nodes_is_the_union() {
        let occ = [
            Occurrence::from_nodes([1, 2, 3]),
            Occurrence::from_nodes([3, 4, 5]),
        ];
        let flagged = flagged_nodes(&occ);
        assert_eq!(flagged.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn cycles_have_rotational_symmetry() {
        assert_eq!(count_automorphisms(&Pattern::directed_cycle(3)).unwrap(), 3);
        assert_eq!(count_automorphisms(&Pattern::directed_cycle(4)).unwrap(), 4);
        assert_eq!(count_automorphisms(&Pattern::directed_cycle(2)).unwrap(), 2);
        assert_eq!(count_automorphisms(&Pattern::directed_cycle(1)).unwrap(), 1);
        let path = Pattern::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        assert_eq!(count_automorphisms(&path).unwrap(), 1);
        assert!(count_automorphisms(&Pattern::directed_cycle(0)).is_err());
    }
}
