//! A single match: pattern node to target node pairs.

use crate::dedupe::Occurrence;
use crate::graph::NodeId;

/// One complete, injective assignment of pattern nodes to target nodes.
///
/// Pairs are kept in pattern insertion order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mapping<P, N> {
    pairs: Vec<(P, N)>,
}

impl<P: NodeId, N: NodeId> Mapping<P, N> {
    #[contracts::debug_ensures(ret.is_injective())]
    pub(crate) fn new(pairs: Vec<(P, N)>) -> Self {
        Self { pairs }
    }

    /// Image of a pattern node.
    #[must_use]
    pub fn get(&self, pattern_node: &P) -> Option<&N> {
        self.pairs
            .iter()
            .find(|(p, _)| p == pattern_node)
            .map(|(_, n)| n)
    }

    /// Preimage of a target node, if it is covered.
    #[must_use]
    pub fn preimage(&self, target_node: &N) -> Option<&P> {
        self.pairs
            .iter()
            .find(|(_, n)| n == target_node)
            .map(|(p, _)| p)
    }

    /// Pairs in pattern insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&P, &N)> {
        self.pairs.iter().map(|(p, n)| (p, n))
    }

    /// Covered target nodes in pattern order.
    pub fn targets(&self) -> impl Iterator<Item = &N> {
        self.pairs.iter().map(|(_, n)| n)
    }

    /// Number of mapped pattern nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True only for the vacuous match of an empty pattern.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The set of target nodes this mapping lands on.
    #[must_use]
    pub fn occurrence(&self) -> Occurrence<N> {
        Occurrence::from_nodes(self.targets().cloned())
    }

    fn is_injective(&self) -> bool {
        self.occurrence().len() == self.pairs.len()
    }
}

impl<P, N> IntoIterator for Mapping<P, N> {
    type Item = (P, N);
    type IntoIter = std::vec::IntoIter<(P, N)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}
