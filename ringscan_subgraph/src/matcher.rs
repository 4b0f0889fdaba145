//! Eager enumeration of every match of a pattern in a target graph.
//!
//! [`SubgraphMatcher`] drives the lazy search to completion, applies the
//! configured deduplication and reports a [`MatchSet`]. With the `rayon`
//! feature and `Config::parallel`, the search is split by the image of the
//! first pattern node and run on the rayon pool; results keep the same order
//! as a sequential run.

use std::collections::BTreeSet;

use ringscan_common::Config;

use crate::dedupe::{Occurrence, dedupe_node_set, flagged_nodes};
use crate::error::SubgraphError;
use crate::graph::{Graph, NodeId};
use crate::mapping::Mapping;
use crate::pattern::Pattern;
use crate::search::Matches;
use crate::util::progress::{Progress, ProgressSnapshot};

/// Mappings found by one eager search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchSet<P, N> {
    /// Kept mappings, in search order.
    pub items: Vec<Mapping<P, N>>,
    /// Number of mappings before deduplication.
    pub raw_count: usize,
    /// Search counters.
    pub stats: ProgressSnapshot,
}

impl<P: NodeId, N: NodeId> MatchSet<P, N> {
    /// Number of kept mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was kept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `max_steps` cut the search short.
    #[must_use]
    pub const fn truncated(&self) -> bool {
        self.stats.truncated
    }

    /// Kept mappings in search order.
    pub fn iter(&self) -> impl Iterator<Item = &Mapping<P, N>> {
        self.items.iter()
    }

    /// Distinct target node sets among the kept mappings.
    #[must_use]
    pub fn occurrences(&self) -> BTreeSet<Occurrence<N>> {
        self.items.iter().map(Mapping::occurrence).collect()
    }

    /// Every target node that takes part in at least one match.
    #[must_use]
    pub fn flagged_nodes(&self) -> BTreeSet<N> {
        flagged_nodes(&self.occurrences())
    }
}

/// Entry point for eager searches.
pub struct SubgraphMatcher<'p, 't, 'cfg, P, N> {
    /// The motif to search for.
    pattern: &'p Pattern<P>,
    /// The graph to search within.
    target: &'t Graph<N>,
    config: &'cfg Config,
}

impl<'p, 't, 'cfg, P: NodeId, N: NodeId> SubgraphMatcher<'p, 't, 'cfg, P, N> {
    /// Bind a pattern, a target and a configuration.
    pub fn new(target: &'t Graph<N>, pattern: &'p Pattern<P>, config: &'cfg Config) -> Self {
        Self {
            pattern,
            target,
            config,
        }
    }

    /// Run the whole search and collect every match.
    ///
    /// # Errors
    /// [`SubgraphError::InvalidPattern`] if the pattern does not validate.
    pub fn enumerate_all(
        target: &'t Graph<N>,
        pattern: &'p Pattern<P>,
        config: &'cfg Config,
    ) -> Result<MatchSet<P, N>, SubgraphError> {
        Self::new(target, pattern, config).enumerate()
    }

    /// Run the search described by this matcher.
    ///
    /// # Errors
    /// [`SubgraphError::InvalidPattern`] if the pattern does not validate.
    pub fn enumerate(&self) -> Result<MatchSet<P, N>, SubgraphError> {
        crate::check_pattern(self.pattern, self.config)?;

        tracing::info!(
            "starting subgraph search: pattern {} nodes / {} edges, target {} nodes / {} edges",
            self.pattern.node_count(),
            self.pattern.edge_count(),
            self.target.node_count(),
            self.target.edge_count()
        );

        let progress = Progress::new();
        let mut items = self.collect_raw(&progress);
        let raw_count = items.len();

        if self.config.dedupe.node_set() {
            dedupe_node_set(&mut items);
        }

        let stats = progress.snapshot();
        tracing::info!(
            "search complete: found {} raw matches, {} after deduplication ({} steps)",
            raw_count,
            items.len(),
            stats.steps
        );

        Ok(MatchSet {
            items,
            raw_count,
            stats,
        })
    }

    #[cfg(feature = "rayon")]
    fn collect_raw(&self, progress: &Progress) -> Vec<Mapping<P, N>> {
        if self.config.parallel && !self.pattern.graph().is_empty() {
            return crate::parallel::collect_seeded(self.target, self.pattern, self.config, progress);
        }
        self.collect_sequential(progress)
    }

    #[cfg(not(feature = "rayon"))]
    fn collect_raw(&self, progress: &Progress) -> Vec<Mapping<P, N>> {
        if self.config.parallel {
            tracing::debug!("parallel search requested but the rayon feature is off");
        }
        self.collect_sequential(progress)
    }

    fn collect_sequential(&self, progress: &Progress) -> Vec<Mapping<P, N>> {
        progress.set_total_seeds(1);
        let mut matches = Matches::new(self.pattern, self.target, self.config);
        let items: Vec<_> = matches.by_ref().collect();
        progress.finish_seed(matches.steps(), matches.truncated());
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_rings() -> Graph<u32> {
        Graph::from_edges([(1, 2), (2, 3), (3, 1), (4, 5), (5, 6), (6, 4), (3, 4)])
    }

    #[test]
    fn raw_enumeration_keeps_every_rotation() {
        let target = two_rings();
        let pattern = Pattern::directed_cycle(3);
        let set = SubgraphMatcher::enumerate_all(&target, &pattern, &Config::default()).unwrap();
        assert_eq!(set.raw_count, 6);
        assert_eq!(set.len(), 6);
        assert_eq!(set.occurrences().len(), 2);
        assert!(!set.truncated());
        assert_eq!(set.stats.scanned_seeds, 1);
    }

    #[test]
    fn node_set_dedupe_keeps_one_per_ring() {
        let target = two_rings();
        let pattern = Pattern::directed_cycle(3);
        let config = Config::builder().node_set().build();
        let set = SubgraphMatcher::enumerate_all(&target, &pattern, &config).unwrap();
        assert_eq!(set.raw_count, 6);
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.flagged_nodes().into_iter().collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5, 6]
        );
    }

    #[test]
    fn parallel_flag_gives_the_same_result() {
        let target = two_rings();
        let pattern = Pattern::directed_cycle(3);
        let seq = SubgraphMatcher::enumerate_all(&target, &pattern, &Config::default()).unwrap();
        let config = Config::builder().parallel(true).build();
        let par = SubgraphMatcher::enumerate_all(&target, &pattern, &config).unwrap();
        assert_eq!(seq.items, par.items);
    }

    #[test]
    fn empty_pattern_is_rejected_unless_allowed() {
        let target = two_rings();
        let empty = Pattern::directed_cycle(0);
        assert!(SubgraphMatcher::enumerate_all(&target, &empty, &Config::default()).is_err());
        let config = Config::builder().allow_empty_pattern(true).build();
        let set = SubgraphMatcher::enumerate_all(&target, &empty, &config).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.items[0].is_empty());
    }
}
