//! Parallel search over the rayon pool.
//!
//! The search tree is split at its root: every target node is a seed for the
//! first pattern node, and each seed is explored by one worker. A worker
//! keeps its search state between seeds, since every finished search leaves
//! it clean. The graphs are shared read-only. `max_steps` applies per seed.

use std::collections::BTreeSet;

use dashmap::DashSet;
use rayon::prelude::*;
use ringscan_common::Config;

use crate::dedupe::Occurrence;
use crate::error::SubgraphError;
use crate::graph::{Graph, NodeId, NodeIdx};
use crate::mapping::Mapping;
use crate::pattern::Pattern;
use crate::search::Matches;
use crate::state::State;
use crate::util::progress::Progress;

/// Every mapping, found in parallel, in the same order as a sequential run.
///
/// # Errors
/// Same as [`crate::find_matches_with`].
pub fn par_find_matches<P: NodeId, N: NodeId>(
    target: &Graph<N>,
    pattern: &Pattern<P>,
    config: &Config,
) -> Result<Vec<Mapping<P, N>>, SubgraphError> {
    crate::check_pattern(pattern, config)?;
    if pattern.graph().is_empty() {
        return Ok(Matches::new(pattern, target, config).collect());
    }
    Ok(collect_seeded(target, pattern, config, &Progress::new()))
}

/// Distinct target node sets hosting the pattern, found in parallel.
///
/// # Errors
/// Same as [`crate::find_matches_with`].
pub fn par_unique_occurrences<P: NodeId, N: NodeId>(
    target: &Graph<N>,
    pattern: &Pattern<P>,
    config: &Config,
) -> Result<BTreeSet<Occurrence<N>>, SubgraphError> {
    crate::check_pattern(pattern, config)?;
    if pattern.graph().is_empty() {
        return crate::unique_occurrences_with(target, pattern, config);
    }

    let seen: DashSet<Occurrence<N>> = DashSet::new();
    (0..target.node_count()).into_par_iter().for_each_init(
        || None::<State<'_, P, N>>,
        |slot, t| {
            let mut matches = start_seed(slot, pattern, target, config, t);
            for m in matches.by_ref() {
                seen.insert(m.occurrence());
            }
            *slot = Some(matches.into_state());
        },
    );
    Ok(seen.into_iter().collect())
}

/// Run one seeded search per target node and concatenate in seed order.
pub(crate) fn collect_seeded<P: NodeId, N: NodeId>(
    target: &Graph<N>,
    pattern: &Pattern<P>,
    config: &Config,
    progress: &Progress,
) -> Vec<Mapping<P, N>> {
    let seeds = target.node_count();
    progress.set_total_seeds(seeds as u64);
    tracing::debug!("splitting search over {} seeds", seeds);

    let per_seed: Vec<Vec<Mapping<P, N>>> = (0..seeds)
        .into_par_iter()
        .map_init(
            || None::<State<'_, P, N>>,
            |slot, t| {
                let mut matches = start_seed(slot, pattern, target, config, t);
                let found: Vec<_> = matches.by_ref().collect();
                progress.finish_seed(matches.steps(), matches.truncated());
                *slot = Some(matches.into_state());
                found
            },
        )
        .collect();

    per_seed.into_iter().flatten().collect()
}

/// Seeded search on the worker's cached state, allocating one on first use.
fn start_seed<'a, P: NodeId, N: NodeId>(
    slot: &mut Option<State<'a, P, N>>,
    pattern: &'a Pattern<P>,
    target: &'a Graph<N>,
    config: &Config,
    seed: usize,
) -> Matches<'a, P, N> {
    let state = slot.take().unwrap_or_else(|| State::new(pattern, target));
    Matches::seeded_in(state, config, NodeIdx::from(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market() -> Graph<u32> {
        Graph::from_edges([
            (1, 2),
            (2, 3),
            (3, 1),
            (3, 4),
            (4, 5),
            (5, 3),
            (6, 7),
            (7, 6),
        ])
    }

    #[test]
    fn matches_sequential_order() {
        let target = market();
        let pattern = Pattern::directed_cycle(3);
        let config = Config::default();
        let seq: Vec<_> = crate::find_matches_with(&target, &pattern, &config)
            .unwrap()
            .collect();
        let par = par_find_matches(&target, &pattern, &config).unwrap();
        assert_eq!(seq, par);
        assert_eq!(par.len(), 6);
    }

    #[test]
    fn unique_occurrences_agree() {
        let target = market();
        let pattern = Pattern::directed_cycle(3);
        let config = Config::default();
        let seq = crate::unique_occurrences_with(&target, &pattern, &config).unwrap();
        let par = par_unique_occurrences(&target, &pattern, &config).unwrap();
        assert_eq!(seq, par);
        assert_eq!(par.len(), 2);
    }

    #[test]
    fn progress_counts_every_seed() {
        let target = market();
        let pattern = Pattern::directed_cycle(2);
        let progress = Progress::new();
        let found = collect_seeded(&target, &pattern, &Config::default(), &progress);
        assert_eq!(found.len(), 2);
        let snap = progress.snapshot();
        assert_eq!(snap.total_seeds, 7);
        assert_eq!(snap.scanned_seeds, 7);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let target = market();
        let empty = Pattern::directed_cycle(0);
        assert!(par_find_matches(&target, &empty, &Config::default()).is_err());
    }
}
