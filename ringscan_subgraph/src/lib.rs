//! Structural pattern search over directed transaction graphs.
//!
//! A [`Pattern`] (for fraud review typically a directed cycle of transfers)
//! is matched against a target [`Graph`] with a VF2-style backtracking
//! search. Matches are produced lazily by [`find_matches`], collected eagerly
//! by [`SubgraphMatcher`], or reduced to distinct account groups by
//! [`unique_occurrences`].
//!
//! ```
//! use ringscan_subgraph::{Graph, Pattern, find_matches, unique_occurrences};
//!
//! let target = Graph::from_edges([("A", "B"), ("B", "C"), ("C", "A"), ("C", "D")]);
//! let ring = Pattern::directed_cycle(3);
//!
//! assert_eq!(find_matches(&target, &ring).unwrap().count(), 3);
//! let groups = unique_occurrences(&target, &ring).unwrap();
//! assert_eq!(groups.len(), 1);
//! ```

pub mod dedupe;
pub mod error;
pub mod graph;
pub mod mapping;
pub mod matcher;
pub mod pattern;
pub mod util;

#[cfg(feature = "rayon")]
pub mod parallel;

mod search;
mod state;

#[doc(hidden)]
pub mod test_harness;

pub use dedupe::{
    Occurrence, count_automorphisms, flagged_nodes, unique_occurrences, unique_occurrences_with,
};
pub use error::SubgraphError;
pub use graph::{AttrValue, Attrs, EndpointPolicy, Graph, NodeId, attrs};
pub use mapping::Mapping;
pub use matcher::{MatchSet, SubgraphMatcher};
pub use pattern::{
    AttrEquals, AttrPredicate, CIRCULAR, Pattern, PatternRegistry, TargetFilter, target_filter,
};
pub use search::Matches;

#[cfg(feature = "rayon")]
pub use parallel::{par_find_matches, par_unique_occurrences};

use ringscan_common::Config;

/// Lazily enumerate every mapping of `pattern` into `target` with the
/// default configuration.
///
/// # Errors
/// [`SubgraphError::InvalidPattern`] if the pattern is empty or carries a
/// predicate on a missing element.
pub fn find_matches<'a, P: NodeId, N: NodeId>(
    target: &'a Graph<N>,
    pattern: &'a Pattern<P>,
) -> Result<Matches<'a, P, N>, SubgraphError> {
    find_matches_with(target, pattern, &Config::default())
}

/// Lazily enumerate every mapping of `pattern` into `target`.
///
/// The pattern is validated up front; after that the search itself cannot
/// fail; it either runs to completion or stops at `config.max_steps`.
///
/// # Errors
/// [`SubgraphError::InvalidPattern`] if the pattern does not validate. An
/// empty pattern is accepted when `config.allow_empty_pattern` is set.
pub fn find_matches_with<'a, P: NodeId, N: NodeId>(
    target: &'a Graph<N>,
    pattern: &'a Pattern<P>,
    config: &Config,
) -> Result<Matches<'a, P, N>, SubgraphError> {
    check_pattern(pattern, config)?;
    tracing::debug!(
        "searching {} pattern nodes in {} target nodes ({:?})",
        pattern.node_count(),
        target.node_count(),
        config.semantics
    );
    Ok(Matches::new(pattern, target, config))
}

pub(crate) fn check_pattern<P: NodeId>(
    pattern: &Pattern<P>,
    config: &Config,
) -> Result<(), SubgraphError> {
    if pattern.graph().is_empty() && config.allow_empty_pattern {
        return Ok(());
    }
    pattern.validate()
}
