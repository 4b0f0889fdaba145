//! Helpers shared by unit tests, integration tests and properties.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Once;

use itertools::Itertools;
use ringscan_common::{MatchSemantics, Scenario, ScenarioPattern};

use crate::SubgraphMatcher;
use crate::graph::{EndpointPolicy, Graph, NodeId, NodeIdx};
use crate::pattern::{Pattern, PatternRegistry};

static INIT: Once = Once::new();

/// Configures logging for the test runner.
pub fn setup_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Build the transaction graph of a scenario.
pub fn scenario_graph(scenario: &Scenario) -> Graph<u32> {
    let mut graph = Graph::with_policy(EndpointPolicy::AutoAdd);
    for &id in scenario.isolated {
        graph.add_node(id);
    }
    for &(src, dst) in scenario.edges {
        // AutoAdd never rejects an endpoint.
        let _ = graph.add_edge(src, dst);
    }
    graph
}

/// Resolve the pattern of a scenario.
pub fn scenario_pattern(scenario: &Scenario) -> Result<Pattern<usize>, Box<dyn std::error::Error>> {
    match scenario.pattern {
        ScenarioPattern::Named(name) => Ok(PatternRegistry::default().resolve(name)?),
        ScenarioPattern::Inline { nodes, edges } => Ok(Pattern::from_edges(nodes, edges)?),
    }
}

/// Run a scenario through the eager matcher and compare both counts.
#[track_caller]
pub fn run_scenario(scenario: &Scenario) -> Result<(), Box<dyn std::error::Error>> {
    setup_test_logging();

    let target = scenario_graph(scenario);
    let pattern = scenario_pattern(scenario)?;
    let set = SubgraphMatcher::enumerate_all(&target, &pattern, &scenario.config)?;

    if set.raw_count != scenario.expected_raw {
        tracing::error!(
            "scenario {}: expected {} raw mappings, found {}",
            scenario.name,
            scenario.expected_raw,
            set.raw_count
        );
        return Err(format!(
            "Expected {} raw mappings, found {}",
            scenario.expected_raw, set.raw_count
        )
        .into());
    }

    let unique = set.occurrences().len();
    if unique != scenario.expected_unique {
        return Err(format!(
            "Expected {} unique occurrences, found {}",
            scenario.expected_unique, unique
        )
        .into());
    }
    Ok(())
}

/// Every mapping found by trying all injective assignments.
///
/// Exponential; only for cross-checking the matcher on tiny graphs.
pub fn brute_force_mappings<P: NodeId, N: NodeId>(
    target: &Graph<N>,
    pattern: &Pattern<P>,
    semantics: MatchSemantics,
) -> BTreeSet<Vec<(P, N)>> {
    let pg = pattern.graph();
    let k = pg.node_count();

    (0..target.node_count())
        .map(NodeIdx::from)
        .permutations(k)
        .filter(|images| is_match(target, pattern, images, semantics))
        .map(|images| {
            images
                .iter()
                .enumerate()
                .map(|(p, &t)| (pg.id_of(NodeIdx::from(p)).clone(), target.id_of(t).clone()))
                .collect()
        })
        .collect()
}

fn is_match<P: NodeId, N: NodeId>(
    target: &Graph<N>,
    pattern: &Pattern<P>,
    images: &[NodeIdx],
    semantics: MatchSemantics,
) -> bool {
    let pg = pattern.graph();
    let nodes_ok = images.iter().enumerate().all(|(p, &t)| {
        let p = NodeIdx::from(p);
        pattern
            .node_predicate(p)
            .is_none_or(|pred| pred.matches(pg.node_attrs_idx(p), target.node_attrs_idx(t)))
    });
    if !nodes_ok {
        return false;
    }

    for (ps, &ts) in images.iter().enumerate() {
        for (pd, &td) in images.iter().enumerate() {
            let (ps, pd) = (NodeIdx::from(ps), NodeIdx::from(pd));
            let in_pattern = pg.has_edge_idx(ps, pd);
            let in_target = target.has_edge_idx(ts, td);
            if in_pattern && !in_target {
                return false;
            }
            if !in_pattern && in_target && semantics.is_induced() {
                return false;
            }
            let Some(pred) = pattern.edge_predicate(ps, pd) else {
                continue;
            };
            let attrs_ok = match (pg.edge_attrs_idx(ps, pd), target.edge_attrs_idx(ts, td)) {
                (Some(pa), Some(ta)) => pred.matches(pa, ta),
                _ => false,
            };
            if !attrs_ok {
                return false;
            }
        }
    }
    true
}
