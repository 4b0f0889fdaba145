use std::collections::BTreeSet;

use rstest::rstest;
use ringscan_common::{Config, MARKET_EDGES, scenario};
use ringscan_subgraph::test_harness::{run_scenario, setup_test_logging};
use ringscan_subgraph::{
    AttrEquals, AttrValue, Graph, Occurrence, Pattern, SubgraphError, SubgraphMatcher, attrs,
    find_matches, find_matches_with, unique_occurrences,
};

lazy_static::lazy_static! {
    static ref MARKET: Graph<u32> = Graph::from_edges(MARKET_EDGES.iter().copied());
    static ref NODE_SET: Config = Config::builder().node_set().build();
}

#[rstest]
#[case::market_single_ring("market_single_ring")]
#[case::market_open_ring("market_open_ring")]
#[case::market_single_account("market_single_account")]
#[case::two_disjoint_rings("two_disjoint_rings")]
#[case::complete_digraph_triangle("complete_digraph_triangle")]
#[case::complete_digraph_triangle_induced("complete_digraph_triangle_induced")]
#[case::square_with_chord("square_with_chord")]
#[case::square_with_chord_induced("square_with_chord_induced")]
#[case::reciprocal_transfers("reciprocal_transfers")]
#[case::self_transfer("self_transfer")]
#[case::disconnected_pattern("disconnected_pattern")]
#[case::pattern_larger_than_target("pattern_larger_than_target")]
fn scenario_counts(#[case] name: &str) {
    let scenario = scenario(name).unwrap_or_else(|| panic!("no scenario named {name}"));
    if let Err(e) = run_scenario(&scenario) {
        panic!("scenario {name} failed: {e}");
    }
}

#[test]
fn injected_ring_is_the_only_occurrence() {
    setup_test_logging();
    let occurrences = unique_occurrences(&*MARKET, &Pattern::directed_cycle(3)).unwrap();
    let expected: BTreeSet<_> = [Occurrence::from_nodes([100, 101, 102])].into();
    assert_eq!(occurrences, expected);
}

#[test]
fn injecting_a_ring_into_clean_data_is_detected() {
    setup_test_logging();
    let clean = Graph::from_edges([(1, 2), (2, 3), (3, 4), (4, 5)]);
    let ring = Pattern::directed_cycle(3);
    assert_eq!(find_matches(&clean, &ring).unwrap().count(), 0);

    let fraud = attrs([("type", AttrValue::from("fraud"))]);
    let dirty = clean.with_cycle(&[100, 101, 102], &fraud);
    // the source graph is untouched
    assert_eq!(clean.edge_count(), 4);
    assert_eq!(dirty.edge_count(), 7);
    assert_eq!(dirty.edge_attrs(&102, &100), Some(&fraud));

    let set = SubgraphMatcher::enumerate_all(&dirty, &ring, &*NODE_SET).unwrap();
    assert_eq!(set.raw_count, 3);
    assert_eq!(set.len(), 1);
    assert_eq!(
        set.flagged_nodes().into_iter().collect::<Vec<_>>(),
        vec![100, 101, 102]
    );
}

#[test]
fn every_mapping_is_a_valid_embedding() {
    let ring = Pattern::directed_cycle(3);
    let dense = Graph::from_edges([(1, 2), (2, 3), (3, 1), (1, 3), (3, 4), (4, 1), (2, 4)]);
    for m in find_matches(&dense, &ring).unwrap() {
        assert_eq!(m.len(), 3);
        assert_eq!(m.occurrence().len(), 3, "mapping {m:?} is not injective");
        for (src, dst, _) in ring.graph().edges() {
            let (a, b) = (m.get(src).unwrap(), m.get(dst).unwrap());
            assert!(dense.has_edge(a, b), "{a} -> {b} missing for {m:?}");
        }
    }
}

#[test]
fn results_are_deterministic() {
    let ring = Pattern::directed_cycle(3);
    let first: Vec<_> = find_matches(&*MARKET, &ring).unwrap().collect();
    for _ in 0..5 {
        let again: Vec<_> = find_matches(&*MARKET, &ring).unwrap().collect();
        assert_eq!(first, again);
    }
}

#[test]
fn lazy_search_can_stop_early() {
    let dense = Graph::from_edges([(1, 2), (2, 1), (2, 3), (3, 2), (3, 1), (1, 3)]);
    let ring = Pattern::directed_cycle(3);
    let mut matches = find_matches(&dense, &ring).unwrap();
    let first = matches.next().unwrap();
    assert_eq!(first.get(&0), Some(&1));
    let steps_after_first = matches.steps();
    assert_eq!(matches.count(), 5);
    assert!(steps_after_first <= 3);
}

#[test]
fn budget_marks_result_truncated() {
    let config = Config::builder().max_steps(1).build();
    let set = SubgraphMatcher::enumerate_all(&*MARKET, &Pattern::directed_cycle(3), &config).unwrap();
    assert!(set.truncated());
    assert!(set.raw_count < 3);

    let generous = Config::builder().max_steps(10_000).build();
    let set =
        SubgraphMatcher::enumerate_all(&*MARKET, &Pattern::directed_cycle(3), &generous).unwrap();
    assert!(!set.truncated());
    assert_eq!(set.raw_count, 3);
}

#[test]
fn edge_predicates_separate_fraud_from_market_rings() {
    let fraud = attrs([("type", AttrValue::from("fraud"))]);
    let market = attrs([("type", AttrValue::from("market"))]);
    let target = Graph::from_edges([(1, 2), (2, 3), (3, 4)])
        .with_cycle(&[10, 11, 12], &market)
        .with_cycle(&[20, 21, 22], &fraud);

    let ring = Pattern::directed_cycle(3);
    assert_eq!(
        unique_occurrences(&target, &ring).unwrap().len(),
        2
    );

    let fraud_ring = (0..3)
        .try_fold(ring, |p, i| {
            p.with_edge_predicate(&i, &((i + 1) % 3), AttrEquals::new("type", "fraud"))
        })
        .unwrap();
    let found = unique_occurrences(&target, &fraud_ring).unwrap();
    let expected: BTreeSet<_> = [Occurrence::from_nodes([20, 21, 22])].into();
    assert_eq!(found, expected);
}

#[test]
fn node_predicates_see_account_attributes() {
    let mut target: Graph<&str> = Graph::new();
    target.add_node_with("shell-a", attrs([("kind", AttrValue::from("shell"))]));
    target.add_node_with("shell-b", attrs([("kind", AttrValue::from("shell"))]));
    target.add_node_with("retail", attrs([("kind", AttrValue::from("retail"))]));
    for (s, d) in [
        ("shell-a", "shell-b"),
        ("shell-b", "shell-a"),
        ("shell-b", "retail"),
        ("retail", "shell-b"),
    ] {
        target.add_edge(s, d).unwrap();
    }

    let pair = Pattern::directed_cycle(2)
        .with_node_predicate(&0, AttrEquals::new("kind", "shell"))
        .unwrap()
        .with_node_predicate(&1, AttrEquals::new("kind", "shell"))
        .unwrap();
    let found: Vec<_> = find_matches(&target, &pair).unwrap().collect();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|m| !m.occurrence().contains(&"retail")));
}

#[test]
fn empty_pattern_follows_configuration() {
    let empty = Pattern::directed_cycle(0);
    assert!(matches!(
        find_matches(&*MARKET, &empty),
        Err(SubgraphError::InvalidPattern(_))
    ));
    let config = Config::builder().allow_empty_pattern(true).build();
    let all: Vec<_> = find_matches_with(&*MARKET, &empty, &config).unwrap().collect();
    assert_eq!(all.len(), 1);
    assert!(all[0].is_empty());
}

#[test]
fn unknown_endpoints_are_rejected_by_default() {
    let mut g: Graph<u32> = Graph::new();
    g.add_node(1);
    assert!(matches!(g.add_edge(1, 2), Err(SubgraphError::UnknownNode(_))));
    assert_eq!(g.node_count(), 1);
    assert_eq!(g.edge_count(), 0);
}
