//! Common scenarios for ringscan.
//!
//! Each scenario pairs a small transaction graph with a pattern and the
//! number of raw mappings and unique occurrences the matcher must report.
//! The same data backs the integration tests and the CLI demo.

use crate::config::Config;

/// The pattern a scenario searches for.
#[derive(Debug, Clone, Copy)]
pub enum ScenarioPattern {
    /// A pattern resolved by name from the pattern registry.
    Named(&'static str),
    /// An inline pattern over nodes `0..nodes`.
    Inline {
        /// Number of pattern nodes.
        nodes: usize,
        /// Directed pattern edges.
        edges: &'static [(usize, usize)],
    },
}

/// A complete scenario definition.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// The name of the scenario.
    pub name: &'static str,
    /// Transfers between accounts, as (payer, payee).
    pub edges: &'static [(u32, u32)],
    /// Accounts without any transfer.
    pub isolated: &'static [u32],
    /// The pattern to search for.
    pub pattern: ScenarioPattern,
    /// The configuration for the search.
    pub config: Config,
    /// Expected number of raw mappings.
    pub expected_raw: usize,
    /// Expected number of unique occurrences.
    pub expected_unique: usize,
}

/// Ordinary transfers plus the injected 100 -> 101 -> 102 -> 100 ring.
pub const MARKET_EDGES: &[(u32, u32)] = &[
    (1, 2),
    (2, 3),
    (3, 4),
    (4, 5),
    (10, 11),
    (11, 12),
    (5, 9),
    (100, 101),
    (101, 102),
    (102, 100),
];

/// The market graph with the ring's closing edge (102, 100) removed.
pub const MARKET_EDGES_OPEN_RING: &[(u32, u32)] = &[
    (1, 2),
    (2, 3),
    (3, 4),
    (4, 5),
    (10, 11),
    (11, 12),
    (5, 9),
    (100, 101),
    (101, 102),
];

const TWO_RINGS: &[(u32, u32)] = &[(1, 2), (2, 3), (3, 1), (7, 8), (8, 9), (9, 7), (3, 7)];

const COMPLETE_DIGRAPH_3: &[(u32, u32)] = &[(1, 2), (2, 1), (2, 3), (3, 2), (3, 1), (1, 3)];

const SQUARE_WITH_CHORD: &[(u32, u32)] = &[(1, 2), (2, 3), (3, 4), (4, 1), (1, 3)];

const RECIPROCAL_PAIR: &[(u32, u32)] = &[(1, 2), (2, 1), (3, 4)];

const SELF_TRANSFER: &[(u32, u32)] = &[(1, 2), (2, 2), (2, 3)];

/// Built-in scenarios.
pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "market_single_ring",
            edges: MARKET_EDGES,
            isolated: &[],
            pattern: ScenarioPattern::Named("circular"),
            config: Config::default(),
            expected_raw: 3,
            expected_unique: 1,
        },
        Scenario {
            name: "market_open_ring",
            edges: MARKET_EDGES_OPEN_RING,
            isolated: &[],
            pattern: ScenarioPattern::Named("circular"),
            config: Config::default(),
            expected_raw: 0,
            expected_unique: 0,
        },
        Scenario {
            name: "market_single_account",
            edges: MARKET_EDGES,
            isolated: &[],
            pattern: ScenarioPattern::Inline {
                nodes: 1,
                edges: &[],
            },
            config: Config::default(),
            expected_raw: 12,
            expected_unique: 12,
        },
        Scenario {
            name: "two_disjoint_rings",
            edges: TWO_RINGS,
            isolated: &[],
            pattern: ScenarioPattern::Named("cycle-3"),
            config: Config::default(),
            expected_raw: 6,
            expected_unique: 2,
        },
        Scenario {
            name: "complete_digraph_triangle",
            edges: COMPLETE_DIGRAPH_3,
            isolated: &[],
            pattern: ScenarioPattern::Named("circular"),
            config: Config::default(),
            expected_raw: 6,
            expected_unique: 1,
        },
        Scenario {
            name: "complete_digraph_triangle_induced",
            edges: COMPLETE_DIGRAPH_3,
            isolated: &[],
            pattern: ScenarioPattern::Named("circular"),
            config: Config::builder().induced().build(),
            expected_raw: 0,
            expected_unique: 0,
        },
        Scenario {
            name: "square_with_chord",
            edges: SQUARE_WITH_CHORD,
            isolated: &[],
            pattern: ScenarioPattern::Named("cycle-4"),
            config: Config::default(),
            expected_raw: 4,
            expected_unique: 1,
        },
        Scenario {
            name: "square_with_chord_induced",
            edges: SQUARE_WITH_CHORD,
            isolated: &[],
            pattern: ScenarioPattern::Named("cycle-4"),
            config: Config::builder().induced().build(),
            expected_raw: 0,
            expected_unique: 0,
        },
        Scenario {
            name: "reciprocal_transfers",
            edges: RECIPROCAL_PAIR,
            isolated: &[],
            pattern: ScenarioPattern::Named("cycle-2"),
            config: Config::default(),
            expected_raw: 2,
            expected_unique: 1,
        },
        Scenario {
            name: "self_transfer",
            edges: SELF_TRANSFER,
            isolated: &[],
            pattern: ScenarioPattern::Inline {
                nodes: 1,
                edges: &[(0, 0)],
            },
            config: Config::default(),
            expected_raw: 1,
            expected_unique: 1,
        },
        Scenario {
            name: "disconnected_pattern",
            edges: &[],
            isolated: &[1, 2, 3],
            pattern: ScenarioPattern::Inline {
                nodes: 2,
                edges: &[],
            },
            config: Config::default(),
            expected_raw: 6,
            expected_unique: 3,
        },
        Scenario {
            name: "pattern_larger_than_target",
            edges: &[(1, 2), (2, 1)],
            isolated: &[],
            pattern: ScenarioPattern::Named("circular"),
            config: Config::default(),
            expected_raw: 0,
            expected_unique: 0,
        },
    ]
}

/// Look up a built-in scenario by name.
pub fn scenario(name: &str) -> Option<Scenario> {
    scenarios().into_iter().find(|s| s.name == name)
}
