//! Ringscan CLI
//!
//! Loads a transaction edge list, optionally injects a synthetic ring, and
//! reports every group of accounts that forms the requested pattern.

#[global_allocator]
/// Global allocator using jemalloc for better performance in parallel workloads.
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

mod args;

use std::path::Path;

use clap::Parser;
use serde::Deserialize;
use tracing::info;

use ringscan_common::MARKET_EDGES;
use ringscan_subgraph::{
    AttrEquals, AttrValue, EndpointPolicy, Graph, MatchSet, Pattern, PatternRegistry,
    SubgraphMatcher, attrs,
};

use args::Args;

/// Edge attribute carrying the transfer type.
const TYPE_KEY: &str = "type";
/// Transfer type of injected and flagged ring edges.
const FRAUD: &str = "fraud";

/// One row of the input edge list.
#[derive(Debug, Deserialize)]
struct Transfer {
    src: String,
    dst: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Executes the ring scan.
///
/// This function:
/// 1. Initializes logging
/// 2. Parses command-line arguments
/// 3. Loads (and optionally seeds) the transaction graph
/// 4. Runs the pattern search
/// 5. Prints the flagged accounts
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let config = args.to_config()?;

    let mut graph = match &args.edges {
        Some(path) => load_edges(path)?,
        None => demo_market(),
    };
    if !args.inject.is_empty() {
        info!("Injecting ring through {:?}", args.inject);
        graph = graph.with_cycle(&args.inject, &attrs([(TYPE_KEY, AttrValue::from(FRAUD))]));
    }

    let mut pattern = PatternRegistry::default().resolve(&args.pattern)?;
    if args.fraud_only {
        pattern = fraud_edges_only(pattern)?;
    }

    info!(
        "Scanning {} accounts / {} transfers for '{}'",
        graph.node_count(),
        graph.edge_count(),
        args.pattern
    );
    let set = SubgraphMatcher::enumerate_all(&graph, &pattern, &config)?;

    print_report(&set);
    if let Some(path) = &args.output {
        write_mappings(path, &set)?;
        info!("Wrote {} mappings to {}", set.len(), path.display());
    }

    Ok(())
}

/// Read a `src,dst[,type]` CSV into a graph; accounts are created on first use.
fn load_edges(path: &Path) -> Result<Graph<String>, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut graph = Graph::with_policy(EndpointPolicy::AutoAdd);
    for row in reader.deserialize() {
        let transfer: Transfer = row?;
        let edge_attrs = transfer
            .kind
            .filter(|k| !k.is_empty())
            .map(|k| attrs([(TYPE_KEY, AttrValue::from(k))]))
            .unwrap_or_default();
        graph.add_edge_with(transfer.src, transfer.dst, edge_attrs)?;
    }
    info!("Loaded {} transfers from {}", graph.edge_count(), path.display());
    Ok(graph)
}

/// The built-in market: ordinary transfers plus one planted ring.
fn demo_market() -> Graph<String> {
    info!("No edge list given, scanning the demo market");
    Graph::from_edges(
        MARKET_EDGES
            .iter()
            .map(|(s, d)| (format!("acct_{s}"), format!("acct_{d}"))),
    )
}

/// Require every pattern edge to be matched by a fraud-typed transfer.
fn fraud_edges_only(
    mut pattern: Pattern<usize>,
) -> Result<Pattern<usize>, Box<dyn std::error::Error>> {
    let edges: Vec<(usize, usize)> = pattern
        .graph()
        .edges()
        .map(|(s, d, _)| (*s, *d))
        .collect();
    for (s, d) in edges {
        pattern = pattern.with_edge_predicate(&s, &d, AttrEquals::new(TYPE_KEY, FRAUD))?;
    }
    Ok(pattern)
}

fn print_report(set: &MatchSet<usize, String>) {
    let occurrences = set.occurrences();
    println!("\n=== Ringscan Results ===");
    println!("raw mappings:  {}", set.raw_count);
    println!("kept mappings: {}", set.len());
    println!("occurrences:   {}", occurrences.len());
    if set.truncated() {
        println!("(search stopped at the step budget; results are incomplete)");
    }

    for (i, occurrence) in occurrences.iter().enumerate() {
        println!("{i}: {occurrence}");
    }

    let flagged = set.flagged_nodes();
    if !flagged.is_empty() {
        let names: Vec<&str> = flagged.iter().map(String::as_str).collect();
        println!("\nflagged accounts ({}): {}", flagged.len(), names.join(", "));
    }
}

/// One row per (mapping, pattern node) pair.
fn write_mappings(
    path: &Path,
    set: &MatchSet<usize, String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["mapping", "pattern_node", "account"])?;
    for (i, mapping) in set.iter().enumerate() {
        for (p, account) in mapping.iter() {
            writer.write_record([i.to_string(), p.to_string(), account.clone()])?;
        }
    }
    writer.flush()?;
    Ok(())
}
