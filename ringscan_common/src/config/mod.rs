//! Configuration for the structural pattern search.
//!
//! This module exposes a small, stable surface for consumers (the matcher
//! crate and the command-line front end) to parameterize how matching should
//! behave.
//!
//! The main knobs are:
//! - semantics: whether extra target edges among the mapped accounts are
//!   tolerated (monomorphism) or forbidden (induced).
//! - dedupe: whether eager enumeration keeps every raw mapping or collapses
//!   mappings that land on the same set of target nodes.
//! - max_steps: a cooperative budget on the number of search extensions.
//!
//! Quick examples
//!
//! Default behavior (monomorphism, raw mappings):
//! ```
//! use ringscan_common::{Config, Dedupe, MatchSemantics};
//! let cfg = Config::default();
//! assert_eq!(cfg.semantics, MatchSemantics::Monomorphism);
//! assert_eq!(cfg.dedupe, Dedupe::None);
//! ```
//!
//! One result per physical ring, bounded search:
//! ```
//! use ringscan_common::Config;
//! let cfg = Config::builder().node_set().max_steps(10_000).build();
//! assert!(cfg.dedupe.node_set());
//! ```

use serde::{Deserialize, Serialize};

/// Global search configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which edges the mapped target nodes may carry beyond the pattern's.
    pub semantics: MatchSemantics,
    /// How eager enumeration deduplicates its results.
    pub dedupe: Dedupe,
    /// Upper bound on search extensions before the search gives up.
    pub max_steps: Option<usize>,
    /// Treat an empty pattern as a single vacuous match instead of an error.
    pub allow_empty_pattern: bool,
    /// Split eager enumeration across worker threads when available.
    pub parallel: bool,
}

impl Config {
    /// Start building a configuration from the defaults.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Returns true once `steps` extensions have used up the budget.
    #[must_use]
    pub fn budget_exceeded(&self, steps: usize) -> bool {
        self.max_steps.is_some_and(|limit| steps > limit)
    }
}

impl Default for Config {
    /// Monomorphism, no dedupe, unbounded, sequential.
    fn default() -> Self {
        Self {
            semantics: MatchSemantics::Monomorphism,
            dedupe: Dedupe::None,
            max_steps: None,
            allow_empty_pattern: false,
            parallel: false,
        }
    }
}

/// Edge semantics of a match.
///
/// - Monomorphism:
///     Every pattern edge must be present between the mapped target nodes;
///     the target may have more. A ring coexisting with ordinary transfers
///     among the same accounts is still reported.
/// - Induced:
///     Additionally, no target edge may join two mapped nodes unless the
///     pattern has the corresponding edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchSemantics {
    /// Extra target edges among mapped nodes are tolerated.
    #[default]
    Monomorphism,
    /// Mapped nodes must carry exactly the pattern's edges.
    Induced,
}

impl MatchSemantics {
    /// Whether the induced negative check is active.
    #[must_use]
    pub const fn is_induced(self) -> bool {
        matches!(self, Self::Induced)
    }
}

/// Control how eager enumeration deduplicates matches.
///
/// - None:
///     Every raw mapping is kept. A directed triangle found once in the
///     target is reported three times, once per rotation.
/// - NodeSet:
///     Mappings that cover the same SET of target nodes are collapsed into
///     one occurrence, regardless of which pattern node went where.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dedupe {
    /// Keep every raw mapping.
    #[default]
    None,
    /// Collapse mappings onto the same target node set.
    NodeSet,
}

impl Dedupe {
    /// Whether results are collapsed by target node set.
    #[must_use]
    pub const fn node_set(self) -> bool {
        matches!(self, Self::NodeSet)
    }
}

/// Builder for [`Config`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the match semantics.
    #[must_use]
    pub const fn semantics(mut self, semantics: MatchSemantics) -> Self {
        self.config.semantics = semantics;
        self
    }

    /// Tolerate extra target edges (the default).
    #[must_use]
    pub const fn monomorphism(self) -> Self {
        self.semantics(MatchSemantics::Monomorphism)
    }

    /// Forbid target edges the pattern does not have.
    #[must_use]
    pub const fn induced(self) -> Self {
        self.semantics(MatchSemantics::Induced)
    }

    /// Set the dedupe mode.
    #[must_use]
    pub const fn dedupe(mut self, dedupe: Dedupe) -> Self {
        self.config.dedupe = dedupe;
        self
    }

    /// Keep every raw mapping.
    #[must_use]
    pub const fn none(self) -> Self {
        self.dedupe(Dedupe::None)
    }

    /// Collapse mappings by target node set.
    #[must_use]
    pub const fn node_set(self) -> Self {
        self.dedupe(Dedupe::NodeSet)
    }

    /// Bound the number of search extensions.
    #[must_use]
    pub const fn max_steps(mut self, steps: usize) -> Self {
        self.config.max_steps = Some(steps);
        self
    }

    /// Remove any search budget.
    #[must_use]
    pub const fn unbounded(mut self) -> Self {
        self.config.max_steps = None;
        self
    }

    /// Accept empty patterns as a single vacuous match.
    #[must_use]
    pub const fn allow_empty_pattern(mut self, allow: bool) -> Self {
        self.config.allow_empty_pattern = allow;
        self
    }

    /// Request the parallel search for eager enumeration.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Config {
        tracing::debug!("search config: {:?}", self.config);
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let cfg = Config::builder()
            .induced()
            .node_set()
            .max_steps(5)
            .allow_empty_pattern(true)
            .parallel(true)
            .build();

        assert!(cfg.semantics.is_induced());
        assert!(cfg.dedupe.node_set());
        assert_eq!(cfg.max_steps, Some(5));
        assert!(cfg.allow_empty_pattern);
        assert!(cfg.parallel);
    }

    #[test]
    fn budget_is_inclusive_of_limit() {
        let cfg = Config::builder().max_steps(3).build();
        assert!(!cfg.budget_exceeded(3));
        assert!(cfg.budget_exceeded(4));
        assert!(!Config::default().budget_exceeded(usize::MAX));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: Config = serde_json::from_str(r#"{ "dedupe": "node-set" }"#).unwrap();
        assert_eq!(cfg.dedupe, Dedupe::NodeSet);
        assert_eq!(cfg.semantics, MatchSemantics::Monomorphism);
        assert_eq!(cfg.max_steps, None);
    }
}
