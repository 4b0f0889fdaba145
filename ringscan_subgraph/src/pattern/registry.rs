use indexmap::IndexMap;

use super::Pattern;
use crate::error::SubgraphError;

/// Name of the built-in circular-trading pattern (a directed triangle).
pub const CIRCULAR: &str = "circular";

/// Prefix of generated cycle names, e.g. `cycle-5`.
const CYCLE_PREFIX: &str = "cycle-";

/// Named collection of search patterns.
///
/// Starts with the built-in [`CIRCULAR`] pattern. Names of the form
/// `cycle-N` resolve to the directed N-cycle without being registered.
#[derive(Clone, Debug)]
pub struct PatternRegistry {
    patterns: IndexMap<String, Pattern<usize>>,
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl PatternRegistry {
    /// A registry with no patterns at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            patterns: IndexMap::new(),
        }
    }

    /// A registry holding the built-in patterns.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut patterns = IndexMap::new();
        patterns.insert(CIRCULAR.to_owned(), Pattern::directed_cycle(3));
        Self { patterns }
    }

    /// Register a custom pattern under `name`.
    ///
    /// # Errors
    /// [`SubgraphError::InvalidPattern`] if the name is taken or the pattern
    /// does not validate.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        pattern: Pattern<usize>,
    ) -> Result<(), SubgraphError> {
        let name = name.into();
        if self.patterns.contains_key(&name) {
            return Err(SubgraphError::invalid_pattern(format!(
                "pattern '{name}' is already registered"
            )));
        }
        pattern.validate()?;
        tracing::debug!(
            "registered pattern '{}' ({} nodes, {} edges)",
            name,
            pattern.node_count(),
            pattern.edge_count()
        );
        self.patterns.insert(name, pattern);
        Ok(())
    }

    /// A registered pattern by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Pattern<usize>> {
        self.patterns.get(name)
    }

    /// A registered pattern, or a generated `cycle-N`.
    ///
    /// # Errors
    /// [`SubgraphError::InvalidPattern`] if the name is unknown or `N` is not
    /// a positive integer.
    pub fn resolve(&self, name: &str) -> Result<Pattern<usize>, SubgraphError> {
        if let Some(p) = self.get(name) {
            return Ok(p.clone());
        }
        let Some(len) = name.strip_prefix(CYCLE_PREFIX) else {
            return Err(SubgraphError::invalid_pattern(format!(
                "unknown pattern '{name}'"
            )));
        };
        match len.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Pattern::directed_cycle(n)),
            _ => Err(SubgraphError::invalid_pattern(format!(
                "bad cycle length in '{name}'"
            ))),
        }
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }
}
