//! Attribute predicates attached to pattern nodes and edges.
//!
//! A predicate sees the pattern element's attributes and the candidate target
//! element's attributes, and decides whether the pair may be matched. It is
//! evaluated only during the feasibility check, after the structural rules
//! have passed.

use std::fmt;

use crate::graph::{AttrValue, Attrs};

/// Semantic filter for a (pattern element, target element) pair.
pub trait AttrPredicate: Send + Sync {
    /// Returns true if the target element may stand in for the pattern element.
    fn matches(&self, pattern: &Attrs, target: &Attrs) -> bool;
}

impl<F> AttrPredicate for F
where
    F: Fn(&Attrs, &Attrs) -> bool + Send + Sync,
{
    fn matches(&self, pattern: &Attrs, target: &Attrs) -> bool {
        self(pattern, target)
    }
}

/// Target attribute `key` must equal `value`.
///
/// ```
/// use ringscan_subgraph::{attrs, AttrEquals, AttrPredicate, AttrValue, Attrs};
/// let fraud = AttrEquals::new("type", "fraud");
/// assert!(fraud.matches(&Attrs::new(), &attrs([("type", AttrValue::from("fraud"))])));
/// assert!(!fraud.matches(&Attrs::new(), &Attrs::new()));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AttrEquals {
    key: String,
    value: AttrValue,
}

impl AttrEquals {
    /// Require `key == value` on the target element.
    pub fn new(key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl AttrPredicate for AttrEquals {
    fn matches(&self, _pattern: &Attrs, target: &Attrs) -> bool {
        target.get(&self.key) == Some(&self.value)
    }
}

/// Predicate over the target attributes only.
pub struct TargetFilter<F>(F);

impl<F> fmt::Debug for TargetFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TargetFilter(..)")
    }
}

/// Wrap a plain `attribute map -> bool` function as a predicate.
pub fn target_filter<F>(f: F) -> TargetFilter<F>
where
    F: Fn(&Attrs) -> bool + Send + Sync,
{
    TargetFilter(f)
}

impl<F> AttrPredicate for TargetFilter<F>
where
    F: Fn(&Attrs) -> bool + Send + Sync,
{
    fn matches(&self, _pattern: &Attrs, target: &Attrs) -> bool {
        (self.0)(target)
    }
}
