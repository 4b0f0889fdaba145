//! Attribute maps attached to nodes and edges.
//!
//! The structural matcher never looks at attributes; only pattern predicates
//! do.

use std::collections::BTreeMap;
use std::fmt;

/// Attribute map of a node or edge.
pub type Attrs = BTreeMap<String, AttrValue>;

/// A typed attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// Integer value, e.g. a transfer amount in minor units.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value, e.g. a transfer type.
    Str(String),
    /// Boolean flag.
    Bool(bool),
}

impl AttrValue {
    /// Numeric view of the value, if it has one.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// String view of the value, if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// Build an attribute map from key/value pairs.
///
/// ```
/// use ringscan_subgraph::{attrs, AttrValue};
/// let a = attrs([("type", AttrValue::from("fraud")), ("amount", 5_000_i64.into())]);
/// assert_eq!(a["type"], AttrValue::Str("fraud".into()));
/// ```
pub fn attrs<K, I>(pairs: I) -> Attrs
where
    K: Into<String>,
    I: IntoIterator<Item = (K, AttrValue)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
