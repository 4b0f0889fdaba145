use contracts::*;
use std::fmt;

/// Local identifier of a node within one [`Graph`](super::Graph).
/// Exclusively used inside the matcher for dense array access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx {
    /// The underlying raw integer index.
    inner: u32,
}

impl NodeIdx {
    /// Creates a new local index from a raw integer.
    #[debug_ensures(ret.inner == id)]
    pub fn new(id: u32) -> Self {
        Self { inner: id }
    }

    /// The index for position `id`, or `None` if it does not fit in 32 bits.
    #[must_use]
    pub fn checked(id: usize) -> Option<Self> {
        u32::try_from(id).ok().map(Self::new)
    }

    /// Returns the index as a usize for array access.
    #[debug_ensures(ret == self.inner as usize)]
    pub fn as_usize(self) -> usize {
        self.inner as usize
    }
}

impl fmt::Display for NodeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.inner)
    }
}

/// Positions of nodes already stored in a graph always fit; new positions
/// go through [`NodeIdx::checked`].
impl From<usize> for NodeIdx {
    #[inline]
    fn from(id: usize) -> Self {
        debug_assert!(u32::try_from(id).is_ok(), "node index {id} overflows u32");
        Self { inner: id as u32 }
    }
}

impl From<NodeIdx> for usize {
    #[inline]
    fn from(id: NodeIdx) -> Self {
        id.inner as Self
    }
}
