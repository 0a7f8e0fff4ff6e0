//! Node identifier for directed graphs.
//!
//! [`NodeId`] is a strongly-typed index into a graph's node table. The newtype
//! wrapper keeps node indices from being confused with other integer values,
//! in particular with edge indices or variable ids.

use std::fmt;

/// A strongly-typed identifier for nodes within a directed graph.
///
/// `NodeId` wraps a `usize` index. Node IDs are assigned sequentially starting
/// from 0 when nodes are added to a graph, so they can double as positions into
/// per-node side tables (dominator arrays, liveness results).
///
/// # Examples
///
/// ```rust,ignore
/// use unssa::utils::graph::{DirectedGraph, NodeId};
///
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let entry: NodeId = graph.add_node("entry");
/// let exit: NodeId = graph.add_node("exit");
///
/// assert_ne!(entry, exit);
/// assert_eq!(entry.index(), 0);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Creates a new `NodeId` from a raw index value.
    ///
    /// Normal usage obtains `NodeId` values from
    /// [`DirectedGraph::add_node`](crate::utils::graph::DirectedGraph::add_node);
    /// this constructor exists for internal use and testing.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Returns the raw 0-based index of this node identifier.
    ///
    /// Suitable for indexing vectors that store per-node data.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(node: NodeId) -> Self {
        node.0
    }
}
