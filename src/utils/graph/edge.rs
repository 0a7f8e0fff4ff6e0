//! Edge identifier for directed graphs.
//!
//! [`EdgeId`] is a strongly-typed index into a graph's edge table, distinct at
//! the type level from [`NodeId`](crate::utils::graph::NodeId).

use std::fmt;

/// A strongly-typed identifier for edges within a directed graph.
///
/// `EdgeId` wraps a `usize` index. Edge IDs are assigned sequentially starting
/// from 0 when edges are added to a graph and can be used to query edge data
/// and endpoints.
///
/// # Examples
///
/// ```rust,ignore
/// use unssa::utils::graph::{DirectedGraph, EdgeId};
///
/// let mut graph: DirectedGraph<&str, &str> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// let edge: EdgeId = graph.add_edge(a, b, "fallthrough")?;
///
/// assert_eq!(graph.edge(edge), Some(&"fallthrough"));
/// assert_eq!(graph.edge_endpoints(edge), Some((a, b)));
/// # Ok::<(), unssa::Error>(())
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    /// Creates a new `EdgeId` from a raw index value.
    ///
    /// Normal usage obtains `EdgeId` values from
    /// [`DirectedGraph::add_edge`](crate::utils::graph::DirectedGraph::add_edge);
    /// this constructor exists for internal use and testing.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        EdgeId(index)
    }

    /// Returns the raw 0-based index of this edge identifier.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl From<usize> for EdgeId {
    #[inline]
    fn from(index: usize) -> Self {
        EdgeId(index)
    }
}

impl From<EdgeId> for usize {
    #[inline]
    fn from(edge: EdgeId) -> Self {
        edge.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_id_new_and_index() {
        let edge = EdgeId::new(42);
        assert_eq!(edge.index(), 42);
    }

    #[test]
    fn test_edge_id_ordering() {
        let mut edges = vec![EdgeId::new(3), EdgeId::new(1), EdgeId::new(2)];
        edges.sort();
        assert_eq!(edges, vec![EdgeId::new(1), EdgeId::new(2), EdgeId::new(3)]);
    }

    #[test]
    fn test_edge_id_conversions() {
        let edge: EdgeId = 7usize.into();
        assert_eq!(edge.index(), 7);
        let value: usize = edge.into();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_edge_id_formats() {
        let edge = EdgeId::new(42);
        assert_eq!(format!("{edge:?}"), "EdgeId(42)");
        assert_eq!(format!("{edge}"), "e42");
    }

    #[test]
    fn test_edge_id_distinct_from_node_id() {
        use crate::utils::graph::NodeId;

        let node = NodeId::new(5);
        let edge = EdgeId::new(5);
        assert_eq!(node.index(), edge.index());
        // A NodeId is not assignable to an EdgeId (and vice versa); the
        // separation is enforced at compile time.
    }
}
