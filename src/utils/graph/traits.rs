//! Capability traits for graph algorithms.
//!
//! The algorithms in [`algorithms`](crate::utils::graph::algorithms) are written
//! against these small traits instead of a concrete graph type, so they work on
//! [`DirectedGraph`](crate::utils::graph::DirectedGraph) and on any adapter that
//! exposes the same adjacency queries.

use crate::utils::graph::NodeId;

/// Basic properties every graph exposes: a node count and an id enumeration.
pub trait GraphBase {
    /// Returns the number of nodes in the graph.
    fn node_count(&self) -> usize;

    /// Returns an iterator over all node identifiers in the graph.
    fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_;
}

/// Forward adjacency: the nodes reachable via outgoing edges.
pub trait Successors: GraphBase {
    /// Returns an iterator over the direct successors of `node`.
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_;
}

/// Backward adjacency: the nodes reaching this one via incoming edges.
pub trait Predecessors: GraphBase {
    /// Returns an iterator over the direct predecessors of `node`.
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_;
}
