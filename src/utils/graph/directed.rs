//! Core directed graph implementation.
//!
//! [`DirectedGraph`] is an adjacency-list directed multigraph with typed node
//! and edge data. Nodes are stored in a [`Cow`] slice so a graph can either own
//! its node data or borrow it from a longer-lived table; edges always live in
//! the graph. Node and edge identifiers are dense indices, which lets the
//! algorithms in this crate use plain vectors for per-node state.

use std::borrow::Cow;

use crate::{
    utils::graph::{EdgeId, GraphBase, NodeId, Predecessors, Successors},
    Error, Result,
};

/// Storage for a single edge: its endpoints and attached data.
#[derive(Debug, Clone)]
struct EdgeData<E> {
    source: NodeId,
    target: NodeId,
    data: E,
}

/// A directed graph with typed node data `N` and edge data `E`.
///
/// Parallel edges and self-loops are permitted. Nodes and edges can be added
/// but not removed; identifiers stay stable for the life of the graph.
///
/// # Examples
///
/// ```rust,ignore
/// use unssa::utils::graph::DirectedGraph;
///
/// let mut graph: DirectedGraph<&str, u32> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// graph.add_edge(a, b, 1)?;
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.successors(a).count(), 1);
/// # Ok::<(), unssa::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirectedGraph<'a, N: Clone, E> {
    /// Node data, either owned or borrowed from an external table.
    nodes: Cow<'a, [N]>,
    /// Edge endpoint and data storage, indexed by [`EdgeId`].
    edges: Vec<EdgeData<E>>,
    /// Outgoing edge lists, indexed by node.
    outgoing: Vec<Vec<EdgeId>>,
    /// Incoming edge lists, indexed by node.
    incoming: Vec<Vec<EdgeId>>,
}

impl<N: Clone, E> DirectedGraph<'static, N, E> {
    /// Creates a new empty graph that owns its node data.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Cow::Owned(Vec::new()),
            edges: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// Creates a new empty graph with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(node_cap: usize, edge_cap: usize) -> Self {
        Self {
            nodes: Cow::Owned(Vec::with_capacity(node_cap)),
            edges: Vec::with_capacity(edge_cap),
            outgoing: Vec::with_capacity(node_cap),
            incoming: Vec::with_capacity(node_cap),
        }
    }

    /// Adds a node with the given data and returns its identifier.
    pub fn add_node(&mut self, data: N) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.to_mut().push(data);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Returns a mutable reference to the data of `node`, if it exists.
    pub fn node_mut(&mut self, node: NodeId) -> Option<&mut N> {
        self.nodes.to_mut().get_mut(node.index())
    }
}

impl<N: Clone, E> Default for DirectedGraph<'static, N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, N: Clone, E> DirectedGraph<'a, N, E> {
    /// Creates a graph whose node data borrows from an external slice.
    ///
    /// The graph starts with one node per slice element and no edges.
    #[must_use]
    pub fn from_nodes_borrowed(nodes: &'a [N]) -> Self {
        let count = nodes.len();
        Self {
            nodes: Cow::Borrowed(nodes),
            edges: Vec::new(),
            outgoing: vec![Vec::new(); count],
            incoming: vec![Vec::new(); count],
        }
    }

    /// Converts this graph into one that owns its node data.
    #[must_use]
    pub fn into_owned(self) -> DirectedGraph<'static, N, E> {
        DirectedGraph {
            nodes: Cow::Owned(self.nodes.into_owned()),
            edges: self.edges,
            outgoing: self.outgoing,
            incoming: self.incoming,
        }
    }

    /// Returns `true` if this graph owns its node data.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        matches!(self.nodes, Cow::Owned(_))
    }

    /// Returns a reference to the data of `node`, if it exists.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&N> {
        self.nodes.get(node.index())
    }

    /// Returns the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns an iterator over all node identifiers.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Returns an iterator over `(NodeId, &N)` pairs.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i), n))
    }

    /// Adds an edge from `source` to `target` with the given data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if either endpoint does not exist.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, data: E) -> Result<EdgeId> {
        if source.index() >= self.nodes.len() {
            return Err(Error::GraphError(format!(
                "source node {} does not exist in graph with {} nodes",
                source,
                self.nodes.len()
            )));
        }
        if target.index() >= self.nodes.len() {
            return Err(Error::GraphError(format!(
                "target node {} does not exist in graph with {} nodes",
                target,
                self.nodes.len()
            )));
        }

        let id = EdgeId::new(self.edges.len());
        self.edges.push(EdgeData {
            source,
            target,
            data,
        });
        self.outgoing[source.index()].push(id);
        self.incoming[target.index()].push(id);
        Ok(id)
    }

    /// Returns a reference to the data of `edge`, if it exists.
    #[must_use]
    pub fn edge(&self, edge: EdgeId) -> Option<&E> {
        self.edges.get(edge.index()).map(|e| &e.data)
    }

    /// Returns a mutable reference to the data of `edge`, if it exists.
    pub fn edge_mut(&mut self, edge: EdgeId) -> Option<&mut E> {
        self.edges.get_mut(edge.index()).map(|e| &mut e.data)
    }

    /// Returns the `(source, target)` endpoints of `edge`, if it exists.
    #[must_use]
    pub fn edge_endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        self.edges.get(edge.index()).map(|e| (e.source, e.target))
    }

    /// Returns the number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns an iterator over all edge identifiers.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Returns an iterator over `(EdgeId, source, target, &E)` tuples.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, NodeId, NodeId, &E)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i), e.source, e.target, &e.data))
    }

    /// Returns an iterator over the direct successors of `node`.
    ///
    /// Yields one entry per outgoing edge; parallel edges produce duplicates.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing
            .get(node.index())
            .into_iter()
            .flatten()
            .map(|e| self.edges[e.index()].target)
    }

    /// Returns an iterator over the direct predecessors of `node`.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming
            .get(node.index())
            .into_iter()
            .flatten()
            .map(|e| self.edges[e.index()].source)
    }

    /// Returns an iterator over `(EdgeId, &E)` for the outgoing edges of `node`.
    pub fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, &E)> + '_ {
        self.outgoing
            .get(node.index())
            .into_iter()
            .flatten()
            .map(|e| (*e, &self.edges[e.index()].data))
    }

    /// Returns an iterator over `(EdgeId, &E)` for the incoming edges of `node`.
    pub fn incoming_edges(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, &E)> + '_ {
        self.incoming
            .get(node.index())
            .into_iter()
            .flatten()
            .map(|e| (*e, &self.edges[e.index()].data))
    }

    /// Returns the number of outgoing edges of `node`.
    #[must_use]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.outgoing.get(node.index()).map_or(0, Vec::len)
    }

    /// Returns the number of incoming edges of `node`.
    #[must_use]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.incoming.get(node.index()).map_or(0, Vec::len)
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns all nodes with no incoming edges.
    #[must_use]
    pub fn entry_nodes(&self) -> Vec<NodeId> {
        self.node_ids().filter(|n| self.in_degree(*n) == 0).collect()
    }

    /// Returns all nodes with no outgoing edges.
    #[must_use]
    pub fn exit_nodes(&self) -> Vec<NodeId> {
        self.node_ids()
            .filter(|n| self.out_degree(*n) == 0)
            .collect()
    }

    /// Returns `true` if `node` exists in the graph.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.nodes.len()
    }

    /// Returns `true` if at least one edge runs from `source` to `target`.
    #[must_use]
    pub fn contains_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.successors(source).any(|t| t == target)
    }
}

impl<N: Clone, E> GraphBase for DirectedGraph<'_, N, E> {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }
}

impl<N: Clone, E> Successors for DirectedGraph<'_, N, E> {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        DirectedGraph::successors(self, node)
    }
}

impl<N: Clone, E> Predecessors for DirectedGraph<'_, N, E> {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        DirectedGraph::predecessors(self, node)
    }
}
