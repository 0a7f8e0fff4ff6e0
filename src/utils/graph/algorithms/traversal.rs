//! Graph traversal orders.
//!
//! Lazy depth-first and breadth-first iterators plus eager postorder and
//! reverse-postorder computation. Reverse postorder is the iteration order the
//! dataflow solver seeds its worklist with for forward problems; plain
//! postorder seeds backward problems.

use std::collections::VecDeque;

use crate::utils::graph::{NodeId, Successors};

/// A lazy depth-first traversal over a graph's successor relation.
///
/// Yields each reachable node exactly once, in discovery order. Sibling
/// successors are visited in reverse insertion order due to the explicit
/// stack; use [`postorder`] when a deterministic analysis order is needed.
pub struct DfsIterator<'a, G: Successors> {
    graph: &'a G,
    stack: Vec<NodeId>,
    visited: Vec<bool>,
}

impl<'a, G: Successors> DfsIterator<'a, G> {
    /// Creates a depth-first traversal starting at `start`.
    ///
    /// A start node outside the graph yields nothing.
    pub fn new(graph: &'a G, start: NodeId) -> Self {
        let visited = vec![false; graph.node_count()];
        let stack = if start.index() < graph.node_count() {
            vec![start]
        } else {
            Vec::new()
        };
        Self {
            graph,
            stack,
            visited,
        }
    }
}

impl<G: Successors> Iterator for DfsIterator<'_, G> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if self.visited[node.index()] {
                continue;
            }
            self.visited[node.index()] = true;
            for succ in self.graph.successors(node) {
                if !self.visited[succ.index()] {
                    self.stack.push(succ);
                }
            }
            return Some(node);
        }
        None
    }
}

/// A lazy breadth-first traversal over a graph's successor relation.
///
/// Yields each reachable node exactly once, in order of increasing edge
/// distance from the start.
pub struct BfsIterator<'a, G: Successors> {
    graph: &'a G,
    queue: VecDeque<NodeId>,
    visited: Vec<bool>,
}

impl<'a, G: Successors> BfsIterator<'a, G> {
    /// Creates a breadth-first traversal starting at `start`.
    ///
    /// A start node outside the graph yields nothing.
    pub fn new(graph: &'a G, start: NodeId) -> Self {
        let mut visited = vec![false; graph.node_count()];
        let mut queue = VecDeque::new();
        if start.index() < graph.node_count() {
            visited[start.index()] = true;
            queue.push_back(start);
        }
        Self {
            graph,
            queue,
            visited,
        }
    }
}

impl<G: Successors> Iterator for BfsIterator<'_, G> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        for succ in self.graph.successors(node) {
            if !self.visited[succ.index()] {
                self.visited[succ.index()] = true;
                self.queue.push_back(succ);
            }
        }
        Some(node)
    }
}

/// Traversal event on the explicit DFS stack.
enum State {
    Enter,
    Exit,
}

/// Computes the postorder of all nodes reachable from `start`.
///
/// A node appears after all of its DFS-tree descendants. Implemented with an
/// explicit stack so deep graphs cannot overflow the call stack.
#[must_use]
pub fn postorder<G: Successors>(graph: &G, start: NodeId) -> Vec<NodeId> {
    let mut order = Vec::new();
    if start.index() >= graph.node_count() {
        return order;
    }

    let mut visited = vec![false; graph.node_count()];
    let mut stack = vec![(start, State::Enter)];
    visited[start.index()] = true;

    while let Some((node, state)) = stack.pop() {
        match state {
            State::Enter => {
                stack.push((node, State::Exit));
                for succ in graph.successors(node) {
                    if !visited[succ.index()] {
                        visited[succ.index()] = true;
                        stack.push((succ, State::Enter));
                    }
                }
            }
            State::Exit => order.push(node),
        }
    }
    order
}

/// Computes the reverse postorder of all nodes reachable from `start`.
///
/// Every node appears before its successors on forward (non-back) edges,
/// which makes this the natural visiting order for forward dataflow.
#[must_use]
pub fn reverse_postorder<G: Successors>(graph: &G, start: NodeId) -> Vec<NodeId> {
    let mut order = postorder(graph, start);
    order.reverse();
    order
}
