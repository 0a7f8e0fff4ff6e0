//! Dominance computation for rooted directed graphs.
//!
//! Node `d` dominates node `n` when every path from the entry to `n` passes
//! through `d`. This module computes immediate dominators with the
//! Lengauer–Tarjan algorithm (the path-compression variant, near-linear in
//! practice), packages them as a [`DominatorTree`], and derives dominance
//! frontiers and iterated dominance frontiers from the tree.
//!
//! The frontier of `n` is the set of nodes where `n`'s dominance ends: nodes
//! with a predecessor dominated by `n` that are not themselves strictly
//! dominated by `n`. Frontiers are computed bottom-up over the dominator tree;
//! the iterated frontier is the transitive closure of the frontier relation,
//! computed per node without memoization.

use std::collections::{HashSet, VecDeque};

use crate::{
    utils::graph::{GraphBase, NodeId, Predecessors, Successors},
    Error, Result,
};

/// Marker for "no node" in the internal index arrays.
const UNDEFINED: NodeId = NodeId(usize::MAX);

/// The dominator tree of a rooted directed graph.
///
/// Stores the immediate dominator of every reachable node; unreachable nodes
/// have no dominator and answer `false`/`None` to all queries. The entry node
/// is recorded as its own immediate dominator internally but reported as
/// having none.
#[derive(Debug, Clone)]
pub struct DominatorTree {
    entry: NodeId,
    /// Immediate dominators indexed by node; [`UNDEFINED`] for unreachable nodes.
    idom: Vec<NodeId>,
    node_count: usize,
}

impl DominatorTree {
    /// Returns the entry node this tree is rooted at.
    #[must_use]
    pub const fn entry(&self) -> NodeId {
        self.entry
    }

    /// Returns the number of nodes in the underlying graph.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// Returns the immediate dominator of `node`.
    ///
    /// Returns `None` for the entry node, for unreachable nodes, and for
    /// nodes outside the graph.
    #[must_use]
    pub fn immediate_dominator(&self, node: NodeId) -> Option<NodeId> {
        if node == self.entry || node.index() >= self.node_count {
            return None;
        }
        match self.idom[node.index()] {
            UNDEFINED => None,
            idom => Some(idom),
        }
    }

    /// Returns `true` if `node` is reachable from the entry.
    #[must_use]
    pub fn is_reachable(&self, node: NodeId) -> bool {
        node.index() < self.node_count && self.idom[node.index()] != UNDEFINED
    }

    /// Returns `true` if `a` dominates `b` (reflexively).
    ///
    /// Walks the immediate dominator chain of `b` up to the entry.
    #[must_use]
    pub fn dominates(&self, a: NodeId, b: NodeId) -> bool {
        if !self.is_reachable(a) || !self.is_reachable(b) {
            return false;
        }
        let mut current = b;
        loop {
            if current == a {
                return true;
            }
            if current == self.entry {
                return false;
            }
            current = self.idom[current.index()];
        }
    }

    /// Returns `true` if `a` dominates `b` and `a != b`.
    #[must_use]
    pub fn strictly_dominates(&self, a: NodeId, b: NodeId) -> bool {
        a != b && self.dominates(a, b)
    }

    /// Returns an iterator over all dominators of `node`, from the node itself
    /// up to the entry. Empty for unreachable nodes.
    pub fn dominators(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let start = if self.is_reachable(node) {
            Some(node)
        } else {
            None
        };
        std::iter::successors(start, move |&current| {
            if current == self.entry {
                None
            } else {
                Some(self.idom[current.index()])
            }
        })
    }

    /// Returns the depth of `node` in the tree (entry has depth 0), or `None`
    /// for unreachable nodes.
    #[must_use]
    pub fn depth(&self, node: NodeId) -> Option<usize> {
        if !self.is_reachable(node) {
            return None;
        }
        Some(self.dominators(node).count() - 1)
    }

    /// Returns the children of `node` in the dominator tree.
    ///
    /// Linear scan over all nodes; use [`DominatorTree::children_map`] when
    /// iterating the whole tree.
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        (0..self.node_count)
            .map(NodeId::new)
            .filter(|&n| n != self.entry && self.idom[n.index()] == node)
            .collect()
    }

    /// Returns the full child adjacency of the dominator tree, indexed by node.
    #[must_use]
    pub fn children_map(&self) -> Vec<Vec<NodeId>> {
        let mut children = vec![Vec::new(); self.node_count];
        for i in 0..self.node_count {
            let node = NodeId::new(i);
            if node == self.entry {
                continue;
            }
            let idom = self.idom[i];
            if idom != UNDEFINED {
                children[idom.index()].push(node);
            }
        }
        children
    }

    /// Returns a preorder of the dominator tree.
    ///
    /// Every node appears after all of its strict dominators, which makes
    /// this the ordering used for def indices and congruence class sorting.
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        let children = self.children_map();
        let mut order = Vec::with_capacity(self.node_count);
        let mut stack = vec![self.entry];
        while let Some(node) = stack.pop() {
            order.push(node);
            // Push in reverse so children pop in ascending id order.
            for &child in children[node.index()].iter().rev() {
                stack.push(child);
            }
        }
        order
    }
}

/// Computes the dominator tree of `graph` rooted at `entry` using the
/// Lengauer–Tarjan algorithm.
///
/// Runs in O((V + E) α(V)) with the path-compression `eval`. Nodes not
/// reachable from `entry` are left out of the tree.
///
/// # Errors
///
/// Returns [`Error::GraphError`] if the graph is empty or `entry` is not a
/// valid node.
pub fn compute_dominators<G>(graph: &G, entry: NodeId) -> Result<DominatorTree>
where
    G: Successors + Predecessors + GraphBase,
{
    if graph.node_count() == 0 {
        return Err(Error::GraphError(
            "cannot compute dominators of an empty graph".to_string(),
        ));
    }
    if entry.index() >= graph.node_count() {
        return Err(Error::GraphError(format!(
            "entry node {} does not exist in graph with {} nodes",
            entry,
            graph.node_count()
        )));
    }

    let mut lt = LengauerTarjan::new(graph.node_count(), entry);
    lt.run(graph);

    Ok(DominatorTree {
        entry,
        idom: lt.idom,
        node_count: graph.node_count(),
    })
}

/// Working state of the Lengauer–Tarjan computation.
struct LengauerTarjan {
    entry: NodeId,
    /// DFS numbers, 1-based; 0 means unreachable.
    dfnum: Vec<usize>,
    /// Nodes by DFS number (`vertex[dfnum - 1]`).
    vertex: Vec<NodeId>,
    /// DFS tree parents.
    parent: Vec<NodeId>,
    /// Semidominators.
    semi: Vec<NodeId>,
    /// Immediate dominators (the result).
    idom: Vec<NodeId>,
    /// Forest links for `eval`.
    ancestor: Vec<NodeId>,
    /// Minimum-semi node on the compressed path.
    best: Vec<NodeId>,
    /// Nodes whose semidominator is the index node.
    bucket: Vec<Vec<NodeId>>,
}

impl LengauerTarjan {
    fn new(n: usize, entry: NodeId) -> Self {
        Self {
            entry,
            dfnum: vec![0; n],
            vertex: Vec::with_capacity(n),
            parent: vec![UNDEFINED; n],
            semi: (0..n).map(NodeId::new).collect(),
            idom: vec![UNDEFINED; n],
            ancestor: vec![UNDEFINED; n],
            best: (0..n).map(NodeId::new).collect(),
            bucket: vec![Vec::new(); n],
        }
    }

    fn run<G>(&mut self, graph: &G)
    where
        G: Successors + Predecessors + GraphBase,
    {
        self.dfs(graph);

        // Process vertices in decreasing DFS number, computing semidominators
        // and filling the buckets.
        for i in (1..self.vertex.len()).rev() {
            let w = self.vertex[i];
            let p = self.parent[w.index()];

            let mut s = p;
            for v in graph.predecessors(w) {
                if self.dfnum[v.index()] == 0 {
                    continue;
                }
                let candidate = if self.dfnum[v.index()] <= self.dfnum[w.index()] {
                    v
                } else {
                    let u = self.eval(v);
                    self.semi[u.index()]
                };
                if self.dfnum[candidate.index()] < self.dfnum[s.index()] {
                    s = candidate;
                }
            }

            self.semi[w.index()] = s;
            self.bucket[s.index()].push(w);
            self.ancestor[w.index()] = p;

            for v in std::mem::take(&mut self.bucket[p.index()]) {
                let u = self.eval(v);
                self.idom[v.index()] =
                    if self.dfnum[self.semi[u.index()].index()] < self.dfnum[self.semi[v.index()].index()] {
                        u
                    } else {
                        p
                    };
            }
        }

        // Final pass in increasing DFS number resolves deferred dominators.
        for i in 1..self.vertex.len() {
            let w = self.vertex[i];
            if self.idom[w.index()] != self.semi[w.index()] {
                self.idom[w.index()] = self.idom[self.idom[w.index()].index()];
            }
        }
        self.idom[self.entry.index()] = self.entry;
    }

    /// Iterative DFS assigning numbers, vertex order and tree parents.
    fn dfs<G: Successors>(&mut self, graph: &G) {
        let mut stack = vec![(self.entry, UNDEFINED)];
        while let Some((node, parent)) = stack.pop() {
            if self.dfnum[node.index()] != 0 {
                continue;
            }
            self.dfnum[node.index()] = self.vertex.len() + 1;
            self.vertex.push(node);
            self.parent[node.index()] = parent;
            for succ in graph.successors(node) {
                if self.dfnum[succ.index()] == 0 {
                    stack.push((succ, node));
                }
            }
        }
    }

    /// Returns the node with minimal semidominator on the forest path above
    /// `v`, compressing the path as a side effect.
    fn eval(&mut self, v: NodeId) -> NodeId {
        if self.ancestor[v.index()] == UNDEFINED {
            return v;
        }

        // Collect the ancestor chain, then compress top-down.
        let mut chain = vec![v];
        let mut current = v;
        while self.ancestor[self.ancestor[current.index()].index()] != UNDEFINED {
            current = self.ancestor[current.index()];
            chain.push(current);
        }
        for &node in chain.iter().rev() {
            let anc = self.ancestor[node.index()];
            let anc_best = self.best[anc.index()];
            if self.dfnum[self.semi[anc_best.index()].index()]
                < self.dfnum[self.semi[self.best[node.index()].index()].index()]
            {
                self.best[node.index()] = anc_best;
            }
            self.ancestor[node.index()] = self.ancestor[anc.index()];
        }
        // The topmost link is left in place; its best is already exact.
        self.best[v.index()]
    }
}

/// Computes the dominance frontier of every node.
///
/// Walks the dominator tree bottom-up (children before parents): a node's
/// frontier is its CFG successors whose immediate dominator is someone else,
/// plus the frontier members inherited from its tree children that it does
/// not strictly dominate. Unreachable nodes get empty frontiers.
#[must_use]
pub fn compute_dominance_frontiers<G>(graph: &G, tree: &DominatorTree) -> Vec<HashSet<NodeId>>
where
    G: Successors + GraphBase,
{
    let mut frontiers: Vec<HashSet<NodeId>> = vec![HashSet::new(); tree.node_count()];
    let children = tree.children_map();
    let idom = |n: NodeId| tree.immediate_dominator(n);

    // Reverse preorder visits every child before its parent.
    for &node in tree.preorder().iter().rev() {
        let mut frontier = HashSet::new();

        for succ in graph.successors(node) {
            if tree.is_reachable(succ) && idom(succ) != Some(node) {
                frontier.insert(succ);
            }
        }

        for &child in &children[node.index()] {
            for &m in &frontiers[child.index()] {
                if idom(m) != Some(node) {
                    frontier.insert(m);
                }
            }
        }

        frontiers[node.index()] = frontier;
    }
    frontiers
}

/// Computes the iterated dominance frontier of every node.
///
/// The iterated frontier IDF(n) is the least set containing DF(n) that is
/// closed under the frontier relation. Each node's closure is a standalone
/// breadth-first walk over `frontiers`; nothing is shared between nodes.
#[must_use]
pub fn compute_iterated_frontiers(frontiers: &[HashSet<NodeId>]) -> Vec<HashSet<NodeId>> {
    let mut iterated = Vec::with_capacity(frontiers.len());
    for i in 0..frontiers.len() {
        let mut result: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = frontiers[i].iter().copied().collect();
        let mut seen: HashSet<NodeId> = queue.iter().copied().collect();

        while let Some(node) = queue.pop_front() {
            result.insert(node);
            for &next in &frontiers[node.index()] {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        iterated.push(result);
    }
    iterated
}
