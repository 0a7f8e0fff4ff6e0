//! Control-flow graph wrapper with cached dominance information.

use std::collections::HashSet;
use std::sync::OnceLock;

use crate::{
    analysis::{cfg::FlowKind, ssa::Function},
    utils::{
        escape_dot,
        graph::{
            algorithms::{
                compute_dominance_frontiers, compute_dominators, compute_iterated_frontiers,
                postorder, reverse_postorder, DominatorTree,
            },
            DirectedGraph, NodeId,
        },
    },
    Error, Result,
};

/// The control-flow graph of one function, with lazily computed dominance.
///
/// The graph is a snapshot of the function's block structure: one node per
/// block, one edge per flow edge. Statement and phi edits do not affect it;
/// only changes to blocks or flow edges require building a new graph (see the
/// invalidation notes on [`ControlFlowGraph::new`]).
///
/// Dominator tree, dominance frontiers and iterated frontiers are computed on
/// first use and cached. Queries take and return plain block ids.
#[derive(Debug)]
pub struct ControlFlowGraph {
    graph: DirectedGraph<'static, usize, FlowKind>,
    entry: NodeId,
    dominators: OnceLock<Result<DominatorTree>>,
    frontiers: OnceLock<Vec<HashSet<NodeId>>>,
    iterated: OnceLock<Vec<HashSet<NodeId>>>,
}

impl ControlFlowGraph {
    /// Builds the control-flow graph of `func`.
    ///
    /// The snapshot must be rebuilt whenever blocks or flow edges change.
    /// Statement-level rewriting inside existing blocks keeps a snapshot
    /// valid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if the function has no blocks, its entry
    /// id is out of range, or a flow edge references a missing block.
    pub fn new(func: &Function) -> Result<Self> {
        if func.blocks.is_empty() {
            return Err(Error::GraphError(
                "cannot build a control-flow graph for a function with no blocks".to_string(),
            ));
        }
        if func.entry >= func.blocks.len() {
            return Err(Error::GraphError(format!(
                "entry block {} does not exist in function with {} blocks",
                func.entry,
                func.blocks.len()
            )));
        }

        let mut graph = DirectedGraph::with_capacity(func.blocks.len(), func.blocks.len() * 2);
        for block in &func.blocks {
            graph.add_node(block.id);
        }
        for block in &func.blocks {
            for edge in &block.successors {
                graph.add_edge(
                    NodeId::new(block.id),
                    NodeId::new(edge.target),
                    edge.kind,
                )?;
            }
        }

        Ok(Self {
            graph,
            entry: NodeId::new(func.entry),
            dominators: OnceLock::new(),
            frontiers: OnceLock::new(),
            iterated: OnceLock::new(),
        })
    }

    /// Returns the entry block id.
    #[must_use]
    pub fn entry(&self) -> usize {
        self.entry.index()
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns an iterator over the successor block ids of `block`.
    pub fn successors(&self, block: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph.successors(NodeId::new(block)).map(NodeId::index)
    }

    /// Returns an iterator over the predecessor block ids of `block`.
    pub fn predecessors(&self, block: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .predecessors(NodeId::new(block))
            .map(NodeId::index)
    }

    /// Returns the postorder of blocks reachable from the entry.
    #[must_use]
    pub fn postorder(&self) -> Vec<usize> {
        postorder(&self.graph, self.entry)
            .into_iter()
            .map(NodeId::index)
            .collect()
    }

    /// Returns the reverse postorder of blocks reachable from the entry.
    #[must_use]
    pub fn reverse_postorder(&self) -> Vec<usize> {
        reverse_postorder(&self.graph, self.entry)
            .into_iter()
            .map(NodeId::index)
            .collect()
    }

    /// Returns the dominator tree, computing it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if dominance computation fails.
    pub fn dominators(&self) -> Result<&DominatorTree> {
        self.dominators
            .get_or_init(|| compute_dominators(&self.graph, self.entry))
            .as_ref()
            .map_err(|e| Error::GraphError(e.to_string()))
    }

    /// Returns the dominance preorder of reachable blocks.
    ///
    /// Every block appears after all blocks that strictly dominate it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if dominance computation fails.
    pub fn dominance_preorder(&self) -> Result<Vec<usize>> {
        let tree = self.dominators()?;
        Ok(tree.preorder().into_iter().map(NodeId::index).collect())
    }

    /// Returns `true` if block `a` dominates block `b` (reflexively).
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if dominance computation fails.
    pub fn dominates(&self, a: usize, b: usize) -> Result<bool> {
        Ok(self.dominators()?.dominates(NodeId::new(a), NodeId::new(b)))
    }

    /// Returns the immediate dominator of `block`, or `None` for the entry
    /// and unreachable blocks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if dominance computation fails.
    pub fn idom(&self, block: usize) -> Result<Option<usize>> {
        Ok(self
            .dominators()?
            .immediate_dominator(NodeId::new(block))
            .map(NodeId::index))
    }

    /// Returns the dominance frontier of every block, computing on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if dominance computation fails.
    pub fn dominance_frontiers(&self) -> Result<&Vec<HashSet<NodeId>>> {
        let tree = self.dominators()?;
        Ok(self
            .frontiers
            .get_or_init(|| compute_dominance_frontiers(&self.graph, tree)))
    }

    /// Returns the iterated dominance frontier of every block, computing on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if dominance computation fails.
    pub fn iterated_frontiers(&self) -> Result<&Vec<HashSet<NodeId>>> {
        let frontiers = self.dominance_frontiers()?;
        Ok(self
            .iterated
            .get_or_init(|| compute_iterated_frontiers(frontiers)))
    }

    /// Renders the graph in Graphviz DOT format.
    ///
    /// Block bodies are taken from `func`, which must be the function this
    /// graph was built from. The entry block is highlighted green, blocks
    /// without successors red. Intended as a debugging hook; nothing in the
    /// analysis pipeline depends on it.
    #[must_use]
    pub fn to_dot(&self, func: &Function, name: Option<&str>) -> String {
        let mut out = String::new();
        out.push_str(&format!("digraph \"{}\" {{\n", name.unwrap_or("cfg")));
        out.push_str("  node [shape=box, fontname=\"monospace\"];\n");

        for (id, _) in self.graph.nodes() {
            let block_id = id.index();
            let mut label = format!("B{block_id}\\n");
            if let Some(block) = func.block(block_id) {
                for phi in &block.phis {
                    label.push_str(&escape_dot(&phi.to_string()));
                    label.push_str("\\n");
                }
                for stmt in &block.statements {
                    label.push_str(&escape_dot(&stmt.to_string()));
                    label.push_str("\\n");
                }
            }

            let color = if id == self.entry {
                ", style=filled, fillcolor=lightgreen"
            } else if self.graph.out_degree(id) == 0 {
                ", style=filled, fillcolor=lightcoral"
            } else {
                ""
            };
            out.push_str(&format!("  n{block_id} [label=\"{label}\"{color}];\n"));
        }

        for (_, source, target, kind) in self.graph.edges() {
            out.push_str(&format!(
                "  n{} -> n{} [label=\"{}\"];\n",
                source.index(),
                target.index(),
                kind
            ));
        }
        out.push_str("}\n");
        out
    }
}
