//! Control-flow graphs.
//!
//! [`ControlFlowGraph`] is a snapshot of a function's block structure with
//! typed [`FlowEdge`]s, lazily cached dominance information, traversal orders
//! and an optional Graphviz export.

mod edge;
mod graph;

pub use edge::{FlowEdge, FlowKind};
pub use graph::ControlFlowGraph;
