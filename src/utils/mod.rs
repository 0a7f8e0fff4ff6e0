//! Supporting infrastructure shared by the analysis passes.
//!
//! This module collects the small building blocks the analyses are made of:
//!
//! - [`BitSet`] - A dense bit vector used as the carrier for dataflow sets
//! - [`escape_dot`] - Label escaping for Graphviz DOT export
//! - [`graph`] - The directed graph core and its algorithms

mod bitset;
mod dot;

/// Directed graph data structures and algorithms.
///
/// Provides [`graph::DirectedGraph`] with typed node/edge data, the
/// [`graph::GraphBase`]/[`graph::Successors`]/[`graph::Predecessors`] capability traits,
/// traversal iterators and the dominance algorithms built on top of them.
pub mod graph;

pub use bitset::{BitSet, BitSetIter};
pub use dot::escape_dot;
