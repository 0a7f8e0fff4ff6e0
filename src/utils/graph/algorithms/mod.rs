//! Graph algorithms used by the control-flow analyses.
//!
//! - [`traversal`] - Depth-first, breadth-first and postorder traversals
//! - [`dominators`] - Lengauer–Tarjan dominator trees, dominance frontiers
//!   and iterated dominance frontiers

pub mod dominators;
pub mod traversal;

pub use dominators::{
    compute_dominance_frontiers, compute_dominators, compute_iterated_frontiers, DominatorTree,
};
pub use traversal::{postorder, reverse_postorder, BfsIterator, DfsIterator};
