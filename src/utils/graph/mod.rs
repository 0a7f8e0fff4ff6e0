//! Directed graph data structures and algorithms.
//!
//! The graph layer underpinning the control-flow analyses: a dense
//! adjacency-list [`DirectedGraph`], strongly-typed [`NodeId`]/[`EdgeId`]
//! identifiers, the [`GraphBase`]/[`Successors`]/[`Predecessors`] capability
//! traits the algorithms are generic over, and the [`algorithms`] module with
//! traversals and dominance computation.

mod directed;
mod edge;
mod node;
mod traits;

pub mod algorithms;

pub use directed::DirectedGraph;
pub use edge::EdgeId;
pub use node::NodeId;
pub use traits::{GraphBase, Predecessors, Successors};
