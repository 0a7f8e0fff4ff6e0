//! The dataflow framework and its analyses.
//!
//! [`DataFlowAnalysis`] describes a block-granular problem over a
//! [`MeetSemiLattice`]; [`DataFlowSolver`] iterates it to a fixpoint with a
//! worklist. [`Liveness`] is the backward live-variables instance the
//! destruction engine consumes.

mod framework;
mod lattice;
mod liveness;
mod solver;

pub use framework::{AnalysisResults, DataFlowAnalysis, Direction};
pub use lattice::MeetSemiLattice;
pub use liveness::{LiveSet, LiveVariables, Liveness};
pub use solver::DataFlowSolver;
