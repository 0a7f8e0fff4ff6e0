//! The dataflow analysis abstraction.
//!
//! An analysis describes a lattice, a direction and a per-block transfer
//! function; the [solver](crate::analysis::dataflow::DataFlowSolver) iterates
//! it to a fixpoint and hands back an [`AnalysisResults`] with the stable
//! state at every block boundary.

use crate::analysis::dataflow::MeetSemiLattice;

/// The direction a dataflow analysis propagates information in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Information flows with control flow, entry to exits.
    Forward,
    /// Information flows against control flow, exits to entry.
    Backward,
}

/// One block-granular dataflow analysis.
///
/// Implementations describe the problem; the solver owns the iteration. The
/// transfer function must be monotone with respect to the lattice order for
/// the fixpoint to exist.
pub trait DataFlowAnalysis {
    /// The dataflow state attached to each block boundary.
    type Lattice: MeetSemiLattice + Clone + PartialEq;

    /// Which way this analysis propagates.
    const DIRECTION: Direction;

    /// The state at the boundary blocks: the entry for forward problems, the
    /// exit blocks for backward ones.
    fn boundary(&self) -> Self::Lattice;

    /// The optimistic starting state of every other block.
    fn initial(&self) -> Self::Lattice;

    /// Applies block `block`'s effect to `input`, producing the state on the
    /// other side of the block.
    fn transfer(&self, block: usize, input: &Self::Lattice) -> Self::Lattice;
}

/// The converged states of a dataflow analysis, indexed by block id.
#[derive(Debug, Clone)]
pub struct AnalysisResults<L> {
    in_states: Vec<L>,
    out_states: Vec<L>,
}

impl<L> AnalysisResults<L> {
    /// Packages converged in/out states.
    #[must_use]
    pub fn new(in_states: Vec<L>, out_states: Vec<L>) -> Self {
        Self {
            in_states,
            out_states,
        }
    }

    /// Returns the state at the entry of `block`.
    #[must_use]
    pub fn in_state(&self, block: usize) -> &L {
        &self.in_states[block]
    }

    /// Returns the state at the exit of `block`.
    #[must_use]
    pub fn out_state(&self, block: usize) -> &L {
        &self.out_states[block]
    }

    /// Returns the number of blocks covered.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.in_states.len()
    }
}
