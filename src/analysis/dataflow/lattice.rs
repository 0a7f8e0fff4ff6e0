//! Lattice operations for dataflow analyses.

use crate::utils::BitSet;

/// A meet-semilattice: the algebraic structure dataflow states live in.
///
/// `meet` combines the states flowing in from multiple CFG edges and must be
/// commutative, associative and idempotent. The solver relies on the change
/// report to decide when a block's state has stabilized.
pub trait MeetSemiLattice {
    /// Combines `other` into `self`. Returns `true` if `self` changed.
    fn meet(&mut self, other: &Self) -> bool;

    /// Returns `true` if this is the bottom element (no information).
    fn is_bottom(&self) -> bool;
}

/// Set-union meet, as used by may-analyses such as liveness.
impl MeetSemiLattice for BitSet {
    fn meet(&mut self, other: &Self) -> bool {
        self.union_with(other)
    }

    fn is_bottom(&self) -> bool {
        self.is_empty()
    }
}
