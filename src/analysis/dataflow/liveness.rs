//! Live-variable analysis.
//!
//! A backward may-analysis at block granularity: a variable is live-out of a
//! block if some successor needs it, and live-in if it is needed before the
//! block redefines it. Phi arguments count as uses in the block that holds
//! the phi; the def/use index follows the same convention, so interference
//! checks see a consistent picture.
//!
//! Results are a snapshot. After mutating statements, blocks or phis, callers
//! rebuild the analysis with [`Liveness::compute`]; nothing is updated
//! incrementally.

use std::fmt;

use crate::{
    analysis::{
        cfg::ControlFlowGraph,
        dataflow::{
            AnalysisResults, DataFlowAnalysis, DataFlowSolver, Direction, MeetSemiLattice,
        },
        ssa::{Function, Operand, Statement, VarId},
    },
    utils::BitSet,
};

/// The set of variables live at one program point.
#[derive(Clone, PartialEq, Eq)]
pub struct LiveSet {
    live: BitSet,
}

impl LiveSet {
    /// Creates an empty live set sized for `num_vars` variables.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            live: BitSet::new(num_vars),
        }
    }

    /// Returns `true` if `var` is live.
    #[must_use]
    pub fn is_live(&self, var: VarId) -> bool {
        self.live.contains(var.index())
    }

    /// Marks `var` live.
    pub fn add(&mut self, var: VarId) {
        self.live.insert(var.index());
    }

    /// Marks `var` not live.
    pub fn remove(&mut self, var: VarId) {
        self.live.remove(var.index());
    }

    /// Returns an iterator over the live variables.
    pub fn variables(&self) -> impl Iterator<Item = VarId> + '_ {
        self.live.iter().map(VarId::new)
    }

    /// Returns the number of live variables.
    #[must_use]
    pub fn count(&self) -> usize {
        self.live.count()
    }

    /// Returns `true` if nothing is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Returns the underlying bit set.
    #[must_use]
    pub fn as_bitset(&self) -> &BitSet {
        &self.live
    }
}

impl fmt::Debug for LiveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LiveSet{:?}", self.live)
    }
}

impl MeetSemiLattice for LiveSet {
    fn meet(&mut self, other: &Self) -> bool {
        self.live.union_with(&other.live)
    }

    fn is_bottom(&self) -> bool {
        self.live.is_empty()
    }
}

/// The live-variables dataflow problem over one function.
///
/// Precomputes per-block upward-exposed uses and defs, then lets the solver
/// iterate `IN = USE ∪ (OUT ∖ DEF)` backward to a fixpoint.
pub struct LiveVariables {
    num_vars: usize,
    use_sets: Vec<BitSet>,
    def_sets: Vec<BitSet>,
}

impl LiveVariables {
    /// Builds the per-block use/def sets of `func`.
    #[must_use]
    pub fn new(func: &Function) -> Self {
        let num_vars = func.variable_count();
        let mut use_sets = Vec::with_capacity(func.blocks.len());
        let mut def_sets = Vec::with_capacity(func.blocks.len());
        let mut scratch = Vec::new();

        for block in &func.blocks {
            let mut uses = BitSet::new(num_vars);
            let mut defs = BitSet::new(num_vars);

            // Phis come first; their arguments are uses in this block.
            for phi in &block.phis {
                for arg in &phi.args {
                    if let Operand::Var(v) = arg.value {
                        if !defs.contains(v.index()) {
                            uses.insert(v.index());
                        }
                    }
                }
                defs.insert(phi.target.index());
            }

            for stmt in &block.statements {
                scratch.clear();
                stmt.uses(&mut scratch);
                for &v in &scratch {
                    if !defs.contains(v.index()) {
                        uses.insert(v.index());
                    }
                }
                match stmt {
                    Statement::Copy { target, .. } => defs.insert(target.index()),
                    Statement::ParallelCopy(pc) => {
                        for pair in pc.pairs() {
                            defs.insert(pair.target.index());
                        }
                    }
                    _ => {}
                }
            }

            use_sets.push(uses);
            def_sets.push(defs);
        }

        Self {
            num_vars,
            use_sets,
            def_sets,
        }
    }
}

impl DataFlowAnalysis for LiveVariables {
    type Lattice = LiveSet;
    const DIRECTION: Direction = Direction::Backward;

    fn boundary(&self) -> LiveSet {
        LiveSet::new(self.num_vars)
    }

    fn initial(&self) -> LiveSet {
        LiveSet::new(self.num_vars)
    }

    fn transfer(&self, block: usize, input: &LiveSet) -> LiveSet {
        let mut result = input.clone();
        result.live.difference_with(&self.def_sets[block]);
        result.live.union_with(&self.use_sets[block]);
        result
    }
}

/// Converged liveness for one function, queryable per block boundary.
pub struct Liveness {
    results: AnalysisResults<LiveSet>,
}

impl Liveness {
    /// Runs live-variable analysis over `func`.
    ///
    /// `cfg` must be a current snapshot of `func`'s block structure. Call
    /// again after any mutation; results do not track edits.
    #[must_use]
    pub fn compute(func: &Function, cfg: &ControlFlowGraph) -> Self {
        let results = DataFlowSolver::solve(LiveVariables::new(func), cfg);
        Self { results }
    }

    /// Returns `true` if `var` is live at the entry of `block`.
    #[must_use]
    pub fn is_live_in(&self, block: usize, var: VarId) -> bool {
        self.results.in_state(block).is_live(var)
    }

    /// Returns `true` if `var` is live at the exit of `block`.
    #[must_use]
    pub fn is_live_out(&self, block: usize, var: VarId) -> bool {
        self.results.out_state(block).is_live(var)
    }

    /// Returns the live-in set of `block`.
    #[must_use]
    pub fn live_in(&self, block: usize) -> &LiveSet {
        self.results.in_state(block)
    }

    /// Returns the live-out set of `block`.
    #[must_use]
    pub fn live_out(&self, block: usize) -> &LiveSet {
        self.results.out_state(block)
    }
}
