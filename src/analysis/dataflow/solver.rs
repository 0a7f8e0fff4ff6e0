//! The worklist fixpoint solver.

use std::collections::VecDeque;

use crate::analysis::{
    cfg::ControlFlowGraph,
    dataflow::{AnalysisResults, DataFlowAnalysis, Direction, MeetSemiLattice},
};

/// Iterates a [`DataFlowAnalysis`] to a fixpoint over a control-flow graph.
///
/// Blocks are seeded in reverse postorder for forward problems and postorder
/// for backward ones, so most states settle in the first sweep; the worklist
/// then re-processes only blocks whose inputs actually changed.
pub struct DataFlowSolver<A: DataFlowAnalysis> {
    analysis: A,
    in_states: Vec<A::Lattice>,
    out_states: Vec<A::Lattice>,
    worklist: VecDeque<usize>,
    in_worklist: Vec<bool>,
    iterations: usize,
}

impl<A: DataFlowAnalysis> DataFlowSolver<A> {
    /// Runs `analysis` to convergence over `cfg` and returns the stable
    /// per-block states.
    pub fn solve(analysis: A, cfg: &ControlFlowGraph) -> AnalysisResults<A::Lattice> {
        let block_count = cfg.block_count();
        let mut solver = Self {
            in_states: vec![analysis.initial(); block_count],
            out_states: vec![analysis.initial(); block_count],
            worklist: VecDeque::with_capacity(block_count),
            in_worklist: vec![false; block_count],
            iterations: 0,
            analysis,
        };

        let seed = match A::DIRECTION {
            Direction::Forward => cfg.reverse_postorder(),
            Direction::Backward => cfg.postorder(),
        };
        for block in seed {
            solver.enqueue(block);
        }

        while let Some(block) = solver.worklist.pop_front() {
            solver.in_worklist[block] = false;
            solver.iterations += 1;
            match A::DIRECTION {
                Direction::Forward => solver.process_forward(block, cfg),
                Direction::Backward => solver.process_backward(block, cfg),
            }
        }

        AnalysisResults::new(solver.in_states, solver.out_states)
    }

    fn enqueue(&mut self, block: usize) {
        if !self.in_worklist[block] {
            self.in_worklist[block] = true;
            self.worklist.push_back(block);
        }
    }

    fn process_forward(&mut self, block: usize, cfg: &ControlFlowGraph) {
        let mut input = if block == cfg.entry() {
            self.analysis.boundary()
        } else {
            self.analysis.initial()
        };
        for pred in cfg.predecessors(block) {
            input.meet(&self.out_states[pred]);
        }

        let output = self.analysis.transfer(block, &input);
        self.in_states[block] = input;

        if output != self.out_states[block] {
            self.out_states[block] = output;
            let succs: Vec<_> = cfg.successors(block).collect();
            for succ in succs {
                self.enqueue(succ);
            }
        }
    }

    fn process_backward(&mut self, block: usize, cfg: &ControlFlowGraph) {
        let has_succs = cfg.successors(block).next().is_some();
        let mut output = if has_succs {
            self.analysis.initial()
        } else {
            self.analysis.boundary()
        };
        for succ in cfg.successors(block) {
            output.meet(&self.in_states[succ]);
        }

        let input = self.analysis.transfer(block, &output);
        self.out_states[block] = output;

        if input != self.in_states[block] {
            self.in_states[block] = input;
            let preds: Vec<_> = cfg.predecessors(block).collect();
            for pred in preds {
                self.enqueue(pred);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{cfg::FlowEdge, ssa::Function};
    use crate::utils::BitSet;

    fn chain(n: usize) -> ControlFlowGraph {
        let mut func = Function::new();
        for _ in 0..n {
            func.add_block();
        }
        for i in 0..n - 1 {
            func.add_edge(i, FlowEdge::fallthrough(i + 1)).unwrap();
        }
        ControlFlowGraph::new(&func).unwrap()
    }

    fn looped() -> ControlFlowGraph {
        // 0 -> 1 -> 2 -> 1, 1 -> 3
        let mut func = Function::new();
        for _ in 0..4 {
            func.add_block();
        }
        func.add_edge(0, FlowEdge::fallthrough(1)).unwrap();
        func.add_edge(1, FlowEdge::conditional_true(2)).unwrap();
        func.add_edge(2, FlowEdge::unconditional(1)).unwrap();
        func.add_edge(1, FlowEdge::conditional_false(3)).unwrap();
        ControlFlowGraph::new(&func).unwrap()
    }

    /// Forward gen-only analysis: a fact per block, facts accumulate along paths.
    struct Reachable {
        bits: usize,
    }

    impl DataFlowAnalysis for Reachable {
        type Lattice = BitSet;
        const DIRECTION: Direction = Direction::Forward;

        fn boundary(&self) -> BitSet {
            BitSet::new(self.bits)
        }

        fn initial(&self) -> BitSet {
            BitSet::new(self.bits)
        }

        fn transfer(&self, block: usize, input: &BitSet) -> BitSet {
            let mut out = input.clone();
            out.insert(block);
            out
        }
    }

    /// Backward mirror of [`Reachable`].
    struct CanReach {
        bits: usize,
    }

    impl DataFlowAnalysis for CanReach {
        type Lattice = BitSet;
        const DIRECTION: Direction = Direction::Backward;

        fn boundary(&self) -> BitSet {
            BitSet::new(self.bits)
        }

        fn initial(&self) -> BitSet {
            BitSet::new(self.bits)
        }

        fn transfer(&self, block: usize, input: &BitSet) -> BitSet {
            let mut out = input.clone();
            out.insert(block);
            out
        }
    }

    #[test]
    fn test_forward_chain() {
        let cfg = chain(3);
        let results = DataFlowSolver::solve(Reachable { bits: 3 }, &cfg);

        assert!(results.in_state(0).is_empty());
        assert_eq!(results.out_state(0).count(), 1);
        assert_eq!(results.out_state(2).count(), 3);
        assert!(results.in_state(2).contains(0));
        assert!(results.in_state(2).contains(1));
    }

    #[test]
    fn test_backward_chain() {
        let cfg = chain(3);
        let results = DataFlowSolver::solve(CanReach { bits: 3 }, &cfg);

        assert!(results.out_state(2).is_empty());
        assert_eq!(results.in_state(0).count(), 3);
        assert!(results.out_state(0).contains(1));
        assert!(results.out_state(0).contains(2));
    }

    #[test]
    fn test_forward_loop_converges() {
        let cfg = looped();
        let results = DataFlowSolver::solve(Reachable { bits: 4 }, &cfg);

        // The back edge feeds 2 into the loop header's input.
        assert!(results.in_state(1).contains(2));
        assert!(results.in_state(3).contains(2));
        assert!(results.in_state(3).contains(1));
    }

    #[test]
    fn test_backward_loop_converges() {
        let cfg = looped();
        let results = DataFlowSolver::solve(CanReach { bits: 4 }, &cfg);

        assert!(results.out_state(2).contains(1));
        assert!(results.out_state(0).contains(3));
        assert!(results.out_state(2).contains(3));
    }
}
