//! Def/use indexing in dominance preorder.
//!
//! The coalescing phases compare program points by dominance: `x` pre-dominates
//! `y` when `x`'s definition position comes first in a dominance preorder walk
//! of the CFG. This index assigns every definition such a position, records
//! which block defines and which blocks use each variable, and tracks the last
//! position each variable is used at within each block. Positions are dense
//! and monotone along any dominator-tree path, which is what the interference
//! test's stack discipline relies on.
//!
//! Like liveness, the index is a snapshot: it is rebuilt from scratch after
//! copy insertion rather than maintained through edits.

use std::collections::{HashMap, HashSet};

use crate::analysis::ssa::{Function, Operand, Statement, VarId};

/// Sentinel position for variables without an indexed definition.
const UNINDEXED: usize = usize::MAX;

/// Def/use information for one function, positioned in dominance preorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefUseIndex {
    /// Defining block per variable.
    defs: HashMap<VarId, usize>,
    /// Using blocks per variable.
    uses: HashMap<VarId, HashSet<usize>>,
    /// Variables defined by a phi, with the phi's block.
    phi_defs: HashMap<VarId, usize>,
    /// Definition position per variable, indexed by [`VarId`].
    def_index: Vec<usize>,
    /// Per variable, per block: the last position the variable is used at.
    last_use_index: HashMap<VarId, HashMap<usize, usize>>,
}

impl DefUseIndex {
    /// Builds the index over `func`.
    ///
    /// `preorder` must be a dominance preorder of the reachable blocks, as
    /// returned by
    /// [`ControlFlowGraph::dominance_preorder`](crate::analysis::cfg::ControlFlowGraph::dominance_preorder).
    /// Each phi and each parallel copy pair occupies its own position;
    /// ordinary statements occupy one position each, with uses recorded at
    /// the statement's position.
    #[must_use]
    pub fn build(func: &Function, preorder: &[usize]) -> Self {
        let mut index = Self {
            defs: HashMap::new(),
            uses: HashMap::new(),
            phi_defs: HashMap::new(),
            def_index: vec![UNINDEXED; func.variable_count()],
            last_use_index: HashMap::new(),
        };

        let mut position = 0usize;
        let mut scratch = Vec::new();

        for &block_id in preorder {
            let block = &func.blocks[block_id];

            for phi in &block.phis {
                for arg in &phi.args {
                    if let Operand::Var(v) = arg.value {
                        index.record_use(v, block_id, position);
                    }
                }
                index.record_def(phi.target, block_id, position);
                index.phi_defs.insert(phi.target, block_id);
                position += 1;
            }

            for stmt in &block.statements {
                match stmt {
                    Statement::ParallelCopy(pc) => {
                        for pair in pc.pairs() {
                            index.record_use(pair.source, block_id, position);
                            index.record_def(pair.target, block_id, position);
                            position += 1;
                        }
                    }
                    _ => {
                        scratch.clear();
                        stmt.uses(&mut scratch);
                        for &v in &scratch {
                            index.record_use(v, block_id, position);
                        }
                        if let Some(target) = stmt.def() {
                            index.record_def(target, block_id, position);
                        }
                        position += 1;
                    }
                }
            }
        }
        index
    }

    fn record_def(&mut self, var: VarId, block: usize, position: usize) {
        self.defs.insert(var, block);
        self.def_index[var.index()] = position;
    }

    fn record_use(&mut self, var: VarId, block: usize, position: usize) {
        self.uses.entry(var).or_default().insert(block);
        let per_block = self.last_use_index.entry(var).or_default();
        let entry = per_block.entry(block).or_insert(position);
        if position > *entry {
            *entry = position;
        }
    }

    /// Returns the block defining `var`, if it has an indexed definition.
    #[must_use]
    pub fn def_block(&self, var: VarId) -> Option<usize> {
        self.defs.get(&var).copied()
    }

    /// Returns the blocks using `var`, if any.
    #[must_use]
    pub fn use_blocks(&self, var: VarId) -> Option<&HashSet<usize>> {
        self.uses.get(&var)
    }

    /// Returns `true` if `var` is defined by a phi.
    #[must_use]
    pub fn is_phi_def(&self, var: VarId) -> bool {
        self.phi_defs.contains_key(&var)
    }

    /// Returns the dominance-preorder position of `var`'s definition, or
    /// `None` if the variable has no indexed definition.
    #[must_use]
    pub fn def_index(&self, var: VarId) -> Option<usize> {
        match self.def_index[var.index()] {
            UNINDEXED => None,
            position => Some(position),
        }
    }

    /// Returns the last position `var` is used at within `block`, if it is
    /// used there.
    #[must_use]
    pub fn last_use_index(&self, var: VarId, block: usize) -> Option<usize> {
        self.last_use_index.get(&var)?.get(&block).copied()
    }

    /// Returns `true` if `x`'s definition strictly precedes `y`'s in the
    /// dominance preorder.
    ///
    /// Variables without an indexed definition sort last.
    #[must_use]
    pub fn pre_dom_order(&self, x: VarId, y: VarId) -> bool {
        self.def_index[x.index()] < self.def_index[y.index()]
    }

    /// Forgets all phi definitions, keeping positions and use sets intact.
    ///
    /// Called once the phis themselves have been dropped from the blocks.
    pub fn clear_phi_defs(&mut self) {
        self.phi_defs.clear();
    }

    /// Returns the def and use maps, for comparison against an independently
    /// rebuilt index.
    #[must_use]
    pub fn def_use_maps(&self) -> (&HashMap<VarId, usize>, &HashMap<VarId, HashSet<usize>>) {
        (&self.defs, &self.uses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        cfg::{ControlFlowGraph, FlowEdge},
        ssa::{CopyPair, ParallelCopy, Phi, PhiArg, ValueType, VarBase},
    };

    fn copy(target: VarId, source: VarId) -> Statement {
        Statement::Copy {
            target,
            source: Operand::Var(source),
            ty: ValueType::Int,
            synthetic: false,
        }
    }

    /// B0: a = 1; branch -> B1 | B2
    /// B1: b = a -> B3;  B2: c = a -> B3
    /// B3: d = phi(B1: b, B2: c); return d
    fn diamond_with_phi() -> (Function, [VarId; 4]) {
        let mut func = Function::new();
        let b0 = func.add_block();
        let b1 = func.add_block();
        let b2 = func.add_block();
        let b3 = func.add_block();
        func.add_edge(b0, FlowEdge::conditional_true(b1)).unwrap();
        func.add_edge(b0, FlowEdge::conditional_false(b2)).unwrap();
        func.add_edge(b1, FlowEdge::unconditional(b3)).unwrap();
        func.add_edge(b2, FlowEdge::unconditional(b3)).unwrap();

        let a = func.new_variable(VarBase::Local(0), ValueType::Int);
        let b = func.new_variable(VarBase::Local(1), ValueType::Int);
        let c = func.new_variable(VarBase::Local(1), ValueType::Int);
        let d = func.new_variable(VarBase::Local(1), ValueType::Int);

        func.block_mut(b0).unwrap().statements.push(Statement::Copy {
            target: a,
            source: Operand::Const(1),
            ty: ValueType::Int,
            synthetic: false,
        });
        func.block_mut(b0)
            .unwrap()
            .statements
            .push(Statement::Branch { condition: Some(a) });
        func.block_mut(b1).unwrap().statements.push(copy(b, a));
        func.block_mut(b2).unwrap().statements.push(copy(c, a));
        let block3 = func.block_mut(b3).unwrap();
        block3.phis.push(Phi::new(
            d,
            vec![
                PhiArg {
                    pred: b1,
                    value: Operand::Var(b),
                },
                PhiArg {
                    pred: b2,
                    value: Operand::Var(c),
                },
            ],
        ));
        block3.statements.push(Statement::Return { value: Some(d) });

        (func, [a, b, c, d])
    }

    #[test]
    fn test_def_and_use_blocks() {
        let (func, [a, b, c, d]) = diamond_with_phi();
        let cfg = ControlFlowGraph::new(&func).unwrap();
        let index = DefUseIndex::build(&func, &cfg.dominance_preorder().unwrap());

        assert_eq!(index.def_block(a), Some(0));
        assert_eq!(index.def_block(b), Some(1));
        assert_eq!(index.def_block(c), Some(2));
        assert_eq!(index.def_block(d), Some(3));

        let a_uses = index.use_blocks(a).unwrap();
        assert!(a_uses.contains(&0));
        assert!(a_uses.contains(&1));
        assert!(a_uses.contains(&2));
        // The phi args count as uses in the phi's block.
        assert_eq!(index.use_blocks(b), Some(&HashSet::from([3])));
        assert_eq!(index.use_blocks(d), Some(&HashSet::from([3])));
    }

    #[test]
    fn test_phi_defs() {
        let (func, [a, _, _, d]) = diamond_with_phi();
        let cfg = ControlFlowGraph::new(&func).unwrap();
        let mut index = DefUseIndex::build(&func, &cfg.dominance_preorder().unwrap());

        assert!(index.is_phi_def(d));
        assert!(!index.is_phi_def(a));

        index.clear_phi_defs();
        assert!(!index.is_phi_def(d));
    }

    #[test]
    fn test_positions_respect_dominance() {
        let (func, [a, b, c, d]) = diamond_with_phi();
        let cfg = ControlFlowGraph::new(&func).unwrap();
        let index = DefUseIndex::build(&func, &cfg.dominance_preorder().unwrap());

        // The entry's def precedes every other def.
        assert!(index.pre_dom_order(a, b));
        assert!(index.pre_dom_order(a, c));
        assert!(index.pre_dom_order(a, d));
        assert!(!index.pre_dom_order(b, a));
        assert!(index.def_index(a).is_some());
    }

    #[test]
    fn test_last_use_positions() {
        let (func, [a, _, _, d]) = diamond_with_phi();
        let cfg = ControlFlowGraph::new(&func).unwrap();
        let index = DefUseIndex::build(&func, &cfg.dominance_preorder().unwrap());

        // a is used twice in B0 (the copy and the branch): the branch wins.
        let copy_pos = index.def_index(a).unwrap();
        let branch_use = index.last_use_index(a, 0).unwrap();
        assert!(branch_use > copy_pos);

        // d's only use is the return after the phi that defines it.
        let d_def = index.def_index(d).unwrap();
        let d_use = index.last_use_index(d, 3).unwrap();
        assert!(d_use > d_def);

        assert_eq!(index.last_use_index(d, 0), None);
    }

    #[test]
    fn test_parallel_copy_pairs_get_own_positions() {
        let mut func = Function::new();
        let b0 = func.add_block();
        let x = func.new_variable(VarBase::Local(0), ValueType::Int);
        let y = func.new_variable(VarBase::Local(1), ValueType::Int);
        let t1 = func.new_variable(VarBase::Local(2), ValueType::Int);
        let t2 = func.new_variable(VarBase::Local(3), ValueType::Int);

        let mut pc = ParallelCopy::new();
        pc.push(CopyPair {
            target: t1,
            source: x,
            ty: ValueType::Int,
        })
        .unwrap();
        pc.push(CopyPair {
            target: t2,
            source: y,
            ty: ValueType::Int,
        })
        .unwrap();
        func.block_mut(b0)
            .unwrap()
            .statements
            .push(Statement::ParallelCopy(pc));

        let cfg = ControlFlowGraph::new(&func).unwrap();
        let index = DefUseIndex::build(&func, &cfg.dominance_preorder().unwrap());

        assert_ne!(index.def_index(t1), index.def_index(t2));
        assert!(index.pre_dom_order(t1, t2));
        assert_eq!(index.def_block(t1), Some(0));
        assert_eq!(index.use_blocks(y), Some(&HashSet::from([0])));
    }

    #[test]
    fn test_rebuilt_index_equal() {
        let (func, _) = diamond_with_phi();
        let cfg = ControlFlowGraph::new(&func).unwrap();
        let preorder = cfg.dominance_preorder().unwrap();

        let first = DefUseIndex::build(&func, &preorder);
        let second = DefUseIndex::build(&func, &preorder);
        assert_eq!(first, second);
    }
}
