//! SSA destruction.
//!
//! Translates a function out of SSA form in the four strictly ordered phases
//! of Boissinot-style destruction:
//!
//! 1. **CSSA entry** - [`Destructor::run`] first isolates every phi with
//!    parallel copies: the phi target and each argument get a fresh version,
//!    with a copy group at the head of the phi's block and one at the end of
//!    each predecessor. Afterwards phi resources never interfere.
//! 2. **Value classes** - Copy chains are grouped into classes of variables
//!    that provably hold the same runtime value, refining the interference
//!    test: same-value overlap is not interference.
//! 3. **Coalescing** - Phi targets and arguments are merged unconditionally
//!    (CSSA makes that safe), remaining copies are merged when their
//!    congruence classes do not interfere, and every variable is renamed to
//!    its class representative.
//! 4. **Sequentialization** - Surviving parallel copies are lowered to
//!    ordered copy sequences, breaking each cyclic permutation with a single
//!    spill copy.
//!
//! All failures are fatal for the function being processed; see
//! [`Error`](crate::Error) for the taxonomy.

mod classes;
mod sequential;

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use crate::{
    analysis::{
        cfg::ControlFlowGraph,
        dataflow::Liveness,
        defuse::DefUseIndex,
        destruct::classes::{CongruenceClasses, ValueClasses},
        ssa::{CopyPair, Function, Operand, ParallelCopy, Statement, VarId},
    },
    Result,
};

/// The variable renaming produced by destruction.
///
/// Maps each coalesced variable to its congruence class representative.
/// Variables that kept their own name are not stored; [`RemapTable::resolve`]
/// returns them unchanged. Resolution is idempotent: representatives map to
/// themselves.
#[derive(Debug, Clone, Default)]
pub struct RemapTable {
    map: HashMap<VarId, VarId>,
}

impl RemapTable {
    /// Returns the post-destruction name of `var`.
    #[must_use]
    pub fn resolve(&self, var: VarId) -> VarId {
        self.map.get(&var).copied().unwrap_or(var)
    }

    /// Returns an iterator over the non-identity renamings.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, VarId)> + '_ {
        self.map.iter().map(|(&k, &v)| (k, v))
    }

    /// Returns the number of renamed variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no variable was renamed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Configurable SSA destruction pass.
///
/// The defaults match the aggressive setting: copy-chain rewriting during
/// CSSA entry and value-refined interference are both enabled. Turning either
/// off never affects correctness, only how many copies survive.
#[derive(Debug, Clone, Copy)]
pub struct Destructor {
    facilitate_coalesce: bool,
    value_interference: bool,
}

impl Default for Destructor {
    fn default() -> Self {
        Self {
            facilitate_coalesce: true,
            value_interference: true,
        }
    }
}

impl Destructor {
    /// Creates a destructor with the default (aggressive) settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables use rewriting below predecessors during copy
    /// insertion. Rewriting exposes more copies to sharing-based coalescing.
    #[must_use]
    pub fn with_facilitate_coalesce(mut self, enabled: bool) -> Self {
        self.facilitate_coalesce = enabled;
        self
    }

    /// Enables or disables value-refined interference. When disabled, any
    /// live-range overlap counts as interference.
    #[must_use]
    pub fn with_value_interference(mut self, enabled: bool) -> Self {
        self.value_interference = enabled;
        self
    }

    /// Destructs `func` in place.
    ///
    /// On success the function contains no phis and no parallel copies, and
    /// the returned table records the applied renaming. On error the
    /// function must be discarded; destruction mutates as it goes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`](crate::Error::Malformed) for invalid
    /// input IR and [`Error::Inconsistent`](crate::Error::Inconsistent) when
    /// internal bookkeeping fails verification.
    pub fn run(&self, func: &mut Function) -> Result<RemapTable> {
        let cfg = ControlFlowGraph::new(func)?;
        check_preconditions(func, &cfg)?;

        insert_copies(func, &cfg, self.facilitate_coalesce)?;

        let preorder = cfg.dominance_preorder()?;
        let defuse = DefUseIndex::build(func, &preorder);
        verify(func, &preorder, &defuse)?;

        // Copy insertion changed live ranges; analyze the CSSA form.
        let liveness = Liveness::compute(func, &cfg);

        let num_vars = func.variable_count();
        let mut run = DestructionRun {
            func,
            preorder,
            liveness,
            defuse,
            values: ValueClasses::new(num_vars),
            classes: CongruenceClasses::new(num_vars),
            equal_anc_in: HashMap::new(),
            equal_anc_out: HashMap::new(),
            value_interference: self.value_interference,
        };

        run.compute_value_classes();
        run.coalesce_phis();
        run.coalesce_copies()?;

        let remap = run.build_remap();
        apply_remapping(run.func, &remap)?;
        sequentialize_blocks(run.func)?;

        Ok(RemapTable { map: remap })
    }
}

/// Destructs one function with the default settings.
///
/// # Errors
///
/// See [`Destructor::run`].
pub fn destruct(func: &mut Function) -> Result<RemapTable> {
    Destructor::default().run(func)
}

/// Destructs a batch of functions in parallel with the default settings.
///
/// Functions are independent; the batch fans out across the rayon thread
/// pool. The first error aborts the batch, leaving other functions in an
/// unspecified (possibly partially destructed) state.
///
/// # Errors
///
/// See [`Destructor::run`].
pub fn destruct_all(funcs: &mut [Function]) -> Result<()> {
    funcs
        .par_iter_mut()
        .try_for_each(|func| destruct(func).map(|_| ()))
}

/// Rejects input the pass cannot process, before any mutation.
fn check_preconditions(func: &Function, cfg: &ControlFlowGraph) -> Result<()> {
    for block in &func.blocks {
        for stmt in &block.statements {
            if matches!(stmt, Statement::ParallelCopy(_)) {
                return Err(malformed_error!(
                    "block B{} contains a parallel copy; input must be plain SSA",
                    block.id
                ));
            }
        }

        if block.phis.is_empty() {
            continue;
        }
        let preds: Vec<usize> = cfg.predecessors(block.id).collect();
        for phi in &block.phis {
            for pred in &preds {
                match phi.arg(*pred) {
                    Some(Operand::Var(_)) => {}
                    Some(Operand::Const(_)) => {
                        return Err(malformed_error!(
                            "phi for {} in B{} has a constant argument; arguments must be variables",
                            phi.target,
                            block.id
                        ));
                    }
                    None => {
                        return Err(malformed_error!(
                            "phi for {} in B{} is missing the argument for predecessor B{}",
                            phi.target,
                            block.id,
                            pred
                        ));
                    }
                }
            }
        }
    }
    Ok(())
}

/// Isolates every phi with parallel copies, establishing CSSA form.
fn insert_copies(func: &mut Function, cfg: &ControlFlowGraph, facilitate: bool) -> Result<()> {
    for block_id in 0..func.blocks.len() {
        let phi_count = func.blocks[block_id].phis.len();
        if phi_count == 0 {
            continue;
        }

        // Give every phi a fresh target and reassign the old names in one
        // parallel copy at the head of the block.
        let mut dst_copy = ParallelCopy::new();
        for i in 0..phi_count {
            let old_target = func.blocks[block_id].phis[i].target;
            let ty = func.variable(old_target).ty;
            let fresh = func.make_latest_version(old_target);
            dst_copy.push(CopyPair {
                target: old_target,
                source: fresh,
                ty,
            })?;
            func.blocks[block_id].phis[i].target = fresh;
        }
        func.blocks[block_id].insert_at_start(Statement::ParallelCopy(dst_copy));

        // Route every argument through a fresh copy at the end of its
        // predecessor.
        let preds: Vec<usize> = cfg.predecessors(block_id).collect();
        for pred in preds {
            let mut pred_copy = ParallelCopy::new();
            let mut rewrites: Vec<(VarId, VarId)> = Vec::new();

            for i in 0..phi_count {
                let arg = func.blocks[block_id].phis[i].arg_var(pred).ok_or_else(|| {
                    inconsistent_error!(
                        "phi in B{} lost its argument for predecessor B{}",
                        block_id,
                        pred
                    )
                })?;
                let ty = func.variable(arg).ty;
                let fresh = func.make_latest_version(arg);
                pred_copy.push(CopyPair {
                    target: fresh,
                    source: arg,
                    ty,
                })?;
                func.blocks[block_id].phis[i].set_arg(pred, Operand::Var(fresh));
                rewrites.push((arg, fresh));
            }

            if pred_copy.is_empty() {
                continue;
            }
            func.blocks[pred].insert_before_terminator(Statement::ParallelCopy(pred_copy));

            if facilitate {
                rewrite_dominated_uses(func, cfg, pred, &rewrites)?;
            }
        }
    }
    Ok(())
}

/// Redirects uses of rewritten arguments to their fresh copies in every block
/// strictly dominated by `pred`.
///
/// The fresh copy is assigned at the end of `pred`, so it reaches every
/// statement in strictly dominated blocks; phi arguments are only redirected
/// when their incoming edge also leaves a block dominated by `pred`.
fn rewrite_dominated_uses(
    func: &mut Function,
    cfg: &ControlFlowGraph,
    pred: usize,
    rewrites: &[(VarId, VarId)],
) -> Result<()> {
    let map: HashMap<VarId, VarId> = rewrites.iter().copied().collect();
    let tree = cfg.dominators()?;
    let children = tree.children_map();

    let mut stack: Vec<usize> = children[pred].iter().map(|n| n.index()).collect();
    while let Some(block_id) = stack.pop() {
        for stmt in &mut func.blocks[block_id].statements {
            stmt.rewrite_sources(|v| map.get(&v).copied().unwrap_or(v));
        }
        for phi in &mut func.blocks[block_id].phis {
            for arg in &mut phi.args {
                if let Operand::Var(v) = arg.value {
                    if let Some(&fresh) = map.get(&v) {
                        if cfg.dominates(pred, arg.pred)? {
                            arg.value = Operand::Var(fresh);
                        }
                    }
                }
            }
        }
        stack.extend(children[block_id].iter().map(|n| n.index()));
    }
    Ok(())
}

/// Recomputes defs and uses from scratch and compares against the index.
///
/// Also rejects any variable defined twice, which would mean copy insertion
/// broke the single-assignment property.
fn verify(func: &Function, preorder: &[usize], defuse: &DefUseIndex) -> Result<()> {
    let mut defs: HashMap<VarId, usize> = HashMap::new();
    let mut uses: HashMap<VarId, HashSet<usize>> = HashMap::new();
    let mut scratch = Vec::new();

    let record_def = |defs: &mut HashMap<VarId, usize>, var: VarId, block: usize| {
        defs.insert(var, block).is_none()
    };

    for &block_id in preorder {
        let block = &func.blocks[block_id];
        for phi in &block.phis {
            for arg in &phi.args {
                if let Operand::Var(v) = arg.value {
                    uses.entry(v).or_default().insert(block_id);
                }
            }
            if !record_def(&mut defs, phi.target, block_id) {
                return Err(inconsistent_error!(
                    "{} defined more than once after copy insertion",
                    phi.target
                ));
            }
        }
        for stmt in &block.statements {
            match stmt {
                Statement::ParallelCopy(pc) => {
                    for pair in pc.pairs() {
                        uses.entry(pair.source).or_default().insert(block_id);
                        if !record_def(&mut defs, pair.target, block_id) {
                            return Err(inconsistent_error!(
                                "{} defined more than once after copy insertion",
                                pair.target
                            ));
                        }
                    }
                }
                _ => {
                    scratch.clear();
                    stmt.uses(&mut scratch);
                    for &v in &scratch {
                        uses.entry(v).or_default().insert(block_id);
                    }
                    if let Some(target) = stmt.def() {
                        if !record_def(&mut defs, target, block_id) {
                            return Err(inconsistent_error!(
                                "{} defined more than once after copy insertion",
                                target
                            ));
                        }
                    }
                }
            }
        }
    }

    let (index_defs, index_uses) = defuse.def_use_maps();
    if defs != *index_defs {
        return Err(inconsistent_error!(
            "def blocks diverge from the def/use index after copy insertion"
        ));
    }
    if uses != *index_uses {
        return Err(inconsistent_error!(
            "use blocks diverge from the def/use index after copy insertion"
        ));
    }
    Ok(())
}

/// Per-function working state of the coalescing phases.
struct DestructionRun<'a> {
    func: &'a mut Function,
    preorder: Vec<usize>,
    liveness: Liveness,
    defuse: DefUseIndex,
    values: ValueClasses,
    classes: CongruenceClasses,
    /// Per variable: the nearest dominating same-class variable known to hold
    /// an equal value.
    equal_anc_in: HashMap<VarId, VarId>,
    /// Per variable: the nearest dominating other-class variable known to
    /// hold an equal value, from the current interference check.
    equal_anc_out: HashMap<VarId, VarId>,
    value_interference: bool,
}

impl DestructionRun<'_> {
    /// Groups copy-related variables into value classes, walking blocks in
    /// dominance preorder so sources are classified before their copies.
    fn compute_value_classes(&mut self) {
        for &block_id in &self.preorder {
            for stmt in &self.func.blocks[block_id].statements {
                match stmt {
                    Statement::Copy {
                        target,
                        source: Operand::Var(source),
                        synthetic: false,
                        ..
                    } => {
                        self.values.join(*target, *source);
                    }
                    Statement::ParallelCopy(pc) => {
                        for pair in pc.pairs() {
                            self.values.join(pair.target, pair.source);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    /// Merges every phi target with its arguments and drops the phis.
    ///
    /// CSSA guarantees the merged resources never interfere, so no checks
    /// are needed here.
    fn coalesce_phis(&mut self) {
        for block_id in 0..self.func.blocks.len() {
            let phis = std::mem::take(&mut self.func.blocks[block_id].phis);
            for phi in phis {
                for arg in &phi.args {
                    if let Operand::Var(v) = arg.value {
                        self.classes.union(phi.target, v, &self.defuse);
                    }
                }
            }
        }
        self.defuse.clear_phi_defs();
    }

    /// Coalesces the remaining copies in dominance preorder, removing each
    /// copy whose endpoints end up congruent.
    fn coalesce_copies(&mut self) -> Result<()> {
        for i in 0..self.preorder.len() {
            let block_id = self.preorder[i];
            let stmts = std::mem::take(&mut self.func.blocks[block_id].statements);
            let mut kept = Vec::with_capacity(stmts.len());

            for mut stmt in stmts {
                let removed = match &mut stmt {
                    Statement::Copy {
                        target,
                        source: Operand::Var(source),
                        synthetic: false,
                        ..
                    } => self.try_coalesce(*target, *source)?,
                    Statement::ParallelCopy(pc) => {
                        let pairs = std::mem::take(pc.pairs_mut());
                        for pair in pairs {
                            if !self.try_coalesce(pair.target, pair.source)? {
                                pc.pairs_mut().push(pair);
                            }
                        }
                        pc.is_empty()
                    }
                    _ => false,
                };
                if !removed {
                    kept.push(stmt);
                }
            }
            self.func.blocks[block_id].statements = kept;
        }
        Ok(())
    }

    /// Attempts to make `a` and `b` congruent. Returns `true` exactly when
    /// they are congruent afterwards and the copy between them is removable.
    fn try_coalesce(&mut self, a: VarId, b: VarId) -> Result<bool> {
        if self.classes.same(a, b) {
            return Ok(true);
        }
        if self.try_coalesce_value(a, b)? {
            return Ok(true);
        }
        self.try_coalesce_sharing(a, b)
    }

    /// Value-based coalescing: merge the classes of `a` and `b` unless they
    /// interfere under the value-refined test.
    fn try_coalesce_value(&mut self, a: VarId, b: VarId) -> Result<bool> {
        if self.classes.is_singleton(a) && self.classes.is_singleton(b) {
            // Orient so `dominator` is defined first.
            let (dominated, dominator) = if self.defuse.pre_dom_order(a, b) {
                (b, a)
            } else {
                (a, b)
            };
            if self.intersect(dominated, dominator)? && !self.values.same(dominated, dominator) {
                return Ok(false);
            }
            self.equal_anc_in.insert(dominated, dominator);
            self.classes.union(a, b, &self.defuse);
            return Ok(true);
        }

        let red: Vec<VarId> = self.classes.members(a).to_vec();
        let blue: Vec<VarId> = self.classes.members(b).to_vec();
        if self.check_interfere(&red, &blue)? {
            return Ok(false);
        }
        self.merge_classes(a, b);
        Ok(true)
    }

    /// Sharing-based coalescing: if a dominating variable `c` already holds
    /// `a`'s value and overlaps it, the copy can ride on `c`'s class instead.
    fn try_coalesce_sharing(&mut self, a: VarId, b: VarId) -> Result<bool> {
        let candidates: Vec<VarId> = self.values.members(a).to_vec();
        for c in candidates {
            if c == a || c == b || !self.defuse.pre_dom_order(c, a) {
                continue;
            }
            if !self.intersect(a, c)? {
                continue;
            }
            let same_ac = self.classes.same(a, c);
            let same_ab = self.classes.same(a, b);
            if same_ac && !same_ab {
                return Ok(true);
            }
            let same_bc = self.classes.same(b, c);
            if !same_ac && !same_ab && !same_bc && self.try_coalesce_value(a, c)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Merges `b`'s congruence class into `a`'s and refreshes the
    /// equal-ancestor chain of every member from the check that just passed.
    fn merge_classes(&mut self, a: VarId, b: VarId) {
        self.classes.union(a, b, &self.defuse);
        let members: Vec<VarId> = self.classes.members(a).to_vec();
        for member in members {
            let anc_in = self.equal_anc_in.get(&member).copied();
            let anc_out = self.equal_anc_out.get(&member).copied();
            let merged = match (anc_in, anc_out) {
                (Some(i), Some(o)) => Some(if self.defuse.pre_dom_order(i, o) { i } else { o }),
                (Some(i), None) => Some(i),
                (None, Some(o)) => Some(o),
                (None, None) => None,
            };
            match merged {
                Some(anc) => {
                    self.equal_anc_in.insert(member, anc);
                }
                None => {
                    self.equal_anc_in.remove(&member);
                }
            }
        }
    }

    /// Walks two congruence classes in merged dominance order, testing each
    /// member against its nearest dominating processed member.
    ///
    /// The stack holds the current dominator-tree path through the processed
    /// members; a cross-class or differing-value overlap anywhere on that
    /// path is interference.
    fn check_interfere(&mut self, red: &[VarId], blue: &[VarId]) -> Result<bool> {
        // (variable, came from red)
        let mut dom: Vec<(VarId, bool)> = Vec::new();
        let mut nr = 0usize;
        let mut nb = 0usize;
        let mut ir = red.iter().copied();
        let mut ib = blue.iter().copied();
        let mut lr = ir.next();
        let mut lb = ib.next();

        if let Some(head) = red.first() {
            self.equal_anc_out.remove(head);
        }
        if let Some(head) = blue.first() {
            self.equal_anc_out.remove(head);
        }

        while (lr.is_some() && nb > 0) || (lb.is_some() && nr > 0) || (lr.is_some() && lb.is_some())
        {
            let (current, is_red) = match (lr, lb) {
                (Some(r), Some(b)) => {
                    if self.defuse.pre_dom_order(r, b) {
                        (r, true)
                    } else {
                        (b, false)
                    }
                }
                (Some(r), None) => (r, true),
                (None, Some(b)) => (b, false),
                (None, None) => break,
            };
            if is_red {
                lr = ir.next();
            } else {
                lb = ib.next();
            }

            while let Some(&(parent, parent_red)) = dom.last() {
                if self.defuse.pre_dom_order(parent, current) {
                    break;
                }
                dom.pop();
                if parent_red {
                    nr -= 1;
                } else {
                    nb -= 1;
                }
            }

            if let Some(&(parent, parent_red)) = dom.last() {
                if self.interference(current, parent, is_red == parent_red)? {
                    return Ok(true);
                }
            }

            dom.push((current, is_red));
            if is_red {
                nr += 1;
            } else {
                nb += 1;
            }
        }
        Ok(false)
    }

    /// Tests whether `a` interferes with the dominating `b`, refining plain
    /// live-range overlap by value equality when enabled.
    fn interference(&mut self, a: VarId, b: VarId, same_class: bool) -> Result<bool> {
        if !self.value_interference {
            return self.intersect(a, b);
        }

        self.equal_anc_out.remove(&a);
        let chain_start = if same_class {
            self.equal_anc_out.get(&b).copied()
        } else {
            Some(b)
        };

        // Find the nearest equal-value ancestor whose range overlaps a.
        let mut overlap = chain_start;
        while let Some(anc) = overlap {
            if self.intersect(a, anc)? {
                break;
            }
            overlap = self.equal_anc_in.get(&anc).copied();
        }

        let same_value = match chain_start {
            Some(start) => self.values.same(a, start),
            None => false,
        };
        if !same_value {
            Ok(overlap.is_some())
        } else {
            if let Some(anc) = overlap {
                self.equal_anc_out.insert(a, anc);
            }
            Ok(false)
        }
    }

    /// Tests whether the live ranges of `a` and the dominating `b` overlap.
    ///
    /// `b` must be defined before `a` in dominance preorder.
    fn intersect(&self, a: VarId, b: VarId) -> Result<bool> {
        if a == b {
            return Err(inconsistent_error!("intersection of {} with itself", a));
        }
        if self.defuse.pre_dom_order(a, b) || !self.defuse.pre_dom_order(b, a) {
            return Err(inconsistent_error!(
                "{} must be defined before {} for an intersection test",
                b,
                a
            ));
        }

        let def_a = self
            .defuse
            .def_block(a)
            .ok_or_else(|| inconsistent_error!("{} has no recorded definition", a))?;

        // b alive past a's whole block certainly covers a's definition.
        if self.liveness.is_live_out(def_a, b) {
            return Ok(true);
        }
        // b neither alive in a's block nor defined there: ranges are disjoint.
        if !self.liveness.is_live_in(def_a, b) && self.defuse.def_block(b) != Some(def_a) {
            return Ok(false);
        }
        // b's range ends inside a's block: overlap iff its last use comes
        // after a's definition.
        let def_index_a = self
            .defuse
            .def_index(a)
            .ok_or_else(|| inconsistent_error!("{} has no definition position", a))?;
        match self.defuse.last_use_index(b, def_a) {
            Some(last_use) => Ok(last_use > def_index_a),
            None => Ok(false),
        }
    }

    /// Maps every variable to its congruence class representative.
    fn build_remap(&mut self) -> HashMap<VarId, VarId> {
        let mut remap = HashMap::new();
        for i in 0..self.func.variable_count() {
            let var = VarId::new(i);
            let rep = self.classes.first(var);
            if rep != var {
                remap.insert(var, rep);
            }
        }
        remap
    }
}

/// Rewrites every variable reference through `remap` and drops the copies the
/// renaming made redundant.
fn apply_remapping(func: &mut Function, remap: &HashMap<VarId, VarId>) -> Result<()> {
    let resolve = |v: VarId| remap.get(&v).copied().unwrap_or(v);

    for block in &mut func.blocks {
        if !block.phis.is_empty() {
            return Err(inconsistent_error!(
                "B{} still has phis at remapping time",
                block.id
            ));
        }

        let stmts = std::mem::take(&mut block.statements);
        let mut kept = Vec::with_capacity(stmts.len());
        for mut stmt in stmts {
            let removed = match &mut stmt {
                Statement::Copy { target, source, .. } => {
                    *target = resolve(*target);
                    if let Operand::Var(v) = source {
                        *v = resolve(*v);
                        *v == *target
                    } else {
                        false
                    }
                }
                Statement::ParallelCopy(pc) => {
                    let pairs = std::mem::take(pc.pairs_mut());
                    for mut pair in pairs {
                        pair.target = resolve(pair.target);
                        pair.source = resolve(pair.source);
                        if pair.target != pair.source {
                            pc.pairs_mut().push(pair);
                        }
                    }
                    pc.is_empty()
                }
                _ => {
                    stmt.rewrite_sources(resolve);
                    false
                }
            };
            if !removed {
                kept.push(stmt);
            }
        }
        block.statements = kept;
    }
    Ok(())
}

/// Lowers every surviving parallel copy to an ordered sequence.
///
/// One spill variable is minted per block, sized to the widest value moved by
/// any of the block's parallel copies.
fn sequentialize_blocks(func: &mut Function) -> Result<()> {
    for block_id in 0..func.blocks.len() {
        let mut widest: Option<(VarId, u32)> = None;
        for stmt in &func.blocks[block_id].statements {
            if let Statement::ParallelCopy(pc) = stmt {
                if pc.is_empty() {
                    return Err(inconsistent_error!(
                        "empty parallel copy survived remapping in B{}",
                        block_id
                    ));
                }
                for pair in pc.pairs() {
                    let slots = pair.ty.slots();
                    if widest.is_none_or(|(_, w)| slots > w) {
                        widest = Some((pair.target, slots));
                    }
                }
            }
        }
        let Some((seed, _)) = widest else { continue };
        let spill = func.make_latest_version(seed);

        let stmts = std::mem::take(&mut func.blocks[block_id].statements);
        let mut lowered = Vec::with_capacity(stmts.len());
        for stmt in stmts {
            match stmt {
                Statement::ParallelCopy(pc) => {
                    if pc.len() == 1 {
                        let pair = pc.pairs()[0];
                        lowered.push(Statement::Copy {
                            target: pair.target,
                            source: Operand::Var(pair.source),
                            ty: pair.ty,
                            synthetic: false,
                        });
                    } else {
                        lowered.extend(sequential::sequentialize(pc.pairs(), spill)?);
                    }
                }
                other => lowered.push(other),
            }
        }
        func.blocks[block_id].statements = lowered;
    }
    Ok(())
}
