//! End-to-end SSA destruction tests.
//!
//! Each case builds an SSA function, records the value it returns along a set
//! of execution paths, destructs it, and checks that the phi-free result
//! returns the same values along the same paths. A small interpreter executes
//! copies, parallel copies and phis directly; control flow is driven by the
//! explicit path, so branch conditions never have to be evaluated.

use std::collections::HashMap;

use unssa::{
    analysis::{
        cfg::FlowEdge,
        ssa::{Operand, Phi, PhiArg, Statement, ValueType, VarBase, VarId},
    },
    destruct, destruct_all, Destructor, Function,
};

fn eval(env: &HashMap<VarId, i64>, operand: Operand) -> i64 {
    match operand {
        Operand::Var(v) => env[&v],
        Operand::Const(c) => c,
    }
}

/// Executes `func` along `path` (a sequence of block ids starting at the
/// entry) and returns the value of the first `Return` encountered.
fn run_path(func: &Function, path: &[usize]) -> Option<i64> {
    let mut env: HashMap<VarId, i64> = HashMap::new();

    for (i, &block_id) in path.iter().enumerate() {
        let block = func.block(block_id).unwrap();

        // Phis read their arguments simultaneously, selected by the edge
        // control flow arrived through.
        if !block.phis.is_empty() {
            let pred = path[i - 1];
            let incoming: Vec<(VarId, i64)> = block
                .phis
                .iter()
                .map(|phi| (phi.target, eval(&env, phi.arg(pred).unwrap())))
                .collect();
            env.extend(incoming);
        }

        for stmt in &block.statements {
            match stmt {
                Statement::Copy { target, source, .. } => {
                    let value = eval(&env, *source);
                    env.insert(*target, value);
                }
                Statement::ParallelCopy(pc) => {
                    let moves: Vec<(VarId, i64)> = pc
                        .pairs()
                        .iter()
                        .map(|p| (p.target, env[&p.source]))
                        .collect();
                    env.extend(moves);
                }
                Statement::Branch { .. } => {}
                Statement::Return { value } => {
                    return value.map(|v| env[&v]);
                }
            }
        }
    }
    None
}

fn assert_conventional(func: &Function) {
    assert_eq!(func.total_phi_count(), 0, "phis survived destruction");
    for block in &func.blocks {
        for stmt in &block.statements {
            assert!(
                !matches!(stmt, Statement::ParallelCopy(_)),
                "parallel copy survived destruction in B{}",
                block.id
            );
        }
    }
}

/// Destructs a clone of `func` with `destructor` and checks it returns the
/// same value as the original along every path.
fn check_semantics(func: &Function, destructor: Destructor, paths: &[&[usize]]) {
    let expected: Vec<Option<i64>> = paths.iter().map(|p| run_path(func, p)).collect();

    let mut transformed = func.clone();
    let remap = destructor.run(&mut transformed).unwrap();
    assert_conventional(&transformed);

    for (from, to) in remap.iter() {
        assert_eq!(remap.resolve(to), to, "remap must be idempotent");
        assert_ne!(from, to);
    }

    for (path, want) in paths.iter().zip(expected) {
        assert_eq!(
            run_path(&transformed, path),
            want,
            "value changed along path {path:?}"
        );
    }
}

fn load(target: VarId, value: i64) -> Statement {
    Statement::Copy {
        target,
        source: Operand::Const(value),
        ty: ValueType::Int,
        synthetic: false,
    }
}

fn copy(target: VarId, source: VarId) -> Statement {
    Statement::Copy {
        target,
        source: Operand::Var(source),
        ty: ValueType::Int,
        synthetic: false,
    }
}

fn phi_arg(pred: usize, var: VarId) -> PhiArg {
    PhiArg {
        pred,
        value: Operand::Var(var),
    }
}

/// B0: a = 1; branch -> B1 | B2
/// B1: b = 10 -> B3;  B2: c = 20 -> B3
/// B3: d = phi(B1: b, B2: c); return d
fn diamond() -> Function {
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

    let block0 = func.block_mut(b0).unwrap();
    block0.statements.push(load(a, 1));
    block0.statements.push(Statement::Branch { condition: Some(a) });
    let block1 = func.block_mut(b1).unwrap();
    block1.statements.push(load(b, 10));
    block1.statements.push(Statement::Branch { condition: None });
    let block2 = func.block_mut(b2).unwrap();
    block2.statements.push(load(c, 20));
    block2.statements.push(Statement::Branch { condition: None });
    let block3 = func.block_mut(b3).unwrap();
    block3.phis.push(Phi::new(d, vec![phi_arg(b1, b), phi_arg(b2, c)]));
    block3.statements.push(Statement::Return { value: Some(d) });

    func
}

/// The swap problem: a loop whose phis exchange two values every iteration.
///
/// B0: a0 = 1; b0 = 2 -> B1
/// B1: a1 = phi(B0: a0, B1: b1); b1 = phi(B0: b0, B1: a1);
///     branch -> B1 | B2
/// B2: return a1
fn swap_loop() -> Function {
    let mut func = Function::new();
    let b0 = func.add_block();
    let b1 = func.add_block();
    let b2 = func.add_block();
    func.add_edge(b0, FlowEdge::fallthrough(b1)).unwrap();
    func.add_edge(b1, FlowEdge::conditional_true(b1)).unwrap();
    func.add_edge(b1, FlowEdge::conditional_false(b2)).unwrap();

    let a0 = func.new_variable(VarBase::Local(0), ValueType::Int);
    let b0v = func.new_variable(VarBase::Local(1), ValueType::Int);
    let a1 = func.new_variable(VarBase::Local(0), ValueType::Int);
    let b1v = func.new_variable(VarBase::Local(1), ValueType::Int);

    let block0 = func.block_mut(b0).unwrap();
    block0.statements.push(load(a0, 1));
    block0.statements.push(load(b0v, 2));
    let block1 = func.block_mut(b1).unwrap();
    block1
        .phis
        .push(Phi::new(a1, vec![phi_arg(b0, a0), phi_arg(b1, b1v)]));
    block1
        .phis
        .push(Phi::new(b1v, vec![phi_arg(b0, b0v), phi_arg(b1, a1)]));
    block1.statements.push(Statement::Branch { condition: Some(a1) });
    func.block_mut(b2)
        .unwrap()
        .statements
        .push(Statement::Return { value: Some(a1) });

    func
}

/// The lost-copy problem: the phi target outlives the back edge that
/// redefines its argument.
///
/// B0: a = 5 -> B1
/// B1: x = phi(B0: a, B1: y); y = 9; branch -> B1 | B2
/// B2: return x
fn lost_copy_loop() -> Function {
    let mut func = Function::new();
    let b0 = func.add_block();
    let b1 = func.add_block();
    let b2 = func.add_block();
    func.add_edge(b0, FlowEdge::fallthrough(b1)).unwrap();
    func.add_edge(b1, FlowEdge::conditional_true(b1)).unwrap();
    func.add_edge(b1, FlowEdge::conditional_false(b2)).unwrap();

    let a = func.new_variable(VarBase::Local(0), ValueType::Int);
    let x = func.new_variable(VarBase::Local(1), ValueType::Int);
    let y = func.new_variable(VarBase::Local(2), ValueType::Int);

    func.block_mut(b0).unwrap().statements.push(load(a, 5));
    let block1 = func.block_mut(b1).unwrap();
    block1.phis.push(Phi::new(x, vec![phi_arg(b0, a), phi_arg(b1, y)]));
    block1.statements.push(load(y, 9));
    block1.statements.push(Statement::Branch { condition: Some(x) });
    func.block_mut(b2)
        .unwrap()
        .statements
        .push(Statement::Return { value: Some(x) });

    func
}

/// A loop with three rotating values, forcing a parallel copy cycle longer
/// than a swap.
///
/// B0: a0 = 1; b0 = 2; c0 = 3 -> B1
/// B1: a1 = phi(B0: a0, B1: c1); b1 = phi(B0: b0, B1: a1);
///     c1 = phi(B0: c0, B1: b1); branch -> B1 | B2
/// B2: return b1
fn rotate_loop() -> Function {
    let mut func = Function::new();
    let b0 = func.add_block();
    let b1 = func.add_block();
    let b2 = func.add_block();
    func.add_edge(b0, FlowEdge::fallthrough(b1)).unwrap();
    func.add_edge(b1, FlowEdge::conditional_true(b1)).unwrap();
    func.add_edge(b1, FlowEdge::conditional_false(b2)).unwrap();

    let a0 = func.new_variable(VarBase::Local(0), ValueType::Int);
    let b0v = func.new_variable(VarBase::Local(1), ValueType::Int);
    let c0 = func.new_variable(VarBase::Local(2), ValueType::Int);
    let a1 = func.new_variable(VarBase::Local(0), ValueType::Int);
    let b1v = func.new_variable(VarBase::Local(1), ValueType::Int);
    let c1 = func.new_variable(VarBase::Local(2), ValueType::Int);

    let block0 = func.block_mut(b0).unwrap();
    block0.statements.push(load(a0, 1));
    block0.statements.push(load(b0v, 2));
    block0.statements.push(load(c0, 3));
    let block1 = func.block_mut(b1).unwrap();
    block1
        .phis
        .push(Phi::new(a1, vec![phi_arg(b0, a0), phi_arg(b1, c1)]));
    block1
        .phis
        .push(Phi::new(b1v, vec![phi_arg(b0, b0v), phi_arg(b1, a1)]));
    block1
        .phis
        .push(Phi::new(c1, vec![phi_arg(b0, c0), phi_arg(b1, b1v)]));
    block1.statements.push(Statement::Branch { condition: Some(a1) });
    func.block_mut(b2)
        .unwrap()
        .statements
        .push(Statement::Return { value: Some(b1v) });

    func
}

/// Copies along both diamond arms into the same base, plus a use after the
/// merge, exercising copy coalescing across branches.
///
/// B0: s = 7; branch -> B1 | B2
/// B1: t = s -> B3;  B2: u = 40 -> B3
/// B3: m = phi(B1: t, B2: u); r = m; return r
fn diamond_with_copies() -> Function {
    let mut func = Function::new();
    let b0 = func.add_block();
    let b1 = func.add_block();
    let b2 = func.add_block();
    let b3 = func.add_block();
    func.add_edge(b0, FlowEdge::conditional_true(b1)).unwrap();
    func.add_edge(b0, FlowEdge::conditional_false(b2)).unwrap();
    func.add_edge(b1, FlowEdge::unconditional(b3)).unwrap();
    func.add_edge(b2, FlowEdge::unconditional(b3)).unwrap();

    let s = func.new_variable(VarBase::Local(0), ValueType::Int);
    let t = func.new_variable(VarBase::Local(1), ValueType::Int);
    let u = func.new_variable(VarBase::Local(1), ValueType::Int);
    let m = func.new_variable(VarBase::Local(1), ValueType::Int);
    let r = func.new_variable(VarBase::Local(2), ValueType::Int);

    let block0 = func.block_mut(b0).unwrap();
    block0.statements.push(load(s, 7));
    block0.statements.push(Statement::Branch { condition: Some(s) });
    let block1 = func.block_mut(b1).unwrap();
    block1.statements.push(copy(t, s));
    block1.statements.push(Statement::Branch { condition: None });
    let block2 = func.block_mut(b2).unwrap();
    block2.statements.push(load(u, 40));
    block2.statements.push(Statement::Branch { condition: None });
    let block3 = func.block_mut(b3).unwrap();
    block3.phis.push(Phi::new(m, vec![phi_arg(b1, t), phi_arg(b2, u)]));
    block3.statements.push(copy(r, m));
    block3.statements.push(Statement::Return { value: Some(r) });

    func
}

#[test]
fn test_diamond_preserves_semantics() {
    let func = diamond();
    check_semantics(&func, Destructor::new(), &[&[0, 1, 3], &[0, 2, 3]]);
}

#[test]
fn test_swap_loop_preserves_semantics() {
    let func = swap_loop();
    check_semantics(
        &func,
        Destructor::new(),
        &[
            &[0, 1, 2],
            &[0, 1, 1, 2],
            &[0, 1, 1, 1, 2],
            &[0, 1, 1, 1, 1, 2],
        ],
    );
}

#[test]
fn test_lost_copy_loop_preserves_semantics() {
    let func = lost_copy_loop();
    check_semantics(
        &func,
        Destructor::new(),
        &[&[0, 1, 2], &[0, 1, 1, 2], &[0, 1, 1, 1, 2]],
    );
}

#[test]
fn test_rotate_loop_preserves_semantics() {
    let func = rotate_loop();
    check_semantics(
        &func,
        Destructor::new(),
        &[
            &[0, 1, 2],
            &[0, 1, 1, 2],
            &[0, 1, 1, 1, 2],
            &[0, 1, 1, 1, 1, 2],
        ],
    );
}

#[test]
fn test_copy_coalescing_preserves_semantics() {
    let func = diamond_with_copies();
    check_semantics(&func, Destructor::new(), &[&[0, 1, 3], &[0, 2, 3]]);
}

#[test]
fn test_flag_matrix_preserves_semantics() {
    let paths: &[&[usize]] = &[&[0, 1, 2], &[0, 1, 1, 2], &[0, 1, 1, 1, 2]];
    for facilitate in [false, true] {
        for value_interference in [false, true] {
            let destructor = Destructor::new()
                .with_facilitate_coalesce(facilitate)
                .with_value_interference(value_interference);
            check_semantics(&swap_loop(), destructor, paths);
            check_semantics(&lost_copy_loop(), destructor, paths);
        }
    }
}

#[test]
fn test_coalescing_drops_redundant_copies() {
    let mut func = diamond_with_copies();
    destruct(&mut func).unwrap();

    // The arm copy t = s and the merge copy r = m coalesce away; only the
    // loads, branches and the return remain.
    let total: usize = func.blocks.iter().map(|b| b.statements.len()).sum();
    assert_eq!(total, 7);
}

#[test]
fn test_destruct_all_batch() {
    let mut funcs = vec![diamond(), swap_loop(), lost_copy_loop(), rotate_loop()];
    destruct_all(&mut funcs).unwrap();
    for func in &funcs {
        assert_conventional(func);
    }
}

#[test]
fn test_destruct_all_reports_first_error() {
    let mut bad = diamond();
    bad.block_mut(3).unwrap().phis[0].set_arg(1, Operand::Const(0));

    let mut funcs = vec![diamond(), bad];
    assert!(destruct_all(&mut funcs).is_err());
}

#[test]
fn test_wide_values_use_wide_spill() {
    // A swap of two longs: the spill variable minted for the cycle must be
    // two slots wide.
    let mut func = Function::new();
    let b0 = func.add_block();
    let b1 = func.add_block();
    let b2 = func.add_block();
    func.add_edge(b0, FlowEdge::fallthrough(b1)).unwrap();
    func.add_edge(b1, FlowEdge::conditional_true(b1)).unwrap();
    func.add_edge(b1, FlowEdge::conditional_false(b2)).unwrap();

    let a0 = func.new_variable(VarBase::Local(0), ValueType::Long);
    let b0v = func.new_variable(VarBase::Local(2), ValueType::Long);
    let a1 = func.new_variable(VarBase::Local(0), ValueType::Long);
    let b1v = func.new_variable(VarBase::Local(2), ValueType::Long);

    let block0 = func.block_mut(b0).unwrap();
    block0.statements.push(Statement::Copy {
        target: a0,
        source: Operand::Const(1),
        ty: ValueType::Long,
        synthetic: false,
    });
    block0.statements.push(Statement::Copy {
        target: b0v,
        source: Operand::Const(2),
        ty: ValueType::Long,
        synthetic: false,
    });
    let block1 = func.block_mut(b1).unwrap();
    block1
        .phis
        .push(Phi::new(a1, vec![phi_arg(b0, a0), phi_arg(b1, b1v)]));
    block1
        .phis
        .push(Phi::new(b1v, vec![phi_arg(b0, b0v), phi_arg(b1, a1)]));
    block1.statements.push(Statement::Branch { condition: Some(a1) });
    func.block_mut(b2)
        .unwrap()
        .statements
        .push(Statement::Return { value: Some(a1) });

    let before: Vec<Option<i64>> = [&[0usize, 1, 2][..], &[0, 1, 1, 2]]
        .iter()
        .map(|p| run_path(&func, p))
        .collect();
    destruct(&mut func).unwrap();
    assert_conventional(&func);

    for (path, want) in [&[0usize, 1, 2][..], &[0, 1, 1, 2]].iter().zip(before) {
        assert_eq!(run_path(&func, path), want);
    }
    // Every variable written by a copy in the loop block is long-typed,
    // including any spill the sequentializer minted.
    for stmt in &func.block(1).unwrap().statements {
        if let Statement::Copy { target, .. } = stmt {
            assert_eq!(func.variable(*target).ty, ValueType::Long);
        }
    }
}
