//! Parallel copy sequentialization.
//!
//! Lowers one simultaneous copy group into an ordered sequence of plain
//! copies. Targets whose value is not needed elsewhere are emitted greedily;
//! a cyclic permutation left over once the greedy phase stalls is broken by
//! routing one element through the spill variable, which costs exactly one
//! extra copy per cycle.

use std::collections::HashMap;

use crate::{
    analysis::ssa::{CopyPair, Operand, Statement, ValueType, VarId},
    Result,
};

/// Emits an equivalent ordered copy sequence for `pairs`.
///
/// `spill` must be a fresh variable wide enough for every value moved by the
/// group; it is written only when a cycle has to be broken.
///
/// # Errors
///
/// Returns [`Error::Malformed`](crate::Error::Malformed) if two pairs share a
/// target, and [`Error::Inconsistent`](crate::Error::Inconsistent) if the
/// routing bookkeeping contradicts itself.
pub fn sequentialize(pairs: &[CopyPair], spill: VarId) -> Result<Vec<Statement>> {
    // loc[x]: where x's original value currently lives (None = nowhere yet).
    let mut loc: HashMap<VarId, Option<VarId>> = HashMap::new();
    // pred[b]: the source feeding target b.
    let mut pred: HashMap<VarId, VarId> = HashMap::new();
    // values[x]: which original value x holds right now.
    let mut values: HashMap<VarId, VarId> = HashMap::new();
    let mut types: HashMap<VarId, ValueType> = HashMap::new();
    let mut ready: Vec<VarId> = Vec::new();
    let mut to_do: Vec<VarId> = Vec::new();
    let mut emitted: Vec<Statement> = Vec::new();

    for pair in pairs {
        loc.insert(pair.target, None);
        loc.insert(pair.source, None);
        values.insert(pair.target, pair.target);
        values.insert(pair.source, pair.source);
        types.insert(pair.target, pair.ty);
        types.insert(pair.source, pair.ty);
    }
    values.insert(spill, spill);

    for pair in pairs {
        loc.insert(pair.source, Some(pair.source));
        if pred.insert(pair.target, pair.source).is_some() {
            return Err(malformed_error!(
                "duplicate target {} in parallel copy",
                pair.target
            ));
        }
        to_do.push(pair.target);
    }

    // Targets nobody reads can be written immediately.
    for pair in pairs {
        if loc[&pair.target].is_none() {
            ready.push(pair.target);
        }
    }

    while !to_do.is_empty() {
        while let Some(t) = ready.pop() {
            let a = pred[&t];
            let c = loc[&a].ok_or_else(|| {
                inconsistent_error!("source {} of pending copy has no location", a)
            })?;

            emitted.push(Statement::Copy {
                target: t,
                source: Operand::Var(c),
                ty: types[&t],
                synthetic: false,
            });
            let value = values[&c];
            values.insert(t, value);
            loc.insert(a, Some(t));

            // a's own slot is free again; if a is also a target, it is ready.
            if a == c && pred.contains_key(&a) {
                ready.push(a);
            }
        }

        let Some(b) = to_do.pop() else { break };
        let feeding = loc[&pred[&b]].ok_or_else(|| {
            inconsistent_error!("source {} of pending copy has no location", pred[&b])
        })?;
        if values[&b] != values[&feeding] {
            // b sits on a cycle: stash its value in the spill slot.
            emitted.push(Statement::Copy {
                target: spill,
                source: Operand::Var(b),
                ty: types[&b],
                synthetic: false,
            });
            let value = values[&b];
            values.insert(spill, value);
            loc.insert(b, Some(spill));
            ready.push(b);
        }
    }

    Ok(emitted)
}
