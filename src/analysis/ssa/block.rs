//! Basic blocks.

use std::fmt;

use crate::analysis::{
    cfg::FlowEdge,
    ssa::{Phi, Statement},
};

/// A basic block: phis, straight-line statements and outgoing flow edges.
///
/// Phis are kept separate from the statement list because they execute
/// conceptually on the incoming edges, not at a program point inside the
/// block. The last statement, when present, is the block's terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// The block's index within its function.
    pub id: usize,
    /// The phi nodes at the head of the block.
    pub phis: Vec<Phi>,
    /// The statements in execution order.
    pub statements: Vec<Statement>,
    /// The outgoing control-flow edges.
    pub successors: Vec<FlowEdge>,
}

impl Block {
    /// Creates an empty block with the given index.
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self {
            id,
            phis: Vec::new(),
            statements: Vec::new(),
            successors: Vec::new(),
        }
    }

    /// Returns the terminator statement, if the block ends in one.
    #[must_use]
    pub fn terminator(&self) -> Option<&Statement> {
        self.statements.last().filter(|s| s.is_terminator())
    }

    /// Inserts a statement at the start of the block, before all existing
    /// statements but after the phis.
    pub fn insert_at_start(&mut self, stmt: Statement) {
        self.statements.insert(0, stmt);
    }

    /// Inserts a statement at the end of the block, before the terminator if
    /// the block has one.
    pub fn insert_before_terminator(&mut self, stmt: Statement) {
        match self.statements.last() {
            Some(last) if last.is_terminator() => {
                let at = self.statements.len() - 1;
                self.statements.insert(at, stmt);
            }
            _ => self.statements.push(stmt),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "B{}:", self.id)?;
        for phi in &self.phis {
            writeln!(f, "  {phi}")?;
        }
        for stmt in &self.statements {
            writeln!(f, "  {stmt}")?;
        }
        Ok(())
    }
}
