//! Block statements: copies, parallel copies and terminators.
//!
//! The destruction passes only need to see data movement and control flow, so
//! the statement language is deliberately small: sequential copies (from a
//! variable or a constant), simultaneous parallel copy groups, and the two
//! terminator forms. Everything else a real method body contains is opaque to
//! destruction and does not appear here.

use std::fmt;

use crate::{
    analysis::ssa::{ValueType, VarId},
    Result,
};

/// The right-hand side of a copy or phi argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A reference to another variable.
    Var(VarId),
    /// An immediate constant.
    Const(i64),
}

impl Operand {
    /// Returns the referenced variable, if this operand is one.
    #[must_use]
    pub const fn as_var(self) -> Option<VarId> {
        match self {
            Operand::Var(v) => Some(v),
            Operand::Const(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Var(v) => write!(f, "{v}"),
            Operand::Const(c) => write!(f, "{c}"),
        }
    }
}

/// One `target := source` pair inside a parallel copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyPair {
    /// The variable written.
    pub target: VarId,
    /// The variable read.
    pub source: VarId,
    /// The type of the moved value.
    pub ty: ValueType,
}

/// A group of copies that execute simultaneously.
///
/// All sources are read before any target is written, so a parallel copy can
/// express permutations. No target may appear twice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParallelCopy {
    pairs: Vec<CopyPair>,
}

impl ParallelCopy {
    /// Creates an empty parallel copy.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Adds a copy pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`](crate::Error::Malformed) if `pair.target`
    /// is already a target of this parallel copy.
    pub fn push(&mut self, pair: CopyPair) -> Result<()> {
        if self.pairs.iter().any(|p| p.target == pair.target) {
            return Err(malformed_error!(
                "duplicate target {} in parallel copy",
                pair.target
            ));
        }
        self.pairs.push(pair);
        Ok(())
    }

    /// Returns the copy pairs in insertion order.
    #[must_use]
    pub fn pairs(&self) -> &[CopyPair] {
        &self.pairs
    }

    /// Returns a mutable view of the copy pairs.
    ///
    /// Callers must not introduce duplicate targets.
    pub fn pairs_mut(&mut self) -> &mut Vec<CopyPair> {
        &mut self.pairs
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for ParallelCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parallel (")?;
        for (i, pair) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", pair.target)?;
        }
        write!(f, ") = (")?;
        for (i, pair) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", pair.source)?;
        }
        write!(f, ")")
    }
}

/// A statement in a basic block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// A sequential copy `target := source`.
    Copy {
        /// The variable written.
        target: VarId,
        /// The value read.
        source: Operand,
        /// The type of the moved value.
        ty: ValueType,
        /// `true` for copies the destruction pass inserted itself.
        synthetic: bool,
    },
    /// A group of simultaneous copies.
    ParallelCopy(ParallelCopy),
    /// A branch terminator, conditional when `condition` is present.
    Branch {
        /// The variable the branch tests, if any.
        condition: Option<VarId>,
    },
    /// A return terminator.
    Return {
        /// The variable returned, if any.
        value: Option<VarId>,
    },
}

impl Statement {
    /// Returns `true` for statements that end a block and transfer control.
    #[must_use]
    pub const fn is_terminator(&self) -> bool {
        matches!(self, Statement::Branch { .. } | Statement::Return { .. })
    }

    /// Returns the variable this statement defines, for single-def statements.
    ///
    /// Parallel copies define several variables and return `None` here; use
    /// [`ParallelCopy::pairs`] to enumerate them.
    #[must_use]
    pub const fn def(&self) -> Option<VarId> {
        match self {
            Statement::Copy { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// Appends every variable this statement reads to `out`.
    pub fn uses(&self, out: &mut Vec<VarId>) {
        match self {
            Statement::Copy { source, .. } => {
                if let Operand::Var(v) = source {
                    out.push(*v);
                }
            }
            Statement::ParallelCopy(pc) => {
                for pair in pc.pairs() {
                    out.push(pair.source);
                }
            }
            Statement::Branch { condition } => {
                if let Some(v) = condition {
                    out.push(*v);
                }
            }
            Statement::Return { value } => {
                if let Some(v) = value {
                    out.push(*v);
                }
            }
        }
    }

    /// Rewrites every variable read by this statement through `remap`.
    pub fn rewrite_sources(&mut self, mut remap: impl FnMut(VarId) -> VarId) {
        match self {
            Statement::Copy { source, .. } => {
                if let Operand::Var(v) = source {
                    *v = remap(*v);
                }
            }
            Statement::ParallelCopy(pc) => {
                for pair in pc.pairs_mut() {
                    pair.source = remap(pair.source);
                }
            }
            Statement::Branch { condition } => {
                if let Some(v) = condition {
                    *v = remap(*v);
                }
            }
            Statement::Return { value } => {
                if let Some(v) = value {
                    *v = remap(*v);
                }
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Copy { target, source, .. } => write!(f, "{target} = {source}"),
            Statement::ParallelCopy(pc) => write!(f, "{pc}"),
            Statement::Branch { condition: Some(c) } => write!(f, "branch {c}"),
            Statement::Branch { condition: None } => write!(f, "branch"),
            Statement::Return { value: Some(v) } => write!(f, "return {v}"),
            Statement::Return { value: None } => write!(f, "return"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(t: usize, s: usize) -> CopyPair {
        CopyPair {
            target: VarId::new(t),
            source: VarId::new(s),
            ty: ValueType::Int,
        }
    }

    #[test]
    fn test_parallel_copy_rejects_duplicate_target() {
        let mut pc = ParallelCopy::new();
        pc.push(pair(1, 2)).unwrap();
        pc.push(pair(3, 2)).unwrap();

        let err = pc.push(pair(1, 4)).unwrap_err();
        assert!(err.to_string().contains("duplicate target v1"));
        assert_eq!(pc.len(), 2);
    }

    #[test]
    fn test_parallel_copy_display() {
        let mut pc = ParallelCopy::new();
        pc.push(pair(1, 3)).unwrap();
        pc.push(pair(2, 4)).unwrap();
        assert_eq!(pc.to_string(), "parallel (v1, v2) = (v3, v4)");
    }

    #[test]
    fn test_statement_uses() {
        let mut uses = Vec::new();
        Statement::Copy {
            target: VarId::new(0),
            source: Operand::Var(VarId::new(1)),
            ty: ValueType::Int,
            synthetic: false,
        }
        .uses(&mut uses);
        assert_eq!(uses, vec![VarId::new(1)]);

        uses.clear();
        Statement::Copy {
            target: VarId::new(0),
            source: Operand::Const(7),
            ty: ValueType::Int,
            synthetic: false,
        }
        .uses(&mut uses);
        assert!(uses.is_empty());

        uses.clear();
        let mut pc = ParallelCopy::new();
        pc.push(pair(1, 3)).unwrap();
        pc.push(pair(2, 4)).unwrap();
        Statement::ParallelCopy(pc).uses(&mut uses);
        assert_eq!(uses, vec![VarId::new(3), VarId::new(4)]);
    }

    #[test]
    fn test_statement_terminators() {
        assert!(Statement::Branch { condition: None }.is_terminator());
        assert!(Statement::Return { value: None }.is_terminator());
        assert!(!Statement::Copy {
            target: VarId::new(0),
            source: Operand::Const(0),
            ty: ValueType::Int,
            synthetic: false,
        }
        .is_terminator());
    }

    #[test]
    fn test_rewrite_sources() {
        let mut stmt = Statement::Return {
            value: Some(VarId::new(3)),
        };
        stmt.rewrite_sources(|v| if v == VarId::new(3) { VarId::new(9) } else { v });
        assert_eq!(
            stmt,
            Statement::Return {
                value: Some(VarId::new(9))
            }
        );
    }

    #[test]
    fn test_statement_display() {
        let stmt = Statement::Copy {
            target: VarId::new(5),
            source: Operand::Const(42),
            ty: ValueType::Int,
            synthetic: true,
        };
        assert_eq!(stmt.to_string(), "v5 = 42");
        assert_eq!(
            Statement::Branch {
                condition: Some(VarId::new(1))
            }
            .to_string(),
            "branch v1"
        );
    }
}
