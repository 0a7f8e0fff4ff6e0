//! Phi nodes.
//!
//! A phi selects one of its arguments based on the predecessor edge control
//! flow arrived through. Phis live in a dedicated list at the head of each
//! block, conceptually executing simultaneously before any statement.

use std::fmt;

use crate::analysis::ssa::{Operand, VarId};

/// One incoming argument of a phi: the value carried along one predecessor edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhiArg {
    /// The predecessor block the value arrives from.
    pub pred: usize,
    /// The value selected when control arrives from `pred`.
    pub value: Operand,
}

/// A phi node `target = phi(pred0: value0, pred1: value1, ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phi {
    /// The variable the phi defines.
    pub target: VarId,
    /// One argument per predecessor edge.
    pub args: Vec<PhiArg>,
}

impl Phi {
    /// Creates a phi with the given target and arguments.
    #[must_use]
    pub fn new(target: VarId, args: Vec<PhiArg>) -> Self {
        Self { target, args }
    }

    /// Returns the argument for predecessor `pred`, if present.
    #[must_use]
    pub fn arg(&self, pred: usize) -> Option<Operand> {
        self.args.iter().find(|a| a.pred == pred).map(|a| a.value)
    }

    /// Returns the argument variable for predecessor `pred`, if the argument
    /// is present and is a variable.
    #[must_use]
    pub fn arg_var(&self, pred: usize) -> Option<VarId> {
        self.arg(pred).and_then(Operand::as_var)
    }

    /// Replaces the argument for predecessor `pred`.
    ///
    /// Does nothing if no argument exists for `pred`.
    pub fn set_arg(&mut self, pred: usize, value: Operand) {
        if let Some(arg) = self.args.iter_mut().find(|a| a.pred == pred) {
            arg.value = value;
        }
    }
}

impl fmt::Display for Phi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = phi(", self.target)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "B{}: {}", arg.pred, arg.value)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phi_arg_lookup() {
        let phi = Phi::new(
            VarId::new(5),
            vec![
                PhiArg {
                    pred: 0,
                    value: Operand::Var(VarId::new(1)),
                },
                PhiArg {
                    pred: 1,
                    value: Operand::Var(VarId::new(2)),
                },
            ],
        );

        assert_eq!(phi.arg_var(0), Some(VarId::new(1)));
        assert_eq!(phi.arg_var(1), Some(VarId::new(2)));
        assert_eq!(phi.arg(2), None);
    }

    #[test]
    fn test_phi_set_arg() {
        let mut phi = Phi::new(
            VarId::new(5),
            vec![PhiArg {
                pred: 3,
                value: Operand::Var(VarId::new(1)),
            }],
        );
        phi.set_arg(3, Operand::Var(VarId::new(9)));
        assert_eq!(phi.arg_var(3), Some(VarId::new(9)));

        // Unknown predecessors are ignored.
        phi.set_arg(7, Operand::Const(0));
        assert_eq!(phi.args.len(), 1);
    }

    #[test]
    fn test_phi_display() {
        let phi = Phi::new(
            VarId::new(5),
            vec![
                PhiArg {
                    pred: 0,
                    value: Operand::Var(VarId::new(1)),
                },
                PhiArg {
                    pred: 1,
                    value: Operand::Var(VarId::new(2)),
                },
            ],
        );
        assert_eq!(phi.to_string(), "v5 = phi(B0: v1, B1: v2)");
    }
}
