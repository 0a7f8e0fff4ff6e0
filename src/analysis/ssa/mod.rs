//! The SSA data model.
//!
//! A [`Function`] is a list of [`Block`]s plus an interned pool of
//! [`Variable`]s. Blocks hold [`Phi`] nodes and [`Statement`]s; all variable
//! references go through the dense [`VarId`] handle so analyses can use plain
//! vectors for per-variable state.
//!
//! The model covers exactly what SSA destruction needs to observe: copies,
//! parallel copies, phis and terminators. Opaque computation in a real method
//! body is expected to be summarized into this form by the IR builder that
//! produces the [`Function`].

mod block;
mod function;
mod phi;
mod statement;
mod variable;

pub use block::Block;
pub use function::Function;
pub use phi::{Phi, PhiArg};
pub use statement::{CopyPair, Operand, ParallelCopy, Statement};
pub use variable::{ValueType, VarBase, VarId, Variable};
