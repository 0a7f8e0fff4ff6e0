//! Program analysis passes over SSA-form functions.
//!
//! The modules here form a pipeline: [`ssa`] defines the IR, [`cfg`] wraps a
//! function's block structure with cached dominance information, [`dataflow`]
//! provides the fixpoint framework and liveness, [`defuse`] positions
//! definitions and uses in dominance preorder, and [`destruct`] combines all
//! of them to translate functions out of SSA form.

pub mod cfg;
pub mod dataflow;
pub mod defuse;
pub mod destruct;
pub mod ssa;
