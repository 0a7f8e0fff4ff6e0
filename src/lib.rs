// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![allow(dead_code)]
#![allow(clippy::too_many_arguments)]

//! # unssa
//!
//! Dominance, liveness and SSA-destruction passes for bytecode-level program analysis.
//!
//! Given a control-flow graph in static single assignment (SSA) form — every variable assigned
//! exactly once, control-flow merges represented by phi nodes — `unssa` converts it to a
//! semantically equivalent CFG without phi nodes or SSA renaming, suitable for direct emission
//! as conventional code. The translation preserves program semantics exactly while producing
//! as few distinct variables as possible (register pressure reduction via coalescing).
//!
//! ## Features
//!
//! - **🔄 Out-of-SSA translation** - Boissinot-style destruction: CSSA copy insertion, value
//!   classes, congruence-class coalescing, parallel-copy sequentialization
//! - **🌲 Dominance analysis** - Lengauer–Tarjan dominator trees, dominance frontiers and
//!   iterated frontiers in near-linear time
//! - **📊 Liveness analysis** - A generic worklist dataflow framework with a backward
//!   live-variables instance and per-block point queries
//! - **🧮 Aggressive coalescing** - Value-equivalence-refined interference testing merges
//!   copy chains that a purely live-range-based test would keep apart
//! - **🛡️ Memory safe** - Pure Rust, no unsafe code, comprehensive error handling
//!
//! ## Quick Start
//!
//! Add `unssa` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! unssa = "0.1"
//! ```
//!
//! Build a function in SSA form and destruct it:
//!
//! ```rust,ignore
//! use unssa::destruct;
//!
//! let mut function = build_ssa_form()?;
//! let remap = destruct(&mut function)?;
//!
//! // No phi nodes or parallel copies remain; every variable reference has
//! // been rewritten to its coalesced representative.
//! assert_eq!(function.total_phi_count(), 0);
//! println!("{}", function);
//! # Ok::<(), unssa::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `unssa` is organized into a few key modules:
//!
//! - [`analysis::ssa`] - The SSA data model: variables, statements, phis, blocks, functions
//! - [`analysis::cfg`] - Control-flow graphs with typed edges and cached dominance
//! - [`analysis::dataflow`] - The dataflow framework and live-variable analysis
//! - [`analysis::defuse`] - Def/use indexing with dominance-preorder positions
//! - [`analysis::destruct`] - The four-phase SSA destruction engine
//! - [`utils::graph`] - Directed graph core, traversal and dominator algorithms
//!
//! ### The destruction pipeline
//!
//! [`Destructor`] drives four strictly ordered phases over one function:
//!
//! 1. **CSSA entry** - Copies are inserted around every phi so that phi operands never
//!    interfere, then def/use information is verified and rebuilt
//! 2. **Value classes** - Copy chains are grouped into classes of variables known to hold
//!    identical runtime values
//! 3. **Coalescing** - Phi operands are merged unconditionally, remaining copies are
//!    coalesced when their congruence classes do not interfere, and every variable is
//!    remapped to its class representative
//! 4. **Sequentialization** - Leftover simultaneous copy sets are lowered to ordered copy
//!    sequences, breaking cyclic permutations with a spill variable
//!
//! Functions are independent; [`destruct_all`] processes a batch in parallel.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result). Failures are fatal for the offending
//! function: they indicate either a malformed input IR or an internal bug, never a transient
//! condition. See [`Error`] for the taxonomy.

#[macro_use]
mod error;

/// Analysis passes: the SSA data model, control-flow graphs, dataflow,
/// def/use indexing and the SSA destruction engine.
pub mod analysis;

/// Supporting infrastructure: bit sets, DOT escaping and the directed
/// graph core with its algorithms.
pub mod utils;

/// `unssa` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `unssa` Error type
///
/// The main error type for all operations in this crate. See the variant documentation for
/// the distinction between malformed input and internal inconsistencies.
pub use error::Error;

/// One function's worth of SSA: blocks, flow edges and the variable pool.
///
/// Built by an external CFG/IR builder, consumed and mutated in place by [`destruct`].
pub use analysis::ssa::Function;

/// The SSA destruction entry points and the resulting variable remapping.
///
/// [`destruct`] runs a [`Destructor`] with default options over one function;
/// [`destruct_all`] fans out over a batch of independent functions in parallel.
pub use analysis::destruct::{destruct, destruct_all, Destructor, RemapTable};
