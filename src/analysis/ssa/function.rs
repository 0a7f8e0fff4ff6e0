//! Function bodies: blocks plus the interned variable pool.

use std::collections::HashMap;
use std::fmt;

use crate::{
    analysis::{
        cfg::FlowEdge,
        ssa::{Block, ValueType, VarBase, VarId, Variable},
    },
    Error, Result,
};

/// One function in SSA form.
///
/// Owns the basic blocks and the variable pool. Variables are interned:
/// every statement, phi and analysis refers to them by [`VarId`], and the
/// pool is the only place base, version and type are stored. Version
/// counters are tracked per base so fresh versions never collide with
/// existing names.
#[derive(Debug, Clone, Default)]
pub struct Function {
    /// The basic blocks, indexed by block id.
    pub blocks: Vec<Block>,
    /// The interned variable pool, indexed by [`VarId`].
    variables: Vec<Variable>,
    /// The entry block id.
    pub entry: usize,
    /// Highest version handed out per base.
    latest_version: HashMap<VarBase, u32>,
}

impl Function {
    /// Creates an empty function with entry block id 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an empty block and returns its id.
    pub fn add_block(&mut self) -> usize {
        let id = self.blocks.len();
        self.blocks.push(Block::new(id));
        id
    }

    /// Adds a control-flow edge from block `from`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if either endpoint is not a block of
    /// this function.
    pub fn add_edge(&mut self, from: usize, edge: FlowEdge) -> Result<()> {
        if from >= self.blocks.len() {
            return Err(Error::GraphError(format!(
                "source block {} does not exist in function with {} blocks",
                from,
                self.blocks.len()
            )));
        }
        if edge.target >= self.blocks.len() {
            return Err(Error::GraphError(format!(
                "target block {} does not exist in function with {} blocks",
                edge.target,
                self.blocks.len()
            )));
        }
        self.blocks[from].successors.push(edge);
        Ok(())
    }

    /// Interns a new variable: the next unused version of `base`.
    pub fn new_variable(&mut self, base: VarBase, ty: ValueType) -> VarId {
        let version = match self.latest_version.get(&base) {
            Some(&v) => v + 1,
            None => 0,
        };
        self.latest_version.insert(base, version);

        let id = VarId::new(self.variables.len());
        self.variables.push(Variable {
            id,
            base,
            version,
            ty,
        });
        id
    }

    /// Interns a fresh version of an existing variable: same base and type,
    /// next unused version number.
    pub fn make_latest_version(&mut self, var: VarId) -> VarId {
        let Variable { base, ty, .. } = self.variables[var.index()];
        self.new_variable(base, ty)
    }

    /// Returns the interned data of `var`.
    #[must_use]
    pub fn variable(&self, var: VarId) -> &Variable {
        &self.variables[var.index()]
    }

    /// Returns the number of interned variables.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Returns an iterator over all interned variables.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.variables.iter()
    }

    /// Returns the block with id `id`, if it exists.
    #[must_use]
    pub fn block(&self, id: usize) -> Option<&Block> {
        self.blocks.get(id)
    }

    /// Returns the block with id `id` mutably, if it exists.
    pub fn block_mut(&mut self, id: usize) -> Option<&mut Block> {
        self.blocks.get_mut(id)
    }

    /// Returns the total number of phi nodes across all blocks.
    #[must_use]
    pub fn total_phi_count(&self) -> usize {
        self.blocks.iter().map(|b| b.phis.len()).sum()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            write!(f, "{block}")?;
            if !block.successors.is_empty() {
                write!(f, "  -> ")?;
                for (i, edge) in block.successors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "B{} ({})", edge.target, edge.kind)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
