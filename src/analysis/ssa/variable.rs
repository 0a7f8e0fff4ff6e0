//! SSA variables and their identities.
//!
//! Every SSA variable is a versioned instance of an underlying storage slot
//! (an argument, a local or a stack position). Variables are interned in their
//! owning [`Function`](crate::analysis::ssa::Function)'s pool and referenced
//! everywhere else by [`VarId`], a dense handle that doubles as an index into
//! per-variable side tables.

use std::fmt;

use strum::Display;

/// A dense handle for an interned SSA variable.
///
/// `VarId`s are assigned sequentially by the owning function's variable pool
/// and are valid only within that function.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Creates a `VarId` from a raw pool index.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        VarId(index)
    }

    /// Returns the raw pool index of this variable.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarId({})", self.0)
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<usize> for VarId {
    #[inline]
    fn from(index: usize) -> Self {
        VarId(index)
    }
}

impl From<VarId> for usize {
    #[inline]
    fn from(var: VarId) -> Self {
        var.0
    }
}

/// The storage slot an SSA variable versions.
///
/// Two variables with the same base are versions of the same original
/// location; destruction mints fresh versions of a base when it needs copy
/// targets that are guaranteed not to collide with existing names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarBase {
    /// A method argument slot.
    Argument(u16),
    /// A local variable slot.
    Local(u16),
    /// An operand stack position.
    Stack(u32),
}

impl fmt::Display for VarBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarBase::Argument(i) => write!(f, "arg{i}"),
            VarBase::Local(i) => write!(f, "loc{i}"),
            VarBase::Stack(i) => write!(f, "stk{i}"),
        }
    }
}

/// The runtime value category of a variable.
///
/// Width matters for sequentialization: a spill slot must be wide enough for
/// every value routed through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ValueType {
    /// 32-bit integer.
    #[strum(serialize = "int")]
    Int,
    /// 64-bit integer.
    #[strum(serialize = "long")]
    Long,
    /// 32-bit floating point.
    #[strum(serialize = "float")]
    Float,
    /// 64-bit floating point.
    #[strum(serialize = "double")]
    Double,
    /// An object reference.
    #[strum(serialize = "ref")]
    Reference,
}

impl ValueType {
    /// Returns the number of storage slots a value of this type occupies.
    #[must_use]
    pub const fn slots(self) -> u32 {
        match self {
            ValueType::Long | ValueType::Double => 2,
            ValueType::Int | ValueType::Float | ValueType::Reference => 1,
        }
    }
}

/// One interned SSA variable: a versioned instance of a base slot with a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable {
    /// The handle this variable is interned under.
    pub id: VarId,
    /// The storage slot being versioned.
    pub base: VarBase,
    /// The SSA version number, unique per base within a function.
    pub version: u32,
    /// The runtime type of the value.
    pub ty: ValueType,
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.base, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_id_display() {
        assert_eq!(format!("{}", VarId::new(5)), "v5");
        assert_eq!(format!("{:?}", VarId::new(5)), "VarId(5)");
    }

    #[test]
    fn test_var_base_display() {
        assert_eq!(format!("{}", VarBase::Argument(0)), "arg0");
        assert_eq!(format!("{}", VarBase::Local(3)), "loc3");
        assert_eq!(format!("{}", VarBase::Stack(7)), "stk7");
    }

    #[test]
    fn test_value_type_slots() {
        assert_eq!(ValueType::Int.slots(), 1);
        assert_eq!(ValueType::Reference.slots(), 1);
        assert_eq!(ValueType::Long.slots(), 2);
        assert_eq!(ValueType::Double.slots(), 2);
    }

    #[test]
    fn test_value_type_display() {
        assert_eq!(ValueType::Int.to_string(), "int");
        assert_eq!(ValueType::Reference.to_string(), "ref");
    }

    #[test]
    fn test_variable_display() {
        let var = Variable {
            id: VarId::new(0),
            base: VarBase::Local(2),
            version: 4,
            ty: ValueType::Int,
        };
        assert_eq!(var.to_string(), "loc2_4");
    }
}
