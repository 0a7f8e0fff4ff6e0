//! Control-flow edge kinds.

use strum::Display;

/// The kind of a control-flow edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FlowKind {
    /// Sequential fallthrough into the next block.
    #[strum(serialize = "fallthrough")]
    Fallthrough,
    /// An unconditional jump.
    #[strum(serialize = "jump")]
    Unconditional,
    /// The taken edge of a conditional branch.
    #[strum(serialize = "true")]
    ConditionalTrue,
    /// The not-taken edge of a conditional branch.
    #[strum(serialize = "false")]
    ConditionalFalse,
    /// An exceptional edge into a handler.
    #[strum(serialize = "exception")]
    Exception,
}

impl FlowKind {
    /// Returns `true` for the two edges of a conditional branch.
    #[must_use]
    pub const fn is_conditional(self) -> bool {
        matches!(self, FlowKind::ConditionalTrue | FlowKind::ConditionalFalse)
    }

    /// Returns `true` for exceptional edges.
    #[must_use]
    pub const fn is_exceptional(self) -> bool {
        matches!(self, FlowKind::Exception)
    }
}

/// One outgoing control-flow edge of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowEdge {
    /// The id of the successor block.
    pub target: usize,
    /// The kind of transfer.
    pub kind: FlowKind,
}

impl FlowEdge {
    /// Creates a fallthrough edge to `target`.
    #[must_use]
    pub const fn fallthrough(target: usize) -> Self {
        Self {
            target,
            kind: FlowKind::Fallthrough,
        }
    }

    /// Creates an unconditional jump edge to `target`.
    #[must_use]
    pub const fn unconditional(target: usize) -> Self {
        Self {
            target,
            kind: FlowKind::Unconditional,
        }
    }

    /// Creates the taken edge of a conditional branch.
    #[must_use]
    pub const fn conditional_true(target: usize) -> Self {
        Self {
            target,
            kind: FlowKind::ConditionalTrue,
        }
    }

    /// Creates the not-taken edge of a conditional branch.
    #[must_use]
    pub const fn conditional_false(target: usize) -> Self {
        Self {
            target,
            kind: FlowKind::ConditionalFalse,
        }
    }

    /// Creates an exceptional edge into a handler block.
    #[must_use]
    pub const fn exception(target: usize) -> Self {
        Self {
            target,
            kind: FlowKind::Exception,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(FlowKind::ConditionalTrue.is_conditional());
        assert!(FlowKind::ConditionalFalse.is_conditional());
        assert!(!FlowKind::Fallthrough.is_conditional());
        assert!(FlowKind::Exception.is_exceptional());
        assert!(!FlowKind::Unconditional.is_exceptional());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(FlowKind::Fallthrough.to_string(), "fallthrough");
        assert_eq!(FlowKind::ConditionalTrue.to_string(), "true");
        assert_eq!(FlowKind::Exception.to_string(), "exception");
    }

    #[test]
    fn test_edge_factories() {
        assert_eq!(FlowEdge::fallthrough(3).kind, FlowKind::Fallthrough);
        assert_eq!(FlowEdge::conditional_true(1).target, 1);
        assert_eq!(FlowEdge::exception(2).kind, FlowKind::Exception);
    }
}
