use nova_bytecode::RangeError;
use thiserror::Error;

use crate::ast::NodeId;

pub type Result<T, E = CorrelationError> = std::result::Result<T, E>;

/// Why no correlation is available for a request.
///
/// None of these are bugs: they tell the caller to fall back to whole-line
/// granularity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrelationError {
    #[error("bytecode ranges have no call instruction left for node {node}")]
    ScanExhausted { node: NodeId },
    #[error("cannot describe call node {node}: {reason}")]
    Unresolved {
        node: NodeId,
        #[source]
        reason: UnresolvedReason,
    },
    #[error("call instruction at bytecode offset {offset} has no source node")]
    LeftoverCall { offset: usize },
    #[error("invalid bytecode ranges: {0}")]
    InvalidRanges(#[from] RangeError),
}

impl CorrelationError {
    /// `true` when source and bytecode disagree on the calls they contain, as
    /// opposed to the resolver lacking information.
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            CorrelationError::ScanExhausted { .. } | CorrelationError::LeftoverCall { .. }
        )
    }
}

/// Why a call node's callee could not be pinned to a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnresolvedReason {
    #[error("expression {expr} has an erroneous type")]
    ErrorType { expr: NodeId },
    #[error("expression {expr} does not denote a class type")]
    NotADeclaredType { expr: NodeId },
    #[error("no enclosing class at {at}")]
    NoEnclosingClass { at: NodeId },
    #[error("type variable `{name}` has {bounds} bounds; exactly one is supported")]
    UnsupportedBounds { name: String, bounds: usize },
    #[error("type variable `{name}` is bounded by a type that is not a class")]
    UnsupportedBound { name: String },
}
