use serde::{Deserialize, Serialize};

use crate::ast::NodeId;
use crate::describe::CONSTRUCTOR_NAME;
use crate::text::Position;
use crate::types::BinaryName;

/// A source call expression paired with the call instruction compiled for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub node: NodeId,
    /// Start of the whole call or `new` expression.
    pub start_position: Position,
    pub end_position: Position,
    /// Start of the callee name token.
    pub method_start_position: Position,
    pub method_end_position: Position,
    pub method_name: String,
    pub declaring_type: BinaryName,
    pub bytecode_offset: usize,
}

impl Operation {
    pub fn is_constructor(&self) -> bool {
        self.method_name == CONSTRUCTOR_NAME
    }
}

/// The operations of one successful correlation, in source order with
/// strictly increasing bytecode offsets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Correlation {
    operations: Vec<Operation>,
}

impl Correlation {
    pub(crate) fn new(operations: Vec<Operation>) -> Self {
        debug_assert!(operations
            .windows(2)
            .all(|pair| pair[0].bytecode_offset < pair[1].bytecode_offset));
        Self { operations }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// The operation produced for `node`, if it produced one.
    pub fn operation_for(&self, node: NodeId) -> Option<&Operation> {
        self.operations.iter().find(|op| op.node == node)
    }

    /// The operation whose call instruction sits at `bytecode_offset`.
    pub fn operation_at(&self, bytecode_offset: usize) -> Option<&Operation> {
        self.operations
            .binary_search_by_key(&bytecode_offset, |op| op.bytecode_offset)
            .ok()
            .map(|idx| &self.operations[idx])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }
}

impl<'a> IntoIterator for &'a Correlation {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}
