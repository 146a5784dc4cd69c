//! The linearized expression nodes handed to the correlator.
//!
//! Nodes arrive already restricted to one method body and ordered the way the
//! compiler evaluates them; the scanner that produces them lives elsewhere.

use std::fmt;

use serde::{Deserialize, Serialize};
use text_size::TextRange;

/// Caller-assigned identity of a syntax node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A sub-expression the type resolver can be asked about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExprRef {
    pub id: NodeId,
    pub span: TextRange,
}

impl ExprRef {
    pub fn new(id: NodeId, span: TextRange) -> Self {
        Self { id, span }
    }
}

/// How a method invocation names its callee.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Callee {
    /// `foo(...)`: resolved through the enclosing class at the identifier.
    Identifier {
        id: NodeId,
        name: String,
        span: TextRange,
    },
    /// `receiver.foo(...)`. `span` covers the whole `receiver.foo` select.
    MemberSelect {
        name: String,
        span: TextRange,
        receiver: ExprRef,
    },
}

impl Callee {
    pub fn name(&self) -> &str {
        match self {
            Callee::Identifier { name, .. } | Callee::MemberSelect { name, .. } => name,
        }
    }

    pub fn span(&self) -> TextRange {
        match self {
            Callee::Identifier { span, .. } | Callee::MemberSelect { span, .. } => *span,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodInvocation {
    pub id: NodeId,
    pub span: TextRange,
    pub callee: Callee,
    /// Compiler-generated call with no source text of its own (implicit
    /// `super()`, enum helpers, ...).
    pub synthetic: bool,
}

impl MethodInvocation {
    pub fn new(id: NodeId, span: TextRange, callee: Callee) -> Self {
        Self {
            id,
            span,
            callee,
            synthetic: false,
        }
    }

    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewClassInstance {
    pub id: NodeId,
    pub span: TextRange,
    /// The constructed type as written after `new`.
    pub class: ExprRef,
    pub synthetic: bool,
}

impl NewClassInstance {
    pub fn new(id: NodeId, span: TextRange, class: ExprRef) -> Self {
        Self {
            id,
            span,
            class,
            synthetic: false,
        }
    }

    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    MethodInvocation,
    NewClassInstance,
    Other,
}

/// One entry of the linearized node sequence.
///
/// `Other` nodes do not take part in matching but keep their slot so the
/// sequence mirrors the scanner's output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprNode {
    MethodInvocation(MethodInvocation),
    NewClassInstance(NewClassInstance),
    Other { id: NodeId, span: TextRange },
}

impl ExprNode {
    pub fn id(&self) -> NodeId {
        match self {
            ExprNode::MethodInvocation(call) => call.id,
            ExprNode::NewClassInstance(new) => new.id,
            ExprNode::Other { id, .. } => *id,
        }
    }

    pub fn span(&self) -> TextRange {
        match self {
            ExprNode::MethodInvocation(call) => call.span,
            ExprNode::NewClassInstance(new) => new.span,
            ExprNode::Other { span, .. } => *span,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            ExprNode::MethodInvocation(_) => NodeKind::MethodInvocation,
            ExprNode::NewClassInstance(_) => NodeKind::NewClassInstance,
            ExprNode::Other { .. } => NodeKind::Other,
        }
    }

    /// The node as a call site, or `None` for nodes that emit no call.
    pub fn as_call(&self) -> Option<CallNode<'_>> {
        match self {
            ExprNode::MethodInvocation(call) => Some(CallNode::Invocation(call)),
            ExprNode::NewClassInstance(new) => Some(CallNode::Construction(new)),
            ExprNode::Other { .. } => None,
        }
    }
}

impl From<MethodInvocation> for ExprNode {
    fn from(call: MethodInvocation) -> Self {
        ExprNode::MethodInvocation(call)
    }
}

impl From<NewClassInstance> for ExprNode {
    fn from(new: NewClassInstance) -> Self {
        ExprNode::NewClassInstance(new)
    }
}

/// Borrowed view of a node that compiles to a call instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallNode<'a> {
    Invocation(&'a MethodInvocation),
    Construction(&'a NewClassInstance),
}

impl CallNode<'_> {
    pub fn id(&self) -> NodeId {
        match self {
            CallNode::Invocation(call) => call.id,
            CallNode::Construction(new) => new.id,
        }
    }

    pub fn span(&self) -> TextRange {
        match self {
            CallNode::Invocation(call) => call.span,
            CallNode::Construction(new) => new.span,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        match self {
            CallNode::Invocation(call) => call.synthetic,
            CallNode::Construction(new) => new.synthetic,
        }
    }
}
