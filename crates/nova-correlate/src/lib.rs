//! Expression-level correlation between Java source and method bytecode.
//!
//! A debugger that stops on a line with several calls (`a.b(c(), new D())`)
//! can only highlight the line. Given the call expressions of that line in
//! evaluation order, the bytecode ranges the line maps to and a type resolver,
//! [`correlate`] pairs each call expression with the call instruction the
//! compiler emitted for it and returns one [`Operation`] per expression.
//!
//! Correlation is all-or-nothing: when the source and the bytecode disagree on
//! the number of calls, or a callee's declaring type cannot be resolved, the
//! result is a [`CorrelationError`] and callers fall back to line granularity.

#![forbid(unsafe_code)]

mod ast;
mod config;
mod correlate;
mod describe;
mod error;
mod operation;
mod text;
mod types;

pub use crate::ast::{
    CallNode, Callee, ExprNode, ExprRef, MethodInvocation, NewClassInstance, NodeId, NodeKind,
};
pub use crate::config::{ConfigError, CorrelateConfig};
pub use crate::correlate::{correlate, CorrelationInput, Correlator};
pub use crate::describe::{describe_call, CallSite, CONSTRUCTOR_NAME};
pub use crate::error::{CorrelationError, Result, UnresolvedReason};
pub use crate::operation::{Correlation, Operation};
pub use crate::text::{LineIndex, Position, TextRange, TextSize};
pub use crate::types::{
    BinaryName, DeclaredType, MapResolver, ResolvedType, TypeResolver, TypeVariable,
};

pub use nova_bytecode::{IndexRange, IndexRanges, RangeError};
