//! Naming the method a call node invokes and the class that declares it.

use text_size::{TextRange, TextSize};

use crate::ast::{CallNode, Callee, NodeId};
use crate::error::UnresolvedReason;
use crate::types::{BinaryName, ResolvedType, TypeResolver, TypeVariable};

/// Method name recorded for constructor calls.
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// What the describer learned about one call node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallSite {
    pub method_name: String,
    pub declaring_type: BinaryName,
    /// Span of the callee name token (the class name for constructors).
    pub method_span: TextRange,
}

/// Resolves the callee name, declaring type and callee span of `call`.
pub fn describe_call<R>(call: CallNode<'_>, resolver: &R) -> Result<CallSite, UnresolvedReason>
where
    R: TypeResolver + ?Sized,
{
    match call {
        CallNode::Construction(new) => {
            let expr = new.class.id;
            let declaring_type = match resolver.type_of(expr) {
                ResolvedType::Declared(ty) => ty.binary_name,
                ResolvedType::TypeVariable(_) => {
                    return Err(UnresolvedReason::NotADeclaredType { expr })
                }
                ResolvedType::Error => return Err(UnresolvedReason::ErrorType { expr }),
            };
            Ok(CallSite {
                method_name: CONSTRUCTOR_NAME.to_string(),
                declaring_type,
                method_span: new.class.span,
            })
        }
        CallNode::Invocation(invocation) => match &invocation.callee {
            Callee::Identifier { id, name, span } => {
                let class = resolver
                    .enclosing_class(*id)
                    .ok_or(UnresolvedReason::NoEnclosingClass { at: *id })?;
                Ok(CallSite {
                    method_name: name.clone(),
                    declaring_type: class.binary_name,
                    method_span: *span,
                })
            }
            Callee::MemberSelect {
                name,
                span,
                receiver,
            } => {
                let declaring_type = receiver_class(resolver.type_of(receiver.id), receiver.id)?;
                Ok(CallSite {
                    method_name: name.clone(),
                    declaring_type,
                    method_span: member_name_span(*span, name),
                })
            }
        },
    }
}

/// The select tree only carries the span of `receiver.name` as a whole, so the
/// member name is taken to be its trailing `name.len()` bytes.
fn member_name_span(select: TextRange, name: &str) -> TextRange {
    let end = select.end();
    let start = end
        .checked_sub(TextSize::of(name))
        .map_or(select.start(), |start| start.max(select.start()));
    TextRange::new(start, end)
}

fn receiver_class(ty: ResolvedType, expr: NodeId) -> Result<BinaryName, UnresolvedReason> {
    match ty {
        ResolvedType::Declared(ty) => Ok(ty.binary_name),
        ResolvedType::TypeVariable(TypeVariable { name, mut bounds }) => {
            if bounds.len() != 1 {
                return Err(UnresolvedReason::UnsupportedBounds {
                    name,
                    bounds: bounds.len(),
                });
            }
            match bounds.pop() {
                Some(ResolvedType::Declared(bound)) => Ok(bound.binary_name),
                _ => Err(UnresolvedReason::UnsupportedBound { name }),
            }
        }
        ResolvedType::Error => Err(UnresolvedReason::ErrorType { expr }),
    }
}
