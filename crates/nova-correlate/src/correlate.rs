use nova_bytecode::{IndexRanges, RangeCursor};
use text_size::TextRange;
use tracing::{debug, trace};

use crate::ast::{CallNode, ExprNode};
use crate::config::CorrelateConfig;
use crate::describe::{describe_call, CallSite};
use crate::error::{CorrelationError, Result};
use crate::operation::{Correlation, Operation};
use crate::text::{LineIndex, Position};
use crate::types::TypeResolver;

/// Everything known about one method's code for a correlation request.
#[derive(Clone, Copy, Debug)]
pub struct CorrelationInput<'a> {
    /// Expression nodes of the requested lines, in evaluation order.
    pub nodes: &'a [ExprNode],
    /// Bytecode ranges attributed to the same lines.
    pub ranges: &'a IndexRanges,
    /// The method's `Code` array.
    pub code: &'a [u8],
    /// The class constant pool. Carried along for callers; never decoded.
    pub constant_pool: &'a [u8],
}

impl<'a> CorrelationInput<'a> {
    pub fn new(nodes: &'a [ExprNode], ranges: &'a IndexRanges, code: &'a [u8]) -> Self {
        Self {
            nodes,
            ranges,
            code,
            constant_pool: &[],
        }
    }

    pub fn with_constant_pool(mut self, constant_pool: &'a [u8]) -> Self {
        self.constant_pool = constant_pool;
        self
    }
}

/// Pairs call nodes with call instructions.
///
/// Holds only borrowed collaborators; every [`Correlator::correlate`] call is
/// independent.
#[derive(Debug)]
pub struct Correlator<'a, R: ?Sized> {
    resolver: &'a R,
    line_index: &'a LineIndex,
    config: CorrelateConfig,
}

impl<'a, R: TypeResolver + ?Sized> Correlator<'a, R> {
    pub fn new(resolver: &'a R, line_index: &'a LineIndex) -> Self {
        Self {
            resolver,
            line_index,
            config: CorrelateConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CorrelateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CorrelateConfig {
        &self.config
    }

    /// Matches every call node of `input` with the next call instruction in
    /// its ranges.
    ///
    /// Fails as a whole when the ranges run out of calls, when a node cannot
    /// be described, or when calls are left over once every node is matched.
    pub fn correlate(&self, input: &CorrelationInput<'_>) -> Result<Correlation> {
        input.ranges.check_within(input.code.len())?;

        let mut cursor = RangeCursor::new(input.code, input.ranges);
        let mut operations = Vec::new();

        for call in input.nodes.iter().filter_map(ExprNode::as_call) {
            let node = call.id();
            let Some(offset) = cursor.advance_to_next_call() else {
                debug!(%node, "bytecode ranges exhausted before every call node was matched");
                return Err(CorrelationError::ScanExhausted { node });
            };

            if call.is_synthetic() && self.config.skip_synthetic {
                trace!(%node, offset, "synthetic call claims instruction");
            } else {
                let site = describe_call(call, self.resolver).map_err(|reason| {
                    debug!(%node, %reason, "call node cannot be described");
                    CorrelationError::Unresolved { node, reason }
                })?;
                trace!(
                    %node,
                    offset,
                    method = %site.method_name,
                    class = %site.declaring_type,
                    "matched call instruction"
                );
                operations.push(self.operation(call, site, offset));
            }

            cursor.consume(offset);
        }

        if let Some(offset) = cursor.find_remaining_call() {
            debug!(offset, "call instruction left over after every call node was matched");
            return Err(CorrelationError::LeftoverCall { offset });
        }

        Ok(Correlation::new(operations))
    }

    fn operation(&self, call: CallNode<'_>, site: CallSite, bytecode_offset: usize) -> Operation {
        let (start_position, end_position) = self.positions(call.span());
        let (method_start_position, method_end_position) = self.positions(site.method_span);
        Operation {
            node: call.id(),
            start_position,
            end_position,
            method_start_position,
            method_end_position,
            method_name: site.method_name,
            declaring_type: site.declaring_type,
            bytecode_offset,
        }
    }

    fn positions(&self, range: TextRange) -> (Position, Position) {
        let base = self.config.position_base();
        (
            self.line_index.position(range.start(), base),
            self.line_index.position(range.end(), base),
        )
    }
}

/// Correlates `input` with the default [`CorrelateConfig`].
pub fn correlate<R>(
    input: &CorrelationInput<'_>,
    resolver: &R,
    line_index: &LineIndex,
) -> Result<Correlation>
where
    R: TypeResolver + ?Sized,
{
    Correlator::new(resolver, line_index).correlate(input)
}
