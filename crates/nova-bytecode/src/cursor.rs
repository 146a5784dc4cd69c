use tracing::trace;

use crate::length::{instruction_length, is_method_call};
use crate::range::{IndexRange, IndexRanges};

/// Forward-only scan position over the [`IndexRanges`] of one code array.
///
/// The cursor walks instruction boundaries starting at each range's `from`,
/// moves on to the next range once the current one is exhausted and never
/// revisits an earlier range.
#[derive(Clone, Debug)]
pub struct RangeCursor<'a> {
    code: &'a [u8],
    ranges: &'a [IndexRange],
    index: usize,
    from: usize,
    to: usize,
}

impl<'a> RangeCursor<'a> {
    pub fn new(code: &'a [u8], ranges: &'a IndexRanges) -> Self {
        let ranges = ranges.as_slice();
        let (from, to) = ranges
            .first()
            .map(|range| (range.from, range.to))
            .unwrap_or((0, 0));
        Self {
            code,
            ranges,
            index: 0,
            from,
            to,
        }
    }

    /// Current scan offset.
    #[inline]
    pub fn position(&self) -> usize {
        self.from
    }

    /// Index of the range currently being scanned.
    #[inline]
    pub fn range_index(&self) -> usize {
        self.index
    }

    /// Finds the next call instruction at or after the current position.
    ///
    /// The cursor stays on the call; use [`RangeCursor::consume`] to step past
    /// it. Returns `None` once every remaining range has been scanned.
    pub fn advance_to_next_call(&mut self) -> Option<usize> {
        loop {
            while self.from < self.to {
                let Some(&opcode) = self.code.get(self.from) else {
                    break;
                };
                if is_method_call(opcode) {
                    return Some(self.from);
                }
                self.from = self
                    .from
                    .saturating_add(instruction_length(opcode, self.code, self.from));
            }
            if !self.next_range() {
                return None;
            }
        }
    }

    /// Steps past the instruction at `offset`.
    pub fn consume(&mut self, offset: usize) {
        let length = self
            .code
            .get(offset)
            .map(|&opcode| instruction_length(opcode, self.code, offset))
            .unwrap_or(1);
        self.from = offset.saturating_add(length);
    }

    /// Scans the rest of the ranges and returns the first call instruction
    /// left in them, if any.
    pub fn find_remaining_call(&mut self) -> Option<usize> {
        self.advance_to_next_call()
    }

    /// `true` when no call instruction remains in the unscanned ranges.
    pub fn assert_no_remaining_calls(&mut self) -> bool {
        self.find_remaining_call().is_none()
    }

    fn next_range(&mut self) -> bool {
        let Some(range) = self.ranges.get(self.index + 1) else {
            return false;
        };
        self.index += 1;
        self.from = range.from;
        self.to = range.to;
        trace!(
            range = self.index,
            from = range.from,
            to = range.to,
            "moving to next bytecode range"
        );
        true
    }
}
