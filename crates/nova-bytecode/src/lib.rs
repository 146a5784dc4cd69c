//! JVM bytecode decoding for expression-level stepping.
//!
//! This crate knows just enough about the instruction set to walk a method's
//! `Code` array: how long every instruction is (including the padded
//! `tableswitch`/`lookupswitch` forms and `wide`-prefixed instructions) and
//! which opcodes are method calls. [`RangeCursor`] builds on that to scan the
//! byte ranges attributed to a source line for call instructions, which is
//! what `nova-correlate` pairs with source call expressions.
//!
//! Constant-pool data is never decoded here.

#![forbid(unsafe_code)]

mod cursor;
mod error;
mod length;
pub mod opcode;
mod range;

pub use crate::cursor::RangeCursor;
pub use crate::error::{RangeError, Result};
pub use crate::length::{
    decode, instruction_length, is_method_call, lookupswitch_length, switch_padding,
    tableswitch_length, wide_length, Instruction, Instructions,
};
pub use crate::range::{IndexRange, IndexRanges};
