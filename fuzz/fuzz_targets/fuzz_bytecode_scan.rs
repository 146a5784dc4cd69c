#![no_main]

use libfuzzer_sys::fuzz_target;
use nova_bytecode::{IndexRanges, Instructions, RangeCursor};

mod utils;

fuzz_target!(|data: &[u8]| {
    let code = utils::truncate(data);

    let mut last_end = 0;
    for insn in Instructions::all(code) {
        assert!(insn.length >= 1, "zero-length {insn:?}");
        assert_eq!(insn.offset, last_end, "instructions must tile the code array");
        last_end = insn.end();
    }

    // Split the buffer into two ranges around its midpoint so range hand-off is
    // exercised too.
    let mid = code.len() / 2;
    let Ok(ranges) = IndexRanges::new([0..mid, mid..code.len()], code.len()) else {
        unreachable!("midpoint split is always a valid range list");
    };
    let mut cursor = RangeCursor::new(code, &ranges);
    let mut previous = None;
    while let Some(offset) = cursor.advance_to_next_call() {
        assert!(nova_bytecode::is_method_call(code[offset]));
        if let Some(previous) = previous {
            assert!(offset > previous, "cursor rewound from {previous} to {offset}");
        }
        previous = Some(offset);
        cursor.consume(offset);
    }
});
