use nova_bytecode::opcode::*;
use nova_bytecode::{
    instruction_length, is_method_call, switch_padding, IndexRanges, Instructions, RangeCursor,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 256;

/// A straight-line instruction with arbitrary operand bytes.
#[derive(Clone, Debug)]
enum Insn {
    Simple(u8),
    Operands(u8, Vec<u8>),
    Call(u8, Vec<u8>),
}

impl Insn {
    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Insn::Simple(op) => out.push(*op),
            Insn::Operands(op, operands) | Insn::Call(op, operands) => {
                out.push(*op);
                out.extend_from_slice(operands);
            }
        }
    }
}

fn arb_insn() -> impl Strategy<Value = Insn> {
    prop_oneof![
        prop::sample::select(vec![NOP, ICONST_0, ALOAD_0, POP, DUP, IADD, ARRAYLENGTH, RETURN])
            .prop_map(Insn::Simple),
        (prop::sample::select(vec![BIPUSH, ILOAD, ASTORE, NEWARRAY]), any::<u8>())
            .prop_map(|(op, a)| Insn::Operands(op, vec![a])),
        (
            prop::sample::select(vec![SIPUSH, LDC_W, IINC, GETFIELD, NEW, CHECKCAST, IFNULL]),
            any::<[u8; 2]>()
        )
            .prop_map(|(op, a)| Insn::Operands(op, a.to_vec())),
        (prop::sample::select(vec![GOTO_W, JSR_W]), any::<[u8; 4]>())
            .prop_map(|(op, a)| Insn::Operands(op, a.to_vec())),
        (any::<[u8; 3]>()).prop_map(|a| Insn::Operands(MULTIANEWARRAY, a.to_vec())),
        (
            prop::sample::select(vec![INVOKEVIRTUAL, INVOKESPECIAL, INVOKESTATIC]),
            any::<[u8; 2]>()
        )
            .prop_map(|(op, a)| Insn::Call(op, a.to_vec())),
        any::<[u8; 4]>().prop_map(|a| Insn::Call(INVOKEINTERFACE, a.to_vec())),
    ]
}

fn assemble(insns: &[Insn]) -> (Vec<u8>, Vec<usize>) {
    let mut code = Vec::new();
    let mut calls = Vec::new();
    for insn in insns {
        if matches!(insn, Insn::Call(..)) {
            calls.push(code.len());
        }
        insn.encode(&mut code);
    }
    (code, calls)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: PROPTEST_CASES, .. ProptestConfig::default() })]

    #[test]
    fn length_is_total(code in prop::collection::vec(any::<u8>(), 1..64), offset in 0usize..64) {
        let offset = offset % code.len();
        for opcode in 0..=255u8 {
            prop_assert!(instruction_length(opcode, &code, offset) >= 1);
        }
    }

    #[test]
    fn switch_operands_are_aligned(offset in 0usize..4096) {
        let operands = offset + switch_padding(offset);
        prop_assert_eq!(operands % 4, 0);
        prop_assert!(operands > offset);
        prop_assert!(operands - offset <= 4);
    }

    #[test]
    fn decoding_lands_on_instruction_boundaries(insns in prop::collection::vec(arb_insn(), 0..48)) {
        let (code, _) = assemble(&insns);
        let offsets: Vec<usize> = Instructions::all(&code).map(|insn| insn.offset).collect();

        let mut expected = Vec::new();
        let mut pos = 0;
        for insn in &insns {
            expected.push(pos);
            let mut buf = Vec::new();
            insn.encode(&mut buf);
            pos += buf.len();
        }
        prop_assert_eq!(offsets, expected);
    }

    #[test]
    fn cursor_finds_exactly_the_planted_calls(insns in prop::collection::vec(arb_insn(), 0..48)) {
        let (code, planted) = assemble(&insns);
        let ranges = IndexRanges::new([0..code.len()], code.len()).unwrap();
        let mut cursor = RangeCursor::new(&code, &ranges);

        let mut found = Vec::new();
        while let Some(offset) = cursor.advance_to_next_call() {
            prop_assert!(is_method_call(code[offset]));
            found.push(offset);
            cursor.consume(offset);
        }
        prop_assert_eq!(found, planted);
    }
}

#[test]
fn real_tableswitch_sequence() {
    // iload_1; tableswitch { 0: ..., 1: ... }; invokestatic #2; return
    let mut code = vec![ILOAD_1, TABLESWITCH, 0, 0];
    code.extend_from_slice(&20i32.to_be_bytes()); // default
    code.extend_from_slice(&0i32.to_be_bytes()); // low
    code.extend_from_slice(&1i32.to_be_bytes()); // high
    code.extend_from_slice(&INVOKESTATIC_LOOKALIKE);
    code.extend_from_slice(&INVOKESTATIC_LOOKALIKE);
    let call = code.len();
    code.extend_from_slice(&[INVOKESTATIC, 0, 2, RETURN]);

    assert_eq!(instruction_length(TABLESWITCH, &code, 1), 3 + 12 + 8);
    let ranges = IndexRanges::new([0..code.len()], code.len()).unwrap();
    let mut cursor = RangeCursor::new(&code, &ranges);
    assert_eq!(cursor.advance_to_next_call(), Some(call));
}

/// A jump offset whose bytes are all invoke opcodes.
const INVOKESTATIC_LOOKALIKE: [u8; 4] = [INVOKESTATIC, INVOKEVIRTUAL, INVOKESPECIAL, INVOKEINTERFACE];
