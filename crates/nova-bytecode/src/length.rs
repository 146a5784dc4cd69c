use std::fmt;

use crate::opcode::{self, *};
use crate::range::IndexRange;

/// Whether `opcode` invokes a method.
///
/// Covers `invokevirtual`, `invokespecial`, `invokestatic` and
/// `invokeinterface`; the dispatch kind is not distinguished. `invokedynamic`
/// is not a call site for correlation purposes.
#[inline]
pub fn is_method_call(opcode: u8) -> bool {
    (INVOKEVIRTUAL..=INVOKEINTERFACE).contains(&opcode)
}

/// Byte length of the instruction whose opcode byte sits at `code[offset]`.
///
/// Total over all opcode values: unassigned opcodes (and `invokedynamic`) decode
/// as one byte, and the variable-length forms never read past the end of
/// `code`. The result is always at least 1.
pub fn instruction_length(opcode: u8, code: &[u8], offset: usize) -> usize {
    match opcode {
        NOP..=DCONST_1 => 1,
        BIPUSH => 2,
        SIPUSH => 3,
        LDC => 2,
        LDC_W | LDC2_W => 3,
        ILOAD..=ALOAD => 2,
        ILOAD_0..=SALOAD => 1,
        ISTORE..=ASTORE => 2,
        ISTORE_0..=SASTORE => 1,
        POP..=DUP2_X2 => 1,
        SWAP..=LXOR => 1,
        IINC => 3,
        I2L..=I2S => 1,
        LCMP..=DCMPG => 1,
        IFEQ..=JSR => 3,
        RET => 2,
        TABLESWITCH => tableswitch_length(code, offset),
        LOOKUPSWITCH => lookupswitch_length(code, offset),
        IRETURN..=RETURN => 1,
        GETSTATIC..=INVOKESTATIC => 3,
        INVOKEINTERFACE => 5,
        NEW => 3,
        NEWARRAY => 2,
        ANEWARRAY => 3,
        ARRAYLENGTH | ATHROW => 1,
        CHECKCAST | INSTANCEOF => 3,
        MONITORENTER | MONITOREXIT => 1,
        WIDE => wide_length(code, offset),
        MULTIANEWARRAY => 4,
        IFNULL | IFNONNULL => 3,
        GOTO_W | JSR_W => 5,
        _ => 1,
    }
}

/// Padding between a switch opcode at `offset` and its 4-byte aligned operands.
///
/// Counted from the opcode byte itself: the operands start at the next multiple
/// of 4 strictly after `offset`, so an opcode already on a 4-byte boundary is
/// padded by 4.
#[inline]
pub fn switch_padding(offset: usize) -> usize {
    4 - offset % 4
}

/// Length of a `tableswitch` at `offset`: padding, `default`, `low`, `high`
/// and `high - low + 1` jump offsets.
pub fn tableswitch_length(code: &[u8], offset: usize) -> usize {
    let pos = offset.saturating_add(switch_padding(offset));
    let (Some(low), Some(high)) = (
        read_i32(code, pos.saturating_add(4)),
        read_i32(code, pos.saturating_add(8)),
    ) else {
        return remaining(code, offset);
    };

    let count = usize::try_from(i64::from(high) - i64::from(low) + 1).unwrap_or(0);
    let end = pos
        .saturating_add(12)
        .saturating_add(count.saturating_mul(4));
    end - offset
}

/// Length of a `lookupswitch` at `offset`: padding, `default`, `npairs` and
/// `npairs` match/offset pairs.
pub fn lookupswitch_length(code: &[u8], offset: usize) -> usize {
    let pos = offset.saturating_add(switch_padding(offset));
    let Some(npairs) = read_i32(code, pos.saturating_add(4)) else {
        return remaining(code, offset);
    };

    let npairs = usize::try_from(npairs).unwrap_or(0);
    let end = pos
        .saturating_add(8)
        .saturating_add(npairs.saturating_mul(8));
    end - offset
}

/// Length of a `wide`-prefixed instruction at `offset`: 6 when it widens
/// `iinc`, 4 for the widened load/store/`ret` forms.
pub fn wide_length(code: &[u8], offset: usize) -> usize {
    match code.get(offset.saturating_add(1)) {
        Some(&IINC) => 6,
        _ => 4,
    }
}

/// Bytes from `offset` to the end of `code`, at least 1.
fn remaining(code: &[u8], offset: usize) -> usize {
    code.len().saturating_sub(offset).max(1)
}

fn read_i32(code: &[u8], pos: usize) -> Option<i32> {
    let end = pos.checked_add(4)?;
    let bytes = code.get(pos..end)?;
    Some(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// One decoded instruction.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub offset: usize,
    pub opcode: u8,
    pub length: usize,
}

impl Instruction {
    #[inline]
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    #[inline]
    pub fn is_method_call(&self) -> bool {
        is_method_call(self.opcode)
    }

    #[inline]
    pub fn mnemonic(&self) -> &'static str {
        opcode::mnemonic(self.opcode)
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}+{}", self.mnemonic(), self.offset, self.length)
    }
}

/// Decodes the instruction starting at `offset`, or `None` past the end of `code`.
pub fn decode(code: &[u8], offset: usize) -> Option<Instruction> {
    let opcode = *code.get(offset)?;
    Some(Instruction {
        offset,
        opcode,
        length: instruction_length(opcode, code, offset),
    })
}

/// Iterates the instructions that start inside one index range.
///
/// Decoding begins at `range.from`; an instruction whose operands run past
/// `range.to` is still yielded, and iteration stops at the first offset at or
/// beyond `range.to`.
#[derive(Clone, Debug)]
pub struct Instructions<'a> {
    code: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Instructions<'a> {
    pub fn new(code: &'a [u8], range: IndexRange) -> Self {
        Self {
            code,
            pos: range.from,
            end: range.to,
        }
    }

    /// Instructions of the whole `code` array.
    pub fn all(code: &'a [u8]) -> Self {
        Self::new(code, IndexRange::new(0, code.len()))
    }
}

impl Iterator for Instructions<'_> {
    type Item = Instruction;

    fn next(&mut self) -> Option<Instruction> {
        if self.pos >= self.end {
            return None;
        }
        let insn = decode(self.code, self.pos)?;
        self.pos = insn.end();
        Some(insn)
    }
}

impl std::iter::FusedIterator for Instructions<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn len(opcode: u8) -> usize {
        instruction_length(opcode, &[opcode, 0, 0, 0, 0, 0], 0)
    }

    #[test]
    fn fixed_size_classes() {
        let cases: &[(std::ops::RangeInclusive<u8>, usize)] = &[
            (0..=15, 1),
            (16..=16, 2),
            (17..=17, 3),
            (18..=18, 2),
            (19..=20, 3),
            (21..=25, 2),
            (26..=53, 1),
            (54..=58, 2),
            (59..=86, 1),
            (87..=94, 1),
            (95..=131, 1),
            (132..=132, 3),
            (133..=147, 1),
            (148..=152, 1),
            (153..=168, 3),
            (169..=169, 2),
            (172..=177, 1),
            (178..=184, 3),
            (185..=185, 5),
            (186..=186, 1),
            (187..=187, 3),
            (188..=188, 2),
            (189..=189, 3),
            (190..=191, 1),
            (192..=193, 3),
            (194..=195, 1),
            (197..=197, 4),
            (198..=199, 3),
            (200..=201, 5),
            (202..=255, 1),
        ];
        for (opcodes, expected) in cases {
            for opcode in opcodes.clone() {
                assert_eq!(len(opcode), *expected, "opcode {opcode} ({})", mnemonic(opcode));
            }
        }
    }

    #[test]
    fn only_invoke_opcodes_are_calls() {
        let calls: Vec<u8> = (0..=255u8).filter(|&op| is_method_call(op)).collect();
        assert_eq!(
            calls,
            vec![INVOKEVIRTUAL, INVOKESPECIAL, INVOKESTATIC, INVOKEINTERFACE]
        );
        assert!(!is_method_call(INVOKEDYNAMIC));
    }

    #[test]
    fn tableswitch_at_offset_8() {
        // opcode at 8, pad to 12, default 12..16, low 16..20, high 20..24,
        // three jump offsets 24..36 (past the buffer end, which is not read).
        let mut code = vec![0u8; 32];
        code[8] = TABLESWITCH;
        code[16..20].copy_from_slice(&0i32.to_be_bytes());
        code[20..24].copy_from_slice(&2i32.to_be_bytes());

        let expected = switch_padding(8) + 4 + 4 + 4 + 3 * 4;
        assert_eq!(expected, 28);
        assert_eq!(instruction_length(TABLESWITCH, &code, 8), expected);
    }

    #[test]
    fn tableswitch_with_negative_low_bound() {
        let mut code = vec![0u8; 40];
        code[1] = TABLESWITCH;
        // pad 3 -> operands at 4.
        code[8..12].copy_from_slice(&(-1i32).to_be_bytes());
        code[12..16].copy_from_slice(&1i32.to_be_bytes());
        assert_eq!(tableswitch_length(&code, 1), 3 + 12 + 3 * 4);
    }

    #[test]
    fn tableswitch_with_inverted_bounds_has_no_offsets() {
        let mut code = vec![0u8; 16];
        code[3] = TABLESWITCH;
        code[8..12].copy_from_slice(&5i32.to_be_bytes());
        code[12..16].copy_from_slice(&1i32.to_be_bytes());
        assert_eq!(tableswitch_length(&code, 3), 1 + 12);
    }

    #[test]
    fn lookupswitch_pairs() {
        let mut code = vec![0u8; 48];
        code[2] = LOOKUPSWITCH;
        // pad 2 -> default 4..8, npairs 8..12, pairs from 12.
        code[8..12].copy_from_slice(&3i32.to_be_bytes());
        assert_eq!(lookupswitch_length(&code, 2), 2 + 8 + 3 * 8);
    }

    #[test]
    fn aligned_switch_pads_by_four() {
        assert_eq!(switch_padding(0), 4);
        assert_eq!(switch_padding(4), 4);
        assert_eq!(switch_padding(5), 3);
        assert_eq!(switch_padding(6), 2);
        assert_eq!(switch_padding(7), 1);

        let mut code = vec![0u8; 16];
        code[0] = LOOKUPSWITCH;
        assert_eq!(lookupswitch_length(&code, 0), 4 + 8);
        for offset in 0..64 {
            assert_eq!((offset + switch_padding(offset)) % 4, 0);
        }
    }

    #[test]
    fn truncated_switch_header_uses_remaining_bytes() {
        let code = [NOP, TABLESWITCH, 0, 0, 0];
        assert_eq!(tableswitch_length(&code, 1), 4);

        let code = [LOOKUPSWITCH];
        assert_eq!(lookupswitch_length(&code, 0), 1);
    }

    #[test]
    fn wide_forms() {
        assert_eq!(instruction_length(WIDE, &[WIDE, IINC, 0, 1, 0, 1], 0), 6);
        assert_eq!(instruction_length(WIDE, &[WIDE, ILOAD, 1, 0], 0), 4);
        assert_eq!(instruction_length(WIDE, &[WIDE], 0), 4);
    }

    #[test]
    fn iterates_instructions_in_range() {
        let code = [
            ALOAD_0,
            BIPUSH,
            7,
            INVOKEVIRTUAL,
            0,
            INVOKESTATIC,
            POP,
            RETURN,
        ];
        let insns: Vec<(usize, &str)> = Instructions::all(&code)
            .map(|insn| (insn.offset, insn.mnemonic()))
            .collect();
        assert_eq!(
            insns,
            vec![
                (0, "aload_0"),
                (1, "bipush"),
                (3, "invokevirtual"),
                (6, "pop"),
                (7, "return"),
            ]
        );

        let sub: Vec<usize> = Instructions::new(&code, IndexRange::new(3, 7))
            .map(|insn| insn.offset)
            .collect();
        assert_eq!(sub, vec![3, 6]);
    }

    #[test]
    fn instruction_debug_is_compact() {
        let insn = decode(&[NOP, INVOKEINTERFACE, 0, 1, 1, 0], 1).unwrap();
        assert_eq!(format!("{insn:?}"), "invokeinterface@1+5");
        assert_eq!(insn.end(), 6);
        assert!(decode(&[NOP], 1).is_none());
    }
}
