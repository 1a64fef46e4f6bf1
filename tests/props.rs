use lsdis::disassemble;
use proptest::prelude::*;

proptest! {
    /// The sweep is a partition of a prefix of the input: decoded literals
    /// chain gaplessly from offset 0, and only an end-of-stream truncation
    /// may leave bytes uncovered.
    #[test]
    fn literals_chain_from_zero(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let insns = disassemble(&bytes);

        let mut expected = 0usize;
        for insn in insns.values().filter(|insn| !insn.is_placeholder()) {
            prop_assert_eq!(insn.offset, expected);
            prop_assert!(!insn.literal.is_empty());
            prop_assert_eq!(
                &bytes[insn.offset..insn.offset + insn.literal.len()],
                insn.literal.as_slice()
            );
            expected = insn.offset + insn.literal.len();
        }
        prop_assert!(expected <= bytes.len());
    }

    /// Decoded (non-`db`) instructions start with their prefix and opcode
    /// bytes, in that order.
    #[test]
    fn literal_starts_with_prefix_and_opcode(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let insns = disassemble(&bytes);

        for insn in insns.values() {
            if insn.is_placeholder() || insn.mnemonic.starts_with("db ") {
                continue;
            }
            match &insn.prefix {
                Some(prefix) => {
                    prop_assert_eq!(insn.literal[0], prefix.literal);
                    prop_assert_eq!(insn.literal[1], insn.opcode);
                }
                None => prop_assert_eq!(insn.literal[0], insn.opcode),
            }
        }
    }

    /// Sweeping the same input twice yields the same instruction map.
    #[test]
    fn sweep_is_idempotent(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        prop_assert_eq!(disassemble(&bytes), disassemble(&bytes));
    }

    /// Every label names the offset it is attached to.
    #[test]
    fn labels_name_their_offset(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let insns = disassemble(&bytes);

        for (offset, insn) in &insns {
            if let Some(label) = &insn.label {
                prop_assert_eq!(label.clone(), format!("offset_{:08x}h", offset));
            }
        }
    }

    /// Short relative jumps land where the displacement says, and the target
    /// carries a label.
    #[test]
    fn jmp_disp8_targets_are_labeled(disp in any::<i8>()) {
        // Enough nops around the jmp that any disp8 target stays in range.
        let mut bytes = vec![0x90u8; 300];
        bytes[128] = 0xeb;
        bytes[129] = disp as u8;

        let insns = disassemble(&bytes);
        let target = (130i32 + i32::from(disp)) as usize;
        prop_assert_eq!(
            insns[&128].operands.clone(),
            format!("offset_{:08x}h", target)
        );
        prop_assert_eq!(
            insns[&target].label.clone(),
            Some(format!("offset_{:08x}h", target))
        );
    }
}
