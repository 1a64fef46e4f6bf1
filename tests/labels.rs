use lsdis::disassemble;

#[test]
fn forward_jmp_labels_target() {
    let insns = disassemble(&[0xeb, 0x02, 0x90, 0x90, 0x90]);

    assert_eq!(insns[&0].asm(), "jmp offset_00000004h");
    assert_eq!(insns[&0].literal, [0xeb, 0x02]);
    assert_eq!(insns[&2].label, None);
    assert_eq!(insns[&3].label, None);
    // The placeholder planted by the jmp is merged into the decoded nop.
    assert_eq!(insns[&4].asm(), "nop");
    assert_eq!(insns[&4].label.as_deref(), Some("offset_00000004h"));
}

#[test]
fn backward_jmp_labels_target() {
    // 0xfd -> -3: back to the nop at offset 0.
    let insns = disassemble(&[0x90, 0xeb, 0xfd]);
    assert_eq!(insns[&1].asm(), "jmp offset_00000000h");
    assert_eq!(insns[&0].label.as_deref(), Some("offset_00000000h"));
}

#[test]
fn jmp_to_self() {
    // 0xfe -> -2: the jmp is its own target.
    let insns = disassemble(&[0xeb, 0xfe]);
    assert_eq!(insns[&0].asm(), "jmp offset_00000000h");
    assert_eq!(insns[&0].label.as_deref(), Some("offset_00000000h"));
}

#[test]
fn rel32_branches() {
    let insns = disassemble(&[0xe9, 0x01, 0x00, 0x00, 0x00, 0x90, 0x90]);
    assert_eq!(insns[&0].asm(), "jmp offset_00000006h");
    assert_eq!(insns[&6].label.as_deref(), Some("offset_00000006h"));

    let insns = disassemble(&[0xe8, 0xf6, 0xff, 0xff, 0xff]);
    // call rel32 with -10: wraps around the 32 bit address space.
    assert_eq!(insns[&0].asm(), "call offset_fffffffbh");
}

#[test]
fn conditional_branches() {
    let insns = disassemble(&[0x74, 0x01, 0x90, 0x90]);
    assert_eq!(insns[&0].asm(), "jz offset_00000003h");
    assert_eq!(insns[&3].label.as_deref(), Some("offset_00000003h"));

    let insns = disassemble(&[0x75, 0x00, 0x90]);
    assert_eq!(insns[&0].asm(), "jnz offset_00000002h");

    // Two-byte forms take a 32 bit displacement.
    let insns = disassemble(&[0x0f, 0x84, 0x01, 0x00, 0x00, 0x00, 0x90, 0x90]);
    assert_eq!(insns[&0].asm(), "jz offset_00000007h");
    assert_eq!(insns[&7].label.as_deref(), Some("offset_00000007h"));
}

#[test]
fn target_past_stream_end_stays_placeholder() {
    let insns = disassemble(&[0x74, 0x05]);
    assert_eq!(insns[&0].asm(), "jz offset_00000007h");

    let placeholder = &insns[&7];
    assert!(placeholder.is_placeholder());
    assert_eq!(placeholder.label.as_deref(), Some("offset_00000007h"));
}

#[test]
fn two_branches_same_target() {
    let insns = disassemble(&[0x74, 0x02, 0x75, 0x00, 0x90]);
    assert_eq!(insns[&0].asm(), "jz offset_00000004h");
    assert_eq!(insns[&2].asm(), "jnz offset_00000004h");
    assert_eq!(insns[&4].label.as_deref(), Some("offset_00000004h"));
}

#[test]
fn label_survives_db_recovery() {
    // The branch target decodes as an unknown byte; the label sticks to the
    // db pseudo-instruction.
    let insns = disassemble(&[0xeb, 0x00, 0x06]);
    assert_eq!(insns[&2].asm(), "db 06");
    assert_eq!(insns[&2].label.as_deref(), Some("offset_00000002h"));
}
