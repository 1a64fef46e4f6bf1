use lsdis::{disassemble, listing};

fn render(code: &[u8]) -> String {
    let insns = disassemble(code);
    let mut out = Vec::new();
    listing::write(&mut out, &insns).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn listing_with_label_and_db() {
    let text = render(&[0xeb, 0x02, 0x90, 0x90, 0x90, 0x06]);
    assert_eq!(
        text,
        "00000000:\teb 02\tjmp offset_00000004h\n\
         00000002:\t90\tnop\n\
         00000003:\t90\tnop\n\
         offset_00000004h:\n\
         00000004:\t90\tnop\n\
         00000005:\t06\tdb 06\n"
    );
}

#[test]
fn listing_prefix_and_comment() {
    let text = render(&[0xf2, 0xa5, 0x0f, 0xae, 0xf8]);
    assert_eq!(
        text,
        "00000000:\tf2 a5\trepne movsd\n\
         00000002:\t0f ae f8\tclflush eax\t; Illegal addressing mode.\n"
    );
}

#[test]
fn listing_skips_placeholders_past_the_end() {
    // The branch target lies beyond the stream; no line is emitted for it.
    let text = render(&[0x74, 0x05]);
    assert_eq!(text, "00000000:\t74 05\tjz offset_00000007h\n");
}

#[test]
fn listing_template_mnemonics() {
    let text = render(&[0xd1, 0xe0, 0xe7, 0x10]);
    assert_eq!(
        text,
        "00000000:\td1 e0\tsal eax, 1\n\
         00000002:\te7 10\tout 0x00000010, eax\n"
    );
}
