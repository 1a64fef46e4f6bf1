//! The opcode registry: one record per recognized instruction form, installed
//! into the lookup tables the dispatcher resolves against.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::encoding::Encoding::{self, *};

/// A prefix byte modifying the meaning of the following opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prefix {
    /// The raw prefix byte.
    pub literal: u8,
    /// Prefix mnemonic printed in front of the instruction mnemonic. Empty
    /// for the two-byte opcode escape, which has no textual form.
    pub mnemonic: &'static str,
}

impl Prefix {
    /// Whether this prefix is the `0x0F` two-byte opcode escape.
    pub(crate) fn is_escape(&self) -> bool {
        self.literal == 0x0f
    }
}

/// A single opcode record: the opcode literal, its mnemonic, the operand
/// encoding, and the widths of any trailing integer fields.
///
/// The mnemonic may contain one `%s` marker for instructions whose operand
/// sits in the middle of the textual form (`sal %s, 1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OpCode {
    pub(crate) literal: u8,
    pub(crate) mnemonic: &'static str,
    pub(crate) encoding: Encoding,
    /// Slot in the extension table, selected by the ModR/M `reg` field.
    pub(crate) ext: Option<u8>,
    /// Record is only reachable through the `0x0F` escape.
    pub(crate) prefixed: bool,
    /// Immediate width in bytes.
    pub(crate) imm: usize,
    /// Displacement width in bytes for relative branches.
    pub(crate) disp: usize,
}

/// Build an opcode record. Field widths and table placement are layered on
/// with the `const` builder methods below.
const fn op(literal: u8, mnemonic: &'static str, encoding: Encoding) -> OpCode {
    OpCode {
        literal,
        mnemonic,
        encoding,
        ext: None,
        prefixed: false,
        imm: 0,
        disp: 0,
    }
}

impl OpCode {
    const fn imm(mut self, len: usize) -> OpCode {
        self.imm = len;
        self
    }

    const fn disp(mut self, len: usize) -> OpCode {
        self.disp = len;
        self
    }

    const fn ext(mut self, slot: u8) -> OpCode {
        self.ext = Some(slot);
        self
    }

    const fn prefixed(mut self) -> OpCode {
        self.prefixed = true;
        self
    }
}

/// Every instruction form this disassembler recognizes.
#[rustfmt::skip]
const RECORDS: &[OpCode] = &[
    // -- add
    op(0x05, "add", I).imm(4),
    op(0x81, "add", MI).ext(0).imm(4),
    op(0x01, "add", MR),
    op(0x03, "add", RM),
    // -- and
    op(0x25, "and", I).imm(4),
    op(0x81, "and", MI).ext(4).imm(4),
    op(0x21, "and", MR),
    op(0x23, "and", RM),
    // -- call
    op(0xe8, "call", D).disp(4),
    op(0xff, "call", M).ext(2),
    // -- clflush
    op(0xae, "clflush", M).ext(7).prefixed(),
    // -- cmp
    op(0x3d, "cmp", I).imm(4),
    op(0x81, "cmp", MI).ext(7).imm(4),
    op(0x39, "cmp", MR),
    op(0x3b, "cmp", RM),
    // -- cmpsd
    op(0xa7, "cmpsd", NP),
    // -- dec
    op(0xff, "dec", M).ext(1),
    op(0x48, "dec", O),
    // -- idiv
    op(0xf7, "idiv", M).ext(7),
    // -- imul
    op(0xf7, "imul", M).ext(5),
    op(0xaf, "imul", RM).prefixed(),
    op(0x69, "imul", RMI).imm(4),
    // -- inc
    op(0xff, "inc", M).ext(0),
    op(0x40, "inc", O),
    // -- jmp
    op(0xeb, "jmp", D).disp(1),
    op(0xe9, "jmp", D).disp(4),
    op(0xff, "jmp", M).ext(4),
    // -- jz
    op(0x74, "jz", D).disp(1),
    op(0x84, "jz", D).disp(4).prefixed(),
    // -- jnz
    op(0x75, "jnz", D).disp(1),
    op(0x85, "jnz", D).disp(4).prefixed(),
    // -- lea
    op(0x8d, "lea", RM),
    // -- mov
    op(0xb8, "mov", OI).imm(4),
    op(0xc7, "mov", MI).ext(0).imm(4),
    op(0x89, "mov", MR),
    op(0x8b, "mov", RM),
    // -- movsd
    op(0xa5, "movsd", NP),
    // -- mul
    op(0xf7, "mul", M).ext(4),
    // -- neg
    op(0xf7, "neg", M).ext(3),
    // -- nop
    op(0x90, "nop", NP),
    // -- not
    op(0xf7, "not", M).ext(2),
    // -- or
    op(0x0d, "or", I).imm(4),
    op(0x81, "or", MI).ext(1).imm(4),
    op(0x09, "or", MR),
    op(0x0b, "or", RM),
    // -- out
    op(0xe7, "out %s, eax", I).imm(1),
    // -- pop
    op(0x8f, "pop", M).ext(0),
    op(0x58, "pop", O),
    // -- push
    op(0xff, "push", M).ext(6),
    op(0x50, "push", O),
    op(0x68, "push", I).imm(4),
    // -- retf
    op(0xcb, "retf", NP),
    op(0xca, "retf", I).imm(2),
    // -- retn
    op(0xc3, "retn", NP),
    op(0xc2, "retn", I).imm(2),
    // -- sal/sar/shr
    op(0xd1, "sal %s, 1", M).ext(4),
    op(0xd1, "sar %s, 1", M).ext(7),
    op(0xd1, "shr %s, 1", M).ext(5),
    // -- sbb
    op(0x1d, "sbb", I).imm(4),
    op(0x81, "sbb", MI).ext(3).imm(4),
    op(0x19, "sbb", MR),
    op(0x1b, "sbb", RM),
    // -- sub
    op(0x2d, "sub", I).imm(4),
    op(0x81, "sub", MI).ext(5).imm(4),
    op(0x29, "sub", MR),
    op(0x2b, "sub", RM),
    // -- test
    op(0xa9, "test", I).imm(4),
    op(0xf7, "test", MI).ext(0).imm(4),
    op(0x85, "test", MR),
    // -- xor
    op(0x35, "xor", I).imm(4),
    op(0x81, "xor", MI).ext(6).imm(4),
    op(0x31, "xor", MR),
    op(0x33, "xor", RM),
];

/// The opcode lookup tables, built once and read-only afterwards.
pub(crate) struct Tables {
    /// Plain one-byte opcodes.
    plain: HashMap<u8, OpCode>,
    /// Extension-bearing opcodes: eight slots selected by the ModR/M `reg`
    /// field. These opcode bytes are resolved exclusively through this table.
    ext: HashMap<u8, [Option<OpCode>; 8]>,
    /// Opcodes reached through the `0x0F` two-byte escape.
    prefixed: HashMap<u8, OpCode>,
    /// Known prefix bytes.
    prefixes: HashMap<u8, Prefix>,
}

impl Tables {
    pub(crate) fn plain(&self, opcode: u8) -> Option<OpCode> {
        self.plain.get(&opcode).copied()
    }

    pub(crate) fn ext(&self, opcode: u8) -> Option<&[Option<OpCode>; 8]> {
        self.ext.get(&opcode)
    }

    pub(crate) fn prefixed(&self, opcode: u8) -> Option<OpCode> {
        self.prefixed.get(&opcode).copied()
    }

    pub(crate) fn prefix(&self, byte: u8) -> Option<Prefix> {
        self.prefixes.get(&byte).copied()
    }
}

/// Install every record into exactly one of the three opcode tables.
fn build() -> Tables {
    let mut tables = Tables {
        plain: HashMap::new(),
        ext: HashMap::new(),
        prefixed: HashMap::new(),
        prefixes: HashMap::new(),
    };

    for prefix in [
        Prefix { literal: 0x0f, mnemonic: "" },
        Prefix { literal: 0xf2, mnemonic: "repne" },
    ] {
        tables.prefixes.insert(prefix.literal, prefix);
    }

    for rec in RECORDS {
        if let Some(slot) = rec.ext {
            let slots = tables.ext.entry(rec.literal).or_insert([None; 8]);
            let slot = &mut slots[usize::from(slot)];
            assert!(slot.is_none(), "duplicate extension slot for {:02x}", rec.literal);
            *slot = Some(*rec);
        } else if rec.prefixed {
            let prev = tables.prefixed.insert(rec.literal, *rec);
            assert!(prev.is_none(), "duplicate prefixed opcode {:02x}", rec.literal);
        } else {
            // Register-in-opcode encodings occupy a run of 8 consecutive
            // opcode bytes, one per register.
            let run = match rec.encoding {
                O | OI => 8,
                _ => 1,
            };
            for idx in 0..run {
                let prev = tables.plain.insert(rec.literal + idx, *rec);
                assert!(prev.is_none(), "duplicate opcode {:02x}", rec.literal + idx);
            }
        }
    }

    tables
}

/// Get the process-wide opcode tables.
pub(crate) fn tables() -> &'static Tables {
    static TABLES: LazyLock<Tables> = LazyLock::new(build);
    &TABLES
}
