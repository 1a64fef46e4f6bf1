//! The decoded instruction model.

use crate::mem::{AddrMode, ModRm};
use crate::opcode::Prefix;

/// One decoded instruction (or `db` pseudo-instruction) at a byte offset.
///
/// Instances are created by the sweep, or ahead of it as label-only
/// placeholders when a branch targets an offset the sweep has not reached
/// yet. A placeholder has an empty [`literal`](Self::literal) and is skipped
/// by the listing emitter until real decode fills it in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Insn {
    /// Byte position in the input where decode began.
    pub offset: usize,
    /// Raw bytes consumed, in stream order: prefix, opcode, ModR/M,
    /// displacement, immediate.
    pub literal: Vec<u8>,
    /// Prefix byte, if one was consumed.
    pub prefix: Option<Prefix>,
    /// The primary opcode byte.
    pub opcode: u8,
    /// Instruction mnemonic. May contain one `%s` marker which is replaced
    /// with the operand string when the text is assembled.
    pub mnemonic: String,
    /// Parsed ModR/M byte, if the encoding required one.
    pub modrm: Option<ModRm>,
    /// Raw displacement bytes (0, 1 or 4).
    pub disp: Vec<u8>,
    /// Raw immediate bytes (0, 1, 2 or 4).
    pub imm: Vec<u8>,
    /// Rendered operand string.
    pub operands: String,
    /// Label attached to this offset because another instruction branches
    /// here.
    pub label: Option<String>,
}

impl Insn {
    /// Create an empty instruction at `offset`.
    pub(crate) fn at(offset: usize) -> Insn {
        Insn {
            offset,
            ..Insn::default()
        }
    }

    /// Whether this is a label-only placeholder with no decoded bytes.
    pub fn is_placeholder(&self) -> bool {
        self.literal.is_empty()
    }

    /// Assemble the textual form: prefix mnemonic, then the mnemonic with
    /// the operand string substituted or appended.
    pub fn asm(&self) -> String {
        let mut text = String::new();
        if let Some(prefix) = &self.prefix {
            if !prefix.mnemonic.is_empty() {
                text.push_str(prefix.mnemonic);
                text.push(' ');
            }
        }
        if self.mnemonic.contains("%s") {
            text.push_str(&self.mnemonic.replacen("%s", &self.operands, 1));
        } else if self.operands.is_empty() {
            text.push_str(&self.mnemonic);
        } else {
            text.push_str(&self.mnemonic);
            text.push(' ');
            text.push_str(&self.operands);
        }
        text
    }

    /// Legality comment for the listing. `clflush` and `lea` require a
    /// memory operand, so a ModR/M in direct register mode is flagged.
    pub fn comment(&self) -> Option<&'static str> {
        match (self.mnemonic.as_str(), &self.modrm) {
            ("clflush" | "lea", Some(modrm)) if modrm.mode == AddrMode::Direct => {
                Some("Illegal addressing mode.")
            }
            _ => None,
        }
    }
}
