//! The listing emitter: format the instruction map as a textual assembly
//! listing.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::insn::Insn;

/// Format the byte literal as lowercase hex, space separated.
fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write the listing for an instruction map in ascending offset order.
///
/// Label-only placeholders (empty literal) are skipped; a labeled
/// instruction gets its `<label>:` line first. Columns are tab separated:
/// offset, byte literal, assembly text, and an optional legality comment.
pub fn write<W: Write>(out: &mut W, insns: &BTreeMap<usize, Insn>) -> io::Result<()> {
    for insn in insns.values() {
        if insn.is_placeholder() {
            continue;
        }

        if let Some(label) = &insn.label {
            writeln!(out, "{}:", label)?;
        }

        write!(
            out,
            "{:08x}:\t{}\t{}",
            insn.offset,
            hex_bytes(&insn.literal),
            insn.asm()
        )?;
        if let Some(comment) = insn.comment() {
            write!(out, "\t; {}", comment)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
