//! Consumption and formatting of the little-endian integer fields trailing
//! an opcode: displacements and immediates.

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::mem::ModRm;

/// Consume the displacement bytes of an instruction.
///
/// With a ModR/M byte present the addressing mode dictates the width. Without
/// one, exactly `fallback` bytes are consumed, which is how relative branch
/// displacements are read.
pub(crate) fn read_disp<'a>(
    cur: &mut Cursor<'a>,
    modrm: Option<&ModRm>,
    fallback: usize,
) -> Result<&'a [u8]> {
    let len = match modrm {
        Some(modrm) => modrm.disp_len(),
        None => fallback,
    };
    cur.read_bytes(len)
}

/// Consume an immediate of exactly `len` bytes.
pub(crate) fn read_imm<'a>(cur: &mut Cursor<'a>, len: usize) -> Result<&'a [u8]> {
    cur.read_bytes(len)
}

/// Interpret a 1, 2 or 4 byte little-endian slice as an unsigned integer.
pub(crate) fn to_u32(bytes: &[u8]) -> Result<u32> {
    match *bytes {
        [b0] => Ok(u32::from(b0)),
        [b0, b1] => Ok(u32::from(u16::from_le_bytes([b0, b1]))),
        [b0, b1, b2, b3] => Ok(u32::from_le_bytes([b0, b1, b2, b3])),
        _ => Err(Error::Width(bytes.len())),
    }
}

/// Interpret a 1, 2 or 4 byte little-endian slice as a signed
/// (two's-complement) integer.
pub(crate) fn to_i32(bytes: &[u8]) -> Result<i32> {
    match *bytes {
        [b0] => Ok(i32::from(b0 as i8)),
        [b0, b1] => Ok(i32::from(i16::from_le_bytes([b0, b1]))),
        [b0, b1, b2, b3] => Ok(i32::from_le_bytes([b0, b1, b2, b3])),
        _ => Err(Error::Width(bytes.len())),
    }
}

/// Format an integer field as fixed-width hex, `0x%08x`. Immediates and
/// displacements are always rendered zero-padded to 8 digits regardless of
/// their natural width.
pub(crate) fn hex32(bytes: &[u8]) -> Result<String> {
    Ok(format!("0x{:08x}", to_u32(bytes)?))
}
