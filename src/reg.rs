//! Definition of the 32 bit general purpose registers.

use std::fmt;

/// A 32 bit general purpose register, selected by a 3 bit field in the
/// ModR/M byte or by the low 3 bits of the opcode itself.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Reg32 {
    eax,
    ecx,
    edx,
    ebx,
    esp,
    ebp,
    esi,
    edi,
}

impl Reg32 {
    /// Decode a register from a 3 bit index. Only the low 3 bits are looked
    /// at, which is what the `O`/`OI` register-in-opcode encodings rely on.
    pub(crate) const fn from_idx(idx: u8) -> Reg32 {
        match idx & 0b111 {
            0 => Reg32::eax,
            1 => Reg32::ecx,
            2 => Reg32::edx,
            3 => Reg32::ebx,
            4 => Reg32::esp,
            5 => Reg32::ebp,
            6 => Reg32::esi,
            7 => Reg32::edi,
            _ => unreachable!(),
        }
    }

    /// Get the register name.
    pub(crate) const fn name(&self) -> &'static str {
        match self {
            Reg32::eax => "eax",
            Reg32::ecx => "ecx",
            Reg32::edx => "edx",
            Reg32::ebx => "ebx",
            Reg32::esp => "esp",
            Reg32::ebp => "ebp",
            Reg32::esi => "esi",
            Reg32::edi => "edi",
        }
    }
}

impl fmt::Display for Reg32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
