//! Definition of the addressing modes encoded in the ModR/M byte and
//! rendering of the memory operands they describe.

use crate::error::Result;
use crate::imm;
use crate::reg::Reg32;

/// The addressing mode selected by the `mod` field of a ModR/M byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddrMode {
    /// An indirect memory operand, eg `add [ eax ], ebx`. With `rm=5` the
    /// base register is replaced by a bare 32 bit absolute displacement,
    /// eg `add [ 0x00000010 ], ebx`.
    Indirect,
    /// An indirect memory operand with an 8 bit displacement,
    /// eg `add [ eax+0x00000004 ], ebx`.
    IndirectDisp8,
    /// An indirect memory operand with a 32 bit displacement.
    IndirectDisp32,
    /// A bare register operand, no memory access.
    Direct,
}

/// A parsed ModR/M byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModRm {
    /// The raw byte.
    pub literal: u8,
    /// Addressing mode from bits `[7:6]`.
    pub mode: AddrMode,
    /// Register or opcode extension slot from bits `[5:3]`.
    pub reg: u8,
    /// Register or memory base from bits `[2:0]`.
    pub rm: u8,
}

impl ModRm {
    /// Split a ModR/M byte into its `mod`, `reg` and `rm` fields.
    pub fn from_byte(byte: u8) -> ModRm {
        let mode = match byte >> 6 {
            0b00 => AddrMode::Indirect,
            0b01 => AddrMode::IndirectDisp8,
            0b10 => AddrMode::IndirectDisp32,
            _ => AddrMode::Direct,
        };
        ModRm {
            literal: byte,
            mode,
            reg: (byte >> 3) & 0b111,
            rm: byte & 0b111,
        }
    }

    /// Number of displacement bytes that follow this ModR/M byte.
    pub(crate) fn disp_len(&self) -> usize {
        match self.mode {
            // mod=00 with rm=5 encodes a bare disp32 instead of [ebp].
            AddrMode::Indirect if self.rm == 0b101 => 4,
            AddrMode::Indirect => 0,
            AddrMode::IndirectDisp8 => 1,
            AddrMode::IndirectDisp32 => 4,
            AddrMode::Direct => 0,
        }
    }

    /// Render the `rm` operand using the displacement bytes consumed for
    /// this instruction.
    pub(crate) fn rm_operand(&self, disp: &[u8]) -> Result<String> {
        let base = Reg32::from_idx(self.rm);
        match self.mode {
            AddrMode::Indirect if self.rm == 0b101 => Ok(format!("[ {} ]", imm::hex32(disp)?)),
            AddrMode::Indirect => Ok(format!("[ {} ]", base)),
            AddrMode::IndirectDisp8 | AddrMode::IndirectDisp32 => {
                Ok(format!("[ {}+{} ]", base, imm::hex32(disp)?))
            }
            AddrMode::Direct => Ok(base.to_string()),
        }
    }

    /// Render the `reg` operand.
    pub(crate) fn reg_operand(&self) -> String {
        Reg32::from_idx(self.reg).to_string()
    }
}
