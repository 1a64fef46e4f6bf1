//! The operand encodings: which bytes trail the opcode and how the decoded
//! fields render as operand text.

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::imm;
use crate::insn::Insn;
use crate::label::Label;
use crate::mem::ModRm;
use crate::opcode::OpCode;
use crate::reg::Reg32;

/// The operand encoding of an opcode record.
///
/// The encoding determines both the trailing bytes consumed after the opcode
/// ([`OpCode::consume`]) and the textual operand form ([`OpCode::operands`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Encoding {
    /// ModR/M, operand is `rm`.
    M,
    /// ModR/M + immediate, operands are `rm, imm`.
    MI,
    /// ModR/M, operands are `rm, reg`.
    MR,
    /// ModR/M, operands are `reg, rm`.
    RM,
    /// ModR/M + immediate, operands are `reg, rm, imm`.
    RMI,
    /// No operands.
    NP,
    /// Register encoded in the low 3 opcode bits.
    O,
    /// Immediate only.
    I,
    /// Register in the low 3 opcode bits + immediate.
    OI,
    /// Relative branch displacement.
    D,
}

impl OpCode {
    /// Consume the trailing bytes of this instruction form: ModR/M,
    /// displacement and immediate as the encoding demands. Consumed bytes
    /// are appended to the instruction literal in stream order.
    pub(crate) fn consume(&self, cur: &mut Cursor<'_>, insn: &mut Insn) -> Result<()> {
        match self.encoding {
            Encoding::M | Encoding::MR | Encoding::RM => self.consume_modrm(cur, insn),
            Encoding::MI | Encoding::RMI => {
                self.consume_modrm(cur, insn)?;
                self.consume_imm(cur, insn)
            }
            Encoding::I | Encoding::OI => self.consume_imm(cur, insn),
            Encoding::D => {
                let disp = imm::read_disp(cur, None, self.disp)?;
                insn.disp = disp.to_vec();
                insn.literal.extend_from_slice(disp);
                Ok(())
            }
            Encoding::NP | Encoding::O => Ok(()),
        }
    }

    fn consume_modrm(&self, cur: &mut Cursor<'_>, insn: &mut Insn) -> Result<()> {
        let byte = cur.read_u8().ok_or(Error::UnexpectedEof)?;
        let modrm = ModRm::from_byte(byte);
        insn.modrm = Some(modrm);
        insn.literal.push(byte);

        let disp = imm::read_disp(cur, Some(&modrm), 0)?;
        insn.disp = disp.to_vec();
        insn.literal.extend_from_slice(disp);
        Ok(())
    }

    fn consume_imm(&self, cur: &mut Cursor<'_>, insn: &mut Insn) -> Result<()> {
        let bytes = imm::read_imm(cur, self.imm)?;
        insn.imm = bytes.to_vec();
        insn.literal.extend_from_slice(bytes);
        Ok(())
    }

    /// Render the operand string of a decoded instruction. For relative
    /// branches the computed target label is returned alongside, so the
    /// sweep can attach it to the target offset.
    pub(crate) fn operands(&self, insn: &Insn) -> Result<(String, Option<Label>)> {
        let text = match self.encoding {
            Encoding::NP => String::new(),
            Encoding::M => rm(insn)?,
            Encoding::MI => format!("{}, {}", rm(insn)?, imm::hex32(&insn.imm)?),
            Encoding::MR => format!("{}, {}", rm(insn)?, reg(insn)),
            Encoding::RM => format!("{}, {}", reg(insn), rm(insn)?),
            Encoding::RMI => {
                format!("{}, {}, {}", reg(insn), rm(insn)?, imm::hex32(&insn.imm)?)
            }
            Encoding::O => Reg32::from_idx(insn.opcode).to_string(),
            Encoding::I => imm::hex32(&insn.imm)?,
            Encoding::OI => {
                format!("{}, {}", Reg32::from_idx(insn.opcode), imm::hex32(&insn.imm)?)
            }
            Encoding::D => {
                // The displacement is relative to the end of this
                // instruction; targets wrap in 32 bit address space.
                let rel = imm::to_i32(&insn.disp)?;
                let next = (insn.offset + insn.literal.len()) as u32;
                let label = Label::new(next.wrapping_add(rel as u32) as usize);
                return Ok((label.to_string(), Some(label)));
            }
        };
        Ok((text, None))
    }
}

/// Render the `rm` operand of an instruction that consumed a ModR/M byte.
fn rm(insn: &Insn) -> Result<String> {
    let modrm = insn.modrm.as_ref().expect("encoding consumed a ModR/M byte");
    modrm.rm_operand(&insn.disp)
}

/// Render the `reg` operand of an instruction that consumed a ModR/M byte.
fn reg(insn: &Insn) -> String {
    let modrm = insn.modrm.as_ref().expect("encoding consumed a ModR/M byte");
    modrm.reg_operand()
}
