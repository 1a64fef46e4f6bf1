//! The linear sweep driver: dispatch each opcode, consume its trailing
//! bytes, render operands and collect the labeled instruction map.

use std::collections::BTreeMap;

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::insn::Insn;
use crate::label::Label;
use crate::mem::ModRm;
use crate::opcode::{tables, OpCode, Prefix};

/// Disassemble a flat buffer, starting at byte 0.
///
/// Returns the instruction map keyed by byte offset. Unknown bytes appear as
/// `db <hex>` pseudo-instructions; offsets targeted by branches past the end
/// of the stream are kept as label-only placeholders.
pub fn disassemble(buf: &[u8]) -> BTreeMap<usize, Insn> {
    Disasm::new(buf).sweep()
}

/// Linear sweep disassembler over a flat byte buffer.
pub struct Disasm<'a> {
    buf: &'a [u8],
    cur: Cursor<'a>,
    insns: BTreeMap<usize, Insn>,
    offset: usize,
}

impl<'a> Disasm<'a> {
    /// Create a new disassembler over `buf`.
    pub fn new(buf: &'a [u8]) -> Disasm<'a> {
        Disasm {
            buf,
            cur: Cursor::new(buf),
            insns: BTreeMap::new(),
            offset: 0,
        }
    }

    /// Run the sweep to the end of the buffer and take the instruction map.
    pub fn sweep(mut self) -> BTreeMap<usize, Insn> {
        loop {
            // Pin the cursor to the instruction start. This keeps stream and
            // offset in lockstep across the speculative reads of the
            // extension probe and the one-byte `db` recovery.
            self.cur.seek(self.offset);

            match self.fetch() {
                Ok((rec, prefix, opcode)) => {
                    if !self.decode(rec, prefix, opcode) {
                        break;
                    }
                }
                Err(Error::Eof) => break,
                Err(Error::UnexpectedEof) => {
                    log::warn!("stream ends mid-instruction at {:08x}", self.offset);
                    break;
                }
                Err(err) => self.recover(err),
            }
        }
        self.insns
    }

    /// Decode one instruction after dispatch resolved its opcode record.
    /// Returns `false` when the stream ended inside the instruction and the
    /// sweep must terminate.
    fn decode(&mut self, rec: OpCode, prefix: Option<Prefix>, opcode: u8) -> bool {
        let mut insn = Insn::at(self.offset);
        insn.prefix = prefix;
        insn.opcode = opcode;
        insn.mnemonic = rec.mnemonic.to_string();
        if let Some(prefix) = &prefix {
            insn.literal.push(prefix.literal);
        }
        insn.literal.push(opcode);

        if let Err(err) = rec.consume(&mut self.cur, &mut insn) {
            log::warn!(
                "{} at {:08x} truncated: {}",
                rec.mnemonic,
                self.offset,
                err
            );
            return false;
        }

        let mut target = None;
        match rec.operands(&insn) {
            Ok((text, label)) => {
                insn.operands = text;
                target = label;
            }
            // Non-fatal: keep the partially rendered instruction.
            Err(err) => log::warn!(
                "failed to render operands of {} at {:08x}: {}",
                rec.mnemonic,
                self.offset,
                err
            ),
        }

        log::trace!("{:08x}: {}", self.offset, insn.asm());

        let len = insn.literal.len();
        self.store(insn);
        if let Some(label) = target {
            self.attach(label);
        }
        self.offset += len;
        true
    }

    /// Recover from a `db`-family error: record a one-byte pseudo-instruction
    /// at the current offset and resume decoding at the following byte.
    fn recover(&mut self, err: Error) {
        let mut insn = Insn::at(self.offset);
        insn.mnemonic = err.to_string();
        insn.literal.push(self.buf[self.offset]);

        log::trace!("{:08x}: {}", self.offset, insn.mnemonic);

        self.store(insn);
        self.offset += 1;
    }

    /// Store a decoded instruction, keeping the label of a placeholder that
    /// an earlier branch already planted at this offset.
    fn store(&mut self, mut insn: Insn) {
        if insn.label.is_none() {
            if let Some(prev) = self.insns.get(&insn.offset) {
                insn.label = prev.label.clone();
            }
        }
        self.insns.insert(insn.offset, insn);
    }

    /// Attach a branch-target label, creating a placeholder if the target
    /// has not been decoded (or never will be).
    fn attach(&mut self, label: Label) {
        let insn = self
            .insns
            .entry(label.target())
            .or_insert_with(|| Insn::at(label.target()));
        insn.label = Some(label.to_string());
    }

    /// Resolve the opcode record for the next instruction.
    ///
    /// Lookup layers, in order: prefix byte (then prefixed or plain table
    /// for the byte after it), extension table keyed by the ModR/M `reg`
    /// field, plain table. Extension-bearing opcode bytes resolve
    /// exclusively through the extension table.
    fn fetch(&mut self) -> Result<(OpCode, Option<Prefix>, u8)> {
        let tables = tables();
        let byte = self.cur.read_u8().ok_or(Error::Eof)?;

        if let Some(prefix) = tables.prefix(byte) {
            let opcode = self.cur.read_u8().ok_or(Error::UnexpectedEof)?;

            if prefix.is_escape() {
                if let Some(rec) = tables.prefixed(opcode) {
                    return Ok((rec, Some(prefix), opcode));
                }
                // Two-byte opcodes can be extension-bearing as well
                // (`0f ae /7` clflush).
                return match self.probe_ext(opcode, true) {
                    Ok(Some(rec)) => Ok((rec, Some(prefix), opcode)),
                    Ok(None) | Err(Error::Db(_)) => {
                        self.cur.unread();
                        Err(Error::Db(prefix.literal))
                    }
                    Err(err) => Err(err),
                };
            }

            // repne: modifies the plain opcode that follows it.
            return match tables.plain(opcode) {
                Some(rec) => Ok((rec, Some(prefix), opcode)),
                None => Err(Error::Db(opcode)),
            };
        }

        if let Some(rec) = self.probe_ext(byte, false)? {
            return Ok((rec, None, byte));
        }
        match tables.plain(byte) {
            Some(rec) => Ok((rec, None, byte)),
            None => Err(Error::Db(byte)),
        }
    }

    /// Probe the extension table for `opcode`: speculatively read the ModR/M
    /// byte, resolve its `reg` field, and put the byte back so the encoding
    /// consumes it again.
    ///
    /// `Ok(None)` means `opcode` is not extension-bearing at all; an
    /// installed opcode with an empty (or prefix-mismatched) slot is a
    /// decode failure surfaced as `db`.
    fn probe_ext(&mut self, opcode: u8, prefixed: bool) -> Result<Option<OpCode>> {
        let Some(slots) = tables().ext(opcode) else {
            return Ok(None);
        };

        let byte = self.cur.read_u8().ok_or(Error::UnexpectedEof)?;
        let slot = ModRm::from_byte(byte).reg;
        let rec = slots[usize::from(slot)].filter(|rec| rec.prefixed == prefixed);
        self.cur.unread();

        match rec {
            Some(rec) => Ok(Some(rec)),
            None => Err(Error::Db(opcode)),
        }
    }
}
