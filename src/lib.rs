//! A linear sweep disassembler for a subset of 32 bit `x86` machine code.
//!
//! The sweep decodes a flat byte buffer from offset 0, one instruction after
//! the other, without following control flow. Each decoded instruction keeps
//! its raw byte literal, the rendered operand string and, when some branch
//! targets its offset, a label. Unknown bytes never desynchronize the
//! stream: they surface as one-byte `db <hex>` pseudo-instructions and the
//! sweep resumes at the following byte.
//!
//! ```rust
//! use lsdis::{disassemble, listing};
//!
//! // mov eax, 0x12345678
//! // jmp offset_00000008h
//! // nop
//! // offset_00000008h: nop
//! let code = [
//!     0xb8, 0x78, 0x56, 0x34, 0x12, // mov
//!     0xeb, 0x01,                   // jmp +1
//!     0x90,                         // nop (skipped over)
//!     0x90,                         // nop (branch target)
//! ];
//!
//! let insns = disassemble(&code);
//! assert_eq!(insns[&0].asm(), "mov eax, 0x12345678");
//! assert_eq!(insns[&5].asm(), "jmp offset_00000008h");
//! assert_eq!(insns[&8].label.as_deref(), Some("offset_00000008h"));
//!
//! let mut out = Vec::new();
//! listing::write(&mut out, &insns).unwrap();
//! ```

mod cursor;
mod disasm;
mod encoding;
mod error;
mod imm;
mod insn;
mod label;
mod mem;
mod opcode;
mod reg;

pub mod listing;

pub use disasm::{disassemble, Disasm};
pub use error::Error;
pub use insn::Insn;
pub use mem::{AddrMode, ModRm};
pub use opcode::Prefix;
pub use reg::Reg32;
