//! Error taxonomy of the decode core.

/// Errors produced while decoding a byte stream.
///
/// Only [`Error::Eof`] and [`Error::UnexpectedEof`] terminate a sweep. The
/// [`Error::Db`] family is recoverable: the sweep turns it into a `db <hex>`
/// pseudo-instruction and re-synchronizes one byte further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The stream ended cleanly at an instruction boundary.
    #[error("end of stream")]
    Eof,

    /// The stream ended in the middle of an instruction.
    #[error("unexpected end of stream")]
    UnexpectedEof,

    /// No instruction starts with this byte (unknown opcode, unknown
    /// extension slot, or unknown byte after a prefix).
    #[error("db {0:02x}")]
    Db(u8),

    /// Integer fields must be 1, 2 or 4 bytes wide.
    #[error("unsupported integer width {0}")]
    Width(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
