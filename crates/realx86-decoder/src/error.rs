use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Failure reported by a [`FieldReader`](crate::field::FieldReader).
///
/// The decoder never produces these itself; it forwards them unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("unexpected end of instruction bytes at offset {offset}")]
    UnexpectedEof { offset: u8 },

    #[error("instruction exceeds the 15-byte length limit")]
    TooLong,

    #[error("no memory mapped at physical address {physical:#x}")]
    Unmapped { physical: u32 },
}

/// Decoder error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// ModRM.reg selected an index the opcode family does not define.
    ///
    /// This is the only error the decoder itself raises. The calling engine must treat the
    /// address as un-decodable.
    #[error("invalid group index {group} for opcode {opcode:#06x}")]
    InvalidGroupIndex { opcode: u16, group: u8 },

    #[error(transparent)]
    Read(#[from] ReadError),
}
