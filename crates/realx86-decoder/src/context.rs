use crate::config::{CodeWidth, DecoderConfig};
use crate::field::Field;
use crate::prefix::{PrefixFlags, Prefixes};
use realx86_types::{BitWidth, SegReg, SegmentedAddress};

/// Everything known about an instruction once its prefixes and opcode are consumed.
///
/// Built once per decode attempt and only ever borrowed immutably by the family dispatchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsingContext {
    pub address: SegmentedAddress,
    pub opcode: Opcode,
    pub prefixes: Prefixes,
    /// Effective address size: [`BitWidth::Word16`] or [`BitWidth::Dword32`].
    pub address_width: BitWidth,
    pub operand_size_32: bool,
    pub segment_override: Option<SegReg>,
}

impl ParsingContext {
    #[must_use]
    pub fn new(
        config: &DecoderConfig,
        address: SegmentedAddress,
        opcode: Opcode,
        prefixes: Prefixes,
    ) -> Self {
        let default_32 = config.default_width == CodeWidth::Bits32;
        let operand_size_32 = default_32 ^ prefixes.contains(PrefixFlags::OPERAND_SIZE);
        let address_size_32 = default_32 ^ prefixes.contains(PrefixFlags::ADDRESS_SIZE);
        Self {
            address,
            opcode,
            prefixes,
            address_width: if address_size_32 {
                BitWidth::Dword32
            } else {
                BitWidth::Word16
            },
            operand_size_32,
            segment_override: prefixes.segment_override(),
        }
    }

    #[must_use]
    pub fn opcode(&self) -> u16 {
        self.opcode.value()
    }

    /// The last opcode byte (the byte after `0F` for two-byte opcodes).
    #[must_use]
    pub fn opcode_byte(&self) -> u8 {
        self.opcode.byte.value
    }

    #[must_use]
    pub fn is_two_byte(&self) -> bool {
        self.opcode.is_two_byte()
    }
}

/// The opcode bytes of an instruction: the optional `0F` escape and the opcode byte proper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opcode {
    pub escape: Option<Field<u8>>,
    pub byte: Field<u8>,
}

impl Opcode {
    #[must_use]
    pub const fn one_byte(byte: Field<u8>) -> Self {
        Self { escape: None, byte }
    }

    #[must_use]
    pub const fn two_byte(escape: Field<u8>, byte: Field<u8>) -> Self {
        Self {
            escape: Some(escape),
            byte,
        }
    }

    /// Logical opcode: `0x00xx` for the primary map, `0x0Fxx` for the two-byte map.
    #[must_use]
    pub fn value(&self) -> u16 {
        match self.escape {
            Some(escape) => u16::from_be_bytes([escape.value, self.byte.value]),
            None => u16::from(self.byte.value),
        }
    }

    #[must_use]
    pub fn is_two_byte(&self) -> bool {
        self.escape.is_some()
    }

    /// Byte index of the first opcode byte (the escape, if any).
    #[must_use]
    pub fn offset(&self) -> u8 {
        self.escape.map_or(self.byte.offset, |escape| escape.offset)
    }

    #[must_use]
    pub fn physical_address(&self) -> u32 {
        self.escape
            .map_or(self.byte.physical_address, |escape| escape.physical_address)
    }

    /// Number of opcode bytes: 1, or 2 in the two-byte map.
    #[must_use]
    pub fn len(&self) -> u8 {
        self.end() - self.offset()
    }

    /// Offset of the first byte after the opcode.
    #[must_use]
    pub fn end(&self) -> u8 {
        self.byte.end()
    }
}
