//! Decoder entry point: prefixes, opcode, then dispatch to the owning family.

use crate::config::DecoderConfig;
use crate::context::{Opcode, ParsingContext};
use crate::error::{DecodeError, Result};
use crate::factory;
use crate::families::{
    alu, bit_test, control, fpu, grp1, grp2, grp3, grp45, misc, mov, register_index, setcc,
    string, two_byte,
};
use crate::field::{CodeMemory, FieldReader, MemoryReader, SliceReader};
use crate::inst::{InstKind, Instruction};
use crate::prefix::scan_prefixes;
use crate::stream::InstructionStream;
use realx86_types::SegmentedAddress;
use tracing::{debug, trace};

/// Escape byte of the two-byte opcode map.
const TWO_BYTE_ESCAPE: u8 = 0x0F;

/// Turns the bytes at a code address into one [`Instruction`].
///
/// The decoder holds configuration only; every call owns its cursor and parsing context, so a
/// single `Decoder` can be shared freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    #[must_use]
    pub const fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes the instruction whose first byte `reader` yields next.
    ///
    /// `address` is the segmented address of that byte; it is recorded on the node and used for
    /// branch targets.
    pub fn decode<R: FieldReader>(
        &self,
        reader: &mut R,
        address: SegmentedAddress,
    ) -> Result<Instruction> {
        let mut stream = InstructionStream::new(reader);
        let (prefixes, first) = scan_prefixes(&mut stream)?;

        let opcode = if first.value == TWO_BYTE_ESCAPE {
            Opcode::two_byte(first, stream.u8(true)?)
        } else {
            Opcode::one_byte(first)
        };

        let ctx = ParsingContext::new(&self.config, address, opcode, prefixes);
        let kind = match self.dispatch(&mut stream, &ctx) {
            Ok(kind) => kind,
            Err(err @ DecodeError::InvalidGroupIndex { .. }) => {
                debug!(%address, opcode = ctx.opcode(), %err, "rejecting instruction");
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let inst = factory::build(&ctx, stream, kind);
        trace!(%address, node = %inst.node_name(), length = inst.length, "decoded");
        Ok(inst)
    }

    /// Decodes the instruction at `address` in a flat real-mode memory image.
    pub fn decode_at<M: CodeMemory + ?Sized>(
        &self,
        memory: &M,
        address: SegmentedAddress,
    ) -> Result<Instruction> {
        let mut reader = MemoryReader::new(memory, address);
        self.decode(&mut reader, address)
    }

    fn dispatch<R: FieldReader>(
        &self,
        stream: &mut InstructionStream<'_, R>,
        ctx: &ParsingContext,
    ) -> Result<InstKind> {
        if ctx.is_two_byte() {
            return dispatch_two_byte(stream, ctx);
        }

        let opcode = ctx.opcode_byte();
        match opcode {
            0x00..=0x3F if opcode & 0x7 <= 5 => alu::decode(stream, ctx),
            0x06 | 0x07 | 0x0E | 0x16 | 0x17 | 0x1E | 0x1F | 0x27 | 0x2F | 0x37 | 0x3F => {
                misc::decode(stream, ctx)
            }
            0x40..=0x5F | 0x91..=0x97 => Ok(register_index::decode(ctx)),
            0x60 | 0x61 => misc::decode(stream, ctx),
            0x62 => mov::decode(stream, ctx),
            0x68..=0x6B => two_byte::decode(stream, ctx),
            0x6C..=0x6F | 0xA4..=0xA7 | 0xAA..=0xAF => Ok(string::decode_string(ctx)),
            0x70..=0x7F => control::decode(stream, ctx),
            0x80..=0x83 => grp1::decode(stream, ctx),
            0x84..=0x8F | 0xA0..=0xA3 | 0xA8 | 0xA9 | 0xB0..=0xBF | 0xC4..=0xC7 => {
                mov::decode(stream, ctx)
            }
            0x90 | 0x98 | 0x99 | 0x9B..=0x9F => misc::decode(stream, ctx),
            0x9A | 0xC2 | 0xC3 | 0xCA | 0xCB | 0xE8..=0xEB => control::decode(stream, ctx),
            0xC0 | 0xC1 | 0xD0..=0xD3 => grp2::decode(stream, ctx),
            0xC8 | 0xC9 | 0xCC..=0xCF | 0xD4..=0xD7 => misc::decode(stream, ctx),
            0xD8..=0xDF => fpu::decode(stream, ctx),
            0xE0..=0xE3 => string::decode_loop(stream, ctx),
            0xE4..=0xE7 | 0xEC..=0xEF => misc::decode(stream, ctx),
            0xF4 | 0xF5 | 0xF8..=0xFD => misc::decode(stream, ctx),
            0xF6 | 0xF7 => grp3::decode(stream, ctx),
            0xFE => grp45::decode_grp4(stream, ctx, self.config.host_callbacks),
            0xFF => grp45::decode_grp5(stream, ctx),
            // 63 (ARPL) is protected-mode only; F1 is ICEBP.
            _ => Ok(InstKind::Undefined),
        }
    }
}

fn dispatch_two_byte<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<InstKind> {
    match ctx.opcode() {
        0x0F80..=0x0F8F => control::decode(stream, ctx),
        0x0F90..=0x0F9F => setcc::decode(stream, ctx),
        0x0FA0 | 0x0FA1 | 0x0FA8 | 0x0FA9 => misc::decode(stream, ctx),
        0x0FA3 | 0x0FAB | 0x0FB3 | 0x0FBB => bit_test::decode_register_form(stream, ctx),
        0x0FBA => bit_test::decode_grp8(stream, ctx),
        0x0FA4 | 0x0FA5 | 0x0FAC | 0x0FAD | 0x0FAF | 0x0FBC | 0x0FBD => {
            two_byte::decode(stream, ctx)
        }
        0x0FB2 | 0x0FB4..=0x0FB7 | 0x0FBE | 0x0FBF => mov::decode(stream, ctx),
        _ => Ok(InstKind::Undefined),
    }
}

/// Decodes one instruction from `bytes` with the real-mode defaults.
pub fn decode_bytes(bytes: &[u8], address: SegmentedAddress) -> Result<Instruction> {
    let mut reader = SliceReader::new(bytes, address);
    Decoder::default().decode(&mut reader, address)
}
