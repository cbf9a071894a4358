//! Group 1: `80 81 82 83`, ALU operation with an immediate source.

use crate::context::ParsingContext;
use crate::error::Result;
use crate::field::FieldReader;
use crate::inst::InstKind;
use crate::modrm::parse_modrm;
use crate::opcode_tables::{lookup, GRP1};
use crate::resolver::operand_width;
use crate::stream::InstructionStream;
use realx86_types::BitWidth;

pub(crate) fn decode<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<InstKind> {
    let modrm = parse_modrm(stream, ctx)?;
    let op = lookup(&GRP1, ctx.opcode(), modrm.group())?;

    let (width, imm) = match ctx.opcode_byte() {
        // 82 is the undocumented alias of 80.
        0x80 | 0x82 => (BitWidth::Byte8, stream.immediate(BitWidth::Byte8)?),
        0x83 => (operand_width(ctx), stream.immediate_s8()?),
        _ => {
            let width = operand_width(ctx);
            (width, stream.immediate(width)?)
        }
    };

    Ok(InstKind::Grp1 {
        op,
        width,
        modrm,
        imm,
    })
}
