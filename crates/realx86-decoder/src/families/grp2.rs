//! Group 2: shifts and rotates (`C0 C1 D0 D1 D2 D3`).

use crate::context::ParsingContext;
use crate::error::Result;
use crate::field::FieldReader;
use crate::inst::{InstKind, ShiftCount};
use crate::modrm::parse_modrm;
use crate::opcode_tables::{lookup, GRP2};
use crate::resolver::resolve_operand_width;
use crate::stream::InstructionStream;

pub(crate) fn decode<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<InstKind> {
    let opcode = ctx.opcode_byte();
    let modrm = parse_modrm(stream, ctx)?;
    let op = lookup(&GRP2, ctx.opcode(), modrm.group())?;
    let width = resolve_operand_width(ctx, opcode);

    let count = match opcode {
        0xC0 | 0xC1 => ShiftCount::Imm(stream.u8(false)?),
        0xD0 | 0xD1 => ShiftCount::One,
        _ => ShiftCount::Cl,
    };

    Ok(InstKind::Shift {
        op,
        width,
        modrm,
        count,
    })
}
