//! Group 3: `F6`/`F7`.

use crate::context::ParsingContext;
use crate::error::Result;
use crate::field::FieldReader;
use crate::inst::InstKind;
use crate::modrm::{parse_modrm, ModRm};
use crate::opcode_tables::{lookup, Grp3Op, GRP3};
use crate::resolver::resolve_operand_width;
use crate::stream::InstructionStream;
use realx86_types::BitWidth;

pub(crate) fn decode<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<InstKind> {
    let modrm = parse_modrm(stream, ctx)?;
    let width = resolve_operand_width(ctx, ctx.opcode_byte());

    match lookup(&GRP3, ctx.opcode(), modrm.group())? {
        Grp3Op::Test => decode_test(stream, width, modrm),
        Grp3Op::Unary(op) => Ok(InstKind::Unary { op, width, modrm }),
    }
}

/// `TEST r/m, imm` is the only Group 3 member with an immediate.
fn decode_test<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    width: BitWidth,
    modrm: ModRm,
) -> Result<InstKind> {
    let imm = stream.immediate(width)?;
    Ok(InstKind::TestRmImm { width, modrm, imm })
}
