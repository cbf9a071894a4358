//! x87 escapes `D8..DF`. Only the addressing is decoded; the FPU operation stays in the ModRM
//! byte for the executor.

use crate::context::ParsingContext;
use crate::error::Result;
use crate::field::FieldReader;
use crate::inst::InstKind;
use crate::modrm::parse_modrm;
use crate::stream::InstructionStream;

pub(crate) fn decode<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<InstKind> {
    let modrm = parse_modrm(stream, ctx)?;
    Ok(InstKind::Fpu {
        escape: ctx.opcode_byte() & 0x7,
        modrm,
    })
}
