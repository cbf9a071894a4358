//! `SETcc r/m8` (`0F 90..9F`).

use crate::context::ParsingContext;
use crate::error::Result;
use crate::field::FieldReader;
use crate::inst::InstKind;
use crate::modrm::parse_modrm;
use crate::stream::InstructionStream;
use realx86_types::Cond;

pub(crate) fn decode<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<InstKind> {
    let cond = Cond::from_cc(ctx.opcode_byte());
    let modrm = parse_modrm(stream, ctx)?;
    Ok(InstKind::Setcc { cond, modrm })
}
