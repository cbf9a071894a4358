//! Group 4 (`FE`) and Group 5 (`FF`).

use crate::context::ParsingContext;
use crate::error::{DecodeError, Result};
use crate::field::FieldReader;
use crate::inst::{IndirectBranch, InstKind};
use crate::modrm::parse_modrm;
use crate::opcode_tables::{lookup, Grp4Op, Grp5Op, GRP4, GRP5};
use crate::resolver::operand_width;
use crate::stream::InstructionStream;
use realx86_types::BitWidth;

/// `FE /0 /1` byte INC/DEC, plus the `FE 38 ib` host callback when `host_callbacks` is set.
pub(crate) fn decode_grp4<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
    host_callbacks: bool,
) -> Result<InstKind> {
    let modrm = parse_modrm(stream, ctx)?;
    match lookup(&GRP4, ctx.opcode(), modrm.group())? {
        Grp4Op::IncDec(op) => Ok(InstKind::IncDecRm {
            op,
            width: BitWidth::Byte8,
            modrm,
        }),
        Grp4Op::Callback if host_callbacks => {
            // The identifier selects the host routine, so it discriminates.
            let id = stream.u8(true)?;
            Ok(InstKind::Callback { modrm, id })
        }
        Grp4Op::Callback => Err(DecodeError::InvalidGroupIndex {
            opcode: ctx.opcode(),
            group: modrm.group(),
        }),
    }
}

pub(crate) fn decode_grp5<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<InstKind> {
    let modrm = parse_modrm(stream, ctx)?;
    let width = operand_width(ctx);
    Ok(match lookup(&GRP5, ctx.opcode(), modrm.group())? {
        Grp5Op::IncDec(op) => InstKind::IncDecRm { op, width, modrm },
        // A far pointer has to come from memory.
        Grp5Op::Branch(IndirectBranch::CallFar | IndirectBranch::JmpFar)
            if modrm.is_register() =>
        {
            InstKind::Undefined
        }
        Grp5Op::Branch(kind) => InstKind::IndirectBranch { kind, width, modrm },
        Grp5Op::Push => InstKind::PushRm { width, modrm },
    })
}
