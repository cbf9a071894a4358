//! String instructions and the `E0..E3` counter loops.
//!
//! Both families count through (E)CX and walk (E)SI/(E)DI, so their register width follows the
//! effective *address* size, not the operand size.

use crate::context::ParsingContext;
use crate::error::Result;
use crate::field::FieldReader;
use crate::inst::{InstKind, LoopKind, StringOp};
use crate::resolver::{resolve_operand_width, segment_override_or_default};
use crate::stream::InstructionStream;
use realx86_types::SegReg;

pub(crate) fn decode_string(ctx: &ParsingContext) -> InstKind {
    let opcode = ctx.opcode_byte();
    let op = match opcode & 0xFE {
        0x6C => StringOp::Ins,
        0x6E => StringOp::Outs,
        0xA4 => StringOp::Movs,
        0xA6 => StringOp::Cmps,
        0xAA => StringOp::Stos,
        0xAC => StringOp::Lods,
        _ => StringOp::Scas,
    };
    InstKind::String {
        op,
        width: resolve_operand_width(ctx, opcode),
        segment: op
            .reads_source()
            .then(|| segment_override_or_default(ctx, SegReg::Ds)),
        address_width: ctx.address_width,
        rep: ctx.prefixes.rep(),
    }
}

pub(crate) fn decode_loop<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<InstKind> {
    let kind = match ctx.opcode_byte() {
        0xE0 => LoopKind::Loopnz,
        0xE1 => LoopKind::Loopz,
        0xE2 => LoopKind::Loop,
        _ => LoopKind::Jcxz,
    };
    let offset = stream.rel8()?;
    Ok(InstKind::Loop {
        kind,
        width: ctx.address_width,
        offset,
    })
}
