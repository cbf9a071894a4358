//! Direct control transfers: Jcc, JMP/CALL (relative and far) and RET/RETF.
//!
//! Branch offsets and far targets decide the successor node and are read as discriminators.

use crate::context::ParsingContext;
use crate::error::Result;
use crate::field::FieldReader;
use crate::inst::{FarPointer, Immediate, InstKind};
use crate::resolver::operand_width;
use crate::stream::InstructionStream;
use realx86_types::Cond;

pub(crate) fn decode<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<InstKind> {
    let width = operand_width(ctx);

    Ok(match ctx.opcode() {
        0x70..=0x7F => InstKind::Jcc {
            cond: Cond::from_cc(ctx.opcode_byte()),
            offset: stream.rel8()?,
        },
        0x0F80..=0x0F8F => InstKind::Jcc {
            cond: Cond::from_cc(ctx.opcode_byte()),
            offset: stream.rel_near(ctx.operand_size_32)?,
        },
        0xEB => InstKind::JmpRel {
            offset: stream.rel8()?,
        },
        0xE9 => InstKind::JmpRel {
            offset: stream.rel_near(ctx.operand_size_32)?,
        },
        0xE8 => InstKind::CallRel {
            offset: stream.rel_near(ctx.operand_size_32)?,
        },
        0xEA => InstKind::JmpFar {
            target: far_pointer(stream, ctx)?,
        },
        0x9A => InstKind::CallFar {
            target: far_pointer(stream, ctx)?,
        },
        0xC2 => InstKind::RetNear {
            width,
            pop: Some(stream.u16(false)?),
        },
        0xC3 => InstKind::RetNear { width, pop: None },
        0xCA => InstKind::RetFar {
            width,
            pop: Some(stream.u16(false)?),
        },
        0xCB => InstKind::RetFar { width, pop: None },
        _ => InstKind::Undefined,
    })
}

/// `ptr16:16` or `ptr16:32`: offset first, then the selector.
fn far_pointer<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<FarPointer> {
    let offset = if ctx.operand_size_32 {
        Immediate::U32(stream.field(true)?)
    } else {
        Immediate::U16(stream.field(true)?)
    };
    let segment = stream.u16(true)?;
    Ok(FarPointer { offset, segment })
}
