//! Operand-less and fixed-operand forms: flag and BCD ops, stack frame helpers, interrupts,
//! segment push/pop and port I/O.

use crate::context::ParsingContext;
use crate::error::Result;
use crate::field::FieldReader;
use crate::inst::{BcdOp, FlagOp, InstKind, PortSource};
use crate::opcode_tables::segment_push_pop;
use crate::resolver::{operand_width, resolve_operand_width, segment_override_or_default};
use crate::stream::InstructionStream;
use realx86_types::SegReg;

pub(crate) fn decode<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<InstKind> {
    let width = operand_width(ctx);

    if let Some((seg, is_pop)) = segment_push_pop(ctx.opcode()) {
        return Ok(if is_pop {
            InstKind::PopSeg { width, seg }
        } else {
            InstKind::PushSeg { width, seg }
        });
    }

    Ok(match ctx.opcode() {
        0x27 => InstKind::Bcd(BcdOp::Daa),
        0x2F => InstKind::Bcd(BcdOp::Das),
        0x37 => InstKind::Bcd(BcdOp::Aaa),
        0x3F => InstKind::Bcd(BcdOp::Aas),
        0x60 => InstKind::Pusha { width },
        0x61 => InstKind::Popa { width },
        0x90 => InstKind::Nop,
        0x98 => InstKind::Cbw { width },
        0x99 => InstKind::Cwd { width },
        0x9B => InstKind::Wait,
        0x9C => InstKind::Pushf { width },
        0x9D => InstKind::Popf { width },
        0x9E => InstKind::Sahf,
        0x9F => InstKind::Lahf,
        0xC8 => {
            let frame_size = stream.u16(false)?;
            let nesting = stream.u8(false)?;
            InstKind::Enter {
                width,
                frame_size,
                nesting,
            }
        }
        0xC9 => InstKind::Leave { width },
        0xCC => InstKind::Int3,
        // The vector picks the handler, so it discriminates.
        0xCD => InstKind::Int {
            vector: stream.u8(true)?,
        },
        0xCE => InstKind::Into,
        0xCF => InstKind::Iret { width },
        0xD4 => InstKind::Aam {
            base: stream.u8(false)?,
        },
        0xD5 => InstKind::Aad {
            base: stream.u8(false)?,
        },
        0xD6 => InstKind::Salc,
        0xD7 => InstKind::Xlat {
            segment: segment_override_or_default(ctx, SegReg::Ds),
            address_width: ctx.address_width,
        },
        0xE4..=0xE7 | 0xEC..=0xEF => decode_io(stream, ctx)?,
        0xF4 => InstKind::Hlt,
        0xF5 => InstKind::Flag(FlagOp::Cmc),
        0xF8 => InstKind::Flag(FlagOp::Clc),
        0xF9 => InstKind::Flag(FlagOp::Stc),
        0xFA => InstKind::Flag(FlagOp::Cli),
        0xFB => InstKind::Flag(FlagOp::Sti),
        0xFC => InstKind::Flag(FlagOp::Cld),
        0xFD => InstKind::Flag(FlagOp::Std),
        _ => InstKind::Undefined,
    })
}

/// `E4..E7` take an immediate port, `EC..EF` use DX. Bit 1 set means OUT.
fn decode_io<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<InstKind> {
    let opcode = ctx.opcode_byte();
    let width = resolve_operand_width(ctx, opcode);
    let port = if opcode & 0x08 == 0 {
        PortSource::Imm(stream.u8(false)?)
    } else {
        PortSource::Dx
    };
    Ok(if opcode & 0x02 == 0 {
        InstKind::In { width, port }
    } else {
        InstKind::Out { width, port }
    })
}
