//! 186/386 additions: `IMUL` with three operands and the two-operand `0F AF` form,
//! `PUSH imm`, `SHLD`/`SHRD` and `BSF`/`BSR`.

use crate::context::ParsingContext;
use crate::error::Result;
use crate::field::FieldReader;
use crate::inst::{BitScanOp, DoubleShiftOp, InstKind, ShiftCount};
use crate::modrm::parse_modrm;
use crate::resolver::operand_width;
use crate::stream::InstructionStream;

pub(crate) fn decode<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<InstKind> {
    let width = operand_width(ctx);

    Ok(match ctx.opcode() {
        0x68 => InstKind::PushImm {
            width,
            imm: stream.immediate(width)?,
        },
        0x6A => InstKind::PushImm {
            width,
            imm: stream.immediate_s8()?,
        },
        0x69 => {
            let modrm = parse_modrm(stream, ctx)?;
            InstKind::ImulRegRmImm {
                width,
                modrm,
                imm: stream.immediate(width)?,
            }
        }
        0x6B => {
            let modrm = parse_modrm(stream, ctx)?;
            InstKind::ImulRegRmImm {
                width,
                modrm,
                imm: stream.immediate_s8()?,
            }
        }
        0x0FAF => InstKind::ImulRegRm {
            width,
            modrm: parse_modrm(stream, ctx)?,
        },
        0x0FA4 | 0x0FA5 | 0x0FAC | 0x0FAD => {
            let op = if ctx.opcode_byte() < 0xAC {
                DoubleShiftOp::Shld
            } else {
                DoubleShiftOp::Shrd
            };
            let modrm = parse_modrm(stream, ctx)?;
            let count = if ctx.opcode_byte() & 1 == 0 {
                ShiftCount::Imm(stream.u8(false)?)
            } else {
                ShiftCount::Cl
            };
            InstKind::DoubleShift {
                op,
                width,
                modrm,
                count,
            }
        }
        0x0FBC => InstKind::BitScan {
            op: BitScanOp::Bsf,
            width,
            modrm: parse_modrm(stream, ctx)?,
        },
        0x0FBD => InstKind::BitScan {
            op: BitScanOp::Bsr,
            width,
            modrm: parse_modrm(stream, ctx)?,
        },
        _ => InstKind::Undefined,
    })
}
