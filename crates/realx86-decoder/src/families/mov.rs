//! Data movement: MOV in all its forms, LEA, XCHG, TEST, far-pointer loads, MOVZX/MOVSX and
//! BOUND.
//!
//! LEA, BOUND and the far-pointer loads need a memory operand; their register forms are
//! undefined.

use crate::context::ParsingContext;
use crate::error::{DecodeError, Result};
use crate::field::FieldReader;
use crate::inst::{ExtendOp, InstKind};
use crate::modrm::parse_modrm;
use crate::opcode_tables::require_group;
use crate::resolver::{
    bit_is_set, operand_width, register_index_from_opcode, resolve_operand_width, resolve_width,
    segment_override_or_default,
};
use crate::stream::InstructionStream;
use realx86_types::{BitWidth, SegReg};

pub(crate) fn decode<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<InstKind> {
    let opcode = ctx.opcode_byte();
    let width = resolve_operand_width(ctx, opcode);

    Ok(match ctx.opcode() {
        0x84 | 0x85 => InstKind::TestRmReg {
            width,
            modrm: parse_modrm(stream, ctx)?,
        },
        0x86 | 0x87 => InstKind::XchgRmReg {
            width,
            modrm: parse_modrm(stream, ctx)?,
        },
        0x88 | 0x89 => InstKind::MovRmReg {
            width,
            modrm: parse_modrm(stream, ctx)?,
        },
        0x8A | 0x8B => InstKind::MovRegRm {
            width,
            modrm: parse_modrm(stream, ctx)?,
        },
        0x8C | 0x8E => {
            let modrm = parse_modrm(stream, ctx)?;
            let seg = SegReg::from_index(modrm.reg).ok_or(DecodeError::InvalidGroupIndex {
                opcode: ctx.opcode(),
                group: modrm.group(),
            })?;
            if opcode == 0x8C {
                InstKind::MovRmSreg { seg, modrm }
            } else {
                InstKind::MovSregRm { seg, modrm }
            }
        }
        0x8D => {
            let modrm = parse_modrm(stream, ctx)?;
            if modrm.is_register() {
                return Ok(InstKind::Undefined);
            }
            InstKind::Lea {
                width: operand_width(ctx),
                modrm,
            }
        }
        0x8F => {
            let modrm = parse_modrm(stream, ctx)?;
            require_group(ctx.opcode(), modrm.group(), 0)?;
            InstKind::PopRm {
                width: operand_width(ctx),
                modrm,
            }
        }
        0xA0..=0xA3 => {
            let segment = segment_override_or_default(ctx, SegReg::Ds);
            let offset = stream.immediate(ctx.address_width)?;
            if bit_is_set(opcode, 1) {
                InstKind::MovMoffsAcc {
                    width,
                    segment,
                    offset,
                }
            } else {
                InstKind::MovAccMoffs {
                    width,
                    segment,
                    offset,
                }
            }
        }
        0xA8 | 0xA9 => InstKind::TestAccImm {
            width,
            imm: stream.immediate(width)?,
        },
        0xB0..=0xBF => {
            // B0..B7 are byte registers, B8..BF full width.
            let width = resolve_width(!bit_is_set(opcode, 3), ctx.operand_size_32);
            InstKind::MovRegImm {
                width,
                reg: register_index_from_opcode(opcode),
                imm: stream.immediate(width)?,
            }
        }
        0xC6 | 0xC7 => {
            let modrm = parse_modrm(stream, ctx)?;
            require_group(ctx.opcode(), modrm.group(), 0)?;
            InstKind::MovRmImm {
                width,
                modrm,
                imm: stream.immediate(width)?,
            }
        }
        0xC4 => load_far_pointer(stream, ctx, SegReg::Es)?,
        0xC5 => load_far_pointer(stream, ctx, SegReg::Ds)?,
        0x0FB2 => load_far_pointer(stream, ctx, SegReg::Ss)?,
        0x0FB4 => load_far_pointer(stream, ctx, SegReg::Fs)?,
        0x0FB5 => load_far_pointer(stream, ctx, SegReg::Gs)?,
        0x0FB6 | 0x0FB7 | 0x0FBE | 0x0FBF => {
            let op = if bit_is_set(opcode, 3) {
                ExtendOp::Movsx
            } else {
                ExtendOp::Movzx
            };
            let source = if bit_is_set(opcode, 0) {
                BitWidth::Word16
            } else {
                BitWidth::Byte8
            };
            InstKind::MovExtend {
                op,
                source,
                width: operand_width(ctx),
                modrm: parse_modrm(stream, ctx)?,
            }
        }
        0x62 => {
            let modrm = parse_modrm(stream, ctx)?;
            if modrm.is_register() {
                return Ok(InstKind::Undefined);
            }
            InstKind::Bound {
                width: operand_width(ctx),
                modrm,
            }
        }
        _ => InstKind::Undefined,
    })
}

fn load_far_pointer<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
    seg: SegReg,
) -> Result<InstKind> {
    let modrm = parse_modrm(stream, ctx)?;
    if modrm.is_register() {
        return Ok(InstKind::Undefined);
    }
    Ok(InstKind::LoadFarPointer {
        seg,
        width: operand_width(ctx),
        modrm,
    })
}
