//! `BT BTS BTR BTC`: the `0F BA` immediate group and the `0F A3/AB/B3/BB` register forms.

use crate::context::ParsingContext;
use crate::error::Result;
use crate::field::FieldReader;
use crate::inst::{BitIndex, BitTestOp, InstKind};
use crate::modrm::parse_modrm;
use crate::opcode_tables::{lookup, GRP8};
use crate::resolver::operand_width;
use crate::stream::InstructionStream;

pub(crate) fn decode_grp8<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<InstKind> {
    let modrm = parse_modrm(stream, ctx)?;
    let op = lookup(&GRP8, ctx.opcode(), modrm.group())?;
    let bit = BitIndex::Imm(stream.u8(false)?);
    Ok(InstKind::BitTest {
        op,
        width: operand_width(ctx),
        modrm,
        bit,
    })
}

pub(crate) fn decode_register_form<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<InstKind> {
    // Bits 3..4 of the second opcode byte follow the /4../7 order of 0F BA.
    let op = match (ctx.opcode_byte() >> 3) & 0x3 {
        0 => BitTestOp::Bt,
        1 => BitTestOp::Bts,
        2 => BitTestOp::Btr,
        _ => BitTestOp::Btc,
    };
    let modrm = parse_modrm(stream, ctx)?;
    Ok(InstKind::BitTest {
        op,
        width: operand_width(ctx),
        bit: BitIndex::Reg(modrm.reg_operand()),
        modrm,
    })
}
