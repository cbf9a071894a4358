//! `ADD OR ADC SBB AND SUB XOR CMP` in the `00..3F` rows (low three bits `0..=5`).

use crate::context::ParsingContext;
use crate::error::Result;
use crate::field::FieldReader;
use crate::inst::{AluForm, InstKind};
use crate::modrm::parse_modrm;
use crate::opcode_tables::ALU_OPS;
use crate::resolver::{direction_to_reg, has_modrm, resolve_operand_width};
use crate::stream::InstructionStream;

pub(crate) fn decode<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<InstKind> {
    let opcode = ctx.opcode_byte();
    let op = ALU_OPS[usize::from((opcode >> 3) & 0x7)];
    let width = resolve_operand_width(ctx, opcode);

    let form = if has_modrm(opcode) {
        let modrm = parse_modrm(stream, ctx)?;
        if direction_to_reg(opcode) {
            AluForm::RegRm(modrm)
        } else {
            AluForm::RmReg(modrm)
        }
    } else {
        AluForm::AccImm(stream.immediate(width)?)
    };

    Ok(InstKind::Alu { op, width, form })
}
