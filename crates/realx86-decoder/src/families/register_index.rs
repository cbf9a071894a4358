//! Short forms with the register in the low opcode bits: `40..5F` and `91..97`.

use crate::context::ParsingContext;
use crate::inst::{IncDec, InstKind};
use crate::resolver::{operand_width, register_index_from_opcode};

pub(crate) fn decode(ctx: &ParsingContext) -> InstKind {
    let opcode = ctx.opcode_byte();
    let reg = register_index_from_opcode(opcode);
    let width = operand_width(ctx);
    match opcode & 0xF8 {
        0x40 => InstKind::IncDecReg {
            op: IncDec::Inc,
            width,
            reg,
        },
        0x48 => InstKind::IncDecReg {
            op: IncDec::Dec,
            width,
            reg,
        },
        0x50 => InstKind::PushReg { width, reg },
        0x58 => InstKind::PopReg { width, reg },
        // 90 never gets here: it decodes as NOP.
        _ => InstKind::XchgAcc { width, reg },
    }
}
