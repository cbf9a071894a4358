//! Operand-width, segment and register-selector helpers shared by the family dispatchers.

use crate::context::ParsingContext;
use realx86_types::{BitWidth, Gpr, SegReg};

/// Byte mode wins; otherwise the operand-size flag picks 32 over 16 bits.
#[must_use]
pub const fn resolve_width(byte_mode: bool, operand_size_32: bool) -> BitWidth {
    if byte_mode {
        BitWidth::Byte8
    } else if operand_size_32 {
        BitWidth::Dword32
    } else {
        BitWidth::Word16
    }
}

/// Width of an operand that is never 8-bit (register-index ops, PUSH/POP, far pointers, ...).
#[must_use]
pub fn operand_width(ctx: &ParsingContext) -> BitWidth {
    resolve_width(false, ctx.operand_size_32)
}

/// Width selected by bit 0 (the `w` bit) of `opcode` and the context's operand size.
#[must_use]
pub fn resolve_operand_width(ctx: &ParsingContext, opcode: u8) -> BitWidth {
    resolve_width(is_byte_mode(opcode), ctx.operand_size_32)
}

/// The prefix-supplied segment, or `default` when the instruction carries none.
#[must_use]
pub fn segment_override_or_default(ctx: &ParsingContext, default: SegReg) -> SegReg {
    ctx.segment_override.unwrap_or(default)
}

/// Register selector embedded in the low three bits of short-form opcodes.
#[must_use]
pub const fn register_index_from_opcode(opcode: u8) -> Gpr {
    Gpr::from_u3(opcode)
}

#[must_use]
pub const fn bit_is_set(opcode: u8, bit: u8) -> bool {
    opcode & (1 << bit) != 0
}

/// `w` bit clear.
#[must_use]
pub const fn is_byte_mode(opcode: u8) -> bool {
    !bit_is_set(opcode, 0)
}

/// ALU family: bit 2 clear means a ModRM byte follows.
#[must_use]
pub const fn has_modrm(opcode: u8) -> bool {
    !bit_is_set(opcode, 2)
}

/// `d` bit: set when the ModRM.reg operand is the destination.
#[must_use]
pub const fn direction_to_reg(opcode: u8) -> bool {
    bit_is_set(opcode, 1)
}
