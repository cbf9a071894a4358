//! Static `(opcode family, group index) -> operation` tables.
//!
//! An empty slot is an index the family does not define. Lookups of a correctly masked 3-bit
//! ModRM.reg field can only miss on such slots; the bounds check in [`lookup`] is defense in
//! depth against a corrupted index.

use crate::error::{DecodeError, Result};
use crate::inst::{AluOp, BitTestOp, IncDec, IndirectBranch, ShiftOp, UnaryOp};
use realx86_types::SegReg;

/// Opcode row order of `00..3F`, which is also the Group 1 `/r` order.
pub const ALU_OPS: [AluOp; 8] = [
    AluOp::Add,
    AluOp::Or,
    AluOp::Adc,
    AluOp::Sbb,
    AluOp::And,
    AluOp::Sub,
    AluOp::Xor,
    AluOp::Cmp,
];

pub const GRP1: [Option<AluOp>; 8] = [
    Some(AluOp::Add),
    Some(AluOp::Or),
    Some(AluOp::Adc),
    Some(AluOp::Sbb),
    Some(AluOp::And),
    Some(AluOp::Sub),
    Some(AluOp::Xor),
    Some(AluOp::Cmp),
];

pub const GRP2: [Option<ShiftOp>; 8] = [
    Some(ShiftOp::Rol),
    Some(ShiftOp::Ror),
    Some(ShiftOp::Rcl),
    Some(ShiftOp::Rcr),
    Some(ShiftOp::Shl),
    Some(ShiftOp::Shr),
    None,
    Some(ShiftOp::Sar),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grp3Op {
    Test,
    Unary(UnaryOp),
}

pub const GRP3: [Option<Grp3Op>; 8] = [
    Some(Grp3Op::Test),
    None,
    Some(Grp3Op::Unary(UnaryOp::Not)),
    Some(Grp3Op::Unary(UnaryOp::Neg)),
    Some(Grp3Op::Unary(UnaryOp::Mul)),
    Some(Grp3Op::Unary(UnaryOp::Imul)),
    Some(Grp3Op::Unary(UnaryOp::Div)),
    Some(Grp3Op::Unary(UnaryOp::Idiv)),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grp4Op {
    IncDec(IncDec),
    Callback,
}

pub const GRP4: [Option<Grp4Op>; 8] = [
    Some(Grp4Op::IncDec(IncDec::Inc)),
    Some(Grp4Op::IncDec(IncDec::Dec)),
    None,
    None,
    None,
    None,
    None,
    Some(Grp4Op::Callback),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grp5Op {
    IncDec(IncDec),
    Branch(IndirectBranch),
    Push,
}

pub const GRP5: [Option<Grp5Op>; 8] = [
    Some(Grp5Op::IncDec(IncDec::Inc)),
    Some(Grp5Op::IncDec(IncDec::Dec)),
    Some(Grp5Op::Branch(IndirectBranch::CallNear)),
    Some(Grp5Op::Branch(IndirectBranch::CallFar)),
    Some(Grp5Op::Branch(IndirectBranch::JmpNear)),
    Some(Grp5Op::Branch(IndirectBranch::JmpFar)),
    Some(Grp5Op::Push),
    None,
];

/// `0F BA`.
pub const GRP8: [Option<BitTestOp>; 8] = [
    None,
    None,
    None,
    None,
    Some(BitTestOp::Bt),
    Some(BitTestOp::Bts),
    Some(BitTestOp::Btr),
    Some(BitTestOp::Btc),
];

/// Resolves a group index against `table`, failing on undefined slots.
pub fn lookup<T: Copy>(table: &[Option<T>; 8], opcode: u16, group: u8) -> Result<T> {
    table
        .get(usize::from(group))
        .copied()
        .flatten()
        .ok_or(DecodeError::InvalidGroupIndex { opcode, group })
}

/// Single-slot groups (`8F /0`, `C6 /0`, `C7 /0`): any other index is invalid.
pub fn require_group(opcode: u16, group: u8, expected: u8) -> Result<()> {
    if group == expected {
        Ok(())
    } else {
        Err(DecodeError::InvalidGroupIndex { opcode, group })
    }
}

/// Segment register selected by a segment-override prefix byte.
#[must_use]
pub fn segment_override(byte: u8) -> Option<SegReg> {
    match byte {
        0x26 => Some(SegReg::Es),
        0x2E => Some(SegReg::Cs),
        0x36 => Some(SegReg::Ss),
        0x3E => Some(SegReg::Ds),
        0x64 => Some(SegReg::Fs),
        0x65 => Some(SegReg::Gs),
        _ => None,
    }
}

/// Segment register pushed/popped by the one-byte `PUSH Sreg`/`POP Sreg` forms.
#[must_use]
pub fn segment_push_pop(opcode: u16) -> Option<(SegReg, bool)> {
    // (segment, is_pop)
    match opcode {
        0x06 => Some((SegReg::Es, false)),
        0x07 => Some((SegReg::Es, true)),
        0x0E => Some((SegReg::Cs, false)),
        0x16 => Some((SegReg::Ss, false)),
        0x17 => Some((SegReg::Ss, true)),
        0x1E => Some((SegReg::Ds, false)),
        0x1F => Some((SegReg::Ds, true)),
        0x0FA0 => Some((SegReg::Fs, false)),
        0x0FA1 => Some((SegReg::Fs, true)),
        0x0FA8 => Some((SegReg::Gs, false)),
        0x0FA9 => Some((SegReg::Gs, true)),
        _ => None,
    }
}
