//! Instruction node construction.
//!
//! Family dispatchers resolve an `(operation, width, form)` tuple into an [`InstKind`]; this
//! module turns it into the final [`Instruction`] and derives the node's identity name. Names
//! come from an exhaustive `match`, so adding a variant without a name does not compile.

use crate::context::ParsingContext;
use crate::field::FieldReader;
use crate::inst::{
    AluForm, BitIndex, BitScanOp, DoubleShiftOp, ExtendOp, InstKind, Instruction, PortSource,
    RelOffset, ShiftCount,
};
use crate::prefix::RepPrefix;
use crate::stream::InstructionStream;
use core::fmt;
use realx86_types::{BitWidth, SegReg};

/// Finalizes a decode attempt: length and signature come from everything the stream consumed.
pub(crate) fn build<R: FieldReader>(
    ctx: &ParsingContext,
    stream: InstructionStream<'_, R>,
    kind: InstKind,
) -> Instruction {
    let length = stream.offset();
    Instruction {
        address: ctx.address,
        opcode: ctx.opcode,
        prefixes: ctx.prefixes,
        length,
        kind,
        signature: stream.into_signature(),
    }
}

impl InstKind {
    /// Stable identity name of the node shape, e.g. `AddAccImm16` or `SubSigned16`.
    #[must_use]
    pub fn node_name(&self) -> NodeName<'_> {
        NodeName(self)
    }
}

/// Display adapter for [`InstKind::node_name`]. Formatting does not allocate.
#[derive(Debug, Clone, Copy)]
pub struct NodeName<'a>(&'a InstKind);

fn rel_bits(offset: &RelOffset) -> u32 {
    match offset {
        RelOffset::Rel8(_) => 8,
        RelOffset::Rel16(_) => 16,
        RelOffset::Rel32(_) => 32,
    }
}

fn seg_name(seg: SegReg) -> &'static str {
    match seg {
        SegReg::Es => "Es",
        SegReg::Cs => "Cs",
        SegReg::Ss => "Ss",
        SegReg::Ds => "Ds",
        SegReg::Fs => "Fs",
        SegReg::Gs => "Gs",
    }
}

fn count_name(count: &ShiftCount) -> &'static str {
    match count {
        ShiftCount::One => "One",
        ShiftCount::Cl => "Cl",
        ShiftCount::Imm(_) => "Imm",
    }
}

fn port_name(port: &PortSource) -> &'static str {
    match port {
        PortSource::Imm(_) => "Imm",
        PortSource::Dx => "Dx",
    }
}

impl fmt::Display for NodeName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            InstKind::Alu { op, width, form } => {
                let form = match form {
                    AluForm::RmReg(_) => "RmReg",
                    AluForm::RegRm(_) => "RegRm",
                    AluForm::AccImm(_) => "AccImm",
                };
                write!(f, "{}{}{}", op.name(), form, width.bits())
            }
            InstKind::Grp1 { op, width, imm, .. } => match width {
                BitWidth::Byte8 => write!(f, "{}8", op.name()),
                _ => {
                    let sign = if imm.is_sign_extended() {
                        "Signed"
                    } else {
                        "Unsigned"
                    };
                    write!(f, "{}{}{}", op.name(), sign, width.bits())
                }
            },
            InstKind::Shift {
                op, width, count, ..
            } => write!(f, "{}{}{}", op.name(), count_name(count), width.bits()),
            InstKind::TestRmImm { width, .. } => write!(f, "TestRmImm{}", width.bits()),
            InstKind::Unary { op, width, .. } => write!(f, "{}{}", op.name(), width.bits()),
            InstKind::IncDecRm { op, width, .. } => write!(f, "{}Rm{}", op.name(), width.bits()),
            InstKind::IndirectBranch { kind, width, .. } => {
                write!(f, "{}Rm{}", kind.name(), width.bits())
            }
            InstKind::PushRm { width, .. } => write!(f, "PushRm{}", width.bits()),
            InstKind::Callback { .. } => f.write_str("Callback"),
            InstKind::BitTest { op, width, bit, .. } => {
                let source = match bit {
                    BitIndex::Imm(_) => "Imm",
                    BitIndex::Reg(_) => "Reg",
                };
                write!(f, "{}{}{}", op.name(), source, width.bits())
            }
            InstKind::Setcc { cond, .. } => write!(f, "Set{}", cond.suffix()),
            InstKind::Loop { kind, width, .. } => write!(f, "{}{}", kind.name(), width.bits()),
            InstKind::IncDecReg { op, width, .. } => {
                write!(f, "{}Reg{}", op.name(), width.bits())
            }
            InstKind::PushReg { width, .. } => write!(f, "PushReg{}", width.bits()),
            InstKind::PopReg { width, .. } => write!(f, "PopReg{}", width.bits()),
            InstKind::XchgAcc { width, .. } => write!(f, "XchgAcc{}", width.bits()),
            InstKind::String { op, width, rep, .. } => {
                let rep = match rep {
                    Some(RepPrefix::Rep) => "Rep",
                    Some(RepPrefix::Repne) => "Repne",
                    None => "",
                };
                write!(f, "{}{}{}", rep, op.name(), width.bits())
            }
            InstKind::Nop => f.write_str("Nop"),
            InstKind::Hlt => f.write_str("Hlt"),
            InstKind::Wait => f.write_str("Wait"),
            InstKind::Flag(op) => f.write_str(op.name()),
            InstKind::Bcd(op) => f.write_str(op.name()),
            InstKind::Aam { .. } => f.write_str("Aam"),
            InstKind::Aad { .. } => f.write_str("Aad"),
            InstKind::Salc => f.write_str("Salc"),
            InstKind::Xlat { .. } => f.write_str("Xlat"),
            InstKind::Cbw { width } => match width {
                BitWidth::Dword32 => f.write_str("Cwde"),
                _ => f.write_str("Cbw"),
            },
            InstKind::Cwd { width } => match width {
                BitWidth::Dword32 => f.write_str("Cdq"),
                _ => f.write_str("Cwd"),
            },
            InstKind::Pushf { width } => write!(f, "Pushf{}", width.bits()),
            InstKind::Popf { width } => write!(f, "Popf{}", width.bits()),
            InstKind::Sahf => f.write_str("Sahf"),
            InstKind::Lahf => f.write_str("Lahf"),
            InstKind::Pusha { width } => write!(f, "Pusha{}", width.bits()),
            InstKind::Popa { width } => write!(f, "Popa{}", width.bits()),
            InstKind::Enter { width, .. } => write!(f, "Enter{}", width.bits()),
            InstKind::Leave { width } => write!(f, "Leave{}", width.bits()),
            InstKind::Int3 => f.write_str("Int3"),
            InstKind::Int { .. } => f.write_str("Int"),
            InstKind::Into => f.write_str("Into"),
            InstKind::Iret { width } => write!(f, "Iret{}", width.bits()),
            InstKind::PushSeg { width, seg } => write!(f, "Push{}{}", seg_name(*seg), width.bits()),
            InstKind::PopSeg { width, seg } => write!(f, "Pop{}{}", seg_name(*seg), width.bits()),
            InstKind::In { width, port } => write!(f, "In{}{}", port_name(port), width.bits()),
            InstKind::Out { width, port } => write!(f, "Out{}{}", port_name(port), width.bits()),
            InstKind::MovRmReg { width, .. } => write!(f, "MovRmReg{}", width.bits()),
            InstKind::MovRegRm { width, .. } => write!(f, "MovRegRm{}", width.bits()),
            InstKind::MovRmSreg { .. } => f.write_str("MovRmSreg"),
            InstKind::MovSregRm { .. } => f.write_str("MovSregRm"),
            InstKind::Lea { width, .. } => write!(f, "Lea{}", width.bits()),
            InstKind::PopRm { width, .. } => write!(f, "PopRm{}", width.bits()),
            InstKind::MovAccMoffs { width, .. } => write!(f, "MovAccMoffs{}", width.bits()),
            InstKind::MovMoffsAcc { width, .. } => write!(f, "MovMoffsAcc{}", width.bits()),
            InstKind::MovRegImm { width, .. } => write!(f, "MovRegImm{}", width.bits()),
            InstKind::MovRmImm { width, .. } => write!(f, "MovRmImm{}", width.bits()),
            InstKind::TestRmReg { width, .. } => write!(f, "TestRmReg{}", width.bits()),
            InstKind::TestAccImm { width, .. } => write!(f, "TestAccImm{}", width.bits()),
            InstKind::XchgRmReg { width, .. } => write!(f, "XchgRmReg{}", width.bits()),
            InstKind::LoadFarPointer { seg, width, .. } => {
                let mnemonic = match seg {
                    SegReg::Es => "Les",
                    SegReg::Cs => "Lcs",
                    SegReg::Ss => "Lss",
                    SegReg::Ds => "Lds",
                    SegReg::Fs => "Lfs",
                    SegReg::Gs => "Lgs",
                };
                write!(f, "{}{}", mnemonic, width.bits())
            }
            InstKind::MovExtend {
                op, source, width, ..
            } => {
                let op = match op {
                    ExtendOp::Movzx => "Movzx",
                    ExtendOp::Movsx => "Movsx",
                };
                write!(f, "{}{}To{}", op, source.bits(), width.bits())
            }
            InstKind::Bound { width, .. } => write!(f, "Bound{}", width.bits()),
            InstKind::Jcc { cond, offset } => {
                write!(f, "J{}{}", cond.suffix(), rel_bits(offset))
            }
            InstKind::JmpRel { offset } => write!(f, "JmpRel{}", rel_bits(offset)),
            InstKind::CallRel { offset } => write!(f, "CallRel{}", rel_bits(offset)),
            InstKind::JmpFar { target } => {
                write!(f, "JmpFar{}", target.offset.encoded_width().bits())
            }
            InstKind::CallFar { target } => {
                write!(f, "CallFar{}", target.offset.encoded_width().bits())
            }
            InstKind::RetNear { width, pop } => {
                let imm = if pop.is_some() { "Imm" } else { "" };
                write!(f, "RetNear{}{}", imm, width.bits())
            }
            InstKind::RetFar { width, pop } => {
                let imm = if pop.is_some() { "Imm" } else { "" };
                write!(f, "RetFar{}{}", imm, width.bits())
            }
            InstKind::ImulRegRm { width, .. } => write!(f, "ImulRegRm{}", width.bits()),
            InstKind::ImulRegRmImm { width, imm, .. } => {
                let sign = if imm.is_sign_extended() { "Signed" } else { "" };
                write!(f, "ImulRegRm{}Imm{}", sign, width.bits())
            }
            InstKind::PushImm { width, imm } => {
                let sign = if imm.is_sign_extended() { "Signed" } else { "" };
                write!(f, "Push{}Imm{}", sign, width.bits())
            }
            InstKind::DoubleShift {
                op, width, count, ..
            } => {
                let op = match op {
                    DoubleShiftOp::Shld => "Shld",
                    DoubleShiftOp::Shrd => "Shrd",
                };
                write!(f, "{}{}{}", op, count_name(count), width.bits())
            }
            InstKind::BitScan { op, width, .. } => {
                let op = match op {
                    BitScanOp::Bsf => "Bsf",
                    BitScanOp::Bsr => "Bsr",
                };
                write!(f, "{}{}", op, width.bits())
            }
            InstKind::Fpu { escape, .. } => write!(f, "Fpu{:X}", 0xD8 | escape),
            InstKind::Undefined => f.write_str("Undefined"),
        }
    }
}
