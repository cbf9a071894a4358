//! Decoded instruction model.
//!
//! Every instruction shape the decoder can produce is a variant of [`InstKind`]; the operation,
//! width and operand form are plain enum fields so consumers can `match` exhaustively instead
//! of looking node types up by name.

use crate::context::Opcode;
use crate::factory::NodeName;
use crate::field::Field;
use crate::modrm::ModRm;
use crate::prefix::{Prefixes, RepPrefix};
use crate::signature::Signature;
use realx86_types::{BitWidth, Cond, Gpr, SegReg, SegmentedAddress};

/// The eight classic ALU operations, in ModRM.reg / opcode-row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Or,
    Adc,
    Sbb,
    And,
    Sub,
    Xor,
    Cmp,
}

impl AluOp {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            AluOp::Add => "Add",
            AluOp::Or => "Or",
            AluOp::Adc => "Adc",
            AluOp::Sbb => "Sbb",
            AluOp::And => "And",
            AluOp::Sub => "Sub",
            AluOp::Xor => "Xor",
            AluOp::Cmp => "Cmp",
        }
    }

    /// `CMP` only sets flags.
    #[must_use]
    pub const fn writes_destination(self) -> bool {
        !matches!(self, AluOp::Cmp)
    }
}

/// Operand form of the `00..3F` ALU opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluForm {
    /// `op r/m, reg` (d = 0).
    RmReg(ModRm),
    /// `op reg, r/m` (d = 1).
    RegRm(ModRm),
    /// `op AL/AX/EAX, imm`.
    AccImm(Immediate),
}

/// An immediate operand as encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Immediate {
    U8(Field<u8>),
    /// 8-bit immediate sign-extended to the operand width.
    S8(Field<i8>),
    U16(Field<u16>),
    U32(Field<u32>),
}

impl Immediate {
    /// The operand value at `width`, sign-extending [`Immediate::S8`].
    #[must_use]
    pub fn value(&self, width: BitWidth) -> u32 {
        let raw = match self {
            Immediate::U8(f) => u32::from(f.value),
            Immediate::S8(f) => i32::from(f.value) as u32,
            Immediate::U16(f) => u32::from(f.value),
            Immediate::U32(f) => f.value,
        };
        width.truncate(raw)
    }

    #[must_use]
    pub fn is_sign_extended(&self) -> bool {
        matches!(self, Immediate::S8(_))
    }

    /// Width of the encoded field (not of the operand).
    #[must_use]
    pub fn encoded_width(&self) -> BitWidth {
        match self {
            Immediate::U8(_) | Immediate::S8(_) => BitWidth::Byte8,
            Immediate::U16(_) => BitWidth::Word16,
            Immediate::U32(_) => BitWidth::Dword32,
        }
    }

    #[must_use]
    pub fn physical_address(&self) -> u32 {
        match self {
            Immediate::U8(f) => f.physical_address,
            Immediate::S8(f) => f.physical_address,
            Immediate::U16(f) => f.physical_address,
            Immediate::U32(f) => f.physical_address,
        }
    }
}

/// Group 2 operations, in ModRM.reg order (`/6` is unused).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftOp {
    Rol,
    Ror,
    Rcl,
    Rcr,
    Shl,
    Shr,
    Sar,
}

impl ShiftOp {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ShiftOp::Rol => "Rol",
            ShiftOp::Ror => "Ror",
            ShiftOp::Rcl => "Rcl",
            ShiftOp::Rcr => "Rcr",
            ShiftOp::Shl => "Shl",
            ShiftOp::Shr => "Shr",
            ShiftOp::Sar => "Sar",
        }
    }
}

/// Where a shift/rotate takes its count from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftCount {
    One,
    Cl,
    Imm(Field<u8>),
}

/// Group 3 operations other than `TEST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
    /// Unsigned multiply into the accumulator.
    Mul,
    /// Signed multiply into the accumulator.
    Imul,
    Div,
    Idiv,
}

impl UnaryOp {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            UnaryOp::Not => "Not",
            UnaryOp::Neg => "Neg",
            UnaryOp::Mul => "Mul",
            UnaryOp::Imul => "Imul",
            UnaryOp::Div => "Div",
            UnaryOp::Idiv => "Idiv",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncDec {
    Inc,
    Dec,
}

impl IncDec {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            IncDec::Inc => "Inc",
            IncDec::Dec => "Dec",
        }
    }
}

/// Indirect control transfers of Group 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndirectBranch {
    CallNear,
    CallFar,
    JmpNear,
    JmpFar,
}

impl IndirectBranch {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            IndirectBranch::CallNear => "CallNear",
            IndirectBranch::CallFar => "CallFar",
            IndirectBranch::JmpNear => "JmpNear",
            IndirectBranch::JmpFar => "JmpFar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitTestOp {
    Bt,
    Bts,
    Btr,
    Btc,
}

impl BitTestOp {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BitTestOp::Bt => "Bt",
            BitTestOp::Bts => "Bts",
            BitTestOp::Btr => "Btr",
            BitTestOp::Btc => "Btc",
        }
    }
}

/// Bit offset source of the bit-test instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitIndex {
    Imm(Field<u8>),
    Reg(Gpr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringOp {
    Movs,
    Cmps,
    Stos,
    Lods,
    Scas,
    Ins,
    Outs,
}

impl StringOp {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            StringOp::Movs => "Movs",
            StringOp::Cmps => "Cmps",
            StringOp::Stos => "Stos",
            StringOp::Lods => "Lods",
            StringOp::Scas => "Scas",
            StringOp::Ins => "Ins",
            StringOp::Outs => "Outs",
        }
    }

    /// Whether the operation reads `seg:(E)SI` (and so honors segment overrides).
    #[must_use]
    pub const fn reads_source(self) -> bool {
        matches!(
            self,
            StringOp::Movs | StringOp::Cmps | StringOp::Lods | StringOp::Outs
        )
    }
}

/// `E0..E3`: counter-driven short branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    /// Decrement the counter, branch while non-zero and ZF = 0.
    Loopnz,
    /// Decrement the counter, branch while non-zero and ZF = 1.
    Loopz,
    Loop,
    /// Branch if the counter is zero (no decrement).
    Jcxz,
}

impl LoopKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            LoopKind::Loopnz => "Loopnz",
            LoopKind::Loopz => "Loopz",
            LoopKind::Loop => "Loop",
            LoopKind::Jcxz => "Jcxz",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagOp {
    Cmc,
    Clc,
    Stc,
    Cli,
    Sti,
    Cld,
    Std,
}

impl FlagOp {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            FlagOp::Cmc => "Cmc",
            FlagOp::Clc => "Clc",
            FlagOp::Stc => "Stc",
            FlagOp::Cli => "Cli",
            FlagOp::Sti => "Sti",
            FlagOp::Cld => "Cld",
            FlagOp::Std => "Std",
        }
    }
}

/// Decimal adjust instructions without operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BcdOp {
    Daa,
    Das,
    Aaa,
    Aas,
}

impl BcdOp {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BcdOp::Daa => "Daa",
            BcdOp::Das => "Das",
            BcdOp::Aaa => "Aaa",
            BcdOp::Aas => "Aas",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortSource {
    Imm(Field<u8>),
    Dx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoubleShiftOp {
    Shld,
    Shrd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitScanOp {
    Bsf,
    Bsr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtendOp {
    Movzx,
    Movsx,
}

/// A relative branch displacement. Always a discriminator: it decides the successor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOffset {
    Rel8(Field<i8>),
    Rel16(Field<i16>),
    Rel32(Field<i32>),
}

impl RelOffset {
    #[must_use]
    pub fn value(&self) -> i32 {
        match self {
            RelOffset::Rel8(f) => i32::from(f.value),
            RelOffset::Rel16(f) => i32::from(f.value),
            RelOffset::Rel32(f) => f.value,
        }
    }
}

/// `ptr16:16` / `ptr16:32` operand of direct far `JMP`/`CALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FarPointer {
    /// [`Immediate::U16`] or [`Immediate::U32`] per operand size.
    pub offset: Immediate,
    pub segment: Field<u16>,
}

/// One decoded instruction shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstKind {
    /// `00..3D`: ADD/OR/ADC/SBB/AND/SUB/XOR/CMP.
    Alu {
        op: AluOp,
        width: BitWidth,
        form: AluForm,
    },
    /// `80..83`: ALU operation with an immediate source.
    Grp1 {
        op: AluOp,
        width: BitWidth,
        modrm: ModRm,
        imm: Immediate,
    },
    /// `C0 C1 D0..D3`.
    Shift {
        op: ShiftOp,
        width: BitWidth,
        modrm: ModRm,
        count: ShiftCount,
    },
    /// `F6/F7 /0`.
    TestRmImm {
        width: BitWidth,
        modrm: ModRm,
        imm: Immediate,
    },
    /// `F6/F7 /2../7`.
    Unary {
        op: UnaryOp,
        width: BitWidth,
        modrm: ModRm,
    },
    /// `FE/FF /0 /1`.
    IncDecRm {
        op: IncDec,
        width: BitWidth,
        modrm: ModRm,
    },
    /// `FF /2 /3 /4 /5`.
    IndirectBranch {
        kind: IndirectBranch,
        width: BitWidth,
        modrm: ModRm,
    },
    /// `FF /6`.
    PushRm { width: BitWidth, modrm: ModRm },
    /// `FE 38 ib`: host callback (emulator extension, not part of the x86 ISA).
    Callback { modrm: ModRm, id: Field<u8> },
    /// `0F BA /4../7 ib` and `0F A3/AB/B3/BB`.
    BitTest {
        op: BitTestOp,
        width: BitWidth,
        modrm: ModRm,
        bit: BitIndex,
    },
    /// `0F 90..9F`: byte-sized r/m destination.
    Setcc { cond: Cond, modrm: ModRm },
    /// `E0..E3`. `width` is the counter width (the address size).
    Loop {
        kind: LoopKind,
        width: BitWidth,
        offset: RelOffset,
    },
    /// `40..4F`.
    IncDecReg {
        op: IncDec,
        width: BitWidth,
        reg: Gpr,
    },
    /// `50..57`.
    PushReg { width: BitWidth, reg: Gpr },
    /// `58..5F`.
    PopReg { width: BitWidth, reg: Gpr },
    /// `91..97`: exchange with the accumulator.
    XchgAcc { width: BitWidth, reg: Gpr },
    /// `6C..6F A4..A7 AA..AF`.
    String {
        op: StringOp,
        width: BitWidth,
        /// Segment of the `(E)SI` source: the override or DS. `None` for the forms without a
        /// source operand (STOS, SCAS, INS). The destination is always `ES:(E)DI`.
        segment: Option<SegReg>,
        address_width: BitWidth,
        rep: Option<RepPrefix>,
    },
    Nop,
    Hlt,
    Wait,
    Flag(FlagOp),
    Bcd(BcdOp),
    /// `D4 ib`.
    Aam { base: Field<u8> },
    /// `D5 ib`.
    Aad { base: Field<u8> },
    /// `D6` (undocumented): AL = CF ? 0xFF : 0.
    Salc,
    /// `D7`.
    Xlat {
        segment: SegReg,
        address_width: BitWidth,
    },
    /// `98`: CBW (16) / CWDE (32).
    Cbw { width: BitWidth },
    /// `99`: CWD (16) / CDQ (32).
    Cwd { width: BitWidth },
    Pushf { width: BitWidth },
    Popf { width: BitWidth },
    Sahf,
    Lahf,
    Pusha { width: BitWidth },
    Popa { width: BitWidth },
    /// `C8 iw ib`.
    Enter {
        width: BitWidth,
        frame_size: Field<u16>,
        nesting: Field<u8>,
    },
    Leave { width: BitWidth },
    Int3,
    /// `CD ib`.
    Int { vector: Field<u8> },
    Into,
    Iret { width: BitWidth },
    PushSeg { width: BitWidth, seg: SegReg },
    PopSeg { width: BitWidth, seg: SegReg },
    /// `E4 E5 EC ED`.
    In { width: BitWidth, port: PortSource },
    /// `E6 E7 EE EF`.
    Out { width: BitWidth, port: PortSource },
    /// `88/89`.
    MovRmReg { width: BitWidth, modrm: ModRm },
    /// `8A/8B`.
    MovRegRm { width: BitWidth, modrm: ModRm },
    /// `8C`.
    MovRmSreg { seg: SegReg, modrm: ModRm },
    /// `8E`.
    MovSregRm { seg: SegReg, modrm: ModRm },
    /// `8D`.
    Lea { width: BitWidth, modrm: ModRm },
    /// `8F /0`.
    PopRm { width: BitWidth, modrm: ModRm },
    /// `A0/A1`: accumulator <- `[seg:moffs]`.
    MovAccMoffs {
        width: BitWidth,
        segment: SegReg,
        offset: Immediate,
    },
    /// `A2/A3`: `[seg:moffs]` <- accumulator.
    MovMoffsAcc {
        width: BitWidth,
        segment: SegReg,
        offset: Immediate,
    },
    /// `B0..BF`.
    MovRegImm {
        width: BitWidth,
        reg: Gpr,
        imm: Immediate,
    },
    /// `C6/C7 /0`.
    MovRmImm {
        width: BitWidth,
        modrm: ModRm,
        imm: Immediate,
    },
    /// `84/85`.
    TestRmReg { width: BitWidth, modrm: ModRm },
    /// `A8/A9`.
    TestAccImm { width: BitWidth, imm: Immediate },
    /// `86/87`.
    XchgRmReg { width: BitWidth, modrm: ModRm },
    /// `C4 C5 0F B2 0F B4 0F B5`: load `seg:reg` from a far pointer in memory.
    LoadFarPointer {
        seg: SegReg,
        width: BitWidth,
        modrm: ModRm,
    },
    /// `0F B6 B7 BE BF`.
    MovExtend {
        op: ExtendOp,
        source: BitWidth,
        width: BitWidth,
        modrm: ModRm,
    },
    /// `62`.
    Bound { width: BitWidth, modrm: ModRm },
    /// `70..7F` / `0F 80..8F`.
    Jcc { cond: Cond, offset: RelOffset },
    /// `E9/EB`.
    JmpRel { offset: RelOffset },
    /// `E8`.
    CallRel { offset: RelOffset },
    /// `EA`.
    JmpFar { target: FarPointer },
    /// `9A`.
    CallFar { target: FarPointer },
    /// `C3` / `C2 iw`.
    RetNear {
        width: BitWidth,
        pop: Option<Field<u16>>,
    },
    /// `CB` / `CA iw`.
    RetFar {
        width: BitWidth,
        pop: Option<Field<u16>>,
    },
    /// `0F AF`.
    ImulRegRm { width: BitWidth, modrm: ModRm },
    /// `69/6B`.
    ImulRegRmImm {
        width: BitWidth,
        modrm: ModRm,
        imm: Immediate,
    },
    /// `68/6A`.
    PushImm { width: BitWidth, imm: Immediate },
    /// `0F A4 A5 AC AD`.
    DoubleShift {
        op: DoubleShiftOp,
        width: BitWidth,
        modrm: ModRm,
        count: ShiftCount,
    },
    /// `0F BC/BD`.
    BitScan {
        op: BitScanOp,
        width: BitWidth,
        modrm: ModRm,
    },
    /// `D8..DF`: x87 escape; `escape` is the low three opcode bits.
    Fpu { escape: u8, modrm: ModRm },
    /// An opcode without meaning on this CPU model. Executing it raises `#UD`.
    Undefined,
}

/// A decoded instruction: the node handed to the CFG engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub address: SegmentedAddress,
    pub opcode: Opcode,
    pub prefixes: Prefixes,
    /// Total length in bytes, prefixes included.
    pub length: u8,
    pub kind: InstKind,
    pub signature: Signature,
}

impl Instruction {
    #[must_use]
    pub fn next_address(&self) -> SegmentedAddress {
        self.address.wrapping_add(u16::from(self.length))
    }

    /// Stable identity name of the node shape, e.g. `AddAccImm16`.
    #[must_use]
    pub fn node_name(&self) -> NodeName<'_> {
        self.kind.node_name()
    }

    /// Statically known branch destination of direct jumps, calls and loops.
    #[must_use]
    pub fn branch_target(&self) -> Option<SegmentedAddress> {
        let relative = |offset: &RelOffset| {
            let next = self.next_address();
            SegmentedAddress::new(
                next.segment,
                (i32::from(next.offset)).wrapping_add(offset.value()) as u16,
            )
        };
        match &self.kind {
            InstKind::Jcc { offset, .. }
            | InstKind::JmpRel { offset }
            | InstKind::CallRel { offset }
            | InstKind::Loop { offset, .. } => Some(relative(offset)),
            InstKind::JmpFar { target } | InstKind::CallFar { target } => {
                Some(SegmentedAddress::new(
                    target.segment.value,
                    target.offset.value(BitWidth::Dword32) as u16,
                ))
            }
            _ => None,
        }
    }

    /// Whether execution may continue somewhere other than [`Instruction::next_address`].
    #[must_use]
    pub fn is_block_terminator(&self) -> bool {
        matches!(
            self.kind,
            InstKind::Jcc { .. }
                | InstKind::JmpRel { .. }
                | InstKind::CallRel { .. }
                | InstKind::JmpFar { .. }
                | InstKind::CallFar { .. }
                | InstKind::RetNear { .. }
                | InstKind::RetFar { .. }
                | InstKind::IndirectBranch { .. }
                | InstKind::Loop { .. }
                | InstKind::Int3
                | InstKind::Int { .. }
                | InstKind::Into
                | InstKind::Iret { .. }
                | InstKind::Hlt
                | InstKind::Callback { .. }
                | InstKind::Undefined
        )
    }
}
