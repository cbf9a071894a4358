//! ModRM / SIB / displacement parsing for 16- and 32-bit addressing.

use crate::context::ParsingContext;
use crate::error::Result;
use crate::field::{Field, FieldReader};
use crate::resolver::segment_override_or_default;
use crate::stream::InstructionStream;
use realx86_types::{BitWidth, Gpr, SegReg};

/// Memory displacement as encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Displacement {
    Disp8(Field<i8>),
    Disp16(Field<i16>),
    Disp32(Field<i32>),
}

impl Displacement {
    /// Sign-extended displacement value.
    #[must_use]
    pub fn value(&self) -> i32 {
        match self {
            Displacement::Disp8(f) => i32::from(f.value),
            Displacement::Disp16(f) => i32::from(f.value),
            Displacement::Disp32(f) => f.value,
        }
    }
}

/// A resolved memory operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryOperand {
    pub address_width: BitWidth,
    /// Override from the prefixes, or the addressing form's default (SS for BP/ESP/EBP bases).
    pub segment: SegReg,
    pub base: Option<Gpr>,
    pub index: Option<Gpr>,
    /// 1, 2, 4 or 8. Always 1 without a SIB byte.
    pub scale: u8,
    pub displacement: Option<Displacement>,
    pub sib: Option<Field<u8>>,
}

impl MemoryOperand {
    #[must_use]
    pub fn displacement_value(&self) -> i32 {
        self.displacement.as_ref().map_or(0, Displacement::value)
    }

    /// `true` for a bare `[disp16]`/`[disp32]` operand.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.base.is_none() && self.index.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RmOperand {
    /// `mod == 3`. The index is interpreted by the operand width (8-bit: AL..BH).
    Register(Gpr),
    Memory(MemoryOperand),
}

/// The addressing descriptor produced from a ModRM byte and its trailing bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModRm {
    pub field: Field<u8>,
    pub mode: u8,
    /// Register operand or opcode-group index, 0..=7.
    pub reg: u8,
    pub rm: u8,
    pub operand: RmOperand,
}

impl ModRm {
    /// The opcode-group selector (ModRM.reg).
    #[must_use]
    pub fn group(&self) -> u8 {
        self.reg
    }

    #[must_use]
    pub fn reg_operand(&self) -> Gpr {
        Gpr::from_u3(self.reg)
    }

    #[must_use]
    pub fn is_register(&self) -> bool {
        matches!(self.operand, RmOperand::Register(_))
    }

    #[must_use]
    pub fn memory(&self) -> Option<&MemoryOperand> {
        match &self.operand {
            RmOperand::Memory(mem) => Some(mem),
            RmOperand::Register(_) => None,
        }
    }
}

/// Consumes a ModRM byte plus any SIB and displacement it calls for.
///
/// Must run before any immediate of the instruction is read.
pub(crate) fn parse_modrm<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
) -> Result<ModRm> {
    let field = stream.u8(true)?;
    let byte = field.value;
    let mode = (byte >> 6) & 0x3;
    let reg = (byte >> 3) & 0x7;
    let rm = byte & 0x7;

    let operand = if mode == 3 {
        RmOperand::Register(Gpr::from_u3(rm))
    } else if ctx.address_width == BitWidth::Dword32 {
        RmOperand::Memory(parse_memory32(stream, ctx, mode, rm)?)
    } else {
        RmOperand::Memory(parse_memory16(stream, ctx, mode, rm)?)
    };

    Ok(ModRm {
        field,
        mode,
        reg,
        rm,
        operand,
    })
}

// Displacements are data: the engine re-reads them, so they do not discriminate.
fn read_displacement<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    mode: u8,
    wide: BitWidth,
) -> Result<Option<Displacement>> {
    Ok(match (mode, wide) {
        (1, _) => Some(Displacement::Disp8(stream.i8(false)?)),
        (2, BitWidth::Dword32) => Some(Displacement::Disp32(stream.i32(false)?)),
        (2, _) => Some(Displacement::Disp16(stream.i16(false)?)),
        _ => None,
    })
}

fn parse_memory16<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
    mode: u8,
    rm: u8,
) -> Result<MemoryOperand> {
    if mode == 0 && rm == 6 {
        let disp = stream.i16(false)?;
        return Ok(MemoryOperand {
            address_width: BitWidth::Word16,
            segment: segment_override_or_default(ctx, SegReg::Ds),
            base: None,
            index: None,
            scale: 1,
            displacement: Some(Displacement::Disp16(disp)),
            sib: None,
        });
    }

    let (base, index) = match rm {
        0 => (Some(Gpr::Bx), Some(Gpr::Si)),
        1 => (Some(Gpr::Bx), Some(Gpr::Di)),
        2 => (Some(Gpr::Bp), Some(Gpr::Si)),
        3 => (Some(Gpr::Bp), Some(Gpr::Di)),
        4 => (Some(Gpr::Si), None),
        5 => (Some(Gpr::Di), None),
        6 => (Some(Gpr::Bp), None),
        _ => (Some(Gpr::Bx), None),
    };
    let default_segment = if base == Some(Gpr::Bp) {
        SegReg::Ss
    } else {
        SegReg::Ds
    };
    let displacement = read_displacement(stream, mode, BitWidth::Word16)?;

    Ok(MemoryOperand {
        address_width: BitWidth::Word16,
        segment: segment_override_or_default(ctx, default_segment),
        base,
        index,
        scale: 1,
        displacement,
        sib: None,
    })
}

fn parse_memory32<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
    ctx: &ParsingContext,
    mode: u8,
    rm: u8,
) -> Result<MemoryOperand> {
    let mut base = None;
    let mut index = None;
    let mut scale = 1u8;
    let mut sib = None;
    let mut displacement = None;

    if rm == 4 {
        let sib_field = stream.u8(true)?;
        let scale_bits = (sib_field.value >> 6) & 0x3;
        let index_code = (sib_field.value >> 3) & 0x7;
        let base_code = sib_field.value & 0x7;
        scale = 1 << scale_bits;
        if index_code != 4 {
            index = Some(Gpr::from_u3(index_code));
        }
        if base_code == 5 && mode == 0 {
            // No base, disp32 follows.
            displacement = Some(Displacement::Disp32(stream.i32(false)?));
        } else {
            base = Some(Gpr::from_u3(base_code));
        }
        sib = Some(sib_field);
    } else if rm == 5 && mode == 0 {
        displacement = Some(Displacement::Disp32(stream.i32(false)?));
    } else {
        base = Some(Gpr::from_u3(rm));
    }

    if mode != 0 {
        displacement = read_displacement(stream, mode, BitWidth::Dword32)?;
    }

    let default_segment = match base {
        Some(Gpr::Bp | Gpr::Sp) => SegReg::Ss,
        _ => SegReg::Ds,
    };

    Ok(MemoryOperand {
        address_width: BitWidth::Dword32,
        segment: segment_override_or_default(ctx, default_segment),
        base,
        index,
        scale,
        displacement,
        sib,
    })
}
