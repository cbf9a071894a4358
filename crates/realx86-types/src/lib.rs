//! Shared primitive types for the real-mode x86 decoder.
//!
//! These are deliberately tiny `Copy` types so decoded instructions can embed them without
//! allocating.

#![forbid(unsafe_code)]

use core::fmt;

/// Operand width of an x86 instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BitWidth {
    Byte8,
    Word16,
    Dword32,
}

impl BitWidth {
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            BitWidth::Byte8 => 8,
            BitWidth::Word16 => 16,
            BitWidth::Dword32 => 32,
        }
    }

    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            BitWidth::Byte8 => 1,
            BitWidth::Word16 => 2,
            BitWidth::Dword32 => 4,
        }
    }

    #[must_use]
    pub const fn mask(self) -> u32 {
        match self {
            BitWidth::Byte8 => 0xff,
            BitWidth::Word16 => 0xffff,
            BitWidth::Dword32 => 0xffff_ffff,
        }
    }

    #[must_use]
    pub const fn truncate(self, value: u32) -> u32 {
        value & self.mask()
    }

    /// Interprets the low `bits()` of `value` as a signed quantity and widens it to 32 bits.
    #[must_use]
    pub const fn sign_extend(self, value: u32) -> u32 {
        match self {
            BitWidth::Byte8 => value as u8 as i8 as i32 as u32,
            BitWidth::Word16 => value as u16 as i16 as i32 as u32,
            BitWidth::Dword32 => value,
        }
    }

    /// Returns the width with `bits` bits, if it is one of 8/16/32.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Option<BitWidth> {
        match bits {
            8 => Some(BitWidth::Byte8),
            16 => Some(BitWidth::Word16),
            32 => Some(BitWidth::Dword32),
            _ => None,
        }
    }
}

impl fmt::Display for BitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// General purpose register selector (the 3-bit index used by ModRM and short opcodes).
///
/// For 8-bit operands, indices 4..=7 name `AH CH DH BH` instead of `SP BP SI DI`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gpr {
    Ax = 0,
    Cx = 1,
    Dx = 2,
    Bx = 3,
    Sp = 4,
    Bp = 5,
    Si = 6,
    Di = 7,
}

impl Gpr {
    const ALL: [Gpr; 8] = [
        Gpr::Ax,
        Gpr::Cx,
        Gpr::Dx,
        Gpr::Bx,
        Gpr::Sp,
        Gpr::Bp,
        Gpr::Si,
        Gpr::Di,
    ];

    /// Decodes a 3-bit register field. Bits above the low three are ignored.
    #[must_use]
    pub const fn from_u3(code: u8) -> Gpr {
        Self::ALL[(code & 0x7) as usize]
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Gpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gpr::Ax => "ax",
            Gpr::Cx => "cx",
            Gpr::Dx => "dx",
            Gpr::Bx => "bx",
            Gpr::Sp => "sp",
            Gpr::Bp => "bp",
            Gpr::Si => "si",
            Gpr::Di => "di",
        };
        f.write_str(s)
    }
}

/// Segment register, numbered the way `MOV Sreg` and segment-override prefixes encode it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SegReg {
    Es = 0,
    Cs = 1,
    Ss = 2,
    Ds = 3,
    Fs = 4,
    Gs = 5,
}

impl SegReg {
    /// Decodes the ModRM.reg field of `MOV Sreg` forms. Indices 6 and 7 are undefined.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<SegReg> {
        match index {
            0 => Some(SegReg::Es),
            1 => Some(SegReg::Cs),
            2 => Some(SegReg::Ss),
            3 => Some(SegReg::Ds),
            4 => Some(SegReg::Fs),
            5 => Some(SegReg::Gs),
            _ => None,
        }
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SegReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SegReg::Es => "es",
            SegReg::Cs => "cs",
            SegReg::Ss => "ss",
            SegReg::Ds => "ds",
            SegReg::Fs => "fs",
            SegReg::Gs => "gs",
        };
        f.write_str(s)
    }
}

/// x86 condition codes in encoding order (`Jcc`/`SETcc` low nibble).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cond {
    /// OF = 1
    O,
    /// OF = 0
    No,
    /// CF = 1
    B,
    /// CF = 0
    Ae,
    /// ZF = 1
    E,
    /// ZF = 0
    Ne,
    /// CF = 1 or ZF = 1
    Be,
    /// CF = 0 and ZF = 0
    A,
    /// SF = 1
    S,
    /// SF = 0
    Ns,
    /// PF = 1
    P,
    /// PF = 0
    Np,
    /// SF != OF
    L,
    /// SF = OF
    Ge,
    /// ZF = 1 or SF != OF
    Le,
    /// ZF = 0 and SF = OF
    G,
}

impl Cond {
    const ALL: [Cond; 16] = [
        Cond::O,
        Cond::No,
        Cond::B,
        Cond::Ae,
        Cond::E,
        Cond::Ne,
        Cond::Be,
        Cond::A,
        Cond::S,
        Cond::Ns,
        Cond::P,
        Cond::Np,
        Cond::L,
        Cond::Ge,
        Cond::Le,
        Cond::G,
    ];

    /// Decodes the low nibble of a `Jcc`/`SETcc` opcode.
    #[must_use]
    pub const fn from_cc(cc: u8) -> Cond {
        Self::ALL[(cc & 0xf) as usize]
    }

    #[must_use]
    pub const fn cc(self) -> u8 {
        self as u8
    }

    /// The condition with the opposite outcome (`cc ^ 1`).
    #[must_use]
    pub const fn invert(self) -> Cond {
        Self::from_cc(self.cc() ^ 1)
    }

    /// Mnemonic suffix in `Jcc`/`SETcc` naming, e.g. `"Ne"` for `JNE`.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Cond::O => "O",
            Cond::No => "No",
            Cond::B => "B",
            Cond::Ae => "Ae",
            Cond::E => "E",
            Cond::Ne => "Ne",
            Cond::Be => "Be",
            Cond::A => "A",
            Cond::S => "S",
            Cond::Ns => "Ns",
            Cond::P => "P",
            Cond::Np => "Np",
            Cond::L => "L",
            Cond::Ge => "Ge",
            Cond::Le => "Le",
            Cond::G => "G",
        }
    }
}

/// A real-mode `segment:offset` address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SegmentedAddress {
    pub segment: u16,
    pub offset: u16,
}

impl SegmentedAddress {
    #[must_use]
    pub const fn new(segment: u16, offset: u16) -> Self {
        Self { segment, offset }
    }

    /// Linear address `segment * 16 + offset`. A20 masking is left to the memory bus.
    #[must_use]
    pub const fn physical(self) -> u32 {
        ((self.segment as u32) << 4) + self.offset as u32
    }

    /// Advances the offset, wrapping inside the 64 KiB segment.
    #[must_use]
    pub const fn wrapping_add(self, delta: u16) -> Self {
        Self {
            segment: self.segment,
            offset: self.offset.wrapping_add(delta),
        }
    }
}

impl fmt::Display for SegmentedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}:{:04X}", self.segment, self.offset)
    }
}
