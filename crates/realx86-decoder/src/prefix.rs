//! Legacy prefix scanning.

use crate::error::Result;
use crate::field::{Field, FieldReader, MAX_INST_LEN};
use crate::opcode_tables;
use crate::stream::InstructionStream;
use realx86_types::SegReg;

bitflags::bitflags! {
    /// Summary of the prefixes in front of an opcode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PrefixFlags: u8 {
        const LOCK = 1 << 0;
        /// `F3`: REP / REPE / REPZ.
        const REP = 1 << 1;
        /// `F2`: REPNE / REPNZ.
        const REPNE = 1 << 2;
        const OPERAND_SIZE = 1 << 3;
        const ADDRESS_SIZE = 1 << 4;
        const SEGMENT = 1 << 5;
    }
}

/// What a single prefix byte means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixKind {
    Segment(SegReg),
    OperandSize,
    AddressSize,
    Lock,
    Rep,
    Repne,
}

impl PrefixKind {
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<PrefixKind> {
        if let Some(seg) = opcode_tables::segment_override(byte) {
            return Some(PrefixKind::Segment(seg));
        }
        match byte {
            0x66 => Some(PrefixKind::OperandSize),
            0x67 => Some(PrefixKind::AddressSize),
            0xF0 => Some(PrefixKind::Lock),
            0xF2 => Some(PrefixKind::Repne),
            0xF3 => Some(PrefixKind::Rep),
            _ => None,
        }
    }
}

/// Repeat prefix in effect for a string instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepPrefix {
    /// `F3`. For `CMPS`/`SCAS` this continues while ZF = 1.
    Rep,
    /// `F2`. Continues while ZF = 0.
    Repne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix {
    pub kind: PrefixKind,
    pub field: Field<u8>,
}

/// At most one opcode byte has to fit after the prefixes.
pub const MAX_PREFIXES: usize = MAX_INST_LEN - 1;

/// The prefixes consumed before the opcode, in encounter order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefixes {
    items: [Option<Prefix>; MAX_PREFIXES],
    count: u8,
    flags: PrefixFlags,
    segment: Option<SegReg>,
}

impl Default for Prefixes {
    fn default() -> Self {
        Self {
            items: [None; MAX_PREFIXES],
            count: 0,
            flags: PrefixFlags::empty(),
            segment: None,
        }
    }
}

impl Prefixes {
    pub(crate) fn push(&mut self, prefix: Prefix) {
        // LOCK and REP/REPNE share a prefix group; the last one wins. So does the segment group.
        match prefix.kind {
            PrefixKind::Segment(seg) => {
                self.segment = Some(seg);
                self.flags.insert(PrefixFlags::SEGMENT);
            }
            PrefixKind::OperandSize => self.flags.insert(PrefixFlags::OPERAND_SIZE),
            PrefixKind::AddressSize => self.flags.insert(PrefixFlags::ADDRESS_SIZE),
            PrefixKind::Lock => {
                self.flags.remove(PrefixFlags::REP | PrefixFlags::REPNE);
                self.flags.insert(PrefixFlags::LOCK);
            }
            PrefixKind::Rep => {
                self.flags.remove(PrefixFlags::LOCK | PrefixFlags::REPNE);
                self.flags.insert(PrefixFlags::REP);
            }
            PrefixKind::Repne => {
                self.flags.remove(PrefixFlags::LOCK | PrefixFlags::REP);
                self.flags.insert(PrefixFlags::REPNE);
            }
        }
        if let Some(slot) = self.items.get_mut(usize::from(self.count)) {
            *slot = Some(prefix);
            self.count += 1;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prefix> + '_ {
        self.items.iter().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.count)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[must_use]
    pub fn flags(&self) -> PrefixFlags {
        self.flags
    }

    #[must_use]
    pub fn contains(&self, flags: PrefixFlags) -> bool {
        self.flags.contains(flags)
    }

    /// The effective segment override (last segment prefix wins).
    #[must_use]
    pub fn segment_override(&self) -> Option<SegReg> {
        self.segment
    }

    #[must_use]
    pub fn rep(&self) -> Option<RepPrefix> {
        if self.flags.contains(PrefixFlags::REP) {
            Some(RepPrefix::Rep)
        } else if self.flags.contains(PrefixFlags::REPNE) {
            Some(RepPrefix::Repne)
        } else {
            None
        }
    }
}

/// Consumes prefix bytes and returns them together with the first non-prefix byte.
///
/// Prefix and opcode bytes always discriminate: they decide what the instruction is.
pub(crate) fn scan_prefixes<R: FieldReader>(
    stream: &mut InstructionStream<'_, R>,
) -> Result<(Prefixes, Field<u8>)> {
    let mut prefixes = Prefixes::default();
    loop {
        let field = stream.u8(true)?;
        match PrefixKind::from_byte(field.value) {
            Some(kind) => prefixes.push(Prefix { kind, field }),
            None => return Ok((prefixes, field)),
        }
    }
}
