//! Typed instruction fields and the reader interface that supplies them.
//!
//! The decoder never touches memory directly. It pulls one typed field at a time from a
//! [`FieldReader`], tagging each read with whether the concrete value is part of the
//! instruction's cache identity (a *discriminator*). Hosts with their own memory model implement
//! [`FieldReader`] themselves; [`MemoryReader`] and [`SliceReader`] cover flat memory and
//! standalone byte buffers.

use crate::error::ReadError;
use realx86_types::SegmentedAddress;

/// Maximum x86 instruction length (architectural limit).
pub const MAX_INST_LEN: usize = 15;

mod sealed {
    pub trait Sealed {}
}

/// Primitive types a [`Field`] can carry.
pub trait FieldValue: sealed::Sealed + Copy + core::fmt::Debug + Eq + core::hash::Hash {
    /// Encoded size in bytes.
    const LEN: u8;

    /// Builds the value from `LEN` little-endian bytes held in the low bits of `raw`.
    fn from_raw(raw: u32) -> Self;

    /// Little-endian encoding; only the low `LEN` bytes are meaningful.
    fn to_raw(self) -> u32;
}

macro_rules! impl_field_value {
    ($($ty:ty => $len:expr),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl FieldValue for $ty {
                const LEN: u8 = $len;

                #[inline]
                fn from_raw(raw: u32) -> Self {
                    raw as $ty
                }

                #[inline]
                fn to_raw(self) -> u32 {
                    self as u32
                }
            }
        )*
    };
}

impl_field_value! {
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
}

/// A value read from the instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field<T> {
    pub value: T,
    /// Byte index of the field inside the instruction (prefixes included).
    pub offset: u8,
    /// Physical address of the field's first byte.
    pub physical_address: u32,
    /// Whether the concrete value is part of the instruction's identity for node caching.
    ///
    /// Non-discriminator values may change in memory without invalidating the decoded node; the
    /// engine re-reads them from `physical_address` when it executes.
    pub discriminator: bool,
}

impl<T: FieldValue> Field<T> {
    #[must_use]
    pub fn len(&self) -> u8 {
        T::LEN
    }

    /// Offset of the first byte after this field.
    #[must_use]
    pub fn end(&self) -> u8 {
        self.offset + T::LEN
    }

    /// Raw little-endian bytes of the field, `len()` of them meaningful.
    #[must_use]
    pub fn raw(&self) -> u32 {
        self.value.to_raw()
    }
}

/// Source of instruction fields for one decode attempt.
///
/// Reads are strictly sequential: each call advances a forward-only cursor.
pub trait FieldReader {
    /// Reads the next `T::LEN` bytes as a little-endian `T`.
    fn next_field<T: FieldValue>(&mut self, discriminator: bool) -> Result<Field<T>, ReadError>;

    /// Number of bytes consumed so far.
    fn offset(&self) -> u8;

    fn next_u8(&mut self, discriminator: bool) -> Result<Field<u8>, ReadError> {
        self.next_field(discriminator)
    }

    fn next_i8(&mut self, discriminator: bool) -> Result<Field<i8>, ReadError> {
        self.next_field(discriminator)
    }

    fn next_u16(&mut self, discriminator: bool) -> Result<Field<u16>, ReadError> {
        self.next_field(discriminator)
    }

    fn next_i16(&mut self, discriminator: bool) -> Result<Field<i16>, ReadError> {
        self.next_field(discriminator)
    }

    fn next_u32(&mut self, discriminator: bool) -> Result<Field<u32>, ReadError> {
        self.next_field(discriminator)
    }

    fn next_i32(&mut self, discriminator: bool) -> Result<Field<i32>, ReadError> {
        self.next_field(discriminator)
    }
}

/// Byte-addressable code memory indexed by physical address.
pub trait CodeMemory {
    fn read_u8(&self, physical: u32) -> Option<u8>;
}

impl CodeMemory for [u8] {
    #[inline]
    fn read_u8(&self, physical: u32) -> Option<u8> {
        self.get(physical as usize).copied()
    }
}

impl<const N: usize> CodeMemory for [u8; N] {
    #[inline]
    fn read_u8(&self, physical: u32) -> Option<u8> {
        self.get(physical as usize).copied()
    }
}

impl CodeMemory for Vec<u8> {
    #[inline]
    fn read_u8(&self, physical: u32) -> Option<u8> {
        self.as_slice().read_u8(physical)
    }
}

fn check_room(cursor: u8, len: u8) -> Result<(), ReadError> {
    if cursor as usize + len as usize > MAX_INST_LEN {
        return Err(ReadError::TooLong);
    }
    Ok(())
}

/// Reads fields from [`CodeMemory`] starting at a segmented address.
///
/// The offset wraps inside the code segment, matching real-mode instruction fetch.
#[derive(Debug)]
pub struct MemoryReader<'m, M: CodeMemory + ?Sized> {
    memory: &'m M,
    start: SegmentedAddress,
    cursor: u8,
}

impl<'m, M: CodeMemory + ?Sized> MemoryReader<'m, M> {
    pub fn new(memory: &'m M, start: SegmentedAddress) -> Self {
        Self {
            memory,
            start,
            cursor: 0,
        }
    }
}

impl<M: CodeMemory + ?Sized> FieldReader for MemoryReader<'_, M> {
    fn next_field<T: FieldValue>(&mut self, discriminator: bool) -> Result<Field<T>, ReadError> {
        check_room(self.cursor, T::LEN)?;
        let mut raw = 0u32;
        for i in 0..T::LEN {
            let physical = self
                .start
                .wrapping_add(u16::from(self.cursor + i))
                .physical();
            let byte = self
                .memory
                .read_u8(physical)
                .ok_or(ReadError::Unmapped { physical })?;
            raw |= u32::from(byte) << (i * 8);
        }
        let field = Field {
            value: T::from_raw(raw),
            offset: self.cursor,
            physical_address: self.start.wrapping_add(u16::from(self.cursor)).physical(),
            discriminator,
        };
        self.cursor += T::LEN;
        Ok(field)
    }

    fn offset(&self) -> u8 {
        self.cursor
    }
}

/// Reads fields from a buffer holding the instruction bytes located at `start`.
#[derive(Debug, Clone)]
pub struct SliceReader<'a> {
    bytes: &'a [u8],
    start: SegmentedAddress,
    cursor: u8,
}

impl<'a> SliceReader<'a> {
    pub fn new(bytes: &'a [u8], start: SegmentedAddress) -> Self {
        Self {
            bytes,
            start,
            cursor: 0,
        }
    }
}

impl FieldReader for SliceReader<'_> {
    fn next_field<T: FieldValue>(&mut self, discriminator: bool) -> Result<Field<T>, ReadError> {
        check_room(self.cursor, T::LEN)?;
        let mut raw = 0u32;
        for i in 0..T::LEN {
            let byte = *self
                .bytes
                .get(usize::from(self.cursor + i))
                .ok_or(ReadError::UnexpectedEof {
                    offset: self.cursor + i,
                })?;
            raw |= u32::from(byte) << (i * 8);
        }
        let field = Field {
            value: T::from_raw(raw),
            offset: self.cursor,
            physical_address: self.start.wrapping_add(u16::from(self.cursor)).physical(),
            discriminator,
        };
        self.cursor += T::LEN;
        Ok(field)
    }

    fn offset(&self) -> u8 {
        self.cursor
    }
}
