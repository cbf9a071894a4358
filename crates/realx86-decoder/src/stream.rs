use crate::error::Result;
use crate::field::{Field, FieldReader, FieldValue};
use crate::inst::{Immediate, RelOffset};
use crate::signature::Signature;
use realx86_types::BitWidth;

/// The field reader of one decode attempt, recording every field into the signature.
pub(crate) struct InstructionStream<'r, R: FieldReader> {
    reader: &'r mut R,
    signature: Signature,
}

impl<'r, R: FieldReader> InstructionStream<'r, R> {
    pub(crate) fn new(reader: &'r mut R) -> Self {
        Self {
            reader,
            signature: Signature::empty(),
        }
    }

    pub(crate) fn field<T: FieldValue>(&mut self, discriminator: bool) -> Result<Field<T>> {
        let field = self.reader.next_field::<T>(discriminator)?;
        self.signature.record(&field);
        Ok(field)
    }

    pub(crate) fn u8(&mut self, discriminator: bool) -> Result<Field<u8>> {
        self.field(discriminator)
    }

    pub(crate) fn i8(&mut self, discriminator: bool) -> Result<Field<i8>> {
        self.field(discriminator)
    }

    pub(crate) fn u16(&mut self, discriminator: bool) -> Result<Field<u16>> {
        self.field(discriminator)
    }

    pub(crate) fn i16(&mut self, discriminator: bool) -> Result<Field<i16>> {
        self.field(discriminator)
    }

    pub(crate) fn i32(&mut self, discriminator: bool) -> Result<Field<i32>> {
        self.field(discriminator)
    }

    /// Reads an unsigned immediate as wide as the operand.
    ///
    /// Immediates are data: they are re-read at execution time, so they never discriminate.
    pub(crate) fn immediate(&mut self, width: BitWidth) -> Result<Immediate> {
        Ok(match width {
            BitWidth::Byte8 => Immediate::U8(self.field(false)?),
            BitWidth::Word16 => Immediate::U16(self.field(false)?),
            BitWidth::Dword32 => Immediate::U32(self.field(false)?),
        })
    }

    /// Reads an 8-bit immediate that is sign-extended to the operand width.
    pub(crate) fn immediate_s8(&mut self) -> Result<Immediate> {
        Ok(Immediate::S8(self.field(false)?))
    }

    /// Reads a near branch displacement sized by the operand width (never 8-bit).
    pub(crate) fn rel_near(&mut self, operand_size_32: bool) -> Result<RelOffset> {
        Ok(if operand_size_32 {
            RelOffset::Rel32(self.field(true)?)
        } else {
            RelOffset::Rel16(self.field(true)?)
        })
    }

    pub(crate) fn rel8(&mut self) -> Result<RelOffset> {
        Ok(RelOffset::Rel8(self.field(true)?))
    }

    pub(crate) fn offset(&self) -> u8 {
        self.reader.offset()
    }

    pub(crate) fn into_signature(self) -> Signature {
        self.signature
    }
}
