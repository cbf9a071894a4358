use crate::field::{Field, FieldValue, MAX_INST_LEN};

/// Byte-level identity key of a decoded instruction.
///
/// One slot per instruction byte: `Some(byte)` when the byte belongs to a discriminator field,
/// `None` when the value may change without changing what the node does. The CFG engine can
/// reuse a cached node for any memory contents the signature [`matches`](Signature::matches).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    bytes: [Option<u8>; MAX_INST_LEN],
    len: u8,
}

impl Signature {
    pub(crate) const fn empty() -> Self {
        Self {
            bytes: [None; MAX_INST_LEN],
            len: 0,
        }
    }

    pub(crate) fn record<T: FieldValue>(&mut self, field: &Field<T>) {
        let raw = field.raw();
        for i in 0..T::LEN {
            let idx = usize::from(field.offset + i);
            let Some(slot) = self.bytes.get_mut(idx) else {
                break;
            };
            *slot = field.discriminator.then_some((raw >> (u32::from(i) * 8)) as u8);
        }
        self.len = self.len.max(field.end().min(MAX_INST_LEN as u8));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Option<u8>] {
        &self.bytes[..self.len()]
    }

    /// Returns `true` if `bytes` (the current memory at the instruction address) still agrees
    /// with every discriminator byte.
    #[must_use]
    pub fn matches(&self, bytes: &[u8]) -> bool {
        if bytes.len() < self.len() {
            return false;
        }
        self.as_slice()
            .iter()
            .zip(bytes)
            .all(|(expected, actual)| expected.map_or(true, |b| b == *actual))
    }
}
