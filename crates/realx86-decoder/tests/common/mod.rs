// Shared test helpers (integration tests compile as separate crates, so put
// common code in a submodule to avoid it becoming its own test target).
#![allow(dead_code)]

use realx86_decoder::{
    decode_bytes, CodeWidth, DecodeError, Decoder, DecoderConfig, Instruction, SliceReader,
};
use realx86_types::SegmentedAddress;

pub const ORIGIN: SegmentedAddress = SegmentedAddress::new(0x1000, 0x0100);

pub fn decode16(bytes: &[u8]) -> Instruction {
    decode_bytes(bytes, ORIGIN).expect("decode")
}

pub fn try_decode16(bytes: &[u8]) -> Result<Instruction, DecodeError> {
    decode_bytes(bytes, ORIGIN)
}

pub fn decode_with(config: DecoderConfig, bytes: &[u8]) -> Result<Instruction, DecodeError> {
    let mut reader = SliceReader::new(bytes, ORIGIN);
    Decoder::new(config).decode(&mut reader, ORIGIN)
}

pub fn decode32(bytes: &[u8]) -> Instruction {
    decode_with(
        DecoderConfig::real_mode().with_default_width(CodeWidth::Bits32),
        bytes,
    )
    .expect("decode")
}

pub fn name(inst: &Instruction) -> String {
    inst.node_name().to_string()
}

/// Tiny deterministic PRNG for test input generation.
pub struct XorShift64(pub u64);

impl XorShift64 {
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    pub fn fill(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(8) {
            let v = self.next_u64().to_le_bytes();
            let n = chunk.len();
            chunk.copy_from_slice(&v[..n]);
        }
    }
}
