//! Real-mode x86 instruction decoder for a CFG-caching emulator.
//!
//! One call turns the bytes at a segmented code address into one [`Instruction`] node. Every
//! byte the decoder consumes is recorded as a typed [`Field`] that is either a *discriminator*
//! (part of the node's cache identity: prefixes, opcode, ModRM/SIB, branch targets, interrupt
//! vectors) or plain data the executor re-reads from memory (immediates, displacements). The
//! resulting [`Signature`] lets the engine detect self-modifying code without re-decoding.
//!
//! ```
//! use realx86_decoder::{decode_bytes, InstKind};
//! use realx86_types::SegmentedAddress;
//!
//! let inst = decode_bytes(&[0x05, 0x34, 0x12], SegmentedAddress::new(0x1000, 0x0100)).unwrap();
//! assert_eq!(inst.length, 3);
//! assert_eq!(inst.node_name().to_string(), "AddAccImm16");
//! assert!(matches!(inst.kind, InstKind::Alu { .. }));
//! ```

#![forbid(unsafe_code)]

mod config;
mod context;
mod decoder;
pub mod error;
mod factory;
mod families;
mod field;
pub mod inst;
pub mod modrm;
pub mod opcode_tables;
mod prefix;
pub mod resolver;
mod signature;
mod stream;

pub use crate::config::{CodeWidth, DecoderConfig};
pub use crate::context::{Opcode, ParsingContext};
pub use crate::decoder::{decode_bytes, Decoder};
pub use crate::error::{DecodeError, ReadError, Result};
pub use crate::factory::NodeName;
pub use crate::field::{
    CodeMemory, Field, FieldReader, FieldValue, MemoryReader, SliceReader, MAX_INST_LEN,
};
pub use crate::inst::{
    AluForm, AluOp, BcdOp, BitIndex, BitScanOp, BitTestOp, DoubleShiftOp, ExtendOp, FarPointer,
    FlagOp, Immediate, IncDec, IndirectBranch, InstKind, Instruction, LoopKind, PortSource,
    RelOffset, ShiftCount, ShiftOp, StringOp, UnaryOp,
};
pub use crate::modrm::{Displacement, MemoryOperand, ModRm, RmOperand};
pub use crate::prefix::{Prefix, PrefixFlags, PrefixKind, Prefixes, RepPrefix, MAX_PREFIXES};
pub use crate::signature::Signature;
