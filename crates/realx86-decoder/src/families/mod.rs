//! Per-family opcode dispatchers.
//!
//! Each dispatcher is entered with the prefixes and opcode already consumed and returns the
//! resolved [`InstKind`](crate::inst::InstKind). ModRM, when present, is always parsed before
//! any immediate.

pub(crate) mod alu;
pub(crate) mod bit_test;
pub(crate) mod control;
pub(crate) mod fpu;
pub(crate) mod grp1;
pub(crate) mod grp2;
pub(crate) mod grp3;
pub(crate) mod grp45;
pub(crate) mod misc;
pub(crate) mod mov;
pub(crate) mod register_index;
pub(crate) mod setcc;
pub(crate) mod string;
pub(crate) mod two_byte;
