//! Instruction lengths and direct branch targets cross-checked against `iced-x86` in 16-bit mode.

mod common;

use common::{XorShift64, ORIGIN};
use iced_x86::{Code, Decoder as IcedDecoder, DecoderOptions};
use realx86_decoder::{decode_bytes, InstKind, Instruction, PrefixFlags};
use realx86_types::SegReg;

fn iced_decode(bytes: &[u8]) -> iced_x86::Instruction {
    let mut decoder = IcedDecoder::with_ip(16, bytes, u64::from(ORIGIN.offset), DecoderOptions::NONE);
    decoder.decode()
}

const CORPUS: &[&[u8]] = &[
    &[0x00, 0xC0],
    &[0x01, 0x46, 0x02],
    &[0x03, 0x87, 0x34, 0x12],
    &[0x05, 0x34, 0x12],
    &[0x66, 0x05, 0x78, 0x56, 0x34, 0x12],
    &[0x3C, 0x12],
    &[0x80, 0x3E, 0x34, 0x12, 0x01],
    &[0x81, 0xC3, 0x34, 0x12],
    &[0x83, 0xE8, 0xFF],
    &[0x66, 0x83, 0x46, 0x04, 0x01],
    &[0xC0, 0xE0, 0x04],
    &[0xD1, 0xE0],
    &[0xD3, 0x2F],
    &[0xF6, 0xC0, 0xAA],
    &[0xF7, 0x06, 0x34, 0x12, 0x78, 0x56],
    &[0xF7, 0xF1],
    &[0xFE, 0x06, 0x34, 0x12],
    &[0xFF, 0x1E, 0x34, 0x12],
    &[0xFF, 0x76, 0x04],
    &[0x0F, 0xBA, 0xE0, 0x05],
    &[0x0F, 0xA3, 0xC8],
    &[0x0F, 0x94, 0xC0],
    &[0xE2, 0xFE],
    &[0x67, 0xE2, 0x10],
    &[0xE3, 0x05],
    &[0x40],
    &[0x66, 0x58],
    &[0x93],
    &[0xF3, 0xA4],
    &[0xF3, 0x66, 0xAB],
    &[0x26, 0xAC],
    &[0x6C],
    &[0x9C],
    &[0x98],
    &[0xD4, 0x0A],
    &[0xD7],
    &[0xC8, 0x10, 0x00, 0x01],
    &[0xCD, 0x21],
    &[0x0F, 0xA0],
    &[0xE4, 0x60],
    &[0xEF],
    &[0x89, 0x46, 0xFE],
    &[0x8E, 0xD8],
    &[0x8D, 0x40, 0x01],
    &[0x8F, 0x06, 0x34, 0x12],
    &[0xA1, 0x34, 0x12],
    &[0x67, 0xA3, 0x78, 0x56, 0x34, 0x12],
    &[0xBB, 0x34, 0x12],
    &[0xC7, 0x06, 0x34, 0x12, 0x78, 0x56],
    &[0xA9, 0x34, 0x12],
    &[0xC4, 0x1E, 0x34, 0x12],
    &[0x0F, 0xB2, 0x1E, 0x34, 0x12],
    &[0x0F, 0xB6, 0xC0],
    &[0x66, 0x0F, 0xBF, 0x06, 0x34, 0x12],
    &[0x74, 0x05],
    &[0x0F, 0x85, 0x10, 0x00],
    &[0xEB, 0xFE],
    &[0xE9, 0x00, 0x10],
    &[0xE8, 0xFD, 0xFF],
    &[0xEA, 0xF0, 0xFF, 0x00, 0xF0],
    &[0x9A, 0x00, 0x01, 0x00, 0x20],
    &[0xC2, 0x04, 0x00],
    &[0xCB],
    &[0x0F, 0xAF, 0xC3],
    &[0x69, 0xC0, 0x34, 0x12],
    &[0x6B, 0xC0, 0xFF],
    &[0x68, 0x34, 0x12],
    &[0x6A, 0xFF],
    &[0x0F, 0xA4, 0xC0, 0x04],
    &[0x0F, 0xAD, 0xC0],
    &[0x0F, 0xBC, 0xC0],
    &[0xD9, 0x06, 0x34, 0x12],
    &[0xDD, 0xD8],
    &[0x67, 0x8B, 0x44, 0x24, 0x08],
    &[0x67, 0x8B, 0x04, 0x25, 0x78, 0x56, 0x34, 0x12],
    &[0x67, 0x66, 0x8B, 0x84, 0x88, 0x78, 0x56, 0x34, 0x12],
];

#[test]
fn corpus_lengths_match_iced() {
    for bytes in CORPUS {
        let ours = decode_bytes(bytes, ORIGIN).expect("decode");
        let iced = iced_decode(bytes);
        assert_ne!(iced.code(), Code::INVALID, "iced rejected {bytes:02x?}");
        assert_eq!(usize::from(ours.length), iced.len(), "{bytes:02x?}");
    }
}

#[test]
fn near_branch_targets_match_iced() {
    for bytes in CORPUS {
        let ours = decode_bytes(bytes, ORIGIN).expect("decode");
        let relative = matches!(
            ours.kind,
            InstKind::Jcc { .. } | InstKind::JmpRel { .. } | InstKind::CallRel { .. }
        ) || matches!(ours.kind, InstKind::Loop { width, .. } if width.bits() == 16);
        if !relative {
            continue;
        }
        let iced = iced_decode(bytes);
        let target = ours.branch_target().expect("branch target");
        assert_eq!(
            u64::from(target.offset),
            iced.near_branch_target(),
            "{bytes:02x?}"
        );
    }
}

#[test]
fn far_branch_targets_match_iced() {
    let ours = decode_bytes(&[0xEA, 0xF0, 0xFF, 0x00, 0xF0], ORIGIN).unwrap();
    let iced = iced_decode(&[0xEA, 0xF0, 0xFF, 0x00, 0xF0]);
    let target = ours.branch_target().unwrap();
    assert_eq!(target.segment, iced.far_branch_selector());
    assert_eq!(target.offset, iced.far_branch16());
}

/// Nodes outside the comparison: the host callback extension, opcodes left to `#UD`, forms that
/// iced reads as VEX/EVEX prefixes in 16-bit mode, and `WAIT`, which iced may fuse with a
/// following x87 instruction.
fn comparable(inst: &Instruction) -> bool {
    !matches!(
        inst.kind,
        InstKind::Undefined
            | InstKind::Wait
            | InstKind::Callback { .. }
            | InstKind::Bound { .. }
            | InstKind::LoadFarPointer { .. }
    )
}

/// Nodes iced is allowed to reject: the host callback extension, x87 register forms it leaves
/// undefined, and `MOV CS, r/m`, which only faults when executed.
fn may_be_rejected_by_iced(inst: &Instruction) -> bool {
    inst.prefixes.flags().contains(PrefixFlags::LOCK)
        || matches!(
            inst.kind,
            InstKind::Undefined
                | InstKind::Wait
                | InstKind::Callback { .. }
                | InstKind::Fpu { .. }
                | InstKind::MovSregRm { seg: SegReg::Cs, .. }
        )
}

#[test]
fn random_streams_match_iced() {
    let mut rng = XorShift64(0x5EED_1234_ABCD_0001);
    let mut buf = [0u8; 15];
    let mut compared = 0usize;
    for _ in 0..20_000 {
        rng.fill(&mut buf);
        let Ok(ours) = decode_bytes(&buf, ORIGIN) else {
            continue;
        };
        let iced = iced_decode(&buf);
        if iced.code() == Code::INVALID {
            assert!(
                may_be_rejected_by_iced(&ours),
                "iced rejects {buf:02x?}, decoded as {}",
                ours.node_name()
            );
            continue;
        }
        if !comparable(&ours) {
            continue;
        }
        assert_eq!(usize::from(ours.length), iced.len(), "{buf:02x?}");
        compared += 1;
    }
    assert!(compared > 1_000, "only {compared} streams compared");
}

#[test]
fn memory_only_register_forms_are_rejected_by_both() {
    for bytes in [
        &[0x8D, 0xC0][..],
        &[0xFF, 0xD8],
        &[0xFF, 0xE8],
        &[0x0F, 0xB2, 0xC0],
        &[0x0F, 0xB5, 0xC0],
    ] {
        let ours = decode_bytes(bytes, ORIGIN).expect("decode");
        assert_eq!(ours.kind, InstKind::Undefined, "{bytes:02x?}");
        assert_eq!(iced_decode(bytes).code(), Code::INVALID, "{bytes:02x?}");
    }
}
