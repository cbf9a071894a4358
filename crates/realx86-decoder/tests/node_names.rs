//! Node identity names and lengths for the non-ALU families.

mod common;

use common::{decode16, name};

fn check(cases: &[(&[u8], &str)]) {
    for (bytes, expected) in cases {
        let inst = decode16(bytes);
        assert_eq!(name(&inst), *expected, "{bytes:02x?}");
        assert_eq!(usize::from(inst.length), bytes.len(), "{bytes:02x?}");
    }
}

#[test]
fn misc_forms() {
    check(&[
        (&[0x90], "Nop"),
        (&[0x98], "Cbw"),
        (&[0x66, 0x98], "Cwde"),
        (&[0x99], "Cwd"),
        (&[0x66, 0x99], "Cdq"),
        (&[0x9C], "Pushf16"),
        (&[0x9D], "Popf16"),
        (&[0x9E], "Sahf"),
        (&[0x9F], "Lahf"),
        (&[0x9B], "Wait"),
        (&[0xF4], "Hlt"),
        (&[0xF5], "Cmc"),
        (&[0xF8], "Clc"),
        (&[0xF9], "Stc"),
        (&[0xFA], "Cli"),
        (&[0xFB], "Sti"),
        (&[0xFC], "Cld"),
        (&[0xFD], "Std"),
        (&[0x27], "Daa"),
        (&[0x2F], "Das"),
        (&[0x37], "Aaa"),
        (&[0x3F], "Aas"),
        (&[0xD4, 0x0A], "Aam"),
        (&[0xD5, 0x0A], "Aad"),
        (&[0xD6], "Salc"),
        (&[0xD7], "Xlat"),
        (&[0x60], "Pusha16"),
        (&[0x61], "Popa16"),
        (&[0xC8, 0x10, 0x00, 0x00], "Enter16"),
        (&[0xC9], "Leave16"),
        (&[0xCC], "Int3"),
        (&[0xCD, 0x21], "Int"),
        (&[0xCE], "Into"),
        (&[0xCF], "Iret16"),
    ]);
}

#[test]
fn segment_push_pop() {
    check(&[
        (&[0x06], "PushEs16"),
        (&[0x07], "PopEs16"),
        (&[0x0E], "PushCs16"),
        (&[0x16], "PushSs16"),
        (&[0x17], "PopSs16"),
        (&[0x1E], "PushDs16"),
        (&[0x1F], "PopDs16"),
        (&[0x0F, 0xA0], "PushFs16"),
        (&[0x0F, 0xA1], "PopFs16"),
        (&[0x0F, 0xA8], "PushGs16"),
        (&[0x0F, 0xA9], "PopGs16"),
    ]);
}

#[test]
fn port_io() {
    check(&[
        (&[0xE4, 0x60], "InImm8"),
        (&[0xE5, 0x60], "InImm16"),
        (&[0xE6, 0x60], "OutImm8"),
        (&[0xE7, 0x60], "OutImm16"),
        (&[0xEC], "InDx8"),
        (&[0xED], "InDx16"),
        (&[0xEE], "OutDx8"),
        (&[0xEF], "OutDx16"),
        (&[0x66, 0xED], "InDx32"),
    ]);
}

#[test]
fn data_movement() {
    check(&[
        (&[0x88, 0xC0], "MovRmReg8"),
        (&[0x89, 0xC0], "MovRmReg16"),
        (&[0x8A, 0xC0], "MovRegRm8"),
        (&[0x8B, 0xC0], "MovRegRm16"),
        (&[0x8C, 0xD8], "MovRmSreg"),
        (&[0x8E, 0xD8], "MovSregRm"),
        (&[0x8D, 0x46, 0x02], "Lea16"),
        (&[0x8F, 0x06, 0x34, 0x12], "PopRm16"),
        (&[0xA0, 0x34, 0x12], "MovAccMoffs8"),
        (&[0xA1, 0x34, 0x12], "MovAccMoffs16"),
        (&[0xA2, 0x34, 0x12], "MovMoffsAcc8"),
        (&[0xA3, 0x34, 0x12], "MovMoffsAcc16"),
        (&[0x67, 0xA1, 0x78, 0x56, 0x34, 0x12], "MovAccMoffs16"),
        (&[0xB0, 0x12], "MovRegImm8"),
        (&[0xB8, 0x34, 0x12], "MovRegImm16"),
        (&[0x66, 0xBB, 0x78, 0x56, 0x34, 0x12], "MovRegImm32"),
        (&[0xC6, 0x06, 0x34, 0x12, 0xAA], "MovRmImm8"),
        (&[0xC7, 0x06, 0x34, 0x12, 0x78, 0x56], "MovRmImm16"),
        (&[0x84, 0xC0], "TestRmReg8"),
        (&[0x85, 0xC0], "TestRmReg16"),
        (&[0xA8, 0x01], "TestAccImm8"),
        (&[0xA9, 0x01, 0x00], "TestAccImm16"),
        (&[0x86, 0xC0], "XchgRmReg8"),
        (&[0x87, 0xC0], "XchgRmReg16"),
        (&[0xC4, 0x1E, 0x34, 0x12], "Les16"),
        (&[0xC5, 0x1E, 0x34, 0x12], "Lds16"),
        (&[0x0F, 0xB2, 0x1E, 0x34, 0x12], "Lss16"),
        (&[0x0F, 0xB4, 0x1E, 0x34, 0x12], "Lfs16"),
        (&[0x0F, 0xB5, 0x1E, 0x34, 0x12], "Lgs16"),
        (&[0x0F, 0xB6, 0xC0], "Movzx8To16"),
        (&[0x66, 0x0F, 0xB7, 0xC0], "Movzx16To32"),
        (&[0x66, 0x0F, 0xBE, 0xC0], "Movsx8To32"),
        (&[0x0F, 0xBF, 0xC0], "Movsx16To16"),
        (&[0x62, 0x06, 0x34, 0x12], "Bound16"),
    ]);
}

#[test]
fn later_cpu_additions() {
    check(&[
        (&[0x0F, 0xAF, 0xC0], "ImulRegRm16"),
        (&[0x69, 0xC0, 0x34, 0x12], "ImulRegRmImm16"),
        (&[0x6B, 0xC0, 0xFF], "ImulRegRmSignedImm16"),
        (&[0x68, 0x34, 0x12], "PushImm16"),
        (&[0x6A, 0xFF], "PushSignedImm16"),
        (&[0x66, 0x68, 0x78, 0x56, 0x34, 0x12], "PushImm32"),
        (&[0x0F, 0xA4, 0xC0, 0x04], "ShldImm16"),
        (&[0x0F, 0xA5, 0xC0], "ShldCl16"),
        (&[0x0F, 0xAC, 0xC0, 0x04], "ShrdImm16"),
        (&[0x0F, 0xAD, 0xC0], "ShrdCl16"),
        (&[0x0F, 0xBC, 0xC0], "Bsf16"),
        (&[0x0F, 0xBD, 0xC0], "Bsr16"),
        (&[0x0F, 0x94, 0xC0], "SetE"),
        (&[0x0F, 0x9F, 0x06, 0x34, 0x12], "SetG"),
    ]);
}

#[test]
fn fpu_escapes_consume_addressing_bytes() {
    check(&[
        (&[0xD9, 0x06, 0x34, 0x12], "FpuD9"),
        (&[0xDD, 0xD8], "FpuDD"),
        (&[0xD8, 0x46, 0x04], "FpuD8"),
        (&[0xDF, 0xE0], "FpuDF"),
    ]);
}

#[test]
fn undefined_opcodes_are_nodes() {
    check(&[
        (&[0xF1], "Undefined"),
        (&[0x0F, 0x0B], "Undefined"),
        (&[0x0F, 0xFF], "Undefined"),
    ]);
    let inst = decode16(&[0x0F, 0x0B]);
    assert_eq!(inst.opcode.value(), 0x0F0B);
    assert!(inst.is_block_terminator());
}

#[test]
fn register_forms_of_memory_only_operands_are_undefined() {
    check(&[
        (&[0x8D, 0xC0], "Undefined"),
        (&[0x66, 0x8D, 0xD8], "Undefined"),
        (&[0xFF, 0xD8], "Undefined"),
        (&[0xFF, 0xE8], "Undefined"),
        (&[0xC4, 0xC0], "Undefined"),
        (&[0xC5, 0xC0], "Undefined"),
        (&[0x0F, 0xB2, 0xC0], "Undefined"),
        (&[0x0F, 0xB4, 0xC8], "Undefined"),
        (&[0x0F, 0xB5, 0xD0], "Undefined"),
        (&[0x62, 0xC0], "Undefined"),
    ]);

    // Near indirect branches still take a register.
    check(&[
        (&[0xFF, 0xD0], "CallNearRm16"),
        (&[0xFF, 0xE0], "JmpNearRm16"),
    ]);
    assert!(decode16(&[0xFF, 0xD8]).is_block_terminator());
}
