mod common;

use common::decode16;

fn signature_of(bytes: &[u8]) -> Vec<Option<u8>> {
    decode16(bytes).signature.as_slice().to_vec()
}

#[test]
fn immediates_are_not_discriminators() {
    let inst = decode16(&[0x05, 0x34, 0x12]);
    assert_eq!(inst.signature.as_slice(), &[Some(0x05), None, None]);
    assert!(inst.signature.matches(&[0x05, 0xAA, 0xBB]));
    assert!(!inst.signature.matches(&[0x04, 0x34, 0x12]));
    assert!(!inst.signature.matches(&[0x05, 0x34]));

    // Displacement and immediate of a memory store are both data.
    assert_eq!(
        signature_of(&[0xC6, 0x06, 0x34, 0x12, 0xAA]),
        vec![Some(0xC6), Some(0x06), None, None, None]
    );
    assert_eq!(
        signature_of(&[0x26, 0x8B, 0x46, 0xFE]),
        vec![Some(0x26), Some(0x8B), Some(0x46), None]
    );
}

#[test]
fn branch_targets_and_vectors_discriminate() {
    assert_eq!(signature_of(&[0xEB, 0x10]), vec![Some(0xEB), Some(0x10)]);
    assert_eq!(
        signature_of(&[0x0F, 0x84, 0x10, 0x00]),
        vec![Some(0x0F), Some(0x84), Some(0x10), Some(0x00)]
    );
    assert_eq!(signature_of(&[0xE2, 0xFE]), vec![Some(0xE2), Some(0xFE)]);
    assert_eq!(signature_of(&[0xCD, 0x21]), vec![Some(0xCD), Some(0x21)]);
    assert_eq!(
        signature_of(&[0xEA, 0xF0, 0xFF, 0x00, 0xF0]),
        vec![Some(0xEA), Some(0xF0), Some(0xFF), Some(0x00), Some(0xF0)]
    );
    assert_eq!(
        signature_of(&[0xFE, 0x38, 0x05]),
        vec![Some(0xFE), Some(0x38), Some(0x05)]
    );
}

#[test]
fn sib_byte_discriminates() {
    assert_eq!(
        signature_of(&[0x67, 0x8B, 0x44, 0x24, 0x08]),
        vec![Some(0x67), Some(0x8B), Some(0x44), Some(0x24), None]
    );
}

#[test]
fn fields_carry_offsets_and_physical_addresses() {
    let inst = decode16(&[0x26, 0x8B, 0x46, 0xFE]);
    assert_eq!(inst.opcode.offset(), 1);
    assert_eq!(inst.opcode.physical_address(), 0x10101);
    let prefix = inst.prefixes.iter().next().unwrap();
    assert_eq!(prefix.field.offset, 0);
    assert!(prefix.field.discriminator);
}

#[test]
fn signature_covers_the_whole_instruction() {
    for bytes in [
        &[0x90][..],
        &[0x66, 0x05, 0x78, 0x56, 0x34, 0x12][..],
        &[0x67, 0x8B, 0x04, 0x25, 0x78, 0x56, 0x34, 0x12][..],
        &[0xC8, 0x10, 0x00, 0x00][..],
    ] {
        let inst = decode16(bytes);
        assert_eq!(inst.signature.len(), usize::from(inst.length));
        assert!(inst.signature.matches(bytes));
    }
}

#[test]
fn opcode_spans_its_own_bytes() {
    let nop = decode16(&[0x90]);
    assert_eq!(nop.opcode.len(), 1);
    assert_eq!(nop.opcode.end(), nop.length);
    assert!(nop.opcode.escape.is_none());

    let push_fs = decode16(&[0x66, 0x0F, 0xA0]);
    assert_eq!(push_fs.opcode.value(), 0x0FA0);
    assert_eq!(push_fs.opcode.offset(), 1);
    assert_eq!(push_fs.opcode.len(), 2);
    assert_eq!(push_fs.opcode.end(), push_fs.length);
    let escape = push_fs.opcode.escape.unwrap();
    assert_eq!((escape.offset, escape.raw()), (1, 0x0F));
    assert_eq!((push_fs.opcode.byte.offset, push_fs.opcode.byte.raw()), (2, 0xA0));
    assert_eq!(push_fs.opcode.physical_address(), 0x10101);

    let lea = decode16(&[0x8D, 0x46, 0x04]);
    assert_eq!(lea.opcode.end(), 1);
}
