mod common;

use common::{decode16, decode32, name};
use realx86_decoder::resolver::resolve_width;
use realx86_decoder::{
    AluForm, CodeWidth, Decoder, DecoderConfig, Immediate, InstKind, PrefixFlags,
};
use realx86_types::BitWidth;

#[test]
fn resolve_width_is_exhaustive() {
    assert_eq!(resolve_width(true, false), BitWidth::Byte8);
    assert_eq!(resolve_width(true, true), BitWidth::Byte8);
    assert_eq!(resolve_width(false, false), BitWidth::Word16);
    assert_eq!(resolve_width(false, true), BitWidth::Dword32);
}

#[test]
fn operand_size_prefix_widens_16_bit_code() {
    let inst = decode16(&[0x66, 0x05, 0x78, 0x56, 0x34, 0x12]);
    assert_eq!(name(&inst), "AddAccImm32");
    assert_eq!(inst.length, 6);
    assert!(inst.prefixes.contains(PrefixFlags::OPERAND_SIZE));
    match inst.kind {
        InstKind::Alu {
            form: AluForm::AccImm(Immediate::U32(imm)),
            ..
        } => assert_eq!(imm.value, 0x1234_5678),
        other => panic!("unexpected node {other:?}"),
    }
}

#[test]
fn prefixes_toggle_relative_to_32_bit_default() {
    assert_eq!(name(&decode32(&[0x05, 0x78, 0x56, 0x34, 0x12])), "AddAccImm32");
    assert_eq!(name(&decode32(&[0x66, 0x05, 0x34, 0x12])), "AddAccImm16");

    // mov ax, [eax] under a 32-bit default: no SIB, no displacement.
    let inst = decode32(&[0x66, 0x8B, 0x00]);
    assert_eq!(name(&inst), "MovRegRm16");
    match inst.kind {
        InstKind::MovRegRm { modrm, .. } => {
            assert_eq!(modrm.memory().unwrap().address_width, BitWidth::Dword32)
        }
        other => panic!("unexpected node {other:?}"),
    }

    // 67 switches back to 16-bit addressing: [bx+si].
    let inst = decode32(&[0x67, 0x8B, 0x00]);
    match inst.kind {
        InstKind::MovRegRm { modrm, .. } => {
            assert_eq!(modrm.memory().unwrap().address_width, BitWidth::Word16)
        }
        other => panic!("unexpected node {other:?}"),
    }
}

#[test]
fn byte_forms_ignore_operand_size() {
    assert_eq!(name(&decode16(&[0x66, 0x04, 0x12])), "AddAccImm8");
    assert_eq!(name(&decode16(&[0x66, 0x88, 0xC0])), "MovRmReg8");
    assert_eq!(name(&decode16(&[0x66, 0xB0, 0x12])), "MovRegImm8");
}

#[test]
fn address_size_prefix_selects_32_bit_addressing() {
    let inst = decode16(&[0x67, 0x8B, 0x00]);
    assert_eq!(inst.length, 3);
    match inst.kind {
        InstKind::MovRegRm { width, modrm } => {
            assert_eq!(width, BitWidth::Word16);
            assert_eq!(modrm.memory().unwrap().address_width, BitWidth::Dword32);
        }
        other => panic!("unexpected node {other:?}"),
    }
}

#[test]
fn decoder_keeps_its_configuration() {
    let config = DecoderConfig::real_mode()
        .with_default_width(CodeWidth::Bits32)
        .with_host_callbacks(false);
    assert_eq!(Decoder::new(config).config(), &config);

    let default = Decoder::default();
    assert_eq!(default.config().default_width, CodeWidth::Bits16);
    assert!(default.config().host_callbacks);
}
