//! Script codec, template and text-form tests through the public API

use tapyrus_script::opcodes::*;
use tapyrus_script::*;

const P2PKH_HEX: &str = "76a914000102030405060708090a0b0c0d0e0f1011121388ac";

#[test]
fn test_p2pkh_from_hex() {
    let script = Script::from_hex(P2PKH_HEX).unwrap();
    assert!(script.is_p2pkh());
    assert!(script.is_standard());
    assert_eq!(script.len(), 5);
    assert_eq!(script.to_hex(), P2PKH_HEX);
    assert_eq!(
        script.to_string(),
        "OP_DUP OP_HASH160 000102030405060708090a0b0c0d0e0f10111213 OP_EQUALVERIFY OP_CHECKSIG"
    );

    let hash: [u8; 20] = core::array::from_fn(|i| i as u8);
    assert_eq!(Script::p2pkh(&hash), script);
}

#[test]
fn test_invalid_hex() {
    assert!(matches!(Script::from_hex("76a"), Err(ConsensusError::InvalidHex(_))));
    assert!(matches!(Script::from_hex("zz"), Err(ConsensusError::InvalidHex(_))));
}

#[test]
fn test_non_minimal_push_round_trips() {
    let bytes = [OP_PUSHDATA1, 0x01, 0x07];
    let script = Script::parse(&bytes);
    assert_eq!(script.len(), 1);
    assert!(!script.chunks()[0].is_minimal_push());
    assert_eq!(script.chunks()[0].payload(), Some(&[0x07][..]));
    assert_eq!(script.to_bytes(), bytes);
}

#[test]
fn test_undefined_opcode_absorbs_tail() {
    let bytes = [OP_1, 0xc0, 0x01, 0x02];
    let script = Script::parse(&bytes);
    assert_eq!(
        script.chunks(),
        &[Chunk::Opcode(OP_1), Chunk::Raw(vec![0xc0, 0x01, 0x02])]
    );
    assert_eq!(script.to_bytes(), bytes);
    assert!(!script.is_push_only());
}

#[test]
fn test_truncated_push_round_trips() {
    for bytes in [&[OP_PUSHDATA2, 0x05][..], &[0x05, 0x01, 0x02][..], &[OP_PUSHDATA4][..]] {
        let script = Script::parse(bytes);
        assert_eq!(script.to_bytes(), bytes);
        assert!(!script.chunks()[0].is_well_formed());
    }
}

#[test]
fn test_from_asm() {
    let script = Script::from_asm("OP_DUP HASH160 0x14 0x0000000000000000000000000000000000000000 OP_EQUALVERIFY CHECKSIG").unwrap();
    assert!(script.is_p2pkh());

    let script = Script::from_asm("-1 0 16 17 1000").unwrap();
    assert_eq!(script.to_hex(), "4f0060011102e803");
    assert_eq!(script.to_string(), "-1 0 16 17 1000");

    assert!(matches!(Script::from_asm("OP_FOO"), Err(ConsensusError::InvalidAsm(_))));
    assert!(matches!(Script::from_asm("0xzz"), Err(ConsensusError::InvalidAsm(_))));
    assert_eq!(Script::from_asm("").unwrap(), Script::new());
}

#[test]
fn test_builder() {
    let script = Script::new()
        .append_int(5)
        .append_int(-5)
        .append_data(&[0xab; 80])
        .unwrap()
        .append_opcode(OP_NOP);
    assert_eq!(
        script.chunks()[1],
        Chunk::PushData {
            header: vec![1],
            payload: vec![0x85]
        }
    );
    assert_eq!(&script.to_bytes()[..4], &[OP_5, 0x01, 0x85, OP_PUSHDATA1]);
    assert_eq!(script.serialized_size(), 1 + 2 + 2 + 80 + 1);
}

#[test]
fn test_multisig_template() {
    let keys = vec![vec![0x02; 33], vec![0x03; 33], vec![0x04; 65]];
    let script = Script::multisig(2, &keys).unwrap();
    assert!(script.is_multisig());
    assert!(script.is_standard());
    assert_eq!(script.get_multisig_pubkeys(), keys);
    assert_eq!(script.get_pubkeys(), keys);

    assert!(matches!(Script::multisig(0, &keys), Err(ConsensusError::InvalidTemplate(_))));
    assert!(matches!(Script::multisig(4, &keys), Err(ConsensusError::InvalidTemplate(_))));
    let too_many = vec![vec![0x02; 33]; 17];
    assert!(Script::multisig(1, &too_many).is_err());

    assert!(Script::p2pkh(&[0; 20]).get_multisig_pubkeys().is_empty());
}

#[test]
fn test_bare_multisig_standardness_is_capped() {
    let keys = vec![vec![0x02; 33]; 4];
    let script = Script::multisig(1, &keys).unwrap();
    assert!(script.is_multisig());
    assert!(!script.is_standard());
    assert!(script.to_p2sh().is_standard());

    let script = Script::multisig(3, &keys[..3]).unwrap();
    assert!(script.is_standard());
}

#[test]
fn test_op_return_template() {
    let standard = Script::op_return(&[0x11; 80]).unwrap();
    assert!(standard.is_op_return());
    assert!(standard.is_standard_op_return());
    assert!(standard.is_unspendable());

    let oversized = Script::op_return(&[0x11; 81]).unwrap();
    assert!(oversized.is_op_return());
    assert!(!oversized.is_standard_op_return());

    assert!(Script::op_return(&[]).unwrap().is_op_return());
    assert!(!Script::from_asm("OP_RETURN OP_DUP").unwrap().is_op_return());
}

#[test]
fn test_p2sh_template() {
    let redeem_script = Script::from_asm("1 OP_EQUAL").unwrap();
    let p2sh = redeem_script.to_p2sh();
    assert!(p2sh.is_p2sh());
    assert_eq!(p2sh.to_bytes()[2..22], redeem_script.to_hash160());
    assert!(!p2sh.is_p2pkh());
}

#[test]
fn test_colored_templates() {
    let out_point = OutPoint::new([0x01; 32], 0);
    let color = ColorIdentifier::non_reissuable(&out_point);

    let p2pkh = Script::p2pkh(&[0x09; 20]);
    let cp2pkh = p2pkh.add_color(&color).unwrap();
    assert!(cp2pkh.is_cp2pkh());
    assert!(!cp2pkh.is_p2pkh());
    assert!(cp2pkh.is_standard());
    assert_eq!(cp2pkh.color_id(), Some(color));
    assert_eq!(cp2pkh.remove_color(), p2pkh);

    let cp2sh = Script::p2sh(&[0x09; 20]).add_color(&color).unwrap();
    assert!(cp2sh.is_cp2sh());
    assert_eq!(cp2sh.color_id().map(|c| c.token_type), Some(TokenType::NonReissuable));

    let multisig = Script::multisig(1, &[vec![0x02; 33]]).unwrap();
    assert!(matches!(multisig.add_color(&color), Err(ConsensusError::InvalidTemplate(_))));
    assert_eq!(multisig.color_id(), None);
    assert_eq!(multisig.remove_color(), multisig);
}

#[test]
fn test_invalid_color_prefix_is_not_colored() {
    let script = Script::new()
        .append_data(&[0u8; 33])
        .unwrap()
        .append_opcode(OP_COLOR)
        .append_opcode(OP_DUP)
        .append_opcode(OP_HASH160)
        .append_data(&[0x09; 20])
        .unwrap()
        .append_opcode(OP_EQUALVERIFY)
        .append_opcode(OP_CHECKSIG);
    assert!(!script.is_cp2pkh());
    assert_eq!(script.color_id(), None);
}

#[test]
fn test_find_and_delete() {
    let sig = vec![0x30; 9];
    let needle = Script::new().append_data(&sig).unwrap();
    let script = Script::new()
        .append_int(1)
        .append_data(&sig)
        .unwrap()
        .append_int(2)
        .append_data(&sig)
        .unwrap();
    assert_eq!(script.find_and_delete(&needle), Script::from_asm("1 2").unwrap());
    assert_eq!(script.find_and_delete(&Script::new()), script);
}

#[test]
fn test_subscript() {
    let script = Script::from_asm("1 OP_CODESEPARATOR 2 OP_ADD").unwrap();
    assert_eq!(script.subscript(2), Script::from_asm("2 OP_ADD").unwrap());
    assert_eq!(script.subscript(10), Script::new());
}

#[test]
fn test_unspendable() {
    assert!(Script::from_asm("OP_RETURN").unwrap().is_unspendable());
    assert!(Script::parse(&vec![OP_NOP; 10_001]).is_unspendable());
    assert!(!Script::p2pkh(&[0; 20]).is_unspendable());
}

#[test]
fn test_serde_round_trip() {
    let script = Script::from_hex(P2PKH_HEX).unwrap();
    let json = serde_json::to_string(&script).unwrap();
    let decoded: Script = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, script);

    let color = ColorIdentifier::nft(&OutPoint::new([0x05; 32], 3));
    let decoded: ColorIdentifier = serde_json::from_str(&serde_json::to_string(&color).unwrap()).unwrap();
    assert_eq!(decoded, color);

    let flags = VerifyFlags::STANDARD;
    let decoded: VerifyFlags = serde_json::from_str(&serde_json::to_string(&flags).unwrap()).unwrap();
    assert_eq!(decoded, flags);
}

#[test]
fn test_error_names_round_trip() {
    for err in ScriptError::ALL {
        assert_eq!(err.name().parse::<ScriptError>().unwrap(), err);
    }
    assert_eq!("SCRIPT_ERR_EVAL_FALSE".parse::<ScriptError>().unwrap(), ScriptError::EvalFalse);
    assert!("NOT_AN_ERROR".parse::<ScriptError>().is_err());
}

#[test]
fn test_flags_display_round_trip() {
    let flags = VerifyFlags::P2SH | VerifyFlags::NULLFAIL;
    assert_eq!(flags.to_string(), "P2SH,NULLFAIL");
    assert_eq!(flags.to_string().parse::<VerifyFlags>().unwrap(), flags);
    assert_eq!(VerifyFlags::empty().to_string(), "NONE");
}
