//! Table-driven conformance vectors
//!
//! Each row is `[scriptSig asm, scriptPubKey asm, flags, expected error]`,
//! verified against an oracle that rejects every signature and lock time.

mod common;

use anyhow::{ensure, Context};
use tapyrus_script::{NullSignatureChecker, Script, ScriptEngine, ScriptError, VerifyFlags};

const VECTORS: &str = r#"[
    ["1", "1", "P2SH", "OK"],
    ["1 1", "1", "P2SH,CLEANSTACK", "CLEANSTACK"],
    ["", "0", "P2SH", "EVAL_FALSE"],
    ["", "OP_RETURN", "NONE", "OP_RETURN"],
    ["0x4c 0x01 0x07", "OP_DROP 1", "MINIMALDATA", "MINIMALDATA"],
    ["0x4c 0x01 0x07", "OP_DROP 1", "NONE", "OK"],
    ["1", "OP_IF 1 OP_ELSE 0 OP_ENDIF", "NONE", "OK"],
    ["0x02 0x0100", "OP_IF 1 OP_ENDIF", "MINIMALIF", "MINIMALIF"],
    ["0x02 0x0100", "OP_IF 1 OP_ENDIF", "NONE", "OK"],
    ["", "0 OP_IF OP_CAT OP_ENDIF 1", "NONE", "DISABLED_OPCODE"],
    ["", "1 OP_IF", "NONE", "UNBALANCED_CONDITIONAL"],
    ["", "1 OP_ELSE 1", "NONE", "UNBALANCED_CONDITIONAL"],
    ["", "OP_IF 1 OP_ENDIF", "NONE", "INVALID_STACK_OPERATION"],
    ["", "OP_FROMALTSTACK", "NONE", "INVALID_ALTSTACK_OPERATION"],
    ["1 2", "OP_EQUALVERIFY 1", "NONE", "EQUALVERIFY"],
    ["1 2", "OP_NUMEQUALVERIFY 1", "NONE", "NUMEQUALVERIFY"],
    ["0", "OP_VERIFY 1", "NONE", "VERIFY"],
    ["", "OP_NOP10 1", "DISCOURAGE_UPGRADABLE_NOPS", "DISCOURAGE_UPGRADABLE_NOPS"],
    ["", "OP_NOP10 1", "NONE", "OK"],
    ["1 OP_DUP", "OP_EQUAL", "SIGPUSHONLY", "SIG_PUSHONLY"],
    ["300602010102010101", "PUBKEY OP_CHECKSIG", "STRICTENC,NULLFAIL", "NULLFAIL"],
    ["300602010102010101", "PUBKEY OP_CHECKSIG", "STRICTENC", "EVAL_FALSE"],
    ["0", "PUBKEY OP_CHECKSIG", "STRICTENC,NULLFAIL", "EVAL_FALSE"],
    ["0x02 0x3005", "PUBKEY OP_CHECKSIG", "DERSIG", "SIG_DER"],
    ["0x02 0x3005", "PUBKEY OP_CHECKSIG", "NONE", "EVAL_FALSE"],
    ["300602010102010105", "PUBKEY OP_CHECKSIG", "STRICTENC", "SIG_HASHTYPE"],
    ["300602010102010105", "PUBKEY OP_CHECKSIG", "DERSIG", "EVAL_FALSE"],
    ["0", "0x01 0x05 OP_CHECKSIG", "STRICTENC", "PUBKEYTYPE"],
    ["0 0", "1 PUBKEY 1 OP_CHECKMULTISIG", "NULLDUMMY", "EVAL_FALSE"],
    ["1 0", "1 PUBKEY 1 OP_CHECKMULTISIG", "NULLDUMMY", "SIG_NULLDUMMY"],
    ["0 0 0 0", "3 PUBKEY PUBKEY 2 OP_CHECKMULTISIG", "NONE", "SIG_COUNT"],
    ["", "21 OP_CHECKMULTISIG", "NONE", "PUBKEY_COUNT"],
    ["0", "0 0 OP_CHECKMULTISIG", "NULLDUMMY", "OK"],
    ["", "0x4c", "NONE", "BAD_OPCODE"],
    ["", "OP_VER", "NONE", "BAD_OPCODE"],
    ["", "0 OP_IF OP_VER OP_ENDIF 1", "NONE", "OK"],
    ["", "0xc0", "NONE", "BAD_OPCODE"],
    ["1", "OP_CHECKLOCKTIMEVERIFY", "CHECKLOCKTIMEVERIFY", "UNSATISFIED_LOCKTIME"],
    ["-1", "OP_CHECKLOCKTIMEVERIFY", "CHECKLOCKTIMEVERIFY", "NEGATIVE_LOCKTIME"],
    ["0x05 0x0000008000", "OP_CHECKSEQUENCEVERIFY", "CHECKSEQUENCEVERIFY", "OK"],
    ["", "OP_COLOR", "NONE", "INVALID_STACK_OPERATION"],
    ["", "1 OP_IF 0 OP_COLOR OP_ENDIF 1", "NONE", "OP_COLORINBRANCH"],
    ["", "0 OP_COLOR 1", "NONE", "OP_COLORID"],
    ["0x05 0x0000000001", "OP_1ADD", "NONE", "UNKNOWN_ERROR"],
    ["", "OP_CODESEPARATOR 1", "CONST_SCRIPTCODE", "OP_CODESEPARATOR"],
    ["", "0 OP_SIZE 0 OP_EQUAL", "NONE", "OK"],
    ["2 3", "OP_2DUP OP_ADD 5 OP_EQUALVERIFY OP_MUL", "NONE", "DISABLED_OPCODE"]
]"#;

fn parse_script(asm: &str) -> anyhow::Result<Script> {
    let pubkey = hex::encode(common::pubkey(0x11));
    let asm = asm.replace("PUBKEY", &pubkey);
    Script::from_asm(&asm).with_context(|| format!("invalid asm: {}", asm))
}

fn run_vector(row: &(String, String, String, String)) -> anyhow::Result<()> {
    let (sig_asm, pubkey_asm, flags, expected) = row;
    let script_sig = parse_script(sig_asm)?;
    let script_pubkey = parse_script(pubkey_asm)?;
    let flags: VerifyFlags = flags.parse()?;
    let expected: ScriptError = expected.parse()?;

    let engine = ScriptEngine::new(flags);
    let actual = match engine.verify_script(&script_sig, &script_pubkey, &NullSignatureChecker) {
        Ok(()) => ScriptError::Ok,
        Err(err) => err,
    };
    ensure!(
        actual == expected,
        "expected {}, got {}",
        expected.name(),
        actual.name()
    );
    Ok(())
}

#[test]
fn test_script_vectors() {
    common::setup_logging();
    let rows: Vec<(String, String, String, String)> = serde_json::from_str(VECTORS).unwrap();

    let failures: Vec<String> = rows
        .iter()
        .filter_map(|row| {
            run_vector(row)
                .err()
                .map(|err| format!("{:?}: {:#}", row, err))
        })
        .collect();
    assert!(failures.is_empty(), "failing vectors:\n{}", failures.join("\n"));
}
