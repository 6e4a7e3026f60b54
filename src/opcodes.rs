//! Tapyrus Script opcode table
//!
//! Opcode byte constants, the byte <-> name bijection, categories and the
//! small-integer helpers. Bitcoin opcodes keep their Bitcoin values; Tapyrus
//! adds OP_CHECKDATASIG(VERIFY) and OP_COLOR.

use serde::{Deserialize, Serialize};

// ============================================================================
// PUSH DATA (0x00 - 0x4e)
// ============================================================================

/// OP_0 / OP_FALSE - Push empty array
pub const OP_0: u8 = 0x00;
pub const OP_FALSE: u8 = OP_0;
/// OP_PUSHDATA1 - Next byte is the data length
pub const OP_PUSHDATA1: u8 = 0x4c;
/// OP_PUSHDATA2 - Next 2 bytes (little-endian) are the data length
pub const OP_PUSHDATA2: u8 = 0x4d;
/// OP_PUSHDATA4 - Next 4 bytes (little-endian) are the data length
pub const OP_PUSHDATA4: u8 = 0x4e;

// ============================================================================
// PUSH VALUE (0x4f - 0x60)
// ============================================================================

pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_RESERVED: u8 = 0x50;
pub const OP_1: u8 = 0x51;
pub const OP_TRUE: u8 = OP_1;
pub const OP_2: u8 = 0x52;
pub const OP_3: u8 = 0x53;
pub const OP_4: u8 = 0x54;
pub const OP_5: u8 = 0x55;
pub const OP_6: u8 = 0x56;
pub const OP_7: u8 = 0x57;
pub const OP_8: u8 = 0x58;
pub const OP_9: u8 = 0x59;
pub const OP_10: u8 = 0x5a;
pub const OP_11: u8 = 0x5b;
pub const OP_12: u8 = 0x5c;
pub const OP_13: u8 = 0x5d;
pub const OP_14: u8 = 0x5e;
pub const OP_15: u8 = 0x5f;
pub const OP_16: u8 = 0x60;

// ============================================================================
// CONTROL FLOW (0x61 - 0x6a)
// ============================================================================

pub const OP_NOP: u8 = 0x61;
pub const OP_VER: u8 = 0x62;
pub const OP_IF: u8 = 0x63;
pub const OP_NOTIF: u8 = 0x64;
pub const OP_VERIF: u8 = 0x65;
pub const OP_VERNOTIF: u8 = 0x66;
pub const OP_ELSE: u8 = 0x67;
pub const OP_ENDIF: u8 = 0x68;
pub const OP_VERIFY: u8 = 0x69;
pub const OP_RETURN: u8 = 0x6a;

// ============================================================================
// STACK (0x6b - 0x7d)
// ============================================================================

pub const OP_TOALTSTACK: u8 = 0x6b;
pub const OP_FROMALTSTACK: u8 = 0x6c;
pub const OP_2DROP: u8 = 0x6d;
pub const OP_2DUP: u8 = 0x6e;
pub const OP_3DUP: u8 = 0x6f;
pub const OP_2OVER: u8 = 0x70;
pub const OP_2ROT: u8 = 0x71;
pub const OP_2SWAP: u8 = 0x72;
pub const OP_IFDUP: u8 = 0x73;
pub const OP_DEPTH: u8 = 0x74;
pub const OP_DROP: u8 = 0x75;
pub const OP_DUP: u8 = 0x76;
pub const OP_NIP: u8 = 0x77;
pub const OP_OVER: u8 = 0x78;
pub const OP_PICK: u8 = 0x79;
pub const OP_ROLL: u8 = 0x7a;
pub const OP_ROT: u8 = 0x7b;
pub const OP_SWAP: u8 = 0x7c;
pub const OP_TUCK: u8 = 0x7d;

// ============================================================================
// SPLICE (0x7e - 0x82)
// ============================================================================

pub const OP_CAT: u8 = 0x7e;
pub const OP_SUBSTR: u8 = 0x7f;
pub const OP_LEFT: u8 = 0x80;
pub const OP_RIGHT: u8 = 0x81;
pub const OP_SIZE: u8 = 0x82;

// ============================================================================
// BITWISE LOGIC (0x83 - 0x8a)
// ============================================================================

pub const OP_INVERT: u8 = 0x83;
pub const OP_AND: u8 = 0x84;
pub const OP_OR: u8 = 0x85;
pub const OP_XOR: u8 = 0x86;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_RESERVED1: u8 = 0x89;
pub const OP_RESERVED2: u8 = 0x8a;

// ============================================================================
// ARITHMETIC (0x8b - 0xa5)
// ============================================================================

pub const OP_1ADD: u8 = 0x8b;
pub const OP_1SUB: u8 = 0x8c;
pub const OP_2MUL: u8 = 0x8d;
pub const OP_2DIV: u8 = 0x8e;
pub const OP_NEGATE: u8 = 0x8f;
pub const OP_ABS: u8 = 0x90;
pub const OP_NOT: u8 = 0x91;
pub const OP_0NOTEQUAL: u8 = 0x92;
pub const OP_ADD: u8 = 0x93;
pub const OP_SUB: u8 = 0x94;
pub const OP_MUL: u8 = 0x95;
pub const OP_DIV: u8 = 0x96;
pub const OP_MOD: u8 = 0x97;
pub const OP_LSHIFT: u8 = 0x98;
pub const OP_RSHIFT: u8 = 0x99;
pub const OP_BOOLAND: u8 = 0x9a;
pub const OP_BOOLOR: u8 = 0x9b;
pub const OP_NUMEQUAL: u8 = 0x9c;
pub const OP_NUMEQUALVERIFY: u8 = 0x9d;
pub const OP_NUMNOTEQUAL: u8 = 0x9e;
pub const OP_LESSTHAN: u8 = 0x9f;
pub const OP_GREATERTHAN: u8 = 0xa0;
pub const OP_LESSTHANOREQUAL: u8 = 0xa1;
pub const OP_GREATERTHANOREQUAL: u8 = 0xa2;
pub const OP_MIN: u8 = 0xa3;
pub const OP_MAX: u8 = 0xa4;
pub const OP_WITHIN: u8 = 0xa5;

// ============================================================================
// CRYPTO (0xa6 - 0xaf)
// ============================================================================

pub const OP_RIPEMD160: u8 = 0xa6;
pub const OP_SHA1: u8 = 0xa7;
pub const OP_SHA256: u8 = 0xa8;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_HASH256: u8 = 0xaa;
pub const OP_CODESEPARATOR: u8 = 0xab;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
pub const OP_CHECKMULTISIG: u8 = 0xae;
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;

// ============================================================================
// EXPANSION / LOCKTIME (0xb0 - 0xb9)
// ============================================================================

pub const OP_NOP1: u8 = 0xb0;
pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb1;
pub const OP_NOP2: u8 = OP_CHECKLOCKTIMEVERIFY;
pub const OP_CHECKSEQUENCEVERIFY: u8 = 0xb2;
pub const OP_NOP3: u8 = OP_CHECKSEQUENCEVERIFY;
pub const OP_NOP4: u8 = 0xb3;
pub const OP_NOP5: u8 = 0xb4;
pub const OP_NOP6: u8 = 0xb5;
pub const OP_NOP7: u8 = 0xb6;
pub const OP_NOP8: u8 = 0xb7;
pub const OP_NOP9: u8 = 0xb8;
pub const OP_NOP10: u8 = 0xb9;

// ============================================================================
// TAPYRUS EXTENSIONS (0xba - 0xbc)
// ============================================================================

/// OP_CHECKDATASIG - Verify a signature over sha256(message)
pub const OP_CHECKDATASIG: u8 = 0xba;
pub const OP_CHECKDATASIGVERIFY: u8 = 0xbb;
/// OP_COLOR - Mark the output with a color identifier
pub const OP_COLOR: u8 = 0xbc;

// ============================================================================
// PSEUDO-OPCODES (template matching only, never valid in scripts)
// ============================================================================

pub const OP_PUBKEYHASH: u8 = 0xfd;
pub const OP_PUBKEY: u8 = 0xfe;
pub const OP_INVALIDOPCODE: u8 = 0xff;

/// Opcodes that fail the script wherever they appear, executed or not.
pub const DISABLED_OPCODES: [u8; 15] = [
    OP_CAT, OP_SUBSTR, OP_LEFT, OP_RIGHT, OP_INVERT, OP_AND, OP_OR, OP_XOR, OP_2MUL, OP_2DIV,
    OP_MUL, OP_DIV, OP_MOD, OP_LSHIFT, OP_RSHIFT,
];

/// Functional grouping of opcodes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpcodeCategory {
    Push,
    Flow,
    Stack,
    Splice,
    Bitwise,
    Arithmetic,
    Crypto,
    Locktime,
    Color,
    Reserved,
    Pseudo,
}

/// Symbolic name of a defined opcode.
///
/// Direct pushes (0x01-0x4b) have no name; the legacy aliases OP_NOP2/OP_NOP3
/// resolve to their modern names.
pub fn opcode_to_name(opcode: u8) -> Option<&'static str> {
    let name = match opcode {
        OP_0 => "OP_0",
        OP_PUSHDATA1 => "OP_PUSHDATA1",
        OP_PUSHDATA2 => "OP_PUSHDATA2",
        OP_PUSHDATA4 => "OP_PUSHDATA4",
        OP_1NEGATE => "OP_1NEGATE",
        OP_RESERVED => "OP_RESERVED",
        OP_1 => "OP_1",
        OP_2 => "OP_2",
        OP_3 => "OP_3",
        OP_4 => "OP_4",
        OP_5 => "OP_5",
        OP_6 => "OP_6",
        OP_7 => "OP_7",
        OP_8 => "OP_8",
        OP_9 => "OP_9",
        OP_10 => "OP_10",
        OP_11 => "OP_11",
        OP_12 => "OP_12",
        OP_13 => "OP_13",
        OP_14 => "OP_14",
        OP_15 => "OP_15",
        OP_16 => "OP_16",
        OP_NOP => "OP_NOP",
        OP_VER => "OP_VER",
        OP_IF => "OP_IF",
        OP_NOTIF => "OP_NOTIF",
        OP_VERIF => "OP_VERIF",
        OP_VERNOTIF => "OP_VERNOTIF",
        OP_ELSE => "OP_ELSE",
        OP_ENDIF => "OP_ENDIF",
        OP_VERIFY => "OP_VERIFY",
        OP_RETURN => "OP_RETURN",
        OP_TOALTSTACK => "OP_TOALTSTACK",
        OP_FROMALTSTACK => "OP_FROMALTSTACK",
        OP_2DROP => "OP_2DROP",
        OP_2DUP => "OP_2DUP",
        OP_3DUP => "OP_3DUP",
        OP_2OVER => "OP_2OVER",
        OP_2ROT => "OP_2ROT",
        OP_2SWAP => "OP_2SWAP",
        OP_IFDUP => "OP_IFDUP",
        OP_DEPTH => "OP_DEPTH",
        OP_DROP => "OP_DROP",
        OP_DUP => "OP_DUP",
        OP_NIP => "OP_NIP",
        OP_OVER => "OP_OVER",
        OP_PICK => "OP_PICK",
        OP_ROLL => "OP_ROLL",
        OP_ROT => "OP_ROT",
        OP_SWAP => "OP_SWAP",
        OP_TUCK => "OP_TUCK",
        OP_CAT => "OP_CAT",
        OP_SUBSTR => "OP_SUBSTR",
        OP_LEFT => "OP_LEFT",
        OP_RIGHT => "OP_RIGHT",
        OP_SIZE => "OP_SIZE",
        OP_INVERT => "OP_INVERT",
        OP_AND => "OP_AND",
        OP_OR => "OP_OR",
        OP_XOR => "OP_XOR",
        OP_EQUAL => "OP_EQUAL",
        OP_EQUALVERIFY => "OP_EQUALVERIFY",
        OP_RESERVED1 => "OP_RESERVED1",
        OP_RESERVED2 => "OP_RESERVED2",
        OP_1ADD => "OP_1ADD",
        OP_1SUB => "OP_1SUB",
        OP_2MUL => "OP_2MUL",
        OP_2DIV => "OP_2DIV",
        OP_NEGATE => "OP_NEGATE",
        OP_ABS => "OP_ABS",
        OP_NOT => "OP_NOT",
        OP_0NOTEQUAL => "OP_0NOTEQUAL",
        OP_ADD => "OP_ADD",
        OP_SUB => "OP_SUB",
        OP_MUL => "OP_MUL",
        OP_DIV => "OP_DIV",
        OP_MOD => "OP_MOD",
        OP_LSHIFT => "OP_LSHIFT",
        OP_RSHIFT => "OP_RSHIFT",
        OP_BOOLAND => "OP_BOOLAND",
        OP_BOOLOR => "OP_BOOLOR",
        OP_NUMEQUAL => "OP_NUMEQUAL",
        OP_NUMEQUALVERIFY => "OP_NUMEQUALVERIFY",
        OP_NUMNOTEQUAL => "OP_NUMNOTEQUAL",
        OP_LESSTHAN => "OP_LESSTHAN",
        OP_GREATERTHAN => "OP_GREATERTHAN",
        OP_LESSTHANOREQUAL => "OP_LESSTHANOREQUAL",
        OP_GREATERTHANOREQUAL => "OP_GREATERTHANOREQUAL",
        OP_MIN => "OP_MIN",
        OP_MAX => "OP_MAX",
        OP_WITHIN => "OP_WITHIN",
        OP_RIPEMD160 => "OP_RIPEMD160",
        OP_SHA1 => "OP_SHA1",
        OP_SHA256 => "OP_SHA256",
        OP_HASH160 => "OP_HASH160",
        OP_HASH256 => "OP_HASH256",
        OP_CODESEPARATOR => "OP_CODESEPARATOR",
        OP_CHECKSIG => "OP_CHECKSIG",
        OP_CHECKSIGVERIFY => "OP_CHECKSIGVERIFY",
        OP_CHECKMULTISIG => "OP_CHECKMULTISIG",
        OP_CHECKMULTISIGVERIFY => "OP_CHECKMULTISIGVERIFY",
        OP_NOP1 => "OP_NOP1",
        OP_CHECKLOCKTIMEVERIFY => "OP_CHECKLOCKTIMEVERIFY",
        OP_CHECKSEQUENCEVERIFY => "OP_CHECKSEQUENCEVERIFY",
        OP_NOP4 => "OP_NOP4",
        OP_NOP5 => "OP_NOP5",
        OP_NOP6 => "OP_NOP6",
        OP_NOP7 => "OP_NOP7",
        OP_NOP8 => "OP_NOP8",
        OP_NOP9 => "OP_NOP9",
        OP_NOP10 => "OP_NOP10",
        OP_CHECKDATASIG => "OP_CHECKDATASIG",
        OP_CHECKDATASIGVERIFY => "OP_CHECKDATASIGVERIFY",
        OP_COLOR => "OP_COLOR",
        OP_PUBKEYHASH => "OP_PUBKEYHASH",
        OP_PUBKEY => "OP_PUBKEY",
        OP_INVALIDOPCODE => "OP_INVALIDOPCODE",
        _ => return None,
    };
    Some(name)
}

/// Opcode byte for a symbolic name, with or without the `OP_` prefix.
pub fn name_to_opcode(name: &str) -> Option<u8> {
    let bare = name.strip_prefix("OP_").unwrap_or(name);
    match bare {
        "FALSE" => return Some(OP_FALSE),
        "TRUE" => return Some(OP_TRUE),
        "NOP2" => return Some(OP_NOP2),
        "NOP3" => return Some(OP_NOP3),
        _ => {}
    }
    let full = format!("OP_{}", bare);
    (0..=u8::MAX).find(|&op| opcode_to_name(op) == Some(full.as_str()))
}

/// Whether the byte has an entry in the opcode table.
///
/// Direct push lengths (0x01-0x4b) count as defined.
pub fn is_defined(opcode: u8) -> bool {
    is_direct_push(opcode) || opcode_to_name(opcode).is_some()
}

/// 0x01-0x4b: the opcode byte is itself the push length
pub fn is_direct_push(opcode: u8) -> bool {
    (0x01..OP_PUSHDATA1).contains(&opcode)
}

/// Opcodes that carry a pushdata payload (OP_0 through OP_PUSHDATA4)
pub fn is_push_opcode(opcode: u8) -> bool {
    opcode <= OP_PUSHDATA4
}

/// Whether the opcode is disabled unconditionally
pub fn is_disabled(opcode: u8) -> bool {
    DISABLED_OPCODES.contains(&opcode)
}

/// Category of a defined opcode, `None` for undefined bytes
pub fn opcode_category(opcode: u8) -> Option<OpcodeCategory> {
    let category = match opcode {
        OP_0..=OP_PUSHDATA4 | OP_1NEGATE | OP_1..=OP_16 => OpcodeCategory::Push,
        OP_RESERVED | OP_VER | OP_VERIF | OP_VERNOTIF | OP_RESERVED1 | OP_RESERVED2 => {
            OpcodeCategory::Reserved
        }
        OP_NOP | OP_IF | OP_NOTIF | OP_ELSE | OP_ENDIF | OP_VERIFY | OP_RETURN => {
            OpcodeCategory::Flow
        }
        OP_TOALTSTACK..=OP_TUCK => OpcodeCategory::Stack,
        OP_CAT..=OP_SIZE => OpcodeCategory::Splice,
        OP_INVERT..=OP_EQUALVERIFY => OpcodeCategory::Bitwise,
        OP_1ADD..=OP_WITHIN => OpcodeCategory::Arithmetic,
        OP_RIPEMD160..=OP_CHECKMULTISIGVERIFY | OP_CHECKDATASIG | OP_CHECKDATASIGVERIFY => {
            OpcodeCategory::Crypto
        }
        OP_NOP1..=OP_NOP10 => OpcodeCategory::Locktime,
        OP_COLOR => OpcodeCategory::Color,
        OP_PUBKEYHASH | OP_PUBKEY | OP_INVALIDOPCODE => OpcodeCategory::Pseudo,
        _ => return None,
    };
    Some(category)
}

/// Opcode pushing a small integer: 0 -> OP_0, -1 -> OP_1NEGATE, 1..=16 -> OP_1..OP_16
pub fn small_int_to_opcode(n: i64) -> Option<u8> {
    match n {
        0 => Some(OP_0),
        -1 => Some(OP_1NEGATE),
        1..=16 => Some(OP_1 + (n as u8 - 1)),
        _ => None,
    }
}

/// Inverse of [`small_int_to_opcode`]
pub fn opcode_to_small_int(opcode: u8) -> Option<i64> {
    match opcode {
        OP_0 => Some(0),
        OP_1NEGATE => Some(-1),
        OP_1..=OP_16 => Some((opcode - OP_1) as i64 + 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_bijection() {
        for op in 0..=u8::MAX {
            if let Some(name) = opcode_to_name(op) {
                assert_eq!(name_to_opcode(name), Some(op), "{}", name);
            }
        }
    }

    #[test]
    fn test_legacy_aliases_resolve_to_modern_names() {
        assert_eq!(name_to_opcode("OP_NOP2"), Some(OP_CHECKLOCKTIMEVERIFY));
        assert_eq!(name_to_opcode("NOP3"), Some(OP_CHECKSEQUENCEVERIFY));
        assert_eq!(opcode_to_name(OP_NOP2), Some("OP_CHECKLOCKTIMEVERIFY"));
        assert_eq!(opcode_to_name(OP_NOP3), Some("OP_CHECKSEQUENCEVERIFY"));
        assert_eq!(name_to_opcode("OP_TRUE"), Some(OP_1));
        assert_eq!(name_to_opcode("DUP"), Some(OP_DUP));
        assert_eq!(name_to_opcode("OP_NOPE"), None);
    }

    #[test]
    fn test_small_ints() {
        assert_eq!(small_int_to_opcode(0), Some(OP_0));
        assert_eq!(small_int_to_opcode(-1), Some(OP_1NEGATE));
        assert_eq!(small_int_to_opcode(16), Some(OP_16));
        assert_eq!(small_int_to_opcode(17), None);
        assert_eq!(small_int_to_opcode(-2), None);
        for n in -1..=16 {
            assert_eq!(opcode_to_small_int(small_int_to_opcode(n).unwrap()), Some(n));
        }
        assert_eq!(opcode_to_small_int(OP_RESERVED), None);
    }

    #[test]
    fn test_defined_opcodes() {
        assert!(is_defined(0x01));
        assert!(is_defined(OP_COLOR));
        assert!(is_defined(OP_INVALIDOPCODE));
        assert!(!is_defined(0xbd));
        assert!(!is_defined(0xfc));
        assert_eq!(opcode_category(0xc0), None);
        assert_eq!(opcode_category(OP_COLOR), Some(OpcodeCategory::Color));
        assert_eq!(opcode_category(OP_CHECKLOCKTIMEVERIFY), Some(OpcodeCategory::Locktime));
        assert_eq!(opcode_category(OP_VERIF), Some(OpcodeCategory::Reserved));
    }

    #[test]
    fn test_disabled_opcodes() {
        assert!(is_disabled(OP_CAT));
        assert!(is_disabled(OP_RSHIFT));
        assert!(!is_disabled(OP_SIZE));
        assert!(!is_disabled(OP_EQUAL));
    }
}
