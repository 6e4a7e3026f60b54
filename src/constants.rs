//! Tapyrus script consensus constants

/// Maximum serialized script length evaluated by the interpreter
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// Maximum size of a single stack element (and of a single push)
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;

/// Maximum number of non-push operations per script
pub const MAX_OPS_PER_SCRIPT: usize = 201;

/// Maximum combined size of the data stack and alt stack
pub const MAX_STACK_SIZE: usize = 1000;

/// Maximum number of public keys in a CHECKMULTISIG
pub const MAX_PUBKEYS_PER_MULTISIG: i64 = 20;

/// Maximum number of public keys in a bare multisig output accepted for relay
pub const MAX_STANDARD_BARE_MULTISIG_KEYS: usize = 3;

/// Default maximum byte length of a numeric operand
pub const DEFAULT_MAX_NUM_SIZE: usize = 4;

/// Maximum byte length of a CHECKLOCKTIMEVERIFY / CHECKSEQUENCEVERIFY operand
pub const LOCKTIME_MAX_NUM_SIZE: usize = 5;

/// Lock time threshold: values below are block heights, values above are timestamps
pub const LOCKTIME_THRESHOLD: i64 = 500_000_000;

/// Sequence number of a final input
pub const SEQUENCE_FINAL: u32 = 0xffff_ffff;

/// If set in a sequence number, relative lock time is disabled
pub const SEQUENCE_LOCKTIME_DISABLE_FLAG: i64 = 1 << 31;

/// If set in a sequence number, the relative lock time is time based
pub const SEQUENCE_LOCKTIME_TYPE_FLAG: i64 = 1 << 22;

/// Mask extracting the relative lock time value
pub const SEQUENCE_LOCKTIME_MASK: i64 = 0x0000_ffff;

/// Size of a Schnorr signature with its trailing hashtype byte
pub const COMPACT_SIGNATURE_SIZE: usize = 65;

/// Size of a Schnorr signature without hashtype (CHECKDATASIG)
pub const SCHNORR_SIGNATURE_SIZE: usize = 64;

/// Size of a compressed public key
pub const COMPRESSED_PUBKEY_SIZE: usize = 33;

/// Size of an uncompressed public key
pub const UNCOMPRESSED_PUBKEY_SIZE: usize = 65;

/// Sighash type: sign all outputs
pub const SIGHASH_ALL: u8 = 0x01;

/// Sighash type: sign no outputs
pub const SIGHASH_NONE: u8 = 0x02;

/// Sighash type: sign the output with the same index
pub const SIGHASH_SINGLE: u8 = 0x03;

/// Sighash modifier: only this input is signed
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;

/// Largest standard OP_RETURN output script in bytes
pub const MAX_OP_RETURN_RELAY: usize = 83;

/// Serialized size of a color identifier (type tag + 32-byte payload)
pub const COLOR_ID_SIZE: usize = 33;
