//! Error types for script parsing and consensus evaluation

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Library-level errors raised by the codec, builders and parsers.
///
/// Consensus outcomes of script evaluation are reported as [`ScriptError`]
/// instead; a [`ScriptError`] can be lifted into this type via `?`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("Push data too large: {0} bytes")]
    PushDataTooLarge(usize),

    #[error("Script number overflow: {0} bytes")]
    NumberOverflow(usize),

    #[error("Non-minimally encoded script number")]
    NonMinimalNumber,

    #[error("Invalid color identifier: {0}")]
    InvalidColorId(String),

    #[error("Unknown verification flag: {0}")]
    UnknownFlag(String),

    #[error("Unknown script error name: {0}")]
    UnknownScriptError(String),

    #[error("Invalid script asm: {0}")]
    InvalidAsm(String),

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Invalid script template: {0}")]
    InvalidTemplate(String),

    #[error("Script execution failed: {0}")]
    ScriptExecution(#[from] ScriptError),
}

pub type Result<T> = std::result::Result<T, ConsensusError>;

/// Closed taxonomy of script evaluation outcomes.
///
/// Every rejection path of the interpreter maps to exactly one variant.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptError {
    #[error("No error")]
    Ok,
    #[error("Unknown error")]
    UnknownError,
    #[error("Script evaluated without error but finished with a false/empty top stack element")]
    EvalFalse,
    #[error("OP_RETURN was encountered")]
    OpReturn,

    // Max sizes
    #[error("Script is too big")]
    ScriptSize,
    #[error("Push value size limit exceeded")]
    PushSize,
    #[error("Operation limit exceeded")]
    OpCount,
    #[error("Stack size limit exceeded")]
    StackSize,
    #[error("Signature count negative or greater than pubkey count")]
    SigCount,
    #[error("Pubkey count negative or limit exceeded")]
    PubkeyCount,

    // Failed verify operations
    #[error("Script failed an OP_VERIFY operation")]
    Verify,
    #[error("Script failed an OP_EQUALVERIFY operation")]
    EqualVerify,
    #[error("Script failed an OP_CHECKMULTISIGVERIFY operation")]
    CheckMultiSigVerify,
    #[error("Script failed an OP_CHECKSIGVERIFY operation")]
    CheckSigVerify,
    #[error("Script failed an OP_CHECKDATASIGVERIFY operation")]
    CheckDataSigVerify,
    #[error("Script failed an OP_NUMEQUALVERIFY operation")]
    NumEqualVerify,

    // Logical/format/canonical errors
    #[error("Opcode missing or not understood")]
    BadOpcode,
    #[error("Attempted to use a disabled opcode")]
    DisabledOpcode,
    #[error("Operation not valid with the current stack size")]
    InvalidStackOperation,
    #[error("Operation not valid with the current altstack size")]
    InvalidAltstackOperation,
    #[error("Invalid OP_IF construction")]
    UnbalancedConditional,

    // CHECKLOCKTIMEVERIFY and CHECKSEQUENCEVERIFY
    #[error("Negative locktime")]
    NegativeLocktime,
    #[error("Locktime requirement not satisfied")]
    UnsatisfiedLocktime,

    // Malleability
    #[error("Signature hash type missing or not understood")]
    SigHashType,
    #[error("Non-canonical DER signature")]
    SigDer,
    #[error("Data push larger than necessary")]
    MinimalData,
    #[error("Only push operators allowed in signatures")]
    SigPushOnly,
    #[error("Non-canonical signature: S value is unnecessarily high")]
    SigHighS,
    #[error("Dummy CHECKMULTISIG argument must be zero")]
    SigNullDummy,
    #[error("Public key is neither compressed or uncompressed")]
    PubkeyType,
    #[error("Extra items left on stack after execution")]
    CleanStack,
    #[error("OP_IF/NOTIF argument must be minimal")]
    MinimalIf,
    #[error("Signature must be zero for failed CHECK(MULTI)SIG operation")]
    SigNullFail,

    // Softfork safeness
    #[error("NOPx reserved for soft-fork upgrades")]
    DiscourageUpgradableNops,

    // Constant scriptCode
    #[error("Using OP_CODESEPARATOR in non-witness script")]
    OpCodeSeparator,
    #[error("Signature is found in scriptCode")]
    SigFindAndDelete,

    // Schnorr
    #[error("Signature has invalid length")]
    SigBadLength,
    #[error("Mixed signature schemes in a single OP_CHECKMULTISIG")]
    MixedSchemeMultisig,

    // OP_COLOR
    #[error("OP_COLOR is not expected here")]
    OpColorUnexpected,
    #[error("Invalid color identifier for OP_COLOR")]
    OpColorId,
    #[error("Multiple OP_COLOR in a single script")]
    OpColorMultiple,
    #[error("OP_COLOR inside a conditional branch")]
    OpColorInBranch,
    #[error("OP_COLOR inside a P2SH redeem script")]
    OpColorInRedeemScript,
}

impl ScriptError {
    /// Every variant, in declaration order.
    pub const ALL: [ScriptError; 43] = [
        ScriptError::Ok,
        ScriptError::UnknownError,
        ScriptError::EvalFalse,
        ScriptError::OpReturn,
        ScriptError::ScriptSize,
        ScriptError::PushSize,
        ScriptError::OpCount,
        ScriptError::StackSize,
        ScriptError::SigCount,
        ScriptError::PubkeyCount,
        ScriptError::Verify,
        ScriptError::EqualVerify,
        ScriptError::CheckMultiSigVerify,
        ScriptError::CheckSigVerify,
        ScriptError::CheckDataSigVerify,
        ScriptError::NumEqualVerify,
        ScriptError::BadOpcode,
        ScriptError::DisabledOpcode,
        ScriptError::InvalidStackOperation,
        ScriptError::InvalidAltstackOperation,
        ScriptError::UnbalancedConditional,
        ScriptError::NegativeLocktime,
        ScriptError::UnsatisfiedLocktime,
        ScriptError::SigHashType,
        ScriptError::SigDer,
        ScriptError::MinimalData,
        ScriptError::SigPushOnly,
        ScriptError::SigHighS,
        ScriptError::SigNullDummy,
        ScriptError::PubkeyType,
        ScriptError::CleanStack,
        ScriptError::MinimalIf,
        ScriptError::SigNullFail,
        ScriptError::DiscourageUpgradableNops,
        ScriptError::OpCodeSeparator,
        ScriptError::SigFindAndDelete,
        ScriptError::SigBadLength,
        ScriptError::MixedSchemeMultisig,
        ScriptError::OpColorUnexpected,
        ScriptError::OpColorId,
        ScriptError::OpColorMultiple,
        ScriptError::OpColorInBranch,
        ScriptError::OpColorInRedeemScript,
    ];

    /// Stable upper-snake name used by conformance vectors (`SCRIPT_ERR_` prefix dropped).
    pub fn name(self) -> &'static str {
        match self {
            ScriptError::Ok => "OK",
            ScriptError::UnknownError => "UNKNOWN_ERROR",
            ScriptError::EvalFalse => "EVAL_FALSE",
            ScriptError::OpReturn => "OP_RETURN",
            ScriptError::ScriptSize => "SCRIPT_SIZE",
            ScriptError::PushSize => "PUSH_SIZE",
            ScriptError::OpCount => "OP_COUNT",
            ScriptError::StackSize => "STACK_SIZE",
            ScriptError::SigCount => "SIG_COUNT",
            ScriptError::PubkeyCount => "PUBKEY_COUNT",
            ScriptError::Verify => "VERIFY",
            ScriptError::EqualVerify => "EQUALVERIFY",
            ScriptError::CheckMultiSigVerify => "CHECKMULTISIGVERIFY",
            ScriptError::CheckSigVerify => "CHECKSIGVERIFY",
            ScriptError::CheckDataSigVerify => "CHECKDATASIGVERIFY",
            ScriptError::NumEqualVerify => "NUMEQUALVERIFY",
            ScriptError::BadOpcode => "BAD_OPCODE",
            ScriptError::DisabledOpcode => "DISABLED_OPCODE",
            ScriptError::InvalidStackOperation => "INVALID_STACK_OPERATION",
            ScriptError::InvalidAltstackOperation => "INVALID_ALTSTACK_OPERATION",
            ScriptError::UnbalancedConditional => "UNBALANCED_CONDITIONAL",
            ScriptError::NegativeLocktime => "NEGATIVE_LOCKTIME",
            ScriptError::UnsatisfiedLocktime => "UNSATISFIED_LOCKTIME",
            ScriptError::SigHashType => "SIG_HASHTYPE",
            ScriptError::SigDer => "SIG_DER",
            ScriptError::MinimalData => "MINIMALDATA",
            ScriptError::SigPushOnly => "SIG_PUSHONLY",
            ScriptError::SigHighS => "SIG_HIGH_S",
            ScriptError::SigNullDummy => "SIG_NULLDUMMY",
            ScriptError::PubkeyType => "PUBKEYTYPE",
            ScriptError::CleanStack => "CLEANSTACK",
            ScriptError::MinimalIf => "MINIMALIF",
            ScriptError::SigNullFail => "NULLFAIL",
            ScriptError::DiscourageUpgradableNops => "DISCOURAGE_UPGRADABLE_NOPS",
            ScriptError::OpCodeSeparator => "OP_CODESEPARATOR",
            ScriptError::SigFindAndDelete => "SIG_FINDANDDELETE",
            ScriptError::SigBadLength => "SIG_BADLENGTH",
            ScriptError::MixedSchemeMultisig => "MIXED_SCHEME_MULTISIG",
            ScriptError::OpColorUnexpected => "OP_COLORUNEXPECTED",
            ScriptError::OpColorId => "OP_COLORID",
            ScriptError::OpColorMultiple => "OP_COLORMULTIPLE",
            ScriptError::OpColorInBranch => "OP_COLORINBRANCH",
            ScriptError::OpColorInRedeemScript => "OP_COLORINREDEEMSCRIPT",
        }
    }
}

impl FromStr for ScriptError {
    type Err = ConsensusError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        let name = name.strip_prefix("SCRIPT_ERR_").unwrap_or(name);
        ScriptError::ALL
            .iter()
            .copied()
            .find(|err| err.name() == name)
            .ok_or_else(|| ConsensusError::UnknownScriptError(s.to_string()))
    }
}
