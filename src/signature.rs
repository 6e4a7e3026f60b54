//! Signature and public key encoding rules
//!
//! These checks run before the signature oracle is consulted. They never
//! verify a signature; they only reject encodings the active flags forbid.

use crate::constants::*;
use crate::error::ScriptError;
use crate::flags::VerifyFlags;
use secp256k1::ecdsa::Signature;

/// Signature scheme, distinguished by encoded length
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SigScheme {
    Ecdsa,
    Schnorr,
}

impl SigScheme {
    /// Scheme of a transaction signature (trailing hashtype byte included)
    pub fn of_tx_signature(sig: &[u8]) -> Self {
        if sig.len() == COMPACT_SIGNATURE_SIZE {
            SigScheme::Schnorr
        } else {
            SigScheme::Ecdsa
        }
    }

    /// Scheme of a CHECKDATASIG signature (no hashtype byte)
    pub fn of_data_signature(sig: &[u8]) -> Self {
        if sig.len() == SCHNORR_SIGNATURE_SIZE {
            SigScheme::Schnorr
        } else {
            SigScheme::Ecdsa
        }
    }
}

/// Strict DER (BIP66) check of a signature followed by a hashtype byte.
///
/// Format: 0x30 [total-length] 0x02 [R-length] [R] 0x02 [S-length] [S] [sighash]
pub fn is_valid_signature_encoding(sig: &[u8]) -> bool {
    if sig.len() < 9 || sig.len() > 73 {
        return false;
    }
    if sig[0] != 0x30 || sig[1] as usize != sig.len() - 3 {
        return false;
    }

    let len_r = sig[3] as usize;
    if 5 + len_r >= sig.len() {
        return false;
    }
    let len_s = sig[5 + len_r] as usize;
    if len_r + len_s + 7 != sig.len() {
        return false;
    }

    // R: integer, non-empty, positive, no excess padding
    if sig[2] != 0x02 || len_r == 0 || sig[4] & 0x80 != 0 {
        return false;
    }
    if len_r > 1 && sig[4] == 0x00 && sig[5] & 0x80 == 0 {
        return false;
    }

    // S: same rules
    if sig[len_r + 4] != 0x02 || len_s == 0 || sig[len_r + 6] & 0x80 != 0 {
        return false;
    }
    if len_s > 1 && sig[len_r + 6] == 0x00 && sig[len_r + 7] & 0x80 == 0 {
        return false;
    }
    true
}

/// Whether the DER signature (hashtype stripped) has S <= order/2
pub fn is_low_s(der: &[u8]) -> bool {
    let Ok(sig) = Signature::from_der_lax(der) else {
        return false;
    };
    let mut normalized = sig;
    normalized.normalize_s();
    normalized.serialize_compact() == sig.serialize_compact()
}

/// Hashtype byte, ignoring ANYONECANPAY, is ALL, NONE or SINGLE
pub fn is_defined_hashtype(sig: &[u8]) -> bool {
    let Some(&hashtype) = sig.last() else {
        return false;
    };
    let base = hashtype & !SIGHASH_ANYONECANPAY;
    (SIGHASH_ALL..=SIGHASH_SINGLE).contains(&base)
}

pub fn is_compressed_or_uncompressed_pubkey(pubkey: &[u8]) -> bool {
    match pubkey.len() {
        COMPRESSED_PUBKEY_SIZE => matches!(pubkey[0], 0x02 | 0x03),
        UNCOMPRESSED_PUBKEY_SIZE => pubkey[0] == 0x04,
        _ => false,
    }
}

/// Encoding rules for a CHECKSIG / CHECKMULTISIG signature.
///
/// Empty signatures always pass so that a failing check can still be
/// NULLFAIL-compliant.
pub fn check_signature_encoding(sig: &[u8], flags: VerifyFlags) -> Result<(), ScriptError> {
    if sig.is_empty() {
        return Ok(());
    }
    if SigScheme::of_tx_signature(sig) == SigScheme::Schnorr {
        if flags.contains(VerifyFlags::STRICTENC) && !is_defined_hashtype(sig) {
            return Err(ScriptError::SigHashType);
        }
        return Ok(());
    }
    check_ecdsa_encoding(sig, flags)?;
    if flags.contains(VerifyFlags::STRICTENC) && !is_defined_hashtype(sig) {
        return Err(ScriptError::SigHashType);
    }
    Ok(())
}

/// Encoding rules for a CHECKDATASIG signature, which carries no hashtype
pub fn check_data_signature_encoding(sig: &[u8], flags: VerifyFlags) -> Result<(), ScriptError> {
    if sig.is_empty() || SigScheme::of_data_signature(sig) == SigScheme::Schnorr {
        return Ok(());
    }
    // Reuse the hashtype-suffixed DER rules with a placeholder hashtype
    let mut with_hashtype = sig.to_vec();
    with_hashtype.push(SIGHASH_ALL);
    check_ecdsa_encoding(&with_hashtype, flags)
}

fn check_ecdsa_encoding(sig: &[u8], flags: VerifyFlags) -> Result<(), ScriptError> {
    let der_rules = VerifyFlags::DERSIG | VerifyFlags::LOW_S | VerifyFlags::STRICTENC;
    if flags.intersects(der_rules) && !is_valid_signature_encoding(sig) {
        return Err(ScriptError::SigDer);
    }
    if flags.contains(VerifyFlags::LOW_S) && !is_low_s(&sig[..sig.len() - 1]) {
        return Err(ScriptError::SigHighS);
    }
    Ok(())
}

pub fn check_pubkey_encoding(pubkey: &[u8], flags: VerifyFlags) -> Result<(), ScriptError> {
    if flags.contains(VerifyFlags::STRICTENC) && !is_compressed_or_uncompressed_pubkey(pubkey) {
        return Err(ScriptError::PubkeyType);
    }
    Ok(())
}
