//! Signature checker oracle
//!
//! The interpreter never touches curve math or the spending transaction.
//! Everything it needs from them is asked through [`SignatureChecker`].

use crate::constants::*;
use crate::script::Script;

/// Signature hashing rules the subscript is committed under
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SigVersion {
    Base,
}

/// Oracle consulted for signature and lock-time verdicts.
///
/// Implementations must be deterministic and side-effect free from the
/// interpreter's point of view. Every method defaults to `false`.
pub trait SignatureChecker {
    /// Verify a transaction signature (hashtype byte included) over `subscript`.
    fn check_sig(&self, _sig: &[u8], _pubkey: &[u8], _subscript: &Script, _version: SigVersion) -> bool {
        false
    }

    /// Verify a signature (no hashtype byte) over a precomputed digest.
    fn verify_sig(&self, _sig: &[u8], _pubkey: &[u8], _digest: &[u8; 32]) -> bool {
        false
    }

    /// OP_CHECKLOCKTIMEVERIFY operand check
    fn check_locktime(&self, _lock_time: i64) -> bool {
        false
    }

    /// OP_CHECKSEQUENCEVERIFY operand check
    fn check_sequence(&self, _sequence: i64) -> bool {
        false
    }
}

/// Rejects everything
#[derive(Debug, Default, Copy, Clone)]
pub struct NullSignatureChecker;

impl SignatureChecker for NullSignatureChecker {}

/// Lock-time oracle for one transaction input (BIP65, BIP112).
///
/// Signature checks always fail.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimeLockChecker {
    /// Transaction nLockTime
    pub lock_time: u32,
    /// Transaction version
    pub version: i32,
    /// nSequence of the input being verified
    pub sequence: u32,
}

impl TimeLockChecker {
    pub fn new(lock_time: u32, version: i32, sequence: u32) -> Self {
        Self {
            lock_time,
            version,
            sequence,
        }
    }
}

impl SignatureChecker for TimeLockChecker {
    fn check_locktime(&self, lock_time: i64) -> bool {
        let tx_lock_time = self.lock_time as i64;

        // Heights and timestamps are not comparable
        let same_kind = (tx_lock_time < LOCKTIME_THRESHOLD && lock_time < LOCKTIME_THRESHOLD)
            || (tx_lock_time >= LOCKTIME_THRESHOLD && lock_time >= LOCKTIME_THRESHOLD);
        if !same_kind || lock_time > tx_lock_time {
            return false;
        }

        // A final input disables nLockTime entirely
        self.sequence != SEQUENCE_FINAL
    }

    fn check_sequence(&self, sequence: i64) -> bool {
        let tx_sequence = self.sequence as i64;

        if self.version < 2 || tx_sequence & SEQUENCE_LOCKTIME_DISABLE_FLAG != 0 {
            return false;
        }

        let mask = SEQUENCE_LOCKTIME_TYPE_FLAG | SEQUENCE_LOCKTIME_MASK;
        let tx_masked = tx_sequence & mask;
        let masked = sequence & mask;

        let same_kind = (tx_masked < SEQUENCE_LOCKTIME_TYPE_FLAG && masked < SEQUENCE_LOCKTIME_TYPE_FLAG)
            || (tx_masked >= SEQUENCE_LOCKTIME_TYPE_FLAG && masked >= SEQUENCE_LOCKTIME_TYPE_FLAG);
        same_kind && masked <= tx_masked
    }
}
