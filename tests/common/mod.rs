//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use tapyrus_script::{Script, SigVersion, SignatureChecker};

/// Strict DER signature (r = 1, s = 1) with SIGHASH_ALL
pub const DER_SIG: [u8; 9] = [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01, 0x01];

pub fn setup_logging() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}

/// Distinct strict-DER signatures, differing in r
pub fn der_sig(r: u8) -> Vec<u8> {
    assert!(r > 0 && r < 0x80);
    let mut sig = DER_SIG.to_vec();
    sig[4] = r;
    sig
}

/// 65-byte Schnorr signature with SIGHASH_ALL
pub fn schnorr_sig(fill: u8) -> Vec<u8> {
    let mut sig = vec![fill; 65];
    sig[64] = 0x01;
    sig
}

/// Compressed-looking public key
pub fn pubkey(fill: u8) -> Vec<u8> {
    let mut key = vec![fill; 33];
    key[0] = 0x02;
    key
}

/// Scripted signature oracle
#[derive(Default)]
pub struct MockChecker {
    /// (signature, pubkey) pairs that verify
    pub valid: Vec<(Vec<u8>, Vec<u8>)>,
    pub accept_all: bool,
    pub locktime_ok: bool,
    pub sequence_ok: bool,
    pub sig_calls: Cell<usize>,
    pub last_subscript: RefCell<Option<Script>>,
    pub last_digest: RefCell<Option<[u8; 32]>>,
}

impl MockChecker {
    pub fn accepting(valid: Vec<(Vec<u8>, Vec<u8>)>) -> Self {
        MockChecker {
            valid,
            ..Default::default()
        }
    }

    pub fn accept_all() -> Self {
        MockChecker {
            accept_all: true,
            locktime_ok: true,
            sequence_ok: true,
            ..Default::default()
        }
    }

    pub fn sig_calls(&self) -> usize {
        self.sig_calls.get()
    }

    fn verdict(&self, sig: &[u8], pubkey: &[u8]) -> bool {
        self.sig_calls.set(self.sig_calls.get() + 1);
        self.accept_all
            || self
                .valid
                .iter()
                .any(|(s, p)| s.as_slice() == sig && p.as_slice() == pubkey)
    }
}

impl SignatureChecker for MockChecker {
    fn check_sig(&self, sig: &[u8], pubkey: &[u8], subscript: &Script, _version: SigVersion) -> bool {
        *self.last_subscript.borrow_mut() = Some(subscript.clone());
        self.verdict(sig, pubkey)
    }

    fn verify_sig(&self, sig: &[u8], pubkey: &[u8], digest: &[u8; 32]) -> bool {
        *self.last_digest.borrow_mut() = Some(*digest);
        self.verdict(sig, pubkey)
    }

    fn check_locktime(&self, _lock_time: i64) -> bool {
        self.locktime_ok
    }

    fn check_sequence(&self, _sequence: i64) -> bool {
        self.sequence_ok
    }
}
