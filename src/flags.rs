//! Script verification flags

use crate::error::{ConsensusError, Result};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Independently toggleable verification rules.
    ///
    /// Consensus rules and relay policy share one engine: a historical block is
    /// replayed with [`VerifyFlags::MANDATORY`], mempool acceptance uses
    /// [`VerifyFlags::STANDARD`].
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct VerifyFlags: u32 {
        /// Evaluate P2SH redeem scripts.
        const P2SH = 1 << 0;

        /// Signatures must be strict DER with a defined hashtype, and
        /// pubkeys must be compressed or uncompressed SEC encodings.
        const STRICTENC = 1 << 1;

        /// Signatures must be strict DER.
        const DERSIG = 1 << 2;

        /// Signatures must have S <= order/2.
        const LOW_S = 1 << 3;

        /// The extra CHECKMULTISIG argument must be empty.
        const NULLDUMMY = 1 << 4;

        /// scriptSig may contain push operations only.
        const SIGPUSHONLY = 1 << 5;

        /// Pushes and numeric operands must use their minimal encoding.
        const MINIMALDATA = 1 << 6;

        /// Executing NOP1, NOP4-NOP10 fails the script.
        const DISCOURAGE_UPGRADABLE_NOPS = 1 << 7;

        /// Exactly one stack element must remain after evaluation.
        /// Must never be used without P2SH.
        const CLEANSTACK = 1 << 8;

        /// Enable OP_CHECKLOCKTIMEVERIFY.
        const CHECKLOCKTIMEVERIFY = 1 << 9;

        /// Enable OP_CHECKSEQUENCEVERIFY.
        const CHECKSEQUENCEVERIFY = 1 << 10;

        /// OP_IF/OP_NOTIF arguments must be empty or exactly 0x01.
        const MINIMALIF = 1 << 13;

        /// A failed signature check must have supplied an empty signature.
        const NULLFAIL = 1 << 14;

        /// Fail when find-and-delete would alter the scriptCode, and on OP_CODESEPARATOR.
        const CONST_SCRIPTCODE = 1 << 16;
    }
}

impl VerifyFlags {
    /// Rules every block must satisfy.
    pub const MANDATORY: VerifyFlags = VerifyFlags::P2SH;

    /// Rules applied to transactions accepted for relay.
    pub const STANDARD: VerifyFlags = VerifyFlags::P2SH
        .union(VerifyFlags::STRICTENC)
        .union(VerifyFlags::DERSIG)
        .union(VerifyFlags::LOW_S)
        .union(VerifyFlags::NULLDUMMY)
        .union(VerifyFlags::MINIMALDATA)
        .union(VerifyFlags::DISCOURAGE_UPGRADABLE_NOPS)
        .union(VerifyFlags::CLEANSTACK)
        .union(VerifyFlags::CHECKLOCKTIMEVERIFY)
        .union(VerifyFlags::CHECKSEQUENCEVERIFY)
        .union(VerifyFlags::MINIMALIF)
        .union(VerifyFlags::NULLFAIL)
        .union(VerifyFlags::CONST_SCRIPTCODE);
}

impl Default for VerifyFlags {
    fn default() -> Self {
        VerifyFlags::STANDARD
    }
}

impl FromStr for VerifyFlags {
    type Err = ConsensusError;

    /// Parses a comma-separated list of flag names, e.g. `"P2SH,STRICTENC"`.
    fn from_str(s: &str) -> Result<Self> {
        let mut flags = VerifyFlags::empty();
        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if name == "NONE" {
                continue;
            }
            let name = name.strip_prefix("SCRIPT_VERIFY_").unwrap_or(name);
            let flag = VerifyFlags::from_name(name)
                .ok_or_else(|| ConsensusError::UnknownFlag(name.to_string()))?;
            flags |= flag;
        }
        Ok(flags)
    }
}

impl fmt::Display for VerifyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "NONE");
        }
        let names: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        write!(f, "{}", names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_positions() {
        assert_eq!(VerifyFlags::P2SH.bits(), 1);
        assert_eq!(VerifyFlags::MINIMALIF.bits(), 1 << 13);
        assert_eq!(VerifyFlags::CONST_SCRIPTCODE.bits(), 1 << 16);
    }

    #[test]
    fn test_parse_flag_list() {
        let flags: VerifyFlags = "P2SH, STRICTENC,SCRIPT_VERIFY_NULLFAIL".parse().unwrap();
        assert_eq!(
            flags,
            VerifyFlags::P2SH | VerifyFlags::STRICTENC | VerifyFlags::NULLFAIL
        );
        assert_eq!("".parse::<VerifyFlags>().unwrap(), VerifyFlags::empty());
        assert_eq!("NONE".parse::<VerifyFlags>().unwrap(), VerifyFlags::empty());
        assert!("P2SH,WITNESS".parse::<VerifyFlags>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let flags = VerifyFlags::STANDARD;
        assert_eq!(flags.to_string().parse::<VerifyFlags>().unwrap(), flags);
        assert_eq!(VerifyFlags::empty().to_string(), "NONE");
    }

    #[test]
    fn test_standard_contains_mandatory() {
        assert!(VerifyFlags::STANDARD.contains(VerifyFlags::MANDATORY));
        assert!(VerifyFlags::STANDARD.contains(VerifyFlags::CLEANSTACK));
        assert!(!VerifyFlags::STANDARD.contains(VerifyFlags::SIGPUSHONLY));
        assert_eq!(VerifyFlags::default(), VerifyFlags::STANDARD);
    }
}
