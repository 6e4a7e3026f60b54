//! # Tapyrus Script
//!
//! Script codec and consensus interpreter for the Tapyrus ledger.
//!
//! The crate decides whether a spending input (scriptSig) satisfies the
//! conditions of the output it spends (scriptPubKey). It never touches curve
//! math or the spending transaction: signature and lock-time verdicts come from
//! a caller-supplied [`SignatureChecker`].
//!
//! ## Architecture
//!
//! - Opcode table (`opcodes`)
//! - Script/Chunk codec, script numbers and templates (`script`, `script_num`, `color`)
//! - Interpreter and its oracle (`interpreter`, `checker`, `signature`)
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: evaluation is a pure function of the scripts, flags and oracle answers
//! 2. **Total**: every rejection of untrusted input is a specific [`ScriptError`]
//! 3. **Flag-gated policy**: one engine serves block replay and relay policy
//! 4. **Exact Version Pinning**: consensus-critical dependencies pinned to exact versions
//!
//! ## Usage
//!
//! ```rust
//! use tapyrus_script::{ScriptEngine, Script, NullSignatureChecker};
//!
//! let engine = ScriptEngine::default();
//! let script_sig = Script::from_asm("6").unwrap();
//! let script_pubkey = Script::from_asm("1 OP_ADD 7 OP_EQUAL").unwrap();
//! assert!(engine
//!     .verify_script(&script_sig, &script_pubkey, &NullSignatureChecker)
//!     .is_ok());
//! ```

pub mod checker;
pub mod color;
pub mod constants;
pub mod error;
pub mod flags;
pub mod hash;
pub mod interpreter;
pub mod opcodes;
pub mod script;
pub mod script_num;
pub mod signature;
pub mod types;

// Re-export commonly used types
pub use checker::{NullSignatureChecker, SigVersion, SignatureChecker, TimeLockChecker};
pub use color::{ColorIdentifier, TokenType};
pub use error::{ConsensusError, Result, ScriptError};
pub use flags::VerifyFlags;
pub use interpreter::Interpreter;
pub use script::{Chunk, Script};
pub use types::*;

/// Script verification engine configured with a fixed flag set
///
/// # Examples
///
/// ```
/// use tapyrus_script::{ScriptEngine, ScriptError, VerifyFlags, NullSignatureChecker};
///
/// let engine = ScriptEngine::new(VerifyFlags::MANDATORY);
/// let script_sig = engine.parse_script(&[0x00]); // OP_0
/// let script_pubkey = engine.parse_script(&[0x51, 0x87]); // OP_1 OP_EQUAL
///
/// let result = engine.verify_script(&script_sig, &script_pubkey, &NullSignatureChecker);
/// assert_eq!(result, Err(ScriptError::EvalFalse));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScriptEngine {
    flags: VerifyFlags,
}

impl ScriptEngine {
    /// Create an engine enforcing `flags`
    ///
    /// # Panics
    ///
    /// Verification panics if `flags` contains CLEANSTACK without P2SH.
    pub fn new(flags: VerifyFlags) -> Self {
        Self { flags }
    }

    pub fn flags(&self) -> VerifyFlags {
        self.flags
    }

    /// Parse raw script bytes. Never fails; malformed pushes surface during evaluation.
    ///
    /// # Examples
    ///
    /// ```
    /// use tapyrus_script::ScriptEngine;
    ///
    /// let engine = ScriptEngine::default();
    /// let script = engine.parse_script(&[0x76, 0xa9]);
    /// assert_eq!(script.to_string(), "OP_DUP OP_HASH160");
    /// ```
    pub fn parse_script(&self, bytes: &[u8]) -> Script {
        Script::parse(bytes)
    }

    /// Verify a scriptSig / scriptPubKey pair
    ///
    /// # Examples
    ///
    /// ```
    /// use tapyrus_script::{ScriptEngine, Script, NullSignatureChecker};
    ///
    /// let engine = ScriptEngine::default();
    /// let redeem_script = Script::from_asm("2 OP_EQUAL").unwrap();
    /// let script_sig = Script::new()
    ///     .append_int(2)
    ///     .append_data(&redeem_script.to_bytes())
    ///     .unwrap();
    ///
    /// let result = engine.verify_script(&script_sig, &redeem_script.to_p2sh(), &NullSignatureChecker);
    /// assert!(result.is_ok());
    /// ```
    pub fn verify_script(
        &self,
        script_sig: &Script,
        script_pubkey: &Script,
        checker: &dyn SignatureChecker,
    ) -> std::result::Result<(), ScriptError> {
        interpreter::verify_script(script_sig, script_pubkey, self.flags, checker)
    }

    /// Evaluate a single script on `stack`, returning the resulting stack
    ///
    /// # Examples
    ///
    /// ```
    /// use tapyrus_script::{ScriptEngine, Script, NullSignatureChecker};
    ///
    /// let engine = ScriptEngine::default();
    /// let script = Script::from_asm("OP_2DUP OP_ADD").unwrap();
    /// let stack = engine
    ///     .eval_script(&script, vec![vec![2], vec![3]], &NullSignatureChecker)
    ///     .unwrap();
    /// assert_eq!(stack, vec![vec![2], vec![3], vec![5]]);
    /// ```
    pub fn eval_script(
        &self,
        script: &Script,
        stack: Vec<StackItem>,
        checker: &dyn SignatureChecker,
    ) -> std::result::Result<Vec<StackItem>, ScriptError> {
        let mut interpreter = Interpreter::new(self.flags, checker);
        interpreter.set_stack(stack);
        interpreter.eval_script(script, false)?;
        Ok(interpreter.stack().to_vec())
    }
}

impl Default for ScriptEngine {
    /// Engine enforcing the standard relay policy
    fn default() -> Self {
        Self::new(VerifyFlags::STANDARD)
    }
}
