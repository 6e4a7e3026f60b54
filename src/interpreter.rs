//! Script interpreter
//!
//! A stack machine executing one script at a time against a data stack, an
//! alt stack and a flow stack of open conditionals. `verify_script` chains
//! scriptSig, scriptPubKey and, for P2SH outputs, the redeem script.
//!
//! Every rejection is a specific [`ScriptError`]; nothing panics except the
//! CLEANSTACK-without-P2SH programmer error.

use crate::checker::{SigVersion, SignatureChecker};
use crate::color::ColorIdentifier;
use crate::constants::*;
use crate::error::ScriptError;
use crate::flags::VerifyFlags;
use crate::hash;
use crate::opcodes::*;
use crate::script::{Chunk, Script};
use crate::script_num::{cast_to_bool, cast_to_int, encode_bool, encode_number};
use crate::signature::{
    check_data_signature_encoding, check_pubkey_encoding, check_signature_encoding, SigScheme,
};
use crate::types::StackItem;
use log::{debug, trace};

/// LIFO of stack items; depth 0 is the top.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stack(Vec<StackItem>);

impl Stack {
    pub fn new() -> Self {
        Stack(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[StackItem] {
        &self.0
    }

    pub fn push(&mut self, item: StackItem) {
        self.0.push(item)
    }

    pub fn pop(&mut self) -> Result<StackItem, ScriptError> {
        self.0.pop().ok_or(ScriptError::InvalidStackOperation)
    }

    /// Fail unless at least `n` items are present
    pub fn require(&self, n: usize) -> Result<(), ScriptError> {
        if self.0.len() < n {
            return Err(ScriptError::InvalidStackOperation);
        }
        Ok(())
    }

    pub fn top(&self, depth: usize) -> Result<&StackItem, ScriptError> {
        self.require(depth + 1)?;
        Ok(&self.0[self.0.len() - 1 - depth])
    }

    pub fn remove(&mut self, depth: usize) -> Result<StackItem, ScriptError> {
        self.require(depth + 1)?;
        let index = self.0.len() - 1 - depth;
        Ok(self.0.remove(index))
    }

    /// Insert so that the new item ends up at `depth`
    pub fn insert(&mut self, depth: usize, item: StackItem) -> Result<(), ScriptError> {
        self.require(depth)?;
        let index = self.0.len() - depth;
        self.0.insert(index, item);
        Ok(())
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), ScriptError> {
        self.require(a.max(b) + 1)?;
        let len = self.0.len();
        self.0.swap(len - 1 - a, len - 1 - b);
        Ok(())
    }
}

/// Per-script execution state, discarded when the script finishes
struct Execution {
    alt_stack: Stack,
    flow_stack: Vec<bool>,
    op_count: usize,
    last_code_separator: usize,
    is_redeem: bool,
}

impl Execution {
    fn new(is_redeem: bool) -> Self {
        Execution {
            alt_stack: Stack::new(),
            flow_stack: Vec::new(),
            op_count: 0,
            last_code_separator: 0,
            is_redeem,
        }
    }

    fn executing(&self) -> bool {
        !self.flow_stack.contains(&false)
    }

    fn add_ops(&mut self, n: usize) -> Result<(), ScriptError> {
        self.op_count += n;
        if self.op_count > MAX_OPS_PER_SCRIPT {
            return Err(ScriptError::OpCount);
        }
        Ok(())
    }
}

/// Script interpreter for a single verification
pub struct Interpreter<'a> {
    flags: VerifyFlags,
    checker: &'a dyn SignatureChecker,
    stack: Stack,
    color_id: Option<ColorIdentifier>,
    error: ScriptError,
}

impl<'a> Interpreter<'a> {
    pub fn new(flags: VerifyFlags, checker: &'a dyn SignatureChecker) -> Self {
        Interpreter {
            flags,
            checker,
            stack: Stack::new(),
            color_id: None,
            error: ScriptError::Ok,
        }
    }

    pub fn flags(&self) -> VerifyFlags {
        self.flags
    }

    /// Data stack as left by the last evaluation
    pub fn stack(&self) -> &[StackItem] {
        self.stack.as_slice()
    }

    /// Color identifier set by OP_COLOR, if any
    pub fn color_id(&self) -> Option<&ColorIdentifier> {
        self.color_id.as_ref()
    }

    /// Outcome of the last `verify_script` call
    pub fn error(&self) -> ScriptError {
        self.error
    }

    /// Seed the data stack before calling [`Interpreter::eval_script`] directly
    pub fn set_stack(&mut self, items: Vec<StackItem>) {
        self.stack = Stack(items);
    }

    /// Verify that `script_sig` satisfies `script_pubkey`.
    ///
    /// State left by an earlier call (stack, color, outcome) is discarded first.
    pub fn verify_script(&mut self, script_sig: &Script, script_pubkey: &Script) -> Result<(), ScriptError> {
        self.stack = Stack::new();
        self.color_id = None;
        self.error = ScriptError::Ok;
        let result = self.verify(script_sig, script_pubkey);
        self.error = match result {
            Ok(()) => ScriptError::Ok,
            Err(err) => err,
        };
        result
    }

    fn verify(&mut self, script_sig: &Script, script_pubkey: &Script) -> Result<(), ScriptError> {
        if self.flags.contains(VerifyFlags::SIGPUSHONLY) && !script_sig.is_push_only() {
            return Err(ScriptError::SigPushOnly);
        }

        self.eval_script(script_sig, false)?;

        let snapshot = self.flags.contains(VerifyFlags::P2SH).then(|| self.stack.clone());

        self.eval_script(script_pubkey, false)?;
        self.require_true_top()?;

        if let Some(snapshot) = snapshot {
            if script_pubkey.is_p2sh() || script_pubkey.is_cp2sh() {
                if !script_sig.is_push_only() {
                    return Err(ScriptError::SigPushOnly);
                }
                self.stack = snapshot;
                let serialized = self.stack.pop()?;
                let redeem_script = Script::parse(&serialized);
                trace!("evaluating redeem script {}", redeem_script);
                self.eval_script(&redeem_script, true)?;
                self.require_true_top()?;
            }
        }

        if self.flags.contains(VerifyFlags::CLEANSTACK) {
            assert!(
                self.flags.contains(VerifyFlags::P2SH),
                "CLEANSTACK requires P2SH"
            );
            if self.stack.len() != 1 {
                return Err(ScriptError::CleanStack);
            }
        }
        Ok(())
    }

    fn require_true_top(&self) -> Result<(), ScriptError> {
        match self.stack.top(0) {
            Ok(top) if cast_to_bool(top) => Ok(()),
            _ => Err(ScriptError::EvalFalse),
        }
    }

    /// Execute one script against the current data stack.
    ///
    /// The final truthiness of the stack is left to the caller.
    pub fn eval_script(&mut self, script: &Script, is_redeem: bool) -> Result<(), ScriptError> {
        let mut stack = std::mem::take(&mut self.stack);
        let result = self.run(&mut stack, script, is_redeem);
        self.stack = stack;
        result
    }

    fn run(&mut self, stack: &mut Stack, script: &Script, is_redeem: bool) -> Result<(), ScriptError> {
        if script.serialized_size() > MAX_SCRIPT_SIZE {
            debug!("script rejected: {} bytes", script.serialized_size());
            return Err(ScriptError::ScriptSize);
        }

        let mut exec = Execution::new(is_redeem);
        for (index, chunk) in script.chunks().iter().enumerate() {
            let result = self
                .step(stack, &mut exec, script, index, chunk)
                .and_then(|()| {
                    if stack.len() + exec.alt_stack.len() > MAX_STACK_SIZE {
                        return Err(ScriptError::StackSize);
                    }
                    Ok(())
                });
            if let Err(err) = result {
                debug!("script failed at chunk {} ({}): {}", index, chunk, err.name());
                return Err(err);
            }
        }

        if !exec.flow_stack.is_empty() {
            debug!("script ended with {} open conditionals", exec.flow_stack.len());
            return Err(ScriptError::UnbalancedConditional);
        }
        Ok(())
    }

    fn step(
        &mut self,
        stack: &mut Stack,
        exec: &mut Execution,
        script: &Script,
        index: usize,
        chunk: &Chunk,
    ) -> Result<(), ScriptError> {
        let executing = exec.executing();

        if let Chunk::PushData { payload, .. } = chunk {
            if payload.len() > MAX_SCRIPT_ELEMENT_SIZE {
                return Err(ScriptError::PushSize);
            }
            if executing {
                if self.require_minimal() && !chunk.is_minimal_push() {
                    return Err(ScriptError::MinimalData);
                }
                if !chunk.is_well_formed() {
                    return Err(ScriptError::BadOpcode);
                }
                stack.push(payload.clone());
            }
            return Ok(());
        }

        let opcode = chunk.opcode();
        if opcode > OP_16 {
            exec.add_ops(1)?;
        }
        if is_disabled(opcode) {
            return Err(ScriptError::DisabledOpcode);
        }
        if opcode == OP_CODESEPARATOR && self.flags.contains(VerifyFlags::CONST_SCRIPTCODE) {
            return Err(ScriptError::OpCodeSeparator);
        }

        if executing || (OP_IF..=OP_ENDIF).contains(&opcode) {
            trace!("chunk {}: {} (stack depth {})", index, chunk, stack.len());
            self.execute_opcode(opcode, stack, exec, script, index)?;
        }
        Ok(())
    }

    fn require_minimal(&self) -> bool {
        self.flags.contains(VerifyFlags::MINIMALDATA)
    }

    fn pop_int(&self, stack: &mut Stack) -> Result<i64, ScriptError> {
        let item = stack.pop()?;
        cast_to_int(&item, DEFAULT_MAX_NUM_SIZE, self.require_minimal())
            .map_err(|_| ScriptError::UnknownError)
    }

    fn peek_int(&self, stack: &Stack, depth: usize, max_size: usize) -> Result<i64, ScriptError> {
        cast_to_int(stack.top(depth)?, max_size, self.require_minimal())
            .map_err(|_| ScriptError::UnknownError)
    }

    fn discourage_nops(&self) -> Result<(), ScriptError> {
        if self.flags.contains(VerifyFlags::DISCOURAGE_UPGRADABLE_NOPS) {
            return Err(ScriptError::DiscourageUpgradableNops);
        }
        Ok(())
    }

    /// Execute a single non-push opcode
    fn execute_opcode(
        &mut self,
        opcode: u8,
        stack: &mut Stack,
        exec: &mut Execution,
        script: &Script,
        index: usize,
    ) -> Result<(), ScriptError> {
        match opcode {
            // OP_1NEGATE, OP_1 to OP_16 - push the small integer
            OP_1NEGATE | OP_1..=OP_16 => {
                let n = opcode_to_small_int(opcode).ok_or(ScriptError::BadOpcode)?;
                stack.push(encode_number(n));
            }

            // ================================================================
            // CONTROL FLOW
            // ================================================================
            OP_NOP => {}

            OP_NOP1 | OP_NOP4..=OP_NOP10 => self.discourage_nops()?,

            // OP_CHECKLOCKTIMEVERIFY - top must not exceed the transaction lock time
            OP_CHECKLOCKTIMEVERIFY => {
                if !self.flags.contains(VerifyFlags::CHECKLOCKTIMEVERIFY) {
                    return self.discourage_nops();
                }
                let lock_time = self.peek_int(stack, 0, LOCKTIME_MAX_NUM_SIZE)?;
                if lock_time < 0 {
                    return Err(ScriptError::NegativeLocktime);
                }
                if !self.checker.check_locktime(lock_time) {
                    return Err(ScriptError::UnsatisfiedLocktime);
                }
            }

            // OP_CHECKSEQUENCEVERIFY - top must not exceed the input's relative lock time
            OP_CHECKSEQUENCEVERIFY => {
                if !self.flags.contains(VerifyFlags::CHECKSEQUENCEVERIFY) {
                    return self.discourage_nops();
                }
                let sequence = self.peek_int(stack, 0, LOCKTIME_MAX_NUM_SIZE)?;
                if sequence < 0 {
                    return Err(ScriptError::NegativeLocktime);
                }
                if sequence & SEQUENCE_LOCKTIME_DISABLE_FLAG != 0 {
                    return Ok(());
                }
                if !self.checker.check_sequence(sequence) {
                    return Err(ScriptError::UnsatisfiedLocktime);
                }
            }

            OP_IF | OP_NOTIF => {
                let mut value = false;
                if exec.executing() {
                    let condition = stack.pop()?;
                    if self.flags.contains(VerifyFlags::MINIMALIF)
                        && (condition.len() > 1 || (condition.len() == 1 && condition[0] != 1))
                    {
                        return Err(ScriptError::MinimalIf);
                    }
                    value = cast_to_bool(&condition);
                    if opcode == OP_NOTIF {
                        value = !value;
                    }
                }
                exec.flow_stack.push(value);
            }

            OP_ELSE => {
                let innermost = exec
                    .flow_stack
                    .last_mut()
                    .ok_or(ScriptError::UnbalancedConditional)?;
                *innermost = !*innermost;
            }

            OP_ENDIF => {
                exec.flow_stack
                    .pop()
                    .ok_or(ScriptError::UnbalancedConditional)?;
            }

            OP_VERIFY => {
                if !cast_to_bool(stack.top(0)?) {
                    return Err(ScriptError::Verify);
                }
                stack.pop()?;
            }

            OP_RETURN => return Err(ScriptError::OpReturn),

            // ================================================================
            // STACK
            // ================================================================
            OP_TOALTSTACK => {
                let item = stack.pop()?;
                exec.alt_stack.push(item);
            }

            OP_FROMALTSTACK => {
                let item = exec
                    .alt_stack
                    .pop()
                    .map_err(|_| ScriptError::InvalidAltstackOperation)?;
                stack.push(item);
            }

            OP_2DROP => {
                stack.require(2)?;
                stack.pop()?;
                stack.pop()?;
            }

            OP_2DUP => {
                stack.require(2)?;
                let second = stack.top(1)?.clone();
                let top = stack.top(0)?.clone();
                stack.push(second);
                stack.push(top);
            }

            OP_3DUP => {
                stack.require(3)?;
                let third = stack.top(2)?.clone();
                let second = stack.top(1)?.clone();
                let top = stack.top(0)?.clone();
                stack.push(third);
                stack.push(second);
                stack.push(top);
            }

            OP_2OVER => {
                stack.require(4)?;
                let fourth = stack.top(3)?.clone();
                let third = stack.top(2)?.clone();
                stack.push(fourth);
                stack.push(third);
            }

            OP_2ROT => {
                stack.require(6)?;
                let sixth = stack.remove(5)?;
                let fifth = stack.remove(4)?;
                stack.push(sixth);
                stack.push(fifth);
            }

            OP_2SWAP => {
                stack.require(4)?;
                stack.swap(3, 1)?;
                stack.swap(2, 0)?;
            }

            OP_IFDUP => {
                let top = stack.top(0)?.clone();
                if cast_to_bool(&top) {
                    stack.push(top);
                }
            }

            OP_DEPTH => {
                let depth = stack.len() as i64;
                stack.push(encode_number(depth));
            }

            OP_DROP => {
                stack.pop()?;
            }

            OP_DUP => {
                let top = stack.top(0)?.clone();
                stack.push(top);
            }

            OP_NIP => {
                stack.require(2)?;
                stack.remove(1)?;
            }

            OP_OVER => {
                let second = stack.top(1)?.clone();
                stack.push(second);
            }

            // OP_PICK / OP_ROLL - copy / move the item n deep to the top
            OP_PICK | OP_ROLL => {
                stack.require(2)?;
                let n = self.pop_int(stack)?;
                if n < 0 || n as usize >= stack.len() {
                    return Err(ScriptError::InvalidStackOperation);
                }
                let depth = n as usize;
                let item = if opcode == OP_ROLL {
                    stack.remove(depth)?
                } else {
                    stack.top(depth)?.clone()
                };
                stack.push(item);
            }

            OP_ROT => {
                stack.require(3)?;
                stack.swap(2, 1)?;
                stack.swap(1, 0)?;
            }

            OP_SWAP => {
                stack.require(2)?;
                stack.swap(1, 0)?;
            }

            OP_TUCK => {
                stack.require(2)?;
                let top = stack.top(0)?.clone();
                stack.insert(2, top)?;
            }

            OP_SIZE => {
                let size = stack.top(0)?.len() as i64;
                stack.push(encode_number(size));
            }

            // ================================================================
            // BITWISE LOGIC
            // ================================================================
            OP_EQUAL | OP_EQUALVERIFY => {
                stack.require(2)?;
                let a = stack.pop()?;
                let b = stack.pop()?;
                let equal = a == b;
                if opcode == OP_EQUALVERIFY {
                    if !equal {
                        return Err(ScriptError::EqualVerify);
                    }
                } else {
                    stack.push(encode_bool(equal));
                }
            }

            // ================================================================
            // ARITHMETIC
            // ================================================================
            OP_1ADD | OP_1SUB | OP_NEGATE | OP_ABS | OP_NOT | OP_0NOTEQUAL => {
                let n = self.pop_int(stack)?;
                let result = match opcode {
                    OP_1ADD => n + 1,
                    OP_1SUB => n - 1,
                    OP_NEGATE => -n,
                    OP_ABS => n.abs(),
                    OP_NOT => (n == 0) as i64,
                    _ => (n != 0) as i64,
                };
                stack.push(encode_number(result));
            }

            OP_ADD | OP_SUB | OP_BOOLAND | OP_BOOLOR | OP_NUMEQUAL | OP_NUMEQUALVERIFY
            | OP_NUMNOTEQUAL | OP_LESSTHAN | OP_GREATERTHAN | OP_LESSTHANOREQUAL
            | OP_GREATERTHANOREQUAL | OP_MIN | OP_MAX => {
                stack.require(2)?;
                let b = self.pop_int(stack)?;
                let a = self.pop_int(stack)?;
                let result = match opcode {
                    OP_ADD => a + b,
                    OP_SUB => a - b,
                    OP_BOOLAND => (a != 0 && b != 0) as i64,
                    OP_BOOLOR => (a != 0 || b != 0) as i64,
                    OP_NUMEQUAL | OP_NUMEQUALVERIFY => (a == b) as i64,
                    OP_NUMNOTEQUAL => (a != b) as i64,
                    OP_LESSTHAN => (a < b) as i64,
                    OP_GREATERTHAN => (a > b) as i64,
                    OP_LESSTHANOREQUAL => (a <= b) as i64,
                    OP_GREATERTHANOREQUAL => (a >= b) as i64,
                    OP_MIN => a.min(b),
                    _ => a.max(b),
                };
                if opcode == OP_NUMEQUALVERIFY {
                    if result == 0 {
                        return Err(ScriptError::NumEqualVerify);
                    }
                } else {
                    stack.push(encode_number(result));
                }
            }

            // OP_WITHIN - min <= x < max
            OP_WITHIN => {
                stack.require(3)?;
                let max = self.pop_int(stack)?;
                let min = self.pop_int(stack)?;
                let x = self.pop_int(stack)?;
                stack.push(encode_bool(min <= x && x < max));
            }

            // ================================================================
            // CRYPTO
            // ================================================================
            OP_RIPEMD160 | OP_SHA1 | OP_SHA256 | OP_HASH160 | OP_HASH256 => {
                let item = stack.pop()?;
                let digest = match opcode {
                    OP_RIPEMD160 => hash::ripemd160(&item).to_vec(),
                    OP_SHA1 => hash::sha1(&item).to_vec(),
                    OP_SHA256 => hash::sha256(&item).to_vec(),
                    OP_HASH160 => hash::hash160(&item).to_vec(),
                    _ => hash::hash256(&item).to_vec(),
                };
                stack.push(digest);
            }

            OP_CODESEPARATOR => exec.last_code_separator = index + 1,

            OP_CHECKSIG | OP_CHECKSIGVERIFY => {
                self.op_checksig(stack, exec, script, opcode == OP_CHECKSIGVERIFY)?
            }

            OP_CHECKDATASIG | OP_CHECKDATASIGVERIFY => {
                self.op_checkdatasig(stack, opcode == OP_CHECKDATASIGVERIFY)?
            }

            OP_CHECKMULTISIG | OP_CHECKMULTISIGVERIFY => {
                self.op_checkmultisig(stack, exec, script, opcode == OP_CHECKMULTISIGVERIFY)?
            }

            OP_COLOR => self.op_color(stack, exec)?,

            // Reserved, pseudo and undefined opcodes
            _ => return Err(ScriptError::BadOpcode),
        }
        Ok(())
    }

    /// Subscript from the last OP_CODESEPARATOR with every signature removed
    fn script_code(&self, script: &Script, exec: &Execution, sigs: &[&StackItem]) -> Result<Script, ScriptError> {
        let mut script_code = script.subscript(exec.last_code_separator);
        for sig in sigs {
            let needle = Script::new()
                .append_data(sig)
                .map_err(|_| ScriptError::UnknownError)?;
            let stripped = script_code.find_and_delete(&needle);
            if stripped != script_code && self.flags.contains(VerifyFlags::CONST_SCRIPTCODE) {
                return Err(ScriptError::SigFindAndDelete);
            }
            script_code = stripped;
        }
        Ok(script_code)
    }

    // OP_CHECKSIG - <sig> <pubkey> -> bool
    fn op_checksig(&mut self, stack: &mut Stack, exec: &Execution, script: &Script, verify: bool) -> Result<(), ScriptError> {
        stack.require(2)?;
        let pubkey = stack.pop()?;
        let sig = stack.pop()?;

        let script_code = self.script_code(script, exec, &[&sig])?;
        check_signature_encoding(&sig, self.flags)?;
        check_pubkey_encoding(&pubkey, self.flags)?;

        let success = self
            .checker
            .check_sig(&sig, &pubkey, &script_code, SigVersion::Base);
        if !success && self.flags.contains(VerifyFlags::NULLFAIL) && !sig.is_empty() {
            return Err(ScriptError::SigNullFail);
        }

        if verify {
            if !success {
                return Err(ScriptError::CheckSigVerify);
            }
        } else {
            stack.push(encode_bool(success));
        }
        Ok(())
    }

    // OP_CHECKDATASIG - <sig> <message> <pubkey> -> bool, signature over sha256(message)
    fn op_checkdatasig(&mut self, stack: &mut Stack, verify: bool) -> Result<(), ScriptError> {
        stack.require(3)?;
        let pubkey = stack.pop()?;
        let message = stack.pop()?;
        let sig = stack.pop()?;

        check_data_signature_encoding(&sig, self.flags)?;
        check_pubkey_encoding(&pubkey, self.flags)?;

        let success = !sig.is_empty() && {
            let digest = hash::sha256(&message);
            self.checker.verify_sig(&sig, &pubkey, &digest)
        };
        if !success && self.flags.contains(VerifyFlags::NULLFAIL) && !sig.is_empty() {
            return Err(ScriptError::SigNullFail);
        }

        if verify {
            if !success {
                return Err(ScriptError::CheckDataSigVerify);
            }
        } else {
            stack.push(encode_bool(success));
        }
        Ok(())
    }

    // OP_CHECKMULTISIG - <dummy> <sig>... <m> <pubkey>... <n> -> bool
    fn op_checkmultisig(
        &mut self,
        stack: &mut Stack,
        exec: &mut Execution,
        script: &Script,
        verify: bool,
    ) -> Result<(), ScriptError> {
        stack.require(1)?;
        let key_count = self.peek_int(stack, 0, DEFAULT_MAX_NUM_SIZE)?;
        if !(0..=MAX_PUBKEYS_PER_MULTISIG).contains(&key_count) {
            return Err(ScriptError::PubkeyCount);
        }
        let key_count = key_count as usize;
        exec.add_ops(key_count)?;

        let sig_count_depth = key_count + 1;
        stack.require(sig_count_depth + 1)?;
        let sig_count = self.peek_int(stack, sig_count_depth, DEFAULT_MAX_NUM_SIZE)?;
        if sig_count < 0 || sig_count as usize > key_count {
            return Err(ScriptError::SigCount);
        }
        let sig_count = sig_count as usize;
        stack.require(sig_count_depth + 1 + sig_count)?;

        stack.pop()?;
        let mut pubkeys = Vec::with_capacity(key_count);
        for _ in 0..key_count {
            pubkeys.push(stack.pop()?);
        }
        pubkeys.reverse();
        stack.pop()?;
        let mut sigs = Vec::with_capacity(sig_count);
        for _ in 0..sig_count {
            sigs.push(stack.pop()?);
        }
        sigs.reverse();

        let sig_refs: Vec<&StackItem> = sigs.iter().collect();
        let script_code = self.script_code(script, exec, &sig_refs)?;

        let mut schemes = sigs
            .iter()
            .filter(|sig| !sig.is_empty())
            .map(|sig| SigScheme::of_tx_signature(sig));
        if let Some(first) = schemes.next() {
            if schemes.any(|scheme| scheme != first) {
                return Err(ScriptError::MixedSchemeMultisig);
            }
        }

        // Match greedily from the last signature and the last key
        let mut remaining_sigs = sigs.len();
        let mut remaining_keys = pubkeys.len();
        let mut success = true;
        while success && remaining_sigs > 0 {
            let sig = &sigs[remaining_sigs - 1];
            let pubkey = &pubkeys[remaining_keys - 1];
            check_signature_encoding(sig, self.flags)?;
            check_pubkey_encoding(pubkey, self.flags)?;

            if self
                .checker
                .check_sig(sig, pubkey, &script_code, SigVersion::Base)
            {
                remaining_sigs -= 1;
            }
            remaining_keys -= 1;
            if remaining_sigs > remaining_keys {
                success = false;
            }
        }

        if !success
            && self.flags.contains(VerifyFlags::NULLFAIL)
            && sigs[..remaining_sigs].iter().any(|sig| !sig.is_empty())
        {
            return Err(ScriptError::SigNullFail);
        }

        // Legacy extra argument
        let dummy = stack.pop()?;
        if self.flags.contains(VerifyFlags::NULLDUMMY) && !dummy.is_empty() {
            return Err(ScriptError::SigNullDummy);
        }

        if verify {
            if !success {
                return Err(ScriptError::CheckMultiSigVerify);
            }
        } else {
            stack.push(encode_bool(success));
        }
        Ok(())
    }

    // OP_COLOR - <color_id> -> , tags the output with a color
    fn op_color(&mut self, stack: &mut Stack, exec: &Execution) -> Result<(), ScriptError> {
        stack.require(1)?;
        if !exec.flow_stack.is_empty() {
            return Err(ScriptError::OpColorInBranch);
        }
        if exec.is_redeem {
            return Err(ScriptError::OpColorInRedeemScript);
        }
        if self.color_id.is_some() {
            return Err(ScriptError::OpColorMultiple);
        }
        let color_id = ColorIdentifier::from_bytes(stack.top(0)?).map_err(|_| ScriptError::OpColorId)?;
        stack.pop()?;
        self.color_id = Some(color_id);
        Ok(())
    }
}

/// Verify a scriptSig / scriptPubKey pair with a fresh interpreter
pub fn verify_script(
    script_sig: &Script,
    script_pubkey: &Script,
    flags: VerifyFlags,
    checker: &dyn SignatureChecker,
) -> Result<(), ScriptError> {
    Interpreter::new(flags, checker).verify_script(script_sig, script_pubkey)
}
