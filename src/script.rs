//! Script and Chunk codec
//!
//! A script is an ordered sequence of chunks: opcodes and length-prefixed
//! pushes. Parsing never fails; malformed pushes are kept as-is and rejected
//! only when executed, so `Script::parse(bytes).to_bytes() == bytes` holds for
//! any input.

use crate::color::ColorIdentifier;
use crate::constants::*;
use crate::error::{ConsensusError, Result};
use crate::hash::hash160;
use crate::opcodes::*;
use crate::script_num::{decode_number, encode_number};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One parsed script unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chunk {
    /// A non-push opcode
    Opcode(u8),
    /// A push: opcode plus length bytes, and the pushed payload.
    ///
    /// A truncated buffer leaves `header` and/or `payload` short of what the
    /// header declares.
    PushData { header: Vec<u8>, payload: Vec<u8> },
    /// An undefined opcode together with every byte after it
    Raw(Vec<u8>),
}

impl Chunk {
    /// Chunk for a single opcode byte.
    ///
    /// Push opcodes become an empty push, undefined bytes a one-byte raw tail.
    pub fn from_opcode(opcode: u8) -> Self {
        if is_push_opcode(opcode) {
            Chunk::PushData {
                header: vec![opcode],
                payload: Vec::new(),
            }
        } else if is_defined(opcode) {
            Chunk::Opcode(opcode)
        } else {
            Chunk::Raw(vec![opcode])
        }
    }

    /// Push `data` with the smallest header that fits.
    pub fn push(data: &[u8]) -> Result<Self> {
        let len = data.len();
        let header = if len < OP_PUSHDATA1 as usize {
            vec![len as u8]
        } else if len <= 0xff {
            vec![OP_PUSHDATA1, len as u8]
        } else if len <= 0xffff {
            let mut h = vec![OP_PUSHDATA2];
            h.extend_from_slice(&(len as u16).to_le_bytes());
            h
        } else if len <= u32::MAX as usize {
            let mut h = vec![OP_PUSHDATA4];
            h.extend_from_slice(&(len as u32).to_le_bytes());
            h
        } else {
            return Err(ConsensusError::PushDataTooLarge(len));
        };
        Ok(Chunk::PushData {
            header,
            payload: data.to_vec(),
        })
    }

    /// The opcode byte that starts this chunk
    pub fn opcode(&self) -> u8 {
        match self {
            Chunk::Opcode(op) => *op,
            Chunk::PushData { header, .. } => header.first().copied().unwrap_or(OP_0),
            Chunk::Raw(bytes) => bytes.first().copied().unwrap_or(OP_INVALIDOPCODE),
        }
    }

    pub fn is_push(&self) -> bool {
        matches!(self, Chunk::PushData { .. })
    }

    /// Pushed bytes, for push chunks
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Chunk::PushData { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Payload length announced by the header, `None` if the header itself is truncated
    pub fn declared_len(&self) -> Option<usize> {
        let Chunk::PushData { header, .. } = self else {
            return None;
        };
        let (&opcode, length_bytes) = header.split_first()?;
        match opcode {
            OP_PUSHDATA1 => length_bytes.first().map(|&b| b as usize),
            OP_PUSHDATA2 => length_bytes
                .get(..2)
                .map(|b| u16::from_le_bytes([b[0], b[1]]) as usize),
            OP_PUSHDATA4 => length_bytes
                .get(..4)
                .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize),
            direct => Some(direct as usize),
        }
    }

    /// Whether the header and payload agree in length
    pub fn is_well_formed(&self) -> bool {
        match self {
            Chunk::PushData { payload, .. } => self.declared_len() == Some(payload.len()),
            _ => true,
        }
    }

    /// Whether this push uses the unique minimal encoding for its payload.
    ///
    /// Payloads above 65535 bytes are accepted with any PUSHDATA4 header.
    pub fn is_minimal_push(&self) -> bool {
        let Chunk::PushData { payload, .. } = self else {
            return true;
        };
        let opcode = self.opcode();
        match payload.len() {
            0 => opcode == OP_0,
            // OP_1..OP_16 and OP_1NEGATE exist for these
            1 if (1..=16).contains(&payload[0]) || payload[0] == 0x81 => false,
            n if n < OP_PUSHDATA1 as usize => opcode as usize == n,
            n if n <= 0xff => opcode == OP_PUSHDATA1,
            n if n <= 0xffff => opcode == OP_PUSHDATA2,
            _ => true,
        }
    }

    pub fn serialized_len(&self) -> usize {
        match self {
            Chunk::Opcode(_) => 1,
            Chunk::PushData { header, payload } => header.len() + payload.len(),
            Chunk::Raw(bytes) => bytes.len(),
        }
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Chunk::Opcode(op) => out.push(*op),
            Chunk::PushData { header, payload } => {
                out.extend_from_slice(header);
                out.extend_from_slice(payload);
            }
            Chunk::Raw(bytes) => out.extend_from_slice(bytes),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_len());
        self.write_to(&mut out);
        out
    }
}

/// Tapyrus script
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Script {
    chunks: Vec<Chunk>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        Script { chunks }
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    // ============================================================================
    // WIRE CODEC
    // ============================================================================

    /// Split raw bytes into chunks. Never fails.
    pub fn parse(bytes: &[u8]) -> Self {
        let mut chunks = Vec::new();
        let mut pos = 0;
        while pos < bytes.len() {
            let opcode = bytes[pos];
            if is_push_opcode(opcode) {
                let length_size = match opcode {
                    OP_PUSHDATA1 => 1,
                    OP_PUSHDATA2 => 2,
                    OP_PUSHDATA4 => 4,
                    _ => 0,
                };
                let header_end = (pos + 1 + length_size).min(bytes.len());
                let mut chunk = Chunk::PushData {
                    header: bytes[pos..header_end].to_vec(),
                    payload: Vec::new(),
                };
                let payload_end = match chunk.declared_len() {
                    Some(n) => header_end.saturating_add(n).min(bytes.len()),
                    None => header_end,
                };
                if let Chunk::PushData { payload, .. } = &mut chunk {
                    payload.extend_from_slice(&bytes[header_end..payload_end]);
                }
                chunks.push(chunk);
                pos = payload_end;
            } else if is_defined(opcode) {
                chunks.push(Chunk::Opcode(opcode));
                pos += 1;
            } else {
                chunks.push(Chunk::Raw(bytes[pos..].to_vec()));
                break;
            }
        }
        Script { chunks }
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| ConsensusError::InvalidHex(e.to_string()))?;
        Ok(Self::parse(&bytes))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_size());
        for chunk in &self.chunks {
            chunk.write_to(&mut out);
        }
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Length of the serialized script in bytes
    pub fn serialized_size(&self) -> usize {
        self.chunks.iter().map(Chunk::serialized_len).sum()
    }

    // ============================================================================
    // BUILDER
    // ============================================================================

    pub fn append_chunk(mut self, chunk: Chunk) -> Self {
        self.chunks.push(chunk);
        self
    }

    pub fn append_opcode(self, opcode: u8) -> Self {
        self.append_chunk(Chunk::from_opcode(opcode))
    }

    /// Append an integer: -1..=16 use their dedicated opcodes, anything else
    /// is pushed as a script number.
    pub fn append_int(self, n: i64) -> Self {
        match small_int_to_opcode(n) {
            Some(opcode) => self.append_opcode(opcode),
            None => {
                let encoded = encode_number(n);
                self.append_chunk(Chunk::PushData {
                    header: vec![encoded.len() as u8],
                    payload: encoded,
                })
            }
        }
    }

    /// Append a push of `data` with the minimal header
    pub fn append_data(self, data: &[u8]) -> Result<Self> {
        Ok(self.append_chunk(Chunk::push(data)?))
    }

    // ============================================================================
    // TEMPLATES
    // ============================================================================

    /// OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG
    pub fn p2pkh(pubkey_hash: &[u8; 20]) -> Self {
        Script::from_chunks(vec![
            Chunk::Opcode(OP_DUP),
            Chunk::Opcode(OP_HASH160),
            push_20(pubkey_hash),
            Chunk::Opcode(OP_EQUALVERIFY),
            Chunk::Opcode(OP_CHECKSIG),
        ])
    }

    /// OP_HASH160 <hash> OP_EQUAL
    pub fn p2sh(script_hash: &[u8; 20]) -> Self {
        Script::from_chunks(vec![
            Chunk::Opcode(OP_HASH160),
            push_20(script_hash),
            Chunk::Opcode(OP_EQUAL),
        ])
    }

    /// m <pubkey>... n OP_CHECKMULTISIG
    pub fn multisig(m: usize, pubkeys: &[Vec<u8>]) -> Result<Self> {
        let n = pubkeys.len();
        if m == 0 || m > n || n > 16 {
            return Err(ConsensusError::InvalidTemplate(format!(
                "{}-of-{} multisig",
                m, n
            )));
        }
        let mut script = Script::new().append_int(m as i64);
        for pubkey in pubkeys {
            script = script.append_data(pubkey)?;
        }
        Ok(script.append_int(n as i64).append_opcode(OP_CHECKMULTISIG))
    }

    /// OP_RETURN <data>
    pub fn op_return(data: &[u8]) -> Result<Self> {
        let script = Script::new().append_opcode(OP_RETURN);
        if data.is_empty() {
            return Ok(script);
        }
        script.append_data(data)
    }

    pub fn to_hash160(&self) -> [u8; 20] {
        hash160(&self.to_bytes())
    }

    /// P2SH script paying to this script as redeem script
    pub fn to_p2sh(&self) -> Self {
        Script::p2sh(&self.to_hash160())
    }

    /// Prefix a P2PKH or P2SH script with `<color_id> OP_COLOR`
    pub fn add_color(&self, color_id: &ColorIdentifier) -> Result<Self> {
        if !self.is_p2pkh() && !self.is_p2sh() {
            return Err(ConsensusError::InvalidTemplate(
                "only P2PKH and P2SH scripts can be colored".to_string(),
            ));
        }
        let mut chunks = vec![Chunk::push(&color_id.to_bytes())?, Chunk::Opcode(OP_COLOR)];
        chunks.extend(self.chunks.iter().cloned());
        Ok(Script::from_chunks(chunks))
    }

    /// Strip the color prefix of a CP2PKH or CP2SH script
    pub fn remove_color(&self) -> Self {
        if self.is_cp2pkh() || self.is_cp2sh() {
            Script::from_chunks(self.chunks[2..].to_vec())
        } else {
            self.clone()
        }
    }

    /// Color identifier of a CP2PKH or CP2SH script
    pub fn color_id(&self) -> Option<ColorIdentifier> {
        if !self.has_color_prefix() {
            return None;
        }
        self.chunks[0]
            .payload()
            .and_then(|payload| ColorIdentifier::from_bytes(payload).ok())
    }

    // ============================================================================
    // PATTERN PREDICATES
    // ============================================================================

    pub fn is_p2pkh(&self) -> bool {
        matches!(
            self.chunks.as_slice(),
            [
                Chunk::Opcode(OP_DUP),
                Chunk::Opcode(OP_HASH160),
                hash,
                Chunk::Opcode(OP_EQUALVERIFY),
                Chunk::Opcode(OP_CHECKSIG),
            ] if is_push_20(hash)
        )
    }

    pub fn is_p2sh(&self) -> bool {
        matches!(
            self.chunks.as_slice(),
            [Chunk::Opcode(OP_HASH160), hash, Chunk::Opcode(OP_EQUAL)] if is_push_20(hash)
        )
    }

    /// m <pubkey>... n OP_CHECKMULTISIG with 1 <= m <= n <= 16
    ///
    /// Structural only: relay standardness further limits bare multisig to
    /// [`MAX_STANDARD_BARE_MULTISIG_KEYS`] keys, see [`Script::is_standard`].
    pub fn is_multisig(&self) -> bool {
        let chunks = &self.chunks;
        if chunks.len() < 4 || chunks[chunks.len() - 1] != Chunk::Opcode(OP_CHECKMULTISIG) {
            return false;
        }
        let m = small_int_value(&chunks[0]);
        let n = small_int_value(&chunks[chunks.len() - 2]);
        let (Some(m), Some(n)) = (m, n) else {
            return false;
        };
        if m < 1 || n < m || chunks.len() as i64 != n + 3 {
            return false;
        }
        chunks[1..chunks.len() - 2].iter().all(|chunk| {
            chunk.is_well_formed()
                && chunk.payload().map_or(false, |p| {
                    p.len() == COMPRESSED_PUBKEY_SIZE || p.len() == UNCOMPRESSED_PUBKEY_SIZE
                })
        })
    }

    /// OP_RETURN followed by pushes only
    pub fn is_op_return(&self) -> bool {
        match self.chunks.split_first() {
            Some((Chunk::Opcode(OP_RETURN), rest)) => rest.iter().all(is_push_only_chunk),
            _ => false,
        }
    }

    /// OP_RETURN output small enough to relay
    pub fn is_standard_op_return(&self) -> bool {
        self.is_op_return() && self.serialized_size() <= MAX_OP_RETURN_RELAY
    }

    /// <color_id> OP_COLOR + P2PKH
    pub fn is_cp2pkh(&self) -> bool {
        self.has_color_prefix() && Script::from_chunks(self.chunks[2..].to_vec()).is_p2pkh()
    }

    /// <color_id> OP_COLOR + P2SH
    pub fn is_cp2sh(&self) -> bool {
        self.has_color_prefix() && Script::from_chunks(self.chunks[2..].to_vec()).is_p2sh()
    }

    /// Output shape accepted for relay. Bare multisig is capped at
    /// [`MAX_STANDARD_BARE_MULTISIG_KEYS`] keys; larger key sets belong behind P2SH.
    pub fn is_standard(&self) -> bool {
        self.is_p2pkh()
            || self.is_p2sh()
            || (self.is_multisig()
                && self.get_multisig_pubkeys().len() <= MAX_STANDARD_BARE_MULTISIG_KEYS)
            || self.is_standard_op_return()
            || self.is_cp2pkh()
            || self.is_cp2sh()
    }

    /// Provably unspendable: starts with OP_RETURN or exceeds the size limit
    pub fn is_unspendable(&self) -> bool {
        self.chunks.first().map(Chunk::opcode) == Some(OP_RETURN)
            || self.serialized_size() > MAX_SCRIPT_SIZE
    }

    /// Every chunk is a push or a small-integer opcode
    pub fn is_push_only(&self) -> bool {
        self.chunks.iter().all(is_push_only_chunk)
    }

    fn has_color_prefix(&self) -> bool {
        match self.chunks.as_slice() {
            [color, Chunk::Opcode(OP_COLOR), ..] => matches!(
                color,
                Chunk::PushData { header, payload }
                    if header.as_slice() == [COLOR_ID_SIZE as u8] && ColorIdentifier::is_valid(payload)
            ),
            _ => false,
        }
    }

    // ============================================================================
    // EXTRACTION
    // ============================================================================

    /// Pushed values shaped like SEC public keys
    pub fn get_pubkeys(&self) -> Vec<Vec<u8>> {
        self.chunks
            .iter()
            .filter_map(Chunk::payload)
            .filter(|p| looks_like_pubkey(p))
            .map(<[u8]>::to_vec)
            .collect()
    }

    /// Public keys of a bare multisig script, in script order
    pub fn get_multisig_pubkeys(&self) -> Vec<Vec<u8>> {
        if !self.is_multisig() {
            return Vec::new();
        }
        self.chunks[1..self.chunks.len() - 2]
            .iter()
            .filter_map(Chunk::payload)
            .map(<[u8]>::to_vec)
            .collect()
    }

    // ============================================================================
    // SCRIPT CODE
    // ============================================================================

    /// Chunks from `from_chunk` onwards
    pub fn subscript(&self, from_chunk: usize) -> Self {
        Script::from_chunks(self.chunks.get(from_chunk..).unwrap_or_default().to_vec())
    }

    /// Remove every serialized occurrence of `needle` that starts on an
    /// opcode boundary.
    ///
    /// Matching is byte-level: after a removal the bytes that follow are
    /// compared again from the same position, so a match may begin inside
    /// what used to be a push and may span several opcodes.
    pub fn find_and_delete(&self, needle: &Script) -> Self {
        let needle = needle.to_bytes();
        if needle.is_empty() {
            return self.clone();
        }
        let bytes = self.to_bytes();
        let mut result = Vec::with_capacity(bytes.len());
        let mut found = false;
        let mut pc = 0;
        let mut kept_from = 0;
        loop {
            result.extend_from_slice(&bytes[kept_from..pc]);
            while bytes[pc..].starts_with(&needle) {
                pc += needle.len();
                found = true;
            }
            kept_from = pc;
            match op_length(&bytes[pc..]) {
                Some(len) => pc += len,
                None => break,
            }
        }
        if !found {
            return self.clone();
        }
        result.extend_from_slice(&bytes[kept_from..]);
        Script::parse(&result)
    }

    // ============================================================================
    // ASM
    // ============================================================================

    /// Parse the space-separated text form.
    ///
    /// Tokens are decimal integers, opcode names (with or without `OP_`),
    /// `0x`-prefixed raw bytes inserted verbatim, or hex data pushed with a
    /// minimal header.
    pub fn from_asm(asm: &str) -> Result<Self> {
        let mut bytes = Vec::new();
        for token in asm.split_whitespace() {
            if let Some(n) = parse_asm_int(token) {
                Script::new().append_int(n).chunks[0].write_to(&mut bytes);
            } else if let Some(raw) = token.strip_prefix("0x") {
                let raw =
                    hex::decode(raw).map_err(|_| ConsensusError::InvalidAsm(token.to_string()))?;
                bytes.extend_from_slice(&raw);
            } else if let Some(opcode) = name_to_opcode(token) {
                bytes.push(opcode);
            } else {
                let data =
                    hex::decode(token).map_err(|_| ConsensusError::InvalidAsm(token.to_string()))?;
                Chunk::push(&data)?.write_to(&mut bytes);
            }
        }
        Ok(Script::parse(&bytes))
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chunk::Opcode(op) => match opcode_to_small_int(*op) {
                Some(n) => write!(f, "{}", n),
                None => write!(f, "{}", opcode_to_name(*op).unwrap_or("OP_UNKNOWN")),
            },
            Chunk::PushData { payload, .. } if payload.len() <= DEFAULT_MAX_NUM_SIZE => {
                let n = decode_number(payload).map_err(|_| fmt::Error)?;
                write!(f, "{}", n)
            }
            Chunk::PushData { payload, .. } => write!(f, "{}", hex::encode(payload)),
            Chunk::Raw(_) => write!(f, "OP_UNKNOWN"),
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chunk) in self.chunks.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", chunk)?;
        }
        Ok(())
    }
}

impl From<&[u8]> for Script {
    fn from(bytes: &[u8]) -> Self {
        Script::parse(bytes)
    }
}

fn push_20(hash: &[u8; 20]) -> Chunk {
    Chunk::PushData {
        header: vec![20],
        payload: hash.to_vec(),
    }
}

fn is_push_20(chunk: &Chunk) -> bool {
    matches!(chunk, Chunk::PushData { header, payload } if header.as_slice() == [20] && payload.len() == 20)
}

fn is_push_only_chunk(chunk: &Chunk) -> bool {
    chunk.opcode() <= OP_16
}

fn small_int_value(chunk: &Chunk) -> Option<i64> {
    match chunk {
        Chunk::Opcode(op) if (OP_1..=OP_16).contains(op) => opcode_to_small_int(*op),
        _ => None,
    }
}

fn looks_like_pubkey(data: &[u8]) -> bool {
    match data.len() {
        COMPRESSED_PUBKEY_SIZE => matches!(data[0], 0x02 | 0x03),
        UNCOMPRESSED_PUBKEY_SIZE => matches!(data[0], 0x04 | 0x06 | 0x07),
        _ => false,
    }
}

/// Length of the operation at the start of `bytes`, `None` if empty or truncated
fn op_length(bytes: &[u8]) -> Option<usize> {
    let (&opcode, rest) = bytes.split_first()?;
    if !is_push_opcode(opcode) {
        return Some(1);
    }
    let (length_size, len) = match opcode {
        OP_PUSHDATA1 => (1, *rest.first()? as usize),
        OP_PUSHDATA2 => {
            let b = rest.get(..2)?;
            (2, u16::from_le_bytes([b[0], b[1]]) as usize)
        }
        OP_PUSHDATA4 => {
            let b = rest.get(..4)?;
            (4, u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize)
        }
        direct => (0, direct as usize),
    };
    let total = 1 + length_size + len;
    (bytes.len() >= total).then_some(total)
}

/// Decimal asm token within the 4-byte script number range
fn parse_asm_int(token: &str) -> Option<i64> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: i64 = token.parse().ok()?;
    (n.abs() <= i32::MAX as i64).then_some(n)
}
