//! Color identifiers for colored coins
//!
//! A color identifier is a one-byte token type followed by a 32-byte
//! payload derived from the issuing script or out-point.

use crate::constants::COLOR_ID_SIZE;
use crate::error::{ConsensusError, Result};
use crate::hash::sha256;
use crate::types::OutPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token type tag
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    /// Payload is SHA256 of the issuing scriptPubKey
    Reissuable,
    /// Payload is SHA256 of the issuing out-point
    NonReissuable,
    /// Payload is SHA256 of the issuing out-point
    Nft,
}

impl TokenType {
    pub fn to_byte(self) -> u8 {
        match self {
            TokenType::Reissuable => 0xc1,
            TokenType::NonReissuable => 0xc2,
            TokenType::Nft => 0xc3,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0xc1 => Some(TokenType::Reissuable),
            0xc2 => Some(TokenType::NonReissuable),
            0xc3 => Some(TokenType::Nft),
            _ => None,
        }
    }
}

/// Color identifier carried by OP_COLOR
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorIdentifier {
    pub token_type: TokenType,
    pub payload: [u8; 32],
}

impl ColorIdentifier {
    /// Reissuable token bound to the issuing script
    pub fn reissuable(script_pubkey: &[u8]) -> Self {
        ColorIdentifier {
            token_type: TokenType::Reissuable,
            payload: sha256(script_pubkey),
        }
    }

    /// One-shot token bound to the spent out-point
    pub fn non_reissuable(out_point: &OutPoint) -> Self {
        ColorIdentifier {
            token_type: TokenType::NonReissuable,
            payload: sha256(&out_point.to_bytes()),
        }
    }

    pub fn nft(out_point: &OutPoint) -> Self {
        ColorIdentifier {
            token_type: TokenType::Nft,
            payload: sha256(&out_point.to_bytes()),
        }
    }

    /// Parse the 33-byte wire form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != COLOR_ID_SIZE {
            return Err(ConsensusError::InvalidColorId(format!(
                "expected {} bytes, got {}",
                COLOR_ID_SIZE,
                bytes.len()
            )));
        }
        let token_type = TokenType::from_byte(bytes[0]).ok_or_else(|| {
            ConsensusError::InvalidColorId(format!("unknown token type 0x{:02x}", bytes[0]))
        })?;
        let mut payload = [0u8; 32];
        payload.copy_from_slice(&bytes[1..]);
        Ok(ColorIdentifier { token_type, payload })
    }

    pub fn to_bytes(&self) -> [u8; COLOR_ID_SIZE] {
        let mut out = [0u8; COLOR_ID_SIZE];
        out[0] = self.token_type.to_byte();
        out[1..].copy_from_slice(&self.payload);
        out
    }

    /// Whether `bytes` is a well-formed color identifier
    pub fn is_valid(bytes: &[u8]) -> bool {
        Self::from_bytes(bytes).is_ok()
    }
}

impl fmt::Display for ColorIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}
