//! Script number codec
//!
//! Stack integers are little-endian sign-magnitude byte vectors: the empty
//! vector is zero and the top bit of the last byte carries the sign.

use crate::constants::DEFAULT_MAX_NUM_SIZE;
use crate::error::{ConsensusError, Result};

/// Canonical true value
pub const TRUE: [u8; 1] = [0x01];

/// Canonical false value (empty vector)
pub const FALSE: [u8; 0] = [];

/// Encode a host integer as a minimal script number.
pub fn encode_number(n: i64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    let negative = n < 0;
    let mut magnitude = n.unsigned_abs();
    let mut out = Vec::with_capacity(9);
    while magnitude > 0 {
        out.push((magnitude & 0xff) as u8);
        magnitude >>= 8;
    }
    // The sign bit must live in a byte of its own when the magnitude uses it
    let last = out.len() - 1;
    if out[last] & 0x80 != 0 {
        out.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        out[last] |= 0x80;
    }
    out
}

/// Decode a script number, accepting non-minimal encodings.
///
/// Fails only when the magnitude does not fit a host integer.
pub fn decode_number(bytes: &[u8]) -> Result<i64> {
    let Some((&last, _)) = bytes.split_last() else {
        return Ok(0);
    };
    let negative = last & 0x80 != 0;

    let mut magnitude_bytes = bytes.to_vec();
    let end = magnitude_bytes.len() - 1;
    magnitude_bytes[end] &= 0x7f;
    while magnitude_bytes.last() == Some(&0) {
        magnitude_bytes.pop();
    }
    if magnitude_bytes.len() > 8 {
        return Err(ConsensusError::NumberOverflow(bytes.len()));
    }

    let mut magnitude: u64 = 0;
    for (i, byte) in magnitude_bytes.iter().enumerate() {
        magnitude |= (*byte as u64) << (8 * i);
    }
    let value = i64::try_from(magnitude).map_err(|_| ConsensusError::NumberOverflow(bytes.len()))?;
    Ok(if negative { -value } else { value })
}

/// Whether `bytes` is the shortest encoding of its value
pub fn is_minimally_encoded(bytes: &[u8]) -> bool {
    match bytes {
        [] => true,
        [.., last] if last & 0x7f != 0 => true,
        // Trailing 0x00/0x80 is only needed to carry the sign past a high bit
        [.., prev, _] => prev & 0x80 != 0,
        [_] => false,
    }
}

/// Interpret a stack element as a numeric operand.
///
/// Operands longer than `max_size` bytes are rejected; with `require_minimal`
/// so are non-minimal encodings.
pub fn cast_to_int(bytes: &[u8], max_size: usize, require_minimal: bool) -> Result<i64> {
    if bytes.len() > max_size {
        return Err(ConsensusError::NumberOverflow(bytes.len()));
    }
    if require_minimal && !is_minimally_encoded(bytes) {
        return Err(ConsensusError::NonMinimalNumber);
    }
    decode_number(bytes)
}

/// [`cast_to_int`] with the default 4-byte operand limit
pub fn cast_to_default_int(bytes: &[u8], require_minimal: bool) -> Result<i64> {
    cast_to_int(bytes, DEFAULT_MAX_NUM_SIZE, require_minimal)
}

/// Truthiness: any non-zero byte, except a lone sign bit in the last byte
/// (negative zero).
pub fn cast_to_bool(bytes: &[u8]) -> bool {
    for (i, byte) in bytes.iter().enumerate() {
        if *byte != 0 {
            return !(i == bytes.len() - 1 && *byte == 0x80);
        }
    }
    false
}

/// Stack encoding of a boolean
pub fn encode_bool(value: bool) -> Vec<u8> {
    if value {
        TRUE.to_vec()
    } else {
        FALSE.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_number() {
        assert_eq!(encode_number(0), Vec::<u8>::new());
        assert_eq!(encode_number(1), vec![0x01]);
        assert_eq!(encode_number(-1), vec![0x81]);
        assert_eq!(encode_number(127), vec![0x7f]);
        assert_eq!(encode_number(128), vec![0x80, 0x00]);
        assert_eq!(encode_number(-128), vec![0x80, 0x80]);
        assert_eq!(encode_number(255), vec![0xff, 0x00]);
        assert_eq!(encode_number(256), vec![0x00, 0x01]);
        assert_eq!(encode_number(-32768), vec![0x00, 0x80, 0x80]);
    }

    #[test]
    fn test_decode_accepts_non_minimal() {
        assert_eq!(decode_number(&[]).unwrap(), 0);
        assert_eq!(decode_number(&[0x00]).unwrap(), 0);
        assert_eq!(decode_number(&[0x80]).unwrap(), 0);
        assert_eq!(decode_number(&[0x01, 0x00]).unwrap(), 1);
        assert_eq!(decode_number(&[0x01, 0x00, 0x80]).unwrap(), -1);
        assert_eq!(decode_number(&[0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]).unwrap(), 5);
    }

    #[test]
    fn test_decode_overflow() {
        assert!(decode_number(&[0xff; 9]).is_err());
    }

    #[test]
    fn test_minimal_encoding() {
        assert!(is_minimally_encoded(&[]));
        assert!(is_minimally_encoded(&[0x01]));
        assert!(is_minimally_encoded(&[0x80, 0x00]));
        assert!(is_minimally_encoded(&[0xff, 0x80]));
        assert!(!is_minimally_encoded(&[0x00]));
        assert!(!is_minimally_encoded(&[0x80]));
        assert!(!is_minimally_encoded(&[0x01, 0x00]));
        assert!(!is_minimally_encoded(&[0x01, 0x80]));
    }

    #[test]
    fn test_cast_to_int_limits() {
        assert_eq!(cast_to_default_int(&[0xff, 0xff, 0xff, 0x7f], true).unwrap(), i32::MAX as i64);
        assert_eq!(
            cast_to_default_int(&[0x00, 0x00, 0x00, 0x00, 0x01], false),
            Err(ConsensusError::NumberOverflow(5))
        );
        assert_eq!(cast_to_int(&[0x00, 0x00, 0x00, 0x00, 0x01], 5, true).unwrap(), 1 << 32);
        assert_eq!(cast_to_default_int(&[0x00], true), Err(ConsensusError::NonMinimalNumber));
        assert_eq!(cast_to_default_int(&[0x00], false).unwrap(), 0);
    }

    #[test]
    fn test_cast_to_bool() {
        assert!(!cast_to_bool(&[]));
        assert!(!cast_to_bool(&[0x00]));
        assert!(!cast_to_bool(&[0x00, 0x00]));
        assert!(!cast_to_bool(&[0x80]));
        assert!(!cast_to_bool(&[0x00, 0x80]));
        assert!(cast_to_bool(&[0x01]));
        assert!(cast_to_bool(&[0x80, 0x00]));
        assert!(cast_to_bool(&[0x00, 0x81]));
    }
}
