//! Two-word 64-bit unsigned integer.
//!
//! The Tessera wire format carries amounts, mosaic ids, heights, durations,
//! fees, and deadlines as unsigned 64-bit values split into two 32-bit
//! words, serialized as exactly 8 little-endian bytes. `WideInt` is the
//! value-object representation of that quantity: immutable once
//! constructed, with arithmetic returning new instances.

use std::cmp::Ordering;
use std::fmt;

use crate::PrimitivesError;

/// Serialized size of a WideInt in bytes.
pub const WIDE_INT_BYTES_LEN: usize = 8;

/// Maximum hex string length for a WideInt (16 hex characters).
pub const WIDE_INT_HEX_LEN: usize = WIDE_INT_BYTES_LEN * 2;

/// An unsigned 64-bit value as two 32-bit words.
///
/// The represented value is `higher * 2^32 + lower`. Always normalized:
/// there is no sign and no excess precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WideInt {
    /// The low 32-bit word.
    pub lower: u32,
    /// The high 32-bit word.
    pub higher: u32,
}

impl WideInt {
    /// Create a WideInt from its two 32-bit words.
    ///
    /// # Arguments
    /// * `lower` - The low word.
    /// * `higher` - The high word.
    ///
    /// # Returns
    /// A new `WideInt` with value `higher * 2^32 + lower`.
    pub fn from_words(lower: u32, higher: u32) -> Self {
        WideInt { lower, higher }
    }

    /// Create a WideInt from an 8-byte little-endian buffer.
    ///
    /// # Arguments
    /// * `bytes` - A slice that must be exactly 8 bytes.
    ///
    /// # Returns
    /// `Ok(WideInt)` on success, or an error if the length is wrong.
    pub fn from_bytes_le(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != WIDE_INT_BYTES_LEN {
            return Err(PrimitivesError::InvalidLength {
                expected: WIDE_INT_BYTES_LEN,
                got: bytes.len(),
            });
        }
        let lower = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let higher = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Ok(WideInt { lower, higher })
    }

    /// Create a WideInt from a big-endian hex string.
    ///
    /// Strings shorter than 16 characters are zero-padded on the high end,
    /// matching the convention used for displayed ids.
    ///
    /// # Arguments
    /// * `hex_str` - A non-empty hex string of up to 16 characters.
    ///
    /// # Returns
    /// `Ok(WideInt)` on success, or an error for empty, over-long, or
    /// non-hex input.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() || hex_str.len() > WIDE_INT_HEX_LEN {
            return Err(PrimitivesError::InvalidHex(format!(
                "hex string length {} not in 1..={}",
                hex_str.len(),
                WIDE_INT_HEX_LEN
            )));
        }
        let padded = format!("{:0>16}", hex_str);
        let decoded = hex::decode(&padded)?;
        let mut be = [0u8; WIDE_INT_BYTES_LEN];
        be.copy_from_slice(&decoded);
        be.reverse();
        Self::from_bytes_le(&be)
    }

    /// Create a WideInt from a decimal string.
    ///
    /// Needed for values beyond what floating-point callers can represent
    /// exactly; accepts the full u64 range.
    ///
    /// # Arguments
    /// * `dec_str` - A base-10 string of an unsigned value.
    ///
    /// # Returns
    /// `Ok(WideInt)` on success, or an error for non-numeric or
    /// out-of-range input.
    pub fn from_dec_str(dec_str: &str) -> Result<Self, PrimitivesError> {
        let value: u64 = dec_str
            .parse()
            .map_err(|e| PrimitivesError::InvalidDecimal(format!("{}: {}", dec_str, e)))?;
        Ok(Self::from_u64(value))
    }

    /// Create a WideInt from a native u64.
    pub fn from_u64(value: u64) -> Self {
        WideInt {
            lower: value as u32,
            higher: (value >> 32) as u32,
        }
    }

    /// Return the value as a native u64.
    pub fn to_u64(self) -> u64 {
        (self.higher as u64) << 32 | self.lower as u64
    }

    /// Serialize as exactly 8 little-endian bytes.
    ///
    /// # Returns
    /// An 8-byte array: low word first, each word little-endian.
    pub fn to_bytes_le(self) -> [u8; WIDE_INT_BYTES_LEN] {
        let mut out = [0u8; WIDE_INT_BYTES_LEN];
        out[..4].copy_from_slice(&self.lower.to_le_bytes());
        out[4..].copy_from_slice(&self.higher.to_le_bytes());
        out
    }

    /// Serialize as a 16-character big-endian hex string.
    ///
    /// # Returns
    /// An uppercase-free, zero-padded hex string (high word first).
    pub fn to_hex(self) -> String {
        let mut be = self.to_bytes_le();
        be.reverse();
        hex::encode(be)
    }

    /// Add another WideInt, word-wise with carry propagation.
    ///
    /// The high word wraps on overflow past 2^64, matching unsigned wire
    /// arithmetic.
    ///
    /// # Arguments
    /// * `other` - The value to add.
    ///
    /// # Returns
    /// A new `WideInt` holding the sum.
    pub fn add(self, other: WideInt) -> WideInt {
        let (lower, carry) = self.lower.overflowing_add(other.lower);
        let higher = self
            .higher
            .wrapping_add(other.higher)
            .wrapping_add(carry as u32);
        WideInt { lower, higher }
    }

    /// Check whether both words are zero.
    pub fn is_zero(self) -> bool {
        self.lower == 0 && self.higher == 0
    }
}

impl PartialOrd for WideInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WideInt {
    fn cmp(&self, other: &Self) -> Ordering {
        // High word dominates the value ordering.
        self.higher
            .cmp(&other.higher)
            .then(self.lower.cmp(&other.lower))
    }
}

impl fmt::Display for WideInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_u64())
    }
}

impl From<u64> for WideInt {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_words_value() {
        let v = WideInt::from_words(0x89ABCDEF, 0x01234567);
        assert_eq!(v.to_u64(), 0x0123456789ABCDEF);
        assert_eq!(v.lower, 0x89ABCDEF);
        assert_eq!(v.higher, 0x01234567);
    }

    #[test]
    fn test_bytes_le_roundtrip() {
        let v = WideInt::from_words(0x89ABCDEF, 0x01234567);
        let bytes = v.to_bytes_le();
        assert_eq!(
            bytes,
            [0xEF, 0xCD, 0xAB, 0x89, 0x67, 0x45, 0x23, 0x01]
        );
        assert_eq!(WideInt::from_bytes_le(&bytes).unwrap(), v);
    }

    #[test]
    fn test_from_bytes_le_wrong_length() {
        assert!(WideInt::from_bytes_le(&[0u8; 7]).is_err());
        assert!(WideInt::from_bytes_le(&[0u8; 9]).is_err());
        assert!(WideInt::from_bytes_le(&[]).is_err());
    }

    #[test]
    fn test_hex_roundtrip() {
        let v = WideInt::from_hex("0123456789abcdef").unwrap();
        assert_eq!(v.to_u64(), 0x0123456789ABCDEF);
        assert_eq!(v.to_hex(), "0123456789abcdef");

        // Short strings are zero-padded on the high end.
        let short = WideInt::from_hex("ff").unwrap();
        assert_eq!(short.to_u64(), 255);
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        assert!(WideInt::from_hex("").is_err());
        assert!(WideInt::from_hex("0123456789abcdef0").is_err()); // 17 chars
        assert!(WideInt::from_hex("zzzz").is_err());
    }

    #[test]
    fn test_from_dec_str() {
        // Beyond 2^53 - 1, where f64 callers lose precision.
        let v = WideInt::from_dec_str("9007199254740993").unwrap();
        assert_eq!(v.to_u64(), 9007199254740993);

        let max = WideInt::from_dec_str("18446744073709551615").unwrap();
        assert_eq!(max.to_u64(), u64::MAX);

        assert!(WideInt::from_dec_str("not a number").is_err());
        assert!(WideInt::from_dec_str("-1").is_err());
        assert!(WideInt::from_dec_str("18446744073709551616").is_err());
    }

    #[test]
    fn test_add_carry_propagation() {
        // Low-word overflow carries into the high word.
        let a = WideInt::from_words(0xFFFFFFFF, 0);
        let b = WideInt::from_words(1, 0);
        let sum = a.add(b);
        assert_eq!(sum, WideInt::from_words(0, 1));

        // Plain u64 agreement on arbitrary values.
        let x = WideInt::from_u64(0xDEADBEEF_CAFEBABE);
        let y = WideInt::from_u64(0x00000001_FFFFFFFF);
        assert_eq!(
            x.add(y).to_u64(),
            0xDEADBEEF_CAFEBABEu64.wrapping_add(0x00000001_FFFFFFFF)
        );
    }

    #[test]
    fn test_ordering() {
        let small = WideInt::from_words(0xFFFFFFFF, 0);
        let large = WideInt::from_words(0, 1);
        assert!(small < large);
        assert!(large > small);
        assert_eq!(small.cmp(&small), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_is_zero() {
        assert!(WideInt::default().is_zero());
        assert!(!WideInt::from_words(1, 0).is_zero());
        assert!(!WideInt::from_words(0, 1).is_zero());
    }
}
