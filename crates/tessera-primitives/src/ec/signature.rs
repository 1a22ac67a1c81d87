//! 64-byte Edwards signature with canonicality checking.
//!
//! A signature is the concatenation `R (32 bytes) || S (32 bytes)`, where
//! `R` is a compressed curve point and `S` a little-endian scalar. A
//! signature is canonical iff `S` is already reduced modulo the curve
//! group order; verifiers reject non-canonical signatures to rule out
//! scalar-malleability.

use curve25519_dalek::scalar::Scalar;

use crate::PrimitivesError;

/// Length of a serialized signature in bytes.
pub const SIGNATURE_BYTES_LEN: usize = 64;

/// Length of each signature half (R or S) in bytes.
pub const SIGNATURE_HALF_LEN: usize = 32;

/// An Edwards signature with R and S components.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    /// The R component: a compressed curve point (32 bytes).
    r: [u8; SIGNATURE_HALF_LEN],
    /// The S component: a little-endian scalar (32 bytes).
    s: [u8; SIGNATURE_HALF_LEN],
}

impl Signature {
    /// Create a signature from raw R and S 32-byte arrays.
    ///
    /// # Arguments
    /// * `r` - The R component (compressed point bytes).
    /// * `s` - The S component (little-endian scalar bytes).
    ///
    /// # Returns
    /// A new `Signature` with the given R and S values.
    pub fn new(r: [u8; SIGNATURE_HALF_LEN], s: [u8; SIGNATURE_HALF_LEN]) -> Self {
        Signature { r, s }
    }

    /// Parse a signature from a 64-byte slice.
    ///
    /// # Arguments
    /// * `bytes` - A slice that must be exactly 64 bytes: R || S.
    ///
    /// # Returns
    /// `Ok(Signature)` on success, or an error if the length is wrong.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != SIGNATURE_BYTES_LEN {
            return Err(PrimitivesError::InvalidLength {
                expected: SIGNATURE_BYTES_LEN,
                got: bytes.len(),
            });
        }
        let mut r = [0u8; SIGNATURE_HALF_LEN];
        let mut s = [0u8; SIGNATURE_HALF_LEN];
        r.copy_from_slice(&bytes[..SIGNATURE_HALF_LEN]);
        s.copy_from_slice(&bytes[SIGNATURE_HALF_LEN..]);
        Ok(Signature { r, s })
    }

    /// Parse a signature from a 128-character hex string.
    ///
    /// # Arguments
    /// * `hex_str` - Hex encoding of the 64 signature bytes.
    ///
    /// # Returns
    /// `Ok(Signature)` on success, or an error for invalid hex or length.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Access the R component of the signature.
    ///
    /// # Returns
    /// A reference to the 32-byte compressed point.
    pub fn r(&self) -> &[u8; SIGNATURE_HALF_LEN] {
        &self.r
    }

    /// Access the S component of the signature.
    ///
    /// # Returns
    /// A reference to the 32-byte little-endian scalar.
    pub fn s(&self) -> &[u8; SIGNATURE_HALF_LEN] {
        &self.s
    }

    /// Serialize as 64 bytes: R || S.
    ///
    /// # Returns
    /// The raw signature bytes.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_BYTES_LEN] {
        let mut out = [0u8; SIGNATURE_BYTES_LEN];
        out[..SIGNATURE_HALF_LEN].copy_from_slice(&self.r);
        out[SIGNATURE_HALF_LEN..].copy_from_slice(&self.s);
        out
    }

    /// Serialize as a lowercase 128-character hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Check whether the S component is canonical.
    ///
    /// `S` is canonical iff re-reducing it modulo the group order is a
    /// no-op: either exactly zero or already in reduced form.
    ///
    /// # Returns
    /// `true` if S is canonical.
    pub fn is_canonical(&self) -> bool {
        Option::<Scalar>::from(Scalar::from_canonical_bytes(self.s)).is_some()
    }
}
