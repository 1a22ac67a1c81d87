//! Digest engine for the Tessera ledger protocol.
//!
//! The signature scheme, transaction hashing, and merkle tree all route
//! through one of two 512-bit hash families, selected once per network
//! epoch: SHA3 (final FIPS-202 padding) or Keccak (original padding).
//! `DigestEngine` is the strategy object that fixes the family; it is
//! injected into the signature scheme and the transaction codec at
//! construction rather than branched at every call site.

use sha3::{Digest, Keccak256, Keccak512, Sha3_256, Sha3_512};

/// Output size of the short digest variant in bytes.
pub const HASH_256_LEN: usize = 32;

/// Output size of the wide digest variant in bytes.
pub const HASH_512_LEN: usize = 64;

/// Selector for the hash family backing all signing and hashing for one
/// network epoch. Supplied by external configuration; never inferred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigestMode {
    /// FIPS-202 SHA3 padding.
    Sha3,
    /// Original Keccak padding.
    Keccak,
}

/// Fixed-length digest helpers over the configured hash family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DigestEngine {
    mode: DigestMode,
}

impl DigestEngine {
    /// Create an engine for the given digest mode.
    pub fn new(mode: DigestMode) -> Self {
        DigestEngine { mode }
    }

    /// Return the configured digest mode.
    pub fn mode(&self) -> DigestMode {
        self.mode
    }

    /// Compute the 32-byte digest of the input data.
    ///
    /// # Arguments
    /// * `data` - Byte slice to hash.
    ///
    /// # Returns
    /// A 32-byte digest in the configured family.
    pub fn hash32(&self, data: &[u8]) -> [u8; HASH_256_LEN] {
        self.hash32_all(&[data])
    }

    /// Compute the 64-byte digest of the input data.
    ///
    /// # Arguments
    /// * `data` - Byte slice to hash.
    ///
    /// # Returns
    /// A 64-byte digest in the configured family.
    pub fn hash64(&self, data: &[u8]) -> [u8; HASH_512_LEN] {
        self.hash64_all(&[data])
    }

    /// Compute the 32-byte digest of several concatenated parts.
    ///
    /// Equivalent to hashing the concatenation, without building it.
    ///
    /// # Arguments
    /// * `parts` - Byte slices fed to the hash in order.
    ///
    /// # Returns
    /// A 32-byte digest in the configured family.
    pub fn hash32_all(&self, parts: &[&[u8]]) -> [u8; HASH_256_LEN] {
        match self.mode {
            DigestMode::Sha3 => digest_all::<Sha3_256, HASH_256_LEN>(parts),
            DigestMode::Keccak => digest_all::<Keccak256, HASH_256_LEN>(parts),
        }
    }

    /// Compute the 64-byte digest of several concatenated parts.
    ///
    /// # Arguments
    /// * `parts` - Byte slices fed to the hash in order.
    ///
    /// # Returns
    /// A 64-byte digest in the configured family.
    pub fn hash64_all(&self, parts: &[&[u8]]) -> [u8; HASH_512_LEN] {
        match self.mode {
            DigestMode::Sha3 => digest_all::<Sha3_512, HASH_512_LEN>(parts),
            DigestMode::Keccak => digest_all::<Keccak512, HASH_512_LEN>(parts),
        }
    }
}

/// Run a digest over a sequence of parts and copy into a fixed array.
fn digest_all<D: Digest, const N: usize>(parts: &[&[u8]]) -> [u8; N] {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; N];
    output.copy_from_slice(&result);
    output
}
