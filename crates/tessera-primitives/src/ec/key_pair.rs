//! Account key material: public key newtype and seed-backed key pair.
//!
//! The public key is a deterministic function of the 32-byte private seed
//! and the active digest mode, so a `KeyPair` is always constructed
//! through a `DigestEngine` and never mutated afterwards. The seed is
//! zeroized on drop.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::digest::DigestEngine;
use crate::ec::scheme;
use crate::PrimitivesError;

/// Length of a public key in bytes.
pub const PUBLIC_KEY_BYTES_LEN: usize = 32;

/// Length of a private key seed in bytes.
pub const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// A 32-byte compressed Edwards public key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_BYTES_LEN]);

impl PublicKey {
    /// Create a public key from a raw 32-byte array.
    pub fn new(bytes: [u8; PUBLIC_KEY_BYTES_LEN]) -> Self {
        PublicKey(bytes)
    }

    /// Create a public key from a byte slice.
    ///
    /// # Arguments
    /// * `bytes` - A slice that must be exactly 32 bytes.
    ///
    /// # Returns
    /// `Ok(PublicKey)` if the slice is 32 bytes, or an error otherwise.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PUBLIC_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidLength {
                expected: PUBLIC_KEY_BYTES_LEN,
                got: bytes.len(),
            });
        }
        let mut arr = [0u8; PUBLIC_KEY_BYTES_LEN];
        arr.copy_from_slice(bytes);
        Ok(PublicKey(arr))
    }

    /// Create a public key from a 64-character hex string.
    ///
    /// # Arguments
    /// * `hex_str` - Hex encoding of the 32 key bytes.
    ///
    /// # Returns
    /// `Ok(PublicKey)` on success, or an error for invalid hex or length.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_BYTES_LEN] {
        &self.0
    }

    /// Serialize as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Check whether every key byte is zero.
    ///
    /// The all-zero key is not a usable identity; verification rejects it
    /// outright.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

/// A private seed together with its derived public key.
///
/// The public key is derived once at construction through the engine's
/// wide digest plus standard Edwards scalar clamping; the pair is never
/// re-derived or mutated.
#[derive(Clone, Debug)]
pub struct KeyPair {
    /// The 32-byte private seed.
    private: [u8; PRIVATE_KEY_BYTES_LEN],
    /// The derived public key.
    public: PublicKey,
}

impl KeyPair {
    /// Create a key pair from a raw 32-byte seed.
    ///
    /// # Arguments
    /// * `seed` - A slice that must be exactly 32 bytes.
    /// * `engine` - The digest engine for the active network epoch.
    ///
    /// # Returns
    /// `Ok(KeyPair)` with the derived public key, or an error if the seed
    /// length is wrong.
    pub fn from_seed(seed: &[u8], engine: DigestEngine) -> Result<Self, PrimitivesError> {
        if seed.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidLength {
                expected: PRIVATE_KEY_BYTES_LEN,
                got: seed.len(),
            });
        }
        let mut private = [0u8; PRIVATE_KEY_BYTES_LEN];
        private.copy_from_slice(seed);
        let public = PublicKey::new(scheme::derive_public_key_bytes(&private, engine));
        Ok(KeyPair { private, public })
    }

    /// Create a key pair from a 64-character hex seed.
    ///
    /// # Arguments
    /// * `hex_str` - Hex encoding of the 32 seed bytes.
    /// * `engine` - The digest engine for the active network epoch.
    ///
    /// # Returns
    /// `Ok(KeyPair)` on success, or an error for invalid hex or length.
    pub fn from_hex(hex_str: &str, engine: DigestEngine) -> Result<Self, PrimitivesError> {
        let mut bytes = hex::decode(hex_str)?;
        let result = Self::from_seed(&bytes, engine);
        bytes.zeroize();
        result
    }

    /// Generate a key pair from the supplied random source.
    ///
    /// Taking the source as a parameter keeps key generation
    /// deterministic under test with a seeded generator.
    ///
    /// # Arguments
    /// * `rng` - A cryptographically secure random source.
    /// * `engine` - The digest engine for the active network epoch.
    ///
    /// # Returns
    /// A new random `KeyPair`.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R, engine: DigestEngine) -> Self {
        let mut seed = [0u8; PRIVATE_KEY_BYTES_LEN];
        rng.fill_bytes(&mut seed);
        let pair = Self::from_seed(&seed, engine).expect("seed length is fixed");
        seed.zeroize();
        pair
    }

    /// Generate a key pair using the OS random number generator.
    ///
    /// # Arguments
    /// * `engine` - The digest engine for the active network epoch.
    ///
    /// # Returns
    /// A new random `KeyPair`.
    pub fn random(engine: DigestEngine) -> Self {
        Self::generate(&mut OsRng, engine)
    }

    /// Access the 32-byte private seed.
    pub fn private_key(&self) -> &[u8; PRIVATE_KEY_BYTES_LEN] {
        &self.private
    }

    /// Access the derived public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.private.zeroize();
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.private == other.private && self.public == other.public
    }
}

impl Eq for KeyPair {}
