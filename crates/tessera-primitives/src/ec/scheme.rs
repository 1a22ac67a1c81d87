//! Pluggable-hash Edwards signature scheme.
//!
//! The scheme is the standard twisted-Edwards construction with the hash
//! primitive swapped for the engine's 512-bit digest: key derivation
//! clamps the low half of `hash64(seed)`, the nonce is derived from the
//! upper half, and the challenge binds R, the public key, and the
//! message. Verification is a pure predicate: cryptographic rejection
//! returns `false`, never an error.

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::digest::DigestEngine;
use crate::ec::key_pair::{KeyPair, PublicKey};
use crate::ec::signature::Signature;
use crate::PrimitivesError;

/// The signature scheme for one network epoch.
///
/// Holds the digest engine so hash selection happens once, at
/// construction, instead of at every call site.
#[derive(Clone, Copy, Debug)]
pub struct SignatureScheme {
    engine: DigestEngine,
}

impl SignatureScheme {
    /// Create a scheme backed by the given digest engine.
    pub fn new(engine: DigestEngine) -> Self {
        SignatureScheme { engine }
    }

    /// Return the digest engine backing this scheme.
    pub fn engine(&self) -> DigestEngine {
        self.engine
    }

    /// Derive the public key for a 32-byte seed.
    ///
    /// # Arguments
    /// * `seed` - The 32-byte private seed.
    ///
    /// # Returns
    /// The compressed public key.
    pub fn derive_public_key(&self, seed: &[u8; 32]) -> PublicKey {
        PublicKey::new(derive_public_key_bytes(seed, self.engine))
    }

    /// Sign a message with the given key pair.
    ///
    /// # Arguments
    /// * `key_pair` - The signer's key pair.
    /// * `message` - The bytes to sign.
    ///
    /// # Returns
    /// `Ok(Signature)` on success. The non-canonical-S rejection is a
    /// defensive check with no expected runtime path.
    pub fn sign(
        &self,
        key_pair: &KeyPair,
        message: &[u8],
    ) -> Result<Signature, PrimitivesError> {
        let mut expanded = ExpandedSeed::from_seed(key_pair.private_key(), self.engine);
        let d = Scalar::from_bytes_mod_order(expanded.scalar_bytes);

        // Deterministic nonce from the upper half of the seed hash.
        let r = Scalar::from_bytes_mod_order_wide(
            &self.engine.hash64_all(&[&expanded.nonce_seed, message]),
        );
        expanded.zeroize();

        let r_point = EdwardsPoint::mul_base(&r).compress();
        let h = Scalar::from_bytes_mod_order_wide(&self.engine.hash64_all(&[
            r_point.as_bytes(),
            key_pair.public_key().as_bytes(),
            message,
        ]));
        let s = r + h * d;

        let signature = Signature::new(r_point.to_bytes(), s.to_bytes());
        if !signature.is_canonical() {
            return Err(PrimitivesError::NonCanonicalSignature);
        }
        Ok(signature)
    }

    /// Verify a signature over a message.
    ///
    /// Returns `false` (not an error) for a non-canonical S, an all-zero
    /// public key, or a public key that does not decode to a curve point.
    ///
    /// # Arguments
    /// * `public_key` - The claimed signer.
    /// * `message` - The signed bytes.
    /// * `signature` - The signature to check.
    ///
    /// # Returns
    /// `true` iff the signature is valid for this key and message.
    pub fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
        if !signature.is_canonical() || public_key.is_zero() {
            return false;
        }
        let a = match CompressedEdwardsY(*public_key.as_bytes()).decompress() {
            Some(point) => point,
            None => return false,
        };
        let s = match Option::<Scalar>::from(Scalar::from_canonical_bytes(*signature.s())) {
            Some(scalar) => scalar,
            None => return false,
        };

        let h = Scalar::from_bytes_mod_order_wide(&self.engine.hash64_all(&[
            signature.r(),
            public_key.as_bytes(),
            message,
        ]));

        // S·B - h·A must recover R.
        let recovered = EdwardsPoint::vartime_double_scalar_mul_basepoint(&-h, &a, &s);
        recovered.compress().as_bytes() == signature.r()
    }

    /// Derive a 32-byte shared secret with another party.
    ///
    /// Computes the Diffie-Hellman point from our clamped scalar and the
    /// other party's public key, XORs the packed point with the salt, and
    /// digests the result with the 32-byte hash variant. The resulting
    /// secret seeds an external encryption cipher.
    ///
    /// # Arguments
    /// * `salt` - A 32-byte salt, fresh per derivation.
    /// * `key_pair` - Our key pair.
    /// * `other_public_key` - The other party's public key.
    ///
    /// # Returns
    /// `Ok([u8; 32])` with the shared secret, or an error if the other
    /// public key is not a curve point.
    pub fn derive_shared_secret(
        &self,
        salt: &[u8; 32],
        key_pair: &KeyPair,
        other_public_key: &PublicKey,
    ) -> Result<[u8; 32], PrimitivesError> {
        let point = CompressedEdwardsY(*other_public_key.as_bytes())
            .decompress()
            .ok_or_else(|| {
                PrimitivesError::InvalidPublicKey("not a point on the curve".to_string())
            })?;

        let mut expanded = ExpandedSeed::from_seed(key_pair.private_key(), self.engine);
        let d = Scalar::from_bytes_mod_order(expanded.scalar_bytes);
        expanded.zeroize();

        let shared_point = (point * d).compress();
        let mut xored = [0u8; 32];
        for (out, (p, s)) in xored
            .iter_mut()
            .zip(shared_point.as_bytes().iter().zip(salt.iter()))
        {
            *out = p ^ s;
        }
        Ok(self.engine.hash32(&xored))
    }
}

/// Generate a fresh 32-byte salt from the supplied random source.
///
/// # Arguments
/// * `rng` - A cryptographically secure random source.
///
/// # Returns
/// A random 32-byte salt for shared-secret derivation.
pub fn random_salt<R: RngCore + CryptoRng>(rng: &mut R) -> [u8; 32] {
    let mut salt = [0u8; 32];
    rng.fill_bytes(&mut salt);
    salt
}

/// Derive the packed public key bytes for a seed under an engine.
pub(crate) fn derive_public_key_bytes(seed: &[u8; 32], engine: DigestEngine) -> [u8; 32] {
    let mut expanded = ExpandedSeed::from_seed(seed, engine);
    let d = Scalar::from_bytes_mod_order(expanded.scalar_bytes);
    expanded.zeroize();
    EdwardsPoint::mul_base(&d).compress().to_bytes()
}

/// The two halves of `hash64(seed)`: the clamped scalar bytes and the
/// nonce seed. Zeroized by the caller as soon as both are consumed.
struct ExpandedSeed {
    scalar_bytes: [u8; 32],
    nonce_seed: [u8; 32],
}

impl ExpandedSeed {
    fn from_seed(seed: &[u8; 32], engine: DigestEngine) -> Self {
        let mut hash = engine.hash64(seed);
        let mut scalar_bytes = [0u8; 32];
        let mut nonce_seed = [0u8; 32];
        scalar_bytes.copy_from_slice(&hash[..32]);
        nonce_seed.copy_from_slice(&hash[32..]);
        hash.zeroize();
        clamp(&mut scalar_bytes);
        ExpandedSeed { scalar_bytes, nonce_seed }
    }

    fn zeroize(&mut self) {
        self.scalar_bytes.zeroize();
        self.nonce_seed.zeroize();
    }
}

/// Standard Edwards scalar clamping: clear the 3 low bits of byte 0,
/// clear the top bit and set the second-highest bit of byte 31.
fn clamp(scalar_bytes: &mut [u8; 32]) {
    scalar_bytes[0] &= 0xF8;
    scalar_bytes[31] &= 0x7F;
    scalar_bytes[31] |= 0x40;
}
