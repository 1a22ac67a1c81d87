//! Bottom-up merkle root computation over inner transaction hashes.
//!
//! The builder is a single-use accumulator: construct, append the inner
//! transaction hashes in order, query the root once, discard. At each
//! level, adjacent pairs are concatenated and digested; a level with an
//! odd count pairs its last element with itself rather than promoting it
//! unchanged. That parity policy changes the root for any tree with an
//! odd hash count at any level and must be reproduced exactly.

use tessera_primitives::digest::{DigestEngine, HASH_256_LEN, HASH_512_LEN};
use tessera_primitives::PrimitivesError;

use crate::TransactionError;

/// Accumulates fixed-length hashes and computes their merkle root.
#[derive(Clone, Debug)]
pub struct MerkleHashBuilder {
    engine: DigestEngine,
    digest_len: usize,
    hashes: Vec<Vec<u8>>,
}

impl MerkleHashBuilder {
    /// Create a builder over 32-byte hashes.
    ///
    /// # Arguments
    /// * `engine` - The digest engine for the active network epoch.
    pub fn new(engine: DigestEngine) -> Self {
        MerkleHashBuilder {
            engine,
            digest_len: HASH_256_LEN,
            hashes: Vec::new(),
        }
    }

    /// Create a builder over hashes of the given digest length.
    ///
    /// # Arguments
    /// * `engine` - The digest engine for the active network epoch.
    /// * `digest_len` - Hash length in bytes; 32 or 64.
    ///
    /// # Returns
    /// `Ok(MerkleHashBuilder)` or an error for an unsupported length.
    pub fn with_digest_len(
        engine: DigestEngine,
        digest_len: usize,
    ) -> Result<Self, TransactionError> {
        if digest_len != HASH_256_LEN && digest_len != HASH_512_LEN {
            return Err(TransactionError::SerializationError(format!(
                "unsupported merkle digest length {}",
                digest_len
            )));
        }
        Ok(MerkleHashBuilder {
            engine,
            digest_len,
            hashes: Vec::new(),
        })
    }

    /// Append a hash to the accumulator.
    ///
    /// # Arguments
    /// * `hash` - A hash of exactly the configured digest length.
    ///
    /// # Returns
    /// `Ok(&mut Self)` for chaining, or an error on a length mismatch.
    pub fn append(&mut self, hash: &[u8]) -> Result<&mut Self, TransactionError> {
        if hash.len() != self.digest_len {
            return Err(PrimitivesError::InvalidLength {
                expected: self.digest_len,
                got: hash.len(),
            }
            .into());
        }
        self.hashes.push(hash.to_vec());
        Ok(self)
    }

    /// Return the number of appended hashes.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Check whether no hashes have been appended.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Compute the merkle root of the appended hashes.
    ///
    /// An empty builder yields the all-zero digest of the configured
    /// length; a single hash yields the digest of that hash paired with
    /// itself. The append order determines the root.
    ///
    /// # Returns
    /// The root hash, `digest_len` bytes.
    pub fn root_hash(&self) -> Vec<u8> {
        if self.hashes.is_empty() {
            return vec![0u8; self.digest_len];
        }

        // The pairing pass runs at least once: a single appended hash is
        // still digested against itself, never returned unchanged.
        let mut level = self.hashes.clone();
        loop {
            let mut parents = Vec::with_capacity((level.len() + 1) / 2);
            for pair in level.chunks(2) {
                // Odd level count: the last element pairs with itself.
                let right = pair.get(1).unwrap_or(&pair[0]);
                parents.push(self.parent(&pair[0], right));
            }
            if parents.len() == 1 {
                return parents.pop().expect("parents holds exactly one hash");
            }
            level = parents;
        }
    }

    /// Digest the concatenation of two child hashes.
    fn parent(&self, left: &[u8], right: &[u8]) -> Vec<u8> {
        match self.digest_len {
            HASH_256_LEN => self.engine.hash32_all(&[left, right]).to_vec(),
            _ => self.engine.hash64_all(&[left, right]).to_vec(),
        }
    }
}
