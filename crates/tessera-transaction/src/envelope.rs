//! Transaction envelope: fixed header layout, signing bytes, and hashing.
//!
//! Every top-level transaction shares a fixed 120-byte header followed by
//! a type-specific body. The codec derives two distinct byte recipes from
//! a payload:
//!
//! - **signing bytes**: generation hash || everything after the
//!   size/signature/signer prefix — the input to the signature scheme;
//! - **transaction hash**: digest over the signature's R half, the signer
//!   key, the generation hash, and the signed data — computed only after
//!   signing.
//!
//! The two ranges must never be conflated; the hash recipe is a protocol
//! constant consumed by deployed verifiers.
//!
//! # Wire format
//!
//! | Field             | Offset | Size          |
//! |-------------------|--------|---------------|
//! | size              | 0      | 4 bytes (LE)  |
//! | signature         | 4      | 64 bytes      |
//! | signer public key | 68     | 32 bytes      |
//! | version           | 100    | 1 byte        |
//! | network           | 101    | 1 byte        |
//! | type              | 102    | 2 bytes (LE)  |
//! | max fee           | 104    | 8 bytes (LE)  |
//! | deadline          | 112    | 8 bytes (LE)  |
//! | body              | 120    | variable      |

use tessera_primitives::digest::DigestEngine;
use tessera_primitives::ec::{KeyPair, PublicKey, Signature, SignatureScheme};
use tessera_primitives::util::{ByteReader, ByteWriter};
use tessera_primitives::wideint::WideInt;
use tessera_primitives::PrimitivesError;

use crate::TransactionError;

/// Byte offset of the signature within a payload.
pub const SIGNATURE_OFFSET: usize = 4;

/// Byte offset of the signer public key within a payload.
pub const SIGNER_OFFSET: usize = 68;

/// Byte offset of the signed data: everything after the
/// size(4) + signature(64) + signer(32) prefix.
pub const SIGNED_DATA_OFFSET: usize = 100;

/// Total fixed header length; the body starts here.
pub const HEADER_LEN: usize = 120;

/// Length of the generation hash in bytes.
pub const GENERATION_HASH_LEN: usize = 32;

// ---------------------------------------------------------------------------
// GenerationHash
// ---------------------------------------------------------------------------

/// The 32-byte per-network constant mixed into every signature.
///
/// Binds signatures and transaction hashes to one network instance so a
/// transaction cannot be replayed across networks. Supplied externally;
/// never derived or cached by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationHash([u8; GENERATION_HASH_LEN]);

impl GenerationHash {
    /// Create a generation hash from a raw 32-byte array.
    pub fn new(bytes: [u8; GENERATION_HASH_LEN]) -> Self {
        GenerationHash(bytes)
    }

    /// Create a generation hash from a byte slice.
    ///
    /// # Arguments
    /// * `bytes` - A slice that must be exactly 32 bytes.
    ///
    /// # Returns
    /// `Ok(GenerationHash)` if the slice is 32 bytes, or an error otherwise.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != GENERATION_HASH_LEN {
            return Err(PrimitivesError::InvalidLength {
                expected: GENERATION_HASH_LEN,
                got: bytes.len(),
            });
        }
        let mut arr = [0u8; GENERATION_HASH_LEN];
        arr.copy_from_slice(bytes);
        Ok(GenerationHash(arr))
    }

    /// Create a generation hash from a 64-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Access the raw hash bytes.
    pub fn as_bytes(&self) -> &[u8; GENERATION_HASH_LEN] {
        &self.0
    }

    /// Serialize as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

// ---------------------------------------------------------------------------
// TransactionEnvelope
// ---------------------------------------------------------------------------

/// The common fixed-layout header shared by all top-level transactions,
/// plus the opaque type-specific body.
///
/// Built once per transaction with a zero-filled signature and signer,
/// signed once (which overwrites those two fields in the serialized
/// payload), then optionally cosigned and serialized. Never partially
/// re-signed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionEnvelope {
    /// Exact serialized byte length, including this field.
    pub size: u32,

    /// The envelope signature; zero-filled until the signing step.
    pub signature: Signature,

    /// The signer's public key; zero-filled until the signing step.
    pub signer_public_key: PublicKey,

    /// Transaction layout version.
    pub version: u8,

    /// Network identifier byte.
    pub network: u8,

    /// Transaction type discriminator.
    pub transaction_type: u16,

    /// Maximum fee the signer is willing to pay.
    pub max_fee: WideInt,

    /// Deadline after which the transaction is rejected.
    pub deadline: WideInt,

    /// Type-specific body bytes, opaque to this crate except for the
    /// aggregate container's own body.
    pub body: Vec<u8>,
}

impl TransactionEnvelope {
    /// Create an unsigned envelope.
    ///
    /// The signature and signer public key are zero-filled; `size` is
    /// computed from the body length and is not changed by signing.
    ///
    /// # Arguments
    /// * `version` - Transaction layout version.
    /// * `network` - Network identifier byte.
    /// * `transaction_type` - Transaction type discriminator.
    /// * `max_fee` - Maximum fee.
    /// * `deadline` - Transaction deadline.
    /// * `body` - Type-specific body bytes.
    ///
    /// # Returns
    /// A new unsigned `TransactionEnvelope`.
    pub fn new(
        version: u8,
        network: u8,
        transaction_type: u16,
        max_fee: WideInt,
        deadline: WideInt,
        body: Vec<u8>,
    ) -> Self {
        TransactionEnvelope {
            size: (HEADER_LEN + body.len()) as u32,
            signature: Signature::new([0u8; 32], [0u8; 32]),
            signer_public_key: PublicKey::default(),
            version,
            network,
            transaction_type,
            max_fee,
            deadline,
            body,
        }
    }

    /// Serialize this envelope to wire-format bytes.
    ///
    /// # Returns
    /// A `Vec<u8>` of exactly `size` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.size as usize);
        writer.write_u32_le(self.size);
        writer.write_bytes(&self.signature.to_bytes());
        writer.write_bytes(self.signer_public_key.as_bytes());
        writer.write_u8(self.version);
        writer.write_u8(self.network);
        writer.write_u16_le(self.transaction_type);
        writer.write_bytes(&self.max_fee.to_bytes_le());
        writer.write_bytes(&self.deadline.to_bytes_le());
        writer.write_bytes(&self.body);
        writer.into_bytes()
    }

    /// Decode an envelope from wire-format bytes.
    ///
    /// Pure function over the fixed header offsets. The byte slice must
    /// contain exactly one envelope: the declared `size` must equal the
    /// slice length.
    ///
    /// # Arguments
    /// * `bytes` - The raw payload bytes.
    ///
    /// # Returns
    /// `Ok(TransactionEnvelope)` on success; `TruncatedPayload` if fewer
    /// bytes are present than the header or declared size requires.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        if bytes.len() < HEADER_LEN {
            return Err(TransactionError::TruncatedPayload {
                needed: HEADER_LEN,
                got: bytes.len(),
            });
        }

        let mut reader = ByteReader::new(bytes);
        let size = reader.read_u32_le()?;
        if (size as usize) > bytes.len() {
            return Err(TransactionError::TruncatedPayload {
                needed: size as usize,
                got: bytes.len(),
            });
        }
        if (size as usize) < bytes.len() {
            return Err(TransactionError::SerializationError(format!(
                "trailing {} bytes after envelope",
                bytes.len() - size as usize
            )));
        }

        let signature = Signature::from_bytes(reader.read_bytes(64)?)?;
        let signer_public_key = PublicKey::from_bytes(reader.read_bytes(32)?)?;
        let version = reader.read_u8()?;
        let network = reader.read_u8()?;
        let transaction_type = reader.read_u16_le()?;
        let max_fee = WideInt::from_bytes_le(reader.read_bytes(8)?)?;
        let deadline = WideInt::from_bytes_le(reader.read_bytes(8)?)?;
        let body = reader.read_bytes(reader.remaining())?.to_vec();

        Ok(TransactionEnvelope {
            size,
            signature,
            signer_public_key,
            version,
            network,
            transaction_type,
            max_fee,
            deadline,
            body,
        })
    }
}

// ---------------------------------------------------------------------------
// EnvelopeCodec
// ---------------------------------------------------------------------------

/// Signing-byte extraction, payload signing, and transaction hashing.
///
/// Holds the digest engine for the active network epoch; hash selection
/// happens once here rather than at every call site.
#[derive(Clone, Copy, Debug)]
pub struct EnvelopeCodec {
    engine: DigestEngine,
}

impl EnvelopeCodec {
    /// Create a codec backed by the given digest engine.
    pub fn new(engine: DigestEngine) -> Self {
        EnvelopeCodec { engine }
    }

    /// Return the digest engine backing this codec.
    pub fn engine(&self) -> DigestEngine {
        self.engine
    }

    /// Derive the bytes fed to the signature scheme for a payload.
    ///
    /// Drops the leading size(4) + signature(64) + signer(32) prefix and
    /// prepends the generation hash, binding the signature to one network.
    ///
    /// # Arguments
    /// * `payload` - Serialized envelope bytes (signed or unsigned).
    /// * `generation_hash` - The per-network constant.
    ///
    /// # Returns
    /// `Ok(Vec<u8>)` with the signing bytes, or `TruncatedPayload` if the
    /// payload is shorter than the prefix.
    pub fn signing_bytes(
        &self,
        payload: &[u8],
        generation_hash: &GenerationHash,
    ) -> Result<Vec<u8>, TransactionError> {
        if payload.len() < SIGNED_DATA_OFFSET {
            return Err(TransactionError::TruncatedPayload {
                needed: SIGNED_DATA_OFFSET,
                got: payload.len(),
            });
        }
        let mut out = Vec::with_capacity(
            GENERATION_HASH_LEN + payload.len() - SIGNED_DATA_OFFSET,
        );
        out.extend_from_slice(generation_hash.as_bytes());
        out.extend_from_slice(&payload[SIGNED_DATA_OFFSET..]);
        Ok(out)
    }

    /// Sign a serialized envelope, producing a new signed payload.
    ///
    /// Computes the signing bytes, signs them, and writes the signature
    /// into bytes `[4..68]` and the signer public key into `[68..100]` of
    /// a copy of the payload. The `size` field is unchanged by signing and
    /// the input payload is not modified.
    ///
    /// # Arguments
    /// * `payload` - Serialized unsigned envelope bytes.
    /// * `key_pair` - The signer's key pair.
    /// * `generation_hash` - The per-network constant.
    ///
    /// # Returns
    /// `Ok(Vec<u8>)` with the signed payload.
    pub fn sign(
        &self,
        payload: &[u8],
        key_pair: &KeyPair,
        generation_hash: &GenerationHash,
    ) -> Result<Vec<u8>, TransactionError> {
        let signing_bytes = self.signing_bytes(payload, generation_hash)?;
        let scheme = SignatureScheme::new(self.engine);
        let signature = scheme.sign(key_pair, &signing_bytes)?;

        let mut signed = payload.to_vec();
        signed[SIGNATURE_OFFSET..SIGNER_OFFSET].copy_from_slice(&signature.to_bytes());
        signed[SIGNER_OFFSET..SIGNED_DATA_OFFSET]
            .copy_from_slice(key_pair.public_key().as_bytes());
        Ok(signed)
    }

    /// Compute the transaction hash of a signed payload.
    ///
    /// Digests `R || signerPublicKey || generationHash || signedData`,
    /// where `R` is only the first half of the signature. This recipe
    /// deliberately differs from the signing bytes and must be preserved
    /// bit-for-bit for interoperability with deployed verifiers.
    ///
    /// # Arguments
    /// * `payload` - Serialized signed envelope bytes.
    /// * `generation_hash` - The per-network constant.
    ///
    /// # Returns
    /// `Ok([u8; 32])` with the transaction hash.
    pub fn transaction_hash(
        &self,
        payload: &[u8],
        generation_hash: &GenerationHash,
    ) -> Result<[u8; 32], TransactionError> {
        if payload.len() < SIGNED_DATA_OFFSET {
            return Err(TransactionError::TruncatedPayload {
                needed: SIGNED_DATA_OFFSET,
                got: payload.len(),
            });
        }
        Ok(self.engine.hash32_all(&[
            &payload[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 32],
            &payload[SIGNER_OFFSET..SIGNED_DATA_OFFSET],
            generation_hash.as_bytes(),
            &payload[SIGNED_DATA_OFFSET..],
        ]))
    }
}
