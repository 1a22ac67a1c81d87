//! Aggregate container body: embedded transactions and cosignatures.
//!
//! An aggregate transaction's body is a 4-byte little-endian length `L`,
//! then `L` bytes of back-to-back size-prefixed embedded transaction
//! records, then zero or more fixed 96-byte cosignature records. The
//! order of embedded transactions is preserved end-to-end: it determines
//! the merkle root and the interpretation of hash-dependent nested types.
//! Cosignature order is append-order and round-trips byte-for-byte.
//!
//! # Embedded record wire format
//!
//! | Field             | Size         |
//! |-------------------|--------------|
//! | size              | 4 bytes (LE) |
//! | signer public key | 32 bytes     |
//! | version           | 1 byte       |
//! | network           | 1 byte       |
//! | type              | 2 bytes (LE) |
//! | body              | size - 40    |

use tessera_primitives::ec::{PublicKey, Signature};
use tessera_primitives::util::{ByteReader, ByteWriter};

use crate::TransactionError;

/// Fixed header length of an embedded transaction record.
pub const EMBEDDED_HEADER_LEN: usize = 40;

/// Fixed length of a cosignature record: signer(32) + signature(64).
pub const COSIGNATURE_LEN: usize = 96;

// ---------------------------------------------------------------------------
// EmbeddedTransaction
// ---------------------------------------------------------------------------

/// A transaction nested inside an aggregate container.
///
/// Shares the type/body semantics of a top-level envelope but carries no
/// signature, fee, or deadline: those are inherited from the enclosing
/// aggregate at confirmation time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbeddedTransaction {
    /// The public key of the account issuing this inner transaction.
    pub signer_public_key: PublicKey,

    /// Transaction layout version.
    pub version: u8,

    /// Network identifier byte.
    pub network: u8,

    /// Transaction type discriminator.
    pub transaction_type: u16,

    /// Type-specific body bytes, opaque to this crate.
    pub body: Vec<u8>,
}

impl EmbeddedTransaction {
    /// Return the serialized record size, including the size field itself.
    pub fn size(&self) -> u32 {
        (EMBEDDED_HEADER_LEN + self.body.len()) as u32
    }

    /// Append this record's wire-format bytes to a writer.
    ///
    /// # Arguments
    /// * `writer` - The destination writer.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u32_le(self.size());
        writer.write_bytes(self.signer_public_key.as_bytes());
        writer.write_u8(self.version);
        writer.write_u8(self.network);
        writer.write_u16_le(self.transaction_type);
        writer.write_bytes(&self.body);
    }

    /// Decode one record from a reader positioned at its size field.
    ///
    /// # Arguments
    /// * `reader` - The reader to consume from.
    ///
    /// # Returns
    /// `Ok(EmbeddedTransaction)` on success; `TruncatedPayload` if the
    /// declared size overruns the available bytes, or a serialization
    /// error if the declared size is smaller than the fixed header.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let remaining_before = reader.remaining();
        let size = reader
            .read_u32_le()
            .map_err(|_| TransactionError::TruncatedPayload {
                needed: 4,
                got: remaining_before,
            })? as usize;

        if size < EMBEDDED_HEADER_LEN {
            return Err(TransactionError::SerializationError(format!(
                "embedded transaction size {} below fixed header {}",
                size, EMBEDDED_HEADER_LEN
            )));
        }
        if size - 4 > reader.remaining() {
            return Err(TransactionError::TruncatedPayload {
                needed: size,
                got: remaining_before,
            });
        }

        let signer_public_key = PublicKey::from_bytes(reader.read_bytes(32)?)?;
        let version = reader.read_u8()?;
        let network = reader.read_u8()?;
        let transaction_type = reader.read_u16_le()?;
        let body = reader.read_bytes(size - EMBEDDED_HEADER_LEN)?.to_vec();

        Ok(EmbeddedTransaction {
            signer_public_key,
            version,
            network,
            transaction_type,
            body,
        })
    }
}

// ---------------------------------------------------------------------------
// Cosignature
// ---------------------------------------------------------------------------

/// A detached signature over the parent transaction's hash (not its
/// payload), appended by a secondary signer of an aggregate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cosignature {
    /// The cosigner's public key.
    pub signer_public_key: PublicKey,

    /// The cosigner's signature over the parent transaction hash.
    pub signature: Signature,
}

impl Cosignature {
    /// Serialize as a fixed 96-byte record.
    pub fn to_bytes(&self) -> [u8; COSIGNATURE_LEN] {
        let mut out = [0u8; COSIGNATURE_LEN];
        out[..32].copy_from_slice(self.signer_public_key.as_bytes());
        out[32..].copy_from_slice(&self.signature.to_bytes());
        out
    }

    /// Decode one 96-byte record from a reader.
    ///
    /// # Arguments
    /// * `reader` - The reader to consume from.
    ///
    /// # Returns
    /// `Ok(Cosignature)` on success, or a forwarded read error.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let signer_public_key = PublicKey::from_bytes(reader.read_bytes(32)?)?;
        let signature = Signature::from_bytes(reader.read_bytes(64)?)?;
        Ok(Cosignature {
            signer_public_key,
            signature,
        })
    }
}

// ---------------------------------------------------------------------------
// AggregateBody
// ---------------------------------------------------------------------------

/// The decoded body of an aggregate transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AggregateBody {
    /// Embedded transactions, in the order that fixes the merkle root.
    pub inner_transactions: Vec<EmbeddedTransaction>,

    /// Appended cosignatures, in append order.
    pub cosignatures: Vec<Cosignature>,
}

impl AggregateBody {
    /// Decode an aggregate body from its raw bytes.
    ///
    /// # Arguments
    /// * `bytes` - The aggregate transaction's body bytes (everything
    ///   after the envelope header).
    ///
    /// # Returns
    /// `Ok(AggregateBody)` on success; `TruncatedPayload` if the inner
    /// block overruns the data, `MalformedCosignatureBlock` if the
    /// trailing bytes are not whole 96-byte records.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        if bytes.len() < 4 {
            return Err(TransactionError::TruncatedPayload {
                needed: 4,
                got: bytes.len(),
            });
        }
        let inner_len =
            u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        if 4 + inner_len > bytes.len() {
            return Err(TransactionError::TruncatedPayload {
                needed: 4 + inner_len,
                got: bytes.len(),
            });
        }

        // Inner transaction block: back-to-back self-describing records.
        let mut inner_transactions = Vec::new();
        let inner_block = &bytes[4..4 + inner_len];
        let mut reader = ByteReader::new(inner_block);
        while reader.remaining() > 0 {
            inner_transactions.push(EmbeddedTransaction::read_from(&mut reader)?);
        }

        // Everything after the inner block is whole cosignature records.
        let cosignature_block = &bytes[4 + inner_len..];
        let remainder = cosignature_block.len() % COSIGNATURE_LEN;
        if remainder != 0 {
            return Err(TransactionError::MalformedCosignatureBlock { remainder });
        }
        let mut cosignatures = Vec::with_capacity(cosignature_block.len() / COSIGNATURE_LEN);
        let mut reader = ByteReader::new(cosignature_block);
        while reader.remaining() > 0 {
            cosignatures.push(Cosignature::read_from(&mut reader)?);
        }

        Ok(AggregateBody {
            inner_transactions,
            cosignatures,
        })
    }

    /// Encode this body to raw bytes, the exact inverse of `from_bytes`.
    ///
    /// # Returns
    /// A `Vec<u8>`: inner block length, embedded records in order, then
    /// cosignature records in order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let inner_len: usize = self
            .inner_transactions
            .iter()
            .map(|tx| tx.size() as usize)
            .sum();

        let mut writer = ByteWriter::with_capacity(
            4 + inner_len + self.cosignatures.len() * COSIGNATURE_LEN,
        );
        writer.write_u32_le(inner_len as u32);
        for tx in &self.inner_transactions {
            tx.write_to(&mut writer);
        }
        for cosignature in &self.cosignatures {
            writer.write_bytes(&cosignature.to_bytes());
        }
        writer.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedded(tag: u8, body: &[u8]) -> EmbeddedTransaction {
        EmbeddedTransaction {
            signer_public_key: PublicKey::new([tag; 32]),
            version: 1,
            network: 0x78,
            transaction_type: 0x4154,
            body: body.to_vec(),
        }
    }

    fn cosignature(tag: u8) -> Cosignature {
        Cosignature {
            signer_public_key: PublicKey::new([tag; 32]),
            signature: Signature::new([tag; 32], [0x01; 32]),
        }
    }

    #[test]
    fn test_embedded_size() {
        assert_eq!(embedded(1, b"").size(), 40);
        assert_eq!(embedded(1, b"12345").size(), 45);
    }

    #[test]
    fn test_roundtrip_empty() {
        let body = AggregateBody::default();
        let bytes = body.to_bytes();
        assert_eq!(bytes, vec![0, 0, 0, 0]);
        assert_eq!(AggregateBody::from_bytes(&bytes).unwrap(), body);
    }

    #[test]
    fn test_roundtrip_inner_and_cosignatures() {
        let body = AggregateBody {
            inner_transactions: vec![
                embedded(0xA1, b"first body"),
                embedded(0xB2, b""),
                embedded(0xC3, b"third"),
            ],
            cosignatures: vec![cosignature(0x11), cosignature(0x22)],
        };
        let bytes = body.to_bytes();
        let decoded = AggregateBody::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, body);
        // Ordering preserved exactly.
        assert_eq!(decoded.inner_transactions[0].body, b"first body");
        assert_eq!(decoded.inner_transactions[2].body, b"third");
        // Byte-for-byte re-encode.
        assert_eq!(decoded.to_bytes(), bytes);
    }

    #[test]
    fn test_truncated_inner_block() {
        let body = AggregateBody {
            inner_transactions: vec![embedded(0xA1, b"payload")],
            cosignatures: vec![],
        };
        let mut bytes = body.to_bytes();
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(
            AggregateBody::from_bytes(&bytes),
            Err(TransactionError::TruncatedPayload { .. })
        ));
    }

    #[test]
    fn test_embedded_record_overruns_block() {
        // Inner block length says 20 bytes, but the record inside claims 44.
        let mut bytes = vec![20, 0, 0, 0];
        bytes.extend_from_slice(&44u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 16]);
        assert!(matches!(
            AggregateBody::from_bytes(&bytes),
            Err(TransactionError::TruncatedPayload { .. })
        ));
    }

    #[test]
    fn test_embedded_size_below_header_rejected() {
        let mut bytes = vec![8, 0, 0, 0];
        bytes.extend_from_slice(&8u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 4]);
        assert!(matches!(
            AggregateBody::from_bytes(&bytes),
            Err(TransactionError::SerializationError(_))
        ));
    }

    #[test]
    fn test_ragged_cosignature_block() {
        let body = AggregateBody {
            inner_transactions: vec![embedded(0xA1, b"x")],
            cosignatures: vec![cosignature(0x11)],
        };
        let mut bytes = body.to_bytes();
        bytes.extend_from_slice(&[0u8; 17]);
        assert!(matches!(
            AggregateBody::from_bytes(&bytes),
            Err(TransactionError::MalformedCosignatureBlock { remainder: 17 })
        ));
    }

    #[test]
    fn test_too_short_for_length_field() {
        assert!(matches!(
            AggregateBody::from_bytes(&[0, 0]),
            Err(TransactionError::TruncatedPayload { needed: 4, got: 2 })
        ));
    }
}
