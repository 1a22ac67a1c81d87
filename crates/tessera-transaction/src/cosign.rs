//! Cosigning protocol for aggregate transaction assembly.
//!
//! The initiator signs the aggregate envelope and derives its transaction
//! hash; each cosigner then signs that 32-byte hash (not the payload).
//! Cosignature records are strictly appended to the payload and the
//! leading size field is rewritten to the new total length. Appending
//! with locally-held key pairs and appending pre-computed records
//! collected out-of-band produce byte-identical payloads.
//!
//! Every operation returns a new payload and leaves its input untouched;
//! a failed append leaves no partially-applied state.

use tessera_primitives::digest::DigestEngine;
use tessera_primitives::ec::{KeyPair, SignatureScheme};

use crate::aggregate::{Cosignature, COSIGNATURE_LEN};
use crate::envelope::{EnvelopeCodec, GenerationHash};
use crate::TransactionError;

/// Multi-signer assembly of aggregate transactions.
#[derive(Clone, Copy, Debug)]
pub struct CosigningProtocol {
    engine: DigestEngine,
}

impl CosigningProtocol {
    /// Create a protocol instance backed by the given digest engine.
    pub fn new(engine: DigestEngine) -> Self {
        CosigningProtocol { engine }
    }

    /// Return the digest engine backing this protocol instance.
    pub fn engine(&self) -> DigestEngine {
        self.engine
    }

    /// Sign an unsigned aggregate payload as the initiating account.
    ///
    /// # Arguments
    /// * `payload` - Serialized unsigned aggregate envelope bytes.
    /// * `key_pair` - The initiator's key pair.
    /// * `generation_hash` - The per-network constant.
    ///
    /// # Returns
    /// `Ok((signed_payload, transaction_hash))`. The hash is what each
    /// cosigner signs.
    pub fn sign_as_initiator(
        &self,
        payload: &[u8],
        key_pair: &KeyPair,
        generation_hash: &GenerationHash,
    ) -> Result<(Vec<u8>, [u8; 32]), TransactionError> {
        let codec = EnvelopeCodec::new(self.engine);
        let signed = codec.sign(payload, key_pair, generation_hash)?;
        let hash = codec.transaction_hash(&signed, generation_hash)?;
        Ok((signed, hash))
    }

    /// Append cosignatures produced with locally-held key pairs.
    ///
    /// Each cosigner signs the parent transaction hash; the resulting
    /// `(public key, signature)` records are appended in order and the
    /// size field rewritten. Calls with disjoint cosigner sets compose:
    /// each call strictly appends to its input.
    ///
    /// # Arguments
    /// * `payload` - Signed aggregate payload bytes.
    /// * `transaction_hash` - The parent transaction hash.
    /// * `cosigners` - Key pairs of the local cosigners.
    ///
    /// # Returns
    /// `Ok(Vec<u8>)` with the extended payload.
    pub fn add_local_cosigners(
        &self,
        payload: &[u8],
        transaction_hash: &[u8; 32],
        cosigners: &[KeyPair],
    ) -> Result<Vec<u8>, TransactionError> {
        let scheme = SignatureScheme::new(self.engine);
        let mut cosignatures = Vec::with_capacity(cosigners.len());
        for key_pair in cosigners {
            let signature = scheme.sign(key_pair, transaction_hash)?;
            cosignatures.push(Cosignature {
                signer_public_key: *key_pair.public_key(),
                signature,
            });
        }
        self.add_remote_cosignatures(payload, &cosignatures)
    }

    /// Append pre-computed cosignature records.
    ///
    /// Byte-identical to `add_local_cosigners` given equivalent inputs;
    /// used when cosignatures are collected out-of-band.
    ///
    /// # Arguments
    /// * `payload` - Signed aggregate payload bytes.
    /// * `cosignatures` - The records to append, in order.
    ///
    /// # Returns
    /// `Ok(Vec<u8>)` with the extended payload and rewritten size field.
    pub fn add_remote_cosignatures(
        &self,
        payload: &[u8],
        cosignatures: &[Cosignature],
    ) -> Result<Vec<u8>, TransactionError> {
        if payload.len() < 4 {
            return Err(TransactionError::TruncatedPayload {
                needed: 4,
                got: payload.len(),
            });
        }

        let mut extended =
            Vec::with_capacity(payload.len() + cosignatures.len() * COSIGNATURE_LEN);
        extended.extend_from_slice(payload);
        for cosignature in cosignatures {
            extended.extend_from_slice(&cosignature.to_bytes());
        }

        // Rewrite the leading size field to the new total length.
        let new_size = extended.len() as u32;
        extended[..4].copy_from_slice(&new_size.to_le_bytes());
        Ok(extended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregateBody;
    use crate::envelope::TransactionEnvelope;
    use tessera_primitives::digest::DigestMode;
    use tessera_primitives::wideint::WideInt;

    const AGGREGATE_TYPE: u16 = 0x4141;

    fn protocol() -> CosigningProtocol {
        CosigningProtocol::new(DigestEngine::new(DigestMode::Sha3))
    }

    fn generation_hash() -> GenerationHash {
        GenerationHash::new([0xD4; 32])
    }

    fn key_pair(tag: u8) -> KeyPair {
        KeyPair::from_seed(&[tag; 32], protocol().engine()).unwrap()
    }

    fn unsigned_aggregate() -> Vec<u8> {
        let inner = crate::aggregate::EmbeddedTransaction {
            signer_public_key: *key_pair(0x10).public_key(),
            version: 1,
            network: 0x78,
            transaction_type: 0x4154,
            body: b"inner transfer".to_vec(),
        };
        let body = AggregateBody {
            inner_transactions: vec![inner],
            cosignatures: vec![],
        };
        TransactionEnvelope::new(
            1,
            0x78,
            AGGREGATE_TYPE,
            WideInt::from_u64(500),
            WideInt::from_u64(99_999),
            body.to_bytes(),
        )
        .to_bytes()
    }

    #[test]
    fn test_initiator_sign_produces_verifiable_payload() {
        let (signed, hash) = protocol()
            .sign_as_initiator(&unsigned_aggregate(), &key_pair(0x01), &generation_hash())
            .unwrap();

        let codec = EnvelopeCodec::new(protocol().engine());
        assert_eq!(
            codec.transaction_hash(&signed, &generation_hash()).unwrap(),
            hash
        );
        // Decodes as a well-formed envelope with the signer filled in.
        let envelope = TransactionEnvelope::from_bytes(&signed).unwrap();
        assert_eq!(&envelope.signer_public_key, key_pair(0x01).public_key());
    }

    #[test]
    fn test_local_and_remote_paths_are_byte_identical() {
        let (signed, hash) = protocol()
            .sign_as_initiator(&unsigned_aggregate(), &key_pair(0x01), &generation_hash())
            .unwrap();

        let cosigners = [key_pair(0x02), key_pair(0x03)];
        let local = protocol()
            .add_local_cosigners(&signed, &hash, &cosigners)
            .unwrap();

        let scheme = SignatureScheme::new(protocol().engine());
        let records: Vec<Cosignature> = cosigners
            .iter()
            .map(|kp| Cosignature {
                signer_public_key: *kp.public_key(),
                signature: scheme.sign(kp, &hash).unwrap(),
            })
            .collect();
        let remote = protocol()
            .add_remote_cosignatures(&signed, &records)
            .unwrap();

        assert_eq!(local, remote);
    }

    #[test]
    fn test_size_field_rewrite() {
        let (signed, hash) = protocol()
            .sign_as_initiator(&unsigned_aggregate(), &key_pair(0x01), &generation_hash())
            .unwrap();
        let original_size = signed.len();

        let extended = protocol()
            .add_local_cosigners(&signed, &hash, &[key_pair(0x02), key_pair(0x03)])
            .unwrap();

        assert_eq!(extended.len(), original_size + 2 * COSIGNATURE_LEN);
        let declared = u32::from_le_bytes([extended[0], extended[1], extended[2], extended[3]]);
        assert_eq!(declared as usize, extended.len());
        // Input payload untouched.
        assert_eq!(signed.len(), original_size);
    }

    #[test]
    fn test_appends_compose_across_calls() {
        let (signed, hash) = protocol()
            .sign_as_initiator(&unsigned_aggregate(), &key_pair(0x01), &generation_hash())
            .unwrap();

        let first = protocol()
            .add_local_cosigners(&signed, &hash, &[key_pair(0x02)])
            .unwrap();
        let second = protocol()
            .add_local_cosigners(&first, &hash, &[key_pair(0x03)])
            .unwrap();
        let both = protocol()
            .add_local_cosigners(&signed, &hash, &[key_pair(0x02), key_pair(0x03)])
            .unwrap();
        assert_eq!(second, both);
    }

    #[test]
    fn test_cosignatures_verify_against_hash_and_roundtrip() {
        let (signed, hash) = protocol()
            .sign_as_initiator(&unsigned_aggregate(), &key_pair(0x01), &generation_hash())
            .unwrap();
        let extended = protocol()
            .add_local_cosigners(&signed, &hash, &[key_pair(0x02)])
            .unwrap();

        let envelope = TransactionEnvelope::from_bytes(&extended).unwrap();
        let body = AggregateBody::from_bytes(&envelope.body).unwrap();
        assert_eq!(body.cosignatures.len(), 1);
        assert_eq!(body.inner_transactions.len(), 1);

        let scheme = SignatureScheme::new(protocol().engine());
        let record = &body.cosignatures[0];
        assert!(scheme.verify(&record.signer_public_key, &hash, &record.signature));
    }

    #[test]
    fn test_append_to_truncated_payload_rejected() {
        assert!(matches!(
            protocol().add_remote_cosignatures(&[0u8; 3], &[]),
            Err(TransactionError::TruncatedPayload { needed: 4, got: 3 })
        ));
    }
}
