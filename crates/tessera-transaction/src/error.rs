/// Error types for transaction codec and cosigning operations.
///
/// Decoding errors (`TruncatedPayload`, `MalformedCosignatureBlock`)
/// signal corrupt or adversarial input and are always surfaced, never
/// silently recovered. Nothing here is retried internally: every
/// operation is a deterministic pure function over its inputs.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Fewer bytes were present than the declared structure requires.
    #[error("truncated payload: need {needed} bytes, got {got}")]
    TruncatedPayload { needed: usize, got: usize },

    /// The trailing cosignature block is not a multiple of the fixed
    /// 96-byte record size.
    #[error("malformed cosignature block: {remainder} trailing bytes")]
    MalformedCosignatureBlock { remainder: usize },

    /// The payload structure is internally inconsistent (bad declared
    /// sizes, trailing data, unsupported parameters).
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// An underlying primitives error (forwarded from `tessera-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] tessera_primitives::PrimitivesError),
}
