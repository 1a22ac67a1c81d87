/// Unified error type for all primitives operations.
///
/// Covers format errors from key, signature, and WideInt construction,
/// plus the defensive non-canonical-scalar check in signing. Cryptographic
/// rejection during verification never surfaces here: `verify` is a pure
/// predicate and returns `false` instead.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid decimal string: {0}")]
    InvalidDecimal(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("signing produced a non-canonical scalar")]
    NonCanonicalSignature,

    #[error("unexpected end of data")]
    UnexpectedEof,
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
