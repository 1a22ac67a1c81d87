/// Tessera Ledger SDK - Cryptographic primitives and utilities.
///
/// This crate provides the foundational building blocks for the Tessera SDK:
/// - Digest engine (SHA3-512 / Keccak-512 selectable by network epoch)
/// - WideInt two-word 64-bit unsigned integer (amounts, ids, deadlines)
/// - Edwards-curve signature scheme with a pluggable hash
/// - Shared-secret derivation for message encryption keys
/// - Little-endian byte reader/writer utilities

pub mod digest;
pub mod ec;
pub mod util;
pub mod wideint;

mod error;
pub use error::PrimitivesError;
