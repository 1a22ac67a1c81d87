/// Tessera Ledger SDK - Transaction envelope codec and signing flows.
///
/// This crate implements the binary transaction layer of the Tessera SDK:
/// - Fixed-layout envelope header with signing-byte and hash derivation
/// - Aggregate body codec (embedded transactions plus cosignatures)
/// - Cosigning protocol for multi-signer aggregate assembly
/// - Bottom-up merkle root computation over inner transaction hashes
///
/// Per-transaction-type body layouts are external: this crate treats every
/// body as opaque bytes except the aggregate container's own body.

pub mod aggregate;
pub mod cosign;
pub mod envelope;
pub mod merkle;

mod error;
pub use error::TransactionError;
