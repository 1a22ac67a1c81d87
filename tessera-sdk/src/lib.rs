#![deny(missing_docs)]

//! Tessera Ledger SDK - Complete SDK.
//!
//! Re-exports all Tessera SDK components for convenient single-crate usage.

pub use tessera_primitives as primitives;
pub use tessera_transaction as transaction;
