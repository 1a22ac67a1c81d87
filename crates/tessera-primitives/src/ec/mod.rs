/// Elliptic curve cryptography on the twisted Edwards curve.
///
/// Provides key pairs, 64-byte signatures, and the pluggable-hash
/// signature scheme (sign, verify, shared-secret derivation) used by
/// every Tessera network epoch.

pub mod key_pair;
pub mod scheme;
pub mod signature;

pub use key_pair::{KeyPair, PublicKey};
pub use scheme::SignatureScheme;
pub use signature::Signature;
