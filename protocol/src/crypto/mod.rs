//! # Cryptographic Primitives for Tempo
//!
//! Everything signing- and hashing-related flows through here:
//!
//! - **secp256k1 ECDSA** (k256) for sender and fee-payer signatures.
//! - **Keccak-256** (alloy-primitives) for signing hashes and transaction ids.
//!
//! Nothing here is hand-rolled; these are thin, typed wrappers around audited
//! implementations.

pub mod hash;
pub mod keys;

pub use hash::{keccak256, keccak256_hex};
pub use keys::{derive_address, recover_signer, HashSigner, LocalSigner};
