//! # Hashing Utilities
//!
//! Tempo transactions use Keccak-256 everywhere a digest is needed: the
//! sender and fee-payer signing hashes, the transaction hash returned by
//! `eth_sendRawTransaction`, and address derivation. The implementation is
//! `alloy_primitives::keccak256`; this module only adds the shapes callers
//! ask for.

pub use alloy_primitives::keccak256;

/// Keccak-256 rendered as `0x`-prefixed lowercase hex, the form JSON-RPC
/// nodes use for hashes.
pub fn keccak256_hex(data: &[u8]) -> String {
    format!("{:#x}", keccak256(data))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
