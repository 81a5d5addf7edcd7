//! Error type for transaction construction, encoding and signing.
//!
//! The set is closed and carries no payload: callers match on the variant
//! and inspect the transaction themselves when they need the exact cause.
//! The failing rule is logged at `debug` level where it is detected.

use thiserror::Error;

/// Errors returned by the builder, validator, codec and signing protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// Structural validation failed, or the encoded bytes are malformed.
    #[error("invalid transaction")]
    InvalidTransaction,

    /// The envelope does not start with the expected type byte.
    #[error("invalid transaction type")]
    InvalidTransactionType,

    /// The operation needs a sender signature and there is none.
    #[error("transaction has no signature")]
    NoSignature,

    /// The operation needs a fee payer signature and there is none.
    #[error("transaction has no fee payer signature")]
    NoFeePayerSignature,

    /// A fee payer tried to sign before the sender did.
    #[error("transaction must have sender signature before adding fee payer signature")]
    MissingSenderSignature,

    /// The signing capability rejected the key material.
    #[error("invalid private key")]
    InvalidPrivateKey,
}

impl From<alloy_rlp::Error> for TransactionError {
    fn from(err: alloy_rlp::Error) -> Self {
        tracing::debug!(error = %err, "rlp decode failed");
        Self::InvalidTransaction
    }
}
