//! Sender and fee-payer signing.
//!
//! Signing is separate from building because the key may not be available
//! at construction time (hardware wallet, remote signer, sponsor service).
//! Both signatures are secp256k1 over Keccak-256 digests of the codec
//! output:
//!
//! - the **sender** signs [`signing_hash`], the encoding with *both*
//!   signatures stripped;
//! - the **fee payer** signs [`fee_payer_signing_hash`], the encoding with
//!   the sender signature in place, so a sponsor commits to exactly the
//!   payload the sender authorised.
//!
//! The lifecycle is `Unsigned -> SenderSigned -> DualSigned`. The sender may
//! re-sign at any point; nothing removes a signature.

use alloy_primitives::{Address, B256};

use super::codec::{decode, encode};
use super::error::TransactionError;
use super::types::Transaction;
use crate::crypto::hash::keccak256;
use crate::crypto::keys::{recover_signer, HashSigner, LocalSigner};

// ---------------------------------------------------------------------------
// Hashes
// ---------------------------------------------------------------------------

/// The digest the sender signs: Keccak-256 of the envelope with both
/// signatures absent.
pub fn signing_hash(tx: &Transaction) -> B256 {
    keccak256(encode(&tx.unsigned()))
}

/// The digest the fee payer signs: Keccak-256 of the envelope with the
/// sender signature kept and the fee-payer signature absent.
pub fn fee_payer_signing_hash(tx: &Transaction) -> B256 {
    let payload = Transaction {
        fee_payer_signature: None,
        ..tx.clone()
    };
    keccak256(encode(&payload))
}

/// The transaction hash: Keccak-256 of the full envelope as broadcast.
/// This is what a node returns from `eth_sendRawTransaction`.
pub fn transaction_hash(tx: &Transaction) -> B256 {
    keccak256(encode(tx))
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Signs a transaction in place as the sender.
///
/// Overwrites any previous sender signature. A fee-payer signature already
/// attached is left alone; it no longer matches and must be re-requested.
///
/// # Errors
///
/// [`TransactionError::InvalidPrivateKey`] if the signer cannot sign.
///
/// # Example
///
/// ```
/// use alloy_primitives::{address, U256};
/// use tempo_protocol::crypto::LocalSigner;
/// use tempo_protocol::transaction::{sign_transaction, TransactionBuilder};
///
/// let signer = LocalSigner::random();
/// let mut tx = TransactionBuilder::new(U256::from(42424u64))
///     .gas(100_000)
///     .add_call(address!("1234567890123456789012345678901234567890"), None, None)
///     .build();
///
/// sign_transaction(&mut tx, &signer).unwrap();
/// assert!(tx.is_signed());
/// ```
pub fn sign_transaction(
    tx: &mut Transaction,
    signer: &impl HashSigner,
) -> Result<(), TransactionError> {
    let hash = signing_hash(tx);
    let signature = signer.sign_hash(&hash)?;
    tracing::debug!(sender = %signer.address(), %hash, "transaction signed");
    tx.signature = Some(signature);
    Ok(())
}

/// Parses a hex private key (optional `0x`) and signs as the sender.
///
/// # Errors
///
/// [`TransactionError::InvalidPrivateKey`] if the key does not parse.
pub fn sign_transaction_with_key(
    tx: &mut Transaction,
    private_key_hex: &str,
) -> Result<(), TransactionError> {
    let signer = LocalSigner::from_hex(private_key_hex)?;
    sign_transaction(tx, &signer)
}

/// Attaches a fee-payer (sponsor) signature.
///
/// The sender must have signed first; the sender signature is not modified.
///
/// # Errors
///
/// - [`TransactionError::MissingSenderSignature`] if the sender has not
///   signed.
/// - [`TransactionError::InvalidPrivateKey`] if the signer cannot sign.
pub fn add_fee_payer_signature(
    tx: &mut Transaction,
    fee_payer: &impl HashSigner,
) -> Result<(), TransactionError> {
    if !tx.is_signed() {
        return Err(TransactionError::MissingSenderSignature);
    }
    let hash = fee_payer_signing_hash(tx);
    let signature = fee_payer.sign_hash(&hash)?;
    tracing::debug!(fee_payer = %fee_payer.address(), %hash, "fee payer signature attached");
    tx.fee_payer_signature = Some(signature);
    Ok(())
}

/// Checks that a fee payer has signed.
///
/// # Errors
///
/// [`TransactionError::NoFeePayerSignature`] if it has not.
pub fn require_fee_payer_signature(tx: &Transaction) -> Result<(), TransactionError> {
    if tx.has_fee_payer_signature() {
        Ok(())
    } else {
        Err(TransactionError::NoFeePayerSignature)
    }
}

// ---------------------------------------------------------------------------
// Raw hex
// ---------------------------------------------------------------------------

/// Encodes a signed transaction as `0x`-prefixed lowercase hex, ready for
/// `eth_sendRawTransaction`. A fee-payer signature is optional.
///
/// # Errors
///
/// [`TransactionError::NoSignature`] if the sender has not signed.
pub fn serialize(tx: &Transaction) -> Result<String, TransactionError> {
    if !tx.is_signed() {
        return Err(TransactionError::NoSignature);
    }
    Ok(format!("0x{}", hex::encode(encode(tx))))
}

/// Parses a raw transaction from hex, with or without the `0x` prefix.
///
/// # Errors
///
/// - [`TransactionError::InvalidTransaction`] for bad hex or a malformed
///   body.
/// - [`TransactionError::InvalidTransactionType`] if the type byte is not
///   `0x76`.
pub fn deserialize(raw: &str) -> Result<Transaction, TransactionError> {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = hex::decode(stripped).map_err(|err| {
        tracing::debug!(error = %err, "raw transaction is not valid hex");
        TransactionError::InvalidTransaction
    })?;
    decode(&bytes)
}

// ---------------------------------------------------------------------------
// Recovery
// ---------------------------------------------------------------------------

/// Recovers the sender address from the sender signature.
///
/// # Errors
///
/// - [`TransactionError::NoSignature`] if unsigned.
/// - [`TransactionError::InvalidTransaction`] if the signature does not
///   recover.
pub fn recover_sender(tx: &Transaction) -> Result<Address, TransactionError> {
    let signature = tx.signature.as_ref().ok_or(TransactionError::NoSignature)?;
    recover_signer(signature, &signing_hash(tx))
}

/// Recovers the fee payer address from the fee-payer signature.
///
/// # Errors
///
/// - [`TransactionError::NoFeePayerSignature`] if there is none.
/// - [`TransactionError::InvalidTransaction`] if the signature does not
///   recover.
pub fn recover_fee_payer(tx: &Transaction) -> Result<Address, TransactionError> {
    let signature = tx
        .fee_payer_signature
        .as_ref()
        .ok_or(TransactionError::NoFeePayerSignature)?;
    recover_signer(signature, &fee_payer_signing_hash(tx))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
