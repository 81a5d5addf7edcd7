//! # Key Management
//!
//! secp256k1 signing for Tempo transactions.
//!
//! The signing protocol only needs two things from a key: sign a 32-byte
//! digest into `(r, s, y_parity)`, and name the address it signs for. That
//! capability is the [`HashSigner`] trait; [`LocalSigner`] implements it
//! with an in-memory key. Remote signers (HSMs, fee-payer services) plug
//! in behind the same trait.
//!
//! ## Security considerations
//!
//! - Signatures are RFC 6979 deterministic and low-s normalised (k256).
//! - Key bytes are never logged and `Debug` only prints the address.

use alloy_primitives::{Address, B256};
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use k256::FieldBytes;
use rand::rngs::OsRng;

use crate::config::PRIVATE_KEY_LENGTH;
use crate::transaction::error::TransactionError;
use crate::transaction::types::Signature;
use std::fmt;

/// Something that can sign a prehashed 32-byte digest.
pub trait HashSigner {
    /// The address whose key produces the signatures.
    fn address(&self) -> Address;

    /// Signs `hash` and returns the recoverable signature.
    ///
    /// # Errors
    ///
    /// [`TransactionError::InvalidPrivateKey`] if the key cannot sign.
    fn sign_hash(&self, hash: &B256) -> Result<Signature, TransactionError>;
}

/// An in-memory secp256k1 key.
///
/// `LocalSigner` intentionally does not implement `Serialize`: exporting a
/// private key should be an explicit call to [`LocalSigner::to_bytes`].
///
/// # Examples
///
/// ```
/// use alloy_primitives::B256;
/// use tempo_protocol::crypto::keys::{recover_signer, HashSigner, LocalSigner};
///
/// let signer = LocalSigner::random();
/// let hash = B256::repeat_byte(0x42);
/// let signature = signer.sign_hash(&hash).unwrap();
/// assert_eq!(recover_signer(&signature, &hash).unwrap(), signer.address());
/// ```
#[derive(Clone)]
pub struct LocalSigner {
    signing_key: SigningKey,
    address: Address,
}

impl LocalSigner {
    /// Generates a fresh key from the OS RNG.
    pub fn random() -> Self {
        Self::from_signing_key(SigningKey::random(&mut OsRng))
    }

    /// Wraps an existing k256 signing key.
    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = Address::from_public_key(signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    /// Builds a signer from a 32-byte big-endian scalar.
    ///
    /// # Errors
    ///
    /// [`TransactionError::InvalidPrivateKey`] if the slice is not 32 bytes
    /// or the scalar is zero or not below the curve order.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TransactionError> {
        if bytes.len() != PRIVATE_KEY_LENGTH {
            return Err(TransactionError::InvalidPrivateKey);
        }
        let signing_key =
            SigningKey::from_slice(bytes).map_err(|_| TransactionError::InvalidPrivateKey)?;
        Ok(Self::from_signing_key(signing_key))
    }

    /// Builds a signer from a hex-encoded key, with or without `0x`.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let trimmed = hex_str.trim();
        let stripped = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let bytes = hex::decode(stripped).map_err(|_| TransactionError::InvalidPrivateKey)?;
        Self::from_slice(&bytes)
    }

    /// The Ethereum address derived from the public key.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The public half of the key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Exports the raw 32-byte secret scalar. Handle with care.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        let mut out = [0u8; PRIVATE_KEY_LENGTH];
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }
}

impl HashSigner for LocalSigner {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_hash(&self, hash: &B256) -> Result<Signature, TransactionError> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(hash.as_slice())
            .map_err(|err| {
                tracing::debug!(error = %err, "secp256k1 signing failed");
                TransactionError::InvalidPrivateKey
            })?;

        let (r, s) = signature.split_bytes();
        Ok(Signature::new(
            B256::from_slice(&r),
            B256::from_slice(&s),
            recovery_id.is_y_odd(),
        ))
    }
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Derives the address of a hex-encoded private key.
pub fn derive_address(private_key_hex: &str) -> Result<Address, TransactionError> {
    LocalSigner::from_hex(private_key_hex).map(|signer| signer.address())
}

/// Recovers the address that produced `signature` over `hash`.
///
/// # Errors
///
/// [`TransactionError::InvalidTransaction`] if `r` / `s` are not valid
/// scalars or no public key recovers from them.
pub fn recover_signer(signature: &Signature, hash: &B256) -> Result<Address, TransactionError> {
    let ecdsa = EcdsaSignature::from_scalars(
        FieldBytes::from(signature.r.0),
        FieldBytes::from(signature.s.0),
    )
    .map_err(|_| TransactionError::InvalidTransaction)?;
    let recovery_id = RecoveryId::new(signature.y_parity, false);

    let key = VerifyingKey::recover_from_prehash(hash.as_slice(), &ecdsa, recovery_id)
        .map_err(|err| {
            tracing::debug!(error = %err, "signature recovery failed");
            TransactionError::InvalidTransaction
        })?;
    Ok(Address::from_public_key(&key))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
