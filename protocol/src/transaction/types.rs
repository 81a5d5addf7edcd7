//! Core type definitions for Tempo transactions.
//!
//! These are plain data. Invariants are enforced by
//! [`super::verification::validate`], not by the types themselves, so a
//! transaction may sit in an invalid state while it is being assembled.
//!
//! Big integers that can legitimately be absent are `Option<U256>`: an absent
//! value and a zero value are different states and encode differently.

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{NATIVE_FEE_TOKEN, SIGNATURE_LENGTH, WORD_LENGTH};

// ---------------------------------------------------------------------------
// Call
// ---------------------------------------------------------------------------

/// One unit of execution inside a batched transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    /// Call target. `None` deploys `data` as contract init code.
    pub to: Option<Address>,
    /// Amount of native value attached to the call. Required by validation.
    pub value: Option<U256>,
    /// Calldata or init code.
    pub data: Bytes,
}

impl Call {
    /// Returns `true` if this call creates a contract.
    pub fn is_create(&self) -> bool {
        self.to.is_none()
    }
}

// ---------------------------------------------------------------------------
// AccessTuple
// ---------------------------------------------------------------------------

/// An access list entry: an address plus the storage slots the transaction
/// expects to touch. Order is preserved and duplicates are kept as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTuple {
    pub address: Address,
    pub storage_keys: Vec<B256>,
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A secp256k1 ECDSA signature in `(r, s, y_parity)` form.
///
/// Only produced by the signing protocol; see
/// [`super::signing::sign_transaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    /// Big-endian `r` scalar.
    pub r: B256,
    /// Big-endian `s` scalar (low-s normalised by the local signer).
    pub s: B256,
    /// Recovery bit: `true` when the ephemeral point's `y` is odd.
    pub y_parity: bool,
}

impl Signature {
    pub fn new(r: B256, s: B256, y_parity: bool) -> Self {
        Self { r, s, y_parity }
    }

    /// Returns the 65-byte `r || s || v` form with `v` in `{0, 1}`.
    pub fn as_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..WORD_LENGTH].copy_from_slice(self.r.as_slice());
        out[WORD_LENGTH..2 * WORD_LENGTH].copy_from_slice(self.s.as_slice());
        out[2 * WORD_LENGTH] = self.y_parity as u8;
        out
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.as_bytes()))
    }
}

// ---------------------------------------------------------------------------
// SignatureState
// ---------------------------------------------------------------------------

/// Where a transaction sits in its signing lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureState {
    /// No signature attached yet.
    Unsigned,
    /// The sender has signed; no sponsor.
    SenderSigned,
    /// Both the sender and the fee payer have signed.
    DualSigned,
}

impl fmt::Display for SignatureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned => write!(f, "Unsigned"),
            Self::SenderSigned => write!(f, "SenderSigned"),
            Self::DualSigned => write!(f, "DualSigned"),
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A Tempo type-0x76 account-abstraction transaction.
///
/// A transaction batches one or more [`Call`]s under a single signature,
/// orders itself on a 2D nonce (`nonce_key`, `nonce`), can pay gas in an
/// ERC-20 fee token, and can carry a second signature from a fee payer
/// who sponsors the gas.
///
/// Use [`super::TransactionBuilder`] to assemble one; the struct fields are
/// public so tests and decoders can construct arbitrary (even invalid)
/// states.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// EIP-155 replay protection domain. Must be present and non-zero.
    pub chain_id: Option<U256>,

    /// Position within the sequence selected by `nonce_key`.
    pub nonce: u64,

    /// Selects one of many parallel nonce sequences for the sender.
    /// Transactions on different keys are unordered relative to each other.
    pub nonce_key: Option<U256>,

    /// Gas limit. Must be non-zero.
    pub gas: u64,

    /// EIP-1559 fee cap per unit of gas.
    pub max_fee_per_gas: Option<U256>,

    /// EIP-1559 tip per unit of gas.
    pub max_priority_fee_per_gas: Option<U256>,

    /// Unix timestamp before which the transaction is not executable.
    pub valid_after: u64,

    /// Unix timestamp from which the transaction is expired.
    pub valid_before: u64,

    /// Token used to pay fees. [`NATIVE_FEE_TOKEN`] means the native token.
    pub fee_token: Address,

    /// Batched calls, executed in order.
    pub calls: Vec<Call>,

    /// Storage access hints.
    pub access_list: Vec<AccessTuple>,

    /// Sender signature. `None` until signed.
    pub signature: Option<Signature>,

    /// Sponsor signature, only attached after the sender signed.
    pub fee_payer_signature: Option<Signature>,
}

impl Transaction {
    /// Creates an empty transaction with every optional field absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the sender signature is attached.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Returns `true` if a fee payer signature is attached.
    pub fn has_fee_payer_signature(&self) -> bool {
        self.fee_payer_signature.is_some()
    }

    /// Returns `true` if fees are paid in the native token.
    pub fn pays_native_fees(&self) -> bool {
        self.fee_token == NATIVE_FEE_TOKEN
    }

    /// Returns `true` if any call deploys a contract.
    pub fn is_contract_creation(&self) -> bool {
        self.calls.iter().any(Call::is_create)
    }

    /// Reports the signing lifecycle state.
    ///
    /// A fee payer signature without a sender signature cannot be produced by
    /// the signing protocol; such a hand-built state reports `Unsigned`.
    pub fn signature_state(&self) -> SignatureState {
        match (&self.signature, &self.fee_payer_signature) {
            (None, _) => SignatureState::Unsigned,
            (Some(_), None) => SignatureState::SenderSigned,
            (Some(_), Some(_)) => SignatureState::DualSigned,
        }
    }

    /// Returns a copy with both signatures stripped.
    pub(crate) fn unsigned(&self) -> Self {
        Self {
            signature: None,
            fee_payer_signature: None,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
