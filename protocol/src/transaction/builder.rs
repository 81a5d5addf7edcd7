//! Transaction construction via the builder pattern.
//!
//! [`TransactionBuilder`] accumulates fields in any order without validating
//! them, then hands back a [`Transaction`]. Validation is opt-in through
//! [`TransactionBuilder::build_and_validate`]. The builder does not sign;
//! that happens in [`super::signing`], so construction stays testable
//! without key material.

use alloy_primitives::{Address, Bytes, B256, U256};

use super::error::TransactionError;
use super::types::{AccessTuple, Call, Transaction};
use super::verification::validate;
use crate::config::DEFAULT_NONCE_KEY;

/// Fluent builder for unsigned [`Transaction`] instances.
///
/// Each setter consumes the builder and returns it, so a builder is owned by
/// exactly one caller at a time. Setting the same field twice keeps the last
/// value.
///
/// # Usage
///
/// ```
/// use alloy_primitives::{address, Bytes, U256};
/// use tempo_protocol::config::ALPHA_USD_ADDRESS;
/// use tempo_protocol::transaction::TransactionBuilder;
///
/// let tx = TransactionBuilder::new(U256::from(42424u64))
///     .gas(100_000)
///     .add_call(
///         address!("1234567890123456789012345678901234567890"),
///         Some(U256::from(500u64)),
///         Some(Bytes::from(vec![0xaa, 0xbb])),
///     )
///     .fee_token(ALPHA_USD_ADDRESS)
///     .build();
///
/// assert_eq!(tx.calls.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    tx: Transaction,
}

impl TransactionBuilder {
    /// Creates a new builder for the given chain.
    ///
    /// Defaults:
    /// - `max_fee_per_gas`, `max_priority_fee_per_gas`: 0
    /// - `nonce_key`: [`DEFAULT_NONCE_KEY`]
    /// - everything else: zero / empty / unsigned
    pub fn new(chain_id: U256) -> Self {
        Self {
            tx: Transaction {
                chain_id: Some(chain_id),
                max_priority_fee_per_gas: Some(U256::ZERO),
                max_fee_per_gas: Some(U256::ZERO),
                nonce_key: Some(DEFAULT_NONCE_KEY),
                ..Transaction::default()
            },
        }
    }

    /// Sets the gas limit.
    pub fn gas(mut self, gas: u64) -> Self {
        self.tx.gas = gas;
        self
    }

    /// Sets the maximum fee per gas.
    pub fn max_fee_per_gas(mut self, max_fee: U256) -> Self {
        self.tx.max_fee_per_gas = Some(max_fee);
        self
    }

    /// Sets the maximum priority fee (tip) per gas.
    pub fn max_priority_fee_per_gas(mut self, max_priority_fee: U256) -> Self {
        self.tx.max_priority_fee_per_gas = Some(max_priority_fee);
        self
    }

    /// Sets the nonce within the selected sequence.
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.tx.nonce = nonce;
        self
    }

    /// Selects the nonce sequence (2D nonce key).
    pub fn nonce_key(mut self, nonce_key: U256) -> Self {
        self.tx.nonce_key = Some(nonce_key);
        self
    }

    /// Sets the expiration timestamp (Unix seconds).
    pub fn valid_before(mut self, valid_before: u64) -> Self {
        self.tx.valid_before = valid_before;
        self
    }

    /// Sets the activation timestamp (Unix seconds).
    pub fn valid_after(mut self, valid_after: u64) -> Self {
        self.tx.valid_after = valid_after;
        self
    }

    /// Sets the token used to pay gas fees.
    pub fn fee_token(mut self, token: Address) -> Self {
        self.tx.fee_token = token;
        self
    }

    /// Appends a call to `to`. A missing value becomes zero and missing data
    /// becomes empty calldata.
    pub fn add_call(mut self, to: Address, value: Option<U256>, data: Option<Bytes>) -> Self {
        self.tx.calls.push(Call {
            to: Some(to),
            value: Some(value.unwrap_or(U256::ZERO)),
            data: data.unwrap_or_default(),
        });
        self
    }

    /// Appends a contract creation call with `data` as init code. Same
    /// defaulting rules as [`add_call`](Self::add_call).
    pub fn add_contract_creation(mut self, value: Option<U256>, data: Option<Bytes>) -> Self {
        self.tx.calls.push(Call {
            to: None,
            value: Some(value.unwrap_or(U256::ZERO)),
            data: data.unwrap_or_default(),
        });
        self
    }

    /// Appends an access list entry. Storage keys are stored as given.
    pub fn add_access_list_entry(mut self, address: Address, storage_keys: Vec<B256>) -> Self {
        self.tx.access_list.push(AccessTuple {
            address,
            storage_keys,
        });
        self
    }

    /// Consumes the builder and returns the transaction without validating it.
    pub fn build(self) -> Transaction {
        self.tx
    }

    /// Consumes the builder and returns the transaction if it passes
    /// [`validate`].
    ///
    /// # Errors
    ///
    /// [`TransactionError::InvalidTransaction`] if any structural rule fails.
    pub fn build_and_validate(self) -> Result<Transaction, TransactionError> {
        validate(&self.tx)?;
        Ok(self.tx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
