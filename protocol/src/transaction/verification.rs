//! Structural validation of transactions.
//!
//! [`validate`] checks only what this library can check without chain
//! state: required fields are present and non-degenerate. Fee-market rules,
//! nonce ordering and the `valid_after` / `valid_before` window are
//! enforced by the network.

use alloy_primitives::U256;

use super::error::TransactionError;
use super::types::Transaction;

/// Validates a transaction's structure.
///
/// The checks, in order:
///
/// 1. **Chain id**: present and > 0.
/// 2. **Gas**: > 0.
/// 3. **Calls**: at least one.
/// 4. **Call values**: every call carries a value (zero is fine).
/// 5. **Nonce key**: present (zero is fine).
///
/// # Errors
///
/// [`TransactionError::InvalidTransaction`] for the first failing rule. The
/// rule itself is logged at `debug` level.
pub fn validate(tx: &Transaction) -> Result<(), TransactionError> {
    match tx.chain_id {
        Some(chain_id) if chain_id > U256::ZERO => {}
        _ => return Err(reject("chain id missing or zero")),
    }

    if tx.gas == 0 {
        return Err(reject("gas limit is zero"));
    }

    if tx.calls.is_empty() {
        return Err(reject("no calls"));
    }

    if let Some(index) = tx.calls.iter().position(|call| call.value.is_none()) {
        tracing::debug!(index, "call value missing");
        return Err(TransactionError::InvalidTransaction);
    }

    if tx.nonce_key.is_none() {
        return Err(reject("nonce key missing"));
    }

    Ok(())
}

fn reject(rule: &'static str) -> TransactionError {
    tracing::debug!(rule, "transaction failed validation");
    TransactionError::InvalidTransaction
}

impl Transaction {
    /// Convenience alias for [`validate`].
    pub fn validate(&self) -> Result<(), TransactionError> {
        validate(self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::types::Call;
    use alloy_primitives::{address, Address, Bytes};

    const TARGET: Address = address!("1234567890123456789012345678901234567890");

    fn call(value: Option<U256>) -> Call {
        Call {
            to: Some(TARGET),
            value,
            data: Bytes::new(),
        }
    }

    fn valid_tx() -> Transaction {
        Transaction {
            chain_id: Some(U256::from(42424u64)),
            max_priority_fee_per_gas: Some(U256::from(1_000_000_000u64)),
            max_fee_per_gas: Some(U256::from(2_000_000_000u64)),
            gas: 100_000,
            calls: vec![call(Some(U256::ZERO))],
            nonce_key: Some(U256::ZERO),
            nonce: 1,
            ..Transaction::default()
        }
    }

    #[test]
    fn validate_table() {
        let cases: Vec<(&str, Transaction, bool)> = vec![
            ("valid transaction", valid_tx(), true),
            (
                "missing chain id",
                Transaction {
                    chain_id: None,
                    ..valid_tx()
                },
                false,
            ),
            (
                "zero chain id",
                Transaction {
                    chain_id: Some(U256::ZERO),
                    ..valid_tx()
                },
                false,
            ),
            (
                "zero gas",
                Transaction {
                    gas: 0,
                    ..valid_tx()
                },
                false,
            ),
            (
                "no calls",
                Transaction {
                    calls: vec![],
                    ..valid_tx()
                },
                false,
            ),
            (
                "call with missing value",
                Transaction {
                    calls: vec![call(None)],
                    ..valid_tx()
                },
                false,
            ),
            (
                "missing nonce key",
                Transaction {
                    nonce_key: None,
                    ..valid_tx()
                },
                false,
            ),
            (
                "multiple calls",
                Transaction {
                    gas: 200_000,
                    calls: vec![call(Some(U256::from(100u64))), call(Some(U256::from(200u64)))],
                    nonce_key: Some(U256::from(1u64)),
                    ..valid_tx()
                },
                true,
            ),
        ];

        for (name, tx, ok) in cases {
            let result = validate(&tx);
            if ok {
                assert!(result.is_ok(), "{name}: expected success, got {result:?}");
            } else {
                assert_eq!(
                    result,
                    Err(TransactionError::InvalidTransaction),
                    "{name}: expected InvalidTransaction"
                );
            }
        }
    }

    #[test]
    fn second_call_missing_value_is_rejected() {
        let tx = Transaction {
            calls: vec![call(Some(U256::ZERO)), call(None)],
            ..valid_tx()
        };
        assert_eq!(tx.validate(), Err(TransactionError::InvalidTransaction));
    }

    #[test]
    fn missing_fee_fields_are_not_checked() {
        let tx = Transaction {
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            ..valid_tx()
        };
        assert!(validate(&tx).is_ok());
    }

    #[test]
    fn validity_window_is_not_checked() {
        // valid_after > valid_before is left to the network.
        let tx = Transaction {
            valid_after: 2_000,
            valid_before: 1_000,
            ..valid_tx()
        };
        assert!(validate(&tx).is_ok());
    }

    #[test]
    fn priority_fee_above_max_fee_is_not_checked() {
        let tx = Transaction {
            max_fee_per_gas: Some(U256::from(1u64)),
            max_priority_fee_per_gas: Some(U256::from(5u64)),
            ..valid_tx()
        };
        assert!(validate(&tx).is_ok());
    }
}
