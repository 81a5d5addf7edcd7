//! The seam between signed transactions and the network.
//!
//! The core never does I/O. Anything that can broadcast a raw envelope and
//! answer JSON-RPC queries implements [`Transport`]; the HTTP client in
//! `tempo-cli` is one such implementation, tests use in-memory ones.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::types::RpcError;
use crate::config::{METHOD_BLOCK_NUMBER, METHOD_GET_TRANSACTION_COUNT};
use crate::transaction::{serialize, Transaction, TransactionError};
use alloy_primitives::Address;

/// Errors surfaced by a [`Transport`].
#[derive(Debug, Error)]
pub enum RpcClientError {
    /// The request never produced an HTTP response (connect, timeout, TLS).
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    /// The node answered with a non-200 status.
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// The body was not the JSON we expected.
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),

    /// The node returned a JSON-RPC error object.
    #[error("{method}: {source}")]
    Rpc {
        method: String,
        #[source]
        source: RpcError,
    },

    /// The result had an unexpected shape.
    #[error("unexpected result for {method}: {result}")]
    UnexpectedResult { method: String, result: Value },

    /// The transaction could not be serialized.
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// Broadcasts raw transactions and answers JSON-RPC queries.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Broadcasts a `0x76…` hex envelope and returns the transaction hash.
    async fn submit(&self, raw_tx: &str) -> Result<String, RpcClientError>;

    /// Calls an arbitrary method and returns its `result`.
    async fn query(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcClientError>;
}

/// Serializes a signed transaction and hands it to `transport`.
///
/// # Errors
///
/// [`RpcClientError::Transaction`] with [`TransactionError::NoSignature`] if
/// the sender has not signed; otherwise whatever the transport reports.
pub async fn submit_transaction<T>(transport: &T, tx: &Transaction) -> Result<String, RpcClientError>
where
    T: Transport + ?Sized,
{
    let raw = serialize(tx)?;
    let hash = transport.submit(&raw).await?;
    tracing::info!(%hash, calls = tx.calls.len(), "transaction submitted");
    Ok(hash)
}

/// Fetches the pending nonce of `address` on the default nonce key.
pub async fn pending_nonce<T>(transport: &T, address: Address) -> Result<u64, RpcClientError>
where
    T: Transport + ?Sized,
{
    let result = transport
        .query(
            METHOD_GET_TRANSACTION_COUNT,
            vec![Value::String(address.to_string()), Value::String("pending".into())],
        )
        .await?;
    parse_quantity(METHOD_GET_TRANSACTION_COUNT, result)
}

/// Fetches the latest block number.
pub async fn block_number<T>(transport: &T) -> Result<u64, RpcClientError>
where
    T: Transport + ?Sized,
{
    let result = transport.query(METHOD_BLOCK_NUMBER, vec![]).await?;
    parse_quantity(METHOD_BLOCK_NUMBER, result)
}

/// Parses a JSON-RPC quantity (`"0x1a"`, prefix optional) into a `u64`.
pub fn parse_quantity(method: &str, result: Value) -> Result<u64, RpcClientError> {
    let parsed = result.as_str().and_then(|text| {
        let digits = text.strip_prefix("0x").unwrap_or(text);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u64::from_str_radix(digits, 16).ok()
    });
    parsed.ok_or_else(|| RpcClientError::UnexpectedResult {
        method: method.to_string(),
        result,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
