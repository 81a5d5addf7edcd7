//! # JSON-RPC Message Types
//!
//! JSON-RPC 2.0 request/response envelopes as spoken by Tempo nodes and
//! fee-payer services. Methods are plain strings (`eth_*`); the names this
//! crate uses live in [`crate::config`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::JSONRPC_VERSION;
use crate::transaction::TransactionError;

// ---------------------------------------------------------------------------
// Error codes
// ---------------------------------------------------------------------------

/// Invalid JSON was received.
pub const PARSE_ERROR: i32 = -32700;
/// The JSON sent is not a valid request object.
pub const INVALID_REQUEST: i32 = -32600;
/// The method does not exist.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid method parameters.
pub const INVALID_PARAMS: i32 = -32602;
/// Internal JSON-RPC error.
pub const INTERNAL_ERROR: i32 = -32603;
/// A fee-payer service was handed something other than a type-0x76 envelope.
pub const INVALID_TRANSACTION_TYPE: i32 = -32000;

// ---------------------------------------------------------------------------
// RPC Request / Response
// ---------------------------------------------------------------------------

/// A JSON-RPC 2.0 request.
///
/// `params` is always a positional array, which is what every `eth_*` method
/// takes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version. Always "2.0".
    pub jsonrpc: String,
    /// Request identifier. Echoed back in the response.
    pub id: Value,
    /// The method to invoke.
    pub method: String,
    /// Positional parameters.
    #[serde(default)]
    pub params: Vec<Value>,
}

impl RpcRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 response.
///
/// Exactly one of `result` or `error` is set by a conforming node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    /// JSON-RPC version. Always "2.0".
    pub jsonrpc: String,
    /// The request ID this response corresponds to.
    pub id: Value,
    /// The successful result, if the method completed without error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// The error, if the method failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    /// Creates a successful response.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Creates an error response.
    pub fn error(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Returns the error if the node reported one.
    pub fn check_error(&self) -> Result<(), RpcError> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Splits the response into its result or its error. A response with
    /// neither yields `Value::Null`.
    pub fn into_result(self) -> Result<Value, RpcError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

// ---------------------------------------------------------------------------
// RPC Errors
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 error object.
///
/// Standard codes are the `-327xx` / `-326xx` constants above; `-32000` is
/// the fee-payer "invalid transaction type" code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("RPC error {code}: {message}")]
pub struct RpcError {
    /// Numeric error code.
    pub code: i32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional error data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attaches extra data to the error.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// JSON parse error.
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(PARSE_ERROR, msg)
    }

    /// Invalid JSON-RPC request structure.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(INVALID_REQUEST, msg)
    }

    /// The requested method does not exist.
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("method not found: {}", method.into()))
    }

    /// Invalid method parameters.
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, msg)
    }

    /// Internal server error.
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, msg)
    }

    /// The submitted envelope is not a type-0x76 transaction.
    pub fn invalid_transaction_type(msg: impl Into<String>) -> Self {
        Self::new(INVALID_TRANSACTION_TYPE, msg)
    }
}

/// How a fee-payer service reports a raw transaction it could not accept.
impl From<TransactionError> for RpcError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::InvalidTransactionType => Self::invalid_transaction_type(err.to_string()),
            other => Self::invalid_params(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

/// A batch of requests sent in one HTTP round trip.
///
/// Ids are assigned incrementally from 1 in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    requests: Vec<RpcRequest>,
    next_id: u64,
}

impl BatchRequest {
    pub fn new() -> Self {
        Self {
            requests: Vec::new(),
            next_id: 1,
        }
    }

    /// Appends a request and assigns it the next id.
    pub fn add(&mut self, method: impl Into<String>, params: Vec<Value>) -> &mut Self {
        self.requests
            .push(RpcRequest::new(self.next_id, method, params));
        self.next_id += 1;
        self
    }

    pub fn requests(&self) -> &[RpcRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl Default for BatchRequest {
    fn default() -> Self {
        Self::new()
    }
}
