//! # JSON-RPC
//!
//! Message types for talking to Tempo nodes and fee-payer services, plus the
//! [`Transport`] trait the signing flow hands raw envelopes to. No HTTP lives
//! here; see the `tempo-cli` crate for the reqwest-backed client.

pub mod transport;
pub mod types;

pub use transport::{
    block_number, parse_quantity, pending_nonce, submit_transaction, RpcClientError, Transport,
};
pub use types::{BatchRequest, RpcError, RpcRequest, RpcResponse};
