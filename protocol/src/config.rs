//! # Protocol Configuration & Constants
//!
//! Every constant that touches the wire format, the signing domain or the
//! default RPC plumbing lives here. The envelope tag and the field layout
//! are consensus-critical: a node that disagrees on either rejects the
//! transaction outright.

use std::time::Duration;

use alloy_primitives::{address, Address, U256};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// EIP-2718 type byte of the Tempo account-abstraction envelope.
///
/// Every serialized transaction starts with this byte, ahead of the RLP body.
pub const TEMPO_TX_TYPE_ID: u8 = 0x76;

/// Default nonce sequence selected by [`TransactionBuilder::new`].
///
/// Sequence `0` is the protocol's "classic" nonce lane; any other key opens
/// an independent, parallel sequence for the same sender.
///
/// [`TransactionBuilder::new`]: crate::transaction::TransactionBuilder::new
pub const DEFAULT_NONCE_KEY: U256 = U256::ZERO;

/// Fee token sentinel meaning "pay gas in the native token".
pub const NATIVE_FEE_TOKEN: Address = Address::ZERO;

/// The AlphaUSD stablecoin predeploy, the usual fee token on devnets.
pub const ALPHA_USD_ADDRESS: Address = address!("20c0000000000000000000000000000000000001");

// ---------------------------------------------------------------------------
// Field widths
// ---------------------------------------------------------------------------

/// Storage keys and the `r` / `s` signature scalars are full 32-byte words.
pub const WORD_LENGTH: usize = 32;

/// Flat `r || s || v` signature length.
pub const SIGNATURE_LENGTH: usize = 2 * WORD_LENGTH + 1;

/// secp256k1 private key length in bytes.
pub const PRIVATE_KEY_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Networks
// ---------------------------------------------------------------------------

/// Chain id of the local development network.
pub const DEVNET_CHAIN_ID: u64 = 42424;

/// Gas limit that comfortably covers a single token transfer.
pub const DEFAULT_GAS_LIMIT: u64 = 100_000;

// ---------------------------------------------------------------------------
// JSON-RPC
// ---------------------------------------------------------------------------

/// Endpoint used when neither a flag nor `TEMPO_RPC_URL` is given.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Per-request HTTP timeout for the JSON-RPC client.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC protocol version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// Broadcast a raw transaction and return its hash.
pub const METHOD_SEND_RAW_TRANSACTION: &str = "eth_sendRawTransaction";

/// Broadcast a raw transaction and wait for block inclusion.
pub const METHOD_SEND_RAW_TRANSACTION_SYNC: &str = "eth_sendRawTransactionSync";

/// Ask a remote signer (e.g. a fee-payer service) to sign a transaction.
pub const METHOD_SIGN_TRANSACTION: &str = "eth_signTransaction";

/// Pending nonce of an address.
pub const METHOD_GET_TRANSACTION_COUNT: &str = "eth_getTransactionCount";

/// Latest block number.
pub const METHOD_BLOCK_NUMBER: &str = "eth_blockNumber";

/// Chain id the node is serving.
pub const METHOD_CHAIN_ID: &str = "eth_chainId";
