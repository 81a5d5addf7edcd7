//! # Transaction Module
//!
//! Construction, validation, encoding and signing of Tempo type-0x76
//! account-abstraction transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        - Transaction, Call, AccessTuple, Signature
//! builder.rs      - Fluent TransactionBuilder for unsigned transactions
//! verification.rs - Structural validation
//! codec.rs        - 0x76 || rlp(fields) wire encoding
//! signing.rs      - Sender / fee-payer signing, raw hex, recovery
//! error.rs        - TransactionError
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build** with [`TransactionBuilder`].
//! 2. **Validate** with [`validate`] (or [`TransactionBuilder::build_and_validate`]).
//! 3. **Sign** as the sender with [`sign_transaction`].
//! 4. **Sponsor** (optional): a fee payer calls [`add_fee_payer_signature`].
//! 5. **Serialize** with [`serialize`] and hand the hex to a transport.
//!
//! The network, not this crate, enforces fee-market rules, nonce ordering and
//! the `valid_after` / `valid_before` window.

pub mod builder;
pub mod codec;
pub mod error;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::TransactionBuilder;
pub use codec::{decode, encode};
pub use error::TransactionError;
pub use signing::{
    add_fee_payer_signature, deserialize, fee_payer_signing_hash, recover_fee_payer,
    recover_sender, require_fee_payer_signature, serialize, sign_transaction,
    sign_transaction_with_key, signing_hash, transaction_hash,
};
pub use types::{AccessTuple, Call, Signature, SignatureState, Transaction};
pub use verification::validate;
