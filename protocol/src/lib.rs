// Copyright (c) 2026 Tempo Contributors. MIT License.
// See LICENSE for details.

//! # Tempo Protocol Core Library
//!
//! Issue, validate, encode, decode and sign Tempo "type 0x76"
//! account-abstraction transactions.
//!
//! A type-0x76 transaction batches several calls under one signature, orders
//! itself on a two-dimensional nonce, pays gas in an ERC-20 fee token, and
//! can be sponsored by a fee payer who co-signs the sender's payload.
//!
//! ## Architecture
//!
//! - **transaction**: Model, builder, validation, wire codec and signing.
//! - **crypto**: secp256k1 signing capability and Keccak-256.
//! - **rpc**: JSON-RPC message types and the `Transport` seam.
//! - **config**: Protocol constants and RPC defaults.
//!
//! ## Quick start
//!
//! ```
//! use alloy_primitives::{address, Bytes, U256};
//! use tempo_protocol::crypto::LocalSigner;
//! use tempo_protocol::transaction::{
//!     deserialize, recover_sender, serialize, sign_transaction, TransactionBuilder,
//! };
//!
//! let signer = LocalSigner::random();
//! let mut tx = TransactionBuilder::new(U256::from(42424u64))
//!     .gas(100_000)
//!     .add_call(
//!         address!("1234567890123456789012345678901234567890"),
//!         Some(U256::from(500u64)),
//!         Some(Bytes::from(vec![0xaa, 0xbb])),
//!     )
//!     .build_and_validate()
//!     .unwrap();
//!
//! sign_transaction(&mut tx, &signer).unwrap();
//! let raw = serialize(&tx).unwrap();
//! assert!(raw.starts_with("0x76"));
//!
//! let decoded = deserialize(&raw).unwrap();
//! assert_eq!(recover_sender(&decoded).unwrap(), signer.address());
//! ```
//!
//! The crate performs no network I/O and checks nothing that needs chain
//! state: fee-market rules, nonce ordering and validity windows are the
//! network's job.

pub mod config;
pub mod crypto;
pub mod rpc;
pub mod transaction;
