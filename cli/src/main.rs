// Copyright (c) 2026 Tempo Contributors. MIT License.
// See LICENSE for details.

//! # Tempo CLI
//!
//! Entry point for the `tempo-cli` binary. Parses CLI arguments, initializes
//! logging and dispatches to a subcommand:
//!
//! - `build`        : build, sign (and co-sign) a transaction, print the raw hex
//! - `decode`       : decode a raw transaction to JSON, recovering signers
//! - `address`      : derive an address from a key, or generate a key
//! - `send`         : broadcast a signed raw transaction
//! - `nonce`        : pending nonce of an address
//! - `block-number` : latest block number of the node
//! - `status`       : chain id and block number in one batched request
//! - `remote-sign`  : have the node sign a transaction object
//!
//! Command output goes to stdout; logs go to stderr.

mod cli;
mod client;
mod logging;

use std::time::Duration;

use alloy_primitives::{Address, B256, U256};
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use tempo_protocol::config::{METHOD_BLOCK_NUMBER, METHOD_CHAIN_ID};
use tempo_protocol::crypto::LocalSigner;
use tempo_protocol::rpc::{parse_quantity, BatchRequest};
use tempo_protocol::transaction::{
    add_fee_payer_signature, deserialize, recover_fee_payer, recover_sender, serialize,
    sign_transaction, transaction_hash, SignatureState, Transaction, TransactionBuilder,
};

use cli::{
    AddressArgs, BuildArgs, Commands, DecodeArgs, NonceArgs, RemoteSignArgs, RpcArgs, SendArgs,
    TempoCli,
};
use client::HttpClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = TempoCli::parse();
    logging::init_logging(logging::default_level(cli.verbose), cli.log_format);

    match cli.command {
        Commands::Build(args) => run_build(args).await,
        Commands::Decode(args) => run_decode(args),
        Commands::Address(args) => run_address(args),
        Commands::Send(args) => run_send(args).await,
        Commands::Nonce(args) => run_nonce(args).await,
        Commands::BlockNumber(args) => run_block_number(args).await,
        Commands::Status(args) => run_status(args).await,
        Commands::RemoteSign(args) => run_remote_sign(args).await,
    }
}

// ---------------------------------------------------------------------------
// Output shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BuildOutput {
    raw: String,
    hash: B256,
    sender: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    fee_payer: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    submitted_hash: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DecodeOutput {
    hash: B256,
    state: SignatureState,
    #[serde(skip_serializing_if = "Option::is_none")]
    sender: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fee_payer: Option<Address>,
    transaction: Transaction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusOutput {
    url: String,
    chain_id: u64,
    block_number: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyOutput {
    address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key: Option<String>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

/// Builds, validates and signs a transaction, optionally broadcasting it.
async fn run_build(args: BuildArgs) -> Result<()> {
    let sender = LocalSigner::from_hex(&args.private_key).context("invalid sender key")?;
    let fee_payer = args
        .fee_payer_key
        .as_deref()
        .map(LocalSigner::from_hex)
        .transpose()
        .context("invalid fee payer key")?;

    let client = if args.send || args.fetch_nonce {
        Some(connect(&args.rpc)?)
    } else {
        None
    };

    let nonce = match (&client, args.fetch_nonce) {
        (Some(client), true) => client
            .get_transaction_count(sender.address())
            .await
            .context("failed to fetch pending nonce")?,
        _ => args.nonce,
    };

    let mut tx = build_transaction(&args, nonce)?;
    sign_transaction(&mut tx, &sender).context("failed to sign transaction")?;
    if let Some(fee_payer) = &fee_payer {
        add_fee_payer_signature(&mut tx, fee_payer).context("failed to add fee payer signature")?;
    }

    let raw = serialize(&tx)?;
    tracing::info!(
        sender = %sender.address(),
        nonce,
        calls = tx.calls.len(),
        state = %tx.signature_state(),
        "transaction signed"
    );

    let submitted_hash = match &client {
        Some(client) if args.send => Some(broadcast(client, &raw, args.sync).await?),
        _ => None,
    };

    print_json(&BuildOutput {
        hash: transaction_hash(&tx),
        sender: sender.address(),
        fee_payer: fee_payer.as_ref().map(LocalSigner::address),
        submitted_hash,
        raw,
    })
}

/// Assembles the unsigned transaction described by `args`.
fn build_transaction(args: &BuildArgs, nonce: u64) -> Result<Transaction> {
    let mut builder = TransactionBuilder::new(U256::from(args.chain_id))
        .gas(args.gas)
        .max_fee_per_gas(args.max_fee_per_gas)
        .max_priority_fee_per_gas(args.max_priority_fee_per_gas)
        .nonce(nonce)
        .nonce_key(args.nonce_key)
        .valid_after(args.valid_after)
        .valid_before(args.valid_before);

    if let Some(token) = args.fee_token {
        builder = builder.fee_token(token);
    }
    for call in &args.calls {
        builder = builder.add_call(call.to, call.value, call.data.clone());
    }
    for create in &args.creates {
        builder = builder.add_contract_creation(create.value, Some(create.init_code.clone()));
    }
    for entry in &args.access_list {
        builder = builder.add_access_list_entry(entry.address, entry.storage_keys.clone());
    }

    builder
        .build_and_validate()
        .context("transaction is invalid (needs a non-zero chain id, gas and at least one call)")
}

/// Decodes a raw transaction and prints it with its recovered signers.
fn run_decode(args: DecodeArgs) -> Result<()> {
    let tx = deserialize(&args.raw).context("failed to decode raw transaction")?;

    let sender = match tx.signature {
        Some(_) => Some(recover_sender(&tx).context("sender signature does not recover")?),
        None => None,
    };
    let fee_payer = match tx.fee_payer_signature {
        Some(_) => Some(recover_fee_payer(&tx).context("fee payer signature does not recover")?),
        None => None,
    };

    print_json(&DecodeOutput {
        hash: transaction_hash(&tx),
        state: tx.signature_state(),
        sender,
        fee_payer,
        transaction: tx,
    })
}

fn run_address(args: AddressArgs) -> Result<()> {
    print_json(&key_output(&args)?)
}

/// Derives an address from a key, or generates a fresh key. `--random` wins
/// over a key supplied through the environment.
fn key_output(args: &AddressArgs) -> Result<KeyOutput> {
    match &args.private_key {
        Some(key) if !args.random => Ok(KeyOutput {
            address: LocalSigner::from_hex(key).context("invalid private key")?.address(),
            private_key: None,
        }),
        _ => {
            let signer = LocalSigner::random();
            Ok(KeyOutput {
                address: signer.address(),
                private_key: Some(format!("0x{}", hex::encode(signer.to_bytes()))),
            })
        }
    }
}

/// Broadcasts an already signed raw transaction.
async fn run_send(args: SendArgs) -> Result<()> {
    // Refuse to broadcast something that is not a well-formed signed envelope.
    let tx = deserialize(&args.raw).context("refusing to send an undecodable transaction")?;
    let raw = serialize(&tx).context("refusing to send an unsigned transaction")?;

    let client = connect(&args.rpc)?;
    let hash = broadcast(&client, &raw, args.sync).await?;
    println!("{hash}");
    Ok(())
}

async fn run_nonce(args: NonceArgs) -> Result<()> {
    let client = connect(&args.rpc)?;
    let nonce = client
        .get_transaction_count(args.address)
        .await
        .with_context(|| format!("failed to fetch nonce from {}", client.url()))?;
    println!("{nonce}");
    Ok(())
}

async fn run_block_number(args: RpcArgs) -> Result<()> {
    let client = connect(&args)?;
    let number = client
        .block_number()
        .await
        .with_context(|| format!("failed to fetch block number from {}", client.url()))?;
    println!("{number}");
    Ok(())
}

/// Queries chain id and block number in a single batched round trip.
async fn run_status(args: RpcArgs) -> Result<()> {
    let client = connect(&args)?;

    let mut batch = BatchRequest::new();
    batch
        .add(METHOD_CHAIN_ID, vec![])
        .add(METHOD_BLOCK_NUMBER, vec![]);

    let responses = client
        .send_batch(&batch)
        .await
        .with_context(|| format!("failed to query status of {}", client.url()))?;
    anyhow::ensure!(
        responses.len() == batch.len(),
        "expected {} responses, got {}",
        batch.len(),
        responses.len()
    );

    // Nodes may answer a batch in any order; match on the request id.
    let mut values = [0u64; 2];
    for response in responses {
        let index = response
            .id
            .as_u64()
            .and_then(|id| usize::try_from(id).ok())
            .and_then(|id| id.checked_sub(1))
            .filter(|index| *index < values.len())
            .context("response with unknown id")?;
        let method = &batch.requests()[index].method;
        let result = response
            .into_result()
            .with_context(|| format!("{method} failed"))?;
        values[index] = parse_quantity(method, result)?;
    }

    print_json(&StatusOutput {
        url: client.url().to_string(),
        chain_id: values[0],
        block_number: values[1],
    })
}

/// Asks the node to sign a JSON transaction object with a key it holds.
async fn run_remote_sign(args: RemoteSignArgs) -> Result<()> {
    let tx: serde_json::Value =
        serde_json::from_str(&args.tx).context("transaction must be a JSON object")?;
    let client = connect(&args.rpc)?;
    let raw = client
        .sign_transaction(tx)
        .await
        .with_context(|| format!("eth_signTransaction failed on {}", client.url()))?;
    println!("{raw}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn connect(args: &RpcArgs) -> Result<HttpClient> {
    let mut builder =
        HttpClient::builder(&args.rpc_url).timeout(Duration::from_secs(args.timeout_secs));
    if args.rpc_user.is_some() || args.rpc_password.is_some() {
        builder = builder.basic_auth(
            args.rpc_user.clone().unwrap_or_default(),
            args.rpc_password.clone().unwrap_or_default(),
        );
    }
    let client = builder.build().context("failed to create HTTP client")?;
    tracing::debug!(url = %client.url(), "RPC client ready");
    Ok(client)
}

async fn broadcast(client: &HttpClient, raw: &str, sync: bool) -> Result<String> {
    let hash = if sync {
        client.send_raw_transaction_sync(raw).await
    } else {
        client.send_raw_transaction(raw).await
    }
    .with_context(|| format!("failed to broadcast to {}", client.url()))?;
    tracing::info!(%hash, sync, "transaction broadcast");
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, Bytes};

    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn parse_build(extra: &[&str]) -> BuildArgs {
        let mut argv = vec!["tempo-cli", "build", "--private-key", DEV_KEY];
        argv.extend_from_slice(extra);
        match TempoCli::try_parse_from(argv).unwrap().command {
            Commands::Build(args) => args,
            other => panic!("expected build, got {other:?}"),
        }
    }

    #[test]
    fn build_transaction_from_flags() {
        let args = parse_build(&[
            "--gas",
            "21000",
            "--nonce-key",
            "7",
            "--fee-token",
            "0x20c0000000000000000000000000000000000001",
            "--call",
            "0x1234567890123456789012345678901234567890,500,0xaabb",
            "--create",
            "0,0x6080",
            "--access",
            "0x1111111111111111111111111111111111111111",
        ]);

        let tx = build_transaction(&args, 3).unwrap();
        assert_eq!(tx.gas, 21_000);
        assert_eq!(tx.nonce, 3);
        assert_eq!(tx.nonce_key, Some(U256::from(7u64)));
        assert_eq!(tx.fee_token, tempo_protocol::config::ALPHA_USD_ADDRESS);
        assert_eq!(tx.calls.len(), 2);
        assert_eq!(tx.calls[0].to, Some(address!("1234567890123456789012345678901234567890")));
        assert_eq!(tx.calls[0].data, Bytes::from(vec![0xaa, 0xbb]));
        assert!(tx.calls[1].is_create());
        assert_eq!(tx.access_list.len(), 1);
    }

    #[test]
    fn build_transaction_without_calls_is_rejected() {
        let args = parse_build(&[]);
        assert!(build_transaction(&args, 0).is_err());
    }

    #[test]
    fn built_transaction_signs_and_decodes() {
        let args = parse_build(&["--call", "0x1234567890123456789012345678901234567890,1"]);
        let signer = LocalSigner::from_hex(DEV_KEY).unwrap();

        let mut tx = build_transaction(&args, 0).unwrap();
        sign_transaction(&mut tx, &signer).unwrap();
        let decoded = deserialize(&serialize(&tx).unwrap()).unwrap();
        assert_eq!(recover_sender(&decoded).unwrap(), signer.address());
    }

    #[test]
    fn random_flag_overrides_supplied_key() {
        let keyed = AddressArgs {
            private_key: Some(DEV_KEY.to_string()),
            random: false,
        };
        let output = key_output(&keyed).unwrap();
        assert_eq!(output.address, address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert!(output.private_key.is_none());

        let random = AddressArgs { random: true, ..keyed };
        let output = key_output(&random).unwrap();
        assert_ne!(output.address, address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        let fresh = LocalSigner::from_hex(output.private_key.as_deref().unwrap()).unwrap();
        assert_eq!(fresh.address(), output.address);
    }
}
