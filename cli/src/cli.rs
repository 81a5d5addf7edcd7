//! # CLI Interface
//!
//! Command-line argument structure for `tempo-cli` using `clap` derive.
//! Every network and key setting can also come from a `TEMPO_*` environment
//! variable.

use std::str::FromStr;

use alloy_primitives::{Address, Bytes, B256, U256};
use clap::{Args, Parser, Subcommand};

use tempo_protocol::config::{
    DEFAULT_GAS_LIMIT, DEFAULT_RPC_TIMEOUT, DEFAULT_RPC_URL, DEVNET_CHAIN_ID,
};

use crate::logging::LogFormat;

/// Build, sign, decode and broadcast Tempo type-0x76 transactions.
#[derive(Parser, Debug)]
#[command(
    name = "tempo-cli",
    about = "Build, sign and broadcast Tempo account-abstraction transactions",
    version,
    propagate_version = true
)]
pub struct TempoCli {
    /// Log output format.
    #[arg(long, global = true, env = "TEMPO_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` wins when set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and sign a transaction, print its raw hex, optionally broadcast it.
    Build(BuildArgs),
    /// Decode a raw transaction and print it as JSON.
    Decode(DecodeArgs),
    /// Print the address of a private key, or generate a fresh key.
    Address(AddressArgs),
    /// Broadcast an already signed raw transaction.
    Send(SendArgs),
    /// Print the pending nonce of an address.
    Nonce(NonceArgs),
    /// Print the latest block number of the node.
    BlockNumber(RpcArgs),
    /// Print chain id and block number of the node.
    Status(RpcArgs),
    /// Have the node sign a transaction object (`eth_signTransaction`).
    RemoteSign(RemoteSignArgs),
}

/// Node connection settings shared by every networked subcommand.
#[derive(Args, Debug, Clone)]
pub struct RpcArgs {
    /// JSON-RPC endpoint.
    #[arg(long, env = "TEMPO_RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Basic auth user name.
    #[arg(long, env = "TEMPO_RPC_USER")]
    pub rpc_user: Option<String>,

    /// Basic auth password.
    #[arg(long, env = "TEMPO_RPC_PASSWORD", hide_env_values = true)]
    pub rpc_password: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_RPC_TIMEOUT.as_secs())]
    pub timeout_secs: u64,
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Sender private key (hex, `0x` optional).
    #[arg(long, env = "TEMPO_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Fee payer private key. When set, the fee payer co-signs.
    #[arg(long, env = "TEMPO_FEE_PAYER_KEY", hide_env_values = true)]
    pub fee_payer_key: Option<String>,

    /// Chain id.
    #[arg(long, env = "TEMPO_CHAIN_ID", default_value_t = DEVNET_CHAIN_ID)]
    pub chain_id: u64,

    /// Gas limit.
    #[arg(long, default_value_t = DEFAULT_GAS_LIMIT)]
    pub gas: u64,

    /// Max fee per gas (decimal or 0x hex).
    #[arg(long, value_parser = parse_u256, default_value = "0")]
    pub max_fee_per_gas: U256,

    /// Max priority fee per gas (decimal or 0x hex).
    #[arg(long, value_parser = parse_u256, default_value = "0")]
    pub max_priority_fee_per_gas: U256,

    /// Nonce. Ignored with `--fetch-nonce`.
    #[arg(long, default_value_t = 0)]
    pub nonce: u64,

    /// Query the node for the sender's pending nonce.
    #[arg(long)]
    pub fetch_nonce: bool,

    /// Nonce key (2D nonce sequence).
    #[arg(long, value_parser = parse_u256, default_value = "0")]
    pub nonce_key: U256,

    /// Unix timestamp before which the transaction is not valid.
    #[arg(long, default_value_t = 0)]
    pub valid_after: u64,

    /// Unix timestamp from which the transaction is expired.
    #[arg(long, default_value_t = 0)]
    pub valid_before: u64,

    /// Fee token address. Defaults to the native token.
    #[arg(long, value_parser = parse_address)]
    pub fee_token: Option<Address>,

    /// A call, as `TO[,VALUE[,DATA]]`. Repeatable; order is kept.
    #[arg(long = "call", value_name = "TO[,VALUE[,DATA]]")]
    pub calls: Vec<CallSpec>,

    /// A contract creation, as `VALUE,INITCODE`. Repeatable.
    #[arg(long = "create", value_name = "VALUE,INITCODE")]
    pub creates: Vec<CreateSpec>,

    /// An access list entry, as `ADDRESS[,KEY...]`. Repeatable.
    #[arg(long = "access", value_name = "ADDRESS[,KEY...]")]
    pub access_list: Vec<AccessSpec>,

    /// Broadcast the transaction after signing.
    #[arg(long)]
    pub send: bool,

    /// Wait for inclusion when broadcasting.
    #[arg(long, requires = "send")]
    pub sync: bool,

    #[command(flatten)]
    pub rpc: RpcArgs,
}

/// Arguments for the `decode` subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Raw transaction hex (`0x` optional).
    pub raw: String,
}

/// Arguments for the `address` subcommand.
#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Private key (hex, `0x` optional).
    #[arg(long, env = "TEMPO_PRIVATE_KEY", hide_env_values = true, required_unless_present = "random")]
    pub private_key: Option<String>,

    /// Generate a new random key and print it together with its address.
    /// Takes precedence over `--private-key` and `TEMPO_PRIVATE_KEY`.
    #[arg(long)]
    pub random: bool,
}

/// Arguments for the `send` subcommand.
#[derive(Args, Debug)]
pub struct SendArgs {
    /// Raw signed transaction hex.
    pub raw: String,

    /// Use `eth_sendRawTransactionSync` and wait for inclusion.
    #[arg(long)]
    pub sync: bool,

    #[command(flatten)]
    pub rpc: RpcArgs,
}

/// Arguments for the `nonce` subcommand.
#[derive(Args, Debug)]
pub struct NonceArgs {
    /// Account address.
    #[arg(value_parser = parse_address)]
    pub address: Address,

    #[command(flatten)]
    pub rpc: RpcArgs,
}

/// Arguments for the `remote-sign` subcommand.
#[derive(Args, Debug)]
pub struct RemoteSignArgs {
    /// Transaction object as JSON, e.g. `{"to":"0x…","value":"0x0"}`.
    pub tx: String,

    #[command(flatten)]
    pub rpc: RpcArgs,
}

// ---------------------------------------------------------------------------
// Value parsers
// ---------------------------------------------------------------------------

/// A `--call` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSpec {
    pub to: Address,
    pub value: Option<U256>,
    pub data: Option<Bytes>,
}

impl FromStr for CallSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let to = parse_address(parts.next().unwrap_or_default())?;
        let value = parts.next().map(parse_u256).transpose()?;
        let data = parts.next().map(parse_bytes).transpose()?;
        if parts.next().is_some() {
            return Err(format!("too many fields in call `{s}`"));
        }
        Ok(Self { to, value, data })
    }
}

/// A `--create` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSpec {
    pub value: Option<U256>,
    pub init_code: Bytes,
}

impl FromStr for CreateSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, code) = s
            .split_once(',')
            .ok_or_else(|| format!("expected VALUE,INITCODE, got `{s}`"))?;
        Ok(Self {
            value: Some(parse_u256(value)?),
            init_code: parse_bytes(code)?,
        })
    }
}

/// An `--access` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessSpec {
    pub address: Address,
    pub storage_keys: Vec<B256>,
}

impl FromStr for AccessSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let address = parse_address(parts.next().unwrap_or_default())?;
        let storage_keys = parts
            .map(|key| B256::from_str(key.trim()).map_err(|err| format!("bad storage key `{key}`: {err}")))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            address,
            storage_keys,
        })
    }
}

/// Parses a decimal or `0x` hex integer.
pub fn parse_u256(s: &str) -> Result<U256, String> {
    U256::from_str(s.trim()).map_err(|err| format!("bad integer `{s}`: {err}"))
}

/// Parses a 20-byte hex address.
pub fn parse_address(s: &str) -> Result<Address, String> {
    Address::from_str(s.trim()).map_err(|err| format!("bad address `{s}`: {err}"))
}

/// Parses hex bytes, `0x` optional. An empty string is empty calldata.
pub fn parse_bytes(s: &str) -> Result<Bytes, String> {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|err| format!("bad hex `{s}`: {err}"))
}
