//! End-to-end integration tests for the Tempo protocol library.
//!
//! These tests drive the public API the way a wallet or a fee-payer service
//! would: build, validate, sign, co-sign, serialize, hand the hex across a
//! process boundary, decode and recover the signers.
//!
//! Each test stands alone; keys are either fixed dev keys or freshly random.

use alloy_primitives::{address, b256, Address, Bytes, U256};

use tempo_protocol::config::{ALPHA_USD_ADDRESS, DEVNET_CHAIN_ID, TEMPO_TX_TYPE_ID};
use tempo_protocol::crypto::{keccak256, LocalSigner};
use tempo_protocol::rpc::RpcError;
use tempo_protocol::transaction::{
    add_fee_payer_signature, decode, deserialize, encode, fee_payer_signing_hash,
    recover_fee_payer, recover_sender, require_fee_payer_signature, serialize, sign_transaction,
    sign_transaction_with_key, signing_hash, transaction_hash, validate, SignatureState,
    Transaction, TransactionBuilder, TransactionError,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const RECIPIENT: Address = address!("1234567890123456789012345678901234567890");

// Hardhat / Anvil dev accounts #0 and #1.
const SENDER_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const SENDER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
const FEE_PAYER_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
const FEE_PAYER: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");

/// The reference payment: one call to `RECIPIENT` with value 500 and data
/// `aabb` on the devnet.
fn reference_payment() -> TransactionBuilder {
    TransactionBuilder::new(U256::from(DEVNET_CHAIN_ID))
        .gas(100_000)
        .add_call(RECIPIENT, Some(U256::from(500u64)), Some(Bytes::from(vec![0xaa, 0xbb])))
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

#[test]
fn test_build_sign_serialize_deserialize_scenario() {
    let mut tx = reference_payment().build_and_validate().unwrap();
    assert_eq!(tx.signature_state(), SignatureState::Unsigned);

    sign_transaction_with_key(&mut tx, SENDER_KEY).unwrap();
    let raw = serialize(&tx).unwrap();
    assert!(raw.starts_with("0x76"), "raw envelope must carry the type byte");

    // Hand the hex across a "process boundary".
    let received = deserialize(&raw).unwrap();
    assert_eq!(received.gas, 100_000);
    assert_eq!(received.calls.len(), 1);
    assert_eq!(received.calls[0].value, Some(U256::from(500u64)));
    assert_eq!(received.calls[0].data, Bytes::from(vec![0xaa, 0xbb]));
    assert_eq!(recover_sender(&received).unwrap(), SENDER);
    assert_eq!(received, tx);
}

#[test]
fn test_sponsored_transaction_flow() {
    // The sender builds and signs, paying fees in a stablecoin.
    let mut tx = reference_payment()
        .fee_token(ALPHA_USD_ADDRESS)
        .max_fee_per_gas(U256::from(2_000_000_000u64))
        .max_priority_fee_per_gas(U256::from(1_000_000_000u64))
        .nonce_key(U256::from(7u64))
        .build_and_validate()
        .unwrap();
    sign_transaction_with_key(&mut tx, SENDER_KEY).unwrap();
    assert_eq!(
        require_fee_payer_signature(&tx),
        Err(TransactionError::NoFeePayerSignature)
    );

    // The sender-signed payload travels to the sponsor as hex.
    let at_sponsor = deserialize(&serialize(&tx).unwrap()).unwrap();
    let mut sponsored = at_sponsor.clone();
    let fee_payer = LocalSigner::from_hex(FEE_PAYER_KEY).unwrap();
    add_fee_payer_signature(&mut sponsored, &fee_payer).unwrap();

    assert_eq!(sponsored.signature, at_sponsor.signature, "sender signature untouched");
    assert_eq!(sponsored.signature_state(), SignatureState::DualSigned);
    require_fee_payer_signature(&sponsored).unwrap();

    // And back to the sender, who broadcasts it.
    let final_tx = deserialize(&serialize(&sponsored).unwrap()).unwrap();
    assert_eq!(recover_sender(&final_tx).unwrap(), SENDER);
    assert_eq!(recover_fee_payer(&final_tx).unwrap(), FEE_PAYER);
    assert_eq!(final_tx.fee_token, ALPHA_USD_ADDRESS);
}

#[test]
fn test_fee_payer_must_follow_sender() {
    let mut tx = reference_payment().build();
    let fee_payer = LocalSigner::from_hex(FEE_PAYER_KEY).unwrap();
    assert_eq!(
        add_fee_payer_signature(&mut tx, &fee_payer),
        Err(TransactionError::MissingSenderSignature)
    );
    assert_eq!(serialize(&tx), Err(TransactionError::NoSignature));
}

#[test]
fn test_tampering_changes_recovered_sender() {
    let mut tx = reference_payment().build();
    sign_transaction_with_key(&mut tx, SENDER_KEY).unwrap();

    tx.calls[0].value = Some(U256::from(5_000u64));
    let recovered = recover_sender(&tx);
    assert_ne!(recovered.ok(), Some(SENDER));
}

#[test]
fn test_sender_resign_invalidates_old_sponsorship() {
    let mut tx = reference_payment().build();
    sign_transaction_with_key(&mut tx, SENDER_KEY).unwrap();
    add_fee_payer_signature(&mut tx, &LocalSigner::from_hex(FEE_PAYER_KEY).unwrap()).unwrap();
    let sponsored_hash = fee_payer_signing_hash(&tx);

    // Re-signing with another key changes what the fee payer committed to.
    sign_transaction(&mut tx, &LocalSigner::random()).unwrap();
    assert_ne!(fee_payer_signing_hash(&tx), sponsored_hash);
    assert_ne!(recover_fee_payer(&tx).ok(), Some(FEE_PAYER));
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[test]
fn test_round_trip_shapes() {
    let key = b256!("0000000000000000000000000000000000000000000000000000000000000001");

    let shapes: Vec<(&str, Transaction)> = vec![
        ("empty", Transaction::new()),
        ("unsigned reference", reference_payment().build()),
        (
            "contract creation and access list",
            reference_payment()
                .add_contract_creation(Some(U256::from(1u64)), Some(Bytes::from(vec![0x60, 0x80])))
                .add_access_list_entry(RECIPIENT, vec![key, key])
                .add_access_list_entry(ALPHA_USD_ADDRESS, vec![])
                .valid_after(1_700_000_000)
                .valid_before(1_700_003_600)
                .build(),
        ),
        (
            "absent optionals",
            Transaction {
                chain_id: Some(U256::from(1u64)),
                nonce_key: None,
                max_fee_per_gas: None,
                ..Transaction::new()
            },
        ),
        (
            "huge integers",
            Transaction {
                chain_id: Some(U256::MAX),
                nonce: u64::MAX,
                nonce_key: Some(U256::MAX),
                gas: u64::MAX,
                ..Transaction::new()
            },
        ),
    ];

    for (name, tx) in shapes {
        let bytes = encode(&tx);
        assert_eq!(bytes[0], TEMPO_TX_TYPE_ID, "{name}: type byte");
        assert_eq!(decode(&bytes).unwrap(), tx, "{name}: round trip");
    }
}

#[test]
fn test_absent_and_zero_encode_differently() {
    let zero = reference_payment().build();
    let absent = Transaction {
        max_fee_per_gas: None,
        ..zero.clone()
    };
    assert_ne!(encode(&zero), encode(&absent));
    assert_ne!(signing_hash(&zero), signing_hash(&absent));
}

#[test]
fn test_bad_envelopes_are_rejected() {
    let mut tx = reference_payment().build();
    sign_transaction_with_key(&mut tx, SENDER_KEY).unwrap();
    let bytes = encode(&tx);

    assert_eq!(decode(&[]), Err(TransactionError::InvalidTransaction));
    assert_eq!(decode(&bytes[..bytes.len() - 1]), Err(TransactionError::InvalidTransaction));

    let mut wrong_type = bytes.clone();
    wrong_type[0] = 0x02;
    assert_eq!(decode(&wrong_type), Err(TransactionError::InvalidTransactionType));

    let mut trailing = bytes.clone();
    trailing.push(0x00);
    assert_eq!(decode(&trailing), Err(TransactionError::InvalidTransaction));

    assert_eq!(deserialize("0xnothex"), Err(TransactionError::InvalidTransaction));
}

#[test]
fn test_transaction_hash_is_keccak_of_raw() {
    let mut tx = reference_payment().build();
    sign_transaction_with_key(&mut tx, SENDER_KEY).unwrap();
    let raw = serialize(&tx).unwrap();
    let bytes = hex::decode(raw.trim_start_matches("0x")).unwrap();
    assert_eq!(transaction_hash(&tx), keccak256(&bytes));
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_validation_is_deterministic_and_state_free() {
    let tx = reference_payment()
        .valid_after(10)
        .valid_before(5)
        .build();
    for _ in 0..3 {
        assert!(validate(&tx).is_ok());
    }

    let no_calls = TransactionBuilder::new(U256::from(DEVNET_CHAIN_ID)).gas(1).build();
    assert_eq!(validate(&no_calls), Err(TransactionError::InvalidTransaction));
}

#[test]
fn test_fee_payer_service_error_mapping() {
    // A sponsor rejecting a non-0x76 envelope reports the custom -32000 code.
    let err = deserialize("0x02c0").unwrap_err();
    assert_eq!(RpcError::from(err).code, -32000);
}
