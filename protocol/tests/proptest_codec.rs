//! Property-based tests for the type-0x76 wire codec.

use alloy_primitives::{Address, Bytes, B256, U256};
use proptest::prelude::*;

use tempo_protocol::config::TEMPO_TX_TYPE_ID;
use tempo_protocol::crypto::LocalSigner;
use tempo_protocol::transaction::{
    add_fee_payer_signature, decode, deserialize, encode, recover_fee_payer, recover_sender,
    serialize, sign_transaction, AccessTuple, Call, Signature, Transaction,
};

// ============================================================================
// Strategies
// ============================================================================

fn arb_address() -> impl Strategy<Value = Address> {
    prop::array::uniform20(any::<u8>()).prop_map(Address::from)
}

fn arb_b256() -> impl Strategy<Value = B256> {
    prop::array::uniform32(any::<u8>()).prop_map(B256::from)
}

/// Mixes small values (including zero) with full-width ones so that the
/// single-byte and long-string integer forms are both exercised.
fn arb_u256() -> impl Strategy<Value = U256> {
    prop_oneof![
        Just(U256::ZERO),
        any::<u64>().prop_map(U256::from),
        prop::array::uniform32(any::<u8>()).prop_map(|bytes| U256::from_be_bytes(bytes)),
    ]
}

fn arb_bytes(max_len: usize) -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..max_len).prop_map(Bytes::from)
}

fn arb_call() -> impl Strategy<Value = Call> {
    (
        prop::option::of(arb_address()),
        prop::option::of(arb_u256()),
        arb_bytes(96),
    )
        .prop_map(|(to, value, data)| Call { to, value, data })
}

fn arb_access_tuple() -> impl Strategy<Value = AccessTuple> {
    (arb_address(), prop::collection::vec(arb_b256(), 0..4))
        .prop_map(|(address, storage_keys)| AccessTuple { address, storage_keys })
}

fn arb_signature() -> impl Strategy<Value = Signature> {
    (arb_b256(), arb_b256(), any::<bool>()).prop_map(|(r, s, y)| Signature::new(r, s, y))
}

/// Any transaction the codec can represent, valid or not, with every
/// combination of sender and fee-payer signature presence.
fn arb_transaction() -> impl Strategy<Value = Transaction> {
    let header = (
        prop::option::of(arb_u256()), // chain_id
        any::<u64>(),                 // nonce
        prop::option::of(arb_u256()), // nonce_key
        any::<u64>(),                 // gas
        prop::option::of(arb_u256()), // max_fee_per_gas
        prop::option::of(arb_u256()), // max_priority_fee_per_gas
        any::<u64>(),                 // valid_after
        any::<u64>(),                 // valid_before
        prop_oneof![Just(Address::ZERO), arb_address()], // fee_token
    );
    let body = (
        prop::collection::vec(arb_call(), 0..5),
        prop::collection::vec(arb_access_tuple(), 0..4),
        prop::option::of(arb_signature()),
        prop::option::of(arb_signature()),
    );

    (header, body).prop_map(
        |(
            (
                chain_id,
                nonce,
                nonce_key,
                gas,
                max_fee_per_gas,
                max_priority_fee_per_gas,
                valid_after,
                valid_before,
                fee_token,
            ),
            (calls, access_list, signature, fee_payer_signature),
        )| Transaction {
            chain_id,
            nonce,
            nonce_key,
            gas,
            max_fee_per_gas,
            max_priority_fee_per_gas,
            valid_after,
            valid_before,
            fee_token,
            calls,
            access_list,
            signature,
            fee_payer_signature,
        },
    )
}

/// A transaction that passes validation: chain id and gas non-zero, at least
/// one call, every call carrying a value, and a nonce key.
fn arb_valid_transaction() -> impl Strategy<Value = Transaction> {
    (
        arb_transaction(),
        1u64..=u64::MAX,
        1u64..=u64::MAX,
        prop::collection::vec(arb_call(), 1..4),
        arb_u256(),
    )
        .prop_map(|(mut tx, chain_id, gas, mut calls, nonce_key)| {
            for call in &mut calls {
                call.value.get_or_insert(U256::ZERO);
            }
            tx.chain_id = Some(U256::from(chain_id));
            tx.gas = gas;
            tx.calls = calls;
            tx.nonce_key = Some(nonce_key);
            tx.signature = None;
            tx.fee_payer_signature = None;
            tx
        })
}

// ============================================================================
// Codec properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn encode_decode_roundtrip(tx in arb_transaction()) {
        let bytes = encode(&tx);
        prop_assert_eq!(bytes[0], TEMPO_TX_TYPE_ID);
        prop_assert_eq!(decode(&bytes).unwrap(), tx);
    }

    #[test]
    fn distinct_transactions_encode_distinctly(a in arb_transaction(), b in arb_transaction()) {
        prop_assume!(a != b);
        prop_assert_ne!(encode(&a), encode(&b));
    }

    #[test]
    fn absent_and_zero_fields_encode_distinctly(tx in arb_transaction(), field in 0usize..4) {
        let mut absent = tx.clone();
        let mut zero = tx;
        let (a, z) = match field {
            0 => (&mut absent.chain_id, &mut zero.chain_id),
            1 => (&mut absent.nonce_key, &mut zero.nonce_key),
            2 => (&mut absent.max_fee_per_gas, &mut zero.max_fee_per_gas),
            _ => (&mut absent.max_priority_fee_per_gas, &mut zero.max_priority_fee_per_gas),
        };
        *a = None;
        *z = Some(U256::ZERO);
        prop_assert_ne!(encode(&absent), encode(&zero));
    }

    #[test]
    fn strict_prefixes_never_decode(tx in arb_transaction(), cut in any::<prop::sample::Index>()) {
        let bytes = encode(&tx);
        let len = cut.index(bytes.len());
        prop_assert!(decode(&bytes[..len]).is_err());
    }

    #[test]
    fn arbitrary_payload_never_panics(payload in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut bytes = vec![TEMPO_TX_TYPE_ID];
        bytes.extend_from_slice(&payload);
        let _ = decode(&bytes);
    }

    #[test]
    fn corrupted_encoding_never_panics(
        tx in arb_transaction(),
        at in any::<prop::sample::Index>(),
        byte in any::<u8>(),
    ) {
        let mut bytes = encode(&tx);
        let index = at.index(bytes.len());
        bytes[index] = byte;
        if let Ok(decoded) = decode(&bytes) {
            // Whatever survives must itself be representable.
            prop_assert_eq!(decode(&encode(&decoded)).unwrap(), decoded);
        }
    }
}

// ============================================================================
// Signing properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn signed_transactions_survive_the_hex_boundary(tx in arb_valid_transaction()) {
        let sender = LocalSigner::random();
        let fee_payer = LocalSigner::random();

        let mut tx = tx;
        sign_transaction(&mut tx, &sender).unwrap();
        let received = deserialize(&serialize(&tx).unwrap()).unwrap();
        prop_assert_eq!(recover_sender(&received).unwrap(), sender.address());

        let mut sponsored = received;
        add_fee_payer_signature(&mut sponsored, &fee_payer).unwrap();
        let received = deserialize(&serialize(&sponsored).unwrap()).unwrap();
        prop_assert_eq!(recover_sender(&received).unwrap(), sender.address());
        prop_assert_eq!(recover_fee_payer(&received).unwrap(), fee_payer.address());
        prop_assert_eq!(received, sponsored);
    }
}
