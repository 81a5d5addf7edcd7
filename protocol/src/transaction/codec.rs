//! Canonical wire encoding of the type-0x76 envelope.
//!
//! ```text
//! 0x76 || rlp([
//!     chain_id, nonce, nonce_key, max_priority_fee_per_gas, max_fee_per_gas,
//!     gas, fee_token,
//!     [[to, value, data], ...],
//!     [[address, [storage_key, ...]], ...],
//!     valid_after, valid_before,
//!     [r, s, y_parity]?,          // sender signature, only if present
//!     [r, s, y_parity]?,          // fee payer signature, only if present
//! ])
//! ```
//!
//! Integers are minimal big-endian strings. An absent optional integer is the
//! empty list `0xc0`, which no integer can encode to, so `None` and `0`
//! round-trip as different values. A contract-creation target is the empty
//! string `0x80`. When only the fee payer signature is set the sender slot
//! holds the `0xc0` placeholder.
//!
//! The codec guarantees byte-level fidelity only. Business rules belong to
//! [`super::verification::validate`].

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rlp::{Buf, BufMut, Decodable, Encodable, Header, EMPTY_LIST_CODE, EMPTY_STRING_CODE};

use super::error::TransactionError;
use super::types::{AccessTuple, Call, Signature, Transaction};
use crate::config::TEMPO_TX_TYPE_ID;

/// Encodes a transaction, signatures included when present.
pub fn encode(tx: &Transaction) -> Vec<u8> {
    let header = list_header(fields_length(tx));
    let mut out = Vec::with_capacity(1 + header.length_with_payload());
    out.put_u8(TEMPO_TX_TYPE_ID);
    header.encode(&mut out);
    encode_fields(tx, &mut out);
    out
}

/// Returns the length in bytes of [`encode`]'s output without encoding.
pub fn encoded_length(tx: &Transaction) -> usize {
    1 + list_header(fields_length(tx)).length_with_payload()
}

/// Decodes a type byte plus RLP body into a transaction.
///
/// # Errors
///
/// - [`TransactionError::InvalidTransactionType`] if the first byte is not
///   [`TEMPO_TX_TYPE_ID`].
/// - [`TransactionError::InvalidTransaction`] on empty input, truncation,
///   malformed or non-canonical RLP, wrong fixed widths, integer overflow or
///   trailing bytes.
pub fn decode(bytes: &[u8]) -> Result<Transaction, TransactionError> {
    let Some((&ty, mut body)) = bytes.split_first() else {
        tracing::debug!("empty transaction envelope");
        return Err(TransactionError::InvalidTransaction);
    };
    if ty != TEMPO_TX_TYPE_ID {
        tracing::debug!(ty, "unexpected envelope type");
        return Err(TransactionError::InvalidTransactionType);
    }

    let tx = decode_body(&mut body)?;
    if !body.is_empty() {
        tracing::debug!(trailing = body.len(), "bytes after transaction body");
        return Err(TransactionError::InvalidTransaction);
    }
    Ok(tx)
}

// ---------------------------------------------------------------------------
// Transaction body
// ---------------------------------------------------------------------------

#[inline]
fn list_header(payload_length: usize) -> Header {
    Header {
        list: true,
        payload_length,
    }
}

fn fields_length(tx: &Transaction) -> usize {
    opt_u256_length(&tx.chain_id)
        + tx.nonce.length()
        + opt_u256_length(&tx.nonce_key)
        + opt_u256_length(&tx.max_priority_fee_per_gas)
        + opt_u256_length(&tx.max_fee_per_gas)
        + tx.gas.length()
        + tx.fee_token.length()
        + tx.calls.length()
        + tx.access_list.length()
        + tx.valid_after.length()
        + tx.valid_before.length()
        + signatures_length(tx)
}

fn encode_fields(tx: &Transaction, out: &mut dyn BufMut) {
    encode_opt_u256(&tx.chain_id, out);
    tx.nonce.encode(out);
    encode_opt_u256(&tx.nonce_key, out);
    encode_opt_u256(&tx.max_priority_fee_per_gas, out);
    encode_opt_u256(&tx.max_fee_per_gas, out);
    tx.gas.encode(out);
    tx.fee_token.encode(out);
    tx.calls.encode(out);
    tx.access_list.encode(out);
    tx.valid_after.encode(out);
    tx.valid_before.encode(out);

    match (&tx.signature, &tx.fee_payer_signature) {
        (None, None) => {}
        (Some(sender), None) => sender.encode(out),
        (sender, Some(fee_payer)) => {
            match sender {
                Some(sender) => sender.encode(out),
                None => out.put_u8(EMPTY_LIST_CODE),
            }
            fee_payer.encode(out);
        }
    }
}

fn signatures_length(tx: &Transaction) -> usize {
    match (&tx.signature, &tx.fee_payer_signature) {
        (None, None) => 0,
        (Some(sender), None) => sender.length(),
        (sender, Some(fee_payer)) => {
            sender.as_ref().map_or(1, Encodable::length) + fee_payer.length()
        }
    }
}

fn decode_body(buf: &mut &[u8]) -> alloy_rlp::Result<Transaction> {
    let header = Header::decode(buf)?;
    if !header.list {
        return Err(alloy_rlp::Error::UnexpectedString);
    }
    if buf.len() < header.payload_length {
        return Err(alloy_rlp::Error::InputTooShort);
    }
    let data: &[u8] = *buf;
    let (mut payload, rest) = data.split_at(header.payload_length);
    let fields = &mut payload;

    let mut tx = Transaction {
        chain_id: decode_opt_u256(fields)?,
        nonce: Decodable::decode(fields)?,
        nonce_key: decode_opt_u256(fields)?,
        max_priority_fee_per_gas: decode_opt_u256(fields)?,
        max_fee_per_gas: decode_opt_u256(fields)?,
        gas: Decodable::decode(fields)?,
        fee_token: Decodable::decode(fields)?,
        calls: Decodable::decode(fields)?,
        access_list: Decodable::decode(fields)?,
        valid_after: Decodable::decode(fields)?,
        valid_before: Decodable::decode(fields)?,
        signature: None,
        fee_payer_signature: None,
    };

    if !fields.is_empty() {
        tx.signature = if fields.first() == Some(&EMPTY_LIST_CODE) {
            fields.advance(1);
            None
        } else {
            Some(Signature::decode(fields)?)
        };

        if !fields.is_empty() {
            tx.fee_payer_signature = Some(Signature::decode(fields)?);
        } else if tx.signature.is_none() {
            return Err(alloy_rlp::Error::Custom("dangling signature placeholder"));
        }

        if !fields.is_empty() {
            return Err(alloy_rlp::Error::UnexpectedLength);
        }
    }

    *buf = rest;
    Ok(tx)
}

// ---------------------------------------------------------------------------
// Optional integers
// ---------------------------------------------------------------------------

fn opt_u256_length(value: &Option<U256>) -> usize {
    value.as_ref().map_or(1, Encodable::length)
}

fn encode_opt_u256(value: &Option<U256>, out: &mut dyn BufMut) {
    match value {
        Some(value) => value.encode(out),
        None => out.put_u8(EMPTY_LIST_CODE),
    }
}

fn decode_opt_u256(buf: &mut &[u8]) -> alloy_rlp::Result<Option<U256>> {
    match buf.first() {
        Some(&EMPTY_LIST_CODE) => {
            buf.advance(1);
            Ok(None)
        }
        Some(_) => U256::decode(buf).map(Some),
        None => Err(alloy_rlp::Error::InputTooShort),
    }
}

/// Decodes an RLP list header and checks the payload is fully consumed by
/// `f`.
fn decode_list<T>(
    buf: &mut &[u8],
    f: impl FnOnce(&mut &[u8]) -> alloy_rlp::Result<T>,
) -> alloy_rlp::Result<T> {
    let header = Header::decode(buf)?;
    if !header.list {
        return Err(alloy_rlp::Error::UnexpectedString);
    }
    let remaining = buf.len();
    if header.payload_length > remaining {
        return Err(alloy_rlp::Error::InputTooShort);
    }

    let this = f(&mut *buf)?;

    if buf.len() + header.payload_length != remaining {
        return Err(alloy_rlp::Error::UnexpectedLength);
    }
    Ok(this)
}

// ---------------------------------------------------------------------------
// Call
// ---------------------------------------------------------------------------

impl Call {
    fn rlp_payload_length(&self) -> usize {
        self.to.as_ref().map_or(1, Encodable::length)
            + opt_u256_length(&self.value)
            + self.data.length()
    }
}

impl Encodable for Call {
    fn encode(&self, out: &mut dyn BufMut) {
        list_header(self.rlp_payload_length()).encode(out);
        match &self.to {
            Some(to) => to.encode(out),
            None => out.put_u8(EMPTY_STRING_CODE),
        }
        encode_opt_u256(&self.value, out);
        self.data.encode(out);
    }

    fn length(&self) -> usize {
        list_header(self.rlp_payload_length()).length_with_payload()
    }
}

impl Decodable for Call {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        decode_list(buf, |buf| {
            let to = match buf.first() {
                Some(&EMPTY_STRING_CODE) => {
                    buf.advance(1);
                    None
                }
                Some(_) => Some(Address::decode(buf)?),
                None => return Err(alloy_rlp::Error::InputTooShort),
            };
            Ok(Self {
                to,
                value: decode_opt_u256(buf)?,
                data: Bytes::decode(buf)?,
            })
        })
    }
}

// ---------------------------------------------------------------------------
// AccessTuple
// ---------------------------------------------------------------------------

impl AccessTuple {
    fn rlp_payload_length(&self) -> usize {
        self.address.length() + self.storage_keys.length()
    }
}

impl Encodable for AccessTuple {
    fn encode(&self, out: &mut dyn BufMut) {
        list_header(self.rlp_payload_length()).encode(out);
        self.address.encode(out);
        self.storage_keys.encode(out);
    }

    fn length(&self) -> usize {
        list_header(self.rlp_payload_length()).length_with_payload()
    }
}

impl Decodable for AccessTuple {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        decode_list(buf, |buf| {
            Ok(Self {
                address: Decodable::decode(buf)?,
                storage_keys: Vec::<B256>::decode(buf)?,
            })
        })
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

impl Signature {
    fn rlp_payload_length(&self) -> usize {
        self.r.length() + self.s.length() + self.y_parity.length()
    }
}

impl Encodable for Signature {
    fn encode(&self, out: &mut dyn BufMut) {
        list_header(self.rlp_payload_length()).encode(out);
        self.r.encode(out);
        self.s.encode(out);
        self.y_parity.encode(out);
    }

    fn length(&self) -> usize {
        list_header(self.rlp_payload_length()).length_with_payload()
    }
}

impl Decodable for Signature {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        decode_list(buf, |buf| {
            Ok(Self {
                r: Decodable::decode(buf)?,
                s: Decodable::decode(buf)?,
                y_parity: Decodable::decode(buf)?,
            })
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
