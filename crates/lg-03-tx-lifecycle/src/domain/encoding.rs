//! # Canonical Encoding and Signing
//!
//! Transactions are encoded as MessagePack maps with keys in ascending order
//! and every zero or empty field omitted. The signature and the operation id
//! both cover the domain-separated bytes `"TX" ‖ encoding`.

use data_encoding::BASE32_NOPAD;
use lg_02_key_gateway::SigningIdentity;
use serde::Serialize;
use serde_bytes::Bytes;
use sha2::{Digest, Sha512_256};
use shared_types::{Address, OperationId, Round};

use super::transaction::{StateSchema, TransactionKind, UnsignedTransaction};
use crate::error::LifecycleError;

/// Domain-separation prefix for transaction signatures and ids.
pub const TX_TAG: &[u8] = b"TX";

// =============================================================================
// WIRE RECORDS
// =============================================================================
//
// Field order is the canonical key order.

#[derive(Serialize)]
struct SchemaWire {
    #[serde(skip_serializing_if = "is_zero")]
    nbs: u64,
    #[serde(skip_serializing_if = "is_zero")]
    nui: u64,
}

#[derive(Serialize)]
struct TransactionWire<'a> {
    #[serde(skip_serializing_if = "is_zero")]
    amt: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    apaa: Vec<&'a Bytes>,
    #[serde(skip_serializing_if = "is_zero")]
    apan: u64,
    #[serde(skip_serializing_if = "is_empty_bytes")]
    apap: &'a Bytes,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    apat: Vec<&'a Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    apgs: Option<SchemaWire>,
    #[serde(skip_serializing_if = "is_zero")]
    apid: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    apls: Option<SchemaWire>,
    #[serde(skip_serializing_if = "is_empty_bytes")]
    apsu: &'a Bytes,
    #[serde(skip_serializing_if = "is_zero")]
    fee: u64,
    #[serde(skip_serializing_if = "is_zero")]
    fv: u64,
    #[serde(skip_serializing_if = "str::is_empty")]
    gen: &'a str,
    gh: &'a Bytes,
    #[serde(skip_serializing_if = "is_zero")]
    lv: u64,
    #[serde(skip_serializing_if = "is_empty_bytes")]
    note: &'a Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    rcv: Option<&'a Bytes>,
    snd: &'a Bytes,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct SignedTransactionWire<'a> {
    sig: &'a Bytes,
    txn: &'a TransactionWire<'a>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(value: &u64) -> bool {
    *value == 0
}

fn is_empty_bytes(value: &&Bytes) -> bool {
    value.is_empty()
}

fn schema_wire(schema: StateSchema) -> Option<SchemaWire> {
    (!schema.is_empty()).then_some(SchemaWire {
        nbs: schema.num_byte_slices,
        nui: schema.num_uints,
    })
}

fn address_bytes(address: &Address) -> &Bytes {
    Bytes::new(address.as_bytes())
}

impl<'a> TransactionWire<'a> {
    fn from_transaction(tx: &'a UnsignedTransaction) -> Self {
        let empty = Bytes::new(&[]);
        let mut wire = Self {
            amt: 0,
            apaa: Vec::new(),
            apan: 0,
            apap: empty,
            apat: Vec::new(),
            apgs: None,
            apid: 0,
            apls: None,
            apsu: empty,
            fee: tx.fee,
            fv: tx.first_valid,
            gen: &tx.genesis_id,
            gh: Bytes::new(&tx.genesis_hash),
            lv: tx.last_valid,
            note: Bytes::new(&tx.note),
            rcv: None,
            snd: address_bytes(&tx.sender),
            kind: tx.kind.type_tag(),
        };

        match &tx.kind {
            TransactionKind::Payment { receiver, amount } => {
                wire.amt = *amount;
                wire.rcv = (*receiver != Address::ZERO).then(|| address_bytes(receiver));
            }
            TransactionKind::ApplicationCall(call) => {
                wire.apaa = call.args.iter().map(|a| Bytes::new(a)).collect();
                wire.apan = call.on_complete.as_u64();
                wire.apap = Bytes::new(&call.approval_program);
                wire.apat = call.accounts.iter().map(address_bytes).collect();
                wire.apgs = schema_wire(call.global_schema);
                wire.apid = call.app_id;
                wire.apls = schema_wire(call.local_schema);
                wire.apsu = Bytes::new(&call.clear_program);
            }
        }
        wire
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Canonical encoding of an unsigned transaction.
///
/// # Errors
///
/// [`LifecycleError::Encode`] if serialization fails.
pub fn encode_transaction(tx: &UnsignedTransaction) -> Result<Vec<u8>, LifecycleError> {
    rmp_serde::to_vec_named(&TransactionWire::from_transaction(tx))
        .map_err(|e| LifecycleError::Encode(e.to_string()))
}

/// Operation id of an encoded transaction.
#[must_use]
pub fn operation_id(encoded: &[u8]) -> OperationId {
    let mut hasher = Sha512_256::new();
    hasher.update(TX_TAG);
    hasher.update(encoded);
    OperationId::new(BASE32_NOPAD.encode(&hasher.finalize()))
}

/// A signed transaction ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Id the ledger will assign.
    pub id: OperationId,
    /// First round the transaction is valid in.
    pub first_valid: Round,
    /// Wire bytes of `{sig, txn}`.
    pub bytes: Vec<u8>,
}

impl SignedTransaction {
    /// Signs `tx` with `identity`.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::Encode`] if serialization fails.
    pub fn sign(tx: &UnsignedTransaction, identity: &SigningIdentity) -> Result<Self, LifecycleError> {
        let wire = TransactionWire::from_transaction(tx);
        let encoded =
            rmp_serde::to_vec_named(&wire).map_err(|e| LifecycleError::Encode(e.to_string()))?;

        let mut message = Vec::with_capacity(TX_TAG.len() + encoded.len());
        message.extend_from_slice(TX_TAG);
        message.extend_from_slice(&encoded);
        let signature = identity.sign(&message);

        let bytes = rmp_serde::to_vec_named(&SignedTransactionWire {
            sig: Bytes::new(&signature),
            txn: &wire,
        })
        .map_err(|e| LifecycleError::Encode(e.to_string()))?;

        Ok(Self {
            id: operation_id(&encoded),
            first_valid: tx.first_valid,
            bytes,
        })
    }
}
