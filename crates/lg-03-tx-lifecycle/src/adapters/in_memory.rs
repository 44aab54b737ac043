//! # In-Memory Ledger
//!
//! Ledger implementation for testing. Rounds advance only when a caller
//! waits on them; each submission follows a scripted path to its verdict;
//! every compile, submission and round wait is recorded for inspection.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_bytes::ByteBuf;
use sha2::{Digest, Sha512_256};
use shared_types::{Address, ApplicationIndex, OperationId, Round};

use crate::domain::operation_id;
use crate::error::LedgerError;
use crate::ports::{
    AccountInfo, CompiledProgram, LedgerClient, NodeStatus, PendingTransactionInfo,
    SuggestedParams,
};

/// Round the in-memory ledger starts at.
pub const GENESIS_ROUND: Round = 1000;

/// First application index handed out.
pub const FIRST_APPLICATION_INDEX: ApplicationIndex = 1;

/// Validity window of suggested parameters.
const VALIDITY_WINDOW: Round = 1000;

/// Prefix hashed with a program to form its address.
const PROGRAM_TAG: &[u8] = b"Program";

/// Ledger calls that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerCall {
    /// `suggested_params`
    SuggestedParams,
    /// `compile`
    Compile,
    /// `submit`
    Submit,
    /// `status`
    Status,
    /// `status_after_round`
    StatusAfterRound,
    /// `pending_transaction_info`
    PendingTransactionInfo,
    /// `account_info`
    AccountInfo,
}

/// How a submitted transaction reaches its verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationScript {
    /// Finalized once the ledger is `n` rounds past the submission round.
    ConfirmAfter(Round),
    /// Evicted from the pending pool with the given reason.
    Reject(String),
    /// Stays pending forever.
    Never,
}

/// A submission as the ledger decoded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedTransaction {
    /// Id assigned at submission.
    pub id: OperationId,
    /// Wire type tag (`pay`, `appl`).
    pub kind: String,
    /// Sender.
    pub sender: Address,
    /// Payment receiver.
    pub receiver: Option<Address>,
    /// Payment amount.
    pub amount: u64,
    /// Flat fee paid.
    pub fee: u64,
    /// Target application; 0 for creates.
    pub app_id: ApplicationIndex,
    /// On-completion action.
    pub on_complete: u64,
    /// Approval-program arguments.
    pub args: Vec<Vec<u8>>,
    /// Account references.
    pub accounts: Vec<Address>,
    /// Note.
    pub note: Vec<u8>,
}

// =============================================================================
// WIRE PROBE
// =============================================================================

#[derive(Deserialize)]
struct SignedProbe {
    txn: TxnProbe,
}

#[derive(Deserialize)]
struct TxnProbe {
    #[serde(rename = "type")]
    kind: String,
    snd: ByteBuf,
    #[serde(default)]
    rcv: Option<ByteBuf>,
    #[serde(default)]
    amt: u64,
    #[serde(default)]
    fee: u64,
    #[serde(default)]
    apid: u64,
    #[serde(default)]
    apan: u64,
    #[serde(default)]
    apaa: Vec<ByteBuf>,
    #[serde(default)]
    apat: Vec<ByteBuf>,
    #[serde(default)]
    note: Option<ByteBuf>,
}

fn address_from(bytes: &[u8]) -> Result<Address, LedgerError> {
    let key: [u8; 32] = bytes
        .try_into()
        .map_err(|_| LedgerError::Decode(format!("address has {} bytes", bytes.len())))?;
    Ok(Address::from_public_key(key))
}

/// The `txn` map inside a `{sig, txn}` envelope.
///
/// The envelope is a two-entry map: the 64-byte signature entry, then the
/// `txn` key followed by the transaction itself.
fn transaction_bytes(signed: &[u8]) -> &[u8] {
    const SIG_ENTRY_LEN: usize = 1 + 4 + 2 + 64;
    const TXN_KEY: &[u8] = &[0xa3, b't', b'x', b'n'];
    let body = SIG_ENTRY_LEN + TXN_KEY.len();
    match signed.get(SIG_ENTRY_LEN..body) {
        Some(key) if key == TXN_KEY => &signed[body..],
        _ => signed,
    }
}

fn decode_submission(signed: &[u8]) -> Result<RecordedTransaction, LedgerError> {
    let probe: SignedProbe =
        rmp_serde::from_slice(signed).map_err(|e| LedgerError::Api {
            status: 400,
            message: format!("msgpack decode error: {e}"),
        })?;
    let txn = probe.txn;

    Ok(RecordedTransaction {
        id: operation_id(transaction_bytes(signed)),
        kind: txn.kind,
        sender: address_from(&txn.snd)?,
        receiver: txn.rcv.as_deref().map(|b| address_from(b)).transpose()?,
        amount: txn.amt,
        fee: txn.fee,
        app_id: txn.apid,
        on_complete: txn.apan,
        args: txn.apaa.into_iter().map(ByteBuf::into_vec).collect(),
        accounts: txn
            .apat
            .iter()
            .map(|a| address_from(a))
            .collect::<Result<_, _>>()?,
        note: txn.note.map(ByteBuf::into_vec).unwrap_or_default(),
    })
}

// =============================================================================
// STATE
// =============================================================================

struct PendingEntry {
    submitted_round: Round,
    script: ConfirmationScript,
    application_index: Option<ApplicationIndex>,
    credited: bool,
    receiver: Option<Address>,
    amount: u64,
}

struct LedgerState {
    round: Round,
    genesis_id: String,
    genesis_hash: [u8; 32],
    faults: HashMap<LedgerCall, LedgerError>,
    compile_failures: Vec<String>,
    scripts: VecDeque<ConfirmationScript>,
    default_script: ConfirmationScript,
    pending: HashMap<OperationId, PendingEntry>,
    submissions: Vec<RecordedTransaction>,
    compiled: Vec<String>,
    round_waits: Vec<Round>,
    balances: HashMap<Address, u64>,
    next_application_index: ApplicationIndex,
}

/// In-memory ledger for testing.
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    /// A ledger at [`GENESIS_ROUND`] confirming every submission one round
    /// after it was made.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LedgerState {
                round: GENESIS_ROUND,
                genesis_id: "in-memory-v1".to_string(),
                genesis_hash: Sha512_256::digest(b"in-memory-v1").into(),
                faults: HashMap::new(),
                compile_failures: Vec::new(),
                scripts: VecDeque::new(),
                default_script: ConfirmationScript::ConfirmAfter(1),
                pending: HashMap::new(),
                submissions: Vec::new(),
                compiled: Vec::new(),
                round_waits: Vec::new(),
                balances: HashMap::new(),
                next_application_index: FIRST_APPLICATION_INDEX,
            }),
        }
    }

    /// Makes every call of `call` fail with `error` until cleared.
    pub fn set_fault(&self, call: LedgerCall, error: LedgerError) {
        self.state.lock().faults.insert(call, error);
    }

    /// Clears a fault set with [`InMemoryLedger::set_fault`].
    pub fn clear_fault(&self, call: LedgerCall) {
        self.state.lock().faults.remove(&call);
    }

    /// Makes compilation fail for sources containing `pattern`.
    pub fn fail_compile_containing(&self, pattern: &str) {
        self.state.lock().compile_failures.push(pattern.to_string());
    }

    /// Script for the next submission; later submissions use further queued
    /// scripts, then the default.
    pub fn script_next(&self, script: ConfirmationScript) {
        self.state.lock().scripts.push_back(script);
    }

    /// Script for every submission without a queued one.
    pub fn set_default_script(&self, script: ConfirmationScript) {
        self.state.lock().default_script = script;
    }

    /// Sets an account balance.
    pub fn set_balance(&self, address: Address, amount: u64) {
        self.state.lock().balances.insert(address, amount);
    }

    /// Current round.
    #[must_use]
    pub fn round(&self) -> Round {
        self.state.lock().round
    }

    /// Every accepted submission, in order.
    #[must_use]
    pub fn submissions(&self) -> Vec<RecordedTransaction> {
        self.state.lock().submissions.clone()
    }

    /// Every compiled source, in order.
    #[must_use]
    pub fn compiled_sources(&self) -> Vec<String> {
        self.state.lock().compiled.clone()
    }

    /// Every round waited on, in order.
    #[must_use]
    pub fn round_waits(&self) -> Vec<Round> {
        self.state.lock().round_waits.clone()
    }

    /// Address of a compiled program.
    #[must_use]
    pub fn program_address(program: &[u8]) -> Address {
        let mut hasher = Sha512_256::new();
        hasher.update(PROGRAM_TAG);
        hasher.update(program);
        Address::from_public_key(hasher.finalize().into())
    }

    fn check(state: &LedgerState, call: LedgerCall) -> Result<(), LedgerError> {
        state.faults.get(&call).cloned().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn suggested_params(&self) -> Result<SuggestedParams, LedgerError> {
        let state = self.state.lock();
        Self::check(&state, LedgerCall::SuggestedParams)?;
        Ok(SuggestedParams {
            fee: 0,
            min_fee: crate::domain::FLAT_FEE,
            first_valid: state.round,
            last_valid: state.round + VALIDITY_WINDOW,
            genesis_id: state.genesis_id.clone(),
            genesis_hash: state.genesis_hash,
        })
    }

    async fn compile(&self, source: &str) -> Result<CompiledProgram, LedgerError> {
        let mut state = self.state.lock();
        Self::check(&state, LedgerCall::Compile)?;
        if state.compile_failures.iter().any(|p| source.contains(p.as_str())) {
            return Err(LedgerError::Api {
                status: 400,
                message: "program compilation failed".into(),
            });
        }
        state.compiled.push(source.to_string());

        let program = source.as_bytes().to_vec();
        Ok(CompiledProgram {
            hash: Self::program_address(&program).encode(),
            program,
        })
    }

    async fn submit(&self, signed: &[u8]) -> Result<OperationId, LedgerError> {
        let mut state = self.state.lock();
        Self::check(&state, LedgerCall::Submit)?;

        let record = decode_submission(signed)?;
        let script = state
            .scripts
            .pop_front()
            .unwrap_or_else(|| state.default_script.clone());
        let application_index = (record.kind == "appl" && record.app_id == 0).then(|| {
            let index = state.next_application_index;
            state.next_application_index += 1;
            index
        });

        let id = record.id.clone();
        let entry = PendingEntry {
            submitted_round: state.round,
            script,
            application_index,
            credited: false,
            receiver: record.receiver,
            amount: record.amount,
        };
        state.pending.insert(id.clone(), entry);
        state.submissions.push(record);
        Ok(id)
    }

    async fn status(&self) -> Result<NodeStatus, LedgerError> {
        let state = self.state.lock();
        Self::check(&state, LedgerCall::Status)?;
        Ok(NodeStatus {
            last_round: state.round,
        })
    }

    /// Advances the ledger to `round` without suspending.
    async fn status_after_round(&self, round: Round) -> Result<NodeStatus, LedgerError> {
        let mut state = self.state.lock();
        Self::check(&state, LedgerCall::StatusAfterRound)?;
        state.round_waits.push(round);
        state.round = state.round.max(round);
        Ok(NodeStatus {
            last_round: state.round,
        })
    }

    async fn pending_transaction_info(
        &self,
        id: &OperationId,
    ) -> Result<PendingTransactionInfo, LedgerError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        Self::check(state, LedgerCall::PendingTransactionInfo)?;

        let round = state.round;
        let entry = state.pending.get_mut(id).ok_or_else(|| LedgerError::Api {
            status: 404,
            message: format!("transaction {id} not found"),
        })?;

        let info = match &entry.script {
            ConfirmationScript::ConfirmAfter(delay) if round >= entry.submitted_round + delay => {
                let confirmed_round = entry.submitted_round + delay;
                let mut info = PendingTransactionInfo::confirmed(confirmed_round);
                info.application_index = entry.application_index;
                if !entry.credited {
                    entry.credited = true;
                    if let Some(receiver) = entry.receiver {
                        *state.balances.entry(receiver).or_default() += entry.amount;
                    }
                }
                info
            }
            ConfirmationScript::Reject(reason) => PendingTransactionInfo::rejected(reason.clone()),
            _ => PendingTransactionInfo::pending(),
        };
        Ok(info)
    }

    async fn account_info(&self, address: &Address) -> Result<AccountInfo, LedgerError> {
        let state = self.state.lock();
        Self::check(&state, LedgerCall::AccountInfo)?;
        Ok(AccountInfo {
            address: *address,
            amount: state.balances.get(address).copied().unwrap_or_default(),
            round: state.round,
        })
    }
}
