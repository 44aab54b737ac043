//! # Transaction Model
//!
//! Unsigned ledger transactions: payments and application calls. Every
//! transaction is built from the network's suggested parameters with the fee
//! forced to [`FLAT_FEE`].

use shared_types::{Address, ApplicationIndex, Round};

use crate::ports::SuggestedParams;

/// Fee paid by every transaction, in micro-units.
pub const FLAT_FEE: u64 = 1000;

/// What an application call does to the caller's relationship with the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum OnCompletion {
    /// Run the approval program only.
    #[default]
    NoOp = 0,
    /// Allocate local state for the caller.
    OptIn = 1,
    /// Release the caller's local state.
    CloseOut = 2,
    /// Release local state regardless of the approval program.
    ClearState = 3,
    /// Replace the programs.
    UpdateApplication = 4,
    /// Delete the application.
    DeleteApplication = 5,
}

impl OnCompletion {
    /// Numeric wire value.
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self as u64
    }
}

/// Storage allotment of a stateful contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateSchema {
    /// Integer slots.
    pub num_uints: u64,
    /// Byte-slice slots.
    pub num_byte_slices: u64,
}

impl StateSchema {
    /// A schema with the given slot counts.
    #[must_use]
    pub const fn new(num_uints: u64, num_byte_slices: u64) -> Self {
        Self {
            num_uints,
            num_byte_slices,
        }
    }

    /// Returns true if no slots are allotted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_uints == 0 && self.num_byte_slices == 0
    }
}

/// An application call: either a create (index 0, programs present) or a
/// call into an existing application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationCall {
    /// Target application; 0 creates a new one.
    pub app_id: ApplicationIndex,
    /// Completion action.
    pub on_complete: OnCompletion,
    /// Arguments passed to the approval program.
    pub args: Vec<Vec<u8>>,
    /// Extra accounts the program may inspect.
    pub accounts: Vec<Address>,
    /// Approval program bytecode (create only).
    pub approval_program: Vec<u8>,
    /// Clear program bytecode (create only).
    pub clear_program: Vec<u8>,
    /// Global state allotment (create only).
    pub global_schema: StateSchema,
    /// Per-account state allotment (create only).
    pub local_schema: StateSchema,
}

impl ApplicationCall {
    /// Creates a new application from compiled programs.
    #[must_use]
    pub fn create(
        approval_program: Vec<u8>,
        clear_program: Vec<u8>,
        global_schema: StateSchema,
        local_schema: StateSchema,
    ) -> Self {
        Self {
            approval_program,
            clear_program,
            global_schema,
            local_schema,
            ..Self::default()
        }
    }

    /// Calls an existing application.
    #[must_use]
    pub fn call(app_id: ApplicationIndex, on_complete: OnCompletion) -> Self {
        Self {
            app_id,
            on_complete,
            ..Self::default()
        }
    }

    /// Appends an approval-program argument.
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<Vec<u8>>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends an account reference.
    #[must_use]
    pub fn with_account(mut self, account: Address) -> Self {
        self.accounts.push(account);
        self
    }

    /// Returns true if this call creates an application.
    #[must_use]
    pub fn is_create(&self) -> bool {
        self.app_id == 0
    }
}

/// Type-specific part of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    /// Transfer of micro-units.
    Payment {
        /// Recipient.
        receiver: Address,
        /// Amount in micro-units.
        amount: u64,
    },
    /// Application call.
    ApplicationCall(ApplicationCall),
}

impl TransactionKind {
    /// Wire type tag.
    #[must_use]
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Payment { .. } => "pay",
            Self::ApplicationCall(_) => "appl",
        }
    }
}

/// A transaction ready to be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    /// Sending account.
    pub sender: Address,
    /// Fee in micro-units.
    pub fee: u64,
    /// First round the transaction is valid in.
    pub first_valid: Round,
    /// Last round the transaction is valid in.
    pub last_valid: Round,
    /// Network genesis id.
    pub genesis_id: String,
    /// Network genesis hash.
    pub genesis_hash: [u8; 32],
    /// Free-form note.
    pub note: Vec<u8>,
    /// Payment or application call.
    pub kind: TransactionKind,
}

impl UnsignedTransaction {
    /// Builds a transaction from suggested parameters, with the flat fee.
    #[must_use]
    pub fn new(sender: Address, params: &SuggestedParams, kind: TransactionKind) -> Self {
        Self {
            sender,
            fee: FLAT_FEE,
            first_valid: params.first_valid,
            last_valid: params.last_valid,
            genesis_id: params.genesis_id.clone(),
            genesis_hash: params.genesis_hash,
            note: Vec::new(),
            kind,
        }
    }

    /// Attaches a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<Vec<u8>>) -> Self {
        self.note = note.into();
        self
    }
}
