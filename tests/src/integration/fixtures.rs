//! Shared fixtures: an in-memory gateway with contract sources on disk.

use std::fs;
use std::sync::{Arc, Once};

use gateway_runtime::Session;
use lg_01_connection::{ContractPaths, GatewayConfig};
use lg_02_key_gateway::{encode_seed, InMemoryKeyCustody, SigningIdentity};
use lg_03_tx_lifecycle::InMemoryLedger;
use shared_types::Address;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

pub type InMemorySession = Session<InMemoryLedger, InMemoryKeyCustody>;

pub const STATELESS_TEMPLATE: &str = "#pragma version 4\naddr _RECEIVERADDRESS_\npop\nint 1";
pub const APPROVAL_PROGRAM: &str = "#pragma version 4\ntxn ApplicationID\nint 0\n==\nbnz create\nint 1";
pub const CLEAR_PROGRAM: &str = "#pragma version 4\nint 1";

static TRACING: Once = Once::new();

/// Routes gateway logs to the test writer; filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Secret phrase of the account seeded with `fill`.
pub fn phrase(fill: u8) -> String {
    encode_seed(&[fill; 32]).to_string()
}

/// Address of the account seeded with `fill`.
pub fn address(fill: u8) -> Address {
    SigningIdentity::from_seed(&[fill; 32]).address()
}

/// Writes the three contract sources beneath `root`.
pub fn write_contracts(paths: &ContractPaths) {
    for (path, text) in [
        (paths.stateless_template_path(), STATELESS_TEMPLATE),
        (paths.approval_program_path(), APPROVAL_PROGRAM),
        (paths.clear_program_path(), CLEAR_PROGRAM),
    ] {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }
}

/// A session over in-memory services, funded by the account seeded with 9.
pub struct Gateway {
    pub ledger: Arc<InMemoryLedger>,
    pub custody: Arc<InMemoryKeyCustody>,
    pub session: InMemorySession,
    pub user_wallet_id: String,
    _contracts: TempDir,
}

impl Gateway {
    pub fn new() -> Self {
        init_tracing();
        let contracts = tempfile::tempdir().unwrap();
        let mut config = GatewayConfig::with_dirs("/nonexistent", contracts.path())
            .with_connection_string(&format!("ownmne={};rounds=4", phrase(9)))
            .unwrap();
        config.contracts = ContractPaths::with_root(contracts.path());
        write_contracts(&config.contracts);

        let ledger = Arc::new(InMemoryLedger::new());
        let custody = Arc::new(InMemoryKeyCustody::new());
        let user_wallet_id = custody.add_wallet(&config.user_wallet.name, &config.user_wallet.password);
        let session = Session::from_parts(config, Arc::clone(&ledger), Some(Arc::clone(&custody)));

        Self {
            ledger,
            custody,
            session,
            user_wallet_id,
            _contracts: contracts,
        }
    }
}
