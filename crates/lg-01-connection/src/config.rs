//! # Gateway Configuration
//!
//! Every recognized option is a named field with an explicit default.
//! Defaults come from the environment ([`GatewayConfig::from_env`]); a flat
//! `key=value;key=value` connection string then overrides them.
//!
//! | Key | Field |
//! |-----|-------|
//! | `atokf` / `anetf` | ledger token / net file |
//! | `atoken` / `anetprt` / `anetip` | explicit ledger token / port / host |
//! | `ktokf` / `knetf` | keystore token / net file |
//! | `ktoken` / `knetprt` / `knetip` | explicit keystore token / port / host |
//! | `scrf` | contract root folder |
//! | `sttp` / `tapp` / `tcpp` | stateless template / approval / clear program, relative to `scrf` |
//! | `usrwlab` / `usrwpwd` | wallet used to create user accounts |
//! | `ownmne` | owner secret phrase funding new accounts |
//! | `rounds` | confirmation round budget |

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ConfigError;

/// Environment variable naming the ledger node data directory.
pub const DATA_DIR_ENV: &str = "ALGORAND_DATA";
/// Environment variable naming the contract root folder.
pub const CONTRACT_ROOT_ENV: &str = "DOP_SMART_CONTRACT_ROOT_FOLDER";
/// Subdirectory of the data directory holding key-custody credentials.
pub const KEYSTORE_SUBDIR: &str = "kmd-v0.5";
/// Wallet used to create user accounts unless configured otherwise.
pub const DEFAULT_USER_WALLET: &str = "unencrypted-default-wallet";
/// Rounds the confirmation poll waits before giving up.
pub const DEFAULT_CONFIRMATION_ROUNDS: u64 = 4;

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_CONTRACT_ROOT: &str = "./contracts";
/// Stateless template, relative to the contract root.
pub const DEFAULT_STATELESS_TEMPLATE: &str = "dop.account/dop.account.teal.template";
/// Approval program, relative to the contract root.
pub const DEFAULT_APPROVAL_PROGRAM: &str = "dop.stateful/dop.stateful.teal";
/// Clear program, relative to the contract root.
pub const DEFAULT_CLEAR_PROGRAM: &str = "dop.clear/basicClear.teal";

/// Where to find the credentials of one backend service.
#[derive(Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Explicit API token; wins over `token_file`.
    pub token: Option<String>,
    /// File whose first line is the API token.
    pub token_file: PathBuf,
    /// Explicit host; `localhost` when absent.
    pub host: Option<String>,
    /// Explicit port text; wins over `net_file`.
    pub port: Option<String>,
    /// File whose first line is `host:port`.
    pub net_file: PathBuf,
}

impl EndpointConfig {
    /// File-based configuration rooted at `dir`, using `<name>.token` and
    /// `<name>.net`.
    #[must_use]
    pub fn from_files(dir: &Path, name: &str) -> Self {
        Self {
            token: None,
            token_file: dir.join(format!("{name}.token")),
            host: None,
            port: None,
            net_file: dir.join(format!("{name}.net")),
        }
    }
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("token_file", &self.token_file)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("net_file", &self.net_file)
            .finish()
    }
}

/// Locations of the contract program sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractPaths {
    /// Folder the relative paths below are joined onto.
    pub root: PathBuf,
    /// Stateless contract template, relative to `root`.
    pub stateless_template: PathBuf,
    /// Stateful approval program, relative to `root`.
    pub approval_program: PathBuf,
    /// Stateful clear program, relative to `root`.
    pub clear_program: PathBuf,
}

impl ContractPaths {
    /// Default layout beneath `root`.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            stateless_template: PathBuf::from(DEFAULT_STATELESS_TEMPLATE),
            approval_program: PathBuf::from(DEFAULT_APPROVAL_PROGRAM),
            clear_program: PathBuf::from(DEFAULT_CLEAR_PROGRAM),
        }
    }

    /// Full path of the stateless template.
    #[must_use]
    pub fn stateless_template_path(&self) -> PathBuf {
        self.root.join(&self.stateless_template)
    }

    /// Full path of the approval program.
    #[must_use]
    pub fn approval_program_path(&self) -> PathBuf {
        self.root.join(&self.approval_program)
    }

    /// Full path of the clear program.
    #[must_use]
    pub fn clear_program_path(&self) -> PathBuf {
        self.root.join(&self.clear_program)
    }
}

/// Wallet name and password.
#[derive(Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// Wallet name, matched exactly.
    pub name: String,
    /// Wallet password; may be empty.
    pub password: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_USER_WALLET.to_string(),
            password: String::new(),
        }
    }
}

impl fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConfig")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Complete gateway configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Ledger-execution service.
    pub ledger: EndpointConfig,
    /// Key-custody service.
    pub keystore: EndpointConfig,
    /// Contract program sources.
    pub contracts: ContractPaths,
    /// Wallet in which user accounts are created.
    pub user_wallet: WalletConfig,
    /// Secret phrase of the account funding new accounts.
    pub owner_secret_phrase: Option<String>,
    /// Round budget of the confirmation poll.
    pub confirmation_rounds: u64,
}

impl GatewayConfig {
    /// Defaults derived from `ALGORAND_DATA` and `DOP_SMART_CONTRACT_ROOT_FOLDER`.
    #[must_use]
    pub fn from_env() -> Self {
        let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        let contract_root =
            env::var(CONTRACT_ROOT_ENV).unwrap_or_else(|_| DEFAULT_CONTRACT_ROOT.to_string());
        Self::with_dirs(data_dir, contract_root)
    }

    /// Defaults for an explicit data directory and contract root.
    #[must_use]
    pub fn with_dirs(data_dir: impl AsRef<Path>, contract_root: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            ledger: EndpointConfig::from_files(data_dir, "algod"),
            keystore: EndpointConfig::from_files(&data_dir.join(KEYSTORE_SUBDIR), "kmd"),
            contracts: ContractPaths::with_root(contract_root),
            user_wallet: WalletConfig::default(),
            owner_secret_phrase: None,
            confirmation_rounds: DEFAULT_CONFIRMATION_ROUNDS,
        }
    }

    /// Applies a `key=value;key=value` connection string.
    ///
    /// Entries without `=` and unrecognized keys are logged and skipped.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] if `rounds` is not a positive integer.
    pub fn with_connection_string(mut self, connection: &str) -> Result<Self, ConfigError> {
        for entry in connection.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let Some((key, value)) = entry.split_once('=') else {
                warn!(entry, "Skipping malformed configuration entry");
                continue;
            };
            self.apply(key.trim(), value.trim())?;
        }
        Ok(self)
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "atokf" => self.ledger.token_file = PathBuf::from(value),
            "anetf" => self.ledger.net_file = PathBuf::from(value),
            "atoken" => self.ledger.token = Some(value.to_string()),
            "anetprt" => self.ledger.port = Some(value.to_string()),
            "anetip" => self.ledger.host = Some(value.to_string()),
            "ktokf" => self.keystore.token_file = PathBuf::from(value),
            "knetf" => self.keystore.net_file = PathBuf::from(value),
            "ktoken" => self.keystore.token = Some(value.to_string()),
            "knetprt" => self.keystore.port = Some(value.to_string()),
            "knetip" => self.keystore.host = Some(value.to_string()),
            "scrf" => self.contracts.root = PathBuf::from(value),
            "sttp" => self.contracts.stateless_template = PathBuf::from(value),
            "tapp" => self.contracts.approval_program = PathBuf::from(value),
            "tcpp" => self.contracts.clear_program = PathBuf::from(value),
            "usrwlab" => self.user_wallet.name = value.to_string(),
            "usrwpwd" => self.user_wallet.password = value.to_string(),
            "ownmne" => {
                self.owner_secret_phrase = (!value.is_empty()).then(|| value.to_string());
            }
            "rounds" => {
                self.confirmation_rounds = value
                    .parse::<u64>()
                    .ok()
                    .filter(|r| *r > 0)
                    .ok_or_else(|| ConfigError::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                    })?;
            }
            _ => {
                warn!(key, "Ignoring unrecognized configuration key");
                return Ok(());
            }
        }
        debug!(key, "Configuration key applied");
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::with_dirs(DEFAULT_DATA_DIR, DEFAULT_CONTRACT_ROOT)
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("ledger", &self.ledger)
            .field("keystore", &self.keystore)
            .field("contracts", &self.contracts)
            .field("user_wallet", &self.user_wallet)
            .field(
                "owner_secret_phrase",
                &self.owner_secret_phrase.as_ref().map(|_| "<redacted>"),
            )
            .field("confirmation_rounds", &self.confirmation_rounds)
            .finish()
    }
}
