//! # Gateway Runtime
//!
//! The public surface of the gateway. A [`Session`] is opened from a
//! [`GatewayConfig`](lg_01_connection::GatewayConfig), owns the ledger and
//! key-custody clients, and answers every operation with a
//! [`GatewayReply`]: the produced artifact plus exactly one
//! [`OperationResult`](shared_types::OperationResult).
//!
//! ## Operations
//!
//! | Operation | Artifact | Failure codes |
//! |-----------|----------|---------------|
//! | `open` | session | 20, 21, 22, 23, 24 |
//! | `account_balance` | micro-units | 1, 204 |
//! | `fund_account` | operation id | 1, 10, 200, 201, 301 |
//! | `create_account` | address + phrase | 1, 2, 101, 102, 203 |
//! | `export_account_secret_phrase` | phrase | 1, 2, 101, 102 |
//! | `deploy_contract` | `address@index` | 1, 3 to 8, 10, 120, 308 |
//! | `opt_in` .. `revoke` | operation id | 1, 10, 205 to 210, 302 to 307 |
//!
//! A closed session answers every operation with code 1.
//!
//! ## Example
//!
//! ```no_run
//! use gateway_runtime::prelude::*;
//!
//! # async fn run() -> Result<(), SessionError> {
//! let config = GatewayConfig::from_env();
//! let mut session = Session::open(config).await?;
//! let deployed = session.deploy_contract("abandon ...").await;
//! println!("{}", deployed.result);
//! session.close();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod reply;
pub mod session;

pub use error::SessionError;
pub use reply::GatewayReply;
pub use session::{Session, FUNDING_NOTE};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::error::SessionError;
    pub use crate::reply::GatewayReply;
    pub use crate::session::Session;
    pub use lg_01_connection::GatewayConfig;
    pub use lg_03_tx_lifecycle::CancellationSignal;
    pub use lg_05_subscriptions::AppCallKind;
    pub use shared_types::{Address, LinkedContract, OperationId, OperationResult};
}
