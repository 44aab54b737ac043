//! # LG-01 Connection Resolver
//!
//! Resolves endpoint credentials (token, host, port) for the two backend
//! services the gateway talks to, and owns the typed gateway configuration.
//!
//! ## Resolution Policy
//!
//! | Source | Precedence | Failure code |
//! |--------|------------|--------------|
//! | Explicit value in configuration | Always wins, no file access | - |
//! | First line of the credential file | Fallback | 20 (token), 21 (port) |
//! | `host:port` line | Port is the part after the last `:` | 24 if not a port |
//!
//! Resolved values are cached by the resolver: a second call never re-reads
//! the file.
//!
//! ## Configuration Surface
//!
//! [`GatewayConfig`] enumerates every recognized option as a named field with
//! an explicit default. It loads from a flat `key=value;key=value` string;
//! unrecognized keys are logged and ignored.
//!
//! ## Usage Example
//!
//! ```ignore
//! use lg_01_connection::prelude::*;
//!
//! let config = GatewayConfig::from_env().with_connection_string("atoken=abc;anetprt=4001")?;
//! let ledger = ConnectionResolver::new(ServiceKind::Ledger, config.ledger.clone());
//! let endpoint = ledger.resolve_endpoint()?;
//! assert_eq!(endpoint.base_url(), "http://localhost:4001");
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::FsCredentialSource;
pub use config::{ContractPaths, EndpointConfig, GatewayConfig, WalletConfig};
pub use domain::{Endpoint, ServiceKind};
pub use error::{ConfigError, ConnectionError};
pub use ports::CredentialSource;
pub use service::ConnectionResolver;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::FsCredentialSource;
    pub use crate::config::{ContractPaths, EndpointConfig, GatewayConfig, WalletConfig};
    pub use crate::domain::{parse_port_line, resolve_port, resolve_token, Endpoint, ServiceKind};
    pub use crate::error::{ConfigError, ConnectionError};
    pub use crate::ports::CredentialSource;
    pub use crate::service::ConnectionResolver;
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
