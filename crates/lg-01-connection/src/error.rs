//! Error types for connection resolution and configuration loading.

use std::path::PathBuf;

use shared_types::{codes, ErrorCode};
use thiserror::Error;

/// Failures resolving an endpoint credential.
#[derive(Debug, Clone, Error)]
pub enum ConnectionError {
    /// The token file could not be read.
    #[error("An error occurred while reading token file {path:?}: {reason}")]
    TokenUnreadable { path: PathBuf, reason: String },

    /// The port file could not be read.
    #[error("An error occurred while reading port file {path:?}: {reason}")]
    PortUnreadable { path: PathBuf, reason: String },

    /// The resolved port text is not a TCP port.
    #[error("Invalid port value: {value:?}")]
    PortInvalid { value: String },
}

impl ErrorCode for ConnectionError {
    fn code(&self) -> u32 {
        match self {
            Self::TokenUnreadable { .. } => codes::TOKEN_UNREADABLE,
            Self::PortUnreadable { .. } => codes::PORT_UNREADABLE,
            Self::PortInvalid { .. } => codes::PORT_INVALID,
        }
    }
}

/// Failures loading the gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A recognized key carries a value of the wrong shape.
    #[error("Invalid value for configuration key {key:?}: {value:?}")]
    InvalidValue { key: String, value: String },
}
