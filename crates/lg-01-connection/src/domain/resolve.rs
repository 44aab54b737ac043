//! # Credential Precedence Rules
//!
//! An explicit value always wins and short-circuits file access. Otherwise
//! the first line of the designated file is used.

use std::path::Path;

use crate::error::ConnectionError;
use crate::ports::CredentialSource;

/// Resolves an API token.
///
/// # Errors
///
/// [`ConnectionError::TokenUnreadable`] if no explicit value is given and the
/// file cannot be read.
pub fn resolve_token<S: CredentialSource>(
    explicit: Option<&str>,
    path: &Path,
    source: &S,
) -> Result<String, ConnectionError> {
    if let Some(token) = explicit {
        return Ok(token.to_string());
    }

    source
        .read_first_line(path)
        .map_err(|e| ConnectionError::TokenUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Resolves a TCP port.
///
/// # Errors
///
/// [`ConnectionError::PortUnreadable`] if the file cannot be read and
/// [`ConnectionError::PortInvalid`] if the resolved text is not a port.
pub fn resolve_port<S: CredentialSource>(
    explicit: Option<&str>,
    path: &Path,
    source: &S,
) -> Result<u16, ConnectionError> {
    if let Some(port) = explicit {
        return parse_port(port);
    }

    let line = source
        .read_first_line(path)
        .map_err(|e| ConnectionError::PortUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    parse_port_line(&line)
}

/// Extracts the port from a `host:port` line.
///
/// A line without a separator is taken as the port itself.
///
/// # Errors
///
/// [`ConnectionError::PortInvalid`] if the port part is not a `u16`.
pub fn parse_port_line(line: &str) -> Result<u16, ConnectionError> {
    let port = line.rsplit_once(':').map_or(line, |(_, port)| port);
    parse_port(port)
}

fn parse_port(text: &str) -> Result<u16, ConnectionError> {
    text.trim()
        .parse::<u16>()
        .map_err(|_| ConnectionError::PortInvalid {
            value: text.to_string(),
        })
}
