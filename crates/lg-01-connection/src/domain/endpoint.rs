//! # Endpoint Value Objects

use std::fmt;

/// Host used when the configuration names none.
pub const DEFAULT_HOST: &str = "localhost";

/// The two backend services the gateway connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// The ledger-execution service (compile, submit, status queries).
    Ledger,
    /// The key-custody service (wallets and keys).
    Keystore,
}

impl ServiceKind {
    /// Header carrying the API token for this service.
    #[must_use]
    pub fn token_header(self) -> &'static str {
        match self {
            Self::Ledger => "X-Algo-API-Token",
            Self::Keystore => "X-KMD-API-Token",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ledger => write!(f, "ledger"),
            Self::Keystore => write!(f, "keystore"),
        }
    }
}

/// Fully resolved, immutable connection details for one service.
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Which service this endpoint reaches.
    pub kind: ServiceKind,
    /// Opaque API token.
    pub token: String,
    /// Host name or IP address.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Endpoint {
    /// HTTP base URL of the service.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("kind", &self.kind)
            .field("token", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}
