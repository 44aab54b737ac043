//! # Connection Resolver Service
//!
//! Applies the precedence rules of [`crate::domain::resolve`] to one
//! service's [`EndpointConfig`] and caches every value it resolves, so
//! repeated calls are idempotent and never re-read a credential file.

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::adapters::FsCredentialSource;
use crate::config::EndpointConfig;
use crate::domain::{resolve_port, resolve_token, Endpoint, ServiceKind, DEFAULT_HOST};
use crate::error::ConnectionError;
use crate::ports::CredentialSource;

/// Resolves and caches the endpoint credentials of one backend service.
pub struct ConnectionResolver<S: CredentialSource = FsCredentialSource> {
    kind: ServiceKind,
    config: EndpointConfig,
    source: S,
    token: RwLock<Option<String>>,
    port: RwLock<Option<u16>>,
}

impl ConnectionResolver<FsCredentialSource> {
    /// Creates a resolver reading credential files from the filesystem.
    #[must_use]
    pub fn new(kind: ServiceKind, config: EndpointConfig) -> Self {
        Self::with_source(kind, config, FsCredentialSource)
    }
}

impl<S: CredentialSource> ConnectionResolver<S> {
    /// Creates a resolver with a custom credential source.
    pub fn with_source(kind: ServiceKind, config: EndpointConfig, source: S) -> Self {
        Self {
            kind,
            config,
            source,
            token: RwLock::new(None),
            port: RwLock::new(None),
        }
    }

    /// The service this resolver serves.
    #[must_use]
    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    /// Resolves the API token.
    ///
    /// # Errors
    ///
    /// See [`resolve_token`].
    pub fn resolve_token(&self) -> Result<String, ConnectionError> {
        if let Some(token) = self.token.read().as_ref() {
            return Ok(token.clone());
        }

        let token = resolve_token(
            self.config.token.as_deref(),
            &self.config.token_file,
            &self.source,
        )
        .inspect_err(|e| warn!(service = %self.kind, error = %e, "Token resolution failed"))?;

        debug!(service = %self.kind, "Token resolved");
        *self.token.write() = Some(token.clone());
        Ok(token)
    }

    /// Resolves the TCP port.
    ///
    /// # Errors
    ///
    /// See [`resolve_port`].
    pub fn resolve_port(&self) -> Result<u16, ConnectionError> {
        if let Some(port) = *self.port.read() {
            return Ok(port);
        }

        let port = resolve_port(
            self.config.port.as_deref(),
            &self.config.net_file,
            &self.source,
        )
        .inspect_err(|e| warn!(service = %self.kind, error = %e, "Port resolution failed"))?;

        debug!(service = %self.kind, port, "Port resolved");
        *self.port.write() = Some(port);
        Ok(port)
    }

    /// Resolves token, host and port into an immutable [`Endpoint`].
    ///
    /// # Errors
    ///
    /// The first token or port failure.
    pub fn resolve_endpoint(&self) -> Result<Endpoint, ConnectionError> {
        let token = self.resolve_token()?;
        let port = self.resolve_port()?;
        let host = self
            .config
            .host
            .clone()
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        Ok(Endpoint {
            kind: self.kind,
            token,
            host,
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts reads and serves fixed contents per file name.
    struct CountingSource {
        reads: AtomicUsize,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                reads: AtomicUsize::new(0),
            }
        }
    }

    impl CredentialSource for CountingSource {
        fn read_first_line(&self, path: &Path) -> io::Result<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            match path.file_name().and_then(|n| n.to_str()) {
                Some("algod.token") => Ok("tok".to_string()),
                Some("algod.net") => Ok("127.0.0.1:8080".to_string()),
                _ => Err(io::Error::new(io::ErrorKind::NotFound, "missing")),
            }
        }
    }

    fn file_config() -> EndpointConfig {
        EndpointConfig {
            token: None,
            token_file: PathBuf::from("/data/algod.token"),
            host: None,
            port: None,
            net_file: PathBuf::from("/data/algod.net"),
        }
    }

    #[test]
    fn test_resolution_is_cached() {
        let resolver =
            ConnectionResolver::with_source(ServiceKind::Ledger, file_config(), CountingSource::new());

        assert_eq!(resolver.resolve_token().unwrap(), "tok");
        assert_eq!(resolver.resolve_token().unwrap(), "tok");
        assert_eq!(resolver.resolve_port().unwrap(), 8080);
        assert_eq!(resolver.resolve_port().unwrap(), 8080);

        assert_eq!(resolver.source.reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_explicit_values_never_touch_files() {
        let config = EndpointConfig {
            token: Some("explicit".into()),
            port: Some("4001".into()),
            host: Some("10.1.1.1".into()),
            ..file_config()
        };
        let resolver =
            ConnectionResolver::with_source(ServiceKind::Ledger, config, CountingSource::new());

        let endpoint = resolver.resolve_endpoint().unwrap();
        assert_eq!(endpoint.token, "explicit");
        assert_eq!(endpoint.base_url(), "http://10.1.1.1:4001");
        assert_eq!(resolver.source.reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failure_is_not_cached() {
        let config = EndpointConfig {
            token_file: PathBuf::from("/data/kmd.token"),
            ..file_config()
        };
        let resolver =
            ConnectionResolver::with_source(ServiceKind::Keystore, config, CountingSource::new());

        assert!(resolver.resolve_token().is_err());
        assert!(resolver.resolve_token().is_err());
        assert_eq!(resolver.source.reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_default_host_is_localhost() {
        let resolver =
            ConnectionResolver::with_source(ServiceKind::Ledger, file_config(), CountingSource::new());
        let endpoint = resolver.resolve_endpoint().unwrap();
        assert_eq!(endpoint.host, "localhost");
    }
}
