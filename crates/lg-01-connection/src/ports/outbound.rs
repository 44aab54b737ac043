//! # Driven Ports (SPI - Outbound)
//!
//! Credential files are written by the backend services next to their data
//! directory. Reading them goes through this trait so the precedence rules can
//! be verified without touching the filesystem.

use std::io;
use std::path::Path;

/// Source of credential file contents.
pub trait CredentialSource: Send + Sync {
    /// Returns the first line of the file at `path`, without its line ending.
    ///
    /// An empty file yields an empty string.
    fn read_first_line(&self, path: &Path) -> io::Result<String>;
}

impl<T: CredentialSource + ?Sized> CredentialSource for &T {
    fn read_first_line(&self, path: &Path) -> io::Result<String> {
        (**self).read_first_line(path)
    }
}
