//! # Filesystem Credential Source

use std::fs;
use std::io;
use std::path::Path;

use crate::ports::CredentialSource;

/// Reads credential files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCredentialSource;

impl CredentialSource for FsCredentialSource {
    fn read_first_line(&self, path: &Path) -> io::Result<String> {
        let contents = fs::read_to_string(path)?;
        Ok(contents.lines().next().unwrap_or_default().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_first_line_only() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "first\r\nsecond\n").unwrap();

        let line = FsCredentialSource.read_first_line(file.path()).unwrap();
        assert_eq!(line, "first");
    }

    #[test]
    fn test_empty_file_yields_empty_line() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let line = FsCredentialSource.read_first_line(file.path()).unwrap();
        assert!(line.is_empty());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = FsCredentialSource.read_first_line(&dir.path().join("algod.token"));
        assert!(result.is_err());
    }
}
