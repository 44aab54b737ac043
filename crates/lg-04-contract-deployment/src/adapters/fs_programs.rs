//! # Filesystem Program Source

use std::fs;
use std::io;
use std::path::Path;

use crate::ports::ProgramSource;

/// Reads program sources from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProgramSource;

impl ProgramSource for FsProgramSource {
    fn read_program(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}
