//! # Driven Ports (SPI - Outbound)

use std::io;
use std::path::Path;

/// Source of contract program text.
pub trait ProgramSource: Send + Sync {
    /// Returns the full contents of the program at `path`.
    fn read_program(&self, path: &Path) -> io::Result<String>;
}

impl<T: ProgramSource + ?Sized> ProgramSource for &T {
    fn read_program(&self, path: &Path) -> io::Result<String> {
        (**self).read_program(path)
    }
}
