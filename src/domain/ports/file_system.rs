//! FileSystem port - abstraction over file I/O operations
//!
//! The namespace tracker and the build orchestrator write every output file
//! through this trait.

use std::io;
use std::path::Path;

/// Abstract file system interface
///
/// Implementations:
/// - `LocalFs` - standard file I/O with atomic writes
pub trait FileSystem {
    /// Read file content as bytes
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write content to a file atomically, creating parent directories
    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    /// Check if a file exists
    fn exists(&self, path: &Path) -> bool;

    /// Remove a file; removing a missing file is not an error
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Copy a file byte-for-byte, creating parent directories
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        let content = self.read(from)?;
        self.write(to, &content)
    }
}
