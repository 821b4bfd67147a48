//! Disk-backed file content.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use memvfs_core::FileSource;

/// [`FileSource`] reading a loose file straight off the local filesystem.
///
/// Nothing is cached and nothing is held open: every access goes back to
/// the path, so a file that vanishes after mounting simply turns invalid.
/// All failure modes surface as `is_valid() == false`, a zero size, or a
/// false return from `read_into`.
#[derive(Clone, Debug)]
pub struct DiskFile {
    path: PathBuf,
}

impl DiskFile {
    /// Point a source at `path`. The file does not have to exist yet; it
    /// is checked on every access.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DiskFile { path: path.into() }
    }

    /// The on-disk location this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileSource for DiskFile {
    fn size(&self) -> u64 {
        match fs::metadata(&self.path) {
            Ok(metadata) if metadata.is_file() => metadata.len(),
            _ => 0,
        }
    }

    fn is_valid(&self) -> bool {
        self.path.is_file()
    }

    fn read_into(&self, buffer: &mut [u8]) -> bool {
        let mut file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(_) => return false,
        };
        let len = match file.metadata() {
            Ok(metadata) => metadata.len() as usize,
            Err(_) => return false,
        };
        if buffer.len() < len {
            return false;
        }
        file.read_exact(&mut buffer[..len]).is_ok()
    }
}
