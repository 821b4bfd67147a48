//! Batch discovery of loose files for mounting.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use memvfs_core::{FileHandle, FileInserter, FileRef, VfsPath};
use walkdir::WalkDir;

use crate::DiskFile;

/// Errors from setting up a [`DirectoryInserter`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("inserter root {path:?} could not be read: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("inserter root {path:?} is not a directory")]
    RootNotADirectory { path: PathBuf },
}

/// Walks a root directory and yields one `(relative path, handle)` pair
/// per regular file, ready for [`Vfs::mount_files`].
///
/// Entries that cannot be read, and entries whose relative path cannot be
/// expressed as a [`VfsPath`] (non-UTF-8 or backslash-bearing names), are
/// skipped with a warning rather than aborting the batch.
///
/// [`Vfs::mount_files`]: memvfs_core::Vfs::mount_files
pub struct DirectoryInserter {
    root: PathBuf,
}

impl DirectoryInserter {
    /// Validate `root` eagerly and build an inserter over it.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        let metadata = fs::metadata(&root).map_err(|source| Error::RootUnreadable {
            path: root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(Error::RootNotADirectory { path: root });
        }
        Ok(DirectoryInserter { root })
    }

    /// The directory this inserter discovers files under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn relative_path(&self, path: &Path) -> Option<VfsPath> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let mut segments = Vec::new();
        for component in relative.components() {
            let segment = component.as_os_str().to_str()?;
            if segment.contains('\\') {
                return None;
            }
            segments.push(segment.to_string());
        }
        Some(VfsPath::from_segments(segments))
    }
}

impl FileInserter for DirectoryInserter {
    fn files(&self) -> Vec<(VfsPath, FileRef)> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    log::warn!("skipping unreadable entry under {:?}: {error}", self.root);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            match self.relative_path(entry.path()) {
                Some(path) => files.push((path, FileHandle::new(DiskFile::new(entry.path())))),
                None => {
                    log::warn!(
                        "skipping {:?}: name not expressible as a vfs path",
                        entry.path()
                    );
                }
            }
        }
        files
    }
}
