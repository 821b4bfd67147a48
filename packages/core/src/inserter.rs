//! Batch insertion of files into a tree.

use crate::{FileRef, VfsPath};

/// A source of `(path, handle)` pairs for [`Vfs::mount_files`].
///
/// Implementations produce the batch on demand; the tree does not keep
/// the inserter around afterwards. A concrete inserter that discovers
/// loose files under a real directory lives in the disk adapter crate.
///
/// [`Vfs::mount_files`]: crate::Vfs::mount_files
pub trait FileInserter {
    /// Produce every pair to mount, in order. Paths are relative to the
    /// base path the batch is mounted at.
    fn files(&self) -> Vec<(VfsPath, FileRef)>;

    /// Called for each pair the tree rejected.
    ///
    /// The default drops the handle, releasing it unless something else
    /// still holds a reference.
    fn on_failure(&self, _path: &VfsPath, handle: FileRef) {
        drop(handle);
    }
}
