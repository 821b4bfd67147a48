//! memvfs-disk: real-filesystem adapters for memvfs.
//!
//! The tree engine never touches the disk itself; these adapters bridge
//! the gap for the common case of overlaying loose files:
//!
//! - [`DiskFile`]: a [`FileSource`](memvfs_core::FileSource) reading a
//!   loose file off the local filesystem
//! - [`DirectoryInserter`]: walks a directory tree and yields every
//!   regular file as a mountable `(path, handle)` pair

mod file;
mod walker;

pub use file::DiskFile;
pub use walker::{DirectoryInserter, Error};
