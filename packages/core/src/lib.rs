//! memvfs-core: an in-memory hierarchical namespace.
//!
//! Maps normalized slash-separated paths onto nested directories and
//! opaque file handles, without touching any real disk layout:
//!
//! - [`VfsPath`]: normalized, segmented path strings
//! - [`Vfs`]: the directory tree that mounts, looks up, enumerates,
//!   prunes, and renders
//! - [`FileSource`] / [`FileHandle`]: the opaque content capability and
//!   the reference-counted handle the tree shares between paths
//! - [`FileInserter`]: batch source of files for [`Vfs::mount_files`]
//!
//! Mounting the same handle at several paths hard-links it; the handle's
//! visible reference count tracks how many tree entries point at it, and
//! the backing content is released once no entry and no caller holds it.
//!
//! The tree is single-threaded by design: handles are `Rc`-shared, so a
//! tree never crosses threads. Deployments that need concurrent access
//! wrap the whole tree in their own lock.
//!
//! # Example
//!
//! ```rust
//! use memvfs_core::{FileHandle, FileSource, Vfs, VfsPath};
//!
//! struct Greeting;
//!
//! impl FileSource for Greeting {
//!     fn size(&self) -> u64 {
//!         5
//!     }
//!     fn is_valid(&self) -> bool {
//!         true
//!     }
//!     fn read_into(&self, buffer: &mut [u8]) -> bool {
//!         buffer[..5].copy_from_slice(b"hello");
//!         true
//!     }
//! }
//!
//! let mut vfs = Vfs::new();
//! let handle = FileHandle::new(Greeting);
//! vfs.mount_file(&VfsPath::new("greetings/en"), handle.clone(), true)
//!     .unwrap();
//! vfs.mount_file(&VfsPath::new("motd"), handle.clone(), false)
//!     .unwrap();
//!
//! assert_eq!(handle.reference_count(), 2);
//! assert_eq!(vfs.count_files(&VfsPath::new(""), true), 2);
//! ```

pub use bytes::Bytes;

mod file;
mod inserter;
mod node;
mod path;

pub use file::{FileHandle, FileRef, FileSource};
pub use inserter::FileInserter;
pub use node::{EntryType, Vfs};
pub use path::VfsPath;
