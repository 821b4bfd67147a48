//! File handles and the content capability they wrap.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use bytes::Bytes;

/// Opaque provider of file content.
///
/// The tree engine performs no I/O of its own; everything content-related
/// is delegated through this trait. Implementations decide where the bytes
/// actually live: a loose file, an archive member, a generated blob.
pub trait FileSource {
    /// Full uncompressed size of the content in bytes.
    fn size(&self) -> u64;

    /// Whether the content can currently be fetched.
    fn is_valid(&self) -> bool;

    /// Copy the content into `buffer`, which must hold at least
    /// [`size()`](Self::size) bytes. Returns false on failure.
    fn read_into(&self, buffer: &mut [u8]) -> bool;
}

/// A mountable file: a [`FileSource`] plus a visible reference count.
///
/// The count tracks how many tree entries currently reference the handle.
/// Every mount increments it and every unmount or cascading directory
/// removal decrements it; mounting one handle at several paths is how
/// hard links are expressed. Only the tree mutates the count; callers
/// get read-only access through [`reference_count`].
///
/// [`reference_count`]: FileHandle::reference_count
pub struct FileHandle {
    source: Box<dyn FileSource>,
    references: Cell<u32>,
}

/// Shared handle to a mountable file.
pub type FileRef = Rc<FileHandle>;

impl FileHandle {
    /// Wrap a content source into a mountable handle.
    pub fn new(source: impl FileSource + 'static) -> FileRef {
        Rc::new(FileHandle {
            source: Box::new(source),
            references: Cell::new(0),
        })
    }

    /// Number of tree entries currently referencing this handle.
    pub fn reference_count(&self) -> u32 {
        self.references.get()
    }

    pub(crate) fn add_reference(&self) -> u32 {
        let count = self.references.get() + 1;
        self.references.set(count);
        count
    }

    /// Saturates at zero rather than wrapping.
    pub(crate) fn drop_reference(&self) -> u32 {
        let count = self.references.get().saturating_sub(1);
        self.references.set(count);
        count
    }

    /// Content size in bytes.
    pub fn size(&self) -> u64 {
        self.source.size()
    }

    /// Whether the content can currently be fetched.
    pub fn is_valid(&self) -> bool {
        self.source.is_valid()
    }

    /// Copy the content into `buffer`, which must hold at least
    /// [`size()`](Self::size) bytes. Returns false on failure.
    pub fn read_into(&self, buffer: &mut [u8]) -> bool {
        self.source.read_into(buffer)
    }

    /// Read the whole content into a freshly allocated buffer.
    ///
    /// Returns `None` when the source is invalid or the read fails.
    pub fn read_all(&self) -> Option<Bytes> {
        if !self.is_valid() {
            return None;
        }
        let mut buffer = vec![0u8; self.size() as usize];
        if self.source.read_into(&mut buffer) {
            Some(Bytes::from(buffer))
        } else {
            None
        }
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("size", &self.size())
            .field("references", &self.references.get())
            .finish()
    }
}
