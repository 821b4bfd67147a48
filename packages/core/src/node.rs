//! The directory tree engine.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::mem;

use crate::{FileHandle, FileInserter, FileRef, VfsPath};

/// What occupies a path.
///
/// A name never denotes a file and a directory at the same node, so a
/// lookup yields at most one of these.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
}

/// A root or directory node in the virtual file system.
///
/// Each node exclusively owns its child directories and shares its file
/// handles through [`FileRef`]s, so the same handle can be mounted at
/// several paths (hard links). Children are kept in `BTreeMap`s, which
/// makes enumeration and [`tree`](Vfs::tree) rendering deterministic.
///
/// Path-taking operations resolve one segment per step. Operations that
/// act on a directory (`mount_files`, `is_empty_at`, `list_*`, `prune`,
/// `count_*`) treat the empty path as the node itself; operations that
/// name an entry (`create_directory`, `mount_file`, `unmount_file`,
/// `remove_directory`, `get_*`, `exists`) fail on the empty path.
///
/// Every ordinary failure is reported through the return value; the only
/// panic anywhere here is the [`VfsPath`] separator check at construction.
///
/// # Example
///
/// ```rust
/// use memvfs_core::{EntryType, Vfs, VfsPath};
///
/// let mut vfs = Vfs::new();
/// assert!(vfs.create_directory(&VfsPath::new("assets/textures"), true).is_some());
/// assert_eq!(
///     vfs.exists(&VfsPath::new("assets/textures")),
///     Some(EntryType::Directory),
/// );
/// ```
#[derive(Debug)]
pub struct Vfs {
    directories: BTreeMap<String, Vfs>,
    files: BTreeMap<String, FileRef>,
    root: bool,
}

impl Default for Vfs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vfs {
    /// Create a root node.
    pub fn new() -> Self {
        Vfs {
            directories: BTreeMap::new(),
            files: BTreeMap::new(),
            root: true,
        }
    }

    fn subdirectory() -> Self {
        Vfs {
            directories: BTreeMap::new(),
            files: BTreeMap::new(),
            root: false,
        }
    }

    /// Descend through existing directories only.
    fn descend(&self, segments: &[String]) -> Option<&Vfs> {
        let mut current = self;
        for segment in segments {
            current = current.directories.get(segment)?;
        }
        Some(current)
    }

    fn descend_mut(&mut self, segments: &[String]) -> Option<&mut Vfs> {
        let mut current = self;
        for segment in segments {
            current = current.directories.get_mut(segment)?;
        }
        Some(current)
    }

    /// Descend one segment at a time, creating missing directories when
    /// `create` is set. Fails on the first segment that is occupied by a
    /// file, or missing while `create` is unset.
    fn walk(&mut self, segments: &[String], create: bool) -> Option<&mut Vfs> {
        let mut current = self;
        for segment in segments {
            if current.files.contains_key(segment) {
                return None;
            }
            current = match current.directories.entry(segment.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) if create => entry.insert(Vfs::subdirectory()),
                Entry::Vacant(_) => return None,
            };
        }
        Some(current)
    }

    /// Create a directory, returning the new node.
    ///
    /// Fails with `None` when the path is empty, when the final name is
    /// already taken by a file or directory, or when an intermediate
    /// segment cannot be resolved and `recursive` is unset (in which
    /// case nothing is mutated). With `recursive`, missing intermediates
    /// are created along the way.
    pub fn create_directory(&mut self, path: &VfsPath, recursive: bool) -> Option<&mut Vfs> {
        let (name, dirs) = path.segments().split_last()?;
        let parent = self.walk(dirs, recursive)?;
        if parent.files.contains_key(name) {
            return None;
        }
        match parent.directories.entry(name.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(entry) => Some(entry.insert(Vfs::subdirectory())),
        }
    }

    /// Mount a file handle, incrementing its reference count.
    ///
    /// Existing entries are never overwritten: when the final name is
    /// taken, or an intermediate segment cannot be resolved (and
    /// `create_dirs` is unset), the handle comes back untouched in `Err`.
    pub fn mount_file(
        &mut self,
        path: &VfsPath,
        handle: FileRef,
        create_dirs: bool,
    ) -> Result<(), FileRef> {
        let Some((name, dirs)) = path.segments().split_last() else {
            return Err(handle);
        };
        let Some(parent) = self.walk(dirs, create_dirs) else {
            return Err(handle);
        };
        if parent.files.contains_key(name) || parent.directories.contains_key(name) {
            return Err(handle);
        }
        handle.add_reference();
        parent.files.insert(name.clone(), handle);
        Ok(())
    }

    /// Mount every pair an inserter produces under `base`.
    ///
    /// `base` is resolved exactly once, created when `create_dirs` is
    /// set. If that single resolution fails the whole batch is aborted
    /// and 0 is returned without consulting the inserter; there is no
    /// per-file fallback. Pairs the tree rejects are reported to
    /// [`FileInserter::on_failure`]. Returns the number of files mounted.
    pub fn mount_files(
        &mut self,
        base: &VfsPath,
        inserter: &dyn FileInserter,
        create_dirs: bool,
    ) -> usize {
        let Some(target) = self.walk(base.segments(), create_dirs) else {
            return 0;
        };
        let mut mounted = 0;
        for (path, handle) in inserter.files() {
            match target.mount_file(&path, handle, create_dirs) {
                Ok(()) => mounted += 1,
                Err(handle) => inserter.on_failure(&path, handle),
            }
        }
        mounted
    }

    /// Unmount the file at `path`, decrementing its reference count.
    ///
    /// Returns the detached handle, or `None` when no file exists there.
    /// Dropping the returned handle releases the file once nothing else
    /// holds a reference; keeping it keeps the file alive, for example to
    /// remount it elsewhere.
    pub fn unmount_file(&mut self, path: &VfsPath) -> Option<FileRef> {
        let (name, dirs) = path.segments().split_last()?;
        let parent = self.descend_mut(dirs)?;
        let handle = parent.files.remove(name)?;
        handle.drop_reference();
        Some(handle)
    }

    /// Remove the directory at `path`, destroying its subtree and
    /// dropping every file reference held anywhere inside it.
    ///
    /// False when the path does not name a directory. The root itself
    /// cannot be removed.
    pub fn remove_directory(&mut self, path: &VfsPath) -> bool {
        let Some((name, dirs)) = path.segments().split_last() else {
            return false;
        };
        let Some(parent) = self.descend_mut(dirs) else {
            return false;
        };
        match parent.directories.remove(name) {
            Some(removed) => {
                Vfs::release_subtree(removed);
                true
            }
            None => false,
        }
    }

    /// Tear down a detached subtree without recursing on the call stack.
    fn release_subtree(node: Vfs) {
        let mut stack = vec![node];
        while let Some(mut node) = stack.pop() {
            stack.extend(mem::take(&mut node.directories).into_values());
            for handle in node.files.values() {
                handle.drop_reference();
            }
        }
    }

    /// The file mounted at `path`, if any.
    pub fn get_file(&self, path: &VfsPath) -> Option<&FileRef> {
        let (name, dirs) = path.segments().split_last()?;
        self.descend(dirs)?.files.get(name)
    }

    /// The directory at `path`, if any.
    pub fn get_directory(&self, path: &VfsPath) -> Option<&Vfs> {
        if path.is_empty() {
            return None;
        }
        self.descend(path.segments())
    }

    /// What occupies `path`: a file, a directory, or nothing.
    pub fn exists(&self, path: &VfsPath) -> Option<EntryType> {
        let (name, dirs) = path.segments().split_last()?;
        let node = self.descend(dirs)?;
        if node.files.contains_key(name) {
            Some(EntryType::File)
        } else if node.directories.contains_key(name) {
            Some(EntryType::Directory)
        } else {
            None
        }
    }

    /// True when this node holds no directories and no files.
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }

    /// True when the directory at `path` is empty; false when it cannot
    /// be resolved.
    pub fn is_empty_at(&self, path: &VfsPath) -> bool {
        self.descend(path.segments()).is_some_and(Vfs::is_empty)
    }

    /// True exactly for the node the tree was constructed from.
    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Names of the files in the directory at `path`, sorted. Empty when
    /// the path cannot be resolved.
    pub fn list_files(&self, path: &VfsPath) -> Vec<String> {
        self.descend(path.segments())
            .map(|node| node.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Names of the subdirectories in the directory at `path`, sorted.
    /// Empty when the path cannot be resolved.
    pub fn list_directories(&self, path: &VfsPath) -> Vec<String> {
        self.descend(path.segments())
            .map(|node| node.directories.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove every empty child directory of the directory at `path`,
    /// returning how many directories were removed.
    ///
    /// With `recursive`, each child's subtree is pruned first, so a
    /// directory that becomes empty through the pruning of its own
    /// children is removed in the same call.
    pub fn prune(&mut self, path: &VfsPath, recursive: bool) -> usize {
        match self.descend_mut(path.segments()) {
            Some(node) => node.prune_children(recursive),
            None => 0,
        }
    }

    fn prune_children(&mut self, recursive: bool) -> usize {
        let mut removed = 0;
        self.directories.retain(|_, child| {
            if recursive {
                removed += child.prune_children(true);
            }
            if child.is_empty() {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Count the files in the directory at `path`; with `recursive`,
    /// files in every subdirectory too. 0 when the path cannot be
    /// resolved.
    pub fn count_files(&self, path: &VfsPath, recursive: bool) -> usize {
        self.count_files_matching(path, recursive, |_, _| true)
    }

    /// Count the files for which `predicate(name, handle)` holds.
    pub fn count_files_matching<F>(&self, path: &VfsPath, recursive: bool, predicate: F) -> usize
    where
        F: Fn(&str, &FileHandle) -> bool,
    {
        match self.descend(path.segments()) {
            Some(node) => node.count_files_in(recursive, &predicate),
            None => 0,
        }
    }

    fn count_files_in<F>(&self, recursive: bool, predicate: &F) -> usize
    where
        F: Fn(&str, &FileHandle) -> bool,
    {
        let mut count = self
            .files
            .iter()
            .filter(|(name, handle)| predicate(name, handle))
            .count();
        if recursive {
            count += self
                .directories
                .values()
                .map(|child| child.count_files_in(true, predicate))
                .sum::<usize>();
        }
        count
    }

    /// Count the subdirectories of the directory at `path`; with
    /// `recursive`, subdirectories of every subdirectory too.
    pub fn count_directories(&self, path: &VfsPath, recursive: bool) -> usize {
        self.count_directories_matching(path, recursive, |_, _| true)
    }

    /// Count the directories for which `predicate(name, node)` holds.
    ///
    /// With `recursive`, the walk descends into every subdirectory
    /// whether or not the subdirectory itself matches.
    pub fn count_directories_matching<F>(
        &self,
        path: &VfsPath,
        recursive: bool,
        predicate: F,
    ) -> usize
    where
        F: Fn(&str, &Vfs) -> bool,
    {
        match self.descend(path.segments()) {
            Some(node) => node.count_directories_in(recursive, &predicate),
            None => 0,
        }
    }

    fn count_directories_in<F>(&self, recursive: bool, predicate: &F) -> usize
    where
        F: Fn(&str, &Vfs) -> bool,
    {
        self.directories
            .iter()
            .map(|(name, child)| {
                let mut count = if recursive {
                    child.count_directories_in(true, predicate)
                } else {
                    0
                };
                if predicate(name, child) {
                    count += 1;
                }
                count
            })
            .sum()
    }

    /// Render the subtree as a connector-drawn outline, one entry per
    /// line, directories before files, the last sibling at each level
    /// drawn with `└── `.
    pub fn tree(&self) -> String {
        let mut out = String::new();
        self.render(&mut out, "");
        out
    }

    fn render(&self, out: &mut String, prefix: &str) {
        let total = self.directories.len() + self.files.len();
        for (position, (name, child)) in self.directories.iter().enumerate() {
            let last = position + 1 == total;
            out.push_str(prefix);
            out.push_str(if last { "└── " } else { "├── " });
            out.push_str(name);
            out.push('\n');
            let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
            child.render(out, &child_prefix);
        }
        for (position, name) in self.files.keys().enumerate() {
            let last = self.directories.len() + position + 1 == total;
            out.push_str(prefix);
            out.push_str(if last { "└── " } else { "├── " });
            out.push_str(name);
            out.push('\n');
        }
    }
}
