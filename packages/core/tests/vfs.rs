//! Scenario tests driving the tree through its public surface: the batch
//! fixture, hard-link reference counting, and cascading removal.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use memvfs_core::{EntryType, FileHandle, FileInserter, FileRef, FileSource, Vfs, VfsPath};

struct MockSource;

impl FileSource for MockSource {
    fn size(&self) -> u64 {
        0
    }

    fn is_valid(&self) -> bool {
        false
    }

    fn read_into(&self, _buffer: &mut [u8]) -> bool {
        false
    }
}

fn mock_file() -> FileRef {
    FileHandle::new(MockSource)
}

/// Sets a shared flag when the backing source is dropped, so tests can
/// observe exactly when a file is released.
struct DropTracker(Rc<Cell<bool>>);

impl FileSource for DropTracker {
    fn size(&self) -> u64 {
        0
    }

    fn is_valid(&self) -> bool {
        false
    }

    fn read_into(&self, _buffer: &mut [u8]) -> bool {
        false
    }
}

impl Drop for DropTracker {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

const FIXTURE: [&str; 16] = [
    "test",
    "test2",
    "test3",
    "test4",
    "directory/test",
    "directory/test2",
    "directory/test3",
    "directory/test4",
    "directory2/test",
    "directory2/test2",
    "directory2/test3",
    "directory2/test4",
    "directory2/directory/test",
    "directory2/directory/test2",
    "directory2/directory/test3",
    "directory2/directory/test4",
];

/// Produces the 16-file fixture and records what the tree rejected.
#[derive(Default)]
struct MockInserter {
    produced: Cell<usize>,
    rejected: RefCell<Vec<VfsPath>>,
}

impl FileInserter for MockInserter {
    fn files(&self) -> Vec<(VfsPath, FileRef)> {
        self.produced.set(self.produced.get() + 1);
        FIXTURE
            .iter()
            .map(|raw| (VfsPath::new(raw), mock_file()))
            .collect()
    }

    fn on_failure(&self, path: &VfsPath, handle: FileRef) {
        assert_eq!(handle.reference_count(), 0);
        self.rejected.borrow_mut().push(path.clone());
    }
}

fn populated() -> Vfs {
    let mut vfs = Vfs::new();
    assert_eq!(
        vfs.mount_files(&VfsPath::new(""), &MockInserter::default(), true),
        16
    );
    vfs
}

#[test]
fn batch_mount_with_create_dirs_mounts_everything() {
    let mut vfs = Vfs::new();
    let inserter = MockInserter::default();

    assert_eq!(vfs.mount_files(&VfsPath::new(""), &inserter, true), 16);
    assert!(inserter.rejected.borrow().is_empty());
    for raw in FIXTURE {
        assert_eq!(
            vfs.exists(&VfsPath::new(raw)),
            Some(EntryType::File),
            "missing {raw}"
        );
    }
}

#[test]
fn batch_mount_without_create_dirs_keeps_top_level_only() {
    let mut vfs = Vfs::new();
    let inserter = MockInserter::default();

    assert_eq!(vfs.mount_files(&VfsPath::new(""), &inserter, false), 4);
    assert_eq!(inserter.rejected.borrow().len(), 12);
    for raw in &FIXTURE[..4] {
        assert_eq!(vfs.exists(&VfsPath::new(*raw)), Some(EntryType::File));
    }
    for raw in &FIXTURE[4..] {
        assert_eq!(vfs.exists(&VfsPath::new(*raw)), None);
        assert!(inserter.rejected.borrow().contains(&VfsPath::new(*raw)));
    }
}

#[test]
fn batch_mounts_under_a_base_path() {
    let mut vfs = Vfs::new();
    assert_eq!(
        vfs.mount_files(&VfsPath::new("base/nested"), &MockInserter::default(), true),
        16
    );
    assert_eq!(
        vfs.exists(&VfsPath::new("base/nested/directory2/directory/test")),
        Some(EntryType::File)
    );
    assert_eq!(vfs.count_files(&VfsPath::new("base"), true), 16);
}

#[test]
fn batch_aborts_when_base_cannot_resolve() {
    let mut vfs = Vfs::new();
    let inserter = MockInserter::default();

    assert_eq!(vfs.mount_files(&VfsPath::new("missing/base"), &inserter, false), 0);
    // The base failed once, up front; the inserter was never consulted.
    assert_eq!(inserter.produced.get(), 0);
    assert!(inserter.rejected.borrow().is_empty());
    assert!(vfs.is_empty());
}

#[test]
fn mounting_over_populated_tree_never_replaces() {
    let mut vfs = populated();
    let replacement = mock_file();

    assert!(vfs
        .mount_file(&VfsPath::new("test"), replacement.clone(), false)
        .is_err());
    assert!(!Rc::ptr_eq(
        vfs.get_file(&VfsPath::new("test")).unwrap(),
        &replacement
    ));

    assert!(vfs
        .create_directory(&VfsPath::new("directory"), false)
        .is_none());
    assert!(!vfs
        .get_directory(&VfsPath::new("directory"))
        .unwrap()
        .is_empty());
}

#[test]
fn a_name_is_never_both_file_and_directory() {
    let mut vfs = populated();

    // "test" is a file; a directory of the same name must lose.
    assert!(vfs.create_directory(&VfsPath::new("test"), false).is_none());
    // "directory" is a directory; a file of the same name must lose.
    assert!(vfs
        .mount_file(&VfsPath::new("directory"), mock_file(), false)
        .is_err());
    // Descending through a file fails rather than materializing a twin.
    assert!(vfs
        .mount_file(&VfsPath::new("test/below"), mock_file(), true)
        .is_err());
    assert_eq!(vfs.exists(&VfsPath::new("test")), Some(EntryType::File));
}

#[test]
fn hard_links_share_one_reference_counter() {
    let mut vfs = Vfs::new();
    let handle = mock_file();

    for raw in ["one", "two", "sub/three"] {
        vfs.mount_file(&VfsPath::new(raw), handle.clone(), true)
            .unwrap();
    }
    assert_eq!(handle.reference_count(), 3);
    assert!(Rc::ptr_eq(
        vfs.get_file(&VfsPath::new("one")).unwrap(),
        vfs.get_file(&VfsPath::new("sub/three")).unwrap()
    ));

    drop(vfs.unmount_file(&VfsPath::new("two")));
    assert_eq!(handle.reference_count(), 2);
}

#[test]
fn file_released_only_at_zero_references_and_permitted_deletion() {
    let dropped = Rc::new(Cell::new(false));
    let handle = FileHandle::new(DropTracker(dropped.clone()));

    let mut vfs = Vfs::new();
    vfs.mount_file(&VfsPath::new("a"), handle.clone(), false)
        .unwrap();
    vfs.mount_file(&VfsPath::new("b"), handle.clone(), false)
        .unwrap();
    drop(handle);

    // One mount remains, so dropping the detached handle frees nothing.
    drop(vfs.unmount_file(&VfsPath::new("a")).unwrap());
    assert!(!dropped.get());

    // Count reaches zero, but the caller keeps the handle alive.
    let survivor = vfs.unmount_file(&VfsPath::new("b")).unwrap();
    assert_eq!(survivor.reference_count(), 0);
    assert!(!dropped.get());

    // Remounting the survivor revives it; unmounting and dropping it is
    // the point where deletion is finally permitted.
    vfs.mount_file(&VfsPath::new("c"), survivor, false).unwrap();
    assert_eq!(
        vfs.get_file(&VfsPath::new("c")).unwrap().reference_count(),
        1
    );
    drop(vfs.unmount_file(&VfsPath::new("c")).unwrap());
    assert!(dropped.get());
}

#[test]
fn cascade_delete_frees_exactly_the_contained_files() {
    let mut vfs = Vfs::new();
    let flags: Vec<Rc<Cell<bool>>> = (0..3).map(|_| Rc::new(Cell::new(false))).collect();

    for (i, flag) in flags.iter().enumerate() {
        let handle = FileHandle::new(DropTracker(flag.clone()));
        vfs.mount_file(
            &VfsPath::new(format!("doomed/sub{i}/file")),
            handle,
            true,
        )
        .unwrap();
    }

    // A hard link into the doomed subtree from outside survives.
    let linked = Rc::new(Cell::new(false));
    let shared = FileHandle::new(DropTracker(linked.clone()));
    vfs.mount_file(&VfsPath::new("doomed/shared"), shared.clone(), false)
        .unwrap();
    vfs.mount_file(&VfsPath::new("kept"), shared.clone(), false)
        .unwrap();
    drop(shared);

    assert!(vfs.remove_directory(&VfsPath::new("doomed")));
    assert!(flags.iter().all(|flag| flag.get()));
    assert!(!linked.get());
    assert_eq!(
        vfs.get_file(&VfsPath::new("kept")).unwrap().reference_count(),
        1
    );
}

#[test]
fn count_files_in_fixture() {
    let vfs = populated();

    assert_eq!(vfs.count_files(&VfsPath::new("directory"), false), 4);
    assert_eq!(vfs.count_files(&VfsPath::new("directory2"), true), 8);
    assert_eq!(vfs.count_files(&VfsPath::new(""), true), 16);
    assert_eq!(
        vfs.count_files_matching(&VfsPath::new("directory"), false, |name, _| {
            name.len() > 4
        }),
        3
    );
}

#[test]
fn count_directories_in_fixture() {
    let vfs = populated();

    assert_eq!(vfs.count_directories(&VfsPath::new(""), false), 2);
    assert_eq!(vfs.count_directories(&VfsPath::new(""), true), 3);
    assert_eq!(
        vfs.count_directories_matching(&VfsPath::new(""), false, |name, _| name.len() > 9),
        1
    );
    assert_eq!(
        vfs.count_directories_matching(&VfsPath::new(""), true, |_, directory| {
            directory.count_files(&VfsPath::new(""), false) == 4
        }),
        3
    );
}

#[test]
fn prune_keeps_file_bearing_branches() {
    let mut vfs = Vfs::new();
    vfs.create_directory(&VfsPath::new("hollow/deeper/deepest"), true);
    vfs.mount_file(&VfsPath::new("solid/nested/file"), mock_file(), true)
        .unwrap();

    // Every directory on the hollow chain empties out bottom-up and goes
    // in one call; the branch holding a file stays whole.
    assert_eq!(vfs.prune(&VfsPath::new(""), true), 3);
    assert_eq!(vfs.exists(&VfsPath::new("hollow")), None);
    assert_eq!(
        vfs.exists(&VfsPath::new("solid/nested/file")),
        Some(EntryType::File)
    );
    assert_eq!(vfs.prune(&VfsPath::new(""), true), 0);
}

#[test]
fn unmount_then_prune_clears_abandoned_directories() {
    let mut vfs = populated();

    for raw in &FIXTURE[12..] {
        drop(vfs.unmount_file(&VfsPath::new(*raw)).unwrap());
    }
    assert_eq!(vfs.prune(&VfsPath::new("directory2"), true), 1);
    assert_eq!(vfs.exists(&VfsPath::new("directory2/directory")), None);
    assert_eq!(vfs.count_files(&VfsPath::new("directory2"), true), 4);
}

#[test]
fn is_root_only_at_the_constructed_root() {
    let vfs = populated();

    assert!(vfs.is_root());
    assert!(!vfs.get_directory(&VfsPath::new("directory")).unwrap().is_root());
    assert!(!vfs
        .get_directory(&VfsPath::new("directory2/directory"))
        .unwrap()
        .is_root());
}

#[test]
fn tree_renders_the_fixture_deterministically() {
    let vfs = populated();

    let expected = "\
├── directory
│   ├── test
│   ├── test2
│   ├── test3
│   └── test4
├── directory2
│   ├── directory
│   │   ├── test
│   │   ├── test2
│   │   ├── test3
│   │   └── test4
│   ├── test
│   ├── test2
│   ├── test3
│   └── test4
├── test
├── test2
├── test3
└── test4
";
    assert_eq!(vfs.tree(), expected);
    // Rendering a subdirectory starts the outline from that node.
    let subtree = vfs.get_directory(&VfsPath::new("directory")).unwrap().tree();
    assert_eq!(subtree, "├── test\n├── test2\n├── test3\n└── test4\n");
}
