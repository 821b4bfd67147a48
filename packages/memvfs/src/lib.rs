//! memvfs: an in-memory hierarchical namespace over mounted file handles.
//!
//! Callers build an overlay namespace by mounting opaque file handles at
//! normalized slash paths (the same handle at several paths if they want
//! hard links), then query, enumerate, prune, and render it. No real disk
//! layout is touched unless the disk adapters are brought in.
//!
//! This crate re-exports the engine ([`memvfs_core`]) together with the
//! real-filesystem adapters ([`memvfs_disk`]).

pub use memvfs_core::*;
pub use memvfs_disk::*;
