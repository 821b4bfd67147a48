//! Normalized slash-separated paths.

use std::fmt;

/// An immutable, normalized path into a [`Vfs`](crate::Vfs).
///
/// A `VfsPath` is an ordered sequence of non-empty segments. Construction
/// normalizes the raw string by dropping leading, trailing, and duplicate
/// `/` separators, so `"a/b"`, `"/a/b/"`, and `"///a///b///"` are all the
/// same path. The empty path (zero segments) names the node an operation
/// is invoked on.
///
/// Backslashes are not separators here and are rejected outright: passing
/// one in is a caller bug, not a runtime condition.
///
/// # Example
///
/// ```rust
/// use memvfs_core::VfsPath;
///
/// let path = VfsPath::new("/assets//textures/");
/// assert_eq!(path.depth(), 2);
/// assert_eq!(path.to_string(), "assets/textures");
/// assert_eq!(path, VfsPath::new("assets/textures"));
/// ```
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VfsPath {
    segments: Vec<String>,
}

impl VfsPath {
    /// Parse a raw path string, normalizing separators.
    ///
    /// # Panics
    ///
    /// Panics if the string contains a backslash.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref();
        assert!(
            !raw.contains('\\'),
            "backslash in path {raw:?}; segments are separated by '/'"
        );
        VfsPath {
            segments: raw
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Build a path from pre-split segments.
    ///
    /// # Panics
    ///
    /// Panics if any segment is empty or contains a separator.
    pub fn from_segments(segments: Vec<String>) -> Self {
        for segment in &segments {
            assert!(
                !segment.is_empty() && !segment.contains('/') && !segment.contains('\\'),
                "invalid path segment {segment:?}"
            );
        }
        VfsPath { segments }
    }

    /// Number of segments; 0 for the empty path.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// True if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The first segment as its own path; empty if this path is empty.
    pub fn root(&self) -> VfsPath {
        VfsPath {
            segments: self.segments.first().cloned().into_iter().collect(),
        }
    }

    /// The first segment, if any.
    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// Drop the first `levels` segments. Dropping past the end yields the
    /// empty path.
    #[must_use]
    pub fn skip(&self, levels: usize) -> VfsPath {
        VfsPath {
            segments: self.segments.iter().skip(levels).cloned().collect(),
        }
    }

    /// Everything after the first segment.
    #[must_use]
    pub fn rest(&self) -> VfsPath {
        self.skip(1)
    }

    /// Join this path with another.
    ///
    /// Joining with the empty path on either side returns the other
    /// operand unchanged; both operands are already normalized, so no
    /// re-normalization happens.
    #[must_use]
    pub fn join(&self, other: &VfsPath) -> VfsPath {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        VfsPath { segments }
    }

    /// The ordered segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Iterate over segments.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }
}

impl From<&str> for VfsPath {
    fn from(raw: &str) -> Self {
        VfsPath::new(raw)
    }
}

impl From<String> for VfsPath {
    fn from(raw: String) -> Self {
        VfsPath::new(raw)
    }
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
