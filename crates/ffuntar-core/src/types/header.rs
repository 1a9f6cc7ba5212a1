//! Metadata of one archive entry.

use std::path::PathBuf;

use super::EntryKind;

/// Header of an archive entry, detached from the container's own types.
///
/// Produced by the archive reader for the duration of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    /// Archive-relative path, as stored in the container.
    pub path: PathBuf,
    /// Entry kind.
    pub kind: EntryKind,
    /// Declared data size in bytes.
    pub size: u64,
    /// Permission bits (including setuid/setgid/sticky).
    pub mode: u32,
    /// Modification time in seconds since the Unix epoch.
    pub mtime: u64,
}

impl EntryHeader {
    /// Creates a regular-file header with mode `0o644` and mtime 0.
    #[must_use]
    pub fn regular(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Regular,
            size,
            mode: 0o644,
            mtime: 0,
        }
    }

    /// Creates a directory header with mode `0o755` and mtime 0.
    #[must_use]
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            size: 0,
            mode: 0o755,
            mtime: 0,
        }
    }

    /// Sets the permission bits.
    #[must_use]
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the modification time.
    #[must_use]
    pub fn with_mtime(mut self, mtime: u64) -> Self {
        self.mtime = mtime;
        self
    }
}
