//! Archive entry kind enumeration.

/// Kind of entry in an archive.
///
/// Only [`EntryKind::Regular`] entries take part in reference matching;
/// every other kind is unpacked verbatim.
///
/// # Examples
///
/// ```
/// use ffuntar_core::types::EntryKind;
///
/// assert!(EntryKind::Regular.is_regular());
/// assert!(!EntryKind::Directory.is_regular());
/// assert_eq!(EntryKind::Symlink.type_char(), 'l');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file entry.
    Regular,

    /// Directory entry.
    Directory,

    /// Symbolic link entry.
    Symlink,

    /// Hard links, devices, FIFOs and anything else the container knows.
    Other,
}

impl EntryKind {
    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_regular(self) -> bool {
        matches!(self, Self::Regular)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns the `ls -l` style type character.
    #[must_use]
    pub const fn type_char(self) -> char {
        match self {
            Self::Regular => '-',
            Self::Directory => 'd',
            Self::Symlink => 'l',
            Self::Other => '?',
        }
    }

    /// Returns a lowercase name for machine-readable output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Regular => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Other => "other",
        }
    }
}
