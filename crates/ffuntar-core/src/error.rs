//! Error types for flash-friendly extraction.

use std::fmt;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Filesystem operation that failed on a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOperation {
    /// Opening a file for reading.
    Open,
    /// Creating or truncating a destination file.
    Create,
    /// Creating a directory.
    CreateDir,
    /// Removing a pre-existing destination.
    Remove,
    /// Creating a hardlink.
    Link,
    /// Reading file metadata.
    Stat,
    /// Seeking inside a reference file.
    Seek,
    /// Applying permission bits.
    SetPermissions,
    /// Applying the modification time.
    SetTimes,
    /// Unpacking a non-regular entry verbatim.
    Unpack,
}

impl fmt::Display for FsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Open => "open",
            Self::Create => "create",
            Self::CreateDir => "create directory",
            Self::Remove => "remove",
            Self::Link => "hardlink",
            Self::Stat => "stat",
            Self::Seek => "seek",
            Self::SetPermissions => "set permissions on",
            Self::SetTimes => "set times on",
            Self::Unpack => "unpack",
        };
        f.write_str(verb)
    }
}

/// Errors that can occur while extracting an archive.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// I/O operation failed outside any specific entry.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input stream is not in any supported container or codec.
    #[error("unsupported archive format")]
    UnsupportedFormat,

    /// Entry sequence is malformed (bad header, truncated framing).
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Reading entry data or writing destination data failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    StreamIo {
        /// Path of the entry or file being read or written.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },

    /// A filesystem operation on a path failed.
    #[error("cannot {operation} '{}': {source}", .path.display())]
    Filesystem {
        /// Operation that failed.
        operation: FsOperation,
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },

    /// Entry path would land outside the output directory.
    #[error("path traversal detected: {}", .path.display())]
    PathTraversal {
        /// The offending entry path.
        path: PathBuf,
    },
}

impl ExtractionError {
    /// Builds a `Filesystem` error.
    pub fn filesystem(operation: FsOperation, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Builds a `StreamIo` error.
    pub fn stream(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::StreamIo {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the entry sequence itself could not be decoded.
    ///
    /// Decode errors abort the run regardless of the failure policy: once
    /// framing is lost there is no next entry to move on to.
    ///
    /// # Examples
    ///
    /// ```
    /// use ffuntar_core::ExtractionError;
    ///
    /// let err = ExtractionError::InvalidArchive("bad checksum".to_string());
    /// assert!(err.is_decode_error());
    ///
    /// let err = ExtractionError::stream("a.txt", std::io::Error::other("disk full"));
    /// assert!(!err.is_decode_error());
    /// ```
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        matches!(self, Self::InvalidArchive(_) | Self::UnsupportedFormat)
    }

    /// Returns the path the error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::StreamIo { path, .. }
            | Self::Filesystem { path, .. }
            | Self::PathTraversal { path } => Some(path),
            _ => None,
        }
    }

    /// Returns the underlying OS error, if any.
    #[must_use]
    pub const fn os_error(&self) -> Option<&io::Error> {
        match self {
            Self::Io(source) | Self::StreamIo { source, .. } | Self::Filesystem { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}
