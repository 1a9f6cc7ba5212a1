//! Tar entry adapter.

use std::io::Read;
use std::path::Path;

use crate::ExtractionError;
use crate::FsOperation;
use crate::Result;
use crate::formats::EntryStream;
use crate::types::EntryHeader;
use crate::types::EntryKind;

/// A `tar::Entry` exposed as an [`EntryStream`].
pub struct TarEntry<'a, R: Read> {
    inner: tar::Entry<'a, R>,
    header: EntryHeader,
}

impl<'a, R: Read> TarEntry<'a, R> {
    /// Wraps a tar entry, decoding its header.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArchive` if the path, mode or mtime fields are
    /// malformed.
    pub fn new(inner: tar::Entry<'a, R>) -> Result<Self> {
        let path = inner
            .path()
            .map_err(|e| ExtractionError::InvalidArchive(format!("invalid path: {e}")))?
            .into_owned();
        let raw = inner.header();
        let mode = raw
            .mode()
            .map_err(|e| ExtractionError::InvalidArchive(format!("invalid mode: {e}")))?;
        let mtime = raw
            .mtime()
            .map_err(|e| ExtractionError::InvalidArchive(format!("invalid mtime: {e}")))?;

        let header = EntryHeader {
            path,
            kind: convert_entry_type(raw.entry_type()),
            size: inner.size(),
            mode,
            mtime,
        };
        Ok(Self { inner, header })
    }

    /// Adapts one item of `tar::Archive::entries()`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArchive` if the entry could not be read from the
    /// container or its header is malformed.
    pub fn from_result(entry: std::io::Result<tar::Entry<'a, R>>) -> Result<Self> {
        let entry = entry
            .map_err(|e| ExtractionError::InvalidArchive(format!("failed to read TAR entry: {e}")))?;
        Self::new(entry)
    }
}

impl<R: Read> std::fmt::Debug for TarEntry<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TarEntry")
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

impl<R: Read> Read for TarEntry<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read> EntryStream for TarEntry<'_, R> {
    fn header(&self) -> &EntryHeader {
        &self.header
    }

    fn unpack_verbatim(&mut self, output_dir: &Path) -> Result<()> {
        let unpacked = self.inner.unpack_in(output_dir).map_err(|e| {
            ExtractionError::filesystem(
                FsOperation::Unpack,
                output_dir.join(&self.header.path),
                e,
            )
        })?;
        if unpacked {
            Ok(())
        } else {
            Err(ExtractionError::PathTraversal {
                path: self.header.path.clone(),
            })
        }
    }
}

/// Maps tar entry types onto the pipeline's kinds.
///
/// GNU contiguous files are plain regular files for extraction purposes.
/// Everything that is not a file, directory or symlink (hard links,
/// devices, FIFOs) is unpacked verbatim.
fn convert_entry_type(entry_type: tar::EntryType) -> EntryKind {
    match entry_type {
        tar::EntryType::Regular | tar::EntryType::Continuous => EntryKind::Regular,
        tar::EntryType::Directory => EntryKind::Directory,
        tar::EntryType::Symlink => EntryKind::Symlink,
        _ => EntryKind::Other,
    }
}
