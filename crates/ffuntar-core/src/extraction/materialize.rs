//! Writes the on-disk result for a regular entry.
//!
//! Three ways to produce the destination:
//!
//! - **link**: hardlink an identical reference file, writing no data
//! - **full copy**: stream the whole entry into a fresh file
//! - **recover**: copy the verified-equal prefix from the reference file,
//!   then append the drained divergent chunk and the rest of the stream
//!
//! A pre-existing destination is always unlinked first. It may be a hardlink
//! into the reference tree left by an earlier run, and writing through it
//! would corrupt the reference.

use std::fs::File;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::path::Path;

use filetime::FileTime;

use super::ComparisonState;
use super::ExtractionOutcome;
use crate::ExtractionError;
use crate::FsOperation;
use crate::Result;
use crate::copy::CHUNK_SIZE;
use crate::copy::CopyBuffer;
use crate::copy::copy_exact;
use crate::copy::copy_with_buffer;
use crate::types::EntryHeader;

/// Produces destination files and applies their metadata.
#[derive(Debug)]
pub struct Materializer {
    preserve_attributes: bool,
    copy_buffer: CopyBuffer,
}

impl Materializer {
    /// Creates a materializer.
    ///
    /// With `preserve_attributes` the declared permission bits are applied
    /// verbatim; otherwise the process umask applies at creation.
    #[must_use]
    pub fn new(preserve_attributes: bool) -> Self {
        Self {
            preserve_attributes,
            copy_buffer: CopyBuffer::new(),
        }
    }

    /// Hardlinks `candidate` to `dest`.
    ///
    /// A symlinked candidate is resolved first, so `dest` shares the inode of
    /// the file that was compared rather than copying the symlink.
    ///
    /// If the link fails because `dest` reappeared, it is removed once more
    /// and the link retried exactly once.
    ///
    /// The destination shares its inode with the reference file, so no
    /// metadata is applied to it.
    ///
    /// # Errors
    ///
    /// Returns `Filesystem` if the candidate cannot be resolved, the parent
    /// cannot be created, the old destination cannot be removed or linking
    /// fails (including the retry).
    pub fn link(
        &mut self,
        candidate: &Path,
        dest: &Path,
        header: &EntryHeader,
    ) -> Result<ExtractionOutcome> {
        let outcome = ExtractionOutcome::Linked {
            bytes_saved: header.size,
        };
        if is_same_file(candidate, dest) {
            tracing::debug!(path = %dest.display(), "already linked to reference");
            return Ok(outcome);
        }

        let target = std::fs::canonicalize(candidate)
            .map_err(|e| ExtractionError::filesystem(FsOperation::Stat, candidate, e))?;

        ensure_parent(dest)?;
        remove_existing(dest)?;

        match std::fs::hard_link(&target, dest) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!(path = %dest.display(), "destination reappeared, retrying link");
                remove_existing(dest)?;
                std::fs::hard_link(&target, dest)
                    .map_err(|e| ExtractionError::filesystem(FsOperation::Link, dest, e))?;
            }
            Err(e) => return Err(ExtractionError::filesystem(FsOperation::Link, dest, e)),
        }

        Ok(outcome)
    }

    /// Writes all remaining data of `stream` to a fresh `dest`.
    ///
    /// # Errors
    ///
    /// Returns `Filesystem` if the destination cannot be prepared and
    /// `StreamIo` if reading the entry or writing the file fails.
    pub fn full_copy<R: Read + ?Sized>(
        &mut self,
        stream: &mut R,
        header: &EntryHeader,
        dest: &Path,
    ) -> Result<ExtractionOutcome> {
        let mut writer = create_destination(dest, header.mode)?;
        copy_with_buffer(stream, &mut writer, &mut self.copy_buffer)
            .map_err(|e| e.attribute(&header.path, dest))?;
        close(writer, dest)?;

        self.finalize(dest, header)?;
        Ok(ExtractionOutcome::FullCopy)
    }

    /// Rebuilds `dest` from the equal prefix of `reference`, the pending
    /// chunk and the rest of `stream`.
    ///
    /// # Errors
    ///
    /// Returns `Filesystem` if the destination cannot be prepared or the
    /// reference cannot be rewound, and `StreamIo` on read or write
    /// failures (including a reference that shrank below `equal_bytes`).
    pub fn recover<R: Read + ?Sized>(
        &mut self,
        stream: &mut R,
        mut reference: File,
        candidate: &Path,
        state: &ComparisonState,
        header: &EntryHeader,
        dest: &Path,
    ) -> Result<ExtractionOutcome> {
        reference
            .seek(SeekFrom::Start(0))
            .map_err(|e| ExtractionError::filesystem(FsOperation::Seek, candidate, e))?;

        let mut writer = create_destination(dest, header.mode)?;
        copy_exact(
            &mut reference,
            &mut writer,
            state.equal_bytes,
            &mut self.copy_buffer,
        )
        .map_err(|e| e.attribute(candidate, dest))?;
        drop(reference);

        writer
            .write_all(&state.pending)
            .map_err(|e| ExtractionError::stream(dest, e))?;
        copy_with_buffer(stream, &mut writer, &mut self.copy_buffer)
            .map_err(|e| e.attribute(&header.path, dest))?;
        close(writer, dest)?;

        self.finalize(dest, header)?;
        Ok(ExtractionOutcome::PartialRecovery {
            reused_bytes: state.equal_bytes,
        })
    }

    fn finalize(&self, dest: &Path, header: &EntryHeader) -> Result<()> {
        #[cfg(unix)]
        if self.preserve_attributes {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(dest, std::fs::Permissions::from_mode(header.mode))
                .map_err(|e| ExtractionError::filesystem(FsOperation::SetPermissions, dest, e))?;
        }

        let mtime = i64::try_from(header.mtime).unwrap_or(i64::MAX);
        filetime::set_file_mtime(dest, FileTime::from_unix_time(mtime, 0))
            .map_err(|e| ExtractionError::filesystem(FsOperation::SetTimes, dest, e))
    }
}

/// Returns `true` when both paths name the same inode.
///
/// Removing `dest` in that case would delete the reference file itself.
#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (std::fs::metadata(a), std::fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(_a: &Path, _b: &Path) -> bool {
    false
}

fn ensure_parent(dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| ExtractionError::filesystem(FsOperation::CreateDir, parent, e))?;
    }
    Ok(())
}

fn remove_existing(dest: &Path) -> Result<()> {
    match std::fs::remove_file(dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ExtractionError::filesystem(FsOperation::Remove, dest, e)),
    }
}

fn create_destination(dest: &Path, mode: u32) -> Result<BufWriter<File>> {
    ensure_parent(dest)?;
    remove_existing(dest)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode & 0o7777);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let file = options
        .open(dest)
        .map_err(|e| ExtractionError::filesystem(FsOperation::Create, dest, e))?;
    Ok(BufWriter::with_capacity(CHUNK_SIZE, file))
}

fn close(writer: BufWriter<File>, dest: &Path) -> Result<()> {
    let file = writer
        .into_inner()
        .map_err(|e| ExtractionError::stream(dest, e.into_error()))?;
    drop(file);
    Ok(())
}
