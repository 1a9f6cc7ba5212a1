//! Buffered copy helpers with a reusable buffer.
//!
//! Every helper reports which side of the copy failed, so callers can name
//! the right path (archive entry or destination file) in the error.

use std::io::Read;
use std::io::Write;
use std::io::{self};
use std::path::Path;

use crate::ExtractionError;

/// Chunk size for entry reads, reference comparison and copies (64KB).
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Heap buffer reused by every copy of a run.
///
/// # Examples
///
/// ```
/// use ffuntar_core::copy::{CopyBuffer, copy_with_buffer};
///
/// let mut buffer = CopyBuffer::new();
/// let mut input: &[u8] = b"hello";
/// let mut output = Vec::new();
///
/// let copied = copy_with_buffer(&mut input, &mut output, &mut buffer).ok();
/// assert_eq!(copied, Some(5));
/// ```
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Allocates a zeroed buffer of [`CHUNK_SIZE`] bytes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; CHUNK_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Side of a copy that failed.
#[derive(Debug)]
pub enum CopyError {
    /// Reading from the source failed or ended early.
    Read(io::Error),
    /// Writing to the destination failed.
    Write(io::Error),
}

impl CopyError {
    /// Converts into an `ExtractionError` naming the path of the failing side.
    pub fn attribute(self, source: &Path, dest: &Path) -> ExtractionError {
        match self {
            Self::Read(err) => ExtractionError::stream(source, err),
            Self::Write(err) => ExtractionError::stream(dest, err),
        }
    }
}

/// Reads until `buf` is full or the reader is exhausted.
///
/// Returns the number of bytes read; less than `buf.len()` only at end of
/// stream. `Interrupted` reads are retried.
pub fn fill_chunk<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Copies everything from reader to writer using the provided buffer.
///
/// Returns the number of bytes copied.
#[inline]
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> Result<u64, CopyError> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };

        writer
            .write_all(&buffer.buf[..bytes_read])
            .map_err(CopyError::Write)?;

        total = total.saturating_add(bytes_read as u64);
    }

    Ok(total)
}

/// Copies exactly `len` bytes from reader to writer.
///
/// A zero-length request is a no-op. A source that ends before `len` bytes
/// fails with `UnexpectedEof` on the read side.
pub fn copy_exact<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    len: u64,
    buffer: &mut CopyBuffer,
) -> Result<(), CopyError> {
    let mut pending = len;
    while pending > 0 {
        let size = buffer.size();
        let want = usize::try_from(pending).map_or(size, |p| p.min(size));
        let got = fill_chunk(reader, &mut buffer.buf[..want]).map_err(CopyError::Read)?;
        if got == 0 {
            return Err(CopyError::Read(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("source ended {pending} bytes early"),
            )));
        }
        writer
            .write_all(&buffer.buf[..got])
            .map_err(CopyError::Write)?;
        pending -= got as u64;
    }
    Ok(())
}
