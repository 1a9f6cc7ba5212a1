//! Lockstep comparison of an entry stream against a reference file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::ExtractionError;
use crate::FsOperation;
use crate::Result;
use crate::copy::CHUNK_SIZE;
use crate::copy::fill_chunk;
use crate::types::EntryHeader;

/// Progress of a comparison that stopped matching.
///
/// `equal_bytes` never exceeds the smaller of the entry and reference
/// sizes. `pending` holds bytes already drained from the entry stream that
/// were not (or could not be) matched; they must be written to the
/// destination before any further stream data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonState {
    /// Bytes confirmed identical from offset 0.
    pub equal_bytes: u64,
    /// Drained entry bytes that still have to be written.
    pub pending: Vec<u8>,
    /// Set once a difference has been observed. Never reverts.
    pub diverged: bool,
}

/// Result of comparing an entry against its reference candidate.
#[derive(Debug)]
pub enum ComparisonOutcome {
    /// Every byte matched and the stream delivered exactly the declared size.
    FullMatch,
    /// Candidate could not be opened or is not a regular file.
    NoCandidate,
    /// Candidate size differs from the declared entry size.
    SizeMismatch {
        /// Size of the candidate on disk.
        reference_size: u64,
    },
    /// Content diverged after `state.equal_bytes` bytes.
    Diverged {
        /// Open handle on the candidate, reused for recovery.
        reference: File,
        /// Where and how the comparison stopped.
        state: ComparisonState,
    },
}

impl ComparisonOutcome {
    /// Short name for log events.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FullMatch => "full-match",
            Self::NoCandidate => "no-candidate",
            Self::SizeMismatch { .. } => "size-mismatch",
            Self::Diverged { .. } => "diverged",
        }
    }
}

/// Compares entry streams against reference files chunk by chunk.
///
/// Holds the two chunk buffers so that a run allocates them once.
#[derive(Debug)]
pub struct Comparator {
    entry_buf: Box<[u8]>,
    reference_buf: Box<[u8]>,
}

impl Comparator {
    /// Creates a comparator with [`CHUNK_SIZE`] buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_chunk_size(CHUNK_SIZE)
    }

    /// Creates a comparator reading `chunk_size` bytes at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    #[must_use]
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be non-zero");
        Self {
            entry_buf: vec![0u8; chunk_size].into_boxed_slice(),
            reference_buf: vec![0u8; chunk_size].into_boxed_slice(),
        }
    }

    /// Compares `stream` against the file at `candidate`.
    ///
    /// On `NoCandidate` and `SizeMismatch` nothing has been read from
    /// `stream`. On `FullMatch` the stream is exhausted. On `Diverged` the
    /// stream is positioned right after `state.pending`.
    ///
    /// # Errors
    ///
    /// Returns `StreamIo` if reading the entry stream or the candidate
    /// fails, and `Filesystem` if an opened candidate cannot be stat'ed. A
    /// candidate that cannot be opened is not an error.
    pub fn compare<R: Read + ?Sized>(
        &mut self,
        stream: &mut R,
        header: &EntryHeader,
        candidate: &Path,
    ) -> Result<ComparisonOutcome> {
        let Ok(mut reference) = File::open(candidate) else {
            return Ok(ComparisonOutcome::NoCandidate);
        };
        let metadata = reference
            .metadata()
            .map_err(|e| ExtractionError::filesystem(FsOperation::Stat, candidate, e))?;
        if !metadata.is_file() {
            return Ok(ComparisonOutcome::NoCandidate);
        }
        if metadata.len() != header.size {
            return Ok(ComparisonOutcome::SizeMismatch {
                reference_size: metadata.len(),
            });
        }

        let mut equal_bytes: u64 = 0;
        loop {
            let n = fill_chunk(stream, &mut self.entry_buf)
                .map_err(|e| ExtractionError::stream(&header.path, e))?;
            if n == 0 {
                break;
            }

            let m = fill_chunk(&mut reference, &mut self.reference_buf[..n])
                .map_err(|e| ExtractionError::stream(candidate, e))?;
            if m < n || self.entry_buf[..n] != self.reference_buf[..n] {
                let state = ComparisonState {
                    equal_bytes,
                    pending: self.entry_buf[..n].to_vec(),
                    diverged: true,
                };
                return Ok(ComparisonOutcome::Diverged { reference, state });
            }
            equal_bytes += n as u64;
        }

        if equal_bytes == header.size {
            Ok(ComparisonOutcome::FullMatch)
        } else {
            // Entry data ended short of its declared size.
            let state = ComparisonState {
                equal_bytes,
                pending: Vec::new(),
                diverged: true,
            };
            Ok(ComparisonOutcome::Diverged { reference, state })
        }
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn reference(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_candidate() {
        let dir = TempDir::new().unwrap();
        let mut comparator = Comparator::new();
        let mut stream = Cursor::new(b"ABC".to_vec());
        let header = EntryHeader::regular("f.txt", 3);

        let outcome = comparator
            .compare(&mut stream, &header, &dir.path().join("missing"))
            .unwrap();
        assert!(matches!(outcome, ComparisonOutcome::NoCandidate));
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_directory_candidate() {
        let dir = TempDir::new().unwrap();
        let mut comparator = Comparator::new();
        let mut stream = Cursor::new(Vec::new());
        let header = EntryHeader::regular("sub", 0);
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let outcome = comparator
            .compare(&mut stream, &header, &dir.path().join("sub"))
            .unwrap();
        assert!(matches!(outcome, ComparisonOutcome::NoCandidate));
    }

    #[test]
    fn test_size_mismatch_reads_nothing() {
        let dir = TempDir::new().unwrap();
        let candidate = reference(&dir, "f.txt", b"ABCD");
        let mut comparator = Comparator::new();
        let mut stream = Cursor::new(b"ABC".to_vec());
        let header = EntryHeader::regular("f.txt", 3);

        let outcome = comparator.compare(&mut stream, &header, &candidate).unwrap();
        assert!(matches!(
            outcome,
            ComparisonOutcome::SizeMismatch { reference_size: 4 }
        ));
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_full_match() {
        let dir = TempDir::new().unwrap();
        let candidate = reference(&dir, "f.txt", b"ABC");
        let mut comparator = Comparator::new();
        let mut stream = Cursor::new(b"ABC".to_vec());
        let header = EntryHeader::regular("f.txt", 3);

        let outcome = comparator.compare(&mut stream, &header, &candidate).unwrap();
        assert!(matches!(outcome, ComparisonOutcome::FullMatch));
    }

    #[test]
    fn test_zero_length_matches_vacuously() {
        let dir = TempDir::new().unwrap();
        let candidate = reference(&dir, "empty", b"");
        let mut comparator = Comparator::new();
        let mut stream = Cursor::new(Vec::new());
        let header = EntryHeader::regular("empty", 0);

        let outcome = comparator.compare(&mut stream, &header, &candidate).unwrap();
        assert!(matches!(outcome, ComparisonOutcome::FullMatch));
    }

    #[test]
    fn test_divergence_in_single_chunk() {
        let dir = TempDir::new().unwrap();
        let candidate = reference(&dir, "f.txt", b"ABX");
        let mut comparator = Comparator::new();
        let mut stream = Cursor::new(b"ABC".to_vec());
        let header = EntryHeader::regular("f.txt", 3);

        let outcome = comparator.compare(&mut stream, &header, &candidate).unwrap();
        let ComparisonOutcome::Diverged { state, .. } = outcome else {
            panic!("expected divergence, got {}", outcome.name());
        };
        assert_eq!(state.equal_bytes, 0);
        assert_eq!(state.pending, b"ABC");
        assert!(state.diverged);
    }

    #[test]
    fn test_divergence_after_equal_chunks() {
        let dir = TempDir::new().unwrap();
        let mut entry = vec![7u8; 10];
        let candidate = reference(&dir, "f.bin", &entry);
        entry[9] = 8;

        let mut comparator = Comparator::with_chunk_size(4);
        let mut stream = Cursor::new(entry);
        let header = EntryHeader::regular("f.bin", 10);

        let outcome = comparator.compare(&mut stream, &header, &candidate).unwrap();
        let ComparisonOutcome::Diverged { state, .. } = outcome else {
            panic!("expected divergence, got {}", outcome.name());
        };
        assert_eq!(state.equal_bytes, 8);
        assert_eq!(state.pending, vec![7, 8]);
        assert_eq!(stream.position(), 10);
    }

    #[test]
    fn test_stream_shorter_than_declared() {
        let dir = TempDir::new().unwrap();
        let candidate = reference(&dir, "f.txt", b"ABCDEF");
        let mut comparator = Comparator::with_chunk_size(2);
        let mut stream = Cursor::new(b"ABCD".to_vec());
        let header = EntryHeader::regular("f.txt", 6);

        let outcome = comparator.compare(&mut stream, &header, &candidate).unwrap();
        let ComparisonOutcome::Diverged { state, .. } = outcome else {
            panic!("expected divergence, got {}", outcome.name());
        };
        assert_eq!(state.equal_bytes, 4);
        assert!(state.pending.is_empty());
    }
}
