//! High-level public API for deduplicating extraction.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use crate::ExtractConfig;
use crate::ExtractionError;
use crate::FsOperation;
use crate::Result;
use crate::copy::CHUNK_SIZE;
use crate::extraction::ExtractionEngine;
use crate::formats::TarEntry;
use crate::formats::open_decoder;
use crate::report::NoopProgress;
use crate::report::ProgressCallback;
use crate::report::RunStats;

/// Where the archive stream comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveInput {
    /// A named archive file.
    File(PathBuf),
    /// Standard input.
    Stdin,
}

impl ArchiveInput {
    /// Interprets a command-line argument; `-` means standard input.
    ///
    /// # Examples
    ///
    /// ```
    /// use ffuntar_core::ArchiveInput;
    ///
    /// assert_eq!(ArchiveInput::from_arg("-"), ArchiveInput::Stdin);
    /// assert_eq!(
    ///     ArchiveInput::from_arg("update.tar"),
    ///     ArchiveInput::File("update.tar".into())
    /// );
    /// ```
    #[must_use]
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    fn open(&self) -> Result<Box<dyn Read>> {
        match self {
            Self::File(path) => {
                let file = File::open(path)
                    .map_err(|e| ExtractionError::filesystem(FsOperation::Open, path, e))?;
                Ok(Box::new(BufReader::with_capacity(CHUNK_SIZE, file)))
            }
            Self::Stdin => Ok(Box::new(std::io::stdin().lock())),
        }
    }
}

/// Extracts an archive, hardlinking files identical to the reference tree.
///
/// # Errors
///
/// Returns an error if the input cannot be opened or decoded, or if an
/// entry fails under [`FailurePolicy::FailFast`](crate::FailurePolicy).
///
/// # Examples
///
/// ```no_run
/// use ffuntar_core::ArchiveInput;
/// use ffuntar_core::ExtractConfig;
/// use ffuntar_core::extract_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ExtractConfig::new()
///     .with_reference_dir(Some("/data/current".into()))
///     .with_strip_levels(1);
/// let stats = extract_archive(&ArchiveInput::from_arg("update.tar.gz"), &config)?;
/// println!("Linked {} files", stats.linked_files);
/// # Ok(())
/// # }
/// ```
pub fn extract_archive(input: &ArchiveInput, config: &ExtractConfig) -> Result<RunStats> {
    extract_archive_with_progress(input, config, &mut NoopProgress)
}

/// Extracts an archive with progress reporting.
///
/// # Errors
///
/// Same as [`extract_archive`].
pub fn extract_archive_with_progress(
    input: &ArchiveInput,
    config: &ExtractConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<RunStats> {
    let mut stats = RunStats::new();
    extract_archive_into(input, config, progress, &mut stats)?;
    Ok(stats)
}

/// Extracts an archive, accumulating into caller-owned `stats`.
///
/// When the run fails, `stats` still holds every entry recorded before the
/// failure, so a summary can be reported for aborted runs too.
///
/// # Errors
///
/// Same as [`extract_archive`].
pub fn extract_archive_into(
    input: &ArchiveInput,
    config: &ExtractConfig,
    progress: &mut dyn ProgressCallback,
    stats: &mut RunStats,
) -> Result<()> {
    let reader = input.open()?;
    extract_from_reader_into(reader, config, progress, stats)
}

/// Extracts a (possibly compressed) tar stream read from `reader`.
///
/// # Errors
///
/// Same as [`extract_archive`].
pub fn extract_from_reader<R: Read>(
    reader: R,
    config: &ExtractConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<RunStats> {
    let mut stats = RunStats::new();
    extract_from_reader_into(reader, config, progress, &mut stats)?;
    Ok(stats)
}

/// Extracts a tar stream from `reader` into caller-owned `stats`.
///
/// # Errors
///
/// Same as [`extract_archive`].
pub fn extract_from_reader_into<R: Read>(
    reader: R,
    config: &ExtractConfig,
    progress: &mut dyn ProgressCallback,
    stats: &mut RunStats,
) -> Result<()> {
    let started = Instant::now();
    let result = run_pipeline(reader, config, progress, stats);
    stats.duration = started.elapsed();
    result?;

    progress.on_complete(stats);
    tracing::info!(
        entries = stats.entries_seen,
        linked = stats.linked_files,
        saved_bytes = stats.saved_write_bytes,
        "extraction finished"
    );
    Ok(())
}

fn run_pipeline<R: Read>(
    reader: R,
    config: &ExtractConfig,
    progress: &mut dyn ProgressCallback,
    stats: &mut RunStats,
) -> Result<()> {
    let (_, decoder) = open_decoder(reader)?;

    let mut archive = tar::Archive::new(decoder);
    archive.set_preserve_mtime(true);
    archive.set_overwrite(true);
    archive.set_preserve_permissions(config.preserve_attributes);
    archive.set_unpack_xattrs(config.preserve_attributes);

    let entries = archive
        .entries()
        .map_err(|e| ExtractionError::InvalidArchive(format!("failed to read TAR entries: {e}")))?;

    let mut engine = ExtractionEngine::new(config.clone());
    engine.run(entries.map(TarEntry::from_result), stats, progress)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_from_arg() {
        assert_eq!(ArchiveInput::from_arg("-"), ArchiveInput::Stdin);
        assert_eq!(
            ArchiveInput::from_arg("./-"),
            ArchiveInput::File(PathBuf::from("./-"))
        );
    }

    #[test]
    fn test_missing_input_file() {
        let temp = TempDir::new().unwrap();
        let input = ArchiveInput::File(temp.path().join("missing.tar"));
        let err = extract_archive(&input, &ExtractConfig::new()).unwrap_err();

        assert!(matches!(
            err,
            ExtractionError::Filesystem {
                operation: FsOperation::Open,
                ..
            }
        ));
    }

    #[test]
    fn test_extract_from_reader_plain_copy() {
        let temp = TempDir::new().unwrap();
        let data = TarTestBuilder::new()
            .add_directory("top/")
            .add_file("top/a.txt", b"alpha")
            .build();
        let config = ExtractConfig::new().with_output_dir(temp.path());

        let stats = extract_from_reader(Cursor::new(data), &config, &mut NoopProgress).unwrap();

        assert_eq!(stats.entries_seen, 2);
        assert_eq!(stats.copied_files, 1);
        assert_eq!(stats.passed_through, 1);
        assert_eq!(std::fs::read(temp.path().join("top/a.txt")).unwrap(), b"alpha");
    }

    #[test]
    fn test_stats_survive_fatal_error() {
        let temp = TempDir::new().unwrap();
        let mut data = TarTestBuilder::new()
            .add_file("a.txt", b"alpha")
            .add_file("b.bin", &[1u8; 4096])
            .build();
        // Cut inside the second entry's header block.
        data.truncate(1024 + 100);
        let config = ExtractConfig::new().with_output_dir(temp.path());

        let mut stats = RunStats::new();
        let result =
            extract_from_reader_into(Cursor::new(data), &config, &mut NoopProgress, &mut stats);

        assert!(result.unwrap_err().is_decode_error());
        assert_eq!(stats.copied_files, 1);
        assert_eq!(stats.entries_seen, 1);
    }

    #[test]
    fn test_garbage_input_is_decode_error() {
        let temp = TempDir::new().unwrap();
        let config = ExtractConfig::new().with_output_dir(temp.path());
        let garbage = vec![0x55u8; 1024];

        let err = extract_from_reader(Cursor::new(garbage), &config, &mut NoopProgress).unwrap_err();
        assert!(err.is_decode_error());
    }
}
