//! Error conversion utilities for CLI.
//!
//! Converts ffuntar-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use ffuntar_core::ArchiveInput;
use ffuntar_core::ExtractionError;
use ffuntar_core::FsOperation;
use std::io::ErrorKind;

/// Human-readable name of the archive input.
pub fn describe_input(input: &ArchiveInput) -> String {
    match input {
        ArchiveInput::File(path) => path.display().to_string(),
        ArchiveInput::Stdin => "<stdin>".to_string(),
    }
}

/// Converts `ExtractionError` to user-friendly anyhow error with context
pub fn convert_extraction_error(err: ExtractionError, input: &ArchiveInput) -> anyhow::Error {
    let archive = describe_input(input);
    match err {
        ExtractionError::PathTraversal { path } => {
            anyhow!(
                "Archive '{archive}' contains an entry outside the output directory: '{}'\n\
                 HINT: This archive may be malicious. Do not extract from untrusted sources.",
                path.display()
            )
        }
        ExtractionError::UnsupportedFormat => {
            anyhow!(
                "Archive format not supported: {archive}\n\
                 HINT: Supported inputs: tar, tar.gz, tar.bz2, tar.xz, tar.zst"
            )
        }
        ExtractionError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid archive '{archive}': {reason}\n\
                 HINT: The archive may be corrupted or truncated."
            )
        }
        ExtractionError::Filesystem {
            operation: FsOperation::Link,
            ref source,
            ..
        } if source.kind() == ErrorKind::CrossesDevices => {
            anyhow!(
                "{err}\n\
                 HINT: Hardlinks cannot cross filesystems. Put the output directory on the \
                 same filesystem as the reference directory."
            )
        }
        ExtractionError::Filesystem {
            operation: FsOperation::Open,
            ref source,
            ..
        } if source.kind() == ErrorKind::NotFound => {
            anyhow!("Archive not found: {archive}")
        }
        ref e if e.os_error().map(std::io::Error::kind) == Some(ErrorKind::PermissionDenied) => {
            anyhow!(
                "{err}\n\
                 HINT: Check write permission on the output directory and read permission \
                 on the reference directory."
            )
        }
        ref e if e.os_error().map(std::io::Error::kind) == Some(ErrorKind::StorageFull) => {
            anyhow!("{err}\nHINT: The output filesystem is full.")
        }
        _ => anyhow::Error::from(err).context(format!("Error extracting '{archive}'")),
    }
}

/// Adds context to a core result about the archive being processed
pub fn add_archive_context<T>(
    result: Result<T, ExtractionError>,
    input: &ArchiveInput,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_extraction_error(e, input))
}
