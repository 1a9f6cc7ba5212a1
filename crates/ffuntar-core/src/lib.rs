//! Flash-friendly tar extraction.
//!
//! `ffuntar-core` extracts tar streams while avoiding writes to
//! wear-sensitive storage: a regular file whose content is byte-identical to
//! a file in a reference directory is hardlinked instead of written again.
//! Files that differ only past a common prefix reuse that prefix from the
//! reference file instead of rewriting it from the stream.
//!
//! # Examples
//!
//! ```no_run
//! use ffuntar_core::ArchiveInput;
//! use ffuntar_core::ExtractConfig;
//! use ffuntar_core::extract_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtractConfig::new()
//!     .with_reference_dir(Some("/data/current".into()))
//!     .with_strip_levels(1)
//!     .with_output_dir("/data/next");
//! let stats = extract_archive(&ArchiveInput::from_arg("update.tar.xz"), &config)?;
//! println!(
//!     "Linked {} files, saved {} bytes ({:.1}%)",
//!     stats.linked_files,
//!     stats.saved_write_bytes,
//!     stats.savings_percent()
//! );
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod copy;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod report;
#[doc(hidden)]
pub mod test_utils;
pub mod types;

// Re-export main API types
pub use api::ArchiveInput;
pub use api::extract_archive;
pub use api::extract_archive_into;
pub use api::extract_archive_with_progress;
pub use api::extract_from_reader;
pub use api::extract_from_reader_into;
pub use config::ExtractConfig;
pub use config::FailurePolicy;
pub use error::ExtractionError;
pub use error::FsOperation;
pub use error::Result;
pub use extraction::ExtractionOutcome;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use report::RunStats;
pub use report::StatsSnapshot;

// Re-export types module for easier access
pub use types::EntryHeader;
pub use types::EntryKind;
pub use types::SafePath;
