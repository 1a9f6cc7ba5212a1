//! Run statistics and progress reporting.

use std::path::PathBuf;
use std::time::Duration;

use crate::ExtractionError;
use crate::extraction::ExtractionOutcome;
use crate::types::EntryHeader;

/// An entry that failed under the continue-on-error policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    /// Archive path of the entry.
    pub path: PathBuf,
    /// Rendered error message.
    pub message: String,
}

/// Statistics accumulated over one extraction run.
///
/// Owned by the top-level run and passed by `&mut` into the pipeline.
/// Purely additive: nothing ever subtracts from a counter.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Number of entries seen, of any kind.
    pub entries_seen: usize,

    /// Sum of declared sizes of every entry seen.
    pub total_bytes_seen: u64,

    /// Bytes whose writes were avoided by hardlinking.
    pub saved_write_bytes: u64,

    /// Number of regular files hardlinked to the reference tree.
    pub linked_files: usize,

    /// Number of regular files written entirely from the stream.
    pub copied_files: usize,

    /// Number of regular files rebuilt by partial recovery.
    pub recovered_files: usize,

    /// Bytes copied from reference files during partial recovery.
    pub reused_bytes: u64,

    /// Number of non-regular entries unpacked verbatim.
    pub passed_through: usize,

    /// Duration of the run.
    pub duration: Duration,

    /// Entries that failed under the continue-on-error policy.
    pub failures: Vec<EntryFailure>,
}

/// Summary figures of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    /// Sum of declared sizes of every entry seen.
    pub total_bytes_seen: u64,
    /// Bytes whose writes were avoided.
    pub saved_write_bytes: u64,
    /// Number of hardlinked files.
    pub linked_file_count: usize,
    /// `saved_write_bytes * 100 / total_bytes_seen`, 0 when nothing was seen.
    pub savings_percent: f64,
}

impl RunStats {
    /// Creates empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry of `bytes` declared size.
    pub fn record_seen(&mut self, bytes: u64) {
        self.entries_seen += 1;
        self.total_bytes_seen = self.total_bytes_seen.saturating_add(bytes);
    }

    /// Records a hardlinked file of `bytes` size.
    pub fn record_linked(&mut self, bytes: u64) {
        self.linked_files += 1;
        self.saved_write_bytes = self.saved_write_bytes.saturating_add(bytes);
    }

    /// Updates the counter matching `outcome`.
    pub fn record_outcome(&mut self, outcome: &ExtractionOutcome) {
        match *outcome {
            ExtractionOutcome::Linked { bytes_saved } => self.record_linked(bytes_saved),
            ExtractionOutcome::FullCopy => self.copied_files += 1,
            ExtractionOutcome::PartialRecovery { reused_bytes } => {
                self.recovered_files += 1;
                self.reused_bytes = self.reused_bytes.saturating_add(reused_bytes);
            }
            ExtractionOutcome::PassThrough => self.passed_through += 1,
            ExtractionOutcome::Listed => {}
        }
    }

    /// Records a failed entry.
    pub fn record_failure(&mut self, path: PathBuf, error: &ExtractionError) {
        self.failures.push(EntryFailure {
            path,
            message: error.to_string(),
        });
    }

    /// Returns whether any entry failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Percentage of seen bytes whose write was avoided.
    ///
    /// Defined as 0 when no bytes were seen.
    ///
    /// # Examples
    ///
    /// ```
    /// use ffuntar_core::RunStats;
    ///
    /// let mut stats = RunStats::new();
    /// assert_eq!(stats.savings_percent(), 0.0);
    ///
    /// stats.record_seen(400);
    /// stats.record_seen(100);
    /// stats.record_linked(400);
    /// assert_eq!(stats.savings_percent(), 80.0);
    /// ```
    #[must_use]
    pub fn savings_percent(&self) -> f64 {
        if self.total_bytes_seen == 0 {
            return 0.0;
        }
        self.saved_write_bytes as f64 * 100.0 / self.total_bytes_seen as f64
    }

    /// Returns the summary figures.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_bytes_seen: self.total_bytes_seen,
            saved_write_bytes: self.saved_write_bytes,
            linked_file_count: self.linked_files,
            savings_percent: self.savings_percent(),
        }
    }
}

/// Callback trait for progress reporting during a run.
///
/// # Examples
///
/// ```
/// use ffuntar_core::ProgressCallback;
/// use ffuntar_core::RunStats;
/// use ffuntar_core::extraction::ExtractionOutcome;
/// use ffuntar_core::types::EntryHeader;
///
/// struct Printer;
///
/// impl ProgressCallback for Printer {
///     fn on_entry_start(&mut self, header: &EntryHeader, index: usize) {
///         println!("#{index}: {}", header.path.display());
///     }
///
///     fn on_entry_complete(&mut self, header: &EntryHeader, outcome: &ExtractionOutcome) {
///         println!("{} {}", outcome.label(), header.path.display());
///     }
///
///     fn on_complete(&mut self, stats: &RunStats) {
///         println!("{} files linked", stats.linked_files);
///     }
/// }
/// ```
pub trait ProgressCallback {
    /// Called before an entry is processed.
    ///
    /// `index` is 1-based.
    fn on_entry_start(&mut self, header: &EntryHeader, index: usize);

    /// Called after an entry was processed successfully.
    fn on_entry_complete(&mut self, header: &EntryHeader, outcome: &ExtractionOutcome);

    /// Called once when the run finished.
    fn on_complete(&mut self, stats: &RunStats);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _header: &EntryHeader, _index: usize) {}

    fn on_entry_complete(&mut self, _header: &EntryHeader, _outcome: &ExtractionOutcome) {}

    fn on_complete(&mut self, _stats: &RunStats) {}
}
