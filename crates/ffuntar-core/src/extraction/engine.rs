//! Per-entry dispatch and run policy.

use std::path::Path;
use std::path::PathBuf;

use filetime::FileTime;

use crate::ExtractConfig;
use crate::ExtractionError;
use crate::FailurePolicy;
use crate::FsOperation;
use crate::Result;
use crate::formats::EntryStream;
use crate::report::ProgressCallback;
use crate::report::RunStats;
use crate::types::SafePath;

use super::ComparisonOutcome;
use super::Comparator;
use super::ExtractionOutcome;
use super::Materializer;
use super::ReferenceResolver;

/// Drives entries through resolve, compare and materialize.
///
/// Entries are processed one at a time in stream order. Every handle
/// opened for an entry is released before `process` returns.
///
/// # Examples
///
/// ```no_run
/// use ffuntar_core::ExtractConfig;
/// use ffuntar_core::NoopProgress;
/// use ffuntar_core::RunStats;
/// use ffuntar_core::extraction::ExtractionEngine;
/// use ffuntar_core::formats::TarEntry;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let file = std::fs::File::open("update.tar")?;
/// let mut archive = tar::Archive::new(file);
/// let config = ExtractConfig::new().with_reference_dir(Some("/data/current".into()));
///
/// let mut engine = ExtractionEngine::new(config);
/// let mut stats = RunStats::new();
/// let entries = archive.entries()?.map(TarEntry::from_result);
/// engine.run(entries, &mut stats, &mut NoopProgress)?;
/// println!("linked {} files", stats.linked_files);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExtractionEngine {
    config: ExtractConfig,
    resolver: ReferenceResolver,
    comparator: Comparator,
    materializer: Materializer,
    /// Directories unpacked so far with their declared mtimes.
    directory_times: Vec<(PathBuf, u64)>,
    /// Canonical output directory, resolved on first write.
    output_root: Option<PathBuf>,
}

impl ExtractionEngine {
    /// Creates an engine for one run.
    #[must_use]
    pub fn new(config: ExtractConfig) -> Self {
        let resolver = ReferenceResolver::new(config.reference_dir.clone(), config.strip_levels);
        let materializer = Materializer::new(config.preserve_attributes);
        Self {
            config,
            resolver,
            comparator: Comparator::new(),
            materializer,
            directory_times: Vec::new(),
            output_root: None,
        }
    }

    /// Returns the run configuration.
    #[must_use]
    pub const fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Processes a single entry.
    ///
    /// Records the entry's declared size and its outcome into `stats`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry path escapes the output directory or
    /// any read, write or filesystem operation for this entry fails.
    pub fn process<E: EntryStream + ?Sized>(
        &mut self,
        entry: &mut E,
        stats: &mut RunStats,
    ) -> Result<ExtractionOutcome> {
        let header = entry.header().clone();
        stats.record_seen(header.size);

        if self.config.list_only {
            return Ok(ExtractionOutcome::Listed);
        }

        let dest = SafePath::new(&header.path)?.under(&self.config.output_dir);

        let outcome = if header.kind.is_regular() {
            self.prepare_parent(&dest, &header.path)?;
            match self.resolver.candidate_for(&header.path) {
                None => self.materializer.full_copy(entry, &header, &dest)?,
                Some(candidate) => {
                    let comparison = self.comparator.compare(entry, &header, &candidate)?;
                    tracing::debug!(
                        path = %header.path.display(),
                        candidate = %candidate.display(),
                        result = comparison.name(),
                        "compared with reference"
                    );
                    match comparison {
                        ComparisonOutcome::FullMatch => {
                            self.materializer.link(&candidate, &dest, &header)?
                        }
                        ComparisonOutcome::NoCandidate | ComparisonOutcome::SizeMismatch { .. } => {
                            self.materializer.full_copy(entry, &header, &dest)?
                        }
                        ComparisonOutcome::Diverged { reference, state } => self
                            .materializer
                            .recover(entry, reference, &candidate, &state, &header, &dest)?,
                    }
                }
            }
        } else {
            entry.unpack_verbatim(&self.config.output_dir)?;
            if header.kind.is_directory() {
                self.directory_times.push((dest, header.mtime));
            }
            ExtractionOutcome::PassThrough
        };

        stats.record_outcome(&outcome);
        tracing::info!(
            path = %header.path.display(),
            kind = header.kind.name(),
            action = outcome.label(),
            "entry done"
        );
        Ok(outcome)
    }

    /// Processes every entry of `entries` in order.
    ///
    /// Directory modification times are applied once every entry has been
    /// written, since creating children changes them.
    ///
    /// Under [`FailurePolicy::FailFast`] the first failing entry ends the
    /// run. Under [`FailurePolicy::ContinueOnError`] failures are recorded
    /// in `stats.failures` and the run moves on. Entries that could not be
    /// decoded end the run under either policy.
    ///
    /// # Errors
    ///
    /// Returns the first decode error, or the first entry error under
    /// fail-fast.
    pub fn run<I, E>(
        &mut self,
        entries: I,
        stats: &mut RunStats,
        progress: &mut dyn ProgressCallback,
    ) -> Result<()>
    where
        I: IntoIterator<Item = Result<E>>,
        E: EntryStream,
    {
        for (index, entry) in entries.into_iter().enumerate() {
            let mut entry = entry?;
            let header = entry.header().clone();
            progress.on_entry_start(&header, index + 1);

            match self.process(&mut entry, stats) {
                Ok(outcome) => progress.on_entry_complete(&header, &outcome),
                Err(err)
                    if !err.is_decode_error()
                        && self.config.failure_policy == FailurePolicy::ContinueOnError =>
                {
                    tracing::warn!(path = %header.path.display(), error = %err, "entry failed, continuing");
                    stats.record_failure(header.path, &err);
                }
                Err(err) => return Err(err),
            }
        }
        self.restore_directory_times()
    }

    /// Creates the missing parents of `dest` and checks that the parent
    /// resolves inside the output directory.
    ///
    /// Symlinks unpacked by earlier entries may point anywhere; a regular
    /// file is never written through one that leaves the output tree.
    fn prepare_parent(&mut self, dest: &Path, entry_path: &Path) -> Result<()> {
        let root = self.output_root()?;
        let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        let mut missing = Vec::new();
        let mut ancestor = parent;
        while ancestor.symlink_metadata().is_err() {
            missing.push(ancestor);
            match ancestor.parent() {
                Some(next) => ancestor = next,
                None => break,
            }
        }
        for dir in missing.into_iter().rev() {
            if let Some(existing) = dir.parent() {
                ensure_inside(&root, existing, entry_path)?;
            }
            std::fs::create_dir_all(dir)
                .map_err(|e| ExtractionError::filesystem(FsOperation::CreateDir, dir, e))?;
        }
        ensure_inside(&root, parent, entry_path)
    }

    fn output_root(&mut self) -> Result<PathBuf> {
        if let Some(root) = &self.output_root {
            return Ok(root.clone());
        }
        let dir = &self.config.output_dir;
        std::fs::create_dir_all(dir)
            .map_err(|e| ExtractionError::filesystem(FsOperation::CreateDir, dir, e))?;
        let root = dir
            .canonicalize()
            .map_err(|e| ExtractionError::filesystem(FsOperation::Stat, dir, e))?;
        self.output_root = Some(root.clone());
        Ok(root)
    }

    fn restore_directory_times(&mut self) -> Result<()> {
        for (path, mtime) in self.directory_times.drain(..) {
            let mtime = i64::try_from(mtime).unwrap_or(i64::MAX);
            filetime::set_file_mtime(&path, FileTime::from_unix_time(mtime, 0))
                .map_err(|e| ExtractionError::filesystem(FsOperation::SetTimes, &path, e))?;
        }
        Ok(())
    }
}

/// Fails with `PathTraversal` unless `dir` resolves under `root`.
fn ensure_inside(root: &Path, dir: &Path, entry_path: &Path) -> Result<()> {
    let resolved = dir
        .canonicalize()
        .map_err(|e| ExtractionError::filesystem(FsOperation::Stat, dir, e))?;
    if resolved.starts_with(root) {
        Ok(())
    } else {
        Err(ExtractionError::PathTraversal {
            path: entry_path.to_path_buf(),
        })
    }
}
