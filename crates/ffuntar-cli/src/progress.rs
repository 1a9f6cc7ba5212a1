//! Progress reporting for CLI operations.

use console::Term;
use ffuntar_core::EntryHeader;
use ffuntar_core::ProgressCallback;
use ffuntar_core::RunStats;
use ffuntar_core::ExtractionOutcome;
use indicatif::ProgressBar;
use indicatif::ProgressDrawTarget;
use indicatif::ProgressStyle;
use std::time::Duration;

/// Spinner and per-entry lines on stderr, implementing `ProgressCallback`.
///
/// The input is a stream of unknown length, so progress is a spinner with
/// a running entry count rather than a bar. With `verbose` every finished
/// entry is printed as `<action> <path>`. Automatically cleans up on drop.
pub struct CliProgress {
    bar: Option<ProgressBar>,
    verbose: bool,
    term: Term,
}

impl CliProgress {
    /// Creates progress output.
    ///
    /// # Arguments
    ///
    /// * `spinner` - Draw a spinner (only meaningful on a terminal)
    /// * `verbose` - Print one line per finished entry
    #[must_use]
    pub fn new(spinner: bool, verbose: bool) -> Self {
        let bar = spinner.then(|| {
            let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {pos} entries ({elapsed}) {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        });

        Self {
            bar,
            verbose,
            term: Term::stderr(),
        }
    }

    /// Checks if a spinner should be drawn (stderr is a TTY).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stderr().is_term()
    }

    fn entry_line(header: &EntryHeader, outcome: &ExtractionOutcome) -> String {
        format!("{:<8} {}", outcome.label(), header.path.display())
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl ProgressCallback for CliProgress {
    fn on_entry_start(&mut self, header: &EntryHeader, _index: usize) {
        if let Some(bar) = &self.bar {
            bar.set_message(header.path.display().to_string());
        }
    }

    fn on_entry_complete(&mut self, header: &EntryHeader, outcome: &ExtractionOutcome) {
        if self.verbose {
            let line = Self::entry_line(header, outcome);
            match &self.bar {
                Some(bar) => bar.println(line),
                None => {
                    let _ = self.term.write_line(&line);
                }
            }
        }
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_complete(&mut self, _stats: &RunStats) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Collects entry headers in list mode.
#[derive(Debug, Default)]
pub struct ListCollector {
    pub entries: Vec<EntryHeader>,
}

impl ProgressCallback for ListCollector {
    fn on_entry_start(&mut self, _header: &EntryHeader, _index: usize) {}

    fn on_entry_complete(&mut self, header: &EntryHeader, _outcome: &ExtractionOutcome) {
        self.entries.push(header.clone());
    }

    fn on_complete(&mut self, _stats: &RunStats) {}
}
