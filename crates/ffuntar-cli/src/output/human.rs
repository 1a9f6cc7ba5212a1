//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use ffuntar_core::EntryHeader;
use ffuntar_core::RunStats;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let digits = n.to_string();
        let mut result = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i).is_multiple_of(3) {
                result.push(',');
            }
            result.push(c);
        }
        result
    }

    /// Lines of the end-of-run summary, without styling.
    fn summary_lines(&self, stats: &RunStats) -> Vec<String> {
        let snapshot = stats.snapshot();
        let mut lines = vec![
            format!(
                "  Entries:          {}",
                Self::format_number(stats.entries_seen)
            ),
            format!(
                "  Total size:       {}",
                Self::format_size(snapshot.total_bytes_seen)
            ),
            format!(
                "  Linked files:     {}",
                Self::format_number(snapshot.linked_file_count)
            ),
            format!(
                "  Saved writes:     {} ({:.1}%)",
                Self::format_size(snapshot.saved_write_bytes),
                snapshot.savings_percent
            ),
            format!(
                "  Copied files:     {}",
                Self::format_number(stats.copied_files)
            ),
        ];

        if stats.recovered_files > 0 {
            lines.push(format!(
                "  Recovered files:  {} ({} reused)",
                Self::format_number(stats.recovered_files),
                Self::format_size(stats.reused_bytes)
            ));
        }

        if self.verbose {
            lines.push(format!(
                "  Other entries:    {}",
                Self::format_number(stats.passed_through)
            ));
            lines.push(format!("  Duration:         {:?}", stats.duration));
        }

        lines
    }

    fn write_failures(&self, stats: &RunStats) {
        if !stats.has_failures() {
            return;
        }

        let _ = self.term.write_line("");
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{}", style("Failed entries:").yellow().bold()));
        } else {
            let _ = self.term.write_line("Failed entries:");
        }
        for failure in &stats.failures {
            let _ = self.term.write_line(&format!(
                "  - {}: {}",
                failure.path.display(),
                failure.message
            ));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_extraction_result(&self, stats: &RunStats) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let headline = if stats.has_failures() {
            "Extraction finished with errors"
        } else {
            "Extraction complete"
        };
        if self.use_colors {
            let mark = if stats.has_failures() {
                style("⚠").yellow().bold()
            } else {
                style("✓").green().bold()
            };
            let _ = self.term.write_line(&format!("{mark} {headline}"));
        } else {
            let _ = self.term.write_line(headline);
        }

        for line in self.summary_lines(stats) {
            let _ = self.term.write_line(&line);
        }
        self.write_failures(stats);

        Ok(())
    }

    fn format_listing(&self, entries: &[EntryHeader], stats: &RunStats) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in entries {
            if self.verbose {
                let _ = self.term.write_line(&format!(
                    "{}{:<6o} {:>10}  {}",
                    entry.kind.type_char(),
                    entry.mode & 0o7777,
                    entry.size,
                    entry.path.display()
                ));
            } else {
                let _ = self.term.write_line(&format!("{}", entry.path.display()));
            }
        }

        if self.verbose {
            let _ = self.term.write_line("");
            let _ = self.term.write_line(&format!(
                "Total: {} entries, {}",
                Self::format_number(stats.entries_seen),
                Self::format_size(stats.total_bytes_seen)
            ));
        }

        Ok(())
    }
}
