//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::Status;
use anyhow::Result;
use ffuntar_core::EntryHeader;
use ffuntar_core::RunStats;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

#[derive(Serialize)]
struct FailureOutput {
    path: String,
    error: String,
}

#[derive(Serialize)]
struct ExtractionOutput {
    entries: usize,
    total_bytes: u64,
    saved_write_bytes: u64,
    savings_percent: f64,
    linked_files: usize,
    copied_files: usize,
    recovered_files: usize,
    reused_bytes: u64,
    other_entries: usize,
    duration_ms: u128,
    failures: Vec<FailureOutput>,
}

impl ExtractionOutput {
    fn from_stats(stats: &RunStats) -> Self {
        let snapshot = stats.snapshot();
        Self {
            entries: stats.entries_seen,
            total_bytes: snapshot.total_bytes_seen,
            saved_write_bytes: snapshot.saved_write_bytes,
            savings_percent: snapshot.savings_percent,
            linked_files: snapshot.linked_file_count,
            copied_files: stats.copied_files,
            recovered_files: stats.recovered_files,
            reused_bytes: stats.reused_bytes,
            other_entries: stats.passed_through,
            duration_ms: stats.duration.as_millis(),
            failures: stats
                .failures
                .iter()
                .map(|f| FailureOutput {
                    path: f.path.display().to_string(),
                    error: f.message.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct ListedEntry {
    path: String,
    #[serde(rename = "type")]
    kind: &'static str,
    size: u64,
    mode: u32,
    mtime: u64,
}

#[derive(Serialize)]
struct ListingOutput {
    entries: Vec<ListedEntry>,
    total_entries: usize,
    total_bytes: u64,
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn status(stats: &RunStats) -> Status {
        if stats.failures.is_empty() {
            Status::Success
        } else {
            Status::Partial
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_extraction_result(&self, stats: &RunStats) -> Result<()> {
        let output = JsonOutput::new(
            "extract",
            Self::status(stats),
            ExtractionOutput::from_stats(stats),
        );
        Self::output(&output)
    }

    fn format_listing(&self, entries: &[EntryHeader], stats: &RunStats) -> Result<()> {
        let data = ListingOutput {
            entries: entries
                .iter()
                .map(|e| ListedEntry {
                    path: e.path.display().to_string(),
                    kind: e.kind.name(),
                    size: e.size,
                    mode: e.mode,
                    mtime: e.mtime,
                })
                .collect(),
            total_entries: stats.entries_seen,
            total_bytes: stats.total_bytes_seen,
        };

        let output = JsonOutput::new("list", Self::status(stats), data);
        Self::output(&output)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_extraction_output_fields() {
        let mut stats = RunStats::new();
        stats.record_seen(10);
        stats.record_linked(10);
        let err = ffuntar_core::ExtractionError::PathTraversal {
            path: PathBuf::from("../x"),
        };
        stats.record_failure(PathBuf::from("../x"), &err);

        let output = JsonOutput::new(
            "extract",
            JsonFormatter::status(&stats),
            ExtractionOutput::from_stats(&stats),
        );
        let value: serde_json::Value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["operation"], "extract");
        assert_eq!(value["status"], "partial");
        assert_eq!(value["data"]["linked_files"], 1);
        assert_eq!(value["data"]["saved_write_bytes"], 10);
        assert_eq!(value["data"]["savings_percent"], 100.0);
        assert_eq!(value["data"]["failures"][0]["path"], "../x");
    }

    #[test]
    fn test_listed_entry_type_key() {
        let entry = ListedEntry {
            path: "dir/".to_string(),
            kind: "directory",
            size: 0,
            mode: 0o755,
            mtime: 0,
        };

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"type\":\"directory\""));
    }
}
