//! Output formatter trait for CLI results.

use anyhow::Result;
use ffuntar_core::EntryHeader;
use ffuntar_core::RunStats;
use serde::Serialize;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the end-of-run summary of an extraction
    fn format_extraction_result(&self, stats: &RunStats) -> Result<()>;

    /// Format the entries enumerated in list mode
    fn format_listing(&self, entries: &[EntryHeader], stats: &RunStats) -> Result<()>;
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    /// Run completed but some entries failed.
    Partial,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn new(operation: impl Into<String>, status: Status, data: T) -> Self {
        Self {
            operation: operation.into(),
            status,
            data: Some(data),
        }
    }
}
