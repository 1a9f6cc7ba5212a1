//! List command implementation

use crate::cli::Cli;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::ListCollector;
use anyhow::Result;
use ffuntar_core::extract_archive_with_progress;

pub fn execute(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let input = cli.input();
    let config = cli.extract_config().with_list_only(true);

    let mut collector = ListCollector::default();
    let stats = add_archive_context(
        extract_archive_with_progress(&input, &config, &mut collector),
        &input,
    )?;

    formatter.format_listing(&collector.entries, &stats)
}
