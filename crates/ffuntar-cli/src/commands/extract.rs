//! Extract command implementation.

use crate::cli::Cli;
use crate::error::convert_extraction_error;
use crate::error::describe_input;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use anyhow::bail;
use ffuntar_core::RunStats;
use ffuntar_core::extract_archive_into;
use std::path::Path;
use std::path::PathBuf;

pub fn execute(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let input = cli.input();
    let config = cli.extract_config();

    // Spinner only for human output on a terminal
    let spinner = !cli.quiet && !cli.json && CliProgress::should_show();
    let mut progress = CliProgress::new(spinner, cli.verbose && !cli.json);

    let mut stats = RunStats::new();
    let result = extract_archive_into(&input, &config, &mut progress, &mut stats);
    drop(progress);

    if let Err(err) = result {
        // Report what was done before the run stopped.
        if stats.entries_seen > 0 {
            let path = err
                .path()
                .map_or_else(|| PathBuf::from(describe_input(&input)), Path::to_path_buf);
            stats.record_failure(path, &err);
            formatter.format_extraction_result(&stats)?;
        }
        return Err(convert_extraction_error(err, &input));
    }

    formatter.format_extraction_result(&stats)?;

    if stats.has_failures() {
        bail!(
            "{} of {} entries could not be extracted",
            stats.failures.len(),
            stats.entries_seen
        );
    }

    Ok(())
}
