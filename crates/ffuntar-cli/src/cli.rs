//! CLI argument parsing using clap.

use clap::Parser;
use clap_complete::Shell;
use ffuntar_core::ArchiveInput;
use ffuntar_core::ExtractConfig;
use ffuntar_core::FailurePolicy;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ffuntar")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Set FFUNTAR_LOG (e.g. FFUNTAR_LOG=debug) to control diagnostic logging.")]
pub struct Cli {
    /// Archive to read; `-` or absent reads standard input
    #[arg(short = 'f', long = "filename", value_name = "FILE")]
    pub filename: Option<PathBuf>,

    /// Link files identical to those under this directory instead of
    /// writing them
    #[arg(short = 'r', long = "reference-directory", value_name = "DIR")]
    pub reference_directory: Option<PathBuf>,

    /// Leading path segments removed before the reference lookup
    #[arg(
        short = 's',
        long = "strip-prefix",
        visible_alias = "strip-levels",
        value_name = "LEVELS",
        default_value_t = 0
    )]
    pub strip_prefix: usize,

    /// Preserve permissions, ACLs and file flags (mtime is always kept)
    #[arg(short = 'p', long)]
    pub preserve: bool,

    /// List entries without writing anything
    #[arg(short = 't', long)]
    pub list: bool,

    /// Extract into this directory
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub directory: PathBuf,

    /// Record failing entries and continue instead of stopping at the first
    #[arg(long)]
    pub keep_going: bool,

    /// Print every entry as it is processed
    #[arg(short, long, short_alias = 'd')]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    pub json: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL", value_enum)]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Returns where the archive is read from.
    pub fn input(&self) -> ArchiveInput {
        match &self.filename {
            Some(path) if path.as_os_str() != "-" => ArchiveInput::File(path.clone()),
            _ => ArchiveInput::Stdin,
        }
    }

    /// Builds the extraction configuration from the flags.
    pub fn extract_config(&self) -> ExtractConfig {
        let failure_policy = if self.keep_going {
            FailurePolicy::ContinueOnError
        } else {
            FailurePolicy::FailFast
        };

        ExtractConfig::new()
            .with_reference_dir(self.reference_directory.clone())
            .with_strip_levels(self.strip_prefix)
            .with_output_dir(&self.directory)
            .with_preserve_attributes(self.preserve)
            .with_list_only(self.list)
            .with_failure_policy(failure_policy)
    }
}
