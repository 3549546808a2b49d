use super::{parse_log_level, OutputFormat};
use clap::Parser;
use clio::ClioPath;
use log::LevelFilter;

/// Merges the PKI lists found by independent certificate probes into a single de-duplicated
/// PKI list
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Directory containing raw PKI list JSON files, one per probe. Every *.json file in it is
    /// loaded. Can specify multiple times
    #[clap(long, value_parser = clap::value_parser!(ClioPath).exists().is_dir())]
    pub(crate) raw_data_dir: Vec<ClioPath>,

    /// A single raw PKI list JSON file. Can specify multiple times
    #[clap(long, value_parser = clap::value_parser!(ClioPath).exists().is_file())]
    pub(crate) raw_data_file: Vec<ClioPath>,

    /// Where to write the merged PKI list. When not given, the lists are merged and checked for
    /// conflicts but nothing is written
    #[clap(long, value_parser = clap::value_parser!(ClioPath))]
    pub(crate) output: Option<ClioPath>,

    /// Format of the merged PKI list, json or yaml
    #[clap(long, default_value_t = OutputFormat::Json, value_parser = OutputFormat::parse)]
    pub(crate) output_format: OutputFormat,

    /// Generate a summary
    #[clap(long, value_parser = clap::value_parser!(ClioPath))]
    pub(crate) summary_file: Option<ClioPath>,

    /// One of error, warn, info, debug or trace
    #[clap(long, default_value_t = LevelFilter::Info, value_parser = parse_log_level)]
    pub(crate) log_level: LevelFilter,

    /// Threads to use for loading raw data. Defaults to using as many threads as there are
    /// logical CPUs
    #[clap(long)]
    pub(crate) threads: Option<usize>,
}
