//! CLI argument parsing for the metrics appender.
//!
//! Required settings come from the environment so the binary can run
//! unattended from a scheduler; flags only cover per-invocation overrides.
use clap::Parser;
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "yt-metrics",
    version,
    about = "Append YouTube video statistics to a JSON log when they change",
    after_help = "Environment:\n  YT_API_KEY              API key (required)\n  VIDEO_ID                Video to query (required)\n  DATA_FILE               Log file path (default: views2.json)\n  YT_API_URL              Endpoint override\n  METRICS_TIME_ZONE       IANA zone for timestamps (default: America/Santiago)\n  METRICS_OFFSET_SUFFIX   Literal timestamp suffix (default: -03:00)\n\nExamples:\n  YT_API_KEY=... VIDEO_ID=dQw4w9WgXcQ yt-metrics\n  yt-metrics --data-file data/views.json --dry-run"
)]
pub struct RootArgs {
    /// Log file to append to (overrides DATA_FILE)
    #[arg(long, value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Fetch and compare, but leave the log file untouched
    #[arg(long)]
    pub dry_run: bool,

    /// Emit debug-level diagnostics on stderr
    #[arg(long)]
    pub verbose: bool,
}
