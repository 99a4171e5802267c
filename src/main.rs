use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod ledger;
mod record;
mod youtube;

use cli::RootArgs;
use config::Config;
use ledger::AppendOutcome;
use record::{format_timestamp, MetricRecord};
use youtube::YouTubeClient;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    // A missing .env is the normal case under a scheduler.
    let _ = dotenvy::dotenv();
    init_tracing(args.verbose);
    run(args)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: RootArgs) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(data_file) = args.data_file {
        config.data_file = data_file;
    }
    tracing::debug!(?config, "configuration resolved");

    let item = YouTubeClient::new(&config).fetch_video()?;
    let timestamp = format_timestamp(chrono::Utc::now(), config.time_zone, &config.offset_suffix);
    let record = MetricRecord::project(&item, timestamp);
    tracing::info!(
        id = %record.id,
        views = record.view_count,
        likes = record.like_count,
        comments = record.comment_count,
        "fetched video statistics"
    );

    let outcome = ledger::record_snapshot(&config.data_file, &record, args.dry_run)?;
    match (outcome, args.dry_run) {
        (AppendOutcome::Appended, false) => {
            println!("Appended metrics @ {}", record.timestamp);
        }
        (AppendOutcome::Appended, true) => {
            println!(
                "Dry run: would append metrics @ {} to {}",
                record.timestamp,
                config.data_file.display()
            );
        }
        (AppendOutcome::Unchanged, _) => {
            println!("No metric change detected; skipping append.");
        }
    }
    Ok(())
}
