//! Command-line entry point: runs one aggregation pass and exits non-zero
//! on any fatal error.
//!
//! ## Usage
//!
//! ```sh
//! protest_digest protests -i analyses.jsonl -o out/protests.jsonl
//! ```

use clap::Parser;
use protest_digest::cli::{Cli, Command};
use protest_digest::config::{DigestConfig, PassPaths};
use protest_digest::{DailyAggregator, IssueDayTally, ProtestDeduplicator, run_pass};
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match &args.config {
        Some(path) => DigestConfig::load(path).await?,
        None => DigestConfig::default(),
    };
    let normalize_dates = args.normalize_dates || config.normalize_dates;

    let stats = match args.command {
        Command::Protests(pass) => {
            let (input, output) = PassPaths::from(pass).or(&config.protests).resolve()?;
            run_pass(ProtestDeduplicator::new(normalize_dates), &input, &output).await
        }
        Command::Daily(pass) => {
            let (input, output) = PassPaths::from(pass).or(&config.daily).resolve()?;
            run_pass(DailyAggregator::new(normalize_dates), &input, &output).await
        }
        Command::Tally(pass) => {
            let (input, output) = PassPaths::from(pass).or(&config.tally).resolve()?;
            run_pass(IssueDayTally::new(normalize_dates), &input, &output).await
        }
    };

    let stats = match stats {
        Ok(stats) => stats,
        Err(e) => {
            error!(error = %e, "Aggregation pass failed");
            return Err(e.into());
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        emitted = stats.emitted,
        malformed = stats.malformed,
        "Execution complete"
    );
    Ok(())
}
