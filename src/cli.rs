//! Command-line interface definitions.
//!
//! Each subcommand runs one aggregation pass. Paths left off the command line
//! are looked up in the optional config file.

use crate::config::PassPaths;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Aggregate per-article protest analyses into protest events and daily rollups.
///
/// # Examples
///
/// ```sh
/// protest_digest protests -i analyses.jsonl -o out/protests.jsonl
/// protest_digest --normalize-dates daily -i daily_input.jsonl -o out/daily.jsonl
/// protest_digest --config digest.yaml tally
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true, env = "PROTEST_DIGEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Rewrite `D.M.YYYY.` dates to `YYYY-MM-DD` before keying
    #[arg(long, global = true)]
    pub normalize_dates: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Deduplicate protest mentions into one record per (date, location)
    Protests(PassArgs),
    /// Roll up student sentiment, propaganda and protest flags per day
    Daily(PassArgs),
    /// Sum per-article scores per publication date
    Tally(PassArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct PassArgs {
    /// Input JSON Lines file
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output JSON Lines file (parent directories are created)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl From<PassArgs> for PassPaths {
    fn from(args: PassArgs) -> Self {
        PassPaths {
            input: args.input,
            output: args.output,
        }
    }
}
