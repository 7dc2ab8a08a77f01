mod commands;
mod logging;
mod render;
mod utils;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use parking_core::config::ParkingConfig;
use parking_core::constants::{DATE_FORMAT, DEFAULT_ROSTER_FILE};
use parking_core::date_range::DateRange;
use parking_core::{GenerateRequest, Pipeline};

#[derive(Parser)]
#[command(name = "parking-ics")]
#[command(about = "Turn a weekly parking roster into calendar reservations for each employee")]
struct Cli {
    /// Config file (default: ~/.config/parking-ics/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one .ics per reservation and pack them into an archive
    Generate {
        /// First day to include (YYYY-MM-DD, default: next Monday)
        #[arg(long)]
        from: Option<String>,

        /// Last day to include (YYYY-MM-DD, default: next Friday)
        #[arg(long)]
        to: Option<String>,

        /// Roster workbook
        #[arg(short, long, default_value = DEFAULT_ROSTER_FILE)]
        roster: String,

        /// Folder that receives the output directory and archive
        #[arg(short, long, default_value = ".")]
        out: String,
    },
    /// Show the reservations a run would create, without writing anything
    Preview {
        /// First day to include (YYYY-MM-DD, default: next Monday)
        #[arg(long)]
        from: Option<String>,

        /// Last day to include (YYYY-MM-DD, default: next Friday)
        #[arg(long)]
        to: Option<String>,

        /// Roster workbook
        #[arg(short, long, default_value = DEFAULT_ROSTER_FILE)]
        roster: String,
    },
    /// Show the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            from,
            to,
            roster,
            out,
        } => {
            let (from, to) = range_args(from, to);
            let request = GenerateRequest::from_args(&from, &to, &roster, &out)?;
            commands::generate::run(&Pipeline::new(config)?, request)
        }
        Commands::Preview { from, to, roster } => {
            let (from, to) = range_args(from, to);
            let request = GenerateRequest::from_args(&from, &to, &roster, ".")?;
            commands::preview::run(&Pipeline::new(config)?, &request.source, request.range)
        }
        Commands::Config => commands::config::run(&config, cli.config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<ParkingConfig> {
    match path {
        Some(path) => ParkingConfig::load_from(path)
            .with_context(|| format!("Could not load config from {}", path.display())),
        None => Ok(ParkingConfig::load()?),
    }
}

/// Fill in missing bounds with next week's Monday and Friday.
fn range_args(from: Option<String>, to: Option<String>) -> (String, String) {
    let next_week = DateRange::next_work_week(Local::now().date_naive());

    (
        from.unwrap_or_else(|| next_week.start.format(DATE_FORMAT).to_string()),
        to.unwrap_or_else(|| next_week.end.format(DATE_FORMAT).to_string()),
    )
}
