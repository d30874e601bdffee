//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use super::output::{Output, OutputFormat};
use super::{check, find};
use crate::domain::TreasureCounting;
use crate::logging;
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "hexpath")]
#[command(author, version, about = "Find treasure paths through hexagonal chamber maps")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file
    #[arg(long, short = 'c', global = true, env = "HEXPATH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a map for a path through all its treasures
    Find {
        /// Map file to explore
        map: PathBuf,

        /// Treasure counting policy (overrides the config file)
        #[arg(long, value_enum)]
        counting: Option<CountingArg>,
    },

    /// Validate a map and summarize its contents
    Check {
        /// Map file to inspect
        map: PathBuf,
    },
}

/// Treasure counting policy as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CountingArg {
    Distinct,
    PerVisit,
}

impl From<CountingArg> for TreasureCounting {
    fn from(arg: CountingArg) -> Self {
        match arg {
            CountingArg::Distinct => TreasureCounting::Distinct,
            CountingArg::PerVisit => TreasureCounting::PerVisit,
        }
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    match &config.source {
        Some(path) => debug!(path = %path.display(), "loaded config"),
        None => debug!("using default config"),
    }

    let format = cli.format.unwrap_or_else(|| config.output.format.into());
    let output = Output::new(format);

    match cli.command {
        Commands::Find { map, counting } => {
            let counting = counting
                .map(TreasureCounting::from)
                .unwrap_or(config.search.treasure_counting);
            find::run(&output, &map, counting)?
        }
        Commands::Check { map } => check::run(&output, &map)?,
    }

    Ok(())
}
