use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod check;
mod config;
mod demo;

pub use config::Config;

/// icpms-reduce - Isotope ratio reduction for multicollector ICP-MS
#[derive(Parser)]
#[command(name = "icpms-reduce")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic session, reduce it and print the calibrated results
    Demo {
        /// TOML configuration file (icpms-reduce.toml)
        #[arg(short = 'c', long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Number of samples in the session, standards included (default: 50)
        #[arg(short = 'n', long)]
        run_length: Option<usize>,

        /// Print the processing history as JSON after the results
        #[arg(long)]
        json: bool,
    },

    /// Load and validate a configuration file, then print the resolved settings
    Check {
        /// TOML configuration file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Demo {
            config,
            run_length,
            json,
        } => demo::run(config, run_length, json),
        Commands::Check { config } => check::run(config),
    }
}
