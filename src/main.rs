//! # icpms-reduce
//!
//! Command-line front end for the `icpms_reduce` library.
//!
//! ## Usage
//!
//! ```bash
//! # Reduce a synthetic 50-sample session with the default settings
//! icpms-reduce demo
//!
//! # Use a config file and dump the processing history
//! icpms-reduce -v demo --config icpms-reduce.toml --json
//!
//! # Validate a config file
//! icpms-reduce check icpms-reduce.toml
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbose);
    cli::dispatch(cli)
}
