//! CLI entrypoint for the colony detector.
//!
//! Provides a thin wrapper over the `cli` module: parse args, run one
//! detection, and exit with appropriate status. For programmatic use,
//! prefer the library API (`penguin_cie::api`).

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    cli::run(args)
}
