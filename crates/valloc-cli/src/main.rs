//! Vehicle Allocation - company vehicle booking service
//!
//! Serves the allocation API over HTTP and runs seeding and reports
//! against the local store.

mod cli;
mod commands;
mod logging;
mod output;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
