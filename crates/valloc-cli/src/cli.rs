//! CLI definition using clap

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use valloc_types::OutputFormat;

#[derive(Parser)]
#[command(name = "vehicle-allocation")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Company vehicle allocation service")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store directory. Uses config value if not specified.
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Log filter (error, warn, info, debug, trace or a tracing directive)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service
    Serve {
        /// Bind address. Uses config value if not specified.
        #[arg(long)]
        host: Option<String>,

        #[arg(long, short = 'p')]
        port: Option<u16>,

        /// Insert the sample fleet first if the store is empty
        #[arg(long)]
        seed: bool,
    },

    /// Insert the sample fleet, or a TOML fixture, into an empty store
    Seed {
        /// Fleet fixture (TOML with [[employees]], [[drivers]], [[vehicles]])
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Allocation report over the local store
    Report {
        /// First day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Employee id
        #[arg(long)]
        employee: Option<String>,

        /// Vehicle id
        #[arg(long)]
        vehicle: Option<String>,

        /// Driver id
        #[arg(long)]
        driver: Option<String>,

        #[arg(long)]
        department: Option<String>,

        /// Also write the rows to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Also write the report to an Excel workbook
        #[arg(long)]
        xlsx: Option<PathBuf>,
    },

    /// Show or modify configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set a value (store_dir, host, port, api_prefix, seed_sample_data, log_level, output_format)
        #[arg(long, num_args = 2, value_names = ["KEY", "VALUE"])]
        set: Option<Vec<String>>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
