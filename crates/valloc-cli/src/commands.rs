//! Command handlers

use std::path::PathBuf;

use tracing::info;

use valloc_app::config::normalize_prefix;
use valloc_app::export::{export_to_csv, export_to_excel};
use valloc_app::repository::open_store;
use valloc_app::seed::{seed, seed_sample_data, FleetFixture};
use valloc_app::{Config, FleetService};
use valloc_domain::service::ReportFilter;
use valloc_http::AppState;
use valloc_types::{ConfigError, Error, OutputFormat, Result};

use crate::cli::{Cli, Commands};
use crate::logging;
use crate::output::{output_report, output_seed};

/// Execute CLI command
pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref store_dir) = cli.store_dir {
        config.store_dir = Some(store_dir.clone());
    }
    if let Some(ref log_level) = cli.log_level {
        config.log_level = log_level.clone();
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    logging::init(&config.log_level);

    match cli.command {
        Commands::Serve { host, port, seed } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if seed {
                config.seed_sample_data = true;
            }
            cmd_serve(&config)
        }

        Commands::Seed { file } => cmd_seed(&config, file, output_format),

        Commands::Report {
            from,
            to,
            employee,
            vehicle,
            driver,
            department,
            csv,
            xlsx,
        } => {
            let filter = ReportFilter {
                start_date: from,
                end_date: to,
                employee_id: employee,
                vehicle_id: vehicle,
                driver_id: driver,
                department,
            };
            cmd_report(&config, &filter, csv, xlsx, output_format)
        }

        Commands::Config { show, set, reset } => cmd_config(show, set, reset),
    }
}

fn open_service(config: &Config) -> Result<FleetService> {
    let store = open_store(config)?;
    Ok(FleetService::with_system_clock(store))
}

fn cmd_serve(config: &Config) -> Result<()> {
    let service = open_service(config)?;

    if config.seed_sample_data {
        seed_sample_data(&service)?;
    }

    let prefix = normalize_prefix(&config.api_prefix);
    let addr = config.bind_addr();
    info!(
        store_dir = %config.store_dir()?.display(),
        today = %service.today(),
        "starting vehicle allocation service"
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(valloc_http::serve(AppState::new(service), &addr, &prefix))
}

fn cmd_seed(config: &Config, file: Option<PathBuf>, output_format: OutputFormat) -> Result<()> {
    let service = open_service(config)?;

    let outcome = match file {
        Some(path) => {
            let fixture = FleetFixture::load_from_file(&path)?;
            seed(&service, &fixture)?
        }
        None => seed_sample_data(&service)?,
    };

    let stats = service.store().stats()?;
    output_seed(output_format, &outcome, &stats)
}

fn cmd_report(
    config: &Config,
    filter: &ReportFilter,
    csv: Option<PathBuf>,
    xlsx: Option<PathBuf>,
    output_format: OutputFormat,
) -> Result<()> {
    let service = open_service(config)?;
    let report = service.report(filter)?;

    output_report(output_format, &report)?;

    if let Some(path) = csv {
        export_to_csv(&report, &path)?;
        eprintln!("Wrote {} rows to {}", report.total_records, path.display());
    }
    if let Some(path) = xlsx {
        export_to_excel(&report, filter, &path)?;
        eprintln!("Wrote report to {}", path.display());
    }

    Ok(())
}

fn cmd_config(show: bool, set: Option<Vec<String>>, reset: bool) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(pair) = set {
        let [key, value] = <[String; 2]>::try_from(pair).map_err(|_| {
            Error::Config(ConfigError::ParseError(
                "--set takes a key and a value".to_string(),
            ))
        })?;
        config.set(&key, &value)?;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
