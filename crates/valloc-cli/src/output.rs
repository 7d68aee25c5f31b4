//! Output formatting module

use valloc_app::seed::SeedOutcome;
use valloc_domain::service::{render_report_table, AllocationReport};
use valloc_store::StoreStats;
use valloc_types::{OutputFormat, Result};

pub fn output_report(output_format: OutputFormat, report: &AllocationReport) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(report)?;
        println!("{}", content);
    } else {
        print!("{}", render_report_table(report));
    }
    Ok(())
}

pub fn output_seed(
    output_format: OutputFormat,
    outcome: &SeedOutcome,
    stats: &StoreStats,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(stats)?;
        println!("{}", content);
        return Ok(());
    }

    match outcome {
        SeedOutcome::Seeded(summary) => {
            println!("Seeded fleet");
            println!("============");
            println!("Employees:    {}", summary.employees);
            println!("Drivers:      {}", summary.drivers);
            println!("Vehicles:     {}", summary.vehicles);
            println!("Allocations:  {}", summary.allocations);
        }
        SeedOutcome::Skipped { existing_employees } => {
            println!(
                "Store already has {} employees; nothing seeded",
                existing_employees
            );
        }
    }

    println!();
    println!(
        "Store now holds {} vehicles, {} drivers, {} employees, {} allocations",
        stats.vehicles, stats.drivers, stats.employees, stats.allocations
    );
    Ok(())
}
