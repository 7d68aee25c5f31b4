//! Sample fleet and TOML fixture loading
//!
//! A fixture names its references by natural keys: vehicles point at a
//! driver by license number, allocations at an employee by name and a
//! vehicle by plate. Allocation dates are relative to the service clock.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::info;

use valloc_domain::model::{AllocationInput, DriverInput, EmployeeInput, VehicleInput};
use valloc_domain::repository::EmployeeRepository;
use valloc_store::normalize_key;
use valloc_types::{ConfigError, Error, Result};

use crate::service::FleetService;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureVehicle {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    #[serde(default)]
    pub driver_license: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureAllocation {
    /// Employee name
    pub employee: String,
    pub license_plate: String,
    /// Days after today
    pub days_ahead: i64,
}

/// Container for parsing fleet.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetFixture {
    #[serde(default)]
    pub employees: Vec<EmployeeInput>,
    #[serde(default)]
    pub drivers: Vec<DriverInput>,
    #[serde(default)]
    pub vehicles: Vec<FixtureVehicle>,
    #[serde(default)]
    pub allocations: Vec<FixtureAllocation>,
}

/// What a seed run inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub employees: usize,
    pub drivers: usize,
    pub vehicles: usize,
    pub allocations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded(SeedSummary),
    /// The store already had employees
    Skipped { existing_employees: usize },
}

impl FleetFixture {
    /// Built-in sample fleet: three employees, three drivers, three
    /// vehicles and one allocation per vehicle on each of the next three days
    pub fn sample() -> Self {
        let employee = |name: &str, department: &str| EmployeeInput {
            name: name.to_string(),
            department: department.to_string(),
        };
        let driver = |name: &str, license: &str| DriverInput {
            name: name.to_string(),
            license_number: license.to_string(),
        };
        let vehicle = |make: &str, model: &str, year: i32, plate: &str, license: &str| {
            FixtureVehicle {
                make: make.to_string(),
                model: model.to_string(),
                year,
                license_plate: plate.to_string(),
                driver_license: Some(license.to_string()),
            }
        };
        let allocation = |employee: &str, plate: &str, days_ahead: i64| FixtureAllocation {
            employee: employee.to_string(),
            license_plate: plate.to_string(),
            days_ahead,
        };

        Self {
            employees: vec![
                employee("John Doe", "Sales"),
                employee("Jane Smith", "Marketing"),
                employee("Bob Johnson", "IT"),
            ],
            drivers: vec![
                driver("Alice Brown", "DL12345"),
                driver("Charlie Davis", "DL67890"),
                driver("Eva White", "DL24680"),
            ],
            vehicles: vec![
                vehicle("Toyota", "Camry", 2022, "ABC123", "DL12345"),
                vehicle("Honda", "Civic", 2021, "XYZ789", "DL67890"),
                vehicle("Ford", "F-150", 2023, "DEF456", "DL24680"),
            ],
            allocations: vec![
                allocation("John Doe", "ABC123", 1),
                allocation("Jane Smith", "XYZ789", 2),
                allocation("Bob Johnson", "DEF456", 3),
            ],
        }
    }

    /// Load a fixture from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(ConfigError::ParseError(format!(
                "Failed to read fleet fixture {}: {}",
                path.display(),
                e
            )))
        })?;

        Self::load_from_str(&content)
    }

    /// Load a fixture from a TOML string
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        toml::from_str(toml_content).map_err(|e| {
            Error::Config(ConfigError::ParseError(format!(
                "Failed to parse fleet fixture TOML: {}",
                e
            )))
        })
    }
}

/// Insert a fixture into an empty store. Every row goes through the same
/// rules as an API request.
pub fn seed(service: &FleetService, fixture: &FleetFixture) -> Result<SeedOutcome> {
    let existing_employees = service.store().count_employees()?;
    if existing_employees > 0 {
        info!(existing_employees, "store already has data, skipping seed");
        return Ok(SeedOutcome::Skipped { existing_employees });
    }

    let mut summary = SeedSummary::default();

    let mut employee_ids = HashMap::new();
    for input in &fixture.employees {
        let employee = service.create_employee(input.clone())?;
        employee_ids.insert(employee.name.clone(), employee.id);
        summary.employees += 1;
    }

    let mut driver_ids = HashMap::new();
    for input in &fixture.drivers {
        let driver = service.create_driver(input.clone())?;
        driver_ids.insert(normalize_key(&driver.license_number), driver.id);
        summary.drivers += 1;
    }

    let mut vehicle_ids = HashMap::new();
    for v in &fixture.vehicles {
        let driver_id = match &v.driver_license {
            Some(license) => Some(
                driver_ids
                    .get(&normalize_key(license))
                    .cloned()
                    .ok_or_else(|| {
                        Error::validation(
                            "driver_license",
                            format!("no driver with license '{}' in fixture", license),
                        )
                    })?,
            ),
            None => None,
        };
        let vehicle = service.create_vehicle(VehicleInput {
            make: v.make.clone(),
            model: v.model.clone(),
            year: v.year,
            license_plate: v.license_plate.clone(),
            driver_id,
        })?;
        vehicle_ids.insert(normalize_key(&vehicle.license_plate), vehicle.id);
        summary.vehicles += 1;
    }

    let today = service.today();
    for a in &fixture.allocations {
        let employee_id = employee_ids.get(&a.employee).cloned().ok_or_else(|| {
            Error::validation(
                "employee",
                format!("no employee named '{}' in fixture", a.employee),
            )
        })?;
        let vehicle_id = vehicle_ids
            .get(&normalize_key(&a.license_plate))
            .cloned()
            .ok_or_else(|| {
                Error::validation(
                    "license_plate",
                    format!("no vehicle with plate '{}' in fixture", a.license_plate),
                )
            })?;
        service.create_allocation(&AllocationInput {
            employee_id,
            vehicle_id,
            date: today + Duration::days(a.days_ahead),
        })?;
        summary.allocations += 1;
    }

    info!(
        employees = summary.employees,
        drivers = summary.drivers,
        vehicles = summary.vehicles,
        allocations = summary.allocations,
        "fleet seeded"
    );
    Ok(SeedOutcome::Seeded(summary))
}

/// Insert the built-in sample fleet
pub fn seed_sample_data(service: &FleetService) -> Result<SeedOutcome> {
    seed(service, &FleetFixture::sample())
}
