//! Referential rules for vehicles, drivers and employees

use chrono::NaiveDate;
use valloc_types::{EntityKind, Error, Result};

use crate::model::{Allocation, Driver, DriverInput, Employee, EmployeeInput, Vehicle, VehicleInput};
use crate::repository::{
    AllocationRepository, DriverRepository, FleetRepository, VehicleRepository,
};
use crate::validation::Validate;

/// Outcome of deleting a driver
#[derive(Debug, Clone)]
pub struct RemovedDriver {
    pub driver: Driver,
    /// Vehicle the driver was unassigned from before deletion
    pub unassigned_from: Option<Vehicle>,
}

// ============================================================================
// Vehicles
// ============================================================================

pub fn register_vehicle<R: FleetRepository + ?Sized>(repo: &R, input: VehicleInput) -> Result<Vehicle> {
    input.validate()?;
    ensure_plate_free(repo, &input.license_plate, None)?;
    if let Some(driver_id) = input.driver_ref() {
        ensure_driver_assignable(repo, &driver_id, None)?;
    }
    repo.insert_vehicle(Vehicle::new(input))
}

/// Replace a vehicle's fields; refused while it has upcoming allocations
pub fn update_vehicle<R: FleetRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
    id: &str,
    input: VehicleInput,
) -> Result<Vehicle> {
    input.validate()?;
    let mut vehicle = repo
        .find_vehicle(id)?
        .ok_or_else(|| Error::not_found(EntityKind::Vehicle, id))?;

    if let Some(next) = next_upcoming_allocation(repo, id, today)? {
        return Err(Error::conflict(format!(
            "vehicle {} has upcoming allocations (next on {}); cancel them before modifying the vehicle",
            vehicle.license_plate, next.date
        )));
    }

    if let Some(driver_id) = input.driver_ref() {
        ensure_driver_assignable(repo, &driver_id, Some(id))?;
    }
    if input.license_plate.trim() != vehicle.license_plate {
        ensure_plate_free(repo, &input.license_plate, Some(id))?;
    }

    vehicle.apply(input);
    repo.replace_vehicle(vehicle)
}

/// Delete a vehicle; past allocations stay behind as dangling records
pub fn remove_vehicle<R: FleetRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
    id: &str,
) -> Result<Vehicle> {
    let vehicle = repo
        .find_vehicle(id)?
        .ok_or_else(|| Error::not_found(EntityKind::Vehicle, id))?;

    if let Some(next) = next_upcoming_allocation(repo, id, today)? {
        return Err(Error::conflict(format!(
            "vehicle {} has upcoming allocations (next on {}); cancel them before deleting the vehicle",
            vehicle.license_plate, next.date
        )));
    }

    repo.delete_vehicle(id)
}

/// Earliest allocation of a vehicle dated after `today`
pub fn next_upcoming_allocation<R: AllocationRepository + ?Sized>(
    repo: &R,
    vehicle_id: &str,
    today: NaiveDate,
) -> Result<Option<Allocation>> {
    Ok(repo
        .allocations_for_vehicle(vehicle_id)?
        .into_iter()
        .filter(|a| a.date > today)
        .min_by(|a, b| a.order_key().cmp(&b.order_key())))
}

fn ensure_plate_free<R: VehicleRepository + ?Sized>(
    repo: &R,
    plate: &str,
    exclude: Option<&str>,
) -> Result<()> {
    let plate = plate.trim();
    match repo.find_vehicle_by_plate(plate)? {
        Some(existing) if Some(existing.id.as_str()) != exclude => Err(Error::conflict(format!(
            "license plate '{}' is already registered",
            plate
        ))),
        _ => Ok(()),
    }
}

fn ensure_driver_assignable<R: FleetRepository + ?Sized>(
    repo: &R,
    driver_id: &str,
    exclude_vehicle: Option<&str>,
) -> Result<()> {
    if repo.find_driver(driver_id)?.is_none() {
        return Err(Error::not_found(EntityKind::Driver, driver_id));
    }
    match repo.find_vehicle_by_driver(driver_id)? {
        Some(other) if Some(other.id.as_str()) != exclude_vehicle => Err(Error::conflict(format!(
            "driver is already assigned to vehicle {}",
            other.license_plate
        ))),
        _ => Ok(()),
    }
}

// ============================================================================
// Drivers
// ============================================================================

pub fn register_driver<R: FleetRepository + ?Sized>(repo: &R, input: DriverInput) -> Result<Driver> {
    input.validate()?;
    ensure_license_free(repo, &input.license_number, None)?;
    repo.insert_driver(Driver::new(input))
}

pub fn update_driver<R: FleetRepository + ?Sized>(
    repo: &R,
    id: &str,
    input: DriverInput,
) -> Result<Driver> {
    input.validate()?;
    let mut driver = repo
        .find_driver(id)?
        .ok_or_else(|| Error::not_found(EntityKind::Driver, id))?;

    if input.license_number.trim() != driver.license_number {
        ensure_license_free(repo, &input.license_number, Some(id))?;
    }

    driver.apply(input);
    repo.replace_driver(driver)
}

/// Unassign the driver from its vehicle, then delete it
pub fn remove_driver<R: FleetRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
    id: &str,
) -> Result<RemovedDriver> {
    if repo.find_driver(id)?.is_none() {
        return Err(Error::not_found(EntityKind::Driver, id));
    }

    let unassigned_from = match repo.find_vehicle_by_driver(id)? {
        Some(mut vehicle) => {
            if next_upcoming_allocation(repo, &vehicle.id, today)?.is_some() {
                return Err(Error::conflict(format!(
                    "driver's vehicle {} has upcoming allocations; cancel them before deleting the driver",
                    vehicle.license_plate
                )));
            }
            vehicle.driver_id = None;
            Some(repo.replace_vehicle(vehicle)?)
        }
        None => None,
    };

    let driver = match repo.delete_driver(id) {
        Ok(driver) => driver,
        Err(e) => {
            // put the driver back on the vehicle so the pair stays consistent
            if let Some(vehicle) = &unassigned_from {
                let mut restored = vehicle.clone();
                restored.driver_id = Some(id.to_string());
                repo.replace_vehicle(restored)?;
            }
            return Err(e);
        }
    };
    Ok(RemovedDriver {
        driver,
        unassigned_from,
    })
}

fn ensure_license_free<R: DriverRepository + ?Sized>(
    repo: &R,
    license_number: &str,
    exclude: Option<&str>,
) -> Result<()> {
    let license_number = license_number.trim();
    match repo.find_driver_by_license(license_number)? {
        Some(existing) if Some(existing.id.as_str()) != exclude => Err(Error::conflict(format!(
            "license number '{}' is already registered",
            license_number
        ))),
        _ => Ok(()),
    }
}

// ============================================================================
// Employees
// ============================================================================

pub fn register_employee<R: FleetRepository + ?Sized>(
    repo: &R,
    input: EmployeeInput,
) -> Result<Employee> {
    input.validate()?;
    repo.insert_employee(Employee::new(input))
}

pub fn update_employee<R: FleetRepository + ?Sized>(
    repo: &R,
    id: &str,
    input: EmployeeInput,
) -> Result<Employee> {
    input.validate()?;
    let mut employee = repo
        .find_employee(id)?
        .ok_or_else(|| Error::not_found(EntityKind::Employee, id))?;
    employee.apply(input);
    repo.replace_employee(employee)
}

/// Delete an employee with no allocation history
pub fn remove_employee<R: FleetRepository + ?Sized>(repo: &R, id: &str) -> Result<Employee> {
    if repo.find_employee(id)?.is_none() {
        return Err(Error::not_found(EntityKind::Employee, id));
    }
    if !repo.allocations_for_employee(id)?.is_empty() {
        return Err(Error::conflict(
            "employee has vehicle allocation history; delete the allocations first",
        ));
    }
    repo.delete_employee(id)
}
