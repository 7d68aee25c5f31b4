//! Allocation rule engine
//!
//! Decides whether a vehicle can be booked for an employee on a day and
//! records the booking. The lookups here are a fast path only: the store's
//! (vehicle, date) and (employee, date) unique indexes are what actually
//! prevent double booking when two requests race.

use chrono::NaiveDate;
use valloc_types::{EntityKind, Error, Result};

use crate::model::{Allocation, AllocationInput, Driver, Employee, Vehicle};
use crate::repository::{AllocationRepository, FleetRepository};
use crate::validation::Validate;

/// The entities an allocation request refers to
#[derive(Debug, Clone)]
pub struct Parties {
    pub employee: Employee,
    pub vehicle: Vehicle,
    pub driver: Driver,
}

/// Whether no allocation other than `exclude` holds the vehicle on `date`
pub fn is_vehicle_free<R: AllocationRepository + ?Sized>(
    repo: &R,
    vehicle_id: &str,
    date: NaiveDate,
    exclude: Option<&str>,
) -> Result<bool> {
    let booking = repo.find_vehicle_booking(vehicle_id, date)?;
    Ok(match booking {
        Some(existing) => Some(existing.id.as_str()) == exclude,
        None => true,
    })
}

/// Book a vehicle for an employee on a day
pub fn allocate<R: FleetRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
    input: &AllocationInput,
) -> Result<Allocation> {
    input.validate()?;
    ensure_not_past(input.date, today)?;

    let parties = resolve_parties(repo, input)?;
    ensure_vehicle_free(repo, &parties.vehicle, input.date, None)?;
    ensure_employee_free(repo, &parties.employee, input.date, None)?;

    repo.insert_allocation(Allocation::new(input))
}

/// Move an upcoming allocation to another vehicle, employee or day
pub fn reallocate<R: FleetRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
    id: &str,
    input: &AllocationInput,
) -> Result<Allocation> {
    let mut allocation = repo
        .find_allocation(id)?
        .ok_or_else(|| Error::not_found(EntityKind::Allocation, id))?;

    if allocation.date < today {
        return Err(Error::conflict(format!(
            "allocation date {} has already passed; only upcoming allocations can be modified",
            allocation.date
        )));
    }

    input.validate()?;
    ensure_not_past(input.date, today)?;

    let parties = resolve_parties(repo, input)?;
    ensure_vehicle_free(repo, &parties.vehicle, input.date, Some(id))?;
    ensure_employee_free(repo, &parties.employee, input.date, Some(id))?;

    allocation.apply(input);
    repo.replace_allocation(allocation)
}

/// Delete an upcoming allocation
pub fn cancel<R: FleetRepository + ?Sized>(
    repo: &R,
    today: NaiveDate,
    id: &str,
) -> Result<Allocation> {
    let allocation = repo
        .find_allocation(id)?
        .ok_or_else(|| Error::not_found(EntityKind::Allocation, id))?;

    if allocation.date < today {
        return Err(Error::conflict(format!(
            "allocation date {} has already passed; only upcoming allocations can be deleted",
            allocation.date
        )));
    }

    repo.delete_allocation(id)
}

/// Resolve the employee, the vehicle and the vehicle's driver
pub fn resolve_parties<R: FleetRepository + ?Sized>(
    repo: &R,
    input: &AllocationInput,
) -> Result<Parties> {
    let employee_id = input.employee_id.trim();
    let vehicle_id = input.vehicle_id.trim();

    let employee = repo
        .find_employee(employee_id)?
        .ok_or_else(|| Error::not_found(EntityKind::Employee, employee_id))?;
    let vehicle = repo
        .find_vehicle(vehicle_id)?
        .ok_or_else(|| Error::not_found(EntityKind::Vehicle, vehicle_id))?;

    let driver_id = vehicle.driver_id.as_deref().ok_or_else(|| {
        Error::conflict(format!(
            "vehicle {} has no assigned driver; only vehicles with a driver can be allocated",
            vehicle.license_plate
        ))
    })?;
    let driver = repo.find_driver(driver_id)?.ok_or_else(|| {
        Error::conflict(format!(
            "driver {} assigned to vehicle {} no longer exists",
            driver_id, vehicle.license_plate
        ))
    })?;

    Ok(Parties {
        employee,
        vehicle,
        driver,
    })
}

fn ensure_not_past(date: NaiveDate, today: NaiveDate) -> Result<()> {
    if date < today {
        return Err(Error::validation(
            "date",
            format!("allocation date {} is in the past (today is {})", date, today),
        ));
    }
    Ok(())
}

fn ensure_vehicle_free<R: AllocationRepository + ?Sized>(
    repo: &R,
    vehicle: &Vehicle,
    date: NaiveDate,
    exclude: Option<&str>,
) -> Result<()> {
    if is_vehicle_free(repo, &vehicle.id, date, exclude)? {
        Ok(())
    } else {
        Err(Error::conflict(format!(
            "vehicle {} is already allocated on {}",
            vehicle.license_plate, date
        )))
    }
}

fn ensure_employee_free<R: FleetRepository + ?Sized>(
    repo: &R,
    employee: &Employee,
    date: NaiveDate,
    exclude: Option<&str>,
) -> Result<()> {
    let Some(existing) = repo.find_employee_booking(&employee.id, date)? else {
        return Ok(());
    };
    if Some(existing.id.as_str()) == exclude {
        return Ok(());
    }

    let plate = repo
        .find_vehicle(&existing.vehicle_id)?
        .map(|v| v.license_plate)
        .unwrap_or_else(|| "unknown".to_string());
    Err(Error::conflict(format!(
        "employee {} already has vehicle {} allocated on {}",
        employee.name, plate, date
    )))
}
