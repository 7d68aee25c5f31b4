//! Unique constraints
//!
//! Each check compares a candidate row against every other row of its
//! collection. Rows with the candidate's own id are skipped so the same
//! checks serve inserts and replacements.

use std::collections::HashMap;

use valloc_domain::model::{Allocation, Driver, Vehicle};
use valloc_types::{Error, Result};

/// Comparison key for plates and license numbers: case, spaces and
/// dashes are ignored
pub fn normalize_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// license_plate unique; driver_id unique when set
pub(crate) fn check_vehicle(rows: &HashMap<String, Vehicle>, candidate: &Vehicle) -> Result<()> {
    let plate = normalize_key(&candidate.license_plate);
    for other in rows.values().filter(|v| v.id != candidate.id) {
        if normalize_key(&other.license_plate) == plate {
            return Err(Error::conflict(format!(
                "license plate '{}' is already registered",
                candidate.license_plate
            )));
        }
        if candidate.driver_id.is_some() && other.driver_id == candidate.driver_id {
            return Err(Error::conflict(format!(
                "driver is already assigned to vehicle {}",
                other.license_plate
            )));
        }
    }
    Ok(())
}

/// license_number unique
pub(crate) fn check_driver(rows: &HashMap<String, Driver>, candidate: &Driver) -> Result<()> {
    let license = normalize_key(&candidate.license_number);
    let taken = rows
        .values()
        .any(|d| d.id != candidate.id && normalize_key(&d.license_number) == license);
    if taken {
        return Err(Error::conflict(format!(
            "license number '{}' is already registered",
            candidate.license_number
        )));
    }
    Ok(())
}

/// (vehicle_id, date) unique; (employee_id, date) unique
pub(crate) fn check_allocation(
    rows: &HashMap<String, Allocation>,
    candidate: &Allocation,
) -> Result<()> {
    for other in rows
        .values()
        .filter(|a| a.id != candidate.id && a.date == candidate.date)
    {
        if other.vehicle_id == candidate.vehicle_id {
            return Err(Error::conflict(format!(
                "vehicle {} is already allocated on {}",
                candidate.vehicle_id, candidate.date
            )));
        }
        if other.employee_id == candidate.employee_id {
            return Err(Error::conflict(format!(
                "employee {} already has an allocation on {}",
                candidate.employee_id, candidate.date
            )));
        }
    }
    Ok(())
}
