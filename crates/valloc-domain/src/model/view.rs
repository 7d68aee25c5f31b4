//! Display views returned to callers
//!
//! Views flatten references into the entities they name. A reference that
//! no longer resolves becomes `None` and is listed in `missing`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use valloc_types::EntityKind;

use super::{Allocation, Driver, Employee, Vehicle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverView {
    pub id: String,
    pub name: String,
    pub license_number: String,
}

impl From<&Driver> for DriverView {
    fn from(d: &Driver) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            license_number: d.license_number.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeView {
    pub id: String,
    pub name: String,
    pub department: String,
}

impl From<&Employee> for EmployeeView {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id.clone(),
            name: e.name.clone(),
            department: e.department.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleView {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub driver: Option<DriverView>,
}

impl VehicleView {
    pub fn new(vehicle: &Vehicle, driver: Option<&Driver>) -> Self {
        Self {
            id: vehicle.id.clone(),
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
            license_plate: vehicle.license_plate.clone(),
            driver: driver.map(DriverView::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationView {
    pub id: String,
    pub date: NaiveDate,
    pub employee: Option<EmployeeView>,
    pub vehicle: Option<VehicleView>,
    /// References that did not resolve
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<EntityKind>,
}

impl AllocationView {
    pub fn new(
        allocation: &Allocation,
        employee: Option<&Employee>,
        vehicle: Option<&Vehicle>,
        driver: Option<&Driver>,
    ) -> Self {
        let mut missing = Vec::new();
        if employee.is_none() {
            missing.push(EntityKind::Employee);
        }
        if vehicle.is_none() {
            missing.push(EntityKind::Vehicle);
        }
        Self {
            id: allocation.id.clone(),
            date: allocation.date,
            employee: employee.map(EmployeeView::from),
            vehicle: vehicle.map(|v| VehicleView::new(v, driver)),
            missing,
        }
    }

    pub fn is_dangling(&self) -> bool {
        !self.missing.is_empty()
    }
}
