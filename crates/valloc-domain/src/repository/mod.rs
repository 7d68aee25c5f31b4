//! Repository trait definitions for data persistence
//!
//! `insert_*` and `replace_*` must enforce the uniqueness constraints of
//! their collection and fail with `Error::Conflict` without storing
//! anything. `replace_*` and `delete_*` fail with `Error::NotFound` when
//! the id is unknown.

use chrono::NaiveDate;

use crate::model::{Allocation, Driver, Employee, Vehicle};
use valloc_types::Error;

/// Repository for vehicles (unique: license plate, assigned driver)
pub trait VehicleRepository {
    fn insert_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, Error>;

    fn find_vehicle(&self, id: &str) -> Result<Option<Vehicle>, Error>;

    /// All vehicles, oldest first
    fn list_vehicles(&self) -> Result<Vec<Vehicle>, Error>;

    fn replace_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, Error>;

    fn delete_vehicle(&self, id: &str) -> Result<Vehicle, Error>;

    fn find_vehicle_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, Error>;

    fn find_vehicle_by_driver(&self, driver_id: &str) -> Result<Option<Vehicle>, Error>;
}

/// Repository for drivers (unique: license number)
pub trait DriverRepository {
    fn insert_driver(&self, driver: Driver) -> Result<Driver, Error>;

    fn find_driver(&self, id: &str) -> Result<Option<Driver>, Error>;

    fn list_drivers(&self) -> Result<Vec<Driver>, Error>;

    fn replace_driver(&self, driver: Driver) -> Result<Driver, Error>;

    fn delete_driver(&self, id: &str) -> Result<Driver, Error>;

    fn find_driver_by_license(&self, license_number: &str) -> Result<Option<Driver>, Error>;
}

/// Repository for employees
pub trait EmployeeRepository {
    fn insert_employee(&self, employee: Employee) -> Result<Employee, Error>;

    fn find_employee(&self, id: &str) -> Result<Option<Employee>, Error>;

    fn list_employees(&self) -> Result<Vec<Employee>, Error>;

    fn replace_employee(&self, employee: Employee) -> Result<Employee, Error>;

    fn delete_employee(&self, id: &str) -> Result<Employee, Error>;

    fn count_employees(&self) -> Result<usize, Error>;
}

/// Repository for allocations (unique: vehicle+date, employee+date)
pub trait AllocationRepository {
    fn insert_allocation(&self, allocation: Allocation) -> Result<Allocation, Error>;

    fn find_allocation(&self, id: &str) -> Result<Option<Allocation>, Error>;

    /// All allocations ordered by date, then creation time
    fn list_allocations(&self) -> Result<Vec<Allocation>, Error>;

    fn replace_allocation(&self, allocation: Allocation) -> Result<Allocation, Error>;

    fn delete_allocation(&self, id: &str) -> Result<Allocation, Error>;

    /// The allocation holding a vehicle on a day, if any
    fn find_vehicle_booking(
        &self,
        vehicle_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Allocation>, Error>;

    /// The allocation held by an employee on a day, if any
    fn find_employee_booking(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Allocation>, Error>;

    fn allocations_for_vehicle(&self, vehicle_id: &str) -> Result<Vec<Allocation>, Error>;

    fn allocations_for_employee(&self, employee_id: &str) -> Result<Vec<Allocation>, Error>;
}

/// Everything the services need from a store
pub trait FleetRepository:
    VehicleRepository + DriverRepository + EmployeeRepository + AllocationRepository
{
}

impl<T> FleetRepository for T where
    T: VehicleRepository + DriverRepository + EmployeeRepository + AllocationRepository + ?Sized
{
}
