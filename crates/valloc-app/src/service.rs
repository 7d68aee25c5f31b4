//! Use cases shared by the HTTP surface and the CLI

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use valloc_domain::model::{
    Allocation, AllocationInput, AllocationView, Driver, DriverInput, Employee, EmployeeInput,
    Vehicle, VehicleInput, VehicleView,
};
use valloc_domain::repository::{
    AllocationRepository, DriverRepository, EmployeeRepository, VehicleRepository,
};
use valloc_domain::service::{allocation_rules, fleet_rules, report, views};
use valloc_domain::service::{AllocationReport, RemovedDriver, ReportFilter};
use valloc_domain::{Clock, SystemClock};
use valloc_store::FleetStore;
use valloc_types::{EntityKind, Error, Result};

/// A store paired with the clock that decides what "today" is
#[derive(Clone)]
pub struct FleetService {
    store: Arc<FleetStore>,
    clock: Arc<dyn Clock>,
}

impl FleetService {
    pub fn new(store: Arc<FleetStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn with_system_clock(store: Arc<FleetStore>) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }

    pub fn store(&self) -> &FleetStore {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ------------------------------------------------------------------
    // Vehicles
    // ------------------------------------------------------------------

    pub fn list_vehicles(&self) -> Result<Vec<VehicleView>> {
        let vehicles = self.store.list_vehicles()?;
        views::vehicle_views(self.store.as_ref(), &vehicles)
    }

    /// Vehicles with no driver assigned
    pub fn unassigned_vehicles(&self) -> Result<Vec<VehicleView>> {
        let vehicles: Vec<Vehicle> = self
            .store
            .list_vehicles()?
            .into_iter()
            .filter(|v| !v.has_driver())
            .collect();
        views::vehicle_views(self.store.as_ref(), &vehicles)
    }

    pub fn get_vehicle(&self, id: &str) -> Result<VehicleView> {
        let vehicle = self
            .store
            .find_vehicle(id)?
            .ok_or_else(|| Error::not_found(EntityKind::Vehicle, id))?;
        views::vehicle_view(self.store.as_ref(), &vehicle)
    }

    pub fn create_vehicle(&self, input: VehicleInput) -> Result<VehicleView> {
        let vehicle = logged(
            "create vehicle",
            fleet_rules::register_vehicle(self.store.as_ref(), input),
        )?;
        info!(vehicle_id = %vehicle.id, plate = %vehicle.license_plate, "vehicle created");
        views::vehicle_view(self.store.as_ref(), &vehicle)
    }

    pub fn update_vehicle(&self, id: &str, input: VehicleInput) -> Result<VehicleView> {
        let vehicle = logged(
            "update vehicle",
            fleet_rules::update_vehicle(self.store.as_ref(), self.today(), id, input),
        )?;
        info!(vehicle_id = %vehicle.id, "vehicle updated");
        views::vehicle_view(self.store.as_ref(), &vehicle)
    }

    pub fn delete_vehicle(&self, id: &str) -> Result<Vehicle> {
        let vehicle = logged(
            "delete vehicle",
            fleet_rules::remove_vehicle(self.store.as_ref(), self.today(), id),
        )?;
        info!(vehicle_id = %vehicle.id, plate = %vehicle.license_plate, "vehicle deleted");
        Ok(vehicle)
    }

    // ------------------------------------------------------------------
    // Drivers
    // ------------------------------------------------------------------

    pub fn list_drivers(&self) -> Result<Vec<Driver>> {
        self.store.list_drivers()
    }

    pub fn get_driver(&self, id: &str) -> Result<Driver> {
        self.store
            .find_driver(id)?
            .ok_or_else(|| Error::not_found(EntityKind::Driver, id))
    }

    pub fn create_driver(&self, input: DriverInput) -> Result<Driver> {
        let driver = logged(
            "create driver",
            fleet_rules::register_driver(self.store.as_ref(), input),
        )?;
        info!(driver_id = %driver.id, "driver created");
        Ok(driver)
    }

    pub fn update_driver(&self, id: &str, input: DriverInput) -> Result<Driver> {
        let driver = logged(
            "update driver",
            fleet_rules::update_driver(self.store.as_ref(), id, input),
        )?;
        info!(driver_id = %driver.id, "driver updated");
        Ok(driver)
    }

    pub fn delete_driver(&self, id: &str) -> Result<RemovedDriver> {
        let removed = logged(
            "delete driver",
            fleet_rules::remove_driver(self.store.as_ref(), self.today(), id),
        )?;
        match &removed.unassigned_from {
            Some(vehicle) => info!(
                driver_id = %removed.driver.id,
                vehicle_id = %vehicle.id,
                "driver unassigned and deleted"
            ),
            None => info!(driver_id = %removed.driver.id, "driver deleted"),
        }
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Employees
    // ------------------------------------------------------------------

    pub fn list_employees(&self) -> Result<Vec<Employee>> {
        self.store.list_employees()
    }

    pub fn get_employee(&self, id: &str) -> Result<Employee> {
        self.store
            .find_employee(id)?
            .ok_or_else(|| Error::not_found(EntityKind::Employee, id))
    }

    pub fn create_employee(&self, input: EmployeeInput) -> Result<Employee> {
        let employee = logged(
            "create employee",
            fleet_rules::register_employee(self.store.as_ref(), input),
        )?;
        info!(employee_id = %employee.id, "employee created");
        Ok(employee)
    }

    pub fn update_employee(&self, id: &str, input: EmployeeInput) -> Result<Employee> {
        let employee = logged(
            "update employee",
            fleet_rules::update_employee(self.store.as_ref(), id, input),
        )?;
        info!(employee_id = %employee.id, "employee updated");
        Ok(employee)
    }

    pub fn delete_employee(&self, id: &str) -> Result<Employee> {
        let employee = logged(
            "delete employee",
            fleet_rules::remove_employee(self.store.as_ref(), id),
        )?;
        info!(employee_id = %employee.id, "employee deleted");
        Ok(employee)
    }

    // ------------------------------------------------------------------
    // Allocations
    // ------------------------------------------------------------------

    pub fn list_allocations(&self) -> Result<Vec<AllocationView>> {
        let allocations = self.store.list_allocations()?;
        views::allocation_views(self.store.as_ref(), &allocations)
    }

    pub fn get_allocation(&self, id: &str) -> Result<AllocationView> {
        let allocation = self
            .store
            .find_allocation(id)?
            .ok_or_else(|| Error::not_found(EntityKind::Allocation, id))?;
        let view = views::allocation_view(self.store.as_ref(), &allocation)?;
        if view.is_dangling() {
            warn!(allocation_id = %id, missing = ?view.missing, "allocation has dangling references");
        }
        Ok(view)
    }

    pub fn create_allocation(&self, input: &AllocationInput) -> Result<AllocationView> {
        let allocation = logged(
            "create allocation",
            allocation_rules::allocate(self.store.as_ref(), self.today(), input),
        )?;
        info!(
            allocation_id = %allocation.id,
            vehicle_id = %allocation.vehicle_id,
            employee_id = %allocation.employee_id,
            date = %allocation.date,
            "allocation created"
        );
        views::allocation_view(self.store.as_ref(), &allocation)
    }

    pub fn update_allocation(&self, id: &str, input: &AllocationInput) -> Result<AllocationView> {
        let allocation = logged(
            "update allocation",
            allocation_rules::reallocate(self.store.as_ref(), self.today(), id, input),
        )?;
        info!(allocation_id = %allocation.id, date = %allocation.date, "allocation updated");
        views::allocation_view(self.store.as_ref(), &allocation)
    }

    pub fn delete_allocation(&self, id: &str) -> Result<Allocation> {
        let allocation = logged(
            "delete allocation",
            allocation_rules::cancel(self.store.as_ref(), self.today(), id),
        )?;
        info!(allocation_id = %allocation.id, "allocation deleted");
        Ok(allocation)
    }

    /// Whether the vehicle is free on `date`
    pub fn vehicle_available(&self, vehicle_id: &str, date: NaiveDate) -> Result<bool> {
        allocation_rules::is_vehicle_free(self.store.as_ref(), vehicle_id, date, None)
    }

    // ------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------

    pub fn report(&self, filter: &ReportFilter) -> Result<AllocationReport> {
        let report = logged(
            "allocation report",
            report::generate_report(self.store.as_ref(), filter),
        )?;
        info!(
            records = report.total_records,
            start = ?filter.start_date,
            end = ?filter.end_date,
            "allocation report generated"
        );
        Ok(report)
    }
}

/// Log a failed operation: store trouble at error, rejected input at warn
fn logged<T>(action: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        match e {
            Error::Io(_) | Error::Json(_) | Error::Store(_) => {
                error!(action, error = %e, "operation failed")
            }
            _ => warn!(action, error = %e, "request rejected"),
        }
    }
    result
}
