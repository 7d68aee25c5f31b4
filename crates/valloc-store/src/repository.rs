//! Repository trait implementations for `FleetStore`

use chrono::NaiveDate;

use valloc_domain::model::{Allocation, Driver, Employee, Vehicle};
use valloc_domain::repository::{
    AllocationRepository, DriverRepository, EmployeeRepository, VehicleRepository,
};
use valloc_types::{EntityKind, Error};

use crate::index::{check_allocation, check_driver, check_vehicle, normalize_key};
use crate::{Collection, FleetStore};

impl VehicleRepository for FleetStore {
    fn insert_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, Error> {
        let mut tables = self.write()?;
        check_vehicle(&tables.vehicles, &vehicle)?;
        let id = vehicle.id.clone();
        self.commit(Collection::Vehicles, &mut tables.vehicles, &id, Some(vehicle.clone()))?;
        Ok(vehicle)
    }

    fn find_vehicle(&self, id: &str) -> Result<Option<Vehicle>, Error> {
        Ok(self.read()?.vehicles.get(id).cloned())
    }

    fn list_vehicles(&self) -> Result<Vec<Vehicle>, Error> {
        let mut vehicles: Vec<_> = self.read()?.vehicles.values().cloned().collect();
        vehicles.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        Ok(vehicles)
    }

    fn replace_vehicle(&self, vehicle: Vehicle) -> Result<Vehicle, Error> {
        let mut tables = self.write()?;
        if !tables.vehicles.contains_key(&vehicle.id) {
            return Err(Error::not_found(EntityKind::Vehicle, &vehicle.id));
        }
        check_vehicle(&tables.vehicles, &vehicle)?;
        let id = vehicle.id.clone();
        self.commit(Collection::Vehicles, &mut tables.vehicles, &id, Some(vehicle.clone()))?;
        Ok(vehicle)
    }

    fn delete_vehicle(&self, id: &str) -> Result<Vehicle, Error> {
        let mut tables = self.write()?;
        if !tables.vehicles.contains_key(id) {
            return Err(Error::not_found(EntityKind::Vehicle, id));
        }
        self.commit(Collection::Vehicles, &mut tables.vehicles, id, None)?
            .ok_or_else(|| Error::not_found(EntityKind::Vehicle, id))
    }

    fn find_vehicle_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, Error> {
        let key = normalize_key(plate);
        Ok(self
            .read()?
            .vehicles
            .values()
            .find(|v| normalize_key(&v.license_plate) == key)
            .cloned())
    }

    fn find_vehicle_by_driver(&self, driver_id: &str) -> Result<Option<Vehicle>, Error> {
        Ok(self
            .read()?
            .vehicles
            .values()
            .find(|v| v.driver_id.as_deref() == Some(driver_id))
            .cloned())
    }
}

impl DriverRepository for FleetStore {
    fn insert_driver(&self, driver: Driver) -> Result<Driver, Error> {
        let mut tables = self.write()?;
        check_driver(&tables.drivers, &driver)?;
        let id = driver.id.clone();
        self.commit(Collection::Drivers, &mut tables.drivers, &id, Some(driver.clone()))?;
        Ok(driver)
    }

    fn find_driver(&self, id: &str) -> Result<Option<Driver>, Error> {
        Ok(self.read()?.drivers.get(id).cloned())
    }

    fn list_drivers(&self) -> Result<Vec<Driver>, Error> {
        let mut drivers: Vec<_> = self.read()?.drivers.values().cloned().collect();
        drivers.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        Ok(drivers)
    }

    fn replace_driver(&self, driver: Driver) -> Result<Driver, Error> {
        let mut tables = self.write()?;
        if !tables.drivers.contains_key(&driver.id) {
            return Err(Error::not_found(EntityKind::Driver, &driver.id));
        }
        check_driver(&tables.drivers, &driver)?;
        let id = driver.id.clone();
        self.commit(Collection::Drivers, &mut tables.drivers, &id, Some(driver.clone()))?;
        Ok(driver)
    }

    fn delete_driver(&self, id: &str) -> Result<Driver, Error> {
        let mut tables = self.write()?;
        if !tables.drivers.contains_key(id) {
            return Err(Error::not_found(EntityKind::Driver, id));
        }
        self.commit(Collection::Drivers, &mut tables.drivers, id, None)?
            .ok_or_else(|| Error::not_found(EntityKind::Driver, id))
    }

    fn find_driver_by_license(&self, license_number: &str) -> Result<Option<Driver>, Error> {
        let key = normalize_key(license_number);
        Ok(self
            .read()?
            .drivers
            .values()
            .find(|d| normalize_key(&d.license_number) == key)
            .cloned())
    }
}

impl EmployeeRepository for FleetStore {
    fn insert_employee(&self, employee: Employee) -> Result<Employee, Error> {
        let mut tables = self.write()?;
        let id = employee.id.clone();
        self.commit(Collection::Employees, &mut tables.employees, &id, Some(employee.clone()))?;
        Ok(employee)
    }

    fn find_employee(&self, id: &str) -> Result<Option<Employee>, Error> {
        Ok(self.read()?.employees.get(id).cloned())
    }

    fn list_employees(&self) -> Result<Vec<Employee>, Error> {
        let mut employees: Vec<_> = self.read()?.employees.values().cloned().collect();
        employees.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        Ok(employees)
    }

    fn replace_employee(&self, employee: Employee) -> Result<Employee, Error> {
        let mut tables = self.write()?;
        if !tables.employees.contains_key(&employee.id) {
            return Err(Error::not_found(EntityKind::Employee, &employee.id));
        }
        let id = employee.id.clone();
        self.commit(Collection::Employees, &mut tables.employees, &id, Some(employee.clone()))?;
        Ok(employee)
    }

    fn delete_employee(&self, id: &str) -> Result<Employee, Error> {
        let mut tables = self.write()?;
        if !tables.employees.contains_key(id) {
            return Err(Error::not_found(EntityKind::Employee, id));
        }
        self.commit(Collection::Employees, &mut tables.employees, id, None)?
            .ok_or_else(|| Error::not_found(EntityKind::Employee, id))
    }

    fn count_employees(&self) -> Result<usize, Error> {
        Ok(self.read()?.employees.len())
    }
}

impl AllocationRepository for FleetStore {
    fn insert_allocation(&self, allocation: Allocation) -> Result<Allocation, Error> {
        let mut tables = self.write()?;
        check_allocation(&tables.allocations, &allocation)?;
        let id = allocation.id.clone();
        self.commit(
            Collection::Allocations,
            &mut tables.allocations,
            &id,
            Some(allocation.clone()),
        )?;
        Ok(allocation)
    }

    fn find_allocation(&self, id: &str) -> Result<Option<Allocation>, Error> {
        Ok(self.read()?.allocations.get(id).cloned())
    }

    fn list_allocations(&self) -> Result<Vec<Allocation>, Error> {
        let mut allocations: Vec<_> = self.read()?.allocations.values().cloned().collect();
        allocations.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
        Ok(allocations)
    }

    fn replace_allocation(&self, allocation: Allocation) -> Result<Allocation, Error> {
        let mut tables = self.write()?;
        if !tables.allocations.contains_key(&allocation.id) {
            return Err(Error::not_found(EntityKind::Allocation, &allocation.id));
        }
        check_allocation(&tables.allocations, &allocation)?;
        let id = allocation.id.clone();
        self.commit(
            Collection::Allocations,
            &mut tables.allocations,
            &id,
            Some(allocation.clone()),
        )?;
        Ok(allocation)
    }

    fn delete_allocation(&self, id: &str) -> Result<Allocation, Error> {
        let mut tables = self.write()?;
        if !tables.allocations.contains_key(id) {
            return Err(Error::not_found(EntityKind::Allocation, id));
        }
        self.commit(Collection::Allocations, &mut tables.allocations, id, None)?
            .ok_or_else(|| Error::not_found(EntityKind::Allocation, id))
    }

    fn find_vehicle_booking(
        &self,
        vehicle_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Allocation>, Error> {
        Ok(self
            .read()?
            .allocations
            .values()
            .find(|a| a.vehicle_id == vehicle_id && a.date == date)
            .cloned())
    }

    fn find_employee_booking(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Allocation>, Error> {
        Ok(self
            .read()?
            .allocations
            .values()
            .find(|a| a.employee_id == employee_id && a.date == date)
            .cloned())
    }

    fn allocations_for_vehicle(&self, vehicle_id: &str) -> Result<Vec<Allocation>, Error> {
        let mut allocations: Vec<_> = self
            .read()?
            .allocations
            .values()
            .filter(|a| a.vehicle_id == vehicle_id)
            .cloned()
            .collect();
        allocations.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
        Ok(allocations)
    }

    fn allocations_for_employee(&self, employee_id: &str) -> Result<Vec<Allocation>, Error> {
        let mut allocations: Vec<_> = self
            .read()?
            .allocations
            .values()
            .filter(|a| a.employee_id == employee_id)
            .cloned()
            .collect();
        allocations.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
        Ok(allocations)
    }
}
