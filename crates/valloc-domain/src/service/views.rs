//! Resolve stored references into display views

use valloc_types::Result;

use crate::model::{Allocation, AllocationView, Vehicle, VehicleView};
use crate::repository::FleetRepository;

pub fn vehicle_view<R: FleetRepository + ?Sized>(repo: &R, vehicle: &Vehicle) -> Result<VehicleView> {
    let driver = match vehicle.driver_id.as_deref() {
        Some(driver_id) => repo.find_driver(driver_id)?,
        None => None,
    };
    Ok(VehicleView::new(vehicle, driver.as_ref()))
}

pub fn vehicle_views<R: FleetRepository + ?Sized>(
    repo: &R,
    vehicles: &[Vehicle],
) -> Result<Vec<VehicleView>> {
    vehicles.iter().map(|v| vehicle_view(repo, v)).collect()
}

/// Join an allocation with its employee, vehicle and driver
pub fn allocation_view<R: FleetRepository + ?Sized>(
    repo: &R,
    allocation: &Allocation,
) -> Result<AllocationView> {
    let employee = repo.find_employee(&allocation.employee_id)?;
    let vehicle = repo.find_vehicle(&allocation.vehicle_id)?;
    let driver = match vehicle.as_ref().and_then(|v| v.driver_id.as_deref()) {
        Some(driver_id) => repo.find_driver(driver_id)?,
        None => None,
    };
    Ok(AllocationView::new(
        allocation,
        employee.as_ref(),
        vehicle.as_ref(),
        driver.as_ref(),
    ))
}

pub fn allocation_views<R: FleetRepository + ?Sized>(
    repo: &R,
    allocations: &[Allocation],
) -> Result<Vec<AllocationView>> {
    allocations.iter().map(|a| allocation_view(repo, a)).collect()
}
