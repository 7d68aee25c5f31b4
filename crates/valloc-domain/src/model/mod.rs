//! Domain model types

pub mod allocation;
pub mod driver;
pub mod employee;
pub mod vehicle;
pub mod view;

pub use allocation::{Allocation, AllocationInput};
pub use driver::{Driver, DriverInput};
pub use employee::{Employee, EmployeeInput};
pub use vehicle::{Vehicle, VehicleInput};
pub use view::{AllocationView, DriverView, EmployeeView, VehicleView};
