//! Domain services

pub mod allocation_rules;
pub mod fleet_rules;
pub mod report;
pub mod views;

pub use allocation_rules::{allocate, cancel, is_vehicle_free, reallocate};
pub use fleet_rules::RemovedDriver;
pub use report::{
    generate_report, render_report_table, AllocationReport, ReportEntry, ReportFilter,
    VehicleSummary,
};
