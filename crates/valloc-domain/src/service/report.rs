//! Allocation report aggregator

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use valloc_types::{EntityKind, Error, Result};

use crate::model::{Allocation, Driver, DriverView, Employee, EmployeeView, Vehicle};
use crate::repository::FleetRepository;
use crate::validation::non_blank;

/// Report query; every field is optional and blank strings are ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub employee_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub driver_id: Option<String>,
    pub department: Option<String>,
}

impl ReportFilter {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            ..Self::default()
        }
    }

    /// Start must not come after end
    pub fn validate(&self) -> Result<()> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => Err(Error::InvalidRange { start, end }),
            _ => Ok(()),
        }
    }

    /// Inclusive range check; open bounds match everything
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date.map_or(true, |start| date >= start)
            && self.end_date.map_or(true, |end| date <= end)
    }

    /// Whether an allocation and its resolved entities pass every filter
    pub fn matches(
        &self,
        allocation: &Allocation,
        employee: Option<&Employee>,
        vehicle: Option<&Vehicle>,
    ) -> bool {
        if !self.covers(allocation.date) {
            return false;
        }
        if let Some(employee_id) = non_blank(self.employee_id.as_deref()) {
            if allocation.employee_id != employee_id {
                return false;
            }
        }
        if let Some(vehicle_id) = non_blank(self.vehicle_id.as_deref()) {
            if allocation.vehicle_id != vehicle_id {
                return false;
            }
        }
        if let Some(driver_id) = non_blank(self.driver_id.as_deref()) {
            let driven = vehicle
                .and_then(|v| v.driver_id.as_deref())
                .map_or(false, |d| d == driver_id);
            if !driven {
                return false;
            }
        }
        if let Some(department) = non_blank(self.department.as_deref()) {
            if employee.map_or(true, |e| e.department != department) {
                return false;
            }
        }
        true
    }
}

/// Vehicle columns of a report row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
}

impl From<&Vehicle> for VehicleSummary {
    fn from(v: &Vehicle) -> Self {
        Self {
            id: v.id.clone(),
            make: v.make.clone(),
            model: v.model.clone(),
            year: v.year,
            license_plate: v.license_plate.clone(),
        }
    }
}

/// One flattened report row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub allocation_id: String,
    pub date: NaiveDate,
    pub employee: Option<EmployeeView>,
    pub vehicle: Option<VehicleSummary>,
    pub driver: Option<DriverView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<EntityKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
    pub total_records: usize,
    pub allocations: Vec<ReportEntry>,
}

/// Filter allocations and join each with its employee, vehicle and driver.
/// Rows come back ordered by date ascending.
pub fn generate_report<R: FleetRepository + ?Sized>(
    repo: &R,
    filter: &ReportFilter,
) -> Result<AllocationReport> {
    filter.validate()?;

    let employees: HashMap<String, Employee> = repo
        .list_employees()?
        .into_iter()
        .map(|e| (e.id.clone(), e))
        .collect();
    let vehicles: HashMap<String, Vehicle> = repo
        .list_vehicles()?
        .into_iter()
        .map(|v| (v.id.clone(), v))
        .collect();
    let drivers: HashMap<String, Driver> = repo
        .list_drivers()?
        .into_iter()
        .map(|d| (d.id.clone(), d))
        .collect();

    let mut selected: Vec<Allocation> = repo
        .list_allocations()?
        .into_iter()
        .filter(|a| {
            filter.matches(
                a,
                employees.get(&a.employee_id),
                vehicles.get(&a.vehicle_id),
            )
        })
        .collect();
    selected.sort_by(|a, b| a.order_key().cmp(&b.order_key()));

    let allocations: Vec<ReportEntry> = selected
        .iter()
        .map(|a| {
            let employee = employees.get(&a.employee_id);
            let vehicle = vehicles.get(&a.vehicle_id);
            let driver = vehicle
                .and_then(|v| v.driver_id.as_deref())
                .and_then(|id| drivers.get(id));

            let mut missing = Vec::new();
            if employee.is_none() {
                missing.push(EntityKind::Employee);
            }
            if vehicle.is_none() {
                missing.push(EntityKind::Vehicle);
            }

            ReportEntry {
                allocation_id: a.id.clone(),
                date: a.date,
                employee: employee.map(EmployeeView::from),
                vehicle: vehicle.map(VehicleSummary::from),
                driver: driver.map(DriverView::from),
                missing,
            }
        })
        .collect();

    Ok(AllocationReport {
        total_records: allocations.len(),
        allocations,
    })
}

/// Render a report as a fixed-width text table
pub fn render_report_table(report: &AllocationReport) -> String {
    let mut out = String::new();
    out.push_str("==================================================\n");
    out.push_str("              Vehicle Allocation Report            \n");
    out.push_str("==================================================\n\n");
    out.push_str(&format!("  Total records: {}\n\n", report.total_records));

    if report.allocations.is_empty() {
        out.push_str("  (no allocations match)\n");
        return out;
    }

    out.push_str(&format!(
        "{:<10} {:<20} {:<12} {:<10} {:<20} {:<20}\n",
        "Date", "Employee", "Department", "Plate", "Vehicle", "Driver"
    ));
    out.push_str("-".repeat(97).as_str());
    out.push('\n');

    for entry in &report.allocations {
        let (employee, department) = match &entry.employee {
            Some(e) => (e.name.as_str(), e.department.as_str()),
            None => ("(deleted)", "-"),
        };
        let (plate, vehicle) = match &entry.vehicle {
            Some(v) => (v.license_plate.clone(), format!("{} {}", v.make, v.model)),
            None => ("-".to_string(), "(deleted)".to_string()),
        };
        let driver = entry.driver.as_ref().map_or("-", |d| d.name.as_str());

        out.push_str(&format!(
            "{:<10} {:<20} {:<12} {:<10} {:<20} {:<20}\n",
            entry.date.format("%Y-%m-%d"),
            truncate_str(employee, 19),
            truncate_str(department, 11),
            truncate_str(&plate, 9),
            truncate_str(&vehicle, 19),
            truncate_str(driver, 19),
        ));
    }

    out
}

fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn allocation(employee_id: &str, vehicle_id: &str, date: NaiveDate) -> Allocation {
        Allocation {
            id: format!("a-{}-{}", vehicle_id, date),
            employee_id: employee_id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            date,
            created_at: Utc::now(),
        }
    }

    fn employee(id: &str, department: &str) -> Employee {
        Employee {
            id: id.to_string(),
            name: format!("Employee {}", id),
            department: department.to_string(),
            created_at: Utc::now(),
        }
    }

    fn vehicle(id: &str, driver_id: Option<&str>) -> Vehicle {
        Vehicle {
            id: id.to_string(),
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            year: 2022,
            license_plate: format!("P-{}", id),
            driver_id: driver_id.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_start_after_end_is_invalid_range() {
        let filter = ReportFilter::between(day(31), day(1));
        match filter.validate() {
            Err(Error::InvalidRange { start, end }) => {
                assert_eq!(start, day(31));
                assert_eq!(end, day(1));
            }
            other => panic!("expected InvalidRange, got {:?}", other),
        }
        assert!(ReportFilter::between(day(5), day(5)).validate().is_ok());
    }

    #[test]
    fn test_range_is_inclusive_and_open_bounds_match() {
        let filter = ReportFilter::between(day(10), day(20));
        assert!(filter.covers(day(10)));
        assert!(filter.covers(day(20)));
        assert!(!filter.covers(day(9)));
        assert!(!filter.covers(day(21)));

        let open = ReportFilter {
            start_date: Some(day(10)),
            ..ReportFilter::default()
        };
        assert!(open.covers(day(31)));
        assert!(!open.covers(day(1)));
    }

    #[test]
    fn test_department_filter_needs_resolved_employee() {
        let filter = ReportFilter {
            department: Some("Sales".to_string()),
            ..ReportFilter::default()
        };
        let a = allocation("e1", "v1", day(10));
        let sales = employee("e1", "Sales");
        let it = employee("e1", "IT");

        assert!(filter.matches(&a, Some(&sales), None));
        assert!(!filter.matches(&a, Some(&it), None));
        assert!(!filter.matches(&a, None, None));
    }

    #[test]
    fn test_driver_filter_uses_current_vehicle_driver() {
        let filter = ReportFilter {
            driver_id: Some("d1".to_string()),
            ..ReportFilter::default()
        };
        let a = allocation("e1", "v1", day(10));
        assert!(filter.matches(&a, None, Some(&vehicle("v1", Some("d1")))));
        assert!(!filter.matches(&a, None, Some(&vehicle("v1", Some("d2")))));
        assert!(!filter.matches(&a, None, Some(&vehicle("v1", None))));
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let filter = ReportFilter {
            employee_id: Some("".to_string()),
            department: Some("  ".to_string()),
            ..ReportFilter::default()
        };
        assert!(filter.matches(&allocation("e1", "v1", day(3)), None, None));
    }

    #[test]
    fn test_filter_rejects_unknown_fields() {
        let body = r#"{"start_date":"2024-01-01","colour":"red"}"#;
        assert!(serde_json::from_str::<ReportFilter>(body).is_err());

        let body = r#"{"start_date":"2024-01-01","department":"Sales"}"#;
        let filter: ReportFilter = serde_json::from_str(body).unwrap();
        assert_eq!(filter.start_date, Some(day(1)));
        assert_eq!(filter.end_date, None);
    }

    #[test]
    fn test_render_marks_dangling_rows() {
        let report = AllocationReport {
            total_records: 1,
            allocations: vec![ReportEntry {
                allocation_id: "a1".to_string(),
                date: day(10),
                employee: None,
                vehicle: None,
                driver: None,
                missing: vec![EntityKind::Employee, EntityKind::Vehicle],
            }],
        };
        let table = render_report_table(&report);
        assert!(table.contains("Total records: 1"));
        assert!(table.contains("2024-01-10"));
        assert!(table.contains("(deleted)"));
    }
}
