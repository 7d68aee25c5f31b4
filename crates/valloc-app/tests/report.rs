use std::sync::Arc;

use chrono::NaiveDate;
use valloc_app::seed::{seed, FleetFixture, FixtureAllocation};
use valloc_app::FleetService;
use valloc_domain::service::ReportFilter;
use valloc_domain::FixedClock;
use valloc_store::FleetStore;
use valloc_types::Error;

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

/// Sample fleet seeded on 2023-12-31 with bookings spread over
/// December, January and February
fn seeded() -> FleetService {
    let service = FleetService::new(
        Arc::new(FleetStore::in_memory()),
        Arc::new(FixedClock(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())),
    );
    let mut fixture = FleetFixture::sample();
    fixture.allocations = vec![
        FixtureAllocation {
            employee: "John Doe".to_string(),
            license_plate: "ABC123".to_string(),
            days_ahead: 0, // 2023-12-31
        },
        FixtureAllocation {
            employee: "John Doe".to_string(),
            license_plate: "ABC123".to_string(),
            days_ahead: 10, // 2024-01-10
        },
        FixtureAllocation {
            employee: "Jane Smith".to_string(),
            license_plate: "XYZ789".to_string(),
            days_ahead: 10, // 2024-01-10
        },
        FixtureAllocation {
            employee: "Bob Johnson".to_string(),
            license_plate: "DEF456".to_string(),
            days_ahead: 20, // 2024-01-20
        },
        FixtureAllocation {
            employee: "John Doe".to_string(),
            license_plate: "XYZ789".to_string(),
            days_ahead: 31, // 2024-01-31
        },
        FixtureAllocation {
            employee: "John Doe".to_string(),
            license_plate: "DEF456".to_string(),
            days_ahead: 32, // 2024-02-01
        },
    ];
    seed(&service, &fixture).unwrap();
    service
}

#[test]
fn january_sales_report() {
    let service = seeded();
    let filter = ReportFilter {
        department: Some("Sales".to_string()),
        ..ReportFilter::between(date(1, 1), date(1, 31))
    };

    let report = service.report(&filter).unwrap();
    assert_eq!(report.total_records, 2);
    let dates: Vec<_> = report.allocations.iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![date(1, 10), date(1, 31)]);
    for entry in &report.allocations {
        let employee = entry.employee.as_ref().unwrap();
        assert_eq!(employee.name, "John Doe");
        assert_eq!(employee.department, "Sales");
        assert!(entry.vehicle.is_some());
        assert!(entry.driver.is_some());
    }
}

#[test]
fn range_bounds_are_inclusive() {
    let service = seeded();
    let report = service
        .report(&ReportFilter::between(date(1, 10), date(1, 20)))
        .unwrap();
    assert_eq!(report.total_records, 3);
    assert!(report
        .allocations
        .iter()
        .all(|e| e.date >= date(1, 10) && e.date <= date(1, 20)));
}

#[test]
fn unbounded_report_returns_everything_in_date_order() {
    let service = seeded();
    let report = service.report(&ReportFilter::default()).unwrap();
    assert_eq!(report.total_records, 6);
    let dates: Vec<_> = report.allocations.iter().map(|e| e.date).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
}

#[test]
fn driver_filter_follows_current_assignment() {
    let service = seeded();
    let driver = service
        .list_drivers()
        .unwrap()
        .into_iter()
        .find(|d| d.license_number == "DL67890")
        .unwrap();

    let filter = ReportFilter {
        driver_id: Some(driver.id.clone()),
        ..ReportFilter::default()
    };
    let report = service.report(&filter).unwrap();
    assert_eq!(report.total_records, 2);
    assert!(report
        .allocations
        .iter()
        .all(|e| e.vehicle.as_ref().map(|v| v.license_plate.as_str()) == Some("XYZ789")));
    assert!(report
        .allocations
        .iter()
        .all(|e| e.driver.as_ref().map(|d| d.id.as_str()) == Some(driver.id.as_str())));
}

#[test]
fn vehicle_and_employee_filters_combine() {
    let service = seeded();
    let john = service
        .list_employees()
        .unwrap()
        .into_iter()
        .find(|e| e.name == "John Doe")
        .unwrap();
    let camry = service
        .list_vehicles()
        .unwrap()
        .into_iter()
        .find(|v| v.license_plate == "ABC123")
        .unwrap();

    let filter = ReportFilter {
        employee_id: Some(john.id),
        vehicle_id: Some(camry.id),
        ..ReportFilter::default()
    };
    let report = service.report(&filter).unwrap();
    assert_eq!(report.total_records, 2);
}

#[test]
fn inverted_range_is_rejected() {
    let service = seeded();
    let err = service
        .report(&ReportFilter::between(date(1, 31), date(1, 1)))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRange { .. }));
}

#[test]
fn empty_match_is_not_an_error() {
    let service = seeded();
    let filter = ReportFilter {
        department: Some("Legal".to_string()),
        ..ReportFilter::default()
    };
    let report = service.report(&filter).unwrap();
    assert_eq!(report.total_records, 0);
    assert!(report.allocations.is_empty());
}
