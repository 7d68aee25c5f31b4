use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;

use valloc_app::FleetService;
use valloc_domain::FixedClock;
use valloc_http::{create_router, AppState};
use valloc_store::FleetStore;

fn app() -> Router {
    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let service = FleetService::new(Arc::new(FleetStore::in_memory()), Arc::new(FixedClock(today)));
    create_router(AppState::new(service), "/api")
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Driver, driven vehicle and two employees; returns (vehicle, e1, e2, driver)
async fn fleet(app: &Router) -> (String, String, String, String) {
    let (status, driver) = send(
        app,
        "POST",
        "/api/drivers",
        Some(json!({"name": "Alice Brown", "license_number": "DL12345"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let driver_id = driver["id"].as_str().unwrap().to_string();

    let (status, vehicle) = send(
        app,
        "POST",
        "/api/vehicles",
        Some(json!({
            "make": "Toyota",
            "model": "Camry",
            "year": 2022,
            "license_plate": "ABC123",
            "driver_id": driver_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(vehicle["driver"]["name"], "Alice Brown");

    let (_, e1) = send(
        app,
        "POST",
        "/api/employees",
        Some(json!({"name": "John Doe", "department": "Sales"})),
    )
    .await;
    let (_, e2) = send(
        app,
        "POST",
        "/api/employees",
        Some(json!({"name": "Jane Smith", "department": "Marketing"})),
    )
    .await;

    (
        vehicle["id"].as_str().unwrap().to_string(),
        e1["id"].as_str().unwrap().to_string(),
        e2["id"].as_str().unwrap().to_string(),
        driver_id,
    )
}

#[tokio::test]
async fn root_welcomes() {
    let (status, body) = send(&app(), "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("Vehicle Allocation"));
}

#[tokio::test]
async fn allocation_conflicts_map_to_409() {
    let app = app();
    let (vehicle, e1, e2, _) = fleet(&app).await;

    let (status, first) = send(
        &app,
        "POST",
        "/api/allocations",
        Some(json!({"employee_id": e1, "vehicle_id": vehicle, "date": "2024-01-10"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["date"], "2024-01-10");
    assert_eq!(first["employee"]["department"], "Sales");

    let (status, err) = send(
        &app,
        "POST",
        "/api/allocations",
        Some(json!({"employee_id": e2, "vehicle_id": vehicle, "date": "2024-01-10"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"], "conflict");

    let (status, _) = send(
        &app,
        "POST",
        "/api/allocations",
        Some(json!({"employee_id": e2, "vehicle_id": vehicle, "date": "2024-01-11"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, list) = send(&app, "GET", "/api/allocations", None).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn validation_failures_map_to_422() {
    let app = app();

    let (status, err) = send(
        &app,
        "POST",
        "/api/drivers",
        Some(json!({"name": "A", "license_number": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"], "validation_error");
    assert_eq!(err["details"].as_array().unwrap().len(), 2);

    // malformed calendar date
    let (status, err) = send(
        &app,
        "POST",
        "/api/allocations",
        Some(json!({"employee_id": "e1", "vehicle_id": "v1", "date": "2024-02-30"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"], "validation_error");

    // unknown field
    let (status, _) = send(
        &app,
        "POST",
        "/api/employees",
        Some(json!({"name": "John Doe", "department": "Sales", "salary": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_ids_map_to_404() {
    let app = app();
    for uri in [
        "/api/vehicles/nope",
        "/api/drivers/nope",
        "/api/employees/nope",
        "/api/allocations/nope",
    ] {
        let (status, err) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(err["error"], "not_found");
    }

    let (status, _) = send(&app, "DELETE", "/api/vehicles/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn report_filters_by_range_and_department() {
    let app = app();
    let (vehicle, e1, e2, _) = fleet(&app).await;
    for (employee, date) in [(&e1, "2024-01-10"), (&e2, "2024-01-11"), (&e1, "2024-02-02")] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/allocations",
            Some(json!({"employee_id": employee, "vehicle_id": vehicle, "date": date})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, report) = send(
        &app,
        "POST",
        "/api/allocations/report",
        Some(json!({"start_date": "2024-01-01", "end_date": "2024-01-31", "department": "Sales"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_records"], 1);
    let entry = &report["allocations"][0];
    assert_eq!(entry["date"], "2024-01-10");
    assert_eq!(entry["employee"]["name"], "John Doe");
    assert_eq!(entry["vehicle"]["license_plate"], "ABC123");
    assert_eq!(entry["driver"]["license_number"], "DL12345");

    let (status, report) = send(&app, "POST", "/api/allocations/report", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_records"], 3);
}

#[tokio::test]
async fn inverted_report_range_maps_to_422() {
    let (status, err) = send(
        &app(),
        "POST",
        "/api/allocations/report",
        Some(json!({"start_date": "2024-01-31", "end_date": "2024-01-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["error"], "invalid_range");
}

#[tokio::test]
async fn vehicle_with_upcoming_allocation_cannot_be_deleted() {
    let app = app();
    let (vehicle, e1, _, _) = fleet(&app).await;
    send(
        &app,
        "POST",
        "/api/allocations",
        Some(json!({"employee_id": e1, "vehicle_id": vehicle, "date": "2024-01-10"})),
    )
    .await;

    let (status, _) = send(&app, "DELETE", &format!("/api/vehicles/{}", vehicle), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "GET", &format!("/api/vehicles/{}", vehicle), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn deleting_a_driver_frees_its_vehicle() {
    let app = app();
    let (vehicle, _, _, driver) = fleet(&app).await;

    let (_, unassigned) = send(&app, "GET", "/api/vehicles/unassigned", None).await;
    assert!(unassigned.as_array().unwrap().is_empty());

    let (status, body) = send(&app, "DELETE", &format!("/api/drivers/{}", driver), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], driver.as_str());
    assert_eq!(body["unassigned_vehicle_id"], vehicle.as_str());

    let (_, unassigned) = send(&app, "GET", "/api/vehicles/unassigned", None).await;
    assert_eq!(unassigned[0]["id"], vehicle.as_str());
    assert!(unassigned[0]["driver"].is_null());
}

#[tokio::test]
async fn update_replaces_fields() {
    let app = app();
    let (_, _, employee_id, _) = fleet(&app).await;

    let (status, employee) = send(
        &app,
        "PUT",
        &format!("/api/employees/{}", employee_id),
        Some(json!({"name": "Jane Smith", "department": "IT"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(employee["department"], "IT");
    assert_eq!(employee["id"], employee_id.as_str());
}

#[tokio::test]
async fn custom_prefix_and_root_mount() {
    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let service = FleetService::new(Arc::new(FleetStore::in_memory()), Arc::new(FixedClock(today)));
    let app = create_router(AppState::new(service.clone()), "");

    let (status, list) = send(&app, "GET", "/vehicles", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());

    let app = create_router(AppState::new(service), "/v2");
    let (status, _) = send(&app, "GET", "/v2/employees", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/api/employees", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_bookings_on_disk_admit_one() {
    let dir = tempfile::tempdir().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let store = Arc::new(FleetStore::open(dir.path().to_path_buf()).unwrap());
    let app = create_router(
        AppState::new(FleetService::new(store, Arc::new(FixedClock(today)))),
        "/api",
    );
    let (vehicle, _, _, _) = fleet(&app).await;

    let mut employees = Vec::new();
    for i in 0..8 {
        let (status, employee) = send(
            &app,
            "POST",
            "/api/employees",
            Some(json!({"name": format!("Employee {}", i), "department": "Ops"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        employees.push(employee["id"].as_str().unwrap().to_string());
    }

    let handles: Vec<_> = employees
        .into_iter()
        .map(|employee| {
            let app = app.clone();
            let vehicle = vehicle.clone();
            tokio::spawn(async move {
                send(
                    &app,
                    "POST",
                    "/api/allocations",
                    Some(json!({"employee_id": employee, "vehicle_id": vehicle, "date": "2024-01-15"})),
                )
                .await
                .0
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            status => assert_eq!(status, StatusCode::CONFLICT),
        }
    }
    assert_eq!(created, 1);

    let reopened = FleetStore::open(dir.path().to_path_buf()).unwrap();
    assert_eq!(reopened.stats().unwrap().allocations, 1);
}
