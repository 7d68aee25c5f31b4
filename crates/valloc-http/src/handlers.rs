//! Request handlers
//!
//! Bodies are taken as `Result<Json<T>, JsonRejection>` so that malformed
//! JSON is answered with the same 422 error body as a failed validation.
//! Service calls take the store lock and write to disk, so they run on the
//! blocking pool.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::error;

use valloc_app::FleetService;
use valloc_domain::model::{
    AllocationInput, AllocationView, Driver, DriverInput, Employee, EmployeeInput, VehicleInput,
    VehicleView,
};
use valloc_domain::service::{AllocationReport, ReportFilter};

use valloc_types::Error;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

/// Body of every successful delete
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unassigned_vehicle_id: Option<String>,
}

impl Deleted {
    fn new(what: &str, id: String) -> Self {
        Self {
            message: format!("{} deleted successfully", what),
            id,
            unassigned_vehicle_id: None,
        }
    }
}

type Created<T> = (StatusCode, Json<T>);

/// Run a service call on the blocking thread pool
async fn run_blocking<T, F>(state: AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&FleetService) -> valloc_types::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let service = state.service;
    tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| {
            error!(error = %e, "blocking task failed");
            Error::Store(format!("spawn_blocking failed: {}", e))
        })?
        .map_err(ApiError::from)
}

pub async fn root() -> Json<Message> {
    Json(Message {
        message: "Welcome to the Vehicle Allocation API".to_string(),
    })
}

// ============================================================================
// Vehicles
// ============================================================================

pub async fn list_vehicles(State(state): State<AppState>) -> ApiResult<Json<Vec<VehicleView>>> {
    Ok(Json(run_blocking(state, |svc| svc.list_vehicles()).await?))
}

pub async fn list_unassigned_vehicles(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<VehicleView>>> {
    Ok(Json(run_blocking(state, |svc| svc.unassigned_vehicles()).await?))
}

pub async fn create_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<VehicleInput>, JsonRejection>,
) -> ApiResult<Created<VehicleView>> {
    let Json(input) = payload?;
    let vehicle = run_blocking(state, move |svc| svc.create_vehicle(input)).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<VehicleView>> {
    Ok(Json(run_blocking(state, move |svc| svc.get_vehicle(&id)).await?))
}

pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<VehicleInput>, JsonRejection>,
) -> ApiResult<Json<VehicleView>> {
    let Json(input) = payload?;
    Ok(Json(run_blocking(state, move |svc| svc.update_vehicle(&id, input)).await?))
}

pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Deleted>> {
    let vehicle = run_blocking(state, move |svc| svc.delete_vehicle(&id)).await?;
    Ok(Json(Deleted::new("Vehicle", vehicle.id)))
}

// ============================================================================
// Drivers
// ============================================================================

pub async fn list_drivers(State(state): State<AppState>) -> ApiResult<Json<Vec<Driver>>> {
    Ok(Json(run_blocking(state, |svc| svc.list_drivers()).await?))
}

pub async fn create_driver(
    State(state): State<AppState>,
    payload: Result<Json<DriverInput>, JsonRejection>,
) -> ApiResult<Created<Driver>> {
    let Json(input) = payload?;
    let driver = run_blocking(state, move |svc| svc.create_driver(input)).await?;
    Ok((StatusCode::CREATED, Json(driver)))
}

pub async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Driver>> {
    Ok(Json(run_blocking(state, move |svc| svc.get_driver(&id)).await?))
}

pub async fn update_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<DriverInput>, JsonRejection>,
) -> ApiResult<Json<Driver>> {
    let Json(input) = payload?;
    Ok(Json(run_blocking(state, move |svc| svc.update_driver(&id, input)).await?))
}

pub async fn delete_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Deleted>> {
    let removed = run_blocking(state, move |svc| svc.delete_driver(&id)).await?;
    let mut body = Deleted::new("Driver", removed.driver.id);
    body.unassigned_vehicle_id = removed.unassigned_from.map(|v| v.id);
    Ok(Json(body))
}

// ============================================================================
// Employees
// ============================================================================

pub async fn list_employees(State(state): State<AppState>) -> ApiResult<Json<Vec<Employee>>> {
    Ok(Json(run_blocking(state, |svc| svc.list_employees()).await?))
}

pub async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeInput>, JsonRejection>,
) -> ApiResult<Created<Employee>> {
    let Json(input) = payload?;
    let employee = run_blocking(state, move |svc| svc.create_employee(input)).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(run_blocking(state, move |svc| svc.get_employee(&id)).await?))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EmployeeInput>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let Json(input) = payload?;
    Ok(Json(run_blocking(state, move |svc| svc.update_employee(&id, input)).await?))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Deleted>> {
    let employee = run_blocking(state, move |svc| svc.delete_employee(&id)).await?;
    Ok(Json(Deleted::new("Employee", employee.id)))
}

// ============================================================================
// Allocations
// ============================================================================

pub async fn list_allocations(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<AllocationView>>> {
    Ok(Json(run_blocking(state, |svc| svc.list_allocations()).await?))
}

pub async fn create_allocation(
    State(state): State<AppState>,
    payload: Result<Json<AllocationInput>, JsonRejection>,
) -> ApiResult<Created<AllocationView>> {
    let Json(input) = payload?;
    let allocation = run_blocking(state, move |svc| svc.create_allocation(&input)).await?;
    Ok((StatusCode::CREATED, Json(allocation)))
}

pub async fn get_allocation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AllocationView>> {
    Ok(Json(run_blocking(state, move |svc| svc.get_allocation(&id)).await?))
}

pub async fn update_allocation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AllocationInput>, JsonRejection>,
) -> ApiResult<Json<AllocationView>> {
    let Json(input) = payload?;
    Ok(Json(run_blocking(state, move |svc| svc.update_allocation(&id, &input)).await?))
}

pub async fn delete_allocation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Deleted>> {
    let allocation = run_blocking(state, move |svc| svc.delete_allocation(&id)).await?;
    Ok(Json(Deleted::new("Allocation", allocation.id)))
}

pub async fn allocation_report(
    State(state): State<AppState>,
    payload: Result<Json<ReportFilter>, JsonRejection>,
) -> ApiResult<Json<AllocationReport>> {
    let Json(filter) = payload?;
    Ok(Json(run_blocking(state, move |svc| svc.report(&filter)).await?))
}
