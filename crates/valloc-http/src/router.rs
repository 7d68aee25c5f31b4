//! Route table

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Entity routes, relative to the API prefix
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/vehicles",
            get(handlers::list_vehicles).post(handlers::create_vehicle),
        )
        .route("/vehicles/unassigned", get(handlers::list_unassigned_vehicles))
        .route(
            "/vehicles/:id",
            get(handlers::get_vehicle)
                .put(handlers::update_vehicle)
                .delete(handlers::delete_vehicle),
        )
        .route(
            "/drivers",
            get(handlers::list_drivers).post(handlers::create_driver),
        )
        .route(
            "/drivers/:id",
            get(handlers::get_driver)
                .put(handlers::update_driver)
                .delete(handlers::delete_driver),
        )
        .route(
            "/employees",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/employees/:id",
            get(handlers::get_employee)
                .put(handlers::update_employee)
                .delete(handlers::delete_employee),
        )
        .route(
            "/allocations",
            get(handlers::list_allocations).post(handlers::create_allocation),
        )
        .route("/allocations/report", post(handlers::allocation_report))
        .route(
            "/allocations/:id",
            get(handlers::get_allocation)
                .put(handlers::update_allocation)
                .delete(handlers::delete_allocation),
        )
}

/// Full application router. `prefix` is either empty or starts with `/`.
pub fn create_router(state: AppState, prefix: &str) -> Router {
    let root = Router::new().route("/", get(handlers::root));
    let app = if prefix.is_empty() {
        root.merge(api_routes())
    } else {
        root.nest(prefix, api_routes())
    };
    app.with_state(state)
}
