//! Shared handler state

use valloc_app::FleetService;

#[derive(Clone)]
pub struct AppState {
    pub service: FleetService,
}

impl AppState {
    pub fn new(service: FleetService) -> Self {
        Self { service }
    }
}
