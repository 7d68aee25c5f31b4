//! Domain layer for vehicle allocation
//!
//! Models and their input schemas, repository traits implemented by the
//! store, and the services that carry the business rules.

pub mod clock;
pub mod model;
pub mod repository;
pub mod service;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use repository::FleetRepository;
pub use validation::Validate;
