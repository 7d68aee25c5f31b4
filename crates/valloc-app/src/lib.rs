//! Application layer for vehicle allocation
//!
//! Wires the domain rules to a store and a clock, and carries the pieces
//! shared by the HTTP surface and the CLI.

pub mod config;
pub mod export;
pub mod repository;
pub mod seed;
pub mod service;

pub use config::Config;
pub use service::FleetService;
