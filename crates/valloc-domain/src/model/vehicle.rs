//! Vehicle type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use valloc_types::Result;

use crate::validation::{non_blank, Validate, Violations};

/// Oldest and newest model years accepted
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// Company vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    /// Unique across all vehicles
    pub license_plate: String,
    /// Assigned driver, at most one vehicle per driver
    #[serde(default)]
    pub driver_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(input: VehicleInput) -> Self {
        let mut vehicle = Self {
            id: valloc_types::new_id(),
            make: String::new(),
            model: String::new(),
            year: input.year,
            license_plate: String::new(),
            driver_id: None,
            created_at: Utc::now(),
        };
        vehicle.apply(input);
        vehicle
    }

    /// Replace every mutable field from an input body
    pub fn apply(&mut self, input: VehicleInput) {
        self.make = input.make.trim().to_string();
        self.model = input.model.trim().to_string();
        self.year = input.year;
        self.license_plate = input.license_plate.trim().to_string();
        self.driver_id = non_blank(input.driver_id.as_deref());
    }

    pub fn has_driver(&self) -> bool {
        self.driver_id.is_some()
    }
}

/// Body of vehicle create and update requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleInput {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    /// Empty string and null both mean "no driver"
    #[serde(default)]
    pub driver_id: Option<String>,
}

impl VehicleInput {
    /// Driver reference with blank values dropped
    pub fn driver_ref(&self) -> Option<String> {
        non_blank(self.driver_id.as_deref())
    }
}

impl Validate for VehicleInput {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::new();
        v.require_text("make", &self.make);
        v.require_text("model", &self.model);
        v.check(
            (MIN_YEAR..=MAX_YEAR).contains(&self.year),
            "year",
            format!("must be between {} and {}", MIN_YEAR, MAX_YEAR),
        );
        v.require_text("license_plate", &self.license_plate);
        v.into_result()
    }
}
