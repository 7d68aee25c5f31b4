//! Day-based vehicle allocations

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use valloc_types::Result;

use crate::validation::{Validate, Violations};

/// One vehicle assigned to one employee for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: String,
    pub employee_id: String,
    pub vehicle_id: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Allocation {
    pub fn new(input: &AllocationInput) -> Self {
        Self {
            id: valloc_types::new_id(),
            employee_id: input.employee_id.trim().to_string(),
            vehicle_id: input.vehicle_id.trim().to_string(),
            date: input.date,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, input: &AllocationInput) {
        self.employee_id = input.employee_id.trim().to_string();
        self.vehicle_id = input.vehicle_id.trim().to_string();
        self.date = input.date;
    }

    /// Sort key used by listings and reports
    pub fn order_key(&self) -> (NaiveDate, DateTime<Utc>, &str) {
        (self.date, self.created_at, self.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllocationInput {
    pub employee_id: String,
    pub vehicle_id: String,
    /// `YYYY-MM-DD`; serde rejects anything that is not a calendar day
    pub date: NaiveDate,
}

impl Validate for AllocationInput {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::new();
        v.require_text("employee_id", &self.employee_id);
        v.require_text("vehicle_id", &self.vehicle_id);
        v.into_result()
    }
}
