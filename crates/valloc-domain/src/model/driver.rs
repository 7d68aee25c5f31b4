use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use valloc_types::Result;

use crate::validation::{Validate, Violations};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
    /// Unique across all drivers
    pub license_number: String,
    pub created_at: DateTime<Utc>,
}

impl Driver {
    pub fn new(input: DriverInput) -> Self {
        Self {
            id: valloc_types::new_id(),
            name: input.name.trim().to_string(),
            license_number: input.license_number.trim().to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, input: DriverInput) {
        self.name = input.name.trim().to_string();
        self.license_number = input.license_number.trim().to_string();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverInput {
    pub name: String,
    pub license_number: String,
}

impl Validate for DriverInput {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::new();
        v.require_min_chars("name", &self.name, 2);
        v.require_text("license_number", &self.license_number);
        v.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_name_needs_two_chars() {
        let input = DriverInput {
            name: " A ".to_string(),
            license_number: "DL12345".to_string(),
        };
        assert!(input.validate().is_err());

        let input = DriverInput {
            name: "Al".to_string(),
            license_number: "DL12345".to_string(),
        };
        assert!(input.validate().is_ok());
    }
}
