use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use valloc_types::Result;

use crate::validation::{Validate, Violations};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub department: String,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn new(input: EmployeeInput) -> Self {
        Self {
            id: valloc_types::new_id(),
            name: input.name.trim().to_string(),
            department: input.department.trim().to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, input: EmployeeInput) {
        self.name = input.name.trim().to_string();
        self.department = input.department.trim().to_string();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmployeeInput {
    pub name: String,
    pub department: String,
}

impl Validate for EmployeeInput {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::new();
        v.require_text("name", &self.name);
        v.require_text("department", &self.department);
        v.into_result()
    }
}
