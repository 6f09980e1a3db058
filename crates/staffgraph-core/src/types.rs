//! Core domain types for the employee/department graph.
//!
//! Field order on the serialized records matches the JSON bodies the API
//! has always returned.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StaffError};

// ── Identifiers ───────────────────────────────────────────────────

/// Store-assigned internal identifier of a node, used as the public resource id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = StaffError;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<i64>()
            .map(NodeId)
            .map_err(|_| StaffError::InvalidInput(format!("Invalid id: {s}")))
    }
}

// ── Employees ─────────────────────────────────────────────────────

/// An Employee node as returned by listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    pub name: String,
    pub role: String,
    /// Name of the department the employee WORKS_IN (denormalized copy).
    pub department: String,
    pub id: NodeId,
}

/// A validated request to create an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub name: String,
    pub role: String,
    pub department: String,
}

impl NewEmployee {
    /// Build from optional inputs; absent or blank fields are rejected.
    pub fn from_parts(
        name: Option<String>,
        role: Option<String>,
        department: Option<String>,
    ) -> Result<Self> {
        match (present(name), present(role), present(department)) {
            (Some(name), Some(role), Some(department)) => Ok(Self {
                name,
                role,
                department,
            }),
            _ => Err(StaffError::MissingFields),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A partial update: only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
}

impl EmployeeUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.role.is_none() && self.department.is_none()
    }

    /// Reject supplied-but-blank values.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("role", &self.role),
            ("department", &self.department),
        ] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(StaffError::InvalidInput(format!("{field} must not be blank")));
            }
        }
        Ok(())
    }
}

/// Result of deleting an employee.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Departments the employee managed, removed together with them.
    pub removed_departments: Vec<String>,
}

impl DeleteOutcome {
    pub fn message(&self) -> String {
        match self.removed_departments.as_slice() {
            [] => "Employee deleted successfully".to_string(),
            [one] => format!("Employee and its department {one} deleted successfully."),
            many => format!(
                "Employee and its departments {} deleted successfully.",
                many.join(", ")
            ),
        }
    }
}

/// A member of the department an employee manages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subordinate {
    pub name: String,
}

/// Department-level view from the perspective of one employee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployeeSummary {
    pub department_name: String,
    /// `None` when the department has no MANAGES edge.
    pub manager: Option<String>,
    pub number_of_employees: i64,
}

// ── Departments ───────────────────────────────────────────────────

/// A Department node with its WORKS_IN headcount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Department {
    pub name: String,
    pub number_of_employees: i64,
    pub id: NodeId,
}

/// An employee listed under a department.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepartmentMember {
    pub name: String,
    pub role: String,
}
